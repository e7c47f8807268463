use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::domains::posts::store::{LoadOptions, DEFAULT_MIN_TEXT_LENGTH};

pub const DEFAULT_POSTS_CSV_PATH: &str =
    "data/Shares_with_embeddings_sentence_similarity_spanish_es_JSON.csv";
pub const DEFAULT_EMBEDDING_API_URL: &str = "http://localhost:8081/v1/embeddings";
pub const DEFAULT_EMBEDDING_MODEL: &str = "hiiamsid/sentence_similarity_spanish_es";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub posts_csv_path: PathBuf,
    pub min_text_length: usize,
    pub embedding_api_url: String,
    pub embedding_api_key: Option<String>,
    pub embedding_model: String,
    pub embedding_timeout_secs: u64,
    pub trends_enabled: bool,
    pub trends_language: String,
    pub trends_tz_offset: i32,
    pub trends_timeframe: String,
    pub trends_geo: String,
    pub trends_timeout_secs: u64,
    pub default_results: usize,
    pub max_results: usize,
    pub preview_chars: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup (environment, map in tests)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            port: parse_or(&lookup, "PORT", 8080)?,
            posts_csv_path: lookup("POSTS_CSV_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_POSTS_CSV_PATH)),
            min_text_length: parse_or(&lookup, "MIN_TEXT_LENGTH", DEFAULT_MIN_TEXT_LENGTH)?,
            embedding_api_url: lookup("EMBEDDING_API_URL")
                .unwrap_or_else(|| DEFAULT_EMBEDDING_API_URL.to_string()),
            embedding_api_key: lookup("EMBEDDING_API_KEY").filter(|key| !key.trim().is_empty()),
            embedding_model: lookup("EMBEDDING_MODEL")
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            embedding_timeout_secs: parse_or(&lookup, "EMBEDDING_TIMEOUT_SECS", 30)?,
            trends_enabled: parse_or(&lookup, "TRENDS_ENABLED", true)?,
            trends_language: lookup("TRENDS_LANGUAGE").unwrap_or_else(|| "es-ES".to_string()),
            trends_tz_offset: parse_or(&lookup, "TRENDS_TZ_OFFSET", 360)?,
            trends_timeframe: lookup("TRENDS_TIMEFRAME")
                .unwrap_or_else(|| "today 12-m".to_string()),
            trends_geo: lookup("TRENDS_GEO").unwrap_or_default(),
            trends_timeout_secs: parse_or(&lookup, "TRENDS_TIMEOUT_SECS", 10)?,
            default_results: parse_or(&lookup, "DEFAULT_RESULTS", 5)?,
            max_results: parse_or(&lookup, "MAX_RESULTS", 20)?,
            preview_chars: parse_or(&lookup, "PREVIEW_CHARS", 200)?,
        };

        if config.max_results == 0 {
            bail!("MAX_RESULTS must be at least 1");
        }
        if config.default_results == 0 || config.default_results > config.max_results {
            bail!(
                "DEFAULT_RESULTS must be between 1 and MAX_RESULTS ({})",
                config.max_results
            );
        }

        Ok(config)
    }

    /// Options used to load the embedding store
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            min_text_length: self.min_text_length,
            ..LoadOptions::default()
        }
    }

    pub fn embedding_timeout(&self) -> Duration {
        Duration::from_secs(self.embedding_timeout_secs)
    }

    pub fn trends_timeout(&self) -> Duration {
        Duration::from_secs(self.trends_timeout_secs)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", key, raw)),
        _ => Ok(default),
    }
}
