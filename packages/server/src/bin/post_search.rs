//! Command-line search over the embedding store
//!
//! Loads the CSV, embeds the query once and prints the closest posts.
//! Uses the same configuration variables as the server.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use post_search::common::utils::EmbeddingService;
use post_search::domains::posts::{rank, EmbeddingStore, PostView};
use post_search::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "post-search")]
#[command(about = "Find the posts most similar to a query")]
struct Cli {
    /// Free-text query
    #[arg(required = true)]
    query: Vec<String>,

    /// Number of results
    #[arg(short = 'n', long, default_value = "5")]
    top: NonZeroUsize,

    /// CSV with pre-computed embeddings (defaults to POSTS_CSV_PATH)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Quiet by default so stdout stays readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    let query = cli.query.join(" ");
    let query = query.trim();
    anyhow::ensure!(!query.is_empty(), "Query must not be blank");

    let path = cli.data.unwrap_or_else(|| config.posts_csv_path.clone());
    let store = EmbeddingStore::load(&path, &config.load_options())
        .with_context(|| format!("Failed to load posts from {}", path.display()))?;

    let embedder = EmbeddingService::new(
        config.embedding_api_url.clone(),
        config.embedding_api_key.clone(),
        config.embedding_model.clone(),
        config.embedding_timeout(),
    )
    .context("Failed to build embedding client")?;

    let ranked = rank(query, &store, &embedder, cli.top)
        .await
        .context("Failed to embed query")?;

    let views: Vec<PostView> = ranked
        .iter()
        .map(|ranked| PostView::from_ranked(ranked, config.preview_chars))
        .collect();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(());
    }

    if views.is_empty() {
        println!("No posts available");
        return Ok(());
    }

    for view in &views {
        println!("Post {}  (score {:.3})", view.number, view.score);
        if view.truncated {
            println!("  {}...", view.preview);
        } else {
            println!("  {}", view.preview);
        }
        if let Some(link) = &view.link {
            println!("  {}", link);
        }
        println!();
    }

    Ok(())
}
