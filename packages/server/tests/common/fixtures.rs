//! Test fixtures for creating post collections.
//!
//! Fixtures are written as real CSV files so tests go through the same loader
//! as the server.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub const CSV_HEADER: &str = "ShareDate,ShareLink,ShareCommentary,embeddings";

/// Text long enough to pass the default length filter
pub fn long_text(topic: &str) -> String {
    let mut text = format!("Post about {}.", topic);
    while text.chars().count() <= 100 {
        text.push_str(" More details on the topic follow here.");
    }
    text
}

/// One CSV row; the vector is written as a quoted JSON array
pub fn csv_row(link: Option<&str>, text: &str, vector: &[f32]) -> String {
    let vector = serde_json::to_string(vector).expect("vector serializes");
    format!(
        "2024-01-01 10:00:00,{},\"{}\",\"{}\"",
        link.unwrap_or(""),
        text.replace('"', "\"\""),
        vector
    )
}

/// Standard collection used by most API tests
///
/// | row | topic                   | vector    | kept |
/// |-----|-------------------------|-----------|------|
/// | 0   | volunteering            | [1, 0, 0] | yes  |
/// | 1   | short "Hola"            | [0, 1, 0] | no   |
/// | 2   | artificial intelligence | [0, 1, 0] | yes  |
/// | 3   | recipes                 | [0, 0, 1] | yes  |
pub fn standard_posts_csv() -> String {
    [
        CSV_HEADER.to_string(),
        csv_row(
            Some("https://www.linkedin.com/feed/update/urn:li:share:1"),
            &long_text("volunteering"),
            &[1.0, 0.0, 0.0],
        ),
        csv_row(None, "Hola", &[0.0, 1.0, 0.0]),
        csv_row(None, &long_text("artificial intelligence"), &[0.0, 1.0, 0.0]),
        csv_row(
            Some("https://www.linkedin.com/feed/update/urn:li:share:4"),
            &long_text("recipes"),
            &[0.0, 0.0, 1.0],
        ),
    ]
    .join("\n")
}

/// Write CSV content into `dir` and return its path
pub fn write_csv(dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write fixture {}", path.display()))?;
    Ok(path)
}
