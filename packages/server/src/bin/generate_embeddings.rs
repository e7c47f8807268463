//! Add an `embeddings` column to a raw CSV export
//!
//! Every row's text is sent to the configured embedding endpoint and the
//! vector is written back as a JSON array, producing the file the server and
//! `post-search` load. Rows that fail to embed are reported and left out.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use post_search::common::utils::EmbeddingService;
use post_search::domains::posts::store::{DEFAULT_TEXT_COLUMN, DEFAULT_VECTOR_COLUMN};
use post_search::kernel::BaseEmbeddingService;
use post_search::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "generate_embeddings")]
#[command(about = "Embed the text column of a CSV export")]
struct Cli {
    /// Raw CSV export
    input: PathBuf,

    /// Output CSV (defaults to POSTS_CSV_PATH)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Column holding the post text
    #[arg(long, default_value = DEFAULT_TEXT_COLUMN)]
    text_column: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,post_search=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    let output = cli.output.unwrap_or_else(|| config.posts_csv_path.clone());

    let embedder = EmbeddingService::new(
        config.embedding_api_url.clone(),
        config.embedding_api_key.clone(),
        config.embedding_model.clone(),
        config.embedding_timeout(),
    )
    .context("Failed to build embedding client")?;

    let mut reader = csv::Reader::from_path(&cli.input)
        .with_context(|| format!("Failed to open {}", cli.input.display()))?;
    let headers = reader.headers().context("Failed to read CSV header")?.clone();

    let Some(text_idx) = headers.iter().position(|h| h == cli.text_column) else {
        bail!("Column {:?} not found in {}", cli.text_column, cli.input.display());
    };
    if headers.iter().any(|h| h == DEFAULT_VECTOR_COLUMN) {
        bail!(
            "{} already has an {:?} column",
            cli.input.display(),
            DEFAULT_VECTOR_COLUMN
        );
    }

    let mut writer = csv::Writer::from_path(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    let mut out_headers = headers.clone();
    out_headers.push_field(DEFAULT_VECTOR_COLUMN);
    writer.write_record(&out_headers)?;

    println!(
        "Embedding {:?} from {} with {}\n",
        cli.text_column,
        cli.input.display(),
        embedder.model()
    );

    let mut embedded = 0usize;
    let mut failed = 0usize;

    for (row, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read row {}", row))?;
        let text = record.get(text_idx).unwrap_or_default();

        match embedder.generate(text).await {
            Ok(embedding) => {
                let mut out = record.clone();
                out.push_field(&serde_json::to_string(&embedding)?);
                writer.write_record(&out)?;
                embedded += 1;
            }
            Err(e) => {
                tracing::warn!(row, error = %e, "Failed to generate embedding");
                failed += 1;
            }
        }

        if (row + 1) % 100 == 0 {
            tracing::info!(rows = row + 1, embedded, failed, "Progress");
        }
    }

    writer.flush().context("Failed to write output")?;

    println!("\nEmbedding generation complete!");
    println!("  Embedded: {}", embedded);
    println!("  Skipped:  {}", failed);
    println!("  Output:   {}", output.display());

    Ok(())
}
