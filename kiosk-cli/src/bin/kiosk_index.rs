//! Build the vector store from a directory of documents.
//!
//! Run: `kiosk-index --data-dir data/sample_docs --output data/vector_store`

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use kiosk_cli::{MISSING_KEY_HELP, init_logging, prompt_api_key, resolve_api_key};
use kiosk_rag::{FixedSizeChunker, GeminiClient, GeminiConfig, Indexer, RagConfig};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "kiosk-index", version, about = "Index documents for the kiosk assistant")]
struct Args {
    /// Directory holding the pdf, txt and md files to index
    #[arg(long, env = "KIOSK_DATA_DIR", default_value = "data/sample_docs")]
    data_dir: PathBuf,

    /// Path prefix for the `.index` and `.pkl` artifacts
    #[arg(long, env = "KIOSK_VECTOR_STORE", default_value = "data/vector_store")]
    output: PathBuf,

    /// Gemini API key (falls back to GOOGLE_API_KEY, GEMINI_API_KEY, then a prompt)
    #[arg(long)]
    api_key: Option<String>,

    /// Chunk size in characters
    #[arg(long, default_value_t = 1000)]
    chunk_size: usize,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_logging(args.log_json);

    let Some(api_key) = resolve_api_key(args.api_key.clone()).or_else(prompt_api_key) else {
        eprintln!("{MISSING_KEY_HELP}");
        std::process::exit(1);
    };

    let config = RagConfig::builder().chunk_size(args.chunk_size).build()?;
    let client = Arc::new(GeminiClient::new(GeminiConfig::new(api_key))?);
    let indexer = Indexer::new(Arc::new(FixedSizeChunker::new(config.chunk_size)), client)
        .with_observer(Arc::new(|status: &str| println!("{status}")));

    info!(data_dir = %args.data_dir.display(), chunk_size = config.chunk_size, "indexing documents");
    let store = indexer
        .build_from_dir(&args.data_dir)
        .await
        .with_context(|| format!("failed to index {}", args.data_dir.display()))?;

    let paths = store
        .save(&args.output)
        .with_context(|| format!("failed to save vector store to {}", args.output.display()))?;

    println!(
        "Indexed {} chunks from {} documents.",
        store.len(),
        store.documents().len()
    );
    println!("Vector store saved to {} and {}", paths.index.display(), paths.metadata.display());
    Ok(())
}
