//! Ask questions against a built vector store from the terminal.
//!
//! Run: `kiosk-chat --store data/vector_store`, or
//! `kiosk-chat --query "who is the rector"` for a single Markdown answer.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use kiosk_cli::{MISSING_KEY_HELP, init_logging, resolve_api_key, run_console};
use kiosk_rag::{GeminiClient, GeminiConfig, KioskAssistant, RagConfig, VectorStore};

#[derive(Parser, Debug)]
#[command(name = "kiosk-chat", version, about = "Chat with the kiosk assistant in a terminal")]
struct Args {
    /// Path prefix of the vector store built by kiosk-index
    #[arg(long, env = "KIOSK_VECTOR_STORE", default_value = "data/vector_store")]
    store: PathBuf,

    /// Gemini API key (falls back to GOOGLE_API_KEY, then GEMINI_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Number of chunks retrieved per question
    #[arg(long, default_value_t = 5)]
    top_k: usize,

    /// Let the model call the built-in functions
    #[arg(long)]
    tools: bool,

    /// Also write every answer page to this Markdown file
    #[arg(long, env = "KIOSK_MARKDOWN_FILE")]
    markdown_file: Option<PathBuf>,

    /// Answer a single question as Markdown and exit
    #[arg(long)]
    query: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_logging(args.log_json);

    let api_key = resolve_api_key(args.api_key.clone()).context(MISSING_KEY_HELP)?;

    let store = VectorStore::load(&args.store).with_context(|| {
        format!("failed to load vector store {}; run kiosk-index first", args.store.display())
    })?;

    let config = RagConfig::builder().top_k(args.top_k).build()?;
    let client = Arc::new(GeminiClient::new(GeminiConfig::new(api_key))?);

    let mut builder = KioskAssistant::builder()
        .config(config)
        .store(Arc::new(store))
        .embedder(client.clone())
        .generator(client)
        .with_tools(args.tools);
    if let Some(path) = &args.markdown_file {
        builder = builder.markdown_file(path);
    }
    let assistant = builder.build()?;

    match &args.query {
        Some(query) => println!("{}", assistant.process_query(query).await),
        None => run_console(&assistant).await?,
    }
    Ok(())
}
