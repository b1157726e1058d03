//! Retrieval-augmented question answering for information kiosks.
//!
//! This crate provides:
//! - Document discovery and text extraction (`pdf`, `txt`, `md`)
//! - Fixed-size chunking and Gemini embeddings
//! - A flat L2 vector index persisted as `<prefix>.index` / `<prefix>.pkl`
//! - Query-time retrieval and answer generation, optionally with the
//!   `FUNCTION_CALL[name](k:v)` function-call protocol
//! - [`KioskAssistant`], the Markdown-in, Markdown-out entry point for kiosk shells

mod assistant;
mod chunking;
mod config;
mod document;
mod embedding;
mod error;
mod function_call;
mod functions;
mod gemini;
mod generation;
mod index;
mod indexer;
mod loader;
mod markdown;
mod observer;
mod responder;
mod retriever;
mod store;
mod tool;

pub use assistant::{Answer, KioskAssistant, KioskAssistantBuilder, error_page};
pub use chunking::{Chunker, FixedSizeChunker, chunk_text};
pub use config::{
    API_KEY_ENV_VARS, DEFAULT_EMBEDDING_DIMENSIONS, DEFAULT_EMBEDDING_MODEL,
    DEFAULT_GEMINI_BASE_URL, DEFAULT_GENERATION_MODEL, GeminiConfig, GenerationSettings,
    RagConfig, RagConfigBuilder, api_key_from_env, api_key_from_lookup,
};
pub use document::{ChunkRecord, Document, DocumentType, QueryResult};
pub use embedding::{EmbeddingProvider, TaskType};
pub use error::{RagError, Result};
pub use function_call::{FALLBACK_ARGUMENT_KEY, FunctionCall, parse_arguments, parse_function_call};
pub use functions::{
    CurrentTimeTool, ListDocumentsTool, OpenBrowserTool, SearchDocumentsTool,
    SummarizeDocumentTool, SystemBrowser, UrlOpener, normalize_url, standard_tools, time_payload,
    truncate_chars,
};
pub use gemini::GeminiClient;
pub use generation::TextGenerator;
pub use index::{FlatL2Index, MISSING_NEIGHBOR, SearchHits, squared_l2};
pub use indexer::Indexer;
pub use loader::{discover_documents, load_document, load_documents};
pub use markdown::{read_markdown_file, write_markdown_file};
pub use observer::{StatusObserver, StatusReporter};
pub use responder::{ResponseGenerator, follow_up_prompt, format_context, plain_prompt, tool_prompt};
pub use retriever::Retriever;
pub use store::{INDEX_EXTENSION, METADATA_EXTENSION, StorePaths, VectorStore};
pub use tool::{Tool, ToolRegistry, coerce_argument, error_result};
