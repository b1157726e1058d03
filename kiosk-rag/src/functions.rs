//! The built-in functions offered to the model.
//!
//! | name | parameters |
//! |------|------------|
//! | `search_documents` | `query`, `top_k` |
//! | `get_current_time` | |
//! | `open_browser` | `url` |
//! | `summarize_document` | `doc_id` |
//! | `list_available_documents` | |

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::config::RagConfig;
use crate::error::{RagError, Result};
use crate::generation::TextGenerator;
use crate::retriever::Retriever;
use crate::store::VectorStore;
use crate::tool::{Tool, ToolRegistry, error_result};

/// Build a registry holding all five built-in functions.
pub fn standard_tools(
    retriever: Arc<Retriever>,
    generator: Arc<dyn TextGenerator>,
    config: &RagConfig,
) -> ToolRegistry {
    let store = Arc::clone(retriever.store());
    ToolRegistry::new()
        .with_tool(Arc::new(SearchDocumentsTool::new(retriever, config.top_k)))
        .with_tool(Arc::new(CurrentTimeTool))
        .with_tool(Arc::new(OpenBrowserTool::new(Arc::new(SystemBrowser))))
        .with_tool(Arc::new(SummarizeDocumentTool::new(
            Arc::clone(&store),
            generator,
            config.summary_char_budget,
        )))
        .with_tool(Arc::new(ListDocumentsTool::new(store)))
}

/// Read a string argument, accepting values that were coerced to numbers.
fn string_arg(args: &Value, name: &str) -> Option<String> {
    match args.get(name)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn required_string_arg(args: &Value, name: &str) -> Result<String> {
    string_arg(args, name)
        .ok_or_else(|| RagError::ToolError(format!("missing required '{name}' parameter")))
}

/// Return at most `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    text.char_indices().nth(max_chars).map_or(text, |(offset, _)| &text[..offset])
}

// ── search_documents ───────────────────────────────────────────────

/// Runs a retrieval query on behalf of the model.
pub struct SearchDocumentsTool {
    retriever: Arc<Retriever>,
    default_top_k: usize,
}

impl SearchDocumentsTool {
    pub fn new(retriever: Arc<Retriever>, default_top_k: usize) -> Self {
        Self { retriever, default_top_k }
    }
}

#[async_trait]
impl Tool for SearchDocumentsTool {
    fn name(&self) -> &str {
        "search_documents"
    }

    fn description(&self) -> &str {
        "Search the documents relevant to a query"
    }

    fn parameters(&self) -> &[&str] {
        &["query", "top_k"]
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let query = required_string_arg(&args, "query")?;
        let top_k = match args.get("top_k") {
            None => self.default_top_k,
            Some(value) => value.as_u64().map(|k| k as usize).ok_or_else(|| {
                RagError::ToolError(format!("top_k must be a whole number, got {value}"))
            })?,
        };

        let results = self.retriever.search_documents(&query, top_k).await?;
        Ok(json!({ "status": "success", "count": results.len(), "results": results }))
    }
}

// ── get_current_time ───────────────────────────────────────────────

/// Reports the local wall-clock time.
pub struct CurrentTimeTool;

/// Format `now` the way the time function reports it.
pub fn time_payload(now: NaiveDateTime) -> Value {
    json!({
        "status": "success",
        "time": now.format("%H:%M:%S").to_string(),
        "date": now.format("%Y-%m-%d").to_string(),
        "day_of_week": now.format("%A").to_string(),
        "timestamp": now.format("%Y-%m-%dT%H:%M:%S").to_string(),
    })
}

#[async_trait]
impl Tool for CurrentTimeTool {
    fn name(&self) -> &str {
        "get_current_time"
    }

    fn description(&self) -> &str {
        "Get the current time and date"
    }

    fn parameters(&self) -> &[&str] {
        &[]
    }

    async fn execute(&self, _args: Value) -> Result<Value> {
        Ok(time_payload(Local::now().naive_local()))
    }
}

// ── open_browser ───────────────────────────────────────────────────

/// Launches a URL in some browser.
pub trait UrlOpener: Send + Sync {
    fn open(&self, url: &str) -> std::io::Result<()>;
}

/// Opens URLs in the system's default browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl UrlOpener for SystemBrowser {
    fn open(&self, url: &str) -> std::io::Result<()> {
        webbrowser::open(url)
    }
}

/// Prefix `https://` unless the URL already has an http(s) scheme.
pub fn normalize_url(raw: &str) -> String {
    let url = raw.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

/// Best-effort browser launch.
pub struct OpenBrowserTool {
    opener: Arc<dyn UrlOpener>,
}

impl OpenBrowserTool {
    pub fn new(opener: Arc<dyn UrlOpener>) -> Self {
        Self { opener }
    }
}

#[async_trait]
impl Tool for OpenBrowserTool {
    fn name(&self) -> &str {
        "open_browser"
    }

    fn description(&self) -> &str {
        "Open a browser at the given URL"
    }

    fn parameters(&self) -> &[&str] {
        &["url"]
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let raw = required_string_arg(&args, "url")?;
        if raw.trim().is_empty() {
            return Err(RagError::ToolError("url must not be empty".into()));
        }

        let url = normalize_url(&raw);
        match self.opener.open(&url) {
            Ok(()) => {
                info!(url = %url, "opened browser");
                Ok(json!({ "status": "success", "message": format!("Browser opened at URL: {url}") }))
            }
            Err(e) => {
                warn!(url = %url, error = %e, "failed to open browser");
                Ok(error_result(format!("Failed to open browser: {e}")))
            }
        }
    }
}

// ── summarize_document ─────────────────────────────────────────────

/// Asks the model for a summary of one loaded document.
pub struct SummarizeDocumentTool {
    store: Arc<VectorStore>,
    generator: Arc<dyn TextGenerator>,
    char_budget: usize,
}

impl SummarizeDocumentTool {
    pub fn new(store: Arc<VectorStore>, generator: Arc<dyn TextGenerator>, char_budget: usize) -> Self {
        Self { store, generator, char_budget }
    }
}

#[async_trait]
impl Tool for SummarizeDocumentTool {
    fn name(&self) -> &str {
        "summarize_document"
    }

    fn description(&self) -> &str {
        "Summarize a specific document"
    }

    fn parameters(&self) -> &[&str] {
        &["doc_id"]
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let doc_id = required_string_arg(&args, "doc_id")?;
        let Some(document) = self.store.document(&doc_id) else {
            return Ok(error_result(format!("Document with ID {doc_id} not found")));
        };

        let prompt = format!(
            "Summarize the following document in a few key points:\n\n{}\n\n\
             Give a summary that covers the main points of the document.",
            truncate_chars(&document.text, self.char_budget)
        );

        match self.generator.generate(&prompt).await {
            Ok(summary) => Ok(json!({
                "status": "success",
                "doc_id": doc_id,
                "summary": summary,
                "characters": document.char_len(),
                "source": document.source,
            })),
            Err(e) => {
                warn!(document.id = %doc_id, error = %e, "summary generation failed");
                Ok(error_result(format!("Failed to summarize document: {e}")))
            }
        }
    }
}

// ── list_available_documents ───────────────────────────────────────

/// Lists every document in the store.
pub struct ListDocumentsTool {
    store: Arc<VectorStore>,
}

impl ListDocumentsTool {
    pub fn new(store: Arc<VectorStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for ListDocumentsTool {
    fn name(&self) -> &str {
        "list_available_documents"
    }

    fn description(&self) -> &str {
        "List the available documents"
    }

    fn parameters(&self) -> &[&str] {
        &[]
    }

    async fn execute(&self, _args: Value) -> Result<Value> {
        let documents: Vec<Value> = self
            .store
            .documents()
            .iter()
            .map(|doc| {
                json!({
                    "id": doc.id,
                    "source": doc.source,
                    "size": doc.char_len(),
                    "chunks": doc.chunk_count,
                })
            })
            .collect();

        Ok(json!({ "status": "success", "count": documents.len(), "documents": documents }))
    }
}
