//! The kiosk-facing assistant.
//!
//! [`KioskAssistant::process_query`] is the single entry point a kiosk shell
//! needs: it always returns Markdown, with failures rendered as a `# Error`
//! page rather than returned as errors.
//!
//! # Example
//!
//! ```rust,ignore
//! let assistant = KioskAssistant::builder()
//!     .store(Arc::new(VectorStore::load("data/vector_store")?))
//!     .embedder(client.clone())
//!     .generator(client)
//!     .with_tools(true)
//!     .markdown_file("kiosk/answer.md")
//!     .build()?;
//!
//! let page = assistant.process_query("who is the rector").await;
//! ```

use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info};

use crate::config::RagConfig;
use crate::document::QueryResult;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::functions::standard_tools;
use crate::generation::TextGenerator;
use crate::markdown::write_markdown_file;
use crate::observer::{StatusObserver, StatusReporter};
use crate::responder::ResponseGenerator;
use crate::retriever::Retriever;
use crate::store::VectorStore;

/// A generated answer together with the chunks it was based on.
#[derive(Debug, Clone)]
pub struct Answer {
    pub text: String,
    pub sources: Vec<QueryResult>,
}

/// The Markdown page shown in place of an answer when a query fails.
pub fn error_page(error: &RagError) -> String {
    format!("# Error\n\nError: {error}")
}

/// Retrieval plus generation behind a Markdown-in, Markdown-out contract.
pub struct KioskAssistant {
    config: RagConfig,
    retriever: Arc<Retriever>,
    responder: ResponseGenerator,
    markdown_file: Option<PathBuf>,
    status: StatusReporter,
}

impl KioskAssistant {
    pub fn builder() -> KioskAssistantBuilder {
        KioskAssistantBuilder::default()
    }

    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    pub fn retriever(&self) -> &Arc<Retriever> {
        &self.retriever
    }

    /// Retrieve and generate without any Markdown decoration.
    ///
    /// An empty `sources` list means nothing was retrieved and no generation
    /// call was made. Render failures with [`error_page`].
    ///
    /// # Errors
    ///
    /// Propagates retrieval failures (query embedding, index search) and
    /// generation failures.
    pub async fn ask(&self, query: &str) -> Result<Answer> {
        let sources = self.retriever.search_documents(query, self.config.top_k).await?;
        if sources.is_empty() {
            return Ok(Answer { text: String::new(), sources });
        }
        let text = self.responder.try_generate(query, &sources).await?;
        Ok(Answer { text, sources })
    }

    /// Answer `query` as a Markdown page.
    ///
    /// The page is also written to the configured Markdown file, if any. A
    /// failed write is logged and reported but does not alter the page.
    pub async fn process_query(&self, query: &str) -> String {
        self.status.report(format!("Processing query: {query}"));

        let page = match self.render(query).await {
            Ok(page) => page,
            Err(e) => {
                error!(error = %e, "query processing failed");
                self.status.report(format!("Error: {e}"));
                error_page(&e)
            }
        };

        if let Some(path) = &self.markdown_file {
            if let Err(e) = write_markdown_file(path, &page) {
                error!(path = %path.display(), error = %e, "failed to save answer");
                self.status.report(format!("Failed to save answer: {e}"));
            }
        }
        page
    }

    async fn render(&self, query: &str) -> Result<String> {
        let sources = self.retriever.search_documents(query, self.config.top_k).await?;
        if sources.is_empty() {
            info!("no relevant chunks found");
            return Ok(format!(
                "# No information\n\nSorry, I could not find relevant information for the question: {query}"
            ));
        }

        let text = self.responder.try_generate(query, &sources).await?;
        self.status.report("Response generated");

        let mut page = format!("# Answer: {query}\n\n{text}\n\n## Sources\n\n");
        for source in &sources {
            let _ = writeln!(page, "- {}", source.id);
        }
        Ok(page)
    }
}

/// Builder for [`KioskAssistant`].
#[derive(Default)]
pub struct KioskAssistantBuilder {
    config: Option<RagConfig>,
    store: Option<Arc<VectorStore>>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    generator: Option<Arc<dyn TextGenerator>>,
    observer: Option<Arc<dyn StatusObserver>>,
    markdown_file: Option<PathBuf>,
    tools: bool,
}

impl KioskAssistantBuilder {
    /// Defaults to [`RagConfig::default`].
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn store(mut self, store: Arc<VectorStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    pub fn generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Attach a progress observer to every stage.
    pub fn observer(mut self, observer: Arc<dyn StatusObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Mirror every answer page into this file.
    pub fn markdown_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.markdown_file = Some(path.into());
        self
    }

    /// Offer the built-in functions to the model.
    pub fn with_tools(mut self, enabled: bool) -> Self {
        self.tools = enabled;
        self
    }

    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if the store, embedder or generator
    /// is missing.
    pub fn build(self) -> Result<KioskAssistant> {
        let config = self.config.unwrap_or_default();
        let store =
            self.store.ok_or_else(|| RagError::ConfigError("store is required".to_string()))?;
        let embedder = self
            .embedder
            .ok_or_else(|| RagError::ConfigError("embedder is required".to_string()))?;
        let generator = self
            .generator
            .ok_or_else(|| RagError::ConfigError("generator is required".to_string()))?;

        let mut retriever = Retriever::new(store, embedder);
        let mut responder = ResponseGenerator::new(Arc::clone(&generator));
        let mut status = StatusReporter::silent();
        if let Some(observer) = self.observer {
            retriever = retriever.with_observer(Arc::clone(&observer));
            responder = responder.with_observer(Arc::clone(&observer));
            status = StatusReporter::new(observer);
        }

        let retriever = Arc::new(retriever);
        if self.tools {
            responder = responder.with_tools(standard_tools(Arc::clone(&retriever), generator, &config));
        }

        Ok(KioskAssistant { config, retriever, responder, markdown_file: self.markdown_file, status })
    }
}
