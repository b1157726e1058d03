//! Answer generation over retrieved chunks.
//!
//! Two prompt styles exist. The plain style asks the model to answer from
//! the supplied excerpts only. The tool style additionally advertises the
//! functions of a [`ToolRegistry`]; when the model's reply contains a
//! `FUNCTION_CALL[name](k:v, ...)` directive, the first such directive is
//! executed and its JSON result is fed to a second generation call whose
//! output becomes the answer.

use std::fmt::Write as _;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::document::QueryResult;
use crate::error::Result;
use crate::function_call::{FunctionCall, parse_function_call};
use crate::generation::TextGenerator;
use crate::observer::{StatusObserver, StatusReporter};
use crate::tool::ToolRegistry;

/// Render excerpts as `Chunk i from <doc_id>:` blocks, numbered from 1.
pub fn format_context(chunks: &[QueryResult]) -> String {
    let mut context = String::new();
    for (i, chunk) in chunks.iter().enumerate() {
        let _ = write!(context, "\nChunk {} from {}:\n{}\n", i + 1, chunk.id, chunk.text);
    }
    context
}

pub fn plain_prompt(query: &str, chunks: &[QueryResult]) -> String {
    format!(
        "Answer the user's question using only the information below.\n\
         If the answer is not in the information, say that you do not have that information.\n\n\
         Information:\n{}\n\
         User question: {query}\n\n\
         Answer (in Markdown):\n",
        format_context(chunks)
    )
}

pub fn tool_prompt(query: &str, chunks: &[QueryResult], tools: &ToolRegistry) -> String {
    format!(
        "Answer the user's question using the information below.\n\
         If the answer is not in the information or you need more information, you may call one \
         of the following functions using the format \
         FUNCTION_CALL[function_name](parameter1:value1, parameter2:value2).\n\n\
         Available functions:\n{}\n\n\
         Examples:\n\
         FUNCTION_CALL[search_documents](query:artificial intelligence, top_k:3)\n\
         FUNCTION_CALL[get_current_time]()\n\
         FUNCTION_CALL[open_browser](url:google.com)\n\n\
         Information:\n{}\n\
         User question: {query}\n\n\
         Answer:\n",
        tools.describe(),
        format_context(chunks)
    )
}

pub fn follow_up_prompt(query: &str, function_name: &str, result: &str) -> String {
    format!(
        "You called the function {function_name} for the question: \"{query}\"\n\n\
         The function returned:\n{result}\n\n\
         Using this result and the earlier context, give the user a final answer.\n\
         Do not mention that a function was used; give only the final answer.\n"
    )
}

/// Produces answers from a query and its retrieved chunks.
pub struct ResponseGenerator {
    generator: Arc<dyn TextGenerator>,
    tools: Option<ToolRegistry>,
    status: StatusReporter,
}

impl ResponseGenerator {
    /// A generator using the plain prompt.
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator, tools: None, status: StatusReporter::silent() }
    }

    /// Switch to the tool prompt and enable function-call handling.
    pub fn with_tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn StatusObserver>) -> Self {
        self.status = StatusReporter::new(observer);
        self
    }

    pub fn tools(&self) -> Option<&ToolRegistry> {
        self.tools.as_ref()
    }

    /// Generate an answer, propagating generation failures.
    ///
    /// Tool failures never surface here; they reach the second call as
    /// error-shaped results.
    pub async fn try_generate(&self, query: &str, chunks: &[QueryResult]) -> Result<String> {
        self.status.report("Generating response...");

        let Some(tools) = &self.tools else {
            return self.generator.generate(&plain_prompt(query, chunks)).await;
        };

        let first = self.generator.generate(&tool_prompt(query, chunks, tools)).await?;
        let FunctionCall::Call { name, args } = parse_function_call(&first) else {
            debug!("no function call in response");
            return Ok(first);
        };

        info!(function = %name, "executing function call");
        self.status.report(format!("Executing function: {name}"));
        let result = tools.dispatch(&name, &args).await;
        let rendered = serde_json::to_string_pretty(&result)?;

        self.generator.generate(&follow_up_prompt(query, &name, &rendered)).await
    }

    /// Generate an answer, turning any failure into an `Error: ...` string.
    pub async fn generate(&self, query: &str, chunks: &[QueryResult]) -> String {
        match self.try_generate(query, chunks).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "response generation failed");
                format!("Error: {e}")
            }
        }
    }
}
