//! Gemini embedding and generation backend over the REST API.
//!
//! [`GeminiClient`] implements both [`EmbeddingProvider`] (`:embedContent`)
//! and [`TextGenerator`] (`:generateContent`) with a single `reqwest` client.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use url::Url;

use crate::config::{GeminiConfig, GenerationSettings};
use crate::embedding::{EmbeddingProvider, TaskType};
use crate::error::{RagError, Result};
use crate::generation::TextGenerator;

const PROVIDER: &str = "Gemini";

/// A client for the Gemini API.
///
/// # Example
///
/// ```rust,ignore
/// use kiosk_rag::{GeminiClient, GeminiConfig, TaskType, EmbeddingProvider};
///
/// let client = GeminiClient::new(GeminiConfig::new(api_key))?;
/// let embedding = client.embed("hello world", TaskType::RetrievalQuery).await?;
/// ```
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: Url,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Create a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if the API key is empty or the base
    /// URL cannot be parsed.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(RagError::ConfigError("API key must not be empty".into()));
        }

        let mut base_url = Url::parse(&config.base_url).map_err(|e| {
            RagError::ConfigError(format!("invalid base URL '{}': {e}", config.base_url))
        })?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self { http: reqwest::Client::new(), base_url, config })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Build `<base>/models/<model>:<method>`.
    fn endpoint(&self, model: &str, method: &str) -> Result<Url> {
        let model = model_path(model);
        self.base_url.join(&format!("{model}:{method}")).map_err(|e| {
            RagError::ConfigError(format!("failed to construct URL for model '{model}': {e}"))
        })
    }

    /// POST a JSON body and decode the JSON response, mapping failures to a message.
    async fn post_json<Req, Res>(&self, url: Url, body: &Req) -> std::result::Result<Res, String>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        let response = self
            .http
            .post(url.clone())
            .header("x-goog-api-key", &self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| format!("request to '{url}' failed: {e}"))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| format!("failed to read response: {e}"))?;

        if !status.is_success() {
            return Err(format!("API returned {status}: {}", api_error_detail(&text)));
        }

        serde_json::from_str(&text).map_err(|e| format!("failed to parse response: {e}"))
    }
}

// ── Gemini API request/response types ──────────────────────────────

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedContentRequest<'a> {
    model: String,
    content: Content<'a>,
    task_type: TaskType,
}

#[derive(Debug, Deserialize)]
struct EmbedContentResponse {
    embedding: ContentEmbedding,
}

#[derive(Debug, Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: &'a GenerationSettings,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

fn model_path(model: &str) -> String {
    if model.starts_with("models/") { model.to_string() } else { format!("models/{model}") }
}

/// Extract `error.message` from an API error body, falling back to the raw body.
fn api_error_detail(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body).map(|e| e.error.message).unwrap_or_else(|_| {
        body.to_string()
    })
}

fn embed_request<'a>(model: &str, text: &'a str, task_type: TaskType) -> EmbedContentRequest<'a> {
    EmbedContentRequest {
        model: model_path(model),
        content: Content { role: None, parts: vec![Part { text }] },
        task_type,
    }
}

fn generate_request<'a>(
    prompt: &'a str,
    settings: &'a GenerationSettings,
) -> GenerateContentRequest<'a> {
    GenerateContentRequest {
        contents: vec![Content { role: Some("user"), parts: vec![Part { text: prompt }] }],
        generation_config: settings,
    }
}

/// Join the text parts of the first candidate.
fn response_text(response: GenerateContentResponse) -> std::result::Result<String, String> {
    let block_reason = response.prompt_feedback.and_then(|f| f.block_reason);
    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(match block_reason {
            Some(reason) => format!("prompt was blocked: {reason}"),
            None => "response contained no candidates".to_string(),
        });
    };

    let text: String = candidate
        .content
        .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".to_string());
        return Err(format!("response contained no text (finish reason: {reason})"));
    }
    Ok(text)
}

// ── Trait implementations ──────────────────────────────────────────

#[async_trait]
impl EmbeddingProvider for GeminiClient {
    async fn embed(&self, text: &str, task_type: TaskType) -> Result<Vec<f32>> {
        debug!(provider = PROVIDER, text_len = text.len(), ?task_type, "embedding single text");

        let url = self.endpoint(&self.config.embedding_model, "embedContent")?;
        let body = embed_request(&self.config.embedding_model, text, task_type);
        let response: EmbedContentResponse = self.post_json(url, &body).await.map_err(|message| {
            error!(provider = PROVIDER, error = %message, "embedding request failed");
            RagError::EmbeddingError { provider: PROVIDER.into(), message }
        })?;

        Ok(response.embedding.values)
    }

    fn dimensions(&self) -> usize {
        self.config.embedding_dimensions
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        debug!(
            provider = PROVIDER,
            model = %self.config.generation_model,
            prompt_len = prompt.len(),
            "generating content"
        );

        let to_error = |message: String| {
            error!(provider = PROVIDER, error = %message, "generation request failed");
            RagError::GenerationError { provider: PROVIDER.into(), message }
        };

        let url = self.endpoint(&self.config.generation_model, "generateContent")?;
        let body = generate_request(prompt, &self.config.generation);
        let response: GenerateContentResponse = self.post_json(url, &body).await.map_err(to_error)?;
        response_text(response).map_err(to_error)
    }
}
