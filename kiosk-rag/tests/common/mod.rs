//! Deterministic stand-ins for the Gemini backend.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use kiosk_rag::{Document, DocumentType, EmbeddingProvider, RagError, Result, TaskType, TextGenerator};

pub const DIM: usize = 256;

/// Bag-of-words embedder: each lowercase word is FNV-hashed into one of
/// [`DIM`] buckets and the counts are L2-normalized.
pub struct HashEmbedder;

fn fnv1a(word: &str) -> u64 {
    word.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
    })
}

pub fn hash_embedding(text: &str) -> Vec<f32> {
    let mut vector = vec![0.0f32; DIM];
    for word in text.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()) {
        vector[(fnv1a(&word.to_lowercase()) % DIM as u64) as usize] += 1.0;
    }
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        vector.iter_mut().for_each(|x| *x /= norm);
    }
    vector
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str, _task_type: TaskType) -> Result<Vec<f32>> {
        Ok(hash_embedding(text))
    }

    fn dimensions(&self) -> usize {
        DIM
    }
}

/// Fails for any text containing `marker`, otherwise behaves like [`HashEmbedder`].
pub struct FlakyEmbedder {
    pub marker: &'static str,
}

#[async_trait]
impl EmbeddingProvider for FlakyEmbedder {
    async fn embed(&self, text: &str, _task_type: TaskType) -> Result<Vec<f32>> {
        if text.contains(self.marker) {
            return Err(RagError::EmbeddingError {
                provider: "flaky".into(),
                message: "rate limited".into(),
            });
        }
        Ok(hash_embedding(text))
    }

    fn dimensions(&self) -> usize {
        DIM
    }
}

/// Replays canned replies in order and records every prompt.
#[derive(Default)]
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(replies: impl IntoIterator<Item = Result<String>>) -> Self {
        Self { replies: Mutex::new(replies.into_iter().collect()), prompts: Mutex::default() }
    }

    pub fn replying(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|r| Ok(r.to_string())))
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(RagError::GenerationError { provider: "scripted".into(), message: "no reply left".into() })
        })
    }
}

pub fn document(id: &str, text: &str) -> Document {
    Document {
        id: id.to_string(),
        source: PathBuf::from(format!("data/{id}")),
        text: text.to_string(),
        doc_type: DocumentType::Txt,
        chunk_count: 0,
    }
}

/// The two-document corpus used by the rector scenario.
pub fn campus_corpus() -> Vec<Document> {
    vec![
        document("doc_a", "The rector of the university is Professor Rahman."),
        document("doc_b", "The cafeteria serves lunch from noon until two."),
    ]
}
