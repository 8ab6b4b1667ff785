//! Summarization provider abstraction
//!
//! The pipeline only sees [`ChunkSummarizer`], which wraps one
//! [`SummaryProvider`]:
//! - Hugging Face Inference API (seq2seq summarization models)
//! - OpenAI-compatible chat completion endpoints

pub mod huggingface;
pub mod openai;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SummarizationError;

pub use huggingface::HuggingFaceProvider;
pub use openai::OpenAIProvider;

/// Hard cap on characters sent to the model for one chunk.
pub const DEFAULT_MODEL_INPUT_CHARS: usize = 1024;

/// Length bounds and decoding mode passed to the provider with every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryOptions {
    pub max_length: u32,
    pub min_length: u32,
    pub do_sample: bool,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            max_length: 150,
            min_length: 40,
            do_sample: false,
        }
    }
}

/// Structured result of one provider call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryOutput {
    pub summary_text: String,
}

/// Unified summarization interface
///
/// Any per-call timeout is the implementation's concern; the pipeline waits
/// for every call to return.
#[async_trait]
pub trait SummaryProvider: Send + Sync {
    /// Summarize `text` within the given length bounds
    async fn summarize(&self, text: &str, options: &SummaryOptions) -> Result<SummaryOutput>;

    /// Get the provider name (e.g., "huggingface", "openai")
    fn provider_name(&self) -> &'static str;

    /// Get the model identifier
    fn model_id(&self) -> &str;
}

/// Provider configuration stored in settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Hugging Face Inference API
    #[serde(rename = "huggingface")]
    HuggingFace { api_key: String, model: String },
    /// OpenAI or any compatible chat completions API
    #[serde(rename = "openai")]
    OpenAI {
        api_key: String,
        model: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        base_url: Option<String>,
    },
}

impl ProviderConfig {
    /// Get the provider type name
    pub fn provider_type(&self) -> &'static str {
        match self {
            ProviderConfig::HuggingFace { .. } => "huggingface",
            ProviderConfig::OpenAI { .. } => "openai",
        }
    }

    /// Get the model ID
    pub fn model_id(&self) -> &str {
        match self {
            ProviderConfig::HuggingFace { model, .. } => model,
            ProviderConfig::OpenAI { model, .. } => model,
        }
    }

    /// Instantiate the configured provider
    pub fn build(&self) -> Result<Arc<dyn SummaryProvider>> {
        let provider: Arc<dyn SummaryProvider> = match self {
            ProviderConfig::HuggingFace { api_key, model } => {
                Arc::new(HuggingFaceProvider::new(api_key, model)?)
            }
            ProviderConfig::OpenAI {
                api_key,
                model,
                base_url,
            } => Arc::new(OpenAIProvider::new(api_key, model, base_url.as_deref())?),
        };
        tracing::info!(
            provider = provider.provider_name(),
            model = provider.model_id(),
            "Summarization provider ready"
        );
        Ok(provider)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig::HuggingFace {
            api_key: String::new(),
            model: huggingface::DEFAULT_MODEL.to_string(),
        }
    }
}

/// Return at most the first `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Summarizes one chunk at a time through a provider.
///
/// Oversized chunks are truncated to the model input cap before the call.
/// Chunks that are too short to summarize must be filtered by the caller.
#[derive(Clone)]
pub struct ChunkSummarizer {
    provider: Arc<dyn SummaryProvider>,
    options: SummaryOptions,
    max_input_chars: usize,
}

impl ChunkSummarizer {
    pub fn new(provider: Arc<dyn SummaryProvider>) -> Self {
        Self {
            provider,
            options: SummaryOptions::default(),
            max_input_chars: DEFAULT_MODEL_INPUT_CHARS,
        }
    }

    pub fn with_options(mut self, options: SummaryOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_max_input_chars(mut self, max_input_chars: usize) -> Self {
        self.max_input_chars = max_input_chars;
        self
    }

    /// Summarize chunk `chunk` (1-based) of page `page` (1-based).
    pub async fn summarize(
        &self,
        page: usize,
        chunk: usize,
        text: &str,
    ) -> Result<String, SummarizationError> {
        let input = truncate_chars(text, self.max_input_chars);
        if input.len() < text.len() {
            tracing::debug!(
                page,
                chunk,
                cap = self.max_input_chars,
                "Truncated chunk to model input cap"
            );
        }

        match self.provider.summarize(input, &self.options).await {
            Ok(output) => Ok(output.summary_text.trim().to_string()),
            Err(e) => {
                tracing::warn!(page, chunk, error = %e, "Chunk summarization failed");
                Err(SummarizationError {
                    page,
                    chunk,
                    message: format!("{:#}", e),
                })
            }
        }
    }
}
