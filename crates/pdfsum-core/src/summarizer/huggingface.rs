//! Hugging Face Inference API provider
//!
//! Calls a hosted seq2seq summarization model. The request carries the
//! generation parameters directly, so length bounds and greedy decoding map
//! one to one onto [`SummaryOptions`].

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{SummaryOptions, SummaryOutput, SummaryProvider};

const HF_INFERENCE_URL: &str = "https://router.huggingface.co/hf-inference/models";

/// Distilled BART fine-tuned on CNN/DailyMail
pub const DEFAULT_MODEL: &str = "sshleifer/distilbart-cnn-12-6";

/// Cold models can take a while to load on the inference side
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Hugging Face Inference API provider
pub struct HuggingFaceProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl HuggingFaceProvider {
    /// Create a new provider with the given API token and model
    ///
    /// An empty token sends unauthenticated requests.
    pub fn new(api_key: &str, model: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/{}", HF_INFERENCE_URL, self.model)
    }
}

#[async_trait]
impl SummaryProvider for HuggingFaceProvider {
    async fn summarize(&self, text: &str, options: &SummaryOptions) -> Result<SummaryOutput> {
        let request = InferenceRequest::new(text, options);

        let mut builder = self.client.post(self.endpoint()).json(&request);
        if !self.api_key.is_empty() {
            builder = builder.bearer_auth(&self.api_key);
        }

        let response = builder
            .send()
            .await
            .context("Failed to reach Hugging Face inference API")?;
        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read inference response")?;

        if !status.is_success() {
            let detail = match serde_json::from_str::<InferenceResponse>(&body) {
                Ok(InferenceResponse::Error { error }) => error,
                _ => body,
            };
            return Err(anyhow::anyhow!("Inference API returned {}: {}", status, detail));
        }

        parse_response(&body)
    }

    fn provider_name(&self) -> &'static str {
        "huggingface"
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
    options: InferenceOptions,
}

impl<'a> InferenceRequest<'a> {
    fn new(inputs: &'a str, options: &SummaryOptions) -> Self {
        Self {
            inputs,
            parameters: InferenceParameters {
                max_length: options.max_length,
                min_length: options.min_length,
                do_sample: options.do_sample,
            },
            options: InferenceOptions {
                wait_for_model: true,
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    max_length: u32,
    min_length: u32,
    do_sample: bool,
}

#[derive(Debug, Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Summaries(Vec<SummaryItem>),
    Error { error: String },
}

#[derive(Debug, Deserialize)]
struct SummaryItem {
    summary_text: String,
}

/// Parse a summarization response body
fn parse_response(body: &str) -> Result<SummaryOutput> {
    let parsed: InferenceResponse =
        serde_json::from_str(body).context("Unexpected inference response format")?;

    match parsed {
        InferenceResponse::Summaries(items) => {
            let first = items
                .into_iter()
                .next()
                .context("Inference response contained no summary")?;
            Ok(SummaryOutput {
                summary_text: first.summary_text,
            })
        }
        InferenceResponse::Error { error } => Err(anyhow::anyhow!("Inference API error: {}", error)),
    }
}
