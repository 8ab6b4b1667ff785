//! OpenAI-compatible chat completions provider
//!
//! Chat models have no `min_length`, so the bounds are stated in the system
//! prompt and `max_length` becomes `max_tokens`. Greedy decoding maps to
//! `temperature = 0`.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{SummaryOptions, SummaryOutput, SummaryProvider};

const OPENAI_API_URL: &str = "https://api.openai.com/v1";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

/// OpenAI (or compatible) chat completions provider
pub struct OpenAIProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAIProvider {
    /// Create a new provider; `base_url` defaults to the OpenAI API
    pub fn new(api_key: &str, model: &str, base_url: Option<&str>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: base_url
                .unwrap_or(OPENAI_API_URL)
                .trim_end_matches('/')
                .to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl SummaryProvider for OpenAIProvider {
    async fn summarize(&self, text: &str, options: &SummaryOptions) -> Result<SummaryOutput> {
        let request = build_request(&self.model, text, options);

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to reach chat completions API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(anyhow::anyhow!("Chat API returned {}: {}", status, detail));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .context("Unexpected chat completion format")?;

        extract_summary(completion)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

fn system_prompt(options: &SummaryOptions) -> String {
    format!(
        "Summarize the text provided by the user. Write plain prose, between {} and {} tokens. \
         Reply with the summary only.",
        options.min_length, options.max_length
    )
}

fn build_request<'a>(model: &'a str, text: &'a str, options: &SummaryOptions) -> ChatRequest<'a> {
    ChatRequest {
        model,
        messages: vec![
            ChatMessage {
                role: "system",
                content: system_prompt(options),
            },
            ChatMessage {
                role: "user",
                content: text.to_string(),
            },
        ],
        max_tokens: options.max_length,
        temperature: if options.do_sample { None } else { Some(0.0) },
    }
}

fn extract_summary(completion: ChatResponse) -> Result<SummaryOutput> {
    let content = completion
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .context("Chat completion contained no message content")?;
    Ok(SummaryOutput {
        summary_text: content,
    })
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}
