//! Shared fixtures for unit tests.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use lopdf::{dictionary, Document, Object, Stream};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use crate::pipeline::{ProgressEvent, ProgressSink};
use crate::summarizer::{SummaryOptions, SummaryOutput, SummaryProvider};

/// Deterministic provider that records every call.
#[derive(Default)]
pub(crate) struct StubProvider {
    inputs: Mutex<Vec<String>>,
    options: Mutex<Option<SummaryOptions>>,
    reply: Option<String>,
    fail_marker: Option<String>,
    cancel_after: Option<(usize, CancellationToken)>,
    gate: Option<Arc<Notify>>,
}

impl StubProvider {
    /// Replies with "Summary of <first 24 chars>"
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_reply(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            ..Default::default()
        }
    }

    /// Fails every call whose input contains `marker`
    pub(crate) fn failing_on(marker: &str) -> Self {
        Self {
            fail_marker: Some(marker.to_string()),
            ..Default::default()
        }
    }

    /// Cancels `token` once `calls` calls have completed
    pub(crate) fn cancelling_after(calls: usize, token: CancellationToken) -> Self {
        Self {
            cancel_after: Some((calls, token)),
            ..Default::default()
        }
    }

    /// Blocks every call until `gate` is notified
    pub(crate) fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Default::default()
        }
    }

    pub(crate) fn inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }

    pub(crate) fn last_options(&self) -> Option<SummaryOptions> {
        *self.options.lock().unwrap()
    }
}

#[async_trait]
impl SummaryProvider for StubProvider {
    async fn summarize(&self, text: &str, options: &SummaryOptions) -> Result<SummaryOutput> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let calls = {
            let mut inputs = self.inputs.lock().unwrap();
            inputs.push(text.to_string());
            inputs.len()
        };
        *self.options.lock().unwrap() = Some(*options);

        if let Some((after, token)) = &self.cancel_after {
            if calls >= *after {
                token.cancel();
            }
        }

        if let Some(marker) = &self.fail_marker {
            if text.contains(marker.as_str()) {
                anyhow::bail!("stub failure");
            }
        }

        let summary_text = match &self.reply {
            Some(reply) => reply.clone(),
            None => format!("Summary of {}", text.chars().take(24).collect::<String>()),
        };
        Ok(SummaryOutput { summary_text })
    }

    fn provider_name(&self) -> &'static str {
        "stub"
    }

    fn model_id(&self) -> &str {
        "stub-model"
    }
}

/// Sink that keeps every event for inspection.
#[derive(Default)]
pub(crate) struct RecordingSink {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingSink {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }

    pub(crate) fn percentages(&self) -> Vec<u8> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::Progress { percent } => Some(percent),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn started_pages(&self) -> Vec<usize> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::PageStarted { page, .. } => Some(page),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn summarized_pages(&self) -> Vec<usize> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::PageSummarized { page, .. } => Some(page),
                _ => None,
            })
            .collect()
    }
}

impl ProgressSink for RecordingSink {
    fn on_event(&self, event: ProgressEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Prose-like text of exactly `len` chars with no blank lines and no
/// leading or trailing whitespace.
pub(crate) fn page_text(len: usize, letter: char) -> String {
    (0..len)
        .map(|i| {
            if i % 9 == 8 && i + 1 < len {
                ' '
            } else {
                letter
            }
        })
        .collect()
}

/// Build a PDF with one page per entry, each showing its text in Helvetica.
pub(crate) fn create_pdf(page_texts: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.4");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut page_ids = Vec::new();
    for text in page_texts {
        let content = format!(
            "BT /F1 12 Tf 100 700 Td ({}) Tj ET",
            text.replace('\\', "\\\\")
                .replace('(', "\\(")
                .replace(')', "\\)")
        );
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Resources" => resources_id,
            "Contents" => content_id,
        });
        page_ids.push(page_id);
    }

    let kids: Vec<Object> = page_ids.iter().map(|&id| id.into()).collect();
    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => Object::Integer(page_texts.len() as i64),
    });

    for page_id in &page_ids {
        if let Ok(Object::Dictionary(dict)) = doc.get_object_mut(*page_id) {
            dict.set("Parent", pages_id);
        }
    }

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}
