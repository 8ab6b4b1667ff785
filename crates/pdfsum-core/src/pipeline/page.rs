//! Per-page aggregation: chunk, summarize each chunk, join the results.

use tokio_util::sync::CancellationToken;

use crate::chunker::{split_into_chunks, PARAGRAPH_SEPARATOR};
use crate::config::ChunkingSettings;
use crate::error::PageProcessingError;
use crate::summarizer::ChunkSummarizer;

use super::progress::ProgressSink;
use super::types::{PageOutcome, PageSummary, ProgressEvent};

/// Summarizes one page at a time.
pub struct PageAggregator {
    summarizer: ChunkSummarizer,
    max_chunk_chars: usize,
    min_content_chars: usize,
}

impl PageAggregator {
    pub fn new(summarizer: ChunkSummarizer, chunking: &ChunkingSettings) -> Self {
        Self {
            summarizer: summarizer.with_max_input_chars(chunking.model_input_chars),
            max_chunk_chars: chunking.max_chunk_chars,
            min_content_chars: chunking.min_content_chars,
        }
    }

    /// Summarize `raw_text` as page `page` (1-based).
    ///
    /// A chunk failure is reported as a `PageError` event and the remaining
    /// chunks are still attempted. Only malformed text fails the whole page.
    pub async fn summarize_page(
        &self,
        page: usize,
        raw_text: &str,
        sink: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<PageOutcome, PageProcessingError> {
        let text = raw_text.trim();
        let text_chars = text.chars().count();
        if text_chars < self.min_content_chars {
            tracing::debug!(page, chars = text_chars, "Skipping short page");
            return Ok(PageOutcome::Skipped);
        }

        let chunks = split_into_chunks(text, self.max_chunk_chars);
        tracing::info!(page, chunks = chunks.len(), "Summarizing page");
        sink.on_event(ProgressEvent::PageStarted {
            page,
            chunk_count: chunks.len(),
        });

        // Checked after PageStarted so the page error follows its start event
        let nul_count = text.matches('\0').count();
        if nul_count > 0 {
            return Err(PageProcessingError::MalformedText { page, nul_count });
        }

        let mut summary = PageSummary {
            page,
            ..Default::default()
        };

        for (i, chunk) in chunks.iter().enumerate() {
            if cancel.is_cancelled() {
                tracing::debug!(page, chunk = i + 1, "Cancelled between chunks");
                return Ok(PageOutcome::Interrupted);
            }

            if chunk.trim().chars().count() < self.min_content_chars {
                summary.skipped_chunks += 1;
                continue;
            }

            match self.summarizer.summarize(page, i + 1, chunk).await {
                Ok(piece) => {
                    summary.text.push_str(&piece);
                    summary.text.push_str(PARAGRAPH_SEPARATOR);
                    summary.summarized_chunks += 1;
                }
                Err(e) => {
                    summary.failed_chunks += 1;
                    sink.on_event(ProgressEvent::PageError {
                        page,
                        chunk: Some(e.chunk),
                        message: e.to_string(),
                    });
                }
            }
        }

        if summary.summarized_chunks == 0 && summary.failed_chunks > 0 {
            return Ok(PageOutcome::Failed {
                failed_chunks: summary.failed_chunks,
            });
        }

        tracing::debug!(
            page,
            summarized = summary.summarized_chunks,
            skipped = summary.skipped_chunks,
            failed = summary.failed_chunks,
            "Page summarized"
        );
        Ok(PageOutcome::Summarized(summary))
    }
}
