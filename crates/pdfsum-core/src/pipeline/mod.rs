//! Sequential document summarization pipeline.
//!
//! # Architecture
//!
//! ```text
//! pages[1..N]
//!     │
//!     ▼
//! DocumentPipeline ── one page at a time ──► PageAggregator
//!     │                                          │
//!     │                                  split_into_chunks()
//!     │                                          │
//!     │                                  ChunkSummarizer (per chunk)
//!     │                                          │
//!     ◄────────────── PageOutcome ───────────────┘
//!     │
//!     ├──► DocumentSummary ("Page N Summary:" sections)
//!     └──► ProgressSink (events + percentage)
//! ```
//!
//! Nothing runs concurrently: every provider call is awaited before the next
//! chunk is looked at. Chunk and page failures become `PageError` events and
//! the run carries on with whatever succeeded.

mod page;
mod progress;
mod types;

pub use page::PageAggregator;
pub use progress::{ChannelSink, NoOpSink, ProgressSink};
pub use types::{
    DocumentSummary, PageOutcome, PageSummary, ProgressEvent, RunOutcome, RunReport, RunStatus,
};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::{ChunkingSettings, Settings};
use crate::error::PipelineError;
use crate::summarizer::{ChunkSummarizer, SummaryProvider};

use progress::ProgressCounter;

/// Summarizes documents page by page.
///
/// One instance processes one document at a time; a concurrent call to
/// [`run`](Self::run) is rejected with [`PipelineError::AlreadyRunning`].
pub struct DocumentPipeline {
    aggregator: PageAggregator,
    running: AtomicBool,
}

impl DocumentPipeline {
    pub fn new(summarizer: ChunkSummarizer, chunking: &ChunkingSettings) -> Self {
        Self {
            aggregator: PageAggregator::new(summarizer, chunking),
            running: AtomicBool::new(false),
        }
    }

    /// Build a pipeline from persisted settings and a ready provider.
    pub fn from_settings(provider: Arc<dyn SummaryProvider>, settings: &Settings) -> Self {
        let summarizer = ChunkSummarizer::new(provider).with_options(settings.summary);
        Self::new(summarizer, &settings.chunking)
    }

    /// Whether a run is currently in progress on this instance.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Summarize `pages` in order, reporting to `sink`.
    ///
    /// Cancellation is checked before every page and every chunk. A cancelled
    /// run emits `RunCancelled` instead of `RunCompleted` and returns the
    /// sections finished so far; a page interrupted mid-way is dropped.
    pub async fn run(
        &self,
        pages: &[String],
        sink: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<RunOutcome, PipelineError> {
        let _guard = RunGuard::acquire(&self.running)?;

        let mut summary = DocumentSummary::new();
        let mut report = RunReport {
            total_pages: pages.len(),
            ..Default::default()
        };
        let mut progress = ProgressCounter::new(pages.len());

        tracing::info!(pages = pages.len(), "Summarization run started");

        for (i, raw_text) in pages.iter().enumerate() {
            let page = i + 1;

            if cancel.is_cancelled() {
                return Ok(cancelled(summary, report, sink));
            }

            match self
                .aggregator
                .summarize_page(page, raw_text, sink, cancel)
                .await
            {
                Ok(PageOutcome::Summarized(page_summary)) => {
                    report.summarized_pages += 1;
                    report.chunk_errors += page_summary.failed_chunks;
                    summary.push_page(&page_summary);
                    sink.on_event(ProgressEvent::PageSummarized {
                        page,
                        summary: page_summary.text,
                    });
                }
                Ok(PageOutcome::Skipped) => {
                    report.skipped_pages += 1;
                }
                Ok(PageOutcome::Failed { failed_chunks }) => {
                    tracing::warn!(page, failed_chunks, "No chunk of the page could be summarized");
                    report.failed_pages += 1;
                    report.chunk_errors += failed_chunks;
                }
                Ok(PageOutcome::Interrupted) => {
                    return Ok(cancelled(summary, report, sink));
                }
                Err(e) => {
                    tracing::warn!(page, error = %e, "Page processing failed");
                    report.failed_pages += 1;
                    sink.on_event(ProgressEvent::PageError {
                        page,
                        chunk: None,
                        message: e.to_string(),
                    });
                }
            }

            sink.on_event(ProgressEvent::Progress {
                percent: progress.advance(),
            });
        }

        if progress.percent() < 100 {
            sink.on_event(ProgressEvent::Progress {
                percent: progress.finish(),
            });
        }
        sink.on_event(ProgressEvent::RunCompleted);

        tracing::info!(
            summarized = report.summarized_pages,
            skipped = report.skipped_pages,
            failed = report.failed_pages,
            chunk_errors = report.chunk_errors,
            "Summarization run completed"
        );

        Ok(RunOutcome {
            summary,
            status: RunStatus::Completed,
            report,
        })
    }
}

fn cancelled(summary: DocumentSummary, report: RunReport, sink: &dyn ProgressSink) -> RunOutcome {
    tracing::info!(
        summarized = report.summarized_pages,
        "Summarization run cancelled"
    );
    sink.on_event(ProgressEvent::RunCancelled);
    RunOutcome {
        summary,
        status: RunStatus::Cancelled,
        report,
    }
}

/// Holds the running flag for the duration of one run.
struct RunGuard<'a>(&'a AtomicBool);

impl<'a> RunGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, PipelineError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| PipelineError::AlreadyRunning)?;
        Ok(Self(flag))
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
