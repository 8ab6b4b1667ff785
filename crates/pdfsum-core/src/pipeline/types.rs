//! Pipeline types and progress events.

use std::path::Path;

use serde::Serialize;

use crate::error::SaveError;

/// Progress event delivered to a [`ProgressSink`](super::ProgressSink).
///
/// Events arrive in ascending page order. For a given page, `PageStarted`
/// always precedes its `PageError` and `PageSummarized` events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// A page passed the length check and was split into chunks
    PageStarted { page: usize, chunk_count: usize },
    /// A page produced a summary section
    PageSummarized { page: usize, summary: String },
    /// A chunk (`chunk` set) or the whole page (`chunk` unset) failed
    PageError {
        page: usize,
        chunk: Option<usize>,
        message: String,
    },
    /// Completion percentage after a page was processed
    Progress { percent: u8 },
    /// All pages were processed
    RunCompleted,
    /// The run stopped early on request
    RunCancelled,
}

/// Summary of one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSummary {
    /// 1-based page index
    pub page: usize,
    /// Chunk summaries in chunk order, each followed by a blank line
    pub text: String,
    pub summarized_chunks: usize,
    pub skipped_chunks: usize,
    pub failed_chunks: usize,
}

/// Result of aggregating a single page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Page summary, possibly partial if some chunks failed
    Summarized(PageSummary),
    /// Page text below the minimum content length
    Skipped,
    /// Every attempted chunk failed; the page contributes no section
    Failed { failed_chunks: usize },
    /// Cancellation was observed between chunks
    Interrupted,
}

/// Ordered concatenation of page summary sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSummary {
    text: String,
    pages: Vec<usize>,
}

impl DocumentSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one page section in the canonical `Page N Summary:` format.
    pub(crate) fn push_page(&mut self, summary: &PageSummary) {
        self.text.push_str(&format!(
            "Page {} Summary:\n{}\n\n",
            summary.page, summary.text
        ));
        self.pages.push(summary.page);
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// Page indices that contributed a section, in order
    pub fn pages(&self) -> &[usize] {
        &self.pages
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Write the summary verbatim as UTF-8 plain text.
    pub fn save_to(&self, path: &Path) -> Result<(), SaveError> {
        if self.is_empty() {
            return Err(SaveError::Empty);
        }
        std::fs::write(path, self.text.as_bytes()).map_err(|source| SaveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), bytes = self.text.len(), "Saved summary");
        Ok(())
    }
}

impl std::fmt::Display for DocumentSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Completed,
    Cancelled,
}

/// Per-run page counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub total_pages: usize,
    pub summarized_pages: usize,
    pub skipped_pages: usize,
    pub failed_pages: usize,
    pub chunk_errors: usize,
}

/// Everything a run hands back to its caller.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub summary: DocumentSummary,
    pub status: RunStatus,
    pub report: RunReport,
}
