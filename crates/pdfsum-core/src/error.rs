//! Error types for the summarization pipeline.
//!
//! Only [`ExtractionError`] and [`PipelineError`] ever reach the caller of a
//! run. Chunk and page failures are caught at their own boundary and turned
//! into `PageError` progress events.

use std::path::PathBuf;

use thiserror::Error;

/// The document could not be turned into page text.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Failed to read PDF file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse PDF: {0}")]
    Parse(String),

    #[error("PDF contains no pages")]
    NoPages,

    #[error("Extraction task failed: {0}")]
    Task(String),
}

/// The summarization capability failed for one chunk.
#[derive(Debug, Error)]
#[error("Summarization failed on page {page}, chunk {chunk}: {message}")]
pub struct SummarizationError {
    /// 1-based page index
    pub page: usize,
    /// 1-based chunk index within the page
    pub chunk: usize,
    pub message: String,
}

/// A page could not be aggregated at all.
#[derive(Debug, Error)]
pub enum PageProcessingError {
    #[error("Page {page} contains malformed text ({nul_count} NUL characters)")]
    MalformedText { page: usize, nul_count: usize },
}

/// Errors that prevent a run from starting.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("A summarization run is already in progress on this pipeline")]
    AlreadyRunning,

    #[error("Summary job task failed: {0}")]
    Join(String),
}

/// Errors from persisting a finished summary.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("There's no summary to save")]
    Empty,

    #[error("Failed to write summary to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
