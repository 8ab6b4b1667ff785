//! pdfsum core - page-by-page PDF summarization
//!
//! This crate contains everything except the presentation layer:
//! - PDF page text extraction (lopdf)
//! - Paragraph-aware chunking
//! - Summarization providers (Hugging Face Inference API, OpenAI-compatible)
//! - The sequential summarization pipeline and its progress events
//! - Background summary jobs for responsive front ends

pub mod chunker;
pub mod config;
pub mod error;
pub mod jobs;
pub mod pdf;
pub mod pipeline;
pub mod summarizer;

#[cfg(test)]
pub(crate) mod test_support;

use std::path::Path;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

pub use config::{ChunkingSettings, Config, Settings};
pub use error::{ExtractionError, PageProcessingError, PipelineError, SaveError, SummarizationError};
pub use jobs::SummaryJob;
pub use pdf::{LopdfExtractor, TextExtractor};
pub use pipeline::{
    ChannelSink, DocumentPipeline, DocumentSummary, NoOpSink, ProgressEvent, ProgressSink,
    RunOutcome, RunReport, RunStatus,
};
pub use summarizer::{ChunkSummarizer, ProviderConfig, SummaryOptions, SummaryProvider};

/// Errors from [`summarize_pdf`].
#[derive(Debug, thiserror::Error)]
pub enum SummarizePdfError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// Extract a PDF and summarize it.
///
/// Extraction runs to completion first; an unreadable document fails here
/// and the pipeline is never started.
pub async fn summarize_pdf(
    path: &Path,
    extractor: Arc<dyn TextExtractor>,
    pipeline: &DocumentPipeline,
    sink: &dyn ProgressSink,
    cancel: &CancellationToken,
) -> Result<RunOutcome, SummarizePdfError> {
    let pages = pdf::extract_pages_blocking(extractor, path.to_path_buf()).await?;
    tracing::info!(path = %path.display(), pages = pages.len(), "Extracted document");
    Ok(pipeline.run(&pages, sink, cancel).await?)
}
