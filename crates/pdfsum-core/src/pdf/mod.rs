//! PDF text extraction.

mod extractor;

pub use extractor::{extract_pages, extract_pages_from_bytes, LopdfExtractor, TextExtractor};

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::ExtractionError;

/// Run an extractor on the blocking pool.
///
/// PDF parsing is CPU-bound, so it is kept off the async worker threads.
pub async fn extract_pages_blocking(
    extractor: Arc<dyn TextExtractor>,
    path: PathBuf,
) -> Result<Vec<String>, ExtractionError> {
    tokio::task::spawn_blocking(move || extractor.extract(&path))
        .await
        .map_err(|e| ExtractionError::Task(e.to_string()))?
}
