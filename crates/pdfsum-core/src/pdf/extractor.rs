use std::path::Path;

use crate::error::ExtractionError;

/// Source of per-page document text.
///
/// Implementations return one entry per page in physical page order.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<Vec<String>, ExtractionError>;
}

/// Page text extraction backed by lopdf.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfExtractor;

impl TextExtractor for LopdfExtractor {
    fn extract(&self, path: &Path) -> Result<Vec<String>, ExtractionError> {
        extract_pages(path)
    }
}

/// Extract the text of every page of a PDF file
pub fn extract_pages(path: &Path) -> Result<Vec<String>, ExtractionError> {
    let pdf_bytes = std::fs::read(path).map_err(|source| ExtractionError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    extract_pages_from_bytes(&pdf_bytes)
}

/// Extract the text of every page from PDF bytes already in memory
pub fn extract_pages_from_bytes(pdf_bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
    let doc =
        lopdf::Document::load_mem(pdf_bytes).map_err(|e| ExtractionError::Parse(e.to_string()))?;

    // BTreeMap keyed by page number, so iteration is already in page order
    let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    if page_numbers.is_empty() {
        return Err(ExtractionError::NoPages);
    }

    let mut pages = Vec::with_capacity(page_numbers.len());
    for page_num in page_numbers {
        let text = match doc.extract_text(&[page_num]) {
            Ok(text) => text,
            Err(e) => {
                // Keep the slot so page numbering stays aligned; an empty
                // page is skipped by the pipeline.
                tracing::warn!(page = page_num, error = %e, "Failed to extract page text");
                String::new()
            }
        };
        pages.push(text);
    }

    tracing::debug!(
        pages = pages.len(),
        chars = pages.iter().map(|p| p.len()).sum::<usize>(),
        "Extracted page text"
    );

    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::create_pdf;

    #[test]
    fn test_extract_single_page() {
        let temp_dir = tempfile::tempdir().unwrap();
        let pdf_path = temp_dir.path().join("single.pdf");
        std::fs::write(&pdf_path, create_pdf(&["Hello World"])).unwrap();

        let pages = extract_pages(&pdf_path).unwrap();

        assert_eq!(pages.len(), 1);
        assert!(
            pages[0].contains("Hello") || pages[0].contains("World"),
            "Expected page text to contain 'Hello' or 'World', got: '{}'",
            pages[0]
        );
    }

    #[test]
    fn test_extract_keeps_page_order() {
        let bytes = create_pdf(&["Alpha page", "Bravo page", "Charlie page"]);

        let pages = extract_pages_from_bytes(&bytes).unwrap();

        assert_eq!(pages.len(), 3);
        assert!(pages[0].contains("Alpha"));
        assert!(pages[1].contains("Bravo"));
        assert!(pages[2].contains("Charlie"));
    }

    #[test]
    fn test_extract_file_not_found() {
        let err = extract_pages(Path::new("/nonexistent/path/to/file.pdf")).unwrap_err();

        assert!(matches!(err, ExtractionError::Read { .. }));
        assert!(
            err.to_string().contains("Failed to read PDF file"),
            "Expected read error, got: {}",
            err
        );
    }

    #[test]
    fn test_extract_not_a_pdf() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("notes.pdf");
        std::fs::write(&path, b"this is not a valid pdf file").unwrap();

        let err = LopdfExtractor.extract(&path).unwrap_err();

        assert!(matches!(err, ExtractionError::Parse(_)));
    }

    #[test]
    fn test_extract_empty_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("empty.pdf");
        std::fs::File::create(&path).unwrap();

        let err = extract_pages(&path).unwrap_err();

        assert!(err.to_string().contains("Failed to parse PDF"));
    }
}
