//! Paragraph-aware chunking of page text.
//!
//! Paragraphs are separated by two or more consecutive newlines. They are
//! packed greedily into chunks joined by a blank line, so a chunk always
//! ends on a paragraph boundary. A paragraph that alone exceeds the limit is
//! emitted as its own oversized chunk; the summarizer truncates it later.

/// Separator placed between paragraphs inside a chunk.
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Default maximum chunk size in characters.
pub const DEFAULT_MAX_CHUNK_CHARS: usize = 1000;

/// Split text into trimmed, non-empty paragraphs.
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'\n' {
            i += 1;
            continue;
        }
        let run_start = i;
        while i < bytes.len() && bytes[i] == b'\n' {
            i += 1;
        }
        if i - run_start >= 2 {
            pieces.push(&text[start..run_start]);
            start = i;
        }
    }
    pieces.push(&text[start..]);

    pieces
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Split page text into ordered chunks of at most `max_chunk_chars` characters.
///
/// A paragraph is appended to the running chunk while the chunk length plus
/// the paragraph length stays strictly below the limit. Lengths are counted
/// in chars, not bytes.
pub fn split_into_chunks(text: &str, max_chunk_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for paragraph in split_paragraphs(text) {
        let paragraph_len = paragraph.chars().count();

        if current_len + paragraph_len >= max_chunk_chars && current_len > 0 {
            chunks.push(current.trim().to_string());
            current.clear();
            current_len = 0;
        }

        current.push_str(paragraph);
        current.push_str(PARAGRAPH_SEPARATOR);
        current_len += paragraph_len + PARAGRAPH_SEPARATOR.len();
    }

    if current_len > 0 {
        chunks.push(current.trim().to_string());
    }

    chunks
}
