//! Terminal rendering of pipeline progress events.

use pdfsum_core::ProgressEvent;

/// Render one event as a line (or block) of terminal output.
pub fn render_event(event: &ProgressEvent) -> String {
    match event {
        ProgressEvent::PageStarted { page, chunk_count } => {
            format!("Summarizing page {} with {} chunk(s)...", page, chunk_count)
        }
        ProgressEvent::PageSummarized { page, summary } => {
            format!("Summary of page {}:\n{}", page, summary.trim_end())
        }
        ProgressEvent::PageError {
            page,
            chunk: Some(chunk),
            message,
        } => format!("Error on page {}, chunk {}: {}", page, chunk, message),
        ProgressEvent::PageError {
            page,
            chunk: None,
            message,
        } => format!("Error on page {}: {}", page, message),
        ProgressEvent::Progress { percent } => format!("[{}] {:>3}%", progress_bar(*percent), percent),
        ProgressEvent::RunCompleted => "Done summarizing.".to_string(),
        ProgressEvent::RunCancelled => "Summarization cancelled.".to_string(),
    }
}

/// Render one event as a JSON line.
pub fn render_event_json(event: &ProgressEvent) -> String {
    serde_json::to_string(event).unwrap_or_else(|e| format!(r#"{{"event":"invalid","error":"{}"}}"#, e))
}

const BAR_WIDTH: usize = 20;

fn progress_bar(percent: u8) -> String {
    let filled = (percent.min(100) as usize * BAR_WIDTH) / 100;
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_page_started() {
        let line = render_event(&ProgressEvent::PageStarted {
            page: 4,
            chunk_count: 2,
        });
        assert_eq!(line, "Summarizing page 4 with 2 chunk(s)...");
    }

    #[test]
    fn test_render_summary_trims_trailing_blank_lines() {
        let line = render_event(&ProgressEvent::PageSummarized {
            page: 1,
            summary: "First.\n\nSecond.\n\n".to_string(),
        });
        assert_eq!(line, "Summary of page 1:\nFirst.\n\nSecond.");
    }

    #[test]
    fn test_render_errors() {
        let chunk_error = render_event(&ProgressEvent::PageError {
            page: 2,
            chunk: Some(1),
            message: "timeout".to_string(),
        });
        assert_eq!(chunk_error, "Error on page 2, chunk 1: timeout");

        let page_error = render_event(&ProgressEvent::PageError {
            page: 3,
            chunk: None,
            message: "malformed".to_string(),
        });
        assert_eq!(page_error, "Error on page 3: malformed");
    }

    #[test]
    fn test_render_progress_bar() {
        assert_eq!(
            render_event(&ProgressEvent::Progress { percent: 50 }),
            "[##########..........]  50%"
        );
        assert_eq!(
            render_event(&ProgressEvent::Progress { percent: 100 }),
            "[####################] 100%"
        );
    }

    #[test]
    fn test_render_json() {
        let line = render_event_json(&ProgressEvent::RunCompleted);
        assert_eq!(line, r#"{"event":"run_completed"}"#);
    }
}
