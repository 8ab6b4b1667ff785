//! Background summary jobs.
//!
//! The pipeline itself never spawns. A front end that must stay responsive
//! runs it through [`SummaryJob`], which owns a tokio task and forwards
//! progress over a channel.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::PipelineError;
use crate::pipeline::{ChannelSink, DocumentPipeline, ProgressEvent, RunOutcome};

/// A pipeline run on its own task.
///
/// The event channel closes once the run has emitted its terminal event.
pub struct SummaryJob {
    events: mpsc::UnboundedReceiver<ProgressEvent>,
    cancel: CancellationToken,
    handle: JoinHandle<Result<RunOutcome, PipelineError>>,
}

impl SummaryJob {
    /// Spawn a run over `pages` with a fresh cancellation token.
    pub fn spawn(pipeline: Arc<DocumentPipeline>, pages: Vec<String>) -> Self {
        Self::spawn_with_cancel(pipeline, pages, CancellationToken::new())
    }

    /// Spawn a run that stops when `cancel` (or a parent of it) is cancelled.
    pub fn spawn_with_cancel(
        pipeline: Arc<DocumentPipeline>,
        pages: Vec<String>,
        cancel: CancellationToken,
    ) -> Self {
        let (sink, events) = ChannelSink::new();
        let task_cancel = cancel.clone();

        let handle = tokio::spawn(async move {
            tracing::debug!(pages = pages.len(), "Summary job started");
            pipeline.run(&pages, &sink, &task_cancel).await
        });

        Self {
            events,
            cancel,
            handle,
        }
    }

    /// Next progress event, or `None` once the run has finished.
    pub async fn next_event(&mut self) -> Option<ProgressEvent> {
        self.events.recv().await
    }

    /// Request a cooperative stop at the next page or chunk boundary.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Wait for the run to end and take its outcome.
    pub async fn finish(self) -> Result<RunOutcome, PipelineError> {
        self.handle
            .await
            .map_err(|e| PipelineError::Join(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::Notify;

    use super::*;
    use crate::config::Settings;
    use crate::pipeline::RunStatus;
    use crate::test_support::{page_text, StubProvider};

    fn pipeline(provider: Arc<StubProvider>) -> Arc<DocumentPipeline> {
        Arc::new(DocumentPipeline::from_settings(provider, &Settings::default()))
    }

    #[tokio::test]
    async fn test_job_streams_events_then_finishes() {
        let provider = Arc::new(StubProvider::new());
        let pages = vec![page_text(300, 'a'), page_text(40, 'b')];
        let mut job = SummaryJob::spawn(pipeline(provider), pages);

        let mut events = Vec::new();
        while let Some(event) = job.next_event().await {
            events.push(event);
        }
        let outcome = job.finish().await.unwrap();

        assert_eq!(events.first(), Some(&ProgressEvent::PageStarted {
            page: 1,
            chunk_count: 1
        }));
        assert_eq!(events.last(), Some(&ProgressEvent::RunCompleted));
        assert_eq!(outcome.status, RunStatus::Completed);
        assert_eq!(outcome.summary.pages(), &[1]);
    }

    #[tokio::test]
    async fn test_job_cancel() {
        let gate = Arc::new(Notify::new());
        let provider = Arc::new(StubProvider::gated(gate.clone()));
        let pages = vec![page_text(300, 'a'), page_text(300, 'b'), page_text(300, 'c')];
        let mut job = SummaryJob::spawn(pipeline(provider), pages);

        // Page 1 has started and is blocked on its only chunk
        assert!(matches!(
            job.next_event().await,
            Some(ProgressEvent::PageStarted { page: 1, .. })
        ));
        job.cancel();
        gate.notify_one();

        let mut last = None;
        while let Some(event) = job.next_event().await {
            last = Some(event);
        }
        let outcome = job.finish().await.unwrap();

        assert_eq!(last, Some(ProgressEvent::RunCancelled));
        assert_eq!(outcome.status, RunStatus::Cancelled);
        assert_eq!(outcome.summary.pages(), &[1]);
    }
}
