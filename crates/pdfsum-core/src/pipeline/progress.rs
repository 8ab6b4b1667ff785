//! Progress reporting for a summarization run.

use std::sync::Arc;

use tokio::sync::mpsc;

use super::types::ProgressEvent;

/// Receives progress events from a running pipeline.
///
/// Called synchronously from the pipeline task, so implementations must
/// return quickly. Anything slow should buffer (see [`ChannelSink`]).
pub trait ProgressSink: Send + Sync {
    fn on_event(&self, event: ProgressEvent);
}

impl<S: ProgressSink + ?Sized> ProgressSink for Arc<S> {
    fn on_event(&self, event: ProgressEvent) {
        (**self).on_event(event)
    }
}

/// Discards every event
pub struct NoOpSink;

impl ProgressSink for NoOpSink {
    fn on_event(&self, _event: ProgressEvent) {}
}

/// Forwards events over an unbounded channel, never blocking the pipeline.
#[derive(Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<ProgressEvent>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ProgressSink for ChannelSink {
    fn on_event(&self, event: ProgressEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("Progress receiver dropped, event discarded");
        }
    }
}

/// Converts processed-page counts into a non-decreasing percentage.
#[derive(Debug)]
pub(crate) struct ProgressCounter {
    total: usize,
    processed: usize,
    percent: u8,
}

impl ProgressCounter {
    pub(crate) fn new(total: usize) -> Self {
        Self {
            total,
            processed: 0,
            percent: 0,
        }
    }

    /// Record one more processed page and return the new percentage.
    pub(crate) fn advance(&mut self) -> u8 {
        self.processed += 1;
        let percent = if self.total == 0 {
            100
        } else {
            (self.processed as f64 / self.total as f64 * 100.0).round() as u8
        };
        self.percent = self.percent.max(percent.min(100));
        self.percent
    }

    /// Force the percentage to 100 at the end of a run.
    pub(crate) fn finish(&mut self) -> u8 {
        self.percent = 100;
        self.percent
    }

    pub(crate) fn percent(&self) -> u8 {
        self.percent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_rounds() {
        let mut counter = ProgressCounter::new(3);
        assert_eq!(counter.advance(), 33);
        assert_eq!(counter.advance(), 67);
        assert_eq!(counter.advance(), 100);
    }

    #[test]
    fn test_counter_is_monotone_and_capped() {
        let mut counter = ProgressCounter::new(7);
        let mut last = 0;
        for _ in 0..10 {
            let percent = counter.advance();
            assert!(percent >= last);
            assert!(percent <= 100);
            last = percent;
        }
        assert_eq!(counter.finish(), 100);
    }

    #[test]
    fn test_counter_empty_document() {
        let mut counter = ProgressCounter::new(0);
        assert_eq!(counter.percent(), 0);
        assert_eq!(counter.finish(), 100);
    }

    #[tokio::test]
    async fn test_channel_sink_forwards_in_order() {
        let (sink, mut rx) = ChannelSink::new();

        sink.on_event(ProgressEvent::PageStarted {
            page: 1,
            chunk_count: 2,
        });
        sink.on_event(ProgressEvent::RunCompleted);
        drop(sink);

        assert_eq!(
            rx.recv().await,
            Some(ProgressEvent::PageStarted {
                page: 1,
                chunk_count: 2
            })
        );
        assert_eq!(rx.recv().await, Some(ProgressEvent::RunCompleted));
        assert_eq!(rx.recv().await, None);
    }

    #[test]
    fn test_channel_sink_survives_dropped_receiver() {
        let (sink, rx) = ChannelSink::new();
        drop(rx);
        sink.on_event(ProgressEvent::RunCompleted);
    }
}
