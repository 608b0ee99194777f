use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::core::traits::sink::{EventSink, NoticeLevel, RunEvent};

/// Forwards events into a channel so another task (a UI bridge, a test)
/// can consume them as they happen.
#[derive(Clone, Debug)]
pub struct ChannelSink {
    tx: UnboundedSender<RunEvent>,
}

impl ChannelSink {
    pub fn new() -> (Self, UnboundedReceiver<RunEvent>) {
        let (tx, rx) = unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn stream() -> (Self, UnboundedReceiverStream<RunEvent>) {
        let (sink, rx) = Self::new();
        (sink, UnboundedReceiverStream::new(rx))
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: RunEvent) {
        if self.tx.send(event).is_err() {
            tracing::warn!("Event receiver dropped, discarding event");
        }
    }
}

/// Writes events to the log.
#[derive(Clone, Debug, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: RunEvent) {
        match event {
            RunEvent::Progress {
                scope,
                running,
                current_index,
            } => tracing::debug!(?scope, running, ?current_index, "progress"),
            RunEvent::Result { result, .. } => tracing::info!(
                "#{} {} ({}ms)",
                result.index,
                result.verdict,
                result.duration_ms
            ),
            RunEvent::Complete { summary, .. } => tracing::info!(
                total = summary.total,
                passed = summary.passed,
                wrong_answers = summary.wrong_answers,
                timeouts = summary.timeouts,
                runtime_errors = summary.runtime_errors,
                duration_ms = summary.duration_ms,
                "run complete"
            ),
            RunEvent::Notice { level, message } => match level {
                NoticeLevel::Info => tracing::info!("{}", message),
                NoticeLevel::Warn => tracing::warn!("{}", message),
                NoticeLevel::Error => tracing::error!("{}", message),
            },
        }
    }
}
