use crate::session::reply::ReplyReady;
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use std::sync::Arc;

/// Callback used to wake the UI thread when background work has produced
/// something for [`crate::session::ChatSession::poll_events`] to apply.
pub type Notifier = Arc<dyn Fn() + Send + Sync>;

pub fn notify(notifier: &Option<Notifier>) {
    if let Some(notifier) = notifier {
        notifier();
    }
}

/// Completed reply timers flowing back to the session
pub struct ReplyChannels {
    pub ready_tx: Sender<ReplyReady>,
    pub ready_rx: Receiver<ReplyReady>,
}

impl ReplyChannels {
    pub fn new() -> Self {
        let (ready_tx, ready_rx) = unbounded();
        Self { ready_tx, ready_rx }
    }
}

impl Default for ReplyChannels {
    fn default() -> Self {
        Self::new()
    }
}

/// Recognized text flowing from a speech provider to the capture.
///
/// A fresh pair is created for every dictation start so nothing from an
/// earlier run can be received by a later one.
pub struct TranscriptChannels {
    pub transcript_tx: Sender<String>,
    pub transcript_rx: Receiver<String>,
}

impl TranscriptChannels {
    pub fn new(buffer_size: usize) -> Self {
        let (transcript_tx, transcript_rx) = bounded(buffer_size);
        Self {
            transcript_tx,
            transcript_rx,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_notify_invokes_callback() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let notifier: Option<Notifier> = Some(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        notify(&notifier);
        notify(&notifier);
        notify(&None);

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_transcript_channel_is_bounded() {
        let channels = TranscriptChannels::new(1);
        assert!(channels.transcript_tx.try_send("a".into()).is_ok());
        assert!(channels.transcript_tx.try_send("b".into()).is_err());
        assert_eq!(channels.transcript_rx.try_recv().ok(), Some("a".to_string()));
    }
}
