//! Transient toast notifications.
//!
//! Notices are queued onto a worker that shows each one, waits out its
//! display duration, then dismisses it. The duration is a display
//! concern only; it puts no bound on any in-flight request.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::sleep;

use crate::messages::{NoticeEvent, UiBridge};

const QUEUE_CAPACITY: usize = 100;
/// Gap between consecutive toasts so they read as separate events.
const GAP_MS: u64 = 200;

#[derive(Debug)]
struct Notice {
    message: String,
    error: bool,
}

/// Clonable handle feeding the notice worker.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::Sender<Notice>,
}

impl Notifier {
    /// Spawn the worker and return its handle.
    pub fn start(bridge: UiBridge, duration: Duration) -> Self {
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        tokio::spawn(worker_loop(bridge, rx, duration));
        Self { tx }
    }

    /// Queue a notice for display.
    pub fn enqueue(&self, message: impl Into<String>, error: bool) {
        let notice = Notice {
            message: message.into(),
            error,
        };
        if let Err(e) = self.tx.try_send(notice) {
            tracing::warn!("Notice queue full or closed: {e}");
        }
    }
}

/// Worker loop: show, hold, dismiss, one notice at a time.
async fn worker_loop(bridge: UiBridge, mut rx: mpsc::Receiver<Notice>, duration: Duration) {
    while let Some(notice) = rx.recv().await {
        let id = nanoid::nanoid!();
        bridge.notice(NoticeEvent::Show {
            id: id.clone(),
            message: notice.message,
            error: notice.error,
        });
        sleep(duration).await;
        bridge.notice(NoticeEvent::Dismiss { id });
        sleep(Duration::from_millis(GAP_MS)).await;
    }
    tracing::info!("Notice worker stopped");
}
