// User-facing failure notifications.
//
// The pipeline calls `Notifier::notify_error` exactly once per failed
// request. Implementations must return immediately: the call is never
// awaited and has no way to change the error handed back to the caller.

use tokio::sync::mpsc;
use tracing::warn;

/// Side channel for transient "toast"-style failure messages.
pub trait Notifier: Send + Sync {
    fn notify_error(&self, message: &str);
}

/// Default notifier: emits the message as a `warn!` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify_error(&self, message: &str) {
        warn!(notification = message, "request failed");
    }
}

/// A notification pushed through [`ChannelNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
}

/// Forwards notifications to an unbounded channel for a UI task to drain.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify_error(&self, message: &str) {
        // Nobody listening is not an error for the request.
        let _ = self.tx.send(Notification {
            message: message.to_owned(),
        });
    }
}
