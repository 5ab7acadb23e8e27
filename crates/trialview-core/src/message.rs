//! Transient status message with a single restartable hide timer.

use std::rc::Rc;
use std::time::Duration;

use crate::scheduler::{Scheduler, TaskHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

impl MessageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::Success => "success",
            MessageKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: MessageKind,
    pub text: String,
}

impl StatusMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            text: text.into(),
        }
    }
}

/// Receives the message to display, or `None` to hide it.
pub type MessageSink = Rc<dyn Fn(Option<StatusMessage>)>;

/// Shows a message and hides it again after `timeout`.
///
/// Showing a new message cancels the pending hide of the previous one, so the
/// message always stays up for the full timeout after the latest `show`.
/// Dropping this value cancels any pending hide.
pub struct TransientMessage<S: Scheduler> {
    scheduler: S,
    timeout: Duration,
    sink: MessageSink,
    pending: Option<S::Handle>,
}

impl<S: Scheduler> TransientMessage<S> {
    pub fn new(scheduler: S, timeout: Duration, sink: impl Fn(Option<StatusMessage>) + 'static) -> Self {
        Self {
            scheduler,
            timeout,
            sink: Rc::new(sink),
            pending: None,
        }
    }

    pub fn show(&mut self, message: StatusMessage) {
        self.cancel_pending();
        (self.sink)(Some(message));
        let sink = Rc::clone(&self.sink);
        let handle = self
            .scheduler
            .schedule(self.timeout, Box::new(move || sink(None)));
        self.pending = Some(handle);
    }

    /// Hide immediately.
    pub fn dismiss(&mut self) {
        self.cancel_pending();
        (self.sink)(None);
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.cancel();
        }
    }
}
