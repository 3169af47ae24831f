//! Recording Sender Adapter
//!
//! In-memory [`OutboundSender`] that keeps every message it is given.
//! Used by tests and by development setups without a transport.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::application::ports::{OutboundSender, SendError};
use crate::fix::{FixMessage, SessionId};

/// Records outbound messages. Can be switched to fail every send.
#[derive(Debug, Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<(SessionId, FixMessage)>>,
    failing: AtomicBool,
}

impl RecordingSender {
    /// Create an empty recorder that accepts every send.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent sends fail (messages are still recorded).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }

    /// All recorded messages, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<FixMessage> {
        self.sent.lock().iter().map(|(_, m)| m.clone()).collect()
    }

    /// Recorded messages of one MsgType.
    #[must_use]
    pub fn messages_of_type(&self, msg_type: &str) -> Vec<FixMessage> {
        self.sent
            .lock()
            .iter()
            .filter(|(_, m)| m.msg_type() == msg_type)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// Recorded (session, message) pairs.
    #[must_use]
    pub fn sent(&self) -> Vec<(SessionId, FixMessage)> {
        self.sent.lock().clone()
    }

    /// Remove and return everything recorded so far.
    pub fn take(&self) -> Vec<FixMessage> {
        std::mem::take(&mut *self.sent.lock())
            .into_iter()
            .map(|(_, m)| m)
            .collect()
    }

    /// Number of recorded messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sent.lock().len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sent.lock().is_empty()
    }
}

impl OutboundSender for RecordingSender {
    fn send(&self, session: &SessionId, message: FixMessage) -> Result<(), SendError> {
        self.sent.lock().push((session.clone(), message));
        if self.failing.load(Ordering::Relaxed) {
            return Err(SendError::Failed {
                message: "recording sender set to fail".to_string(),
            });
        }
        Ok(())
    }
}
