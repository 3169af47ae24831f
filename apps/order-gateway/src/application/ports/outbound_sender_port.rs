//! Outbound Sender Port (Driven Port)
//!
//! "Send this message on this session." The transport behind it owns
//! sequencing and framing; callers only learn whether the hand-off worked.

use crate::fix::{FixMessage, SessionId};

/// Outbound send failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SendError {
    /// The session is not logged on.
    #[error("session not connected: {session}")]
    NotConnected {
        /// Target session.
        session: String,
    },

    /// The transport refused or dropped the message.
    #[error("send failed: {message}")]
    Failed {
        /// Transport detail.
        message: String,
    },
}

/// Port for sending application messages to a counterparty.
///
/// Called from request-handling threads and from the margin broadcaster
/// thread; implementations must not block for long.
pub trait OutboundSender: Send + Sync {
    /// Hand `message` to the transport for `session`.
    ///
    /// # Errors
    ///
    /// Returns [`SendError`] if the transport did not accept the message.
    fn send(&self, session: &SessionId, message: FixMessage) -> Result<(), SendError>;
}

impl<S: OutboundSender + ?Sized> OutboundSender for std::sync::Arc<S> {
    fn send(&self, session: &SessionId, message: FixMessage) -> Result<(), SendError> {
        (**self).send(session, message)
    }
}
