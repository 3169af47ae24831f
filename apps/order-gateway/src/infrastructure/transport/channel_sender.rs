//! Channel Sender Adapter
//!
//! Hands outbound messages to an async consumer (the transport task)
//! through a bounded tokio channel. Sending never blocks: a full queue is
//! reported as a send failure.

use tokio::sync::mpsc;

use crate::application::ports::{OutboundSender, SendError};
use crate::fix::{FixMessage, SessionId};

/// Default outbound queue capacity.
pub const DEFAULT_CAPACITY: usize = 1024;

/// A message queued for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Target session.
    pub session: SessionId,
    /// Message to send.
    pub message: FixMessage,
}

/// [`OutboundSender`] backed by a bounded mpsc channel.
#[derive(Debug, Clone)]
pub struct ChannelSender {
    tx: mpsc::Sender<OutboundMessage>,
}

impl ChannelSender {
    /// Create a sender and the receiver the transport drains.
    #[must_use]
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<OutboundMessage>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }
}

impl OutboundSender for ChannelSender {
    fn send(&self, session: &SessionId, message: FixMessage) -> Result<(), SendError> {
        self.tx
            .try_send(OutboundMessage {
                session: session.clone(),
                message,
            })
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => SendError::Failed {
                    message: "outbound queue full".to_string(),
                },
                mpsc::error::TrySendError::Closed(_) => SendError::NotConnected {
                    session: session.to_string(),
                },
            })
    }
}
