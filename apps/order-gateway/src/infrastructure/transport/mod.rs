//! Outbound transport adapters implementing [`OutboundSender`].
//!
//! [`OutboundSender`]: crate::application::ports::OutboundSender

mod channel_sender;
mod recording_sender;

pub use channel_sender::{ChannelSender, DEFAULT_CAPACITY, OutboundMessage};
pub use recording_sender::RecordingSender;
