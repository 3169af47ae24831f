//! Application Ports
//!
//! Driven ports the application uses to reach the outside world.

mod outbound_sender_port;

pub use outbound_sender_port::{OutboundSender, SendError};
