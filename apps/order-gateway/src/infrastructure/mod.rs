//! Infrastructure Layer
//!
//! Adapters behind the application ports, and the scripted counterparty
//! used to exercise a session end to end.

pub mod simulator;
pub mod transport;

pub use simulator::{CounterpartyEvent, CounterpartySimulator, SCRIPT, ScriptStep};
pub use transport::{ChannelSender, OutboundMessage, RecordingSender};
