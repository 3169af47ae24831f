//! FIX Protocol Model
//!
//! Tag/value messages, session identities and the translator between
//! FIX requests/reports and the order lifecycle domain. Session-level
//! concerns (sequencing, heartbeats, framing) belong to the transport.

pub mod message;
pub mod tags;
pub mod translator;

pub use message::{FixMessage, FixParseError, SessionId};
pub use translator::{InboundRequest, RequestKind, TranslationError, decode_request};
