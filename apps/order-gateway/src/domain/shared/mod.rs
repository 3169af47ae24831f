//! Shared Domain Types
//!
//! Identifiers used across the order lifecycle and the wire translator.

mod identifiers;

pub use identifiers::{ClOrdId, ExecId, IdSequence, OrderId};
