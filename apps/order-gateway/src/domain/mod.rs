//! Domain Layer
//!
//! Business rules with no transport or runtime dependencies.
//!
//! # Bounded Contexts
//!
//! - [`order_lifecycle`]: New / Cancel / Replace processing over an in-memory store
//! - [`margin`]: Synthetic margin snapshots for the active session
//! - [`shared`]: Identifiers and ID sequences

pub mod margin;
pub mod order_lifecycle;
pub mod shared;
