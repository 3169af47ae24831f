// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::significant_drop_tightening,
        clippy::needless_collect
    )
)]

//! Order Gateway - FIX Order Lifecycle Core
//!
//! The application layer of a FIX acceptor. A FIX transport owns the
//! socket, sequencing and heartbeats; this crate takes its session
//! callbacks and decides what each request does to the order record.
//!
//! # Architecture (Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: order record and margin signal
//!   - `order_lifecycle`: Order, status machine, store, lifecycle service
//!   - `margin`: synthetic margin snapshots
//!   - `shared`: identifiers and id sequences
//!
//! - **FIX**: tag/value message model and the wire↔domain translator
//!
//! - **Application**: session orchestration
//!   - `ports`: `OutboundSender`
//!   - `services`: `SessionOrchestrator`, `MarginBroadcaster`
//!
//! - **Infrastructure**: sender adapters and the scripted counterparty

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Domain layer - order lifecycle and margin, no transport knowledge.
pub mod domain;

/// FIX message model and translator.
pub mod fix;

/// Application layer - ports and services.
pub mod application;

/// Infrastructure layer - adapters.
pub mod infrastructure;

/// YAML configuration.
pub mod config;

/// Tracing setup.
pub mod telemetry;

pub use application::ports::{OutboundSender, SendError};
pub use application::services::{MarginBroadcaster, OrchestratorConfig, SessionOrchestrator};
pub use domain::order_lifecycle::{
    LifecycleError, Order, OrderLifecycleService, OrderResult, OrderSide, OrderStatus, OrderType,
    TimeInForce,
};
pub use fix::{FixMessage, SessionId};
pub use infrastructure::{ChannelSender, CounterpartySimulator, RecordingSender};
