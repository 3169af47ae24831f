//! Application Services
//!
//! Long-lived coordinators: the session orchestrator and the margin
//! broadcaster it drives.

mod margin_broadcaster;
mod session_orchestrator;

pub use margin_broadcaster::{
    BroadcastSchedule, BroadcasterError, DEFAULT_INTERVAL, DEFAULT_TICK, MarginBroadcaster,
    MarginCallback,
};
pub use session_orchestrator::{OrchestratorConfig, SessionOrchestrator};
