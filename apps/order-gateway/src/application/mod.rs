//! Application Layer
//!
//! Coordinates the domain with the transport through ports.
//!
//! - [`ports`]: Driven port for sending FIX messages
//! - [`services`]: Session orchestration and margin broadcasting

pub mod ports;
pub mod services;
