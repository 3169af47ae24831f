//! Order Lifecycle Bounded Context
//!
//! Accepts, cancels and replaces client orders. Every order lives in one
//! in-memory [`OrderStore`]; the [`OrderLifecycleService`] is the only
//! writer and reports each transition to its status listeners.

mod errors;
mod order;
mod result;
mod service;
mod store;
pub mod value_objects;

pub use errors::{ErrorKind, LifecycleError};
pub use order::{Order, ValidationFailure};
pub use result::OrderResult;
pub use service::{
    DEFAULT_ACCOUNT, LifecycleConfig, OrderLifecycleService, StatusListener,
};
pub use store::{OrderStore, StoreTransitionError};
pub use value_objects::{OrderSide, OrderStatus, OrderType, TimeInForce};
