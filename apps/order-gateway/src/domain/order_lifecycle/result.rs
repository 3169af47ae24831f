//! Outcome of a lifecycle operation.

use super::errors::LifecycleError;
use super::order::Order;
use crate::domain::shared::{ExecId, OrderId};

/// Result of processing a New, Cancel or Replace request.
///
/// On success `order_id` and `exec_id` are set and `order` is the stored
/// order after the operation. On failure both ids are `None`, `order` echoes
/// the request unchanged and `error` holds the structured cause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderResult {
    /// Whether the request was accepted.
    pub success: bool,
    /// Order ID of the affected order.
    pub order_id: Option<OrderId>,
    /// Execution ID minted for this operation.
    pub exec_id: Option<ExecId>,
    /// Human-readable outcome, sent to the counterparty on failure.
    pub message: String,
    /// Updated order on success, request echo on failure.
    pub order: Order,
    /// Failure cause.
    pub error: Option<LifecycleError>,
}

impl OrderResult {
    /// Successful outcome.
    #[must_use]
    pub fn accepted(order: Order, exec_id: ExecId, message: impl Into<String>) -> Self {
        Self {
            success: true,
            order_id: Some(order.order_id.clone()),
            exec_id: Some(exec_id),
            message: message.into(),
            order,
            error: None,
        }
    }

    /// Failed outcome echoing the request.
    #[must_use]
    pub fn rejected(request: Order, error: LifecycleError) -> Self {
        Self {
            success: false,
            order_id: None,
            exec_id: None,
            message: error.to_string(),
            order: request,
            error: Some(error),
        }
    }
}
