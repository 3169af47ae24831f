//! Order lifecycle errors.
//!
//! The `Display` text of each [`LifecycleError`] is the message returned
//! to the counterparty, so it stays fixed; the detail lives in the fields.

use super::order::ValidationFailure;
use super::value_objects::OrderStatus;
use crate::domain::shared::ClOrdId;

/// Coarse classification of a lifecycle failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Request content failed a business rule.
    Validation,
    /// Referenced order does not exist.
    NotFound,
    /// Referenced order is not in an actionable status.
    State,
}

/// Errors returned inside a failed `OrderResult`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    /// New order failed validation.
    #[error("Invalid order")]
    InvalidOrder {
        /// Rule that failed.
        reason: ValidationFailure,
    },

    /// Replacement terms failed validation.
    #[error("Invalid replace request")]
    InvalidReplace {
        /// Rule that failed.
        reason: ValidationFailure,
    },

    /// ClOrdID already bound to an order.
    #[error("Duplicate ClOrdID")]
    DuplicateClOrdId {
        /// Offending ClOrdID.
        cl_ord_id: ClOrdId,
    },

    /// OrigClOrdID does not resolve.
    #[error("Original order not found")]
    OriginalNotFound {
        /// Requested OrigClOrdID.
        orig_cl_ord_id: ClOrdId,
    },

    /// Cancel of an order that is no longer NEW.
    #[error("Order cannot be cancelled in current status")]
    CannotCancel {
        /// Status found.
        status: OrderStatus,
    },

    /// Replace of an order that is no longer NEW.
    #[error("Order cannot be modified in current status")]
    CannotModify {
        /// Status found.
        status: OrderStatus,
    },
}

impl LifecycleError {
    /// Classify the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidOrder { .. }
            | Self::InvalidReplace { .. }
            | Self::DuplicateClOrdId { .. } => ErrorKind::Validation,
            Self::OriginalNotFound { .. } => ErrorKind::NotFound,
            Self::CannotCancel { .. } | Self::CannotModify { .. } => ErrorKind::State,
        }
    }
}
