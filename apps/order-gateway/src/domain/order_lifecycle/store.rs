//! In-memory order store.
//!
//! One store-wide lock guards every order; there is no per-order locking.
//! Lookups return clones so callers never hold a reference into the store.

use parking_lot::Mutex;

use super::order::Order;
use super::value_objects::OrderStatus;
use crate::domain::shared::ClOrdId;

/// Failure of a compare-and-set status transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StoreTransitionError {
    /// No order with the given ClOrdID.
    #[error("order not found")]
    NotFound,
    /// The order's status was not the expected one.
    #[error("status mismatch: found {actual}")]
    StatusMismatch {
        /// Status found in the store.
        actual: OrderStatus,
    },
}

/// Store of all orders, in insertion order.
#[derive(Debug, Default)]
pub struct OrderStore {
    orders: Mutex<Vec<Order>>,
}

impl OrderStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an order. ClOrdID uniqueness is not enforced.
    pub fn insert(&self, order: Order) {
        self.orders.lock().push(order);
    }

    /// Append an order unless its ClOrdID is already bound.
    ///
    /// Returns `false` (and stores nothing) on a duplicate.
    pub fn insert_if_absent(&self, order: Order) -> bool {
        let mut orders = self.orders.lock();
        if orders.iter().any(|o| o.cl_ord_id == order.cl_ord_id) {
            return false;
        }
        orders.push(order);
        true
    }

    /// Find the first order bound to `cl_ord_id`.
    #[must_use]
    pub fn find_by_cl_ord_id(&self, cl_ord_id: &ClOrdId) -> Option<Order> {
        self.orders
            .lock()
            .iter()
            .find(|o| &o.cl_ord_id == cl_ord_id)
            .cloned()
    }

    /// Overwrite the status of the first order bound to `cl_ord_id`.
    ///
    /// Returns `false` if no such order exists.
    pub fn update_status(&self, cl_ord_id: &ClOrdId, status: OrderStatus) -> bool {
        let mut orders = self.orders.lock();
        match orders.iter_mut().find(|o| &o.cl_ord_id == cl_ord_id) {
            Some(order) => {
                order.status = status;
                true
            }
            None => false,
        }
    }

    /// Move an order from `expected` to `to` atomically.
    ///
    /// Returns the updated order. Of two racing transitions from the same
    /// status, exactly one succeeds.
    ///
    /// # Errors
    ///
    /// [`StoreTransitionError::NotFound`] if the order does not exist,
    /// [`StoreTransitionError::StatusMismatch`] if its status is not `expected`.
    pub fn transition_from(
        &self,
        cl_ord_id: &ClOrdId,
        expected: OrderStatus,
        to: OrderStatus,
    ) -> Result<Order, StoreTransitionError> {
        let mut orders = self.orders.lock();
        let order = orders
            .iter_mut()
            .find(|o| &o.cl_ord_id == cl_ord_id)
            .ok_or(StoreTransitionError::NotFound)?;
        if order.status != expected {
            return Err(StoreTransitionError::StatusMismatch {
                actual: order.status,
            });
        }
        order.status = to;
        Ok(order.clone())
    }

    /// Snapshot of every order.
    #[must_use]
    pub fn list_all(&self) -> Vec<Order> {
        self.orders.lock().clone()
    }

    /// Number of stored orders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.lock().len()
    }

    /// Returns true if no order has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.lock().is_empty()
    }
}
