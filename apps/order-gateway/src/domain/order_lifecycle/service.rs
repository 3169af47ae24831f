//! Order Lifecycle Service
//!
//! Validates and applies New, Cancel and Replace requests against the
//! order store and notifies status listeners of every transition.
//!
//! All operations take `&self` and may run concurrently from any thread.
//! Status changes go through the store's compare-and-set, so two racing
//! cancel/replace requests on the same order cannot both succeed.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, warn};

use super::errors::LifecycleError;
use super::order::Order;
use super::result::OrderResult;
use super::store::{OrderStore, StoreTransitionError};
use super::value_objects::OrderStatus;
use crate::domain::shared::{ClOrdId, IdSequence};

/// Account assigned to orders that arrive without one.
pub const DEFAULT_ACCOUNT: &str = "DEFAULT_ACCOUNT";

/// Callback invoked after each status transition.
///
/// Runs synchronously on the thread that processed the request, with no
/// store lock held.
pub type StatusListener = Arc<dyn Fn(&Order, OrderStatus) + Send + Sync>;

/// Lifecycle service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleConfig {
    /// Account for orders with an empty account.
    pub default_account: String,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            default_account: DEFAULT_ACCOUNT.to_string(),
        }
    }
}

/// The order lifecycle service.
pub struct OrderLifecycleService {
    store: OrderStore,
    order_ids: IdSequence,
    exec_ids: IdSequence,
    listeners: RwLock<Vec<StatusListener>>,
    config: LifecycleConfig,
}

impl std::fmt::Debug for OrderLifecycleService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderLifecycleService")
            .field("orders", &self.store.len())
            .field("listeners", &self.listeners.read().len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for OrderLifecycleService {
    fn default() -> Self {
        Self::new(LifecycleConfig::default())
    }
}

impl OrderLifecycleService {
    /// Create a service with an empty store and counters at 1.
    #[must_use]
    pub fn new(config: LifecycleConfig) -> Self {
        Self {
            store: OrderStore::new(),
            order_ids: IdSequence::new(),
            exec_ids: IdSequence::new(),
            listeners: RwLock::new(Vec::new()),
            config,
        }
    }

    /// Register a status listener.
    pub fn subscribe(&self, listener: StatusListener) {
        self.listeners.write().push(listener);
    }

    /// Accept a new order.
    ///
    /// Rejects with "Invalid order" when quantity is not positive, when a
    /// non-market order has no positive price, or when the symbol is empty;
    /// with "Duplicate ClOrdID" when the ClOrdID is already bound.
    #[must_use]
    pub fn process_new(&self, request: Order) -> OrderResult {
        if let Err(reason) = request.validate_new() {
            warn!(cl_ord_id = %request.cl_ord_id, %reason, "Order validation failed");
            return OrderResult::rejected(request, LifecycleError::InvalidOrder { reason });
        }

        let mut order = request.clone();
        if order.account.is_empty() {
            order.account.clone_from(&self.config.default_account);
        }
        order.order_id = self.order_ids.next_order_id();
        order.status = OrderStatus::New;

        if !self.store.insert_if_absent(order.clone()) {
            warn!(cl_ord_id = %request.cl_ord_id, "Duplicate ClOrdID");
            let cl_ord_id = request.cl_ord_id.clone();
            return OrderResult::rejected(request, LifecycleError::DuplicateClOrdId { cl_ord_id });
        }

        info!(
            order_id = %order.order_id,
            cl_ord_id = %order.cl_ord_id,
            symbol = %order.symbol,
            side = %order.side,
            quantity = %order.quantity,
            "Order accepted"
        );
        self.notify(&order, OrderStatus::New);
        OrderResult::accepted(order, self.exec_ids.next_exec_id(), "Order accepted")
    }

    /// Cancel the order bound to `orig_cl_ord_id`.
    ///
    /// On success the result echoes the stored order, now CANCELED.
    #[must_use]
    pub fn process_cancel(&self, request: Order, orig_cl_ord_id: &ClOrdId) -> OrderResult {
        match self
            .store
            .transition_from(orig_cl_ord_id, OrderStatus::New, OrderStatus::Canceled)
        {
            Ok(order) => {
                info!(
                    order_id = %order.order_id,
                    orig_cl_ord_id = %orig_cl_ord_id,
                    "Order cancelled"
                );
                self.notify(&order, OrderStatus::Canceled);
                OrderResult::accepted(order, self.exec_ids.next_exec_id(), "Order cancelled")
            }
            Err(StoreTransitionError::NotFound) => {
                warn!(orig_cl_ord_id = %orig_cl_ord_id, "Cancel of unknown order");
                OrderResult::rejected(
                    request,
                    LifecycleError::OriginalNotFound {
                        orig_cl_ord_id: orig_cl_ord_id.clone(),
                    },
                )
            }
            Err(StoreTransitionError::StatusMismatch { actual }) => {
                warn!(orig_cl_ord_id = %orig_cl_ord_id, status = %actual, "Cancel refused");
                OrderResult::rejected(request, LifecycleError::CannotCancel { status: actual })
            }
        }
    }

    /// Replace the order bound to `orig_cl_ord_id`.
    ///
    /// The original is marked REPLACED and echoed back; the replacement
    /// terms are validated but not stored as a separate order.
    #[must_use]
    pub fn process_replace(&self, request: Order, orig_cl_ord_id: &ClOrdId) -> OrderResult {
        let Some(existing) = self.store.find_by_cl_ord_id(orig_cl_ord_id) else {
            warn!(orig_cl_ord_id = %orig_cl_ord_id, "Replace of unknown order");
            return OrderResult::rejected(
                request,
                LifecycleError::OriginalNotFound {
                    orig_cl_ord_id: orig_cl_ord_id.clone(),
                },
            );
        };
        if !existing.status.is_actionable() {
            warn!(orig_cl_ord_id = %orig_cl_ord_id, status = %existing.status, "Replace refused");
            return OrderResult::rejected(
                request,
                LifecycleError::CannotModify {
                    status: existing.status,
                },
            );
        }
        if let Err(reason) = request.validate_replacement() {
            warn!(cl_ord_id = %request.cl_ord_id, %reason, "Replace validation failed");
            return OrderResult::rejected(request, LifecycleError::InvalidReplace { reason });
        }

        match self
            .store
            .transition_from(orig_cl_ord_id, OrderStatus::New, OrderStatus::Replaced)
        {
            Ok(order) => {
                info!(
                    order_id = %order.order_id,
                    orig_cl_ord_id = %orig_cl_ord_id,
                    cl_ord_id = %request.cl_ord_id,
                    "Order replaced"
                );
                self.notify(&order, OrderStatus::Replaced);
                OrderResult::accepted(order, self.exec_ids.next_exec_id(), "Order replaced")
            }
            // Lost a race with a concurrent cancel/replace.
            Err(StoreTransitionError::StatusMismatch { actual }) => {
                OrderResult::rejected(request, LifecycleError::CannotModify { status: actual })
            }
            Err(StoreTransitionError::NotFound) => OrderResult::rejected(
                request,
                LifecycleError::OriginalNotFound {
                    orig_cl_ord_id: orig_cl_ord_id.clone(),
                },
            ),
        }
    }

    /// Look up an order by ClOrdID.
    #[must_use]
    pub fn find_order(&self, cl_ord_id: &ClOrdId) -> Option<Order> {
        self.store.find_by_cl_ord_id(cl_ord_id)
    }

    /// Snapshot of all orders.
    #[must_use]
    pub fn orders(&self) -> Vec<Order> {
        self.store.list_all()
    }

    fn notify(&self, order: &Order, status: OrderStatus) {
        let listeners = self.listeners.read().clone();
        for listener in &listeners {
            listener(order, status);
        }
    }
}
