//! Order Record
//!
//! The order as it travels between the wire translator, the lifecycle
//! service and the store. Fields are public: the record carries no
//! behavior beyond validation, and the store owns the authoritative copy.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::value_objects::{OrderSide, OrderStatus, OrderType, TimeInForce};
use crate::domain::shared::{ClOrdId, OrderId};

/// A client order.
///
/// `order_id` is empty until the lifecycle service assigns one. `price`
/// is zero when the request carried none.
// Allow `order_type` field name: follows FIX protocol terminology (tag 40 OrdType).
#[allow(clippy::struct_field_names)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// System-assigned order ID.
    pub order_id: OrderId,
    /// Client-assigned order ID.
    pub cl_ord_id: ClOrdId,
    /// Instrument symbol.
    pub symbol: String,
    /// Buy or sell.
    pub side: OrderSide,
    /// Signed quantity; must be positive to be accepted.
    pub quantity: Decimal,
    /// Order type.
    pub order_type: OrderType,
    /// Limit/stop price; zero when absent.
    pub price: Decimal,
    /// Time in force.
    pub time_in_force: TimeInForce,
    /// Trading account; may be empty on input.
    pub account: String,
    /// Lifecycle status.
    pub status: OrderStatus,
}

impl Order {
    /// Create an order with the required request fields.
    #[must_use]
    pub fn new(
        cl_ord_id: impl Into<ClOrdId>,
        symbol: impl Into<String>,
        side: OrderSide,
        quantity: Decimal,
        order_type: OrderType,
    ) -> Self {
        Self {
            cl_ord_id: cl_ord_id.into(),
            symbol: symbol.into(),
            side,
            quantity,
            order_type,
            ..Self::default()
        }
    }

    /// Set the price.
    #[must_use]
    pub const fn with_price(mut self, price: Decimal) -> Self {
        self.price = price;
        self
    }

    /// Set the time in force.
    #[must_use]
    pub const fn with_time_in_force(mut self, tif: TimeInForce) -> Self {
        self.time_in_force = tif;
        self
    }

    /// Set the account.
    #[must_use]
    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = account.into();
        self
    }

    /// Validate as a new order: quantity, price against type, symbol.
    ///
    /// # Errors
    ///
    /// Returns the first rule the order breaks.
    pub fn validate_new(&self) -> Result<(), ValidationFailure> {
        self.validate_terms()?;
        if self.symbol.is_empty() {
            return Err(ValidationFailure::EmptySymbol);
        }
        Ok(())
    }

    /// Validate as a replacement: quantity and price against type only.
    ///
    /// # Errors
    ///
    /// Returns the first rule the order breaks.
    pub fn validate_replacement(&self) -> Result<(), ValidationFailure> {
        self.validate_terms()
    }

    fn validate_terms(&self) -> Result<(), ValidationFailure> {
        if self.quantity <= Decimal::ZERO {
            return Err(ValidationFailure::NonPositiveQuantity {
                quantity: self.quantity,
            });
        }
        if !self.order_type.is_market() && self.price <= Decimal::ZERO {
            return Err(ValidationFailure::MissingPrice {
                order_type: self.order_type,
                price: self.price,
            });
        }
        Ok(())
    }
}

/// The specific rule an order failed.
///
/// Logged for operators; the counterparty only sees the fixed
/// lifecycle message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationFailure {
    /// Quantity is zero or negative.
    NonPositiveQuantity {
        /// Offending quantity.
        quantity: Decimal,
    },
    /// Non-market order without a positive price.
    MissingPrice {
        /// Order type requiring the price.
        order_type: OrderType,
        /// Offending price.
        price: Decimal,
    },
    /// Symbol is empty.
    EmptySymbol,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveQuantity { quantity } => {
                write!(f, "invalid quantity {quantity}")
            }
            Self::MissingPrice { order_type, price } => {
                write!(f, "{order_type} order requires a positive price, got {price}")
            }
            Self::EmptySymbol => write!(f, "empty symbol"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use test_case::test_case;

    fn limit(qty: Decimal, px: Decimal) -> Order {
        Order::new("A1", "MSFT", OrderSide::Sell, qty, OrderType::Limit).with_price(px)
    }

    #[test]
    fn new_order_defaults() {
        let order = Order::new("A1", "AAPL", OrderSide::Buy, dec!(100), OrderType::Market);
        assert!(order.order_id.is_empty());
        assert_eq!(order.price, Decimal::ZERO);
        assert_eq!(order.time_in_force, TimeInForce::Day);
        assert_eq!(order.status, OrderStatus::New);
        assert!(order.account.is_empty());
    }

    #[test]
    fn market_order_needs_no_price() {
        let order = Order::new("A1", "AAPL", OrderSide::Buy, dec!(100), OrderType::Market);
        assert_eq!(order.validate_new(), Ok(()));
    }

    #[test_case(dec!(0) ; "zero")]
    #[test_case(dec!(-10) ; "negative")]
    fn non_positive_quantity_fails(qty: Decimal) {
        let err = limit(qty, dec!(150.25)).validate_new().unwrap_err();
        assert!(matches!(err, ValidationFailure::NonPositiveQuantity { .. }));
    }

    #[test_case(OrderType::Limit)]
    #[test_case(OrderType::Stop)]
    #[test_case(OrderType::StopLimit)]
    fn priced_types_require_positive_price(order_type: OrderType) {
        let order = Order::new("A1", "MSFT", OrderSide::Buy, dec!(10), order_type);
        let err = order.validate_new().unwrap_err();
        assert!(matches!(err, ValidationFailure::MissingPrice { .. }));
    }

    #[test]
    fn empty_symbol_fails_new_but_not_replacement() {
        let order = Order::new("A1", "", OrderSide::Buy, dec!(10), OrderType::Market);
        assert_eq!(order.validate_new(), Err(ValidationFailure::EmptySymbol));
        assert_eq!(order.validate_replacement(), Ok(()));
    }

    #[test]
    fn quantity_checked_before_price() {
        let err = limit(dec!(-1), dec!(0)).validate_new().unwrap_err();
        assert!(matches!(err, ValidationFailure::NonPositiveQuantity { .. }));
    }

    #[test]
    fn failure_display_names_the_rule() {
        let err = limit(dec!(5), dec!(0)).validate_new().unwrap_err();
        assert_eq!(err.to_string(), "LIMIT order requires a positive price, got 0");
    }
}
