//! Message Translator
//!
//! Converts inbound FIX requests into domain orders and domain outcomes
//! into outbound FIX messages. Stateless apart from the clock read for
//! TransactTime.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

use super::message::FixMessage;
use super::tags::{self, msg_type};
use crate::domain::margin::{MarginUpdate, round_cents};
use crate::domain::order_lifecycle::{Order, OrderSide, OrderStatus, OrderType, TimeInForce};
use crate::domain::shared::{ClOrdId, ExecId};

/// TransactTime layout (UTC, millisecond precision).
pub const TRANSACT_TIME_FORMAT: &str = "%Y%m%d-%H:%M:%S%.3f";

/// Errors translating an inbound message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranslationError {
    /// Required field absent.
    #[error("missing required field {name} ({tag})")]
    MissingField {
        /// Tag number.
        tag: u32,
        /// Field name.
        name: &'static str,
    },

    /// Field present but not a legal value.
    #[error("invalid value {value:?} for {name} ({tag})")]
    InvalidValue {
        /// Tag number.
        tag: u32,
        /// Field name.
        name: &'static str,
        /// Raw value.
        value: String,
    },

    /// MsgType the gateway does not handle.
    #[error("unsupported message type {0:?}")]
    UnsupportedMessageType(String),
}

/// The request kinds the gateway accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// NewOrderSingle (D).
    New,
    /// OrderCancelRequest (F).
    Cancel,
    /// OrderCancelReplaceRequest (G).
    Replace,
}

impl RequestKind {
    /// Classify a MsgType.
    #[must_use]
    pub fn from_msg_type(value: &str) -> Option<Self> {
        match value {
            msg_type::NEW_ORDER_SINGLE => Some(Self::New),
            msg_type::ORDER_CANCEL_REQUEST => Some(Self::Cancel),
            msg_type::ORDER_CANCEL_REPLACE_REQUEST => Some(Self::Replace),
            _ => None,
        }
    }

    /// CxlRejResponseTo for a reject answering this kind of request.
    #[must_use]
    pub const fn reject_response_to(&self) -> char {
        match self {
            Self::New | Self::Cancel => '1',
            Self::Replace => '2',
        }
    }
}

/// A decoded inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundRequest {
    /// New order.
    New(Order),
    /// Cancel of `orig_cl_ord_id`.
    Cancel {
        /// Request as an order (ClOrdID, Symbol, Side when present).
        order: Order,
        /// Order to cancel.
        orig_cl_ord_id: ClOrdId,
    },
    /// Replace of `orig_cl_ord_id` with the terms in `order`.
    Replace {
        /// Replacement terms.
        order: Order,
        /// Order to replace.
        orig_cl_ord_id: ClOrdId,
    },
}

impl InboundRequest {
    /// The request kind.
    #[must_use]
    pub const fn kind(&self) -> RequestKind {
        match self {
            Self::New(_) => RequestKind::New,
            Self::Cancel { .. } => RequestKind::Cancel,
            Self::Replace { .. } => RequestKind::Replace,
        }
    }

    /// ClOrdID of the request itself.
    #[must_use]
    pub const fn cl_ord_id(&self) -> &ClOrdId {
        match self {
            Self::New(order) | Self::Cancel { order, .. } | Self::Replace { order, .. } => {
                &order.cl_ord_id
            }
        }
    }
}

/// Decode any supported inbound request.
///
/// # Errors
///
/// [`TranslationError::UnsupportedMessageType`] for a MsgType other than
/// D, F or G; otherwise whatever the per-type decoder returns.
pub fn decode_request(msg: &FixMessage) -> Result<InboundRequest, TranslationError> {
    match RequestKind::from_msg_type(msg.msg_type()) {
        Some(RequestKind::New) => to_new_order(msg).map(InboundRequest::New),
        Some(RequestKind::Cancel) => {
            let (order, orig_cl_ord_id) = to_cancel_order(msg)?;
            Ok(InboundRequest::Cancel {
                order,
                orig_cl_ord_id,
            })
        }
        Some(RequestKind::Replace) => {
            let (order, orig_cl_ord_id) = to_replace_order(msg)?;
            Ok(InboundRequest::Replace {
                order,
                orig_cl_ord_id,
            })
        }
        None => Err(TranslationError::UnsupportedMessageType(
            msg.msg_type().to_string(),
        )),
    }
}

/// Decode a NewOrderSingle.
///
/// ClOrdID, Side, Symbol, OrderQty and OrdType are required; Price,
/// TimeInForce and Account default to zero, Day and empty.
///
/// # Errors
///
/// Returns [`TranslationError`] for a missing required field or an
/// unparseable value.
pub fn to_new_order(msg: &FixMessage) -> Result<Order, TranslationError> {
    let cl_ord_id = required(msg, tags::CL_ORD_ID, "ClOrdID")?;
    let side = parse_side(required(msg, tags::SIDE, "Side")?)?;
    let symbol = required(msg, tags::SYMBOL, "Symbol")?;
    let quantity = parse_decimal(
        required(msg, tags::ORDER_QTY, "OrderQty")?,
        tags::ORDER_QTY,
        "OrderQty",
    )?;
    let order_type = parse_ord_type(required(msg, tags::ORD_TYPE, "OrdType")?)?;

    let mut order = Order::new(cl_ord_id, symbol, side, quantity, order_type);
    if let Some(price) = msg.get(tags::PRICE) {
        order.price = parse_decimal(price, tags::PRICE, "Price")?;
    }
    if let Some(tif) = msg.get(tags::TIME_IN_FORCE) {
        order.time_in_force = parse_tif(tif)?;
    }
    if let Some(account) = msg.get(tags::ACCOUNT) {
        order.account = account.to_string();
    }
    Ok(order)
}

/// Decode an OrderCancelRequest into the request and its OrigClOrdID.
///
/// Every field is optional; an absent OrigClOrdID yields an empty id.
///
/// # Errors
///
/// Returns [`TranslationError::InvalidValue`] for an unparseable Side.
pub fn to_cancel_order(msg: &FixMessage) -> Result<(Order, ClOrdId), TranslationError> {
    let mut order = Order::default();
    if let Some(cl_ord_id) = msg.get(tags::CL_ORD_ID) {
        order.cl_ord_id = ClOrdId::new(cl_ord_id);
    }
    if let Some(symbol) = msg.get(tags::SYMBOL) {
        order.symbol = symbol.to_string();
    }
    if let Some(side) = msg.get(tags::SIDE) {
        order.side = parse_side(side)?;
    }
    Ok((order, orig_cl_ord_id(msg)))
}

/// Decode an OrderCancelReplaceRequest into the replacement terms and
/// its OrigClOrdID.
///
/// Every field is optional. Absent fields keep the [`Order`] defaults.
///
/// # Errors
///
/// Returns [`TranslationError::InvalidValue`] for an unparseable value.
pub fn to_replace_order(msg: &FixMessage) -> Result<(Order, ClOrdId), TranslationError> {
    let (mut order, orig) = to_cancel_order(msg)?;
    if let Some(qty) = msg.get(tags::ORDER_QTY) {
        order.quantity = parse_decimal(qty, tags::ORDER_QTY, "OrderQty")?;
    }
    if let Some(price) = msg.get(tags::PRICE) {
        order.price = parse_decimal(price, tags::PRICE, "Price")?;
    }
    if let Some(ord_type) = msg.get(tags::ORD_TYPE) {
        order.order_type = parse_ord_type(ord_type)?;
    }
    Ok((order, orig))
}

/// Build an ExecutionReport for `order`.
///
/// LeavesQty is the order quantity; CumQty and AvgPx are zero. Symbol
/// is omitted when empty and Price when not positive.
#[must_use]
pub fn execution_report(
    order: &Order,
    exec_id: &ExecId,
    exec_type: OrderStatus,
    ord_status: OrderStatus,
) -> FixMessage {
    execution_report_at(order, exec_id, exec_type, ord_status, Utc::now())
}

/// [`execution_report`] with an explicit TransactTime.
#[must_use]
pub fn execution_report_at(
    order: &Order,
    exec_id: &ExecId,
    exec_type: OrderStatus,
    ord_status: OrderStatus,
    at: DateTime<Utc>,
) -> FixMessage {
    let mut msg = FixMessage::new(msg_type::EXECUTION_REPORT);
    msg.set(tags::ORDER_ID, order.order_id.as_str())
        .set(tags::EXEC_ID, exec_id.as_str())
        .set(tags::EXEC_TYPE, exec_type.fix_tag_value().to_string())
        .set(tags::ORD_STATUS, ord_status.fix_tag_value().to_string())
        .set(tags::SIDE, order.side.fix_code().to_string())
        .set(tags::LEAVES_QTY, format_decimal(order.quantity))
        .set(tags::CUM_QTY, "0")
        .set(tags::AVG_PX, "0")
        .set(tags::CL_ORD_ID, order.cl_ord_id.as_str());
    if !order.symbol.is_empty() {
        msg.set(tags::SYMBOL, order.symbol.as_str());
    }
    msg.set(tags::ORDER_QTY, format_decimal(order.quantity))
        .set(tags::ORD_TYPE, order.order_type.fix_code().to_string());
    if order.price > Decimal::ZERO {
        msg.set(tags::PRICE, format_decimal(order.price));
    }
    msg.set(tags::TRANSACT_TIME, format_transact_time(at));
    msg
}

/// Build an OrderCancelReject carrying `reason` as Text.
#[must_use]
pub fn reject(cl_ord_id: &ClOrdId, reason: &str, response_to: RequestKind) -> FixMessage {
    reject_at(cl_ord_id, reason, response_to, Utc::now())
}

/// [`reject`] with an explicit TransactTime.
#[must_use]
pub fn reject_at(
    cl_ord_id: &ClOrdId,
    reason: &str,
    response_to: RequestKind,
    at: DateTime<Utc>,
) -> FixMessage {
    FixMessage::new(msg_type::ORDER_CANCEL_REJECT)
        .with(tags::CL_ORD_ID, cl_ord_id.as_str())
        .with(
            tags::CXL_REJ_RESPONSE_TO,
            response_to.reject_response_to().to_string(),
        )
        .with(tags::CXL_REJ_REASON, tags::CXL_REJ_REASON_OTHER)
        .with(tags::TEXT, reason)
        .with(tags::TRANSACT_TIME, format_transact_time(at))
}

/// Build the custom margin update (BI).
///
/// Monetary and percent figures are fixed two-decimal strings.
#[must_use]
pub fn margin_update(update: &MarginUpdate) -> FixMessage {
    margin_update_at(update, Utc::now())
}

/// [`margin_update`] with an explicit TransactTime.
#[must_use]
pub fn margin_update_at(update: &MarginUpdate, at: DateTime<Utc>) -> FixMessage {
    FixMessage::new(msg_type::MARGIN_UPDATE)
        .with(tags::ACCOUNT, update.account.as_str())
        .with(tags::CURRENCY, update.currency.as_str())
        .with(tags::MARGIN_VALUE, format_cents(update.margin_value))
        .with(tags::MARGIN_LEVEL, format_cents(update.margin_level))
        .with(tags::MARGIN_EXCESS, format_cents(update.margin_excess))
        .with(tags::TRANSACT_TIME, format_transact_time(at))
}

/// Read a margin update (BI) back into a snapshot.
///
/// # Errors
///
/// [`TranslationError::UnsupportedMessageType`] if `msg` is not BI;
/// [`TranslationError::MissingField`] or [`TranslationError::InvalidValue`]
/// for an absent or unparseable margin figure.
pub fn parse_margin_update(msg: &FixMessage) -> Result<MarginUpdate, TranslationError> {
    if msg.msg_type() != msg_type::MARGIN_UPDATE {
        return Err(TranslationError::UnsupportedMessageType(
            msg.msg_type().to_string(),
        ));
    }
    let figure = |tag: u32, name: &'static str| parse_decimal(required(msg, tag, name)?, tag, name);
    Ok(MarginUpdate {
        account: msg.get(tags::ACCOUNT).unwrap_or_default().to_string(),
        margin_value: figure(tags::MARGIN_VALUE, "MarginValue")?,
        margin_level: figure(tags::MARGIN_LEVEL, "MarginLevel")?,
        margin_excess: figure(tags::MARGIN_EXCESS, "MarginExcess")?,
        currency: msg.get(tags::CURRENCY).unwrap_or_default().to_string(),
    })
}

/// Format a TransactTime value.
#[must_use]
pub fn format_transact_time(at: DateTime<Utc>) -> String {
    at.format(TRANSACT_TIME_FORMAT).to_string()
}

fn format_decimal(value: Decimal) -> String {
    value.normalize().to_string()
}

fn format_cents(value: Decimal) -> String {
    format!("{:.2}", round_cents(value))
}

fn orig_cl_ord_id(msg: &FixMessage) -> ClOrdId {
    msg.get(tags::ORIG_CL_ORD_ID)
        .map(ClOrdId::new)
        .unwrap_or_default()
}

fn required<'a>(
    msg: &'a FixMessage,
    tag: u32,
    name: &'static str,
) -> Result<&'a str, TranslationError> {
    msg.get(tag)
        .ok_or(TranslationError::MissingField { tag, name })
}

fn invalid(tag: u32, name: &'static str, value: &str) -> TranslationError {
    TranslationError::InvalidValue {
        tag,
        name,
        value: value.to_string(),
    }
}

fn parse_decimal(value: &str, tag: u32, name: &'static str) -> Result<Decimal, TranslationError> {
    Decimal::from_str(value.trim()).map_err(|_| invalid(tag, name, value))
}

fn single_char(value: &str) -> Option<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

fn parse_side(value: &str) -> Result<OrderSide, TranslationError> {
    single_char(value)
        .and_then(OrderSide::from_fix_code)
        .ok_or_else(|| invalid(tags::SIDE, "Side", value))
}

fn parse_ord_type(value: &str) -> Result<OrderType, TranslationError> {
    single_char(value)
        .and_then(OrderType::from_fix_code)
        .ok_or_else(|| invalid(tags::ORD_TYPE, "OrdType", value))
}

fn parse_tif(value: &str) -> Result<TimeInForce, TranslationError> {
    single_char(value)
        .and_then(TimeInForce::from_fix_code)
        .ok_or_else(|| invalid(tags::TIME_IN_FORCE, "TimeInForce", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::OrderId;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use test_case::test_case;

    fn new_order_msg() -> FixMessage {
        FixMessage::new("D")
            .with(11, "TEST-001")
            .with(54, "1")
            .with(55, "AAPL")
            .with(38, "100")
            .with(40, "1")
            .with(59, "0")
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 15).unwrap()
            + chrono::Duration::milliseconds(42)
    }

    #[test]
    fn decodes_new_order_with_defaults() {
        let order = to_new_order(&new_order_msg()).unwrap();
        assert_eq!(order.cl_ord_id, ClOrdId::new("TEST-001"));
        assert_eq!(order.side, OrderSide::Buy);
        assert_eq!(order.quantity, dec!(100));
        assert_eq!(order.order_type, OrderType::Market);
        assert_eq!(order.price, Decimal::ZERO);
        assert!(order.account.is_empty());
    }

    #[test]
    fn decodes_optional_new_order_fields() {
        let msg = new_order_msg()
            .with(40, "2")
            .with(44, "150.25")
            .with(59, "1")
            .with(1, "ACC-9");
        let order = to_new_order(&msg).unwrap();
        assert_eq!(order.order_type, OrderType::Limit);
        assert_eq!(order.price, dec!(150.25));
        assert_eq!(order.time_in_force, TimeInForce::Gtc);
        assert_eq!(order.account, "ACC-9");
    }

    #[test_case(11, "ClOrdID")]
    #[test_case(54, "Side")]
    #[test_case(55, "Symbol")]
    #[test_case(38, "OrderQty")]
    #[test_case(40, "OrdType")]
    fn new_order_requires_field(tag: u32, name: &'static str) {
        let mut msg = FixMessage::new("D");
        for (t, v) in new_order_msg().fields().filter(|(t, _)| *t != tag) {
            msg.set(t, v);
        }
        assert_eq!(
            to_new_order(&msg),
            Err(TranslationError::MissingField { tag, name })
        );
    }

    #[test_case(54, "7" ; "unknown side")]
    #[test_case(40, "P" ; "unknown ord type")]
    #[test_case(59, "9" ; "unknown tif")]
    #[test_case(38, "ten" ; "non numeric qty")]
    fn new_order_rejects_bad_values(tag: u32, value: &str) {
        let msg = new_order_msg().with(tag, value);
        assert!(matches!(
            to_new_order(&msg),
            Err(TranslationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn negative_quantity_translates() {
        let order = to_new_order(&new_order_msg().with(38, "-10")).unwrap();
        assert_eq!(order.quantity, dec!(-10));
    }

    #[test]
    fn cancel_fields_are_optional() {
        let (order, orig) = to_cancel_order(&FixMessage::new("F")).unwrap();
        assert!(order.cl_ord_id.is_empty());
        assert!(orig.is_empty());

        let msg = FixMessage::new("F").with(11, "C1").with(41, "A1").with(55, "AAPL").with(54, "2");
        let (order, orig) = to_cancel_order(&msg).unwrap();
        assert_eq!(order.cl_ord_id, ClOrdId::new("C1"));
        assert_eq!(order.side, OrderSide::Sell);
        assert_eq!(orig, ClOrdId::new("A1"));
    }

    #[test]
    fn decodes_replace() {
        let msg = FixMessage::new("G")
            .with(11, "R1")
            .with(41, "A1")
            .with(38, "200")
            .with(44, "155.50")
            .with(40, "2");
        let request = decode_request(&msg).unwrap();
        assert_eq!(request.kind(), RequestKind::Replace);
        assert_eq!(request.cl_ord_id(), &ClOrdId::new("R1"));
        let InboundRequest::Replace { order, orig_cl_ord_id } = request else {
            panic!("expected replace");
        };
        assert_eq!(orig_cl_ord_id, ClOrdId::new("A1"));
        assert_eq!(order.quantity, dec!(200));
        assert_eq!(order.price, dec!(155.50));
        assert_eq!(order.order_type, OrderType::Limit);
    }

    #[test]
    fn decode_rejects_other_message_types() {
        assert_eq!(
            decode_request(&FixMessage::new("AE")),
            Err(TranslationError::UnsupportedMessageType("AE".to_string()))
        );
    }

    #[test]
    fn execution_report_fields() {
        let mut order = Order::new("TEST-001", "AAPL", OrderSide::Buy, dec!(100), OrderType::Market);
        order.order_id = OrderId::new("1");
        let msg = execution_report_at(&order, &ExecId::new("7"), OrderStatus::New, OrderStatus::New, at());

        assert_eq!(msg.msg_type(), "8");
        assert_eq!(msg.get(37), Some("1"));
        assert_eq!(msg.get(17), Some("7"));
        assert_eq!(msg.get(150), Some("0"));
        assert_eq!(msg.get(39), Some("0"));
        assert_eq!(msg.get(151), Some("100"));
        assert_eq!(msg.get(14), Some("0"));
        assert_eq!(msg.get(6), Some("0"));
        assert_eq!(msg.get(55), Some("AAPL"));
        assert_eq!(msg.get(40), Some("1"));
        assert!(!msg.has(44));
        assert_eq!(msg.get(60), Some("20240305-14:30:15.042"));
    }

    #[test]
    fn execution_report_omits_empty_symbol_and_keeps_price() {
        let order = Order::new("A1", "", OrderSide::Sell, dec!(50), OrderType::Limit).with_price(dec!(150.25));
        let msg = execution_report_at(&order, &ExecId::new("2"), OrderStatus::Canceled, OrderStatus::Canceled, at());
        assert!(!msg.has(55));
        assert_eq!(msg.get(44), Some("150.25"));
        assert_eq!(msg.get(150), Some("4"));
        assert_eq!(msg.get(54), Some("2"));
    }

    #[test_case(RequestKind::New, "1")]
    #[test_case(RequestKind::Cancel, "1")]
    #[test_case(RequestKind::Replace, "2")]
    fn reject_fields(kind: RequestKind, response_to: &str) {
        let msg = reject_at(&ClOrdId::new("BAD"), "Invalid order", kind, at());
        assert_eq!(msg.msg_type(), "9");
        assert_eq!(msg.get(11), Some("BAD"));
        assert_eq!(msg.get(434), Some(response_to));
        assert_eq!(msg.get(102), Some("99"));
        assert_eq!(msg.get(58), Some("Invalid order"));
    }

    #[test]
    fn margin_update_two_decimals() {
        let update = MarginUpdate {
            account: "ACC-001".to_string(),
            margin_value: dec!(100000),
            margin_level: dec!(30),
            margin_excess: dec!(70000.005),
            currency: "USD".to_string(),
        };
        let msg = margin_update_at(&update, at());
        assert_eq!(msg.msg_type(), "BI");
        assert_eq!(msg.get(1), Some("ACC-001"));
        assert_eq!(msg.get(15), Some("USD"));
        assert_eq!(msg.get(20002), Some("100000.00"));
        assert_eq!(msg.get(20003), Some("30.00"));
        assert_eq!(msg.get(899), Some("70000.01"));
        assert!(msg.has(60));

        let parsed = parse_margin_update(&msg).unwrap();
        assert_eq!(parsed.margin_excess, dec!(70000.01));
        assert_eq!(parsed.account, "ACC-001");
    }

    #[test]
    fn parse_margin_update_requires_figures() {
        let msg = FixMessage::new("BI").with(1, "ACC").with(20002, "1.00");
        assert!(matches!(
            parse_margin_update(&msg),
            Err(TranslationError::MissingField { tag: 20003, .. })
        ));
        assert!(matches!(
            parse_margin_update(&FixMessage::new("8")),
            Err(TranslationError::UnsupportedMessageType(_))
        ));
    }
}
