//! Counterparty Simulator
//!
//! Plays the client side of a session for the demo binary and the
//! integration tests. It builds the scripted requests (market order,
//! limit order, cancel, replace, invalid order) and interprets whatever
//! the gateway sends back.

use chrono::Utc;
use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{info, warn};

use crate::domain::margin::MarginUpdate;
use crate::domain::order_lifecycle::{OrderSide, OrderType, TimeInForce};
use crate::domain::shared::ClOrdId;
use crate::fix::tags::{self, msg_type};
use crate::fix::translator::{self, format_transact_time};
use crate::fix::{FixMessage, TranslationError};

/// Account used by the scripted orders.
pub const SCRIPT_ACCOUNT: &str = "TEST-001";

/// One step of the demo script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptStep {
    /// Buy 100 AAPL at market.
    MarketOrder,
    /// Sell 50 MSFT limit 150.25.
    LimitOrder,
    /// Cancel the most recent order.
    CancelLast,
    /// Replace the most recent order: 200 @ 155.50 limit.
    ReplaceLast,
    /// A market order with a negative quantity.
    InvalidOrder,
}

/// The scripted session, in order.
pub const SCRIPT: [ScriptStep; 5] = [
    ScriptStep::MarketOrder,
    ScriptStep::LimitOrder,
    ScriptStep::CancelLast,
    ScriptStep::ReplaceLast,
    ScriptStep::InvalidOrder,
];

/// A message received from the gateway, interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterpartyEvent {
    /// Execution report.
    Execution {
        /// ClOrdID the report answers.
        cl_ord_id: ClOrdId,
        /// ExecType code.
        exec_type: String,
        /// OrdStatus code.
        ord_status: String,
    },
    /// Order cancel reject.
    Reject {
        /// ClOrdID the reject answers.
        cl_ord_id: ClOrdId,
        /// Reject reason.
        text: String,
    },
    /// Margin snapshot.
    Margin(MarginUpdate),
    /// A margin update that could not be read.
    Malformed(TranslationError),
    /// Any other MsgType.
    Other(String),
}

/// Running totals of received messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulatorStats {
    /// Execution reports received.
    pub executions: usize,
    /// Rejects received.
    pub rejects: usize,
    /// Margin updates received.
    pub margin_updates: usize,
}

// Identity of the most recent new order, targeted by cancel and replace.
#[derive(Debug, Clone)]
struct SentOrder {
    cl_ord_id: ClOrdId,
    symbol: String,
    side: OrderSide,
}

/// Scripted client-side counterparty.
#[derive(Debug, Clone, Default)]
pub struct CounterpartySimulator {
    last: Option<SentOrder>,
    stats: SimulatorStats,
}

impl CounterpartySimulator {
    /// Create a simulator with no orders sent.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// ClOrdID of the most recent new order.
    #[must_use]
    pub fn last_cl_ord_id(&self) -> Option<&ClOrdId> {
        self.last.as_ref().map(|sent| &sent.cl_ord_id)
    }

    /// Totals so far.
    #[must_use]
    pub const fn stats(&self) -> SimulatorStats {
        self.stats
    }

    /// Build the request for one script step.
    pub fn build(&mut self, step: ScriptStep) -> FixMessage {
        match step {
            ScriptStep::MarketOrder => self.new_order(
                "AAPL",
                OrderSide::Buy,
                dec!(100),
                OrderType::Market,
                None,
            ),
            ScriptStep::LimitOrder => self.new_order(
                "MSFT",
                OrderSide::Sell,
                dec!(50),
                OrderType::Limit,
                Some(dec!(150.25)),
            ),
            ScriptStep::CancelLast => self.cancel_last(),
            ScriptStep::ReplaceLast => self.replace_last(dec!(200), dec!(155.50)),
            ScriptStep::InvalidOrder => self.new_order(
                "INVALID",
                OrderSide::Buy,
                dec!(-10),
                OrderType::Market,
                None,
            ),
        }
    }

    /// Build a NewOrderSingle and remember its ClOrdID.
    pub fn new_order(
        &mut self,
        symbol: &str,
        side: OrderSide,
        quantity: Decimal,
        order_type: OrderType,
        price: Option<Decimal>,
    ) -> FixMessage {
        let cl_ord_id = next_cl_ord_id();
        let mut msg = FixMessage::new(msg_type::NEW_ORDER_SINGLE);
        msg.set(tags::CL_ORD_ID, cl_ord_id.as_str())
            .set(tags::SIDE, side.fix_code().to_string())
            .set(tags::SYMBOL, symbol)
            .set(tags::ORDER_QTY, quantity.to_string())
            .set(tags::ORD_TYPE, order_type.fix_code().to_string());
        if let Some(price) = price {
            msg.set(tags::PRICE, price.to_string());
        }
        msg.set(tags::TIME_IN_FORCE, TimeInForce::Day.fix_code().to_string())
            .set(tags::ACCOUNT, SCRIPT_ACCOUNT)
            .set(tags::TRANSACT_TIME, format_transact_time(Utc::now()));

        info!(%cl_ord_id, symbol, %quantity, ?order_type, "Sending NewOrderSingle");
        self.last = Some(SentOrder {
            cl_ord_id,
            symbol: symbol.to_string(),
            side,
        });
        msg
    }

    /// Build a cancel for the most recent order.
    ///
    /// Without a prior order the OrigClOrdID is empty and Symbol is omitted.
    pub fn cancel_last(&mut self) -> FixMessage {
        let cl_ord_id = next_cl_ord_id();
        let msg = self.amend_last(msg_type::ORDER_CANCEL_REQUEST, &cl_ord_id);
        info!(
            %cl_ord_id,
            orig_cl_ord_id = msg.get(tags::ORIG_CL_ORD_ID).unwrap_or_default(),
            "Sending OrderCancelRequest"
        );
        msg.with(tags::TRANSACT_TIME, format_transact_time(Utc::now()))
    }

    /// Build a cancel/replace for the most recent order.
    pub fn replace_last(&mut self, quantity: Decimal, price: Decimal) -> FixMessage {
        let cl_ord_id = next_cl_ord_id();
        let msg = self.amend_last(msg_type::ORDER_CANCEL_REPLACE_REQUEST, &cl_ord_id);
        info!(
            %cl_ord_id,
            orig_cl_ord_id = msg.get(tags::ORIG_CL_ORD_ID).unwrap_or_default(),
            %quantity,
            %price,
            "Sending OrderCancelReplaceRequest"
        );
        msg.with(tags::ORDER_QTY, quantity.to_string())
            .with(tags::PRICE, price.to_string())
            .with(tags::ORD_TYPE, OrderType::Limit.fix_code().to_string())
            .with(tags::TRANSACT_TIME, format_transact_time(Utc::now()))
    }

    // OrigClOrdID, ClOrdID, Symbol and Side of a request amending the last order.
    fn amend_last(&self, kind: &str, cl_ord_id: &ClOrdId) -> FixMessage {
        let mut msg = FixMessage::new(kind);
        match &self.last {
            Some(sent) => {
                msg.set(tags::ORIG_CL_ORD_ID, sent.cl_ord_id.as_str())
                    .set(tags::CL_ORD_ID, cl_ord_id.as_str())
                    .set(tags::SYMBOL, sent.symbol.as_str())
                    .set(tags::SIDE, sent.side.fix_code().to_string());
            }
            None => {
                msg.set(tags::ORIG_CL_ORD_ID, "")
                    .set(tags::CL_ORD_ID, cl_ord_id.as_str())
                    .set(tags::SIDE, OrderSide::Buy.fix_code().to_string());
            }
        }
        msg
    }

    /// Interpret a message from the gateway and log it.
    pub fn handle(&mut self, msg: &FixMessage) -> CounterpartyEvent {
        let field = |tag: u32| msg.get(tag).unwrap_or_default().to_string();
        match msg.msg_type() {
            msg_type::EXECUTION_REPORT => {
                self.stats.executions += 1;
                let cl_ord_id = ClOrdId::new(field(tags::CL_ORD_ID));
                let exec_type = field(tags::EXEC_TYPE);
                let ord_status = field(tags::ORD_STATUS);
                info!(%cl_ord_id, exec_type, ord_status, "Execution report received");
                CounterpartyEvent::Execution {
                    cl_ord_id,
                    exec_type,
                    ord_status,
                }
            }
            msg_type::ORDER_CANCEL_REJECT => {
                self.stats.rejects += 1;
                let cl_ord_id = ClOrdId::new(field(tags::CL_ORD_ID));
                let text = field(tags::TEXT);
                warn!(%cl_ord_id, text, "Order cancel reject received");
                CounterpartyEvent::Reject { cl_ord_id, text }
            }
            msg_type::MARGIN_UPDATE => match translator::parse_margin_update(msg) {
                Ok(update) => {
                    self.stats.margin_updates += 1;
                    info!(
                        account = %update.account,
                        margin_value = %format!("{:.2}", update.margin_value),
                        margin_level = %format!("{:.2}%", update.margin_level),
                        margin_excess = %format!("{:.2}", update.margin_excess),
                        currency = %update.currency,
                        "Margin update received"
                    );
                    CounterpartyEvent::Margin(update)
                }
                Err(err) => {
                    warn!(error = %err, "Unreadable margin update");
                    CounterpartyEvent::Malformed(err)
                }
            },
            other => CounterpartyEvent::Other(other.to_string()),
        }
    }
}

fn next_cl_ord_id() -> ClOrdId {
    ClOrdId::new(rand::rng().random::<u64>().to_string())
}
