//! Session Flow Integration Tests
//!
//! Drives a full session through the orchestrator: scripted requests in,
//! execution reports, rejects and margin updates out.

#![allow(clippy::unwrap_used, clippy::panic)]

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use rust_decimal_macros::dec;

use order_gateway::application::services::{
    BroadcastSchedule, OrchestratorConfig, SessionOrchestrator,
};
use order_gateway::domain::margin::MarginBroadcastConfig;
use order_gateway::domain::order_lifecycle::{
    LifecycleConfig, OrderLifecycleService, OrderStatus,
};
use order_gateway::domain::shared::ClOrdId;
use order_gateway::fix::tags::{self, msg_type};
use order_gateway::fix::{FixMessage, SessionId};
use order_gateway::infrastructure::simulator::{
    CounterpartyEvent, CounterpartySimulator, SCRIPT, ScriptStep,
};
use order_gateway::infrastructure::transport::RecordingSender;

// =============================================================================
// Helpers
// =============================================================================

fn session() -> SessionId {
    SessionId::new("GATEWAY", "CLIENT")
}

fn quiet_config() -> OrchestratorConfig {
    OrchestratorConfig {
        margin_enabled: false,
        ..OrchestratorConfig::default()
    }
}

fn fast_margin_config() -> OrchestratorConfig {
    OrchestratorConfig {
        margin_enabled: true,
        schedule: BroadcastSchedule {
            interval: Duration::from_millis(30),
            tick: Duration::from_millis(5),
        },
        margin: MarginBroadcastConfig::default(),
    }
}

fn gateway(
    config: OrchestratorConfig,
) -> (SessionOrchestrator<RecordingSender>, Arc<RecordingSender>) {
    let service = Arc::new(OrderLifecycleService::new(LifecycleConfig::default()));
    let sender = Arc::new(RecordingSender::new());
    let orchestrator = SessionOrchestrator::new(service, Arc::clone(&sender), config);
    (orchestrator, sender)
}

fn logged_on(
    config: OrchestratorConfig,
) -> (SessionOrchestrator<RecordingSender>, Arc<RecordingSender>) {
    let (orchestrator, sender) = gateway(config);
    orchestrator.on_create(&session());
    orchestrator.on_logon(&session());
    (orchestrator, sender)
}

fn wait_for(deadline: Duration, mut done: impl FnMut() -> bool) -> bool {
    let until = Instant::now() + deadline;
    while Instant::now() < until {
        if done() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    done()
}

// =============================================================================
// Scripted session
// =============================================================================

#[test]
fn demo_script_produces_expected_responses() {
    let (orchestrator, sender) = logged_on(quiet_config());
    let mut sim = CounterpartySimulator::new();

    let mut requests = Vec::new();
    for step in SCRIPT {
        let request = sim.build(step);
        orchestrator.from_app(&request, &session());
        requests.push(request);
    }

    let events: Vec<CounterpartyEvent> = sender.messages().iter().map(|m| sim.handle(m)).collect();
    assert_eq!(events.len(), 5);

    let cl = |i: usize| ClOrdId::new(requests[i].get(tags::CL_ORD_ID).unwrap());
    let execution = |cl_ord_id: ClOrdId, code: &str| CounterpartyEvent::Execution {
        cl_ord_id,
        exec_type: code.to_string(),
        ord_status: code.to_string(),
    };

    assert_eq!(events[0], execution(cl(0), "0"));
    assert_eq!(events[1], execution(cl(1), "0"));
    // The cancel report echoes the cancelled order.
    assert_eq!(events[2], execution(cl(1), "4"));
    // The replace targets the order that was just cancelled.
    assert_eq!(
        events[3],
        CounterpartyEvent::Reject {
            cl_ord_id: cl(3),
            text: "Order cannot be modified in current status".to_string(),
        }
    );
    assert_eq!(
        events[4],
        CounterpartyEvent::Reject {
            cl_ord_id: cl(4),
            text: "Invalid order".to_string(),
        }
    );

    let stats = sim.stats();
    assert_eq!((stats.executions, stats.rejects), (3, 2));

    let reports = sender.messages_of_type(msg_type::EXECUTION_REPORT);
    assert_eq!(reports[0].get(tags::ORDER_ID), Some("1"));
    assert_eq!(reports[1].get(tags::ORDER_ID), Some("2"));
    assert_eq!(reports[1].get(tags::PRICE), Some("150.25"));
    assert_eq!(reports[0].get(tags::PRICE), None);

    let rejects = sender.messages_of_type(msg_type::ORDER_CANCEL_REJECT);
    assert_eq!(rejects[0].get(tags::CXL_REJ_RESPONSE_TO), Some("2"));
    assert_eq!(rejects[1].get(tags::CXL_REJ_RESPONSE_TO), Some("1"));
    assert!(rejects.iter().all(|r| r.get(tags::CXL_REJ_REASON) == Some("99")));

    let service = orchestrator.service();
    assert_eq!(service.orders().len(), 2);
    assert_eq!(service.find_order(&cl(0)).unwrap().status, OrderStatus::New);
    assert_eq!(service.find_order(&cl(1)).unwrap().status, OrderStatus::Canceled);
    assert!(service.find_order(&cl(4)).is_none());
}

#[test]
fn replace_of_live_order_is_accepted() {
    let (orchestrator, sender) = logged_on(quiet_config());
    let mut sim = CounterpartySimulator::new();

    let new = sim.build(ScriptStep::LimitOrder);
    orchestrator.from_app(&new, &session());
    orchestrator.from_app(&sim.build(ScriptStep::ReplaceLast), &session());

    let reports = sender.messages_of_type(msg_type::EXECUTION_REPORT);
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[1].get(tags::EXEC_TYPE), Some("5"));
    assert_eq!(reports[1].get(tags::ORD_STATUS), Some("5"));
    // The original's terms are reported, not the replacement's.
    assert_eq!(reports[1].get(tags::CL_ORD_ID), new.get(tags::CL_ORD_ID));
    assert_eq!(reports[1].get(tags::ORDER_QTY), Some("50"));

    // A replaced order can no longer be cancelled.
    let cancel = FixMessage::new(msg_type::ORDER_CANCEL_REQUEST)
        .with(tags::ORIG_CL_ORD_ID, new.get(tags::CL_ORD_ID).unwrap())
        .with(tags::CL_ORD_ID, "CXL-AFTER-REPLACE")
        .with(tags::SYMBOL, "MSFT")
        .with(tags::SIDE, "2");
    orchestrator.from_app(&cancel, &session());
    let rejects = sender.messages_of_type(msg_type::ORDER_CANCEL_REJECT);
    assert_eq!(
        rejects[0].get(tags::TEXT),
        Some("Order cannot be cancelled in current status")
    );
}

#[test]
fn cancel_of_unknown_order_is_rejected() {
    let (orchestrator, sender) = logged_on(quiet_config());
    let cancel = FixMessage::new(msg_type::ORDER_CANCEL_REQUEST)
        .with(tags::ORIG_CL_ORD_ID, "NOPE")
        .with(tags::CL_ORD_ID, "CXL-1")
        .with(tags::SYMBOL, "AAPL")
        .with(tags::SIDE, "1");
    orchestrator.from_app(&cancel, &session());

    let sent = sender.messages();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].msg_type(), msg_type::ORDER_CANCEL_REJECT);
    assert_eq!(sent[0].get(tags::CL_ORD_ID), Some("CXL-1"));
    assert_eq!(sent[0].get(tags::TEXT), Some("Original order not found"));
}

#[test]
fn duplicate_cl_ord_id_is_rejected() {
    let (orchestrator, sender) = logged_on(quiet_config());
    let order = FixMessage::new(msg_type::NEW_ORDER_SINGLE)
        .with(tags::CL_ORD_ID, "DUP")
        .with(tags::SIDE, "1")
        .with(tags::SYMBOL, "AAPL")
        .with(tags::ORDER_QTY, "10")
        .with(tags::ORD_TYPE, "1");
    orchestrator.from_app(&order, &session());
    orchestrator.from_app(&order, &session());

    let sent = sender.messages();
    assert_eq!(sent[0].msg_type(), msg_type::EXECUTION_REPORT);
    assert_eq!(sent[1].get(tags::TEXT), Some("Duplicate ClOrdID"));
    assert_eq!(orchestrator.service().orders().len(), 1);
}

#[test]
fn malformed_request_gets_internal_error_reject() {
    let (orchestrator, sender) = logged_on(quiet_config());
    let broken = FixMessage::parse("8=FIX.4.4|35=G|11=R-1|41=X|55=AAPL|54=1|38=abc|40=2").unwrap();
    orchestrator.from_app(&broken, &session());

    let sent = sender.messages();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].get(tags::CL_ORD_ID), Some("R-1"));
    assert_eq!(sent[0].get(tags::CXL_REJ_RESPONSE_TO), Some("2"));
    assert_eq!(
        sent[0].get(tags::TEXT),
        Some("Internal error processing replace request")
    );
}

#[test]
fn request_without_cl_ord_id_gets_reject_with_empty_id() {
    let (orchestrator, sender) = logged_on(quiet_config());
    let nameless = FixMessage::new(msg_type::NEW_ORDER_SINGLE)
        .with(tags::SIDE, "1")
        .with(tags::SYMBOL, "AAPL")
        .with(tags::ORDER_QTY, "10")
        .with(tags::ORD_TYPE, "1");
    orchestrator.from_app(&nameless, &session());

    let sent = sender.messages();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].get(tags::CL_ORD_ID), Some(""));
    assert_eq!(sent[0].get(tags::TEXT), Some("Internal error processing order"));
    assert!(orchestrator.service().orders().is_empty());
}

#[test]
fn default_account_is_applied() {
    let (orchestrator, sender) = logged_on(quiet_config());
    let order = FixMessage::new(msg_type::NEW_ORDER_SINGLE)
        .with(tags::CL_ORD_ID, "NOACC")
        .with(tags::SIDE, "2")
        .with(tags::SYMBOL, "IBM")
        .with(tags::ORDER_QTY, "5")
        .with(tags::ORD_TYPE, "2")
        .with(tags::PRICE, "101.5");
    orchestrator.from_app(&order, &session());

    assert_eq!(sender.len(), 1);
    let stored = orchestrator
        .service()
        .find_order(&ClOrdId::new("NOACC"))
        .unwrap();
    assert_eq!(stored.account, "DEFAULT_ACCOUNT");
    assert_eq!(stored.price, dec!(101.5));
}

#[test]
fn send_failures_do_not_stop_processing() {
    let (orchestrator, sender) = logged_on(quiet_config());
    sender.set_failing(true);
    let mut sim = CounterpartySimulator::new();

    for step in SCRIPT {
        orchestrator.from_app(&sim.build(step), &session());
    }
    assert_eq!(sender.len(), 5);
    assert_eq!(orchestrator.service().orders().len(), 2);
}

// =============================================================================
// Margin broadcasting
// =============================================================================

#[test]
fn margin_updates_flow_while_logged_on() {
    let (orchestrator, sender) = logged_on(fast_margin_config());
    assert!(orchestrator.is_broadcasting());

    assert!(wait_for(Duration::from_secs(2), || {
        sender.messages_of_type(msg_type::MARGIN_UPDATE).len() >= 2
    }));

    let mut sim = CounterpartySimulator::new();
    let update = sender.messages_of_type(msg_type::MARGIN_UPDATE)[0].clone();
    let CounterpartyEvent::Margin(margin) = sim.handle(&update) else {
        panic!("expected a margin update");
    };
    assert_eq!(margin.account, "ACC-001");
    assert_eq!(margin.currency, "USD");
    assert_eq!(margin.margin_value, dec!(100000));
    assert_eq!(margin.margin_level, dec!(30));
    assert_eq!(margin.margin_excess, dec!(70000));
    assert_eq!(update.get(tags::MARGIN_VALUE), Some("100000.00"));

    let (session_targets, _): (Vec<SessionId>, Vec<FixMessage>) =
        sender.sent().into_iter().unzip();
    assert!(session_targets.iter().all(|s| *s == session()));

    orchestrator.on_logout(&session());
}

#[test]
fn logout_stops_margin_updates() {
    let (orchestrator, sender) = logged_on(fast_margin_config());
    assert!(wait_for(Duration::from_secs(2), || !sender.is_empty()));

    orchestrator.on_logout(&session());
    assert!(!orchestrator.is_active());
    assert!(!orchestrator.is_broadcasting());

    let seen = sender.len();
    thread::sleep(Duration::from_millis(120));
    assert_eq!(sender.len(), seen);
}

#[test]
fn logon_again_after_logout_restarts_broadcast() {
    let (orchestrator, sender) = logged_on(fast_margin_config());
    orchestrator.on_logout(&session());
    sender.take();

    orchestrator.on_logon(&session());
    assert!(orchestrator.is_broadcasting());
    assert!(wait_for(Duration::from_secs(2), || !sender.is_empty()));
    orchestrator.on_logout(&session());
}

#[test]
fn orders_keep_flowing_alongside_margin_updates() {
    let (orchestrator, sender) = logged_on(fast_margin_config());
    let mut sim = CounterpartySimulator::new();

    for step in SCRIPT {
        orchestrator.from_app(&sim.build(step), &session());
        thread::sleep(Duration::from_millis(10));
    }
    orchestrator.on_logout(&session());

    assert_eq!(sender.messages_of_type(msg_type::EXECUTION_REPORT).len(), 3);
    assert_eq!(sender.messages_of_type(msg_type::ORDER_CANCEL_REJECT).len(), 2);
}
