//! Session Orchestrator
//!
//! Glues the transport's session callbacks to the order lifecycle service
//! and the margin broadcaster.
//!
//! Session state machine:
//!
//! ```text
//! Idle --on_logon--> Active --on_logout--> Idle
//! ```
//!
//! Entering Active records the session identity and starts the margin
//! broadcaster. Leaving Active stops the broadcaster, waiting for its
//! thread, and only then clears the identity. The identity slot and the
//! broadcaster slot have separate locks and neither is held while the
//! broadcaster is joined. Logon and logout are serialized by a third
//! transition lock, which the broadcaster callback never takes.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use super::margin_broadcaster::{BroadcastSchedule, MarginBroadcaster, MarginCallback};
use crate::application::ports::OutboundSender;
use crate::domain::margin::{MarginBroadcastConfig, MarginSource, MarginUpdate};
use crate::domain::order_lifecycle::{Order, OrderLifecycleService, OrderResult, OrderStatus};
use crate::domain::shared::ClOrdId;
use crate::fix::tags;
use crate::fix::translator::{self, InboundRequest, RequestKind};
use crate::fix::{FixMessage, SessionId};

/// Orchestrator configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Start the margin broadcaster on logon.
    pub margin_enabled: bool,
    /// Broadcast timing.
    pub schedule: BroadcastSchedule,
    /// Snapshot parameters.
    pub margin: MarginBroadcastConfig,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            margin_enabled: true,
            schedule: BroadcastSchedule::default(),
            margin: MarginBroadcastConfig::default(),
        }
    }
}

/// Session orchestrator over an outbound sender `S`.
pub struct SessionOrchestrator<S: OutboundSender + 'static> {
    service: Arc<OrderLifecycleService>,
    sender: Arc<S>,
    session: Arc<Mutex<Option<SessionId>>>,
    broadcaster: Mutex<Option<MarginBroadcaster>>,
    transition: Mutex<()>,
    config: OrchestratorConfig,
}

impl<S: OutboundSender + 'static> std::fmt::Debug for SessionOrchestrator<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let broadcasting = self.broadcaster.lock().is_some();
        let session = self.session.lock().clone();
        f.debug_struct("SessionOrchestrator")
            .field("session", &session)
            .field("broadcasting", &broadcasting)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<S: OutboundSender + 'static> SessionOrchestrator<S> {
    /// Create an orchestrator and register its status listener.
    ///
    /// Listeners are never removed, so every orchestrator built over the
    /// same service adds one more logging listener to it.
    #[must_use]
    pub fn new(
        service: Arc<OrderLifecycleService>,
        sender: Arc<S>,
        config: OrchestratorConfig,
    ) -> Self {
        service.subscribe(Arc::new(|order: &Order, status: OrderStatus| {
            debug!(
                order_id = %order.order_id,
                cl_ord_id = %order.cl_ord_id,
                %status,
                "Order status changed"
            );
        }));
        Self {
            service,
            sender,
            session: Arc::new(Mutex::new(None)),
            broadcaster: Mutex::new(None),
            transition: Mutex::new(()),
            config,
        }
    }

    /// The lifecycle service.
    #[must_use]
    pub const fn service(&self) -> &Arc<OrderLifecycleService> {
        &self.service
    }

    /// Returns true while a session is logged on.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.lock().is_some()
    }

    /// The logged-on session, if any.
    #[must_use]
    pub fn active_session(&self) -> Option<SessionId> {
        self.session.lock().clone()
    }

    /// Returns true while the margin broadcaster is running.
    #[must_use]
    pub fn is_broadcasting(&self) -> bool {
        self.broadcaster
            .lock()
            .as_ref()
            .is_some_and(MarginBroadcaster::is_running)
    }

    /// The transport created a session.
    pub fn on_create(&self, session: &SessionId) {
        info!(%session, "Session created");
    }

    /// The session logged on.
    ///
    /// A repeated logon re-records the identity and keeps the running
    /// broadcaster.
    pub fn on_logon(&self, session: &SessionId) {
        let _transition = self.transition.lock();
        info!(%session, "Logon");
        let mut slot = self.broadcaster.lock();
        *self.session.lock() = Some(session.clone());

        if !self.config.margin_enabled {
            return;
        }
        if slot.is_some() {
            debug!(%session, "Margin broadcaster already running");
            return;
        }
        match MarginBroadcaster::start(
            MarginSource::new(self.config.margin.clone()),
            self.config.schedule,
            self.margin_callback(),
        ) {
            Ok(broadcaster) => *slot = Some(broadcaster),
            Err(err) => error!(%session, error = %err, "Failed to start margin broadcaster"),
        }
    }

    /// The session logged out.
    ///
    /// Returns after the broadcaster thread has exited. A logout for a
    /// session other than the active one is ignored.
    pub fn on_logout(&self, session: &SessionId) {
        let _transition = self.transition.lock();
        if self.session.lock().as_ref() != Some(session) {
            warn!(%session, "Logout for inactive session ignored");
            return;
        }
        info!(%session, "Logout");

        let broadcaster = self.broadcaster.lock().take();
        if let Some(mut broadcaster) = broadcaster {
            broadcaster.stop();
        }

        let mut current = self.session.lock();
        if current.as_ref() == Some(session) {
            *current = None;
        }
    }

    /// Outbound admin message.
    pub fn to_admin(&self, message: &FixMessage, session: &SessionId) {
        debug!(%session, %message, "toAdmin");
    }

    /// Inbound admin message.
    pub fn from_admin(&self, message: &FixMessage, session: &SessionId) {
        debug!(%session, %message, "fromAdmin");
    }

    /// Outbound application message.
    pub fn to_app(&self, message: &FixMessage, session: &SessionId) {
        info!(%session, %message, "toApp");
    }

    /// Inbound application message.
    ///
    /// New, Cancel and Replace requests are processed and answered with an
    /// execution report or a reject. Other MsgTypes are dropped.
    pub fn from_app(&self, message: &FixMessage, session: &SessionId) {
        info!(%session, %message, "fromApp");

        let Some(kind) = RequestKind::from_msg_type(message.msg_type()) else {
            warn!(%session, msg_type = message.msg_type(), "Unsupported message type dropped");
            return;
        };

        match translator::decode_request(message) {
            Ok(request) => self.dispatch(request, session),
            Err(err) => {
                error!(%session, error = %err, "Failed to translate request");
                let cl_ord_id = message
                    .get(tags::CL_ORD_ID)
                    .map(ClOrdId::new)
                    .unwrap_or_default();
                self.send_reject(&cl_ord_id, translation_failure_text(kind), kind, session);
            }
        }
    }

    fn dispatch(&self, request: InboundRequest, session: &SessionId) {
        let kind = request.kind();
        let cl_ord_id = request.cl_ord_id().clone();
        let (result, status) = match request {
            InboundRequest::New(order) => {
                info!(
                    cl_ord_id = %order.cl_ord_id,
                    symbol = %order.symbol,
                    quantity = %order.quantity,
                    price = %order.price,
                    "Processing NewOrderSingle"
                );
                (self.service.process_new(order), OrderStatus::New)
            }
            InboundRequest::Cancel {
                order,
                orig_cl_ord_id,
            } => {
                info!(
                    cl_ord_id = %order.cl_ord_id,
                    orig_cl_ord_id = %orig_cl_ord_id,
                    "Processing OrderCancelRequest"
                );
                (
                    self.service.process_cancel(order, &orig_cl_ord_id),
                    OrderStatus::Canceled,
                )
            }
            InboundRequest::Replace {
                order,
                orig_cl_ord_id,
            } => {
                info!(
                    cl_ord_id = %order.cl_ord_id,
                    orig_cl_ord_id = %orig_cl_ord_id,
                    quantity = %order.quantity,
                    price = %order.price,
                    "Processing OrderCancelReplaceRequest"
                );
                (
                    self.service.process_replace(order, &orig_cl_ord_id),
                    OrderStatus::Replaced,
                )
            }
        };
        self.respond(&result, status, &cl_ord_id, kind, session);
    }

    fn respond(
        &self,
        result: &OrderResult,
        status: OrderStatus,
        cl_ord_id: &ClOrdId,
        kind: RequestKind,
        session: &SessionId,
    ) {
        match (&result.exec_id, result.success) {
            (Some(exec_id), true) => {
                info!(
                    cl_ord_id = %cl_ord_id,
                    order_id = %result.order.order_id,
                    ?kind,
                    "Request accepted"
                );
                let report = translator::execution_report(&result.order, exec_id, status, status);
                send_logged(self.sender.as_ref(), session, report);
            }
            _ => {
                warn!(cl_ord_id = %cl_ord_id, reason = %result.message, ?kind, "Request rejected");
                self.send_reject(cl_ord_id, &result.message, kind, session);
            }
        }
    }

    fn send_reject(&self, cl_ord_id: &ClOrdId, reason: &str, kind: RequestKind, session: &SessionId) {
        let reject = translator::reject(cl_ord_id, reason, kind);
        send_logged(self.sender.as_ref(), session, reject);
    }

    // Sends to whichever session is active when the snapshot fires.
    fn margin_callback(&self) -> MarginCallback {
        let sender = Arc::clone(&self.sender);
        let session = Arc::clone(&self.session);
        Arc::new(move |update: &MarginUpdate| {
            let Some(target) = session.lock().clone() else {
                return;
            };
            debug!(
                account = %update.account,
                margin_value = %update.margin_value,
                "Broadcasting margin update"
            );
            send_logged(sender.as_ref(), &target, translator::margin_update(update));
        })
    }
}

impl<S: OutboundSender + 'static> Drop for SessionOrchestrator<S> {
    fn drop(&mut self) {
        if let Some(mut broadcaster) = self.broadcaster.lock().take() {
            broadcaster.stop();
        }
    }
}

const fn translation_failure_text(kind: RequestKind) -> &'static str {
    match kind {
        RequestKind::New => "Internal error processing order",
        RequestKind::Cancel => "Internal error processing cancel request",
        RequestKind::Replace => "Internal error processing replace request",
    }
}

// Fire-and-forget: failures are logged and swallowed.
fn send_logged<S: OutboundSender + ?Sized>(sender: &S, session: &SessionId, message: FixMessage) {
    let msg_type = message.msg_type().to_string();
    if let Err(err) = sender.send(session, message) {
        warn!(%session, %msg_type, error = %err, "Send failed");
    }
}
