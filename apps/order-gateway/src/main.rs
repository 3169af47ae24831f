//! Order Gateway Binary
//!
//! Runs the order lifecycle core against a scripted counterparty: opens a
//! session, plays the demo script, prints what comes back and broadcasts
//! margin until stopped.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p order-gateway
//! ```
//!
//! # Environment Variables
//!
//! - `ORDER_GATEWAY_CONFIG`: YAML config path (default: order-gateway.yaml if present)
//! - `RUST_LOG`: Log filter (overrides `logging.level`)

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use parking_lot::Mutex;
use tokio::signal;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use order_gateway::application::services::SessionOrchestrator;
use order_gateway::config;
use order_gateway::domain::order_lifecycle::OrderLifecycleService;
use order_gateway::fix::SessionId;
use order_gateway::infrastructure::simulator::{CounterpartySimulator, SCRIPT};
use order_gateway::infrastructure::transport::{ChannelSender, DEFAULT_CAPACITY, OutboundMessage};
use order_gateway::telemetry::init_tracing;

type Orchestrator = SessionOrchestrator<ChannelSender>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let config = config::load_from_env().context("failed to load configuration")?;
    init_tracing(&config.logging)?;

    let session = config.session.session_id();
    tracing::info!(
        %session,
        margin_enabled = config.margin.enabled,
        default_account = %config.orders.default_account,
        "Starting order gateway"
    );

    let service = Arc::new(OrderLifecycleService::new(config.orders.lifecycle()));
    let (sender, outbound) = ChannelSender::channel(DEFAULT_CAPACITY);
    let orchestrator = Arc::new(SessionOrchestrator::new(
        service,
        Arc::new(sender),
        config.margin.orchestrator(),
    ));
    let simulator = Arc::new(Mutex::new(CounterpartySimulator::new()));

    orchestrator.on_create(&session);
    orchestrator.on_logon(&session);

    let transport = spawn_transport(
        Arc::clone(&orchestrator),
        Arc::clone(&simulator),
        outbound,
    );
    let script = spawn_script(
        Arc::clone(&orchestrator),
        Arc::clone(&simulator),
        session.clone(),
        config.demo.script_delay(),
    );

    tracing::info!("Order gateway ready");
    shutdown_signal(config.demo.run_for()).await;

    script.abort();
    let logout = Arc::clone(&orchestrator);
    let logout_session = session.clone();
    tokio::task::spawn_blocking(move || logout.on_logout(&logout_session))
        .await
        .context("logout task failed")?;
    transport.abort();

    let stats = simulator.lock().stats();
    tracing::info!(
        executions = stats.executions,
        rejects = stats.rejects,
        margin_updates = stats.margin_updates,
        orders = orchestrator.service().orders().len(),
        "Order gateway stopped"
    );
    Ok(())
}

/// Drain the outbound queue and hand each message to the counterparty.
fn spawn_transport(
    orchestrator: Arc<Orchestrator>,
    simulator: Arc<Mutex<CounterpartySimulator>>,
    mut outbound: mpsc::Receiver<OutboundMessage>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(OutboundMessage { session, message }) = outbound.recv().await {
            orchestrator.to_app(&message, &session);
            tracing::debug!(
                counterparty = %session.reversed(),
                msg_type = message.msg_type(),
                "Delivered to counterparty"
            );
            let _ = simulator.lock().handle(&message);
        }
        tracing::debug!("Outbound queue closed");
    })
}

/// Play the demo script, one request per delay.
fn spawn_script(
    orchestrator: Arc<Orchestrator>,
    simulator: Arc<Mutex<CounterpartySimulator>>,
    session: SessionId,
    delay: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        for step in SCRIPT {
            tokio::time::sleep(delay).await;
            let request = simulator.lock().build(step);
            orchestrator.from_app(&request, &session);
        }
        tracing::info!(steps = SCRIPT.len(), "Demo script complete");
    })
}

/// Load .env file from current directory or any ancestor directory.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Wait for Ctrl+C, SIGTERM or the configured run limit.
async fn shutdown_signal(run_for: Option<Duration>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let deadline = async {
        match run_for {
            Some(limit) => tokio::time::sleep(limit).await,
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
        () = deadline => tracing::info!("Run limit reached, shutting down"),
    }
}
