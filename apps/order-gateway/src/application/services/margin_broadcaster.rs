//! Margin Broadcaster
//!
//! One dedicated thread that emits a margin snapshot every interval while
//! a session is active. The thread sleeps in short ticks and checks its
//! stop flag on each one, so [`MarginBroadcaster::stop`] returns within
//! about one tick.
//!
//! The callback runs on the broadcaster thread with no broadcaster lock
//! held. It must not block for long; it may call `stop()` on its own
//! broadcaster, in which case the thread exits after the callback returns.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::domain::margin::{MarginSource, MarginUpdate};

/// Default time between snapshots.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

/// Default stop-flag polling granularity.
pub const DEFAULT_TICK: Duration = Duration::from_millis(100);

/// Receiver of margin snapshots.
pub type MarginCallback = Arc<dyn Fn(&MarginUpdate) + Send + Sync>;

/// Broadcast timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastSchedule {
    /// Time between snapshots.
    pub interval: Duration,
    /// Sleep granularity between stop-flag checks.
    pub tick: Duration,
}

impl Default for BroadcastSchedule {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            tick: DEFAULT_TICK,
        }
    }
}

/// Broadcaster errors.
#[derive(Debug, thiserror::Error)]
pub enum BroadcasterError {
    /// The OS refused to spawn the thread.
    #[error("failed to spawn margin broadcaster thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// Tick must be non-zero.
    #[error("broadcast tick must be non-zero")]
    ZeroTick,
}

/// Handle to a running broadcaster thread.
#[derive(Debug)]
pub struct MarginBroadcaster {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl MarginBroadcaster {
    /// Spawn the broadcaster thread.
    ///
    /// # Errors
    ///
    /// Returns [`BroadcasterError`] if the tick is zero or the thread
    /// cannot be spawned.
    pub fn start(
        mut source: MarginSource,
        schedule: BroadcastSchedule,
        callback: MarginCallback,
    ) -> Result<Self, BroadcasterError> {
        if schedule.tick.is_zero() {
            return Err(BroadcasterError::ZeroTick);
        }

        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let handle = thread::Builder::new()
            .name("margin-broadcaster".to_string())
            .spawn(move || {
                debug!(interval = ?schedule.interval, "Margin broadcaster running");
                while wait_interval(&flag, schedule) {
                    let update = source.next_snapshot();
                    callback(&update);
                }
                debug!("Margin broadcaster exiting");
            })?;

        info!(interval = ?schedule.interval, "Margin broadcaster started");
        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    /// Returns true until the broadcaster has been stopped.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.is_some() && !self.stop.load(Ordering::Acquire)
    }

    /// Stop the broadcaster and wait for its thread to exit.
    ///
    /// No callback fires after this returns, except when called from the
    /// callback itself: the join is skipped and the thread exits once the
    /// callback returns. Idempotent.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Release);
        let Some(handle) = self.handle.take() else {
            return;
        };
        if handle.thread().id() == thread::current().id() {
            debug!("Margin broadcaster stopped from its own thread");
            return;
        }
        if handle.join().is_err() {
            warn!("Margin broadcaster thread panicked");
        }
        info!("Margin broadcaster stopped");
    }
}

impl Drop for MarginBroadcaster {
    fn drop(&mut self) {
        self.stop();
    }
}

// Sleep one interval in ticks. Returns false as soon as stop is observed.
fn wait_interval(stop: &AtomicBool, schedule: BroadcastSchedule) -> bool {
    let mut waited = Duration::ZERO;
    while waited < schedule.interval {
        if stop.load(Ordering::Acquire) {
            return false;
        }
        thread::sleep(schedule.tick);
        waited += schedule.tick;
    }
    !stop.load(Ordering::Acquire)
}
