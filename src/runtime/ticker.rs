//! Tokio tick driver that advances the scheduler on a fixed interval.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::core::{BillingSink, RoomProvider, SchedulerEngine};

/// Handle for a running tick loop. Dropping the handle does not stop the
/// loop; call [`TickerHandle::shutdown`].
pub struct TickerHandle {
    stop_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl TickerHandle {
    /// Signal the loop to stop and wait for it to finish.
    pub async fn shutdown(self) {
        let _ = self.stop_tx.send(true);
        let _ = self.join.await;
    }
}

/// Spawn a background task that calls [`SchedulerEngine::tick`] once per
/// configured interval until shut down.
pub fn spawn_ticker<R, B>(engine: Arc<SchedulerEngine<R, B>>) -> TickerHandle
where
    R: RoomProvider + 'static,
    B: BillingSink + 'static,
{
    let interval = Duration::from_secs(engine.config().tick_interval_secs);
    let (stop_tx, mut stop_rx) = watch::channel(false);
    let join = tokio::spawn(async move {
        info!(interval_secs = interval.as_secs(), "tick loop started");
        let mut timer = tokio::time::interval(interval);
        timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first interval tick fires immediately; consume it so the
        // first engine tick lands one full interval after startup.
        timer.tick().await;
        loop {
            tokio::select! {
                _ = timer.tick() => {
                    engine.tick();
                    debug!(now_min = engine.now_min(), "tick advanced");
                }
                _ = stop_rx.changed() => {
                    if *stop_rx.borrow() {
                        break;
                    }
                }
            }
        }
        info!(now_min = engine.now_min(), "tick loop stopped");
    });
    TickerHandle { stop_tx, join }
}
