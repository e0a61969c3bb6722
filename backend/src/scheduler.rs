//! Midnight rollover timer.
//!
//! One background task sleeps until the next local midnight, runs the
//! rollover check against the shared session and broadcasts a
//! [`RefreshEvent`]. The delay is recomputed from the clock before every
//! sleep, so drift and DST changes never accumulate.

use log::{debug, error, info};
use shared::RefreshEvent;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::domain::calendar;
use crate::io::mappers::RefreshMapper;
use crate::storage::KeyValueStore;
use crate::{lock_care, SharedPetCare};

pub struct RolloverScheduler {
    handle: JoinHandle<()>,
}

impl RolloverScheduler {
    /// Start the timer loop on the current tokio runtime
    pub fn spawn<S>(care: SharedPetCare<S>, events: broadcast::Sender<RefreshEvent>) -> Self
    where
        S: KeyValueStore + 'static,
    {
        let clock = lock_care(&care).clock();

        let handle = tokio::spawn(async move {
            loop {
                let now = clock.now();
                let delay = calendar::duration_until_next_midnight(&now);
                debug!(
                    "Rollover timer armed for {} ({:?})",
                    calendar::next_local_midnight(&now),
                    delay
                );
                tokio::time::sleep(delay).await;

                let outcome = lock_care(&care).run_rollover_check();
                match outcome {
                    Ok(outcome) => {
                        info!(
                            "Rollover timer fired for {}: reset_performed={}",
                            calendar::format_day_key(outcome.day),
                            outcome.reset_performed
                        );
                        if events.send(RefreshMapper::rollover_event(&outcome)).is_err() {
                            debug!("No refresh subscribers");
                        }
                    }
                    Err(e) => error!("Rollover check failed: {}", e),
                }
            }
        });

        info!("Rollover scheduler started");
        Self { handle }
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Stop the timer and wait for the task to wind down
    pub async fn shutdown(self) {
        self.handle.abort();
        if let Err(e) = self.handle.await {
            if !e.is_cancelled() {
                error!("Rollover scheduler ended abnormally: {}", e);
            }
        }
        info!("Rollover scheduler stopped");
    }
}
