//! Ambient status bar values
//!
//! Two interval tasks publish the clock string and a simulated battery level
//! on a watch channel. Both stop when the shared cancellation token fires.
//! Neither touches navigation or media state.

use hcs_common::time::local_status_clock;
use serde::Serialize;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Values shown in the status bar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBar {
    pub clock: String,
    pub battery_percent: u8,
}

/// Ticker periods and starting battery
#[derive(Debug, Clone, Copy)]
pub struct AmbientSettings {
    pub clock_tick: Duration,
    pub battery_tick: Duration,
    pub battery_start: u8,
}

impl Default for AmbientSettings {
    fn default() -> Self {
        Self {
            clock_tick: Duration::from_millis(1000),
            battery_tick: Duration::from_millis(5000),
            battery_start: 77,
        }
    }
}

/// Running clock and battery tasks
pub struct AmbientTicker {
    rx: watch::Receiver<StatusBar>,
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl AmbientTicker {
    /// Start both tasks on the current runtime
    pub fn spawn(settings: AmbientSettings, cancel: CancellationToken) -> Self {
        let (tx, rx) = watch::channel(StatusBar {
            clock: local_status_clock(),
            battery_percent: settings.battery_start,
        });
        let tx = std::sync::Arc::new(tx);

        let clock_task = {
            let tx = std::sync::Arc::clone(&tx);
            let cancel = cancel.clone();
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(settings.clock_tick);
                interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
                loop {
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = interval.tick() => {
                            let clock = local_status_clock();
                            tx.send_if_modified(|status| {
                                if status.clock == clock {
                                    return false;
                                }
                                status.clock = clock;
                                true
                            });
                        }
                    }
                }
                debug!("Clock ticker stopped");
            })
        };

        let battery_task = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(settings.battery_tick);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                // The first tick completes immediately
                interval.tick().await;
                loop {
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = interval.tick() => {
                            tx.send_modify(|status| {
                                status.battery_percent = status.battery_percent.saturating_sub(1);
                            });
                        }
                    }
                }
                debug!("Battery ticker stopped");
            })
        };

        info!(
            "Ambient ticker started (clock {:?}, battery {:?} from {}%)",
            settings.clock_tick, settings.battery_tick, settings.battery_start
        );

        Self {
            rx,
            cancel,
            tasks: vec![clock_task, battery_task],
        }
    }

    /// Receiver for the renderer loop
    pub fn subscribe(&self) -> watch::Receiver<StatusBar> {
        self.rx.clone()
    }

    pub fn current(&self) -> StatusBar {
        self.rx.borrow().clone()
    }

    /// Cancel both tasks and wait for them to finish
    pub async fn shutdown(self) {
        self.cancel.cancel();
        for task in self.tasks {
            if let Err(e) = task.await {
                warn!("Ambient task ended abnormally: {}", e);
            }
        }
    }
}
