use std::mem::discriminant;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{ interval, Duration, MissedTickBehavior };

use crate::schedule::WindowStatus;
use crate::services::WithdrawalService;

/// Periodically re-evaluates the withdrawal window so the countdown and
/// open/closed state stay current without a request driving them.
pub struct WindowMonitor {
    withdrawal_service: Arc<WithdrawalService>,
    period: Duration,
}

/// Owns the monitor task. Dropping it stops the task.
pub struct WindowMonitorHandle {
    status: watch::Receiver<Option<WindowStatus>>,
    task: JoinHandle<()>,
}

impl WindowMonitorHandle {
    /// Latest evaluated status, `None` until the first successful check.
    pub fn current(&self) -> Option<WindowStatus> {
        *self.status.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<WindowStatus>> {
        self.status.clone()
    }
}

impl Drop for WindowMonitorHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl WindowMonitor {
    pub fn new(withdrawal_service: Arc<WithdrawalService>, period: Duration) -> Self {
        Self {
            withdrawal_service,
            period,
        }
    }

    pub fn spawn(self) -> WindowMonitorHandle {
        let (tx, rx) = watch::channel(None);
        let task = tokio::spawn(self.run(tx));

        WindowMonitorHandle { status: rx, task }
    }

    async fn run(self, tx: watch::Sender<Option<WindowStatus>>) {
        // First tick completes immediately
        let mut interval = interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;

            match self.withdrawal_service.window_status().await {
                Ok(status) => {
                    let previous = *tx.borrow();
                    if previous.map(|p| discriminant(&p)) != Some(discriminant(&status)) {
                        tracing::info!("Withdrawal window: {}", status.describe());
                    }
                    tx.send_replace(Some(status));
                }
                Err(e) => {
                    tracing::warn!("Window check failed: {}", e);
                }
            }
        }
    }
}
