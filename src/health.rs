use crate::api::{self, HealthResponse};
use crate::config::ApiConfig;
use log::debug;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Latest poll outcome: `None` until the first check completes.
pub type HealthState = Option<Result<HealthResponse, String>>;

/// Background task that polls `GET /health` on a fixed interval,
/// unconditionally re-running regardless of the previous outcome. The first
/// check fires immediately on start.
pub struct HealthMonitor {
    handle: JoinHandle<()>,
    shutdown: watch::Sender<bool>,
    status: watch::Receiver<HealthState>,
}

impl HealthMonitor {
    pub fn start(config: ApiConfig, period: Duration) -> Self {
        let (status_tx, status) = watch::channel(None);
        let (shutdown, mut shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let result = api::health_check(&config)
                            .await
                            .map_err(|e| e.to_string());
                        debug!("health check: {:?}", result.as_ref().map(|r| &r.service));
                        if status_tx.send(Some(result)).is_err() {
                            break; // nobody is watching anymore
                        }
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }
            }
        });
        Self {
            handle,
            shutdown,
            status,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<HealthState> {
        self.status.clone()
    }

    pub fn latest(&self) -> HealthState {
        self.status.borrow().clone()
    }

    /// Signal the poll loop to stop and wait for it to wind down.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.handle.await;
    }
}
