use std::{sync::Arc, time::Duration};

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, info};

use super::registry::ConnectionRegistry;

/// Periodically pings every registered connection and prunes the silent ones.
pub struct HeartbeatMonitor {
    registry: Arc<ConnectionRegistry>,
    interval: Duration,
}

impl HeartbeatMonitor {
    pub fn new(registry: Arc<ConnectionRegistry>, interval: Duration) -> Self {
        Self { registry, interval }
    }

    /// Runs one sweep; the interval doubles as the pong deadline.
    pub async fn sweep(&self) -> usize {
        self.registry.sweep_heartbeats(self.interval).await
    }

    pub fn start(self) -> HeartbeatHandle {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        info!("heartbeat monitor received shutdown signal");
                        break;
                    }
                    _ = ticker.tick() => {
                        let pruned = self.sweep().await;
                        if pruned > 0 {
                            debug!(pruned, "heartbeat sweep pruned connections");
                        }
                    }
                }
            }
        });
        HeartbeatHandle {
            shutdown_tx,
            task: Some(task),
        }
    }
}

/// Owned handle to the running monitor.
pub struct HeartbeatHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: Option<JoinHandle<()>>,
}

impl HeartbeatHandle {
    /// Stops the loop and waits for an in-flight sweep to finish.
    pub async fn shutdown(mut self) {
        let _ = self.shutdown_tx.send(()).await;
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for HeartbeatHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
