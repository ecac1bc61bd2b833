use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::{
    config::EngineConfig,
    domain::{OutboundMessage, UserId},
    utils::numeric::finite_or_zero,
};

use super::{registry::ConnectionRegistry, suggestions};

/// Summary of one scheduler tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TickReport {
    pub users_considered: usize,
    pub selected: usize,
    pub delivered: usize,
}

/// Background loop that occasionally pushes a random suggestion to connected users.
///
/// Output is intentionally random; tests pin it with a seed.
pub struct SuggestionScheduler {
    registry: Arc<ConnectionRegistry>,
    interval: Duration,
    probability: f64,
    rng: Mutex<StdRng>,
}

impl SuggestionScheduler {
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        interval: Duration,
        probability: f64,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            registry,
            interval,
            probability: finite_or_zero(probability).clamp(0.0, 1.0),
            rng: Mutex::new(rng),
        }
    }

    pub fn from_config(registry: Arc<ConnectionRegistry>, config: &EngineConfig) -> Self {
        Self::new(
            registry,
            config.suggestion_interval(),
            config.suggestion_probability,
            config.suggestion_seed,
        )
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    fn pick(&self, users: &[UserId]) -> Vec<(UserId, usize)> {
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut picks = Vec::new();
        for user in users {
            if rng.gen_bool(self.probability) {
                picks.push((*user, rng.gen_range(0..suggestions::pool_size())));
            }
        }
        picks
    }

    /// Rolls once per connected user and delivers the chosen suggestions.
    pub async fn run_tick(&self) -> TickReport {
        let users = self.registry.connected_users();
        let picks = self.pick(&users);

        let mut report = TickReport {
            users_considered: users.len(),
            selected: picks.len(),
            delivered: 0,
        };
        for (user, index) in picks {
            let message = OutboundMessage::single(suggestions::suggestion(index));
            match message.to_payload() {
                Ok(payload) => report.delivered += self.registry.broadcast(user, &payload).await,
                Err(err) => warn!(user_id = user, error = %err, "failed to encode suggestion"),
            }
        }
        debug!(
            considered = report.users_considered,
            selected = report.selected,
            delivered = report.delivered,
            "suggestion tick"
        );
        report
    }

    /// Spawns the loop. The first tick fires one full interval after start.
    pub fn start(self) -> SchedulerHandle {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        info!("suggestion scheduler received shutdown signal");
                        break;
                    }
                    _ = ticker.tick() => {
                        self.run_tick().await;
                    }
                }
            }
        });
        SchedulerHandle {
            shutdown_tx,
            task: Some(task),
        }
    }
}

/// Owned handle to the running scheduler loop.
pub struct SchedulerHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: Option<JoinHandle<()>>,
}

impl SchedulerHandle {
    /// Signals the loop to stop and waits for any in-flight tick to finish.
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

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
