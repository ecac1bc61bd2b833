use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::info;

use crate::{
    config::EngineConfig,
    core::services::NotificationRuleEvaluator,
    errors::Result,
    ledger::GamificationLedger,
    realtime::{
        AlertDispatcher, ConnectionRegistry, HeartbeatHandle, HeartbeatMonitor, SchedulerHandle,
        SuggestionScheduler,
    },
    storage::{ProfileStore, TransactionSource},
};

/// Process-level owner of the registry, dispatcher and background loops.
pub struct InsightEngine {
    config: EngineConfig,
    registry: Arc<ConnectionRegistry>,
    dispatcher: Arc<AlertDispatcher>,
    scheduler: Option<SchedulerHandle>,
    heartbeat: Option<HeartbeatHandle>,
}

impl InsightEngine {
    pub fn new(
        config: EngineConfig,
        transactions: Arc<dyn TransactionSource>,
        profiles: Arc<dyn ProfileStore>,
    ) -> Result<Self> {
        config.validate()?;
        let registry = Arc::new(ConnectionRegistry::new(config.send_timeout()));
        let dispatcher = Arc::new(AlertDispatcher::new(
            Arc::clone(&registry),
            transactions,
            profiles,
            NotificationRuleEvaluator::new(config.currency.clone()),
            GamificationLedger::from_config(&config),
        ));
        Ok(Self {
            config,
            registry,
            dispatcher,
            scheduler: None,
            heartbeat: None,
        })
    }

    /// Spawns the suggestion and heartbeat loops. Must run inside a Tokio runtime.
    pub fn start(&mut self) {
        if self.scheduler.is_none() {
            let scheduler = SuggestionScheduler::from_config(Arc::clone(&self.registry), &self.config);
            self.scheduler = Some(scheduler.start());
        }
        if self.heartbeat.is_none() {
            let monitor =
                HeartbeatMonitor::new(Arc::clone(&self.registry), self.config.heartbeat_interval());
            self.heartbeat = Some(monitor.start());
        }
        info!(
            interval_secs = self.config.suggestion_interval_secs,
            heartbeat_secs = self.config.heartbeat_interval_secs,
            "insight engine started"
        );
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.as_ref().is_some_and(SchedulerHandle::is_running)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    pub fn dispatcher(&self) -> &Arc<AlertDispatcher> {
        &self.dispatcher
    }

    /// Reference date used by callers that do not supply their own.
    pub fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    /// Stops both loops, waits for them, then closes every connection.
    pub async fn shutdown(mut self) {
        if let Some(scheduler) = self.scheduler.take() {
            scheduler.shutdown().await;
        }
        if let Some(heartbeat) = self.heartbeat.take() {
            heartbeat.shutdown().await;
        }
        self.registry.shutdown().await;
        info!("insight engine stopped");
    }
}
