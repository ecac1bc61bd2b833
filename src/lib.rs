#![doc(test(attr(deny(warnings))))]

//! FinMate Core: spending forecasts, rule-based financial alerts, XP/coin
//! progression, and realtime alert delivery to live client connections.

pub mod config;
pub mod core;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod ledger;
pub mod realtime;
pub mod storage;
pub mod utils;

pub use config::{ConfigManager, EngineConfig};
pub use crate::core::services::{
    DangerLevel, EvaluationInput, ForecastCalculator, ForecastResult, NotificationRuleEvaluator,
    SnapshotService,
};
pub use domain::{Alert, AlertColor, FinancialSnapshot, OutboundMessage, ProgressionState};
pub use engine::InsightEngine;
pub use errors::{EngineError, Result};
pub use ledger::{ActionType, CoinRewardCalculator, GamificationLedger, LevelTable};
pub use realtime::{AlertDispatcher, ConnectionRegistry, LiveConnection, SuggestionScheduler};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("FinMate core tracing initialized.");
    });
}
