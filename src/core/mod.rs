pub mod services;

pub use services::{
    DangerLevel, EvaluationInput, ForecastCalculator, ForecastResult, NotificationRuleEvaluator,
    SnapshotService,
};
