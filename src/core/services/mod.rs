pub mod forecast_service;
pub mod notification_service;
pub mod snapshot_service;

pub use forecast_service::{
    DangerLevel, ForecastCalculator, ForecastResult, Projection, ProjectionPoint,
    MIN_FORECAST_DAYS,
};
pub use notification_service::{NotificationRuleEvaluator, RuleContext};
pub use snapshot_service::{week_start, EvaluationInput, Period, PeriodActivity, SnapshotService};
