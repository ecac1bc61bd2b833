//! End-of-period spending projection from partial-month history.

use serde::{Deserialize, Serialize};

use crate::domain::{total_amount, FinancialSnapshot, Transaction};
use crate::utils::numeric::{finite_or_zero, percentage, round2};

/// Fewer elapsed days than this withholds every projective figure.
pub const MIN_FORECAST_DAYS: u32 = 3;
const WARNING_RATIO: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DangerLevel {
    Safe,
    Warning,
    Danger,
}

/// Projective figures, only present once enough days have elapsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub daily_average: f64,
    pub projected_total: f64,
    pub days_remaining: u32,
    pub days_in_period: u32,
    pub danger_level: DangerLevel,
    pub suggested_daily_limit: f64,
    pub overspend_amount: f64,
    pub budget_used_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub current_spending: f64,
    pub effective_budget: f64,
    pub days_elapsed: u32,
    pub sufficient_data: bool,
    #[serde(flatten)]
    pub projection: Option<Projection>,
}

impl ForecastResult {
    pub fn danger_level(&self) -> Option<DangerLevel> {
        self.projection.as_ref().map(|p| p.danger_level)
    }

    pub fn projected_total(&self) -> Option<f64> {
        self.projection.as_ref().map(|p| p.projected_total)
    }
}

/// One point of the projected cumulative-spend curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    pub day: u32,
    pub projected_amount: f64,
}

pub struct ForecastCalculator;

impl ForecastCalculator {
    pub fn forecast(
        transactions: &[Transaction],
        effective_budget: f64,
        days_elapsed: u32,
        days_in_period: u32,
    ) -> ForecastResult {
        Self::forecast_total(
            total_amount(transactions),
            effective_budget,
            days_elapsed,
            days_in_period,
        )
    }

    pub fn from_snapshot(snapshot: &FinancialSnapshot) -> ForecastResult {
        Self::forecast_total(
            snapshot.total_spending(),
            snapshot.effective_budget(),
            snapshot.days_elapsed(),
            snapshot.days_in_period(),
        )
    }

    /// Projects `total_spending` to the end of the period.
    ///
    /// Classification uses unrounded figures; reported figures are rounded to
    /// two decimals and always finite.
    pub fn forecast_total(
        total_spending: f64,
        effective_budget: f64,
        days_elapsed: u32,
        days_in_period: u32,
    ) -> ForecastResult {
        let total_spending = finite_or_zero(total_spending).max(0.0);
        let effective_budget = finite_or_zero(effective_budget);

        if days_elapsed < MIN_FORECAST_DAYS {
            return ForecastResult {
                current_spending: round2(total_spending),
                effective_budget: round2(effective_budget),
                days_elapsed,
                sufficient_data: false,
                projection: None,
            };
        }

        let days_remaining = days_in_period.saturating_sub(days_elapsed);
        let daily_average = total_spending / f64::from(days_elapsed);
        let projected_total = total_spending + daily_average * f64::from(days_remaining);

        let danger_level = if projected_total > effective_budget {
            DangerLevel::Danger
        } else if projected_total > effective_budget * WARNING_RATIO {
            DangerLevel::Warning
        } else {
            DangerLevel::Safe
        };

        let suggested_daily_limit = if days_remaining > 0 {
            ((effective_budget - total_spending) / f64::from(days_remaining)).max(0.0)
        } else {
            0.0
        };

        ForecastResult {
            current_spending: round2(total_spending),
            effective_budget: round2(effective_budget),
            days_elapsed,
            sufficient_data: true,
            projection: Some(Projection {
                daily_average: round2(daily_average),
                projected_total: round2(projected_total),
                days_remaining,
                days_in_period,
                danger_level,
                suggested_daily_limit: round2(suggested_daily_limit),
                overspend_amount: round2((projected_total - effective_budget).max(0.0)),
                budget_used_percentage: round2(percentage(total_spending, effective_budget)),
            }),
        }
    }

    /// Cumulative projected spend for each remaining day; empty without sufficient data.
    pub fn projection_points(forecast: &ForecastResult) -> Vec<ProjectionPoint> {
        let Some(projection) = forecast.projection.as_ref() else {
            return Vec::new();
        };
        ((forecast.days_elapsed + 1)..=projection.days_in_period)
            .map(|day| ProjectionPoint {
                day,
                projected_amount: round2(
                    forecast.current_spending
                        + projection.daily_average * f64::from(day - forecast.days_elapsed),
                ),
            })
            .collect()
    }
}
