mod common;

use std::collections::BTreeMap;

use common::{date, expense};
use finmate_core::core::services::{DangerLevel, ForecastCalculator};
use finmate_core::domain::FinancialSnapshot;

#[test]
fn twenty_days_at_850_projects_past_the_budget() {
    let transactions: Vec<_> = (1..=20)
        .map(|day| expense(42.5, "Food", date(2024, 4, day)))
        .collect();
    let result = ForecastCalculator::forecast(&transactions, 1000.0, 20, 30);

    assert!(result.sufficient_data);
    assert_eq!(result.current_spending, 850.0);
    let projection = result.projection.as_ref().expect("projection present");
    assert_eq!(projection.daily_average, 42.5);
    assert_eq!(projection.projected_total, 1275.0);
    assert_eq!(projection.danger_level, DangerLevel::Danger);
}

#[test]
fn slow_month_is_safe() {
    let result = ForecastCalculator::forecast_total(400.0, 1000.0, 25, 30);
    assert_eq!(result.danger_level(), Some(DangerLevel::Safe));
    let projection = result.projection.unwrap();
    assert_eq!(projection.suggested_daily_limit, 120.0);
    assert_eq!(projection.overspend_amount, 0.0);
}

#[test]
fn first_two_days_never_project() {
    for days in 0..3 {
        let result = ForecastCalculator::forecast_total(500.0, 1000.0, days, 31);
        assert!(!result.sufficient_data, "day {days} must be insufficient");
        assert!(result.projection.is_none());
        assert!(ForecastCalculator::projection_points(&result).is_empty());
    }
}

#[test]
fn snapshot_and_raw_totals_agree() {
    let mut categories = BTreeMap::new();
    categories.insert("Food".to_string(), 300.0);
    let snapshot = FinancialSnapshot::new(300.0, 900.0, 1500.0, 10, 30, categories).unwrap();
    assert_eq!(
        ForecastCalculator::from_snapshot(&snapshot),
        ForecastCalculator::forecast_total(300.0, 900.0, 10, 30)
    );
}

#[test]
fn serialized_result_omits_projection_when_insufficient() {
    let early = ForecastCalculator::forecast_total(50.0, 1000.0, 1, 30);
    let json = serde_json::to_value(&early).unwrap();
    assert_eq!(json["sufficient_data"], false);
    assert_eq!(json["current_spending"], 50.0);
    assert!(json.get("projected_total").is_none());

    let later = ForecastCalculator::forecast_total(50.0, 1000.0, 5, 30);
    let json = serde_json::to_value(&later).unwrap();
    assert_eq!(json["danger_level"], "safe");
    assert_eq!(json["projected_total"], 300.0);
}
