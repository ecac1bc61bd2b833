use std::collections::BTreeMap;

use serde::Serialize;

use crate::{errors::ValidationError, utils::numeric::percentage};

/// Derived aggregate of a user's current-period finances.
///
/// Built once per evaluation pass; every amount is checked to be finite and
/// non-negative at construction so rule code can divide without guards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialSnapshot {
    total_spending: f64,
    effective_budget: f64,
    monthly_income: f64,
    days_elapsed: u32,
    days_in_period: u32,
    category_totals: BTreeMap<String, f64>,
}

impl FinancialSnapshot {
    pub fn new(
        total_spending: f64,
        effective_budget: f64,
        monthly_income: f64,
        days_elapsed: u32,
        days_in_period: u32,
        category_totals: BTreeMap<String, f64>,
    ) -> Result<Self, ValidationError> {
        check_amount("total_spending", total_spending)?;
        check_amount("effective_budget", effective_budget)?;
        check_amount("monthly_income", monthly_income)?;
        for (category, amount) in &category_totals {
            check_amount(&format!("category_totals[{category}]"), *amount)?;
        }
        if days_in_period == 0 {
            return Err(ValidationError::InvalidValue {
                field: "days_in_period".into(),
                message: "must be at least 1".into(),
            });
        }
        if days_elapsed > days_in_period {
            return Err(ValidationError::InvalidValue {
                field: "days_elapsed".into(),
                message: format!("{days_elapsed} exceeds the {days_in_period}-day period"),
            });
        }
        Ok(Self {
            total_spending,
            effective_budget,
            monthly_income,
            days_elapsed,
            days_in_period,
            category_totals,
        })
    }

    pub fn total_spending(&self) -> f64 {
        self.total_spending
    }

    /// Base budget plus income recorded this period.
    pub fn effective_budget(&self) -> f64 {
        self.effective_budget
    }

    pub fn monthly_income(&self) -> f64 {
        self.monthly_income
    }

    pub fn days_elapsed(&self) -> u32 {
        self.days_elapsed
    }

    pub fn days_in_period(&self) -> u32 {
        self.days_in_period
    }

    pub fn days_remaining(&self) -> u32 {
        self.days_in_period - self.days_elapsed
    }

    pub fn category_totals(&self) -> &BTreeMap<String, f64> {
        &self.category_totals
    }

    pub fn budget_used_percentage(&self) -> f64 {
        percentage(self.total_spending, self.effective_budget)
    }

    pub fn income_used_percentage(&self) -> f64 {
        percentage(self.total_spending, self.monthly_income)
    }

    /// Largest category by amount; ties resolve to the alphabetically first name.
    pub fn top_category(&self) -> Option<(&str, f64)> {
        self.category_totals
            .iter()
            .fold(None, |best: Option<(&str, f64)>, (name, amount)| match best {
                Some((_, best_amount)) if best_amount >= *amount => best,
                _ => Some((name.as_str(), *amount)),
            })
    }
}

/// Secondary signals the rule pass needs beyond the period totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SpendingSignals {
    pub today_total: f64,
    pub week_total: f64,
    pub previous_period_total: f64,
    pub daily_limit: Option<f64>,
    /// Names of active recurring charges, sorted and deduplicated.
    pub active_subscriptions: Vec<String>,
}

impl SpendingSignals {
    pub fn validated(mut self) -> Result<Self, ValidationError> {
        check_amount("today_total", self.today_total)?;
        check_amount("week_total", self.week_total)?;
        check_amount("previous_period_total", self.previous_period_total)?;
        if let Some(limit) = self.daily_limit {
            check_amount("daily_limit", limit)?;
        }
        self.active_subscriptions.sort();
        self.active_subscriptions.dedup();
        Ok(self)
    }
}

fn check_amount(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NegativeAmount {
            field: field.to_string(),
            value,
        })
    }
}
