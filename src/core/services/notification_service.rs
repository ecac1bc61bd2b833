//! Deterministic rule pass that turns a financial snapshot into an ordered alert list.
//!
//! Both the polling query path and the realtime push path call
//! [`NotificationRuleEvaluator::evaluate`]; there is no second copy of the rules.

use crate::domain::{Alert, AlertColor, FinancialSnapshot, ProgressionState, SpendingSignals};
use crate::utils::numeric::{percentage, ratio, round2};

use super::forecast_service::ForecastResult;

const BUDGET_EXCEEDED_PCT: f64 = 100.0;
const BUDGET_APPROACHING_PCT: f64 = 80.0;
const DAILY_LIMIT_APPROACHING_RATIO: f64 = 0.9;
const TREND_THRESHOLD_PCT: f64 = 15.0;
const XP_MILESTONE_STEP: u64 = 100;
const XP_MILESTONE_WINDOW: u64 = 20;
const EARLY_MONTH_DAYS: u32 = 10;
const FIRST_HALF_DAYS: u32 = 15;
const EARLY_HALF_INCOME_RATIO: f64 = 0.5;
const EARLY_WARNING_INCOME_RATIO: f64 = 0.4;
const FIRST_HALF_INCOME_RATIO: f64 = 0.7;
const WEEKS_PER_PERIOD: f64 = 4.0;
const WEEKLY_OVERSHOOT_RATIO: f64 = 1.2;
const CATEGORY_CONCENTRATION_PCT: f64 = 50.0;
const SAVINGS_MIN_DAYS: u32 = 20;
const SAVINGS_INCOME_RATIO: f64 = 0.2;

/// Everything one evaluation pass reads.
pub struct RuleContext<'a> {
    pub snapshot: &'a FinancialSnapshot,
    pub forecast: &'a ForecastResult,
    pub progression: &'a ProgressionState,
    pub signals: &'a SpendingSignals,
    pub currency: &'a str,
}

type Rule = fn(&RuleContext<'_>, &mut Vec<Alert>);

/// Rules in priority order. Each appends independently; none short-circuits another.
const RULES: [Rule; 9] = [
    budget_thresholds,
    daily_limit,
    subscription_reminders,
    month_over_month_trend,
    xp_milestone,
    early_month_income,
    weekly_pace,
    category_concentration,
    savings_opportunity,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRuleEvaluator {
    currency: String,
}

impl Default for NotificationRuleEvaluator {
    fn default() -> Self {
        Self::new("AZN")
    }
}

impl NotificationRuleEvaluator {
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
        }
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Runs every rule in order and appends the fallback when no red/amber alert exists.
    ///
    /// Pure: identical inputs always produce the identical list.
    pub fn evaluate(
        &self,
        snapshot: &FinancialSnapshot,
        forecast: &ForecastResult,
        progression: &ProgressionState,
        signals: &SpendingSignals,
    ) -> Vec<Alert> {
        let ctx = RuleContext {
            snapshot,
            forecast,
            progression,
            signals,
            currency: &self.currency,
        };
        let mut alerts = Vec::new();
        for rule in RULES {
            rule(&ctx, &mut alerts);
        }
        if !alerts.iter().any(Alert::is_critical) {
            alerts.push(Alert::new(
                "✅",
                AlertColor::Green,
                "Your finances look healthy!",
            ));
        }
        alerts
    }
}

fn budget_thresholds(ctx: &RuleContext<'_>, alerts: &mut Vec<Alert>) {
    let used = ctx.snapshot.budget_used_percentage();
    if used >= BUDGET_EXCEEDED_PCT {
        alerts.push(Alert::new(
            "⚠️",
            AlertColor::Red,
            format!("Budget limit exceeded! {used:.0}% used."),
        ));
    } else if used >= BUDGET_APPROACHING_PCT {
        alerts.push(Alert::new(
            "⚡",
            AlertColor::Amber,
            format!("Heads up: you have used {used:.0}% of your budget."),
        ));
    }
}

fn daily_limit(ctx: &RuleContext<'_>, alerts: &mut Vec<Alert>) {
    let Some(limit) = ctx.signals.daily_limit.filter(|limit| *limit > 0.0) else {
        return;
    };
    let today = ctx.signals.today_total;
    let cur = ctx.currency;
    if today > limit {
        alerts.push(Alert::new(
            "⛔",
            AlertColor::Red,
            format!("Daily limit exceeded! You spent {today:.2} {cur} today (limit {limit:.2} {cur})."),
        ));
    } else if today >= limit * DAILY_LIMIT_APPROACHING_RATIO {
        alerts.push(Alert::new(
            "⚡",
            AlertColor::Amber,
            format!("Approaching your daily limit: {today:.2} of {limit:.2} {cur} spent today."),
        ));
    }
}

fn subscription_reminders(ctx: &RuleContext<'_>, alerts: &mut Vec<Alert>) {
    match ctx.signals.active_subscriptions.as_slice() {
        [] => {}
        [only] => alerts.push(Alert::new(
            "🎬",
            AlertColor::Purple,
            format!("Check your {only} subscription."),
        )),
        many => alerts.push(Alert::new(
            "💳",
            AlertColor::Purple,
            format!("You have {} active subscriptions.", many.len()),
        )),
    }
}

fn month_over_month_trend(ctx: &RuleContext<'_>, alerts: &mut Vec<Alert>) {
    let previous = ctx.signals.previous_period_total;
    if previous <= 0.0 {
        return;
    }
    let change = ratio(ctx.snapshot.total_spending() - previous, previous) * 100.0;
    let shown = round2(change.abs());
    if change > TREND_THRESHOLD_PCT {
        alerts.push(Alert::new(
            "📈",
            AlertColor::Blue,
            format!("You are spending {shown:.2}% more than last month."),
        ));
    } else if change < -TREND_THRESHOLD_PCT {
        alerts.push(Alert::new(
            "🎉",
            AlertColor::Green,
            format!("Well done! You spent {shown:.2}% less than last month."),
        ));
    }
}

fn xp_milestone(ctx: &RuleContext<'_>, alerts: &mut Vec<Alert>) {
    let xp = ctx.progression.xp_points;
    if xp == 0 || xp % XP_MILESTONE_STEP >= XP_MILESTONE_WINDOW {
        return;
    }
    let next_milestone = (xp / XP_MILESTONE_STEP + 1) * XP_MILESTONE_STEP;
    let remaining = next_milestone - xp;
    alerts.push(Alert::new(
        "⭐",
        AlertColor::Yellow,
        format!("{remaining} XP to go until {next_milestone} XP!"),
    ));
}

fn early_month_income(ctx: &RuleContext<'_>, alerts: &mut Vec<Alert>) {
    let income = ctx.snapshot.monthly_income();
    if income <= 0.0 {
        return;
    }
    let day = ctx.snapshot.days_elapsed();
    let spent = ctx.snapshot.total_spending();
    let cur = ctx.currency;

    if day <= EARLY_MONTH_DAYS {
        if spent >= income * EARLY_HALF_INCOME_RATIO {
            let allowance = ratio(
                (income - spent).max(0.0),
                f64::from(ctx.snapshot.days_remaining()),
            );
            alerts.push(Alert::new(
                "🚨",
                AlertColor::Red,
                format!(
                    "Half of your income ({spent:.0} {cur}) is gone in the first {EARLY_MONTH_DAYS} days. \
                     Daily allowance for the rest of the month: {allowance:.0} {cur}."
                ),
            ));
        } else if spent >= income * EARLY_WARNING_INCOME_RATIO {
            alerts.push(Alert::new(
                "⚠️",
                AlertColor::Amber,
                format!(
                    "You spent 40% of your income ({spent:.0} {cur}) in the first {EARLY_MONTH_DAYS} days. \
                     Time to start saving!"
                ),
            ));
        }
    }

    if day <= FIRST_HALF_DAYS && spent >= income * FIRST_HALF_INCOME_RATIO {
        alerts.push(Alert::new(
            "🔥",
            AlertColor::Red,
            format!(
                "Danger! 70% of your income ({spent:.0} {cur}) is spent in the first half of the month. \
                 Cut back now!"
            ),
        ));
    }
}

fn weekly_pace(ctx: &RuleContext<'_>, alerts: &mut Vec<Alert>) {
    let income = ctx.snapshot.monthly_income();
    if income <= 0.0 {
        return;
    }
    let weekly_budget = income / WEEKS_PER_PERIOD;
    let week = ctx.signals.week_total;
    let cur = ctx.currency;
    if week > weekly_budget * WEEKLY_OVERSHOOT_RATIO {
        alerts.push(Alert::new(
            "📊",
            AlertColor::Amber,
            format!(
                "This week you passed your weekly budget ({weekly_budget:.0} {cur}) by more than 20%. \
                 Current: {week:.0} {cur}."
            ),
        ));
    }
}

fn category_concentration(ctx: &RuleContext<'_>, alerts: &mut Vec<Alert>) {
    let total = ctx.snapshot.total_spending();
    let Some((category, amount)) = ctx.snapshot.top_category() else {
        return;
    };
    let share = percentage(amount, total);
    let cur = ctx.currency;
    if share > CATEGORY_CONCENTRATION_PCT {
        alerts.push(Alert::new(
            "🎯",
            AlertColor::Blue,
            format!(
                "'{category}' makes up {share:.0}% of your spending ({amount:.0} {cur}). Try to diversify!"
            ),
        ));
    }
}

fn savings_opportunity(ctx: &RuleContext<'_>, alerts: &mut Vec<Alert>) {
    let income = ctx.snapshot.monthly_income();
    if income <= 0.0 || ctx.snapshot.days_elapsed() < SAVINGS_MIN_DAYS {
        return;
    }
    let projected_spend = ctx
        .forecast
        .projected_total()
        .unwrap_or_else(|| ctx.snapshot.total_spending());
    let savings = income - projected_spend;
    let cur = ctx.currency;
    if savings > income * SAVINGS_INCOME_RATIO {
        alerts.push(Alert::new(
            "💰",
            AlertColor::Green,
            format!("Great! You can save {savings:.0} {cur} this month. Add it to a dream!"),
        ));
    }
}
