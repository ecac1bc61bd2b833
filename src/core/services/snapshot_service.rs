//! Builds the per-pass evaluation input from the data collaborators.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};

use crate::{
    domain::{
        total_amount, FinancialSnapshot, Income, ProgressionState, SpendingSignals, Transaction,
        UserId, UserProfile,
    },
    errors::{Result, ValidationError},
    storage::{ProfileStore, TransactionSource},
    utils::numeric::finite_or_zero,
};

use super::forecast_service::{ForecastCalculator, ForecastResult};

/// Inclusive calendar-month window containing a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    pub fn containing(date: NaiveDate) -> Result<Self, ValidationError> {
        let start = date.with_day(1).ok_or_else(|| invalid_date(date))?;
        let next_start = if start.month() == 12 {
            NaiveDate::from_ymd_opt(start.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(start.year(), start.month() + 1, 1)
        }
        .ok_or_else(|| invalid_date(date))?;
        Ok(Self {
            start,
            end: next_start - Duration::days(1),
        })
    }

    pub fn previous(&self) -> Result<Self, ValidationError> {
        Self::containing(self.start - Duration::days(1))
    }

    pub fn days(&self) -> u32 {
        self.end.day()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

fn invalid_date(date: NaiveDate) -> ValidationError {
    ValidationError::InvalidValue {
        field: "reference_date".into(),
        message: format!("no calendar month can be derived from {date}"),
    }
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Everything one rule pass needs, recomputed on every call.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationInput {
    pub snapshot: FinancialSnapshot,
    pub signals: SpendingSignals,
    pub forecast: ForecastResult,
    pub progression: ProgressionState,
}

/// Raw collaborator data for one user, fetched for a reference date.
#[derive(Debug, Clone, Default)]
pub struct PeriodActivity {
    pub current_expenses: Vec<Transaction>,
    pub previous_expenses: Vec<Transaction>,
    /// Expenses from the start of the week, which may begin in the previous month.
    pub week_expenses: Vec<Transaction>,
    pub current_income: Vec<Income>,
}

pub struct SnapshotService;

/// Stored profile figures are user input; bad values read as 0 instead of failing the pass.
fn stored_amount(value: f64) -> f64 {
    finite_or_zero(value).max(0.0)
}

impl SnapshotService {
    /// Folds already-fetched activity into a validated evaluation input.
    pub fn assemble(
        profile: &UserProfile,
        activity: &PeriodActivity,
        reference: NaiveDate,
    ) -> Result<EvaluationInput> {
        let period = Period::containing(reference)?;
        let total_spending = total_amount(&activity.current_expenses);
        let effective_budget =
            stored_amount(profile.monthly_budget) + total_amount(&activity.current_income);

        let mut category_totals: BTreeMap<String, f64> = BTreeMap::new();
        for txn in &activity.current_expenses {
            *category_totals.entry(txn.category.clone()).or_default() += txn.amount;
        }

        let snapshot = FinancialSnapshot::new(
            total_spending,
            effective_budget,
            stored_amount(profile.monthly_income),
            reference.day(),
            period.days(),
            category_totals,
        )?;

        let today_total = activity
            .current_expenses
            .iter()
            .filter(|txn| txn.occurred_on() == reference)
            .map(|txn| txn.amount)
            .sum();
        let week_from = week_start(reference);
        let week_total = activity
            .week_expenses
            .iter()
            .filter(|txn| (week_from..=reference).contains(&txn.occurred_on()))
            .map(|txn| txn.amount)
            .sum();
        let active_subscriptions = activity
            .current_expenses
            .iter()
            .chain(&activity.previous_expenses)
            .filter(|txn| txn.is_recurring)
            .map(|txn| txn.label().to_string())
            .collect();

        let signals = SpendingSignals {
            today_total,
            week_total,
            previous_period_total: total_amount(&activity.previous_expenses),
            daily_limit: profile.daily_limit.map(stored_amount),
            active_subscriptions,
        }
        .validated()?;

        let forecast = ForecastCalculator::from_snapshot(&snapshot);

        Ok(EvaluationInput {
            snapshot,
            signals,
            forecast,
            progression: profile.progression,
        })
    }

    /// Queries the collaborators and assembles the input for `user` as of `reference`.
    pub async fn load(
        transactions: &dyn TransactionSource,
        profiles: &dyn ProfileStore,
        user: UserId,
        reference: NaiveDate,
    ) -> Result<EvaluationInput> {
        let profile = profiles.get(user).await?;
        let period = Period::containing(reference)?;
        let previous = period.previous()?;
        let through_today = reference.min(period.end);

        let current_expenses = transactions
            .expenses_between(user, period.start, through_today)
            .await?;
        let previous_expenses = transactions
            .expenses_between(user, previous.start, previous.end)
            .await?;
        let week_expenses = transactions
            .expenses_between(user, week_start(reference), through_today)
            .await?;
        let current_income = transactions
            .income_between(user, period.start, through_today)
            .await?;

        let activity = PeriodActivity {
            current_expenses,
            previous_expenses,
            week_expenses,
            current_income,
        };
        Self::assemble(&profile, &activity, reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn expense(amount: f64, category: &str, on: NaiveDate) -> Transaction {
        let at = Utc
            .with_ymd_and_hms(on.year(), on.month(), on.day(), 9, 30, 0)
            .unwrap();
        Transaction::new(amount, category, at)
    }

    #[test]
    fn period_spans_the_calendar_month() {
        let feb = Period::containing(date(2024, 2, 14)).unwrap();
        assert_eq!(feb.start, date(2024, 2, 1));
        assert_eq!(feb.end, date(2024, 2, 29));
        assert_eq!(feb.days(), 29);

        let dec = Period::containing(date(2023, 12, 31)).unwrap();
        assert_eq!(dec.end, date(2023, 12, 31));
        assert_eq!(dec.previous().unwrap().start, date(2023, 11, 1));

        let jan = Period::containing(date(2024, 1, 5)).unwrap();
        assert_eq!(jan.previous().unwrap().end, date(2023, 12, 31));
    }

    #[test]
    fn week_starts_on_monday() {
        // 2024-03-14 is a Thursday.
        assert_eq!(week_start(date(2024, 3, 14)), date(2024, 3, 11));
        assert_eq!(week_start(date(2024, 3, 11)), date(2024, 3, 11));
    }

    #[test]
    fn assemble_derives_totals_and_signals() {
        let reference = date(2024, 3, 14);
        let profile = UserProfile::new(1, 1000.0, 1500.0).with_daily_limit(80.0);
        let netflix = expense(12.0, "Entertainment", date(2024, 3, 2))
            .with_merchant("Netflix")
            .recurring();
        let activity = PeriodActivity {
            current_expenses: vec![
                netflix.clone(),
                expense(100.0, "Food", date(2024, 3, 12)),
                expense(40.0, "Food", reference),
            ],
            previous_expenses: vec![
                expense(300.0, "Food", date(2024, 2, 20)),
                netflix.clone(),
            ],
            week_expenses: vec![
                expense(100.0, "Food", date(2024, 3, 12)),
                expense(40.0, "Food", reference),
            ],
            current_income: vec![Income::new(
                200.0,
                "Bonus",
                Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap(),
            )],
        };

        let input = SnapshotService::assemble(&profile, &activity, reference).unwrap();
        assert_eq!(input.snapshot.total_spending(), 152.0);
        assert_eq!(input.snapshot.effective_budget(), 1200.0);
        assert_eq!(input.snapshot.days_elapsed(), 14);
        assert_eq!(input.snapshot.days_in_period(), 31);
        assert_eq!(input.snapshot.top_category(), Some(("Food", 140.0)));
        assert_eq!(input.signals.today_total, 40.0);
        assert_eq!(input.signals.week_total, 140.0);
        assert_eq!(input.signals.previous_period_total, 312.0);
        assert_eq!(input.signals.active_subscriptions, vec!["Netflix"]);
        assert!(input.forecast.sufficient_data);
    }

    #[test]
    fn invalid_profile_figures_read_as_zero() {
        let reference = date(2024, 3, 14);
        let profile = UserProfile {
            monthly_income: f64::NAN,
            ..UserProfile::new(1, -100.0, 0.0).with_daily_limit(-5.0)
        };
        let activity = PeriodActivity {
            current_expenses: vec![expense(30.0, "Food", reference)],
            ..PeriodActivity::default()
        };

        let input = SnapshotService::assemble(&profile, &activity, reference).unwrap();
        assert_eq!(input.snapshot.effective_budget(), 0.0);
        assert_eq!(input.snapshot.monthly_income(), 0.0);
        assert_eq!(input.signals.daily_limit, Some(0.0));
        assert_eq!(input.snapshot.total_spending(), 30.0);
    }
}
