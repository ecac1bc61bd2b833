use chrono::{Datelike, Duration, NaiveDate, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use finmate_core::core::services::{
    ForecastCalculator, NotificationRuleEvaluator, PeriodActivity, SnapshotService,
};
use finmate_core::domain::{ProgressionState, Transaction, UserProfile};

const CATEGORIES: [&str; 6] = ["Food", "Transport", "Rent", "Shopping", "Health", "Fun"];

fn build_activity(txn_count: usize, reference: NaiveDate) -> PeriodActivity {
    let start = reference.with_day(1).unwrap();
    let mut activity = PeriodActivity::default();
    for idx in 0..txn_count {
        let day = start + Duration::days((idx % 20) as i64);
        let at = Utc
            .from_local_datetime(&day.and_hms_opt(12, 0, 0).unwrap())
            .single()
            .unwrap();
        let mut txn = Transaction::new(
            5.0 + (idx % 90) as f64,
            CATEGORIES[idx % CATEGORIES.len()],
            at,
        );
        if idx % 250 == 0 {
            txn = txn.with_merchant(format!("Subscription {}", idx / 250)).recurring();
        }
        activity.current_expenses.push(txn.clone());
        activity.week_expenses.push(txn);
    }
    activity
}

fn bench_evaluation(c: &mut Criterion) {
    let reference = NaiveDate::from_ymd_opt(2025, 6, 20).unwrap();
    let activity = build_activity(black_box(5_000), reference);
    let profile = UserProfile::new(1, 250_000.0, 300_000.0)
        .with_daily_limit(500.0)
        .with_progression(ProgressionState::new(410, 90));
    let evaluator = NotificationRuleEvaluator::default();

    c.bench_function("assemble_snapshot_5k", |b| {
        b.iter(|| {
            let input = SnapshotService::assemble(&profile, &activity, reference).expect("assemble");
            black_box(input);
        })
    });

    let input = SnapshotService::assemble(&profile, &activity, reference).expect("assemble");

    c.bench_function("forecast_from_snapshot", |b| {
        b.iter(|| black_box(ForecastCalculator::from_snapshot(&input.snapshot)))
    });

    c.bench_function("rule_evaluation", |b| {
        b.iter(|| {
            let alerts = evaluator.evaluate(
                &input.snapshot,
                &input.forecast,
                &input.progression,
                &input.signals,
            );
            black_box(alerts);
        })
    });
}

criterion_group!(benches, bench_evaluation);
criterion_main!(benches);
