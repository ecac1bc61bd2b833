use crate::domain::{Alert, AlertColor};

/// Static pool of promotional suggestions. Never mixed into rule output.
#[rustfmt::skip]
const POOL: [(&str, AlertColor, &str); 8] = [
    ("🛒", AlertColor::Blue,   "You can buy this cheaper at Bravo Market: 15% off right now!"),
    ("💡", AlertColor::Green,  "Saving tip: shopping weekly in this category can save you 20%!"),
    ("🎁", AlertColor::Purple, "Special offer: scan 3 receipts this month to earn bonus coins!"),
    ("📱", AlertColor::Cyan,   "New feature: let the AI advisor optimise your spending and save more!"),
    ("⭐", AlertColor::Yellow, "Congratulations! You scanned 10+ receipts this month. Keep going and earn more coins!"),
    ("🏆", AlertColor::Orange, "You are one of the top savers this month! Congratulations!"),
    ("🔔", AlertColor::Pink,   "Reminder: review your subscriptions, some may be unused and can be cancelled!"),
    ("💎", AlertColor::Indigo, "Premium membership: premium members get exclusive offers and cashback!"),
];

pub fn pool_size() -> usize {
    POOL.len()
}

/// Suggestion at `index`, wrapping around the pool.
pub fn suggestion(index: usize) -> Alert {
    let (icon, color, message) = POOL[index % POOL.len()];
    Alert::new(icon, color, message)
}

pub fn all() -> Vec<Alert> {
    (0..POOL.len()).map(suggestion).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggestions_are_never_warning_tier() {
        assert!(all().iter().all(|alert| !alert.is_critical()));
    }

    #[test]
    fn index_wraps() {
        assert_eq!(suggestion(pool_size()), suggestion(0));
    }
}
