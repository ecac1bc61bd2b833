use serde::Serialize;

use crate::utils::numeric::finite_or_zero;

/// Amount-tiered coin rewards for scanned receipts and logged expenses.
pub struct CoinRewardCalculator;

impl CoinRewardCalculator {
    /// Coins earned for an expense of `amount`.
    ///
    /// `<50 → 1`, `<100 → 5`, `<500 → 10`, `<1000 → 15`, then 15 more for every
    /// full 500 above 1000.
    pub fn coins_for(amount: f64) -> u64 {
        let amount = finite_or_zero(amount).max(0.0);
        if amount < 50.0 {
            1
        } else if amount < 100.0 {
            5
        } else if amount < 500.0 {
            10
        } else if amount < 1000.0 {
            15
        } else {
            let extra_steps = ((amount - 1000.0) / 500.0).floor() as u64;
            15u64.saturating_add(extra_steps.saturating_mul(15))
        }
    }
}

/// A coin balance worth celebrating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CoinMilestone {
    pub coins: u64,
    pub name: &'static str,
    pub reward: &'static str,
}

const MILESTONES: [CoinMilestone; 4] = [
    CoinMilestone {
        coins: 100,
        name: "🥉 Bronze",
        reward: "1 coffee coupon",
    },
    CoinMilestone {
        coins: 200,
        name: "🥈 Silver",
        reward: "3 coffee coupons",
    },
    CoinMilestone {
        coins: 500,
        name: "🥇 Gold",
        reward: "5 AZN cash reward",
    },
    CoinMilestone {
        coins: 5000,
        name: "💎 Platinum",
        reward: "1 month premium + 20 AZN",
    },
];

impl CoinMilestone {
    /// The milestone sitting exactly at `balance`, if any.
    pub fn at(balance: u64) -> Option<&'static CoinMilestone> {
        MILESTONES.iter().find(|milestone| milestone.coins == balance)
    }

    pub fn all() -> &'static [CoinMilestone] {
        &MILESTONES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bracket_edges() {
        assert_eq!(CoinRewardCalculator::coins_for(0.0), 1);
        assert_eq!(CoinRewardCalculator::coins_for(49.99), 1);
        assert_eq!(CoinRewardCalculator::coins_for(50.0), 5);
        assert_eq!(CoinRewardCalculator::coins_for(99.99), 5);
        assert_eq!(CoinRewardCalculator::coins_for(100.0), 10);
        assert_eq!(CoinRewardCalculator::coins_for(499.99), 10);
        assert_eq!(CoinRewardCalculator::coins_for(999.99), 15);
        assert_eq!(CoinRewardCalculator::coins_for(1000.0), 15);
        assert_eq!(CoinRewardCalculator::coins_for(1499.99), 15);
        assert_eq!(CoinRewardCalculator::coins_for(1500.0), 30);
        assert_eq!(CoinRewardCalculator::coins_for(2600.0), 60);
    }

    #[test]
    fn garbage_amounts_earn_the_minimum() {
        assert_eq!(CoinRewardCalculator::coins_for(-20.0), 1);
        assert_eq!(CoinRewardCalculator::coins_for(f64::NAN), 1);
    }

    #[test]
    fn milestones_match_exact_balances_only() {
        assert_eq!(CoinMilestone::at(200).map(|m| m.name), Some("🥈 Silver"));
        assert!(CoinMilestone::at(201).is_none());
    }
}
