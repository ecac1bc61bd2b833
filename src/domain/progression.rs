use serde::{Deserialize, Serialize};

use crate::{domain::common::UserId, ledger::levels::LevelTable};

/// Period-independent XP and coin state of a user.
///
/// The level title is always derived from `xp_points`; it is never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionState {
    pub xp_points: u64,
    pub coin_balance: u64,
}

impl ProgressionState {
    pub fn new(xp_points: u64, coin_balance: u64) -> Self {
        Self {
            xp_points,
            coin_balance,
        }
    }

    pub fn level_title(&self) -> &'static str {
        LevelTable::level_for(self.xp_points)
    }
}

/// What the user-profile collaborator returns for a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    pub monthly_budget: f64,
    pub monthly_income: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_limit: Option<f64>,
    #[serde(default)]
    pub progression: ProgressionState,
}

impl UserProfile {
    pub fn new(user_id: UserId, monthly_budget: f64, monthly_income: f64) -> Self {
        Self {
            user_id,
            monthly_budget,
            monthly_income,
            daily_limit: None,
            progression: ProgressionState::default(),
        }
    }

    pub fn with_daily_limit(mut self, limit: f64) -> Self {
        self.daily_limit = Some(limit);
        self
    }

    pub fn with_progression(mut self, progression: ProgressionState) -> Self {
        self.progression = progression;
        self
    }
}
