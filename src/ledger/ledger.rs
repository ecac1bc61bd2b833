use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    config::EngineConfig,
    domain::ProgressionState,
    errors::LedgerError,
};

use super::{
    coins::{CoinMilestone, CoinRewardCalculator},
    levels::LevelTable,
    rewards::RewardTier,
};

const DEFAULT_LEVEL_UP_BONUS: u64 = 10;

/// User actions that earn experience points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    ManualExpense,
    ScanReceipt,
    ChatMessage,
    StayUnderBudget,
    DailyLogin,
    WeekStreak,
    MonthComplete,
    CreateDream,
    CompleteDream,
    AddSavings,
    VoiceCommand,
}

impl ActionType {
    pub fn xp(self) -> u64 {
        match self {
            ActionType::ManualExpense => 10,
            ActionType::ScanReceipt => 15,
            ActionType::ChatMessage => 5,
            ActionType::StayUnderBudget => 100,
            ActionType::DailyLogin => 20,
            ActionType::WeekStreak => 50,
            ActionType::MonthComplete => 200,
            ActionType::CreateDream => 25,
            ActionType::CompleteDream => 100,
            ActionType::AddSavings => 5,
            ActionType::VoiceCommand => 15,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            ActionType::ManualExpense => "manual_expense",
            ActionType::ScanReceipt => "scan_receipt",
            ActionType::ChatMessage => "chat_message",
            ActionType::StayUnderBudget => "stay_under_budget",
            ActionType::DailyLogin => "daily_login",
            ActionType::WeekStreak => "week_streak",
            ActionType::MonthComplete => "month_complete",
            ActionType::CreateDream => "create_dream",
            ActionType::CompleteDream => "complete_dream",
            ActionType::AddSavings => "add_savings",
            ActionType::VoiceCommand => "voice_command",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Outcome of applying one action to a progression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AwardResult {
    pub action: ActionType,
    pub xp_awarded: u64,
    pub coins_awarded: u64,
    pub level_up: bool,
    pub old_level: &'static str,
    pub new_level: &'static str,
    pub new_progression: ProgressionState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<CoinMilestone>,
}

/// Receipt for a redeemed reward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewardClaim {
    pub tier: RewardTier,
    pub reward_name: &'static str,
    pub coins_spent: u64,
    pub new_progression: ProgressionState,
}

/// Applies actions to a user's XP/coin state.
///
/// Pure: callers persist `new_progression` and must apply each action instance
/// at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GamificationLedger {
    level_up_bonus_coins: u64,
}

impl Default for GamificationLedger {
    fn default() -> Self {
        Self::new(DEFAULT_LEVEL_UP_BONUS)
    }
}

impl GamificationLedger {
    pub fn new(level_up_bonus_coins: u64) -> Self {
        Self {
            level_up_bonus_coins,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.level_up_bonus_coins)
    }

    pub fn award(&self, progression: &ProgressionState, action: ActionType) -> AwardResult {
        self.award_with_coins(progression, action, 0)
    }

    /// Awards a scanned receipt: action XP plus amount-tiered coins.
    pub fn award_receipt(&self, progression: &ProgressionState, amount: f64) -> AwardResult {
        let coins = CoinRewardCalculator::coins_for(amount);
        self.award_with_coins(progression, ActionType::ScanReceipt, coins)
    }

    /// Awards `action` XP together with `action_coins`, adding the level-up bonus on a tier change.
    pub fn award_with_coins(
        &self,
        progression: &ProgressionState,
        action: ActionType,
        action_coins: u64,
    ) -> AwardResult {
        let xp_awarded = action.xp();
        let new_xp = progression.xp_points.saturating_add(xp_awarded);

        let old_level = LevelTable::level_for(progression.xp_points);
        let new_level = LevelTable::level_for(new_xp);
        let level_up = old_level != new_level;

        let bonus = if level_up { self.level_up_bonus_coins } else { 0 };
        let coins_awarded = action_coins.saturating_add(bonus);
        let new_balance = progression.coin_balance.saturating_add(coins_awarded);

        if level_up {
            tracing::info!(action = %action, old_level, new_level, "level up");
        }

        AwardResult {
            action,
            xp_awarded,
            coins_awarded,
            level_up,
            old_level,
            new_level,
            new_progression: ProgressionState::new(new_xp, new_balance),
            milestone: if coins_awarded > 0 {
                CoinMilestone::at(new_balance).copied()
            } else {
                None
            },
        }
    }

    /// Deducts `amount` coins; fails rather than clamping when the balance is short.
    pub fn spend_coins(
        &self,
        progression: &ProgressionState,
        amount: u64,
    ) -> Result<ProgressionState, LedgerError> {
        let remaining = progression.coin_balance.checked_sub(amount).ok_or(
            LedgerError::InsufficientCoins {
                required: amount,
                available: progression.coin_balance,
            },
        )?;
        Ok(ProgressionState::new(progression.xp_points, remaining))
    }

    pub fn claim_reward(
        &self,
        progression: &ProgressionState,
        tier: RewardTier,
    ) -> Result<RewardClaim, LedgerError> {
        let new_progression = self.spend_coins(progression, tier.cost())?;
        Ok(RewardClaim {
            tier,
            reward_name: tier.reward_name(),
            coins_spent: tier.cost(),
            new_progression,
        })
    }
}
