//! XP, level and coin progression for user actions.

pub mod coins;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod levels;
pub mod rewards;

pub use coins::{CoinMilestone, CoinRewardCalculator};
pub use ledger::{ActionType, AwardResult, GamificationLedger, RewardClaim};
pub use levels::{LevelTable, LevelTier, NextLevel, MAX_LEVEL_TITLE};
pub use rewards::RewardTier;
