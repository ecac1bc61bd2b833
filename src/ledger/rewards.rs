use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;

/// Redeemable rewards and their coin prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl RewardTier {
    pub const ALL: [RewardTier; 4] = [
        RewardTier::Bronze,
        RewardTier::Silver,
        RewardTier::Gold,
        RewardTier::Platinum,
    ];

    pub fn cost(self) -> u64 {
        match self {
            RewardTier::Bronze => 150,
            RewardTier::Silver => 300,
            RewardTier::Gold => 500,
            RewardTier::Platinum => 2000,
        }
    }

    pub fn reward_name(self) -> &'static str {
        match self {
            RewardTier::Bronze => "Coffee coupon",
            RewardTier::Silver => "Coffee pack",
            RewardTier::Gold => "Cash reward - 10 AZN",
            RewardTier::Platinum => "Premium pack",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            RewardTier::Bronze => "bronze",
            RewardTier::Silver => "silver",
            RewardTier::Gold => "gold",
            RewardTier::Platinum => "platinum",
        }
    }
}

impl fmt::Display for RewardTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for RewardTier {
    type Err = LedgerError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim().to_ascii_lowercase();
        RewardTier::ALL
            .into_iter()
            .find(|tier| tier.key() == wanted)
            .ok_or_else(|| LedgerError::UnknownReward(raw.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Gold".parse::<RewardTier>().unwrap(), RewardTier::Gold);
        assert_eq!(" platinum ".parse::<RewardTier>().unwrap(), RewardTier::Platinum);
    }

    #[test]
    fn unknown_reward_is_an_error() {
        let err = "diamond".parse::<RewardTier>().unwrap_err();
        assert_eq!(err, LedgerError::UnknownReward("diamond".into()));
    }
}
