use serde::Serialize;

/// Title reported by [`LevelTable::next_level_for`] once the last tier is reached.
pub const MAX_LEVEL_TITLE: &str = "Max Level";
const MAX_LEVEL_EMOJI: &str = "🏆";

/// One contiguous XP band. `max_xp == None` marks the open-ended last tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelTier {
    pub min_xp: u64,
    pub max_xp: Option<u64>,
    pub title: &'static str,
    pub emoji: &'static str,
}

impl LevelTier {
    pub fn contains(&self, xp: u64) -> bool {
        xp >= self.min_xp && self.max_xp.map_or(true, |max| xp <= max)
    }
}

#[rustfmt::skip]
const TIERS: [LevelTier; 6] = [
    LevelTier { min_xp: 0, max_xp: Some(49), title: "Rookie", emoji: "🌱" },
    LevelTier { min_xp: 50, max_xp: Some(149), title: "Saver", emoji: "💰" },
    LevelTier { min_xp: 150, max_xp: Some(299), title: "Analyst", emoji: "📊" },
    LevelTier { min_xp: 300, max_xp: Some(499), title: "Manager", emoji: "🎯" },
    LevelTier { min_xp: 500, max_xp: Some(999), title: "CFO", emoji: "👑" },
    LevelTier { min_xp: 1000, max_xp: None, title: "Legend", emoji: "⭐" },
];

/// The tier a user advances into next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextLevel {
    pub title: &'static str,
    pub emoji: &'static str,
    pub xp_needed: u64,
    pub min_xp: u64,
}

impl NextLevel {
    pub fn is_max_level(&self) -> bool {
        self.title == MAX_LEVEL_TITLE
    }
}

/// Static XP→level lookup. Tiers are ordered, non-overlapping and cover `[0, ∞)`.
pub struct LevelTable;

impl LevelTable {
    pub fn tiers() -> &'static [LevelTier] {
        &TIERS
    }

    pub fn tier_for(xp: u64) -> &'static LevelTier {
        TIERS
            .iter()
            .rev()
            .find(|tier| tier.min_xp <= xp)
            .unwrap_or(&TIERS[0])
    }

    pub fn level_for(xp: u64) -> &'static str {
        Self::tier_for(xp).title
    }

    /// Progress through the current tier in `[0, 100]`; always 100 in the open-ended tier.
    pub fn progress_within_level(xp: u64) -> f64 {
        let tier = Self::tier_for(xp);
        match tier.max_xp {
            None => 100.0,
            Some(max_xp) => {
                let span = (max_xp - tier.min_xp + 1) as f64;
                let progress = (xp - tier.min_xp) as f64 / span * 100.0;
                progress.clamp(0.0, 100.0)
            }
        }
    }

    pub fn next_level_for(xp: u64) -> NextLevel {
        match TIERS.iter().find(|tier| tier.min_xp > xp) {
            Some(tier) => NextLevel {
                title: tier.title,
                emoji: tier.emoji,
                xp_needed: tier.min_xp - xp,
                min_xp: tier.min_xp,
            },
            None => NextLevel {
                title: MAX_LEVEL_TITLE,
                emoji: MAX_LEVEL_EMOJI,
                xp_needed: 0,
                min_xp: xp,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_are_contiguous() {
        for pair in TIERS.windows(2) {
            let upper = pair[0].max_xp.expect("only the last tier is open-ended");
            assert_eq!(upper + 1, pair[1].min_xp);
        }
        assert_eq!(TIERS[0].min_xp, 0);
        assert!(TIERS[TIERS.len() - 1].max_xp.is_none());
    }

    #[test]
    fn boundaries_map_to_expected_titles() {
        assert_eq!(LevelTable::level_for(0), "Rookie");
        assert_eq!(LevelTable::level_for(49), "Rookie");
        assert_eq!(LevelTable::level_for(50), "Saver");
        assert_eq!(LevelTable::level_for(999), "CFO");
        assert_eq!(LevelTable::level_for(1000), "Legend");
        assert_eq!(LevelTable::level_for(u64::MAX), "Legend");
    }

    #[test]
    fn progress_is_relative_to_tier() {
        assert_eq!(LevelTable::progress_within_level(0), 0.0);
        assert_eq!(LevelTable::progress_within_level(100), 50.0);
        assert_eq!(LevelTable::progress_within_level(5000), 100.0);
    }

    #[test]
    fn next_level_reports_distance_or_sentinel() {
        let next = LevelTable::next_level_for(120);
        assert_eq!(next.title, "Analyst");
        assert_eq!(next.xp_needed, 30);

        let top = LevelTable::next_level_for(1200);
        assert!(top.is_max_level());
        assert_eq!(top.xp_needed, 0);
    }
}
