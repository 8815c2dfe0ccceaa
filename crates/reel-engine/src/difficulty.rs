//! Balance-driven difficulty
//!
//! The player's balance selects one of five bands. Every band except Normal
//! carries a literal weight profile that replaces the runtime weights of every
//! strip; Normal restores the baseline weights. Low balances get easier strips.

use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};
use crate::reel::ReelSet;
use crate::strip::{MAX_SYMBOL_WEIGHT, SymbolWeight, weights_from_slice};
use crate::symbols::SymbolRegistry;

/// Difficulty band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyLevel {
    VeryEasy,
    Easy,
    Normal,
    Hard,
    VeryHard,
}

impl DifficultyLevel {
    /// All levels, easiest first
    pub fn all() -> &'static [DifficultyLevel] {
        &[
            DifficultyLevel::VeryEasy,
            DifficultyLevel::Easy,
            DifficultyLevel::Normal,
            DifficultyLevel::Hard,
            DifficultyLevel::VeryHard,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::VeryEasy => "very easy",
            Self::Easy => "easy",
            Self::Normal => "normal",
            Self::Hard => "hard",
            Self::VeryHard => "very hard",
        }
    }
}

impl std::fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Upper bounds (exclusive) of each band; balances at or above `hard_below`
/// are very hard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyBands {
    pub very_easy_below: u64,
    pub easy_below: u64,
    pub normal_below: u64,
    pub hard_below: u64,
}

impl Default for DifficultyBands {
    fn default() -> Self {
        Self {
            very_easy_below: 100,
            easy_below: 300,
            normal_below: 2000,
            hard_below: 5000,
        }
    }
}

impl DifficultyBands {
    pub fn level_for(&self, balance: u64) -> DifficultyLevel {
        if balance < self.very_easy_below {
            DifficultyLevel::VeryEasy
        } else if balance < self.easy_below {
            DifficultyLevel::Easy
        } else if balance < self.normal_below {
            DifficultyLevel::Normal
        } else if balance < self.hard_below {
            DifficultyLevel::Hard
        } else {
            DifficultyLevel::VeryHard
        }
    }

    pub fn is_ascending(&self) -> bool {
        self.very_easy_below < self.easy_below
            && self.easy_below < self.normal_below
            && self.normal_below < self.hard_below
    }
}

// Literal profiles for symbols 0..=7. Easy profiles pile weight onto the
// common symbols so lines form more often; hard profiles flatten the table.
const VERY_EASY_WEIGHTS: [u32; 8] = [30, 30, 28, 24, 6, 2, 1, 1];
const EASY_WEIGHTS: [u32; 8] = [30, 28, 24, 20, 10, 5, 3, 2];
const HARD_WEIGHTS: [u32; 8] = [22, 20, 18, 16, 15, 14, 10, 7];
const VERY_HARD_WEIGHTS: [u32; 8] = [18, 17, 16, 16, 16, 15, 13, 11];

/// Bands plus the four literal profiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyConfig {
    pub bands: DifficultyBands,
    pub very_easy: Vec<SymbolWeight>,
    pub easy: Vec<SymbolWeight>,
    pub hard: Vec<SymbolWeight>,
    pub very_hard: Vec<SymbolWeight>,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            bands: DifficultyBands::default(),
            very_easy: weights_from_slice(&VERY_EASY_WEIGHTS),
            easy: weights_from_slice(&EASY_WEIGHTS),
            hard: weights_from_slice(&HARD_WEIGHTS),
            very_hard: weights_from_slice(&VERY_HARD_WEIGHTS),
        }
    }
}

impl DifficultyConfig {
    /// Literal profile for a level; None for Normal (baseline weights)
    pub fn profile(&self, level: DifficultyLevel) -> Option<&[SymbolWeight]> {
        match level {
            DifficultyLevel::VeryEasy => Some(&self.very_easy),
            DifficultyLevel::Easy => Some(&self.easy),
            DifficultyLevel::Normal => None,
            DifficultyLevel::Hard => Some(&self.hard),
            DifficultyLevel::VeryHard => Some(&self.very_hard),
        }
    }

    /// Check bands ascend and every profile names exactly the registered
    /// symbols with a positive total weight
    pub fn validate(&self, registry: &SymbolRegistry) -> Result<(), String> {
        if !self.bands.is_ascending() {
            return Err(format!(
                "difficulty bands must be strictly ascending: {:?}",
                self.bands
            ));
        }
        for &level in DifficultyLevel::all() {
            let Some(profile) = self.profile(level) else {
                continue;
            };
            if let Some(sw) = profile.iter().find(|sw| !registry.contains(sw.symbol_id)) {
                return Err(format!(
                    "difficulty profile '{}' names unknown symbol {}",
                    level, sw.symbol_id
                ));
            }
            if let Some(id) = registry
                .ids()
                .find(|id| !profile.iter().any(|sw| sw.symbol_id == *id))
            {
                return Err(format!(
                    "difficulty profile '{}' has no weight for symbol {}",
                    level, id
                ));
            }
            if let Some(sw) = profile.iter().find(|sw| sw.weight > MAX_SYMBOL_WEIGHT) {
                return Err(format!(
                    "difficulty profile '{}': weight {} for symbol {} exceeds {}",
                    level, sw.weight, sw.symbol_id, MAX_SYMBOL_WEIGHT
                ));
            }
            if profile.iter().map(|sw| sw.weight as u64).sum::<u64>() == 0 {
                return Err(format!("difficulty profile '{}' has zero total weight", level));
            }
        }
        Ok(())
    }
}

/// Applies profiles to the strips as the balance moves
#[derive(Debug, Clone)]
pub struct DifficultyController {
    config: DifficultyConfig,
    current: Option<DifficultyLevel>,
}

impl DifficultyController {
    pub fn new(config: DifficultyConfig) -> Self {
        Self {
            config,
            current: None,
        }
    }

    pub fn config(&self) -> &DifficultyConfig {
        &self.config
    }

    /// Level last applied, if any
    pub fn current(&self) -> Option<DifficultyLevel> {
        self.current
    }

    pub fn level_for(&self, balance: u64) -> DifficultyLevel {
        self.config.bands.level_for(balance)
    }

    /// Select the band for `balance` and apply its profile to every strip.
    /// Profile symbols are checked against each strip before any weight is
    /// written, so a failing profile leaves the strips untouched.
    pub fn adjust_for_balance(&mut self, balance: u64, reels: &ReelSet) -> SlotResult<DifficultyLevel> {
        let level = self.level_for(balance);
        let strips = reels.unique_strips();

        match self.config.profile(level) {
            None => {
                for strip in &strips {
                    strip.write().reset_to_original();
                }
            }
            Some(profile) => {
                for strip in &strips {
                    let strip = strip.read();
                    if let Some(sw) = profile
                        .iter()
                        .find(|sw| !strip.weights().iter().any(|w| w.symbol_id == sw.symbol_id))
                    {
                        return Err(SlotError::InvalidSymbol(sw.symbol_id));
                    }
                }
                for strip in &strips {
                    let mut strip = strip.write();
                    for sw in profile {
                        strip.set_weight(sw.symbol_id, sw.weight as i64)?;
                    }
                }
            }
        }

        if self.current != Some(level) {
            log::debug!(
                "difficulty {} -> {} at balance {}",
                self.current.map(|l| l.name()).unwrap_or("none"),
                level,
                balance
            );
        }
        self.current = Some(level);
        Ok(level)
    }

    /// Forget the last applied level
    pub fn reset(&mut self) {
        self.current = None;
    }
}

impl Default for DifficultyController {
    fn default() -> Self {
        Self::new(DifficultyConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strip::STANDARD_WEIGHTS;

    #[test]
    fn test_band_boundaries() {
        let bands = DifficultyBands::default();
        assert_eq!(bands.level_for(0), DifficultyLevel::VeryEasy);
        assert_eq!(bands.level_for(99), DifficultyLevel::VeryEasy);
        assert_eq!(bands.level_for(100), DifficultyLevel::Easy);
        assert_eq!(bands.level_for(299), DifficultyLevel::Easy);
        assert_eq!(bands.level_for(300), DifficultyLevel::Normal);
        assert_eq!(bands.level_for(1000), DifficultyLevel::Normal);
        assert_eq!(bands.level_for(2000), DifficultyLevel::Hard);
        assert_eq!(bands.level_for(5000), DifficultyLevel::VeryHard);
        assert_eq!(bands.level_for(u64::MAX), DifficultyLevel::VeryHard);
    }

    #[test]
    fn test_profiles_keep_positive_weight() {
        let config = DifficultyConfig::default();
        assert!(config.validate(&SymbolRegistry::standard()).is_ok());
        assert!(config.profile(DifficultyLevel::Normal).is_none());
    }

    #[test]
    fn test_adjust_applies_profile_then_restores() {
        let reels = ReelSet::standard(0);
        let mut controller = DifficultyController::default();

        let level = controller.adjust_for_balance(50, &reels).unwrap();
        assert_eq!(level, DifficultyLevel::VeryEasy);
        for strip in reels.unique_strips() {
            let strip = strip.read();
            let weights: Vec<u32> = strip.weights().iter().map(|sw| sw.weight).collect();
            assert_eq!(weights, VERY_EASY_WEIGHTS.to_vec());
        }

        controller.adjust_for_balance(1000, &reels).unwrap();
        assert_eq!(controller.current(), Some(DifficultyLevel::Normal));
        for strip in reels.unique_strips() {
            let strip = strip.read();
            let weights: Vec<u32> = strip.weights().iter().map(|sw| sw.weight).collect();
            assert_eq!(weights, STANDARD_WEIGHTS.to_vec());
            assert!(strip.is_baseline());
        }
    }

    #[test]
    fn test_adjust_is_idempotent() {
        let reels = ReelSet::standard(0);
        let mut controller = DifficultyController::default();

        controller.adjust_for_balance(6000, &reels).unwrap();
        let first: Vec<SymbolWeight> = reels.reels()[0].strip().read().weights().to_vec();
        controller.adjust_for_balance(7000, &reels).unwrap();
        let second: Vec<SymbolWeight> = reels.reels()[0].strip().read().weights().to_vec();

        assert_eq!(first, second);
        assert_eq!(controller.current(), Some(DifficultyLevel::VeryHard));
    }

    #[test]
    fn test_unknown_profile_symbol_leaves_strips_untouched() {
        let reels = ReelSet::standard(0);
        let mut controller = DifficultyController::new(DifficultyConfig {
            easy: vec![SymbolWeight::new(0, 5), SymbolWeight::new(42, 5)],
            ..DifficultyConfig::default()
        });

        let result = controller.adjust_for_balance(150, &reels);
        assert_eq!(result, Err(SlotError::InvalidSymbol(42)));
        assert!(reels.reels()[0].strip().read().is_baseline());
    }

    #[test]
    fn test_validate_rejects_descending_bands() {
        let config = DifficultyConfig {
            bands: DifficultyBands {
                very_easy_below: 500,
                easy_below: 300,
                ..DifficultyBands::default()
            },
            ..DifficultyConfig::default()
        };
        assert!(config.validate(&SymbolRegistry::standard()).is_err());
    }

    #[test]
    fn test_validate_rejects_oversized_profile_weight() {
        let mut very_hard = weights_from_slice(&VERY_HARD_WEIGHTS);
        very_hard[7].weight = MAX_SYMBOL_WEIGHT + 1;
        let config = DifficultyConfig {
            very_hard,
            ..DifficultyConfig::default()
        };
        let err = config.validate(&SymbolRegistry::standard()).unwrap_err();
        assert!(err.contains("very hard"));
    }

    #[test]
    fn test_validate_rejects_partial_profile() {
        let config = DifficultyConfig {
            hard: vec![SymbolWeight::new(0, 10)],
            ..DifficultyConfig::default()
        };
        let err = config.validate(&SymbolRegistry::standard()).unwrap_err();
        assert!(err.contains("hard"));
    }
}
