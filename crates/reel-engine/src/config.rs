//! Game configuration — symbols, strips, paylines, bets, jackpot, difficulty
//!
//! Loaded from JSON or YAML and validated once; a session is only built from a
//! configuration that passed `validate()`.
//!
//! ```rust,ignore
//! let config = GameConfig::load("machine.yaml")?;
//! let session = SlotSession::new(config)?;
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::difficulty::DifficultyConfig;
use crate::error::SlotError;
use crate::grid::GRID_REELS;
use crate::jackpot::JackpotConfig;
use crate::ledger::{BetLedger, STANDARD_BET_AMOUNTS};
use crate::paytable::{Payline, PaylineTable};
use crate::strip::{
    MAX_SYMBOL_WEIGHT, STANDARD_WEIGHTS, SymbolWeight, WeightedStrip, weights_from_slice,
};
use crate::symbols::{Symbol, SymbolRegistry, standard_symbols};
use crate::timing::TimingConfig;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Slot(#[from] SlotError),
}

/// Weight table for one strip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReelWeights {
    pub name: String,
    pub weights: Vec<SymbolWeight>,
}

impl ReelWeights {
    pub fn new(name: impl Into<String>, weights: Vec<SymbolWeight>) -> Self {
        Self {
            name: name.into(),
            weights,
        }
    }
}

/// Bet levels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BetConfig {
    /// Allowed bets, strictly ascending; the first is the base bet
    pub amounts: Vec<u64>,
    pub starting_index: usize,
}

impl Default for BetConfig {
    fn default() -> Self {
        Self {
            amounts: STANDARD_BET_AMOUNTS.to_vec(),
            starting_index: 0,
        }
    }
}

/// Session economy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub starting_balance: u64,
    /// Balance below this ends the session; at least the smallest bet
    pub minimum_bet: u64,
    /// RNG seed; None seeds from the OS
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            starting_balance: 1000,
            minimum_bet: 10,
            seed: None,
        }
    }
}

/// Complete machine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub name: String,
    pub symbols: Vec<Symbol>,
    /// 1..=5 tables; reel i uses table i, or table 0 when there are fewer
    pub reel_weights: Vec<ReelWeights>,
    /// Replaces the standard 35-line table when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paylines: Option<Vec<Payline>>,
    pub bet: BetConfig,
    pub jackpot: JackpotConfig,
    pub difficulty: DifficultyConfig,
    pub session: SessionConfig,
    pub timing: TimingConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            name: "Pattern Slot".to_string(),
            symbols: standard_symbols(),
            reel_weights: (1..=GRID_REELS)
                .map(|i| ReelWeights::new(format!("reel-{i}"), weights_from_slice(&STANDARD_WEIGHTS)))
                .collect(),
            paylines: None,
            bet: BetConfig::default(),
            jackpot: JackpotConfig::default(),
            difficulty: DifficultyConfig::default(),
            session: SessionConfig::default(),
            timing: TimingConfig::default(),
        }
    }
}

impl GameConfig {
    /// Parse and validate JSON
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        let text = std::fs::read_to_string(path)?;
        log::debug!("loading config from {}", path.display());

        match extension.as_str() {
            "json" => Self::from_json_str(&text),
            "yaml" | "yml" => Self::from_yaml_str(&text),
            other => Err(ConfigError::UnsupportedFormat(format!(
                "'{}' ({})",
                other,
                path.display()
            ))),
        }
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yml::to_string(self)?)
    }

    /// Builder: fix the RNG seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.session.seed = Some(seed);
        self
    }

    /// Builder: timing profile
    pub fn with_timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }

    /// Check every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        let registry = self.registry()?;

        if registry.is_empty() {
            return Err(invalid("at least one symbol is required"));
        }
        if let Some(symbol) = registry
            .iter()
            .find(|s| !s.multiplier.is_finite() || s.multiplier < 0.0)
        {
            return Err(invalid(format!(
                "symbol {} has negative multiplier {}",
                symbol.id, symbol.multiplier
            )));
        }

        // Strips
        if self.reel_weights.is_empty() || self.reel_weights.len() > GRID_REELS {
            return Err(invalid(format!(
                "expected 1..={} reel weight tables, got {}",
                GRID_REELS,
                self.reel_weights.len()
            )));
        }
        for table in &self.reel_weights {
            if let Some(sw) = table
                .weights
                .iter()
                .find(|sw| !registry.contains(sw.symbol_id))
            {
                return Err(SlotError::InvalidSymbol(sw.symbol_id).into());
            }
            if let Some(sw) = table.weights.iter().find(|sw| sw.weight > MAX_SYMBOL_WEIGHT) {
                return Err(invalid(format!(
                    "reel weight table '{}': weight {} for symbol {} exceeds {}",
                    table.name, sw.weight, sw.symbol_id, MAX_SYMBOL_WEIGHT
                )));
            }
            if table.weights.iter().map(|sw| sw.weight as u64).sum::<u64>() == 0 {
                return Err(invalid(format!(
                    "reel weight table '{}' has zero total weight",
                    table.name
                )));
            }
        }

        // Paylines
        if let Some(lines) = &self.paylines {
            PaylineTable::new(lines.clone())
                .validate()
                .map_err(ConfigError::Validation)?;
        }

        // Bets
        let amounts = &self.bet.amounts;
        if amounts.is_empty() {
            return Err(invalid("bet amounts must not be empty"));
        }
        if amounts[0] == 0 {
            return Err(invalid("bet amounts must be positive"));
        }
        if amounts.windows(2).any(|w| w[0] >= w[1]) {
            return Err(invalid(format!(
                "bet amounts must be strictly ascending: {:?}",
                amounts
            )));
        }
        if self.bet.starting_index >= amounts.len() {
            return Err(invalid(format!(
                "starting bet index {} out of range (0..{})",
                self.bet.starting_index,
                amounts.len()
            )));
        }

        // Jackpot
        let jackpot = &self.jackpot;
        if jackpot.initial_threshold == 0 {
            return Err(invalid("jackpot threshold must be positive"));
        }
        if !(jackpot.escalation_factor >= 1.0) || !jackpot.escalation_factor.is_finite() {
            return Err(invalid(format!(
                "jackpot escalation factor must be >= 1, got {}",
                jackpot.escalation_factor
            )));
        }
        if jackpot.max_triggers == 0 {
            return Err(invalid("jackpot max triggers must be >= 1"));
        }
        if registry
            .high_value_ids(jackpot.symbol_multiplier_floor)
            .is_empty()
        {
            return Err(invalid(format!(
                "no symbol reaches the jackpot multiplier floor {}",
                jackpot.symbol_multiplier_floor
            )));
        }

        self.difficulty
            .validate(&registry)
            .map_err(ConfigError::Validation)?;

        if self.session.minimum_bet == 0 {
            return Err(invalid("minimum bet must be positive"));
        }
        if self.session.minimum_bet < amounts[0] {
            return Err(invalid(format!(
                "minimum bet {} is below the smallest bet {}",
                self.session.minimum_bet, amounts[0]
            )));
        }
        if self.session.starting_balance < amounts[0] {
            return Err(invalid(format!(
                "starting balance {} cannot cover the smallest bet {}",
                self.session.starting_balance, amounts[0]
            )));
        }

        self.timing.validate().map_err(ConfigError::Validation)?;

        Ok(())
    }

    /// Symbol registry (fails on duplicate IDs)
    pub fn registry(&self) -> Result<SymbolRegistry, ConfigError> {
        Ok(SymbolRegistry::new(self.symbols.clone())?)
    }

    /// Configured payline table, or the standard one
    pub fn payline_table(&self) -> PaylineTable {
        match &self.paylines {
            Some(lines) => PaylineTable::new(lines.clone()),
            None => PaylineTable::standard(),
        }
    }

    /// One strip per weight table; strip i shuffles with `shuffle_seed + i`
    pub fn build_strips(
        &self,
        registry: &SymbolRegistry,
        shuffle_seed: u64,
    ) -> Result<Vec<WeightedStrip>, ConfigError> {
        self.reel_weights
            .iter()
            .enumerate()
            .map(|(i, table)| {
                WeightedStrip::new(
                    table.name.clone(),
                    &table.weights,
                    registry,
                    shuffle_seed.wrapping_add(i as u64),
                )
                .map_err(ConfigError::from)
            })
            .collect()
    }

    pub fn bet_ledger(&self) -> BetLedger {
        BetLedger::new(self.bet.amounts.clone(), self.bet.starting_index)
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Validation(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.reel_weights.len(), 5);
        assert_eq!(config.payline_table().len(), 35);
        assert_eq!(config.bet_ledger().bet_amount(), 10);
    }

    #[test]
    fn test_json_partial_override() {
        let json = r#"{
            "name": "Quick",
            "session": { "starting_balance": 500, "seed": 7 },
            "jackpot": { "initial_threshold": 100 }
        }"#;
        let config = GameConfig::from_json_str(json).unwrap();

        assert_eq!(config.name, "Quick");
        assert_eq!(config.session.starting_balance, 500);
        assert_eq!(config.session.minimum_bet, 10);
        assert_eq!(config.session.seed, Some(7));
        assert_eq!(config.jackpot.initial_threshold, 100);
        assert_eq!(config.jackpot.max_triggers, 3);
        assert_eq!(config.symbols.len(), 8);
    }

    #[test]
    fn test_yaml_with_single_pooled_table() {
        let yaml = r#"
name: Pooled
reel_weights:
  - name: shared
    weights:
      - { symbol_id: 0, weight: 10 }
      - { symbol_id: 7, weight: 2 }
bet:
  amounts: [5, 10, 25]
  starting_index: 1
"#;
        let config = GameConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.reel_weights.len(), 1);
        assert_eq!(config.bet_ledger().bet_amount(), 10);

        let registry = config.registry().unwrap();
        let strips = config.build_strips(&registry, 0).unwrap();
        assert_eq!(strips[0].total_weight(), 12);
    }

    #[test]
    fn test_zero_multiplier_symbol_is_valid() {
        let mut config = GameConfig::default();
        config.symbols[0].multiplier = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_duplicate_symbol_rejected() {
        let mut config = GameConfig::default();
        config.symbols.push(Symbol::new(3, "bell-again", 1.0));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Slot(SlotError::InvalidSymbol(3)))
        ));
    }

    #[test]
    fn test_unknown_symbol_in_weights_rejected() {
        let mut config = GameConfig::default();
        config.reel_weights[2].weights.push(SymbolWeight::new(12, 4));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Slot(SlotError::InvalidSymbol(12)))
        ));
    }

    #[test]
    fn test_validation_rules() {
        let cases: Vec<(&str, GameConfig)> = vec![
            ("no tables", GameConfig {
                reel_weights: vec![],
                ..GameConfig::default()
            }),
            ("six tables", GameConfig {
                reel_weights: vec![GameConfig::default().reel_weights[0].clone(); 6],
                ..GameConfig::default()
            }),
            ("zero table", GameConfig {
                reel_weights: vec![ReelWeights::new("dead", vec![SymbolWeight::new(0, 0)])],
                ..GameConfig::default()
            }),
            ("descending bets", GameConfig {
                bet: BetConfig {
                    amounts: vec![20, 10],
                    starting_index: 0,
                },
                ..GameConfig::default()
            }),
            ("bad index", GameConfig {
                bet: BetConfig {
                    amounts: vec![10],
                    starting_index: 1,
                },
                ..GameConfig::default()
            }),
            ("shrinking jackpot", GameConfig {
                jackpot: JackpotConfig {
                    escalation_factor: 0.5,
                    ..JackpotConfig::default()
                },
                ..GameConfig::default()
            }),
            ("no triggers", GameConfig {
                jackpot: JackpotConfig {
                    max_triggers: 0,
                    ..JackpotConfig::default()
                },
                ..GameConfig::default()
            }),
            ("floor too high", GameConfig {
                jackpot: JackpotConfig {
                    symbol_multiplier_floor: 50.0,
                    ..JackpotConfig::default()
                },
                ..GameConfig::default()
            }),
            ("zero minimum", GameConfig {
                session: SessionConfig {
                    minimum_bet: 0,
                    ..SessionConfig::default()
                },
                ..GameConfig::default()
            }),
            ("minimum below smallest bet", GameConfig {
                bet: BetConfig {
                    amounts: vec![50, 100],
                    starting_index: 0,
                },
                session: SessionConfig {
                    starting_balance: 60,
                    minimum_bet: 10,
                    seed: None,
                },
                ..GameConfig::default()
            }),
            ("oversized weight", GameConfig {
                reel_weights: vec![ReelWeights::new(
                    "huge",
                    vec![SymbolWeight::new(0, 4_000_000_000)],
                )],
                ..GameConfig::default()
            }),
            ("negative symbol multiplier", {
                let mut config = GameConfig::default();
                config.symbols[0].multiplier = -1.0;
                config
            }),
            ("off-grid payline", GameConfig {
                paylines: Some(vec![Payline::new("x", 1.0, vec![(0, 0), (0, 1), (0, 5)])]),
                ..GameConfig::default()
            }),
        ];

        for (label, config) in cases {
            assert!(
                matches!(config.validate(), Err(ConfigError::Validation(_))),
                "{label} should fail validation"
            );
        }
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("machine.json");
        std::fs::write(&json_path, GameConfig::default().to_json().unwrap()).unwrap();
        assert_eq!(GameConfig::load(&json_path).unwrap(), GameConfig::default());

        let yaml_path = dir.path().join("machine.YML");
        let mut file = std::fs::File::create(&yaml_path).unwrap();
        file.write_all(b"name: Yaml Machine\n").unwrap();
        assert_eq!(GameConfig::load(&yaml_path).unwrap().name, "Yaml Machine");

        let toml_path = dir.path().join("machine.toml");
        std::fs::write(&toml_path, "name = 'x'").unwrap();
        assert!(matches!(
            GameConfig::load(&toml_path),
            Err(ConfigError::UnsupportedFormat(_))
        ));

        assert!(matches!(
            GameConfig::load(dir.path().join("missing.json")),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            GameConfig::from_json_str("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }
}
