//! Symbol definitions and the symbol registry

use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};

/// Symbol identifier. Values 0..=7 in the default set.
pub type SymbolId = u32;

/// A symbol definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    /// Unique symbol ID
    pub id: SymbolId,
    /// Display name
    pub name: String,
    /// Multiplier applied on top of the pattern multiplier
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

fn default_multiplier() -> f64 {
    1.0
}

impl Symbol {
    /// Create a symbol
    pub fn new(id: SymbolId, name: impl Into<String>, multiplier: f64) -> Self {
        Self {
            id,
            name: name.into(),
            multiplier,
        }
    }
}

/// Ordered set of symbols with unique IDs
#[derive(Debug, Clone, Serialize)]
pub struct SymbolRegistry {
    symbols: Vec<Symbol>,
}

impl SymbolRegistry {
    /// Build a registry, rejecting duplicate IDs
    pub fn new(symbols: Vec<Symbol>) -> SlotResult<Self> {
        for (i, symbol) in symbols.iter().enumerate() {
            if symbols[..i].iter().any(|s| s.id == symbol.id) {
                return Err(SlotError::InvalidSymbol(symbol.id));
            }
        }
        Ok(Self { symbols })
    }

    /// The default eight-symbol set
    pub fn standard() -> Self {
        Self {
            symbols: standard_symbols(),
        }
    }

    /// Get symbol by ID
    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: SymbolId) -> bool {
        self.get(id).is_some()
    }

    /// Symbol multiplier, or `InvalidSymbol` for an unknown ID
    pub fn multiplier(&self, id: SymbolId) -> SlotResult<f64> {
        self.get(id)
            .map(|s| s.multiplier)
            .ok_or(SlotError::InvalidSymbol(id))
    }

    /// All IDs in registry order
    pub fn ids(&self) -> impl Iterator<Item = SymbolId> + '_ {
        self.symbols.iter().map(|s| s.id)
    }

    /// IDs whose multiplier is at least `floor` (jackpot candidates)
    pub fn high_value_ids(&self, floor: f64) -> Vec<SymbolId> {
        self.symbols
            .iter()
            .filter(|s| s.multiplier >= floor)
            .map(|s| s.id)
            .collect()
    }

    /// ID of the highest-multiplier symbol
    pub fn top_symbol(&self) -> Option<SymbolId> {
        self.symbols
            .iter()
            .max_by(|a, b| {
                a.multiplier
                    .partial_cmp(&b.multiplier)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|s| s.id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl Default for SymbolRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Default symbols. Lower IDs are common and cheap, higher IDs rare and rich.
pub fn standard_symbols() -> Vec<Symbol> {
    vec![
        Symbol::new(0, "cherry", 0.5),
        Symbol::new(1, "lemon", 0.8),
        Symbol::new(2, "grape", 1.0),
        Symbol::new(3, "bell", 2.0),
        Symbol::new(4, "clover", 2.5),
        Symbol::new(5, "bar", 3.0),
        Symbol::new(6, "diamond", 4.0),
        Symbol::new(7, "seven", 5.0),
    ]
}
