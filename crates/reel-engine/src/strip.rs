//! Weighted virtual reel strips
//!
//! A strip holds an immutable baseline weight table, a mutable runtime copy
//! and a materialized population in which each symbol appears `weight` times
//! in shuffled order. Sampling draws a uniform index into the population, so
//! P(symbol) = weight / total weight.

use std::sync::Arc;

use parking_lot::RwLock;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};
use crate::symbols::{SymbolId, SymbolRegistry};

/// Weight of one symbol on a strip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolWeight {
    pub symbol_id: SymbolId,
    pub weight: u32,
}

impl SymbolWeight {
    pub fn new(symbol_id: SymbolId, weight: u32) -> Self {
        Self { symbol_id, weight }
    }
}

/// Build a weight table from a slice of weights indexed by symbol ID
pub fn weights_from_slice(weights: &[u32]) -> Vec<SymbolWeight> {
    weights
        .iter()
        .enumerate()
        .map(|(id, &w)| SymbolWeight::new(id as SymbolId, w))
        .collect()
}

/// Largest weight a single symbol may carry; bounds the population size
pub const MAX_SYMBOL_WEIGHT: u32 = 10_000;

/// Default baseline weights for symbols 0..=7
pub const STANDARD_WEIGHTS: [u32; 8] = [30, 26, 22, 16, 12, 8, 5, 3];

/// Strip shared by every reel that draws from it
pub type SharedStrip = Arc<RwLock<WeightedStrip>>;

/// A weighted virtual reel strip
#[derive(Debug, Clone)]
pub struct WeightedStrip {
    name: String,
    baseline: Arc<[SymbolWeight]>,
    runtime: Vec<SymbolWeight>,
    population: Vec<SymbolId>,
    shuffle_rng: ChaCha8Rng,
}

impl WeightedStrip {
    /// Create a strip. Every weight must name a registry symbol; registry
    /// symbols missing from `weights` get weight 0 so they can be raised later.
    /// Weights above [`MAX_SYMBOL_WEIGHT`] are clamped.
    pub fn new(
        name: impl Into<String>,
        weights: &[SymbolWeight],
        registry: &SymbolRegistry,
        shuffle_seed: u64,
    ) -> SlotResult<Self> {
        let name = name.into();
        let mut table: Vec<SymbolWeight> = Vec::with_capacity(registry.len());
        for sw in weights {
            if !registry.contains(sw.symbol_id) {
                return Err(SlotError::InvalidSymbol(sw.symbol_id));
            }
            let weight = clamp_weight(&name, sw.symbol_id, sw.weight as i64);
            match table.iter_mut().find(|t| t.symbol_id == sw.symbol_id) {
                Some(existing) => existing.weight = weight,
                None => table.push(SymbolWeight::new(sw.symbol_id, weight)),
            }
        }
        for id in registry.ids() {
            if !table.iter().any(|t| t.symbol_id == id) {
                table.push(SymbolWeight::new(id, 0));
            }
        }

        let mut strip = Self {
            name,
            baseline: table.clone().into(),
            runtime: table,
            population: Vec::new(),
            shuffle_rng: ChaCha8Rng::seed_from_u64(shuffle_seed),
        };
        strip.regenerate();
        Ok(strip)
    }

    /// Standard strip over the default registry
    pub fn standard(name: impl Into<String>, shuffle_seed: u64) -> Self {
        let weights = weights_from_slice(&STANDARD_WEIGHTS);
        let table: Arc<[SymbolWeight]> = weights.clone().into();
        let mut strip = Self {
            name: name.into(),
            baseline: table,
            runtime: weights,
            population: Vec::new(),
            shuffle_rng: ChaCha8Rng::seed_from_u64(shuffle_seed),
        };
        strip.regenerate();
        strip
    }

    /// Wrap into a handle reels can share
    pub fn into_shared(self) -> SharedStrip {
        Arc::new(RwLock::new(self))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current runtime weights
    pub fn weights(&self) -> &[SymbolWeight] {
        &self.runtime
    }

    /// Baseline weights, never mutated
    pub fn baseline(&self) -> &[SymbolWeight] {
        &self.baseline
    }

    /// Runtime weight of a symbol (0 if absent)
    pub fn weight_of(&self, symbol_id: SymbolId) -> u32 {
        self.runtime
            .iter()
            .find(|sw| sw.symbol_id == symbol_id)
            .map(|sw| sw.weight)
            .unwrap_or(0)
    }

    pub fn total_weight(&self) -> u64 {
        self.runtime.iter().map(|sw| sw.weight as u64).sum()
    }

    /// Probability of drawing `symbol_id` under the runtime weights
    pub fn probability_of(&self, symbol_id: SymbolId) -> f64 {
        let total = self.total_weight();
        if total == 0 {
            return 0.0;
        }
        self.weight_of(symbol_id) as f64 / total as f64
    }

    /// Materialized population size (equals total weight after regeneration)
    pub fn population_len(&self) -> usize {
        self.population.len()
    }

    /// Does the runtime table match the baseline?
    pub fn is_baseline(&self) -> bool {
        self.runtime[..] == self.baseline[..]
    }

    /// Replace one symbol's runtime weight and regenerate the population.
    /// The weight is clamped to `0..=MAX_SYMBOL_WEIGHT`.
    pub fn set_weight(&mut self, symbol_id: SymbolId, weight: i64) -> SlotResult<()> {
        let entry = self
            .runtime
            .iter_mut()
            .find(|sw| sw.symbol_id == symbol_id)
            .ok_or_else(|| {
                log::warn!("strip '{}': no weight entry for symbol {}", self.name, symbol_id);
                SlotError::InvalidSymbol(symbol_id)
            })?;

        entry.weight = clamp_weight(&self.name, symbol_id, weight);
        self.regenerate();
        Ok(())
    }

    /// Restore the baseline weights and regenerate
    pub fn reset_to_original(&mut self) {
        self.runtime = self.baseline.to_vec();
        self.regenerate();
    }

    /// Draw one symbol. An empty population is regenerated first; a strip
    /// whose total weight is zero fails with `EmptyPopulation`.
    pub fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> SlotResult<SymbolId> {
        if self.population.is_empty() {
            self.regenerate();
        }
        if self.population.is_empty() {
            return Err(SlotError::EmptyPopulation);
        }
        let index = rng.random_range(0..self.population.len());
        Ok(self.population[index])
    }

    /// Rebuild the population from the runtime weights and shuffle it
    fn regenerate(&mut self) {
        self.population.clear();
        for sw in &self.runtime {
            self.population
                .extend(std::iter::repeat_n(sw.symbol_id, sw.weight as usize));
        }

        // Fisher-Yates
        for i in (1..self.population.len()).rev() {
            let j = self.shuffle_rng.random_range(0..=i);
            self.population.swap(i, j);
        }

        log::debug!(
            "strip '{}': regenerated population of {}",
            self.name,
            self.population.len()
        );
    }
}

fn clamp_weight(strip: &str, symbol_id: SymbolId, weight: i64) -> u32 {
    let clamped = weight.clamp(0, MAX_SYMBOL_WEIGHT as i64);
    if clamped != weight {
        log::warn!(
            "strip '{}': weight {} for symbol {} clamped to {}",
            strip,
            weight,
            symbol_id,
            clamped
        );
    }
    clamped as u32
}
