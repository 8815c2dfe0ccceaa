//! Jackpot meter
//!
//! Cumulative bet is compared against a threshold after each spin. Crossing it
//! arms the jackpot; the *next* spin that places its bet consumes the flag and
//! resolves a forced grid of one high-value symbol. Each trigger multiplies the
//! threshold by the escalation factor, and the configured final trigger wins
//! the session.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::symbols::{SymbolId, SymbolRegistry};

/// Jackpot configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JackpotConfig {
    /// Cumulative bet needed for the first trigger
    pub initial_threshold: u64,
    /// Threshold multiplier applied after each trigger
    pub escalation_factor: f64,
    /// Triggers needed to win the session
    pub max_triggers: u32,
    /// Symbols at or above this multiplier may fill the jackpot grid.
    /// Default 1.0 keeps the sub-unit symbols off the jackpot grid.
    pub symbol_multiplier_floor: f64,
}

impl Default for JackpotConfig {
    fn default() -> Self {
        Self {
            initial_threshold: 3000,
            escalation_factor: 3.0,
            max_triggers: 3,
            symbol_multiplier_floor: 1.0,
        }
    }
}

/// Where the meter stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JackpotPhase {
    /// Accumulating toward the threshold
    Idle,
    /// Threshold crossed; the next spin is forced
    ReadyNextSpin,
    /// Final trigger reached
    Won,
}

/// Result of consuming the ready flag
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JackpotTrigger {
    /// Symbol filling the forced grid
    pub symbol_id: SymbolId,
    /// Triggers so far, including this one
    pub trigger_count: u32,
    /// Threshold for the next trigger (unchanged when the session is won)
    pub next_threshold: u64,
    /// This was the final trigger
    pub session_won: bool,
}

impl JackpotTrigger {
    /// The forced grid for this trigger
    pub fn grid(&self) -> Grid {
        Grid::filled(self.symbol_id)
    }
}

/// Jackpot state machine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JackpotController {
    config: JackpotConfig,
    threshold: u64,
    trigger_count: u32,
    phase: JackpotPhase,
}

impl JackpotController {
    pub fn new(config: JackpotConfig) -> Self {
        Self {
            threshold: config.initial_threshold,
            trigger_count: 0,
            phase: JackpotPhase::Idle,
            config,
        }
    }

    pub fn config(&self) -> &JackpotConfig {
        &self.config
    }

    /// Current trigger threshold
    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    pub fn trigger_count(&self) -> u32 {
        self.trigger_count
    }

    pub fn phase(&self) -> JackpotPhase {
        self.phase
    }

    pub fn is_ready(&self) -> bool {
        self.phase == JackpotPhase::ReadyNextSpin
    }

    pub fn is_won(&self) -> bool {
        self.phase == JackpotPhase::Won
    }

    /// Post-spin check. Arms the jackpot when `cumulative` reaches the
    /// threshold; returns true only on the transition.
    pub fn check_ready(&mut self, cumulative: u64) -> bool {
        if self.phase != JackpotPhase::Idle || cumulative < self.threshold {
            return false;
        }
        self.phase = JackpotPhase::ReadyNextSpin;
        log::info!(
            "jackpot armed: cumulative {} reached threshold {}",
            cumulative,
            self.threshold
        );
        true
    }

    /// Pick a random high-value symbol, falling back to the top symbol when
    /// none clears the floor
    pub fn choose_symbol<R: Rng + ?Sized>(
        &self,
        registry: &SymbolRegistry,
        rng: &mut R,
    ) -> Option<SymbolId> {
        let candidates = registry.high_value_ids(self.config.symbol_multiplier_floor);
        candidates
            .choose(rng)
            .copied()
            .or_else(|| registry.top_symbol())
    }

    /// Consume the ready flag. Increments the trigger count, then either
    /// escalates the threshold or marks the session won. Returns None when the
    /// jackpot is not armed.
    pub fn trigger<R: Rng + ?Sized>(
        &mut self,
        registry: &SymbolRegistry,
        rng: &mut R,
    ) -> Option<JackpotTrigger> {
        if !self.is_ready() {
            return None;
        }
        let Some(symbol_id) = self.choose_symbol(registry, rng) else {
            log::warn!("jackpot armed but the symbol registry is empty");
            return None;
        };

        self.trigger_count += 1;
        let session_won = self.trigger_count >= self.config.max_triggers;
        if session_won {
            self.phase = JackpotPhase::Won;
        } else {
            self.threshold = escalate(self.threshold, self.config.escalation_factor);
            self.phase = JackpotPhase::Idle;
        }

        log::info!(
            "jackpot trigger {}/{} on symbol {}, next threshold {}",
            self.trigger_count,
            self.config.max_triggers,
            symbol_id,
            self.threshold
        );

        Some(JackpotTrigger {
            symbol_id,
            trigger_count: self.trigger_count,
            next_threshold: self.threshold,
            session_won,
        })
    }

    /// Restore the initial threshold and clear the count
    pub fn reset(&mut self) {
        self.threshold = self.config.initial_threshold;
        self.trigger_count = 0;
        self.phase = JackpotPhase::Idle;
    }
}

impl Default for JackpotController {
    fn default() -> Self {
        Self::new(JackpotConfig::default())
    }
}

fn escalate(threshold: u64, factor: f64) -> u64 {
    let next = (threshold as f64 * factor).round();
    if next >= u64::MAX as f64 {
        u64::MAX
    } else {
        next as u64
    }
}
