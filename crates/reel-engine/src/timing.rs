//! Timing profiles for the spin timeline
//!
//! The engine never waits. Every delay of the spin flow (reel stop stagger,
//! pattern blink, staged win texts) is a logical timestamp on a stage event.

use serde::{Deserialize, Serialize};

/// Timing profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingProfile {
    /// Normal gameplay timing
    #[default]
    Normal,
    /// Fast mode
    Turbo,
    /// Every delay zero (simulation, tests)
    Instant,
    /// Scaled from another profile
    Custom,
}

/// Logical delays of one spin, in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Profile type
    pub profile: TimingProfile,

    /// Spin time before the first reel stops
    pub reel_spin_duration_ms: f64,

    /// Stagger between consecutive reel stops
    pub reel_stop_interval_ms: f64,

    /// Blink time for one accepted pattern
    pub pattern_highlight_ms: f64,

    /// Gap between staged win texts
    pub win_stage_interval_ms: f64,

    /// Pause after a pattern's texts before the next pattern
    pub payout_pause_ms: f64,

    /// Pause before the payout is credited
    pub settle_delay_ms: f64,
}

impl TimingConfig {
    /// Normal gameplay timing
    pub fn normal() -> Self {
        Self {
            profile: TimingProfile::Normal,
            reel_spin_duration_ms: 1000.0,
            reel_stop_interval_ms: 150.0,
            pattern_highlight_ms: 400.0,
            win_stage_interval_ms: 250.0,
            payout_pause_ms: 500.0,
            settle_delay_ms: 800.0,
        }
    }

    /// Turbo mode
    pub fn turbo() -> Self {
        Self {
            profile: TimingProfile::Turbo,
            reel_spin_duration_ms: 400.0,
            reel_stop_interval_ms: 60.0,
            pattern_highlight_ms: 150.0,
            win_stage_interval_ms: 100.0,
            payout_pause_ms: 200.0,
            settle_delay_ms: 300.0,
        }
    }

    /// Zero delays
    pub fn instant() -> Self {
        Self {
            profile: TimingProfile::Instant,
            ..Self::normal().scaled(0.0)
        }
    }

    /// Get config for profile
    pub fn from_profile(profile: TimingProfile) -> Self {
        match profile {
            TimingProfile::Normal => Self::normal(),
            TimingProfile::Turbo => Self::turbo(),
            TimingProfile::Instant => Self::instant(),
            TimingProfile::Custom => Self::normal(),
        }
    }

    /// Scale timing by factor (< 1.0 = faster)
    pub fn scaled(&self, factor: f64) -> Self {
        let factor = factor.max(0.0);
        Self {
            profile: TimingProfile::Custom,
            reel_spin_duration_ms: self.reel_spin_duration_ms * factor,
            reel_stop_interval_ms: self.reel_stop_interval_ms * factor,
            pattern_highlight_ms: self.pattern_highlight_ms * factor,
            win_stage_interval_ms: self.win_stage_interval_ms * factor,
            payout_pause_ms: self.payout_pause_ms * factor,
            settle_delay_ms: self.settle_delay_ms * factor,
        }
    }

    /// Time until the last of `reel_count` reels stops
    pub fn total_spin_duration(&self, reel_count: u8) -> f64 {
        self.reel_spin_duration_ms + (reel_count.max(1) as f64 - 1.0) * self.reel_stop_interval_ms
    }

    /// Presentation time for `pattern_count` accepted patterns
    pub fn payout_duration(&self, pattern_count: usize) -> f64 {
        pattern_count as f64
            * (self.pattern_highlight_ms + 3.0 * self.win_stage_interval_ms + self.payout_pause_ms)
    }

    /// Negative or non-finite delays are invalid
    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            ("reel_spin_duration_ms", self.reel_spin_duration_ms),
            ("reel_stop_interval_ms", self.reel_stop_interval_ms),
            ("pattern_highlight_ms", self.pattern_highlight_ms),
            ("win_stage_interval_ms", self.win_stage_interval_ms),
            ("payout_pause_ms", self.payout_pause_ms),
            ("settle_delay_ms", self.settle_delay_ms),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("timing.{name} must be a non-negative number, got {value}"));
            }
        }
        Ok(())
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::normal()
    }
}

/// Timestamp generator for sequential events
#[derive(Debug, Clone)]
pub struct TimestampGenerator {
    current_ms: f64,
    config: TimingConfig,
}

impl TimestampGenerator {
    /// Create new generator
    pub fn new(config: TimingConfig) -> Self {
        Self {
            current_ms: 0.0,
            config,
        }
    }

    /// Reset to zero
    pub fn reset(&mut self) {
        self.current_ms = 0.0;
    }

    /// Get current timestamp
    pub fn current(&self) -> f64 {
        self.current_ms
    }

    /// Advance by duration and return new timestamp
    pub fn advance(&mut self, duration_ms: f64) -> f64 {
        self.current_ms += duration_ms.max(0.0);
        self.current_ms
    }

    /// All reels start together at the current time
    pub fn reel_spin(&self) -> f64 {
        self.current_ms
    }

    /// Advance for reel stop
    pub fn reel_stop(&mut self, reel_index: u8) -> f64 {
        if reel_index == 0 {
            self.advance(self.config.reel_spin_duration_ms)
        } else {
            self.advance(self.config.reel_stop_interval_ms)
        }
    }

    /// Start of one pattern's highlight
    pub fn pattern_highlight(&mut self) -> f64 {
        self.advance(self.config.pattern_highlight_ms)
    }

    /// Next staged win text
    pub fn win_stage(&mut self) -> f64 {
        self.advance(self.config.win_stage_interval_ms)
    }

    /// Pause after a pattern's texts
    pub fn payout_pause(&mut self) -> f64 {
        self.advance(self.config.payout_pause_ms)
    }

    /// Pause before crediting the payout
    pub fn settle(&mut self) -> f64 {
        self.advance(self.config.settle_delay_ms)
    }

    /// Get timing config reference
    pub fn config(&self) -> &TimingConfig {
        &self.config
    }
}
