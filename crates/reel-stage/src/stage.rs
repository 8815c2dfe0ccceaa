//! Stage — The canonical moments of one spin
//!
//! A Stage is NOT an animation. It is the semantic meaning of a moment in the
//! spin flow; the presentation layer decides how (and how long) to show it.

use serde::{Deserialize, Serialize};

/// Canonical spin stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Stage {
    // ═══════════════════════════════════════════════════════════════════════
    // SPIN LIFECYCLE
    // ═══════════════════════════════════════════════════════════════════════
    /// Spin accepted and bet debited
    SpinStart {
        /// Bet debited for this spin
        bet_amount: u64,
    },

    /// Reel starts its visual spin
    ReelSpinning {
        /// Which reel (0-indexed, left to right)
        reel_index: u8,
    },

    /// Reel has stopped, showing its final symbols
    ReelStop {
        /// Which reel stopped (0-indexed)
        reel_index: u8,
        /// Symbols on this reel (top to bottom)
        #[serde(default)]
        symbols: Vec<u32>,
    },

    /// All reels stopped, paylines being evaluated
    EvaluateWins,

    /// Spin complete, ready for the next one
    SpinEnd,

    // ═══════════════════════════════════════════════════════════════════════
    // WIN LIFECYCLE
    // ═══════════════════════════════════════════════════════════════════════
    /// Cells of one accepted pattern blink
    PatternHighlight {
        /// Pattern category name
        pattern_name: String,
        /// Symbol that matched
        symbol_id: u32,
        /// Matched cells as (row, col)
        #[serde(default)]
        positions: Vec<(u8, u8)>,
    },

    /// A win text is staged on screen ("Symbol x2", "Pattern x3", "+60")
    WinStaged {
        /// Text to show
        text: String,
    },

    /// Running total after one pattern has been paid
    WinAccumulated {
        /// Total so far this spin
        running_total: u64,
    },

    /// Final payout for the spin, credited to the balance
    WinTotal {
        /// Total win
        amount: u64,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // JACKPOT
    // ═══════════════════════════════════════════════════════════════════════
    /// Jackpot meter moved
    JackpotProgress {
        /// Cumulative bet toward the jackpot
        current: u64,
        /// Current trigger threshold
        target: u64,
    },

    /// Threshold crossed; the next spin will be forced
    JackpotReady,

    /// Forced jackpot grid resolved this spin
    JackpotTrigger {
        /// Symbol filling the grid
        symbol_id: u32,
        /// Triggers so far this session (including this one)
        trigger_count: u32,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // SESSION
    // ═══════════════════════════════════════════════════════════════════════
    /// Authoritative balance changed
    BalanceChanged {
        /// New balance
        balance: u64,
    },

    /// Strip weights switched to another difficulty profile
    DifficultyChanged {
        /// Profile name ("very easy" .. "very hard")
        profile: String,
    },

    /// Balance fell below the minimum bet
    GameOver,

    /// Final jackpot trigger reached
    GameWin,
}

impl Stage {
    /// Get a simple string name for this stage type
    pub fn type_name(&self) -> &'static str {
        match self {
            Stage::SpinStart { .. } => "spin_start",
            Stage::ReelSpinning { .. } => "reel_spinning",
            Stage::ReelStop { .. } => "reel_stop",
            Stage::EvaluateWins => "evaluate_wins",
            Stage::SpinEnd => "spin_end",
            Stage::PatternHighlight { .. } => "pattern_highlight",
            Stage::WinStaged { .. } => "win_staged",
            Stage::WinAccumulated { .. } => "win_accumulated",
            Stage::WinTotal { .. } => "win_total",
            Stage::JackpotProgress { .. } => "jackpot_progress",
            Stage::JackpotReady => "jackpot_ready",
            Stage::JackpotTrigger { .. } => "jackpot_trigger",
            Stage::BalanceChanged { .. } => "balance_changed",
            Stage::DifficultyChanged { .. } => "difficulty_changed",
            Stage::GameOver => "game_over",
            Stage::GameWin => "game_win",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_serialization() {
        let stage = Stage::ReelStop {
            reel_index: 2,
            symbols: vec![1, 2, 3],
        };
        let json = serde_json::to_string(&stage).unwrap();
        assert!(json.contains("reel_stop"));
        assert!(json.contains("reel_index"));

        let deserialized: Stage = serde_json::from_str(&json).unwrap();
        assert_eq!(stage, deserialized);
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Stage::SpinStart { bet_amount: 10 }.type_name(), "spin_start");
        assert_eq!(
            Stage::WinStaged {
                text: "+60".into()
            }
            .type_name(),
            "win_staged"
        );
        assert_eq!(Stage::JackpotReady.type_name(), "jackpot_ready");
        assert_eq!(Stage::GameOver.type_name(), "game_over");
    }
}
