//! # reel-engine — Outcome generation and scoring for a 3×5 pattern slot
//!
//! Produces one 3-row × 5-reel grid per spin from weighted reel strips, scores it
//! against a fixed catalog of geometric patterns, and runs the economy around it:
//! bets, a one-spin-lagged jackpot meter, and balance-driven difficulty.
//!
//! ## Architecture
//!
//! ```text
//! SlotSession (orchestrator)
//!     │
//!     ├── ReelSet ── Reel ×5 ── SharedStrip (WeightedStrip)
//!     ├── PatternMatcher ── PaylineTable
//!     ├── BetLedger + Wallet
//!     ├── JackpotController
//!     └── DifficultyController
//!           │
//!           v
//!     SpinOutcome / SpinSettlement → StageTrace + PresentationSink calls
//! ```
//!
//! Nothing here sleeps or animates. Delays are logical timestamps on the
//! returned stage events.

pub mod config;
pub mod difficulty;
pub mod error;
pub mod grid;
pub mod jackpot;
pub mod ledger;
pub mod matcher;
pub mod paytable;
pub mod reel;
pub mod session;
pub mod strip;
pub mod symbols;
pub mod timing;

pub use config::*;
pub use difficulty::*;
pub use error::*;
pub use grid::*;
pub use jackpot::*;
pub use ledger::*;
pub use matcher::*;
pub use paytable::*;
pub use reel::*;
pub use session::*;
pub use strip::*;
pub use symbols::*;
pub use timing::*;
