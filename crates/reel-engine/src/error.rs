//! Error types for the reel engine

use thiserror::Error;

use crate::session::SessionEnd;
use crate::symbols::SymbolId;

/// Engine error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SlotError {
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(SymbolId),

    #[error("Empty population: strip total weight is zero")]
    EmptyPopulation,

    #[error("Insufficient funds: balance {balance} cannot cover bet {bet}")]
    InsufficientFunds { balance: u64, bet: u64 },

    #[error("Spin rejected: another spin is in flight")]
    SpinRejectedBusy,

    #[error("Session finished ({0}), restart required")]
    SessionFinished(SessionEnd),

    #[error("No spin in flight")]
    NoSpinInFlight,
}

/// Result type alias
pub type SlotResult<T> = Result<T, SlotError>;
