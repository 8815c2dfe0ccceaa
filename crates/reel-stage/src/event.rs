//! StageEvent — A stage occurrence with a logical timestamp
//!
//! Timestamps are logical delays from the start of the spin. The engine never
//! waits on them; the presentation layer schedules against them.

use serde::{Deserialize, Serialize};

use crate::stage::Stage;

/// A stage event with metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageEvent {
    /// The canonical stage
    pub stage: Stage,

    /// Logical timestamp in milliseconds from the start of the spin
    pub timestamp_ms: f64,

    /// Additional payload data
    #[serde(default)]
    pub payload: StagePayload,
}

impl StageEvent {
    /// Create a new stage event
    pub fn new(stage: Stage, timestamp_ms: f64) -> Self {
        Self {
            stage,
            timestamp_ms,
            payload: StagePayload::default(),
        }
    }

    /// Create with payload
    pub fn with_payload(stage: Stage, timestamp_ms: f64, payload: StagePayload) -> Self {
        Self {
            stage,
            timestamp_ms,
            payload,
        }
    }

    /// Get stage type name
    pub fn type_name(&self) -> &'static str {
        self.stage.type_name()
    }
}

/// Additional payload data for a stage event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StagePayload {
    /// Win amount
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub win_amount: Option<u64>,

    /// Bet amount
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bet_amount: Option<u64>,

    /// Symbol ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol_id: Option<u32>,

    /// Pattern or symbol multiplier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<f64>,

    /// Balance after the event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<u64>,

    /// Spin ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spin_id: Option<String>,
}

impl StagePayload {
    /// Create with win data
    pub fn with_win(win_amount: u64, bet_amount: Option<u64>) -> Self {
        Self {
            win_amount: Some(win_amount),
            bet_amount,
            ..Default::default()
        }
    }

    /// Create with symbol data
    pub fn with_symbol(symbol_id: u32, multiplier: Option<f64>) -> Self {
        Self {
            symbol_id: Some(symbol_id),
            multiplier,
            ..Default::default()
        }
    }

    /// Builder: set balance
    pub fn balance(mut self, balance: u64) -> Self {
        self.balance = Some(balance);
        self
    }

    /// Builder: set multiplier
    pub fn multiplier(mut self, mult: f64) -> Self {
        self.multiplier = Some(mult);
        self
    }

    /// Builder: set spin ID
    pub fn spin_id(mut self, spin_id: impl Into<String>) -> Self {
        self.spin_id = Some(spin_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_event_creation() {
        let event = StageEvent::new(Stage::SpinStart { bet_amount: 10 }, 0.0);

        assert_eq!(event.stage, Stage::SpinStart { bet_amount: 10 });
        assert_eq!(event.timestamp_ms, 0.0);
        assert_eq!(event.type_name(), "spin_start");
        assert_eq!(event.payload, StagePayload::default());
    }

    #[test]
    fn test_payload_builders() {
        let payload = StagePayload::with_win(500, Some(10))
            .multiplier(5.0)
            .spin_id("spin-000003");
        assert_eq!(payload.win_amount, Some(500));
        assert_eq!(payload.bet_amount, Some(10));
        assert_eq!(payload.multiplier, Some(5.0));
        assert_eq!(payload.spin_id.as_deref(), Some("spin-000003"));
    }

    #[test]
    fn test_payload_serialization() {
        let payload = StagePayload::with_symbol(3, Some(2.0)).balance(1050);

        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("symbol_id"));
        assert!(json.contains("balance"));

        // Empty fields should be skipped
        assert!(!json.contains("win_amount"));
    }
}
