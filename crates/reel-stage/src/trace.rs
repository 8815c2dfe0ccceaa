//! StageTrace — The full timeline of one spin

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::StageEvent;
use crate::stage::Stage;

/// A complete trace of stage events for one spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageTrace {
    /// Spin identifier within the session
    pub spin_id: String,

    /// All events in chronological order
    pub events: Vec<StageEvent>,

    /// When this trace was recorded
    pub recorded_at: DateTime<Utc>,
}

impl StageTrace {
    /// Create a new empty trace
    pub fn new(spin_id: impl Into<String>) -> Self {
        Self {
            spin_id: spin_id.into(),
            events: Vec::new(),
            recorded_at: Utc::now(),
        }
    }

    /// Add an event to the trace
    pub fn push(&mut self, event: StageEvent) {
        self.events.push(event);
    }

    /// Append all events from another trace
    pub fn extend(&mut self, other: StageTrace) {
        self.events.extend(other.events);
    }

    /// Get events by stage type name
    pub fn events_by_type(&self, type_name: &str) -> Vec<&StageEvent> {
        self.events
            .iter()
            .filter(|e| e.stage.type_name() == type_name)
            .collect()
    }

    /// Check if trace contains a specific stage type
    pub fn has_stage(&self, type_name: &str) -> bool {
        self.events.iter().any(|e| e.stage.type_name() == type_name)
    }

    /// Get all reel stop events
    pub fn reel_stops(&self) -> Vec<&StageEvent> {
        self.events_by_type("reel_stop")
    }

    /// Staged win texts in order
    pub fn win_texts(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match &e.stage {
                Stage::WinStaged { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Total win from the WinTotal stage (0 if the spin paid nothing)
    pub fn total_win(&self) -> u64 {
        self.events
            .iter()
            .find_map(|e| match e.stage {
                Stage::WinTotal { amount } => Some(amount),
                _ => None,
            })
            .unwrap_or(0)
    }

    /// Validate trace has the required stages
    pub fn validate(&self) -> TraceValidation {
        let reel_stops = self.reel_stops().len();

        TraceValidation {
            has_spin_start: self.has_stage("spin_start"),
            has_spin_end: self.has_stage("spin_end"),
            reel_stop_count: reel_stops as u8,
            has_evaluate: self.has_stage("evaluate_wins"),
        }
    }
}

/// Validation result for a trace
#[derive(Debug, Clone, Default)]
pub struct TraceValidation {
    pub has_spin_start: bool,
    pub has_spin_end: bool,
    pub reel_stop_count: u8,
    pub has_evaluate: bool,
}

impl TraceValidation {
    /// Check if trace is valid for a grid with `reel_count` reels
    pub fn is_valid(&self, reel_count: u8) -> bool {
        self.has_spin_start
            && self.has_spin_end
            && self.has_evaluate
            && self.reel_stop_count == reel_count
    }
}
