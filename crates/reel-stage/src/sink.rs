//! PresentationSink — The single callback interface the engine pushes to
//!
//! Restarting after game over or game win is not a callback here: the
//! presentation calls `SlotSession::restart()` when the player confirms.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::event::StageEvent;

/// Receiver for engine notifications. Every method defaults to a no-op.
pub trait PresentationSink: Send {
    /// Jackpot meter moved
    fn on_progress_changed(&mut self, _current: u64, _target: u64) {}

    /// A win text should be shown
    fn on_win_amount_staged(&mut self, _text: &str) {}

    /// Reels start spinning
    fn on_spin_started(&mut self) {}

    /// One reel came to rest
    fn on_spin_stopped(&mut self, _reel_index: u8) {}

    /// Spin refused because the balance cannot cover the bet
    fn on_insufficient_funds(&mut self) {}

    /// Balance fell below the minimum bet
    fn on_game_over(&mut self) {}

    /// Final jackpot reached
    fn on_game_win(&mut self) {}

    /// Authoritative balance changed
    fn on_balance_changed(&mut self, _balance: u64) {}

    /// Raw stage event, for sinks that replay the timeline themselves
    fn on_stage(&mut self, _event: &StageEvent) {}
}

/// Sink that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl PresentationSink for NullSink {}

/// A recorded sink call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum SinkCall {
    ProgressChanged { current: u64, target: u64 },
    WinAmountStaged { text: String },
    SpinStarted,
    SpinStopped { reel_index: u8 },
    InsufficientFunds,
    GameOver,
    GameWin,
    BalanceChanged { balance: u64 },
}

#[derive(Debug, Default)]
struct RecorderLog {
    calls: Vec<SinkCall>,
    stages: Vec<StageEvent>,
}

/// Sink that records every call. Clones share the same log, so one handle can
/// be boxed into a session while another inspects it.
#[derive(Debug, Clone, Default)]
pub struct StageRecorder {
    log: Arc<Mutex<RecorderLog>>,
}

impl StageRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded calls
    pub fn calls(&self) -> Vec<SinkCall> {
        self.log.lock().calls.clone()
    }

    /// Snapshot of recorded stage events
    pub fn stages(&self) -> Vec<StageEvent> {
        self.log.lock().stages.clone()
    }

    /// Count calls matching a predicate
    pub fn count(&self, predicate: impl Fn(&SinkCall) -> bool) -> usize {
        self.log.lock().calls.iter().filter(|c| predicate(c)).count()
    }

    /// Drop everything recorded so far
    pub fn clear(&self) {
        let mut log = self.log.lock();
        log.calls.clear();
        log.stages.clear();
    }

    fn record(&self, call: SinkCall) {
        self.log.lock().calls.push(call);
    }
}

impl PresentationSink for StageRecorder {
    fn on_progress_changed(&mut self, current: u64, target: u64) {
        self.record(SinkCall::ProgressChanged { current, target });
    }

    fn on_win_amount_staged(&mut self, text: &str) {
        self.record(SinkCall::WinAmountStaged {
            text: text.to_string(),
        });
    }

    fn on_spin_started(&mut self) {
        self.record(SinkCall::SpinStarted);
    }

    fn on_spin_stopped(&mut self, reel_index: u8) {
        self.record(SinkCall::SpinStopped { reel_index });
    }

    fn on_insufficient_funds(&mut self) {
        self.record(SinkCall::InsufficientFunds);
    }

    fn on_game_over(&mut self) {
        self.record(SinkCall::GameOver);
    }

    fn on_game_win(&mut self) {
        self.record(SinkCall::GameWin);
    }

    fn on_balance_changed(&mut self, balance: u64) {
        self.record(SinkCall::BalanceChanged { balance });
    }

    fn on_stage(&mut self, event: &StageEvent) {
        self.log.lock().stages.push(event.clone());
    }
}
