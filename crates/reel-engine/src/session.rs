//! SlotSession — The spin orchestrator
//!
//! Owns every piece of game state and runs one spin at a time:
//!
//! ```text
//! start_spin():  gate → read jackpot flag → difficulty → place bet
//!                → jackpot trigger → resolve reels → match → stage payout
//! finish_spin(): credit payout → jackpot check → difficulty → game over / win
//! ```
//!
//! Between the two calls the session is `Spinning` and rejects new spins; the
//! presentation plays the returned stage timeline in the meantime. `spin()`
//! runs both halves back to back.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use reel_stage::{NullSink, PresentationSink, Stage, StageEvent, StagePayload, StageTrace};
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, GameConfig};
use crate::difficulty::{DifficultyController, DifficultyLevel};
use crate::error::{SlotError, SlotResult};
use crate::grid::{GRID_REELS, Grid};
use crate::jackpot::{JackpotController, JackpotTrigger};
use crate::ledger::{BetLedger, Wallet};
use crate::matcher::{Match, PatternMatcher};
use crate::reel::ReelSet;
use crate::symbols::SymbolRegistry;
use crate::timing::TimestampGenerator;

/// Why a session stopped accepting spins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEnd {
    /// Balance fell below the minimum bet
    GameOver,
    /// Final jackpot trigger reached
    GameWin,
}

impl std::fmt::Display for SessionEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GameOver => f.write_str("game over"),
            Self::GameWin => f.write_str("game win"),
        }
    }
}

/// Orchestrator phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "end", rename_all = "snake_case")]
pub enum SpinPhase {
    /// Ready for a spin
    Idle,
    /// Outcome computed, payout not yet credited
    Spinning,
    /// Post-spin checks running
    Resolved,
    /// Terminal until `restart()`
    Finished(SessionEnd),
}

/// An accepted match with its payout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaidMatch {
    #[serde(flatten)]
    pub pattern: Match,
    pub symbol_multiplier: f64,
    /// Pattern multiplier × symbol multiplier
    pub final_multiplier: f64,
    pub win_amount: u64,
}

/// Everything `start_spin` decided
#[derive(Debug, Clone, Serialize)]
pub struct SpinOutcome {
    pub spin_id: String,
    pub bet_amount: u64,
    pub grid: Grid,
    pub matches: Vec<PaidMatch>,
    /// Payout to be credited by `finish_spin`
    pub total_win: u64,
    pub jackpot: Option<JackpotTrigger>,
    /// Reels returned a supplied grid instead of sampling
    pub forced: bool,
    pub difficulty: DifficultyLevel,
    pub balance_after_bet: u64,
    /// Timeline from spin start to the last staged win text
    pub trace: StageTrace,
}

impl SpinOutcome {
    pub fn is_win(&self) -> bool {
        self.total_win > 0
    }

    /// Staged win texts in presentation order
    pub fn win_texts(&self) -> Vec<&str> {
        self.trace.win_texts()
    }
}

/// Everything `finish_spin` settled
#[derive(Debug, Clone, Serialize)]
pub struct SpinSettlement {
    pub spin_id: String,
    pub total_win: u64,
    /// Balance after the payout
    pub balance: u64,
    /// Post-spin check armed the jackpot for the next spin
    pub jackpot_ready: bool,
    pub difficulty: DifficultyLevel,
    pub end: Option<SessionEnd>,
    /// Timeline from payout credit to spin end, continuing the outcome clock
    pub trace: StageTrace,
}

/// Both halves of a spin
#[derive(Debug, Clone, Serialize)]
pub struct SpinReport {
    pub outcome: SpinOutcome,
    pub settlement: SpinSettlement,
}

impl SpinReport {
    /// Outcome and settlement events as one trace
    pub fn trace(&self) -> StageTrace {
        let mut trace = self.outcome.trace.clone();
        trace.extend(self.settlement.trace.clone());
        trace
    }
}

/// Session statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_spins: u64,
    pub total_bet: u64,
    pub total_win: u64,
    pub winning_spins: u64,
    pub jackpots_triggered: u64,
    pub max_single_win: u64,
    pub rejected_spins: u64,
    pub games_over: u64,
    pub games_won: u64,
}

impl SessionStats {
    /// Calculate RTP
    pub fn rtp(&self) -> f64 {
        if self.total_bet > 0 {
            (self.total_win as f64 / self.total_bet as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Calculate hit rate
    pub fn hit_rate(&self) -> f64 {
        if self.total_spins > 0 {
            (self.winning_spins as f64 / self.total_spins as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Payout computed by `start_spin`, waiting for `finish_spin`
#[derive(Debug, Clone)]
struct PendingPayout {
    spin_id: String,
    total_win: u64,
    clock: TimestampGenerator,
}

/// A single-player slot session
pub struct SlotSession {
    config: GameConfig,
    registry: SymbolRegistry,
    reels: ReelSet,
    matcher: PatternMatcher,
    ledger: BetLedger,
    wallet: Wallet,
    jackpot: JackpotController,
    difficulty: DifficultyController,
    rng: ChaCha8Rng,
    sink: Box<dyn PresentationSink>,
    phase: SpinPhase,
    pending: Option<PendingPayout>,
    spin_count: u64,
    stats: SessionStats,
}

impl SlotSession {
    /// Validate `config` and build a session
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let registry = config.registry()?;
        let mut rng = match config.session.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        };
        let strips = config.build_strips(&registry, rng.random())?;
        let reels = ReelSet::from_strips(strips)?;
        let matcher = PatternMatcher::new(config.payline_table());

        log::info!(
            "session '{}' ready: {} symbols, {} paylines, {} strip(s), balance {}",
            config.name,
            registry.len(),
            matcher.table().len(),
            reels.unique_strips().len(),
            config.session.starting_balance
        );

        Ok(Self {
            registry,
            reels,
            matcher,
            ledger: config.bet_ledger(),
            wallet: Wallet::new(config.session.starting_balance),
            jackpot: JackpotController::new(config.jackpot.clone()),
            difficulty: DifficultyController::new(config.difficulty.clone()),
            rng,
            sink: Box::new(NullSink),
            phase: SpinPhase::Idle,
            pending: None,
            spin_count: 0,
            stats: SessionStats::default(),
            config,
        })
    }

    /// Builder: attach a presentation sink
    pub fn with_sink(mut self, sink: impl PresentationSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn set_sink(&mut self, sink: Box<dyn PresentationSink>) {
        self.sink = sink;
    }

    /// Reseed the outcome RNG
    pub fn seed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    // ═══════════════════════════════════════════════════════════════════════
    // ACCESSORS
    // ═══════════════════════════════════════════════════════════════════════

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn registry(&self) -> &SymbolRegistry {
        &self.registry
    }

    pub fn reels(&self) -> &ReelSet {
        &self.reels
    }

    pub fn matcher(&self) -> &PatternMatcher {
        &self.matcher
    }

    pub fn ledger(&self) -> &BetLedger {
        &self.ledger
    }

    pub fn jackpot(&self) -> &JackpotController {
        &self.jackpot
    }

    pub fn balance(&self) -> u64 {
        self.wallet.current()
    }

    pub fn bet_amount(&self) -> u64 {
        self.ledger.bet_amount()
    }

    /// Can the current bet be placed?
    pub fn can_afford(&self) -> bool {
        self.wallet.has_enough(self.ledger.bet_amount())
    }

    /// Cumulative bet still needed before the jackpot arms
    pub fn remaining_to_jackpot(&self) -> u64 {
        self.ledger.remaining_to_jackpot(self.jackpot.threshold())
    }

    /// Level applied by the last difficulty adjustment
    pub fn difficulty(&self) -> Option<DifficultyLevel> {
        self.difficulty.current()
    }

    pub fn phase(&self) -> SpinPhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, SpinPhase::Finished(_))
    }

    pub fn spin_count(&self) -> u64 {
        self.spin_count
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = SessionStats::default();
    }

    // ═══════════════════════════════════════════════════════════════════════
    // BET SELECTION (Idle only)
    // ═══════════════════════════════════════════════════════════════════════

    pub fn can_increase_bet(&self) -> bool {
        self.phase == SpinPhase::Idle && self.ledger.can_increase()
    }

    pub fn can_decrease_bet(&self) -> bool {
        self.phase == SpinPhase::Idle && self.ledger.can_decrease()
    }

    /// Step the bet up. Returns false at the top or while a spin is in flight.
    pub fn increase_bet(&mut self) -> bool {
        self.phase == SpinPhase::Idle && self.ledger.increase_bet()
    }

    /// Step the bet down. Returns false at the bottom or while a spin is in flight.
    pub fn decrease_bet(&mut self) -> bool {
        self.phase == SpinPhase::Idle && self.ledger.decrease_bet()
    }

    /// Jump to a bet level (clamped). Returns false while a spin is in flight.
    pub fn set_bet_index(&mut self, index: usize) -> bool {
        if self.phase != SpinPhase::Idle {
            return false;
        }
        self.ledger.set_index(index);
        true
    }

    // ═══════════════════════════════════════════════════════════════════════
    // SPIN
    // ═══════════════════════════════════════════════════════════════════════

    /// Run a whole spin
    pub fn spin(&mut self) -> SlotResult<SpinReport> {
        let outcome = self.start_spin()?;
        let settlement = self.finish_spin()?;
        Ok(SpinReport {
            outcome,
            settlement,
        })
    }

    /// Run a whole spin whose reels show `grid`
    pub fn spin_forced(&mut self, grid: Grid) -> SlotResult<SpinReport> {
        let outcome = self.start_spin_forced(grid)?;
        let settlement = self.finish_spin()?;
        Ok(SpinReport {
            outcome,
            settlement,
        })
    }

    /// First half of a spin: everything up to the staged payout
    pub fn start_spin(&mut self) -> SlotResult<SpinOutcome> {
        self.begin_spin(None)
    }

    /// First half of a spin with the reels forced to `grid`. An armed jackpot
    /// still takes precedence.
    pub fn start_spin_forced(&mut self, grid: Grid) -> SlotResult<SpinOutcome> {
        self.begin_spin(Some(grid))
    }

    fn begin_spin(&mut self, forced: Option<Grid>) -> SlotResult<SpinOutcome> {
        match self.phase {
            SpinPhase::Idle => {}
            SpinPhase::Spinning | SpinPhase::Resolved => {
                log::warn!("spin rejected: spin {} still in flight", self.spin_count);
                return Err(SlotError::SpinRejectedBusy);
            }
            SpinPhase::Finished(end) => {
                log::warn!("spin rejected: session finished ({})", end);
                return Err(SlotError::SessionFinished(end));
            }
        }

        if let Some(grid) = &forced {
            if let Some(&id) = grid
                .rows()
                .iter()
                .flatten()
                .find(|id| !self.registry.contains(**id))
            {
                return Err(SlotError::InvalidSymbol(id));
            }
        }

        let jackpot_ready = self.jackpot.is_ready();

        let previous_level = self.difficulty.current();
        let difficulty = self
            .difficulty
            .adjust_for_balance(self.wallet.current(), &self.reels)?;
        if forced.is_none() && !jackpot_ready && !self.reels.can_sample() {
            return Err(SlotError::EmptyPopulation);
        }

        let bet = self.ledger.bet_amount();
        if !self.ledger.place_bet(&mut self.wallet) {
            log::warn!(
                "insufficient funds: balance {} < bet {}",
                self.wallet.current(),
                bet
            );
            self.stats.rejected_spins += 1;
            self.sink.on_insufficient_funds();
            return Err(SlotError::InsufficientFunds {
                balance: self.wallet.current(),
                bet,
            });
        }

        self.spin_count += 1;
        let spin_id = format!("spin-{:06}", self.spin_count);
        let balance_after_bet = self.wallet.current();
        let mut clock = TimestampGenerator::new(self.config.timing.clone());
        let mut trace = StageTrace::new(spin_id.clone());

        self.sink.on_spin_started();
        self.emit(
            &mut trace,
            StageEvent::with_payload(
                Stage::SpinStart { bet_amount: bet },
                0.0,
                StagePayload {
                    bet_amount: Some(bet),
                    ..StagePayload::default()
                }
                .balance(balance_after_bet)
                .spin_id(spin_id.clone()),
            ),
        );
        self.sink.on_balance_changed(balance_after_bet);
        self.emit(
            &mut trace,
            StageEvent::new(
                Stage::BalanceChanged {
                    balance: balance_after_bet,
                },
                0.0,
            ),
        );
        if previous_level != Some(difficulty) {
            self.emit(
                &mut trace,
                StageEvent::new(
                    Stage::DifficultyChanged {
                        profile: difficulty.name().to_string(),
                    },
                    0.0,
                ),
            );
        }

        // The flag was armed by the previous spin; consume it now that this
        // spin's bet is in.
        let jackpot = if jackpot_ready {
            let trigger = self.jackpot.trigger(&self.registry, &mut self.rng);
            if let Some(t) = &trigger {
                self.ledger.reset_cumulative();
                self.stats.jackpots_triggered += 1;
                self.emit(
                    &mut trace,
                    StageEvent::with_payload(
                        Stage::JackpotTrigger {
                            symbol_id: t.symbol_id,
                            trigger_count: t.trigger_count,
                        },
                        0.0,
                        StagePayload::with_symbol(t.symbol_id, None),
                    ),
                );
            }
            trigger
        } else {
            None
        };

        let (current, target) = (self.ledger.cumulative(), self.jackpot.threshold());
        self.sink.on_progress_changed(current, target);
        self.emit(
            &mut trace,
            StageEvent::new(Stage::JackpotProgress { current, target }, 0.0),
        );

        let forced_grid = jackpot.map(|t| t.grid()).or(forced);
        let grid = self.reels.resolve(forced_grid.as_ref(), &mut self.rng)?;

        for reel_index in 0..GRID_REELS as u8 {
            let t = clock.reel_spin();
            self.emit(&mut trace, StageEvent::new(Stage::ReelSpinning { reel_index }, t));
        }
        for (col, column) in grid.columns().iter().enumerate() {
            let reel_index = col as u8;
            let t = clock.reel_stop(reel_index);
            self.sink.on_spin_stopped(reel_index);
            self.emit(
                &mut trace,
                StageEvent::new(
                    Stage::ReelStop {
                        reel_index,
                        symbols: column.to_vec(),
                    },
                    t,
                ),
            );
        }
        self.emit(&mut trace, StageEvent::new(Stage::EvaluateWins, clock.current()));

        let mut matches = Vec::new();
        let mut total_win = 0u64;
        for m in self.matcher.check_results(&grid) {
            let symbol_multiplier = self.registry.multiplier(m.symbol_id)?;
            let final_multiplier = m.multiplier * symbol_multiplier;
            let win_amount = self.ledger.calculate_win_amount(final_multiplier);
            total_win += win_amount;

            let t = clock.pattern_highlight();
            self.emit(
                &mut trace,
                StageEvent::with_payload(
                    Stage::PatternHighlight {
                        pattern_name: m.pattern_name.clone(),
                        symbol_id: m.symbol_id,
                        positions: m.positions.clone(),
                    },
                    t,
                    StagePayload::with_symbol(m.symbol_id, Some(m.multiplier)),
                ),
            );

            let texts = [
                format!("Symbol x{}", symbol_multiplier),
                format!("Pattern x{}", m.multiplier),
                format!("+{}", win_amount),
            ];
            for text in texts {
                let t = clock.win_stage();
                self.sink.on_win_amount_staged(&text);
                self.emit(&mut trace, StageEvent::new(Stage::WinStaged { text }, t));
            }

            let t = clock.payout_pause();
            self.emit(
                &mut trace,
                StageEvent::with_payload(
                    Stage::WinAccumulated {
                        running_total: total_win,
                    },
                    t,
                    StagePayload::with_win(win_amount, Some(bet)).multiplier(final_multiplier),
                ),
            );

            matches.push(PaidMatch {
                pattern: m,
                symbol_multiplier,
                final_multiplier,
                win_amount,
            });
        }

        self.stats.total_spins += 1;
        self.stats.total_bet += bet;

        log::debug!(
            "{}: bet {}, {} pattern(s), win {}{}",
            spin_id,
            bet,
            matches.len(),
            total_win,
            if jackpot.is_some() { " (jackpot)" } else { "" }
        );

        self.phase = SpinPhase::Spinning;
        self.pending = Some(PendingPayout {
            spin_id: spin_id.clone(),
            total_win,
            clock,
        });

        Ok(SpinOutcome {
            spin_id,
            bet_amount: bet,
            grid,
            matches,
            total_win,
            jackpot,
            forced: forced_grid.is_some(),
            difficulty,
            balance_after_bet,
            trace,
        })
    }

    /// Second half of a spin: credit the payout and run the post-spin checks
    pub fn finish_spin(&mut self) -> SlotResult<SpinSettlement> {
        if self.phase != SpinPhase::Spinning {
            return Err(SlotError::NoSpinInFlight);
        }
        let Some(PendingPayout {
            spin_id,
            total_win,
            mut clock,
        }) = self.pending.take()
        else {
            return Err(SlotError::NoSpinInFlight);
        };
        self.phase = SpinPhase::Resolved;

        let mut trace = StageTrace::new(spin_id.clone());
        let t = clock.settle();

        if total_win > 0 {
            self.wallet.add(total_win);
            self.stats.total_win += total_win;
            self.stats.winning_spins += 1;
            self.stats.max_single_win = self.stats.max_single_win.max(total_win);
            self.emit(
                &mut trace,
                StageEvent::with_payload(
                    Stage::WinTotal { amount: total_win },
                    t,
                    StagePayload::with_win(total_win, None).balance(self.wallet.current()),
                ),
            );
        }
        let balance = self.wallet.current();
        self.sink.on_balance_changed(balance);
        self.emit(&mut trace, StageEvent::new(Stage::BalanceChanged { balance }, t));

        let jackpot_ready = self.jackpot.check_ready(self.ledger.cumulative());
        if jackpot_ready {
            self.emit(&mut trace, StageEvent::new(Stage::JackpotReady, t));
        }

        let previous_level = self.difficulty.current();
        let difficulty = match self.difficulty.adjust_for_balance(balance, &self.reels) {
            Ok(level) => level,
            Err(e) => {
                self.phase = SpinPhase::Idle;
                return Err(e);
            }
        };
        if previous_level != Some(difficulty) {
            self.emit(
                &mut trace,
                StageEvent::new(
                    Stage::DifficultyChanged {
                        profile: difficulty.name().to_string(),
                    },
                    t,
                ),
            );
        }

        let end = if self.jackpot.is_won() {
            Some(SessionEnd::GameWin)
        } else if balance < self.config.session.minimum_bet {
            Some(SessionEnd::GameOver)
        } else {
            None
        };

        match end {
            Some(SessionEnd::GameWin) => {
                log::info!(
                    "game win after {} jackpot trigger(s), balance {}",
                    self.jackpot.trigger_count(),
                    balance
                );
                self.stats.games_won += 1;
                self.sink.on_game_win();
                self.emit(&mut trace, StageEvent::new(Stage::GameWin, t));
            }
            Some(SessionEnd::GameOver) => {
                log::info!(
                    "game over: balance {} below minimum bet {}",
                    balance,
                    self.config.session.minimum_bet
                );
                self.stats.games_over += 1;
                self.sink.on_game_over();
                self.emit(&mut trace, StageEvent::new(Stage::GameOver, t));
            }
            None => {}
        }

        self.emit(&mut trace, StageEvent::new(Stage::SpinEnd, t));
        self.phase = match end {
            Some(end) => SpinPhase::Finished(end),
            None => SpinPhase::Idle,
        };

        Ok(SpinSettlement {
            spin_id,
            total_win,
            balance,
            jackpot_ready,
            difficulty,
            end,
            trace,
        })
    }

    /// Start over: starting balance, empty jackpot meter, initial threshold
    /// and trigger count, baseline strip weights. Rejected mid-spin.
    pub fn restart(&mut self) -> SlotResult<()> {
        if matches!(self.phase, SpinPhase::Spinning | SpinPhase::Resolved) {
            return Err(SlotError::SpinRejectedBusy);
        }

        self.wallet.reset_to_start();
        self.ledger.reset_cumulative();
        self.jackpot.reset();
        self.reels.reset_strips();
        self.difficulty.reset();
        self.pending = None;
        self.phase = SpinPhase::Idle;

        log::info!("session restarted with balance {}", self.wallet.current());

        self.sink.on_balance_changed(self.wallet.current());
        self.sink.on_progress_changed(0, self.jackpot.threshold());
        Ok(())
    }

    fn emit(&mut self, trace: &mut StageTrace, event: StageEvent) {
        self.sink.on_stage(&event);
        trace.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::TimingConfig;
    use reel_stage::{SinkCall, StageRecorder};

    fn session() -> SlotSession {
        SlotSession::new(
            GameConfig::default()
                .with_seed(12345)
                .with_timing(TimingConfig::normal()),
        )
        .unwrap()
    }

    fn top_row_bells() -> Grid {
        Grid::new([[3, 3, 3, 3, 3], [0, 1, 2, 4, 5], [5, 6, 7, 0, 1]])
    }

    #[test]
    fn test_forced_xl_pays_sixty() {
        let mut session = session();
        let report = session.spin_forced(top_row_bells()).unwrap();

        assert_eq!(report.outcome.balance_after_bet, 990);
        assert_eq!(report.outcome.matches.len(), 1);
        assert_eq!(report.outcome.matches[0].pattern.pattern_name, "XL");
        assert_eq!(report.outcome.total_win, 60);
        assert_eq!(report.settlement.balance, 1050);
        assert_eq!(session.balance(), 1050);
        assert_eq!(session.phase(), SpinPhase::Idle);
    }

    #[test]
    fn test_staged_texts() {
        let mut session = session();
        let outcome = session.start_spin_forced(top_row_bells()).unwrap();
        assert_eq!(outcome.win_texts(), vec!["Symbol x2", "Pattern x3", "+60"]);
    }

    #[test]
    fn test_zero_multiplier_symbol_pays_nothing() {
        let mut config = GameConfig::default()
            .with_seed(12345)
            .with_timing(TimingConfig::instant());
        config.symbols[3].multiplier = 0.0;
        let mut session = SlotSession::new(config).unwrap();

        let report = session.spin_forced(top_row_bells()).unwrap();
        assert_eq!(report.outcome.matches.len(), 1);
        assert_eq!(report.outcome.matches[0].pattern.pattern_name, "XL");
        assert_eq!(report.outcome.matches[0].win_amount, 0);
        assert!(!report.outcome.is_win());
        assert_eq!(session.balance(), 990);
        assert_eq!(session.stats().winning_spins, 0);
    }

    #[test]
    fn test_busy_gate() {
        let mut session = session();
        session.start_spin().unwrap();

        assert_eq!(session.phase(), SpinPhase::Spinning);
        assert_eq!(session.start_spin().unwrap_err(), SlotError::SpinRejectedBusy);
        assert!(!session.increase_bet());

        session.finish_spin().unwrap();
        assert!(session.start_spin().is_ok());
    }

    #[test]
    fn test_finish_without_start() {
        let mut session = session();
        assert_eq!(session.finish_spin().unwrap_err(), SlotError::NoSpinInFlight);
    }

    #[test]
    fn test_forced_grid_with_unknown_symbol() {
        let mut session = session();
        let err = session.spin_forced(Grid::filled(99)).unwrap_err();
        assert_eq!(err, SlotError::InvalidSymbol(99));
        assert_eq!(session.balance(), 1000);
        assert_eq!(session.spin_count(), 0);
    }

    #[test]
    fn test_timeline_stamps() {
        let mut session = session();
        let report = session.spin_forced(top_row_bells()).unwrap();
        let trace = report.trace();

        assert!(trace.validate().is_valid(5));
        let stops: Vec<f64> = trace.reel_stops().iter().map(|e| e.timestamp_ms).collect();
        assert_eq!(stops, vec![1000.0, 1150.0, 1300.0, 1450.0, 1600.0]);

        // highlight 400, three texts 250 apart, pause 500, settle 800
        let total = trace.events_by_type("win_total")[0].timestamp_ms;
        assert_eq!(total, 1600.0 + 400.0 + 750.0 + 500.0 + 800.0);
        assert_eq!(trace.total_win(), 60);
    }

    #[test]
    fn test_sink_receives_calls() {
        let recorder = StageRecorder::new();
        let mut session = session().with_sink(recorder.clone());
        session.spin_forced(top_row_bells()).unwrap();

        let calls = recorder.calls();
        assert_eq!(calls[0], SinkCall::SpinStarted);
        assert_eq!(
            recorder.count(|c| matches!(c, SinkCall::SpinStopped { .. })),
            5
        );
        assert!(calls.contains(&SinkCall::WinAmountStaged { text: "+60".into() }));
        assert!(calls.contains(&SinkCall::ProgressChanged {
            current: 10,
            target: 3000
        }));
        assert_eq!(
            calls.last(),
            Some(&SinkCall::BalanceChanged { balance: 1050 })
        );
        assert!(!recorder.stages().is_empty());
    }

    #[test]
    fn test_stats_track_spins() {
        let mut session = session();
        session.spin_forced(top_row_bells()).unwrap();
        session
            .spin_forced(Grid::new([[0, 1, 2, 3, 4], [5, 6, 7, 0, 1], [2, 3, 4, 5, 6]]))
            .unwrap();

        let stats = session.stats();
        assert_eq!(stats.total_spins, 2);
        assert_eq!(stats.total_bet, 20);
        assert_eq!(stats.total_win, 60);
        assert_eq!(stats.winning_spins, 1);
        assert_eq!(stats.max_single_win, 60);
        assert_eq!(stats.rtp(), 300.0);
        assert_eq!(stats.hit_rate(), 50.0);
    }

    #[test]
    fn test_session_end_display() {
        assert_eq!(SessionEnd::GameOver.to_string(), "game over");
        assert_eq!(
            SlotError::SessionFinished(SessionEnd::GameWin).to_string(),
            "Session finished (game win), restart required"
        );
    }
}
