//! # reel-stage — Presentation boundary for the reel slot engine
//!
//! The engine never animates, plays sounds, or renders text. Everything the
//! presentation layer needs is handed over in one of two forms:
//!
//! - **Stages as data**: every spin produces a [`StageTrace`], a list of
//!   timestamped [`StageEvent`]s the presentation replays at its own pace.
//! - **Sink calls**: a [`PresentationSink`] is notified synchronously while the
//!   engine mutates game state. Sink calls never return anything to the engine.
//!
//! ```text
//! SlotSession ──► PresentationSink (progress, win text, game over, ...)
//!      │
//!      └──► SpinOutcome.trace: StageTrace ──► Vec<StageEvent>
//! ```

pub mod event;
pub mod sink;
pub mod stage;
pub mod trace;

pub use event::*;
pub use sink::*;
pub use stage::*;
pub use trace::*;
