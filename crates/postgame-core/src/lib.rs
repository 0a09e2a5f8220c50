//! Move evaluation and classification for post-game chess analysis.
//!
//! Given a finished game's move list and a sequence of raw engine
//! evaluations (one per position), this crate turns each move into a
//! human-readable quality label ("Brilliant", "Blunder", "Missed", ...) the
//! way consumer chess-analysis products do.
//!
//! # Overview
//!
//! - [`EngineScore`] / [`RawEval`] - raw evaluation data extracted from a
//!   UCI engine, including the optional second-best line
//! - [`Evaluation`] - a raw evaluation plus its [`Label`] and the engine's
//!   recommended move
//! - [`winchance`] - the win-probability model behind the label thresholds
//! - [`PlayedMove`] / [`replay_san`] / [`replay_uci`] - move records built
//!   by replaying a game with the `shakmaty` rules library
//! - [`classify`] - the rule cascade assigning a label to one move
//! - [`GameReport`] - per-player summary over a labeled game
//!
//! # Example
//!
//! ```
//! use postgame_core::{classify, replay_san, EngineScore, RawEval, Label};
//! use postgame_core::shakmaty::Chess;
//!
//! let history = replay_san(Chess::default(), &["e4"]).unwrap();
//! let raw = RawEval {
//!     score: EngineScore::Cp(-25),
//!     pv: vec!["e7e5".to_string()],
//!     alt_line: None,
//! };
//! // The very first move has no previous evaluation to compare against.
//! let evaluation = classify(&history[0], raw, None, false);
//! assert_eq!(evaluation.label, Label::Undefined);
//! ```

pub mod classify;
pub mod eval;
pub mod game;
pub mod label;
pub mod report;
pub mod sacrifice;
pub mod winchance;

/// Re-export of `shakmaty` for convenience when building positions.
pub use shakmaty;

pub use classify::{classify, may_qualify_great};
pub use eval::{AltEval, EngineScore, Evaluation, RawEval};
pub use game::{position_from_fen, replay_san, replay_uci, GameError, PlayedMove};
pub use label::Label;
pub use report::{GameReport, PlayerSummary};
pub use sacrifice::is_sacrifice;
