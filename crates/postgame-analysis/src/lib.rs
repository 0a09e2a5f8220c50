//! Post-game analysis pipeline: UCI engine adapter plus orchestrator.
//!
//! This crate drives an external UCI engine (like Stockfish) over a finished
//! game's move list and labels every move via [`postgame_core`].
//!
//! # Overview
//!
//! - [`AnalysisConfig`] - engine path, depth and timeouts, optionally loaded
//!   from `postgame.toml`
//! - [`AnalysisEngine`] - asynchronous wrapper around one engine process,
//!   one evaluation request in flight at a time
//! - [`GameAnalyzer`] - the two-phase pipeline: evaluate every position in
//!   order, then classify every move in order
//!
//! # Example
//!
//! ```ignore
//! use postgame_analysis::{AnalysisConfig, GameAnalyzer};
//! use postgame_core::{replay_san, shakmaty::Chess};
//!
//! let history = replay_san(Chess::default(), &["e4", "e5", "Nf3"])?;
//! let mut analyzer = GameAnalyzer::new(AnalysisConfig::default()).await?;
//! let evaluations = analyzer
//!     .analyze_game(&history, |percent, label| {
//!         eprintln!("{:>3}% {}", percent, label.unwrap_or(""));
//!     })
//!     .await?;
//! ```

pub mod analyzer;
pub mod config;
pub mod engine;

pub use analyzer::{AnalyzerError, CancelHandle, GameAnalyzer};
pub use config::{AnalysisConfig, ConfigError};
pub use engine::{AnalysisEngine, EngineError};
