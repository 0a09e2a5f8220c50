//! Two-phase game analysis over a finished move list.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use postgame_core::{classify, may_qualify_great, Evaluation, PlayedMove, RawEval};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::AnalysisConfig;
use crate::engine::{AnalysisEngine, EngineError};

/// Errors aborting an analysis run.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// Error from the engine adapter.
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
    /// The run was cancelled through its [`CancelHandle`].
    #[error("analysis cancelled")]
    Cancelled,
}

/// Shared flag for cancelling a running analysis.
///
/// Checked between moves in both pipeline phases; cancelling stops new
/// engine requests and leaves the engine process reusable for the next run.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; takes effect before the next move is processed.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Analyzes finished games by evaluating every position with a UCI engine
/// and labeling every move.
pub struct GameAnalyzer {
    engine: AnalysisEngine,
    config: AnalysisConfig,
    cancel: CancelHandle,
}

impl GameAnalyzer {
    /// Spawn the configured engine and get ready to analyze.
    pub async fn new(config: AnalysisConfig) -> Result<Self, AnalyzerError> {
        let engine = AnalysisEngine::spawn(&config).await?;
        Ok(Self {
            engine,
            config,
            cancel: CancelHandle::new(),
        })
    }

    /// Engine name reported during the UCI handshake.
    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    /// Handle for cancelling a running analysis from another task.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Analyze a finished game, one evaluation per played move.
    ///
    /// Phase 1 requests an engine evaluation for the position after every
    /// move, in order; phase 2 walks the results in the same order and
    /// labels each move. Classification at move `i` needs the finished
    /// labels of moves `i-1` and `i-2`, and the engine serves one request at
    /// a time, so neither phase can run out of order or in parallel.
    ///
    /// `progress` receives `(percent, label)` with percent climbing from 0
    /// to 100; the label carries the SAN of the move being worked on.
    pub async fn analyze_game<F>(
        &mut self,
        history: &[PlayedMove],
        mut progress: F,
    ) -> Result<Vec<Evaluation>, AnalyzerError>
    where
        F: FnMut(u8, Option<&str>),
    {
        let total = history.len();
        info!(moves = total, engine = self.engine.name(), "starting analysis");
        let start = Instant::now();

        let mut raw_evals: Vec<RawEval> = Vec::with_capacity(total);
        for (i, mv) in history.iter().enumerate() {
            self.check_cancelled()?;
            progress((i * 50 / total).min(49) as u8, Some(mv.san.as_str()));
            raw_evals.push(self.engine.evaluate(&mv.fen_after, self.config.depth).await?);
        }

        let evaluated = Instant::now();
        debug!(
            elapsed_ms = evaluated.duration_since(start).as_millis() as u64,
            "evaluation phase complete"
        );

        let mut evaluations: Vec<Evaluation> = Vec::with_capacity(total);
        for (i, (mv, raw)) in history.iter().zip(raw_evals).enumerate() {
            self.check_cancelled()?;
            let two_back = evaluations
                .len()
                .checked_sub(2)
                .and_then(|n| evaluations.get(n));
            let may_be_great = may_qualify_great(mv.color, two_back, evaluations.last());
            let evaluation = classify(mv, raw, evaluations.last(), may_be_great);
            evaluations.push(evaluation);

            let label = format!("Evaluating {}", mv.san);
            progress((50 + i * 50 / total).min(99) as u8, Some(label.as_str()));
        }
        progress(100, None);

        debug!(
            elapsed_ms = evaluated.elapsed().as_millis() as u64,
            "labeling phase complete"
        );
        info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            moves = total,
            "analysis complete"
        );
        Ok(evaluations)
    }

    fn check_cancelled(&self) -> Result<(), AnalyzerError> {
        if self.cancel.is_cancelled() {
            warn!("analysis cancelled");
            return Err(AnalyzerError::Cancelled);
        }
        Ok(())
    }

    /// Shut the engine down cleanly.
    pub async fn shutdown(self) -> Result<(), AnalyzerError> {
        self.engine.quit().await?;
        Ok(())
    }
}
