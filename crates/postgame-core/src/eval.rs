//! Engine evaluation types.

use crate::label::Label;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A position evaluation as reported by a chess engine.
///
/// Mate scores count moves to mate and use their sign for the mating side;
/// they are not magnitude-comparable to centipawn scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum EngineScore {
    /// Centipawn evaluation (100 = 1 pawn advantage).
    Cp(i32),
    /// Mate in N moves.
    Mate(i32),
}

impl EngineScore {
    /// Sentinel for a position where white has delivered mate.
    pub const CHECKMATE_WHITE: EngineScore = EngineScore::Mate(i32::MAX);
    /// Sentinel for a position where black has delivered mate.
    pub const CHECKMATE_BLACK: EngineScore = EngineScore::Mate(i32::MIN);

    /// The inner numeric value, regardless of kind.
    pub fn value(self) -> i32 {
        match self {
            EngineScore::Cp(value) | EngineScore::Mate(value) => value,
        }
    }

    pub fn is_mate(self) -> bool {
        matches!(self, EngineScore::Mate(_))
    }

    /// Negate the score, switching the favored side. The kind is kept as-is.
    pub fn flip(self) -> Self {
        match self {
            EngineScore::Cp(value) => EngineScore::Cp(-value),
            EngineScore::Mate(value) => EngineScore::Mate(-value),
        }
    }
}

impl fmt::Display for EngineScore {
    /// Short display form: `M3` / `M#` for mates, signed pawns otherwise
    /// (`+1.5`, `-0.25`, `0`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            EngineScore::Mate(n) if n == i32::MAX || n == i32::MIN => write!(f, "M#"),
            EngineScore::Mate(n) => write!(f, "M{}", n.abs()),
            EngineScore::Cp(0) => write!(f, "0"),
            EngineScore::Cp(cp) => {
                let pawns = format!("{:+.2}", cp as f64 / 100.0);
                write!(f, "{}", pawns.trim_end_matches('0').trim_end_matches('.'))
            }
        }
    }
}

/// The engine's second-best line for a position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AltEval {
    pub score: EngineScore,
    /// Principal variation move tokens (may be empty).
    pub pv: Vec<String>,
}

/// One raw engine evaluation for a single position.
///
/// The score sign is relative to the side to move, exactly as the engine
/// reported it. `alt_line` is present only when the engine was running with
/// MultiPV of at least 2 and found a second line at the requested depth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEval {
    pub score: EngineScore,
    /// Principal variation move tokens (may be empty).
    pub pv: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt_line: Option<AltEval>,
}

/// A raw evaluation plus classification output, one per played move.
///
/// Scores here are normalized so that positive favors white. Created once
/// when the move is classified and immutable afterwards; a full game yields
/// an ordered list index-aligned with the move history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub score: EngineScore,
    pub pv: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt_line: Option<AltEval>,
    pub label: Label,
    /// Opening name (reserved for a future book source; always `None`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening: Option<String>,
    /// What the engine wanted to play instead: the first token of the
    /// previous position's principal variation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_move: Option<String>,
}

impl Evaluation {
    /// Evaluation of a position where white has just delivered mate.
    pub fn checkmate_white() -> Self {
        Self::checkmate(EngineScore::CHECKMATE_WHITE)
    }

    /// Evaluation of a position where black has just delivered mate.
    pub fn checkmate_black() -> Self {
        Self::checkmate(EngineScore::CHECKMATE_BLACK)
    }

    fn checkmate(score: EngineScore) -> Self {
        Self {
            score,
            pv: Vec::new(),
            alt_line: None,
            label: Label::Checkmate,
            opening: None,
            best_move: None,
        }
    }

    /// A position is forced when the engine saw no viable second line.
    pub fn is_forced(&self) -> bool {
        self.alt_line.is_none()
    }
}
