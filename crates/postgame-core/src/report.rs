//! Per-player summary over a labeled game.

use serde::Serialize;
use shakmaty::Color;

use crate::eval::Evaluation;
use crate::game::PlayedMove;
use crate::label::Label;

/// Label counts and accuracy for one side.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlayerSummary {
    pub brilliant: u32,
    pub great: u32,
    pub best: u32,
    pub excellent: u32,
    pub good: u32,
    pub inaccuracies: u32,
    pub mistakes: u32,
    pub missed: u32,
    pub blunders: u32,
    pub forced: u32,
    /// Accuracy percentage, 0..=100.
    pub accuracy: u32,
}

/// Summary of a finished analysis run, one [`PlayerSummary`] per side.
#[derive(Debug, Clone, Serialize)]
pub struct GameReport {
    pub white: PlayerSummary,
    pub black: PlayerSummary,
}

impl GameReport {
    /// Summarize a labeled game. `evaluations` is index-aligned with
    /// `history`; extra entries on either side are ignored.
    pub fn from_evaluations(history: &[PlayedMove], evaluations: &[Evaluation]) -> Self {
        Self {
            white: PlayerSummary::for_color(Color::White, history, evaluations),
            black: PlayerSummary::for_color(Color::Black, history, evaluations),
        }
    }
}

impl PlayerSummary {
    fn for_color(color: Color, history: &[PlayedMove], evaluations: &[Evaluation]) -> Self {
        let mut summary = PlayerSummary::default();
        let mut player_moves = 0u32;
        let mut total_lost = 0.0_f64;

        for (i, evaluation) in evaluations.iter().enumerate() {
            let Some(mv) = history.get(i) else { break };
            if mv.color != color {
                continue;
            }
            player_moves += 1;

            match evaluation.label {
                Label::Brilliant => summary.brilliant += 1,
                Label::Great => summary.great += 1,
                Label::Best => summary.best += 1,
                Label::Excellent => summary.excellent += 1,
                Label::Good => summary.good += 1,
                Label::Inaccuracy => summary.inaccuracies += 1,
                Label::Mistake => summary.mistakes += 1,
                Label::Missed => summary.missed += 1,
                Label::Blunder => summary.blunders += 1,
                Label::Forced => summary.forced += 1,
                Label::Book | Label::Checkmate | Label::Undefined => {}
            }

            if i > 0 {
                // Win-chance drop proxy from the white-perspective scores,
                // capped per move so one disaster cannot zero the game.
                let previous = &evaluations[i - 1];
                let delta = (evaluation.score.value() as i64 - previous.score.value() as i64)
                    .unsigned_abs() as f64
                    / 100.0;
                total_lost += delta.min(20.0);
            }
        }

        summary.accuracy = if player_moves == 0 {
            0
        } else {
            let average = total_lost / f64::from(player_moves);
            (100.0 - average * 5.0).clamp(0.0, 100.0).round() as u32
        };
        summary
    }
}
