//! The move classification cascade.
//!
//! Turns one raw engine evaluation into a labeled [`Evaluation`], given the
//! previous move's evaluation and the orchestrator-side "great" predicate.
//! Checkmate wins over everything; a move matching the engine's previous
//! recommendation starts as `Best` and may be refined to `Forced`,
//! `Brilliant` or `Great`; everything else is bucketed by how much win
//! chance the mover gave up; failing to punish an opponent error overrides
//! the bucket with `Missed`.

use shakmaty::{Color, Position};

use crate::eval::{Evaluation, RawEval};
use crate::game::PlayedMove;
use crate::label::Label;
use crate::sacrifice::is_sacrifice;
use crate::winchance::{win_chance_lost, GREAT_SWING_CP};

/// True when the previous move was an error worth punishing.
pub fn opponent_went_wrong(previous: Option<&Evaluation>) -> bool {
    matches!(
        previous,
        Some(eval) if matches!(eval.label, Label::Mistake | Label::Blunder)
    )
}

/// Crucial swing: between the two preceding plies the evaluation crossed the
/// neutral line in the mover's favor, by more than [`GREAT_SWING_CP`].
pub fn next_move_was_crucial(
    color: Color,
    before: Option<&Evaluation>,
    current: Option<&Evaluation>,
) -> bool {
    let (Some(before), Some(current)) = (before, current) else {
        return false;
    };
    let flipped = match color {
        Color::White => before.score.value() <= 0 && current.score.value() > 0,
        Color::Black => before.score.value() >= 0 && current.score.value() < 0,
    };
    let swing = (before.score.value() as i64 - current.score.value() as i64).abs();
    flipped && swing > GREAT_SWING_CP
}

fn winning_for(color: Color, score_value: i32) -> bool {
    match color {
        Color::White => score_value > 0,
        Color::Black => score_value < 0,
    }
}

/// Only-good-move: the previous position's best line keeps the mover winning
/// while the engine's second line does not.
pub fn only_good_move(color: Color, previous: Option<&Evaluation>) -> bool {
    let Some(previous) = previous else {
        return false;
    };
    let Some(alt) = &previous.alt_line else {
        return false;
    };
    winning_for(color, previous.score.value()) && !winning_for(color, alt.score.value())
}

/// Whether the move the given side is about to make may qualify as `Great`:
/// either the position just swung decisively, or there was exactly one move
/// keeping the win. Computed by the orchestrator from the evaluations one and
/// two plies back, before each [`classify`] call.
pub fn may_qualify_great(
    color: Color,
    two_back: Option<&Evaluation>,
    one_back: Option<&Evaluation>,
) -> bool {
    next_move_was_crucial(color, two_back, one_back) || only_good_move(color, one_back)
}

/// Assign a quality label to one played move.
///
/// `raw` is the engine's evaluation of the position after `mv`, signed from
/// the side to move as engines report it; `previous` is the finished
/// evaluation of the preceding move (`None` for the first move of a game).
/// Pure function of its arguments: identical inputs give identical output.
pub fn classify(
    mv: &PlayedMove,
    raw: RawEval,
    previous: Option<&Evaluation>,
    may_be_great: bool,
) -> Evaluation {
    let turn = mv.position_after.turn();

    if mv.position_after.is_checkmate() {
        // The side to move is the side that got mated.
        return match turn {
            Color::Black => Evaluation::checkmate_white(),
            Color::White => Evaluation::checkmate_black(),
        };
    }

    // Normalize so positive favors white. Engine scores are relative to the
    // side to move; the alt line is flipped on the same condition, sign only,
    // regardless of score kind.
    let mut raw = raw;
    if turn == Color::Black {
        raw.score = raw.score.flip();
        if let Some(alt) = raw.alt_line.as_mut() {
            alt.score = alt.score.flip();
        }
    }

    // What the engine wanted played in this position, recorded before the
    // move was made.
    let best_move = previous.and_then(|eval| eval.pv.first().cloned());

    // An opening-book lookup would slot in here and assign Label::Book;
    // there is no book source, so the variant stays unassigned.

    let tentative = (best_move.as_deref() == Some(mv.uci.as_str())).then_some(Label::Best);

    // Positive = the mover gave up win chance.
    let lost = match previous {
        Some(prev) => {
            let lost = win_chance_lost(prev.score, raw.score);
            match turn {
                Color::Black => lost,
                Color::White => -lost,
            }
        }
        None => 0.0,
    };

    let mut label = match tentative {
        Some(label) => label,
        None => match previous {
            None => Label::Undefined,
            Some(_) => {
                if lost <= 2.0 {
                    Label::Excellent
                } else if lost <= 5.0 {
                    Label::Good
                } else if lost <= 10.0 {
                    Label::Inaccuracy
                } else if lost <= 20.0 {
                    Label::Mistake
                } else {
                    Label::Blunder
                }
            }
        },
    };

    if label == Label::Best {
        if let Some(prev) = previous {
            if prev.is_forced() {
                label = Label::Forced;
            } else if is_sacrifice(mv) {
                label = Label::Brilliant;
            } else if may_be_great {
                label = Label::Great;
            }
        }
    }

    if opponent_went_wrong(previous) && lost >= 5.0 {
        label = Label::Missed;
    }

    Evaluation {
        score: raw.score,
        pv: raw.pv,
        alt_line: raw.alt_line,
        label,
        opening: None,
        best_move,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::{AltEval, EngineScore};
    use crate::game::{position_from_fen, replay_san, replay_uci};
    use shakmaty::Chess;

    fn raw(score: EngineScore) -> RawEval {
        RawEval {
            score,
            pv: vec!["a2a3".to_string()],
            alt_line: None,
        }
    }

    fn alt(score: EngineScore) -> Option<AltEval> {
        Some(AltEval {
            score,
            pv: vec!["h7h6".to_string()],
        })
    }

    /// A finished evaluation to feed back in as the previous move's result.
    fn previous(score: EngineScore, label: Label, pv: &[&str]) -> Evaluation {
        Evaluation {
            score,
            pv: pv.iter().map(|s| s.to_string()).collect(),
            alt_line: alt(EngineScore::Cp(0)),
            label,
            opening: None,
            best_move: None,
        }
    }

    #[test]
    fn checkmate_beats_everything() {
        // Fool's mate: black mates; the raw score is nonsense on purpose.
        let history = replay_san(Chess::default(), &["f3", "e5", "g4", "Qh4#"]).unwrap();
        let prev = previous(EngineScore::Cp(500), Label::Blunder, &["h2h4"]);
        let eval = classify(
            history.last().unwrap(),
            raw(EngineScore::Cp(500)),
            Some(&prev),
            true,
        );
        assert_eq!(eval.label, Label::Checkmate);
        assert_eq!(eval.score, EngineScore::CHECKMATE_BLACK);
    }

    #[test]
    fn one_move_game_ending_in_mate() {
        // Mate in one out of a fixed position; white delivers it.
        let start =
            position_from_fen("6k1/5ppp/8/8/8/8/5PPP/3R2K1 w - - 0 1").unwrap();
        let history = replay_uci(start, &["d1d8"]).unwrap();
        let eval = classify(&history[0], raw(EngineScore::Cp(0)), None, false);
        assert_eq!(eval.label, Label::Checkmate);
        assert_eq!(eval.score, EngineScore::CHECKMATE_WHITE);
    }

    #[test]
    fn first_move_is_undefined() {
        let history = replay_san(Chess::default(), &["e4"]).unwrap();
        let eval = classify(&history[0], raw(EngineScore::Cp(-30)), None, false);
        assert_eq!(eval.label, Label::Undefined);
        assert_eq!(eval.best_move, None);
        // White moved, so the score was reported from black's perspective
        // and gets flipped.
        assert_eq!(eval.score, EngineScore::Cp(30));
    }

    #[test]
    fn matching_the_engine_line_is_best() {
        let history = replay_san(Chess::default(), &["e4", "e5", "Nf3"]).unwrap();
        let prev = previous(EngineScore::Cp(20), Label::Excellent, &["g1f3", "b8c6"]);
        let eval = classify(
            &history[2],
            raw(EngineScore::Cp(-15)),
            Some(&prev),
            false,
        );
        assert_eq!(eval.label, Label::Best);
        assert_eq!(eval.best_move.as_deref(), Some("g1f3"));
    }

    #[test]
    fn best_is_never_downgraded_by_the_buckets() {
        // Huge win-chance loss, but the move still matches the engine line
        // and the opponent did not just blunder.
        let history = replay_san(Chess::default(), &["e4", "e5", "Nf3"]).unwrap();
        let prev = previous(EngineScore::Cp(500), Label::Excellent, &["g1f3"]);
        let eval = classify(
            &history[2],
            raw(EngineScore::Cp(500)),
            Some(&prev),
            false,
        );
        // Normalized score is -500 for white: a 40+ point win-chance drop.
        assert_eq!(eval.label, Label::Best);
    }

    #[test]
    fn forced_when_previous_had_no_alt_line() {
        let history = replay_san(Chess::default(), &["e4", "e5", "Nf3"]).unwrap();
        let mut prev = previous(EngineScore::Cp(20), Label::Excellent, &["g1f3"]);
        prev.alt_line = None;
        let eval = classify(
            &history[2],
            raw(EngineScore::Cp(-15)),
            Some(&prev),
            false,
        );
        assert_eq!(eval.label, Label::Forced);
    }

    #[test]
    fn great_when_the_moment_was_crucial() {
        let history = replay_san(Chess::default(), &["e4", "e5", "Nf3"]).unwrap();
        let prev = previous(EngineScore::Cp(20), Label::Excellent, &["g1f3"]);
        let eval = classify(&history[2], raw(EngineScore::Cp(-15)), Some(&prev), true);
        assert_eq!(eval.label, Label::Great);
    }

    #[test]
    fn brilliant_when_the_best_move_is_a_sacrifice() {
        // Queen grabs the h7 pawn defended only by the rook, and the engine
        // agrees it is the move.
        let start =
            position_from_fen("rnbqkbnr/pppppppp/8/8/8/7Q/PPPPPPPP/RNB1KBNR w KQkq - 0 1")
                .unwrap();
        let history = replay_uci(start, &["h3h7"]).unwrap();
        let prev = previous(EngineScore::Cp(50), Label::Excellent, &["h3h7"]);
        let eval = classify(&history[0], raw(EngineScore::Cp(-40)), Some(&prev), false);
        assert_eq!(eval.label, Label::Brilliant);
    }

    #[test]
    fn pawn_moves_are_never_brilliant() {
        // A pawn capture matching the engine line stays Best even onto a
        // contested square.
        let history = replay_san(Chess::default(), &["e4", "d5", "exd5"]).unwrap();
        let prev = previous(EngineScore::Cp(60), Label::Excellent, &["e4d5"]);
        let eval = classify(&history[2], raw(EngineScore::Cp(-55)), Some(&prev), false);
        assert_eq!(eval.label, Label::Best);
    }

    #[test]
    fn buckets_follow_win_chance_lost() {
        // White makes a quiet move; the engine replies with increasingly
        // rosy scores for black. Previous evaluation is neutral.
        let history = replay_san(Chess::default(), &["Nf3"]).unwrap();
        let cases = [
            (10, Label::Excellent),
            (40, Label::Good),
            (100, Label::Inaccuracy),
            (200, Label::Mistake),
            (600, Label::Blunder),
        ];
        for (black_cp, expected) in cases {
            let prev = previous(EngineScore::Cp(0), Label::Excellent, &["d2d4"]);
            let eval = classify(
                &history[0],
                raw(EngineScore::Cp(black_cp)),
                Some(&prev),
                false,
            );
            assert_eq!(eval.label, expected, "engine cp {}", black_cp);
        }
    }

    #[test]
    fn missed_overrides_the_bucket_after_an_opponent_error() {
        // The opponent just blundered, and white hands the advantage back.
        let history = replay_san(Chess::default(), &["Nf3"]).unwrap();
        let prev = previous(EngineScore::Cp(200), Label::Blunder, &["d2d4"]);
        let eval = classify(&history[0], raw(EngineScore::Cp(0)), Some(&prev), false);
        assert_eq!(eval.label, Label::Missed);
    }

    #[test]
    fn missed_overrides_even_a_best_move_bucket() {
        // Matching the engine line does not excuse failing to punish when
        // the loss is still large; rule order puts Missed last.
        let history = replay_san(Chess::default(), &["Nf3"]).unwrap();
        let prev = previous(EngineScore::Cp(300), Label::Mistake, &["g1f3"]);
        let eval = classify(&history[0], raw(EngineScore::Cp(0)), Some(&prev), false);
        assert_eq!(eval.label, Label::Missed);
    }

    #[test]
    fn small_loss_after_opponent_error_is_not_missed() {
        let history = replay_san(Chess::default(), &["Nf3"]).unwrap();
        let prev = previous(EngineScore::Cp(30), Label::Blunder, &["d2d4"]);
        let eval = classify(&history[0], raw(EngineScore::Cp(-25)), Some(&prev), false);
        assert_ne!(eval.label, Label::Missed);
    }

    #[test]
    fn hanging_the_queen_is_a_blunder_and_a_sacrifice() {
        // 1. e4 g6 2. Qh5?? gxh5 next: a huge win-chance drop, and the queen
        // move itself trips the one-ply sacrifice heuristic.
        let history = replay_san(Chess::default(), &["e4", "g6", "Qh5"]).unwrap();
        let queen_move = &history[2];
        assert!(is_sacrifice(queen_move));

        let prev = previous(EngineScore::Cp(30), Label::Excellent, &["g1f3"]);
        let eval = classify(
            queen_move,
            raw(EngineScore::Cp(900)),
            Some(&prev),
            false,
        );
        assert_eq!(eval.label, Label::Blunder);
    }

    #[test]
    fn normalization_flips_the_alt_line_with_the_score() {
        // After a white move it is black's turn, so both lines flip sign.
        let history = replay_san(Chess::default(), &["e4"]).unwrap();
        let mut input = raw(EngineScore::Cp(-20));
        input.alt_line = alt(EngineScore::Mate(2));
        let eval = classify(&history[0], input, None, false);
        assert_eq!(eval.score, EngineScore::Cp(20));
        assert_eq!(eval.alt_line.unwrap().score, EngineScore::Mate(-2));
    }

    #[test]
    fn no_flip_after_a_black_move() {
        let history = replay_san(Chess::default(), &["e4", "e5"]).unwrap();
        let eval = classify(&history[1], raw(EngineScore::Cp(25)), None, false);
        assert_eq!(eval.score, EngineScore::Cp(25));
    }

    #[test]
    fn classify_is_idempotent() {
        let history = replay_san(Chess::default(), &["e4", "e5", "Nf3"]).unwrap();
        let prev = previous(EngineScore::Cp(20), Label::Excellent, &["g1f3"]);
        let input = RawEval {
            score: EngineScore::Cp(-15),
            pv: vec!["b8c6".to_string()],
            alt_line: alt(EngineScore::Cp(-5)),
        };
        let first = classify(&history[2], input.clone(), Some(&prev), true);
        let second = classify(&history[2], input, Some(&prev), true);
        assert_eq!(first, second);
    }

    #[test]
    fn crucial_swing_requires_a_real_flip() {
        let before = previous(EngineScore::Cp(-100), Label::Excellent, &[]);
        let current = previous(EngineScore::Cp(100), Label::Excellent, &[]);
        assert!(next_move_was_crucial(
            Color::White,
            Some(&before),
            Some(&current)
        ));

        // Same side of the line: no flip.
        let both_ahead = previous(EngineScore::Cp(50), Label::Excellent, &[]);
        assert!(!next_move_was_crucial(
            Color::White,
            Some(&both_ahead),
            Some(&current)
        ));

        // Flip too small to matter.
        let slight_minus = previous(EngineScore::Cp(-40), Label::Excellent, &[]);
        let slight_plus = previous(EngineScore::Cp(40), Label::Excellent, &[]);
        assert!(!next_move_was_crucial(
            Color::White,
            Some(&slight_minus),
            Some(&slight_plus)
        ));
    }

    #[test]
    fn crucial_swing_for_black_mirrors_white() {
        let before = previous(EngineScore::Cp(100), Label::Excellent, &[]);
        let current = previous(EngineScore::Cp(-100), Label::Excellent, &[]);
        assert!(next_move_was_crucial(
            Color::Black,
            Some(&before),
            Some(&current)
        ));
        assert!(!next_move_was_crucial(
            Color::White,
            Some(&before),
            Some(&current)
        ));
    }

    #[test]
    fn only_good_move_needs_a_losing_alt_line() {
        let mut prev = previous(EngineScore::Cp(50), Label::Excellent, &[]);
        prev.alt_line = alt(EngineScore::Cp(-20));
        assert!(only_good_move(Color::White, Some(&prev)));

        prev.alt_line = alt(EngineScore::Cp(30));
        assert!(!only_good_move(Color::White, Some(&prev)));

        // A forced position has no alt line and therefore no choice to praise.
        prev.alt_line = None;
        assert!(!only_good_move(Color::White, Some(&prev)));
        assert!(!only_good_move(Color::White, None));
    }
}
