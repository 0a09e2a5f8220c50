//! Material sacrifice detection.
//!
//! A one-ply heuristic: it looks at the destination square right after the
//! move and asks whether the opponent can profitably take the piece back.
//! It does not search deeper than that single recapture.

use crate::game::PlayedMove;
use shakmaty::{Position, Role};

/// Material value used by the trade heuristic. The king is priceless, so it
/// never counts as a cheap recapture.
fn piece_value(role: Role) -> u32 {
    match role {
        Role::Pawn => 1,
        Role::Knight | Role::Bishop => 3,
        Role::Rook => 5,
        Role::Queen => 9,
        Role::King => u32::MAX,
    }
}

fn is_losing_trade(piece: u32, defenders: &[u32], covered: bool) -> bool {
    if !covered {
        // Nobody backs the piece up; any recapture wins material.
        return true;
    }
    // A cheaper attacker can always take profitably, cover or not.
    defenders.iter().any(|&defender| defender < piece)
}

/// Whether the move gives up material without a favorable recapture.
///
/// Pawn moves never qualify. For captures the moved piece must additionally
/// be worth more than what it took.
pub fn is_sacrifice(mv: &PlayedMove) -> bool {
    if mv.role == Role::Pawn {
        return false;
    }

    let board = mv.position_after.board();
    let occupied = board.occupied();

    let defenders: Vec<u32> = board
        .attacks_to(mv.to, !mv.color, occupied)
        .into_iter()
        .filter_map(|square| board.role_at(square))
        .map(piece_value)
        .collect();

    if defenders.is_empty() {
        return false;
    }

    let piece = piece_value(mv.role);
    let covered = board.attacks_to(mv.to, mv.color, occupied).any();

    match mv.capture {
        Some(captured) => {
            piece > piece_value(captured) && is_losing_trade(piece, &defenders, covered)
        }
        None => is_losing_trade(piece, &defenders, covered),
    }
}
