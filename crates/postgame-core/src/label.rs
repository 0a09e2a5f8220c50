//! Move quality labels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Quality label assigned to one played move.
///
/// `Book` is reserved for opening-book positions; no book source is wired up,
/// so it is currently never assigned. `Undefined` labels the first move of a
/// game (nothing to compare against) and doubles as the no-selection sentinel
/// for display layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    /// A winning sacrifice the engine agrees with.
    Brilliant,
    /// The only good move in a critical moment.
    Great,
    /// The engine's top choice.
    Best,
    Excellent,
    Good,
    /// Opening-book move (reserved).
    Book,
    Inaccuracy,
    Mistake,
    /// Failed to punish the opponent's mistake.
    Missed,
    Blunder,
    /// The only reasonable move; the engine saw no alternative line.
    Forced,
    Checkmate,
    Undefined,
}

impl Label {
    /// Whether a display layer should show the engine's best move next to a
    /// move with this label. Pointless when the move already was the best
    /// line (or there was no choice at all).
    pub fn should_show_best(self) -> bool {
        !matches!(
            self,
            Label::Brilliant
                | Label::Great
                | Label::Best
                | Label::Book
                | Label::Forced
                | Label::Checkmate
        )
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Label::Brilliant => "Brilliant",
            Label::Great => "Great",
            Label::Best => "Best",
            Label::Excellent => "Excellent",
            Label::Good => "Good",
            Label::Book => "Book",
            Label::Inaccuracy => "Inaccuracy",
            Label::Mistake => "Mistake",
            Label::Missed => "Missed",
            Label::Blunder => "Blunder",
            Label::Forced => "Forced",
            Label::Checkmate => "Checkmate",
            Label::Undefined => "Undefined",
        };
        write!(f, "{}", name)
    }
}
