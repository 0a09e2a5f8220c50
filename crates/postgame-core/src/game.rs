//! Played-move records built with the `shakmaty` rules library.

use shakmaty::fen::{Fen, ParseFenError};
use shakmaty::san::SanPlus;
use shakmaty::uci::UciMove;
use shakmaty::{
    CastlingMode, Chess, Color, EnPassantMode, Move, Position, PositionError, Role, Square,
};
use thiserror::Error;

/// Errors raised while replaying a game.
#[derive(Error, Debug)]
pub enum GameError {
    /// A FEN string could not be parsed.
    #[error("invalid FEN: {0}")]
    InvalidFen(#[from] ParseFenError),
    /// A parsed setup is not a legal chess position.
    #[error("invalid position: {0}")]
    InvalidPosition(#[from] PositionError<Chess>),
    /// A move token could not be parsed as SAN or UCI.
    #[error("invalid move token '{0}'")]
    InvalidToken(String),
    /// A syntactically valid move is not legal in its position.
    #[error("illegal move '{0}'")]
    IllegalMove(String),
}

/// One played move with the notation and position bookkeeping the classifier
/// needs. Constructed by replaying a game; read-only afterwards.
#[derive(Debug, Clone)]
pub struct PlayedMove {
    /// Standard algebraic notation, with check/mate suffix.
    pub san: String,
    /// Long algebraic (UCI) token, e.g. `e2e4` or `e1g1`.
    pub uci: String,
    /// Side that made the move.
    pub color: Color,
    /// Piece that moved.
    pub role: Role,
    /// Destination square (the king's target square for castling).
    pub to: Square,
    /// Captured piece, if any.
    pub capture: Option<Role>,
    /// Promotion piece, if any.
    pub promotion: Option<Role>,
    /// FEN of the position before the move.
    pub fen_before: String,
    /// FEN of the position after the move.
    pub fen_after: String,
    /// The position after the move.
    pub position_after: Chess,
}

impl PlayedMove {
    fn record(position: &Chess, mv: Move) -> Result<(Self, Chess), GameError> {
        let color = position.turn();
        let san = SanPlus::from_move(position.clone(), mv).to_string();
        let uci_move = mv.to_uci(CastlingMode::Standard);
        let uci = uci_move.to_string();
        let to = match uci_move {
            UciMove::Normal { to, .. } => to,
            _ => return Err(GameError::IllegalMove(uci)),
        };

        let after = position
            .clone()
            .play(mv)
            .map_err(|_| GameError::IllegalMove(uci.clone()))?;

        let record = PlayedMove {
            san,
            uci,
            color,
            role: mv.role(),
            to,
            capture: mv.capture(),
            promotion: mv.promotion(),
            fen_before: Fen::from_position(&position.clone(), EnPassantMode::Legal).to_string(),
            fen_after: Fen::from_position(&after.clone(), EnPassantMode::Legal).to_string(),
            position_after: after.clone(),
        };
        Ok((record, after))
    }
}

/// Parse a FEN into a playable position.
pub fn position_from_fen(fen: &str) -> Result<Chess, GameError> {
    let fen: Fen = fen.parse()?;
    Ok(fen.into_position(CastlingMode::Standard)?)
}

/// Replay a game given in standard algebraic notation.
///
/// `start` is the position before the first token. Returns one record per
/// move, in order.
pub fn replay_san(start: Chess, tokens: &[&str]) -> Result<Vec<PlayedMove>, GameError> {
    let mut position = start;
    let mut history = Vec::with_capacity(tokens.len());
    for token in tokens {
        let san: SanPlus = token
            .parse()
            .map_err(|_| GameError::InvalidToken(token.to_string()))?;
        let mv = san
            .san
            .to_move(&position)
            .map_err(|_| GameError::IllegalMove(token.to_string()))?;
        let (record, after) = PlayedMove::record(&position, mv)?;
        history.push(record);
        position = after;
    }
    Ok(history)
}

/// Replay a game given in long algebraic (UCI) notation.
pub fn replay_uci(start: Chess, tokens: &[&str]) -> Result<Vec<PlayedMove>, GameError> {
    let mut position = start;
    let mut history = Vec::with_capacity(tokens.len());
    for token in tokens {
        let uci: UciMove = token
            .parse()
            .map_err(|_| GameError::InvalidToken(token.to_string()))?;
        let mv = uci
            .to_move(&position)
            .map_err(|_| GameError::IllegalMove(token.to_string()))?;
        let (record, after) = PlayedMove::record(&position, mv)?;
        history.push(record);
        position = after;
    }
    Ok(history)
}
