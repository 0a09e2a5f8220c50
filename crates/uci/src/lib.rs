//! UCI (Universal Chess Interface) protocol types for analysis clients.
//!
//! This crate provides parsing for the messages a UCI engine prints on its
//! stdout, and formatting for the commands a client writes to its stdin.
//!
//! # Engine messages (parsed)
//!
//! - `id name <name>` / `id author <author>` - Engine identification
//! - `uciok` / `readyok` - Synchronization
//! - `info depth <d> ... multipv <k> score (cp|mate) <v> ... pv <moves>` - Search info
//! - `bestmove <move> [ponder <move>]` - Search finished
//!
//! # Client commands (formatted)
//!
//! - `uci`, `isready`, `ucinewgame`, `stop`, `quit`
//! - `setoption name <name> value <value>`
//! - `position fen <fen> [moves <move>...]`
//! - `go [depth <d>] [movetime <ms>] [infinite]`

mod command;
mod info;

pub use command::{GoOptions, GuiCommand};
pub use info::{EngineInfo, Score};

/// Messages sent from engine to GUI.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineMessage {
    /// Engine identification.
    Id {
        name: Option<String>,
        author: Option<String>,
    },
    /// UCI initialization complete.
    UciOk,
    /// Engine is ready.
    ReadyOk,
    /// Search information.
    Info(EngineInfo),
    /// Best move found.
    BestMove { mv: String, ponder: Option<String> },
}

impl EngineMessage {
    /// Parse one line of engine output.
    ///
    /// Returns `None` for lines that are not recognized UCI engine messages;
    /// engines are free to print arbitrary diagnostics, so unknown lines are
    /// not an error.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let mut parts = line.split_whitespace();

        match parts.next()? {
            "uciok" => Some(EngineMessage::UciOk),
            "readyok" => Some(EngineMessage::ReadyOk),
            "info" => EngineInfo::parse(line).map(EngineMessage::Info),
            "bestmove" => {
                let mv = parts.next()?.to_string();
                let ponder = match (parts.next(), parts.next()) {
                    (Some("ponder"), Some(p)) => Some(p.to_string()),
                    _ => None,
                };
                Some(EngineMessage::BestMove { mv, ponder })
            }
            "id" => match parts.next() {
                Some("name") => Some(EngineMessage::Id {
                    name: Some(parts.collect::<Vec<_>>().join(" ")),
                    author: None,
                }),
                Some("author") => Some(EngineMessage::Id {
                    name: None,
                    author: Some(parts.collect::<Vec<_>>().join(" ")),
                }),
                _ => None,
            },
            _ => None,
        }
    }
}
