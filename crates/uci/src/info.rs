//! UCI info line parsing.

use serde::{Deserialize, Serialize};

/// Score in centipawns or mate distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Score {
    /// Centipawn score (100 = 1 pawn advantage).
    Cp(i32),
    /// Mate in N moves (positive = engine winning, negative = engine losing).
    Mate(i32),
}

/// Search information from an engine `info` line.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EngineInfo {
    /// Search depth in plies.
    pub depth: Option<u32>,
    /// Selective search depth.
    pub seldepth: Option<u32>,
    /// Ranked line number in MultiPV mode (1 = best line).
    pub multipv: Option<u32>,
    /// Score evaluation.
    pub score: Option<Score>,
    /// Nodes searched.
    pub nodes: Option<u64>,
    /// Nodes per second.
    pub nps: Option<u64>,
    /// Time spent in milliseconds.
    pub time: Option<u64>,
    /// Hash table usage (per mille).
    pub hashfull: Option<u32>,
    /// Current move being searched.
    pub currmove: Option<String>,
    /// Principal variation (best line found).
    pub pv: Vec<String>,
    /// Arbitrary string info.
    pub string: Option<String>,
}

impl EngineInfo {
    /// Parse a UCI info line.
    ///
    /// Unknown tokens are skipped so engine-specific additions do not break
    /// parsing. Returns `None` if the line does not start with `info`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if !line.starts_with("info") {
            return None;
        }

        let mut info = EngineInfo::default();
        let parts: Vec<&str> = line.split_whitespace().collect();
        let mut i = 1; // Skip "info"

        while i < parts.len() {
            match parts[i] {
                "depth" => {
                    i += 1;
                    if i < parts.len() {
                        info.depth = parts[i].parse().ok();
                    }
                }
                "seldepth" => {
                    i += 1;
                    if i < parts.len() {
                        info.seldepth = parts[i].parse().ok();
                    }
                }
                "multipv" => {
                    i += 1;
                    if i < parts.len() {
                        info.multipv = parts[i].parse().ok();
                    }
                }
                "score" => {
                    i += 1;
                    if i < parts.len() {
                        match parts[i] {
                            "cp" => {
                                i += 1;
                                if i < parts.len() {
                                    if let Ok(cp) = parts[i].parse() {
                                        info.score = Some(Score::Cp(cp));
                                    }
                                }
                            }
                            "mate" => {
                                i += 1;
                                if i < parts.len() {
                                    if let Ok(m) = parts[i].parse() {
                                        info.score = Some(Score::Mate(m));
                                    }
                                }
                            }
                            _ => {}
                        }
                    }
                }
                "nodes" => {
                    i += 1;
                    if i < parts.len() {
                        info.nodes = parts[i].parse().ok();
                    }
                }
                "nps" => {
                    i += 1;
                    if i < parts.len() {
                        info.nps = parts[i].parse().ok();
                    }
                }
                "time" => {
                    i += 1;
                    if i < parts.len() {
                        info.time = parts[i].parse().ok();
                    }
                }
                "hashfull" => {
                    i += 1;
                    if i < parts.len() {
                        info.hashfull = parts[i].parse().ok();
                    }
                }
                "currmove" => {
                    i += 1;
                    if i < parts.len() {
                        info.currmove = Some(parts[i].to_string());
                    }
                }
                "pv" => {
                    i += 1;
                    // Collect all remaining moves until another keyword or end
                    while i < parts.len() && !is_info_keyword(parts[i]) {
                        info.pv.push(parts[i].to_string());
                        i += 1;
                    }
                    continue; // Don't increment i again
                }
                "string" => {
                    i += 1;
                    // Rest of line is the string
                    info.string = Some(parts[i..].join(" "));
                    break;
                }
                _ => {}
            }
            i += 1;
        }

        Some(info)
    }
}

fn is_info_keyword(s: &str) -> bool {
    matches!(
        s,
        "depth"
            | "seldepth"
            | "multipv"
            | "score"
            | "nodes"
            | "nps"
            | "time"
            | "hashfull"
            | "currmove"
            | "currmovenumber"
            | "pv"
            | "string"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_info() {
        let line = "info depth 12 score cp 30 nodes 125000 nps 500000 pv e2e4 e7e5 g1f3";
        let info = EngineInfo::parse(line).unwrap();

        assert_eq!(info.depth, Some(12));
        assert_eq!(info.score, Some(Score::Cp(30)));
        assert_eq!(info.nodes, Some(125000));
        assert_eq!(info.nps, Some(500000));
        assert_eq!(info.pv, vec!["e2e4", "e7e5", "g1f3"]);
    }

    #[test]
    fn parse_multipv_line() {
        let line = "info depth 8 seldepth 11 multipv 2 score cp -15 nodes 9000 nps 450000 time 20 pv e7e5 g1f3";
        let info = EngineInfo::parse(line).unwrap();

        assert_eq!(info.depth, Some(8));
        assert_eq!(info.seldepth, Some(11));
        assert_eq!(info.multipv, Some(2));
        assert_eq!(info.score, Some(Score::Cp(-15)));
        assert_eq!(info.time, Some(20));
        assert_eq!(info.pv, vec!["e7e5", "g1f3"]);
    }

    #[test]
    fn parse_mate_score() {
        let line = "info depth 20 score mate 3 pv e2e4";
        let info = EngineInfo::parse(line).unwrap();

        assert_eq!(info.score, Some(Score::Mate(3)));
    }

    #[test]
    fn parse_negative_mate_score() {
        let line = "info depth 14 score mate -2 pv h7h6";
        let info = EngineInfo::parse(line).unwrap();

        assert_eq!(info.score, Some(Score::Mate(-2)));
    }

    #[test]
    fn parse_hashfull() {
        let line = "info depth 8 seldepth 9 multipv 1 score cp 5 nodes 100 nps 50 hashfull 12 time 3 pv d2d4";
        let info = EngineInfo::parse(line).unwrap();

        assert_eq!(info.hashfull, Some(12));
        assert_eq!(info.pv, vec!["d2d4"]);
    }

    #[test]
    fn parse_missing_score() {
        let line = "info depth 15 nodes 50000 pv e2e4";
        let info = EngineInfo::parse(line).unwrap();

        assert_eq!(info.depth, Some(15));
        assert_eq!(info.score, None);
    }

    #[test]
    fn parse_currmove_line() {
        let line = "info depth 20 currmove e2e4 currmovenumber 1";
        let info = EngineInfo::parse(line).unwrap();

        assert_eq!(info.currmove, Some("e2e4".to_string()));
        assert_eq!(info.multipv, None);
        assert!(info.pv.is_empty());
    }

    #[test]
    fn parse_string_consumes_rest() {
        let line = "info string NNUE evaluation using nn-1c0000000000.nnue";
        let info = EngineInfo::parse(line).unwrap();

        assert_eq!(
            info.string.as_deref(),
            Some("NNUE evaluation using nn-1c0000000000.nnue")
        );
    }

    #[test]
    fn non_info_line_is_none() {
        assert!(EngineInfo::parse("bestmove e2e4").is_none());
    }
}
