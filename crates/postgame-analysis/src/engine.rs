//! Asynchronous UCI engine adapter.

use std::process::Stdio;
use std::time::Duration;

use postgame_core::{AltEval, EngineScore, RawEval};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use uci::{EngineMessage, GoOptions, GuiCommand, Score};

use crate::config::AnalysisConfig;

/// Maximum number of lines to read while waiting for a handshake response.
pub const MAX_UCI_LINES: usize = 1000;

/// Principal variations requested from the engine. The classifier needs the
/// second line for forced-move and only-good-move detection.
const MULTI_PV: u32 = 2;

/// Errors from the engine process or its protocol.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Failed to spawn the engine process or talk to its pipes.
    #[error("engine I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// The UCI handshake did not complete.
    #[error("engine initialization failed")]
    InitFailed,
    /// The engine closed its output stream; the process is gone and every
    /// later request will fail until a new engine is spawned.
    #[error("engine closed unexpectedly")]
    Closed,
    /// An info line at the requested depth was missing its score. Fatal to
    /// the current request only; the adapter stays usable.
    #[error("malformed info line at depth {depth}: {line}")]
    ProtocolParse { depth: u32, line: String },
    /// The search finished without a single depth-matching info line.
    #[error("no evaluation at depth {0} before bestmove")]
    NoEvaluation(u32),
    /// The per-position time budget ran out.
    #[error("evaluation timed out after {0:?}")]
    Timeout(Duration),
}

/// Wrapper around one UCI engine process used for position evaluation.
///
/// The adapter serves one request at a time: `&mut self` on
/// [`evaluate`](Self::evaluate) means a second request cannot be issued
/// before the first resolves.
pub struct AnalysisEngine {
    child: Child,
    stdin: ChildStdin,
    stdout: Lines<BufReader<ChildStdout>>,
    name: String,
    move_timeout: Duration,
}

impl AnalysisEngine {
    /// Spawn the configured engine and run the UCI session setup: thread
    /// count (when configured), `MultiPV 2`, zero move overhead, the
    /// `uci`/`isready` handshake, and `ucinewgame`.
    pub async fn spawn(config: &AnalysisConfig) -> Result<Self, EngineError> {
        let mut child = Command::new(&config.engine_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        let stdin = child.stdin.take().ok_or(EngineError::InitFailed)?;
        let stdout = child.stdout.take().ok_or(EngineError::InitFailed)?;

        let mut engine = Self {
            child,
            stdin,
            stdout: BufReader::new(stdout).lines(),
            name: String::new(),
            move_timeout: Duration::from_millis(config.move_timeout_ms),
        };
        engine.init(config).await?;
        Ok(engine)
    }

    async fn init(&mut self, config: &AnalysisConfig) -> Result<(), EngineError> {
        if let Some(threads) = config.threads {
            self.send(&GuiCommand::set_option("Threads", threads)).await?;
        }
        self.send(&GuiCommand::set_option("MultiPV", MULTI_PV)).await?;
        self.send(&GuiCommand::set_option("Move Overhead", 0)).await?;

        self.send(&GuiCommand::Uci).await?;
        let mut name = String::new();
        let mut lines_read = 0;
        loop {
            if lines_read > MAX_UCI_LINES {
                return Err(EngineError::InitFailed);
            }
            lines_read += 1;
            match EngineMessage::parse(&self.read_line().await?) {
                Some(EngineMessage::Id { name: Some(id), .. }) => name = id,
                Some(EngineMessage::UciOk) => break,
                _ => {}
            }
        }
        self.name = if name.is_empty() {
            "Unknown Engine".to_string()
        } else {
            name
        };

        self.send(&GuiCommand::IsReady).await?;
        let mut lines_read = 0;
        loop {
            if lines_read > MAX_UCI_LINES {
                return Err(EngineError::InitFailed);
            }
            lines_read += 1;
            if let Some(EngineMessage::ReadyOk) = EngineMessage::parse(&self.read_line().await?) {
                break;
            }
        }

        self.send(&GuiCommand::UciNewGame).await?;
        Ok(())
    }

    /// Engine name from the UCI `id` handshake.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Evaluate a position, suspending until the engine reports `bestmove`.
    ///
    /// Writes exactly two commands (`position fen`, `go depth`) and collects
    /// `info` lines whose `depth` field equals `depth`. The `multipv 1` line
    /// fills the primary evaluation, higher ranks fill the alt line, and
    /// repeated lines overwrite earlier ones. Resolves on `bestmove`; a
    /// search that never produced a matching line is [`EngineError::NoEvaluation`].
    pub async fn evaluate(&mut self, fen: &str, depth: u32) -> Result<RawEval, EngineError> {
        self.send(&GuiCommand::Position {
            fen: Some(fen.to_string()),
            moves: Vec::new(),
        })
        .await?;
        self.send(&GuiCommand::Go(GoOptions::depth(depth))).await?;

        let timeout = self.move_timeout;
        match tokio::time::timeout(timeout, self.collect_evaluation(depth)).await {
            Ok(result) => result,
            Err(_) => {
                // Wind the search down and drain its tail so the next
                // request starts from a clean stream.
                let _ = self.send(&GuiCommand::Stop).await;
                let _ = tokio::time::timeout(
                    Duration::from_secs(1),
                    self.drain_until_bestmove(),
                )
                .await;
                Err(EngineError::Timeout(timeout))
            }
        }
    }

    async fn collect_evaluation(&mut self, depth: u32) -> Result<RawEval, EngineError> {
        let mut primary: Option<RawEval> = None;
        let mut alt_line: Option<AltEval> = None;
        // A malformed line fails this request, but the search is still read
        // through to bestmove so the adapter stays in sync.
        let mut parse_error: Option<EngineError> = None;

        loop {
            let line = self.read_line().await?;
            match EngineMessage::parse(&line) {
                Some(EngineMessage::BestMove { .. }) => {
                    if let Some(error) = parse_error {
                        return Err(error);
                    }
                    let mut raw = primary.ok_or(EngineError::NoEvaluation(depth))?;
                    raw.alt_line = alt_line;
                    return Ok(raw);
                }
                Some(EngineMessage::Info(info)) => {
                    if parse_error.is_some() {
                        continue;
                    }
                    // Filter on the depth field only; seldepth and multipv
                    // must be present but are never compared (engines often
                    // report seldepth past the requested depth).
                    if info.depth != Some(depth) || info.seldepth.is_none() {
                        continue;
                    }
                    let Some(multipv) = info.multipv else {
                        continue;
                    };
                    let Some(score) = info.score else {
                        parse_error = Some(EngineError::ProtocolParse {
                            depth,
                            line: line.clone(),
                        });
                        continue;
                    };
                    let score = to_engine_score(score);
                    if multipv == 1 {
                        primary = Some(RawEval {
                            score,
                            pv: info.pv,
                            alt_line: None,
                        });
                    } else {
                        alt_line = Some(AltEval {
                            score,
                            pv: info.pv,
                        });
                    }
                }
                _ => {}
            }
        }
    }

    async fn drain_until_bestmove(&mut self) -> Result<(), EngineError> {
        loop {
            if let Some(EngineMessage::BestMove { .. }) =
                EngineMessage::parse(&self.read_line().await?)
            {
                return Ok(());
            }
        }
    }

    /// Send `quit` and wait for the process to exit.
    pub async fn quit(mut self) -> Result<(), EngineError> {
        self.send(&GuiCommand::Quit).await?;
        self.child.wait().await?;
        Ok(())
    }

    async fn send(&mut self, command: &GuiCommand) -> Result<(), EngineError> {
        self.stdin.write_all(command.to_uci().as_bytes()).await?;
        self.stdin.write_all(b"\n").await?;
        self.stdin.flush().await?;
        Ok(())
    }

    async fn read_line(&mut self) -> Result<String, EngineError> {
        match self.stdout.next_line().await? {
            Some(line) => Ok(line),
            None => Err(EngineError::Closed),
        }
    }
}

fn to_engine_score(score: Score) -> EngineScore {
    match score {
        Score::Cp(cp) => EngineScore::Cp(cp),
        Score::Mate(moves) => EngineScore::Mate(moves),
    }
}
