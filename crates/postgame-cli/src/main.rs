//! Command-line driver: replay a move list, analyze it with a UCI engine,
//! print the labeled report.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use postgame_analysis::{AnalysisConfig, GameAnalyzer};
use postgame_core::shakmaty::Chess;
use postgame_core::{replay_san, replay_uci, Evaluation, GameReport, PlayedMove};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "postgame")]
#[command(about = "Post-game chess analysis with a UCI engine")]
struct Cli {
    /// File with whitespace-separated moves (SAN unless --uci)
    moves: PathBuf,
    /// Interpret the move list as long-algebraic (UCI) tokens
    #[arg(long)]
    uci: bool,
    /// UCI engine executable (overrides postgame.toml)
    #[arg(short, long)]
    engine: Option<String>,
    /// Search depth per position (overrides postgame.toml)
    #[arg(short, long)]
    depth: Option<u32>,
    /// Print the analysis as JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut config = AnalysisConfig::load().context("loading postgame.toml")?;
    if let Some(engine) = cli.engine {
        config.engine_path = engine;
    }
    if let Some(depth) = cli.depth {
        config.depth = depth;
    }

    let text = std::fs::read_to_string(&cli.moves)
        .with_context(|| format!("reading {}", cli.moves.display()))?;
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.is_empty() {
        bail!("no moves in {}", cli.moves.display());
    }

    let history = if cli.uci {
        replay_uci(Chess::default(), &tokens)?
    } else {
        replay_san(Chess::default(), &tokens)?
    };

    let mut analyzer = GameAnalyzer::new(config)
        .await
        .context("starting the analysis engine")?;
    eprintln!("Analyzing {} moves with {}", history.len(), analyzer.engine_name());

    let evaluations = analyzer
        .analyze_game(&history, |percent, label| {
            eprint!("\r{:>3}% {:<32}", percent, label.unwrap_or(""));
            let _ = std::io::stderr().flush();
        })
        .await?;
    eprintln!();

    let report = GameReport::from_evaluations(&history, &evaluations);
    if cli.json {
        print_json(&history, &evaluations, &report)?;
    } else {
        print_table(&history, &evaluations);
        print_summary(&report);
    }

    analyzer.shutdown().await?;
    Ok(())
}

fn print_table(history: &[PlayedMove], evaluations: &[Evaluation]) {
    println!("{:>5} {:<8} {:>7}  {:<10} {}", "#", "Move", "Score", "Label", "Best");
    for (i, (mv, evaluation)) in history.iter().zip(evaluations).enumerate() {
        let number = if i % 2 == 0 {
            format!("{}.", i / 2 + 1)
        } else {
            format!("{}...", i / 2 + 1)
        };
        let best = if evaluation.label.should_show_best() {
            evaluation.best_move.as_deref().unwrap_or("")
        } else {
            ""
        };
        println!(
            "{:>5} {:<8} {:>7}  {:<10} {}",
            number,
            mv.san,
            evaluation.score.to_string(),
            evaluation.label.to_string(),
            best
        );
    }
}

fn print_summary(report: &GameReport) {
    for (side, summary) in [("White", &report.white), ("Black", &report.black)] {
        println!(
            "{}: {}% accuracy ({} best, {} excellent, {} good, {} inaccuracies, {} mistakes, {} blunders)",
            side,
            summary.accuracy,
            summary.brilliant + summary.great + summary.best,
            summary.excellent,
            summary.good,
            summary.inaccuracies,
            summary.mistakes + summary.missed,
            summary.blunders
        );
    }
}

/// JSON shape for one analyzed move.
#[derive(Serialize)]
struct MoveJson<'a> {
    san: &'a str,
    uci: &'a str,
    #[serde(flatten)]
    evaluation: &'a Evaluation,
}

/// JSON shape for the whole analysis.
#[derive(Serialize)]
struct AnalysisJson<'a> {
    moves: Vec<MoveJson<'a>>,
    report: &'a GameReport,
}

fn print_json(
    history: &[PlayedMove],
    evaluations: &[Evaluation],
    report: &GameReport,
) -> anyhow::Result<()> {
    let moves = history
        .iter()
        .zip(evaluations)
        .map(|(mv, evaluation)| MoveJson {
            san: &mv.san,
            uci: &mv.uci,
            evaluation,
        })
        .collect();
    let analysis = AnalysisJson { moves, report };
    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}
