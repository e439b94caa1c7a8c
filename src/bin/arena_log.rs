//! Command line front end.
//!
//! ```bash
//! # List matches in a log
//! arena-log --log Player.log matches
//!
//! # Revealed cards of the latest match, with names
//! arena-log --log Player.log parse --cards cards.json
//!
//! # Follow the log while a match is played
//! arena-log --log Player.log watch --cards cards.json
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use arena_log::report::{MatchList, RenderedReport};
use arena_log::{ArenaLog, CardRegistry, LiveSession, MatchId, MatchReport};

#[derive(Parser)]
#[command(name = "arena-log")]
#[command(version)]
#[command(about = "Reconstruct revealed cards from MTG Arena client logs")]
struct Cli {
    /// Client log to read (Player.log)
    #[arg(long, short, global = true, default_value = "Player.log")]
    log: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List matches found in the log
    Matches {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Reconstruct one match (the latest unless --match is given)
    Parse {
        /// Match identifier
        #[arg(long = "match", short)]
        match_id: Option<String>,

        /// Reconstruct every match in the log
        #[arg(long, conflicts_with = "match_id")]
        all: bool,

        /// Card database (JSON export) used to name cards
        #[arg(long)]
        cards: Option<PathBuf>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Follow a growing log and re-report the current match
    Watch {
        /// Card database (JSON export) used to name cards
        #[arg(long)]
        cards: Option<PathBuf>,

        /// Poll interval in milliseconds
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Matches { json } => cmd_matches(&cli.log, json),
        Commands::Parse {
            match_id,
            all,
            cards,
            json,
        } => cmd_parse(&cli.log, match_id, all, cards, json),
        Commands::Watch { cards, interval_ms } => cmd_watch(cli.log, cards, interval_ms),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_registry(path: Option<PathBuf>) -> Result<CardRegistry, String> {
    match path {
        Some(path) => {
            let registry = CardRegistry::load(&path).map_err(|e| format!("{}: {}", path.display(), e))?;
            info!(cards = registry.len(), "card database loaded");
            Ok(registry)
        }
        None => Ok(CardRegistry::new()),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {}", e))?;
    println!("{}", text);
    Ok(())
}

fn print_report(report: &MatchReport, registry: &CardRegistry, json: bool) -> Result<(), String> {
    if json {
        print_json(report)
    } else {
        println!("{}", RenderedReport::new(report, registry));
        Ok(())
    }
}

fn cmd_matches(log: &Path, json: bool) -> Result<(), String> {
    let parsed = ArenaLog::open(log).map_err(|e| e.to_string())?;
    let summaries = parsed.list_matches().map_err(|e| e.to_string())?;

    if json {
        print_json(&summaries)
    } else {
        print!("{}", MatchList(&summaries));
        Ok(())
    }
}

fn cmd_parse(
    log: &Path,
    match_id: Option<String>,
    all: bool,
    cards: Option<PathBuf>,
    json: bool,
) -> Result<(), String> {
    let registry = load_registry(cards)?;
    let parsed = ArenaLog::open(log).map_err(|e| e.to_string())?;

    if all {
        let results = parsed.reconstruct_all().map_err(|e| e.to_string())?;
        let mut failed = 0;
        for result in &results {
            match result {
                Ok(report) => print_report(report, &registry, json)?,
                Err(failure) => {
                    eprintln!("skipped {}", failure);
                    failed += 1;
                }
            }
        }
        if failed == results.len() {
            return Err(format!("none of {} matches could be reconstructed", failed));
        }
        return Ok(());
    }

    let report = match match_id {
        Some(id) => parsed.reconstruct(&MatchId::new(id)),
        None => parsed.reconstruct_latest(),
    }
    .map_err(|e| e.to_string())?;
    print_report(&report, &registry, json)
}

fn cmd_watch(log: PathBuf, cards: Option<PathBuf>, interval_ms: u64) -> Result<(), String> {
    let registry = load_registry(cards)?;
    let mut session = LiveSession::new(log);
    let interval = Duration::from_millis(interval_ms);

    loop {
        match session.poll() {
            Ok(0) => {}
            Ok(_) => match session.reconstruct_current() {
                Some(Ok(report)) => println!("{}", RenderedReport::new(&report, &registry)),
                Some(Err(failure)) => warn!(%failure, "waiting for more log content"),
                None => {}
            },
            Err(arena_log::LogError::Io(e)) => warn!(error = %e, "log not readable yet"),
            Err(e) => return Err(e.to_string()),
        }
        thread::sleep(interval);
    }
}
