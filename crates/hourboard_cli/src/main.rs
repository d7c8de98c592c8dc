//! `hourboard` terminal entry point.
//!
//! # Responsibility
//! - Parse commands and map them onto a board session.
//! - Own process-level setup: database location and logging.

mod terminal;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use hourboard_core::{
    default_log_level, init_logging, BoardConfig, ClockStopHandle, EditOutcome, FixedHourSource,
    HourSweepSource, LogTarget, SaveOutcome, ScheduleBoard, SqliteKvStore, SystemTimeSource,
    TaskPersistence, TimeSource,
};
use log::{info, warn};
use std::path::{Path, PathBuf};
use terminal::{print_board, print_board_json, TerminalSurface};

const DB_DIR_NAME: &str = "hourboard";
const DB_FILE_NAME: &str = "hourboard.sqlite3";

/// Hour-by-hour daily schedule board.
#[derive(Parser)]
#[command(name = "hourboard", version, about, long_about = None)]
struct Cli {
    /// Database file (defaults to the platform local data directory).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rotating log files; logs go to stderr otherwise.
    #[arg(long, global = true)]
    log_dir: Option<String>,

    /// Store key holding the saved notes.
    #[arg(long, global = true, default_value = hourboard_core::DEFAULT_STORAGE_KEY)]
    storage_key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every row once.
    Show {
        /// Pretend the current hour is HOUR.
        #[arg(long, value_name = "HOUR")]
        at: Option<u32>,
        /// Print rows as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Replace and save the note for one hour.
    Edit {
        hour: u32,
        text: String,
        #[arg(long, value_name = "HOUR")]
        at: Option<u32>,
    },
    /// Clear every saved note.
    Reset,
    /// Run the live heartbeat until Ctrl+C.
    Watch {
        #[arg(long, value_name = "HOUR", conflicts_with = "sweep")]
        at: Option<u32>,
        /// Advance one hour per tick.
        #[arg(long)]
        sweep: bool,
        /// Stop after N ticks.
        #[arg(long, value_name = "N")]
        ticks: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli)?;

    let db_path = resolve_db_path(cli.db.clone())?;
    let config = BoardConfig::default().with_storage_key(cli.storage_key.clone());
    info!("event=cli_start module=cli status=ok db={}", db_path.display());

    match cli.command {
        Commands::Show { at, json } => {
            let source = time_source(at, false)?;
            let board = open_board(&db_path, source, TerminalSurface::quiet(), &config)?;
            if json {
                print_board_json(board.latest_time(), &board.snapshots())?;
            } else {
                print_board(board.latest_time_label().as_deref(), &board.snapshots());
            }
        }
        Commands::Edit { hour, text, at } => {
            let source = time_source(at, false)?;
            let board = open_board(&db_path, source, TerminalSurface::quiet(), &config)?;
            let trigger = board
                .trigger_for_hour(hour)
                .ok_or_else(|| anyhow!("hour must be between 0 and 23, got {hour}"))?;
            match board.edit_note(trigger, text) {
                EditOutcome::Applied => {}
                EditOutcome::Locked => bail!("hour {hour} has already passed; its note is locked"),
                EditOutcome::UnknownRow => bail!("no row for hour {hour}"),
            }
            match board.save(trigger)? {
                SaveOutcome::Saved => println!("saved note for hour {hour}"),
                SaveOutcome::Locked => bail!("hour {hour} has already passed; its note is locked"),
                SaveOutcome::UnknownRow => bail!("no row for hour {hour}"),
            }
        }
        Commands::Reset => {
            let store = SqliteKvStore::open(&db_path)
                .with_context(|| format!("failed to open {}", db_path.display()))?;
            TaskPersistence::with_key(store, config.storage_key.clone()).reset_all()?;
            println!("cleared all saved notes");
        }
        Commands::Watch { at, sweep, ticks } => {
            let source = time_source(at, sweep)?;
            let mut board = open_board(&db_path, source, TerminalSurface::live(), &config)?;
            stop_on_ctrl_c(board.stop_handle())?;
            let published = board.run(ticks);
            println!("stopped after {published} ticks");
        }
    }

    Ok(())
}

// Signal handling runs on its own thread; the board stays on the main one.
fn stop_on_ctrl_c(handle: ClockStopHandle) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start signal listener")?;
    std::thread::spawn(move || {
        runtime.block_on(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("event=cli_interrupt module=cli status=ok");
                    handle.stop();
                }
                Err(err) => warn!("event=cli_interrupt module=cli status=error error={err}"),
            }
        });
    });
    Ok(())
}

fn setup_logging(cli: &Cli) -> Result<()> {
    let level = cli.log_level.as_deref().unwrap_or_else(|| match cli.log_dir {
        Some(_) => default_log_level(),
        None => "warn",
    });
    let target = match cli.log_dir.as_deref() {
        Some(dir) => LogTarget::directory(dir).map_err(|err| anyhow!(err))?,
        None => LogTarget::Stderr,
    };
    init_logging(level, target).map_err(|err| anyhow!(err))
}

fn resolve_db_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    let path = match explicit {
        Some(path) => path,
        None => dirs::data_local_dir()
            .ok_or_else(|| anyhow!("no local data directory on this platform; pass --db"))?
            .join(DB_DIR_NAME)
            .join(DB_FILE_NAME),
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    Ok(path)
}

fn time_source(at: Option<u32>, sweep: bool) -> Result<Box<dyn TimeSource>> {
    if sweep {
        return Ok(Box::new(HourSweepSource::starting_at(at.unwrap_or(0))));
    }
    match at {
        Some(hour) => FixedHourSource::new(hour)
            .map(|source| Box::new(source) as Box<dyn TimeSource>)
            .ok_or_else(|| anyhow!("--at must be between 0 and 23, got {hour}")),
        None => Ok(Box::new(SystemTimeSource)),
    }
}

fn open_board(
    db_path: &Path,
    source: Box<dyn TimeSource>,
    mut surface: TerminalSurface,
    config: &BoardConfig,
) -> Result<ScheduleBoard<SqliteKvStore>> {
    let store = SqliteKvStore::open(db_path)
        .with_context(|| format!("failed to open {}", db_path.display()))?;
    ScheduleBoard::open(store, source, &mut surface, config).context("failed to open board")
}
