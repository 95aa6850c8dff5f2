use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use overlay::rooms::Room;
use overlay::settings::{EditorSettings, SettingsError};
use planmark::{host, script};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{Level, info};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("page size must be positive and finite, got {width}x{height}")]
    InvalidPageSize { width: f64, height: f64 },
}

#[derive(Parser, Debug)]
#[command(name = "planmark", about = "Floor-plan polygon overlay: replay editing sessions and migrate room files")]
struct Cli {
    /// Log engine transitions and commits at debug level.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a scripted session and print every action as a JSON line.
    Replay {
        script: PathBuf,
        /// Editor settings JSON overriding the script's own.
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Write the resulting rooms here.
        #[arg(long)]
        rooms_out: Option<PathBuf>,
    },
    /// Convert pixel-unit polygons in a rooms file to normalized coordinates.
    Normalize {
        rooms: PathBuf,
        #[arg(long)]
        width: f64,
        #[arg(long)]
        height: f64,
        /// Only migrate this page.
        #[arg(long)]
        page: Option<u32>,
    },
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    match cli.command {
        Command::Replay { script, settings, rooms_out } => run_replay(&script, settings.as_deref(), rooms_out.as_deref()),
        Command::Normalize { rooms, width, height, page } => run_normalize(&rooms, width, height, page),
    }
}

fn run_replay(path: &Path, settings: Option<&Path>, rooms_out: Option<&Path>) -> Result<(), CliError> {
    let mut script: script::Script = read_json(path)?;
    if let Some(settings_path) = settings {
        let raw = read_text(settings_path)?;
        script.settings = EditorSettings::from_json(&raw)?;
    }

    let outcome = script::run(script)?;
    for step in &outcome.steps {
        println!("{}", serde_json::to_string(step)?);
    }

    info!(
        selected = ?outcome.book.selected,
        draw_dirty = outcome.book.draw_dirty,
        mode = outcome.engine.mode.name(),
        "session state"
    );
    if let Some(out) = rooms_out {
        write_json(out, outcome.book.rooms())?;
        info!(path = %out.display(), "rooms written");
    }
    Ok(())
}

fn run_normalize(path: &Path, width: f64, height: f64, page: Option<u32>) -> Result<(), CliError> {
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        return Err(CliError::InvalidPageSize { width, height });
    }
    let rooms: Vec<Room> = read_json(path)?;
    let (fixed, migrations) = host::normalize_rooms(&rooms, width, height, page);
    for m in &migrations {
        info!(room_id = %m.room_id, page = m.page, points = m.polygon.len(), "migrated");
    }
    info!(rooms = fixed.len(), migrated = migrations.len(), "normalize finished");
    println!("{}", serde_json::to_string_pretty(&fixed)?);
    Ok(())
}

fn read_text(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_path_buf(), source })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let raw = read_text(path)?;
    serde_json::from_str(&raw).map_err(|source| CliError::Parse { path: path.to_path_buf(), source })
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    fs::write(path, rendered).map_err(|source| CliError::Write { path: path.to_path_buf(), source })
}
