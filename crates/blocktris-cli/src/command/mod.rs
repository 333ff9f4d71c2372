use std::{
    fs::{self, File},
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::Context as _;
use blocktris_profile::{FileStore, Profile};
use clap::{Parser, Subcommand};
use tracing::{Level, debug};

use self::{leaderboard::LeaderboardArg, play::PlayArg, settings::SettingsArg};

mod leaderboard;
mod play;
mod settings;

const APP_NAME: &str = "blocktris";
const LOG_FILE_NAME: &str = "blocktris.log";

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Directory holding the high score, leaderboard and settings
    #[arg(long, global = true)]
    profile_dir: Option<PathBuf>,
    /// Write logs to this file [default: <profile dir>/blocktris.log]
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    /// Minimum level of log messages (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value_t = Level::INFO)]
    log_level: Level,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play a game in the terminal (default)
    Play(#[clap(flatten)] PlayArg),
    /// Show the best scores
    Leaderboard(#[clap(flatten)] LeaderboardArg),
    /// Show or change the stored settings
    Settings(#[clap(flatten)] SettingsArg),
}

fn default_profile_dir() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join(APP_NAME),
        None => PathBuf::from(format!(".{APP_NAME}")),
    }
}

fn init_logging(path: &Path, level: Level) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_max_level(level)
        .with_ansi(false)
        .init();
    Ok(())
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    let profile_dir = args.profile_dir.unwrap_or_else(default_profile_dir);
    let log_file = args
        .log_file
        .unwrap_or_else(|| profile_dir.join(LOG_FILE_NAME));
    init_logging(&log_file, args.log_level)?;
    debug!(profile_dir = %profile_dir.display(), "using profile directory");

    let mut profile = Profile::new(FileStore::new(&profile_dir));
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg, profile)?,
        Mode::Leaderboard(arg) => leaderboard::run(&arg, &profile)?,
        Mode::Settings(arg) => settings::run(&arg, &mut profile)?,
    }
    Ok(())
}
