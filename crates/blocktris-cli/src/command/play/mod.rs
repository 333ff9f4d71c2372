use anyhow::Context as _;
use blocktris_engine::{GameConfig, GameSession, PieceSeed};
use blocktris_profile::{KeyValueStore, Profile};
use tracing::info;

use crate::{command::play::app::PlayApp, tui::Tui};

mod app;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Seed for the piece sequence (32 hex digits); random when omitted
    #[arg(long)]
    seed: Option<PieceSeed>,
    /// Arena width in cells [default: 12]
    #[arg(long)]
    width: Option<u16>,
    /// Arena height in cells [default: 20]
    #[arg(long)]
    height: Option<u16>,
    /// Number of upcoming pieces to show (1-5) [default: 5]
    #[arg(long)]
    preview: Option<usize>,
    /// Enable combo bonus points for this game (overrides settings)
    #[arg(long)]
    combo: bool,
    /// Enable back-to-back bonus points for this game (overrides settings)
    #[arg(long)]
    back_to_back: bool,
}

impl PlayArg {
    fn game_config<S>(&self, profile: &Profile<S>) -> anyhow::Result<GameConfig>
    where
        S: KeyValueStore,
    {
        let mut scoring = profile.settings()?.scoring;
        scoring.combo |= self.combo;
        scoring.back_to_back |= self.back_to_back;

        let config = GameConfig::new(
            self.width.unwrap_or(GameConfig::DEFAULT_WIDTH),
            self.height.unwrap_or(GameConfig::DEFAULT_HEIGHT),
        )?
        .with_scoring(scoring);
        let config = match self.preview {
            Some(len) => config.with_preview_len(len)?,
            None => config,
        };
        Ok(config)
    }
}

pub(crate) fn run<S>(arg: &PlayArg, profile: Profile<S>) -> anyhow::Result<()>
where
    S: KeyValueStore,
{
    let config = arg.game_config(&profile)?;
    let seed = arg.seed.unwrap_or_else(rand::random);
    info!(%seed, "starting play session");

    let session = GameSession::with_seed(config, seed);
    let mut app = PlayApp::new(session, profile).context("failed to load profile")?;
    Tui::new().run(&mut app)?;

    info!(high_score = app.high_score(), "play session finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use blocktris_profile::MemoryStore;
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        play: PlayArg,
    }

    fn parse(args: &[&str]) -> PlayArg {
        Cli::try_parse_from(std::iter::once("play").chain(args.iter().copied()))
            .unwrap()
            .play
    }

    #[test]
    fn test_defaults_come_from_settings() {
        let mut profile = Profile::new(MemoryStore::new());
        let mut settings = profile.settings().unwrap();
        settings.scoring.back_to_back = true;
        profile.save_settings(&settings).unwrap();

        let config = parse(&["--combo"]).game_config(&profile).unwrap();
        assert_eq!(config.width(), 12);
        assert_eq!(config.height(), 20);
        assert_eq!(config.preview_len(), 5);
        assert!(config.scoring().combo);
        assert!(config.scoring().back_to_back);
    }

    #[test]
    fn test_custom_arena_and_seed() {
        let arg = parse(&[
            "--width",
            "10",
            "--height",
            "22",
            "--preview",
            "3",
            "--seed",
            "000102030405060708090a0b0c0d0e0f",
        ]);
        let config = arg.game_config(&Profile::new(MemoryStore::new())).unwrap();
        assert_eq!((config.width(), config.height()), (10, 22));
        assert_eq!(config.preview_len(), 3);
        assert_eq!(
            arg.seed,
            Some(PieceSeed::from_bytes([
                0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15
            ]))
        );
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let profile = Profile::new(MemoryStore::new());
        assert!(parse(&["--width", "3"]).game_config(&profile).is_err());
        assert!(parse(&["--preview", "6"]).game_config(&profile).is_err());
        assert!(Cli::try_parse_from(["play", "--seed", "xyz"]).is_err());
    }
}
