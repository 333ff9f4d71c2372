use std::io::{self, Write};

use anyhow::bail;
use blocktris_engine::Command;
use blocktris_profile::{KeyBindings, KeyValueStore, Profile, Settings, Theme};
use tracing::info;

use crate::input;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SettingsArg {
    /// Colour theme (light, dark, neon, pastel, retro, vaporwave, mono)
    #[arg(long)]
    theme: Option<Theme>,
    /// Sound effects
    #[arg(long, value_name = "on|off", value_parser = parse_switch)]
    sound: Option<bool>,
    /// Background music
    #[arg(long, value_name = "on|off", value_parser = parse_switch)]
    music: Option<bool>,
    /// Combo bonus points
    #[arg(long, value_name = "on|off", value_parser = parse_switch)]
    combo: Option<bool>,
    /// Back-to-back bonus points
    #[arg(long, value_name = "on|off", value_parser = parse_switch)]
    back_to_back: Option<bool>,
    /// Bind a key to a command, e.g. `--bind hold=x` (repeatable)
    #[arg(long = "bind", value_name = "COMMAND=KEY", value_parser = parse_binding)]
    bindings: Vec<(Command, String)>,
    /// Restore the default key bindings before applying `--bind`
    #[arg(long)]
    reset_bindings: bool,
}

fn parse_switch(s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => Err(format!("expected on or off, got {s:?}")),
    }
}

fn parse_binding(s: &str) -> Result<(Command, String), String> {
    let Some((command, key)) = s.split_once('=') else {
        return Err(format!("expected COMMAND=KEY, got {s:?}"));
    };
    let command = command.trim().parse::<Command>().map_err(|e| e.to_string())?;
    let name = input::parse_key(key.trim())
        .and_then(input::key_name)
        .ok_or_else(|| format!("unknown key {key:?}"))?;
    Ok((command, name))
}

impl SettingsArg {
    fn is_empty(&self) -> bool {
        self.theme.is_none()
            && self.sound.is_none()
            && self.music.is_none()
            && self.combo.is_none()
            && self.back_to_back.is_none()
            && self.bindings.is_empty()
    }

    fn apply(&self, settings: &mut Settings) -> anyhow::Result<()> {
        if let Some(theme) = self.theme {
            settings.theme = theme;
        }
        if let Some(sound) = self.sound {
            settings.sound = sound;
        }
        if let Some(music) = self.music {
            settings.music = music;
        }
        if let Some(combo) = self.combo {
            settings.scoring.combo = combo;
        }
        if let Some(back_to_back) = self.back_to_back {
            settings.scoring.back_to_back = back_to_back;
        }
        for (command, key) in &self.bindings {
            settings.bindings.set(*command, key.as_str());
        }
        check_bindings(&settings.bindings)
    }
}

/// Rejects bindings where one key triggers several commands.
fn check_bindings(bindings: &KeyBindings) -> anyhow::Result<()> {
    let keys: Vec<_> = bindings.iter().collect();
    for (i, (command, key)) in keys.iter().enumerate() {
        if let Some((other, _)) = keys[..i].iter().find(|(_, k)| k == key) {
            bail!("key {key:?} is bound to both {other} and {command}");
        }
    }
    Ok(())
}

pub(crate) fn run<S>(arg: &SettingsArg, profile: &mut Profile<S>) -> anyhow::Result<()>
where
    S: KeyValueStore,
{
    if arg.reset_bindings {
        profile.reset_bindings()?;
        info!("key bindings reset");
    }
    let mut settings = profile.settings()?;
    if !arg.is_empty() {
        arg.apply(&mut settings)?;
        profile.save_settings(&settings)?;
        info!(?settings, "settings saved");
    }
    write_settings(&mut io::stdout().lock(), &settings)?;
    Ok(())
}

fn on_off(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}

fn write_settings<W>(out: &mut W, settings: &Settings) -> io::Result<()>
where
    W: Write,
{
    writeln!(out, "theme:        {}", settings.theme)?;
    writeln!(out, "sound:        {}", on_off(settings.sound))?;
    writeln!(out, "music:        {}", on_off(settings.music))?;
    writeln!(out, "combo:        {}", on_off(settings.scoring.combo))?;
    writeln!(out, "back-to-back: {}", on_off(settings.scoring.back_to_back))?;
    writeln!(out, "bindings:")?;
    for (command, key) in settings.bindings.iter() {
        writeln!(out, "  {:<12} {key}", command.name())?;
    }
    Ok(())
}
