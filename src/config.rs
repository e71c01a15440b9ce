//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};

use clap::Parser;

use crate::services::{PlayerCommand, SoundAssets};

/// CLI argument parsing structure
#[derive(Parser, Debug, Clone)]
#[command(name = "pomodoro-timer")]
#[command(about = "A single-screen terminal Pomodoro timer")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Start a countdown of this many minutes right away (0 waits for the slider)
    #[arg(short, long, default_value = "0")]
    pub minutes: u32,

    /// Upper end of the minute slider
    #[arg(long, default_value = "60", value_parser = clap::value_parser!(u32).range(1..=999))]
    pub max_minutes: u32,

    /// Looping sound played while counting down
    #[arg(long, default_value = "assets/timer_ticking.wav")]
    pub ticking: PathBuf,

    /// Sound played once when a countdown completes
    #[arg(long, default_value = "assets/timer_bell.wav")]
    pub bell: PathBuf,

    /// Audio player command; clips are written to its stdin
    #[arg(long, default_value = "aplay -q -")]
    pub player: String,

    /// Disable all sounds
    #[arg(long)]
    pub mute: bool,

    /// Quiet time after the last keyboard step before the slider is released
    #[arg(long, default_value = "600")]
    pub release_delay_ms: u64,

    /// Write logs to this file (the terminal is used by the UI)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Initial slider position, clamped to the slider range
    pub fn initial_minutes(&self) -> u32 {
        self.minutes.min(self.max_minutes)
    }

    pub fn release_delay(&self) -> Duration {
        Duration::from_millis(self.release_delay_ms)
    }

    pub fn player_command(&self) -> Option<PlayerCommand> {
        PlayerCommand::parse(&self.player)
    }

    pub fn sound_assets(&self) -> SoundAssets {
        SoundAssets {
            ticking: self.ticking.clone(),
            bell: self.bell.clone(),
        }
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["pomodoro-timer"]).unwrap();
        assert_eq!(config.initial_minutes(), 0);
        assert_eq!(config.max_minutes, 60);
        assert_eq!(config.release_delay(), Duration::from_millis(600));
        assert_eq!(config.log_level(), "info");
        assert_eq!(
            config.player_command().map(|command| command.program),
            Some("aplay".to_string())
        );
    }

    #[test]
    fn initial_minutes_are_clamped() {
        let config =
            Config::try_parse_from(["pomodoro-timer", "-m", "90", "--max-minutes", "45", "-v"])
                .unwrap();
        assert_eq!(config.initial_minutes(), 45);
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn zero_max_minutes_is_rejected() {
        assert!(Config::try_parse_from(["pomodoro-timer", "--max-minutes", "0"]).is_err());
    }
}
