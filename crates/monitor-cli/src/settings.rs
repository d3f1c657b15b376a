//! Settings loading
//!
//! Preset thresholds, then an optional settings file, then `DROWSINESS_*` environment
//! variables (nested keys separated by `__`, e.g.
//! `DROWSINESS_THRESHOLDS__DROWSY_BLINK_THRESHOLD=10`).

use clap::ValueEnum;
use config::{Config, ConfigError, Environment, File, FileFormat};
use dms::Thresholds;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Monitor settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Detection and alarm thresholds
    pub thresholds: Thresholds,

    /// Alarm sound asset; the alarm is silent when missing
    pub alarm_sound: Option<PathBuf>,
}

/// Threshold preset that seeds the settings before file and environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    #[default]
    Standard,
    /// Earlier warnings
    Strict,
    /// Later warnings
    Lenient,
}

impl Preset {
    pub fn thresholds(self) -> Thresholds {
        match self {
            Self::Standard => Thresholds::default(),
            Self::Strict => Thresholds::strict(),
            Self::Lenient => Thresholds::lenient(),
        }
    }
}

impl Settings {
    /// Load settings from a preset, an optional file and the environment
    pub fn load(path: Option<&Path>, preset: Preset) -> Result<Self, ConfigError> {
        Self::build(path, preset, Self::environment())
    }

    fn environment() -> Environment {
        Environment::with_prefix("DROWSINESS")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn build(
        path: Option<&Path>,
        preset: Preset,
        env: Environment,
    ) -> Result<Self, ConfigError> {
        let seed = Settings {
            thresholds: preset.thresholds(),
            alarm_sound: None,
        };
        let mut builder = Config::builder().add_source(Config::try_from(&seed)?);
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        builder.add_source(env).build()?.try_deserialize()
    }

    /// Parse settings from an in-memory TOML document
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}
