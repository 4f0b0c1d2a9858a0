//! Top-level error type. Every variant ends the run with a non-zero exit.

use std::path::PathBuf;

use crate::ascii::RampError;
use crate::config::ConfigError;
use crate::media::MediaError;
use crate::playback::PlaybackError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid glyph ramp: {0}")]
    Ramp(#[from] RampError),

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error(transparent)]
    Playback(#[from] PlaybackError),

    #[error("failed to install Ctrl+C handler: {0}")]
    Signal(#[from] ctrlc::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("config file already exists: {}\nUse 'vidtoascii config show' to view current settings.", .0.display())]
    ConfigExists(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
