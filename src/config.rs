//! Configuration file handling for vidtoascii.
//!
//! Loads configuration from `~/.config/vidtoascii/config.toml` or a custom path.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ascii::{Ramp, RampError, RampPreset, ScaleFactors, DEFAULT_ASPECT_RATIO, DEFAULT_SCALE_Y};

/// Configuration file structure for vidtoascii.
/// Loaded from ~/.config/vidtoascii/config.toml (or custom path via --config).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub decoder: DecoderConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RenderConfig {
    /// Cell height in source pixels.
    #[serde(default = "default_scale_y")]
    pub scale_y: u32,
    /// Glyph width / height; cell width is `scale_y * aspect_ratio`.
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: f64,
    /// Preset name: dark, light, detailed, blocks, minimal.
    #[serde(default = "default_ramp")]
    pub ramp: String,
    /// Custom glyphs, sparsest first. Overrides `ramp`.
    #[serde(default)]
    pub glyphs: Option<String>,
    /// Reverse the ramp (for light terminals).
    #[serde(default)]
    pub invert: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            scale_y: default_scale_y(),
            aspect_ratio: default_aspect_ratio(),
            ramp: default_ramp(),
            glyphs: None,
            invert: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DecoderConfig {
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg: String,
    #[serde(default = "default_ffprobe")]
    pub ffprobe: String,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            ffmpeg: default_ffmpeg(),
            ffprobe: default_ffprobe(),
        }
    }
}

fn default_scale_y() -> u32 {
    DEFAULT_SCALE_Y
}

fn default_aspect_ratio() -> f64 {
    DEFAULT_ASPECT_RATIO
}

fn default_ramp() -> String {
    RampPreset::default().name().to_string()
}

fn default_ffmpeg() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe() -> String {
    "ffprobe".to_string()
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
                path: path.clone(),
                source: e,
            })?;
            let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.clone(),
                source: e,
            })?;
            log::debug!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }
}

impl RenderConfig {
    /// Build the glyph ramp, failing on an empty custom ramp or unknown preset.
    pub fn build_ramp(&self) -> Result<Ramp, RampError> {
        let ramp = match &self.glyphs {
            Some(glyphs) => Ramp::new(glyphs)?,
            None => self.ramp.parse::<RampPreset>()?.ramp(),
        };
        Ok(if self.invert { ramp.reversed() } else { ramp })
    }

    /// Validated scale factors.
    pub fn scale_factors(&self) -> Result<ScaleFactors, ConfigError> {
        ScaleFactors::new(self.scale_y, self.aspect_ratio).ok_or(ConfigError::InvalidScale {
            scale_y: self.scale_y,
            aspect_ratio: self.aspect_ratio,
        })
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    InvalidScale {
        scale_y: u32,
        aspect_ratio: f64,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError { path, source } => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::ParseError { path, source } => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::InvalidScale {
                scale_y,
                aspect_ratio,
            } => {
                write!(
                    f,
                    "Invalid scale: scale_y must be at least 1 (got {}) and aspect_ratio must be in (0, 1] (got {})",
                    scale_y, aspect_ratio
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
            ConfigError::InvalidScale { .. } => None,
        }
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("vidtoascii").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/vidtoascii/config.toml")
        })
}

/// Commented default configuration written by `config init`.
pub const DEFAULT_CONFIG_TOML: &str = r#"# vidtoascii configuration

[render]
# Cell height in source pixels (larger = smaller output)
scale_y = 10
# Terminal glyph width / height; cell width = scale_y * aspect_ratio
aspect_ratio = 0.5
# Ramp preset: dark, light, detailed, blocks, minimal
ramp = "dark"
# Custom glyphs from sparsest to densest (overrides ramp)
# glyphs = " .:~+*#$"
# Reverse the ramp for light terminal backgrounds
invert = false

[decoder]
# FFmpeg executables used for video input
ffmpeg = "ffmpeg"
ffprobe = "ffprobe"
"#;
