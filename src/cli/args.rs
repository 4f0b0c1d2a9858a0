//! CLI argument parsing with clap.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use super::enums::RampChoice;
use crate::ascii::RampPreset;
use crate::config::Config;

/// Parse and validate the glyph aspect ratio (0.0 exclusive to 1.0)
fn parse_aspect(s: &str) -> Result<f64, String> {
    let aspect: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if !(aspect > 0.0 && aspect <= 1.0) {
        return Err(format!(
            "Aspect ratio must be greater than 0.0 and at most 1.0, got {}",
            aspect
        ));
    }
    Ok(aspect)
}

/// Render images and videos as text in the terminal
#[derive(Parser, Debug)]
#[command(name = "vidtoascii")]
#[command(version, about = "Render images and videos as text in the terminal", long_about = None)]
#[command(subcommand_negates_reqs = true)]
#[command(after_help = "EXAMPLES:
    # Render a photo once
    vidtoascii media/car.jpg

    # Play a video at its native frame rate with finer cells
    vidtoascii clip.mp4 --scale-y 6

    # Light terminal background
    vidtoascii clip.mp4 --ramp light")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Image or video file to render
    #[arg(required = true)]
    pub input: Option<PathBuf>,

    /// Cell height in source pixels
    #[arg(long, short = 's', value_parser = clap::value_parser!(u32).range(1..))]
    pub scale_y: Option<u32>,

    /// Glyph width / height ratio; cell width = scale-y * aspect
    #[arg(long, short = 'a', value_parser = parse_aspect)]
    pub aspect: Option<f64>,

    /// Glyph ramp preset
    #[arg(long, short)]
    pub ramp: Option<RampChoice>,

    /// Custom glyphs from sparsest to densest (overrides --ramp)
    #[arg(long, short)]
    pub glyphs: Option<String>,

    /// Reverse the ramp (for light terminals)
    #[arg(long)]
    pub invert: bool,

    /// Config file path
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(long, short, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}

impl Args {
    /// Overlay command-line settings on a loaded config.
    pub fn apply_to(&self, config: &mut Config) {
        let render = &mut config.render;
        if let Some(scale_y) = self.scale_y {
            render.scale_y = scale_y;
        }
        if let Some(aspect) = self.aspect {
            render.aspect_ratio = aspect;
        }
        if let Some(ramp) = self.ramp {
            render.ramp = RampPreset::from(ramp).name().to_string();
            // An explicit preset wins over glyphs from the config file.
            render.glyphs = None;
        }
        if let Some(glyphs) = &self.glyphs {
            render.glyphs = Some(glyphs.clone());
        }
        if self.invert {
            render.invert = true;
        }
    }

    /// Default `env_logger` filter for the requested verbosity.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}
