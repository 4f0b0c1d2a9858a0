//! CLI enum types for ramp presets.

use clap::ValueEnum;

use crate::ascii::RampPreset;

/// Built-in glyph ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RampChoice {
    /// " .:~+*#$" for dark backgrounds
    #[default]
    Dark,
    /// "#$*+~:. " for light backgrounds
    Light,
    /// 10-level " .:-=+*#%@"
    Detailed,
    /// Unicode shade blocks
    Blocks,
    /// 4-level " .:#"
    Minimal,
}

impl From<RampChoice> for RampPreset {
    fn from(c: RampChoice) -> Self {
        match c {
            RampChoice::Dark => RampPreset::Dark,
            RampChoice::Light => RampPreset::Light,
            RampChoice::Detailed => RampPreset::Detailed,
            RampChoice::Blocks => RampPreset::Blocks,
            RampChoice::Minimal => RampPreset::Minimal,
        }
    }
}
