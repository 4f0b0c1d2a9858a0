//! Glyph ramps: ordered glyph sets from sparsest to densest.

use std::fmt;
use std::str::FromStr;

/// Default ramp for dark terminal backgrounds (8 levels).
pub const DARK_RAMP: &str = " .:~+*#$";

/// Ramp for light terminal backgrounds: densest glyphs for the darkest cells.
pub const LIGHT_RAMP: &str = "#$*+~:. ";

/// Finer 10-level ASCII density ramp.
pub const DETAILED_RAMP: &str = " .:-=+*#%@";

/// Unicode block characters (5 levels).
pub const BLOCKS_RAMP: &str = " ░▒▓█";

/// Minimal 4-level ramp for a clean look.
pub const MINIMAL_RAMP: &str = " .:#";

/// Errors building a ramp.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RampError {
    #[error("glyph ramp must contain at least one glyph")]
    Empty,
    #[error("unknown ramp preset '{0}'. Available presets: dark, light, detailed, blocks, minimal")]
    UnknownPreset(String),
}

/// An immutable, non-empty ordered sequence of glyphs.
///
/// Index 0 is the sparsest glyph (darkest cell), the last index the densest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ramp {
    glyphs: Vec<char>,
}

impl Ramp {
    /// Build a ramp from a string, one glyph per `char`.
    pub fn new(glyphs: &str) -> Result<Self, RampError> {
        Self::from_glyphs(glyphs.chars().collect())
    }

    pub fn from_glyphs(glyphs: Vec<char>) -> Result<Self, RampError> {
        if glyphs.is_empty() {
            return Err(RampError::Empty);
        }
        Ok(Self { glyphs })
    }

    /// Number of glyphs. Always at least 1.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Always false; kept alongside `len` for API symmetry.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn glyphs(&self) -> &[char] {
        &self.glyphs
    }

    /// The glyph at `index`, clamped to the densest glyph.
    #[inline]
    pub fn glyph(&self, index: usize) -> char {
        self.glyphs[index.min(self.glyphs.len() - 1)]
    }

    /// The same glyphs in reverse order, for light backgrounds.
    pub fn reversed(&self) -> Self {
        Self {
            glyphs: self.glyphs.iter().rev().copied().collect(),
        }
    }
}

impl Default for Ramp {
    fn default() -> Self {
        RampPreset::default().ramp()
    }
}

impl fmt::Display for Ramp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &c in &self.glyphs {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

/// Built-in ramps selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RampPreset {
    #[default]
    Dark,
    Light,
    Detailed,
    Blocks,
    Minimal,
}

impl RampPreset {
    pub fn glyphs(&self) -> &'static str {
        match self {
            RampPreset::Dark => DARK_RAMP,
            RampPreset::Light => LIGHT_RAMP,
            RampPreset::Detailed => DETAILED_RAMP,
            RampPreset::Blocks => BLOCKS_RAMP,
            RampPreset::Minimal => MINIMAL_RAMP,
        }
    }

    pub fn ramp(&self) -> Ramp {
        Ramp {
            glyphs: self.glyphs().chars().collect(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RampPreset::Dark => "dark",
            RampPreset::Light => "light",
            RampPreset::Detailed => "detailed",
            RampPreset::Blocks => "blocks",
            RampPreset::Minimal => "minimal",
        }
    }
}

impl FromStr for RampPreset {
    type Err = RampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Ok(RampPreset::Dark),
            "light" => Ok(RampPreset::Light),
            "detailed" => Ok(RampPreset::Detailed),
            "blocks" => Ok(RampPreset::Blocks),
            "minimal" => Ok(RampPreset::Minimal),
            _ => Err(RampError::UnknownPreset(s.to_string())),
        }
    }
}
