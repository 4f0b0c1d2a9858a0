//! Frame data types shared by the decoders, the renderer and the player.

use std::fmt;

/// A decoded frame: interleaved pixel data with its dimensions.
///
/// The first three channels of every pixel are R, G, B. Any further
/// channels (alpha, padding) travel with the buffer but are ignored by the
/// renderer. The byte length always equals `width * height * channels`;
/// the fields are private so that invariant holds by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
}

impl PixelBuffer {
    /// Wrap raw interleaved pixel data.
    ///
    /// Returns `None` if `channels < 3`, or if `data.len()` does not equal
    /// `width * height * channels`.
    pub fn from_raw(data: Vec<u8>, width: u32, height: u32, channels: u8) -> Option<Self> {
        if channels < 3 {
            return None;
        }
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(channels as usize)?;
        if data.len() != expected {
            return None;
        }
        Some(Self {
            data,
            width,
            height,
            channels,
        })
    }

    /// Build a 3-channel buffer where every pixel has the same color.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let pixel_count = (width as usize) * (height as usize);
        let mut data = Vec::with_capacity(pixel_count * 3);
        for _ in 0..pixel_count {
            data.extend_from_slice(&rgb);
        }
        Self {
            data,
            width,
            height,
            channels: 3,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per pixel.
    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Raw interleaved bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Presentation time of a decoded frame, in seconds of stream time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTiming {
    pub presentation_seconds: f64,
}

impl FrameTiming {
    pub fn new(presentation_seconds: f64) -> Self {
        Self {
            presentation_seconds,
        }
    }

    /// Use `pts` when it is a usable timestamp, otherwise the decode-order
    /// estimate `frame_index / frame_rate`.
    pub fn resolve(pts: Option<f64>, frame_index: u64, frame_rate: f64) -> Self {
        match pts {
            Some(t) if t.is_finite() && t >= 0.0 => Self::new(t),
            _ => Self::new(frame_index as f64 / frame_rate),
        }
    }
}

/// A frame handed from a decoder to the player.
#[derive(Debug, Clone)]
pub struct DecodedFrame {
    pub pixels: PixelBuffer,
    pub timing: FrameTiming,
}

/// Glyph grid produced by the renderer, ready for display.
///
/// Glyphs are stored row-major; the glyph for `(col, row)` lives at
/// `row * cols + col`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphGrid {
    glyphs: Vec<char>,
    cols: u32,
    rows: u32,
}

impl GlyphGrid {
    /// Create a grid from row-major glyphs.
    ///
    /// Returns `None` if either dimension is zero or if
    /// `glyphs.len() != cols * rows`.
    pub fn from_glyphs(glyphs: Vec<char>, cols: u32, rows: u32) -> Option<Self> {
        if cols == 0 || rows == 0 || glyphs.len() != (cols as usize) * (rows as usize) {
            return None;
        }
        Some(Self { glyphs, cols, rows })
    }

    /// Callers guarantee `cols, rows >= 1` and `glyphs.len() == cols * rows`.
    pub(crate) fn from_parts(glyphs: Vec<char>, cols: u32, rows: u32) -> Self {
        debug_assert!(cols >= 1 && rows >= 1);
        debug_assert_eq!(glyphs.len(), (cols as usize) * (rows as usize));
        Self { glyphs, cols, rows }
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn glyphs(&self) -> &[char] {
        &self.glyphs
    }

    /// Iterate over rows of glyphs, top to bottom.
    pub fn lines(&self) -> impl Iterator<Item = &[char]> {
        self.glyphs.chunks(self.cols as usize)
    }
}

impl fmt::Display for GlyphGrid {
    /// One line per row, each terminated by a newline.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            for &c in line {
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
