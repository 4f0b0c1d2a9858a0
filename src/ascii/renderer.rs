//! Frame rendering: luminance, cell averaging and glyph mapping in one pass.

use super::dimensions::ScaleFactors;
use super::downsample::downsample_into;
use super::luminance::to_luminance_into;
use super::mapping::map_to_glyphs_into;
use super::ramp::Ramp;
use crate::frame::{GlyphGrid, PixelBuffer};

/// Render one frame to a `cols x rows` glyph grid.
///
/// Pure function of its inputs: the same frame, grid size and ramp always
/// produce the same grid. `cols` and `rows` are clamped to at least 1.
pub fn render_frame(frame: &PixelBuffer, cols: u32, rows: u32, ramp: &Ramp) -> GlyphGrid {
    let mut luminance = Vec::new();
    let mut means = Vec::new();
    render_with(frame, cols.max(1), rows.max(1), ramp, &mut luminance, &mut means)
}

fn render_with(
    frame: &PixelBuffer,
    cols: u32,
    rows: u32,
    ramp: &Ramp,
    luminance: &mut Vec<u8>,
    means: &mut Vec<u8>,
) -> GlyphGrid {
    to_luminance_into(frame, luminance);
    downsample_into(luminance, frame.width(), frame.height(), cols, rows, means);

    let mut glyphs = Vec::with_capacity(means.len());
    map_to_glyphs_into(means, ramp, &mut glyphs);

    GlyphGrid::from_parts(glyphs, cols, rows)
}

/// Reusable renderer holding the ramp, scale and scratch buffers.
///
/// Scratch buffers are overwritten on every call, so rendering a stream
/// does not allocate per-frame intermediate buffers.
#[derive(Debug, Clone)]
pub struct FrameRenderer {
    ramp: Ramp,
    scale: ScaleFactors,
    luminance: Vec<u8>,
    means: Vec<u8>,
}

impl FrameRenderer {
    pub fn new(ramp: Ramp, scale: ScaleFactors) -> Self {
        Self {
            ramp,
            scale,
            luminance: Vec::new(),
            means: Vec::new(),
        }
    }

    pub fn ramp(&self) -> &Ramp {
        &self.ramp
    }

    pub fn scale(&self) -> ScaleFactors {
        self.scale
    }

    /// Grid size this renderer uses for a frame of the given size.
    pub fn grid_for(&self, width: u32, height: u32) -> (u32, u32) {
        self.scale.grid_for(width, height)
    }

    /// Render a frame, sizing the grid from the configured scale factors.
    pub fn render(&mut self, frame: &PixelBuffer) -> GlyphGrid {
        let (cols, rows) = self.grid_for(frame.width(), frame.height());
        render_with(
            frame,
            cols,
            rows,
            &self.ramp,
            &mut self.luminance,
            &mut self.means,
        )
    }
}
