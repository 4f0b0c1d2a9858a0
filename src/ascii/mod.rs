//! Frame-to-glyph rendering pipeline.
//!
//! Converts decoded RGB frames into glyph grids for terminal display:
//!
//! 1. **Luminance reduction** - RGB to one byte per pixel (0.21/0.72/0.07 weights)
//! 2. **Cell averaging** - floor-division partition into a character grid
//! 3. **Glyph mapping** - mean luminance to an index into a [`Ramp`]
//!
//! [`render_frame`] runs all three for one frame; [`FrameRenderer`] does the
//! same while reusing its scratch buffers across frames.

mod dimensions;
mod downsample;
mod luminance;
mod mapping;
mod ramp;
mod renderer;

pub use dimensions::{grid_dimensions, ScaleFactors, DEFAULT_ASPECT_RATIO, DEFAULT_SCALE_Y};
pub use downsample::{cell_span, downsample, downsample_into};
pub use luminance::{luminance_of, to_luminance, to_luminance_into, WEIGHT_B, WEIGHT_G, WEIGHT_R};
pub use mapping::{glyph_index, map_to_glyph, map_to_glyphs, map_to_glyphs_into};
pub use ramp::{
    Ramp, RampError, RampPreset, BLOCKS_RAMP, DARK_RAMP, DETAILED_RAMP, LIGHT_RAMP, MINIMAL_RAMP,
};
pub use renderer::{render_frame, FrameRenderer};
