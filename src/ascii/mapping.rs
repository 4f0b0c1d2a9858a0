//! Mean luminance to glyph quantization.

use super::ramp::Ramp;

/// Ramp index for a mean luminance value.
///
/// Selects `round((density / 255) * (len - 1))`, rounding half away from
/// zero. Density 0 maps to index 0 and density 255 to `len - 1`; the
/// mapping is monotonic non-decreasing in `density`.
#[inline]
pub fn glyph_index(density: u8, ramp_len: usize) -> usize {
    let top = ramp_len.saturating_sub(1);
    ((density as f64 / 255.0) * top as f64).round() as usize
}

/// Glyph for a mean luminance value.
#[inline]
pub fn map_to_glyph(density: u8, ramp: &Ramp) -> char {
    ramp.glyph(glyph_index(density, ramp.len()))
}

/// Map cell means to glyphs.
pub fn map_to_glyphs(means: &[u8], ramp: &Ramp) -> Vec<char> {
    means.iter().map(|&m| map_to_glyph(m, ramp)).collect()
}

/// Map cell means to glyphs in-place, reusing an existing buffer.
///
/// # Returns
/// The number of glyphs written.
pub fn map_to_glyphs_into(means: &[u8], ramp: &Ramp, buffer: &mut Vec<char>) -> usize {
    buffer.clear();
    buffer.extend(means.iter().map(|&m| map_to_glyph(m, ramp)));
    buffer.len()
}
