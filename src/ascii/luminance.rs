//! RGB to luminance reduction.

use crate::frame::PixelBuffer;

/// Weight of the red channel, in hundredths.
pub const WEIGHT_R: u32 = 21;
/// Weight of the green channel, in hundredths.
pub const WEIGHT_G: u32 = 72;
/// Weight of the blue channel, in hundredths.
pub const WEIGHT_B: u32 = 7;

/// Luminance of a single RGB pixel.
///
/// Computes `round(0.21*R + 0.72*G + 0.07*B)` exactly, rounding half away
/// from zero. The weights are scaled by 100 so the sum is an integer and
/// `.5` boundaries are never lost to binary fractions:
///
/// ```text
/// Y = (21*R + 72*G + 7*B + 50) / 100
/// ```
///
/// The weights sum to 100, so the result always fits in a byte.
#[inline]
pub fn luminance_of(r: u8, g: u8, b: u8) -> u8 {
    let y = WEIGHT_R * r as u32 + WEIGHT_G * g as u32 + WEIGHT_B * b as u32;
    ((y + 50) / 100) as u8
}

/// Reduce an interleaved pixel buffer to one luminance byte per pixel.
///
/// Channels past the first three (e.g. alpha) are ignored.
///
/// # Returns
/// A row-major vector of `width * height` luminance values.
pub fn to_luminance(frame: &PixelBuffer) -> Vec<u8> {
    let mut luminance = Vec::with_capacity(frame.pixel_count());
    to_luminance_into(frame, &mut luminance);
    luminance
}

/// Reduce a pixel buffer into an existing buffer to avoid allocation.
///
/// The buffer is cleared first, so it can be reused across frames of
/// differing sizes.
///
/// # Returns
/// The number of luminance values written.
pub fn to_luminance_into(frame: &PixelBuffer, buffer: &mut Vec<u8>) -> usize {
    buffer.clear();
    buffer.reserve(frame.pixel_count());

    for px in frame.data().chunks_exact(frame.channels() as usize) {
        buffer.push(luminance_of(px[0], px[1], px[2]));
    }

    buffer.len()
}
