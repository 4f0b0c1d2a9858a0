//! Grid sizing from source dimensions and scale factors.

/// Default ratio of a terminal glyph's width to its height.
/// Glyphs are roughly twice as tall as they are wide.
pub const DEFAULT_ASPECT_RATIO: f64 = 0.5;

/// Default cell height in source pixels.
pub const DEFAULT_SCALE_Y: u32 = 10;

/// How many source pixels one glyph cell spans on each axis.
///
/// The horizontal factor is derived from the vertical one so that cells
/// are as wide, in pixels, as a terminal glyph is relative to its height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactors {
    scale_y: u32,
    aspect_ratio: f64,
}

impl ScaleFactors {
    /// Returns `None` if `scale_y` is zero or `aspect_ratio` is not in `(0, 1]`.
    pub fn new(scale_y: u32, aspect_ratio: f64) -> Option<Self> {
        if scale_y == 0 || !(aspect_ratio > 0.0 && aspect_ratio <= 1.0) {
            return None;
        }
        Some(Self {
            scale_y,
            aspect_ratio,
        })
    }

    /// Cell height in source pixels.
    pub fn scale_y(&self) -> u32 {
        self.scale_y
    }

    /// Cell width in source pixels: `scale_y * aspect_ratio`.
    pub fn scale_x(&self) -> f64 {
        self.scale_y as f64 * self.aspect_ratio
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    /// Grid size for an image of the given pixel dimensions.
    pub fn grid_for(&self, width: u32, height: u32) -> (u32, u32) {
        grid_dimensions(width, height, self.scale_x(), self.scale_y as f64)
    }
}

impl Default for ScaleFactors {
    fn default() -> Self {
        Self {
            scale_y: DEFAULT_SCALE_Y,
            aspect_ratio: DEFAULT_ASPECT_RATIO,
        }
    }
}

/// Compute `(cols, rows)` for an image.
///
/// `cols = floor(width / scale_x)` and `rows = floor(height / scale_y)`,
/// each clamped to a minimum of 1.
pub fn grid_dimensions(width: u32, height: u32, scale_x: f64, scale_y: f64) -> (u32, u32) {
    let cols = (width as f64 / scale_x).floor() as u32;
    let rows = (height as f64 / scale_y).floor() as u32;
    (cols.max(1), rows.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scale() {
        let scale = ScaleFactors::default();
        assert_eq!(scale.scale_y(), 10);
        assert_eq!(scale.scale_x(), 5.0);
    }

    #[test]
    fn test_grid_for_square_image() {
        let scale = ScaleFactors::new(10, 0.5).unwrap();
        assert_eq!(scale.grid_for(100, 100), (20, 10));
    }

    #[test]
    fn test_fractional_scale_x_floors() {
        // scale_x = 5.6: 100 / 5.6 = 17.86
        let scale = ScaleFactors::new(10, 0.56).unwrap();
        assert_eq!(scale.grid_for(100, 100), (17, 10));
    }

    #[test]
    fn test_tiny_image_clamps_to_one_cell() {
        let scale = ScaleFactors::default();
        assert_eq!(scale.grid_for(3, 2), (1, 1));
    }

    #[test]
    fn test_invalid_factors_rejected() {
        assert!(ScaleFactors::new(0, 0.5).is_none());
        assert!(ScaleFactors::new(10, 0.0).is_none());
        assert!(ScaleFactors::new(10, 1.5).is_none());
        assert!(ScaleFactors::new(10, f64::NAN).is_none());
    }
}
