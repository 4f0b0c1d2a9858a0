//! Still image loading.

use std::path::Path;

use image::ImageReader;

use super::MediaError;
use crate::frame::PixelBuffer;

/// Decode a still image into a 3-channel RGB buffer.
///
/// The format is sniffed from the file contents, falling back to the
/// extension. Alpha is dropped.
pub fn load_image(path: &Path) -> Result<PixelBuffer, MediaError> {
    let unreadable = |source| MediaError::Unreadable {
        path: path.to_path_buf(),
        source,
    };

    let reader = ImageReader::open(path)
        .map_err(unreadable)?
        .with_guessed_format()
        .map_err(unreadable)?;
    let decoded = reader.decode().map_err(|source| MediaError::ImageDecode {
        path: path.to_path_buf(),
        source,
    })?;

    let rgb = decoded.into_rgb8();
    let (width, height) = rgb.dimensions();
    log::debug!("Decoded {}: {}x{}", path.display(), width, height);

    PixelBuffer::from_raw(rgb.into_raw(), width, height, 3)
        .ok_or(MediaError::InvalidDimensions { width, height })
}
