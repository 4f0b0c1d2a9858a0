//! Input loading: still images via the `image` crate, everything else
//! through an `ffmpeg` decoding process.

mod error;
mod probe;
mod still;
mod video;

use std::path::Path;

pub use error::MediaError;
pub use probe::{parse_probe_output, parse_rate, probe, StreamInfo, DEFAULT_FRAME_RATE};
pub use still::load_image;
pub use video::{ffmpeg_args, parse_showinfo_line, ShowinfoFrame, VideoDecoder};

use crate::frame::DecodedFrame;

/// File extensions (lowercase) decoded as still images.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "bmp", "gif", "tga", "tif", "tiff", "webp", "pnm", "ppm", "pgm", "hdr",
];

/// How an input path is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Rendered once, no pacing.
    Image,
    /// Decoded frame by frame and paced by presentation time.
    Stream,
}

impl InputKind {
    /// Classify a path by its extension, case-insensitively.
    pub fn from_path(path: &Path) -> Self {
        let is_image = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                IMAGE_EXTENSIONS
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false);
        if is_image {
            InputKind::Image
        } else {
            InputKind::Stream
        }
    }
}

/// Fail early with [`MediaError::NotFound`] if `path` does not exist.
pub fn ensure_exists(path: &Path) -> Result<(), MediaError> {
    if path.exists() {
        Ok(())
    } else {
        Err(MediaError::NotFound(path.to_path_buf()))
    }
}

/// A sequential source of decoded frames.
pub trait FrameSource {
    /// The next frame in decode order, or `Ok(None)` at end of stream.
    fn next_frame(&mut self) -> Result<Option<DecodedFrame>, MediaError>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn next_frame(&mut self) -> Result<Option<DecodedFrame>, MediaError> {
        (**self).next_frame()
    }
}
