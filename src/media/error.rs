//! Error types for input loading and stream decoding.

use std::path::PathBuf;

/// Errors that can occur while loading an image or decoding a stream.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("input file '{}' not found", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read '{}': {source}", path.display())]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to decode image '{}': {source}", path.display())]
    ImageDecode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("{tool} not found. Please install FFmpeg (https://ffmpeg.org/download.html) or set its path in the [decoder] config section")]
    ToolNotFound { tool: String },

    #[error("failed to spawn {tool}: {source}")]
    Spawn {
        tool: String,
        source: std::io::Error,
    },

    #[error("unsupported or undetectable stream '{}': {message}", path.display())]
    UnsupportedStream { path: PathBuf, message: String },

    #[error("no video stream found in '{}'", .0.display())]
    NoVideoStream(PathBuf),

    #[error("failed to parse stream information: {0}")]
    Probe(#[from] serde_json::Error),

    #[error("invalid frame dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("failed to allocate {bytes} bytes for a frame buffer")]
    Allocation { bytes: usize },

    #[error("truncated frame: expected {expected} bytes, got {got}")]
    TruncatedFrame { expected: usize, got: usize },

    #[error("decoder exited with {status}\n{message}")]
    DecodeFailed { status: String, message: String },

    #[error("I/O error while decoding: {0}")]
    Io(#[from] std::io::Error),
}

impl MediaError {
    /// Map a process spawn failure, distinguishing a missing executable.
    pub(crate) fn spawn(tool: &str, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            MediaError::ToolNotFound {
                tool: tool.to_string(),
            }
        } else {
            MediaError::Spawn {
                tool: tool.to_string(),
                source,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = MediaError::NotFound(PathBuf::from("clip.mp4"));
        assert_eq!(err.to_string(), "input file 'clip.mp4' not found");
    }

    #[test]
    fn test_spawn_maps_missing_tool() {
        let err = MediaError::spawn(
            "ffprobe",
            std::io::Error::new(std::io::ErrorKind::NotFound, "nope"),
        );
        assert!(matches!(err, MediaError::ToolNotFound { ref tool } if tool == "ffprobe"));
        assert!(err.to_string().contains("install FFmpeg"));
    }

    #[test]
    fn test_spawn_keeps_other_errors() {
        let err = MediaError::spawn(
            "ffmpeg",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, MediaError::Spawn { .. }));
        assert!(err.to_string().contains("failed to spawn ffmpeg"));
    }

    #[test]
    fn test_truncated_frame_display() {
        let err = MediaError::TruncatedFrame {
            expected: 300,
            got: 120,
        };
        assert_eq!(
            err.to_string(),
            "truncated frame: expected 300 bytes, got 120"
        );
    }
}
