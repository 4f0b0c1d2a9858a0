//! Stream discovery with ffprobe.

use std::path::Path;
use std::process::{Command, Stdio};

use serde::Deserialize;

use super::MediaError;

/// Frame rate assumed when the container does not declare one.
pub const DEFAULT_FRAME_RATE: f64 = 25.0;

/// Properties of the first video stream in an input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamInfo {
    pub width: u32,
    pub height: u32,
    /// Frames per second, used to estimate timestamps for frames without one.
    pub frame_rate: f64,
}

impl StreamInfo {
    /// Size of one raw RGB24 frame in bytes.
    pub fn frame_bytes(&self) -> usize {
        (self.width as usize) * (self.height as usize) * 3
    }
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
    avg_frame_rate: Option<String>,
    r_frame_rate: Option<String>,
}

/// Query the first video stream of `path` by running `ffprobe`.
pub fn probe(path: &Path, ffprobe: &str) -> Result<StreamInfo, MediaError> {
    let output = Command::new(ffprobe)
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height,avg_frame_rate,r_frame_rate",
            "-of",
            "json",
        ])
        .arg(path)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| MediaError::spawn(ffprobe, e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(MediaError::UnsupportedStream {
            path: path.to_path_buf(),
            message: stderr.trim().to_string(),
        });
    }

    parse_probe_output(&String::from_utf8_lossy(&output.stdout), path)
}

/// Parse ffprobe's JSON output.
pub fn parse_probe_output(json: &str, path: &Path) -> Result<StreamInfo, MediaError> {
    let parsed: ProbeOutput = serde_json::from_str(json)?;
    let stream = parsed
        .streams
        .into_iter()
        .next()
        .ok_or_else(|| MediaError::NoVideoStream(path.to_path_buf()))?;

    let (width, height) = match (stream.width, stream.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        (w, h) => {
            return Err(MediaError::InvalidDimensions {
                width: w.unwrap_or(0),
                height: h.unwrap_or(0),
            })
        }
    };

    let frame_rate = stream
        .avg_frame_rate
        .as_deref()
        .and_then(parse_rate)
        .or_else(|| stream.r_frame_rate.as_deref().and_then(parse_rate))
        .unwrap_or_else(|| {
            log::warn!(
                "No frame rate declared, assuming {} fps for untimed frames",
                DEFAULT_FRAME_RATE
            );
            DEFAULT_FRAME_RATE
        });

    Ok(StreamInfo {
        width,
        height,
        frame_rate,
    })
}

/// Parse an ffprobe rational like `"30000/1001"` or a plain number.
///
/// Returns `None` for zero, negative or undefined rates such as `"0/0"`.
pub fn parse_rate(s: &str) -> Option<f64> {
    let rate = match s.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            num / den
        }
        None => s.trim().parse().ok()?,
    };
    (rate.is_finite() && rate > 0.0).then_some(rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATH: &str = "clip.mp4";

    #[test]
    fn test_parse_rate() {
        assert_eq!(parse_rate("30/1"), Some(30.0));
        assert_eq!(parse_rate("25"), Some(25.0));
        let ntsc = parse_rate("30000/1001").unwrap();
        assert!((ntsc - 29.97).abs() < 0.01);
    }

    #[test]
    fn test_parse_rate_rejects_undefined() {
        assert_eq!(parse_rate("0/0"), None);
        assert_eq!(parse_rate("0/1"), None);
        assert_eq!(parse_rate("abc"), None);
    }

    #[test]
    fn test_parse_probe_output() {
        let json = r#"{
            "programs": [],
            "streams": [
                { "width": 640, "height": 360, "r_frame_rate": "24/1", "avg_frame_rate": "24/1" }
            ]
        }"#;
        let info = parse_probe_output(json, Path::new(PATH)).unwrap();
        assert_eq!(
            info,
            StreamInfo {
                width: 640,
                height: 360,
                frame_rate: 24.0
            }
        );
        assert_eq!(info.frame_bytes(), 640 * 360 * 3);
    }

    #[test]
    fn test_parse_probe_falls_back_to_r_frame_rate() {
        let json = r#"{"streams": [{"width": 2, "height": 2, "avg_frame_rate": "0/0", "r_frame_rate": "50/1"}]}"#;
        let info = parse_probe_output(json, Path::new(PATH)).unwrap();
        assert_eq!(info.frame_rate, 50.0);
    }

    #[test]
    fn test_parse_probe_default_frame_rate() {
        let json = r#"{"streams": [{"width": 2, "height": 2}]}"#;
        let info = parse_probe_output(json, Path::new(PATH)).unwrap();
        assert_eq!(info.frame_rate, DEFAULT_FRAME_RATE);
    }

    #[test]
    fn test_parse_probe_no_video_stream() {
        let err = parse_probe_output(r#"{"programs": [], "streams": []}"#, Path::new(PATH))
            .unwrap_err();
        assert!(matches!(err, MediaError::NoVideoStream(_)));

        let err = parse_probe_output("{}", Path::new(PATH)).unwrap_err();
        assert!(matches!(err, MediaError::NoVideoStream(_)));
    }

    #[test]
    fn test_parse_probe_missing_dimensions() {
        let err = parse_probe_output(r#"{"streams": [{"width": 640}]}"#, Path::new(PATH))
            .unwrap_err();
        assert!(matches!(
            err,
            MediaError::InvalidDimensions {
                width: 640,
                height: 0
            }
        ));
    }

    #[test]
    fn test_parse_probe_invalid_json() {
        let err = parse_probe_output("not json", Path::new(PATH)).unwrap_err();
        assert!(matches!(err, MediaError::Probe(_)));
    }
}
