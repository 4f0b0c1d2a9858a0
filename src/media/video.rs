//! Raw RGB frame decoding through an `ffmpeg` child process.
//!
//! `ffmpeg` writes packed RGB24 frames to stdout. The `showinfo` filter logs
//! each frame's number and `pts_time` to stderr, where a reader thread picks
//! them up and forwards them over a channel.

use std::collections::VecDeque;
use std::ffi::OsString;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::process::{Child, ChildStderr, ChildStdout, Command, Stdio};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::probe::{probe, StreamInfo};
use super::{FrameSource, MediaError};
use crate::config::DecoderConfig;
use crate::frame::{DecodedFrame, FrameTiming, PixelBuffer};

/// How long to wait for a frame's showinfo line once its pixels have arrived.
const PTS_WAIT: Duration = Duration::from_millis(100);

/// Number of non-showinfo stderr lines kept for error reports.
const MAX_DIAGNOSTIC_LINES: usize = 20;

/// Per-frame metadata reported by the `showinfo` filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShowinfoFrame {
    /// Zero-based output frame number (`n:`).
    pub number: u64,
    /// Presentation time in seconds, `None` for `NOPTS` or unparsable values.
    pub pts_time: Option<f64>,
}

/// Parse one line of ffmpeg stderr as a showinfo frame report.
///
/// Returns `None` for any other log line.
pub fn parse_showinfo_line(line: &str) -> Option<ShowinfoFrame> {
    if !line.contains("Parsed_showinfo") {
        return None;
    }
    let number = field(line, " n:")?.parse().ok()?;
    let pts_time = field(line, "pts_time:").and_then(|v| v.parse().ok());
    Some(ShowinfoFrame { number, pts_time })
}

fn field<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let start = line.find(key)? + key.len();
    line[start..].split_whitespace().next()
}

/// Command-line arguments for decoding `path` to raw RGB24 on stdout.
pub fn ffmpeg_args(path: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-hide_banner", "-nostdin", "-nostats", "-loglevel", "info"]
        .into_iter()
        .map(OsString::from)
        .collect();
    // Keep decoded dimensions equal to the probed ones.
    args.push("-noautorotate".into());
    args.push("-i".into());
    args.push(path.as_os_str().to_owned());
    for arg in [
        "-map",
        "0:v:0",
        "-vf",
        "showinfo",
        "-fps_mode",
        "passthrough",
        "-f",
        "rawvideo",
        "-pix_fmt",
        "rgb24",
        "pipe:1",
    ] {
        args.push(arg.into());
    }
    args
}

/// Decodes the first video stream of a file into RGB frames.
///
/// Owns the `ffmpeg` process for its whole lifetime; dropping the decoder
/// kills and reaps the process and joins the stderr reader.
pub struct VideoDecoder {
    child: Child,
    stdout: ChildStdout,
    info: StreamInfo,
    frame_index: u64,
    pts_rx: Receiver<ShowinfoFrame>,
    pending: VecDeque<ShowinfoFrame>,
    stderr_thread: Option<JoinHandle<Vec<String>>>,
    finished: bool,
}

impl VideoDecoder {
    /// Probe `path` and start decoding it.
    pub fn open(path: &Path, tools: &DecoderConfig) -> Result<Self, MediaError> {
        let info = probe(path, &tools.ffprobe)?;
        log::info!(
            "Video stream {}x{} @ {:.3} fps",
            info.width,
            info.height,
            info.frame_rate
        );

        let mut child = Command::new(&tools.ffmpeg)
            .args(ffmpeg_args(path))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| MediaError::spawn(&tools.ffmpeg, e))?;

        let (stdout, stderr) = match (child.stdout.take(), child.stderr.take()) {
            (Some(out), Some(err)) => (out, err),
            _ => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(MediaError::Io(std::io::Error::other(
                    "ffmpeg pipes were not captured",
                )));
            }
        };

        let (tx, pts_rx) = mpsc::channel();
        let stderr_thread = Some(spawn_stderr_reader(stderr, tx));

        Ok(Self {
            child,
            stdout,
            info,
            frame_index: 0,
            pts_rx,
            pending: VecDeque::new(),
            stderr_thread,
            finished: false,
        })
    }

    pub fn info(&self) -> StreamInfo {
        self.info
    }

    /// Read exactly one frame from stdout.
    ///
    /// Returns `Ok(None)` on a clean end of stream.
    fn read_frame_bytes(&mut self) -> Result<Option<Vec<u8>>, MediaError> {
        let bytes = self.info.frame_bytes();
        let mut data = Vec::new();
        data.try_reserve_exact(bytes)
            .map_err(|_| MediaError::Allocation { bytes })?;
        data.resize(bytes, 0);

        let mut filled = 0;
        while filled < bytes {
            match self.stdout.read(&mut data[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        match filled {
            0 => Ok(None),
            n if n < bytes => Err(MediaError::TruncatedFrame {
                expected: bytes,
                got: n,
            }),
            _ => Ok(Some(data)),
        }
    }

    /// Presentation time reported for frame `index`, if it arrives in time.
    fn take_pts(&mut self, index: u64) -> Option<f64> {
        let deadline = Instant::now() + PTS_WAIT;
        loop {
            while let Some(front) = self.pending.front() {
                if front.number < index {
                    self.pending.pop_front();
                } else if front.number == index {
                    return self.pending.pop_front().and_then(|f| f.pts_time);
                } else {
                    return None;
                }
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.pts_rx.recv_timeout(remaining) {
                Ok(frame) => self.pending.push_back(frame),
                Err(_) => return None,
            }
        }
    }

    /// Wait for ffmpeg to exit after end of stream and check its status.
    fn finish(&mut self) -> Result<(), MediaError> {
        self.finished = true;
        let status = self.child.wait()?;
        let diagnostics = self.take_diagnostics();
        if status.success() {
            log::debug!("ffmpeg exited cleanly after {} frames", self.frame_index);
            Ok(())
        } else {
            Err(MediaError::DecodeFailed {
                status: status.to_string(),
                message: diagnostics.join("\n"),
            })
        }
    }

    fn take_diagnostics(&mut self) -> Vec<String> {
        self.stderr_thread
            .take()
            .and_then(|h| h.join().ok())
            .unwrap_or_default()
    }
}

impl FrameSource for VideoDecoder {
    fn next_frame(&mut self) -> Result<Option<DecodedFrame>, MediaError> {
        if self.finished {
            return Ok(None);
        }

        let Some(data) = self.read_frame_bytes()? else {
            self.finish()?;
            return Ok(None);
        };

        let index = self.frame_index;
        self.frame_index += 1;

        let pts = self.take_pts(index);
        if pts.is_none() {
            log::debug!("Frame {} has no usable pts, using decode order", index);
        }
        let timing = FrameTiming::resolve(pts, index, self.info.frame_rate);

        let pixels = PixelBuffer::from_raw(data, self.info.width, self.info.height, 3).ok_or(
            MediaError::InvalidDimensions {
                width: self.info.width,
                height: self.info.height,
            },
        )?;

        Ok(Some(DecodedFrame { pixels, timing }))
    }
}

impl Drop for VideoDecoder {
    fn drop(&mut self) {
        if !self.finished && matches!(self.child.try_wait(), Ok(None)) {
            let _ = self.child.kill();
        }
        let _ = self.child.wait();
        let _ = self.take_diagnostics();
    }
}

/// Forward showinfo reports over `tx`, keeping the tail of everything else.
fn spawn_stderr_reader(
    stderr: ChildStderr,
    tx: Sender<ShowinfoFrame>,
) -> JoinHandle<Vec<String>> {
    thread::spawn(move || {
        let reader = BufReader::new(stderr);
        let mut diagnostics = VecDeque::with_capacity(MAX_DIAGNOSTIC_LINES);
        for line in reader.lines() {
            let Ok(line) = line else { break };
            if let Some(frame) = parse_showinfo_line(&line) {
                // Receiver gone means the decoder is shutting down.
                let _ = tx.send(frame);
                continue;
            }
            log::trace!("[ffmpeg] {}", line);
            if diagnostics.len() == MAX_DIAGNOSTIC_LINES {
                diagnostics.pop_front();
            }
            diagnostics.push_back(line);
        }
        diagnostics.into_iter().collect()
    })
}
