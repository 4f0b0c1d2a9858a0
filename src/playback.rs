//! Real-time playback pacing.
//!
//! The scheduler anchors stream time to the wall clock when the first frame
//! arrives and then holds every frame until `start + presentation_seconds`.
//! A frame that is already late is presented immediately: there is no frame
//! dropping and no catch-up, so sustained slow decoding accumulates lag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::ascii::FrameRenderer;
use crate::frame::FrameTiming;
use crate::media::{FrameSource, MediaError};
use crate::output::OutputSink;

/// Source of wall-clock time and the means to wait on it.
pub trait Clock {
    /// Current time in seconds from an arbitrary fixed origin.
    fn now(&self) -> f64;

    /// Block the calling thread for `duration`.
    fn sleep(&self, duration: Duration);
}

/// Monotonic clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Wall-clock reference for one playback session.
///
/// Set once when the first frame begins playback and never changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackClock {
    wall_clock_start_seconds: f64,
}

impl PlaybackClock {
    pub fn started_at(wall_clock_start_seconds: f64) -> Self {
        Self {
            wall_clock_start_seconds,
        }
    }

    pub fn wall_clock_start_seconds(&self) -> f64 {
        self.wall_clock_start_seconds
    }

    /// Wall-clock time at which a frame is due.
    pub fn target_seconds(&self, timing: FrameTiming) -> f64 {
        self.wall_clock_start_seconds + timing.presentation_seconds
    }
}

/// Seconds to wait before presenting a frame.
///
/// Positive means the frame is early, zero or negative means it is due or
/// late.
pub fn compute_delay(wall_clock_start_seconds: f64, timing: FrameTiming, now: f64) -> f64 {
    wall_clock_start_seconds + timing.presentation_seconds - now
}

/// Scheduler lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// No frame received yet.
    Idle,
    /// Start reference recorded, first frame not yet paced.
    Armed,
    /// A frame has been held until its deadline and is ready to present.
    Paced,
    /// The last paced frame has been written to the sink.
    Presented,
    /// End of stream, or playback was cancelled.
    Drained,
    /// Decoding or output failed.
    Error,
}

/// What happened when pacing a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pacing {
    /// The frame was early and the scheduler slept for `delay` seconds.
    Waited { delay: f64 },
    /// The frame was due or late by `lag` seconds and proceeds immediately.
    Immediate { lag: f64 },
    /// Playback was cancelled; the frame must not be presented.
    Cancelled,
}

/// Holds each frame until its presentation time.
pub struct PlaybackScheduler<C: Clock> {
    clock: C,
    playback_clock: Option<PlaybackClock>,
    state: PlaybackState,
    cancel: Option<Arc<AtomicBool>>,
}

impl<C: Clock> PlaybackScheduler<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            playback_clock: None,
            state: PlaybackState::Idle,
            cancel: None,
        }
    }

    /// Stop pacing once `flag` becomes true.
    ///
    /// The flag is checked before and after each wait; a wait in progress
    /// runs to completion.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// The session reference, once the first frame has arrived.
    pub fn playback_clock(&self) -> Option<PlaybackClock> {
        self.playback_clock
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    /// Record the start reference on the first frame. Later calls keep the
    /// original reference.
    fn arm(&mut self) -> PlaybackClock {
        if let Some(clock) = self.playback_clock {
            return clock;
        }
        let clock = PlaybackClock::started_at(self.clock.now());
        log::debug!(
            "Playback armed at {:.6}s",
            clock.wall_clock_start_seconds()
        );
        self.playback_clock = Some(clock);
        self.state = PlaybackState::Armed;
        clock
    }

    /// Seconds until `timing` is due, arming the scheduler if needed.
    pub fn delay_for(&mut self, timing: FrameTiming) -> f64 {
        let start = self.arm().wall_clock_start_seconds();
        compute_delay(start, timing, self.clock.now())
    }

    /// Wait until `timing` is due.
    ///
    /// This is the only blocking point of playback.
    pub fn pace(&mut self, timing: FrameTiming) -> Pacing {
        if self.cancelled() {
            self.state = PlaybackState::Drained;
            return Pacing::Cancelled;
        }

        let delay = self.delay_for(timing);
        let pacing = if delay > 0.0 {
            // Non-finite deadlines cannot be waited on.
            self.clock
                .sleep(Duration::try_from_secs_f64(delay).unwrap_or(Duration::ZERO));
            Pacing::Waited { delay }
        } else {
            Pacing::Immediate { lag: -delay }
        };

        if self.cancelled() {
            self.state = PlaybackState::Drained;
            return Pacing::Cancelled;
        }
        self.state = PlaybackState::Paced;
        pacing
    }

    /// Mark the paced frame as written to the sink.
    pub fn presented(&mut self) {
        self.state = PlaybackState::Presented;
    }

    /// The source reported end of stream.
    pub fn drain(&mut self) {
        self.state = PlaybackState::Drained;
    }

    /// Decoding or output failed.
    pub fn fail(&mut self) {
        self.state = PlaybackState::Error;
    }
}

/// Outcome of a completed playback run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaybackSummary {
    pub frames_presented: u64,
    /// Frames that were already past their deadline when paced.
    pub late_frames: u64,
    /// Largest lag observed, in seconds.
    pub max_lag: f64,
    pub cancelled: bool,
}

/// Errors that end a playback run.
#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error(transparent)]
    Media(#[from] MediaError),
    #[error("failed to write frame: {0}")]
    Output(#[from] std::io::Error),
}

/// Decode, render, pace and present frames until the source is drained.
///
/// Frames are presented strictly in decode order. Any decode or output
/// failure aborts the run and leaves the scheduler in [`PlaybackState::Error`].
pub fn play_stream<S, O, C>(
    source: &mut S,
    renderer: &mut FrameRenderer,
    sink: &mut O,
    scheduler: &mut PlaybackScheduler<C>,
) -> Result<PlaybackSummary, PlaybackError>
where
    S: FrameSource + ?Sized,
    O: OutputSink + ?Sized,
    C: Clock,
{
    let mut summary = PlaybackSummary::default();

    loop {
        if scheduler.cancelled() {
            scheduler.drain();
            summary.cancelled = true;
            break;
        }

        let frame = match source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                scheduler.drain();
                break;
            }
            // Ctrl+C also reaches the decoder process, so a failure right
            // after cancellation is the interrupt, not a broken stream.
            Err(_) if scheduler.cancelled() => {
                scheduler.drain();
                summary.cancelled = true;
                break;
            }
            Err(e) => {
                scheduler.fail();
                return Err(e.into());
            }
        };

        let grid = renderer.render(&frame.pixels);

        match scheduler.pace(frame.timing) {
            Pacing::Cancelled => {
                summary.cancelled = true;
                break;
            }
            Pacing::Immediate { lag } if lag > 0.0 => {
                summary.late_frames += 1;
                summary.max_lag = summary.max_lag.max(lag);
                log::debug!(
                    "Frame at {:.3}s presented {:.3}s late",
                    frame.timing.presentation_seconds,
                    lag
                );
            }
            _ => {}
        }

        if let Err(e) = sink.present(&grid) {
            scheduler.fail();
            return Err(e.into());
        }
        scheduler.presented();
        summary.frames_presented += 1;
    }

    log::info!(
        "Playback finished: {} frames, {} late (max lag {:.3}s){}",
        summary.frames_presented,
        summary.late_frames,
        summary.max_lag,
        if summary.cancelled { ", cancelled" } else { "" }
    );
    Ok(summary)
}
