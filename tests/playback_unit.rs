//! Unit tests for real-time playback.
//!
//! A manual clock stands in for wall time and an in-memory source stands
//! in for the decoder, so pacing decisions can be checked exactly.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use vidtoascii::ascii::{FrameRenderer, Ramp, ScaleFactors, DARK_RAMP};
use vidtoascii::frame::{DecodedFrame, FrameTiming, GlyphGrid, PixelBuffer};
use vidtoascii::media::{FrameSource, MediaError};
use vidtoascii::output::{OutputSink, SinkMode, TerminalSink, CURSOR_HOME};
use vidtoascii::playback::{
    play_stream, Clock, Pacing, PlaybackError, PlaybackScheduler, PlaybackState,
};

/// Clock that advances only when slept on or when a source decodes.
#[derive(Default)]
struct ManualClock {
    now: Rc<Cell<f64>>,
    sleeps: RefCell<Vec<Duration>>,
}

impl ManualClock {
    fn advance(&self, secs: f64) {
        self.now.set(self.now.get() + secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }

    fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
        self.advance(duration.as_secs_f64());
    }
}

/// Frames (or errors) handed out in order.
struct ScriptedSource {
    items: VecDeque<Result<DecodedFrame, MediaError>>,
    decode_cost: Option<(f64, Rc<Cell<f64>>)>,
}

impl ScriptedSource {
    fn frames(times: &[f64]) -> Self {
        let items = times
            .iter()
            .map(|&t| {
                Ok(DecodedFrame {
                    pixels: PixelBuffer::filled(20, 20, [255, 255, 255]),
                    timing: FrameTiming::new(t),
                })
            })
            .collect();
        Self {
            items,
            decode_cost: None,
        }
    }

    /// Advance `clock` by `secs` on every decode.
    fn costing(mut self, secs: f64, clock: &ManualClock) -> Self {
        self.decode_cost = Some((secs, clock.now.clone()));
        self
    }

    fn then_fail(mut self) -> Self {
        self.items.push_back(Err(MediaError::TruncatedFrame {
            expected: 1200,
            got: 17,
        }));
        self
    }
}

impl FrameSource for ScriptedSource {
    fn next_frame(&mut self) -> Result<Option<DecodedFrame>, MediaError> {
        if let Some((secs, now)) = &self.decode_cost {
            now.set(now.get() + secs);
        }
        self.items.pop_front().transpose()
    }
}

/// Sink that records grids and can be told to fail.
#[derive(Default)]
struct RecordingSink {
    grids: Vec<GlyphGrid>,
    fail: bool,
}

impl OutputSink for RecordingSink {
    fn present(&mut self, grid: &GlyphGrid) -> io::Result<()> {
        if self.fail {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        }
        self.grids.push(grid.clone());
        Ok(())
    }
}

fn renderer() -> FrameRenderer {
    FrameRenderer::new(
        Ramp::new(DARK_RAMP).unwrap(),
        ScaleFactors::new(10, 0.5).unwrap(),
    )
}

// ==================== Scheduler Tests ====================

#[test]
fn test_scheduler_waits_out_frame_interval() {
    let mut scheduler = PlaybackScheduler::new(ManualClock::default());
    assert_eq!(
        scheduler.pace(FrameTiming::new(0.0)),
        Pacing::Immediate { lag: 0.0 }
    );
    scheduler.presented();

    scheduler.clock().advance(0.01);
    match scheduler.pace(FrameTiming::new(0.04)) {
        Pacing::Waited { delay } => assert!((delay - 0.03).abs() < 1e-9),
        other => panic!("expected a wait, got {:?}", other),
    }
    assert_eq!(scheduler.state(), PlaybackState::Paced);
}

#[test]
fn test_scheduler_start_is_first_frame_arrival() {
    let clock = ManualClock::default();
    clock.advance(100.0);
    let mut scheduler = PlaybackScheduler::new(clock);
    scheduler.pace(FrameTiming::new(0.0));

    let start = scheduler.playback_clock().unwrap();
    assert_eq!(start.wall_clock_start_seconds(), 100.0);
    assert_eq!(start.target_seconds(FrameTiming::new(2.5)), 102.5);
}

#[test]
fn test_late_frame_is_not_delayed() {
    let mut scheduler = PlaybackScheduler::new(ManualClock::default());
    scheduler.pace(FrameTiming::new(0.0));
    scheduler.clock().advance(5.0);

    assert_eq!(
        scheduler.pace(FrameTiming::new(1.0)),
        Pacing::Immediate { lag: 4.0 }
    );
    assert!(scheduler.clock().sleeps.borrow().is_empty());
}

#[test]
fn test_nonzero_first_pts_waits_for_offset() {
    // The reference is anchored at arrival, so a first frame stamped 0.5s
    // is held for half a second.
    let mut scheduler = PlaybackScheduler::new(ManualClock::default());
    assert_eq!(
        scheduler.pace(FrameTiming::new(0.5)),
        Pacing::Waited { delay: 0.5 }
    );
}

#[test]
fn test_infinite_timestamp_does_not_panic() {
    let mut scheduler = PlaybackScheduler::new(ManualClock::default());
    scheduler.pace(FrameTiming::new(0.0));
    let pacing = scheduler.pace(FrameTiming::new(f64::INFINITY));
    assert!(matches!(pacing, Pacing::Waited { .. }));
    assert_eq!(scheduler.clock().sleeps.borrow().last(), Some(&Duration::ZERO));
}

// ==================== Playback Loop Tests ====================

#[test]
fn test_play_stream_presents_every_frame_in_order() {
    let mut source = ScriptedSource::frames(&[0.0, 0.04, 0.08, 0.12]);
    let mut sink = RecordingSink::default();
    let mut scheduler = PlaybackScheduler::new(ManualClock::default());

    let summary = play_stream(&mut source, &mut renderer(), &mut sink, &mut scheduler).unwrap();

    assert_eq!(summary.frames_presented, 4);
    assert_eq!(summary.late_frames, 0);
    assert!(!summary.cancelled);
    assert_eq!(sink.grids.len(), 4);
    assert_eq!(scheduler.state(), PlaybackState::Drained);

    // Three waits of 40ms bring the clock to the last frame's deadline.
    let sleeps = scheduler.clock().sleeps.borrow();
    assert_eq!(sleeps.len(), 3);
    assert!((scheduler.clock().now() - 0.12).abs() < 1e-6);
}

#[test]
fn test_play_stream_empty_source_drains() {
    let mut source = ScriptedSource::frames(&[]);
    let mut sink = RecordingSink::default();
    let mut scheduler = PlaybackScheduler::new(ManualClock::default());

    let summary = play_stream(&mut source, &mut renderer(), &mut sink, &mut scheduler).unwrap();

    assert_eq!(summary.frames_presented, 0);
    assert!(sink.grids.is_empty());
    assert_eq!(scheduler.state(), PlaybackState::Drained);
    assert!(scheduler.playback_clock().is_none());
}

#[test]
fn test_play_stream_counts_late_frames() {
    // Each decode takes 100ms against a 40ms frame interval.
    let clock = ManualClock::default();
    let mut source = ScriptedSource::frames(&[0.0, 0.04, 0.08]).costing(0.1, &clock);
    let mut sink = RecordingSink::default();
    let mut scheduler = PlaybackScheduler::new(clock);

    let summary = play_stream(&mut source, &mut renderer(), &mut sink, &mut scheduler).unwrap();

    assert_eq!(summary.frames_presented, 3);
    assert_eq!(summary.late_frames, 2);
    assert!((summary.max_lag - 0.12).abs() < 1e-9);
    assert!(scheduler.clock().sleeps.borrow().is_empty());
}

#[test]
fn test_play_stream_decode_error_sets_error_state() {
    let mut source = ScriptedSource::frames(&[0.0, 0.04]).then_fail();
    let mut sink = RecordingSink::default();
    let mut scheduler = PlaybackScheduler::new(ManualClock::default());

    let err = play_stream(&mut source, &mut renderer(), &mut sink, &mut scheduler).unwrap_err();

    assert!(matches!(
        err,
        PlaybackError::Media(MediaError::TruncatedFrame { .. })
    ));
    assert_eq!(sink.grids.len(), 2);
    assert_eq!(scheduler.state(), PlaybackState::Error);
}

#[test]
fn test_play_stream_output_error_sets_error_state() {
    let mut source = ScriptedSource::frames(&[0.0]);
    let mut sink = RecordingSink {
        fail: true,
        ..RecordingSink::default()
    };
    let mut scheduler = PlaybackScheduler::new(ManualClock::default());

    let err = play_stream(&mut source, &mut renderer(), &mut sink, &mut scheduler).unwrap_err();

    assert!(matches!(err, PlaybackError::Output(_)));
    assert_eq!(scheduler.state(), PlaybackState::Error);
}

#[test]
fn test_play_stream_stops_when_cancelled() {
    let flag = Arc::new(AtomicBool::new(true));
    let mut source = ScriptedSource::frames(&[0.0, 0.04]);
    let mut sink = RecordingSink::default();
    let mut scheduler =
        PlaybackScheduler::new(ManualClock::default()).with_cancel_flag(flag.clone());

    let summary = play_stream(&mut source, &mut renderer(), &mut sink, &mut scheduler).unwrap();

    assert!(summary.cancelled);
    assert_eq!(summary.frames_presented, 0);
    assert!(sink.grids.is_empty());
    assert_eq!(scheduler.state(), PlaybackState::Drained);
    assert!(flag.load(Ordering::SeqCst));
}

#[test]
fn test_play_stream_error_after_cancel_is_clean_stop() {
    /// Source that raises the cancel flag, then fails like an interrupted
    /// decoder process.
    struct InterruptedSource {
        flag: Arc<AtomicBool>,
    }

    impl FrameSource for InterruptedSource {
        fn next_frame(&mut self) -> Result<Option<DecodedFrame>, MediaError> {
            self.flag.store(true, Ordering::SeqCst);
            Err(MediaError::TruncatedFrame {
                expected: 10,
                got: 0,
            })
        }
    }

    let flag = Arc::new(AtomicBool::new(false));
    let mut source = InterruptedSource { flag: flag.clone() };
    let mut sink = RecordingSink::default();
    let mut scheduler = PlaybackScheduler::new(ManualClock::default()).with_cancel_flag(flag);

    let summary = play_stream(&mut source, &mut renderer(), &mut sink, &mut scheduler).unwrap();
    assert!(summary.cancelled);
    assert_eq!(scheduler.state(), PlaybackState::Drained);
}

// ==================== Terminal Output Tests ====================

#[test]
fn test_stream_output_homes_cursor_per_frame() {
    let mut source = ScriptedSource::frames(&[0.0, 0.04, 0.08]);
    let mut sink = TerminalSink::new(Vec::new(), SinkMode::Stream);
    let mut scheduler = PlaybackScheduler::new(ManualClock::default());

    play_stream(&mut source, &mut renderer(), &mut sink, &mut scheduler).unwrap();

    let text = String::from_utf8(sink.get_ref().clone()).unwrap();
    assert_eq!(text.matches(CURSOR_HOME).count(), 3);
    // 20x20 white frame: 4 columns, 2 rows of the densest glyph.
    assert_eq!(text.matches("$$$$\n$$$$\n").count(), 3);
}
