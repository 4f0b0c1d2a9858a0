//! Wiring from parsed arguments to a finished render.

use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::ascii::FrameRenderer;
use crate::cli::{handle_config_action, Args, Command};
use crate::config::{Config, DecoderConfig};
use crate::error::AppError;
use crate::media::{ensure_exists, load_image, InputKind, VideoDecoder};
use crate::output::{OutputSink, SinkMode, TerminalSink};
use crate::playback::{play_stream, PlaybackScheduler, PlaybackSummary, SystemClock};

/// Run the command described by `args`.
pub fn run(args: &Args) -> Result<(), AppError> {
    if let Some(Command::Config { action }) = &args.command {
        return handle_config_action(action, args.config.as_deref());
    }

    let Some(input) = args.input.as_deref() else {
        // clap requires the input whenever no subcommand is given.
        return Ok(());
    };

    let mut config = Config::load(args.config.as_deref())?;
    args.apply_to(&mut config);

    // Reject a bad ramp or scale before touching the input.
    let renderer = build_renderer(&config)?;
    ensure_exists(input)?;

    match InputKind::from_path(input) {
        InputKind::Image => {
            let mut sink = TerminalSink::new(io::stdout().lock(), SinkMode::Still);
            render_still(input, renderer, &mut sink)
        }
        InputKind::Stream => {
            let cancel = Arc::new(AtomicBool::new(false));
            let flag = cancel.clone();
            ctrlc::set_handler(move || {
                flag.store(true, Ordering::SeqCst);
            })?;

            let mut sink = TerminalSink::new(io::stdout().lock(), SinkMode::Stream);
            play_video(input, &config.decoder, renderer, &mut sink, cancel).map(|_| ())
        }
    }
}

/// Validate the render section and build a renderer from it.
pub fn build_renderer(config: &Config) -> Result<FrameRenderer, AppError> {
    let ramp = config.render.build_ramp()?;
    let scale = config.render.scale_factors()?;
    log::info!(
        "Ramp {:?}, cells {}x{:.2} px",
        ramp.to_string(),
        scale.scale_y(),
        scale.scale_x()
    );
    Ok(FrameRenderer::new(ramp, scale))
}

/// Decode a still image, render it once and present it. No pacing.
pub fn render_still<O: OutputSink + ?Sized>(
    path: &Path,
    mut renderer: FrameRenderer,
    sink: &mut O,
) -> Result<(), AppError> {
    let frame = load_image(path)?;
    let grid = renderer.render(&frame);
    log::info!(
        "Rendered {}x{} image as {}x{} glyphs",
        frame.width(),
        frame.height(),
        grid.cols(),
        grid.rows()
    );
    sink.present(&grid)?;
    Ok(())
}

/// Decode and play a video stream in real time.
///
/// The decoder is dropped, and its process reaped, on every return path.
pub fn play_video<O: OutputSink + ?Sized>(
    path: &Path,
    tools: &DecoderConfig,
    mut renderer: FrameRenderer,
    sink: &mut O,
    cancel: Arc<AtomicBool>,
) -> Result<PlaybackSummary, AppError> {
    let mut decoder = VideoDecoder::open(path, tools)?;
    let (cols, rows) = renderer.grid_for(decoder.info().width, decoder.info().height);
    log::info!("Playing {} as {}x{} glyphs", path.display(), cols, rows);

    let mut scheduler = PlaybackScheduler::new(SystemClock::new()).with_cancel_flag(cancel);
    let summary = play_stream(&mut decoder, &mut renderer, sink, &mut scheduler)?;
    Ok(summary)
}
