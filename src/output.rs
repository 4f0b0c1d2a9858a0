//! Writing glyph grids to the terminal.
//!
//! Plain ANSI escape sequences only: successive stream frames overwrite
//! each other by homing the cursor instead of clearing the screen.

use std::io::{self, Write};

use crate::frame::GlyphGrid;

/// Move the cursor to the top-left corner.
pub const CURSOR_HOME: &str = "\x1b[H";
const CLEAR_SCREEN: &str = "\x1b[2J";
const HIDE_CURSOR: &str = "\x1b[?25l";
const SHOW_CURSOR: &str = "\x1b[?25h";

/// Destination for rendered frames.
pub trait OutputSink {
    /// Write one grid: `rows` lines of `cols` glyphs, each ending in a newline.
    fn present(&mut self, grid: &GlyphGrid) -> io::Result<()>;
}

/// How a [`TerminalSink`] frames its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkMode {
    /// A single grid with no control sequences, safe to redirect to a file.
    Still,
    /// Successive frames drawn over each other.
    Stream,
}

/// Writes grids to any [`Write`] target, normally stdout.
///
/// In [`SinkMode::Stream`] the first frame clears the screen and hides the
/// cursor, every frame is preceded by [`CURSOR_HOME`], and the cursor is
/// shown again when the sink is dropped.
pub struct TerminalSink<W: Write> {
    out: W,
    mode: SinkMode,
    started: bool,
    buffer: String,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W, mode: SinkMode) -> Self {
        Self {
            out,
            mode,
            started: false,
            buffer: String::new(),
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }
}

impl<W: Write> OutputSink for TerminalSink<W> {
    fn present(&mut self, grid: &GlyphGrid) -> io::Result<()> {
        // Build the whole frame first so it reaches the terminal in one write.
        self.buffer.clear();
        if self.mode == SinkMode::Stream {
            if !self.started {
                self.buffer.push_str(CLEAR_SCREEN);
                self.buffer.push_str(HIDE_CURSOR);
            }
            self.buffer.push_str(CURSOR_HOME);
        }
        for line in grid.lines() {
            self.buffer.extend(line.iter());
            self.buffer.push('\n');
        }
        self.started = true;

        self.out.write_all(self.buffer.as_bytes())?;
        self.out.flush()
    }
}

impl<W: Write> Drop for TerminalSink<W> {
    fn drop(&mut self) {
        if self.mode == SinkMode::Stream && self.started {
            // Best-effort restore; errors during drop are ignored.
            let _ = self.out.write_all(SHOW_CURSOR.as_bytes());
            let _ = self.out.flush();
        }
    }
}
