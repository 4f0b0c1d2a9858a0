//! vidtoascii library crate.
//!
//! Renders still images and video streams as text glyphs in a terminal,
//! pacing video frames to their presentation timestamps.

pub mod app;
pub mod ascii;
pub mod cli;
pub mod config;
pub mod error;
pub mod frame;
pub mod media;
pub mod output;
pub mod playback;
