use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by a capture session.
///
/// Frames with no usable contour are not errors; they degrade to a
/// `HandState` without analysis.
#[derive(Error, Debug)]
pub enum DetectError {
    #[error("No capture session is running; call start() before processing frames")]
    SessionNotStarted,
    #[error("A capture session is already running")]
    SessionAlreadyStarted,
    #[error("Cannot start a session with an empty {width}x{height} frame")]
    EmptyFrame { width: u32, height: u32 },
    #[error("Frame is {actual:?} but the session was started with {expected:?}")]
    FrameSizeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
    #[error("Debug directory is not empty: {0}")]
    DebugDirNotEmpty(PathBuf),
    #[error("Failed to write debug output: {0}")]
    DebugOutput(#[from] std::io::Error),
    #[error("Failed to encode debug image: {0}")]
    DebugImage(#[from] image::ImageError),
}
