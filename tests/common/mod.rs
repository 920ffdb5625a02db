mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from fingercount for tests
pub use fingercount::{DetectorConfig, FrameOutput, Mode, Pipeline, track_hand};
