pub mod config;
pub mod detection;
pub mod error;
pub mod geometry;
pub mod models;
pub mod overlay;
pub mod pipeline;

pub use config::DetectorConfig;
pub use detection::track_hand;
pub use error::DetectError;
pub use models::{BoundingRect, CalibrationState, ColorBound, Defect, HandState, HullAnalysis, Radii};
pub use pipeline::{FrameBuffers, FrameOutput, FrameResult, Mode, Pipeline};
