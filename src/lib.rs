//! Detection tracking and shot scoring for shooting-range training.
//!
//! [`ObjectTracker`] turns per-frame detector output (targets, target
//! centers, bullet holes) into objects with stable IDs. [`ErrorCalculator`]
//! reconstructs the physical targets from the tracked centers and scores a
//! bullet hole: closest target, pixel offset, grid cell and clock region.

mod error;
pub mod integration;
pub mod scoring;
pub mod tracker;

pub use error::{ConfigError, ScoringError};
pub use integration::{
    DetectionBuilder, DetectionSource, FrameReport, IntoDetections, ScoringPipeline,
};
pub use scoring::{EnhancedTarget, ErrorCalculator, GridCell, ScoringConfig, ShotResult};
pub use tracker::{
    Detection, ObjectKey, ObjectTracker, Rect, SharedTracker, TargetType, TrackedObject,
    TrackerConfig,
};
