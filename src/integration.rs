//! Integration module for connecting object detection backends with the
//! tracker and scoring engine.
//!
//! The detector itself is out of scope; anything implementing
//! [`DetectionSource`] can drive a [`ScoringPipeline`].

mod builder;
mod detector;
mod pipeline;

pub use builder::DetectionBuilder;
pub use detector::{DetectionSource, IntoDetections};
pub use pipeline::{FrameReport, ScoringPipeline};
