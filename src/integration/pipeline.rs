//! ScoringPipeline for combining detection, tracking and scoring.

use crate::error::{ConfigError, ScoringError};
use crate::scoring::{ErrorCalculator, ShotResult};
use crate::tracker::{SharedTracker, TargetType, TrackedObject};

use super::{DetectionSource, IntoDetections};

/// Everything produced for one frame, for overlays and announcements.
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    /// All active objects after the update
    pub objects: Vec<TrackedObject>,
    pub centers: Vec<TrackedObject>,
    pub targets: Vec<TrackedObject>,
    pub bullet_holes: Vec<TrackedObject>,
    /// Highest-ID active bullet hole
    pub latest_bullet_hole: Option<TrackedObject>,
    /// Bullet hole seen for the first time by this pipeline; each hole is
    /// reported here at most once
    pub new_bullet_hole: Option<TrackedObject>,
    /// Score of `latest_bullet_hole`, present when a hole and centers exist
    pub shot: Option<Result<ShotResult, ScoringError>>,
}

impl FrameReport {
    /// The score, if it belongs to a hole not reported before.
    pub fn new_shot(&self) -> Option<&ShotResult> {
        let new_hole = self.new_bullet_hole.as_ref()?;
        match &self.shot {
            Some(Ok(shot)) if shot.bullet_hole.key() == new_hole.key() => Some(shot),
            _ => None,
        }
    }
}

/// Runs detector, tracker and calculator for each frame.
///
/// Frames are processed one at a time: `process_frame` takes `&mut self`
/// and the tracker update completes before scoring starts.
pub struct ScoringPipeline<D: DetectionSource> {
    detector: D,
    tracker: SharedTracker,
    calculator: ErrorCalculator,
}

impl<D: DetectionSource> ScoringPipeline<D> {
    /// Create a new pipeline from its parts.
    ///
    /// The tracker labels centers and the calculator pairs them up, so both
    /// must group rows with the same tolerance.
    pub fn new(
        detector: D,
        tracker: SharedTracker,
        calculator: ErrorCalculator,
    ) -> Result<Self, ConfigError> {
        let tracker_tolerance = tracker.with_tracker(|t| t.config().row_tolerance);
        let scoring_tolerance = calculator.config().row_tolerance;
        if tracker_tolerance != scoring_tolerance {
            return Err(ConfigError::RowToleranceMismatch {
                tracker: tracker_tolerance,
                scoring: scoring_tolerance,
            });
        }

        Ok(Self {
            detector,
            tracker,
            calculator,
        })
    }

    /// Create a new pipeline with default tracker and scoring configuration.
    pub fn with_default_config(detector: D) -> Self {
        Self {
            detector,
            tracker: SharedTracker::default(),
            calculator: ErrorCalculator::default(),
        }
    }

    /// Detect, track and score a single frame.
    ///
    /// # Arguments
    /// * `input` - Raw image bytes
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    pub fn process_frame(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
    ) -> Result<FrameReport, D::Error> {
        let detections = self.detector.detect(input, width, height)?;
        Ok(self.process_detections(detections))
    }

    /// Track and score detections produced elsewhere.
    pub fn process_detections(&mut self, detections: impl IntoDetections) -> FrameReport {
        let detections = detections.into_detections();
        let (objects, latest_bullet_hole, new_bullet_hole) = self.tracker.with_tracker(|tracker| {
            let objects = tracker.update(detections);
            (
                objects,
                tracker.get_latest_bullet_hole(),
                tracker.get_and_consume_new_bullet_hole(),
            )
        });

        let of_type = |target_type: TargetType| -> Vec<TrackedObject> {
            objects
                .iter()
                .filter(|obj| obj.target_type == target_type)
                .cloned()
                .collect()
        };
        let centers = of_type(TargetType::Center);
        let targets = of_type(TargetType::Target);
        let bullet_holes = of_type(TargetType::BulletHole);

        let shot = match &latest_bullet_hole {
            Some(hole) if !centers.is_empty() => {
                Some(self.calculator.calculate_shot_result(&centers, hole))
            }
            _ => None,
        };

        FrameReport {
            objects,
            centers,
            targets,
            bullet_holes,
            latest_bullet_hole,
            new_bullet_hole,
            shot,
        }
    }

    /// Get a reference to the underlying detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Get a mutable reference to the underlying detector.
    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    /// Get a handle to the underlying tracker.
    pub fn tracker(&self) -> &SharedTracker {
        &self.tracker
    }

    /// Get a reference to the scoring engine.
    pub fn calculator(&self) -> &ErrorCalculator {
        &self.calculator
    }
}
