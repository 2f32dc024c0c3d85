//! Multi-class object tracker with greedy IoU matching.

use std::collections::BTreeMap;

use log::{debug, info, trace};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::tracker::matching::{self, Detection};
use crate::tracker::reading_order::sort_reading_order;
use crate::tracker::target_type::TargetType;
use crate::tracker::tracked_object::{CENTER_LABEL_PREFIX, IdSpace, ObjectKey, TrackedObject};

/// Configuration for the ObjectTracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Minimum IoU to match non-center objects
    pub iou_threshold: f64,
    /// Minimum IoU to match centers
    pub center_iou_threshold: f64,
    /// Minimum upscaled IoU for a detection to count as an archived hole
    pub historical_match_threshold: f64,
    /// Bullet-hole boxes are scaled by this around their center before IoU
    pub bullet_hole_upscale_factor: f64,
    /// Consecutive frames an object may go unseen before it is dropped
    pub max_frames_without_detection: u32,
    /// Vertical distance under which centers share a row
    pub row_tolerance: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            iou_threshold: 0.4,
            center_iou_threshold: 0.2,
            historical_match_threshold: 0.4,
            bullet_hole_upscale_factor: 3.0,
            max_frames_without_detection: 10,
            row_tolerance: 50.0,
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("iou_threshold", self.iou_threshold),
            ("center_iou_threshold", self.center_iou_threshold),
            ("historical_match_threshold", self.historical_match_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ThresholdOutOfRange { name, value });
            }
        }
        if !(self.bullet_hole_upscale_factor > 0.0) {
            return Err(ConfigError::InvalidUpscaleFactor(
                self.bullet_hole_upscale_factor,
            ));
        }
        if self.max_frames_without_detection == 0 {
            return Err(ConfigError::ZeroFrameBudget);
        }
        if !(self.row_tolerance >= 0.0) {
            return Err(ConfigError::NegativeRowTolerance(self.row_tolerance));
        }
        Ok(())
    }

    fn threshold_for(&self, target_type: TargetType) -> f64 {
        match target_type {
            TargetType::Center => self.center_iou_threshold,
            _ => self.iou_threshold,
        }
    }
}

/// Tracks targets, centers and bullet holes across frames.
///
/// Bullet holes and all other objects draw IDs from separate counters. The
/// bullet-hole counter restarts on [`ObjectTracker::reset_bullet_holes`];
/// the general counter only on [`ObjectTracker::reset`].
#[derive(Debug)]
pub struct ObjectTracker {
    tracked_objects: BTreeMap<ObjectKey, TrackedObject>,
    historical_bullet_holes: Vec<TrackedObject>,
    next_object_id: u64,
    next_bullet_hole_id: u64,
    config: TrackerConfig,
}

impl Default for ObjectTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

impl ObjectTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            tracked_objects: BTreeMap::new(),
            historical_bullet_holes: Vec::new(),
            next_object_id: 1,
            next_bullet_hole_id: 1,
            config,
        }
    }

    /// Like [`ObjectTracker::new`], rejecting invalid configurations.
    pub fn try_new(config: TrackerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Feed one frame of detections and return the active objects.
    pub fn update(&mut self, detections: Vec<Detection>) -> Vec<TrackedObject> {
        // Step 1: Drop re-detections of archived holes
        let detections: Vec<Detection> = detections
            .into_iter()
            .filter(|det| !self.is_historical_bullet_hole(det))
            .collect();

        // Step 2: Greedy matching against active objects
        let assignment = {
            let candidates: Vec<&TrackedObject> = self
                .tracked_objects
                .values()
                .filter(|obj| obj.is_active)
                .collect();
            let affinity = matching::affinity_matrix(
                &detections,
                &candidates,
                self.config.bullet_hole_upscale_factor,
            );
            let thresholds: Vec<f64> = detections
                .iter()
                .map(|det| self.config.threshold_for(det.target_type()))
                .collect();

            matching::greedy_assignment(&affinity, &thresholds)
                .into_iter()
                .map(|col| col.map(|j| candidates[j].key()))
                .collect::<Vec<_>>()
        };

        // Step 3: Update matched objects, create the rest
        for (det, key) in detections.into_iter().zip(assignment) {
            match key.and_then(|key| self.tracked_objects.get_mut(&key)) {
                Some(obj) => {
                    trace!("{} matched {} detection", obj.key(), det.class_name);
                    obj.update(det.bbox, det.confidence);
                }
                None => {
                    let obj = self.create_object(det);
                    debug!("created {} ({})", obj.key(), obj.class_name);
                    self.tracked_objects.insert(obj.key(), obj);
                }
            }
        }

        // Step 4: Re-index centers
        self.assign_center_indices();

        // Step 5: Prune stale objects
        self.prune_stale_objects();

        self.get_active_objects()
    }

    pub fn get_active_objects(&self) -> Vec<TrackedObject> {
        self.tracked_objects
            .values()
            .filter(|obj| obj.is_active)
            .cloned()
            .collect()
    }

    pub fn get_object_by_id(&self, key: ObjectKey) -> Option<TrackedObject> {
        self.tracked_objects.get(&key).cloned()
    }

    pub fn get_centers(&self) -> Vec<TrackedObject> {
        self.active_of_type(TargetType::Center).cloned().collect()
    }

    /// Most recent active bullet hole, i.e. the one with the highest ID.
    pub fn get_latest_bullet_hole(&self) -> Option<TrackedObject> {
        self.active_of_type(TargetType::BulletHole)
            .max_by_key(|obj| obj.id)
            .cloned()
    }

    /// Most recent bullet hole not yet delivered, marking it delivered.
    pub fn get_and_consume_new_bullet_hole(&mut self) -> Option<TrackedObject> {
        let key = self
            .active_of_type(TargetType::BulletHole)
            .filter(|obj| !obj.has_been_delivered)
            .max_by_key(|obj| obj.id)?
            .key();

        let obj = self.tracked_objects.get_mut(&key)?;
        obj.has_been_delivered = true;
        Some(obj.clone())
    }

    pub fn historical_bullet_holes(&self) -> &[TrackedObject] {
        &self.historical_bullet_holes
    }

    /// Archive every bullet hole and restart the bullet-hole counter.
    pub fn reset_bullet_holes(&mut self) {
        let (holes, rest): (BTreeMap<_, _>, BTreeMap<_, _>) =
            std::mem::take(&mut self.tracked_objects)
                .into_iter()
                .partition(|(key, _)| key.space == IdSpace::BulletHole);

        info!("archiving {} bullet holes", holes.len());
        self.historical_bullet_holes.extend(holes.into_values());
        self.tracked_objects = rest;
        self.next_bullet_hole_id = 1;
    }

    /// Forget all objects, history and counters.
    pub fn reset(&mut self) {
        info!("resetting tracker");
        self.tracked_objects.clear();
        self.historical_bullet_holes.clear();
        self.next_object_id = 1;
        self.next_bullet_hole_id = 1;
    }

    fn active_of_type(&self, target_type: TargetType) -> impl Iterator<Item = &TrackedObject> {
        self.tracked_objects
            .values()
            .filter(move |obj| obj.is_active && obj.target_type == target_type)
    }

    fn is_historical_bullet_hole(&self, det: &Detection) -> bool {
        if det.target_type() != TargetType::BulletHole {
            return false;
        }
        let suppressed = self.historical_bullet_holes.iter().any(|hole| {
            matching::match_iou(
                &det.bbox,
                &hole.bounding_box,
                TargetType::BulletHole,
                self.config.bullet_hole_upscale_factor,
            ) >= self.config.historical_match_threshold
        });
        if suppressed {
            debug!("suppressed re-detection of archived hole at {:?}", det.bbox);
        }
        suppressed
    }

    fn create_object(&mut self, det: Detection) -> TrackedObject {
        let counter = match IdSpace::for_type(det.target_type()) {
            IdSpace::BulletHole => &mut self.next_bullet_hole_id,
            IdSpace::General => &mut self.next_object_id,
        };
        let id = *counter;
        *counter += 1;
        TrackedObject::new(id, det.bbox, det.confidence, det.class_name)
    }

    // Labels follow sort position, so a center's index shifts when others
    // appear or disappear.
    fn assign_center_indices(&mut self) {
        let mut centers: Vec<(ObjectKey, Point2<f64>)> = self
            .active_of_type(TargetType::Center)
            .map(|obj| (obj.key(), obj.bounding_box.center()))
            .collect();
        if centers.is_empty() {
            return;
        }

        sort_reading_order(&mut centers, self.config.row_tolerance, |(_, center)| {
            *center
        });

        for (index, (key, _)) in centers.into_iter().enumerate() {
            if let Some(obj) = self.tracked_objects.get_mut(&key) {
                let label = format!("{CENTER_LABEL_PREFIX}{index}");
                if obj.class_name != label {
                    debug!("{} relabelled {} -> {}", key, obj.class_name, label);
                    obj.class_name = label;
                }
            }
        }
    }

    fn prune_stale_objects(&mut self) {
        let max_frames = self.config.max_frames_without_detection;
        for obj in self.tracked_objects.values_mut() {
            if !obj.is_active {
                continue;
            }
            obj.frames_since_last_seen += 1;
            if obj.frames_since_last_seen >= max_frames {
                obj.is_active = false;
            }
        }

        let (stale, live): (BTreeMap<_, _>, BTreeMap<_, _>) =
            std::mem::take(&mut self.tracked_objects)
                .into_iter()
                .partition(|(_, obj)| !obj.is_active);
        self.tracked_objects = live;

        for (key, obj) in stale {
            debug!(
                "{} went stale after {} frames",
                key, obj.frames_since_last_seen
            );
            if key.space == IdSpace::BulletHole {
                self.historical_bullet_holes.push(obj);
            }
        }
    }
}
