//! Thread-safe handle to a single tracker.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::tracker::matching::Detection;
use crate::tracker::object_tracker::{ObjectTracker, TrackerConfig};
use crate::tracker::tracked_object::{ObjectKey, TrackedObject};

/// Cloneable handle serializing all access to one [`ObjectTracker`].
///
/// Every call holds the lock for its whole duration, so reads never observe
/// a half-applied update. Results are owned snapshots.
#[derive(Debug, Clone, Default)]
pub struct SharedTracker {
    inner: Arc<Mutex<ObjectTracker>>,
}

impl SharedTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self::from_tracker(ObjectTracker::new(config))
    }

    pub fn from_tracker(tracker: ObjectTracker) -> Self {
        Self {
            inner: Arc::new(Mutex::new(tracker)),
        }
    }

    pub fn update(&self, detections: Vec<Detection>) -> Vec<TrackedObject> {
        self.inner.lock().update(detections)
    }

    pub fn get_active_objects(&self) -> Vec<TrackedObject> {
        self.inner.lock().get_active_objects()
    }

    pub fn get_object_by_id(&self, key: ObjectKey) -> Option<TrackedObject> {
        self.inner.lock().get_object_by_id(key)
    }

    pub fn get_centers(&self) -> Vec<TrackedObject> {
        self.inner.lock().get_centers()
    }

    pub fn get_latest_bullet_hole(&self) -> Option<TrackedObject> {
        self.inner.lock().get_latest_bullet_hole()
    }

    pub fn get_and_consume_new_bullet_hole(&self) -> Option<TrackedObject> {
        self.inner.lock().get_and_consume_new_bullet_hole()
    }

    pub fn reset_bullet_holes(&self) {
        self.inner.lock().reset_bullet_holes();
    }

    pub fn reset(&self) {
        self.inner.lock().reset();
    }

    /// Run several operations under one lock acquisition.
    pub fn with_tracker<R>(&self, f: impl FnOnce(&mut ObjectTracker) -> R) -> R {
        f(&mut self.inner.lock())
    }
}
