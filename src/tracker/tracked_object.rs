//! Single tracked detection carried across frames.

use std::fmt;
use std::time::Instant;

use crate::tracker::rect::Rect;
use crate::tracker::target_type::TargetType;

/// Prefix given to centers once the tracker has indexed them.
pub const CENTER_LABEL_PREFIX: &str = "center_";

/// Which ID counter an object draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IdSpace {
    General,
    BulletHole,
}

impl IdSpace {
    pub fn for_type(target_type: TargetType) -> Self {
        match target_type {
            TargetType::BulletHole => IdSpace::BulletHole,
            _ => IdSpace::General,
        }
    }
}

/// Unique key of a tracked object: bullet holes and everything else are
/// numbered by independent counters, so the ID alone is ambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectKey {
    pub space: IdSpace,
    pub id: u64,
}

impl ObjectKey {
    pub fn general(id: u64) -> Self {
        Self {
            space: IdSpace::General,
            id,
        }
    }

    pub fn bullet_hole(id: u64) -> Self {
        Self {
            space: IdSpace::BulletHole,
            id,
        }
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.space {
            IdSpace::General => write!(f, "#{}", self.id),
            IdSpace::BulletHole => write!(f, "hole#{}", self.id),
        }
    }
}

/// A detection instance with persistent identity.
#[derive(Debug, Clone)]
pub struct TrackedObject {
    /// Identifier within the object's ID space
    pub id: u64,
    /// Latest bounding box
    pub bounding_box: Rect,
    /// Latest detection confidence
    pub confidence: f32,
    /// Detector label; centers are relabelled `center_<i>` by the tracker
    pub class_name: String,
    /// Fixed at construction from the initial label
    pub target_type: TargetType,
    pub last_seen: Instant,
    pub frames_since_last_seen: u32,
    pub is_active: bool,
    /// Bullet holes only: already handed to a consumer
    pub has_been_delivered: bool,
    /// One box per update, oldest first
    pub tracking_history: Vec<Rect>,
}

impl TrackedObject {
    pub fn new(
        id: u64,
        bounding_box: Rect,
        confidence: f32,
        class_name: impl Into<String>,
    ) -> Self {
        let class_name = class_name.into();
        Self {
            id,
            bounding_box,
            confidence,
            target_type: TargetType::from_class_name(&class_name),
            class_name,
            last_seen: Instant::now(),
            frames_since_last_seen: 0,
            is_active: true,
            has_been_delivered: false,
            tracking_history: vec![bounding_box],
        }
    }

    pub fn key(&self) -> ObjectKey {
        ObjectKey {
            space: IdSpace::for_type(self.target_type),
            id: self.id,
        }
    }

    /// Refresh the object from a matched detection.
    pub fn update(&mut self, bounding_box: Rect, confidence: f32) {
        self.bounding_box = bounding_box;
        self.confidence = confidence;
        self.last_seen = Instant::now();
        self.frames_since_last_seen = 0;
        self.is_active = true;
        self.tracking_history.push(bounding_box);
    }

    /// Index assigned by center re-indexing, parsed from a `center_<i>` label.
    pub fn center_index(&self) -> Option<usize> {
        self.class_name
            .strip_prefix(CENTER_LABEL_PREFIX)
            .and_then(|suffix| suffix.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_object_derives_type_and_history() {
        let rect = Rect::new(1.0, 2.0, 3.0, 4.0);
        let obj = TrackedObject::new(7, rect, 0.8, "bullet");

        assert_eq!(obj.target_type, TargetType::BulletHole);
        assert_eq!(obj.key(), ObjectKey::bullet_hole(7));
        assert!(obj.is_active);
        assert!(!obj.has_been_delivered);
        assert_eq!(obj.tracking_history, vec![rect]);
    }

    #[test]
    fn test_update_resets_staleness_and_appends_history() {
        let mut obj = TrackedObject::new(1, Rect::new(0.0, 0.0, 10.0, 10.0), 0.5, "target");
        obj.frames_since_last_seen = 4;
        obj.is_active = false;

        let moved = Rect::new(2.0, 2.0, 10.0, 10.0);
        obj.update(moved, 0.9);

        assert_eq!(obj.bounding_box, moved);
        assert_eq!(obj.confidence, 0.9);
        assert_eq!(obj.frames_since_last_seen, 0);
        assert!(obj.is_active);
        assert_eq!(obj.tracking_history.len(), 2);
    }

    #[test]
    fn test_target_type_survives_relabel() {
        let mut obj = TrackedObject::new(1, Rect::default(), 1.0, "center");
        obj.class_name = "center_3".to_string();
        assert_eq!(obj.target_type, TargetType::Center);
        assert_eq!(obj.center_index(), Some(3));
    }

    #[test]
    fn test_center_index_requires_prefix() {
        let obj = TrackedObject::new(1, Rect::default(), 1.0, "center");
        assert_eq!(obj.center_index(), None);
    }
}
