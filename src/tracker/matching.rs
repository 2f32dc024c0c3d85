//! Matching utilities for multi-class object tracking.

use ndarray::Array2;

use crate::tracker::rect::Rect;
use crate::tracker::target_type::TargetType;
use crate::tracker::tracked_object::{CENTER_LABEL_PREFIX, TrackedObject};

/// Detection input for the tracker.
#[derive(Debug, Clone)]
pub struct Detection {
    /// Bounding box in image pixels
    pub bbox: Rect,
    /// Detection confidence score
    pub confidence: f32,
    /// Raw detector label
    pub class_name: String,
}

impl Detection {
    pub fn new(
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        confidence: f32,
        class_name: impl Into<String>,
    ) -> Self {
        Self {
            bbox: Rect::from_tlbr(x1, y1, x2, y2),
            confidence,
            class_name: class_name.into(),
        }
    }

    pub fn from_rect(bbox: Rect, confidence: f32, class_name: impl Into<String>) -> Self {
        Self {
            bbox,
            confidence,
            class_name: class_name.into(),
        }
    }

    pub fn target_type(&self) -> TargetType {
        TargetType::from_class_name(&self.class_name)
    }
}

/// Whether a detection label may be matched against a tracked object.
///
/// Labels must be equal, except that any label containing "center" matches
/// objects already relabelled `center_<i>`.
pub fn class_names_match(detection_class: &str, tracked_class: &str) -> bool {
    if detection_class.contains("center") && tracked_class.contains(CENTER_LABEL_PREFIX) {
        return true;
    }
    detection_class == tracked_class
}

/// IoU used for matching. Bullet-hole boxes are small and jittery, so both
/// boxes are upscaled around their own centers first.
pub fn match_iou(a: &Rect, b: &Rect, target_type: TargetType, upscale_factor: f64) -> f64 {
    if target_type == TargetType::BulletHole {
        a.upscaled(upscale_factor).iou(&b.upscaled(upscale_factor))
    } else {
        a.iou(b)
    }
}

/// Affinity matrix of shape (detections, candidates).
///
/// Class-incompatible pairs are `NEG_INFINITY` so no threshold accepts them.
pub fn affinity_matrix(
    detections: &[Detection],
    candidates: &[&TrackedObject],
    upscale_factor: f64,
) -> Array2<f64> {
    let mut affinity = Array2::from_elem((detections.len(), candidates.len()), f64::NEG_INFINITY);
    for (i, det) in detections.iter().enumerate() {
        let det_type = det.target_type();
        for (j, obj) in candidates.iter().enumerate() {
            if class_names_match(&det.class_name, &obj.class_name) {
                affinity[[i, j]] =
                    match_iou(&det.bbox, &obj.bounding_box, det_type, upscale_factor);
            }
        }
    }
    affinity
}

/// Greedy first-come assignment.
///
/// Rows are visited in order; each takes its highest-affinity unused column
/// with affinity >= that row's threshold. Ties keep the first column seen.
/// Returns the assigned column per row.
pub fn greedy_assignment(affinity: &Array2<f64>, thresholds: &[f64]) -> Vec<Option<usize>> {
    let (rows, cols) = affinity.dim();
    let mut used = vec![false; cols];
    let mut assignment = Vec::with_capacity(rows);

    for (i, row) in affinity.outer_iter().enumerate() {
        let mut best: Option<(usize, f64)> = None;
        for (j, &score) in row.iter().enumerate() {
            if used[j] || score < thresholds[i] {
                continue;
            }
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((j, score));
            }
        }
        if let Some((j, _)) = best {
            used[j] = true;
        }
        assignment.push(best.map(|(j, _)| j));
    }

    assignment
}
