use rangetrack_rs::tracker::IdSpace;
use rangetrack_rs::{Detection, ObjectTracker, TargetType, TrackerConfig};

fn square(cx: f64, cy: f64, size: f64, class_name: &str) -> Detection {
    let half = size / 2.0;
    Detection::new(cx - half, cy - half, cx + half, cy + half, 0.9, class_name)
}

fn label_of(objects: &[rangetrack_rs::TrackedObject], id: u64) -> String {
    objects
        .iter()
        .find(|obj| obj.key().space == IdSpace::General && obj.id == id)
        .map(|obj| obj.class_name.clone())
        .unwrap()
}

#[test]
fn test_id_stability_under_jitter() {
    let mut tracker = ObjectTracker::default();

    let mut ids = Vec::new();
    for frame in 0..20 {
        let jitter = if frame % 2 == 0 { 3.0 } else { -3.0 };
        let objects = tracker.update(vec![
            square(300.0 + jitter, 300.0, 200.0, "target"),
            square(300.0, 300.0 + jitter, 20.0, "center"),
            square(320.0 + jitter / 3.0, 280.0, 8.0, "bullet"),
        ]);
        assert_eq!(objects.len(), 3);
        ids.push(objects.iter().map(|obj| obj.key()).collect::<Vec<_>>());
    }
    assert!(ids.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_stale_objects_are_dropped() {
    let mut tracker = ObjectTracker::default();
    tracker.update(vec![square(300.0, 300.0, 200.0, "target")]);

    // The detection frame counts as one; nine empty frames reach the limit of ten.
    for _ in 0..8 {
        assert_eq!(tracker.update(vec![]).len(), 1);
    }
    assert!(tracker.update(vec![]).is_empty());
    assert!(tracker.get_active_objects().is_empty());
}

#[test]
fn test_redetection_resets_staleness() {
    let mut tracker = ObjectTracker::default();
    for _ in 0..5 {
        tracker.update(vec![square(300.0, 300.0, 200.0, "target")]);
        for _ in 0..8 {
            tracker.update(vec![]);
        }
    }
    let objects = tracker.get_active_objects();
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].id, 1);
    assert_eq!(objects[0].tracking_history.len(), 5);
}

#[test]
fn test_new_bullet_hole_delivered_once() {
    let mut tracker = ObjectTracker::default();
    tracker.update(vec![square(100.0, 100.0, 8.0, "bullet")]);

    let first = tracker.get_and_consume_new_bullet_hole().unwrap();
    assert_eq!(first.id, 1);
    assert!(tracker.get_and_consume_new_bullet_hole().is_none());

    // Still tracked and still the latest hole, just not new.
    tracker.update(vec![square(100.0, 100.0, 8.0, "bullet")]);
    assert!(tracker.get_and_consume_new_bullet_hole().is_none());
    assert_eq!(tracker.get_latest_bullet_hole().unwrap().id, 1);

    // A second hole elsewhere is delivered next.
    tracker.update(vec![
        square(100.0, 100.0, 8.0, "bullet"),
        square(400.0, 100.0, 8.0, "bullet"),
    ]);
    assert_eq!(tracker.get_and_consume_new_bullet_hole().unwrap().id, 2);
    assert!(tracker.get_and_consume_new_bullet_hole().is_none());
}

#[test]
fn test_oldest_undelivered_hole_follows_newest() {
    let mut tracker = ObjectTracker::default();
    tracker.update(vec![
        square(100.0, 100.0, 8.0, "bullet"),
        square(400.0, 100.0, 8.0, "bullet"),
    ]);
    assert_eq!(tracker.get_and_consume_new_bullet_hole().unwrap().id, 2);
    assert_eq!(tracker.get_and_consume_new_bullet_hole().unwrap().id, 1);
    assert!(tracker.get_and_consume_new_bullet_hole().is_none());
}

#[test]
fn test_archived_hole_is_not_new_again() {
    let mut tracker = ObjectTracker::default();
    tracker.update(vec![square(100.0, 100.0, 8.0, "bullet")]);
    tracker.reset_bullet_holes();

    for _ in 0..3 {
        let objects = tracker.update(vec![square(101.0, 100.0, 8.0, "bullet")]);
        assert!(objects.is_empty());
    }
    assert!(tracker.get_latest_bullet_hole().is_none());
    assert!(tracker.get_and_consume_new_bullet_hole().is_none());
}

#[test]
fn test_historical_suppression_boundary() {
    // 7x7 holes upscaled to 21x21. A 9px shift leaves a 12x21 overlap:
    // IoU = 252 / 630 = 0.4 exactly, which is suppressed.
    let archived = Detection::new(100.0, 100.0, 107.0, 107.0, 0.9, "bullet");
    let mut tracker = ObjectTracker::default();
    tracker.update(vec![archived.clone()]);
    tracker.reset_bullet_holes();
    let shifted = Detection::new(109.0, 100.0, 116.0, 107.0, 0.9, "bullet");
    let objects = tracker.update(vec![shifted]);
    assert!(objects.is_empty());

    // One pixel further: IoU = 231 / 651 < 0.4, a genuinely new hole.
    let mut tracker = ObjectTracker::default();
    tracker.update(vec![archived]);
    tracker.reset_bullet_holes();
    let shifted = Detection::new(110.0, 100.0, 117.0, 107.0, 0.9, "bullet");
    let objects = tracker.update(vec![shifted]);
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].id, 1);
}

#[test]
fn test_suppression_only_applies_to_bullet_holes() {
    let mut tracker = ObjectTracker::default();
    tracker.update(vec![square(100.0, 100.0, 8.0, "bullet")]);
    tracker.reset_bullet_holes();

    let objects = tracker.update(vec![square(100.0, 100.0, 8.0, "center")]);
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].target_type, TargetType::Center);
}

#[test]
fn test_center_renaming_is_deterministic() {
    let mut tracker = ObjectTracker::default();
    // Detector order is scrambled; the right column sits 15px higher.
    let frame = vec![
        square(480.0, 485.0, 20.0, "center"),
        square(200.0, 800.0, 20.0, "center"),
        square(200.0, 200.0, 20.0, "center"),
        square(480.0, 785.0, 20.0, "center"),
        square(480.0, 185.0, 20.0, "center"),
        square(200.0, 500.0, 20.0, "center"),
    ];

    let first = tracker.update(frame.clone());
    let expected = [
        (1, "center_3"),
        (2, "center_4"),
        (3, "center_0"),
        (4, "center_5"),
        (5, "center_1"),
        (6, "center_2"),
    ];
    for (id, label) in expected {
        assert_eq!(label_of(&first, id), label);
    }

    for _ in 0..5 {
        let objects = tracker.update(frame.clone());
        assert_eq!(objects.len(), 6);
        for (id, label) in expected {
            assert_eq!(label_of(&objects, id), label);
        }
    }
    assert_eq!(tracker.get_centers().len(), 6);
}

#[test]
fn test_center_indices_shift_when_a_center_disappears() {
    let mut tracker = ObjectTracker::default();
    let left = square(200.0, 200.0, 20.0, "center");
    let right = square(480.0, 200.0, 20.0, "center");
    tracker.update(vec![left.clone(), right.clone()]);

    // Left center ages out; the right one is renumbered to index 0.
    for _ in 0..10 {
        tracker.update(vec![right.clone()]);
    }
    let centers = tracker.get_centers();
    assert_eq!(centers.len(), 1);
    assert_eq!(centers[0].id, 2);
    assert_eq!(centers[0].class_name, "center_0");
}

#[test]
fn test_config_from_json() {
    let config: TrackerConfig = serde_json::from_str(
        r#"{ "iou_threshold": 0.5, "max_frames_without_detection": 3 }"#,
    )
    .unwrap();
    assert_eq!(config.iou_threshold, 0.5);
    assert_eq!(config.max_frames_without_detection, 3);
    assert_eq!(config.center_iou_threshold, 0.2);

    let mut tracker = ObjectTracker::try_new(config).unwrap();
    tracker.update(vec![square(300.0, 300.0, 200.0, "target")]);
    tracker.update(vec![]);
    assert!(tracker.update(vec![]).is_empty());
}
