//! Trait for object detection inference backends.

use crate::tracker::Detection;

/// Trait for object detection inference backends.
///
/// Implement this trait to feed any detection model into the scoring pipeline.
/// The model must label targets, target centers and bullet holes with class
/// names containing "target", "center" and "bullet" respectively.
///
/// # Example
///
/// ```ignore
/// use rangetrack_rs::{DetectionSource, Detection};
///
/// struct MyDetector {
///     // Your model here
/// }
///
/// impl DetectionSource for MyDetector {
///     type Error = std::io::Error;
///
///     fn detect(&mut self, input: &[u8], width: u32, height: u32) -> Result<Vec<Detection>, Self::Error> {
///         // Run inference and return detections
///         Ok(vec![])
///     }
/// }
/// ```
pub trait DetectionSource {
    /// Error type for detection failures.
    type Error;

    /// Run inference on raw image data and return detections.
    ///
    /// # Arguments
    /// * `input` - Raw image bytes (format depends on implementation)
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    fn detect(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Vec<Detection>, Self::Error>;
}

/// Helper trait for converting model-specific outputs to `Detection`.
pub trait IntoDetections {
    /// Convert the output into a vector of detections.
    fn into_detections(self) -> Vec<Detection>;
}

impl IntoDetections for Vec<Detection> {
    fn into_detections(self) -> Vec<Detection> {
        self
    }
}

/// Class-indexed model output: `(class_id, [x1, y1, x2, y2], confidence)` rows
/// paired with the model's label table. Rows with unknown class ids are dropped.
impl<'a> IntoDetections for (&'a [&'a str], Vec<(usize, [f64; 4], f32)>) {
    fn into_detections(self) -> Vec<Detection> {
        let (labels, rows) = self;
        rows.into_iter()
            .filter_map(|(class_id, [x1, y1, x2, y2], confidence)| {
                labels
                    .get(class_id)
                    .map(|label| Detection::new(x1, y1, x2, y2, confidence, *label))
            })
            .collect()
    }
}
