//! Physical targets reconstructed from tracked centers.

use nalgebra::Point2;

use crate::error::ScoringError;
use crate::scoring::clock::ClockLine;
use crate::scoring::grid::{GridCell, GridLayout};
use crate::tracker::{Rect, TrackedObject};

/// A target reconstructed around one center detection.
#[derive(Debug, Clone)]
pub struct EnhancedTarget {
    pub original_center: TrackedObject,
    pub physical_bounding_box: Rect,
    pub center_point: Point2<f64>,
    pub clock_lines: Vec<ClockLine>,
    pub radius: f64,
    pub grid_rows: usize,
    pub grid_columns: usize,
    pub cell_width: f64,
    pub cell_height: f64,
}

impl EnhancedTarget {
    pub fn id(&self) -> u64 {
        self.original_center.id
    }

    pub fn confidence(&self) -> f32 {
        self.original_center.confidence
    }

    pub fn class_name(&self) -> &str {
        &self.original_center.class_name
    }

    pub fn grid_layout(&self) -> GridLayout {
        GridLayout::new(self.grid_rows, self.grid_columns)
    }

    /// Unclamped (row, column) of the cell under `hit`, or `None` outside the box.
    pub(crate) fn cell_coordinates(&self, hit: &Point2<f64>) -> Option<(usize, usize)> {
        let bounds = &self.physical_bounding_box;
        if !bounds.contains(hit) {
            return None;
        }
        let column = ((hit.x - bounds.x) / self.cell_width) as usize;
        let row = ((hit.y - bounds.y) / self.cell_height) as usize;
        Some((row, column))
    }

    pub(crate) fn cell(&self, row: usize, column: usize) -> GridCell {
        let bounds = &self.physical_bounding_box;
        GridCell {
            row,
            column,
            bounds: Rect::new(
                bounds.x + column as f64 * self.cell_width,
                bounds.y + row as f64 * self.cell_height,
                self.cell_width,
                self.cell_height,
            ),
        }
    }
}

/// Shared target width and height inferred from center spacing.
///
/// `centers` must be in reading order and are assumed to form up to three
/// rows of two. Width averages the horizontal gaps of pairs (0,1), (2,3),
/// (4,5); height averages the vertical gaps (0,2), (2,4), (1,3), (3,5).
/// Pairs beyond the slice are skipped.
pub fn target_dimensions(centers: &[Point2<f64>]) -> Result<(f64, f64), ScoringError> {
    let n = centers.len();
    if n == 0 {
        return Err(ScoringError::NoTargets);
    }

    let horizontal: Vec<f64> = (0..6)
        .step_by(2)
        .filter(|&i| i + 1 < n)
        .map(|i| (centers[i].x - centers[i + 1].x).abs())
        .collect();

    let mut vertical = Vec::new();
    for i in 0..2 {
        if i + 2 < n {
            vertical.push((centers[i].y - centers[i + 2].y).abs());
        }
        if i + 4 < n {
            vertical.push((centers[i + 2].y - centers[i + 4].y).abs());
        }
    }

    if horizontal.is_empty() || vertical.is_empty() {
        return Err(ScoringError::InsufficientCenters { found: n });
    }

    let width = horizontal.iter().sum::<f64>() / horizontal.len() as f64;
    let height = vertical.iter().sum::<f64>() / vertical.len() as f64;
    Ok((width, height))
}
