//! Shot scoring: closest target, pixel and grid error, clock region.

use std::collections::BTreeMap;
use std::fmt;

use log::{debug, warn};
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ScoringError};
use crate::scoring::clock::{clock_lines, clock_region};
use crate::scoring::grid::{GridCell, GridLayout};
use crate::scoring::target::{EnhancedTarget, target_dimensions};
use crate::tracker::{Rect, TargetType, TrackedObject, sort_reading_order};

/// Configuration for the ErrorCalculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Vertical distance under which centers share a row
    pub row_tolerance: f64,
    /// Grid per center index (the `i` of `center_<i>`)
    pub grid_layouts: BTreeMap<usize, GridLayout>,
    /// Grid for centers without an entry
    pub default_grid: GridLayout,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            row_tolerance: 50.0,
            grid_layouts: BTreeMap::from([
                (2, GridLayout::new(9, 9)),
                (3, GridLayout::new(9, 9)),
            ]),
            default_grid: GridLayout::new(7, 9),
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.row_tolerance >= 0.0) {
            return Err(ConfigError::NegativeRowTolerance(self.row_tolerance));
        }
        if self.default_grid.rows == 0 || self.default_grid.columns == 0 {
            return Err(ConfigError::EmptyGridLayout("default grid".to_string()));
        }
        for (index, layout) in &self.grid_layouts {
            if layout.rows == 0 || layout.columns == 0 {
                return Err(ConfigError::EmptyGridLayout(format!("center {index}")));
            }
        }
        Ok(())
    }

    pub fn layout_for(&self, center: &TrackedObject) -> GridLayout {
        center
            .center_index()
            .and_then(|index| self.grid_layouts.get(&index))
            .copied()
            .unwrap_or(self.default_grid)
    }
}

/// Signed whole-cell offset of a hit from the target's center cell.
/// Positive means the hit is left of / above the center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCellError {
    pub horizontal_cells: f64,
    pub vertical_cells: f64,
}

/// Score for one bullet hole.
#[derive(Debug, Clone)]
pub struct ShotResult {
    pub bullet_hole: TrackedObject,
    pub closest_target: EnhancedTarget,
    /// Pixel distance between hole and target centers
    pub distance: f64,
    pub center_type: TargetType,
    /// Hole center minus target center
    pub pixel_error: Vector2<f64>,
    pub grid_cell_error: GridCellError,
    pub hit_grid_cell: Option<GridCell>,
    /// 1..=12
    pub clock_region: u8,
}

impl fmt::Display for ShotResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} o'clock on {}, {:.1}px off, grid {:.1}h {:.1}v",
            self.clock_region,
            self.closest_target.class_name(),
            self.distance,
            self.grid_cell_error.horizontal_cells,
            self.grid_cell_error.vertical_cells,
        )?;
        if let Some(cell) = &self.hit_grid_cell {
            write!(f, ", cell {}", cell.identifier())?;
        }
        Ok(())
    }
}

/// Stateless scoring engine; safe to share between threads.
#[derive(Debug, Clone, Default)]
pub struct ErrorCalculator {
    config: ScoringConfig,
}

impl ErrorCalculator {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Like [`ErrorCalculator::new`], rejecting invalid configurations.
    pub fn try_new(config: ScoringConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score `bullet_hole` against the targets implied by `centers`.
    ///
    /// All-or-nothing: a hit outside the closest target's box is an error even
    /// though distance and clock region could be computed.
    pub fn calculate_shot_result(
        &self,
        centers: &[TrackedObject],
        bullet_hole: &TrackedObject,
    ) -> Result<ShotResult, ScoringError> {
        self.score(centers, bullet_hole)
            .inspect(|result| debug!("scored {}: {result}", bullet_hole.key()))
            .inspect_err(|err| warn!("could not score {}: {err}", bullet_hole.key()))
    }

    fn score(
        &self,
        centers: &[TrackedObject],
        bullet_hole: &TrackedObject,
    ) -> Result<ShotResult, ScoringError> {
        if bullet_hole.target_type != TargetType::BulletHole {
            return Err(ScoringError::NotABulletHole);
        }

        let targets = self.calculate_physical_target_boxes(centers)?;
        let hit = bullet_hole.bounding_box.center();

        let mut closest: Option<(usize, f64)> = None;
        for (i, target) in targets.iter().enumerate() {
            let distance = nalgebra::distance(&hit, &target.center_point);
            if closest.is_none_or(|(_, min)| distance < min) {
                closest = Some((i, distance));
            }
        }
        let (index, distance) = closest.ok_or(ScoringError::NoTargets)?;
        let Some(target) = targets.into_iter().nth(index) else {
            return Err(ScoringError::NoTargets);
        };

        let grid_cell_error = self.calculate_grid_cell_error(&target, &hit)?;
        let hit_grid_cell = self.get_grid_cell(&target, &hit);
        let clock_region = self.calculate_clock_region(&target, &hit);

        Ok(ShotResult {
            bullet_hole: bullet_hole.clone(),
            distance,
            center_type: target.original_center.target_type,
            pixel_error: hit - target.center_point,
            grid_cell_error,
            hit_grid_cell,
            clock_region,
            closest_target: target,
        })
    }

    /// Reconstruct one physical target per center, in reading order.
    ///
    /// Needs at least three centers (one horizontal and one vertical spacing).
    pub fn calculate_physical_target_boxes(
        &self,
        centers: &[TrackedObject],
    ) -> Result<Vec<EnhancedTarget>, ScoringError> {
        let mut sorted = centers.to_vec();
        sort_reading_order(&mut sorted, self.config.row_tolerance, |c| {
            c.bounding_box.center()
        });

        let points: Vec<Point2<f64>> = sorted.iter().map(|c| c.bounding_box.center()).collect();
        let (width, height) = target_dimensions(&points)?;

        Ok(sorted
            .into_iter()
            .zip(points)
            .map(|(center, center_point)| {
                let layout = self.config.layout_for(&center);
                let radius = width.min(height) / 2.0;
                EnhancedTarget {
                    physical_bounding_box: Rect::from_center(center_point, width, height),
                    center_point,
                    clock_lines: clock_lines(center_point, radius),
                    radius,
                    grid_rows: layout.rows,
                    grid_columns: layout.columns,
                    cell_width: width / layout.columns as f64,
                    cell_height: height / layout.rows as f64,
                    original_center: center,
                }
            })
            .collect())
    }

    pub fn calculate_grid_cell_error(
        &self,
        target: &EnhancedTarget,
        hit: &Point2<f64>,
    ) -> Result<GridCellError, ScoringError> {
        let (row, column) = target
            .cell_coordinates(hit)
            .ok_or(ScoringError::HitOutsideTarget)?;
        let (center_row, center_column) = target.grid_layout().center_cell();

        Ok(GridCellError {
            horizontal_cells: center_column as f64 - column as f64,
            vertical_cells: center_row as f64 - row as f64,
        })
    }

    pub fn get_grid_cell(&self, target: &EnhancedTarget, hit: &Point2<f64>) -> Option<GridCell> {
        let (row, column) = target.cell_coordinates(hit)?;
        if row >= target.grid_rows || column >= target.grid_columns {
            return None;
        }
        Some(target.cell(row, column))
    }

    pub fn calculate_clock_region(&self, target: &EnhancedTarget, hit: &Point2<f64>) -> u8 {
        clock_region(&target.center_point, hit)
    }
}
