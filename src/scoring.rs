//! Geometric scoring of bullet holes against reconstructed targets.

mod calculator;
mod clock;
mod grid;
mod target;

pub use calculator::{ErrorCalculator, GridCellError, ScoringConfig, ShotResult};
pub use clock::{ClockLine, clock_lines, clock_region};
pub use grid::{GridCell, GridLayout};
pub use target::{EnhancedTarget, target_dimensions};
