//! Clock-face geometry around a target center.
//!
//! Image coordinates have y pointing down, so a positive angle turns
//! clockwise on screen and 12 o'clock lies at -90°.

use std::f64::consts::TAU;

use nalgebra::Point2;

const CLOCK_POSITIONS: u8 = 12;
const SECTOR_DEGREES: f64 = 30.0;
// Absorbs rounding in atan2 so a hit exactly on a half-sector boundary rounds up.
const BOUNDARY_TOLERANCE_DEGREES: f64 = 1e-9;

/// Segment from a target center toward one clock position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockLine {
    pub start_point: Point2<f64>,
    pub end_point: Point2<f64>,
    pub clock_position: u8,
    /// Radians, measured from the +x axis
    pub angle: f64,
}

/// The twelve clock lines for a target, positions 1 through 12.
pub fn clock_lines(center: Point2<f64>, radius: f64) -> Vec<ClockLine> {
    (1..=CLOCK_POSITIONS)
        .map(|clock_position| {
            let degrees =
                (f64::from(clock_position) - 3.0) * SECTOR_DEGREES + SECTOR_DEGREES / 2.0;
            let angle = degrees.to_radians();
            ClockLine {
                start_point: center,
                end_point: Point2::new(
                    center.x + radius * angle.cos(),
                    center.y + radius * angle.sin(),
                ),
                clock_position,
                angle,
            }
        })
        .collect()
}

/// Clock position (1..=12) of `hit` as seen from `center`.
///
/// The circle is cut into twelve 30° sectors starting at 12 o'clock. Sector
/// `s` maps to position `s + 1`; hits in the second half of a sector round
/// up to the next position clockwise.
pub fn clock_region(center: &Point2<f64>, hit: &Point2<f64>) -> u8 {
    let offset = *hit - *center;
    let mut angle = offset.y.atan2(offset.x);
    if angle < 0.0 {
        angle += TAU;
    }

    let mut degrees = angle.to_degrees() + 90.0;
    if degrees >= 360.0 {
        degrees -= 360.0;
    }

    let sector = (degrees / SECTOR_DEGREES) as u8;
    let position = sector % CLOCK_POSITIONS + 1;

    let local = degrees % SECTOR_DEGREES;
    if local >= SECTOR_DEGREES / 2.0 - BOUNDARY_TOLERANCE_DEGREES {
        position % CLOCK_POSITIONS + 1
    } else {
        position
    }
}
