//! Row-major ordering of target centers.

use nalgebra::Point2;

/// Sort items into reading order: top-to-bottom rows, left-to-right within a row.
///
/// Items are banded into rows: a row starts at its top-most item and takes
/// every following item whose center lies less than `row_tolerance` pixels
/// below it.
pub fn sort_reading_order<T, F>(items: &mut [T], row_tolerance: f64, center_of: F)
where
    F: Fn(&T) -> Point2<f64>,
{
    items.sort_by(|a, b| {
        let (pa, pb) = (center_of(a), center_of(b));
        pa.y.total_cmp(&pb.y).then(pa.x.total_cmp(&pb.x))
    });

    let mut start = 0;
    while start < items.len() {
        let top = center_of(&items[start]).y;
        let mut end = start + 1;
        while end < items.len() && center_of(&items[end]).y - top < row_tolerance {
            end += 1;
        }
        items[start..end].sort_by(|a, b| center_of(a).x.total_cmp(&center_of(b).x));
        start = end;
    }
}
