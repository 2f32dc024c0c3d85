use serde::{Deserialize, Serialize};

use crate::tracker::Rect;

/// Scoring grid printed on a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridLayout {
    pub rows: usize,
    pub columns: usize,
}

impl GridLayout {
    pub const fn new(rows: usize, columns: usize) -> Self {
        Self { rows, columns }
    }

    /// Row and column of the cell holding the grid's center.
    pub fn center_cell(&self) -> (usize, usize) {
        (self.rows / 2, self.columns / 2)
    }
}

/// One cell of a target grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCell {
    pub row: usize,
    pub column: usize,
    pub bounds: Rect,
}

impl GridCell {
    /// Spreadsheet-style label: column letters then 1-based row, e.g. "A1", "AB12".
    pub fn identifier(&self) -> String {
        let mut letters = Vec::new();
        let mut column = self.column + 1;
        while column > 0 {
            column -= 1;
            letters.push(char::from(b'A' + (column % 26) as u8));
            column /= 26;
        }
        letters.iter().rev().collect::<String>() + &(self.row + 1).to_string()
    }
}
