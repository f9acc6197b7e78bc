//! Helpers shared by the unit tests.

use crate::board::Board;
use crate::types::Cell;

/// Parses eight rows of `.`, `B`, `W`.
pub fn board_from_rows(rows: [&str; 8]) -> Board {
    let mut grid = [[Cell::Empty; 8]; 8];
    for (r, line) in rows.iter().enumerate() {
        for (c, ch) in line.chars().enumerate() {
            grid[r][c] = match ch {
                'B' => Cell::Dark,
                'W' => Cell::Light,
                _ => Cell::Empty,
            };
        }
    }
    Board::from_cells(grid)
}
