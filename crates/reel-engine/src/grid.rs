//! The 3×5 result grid

use serde::{Deserialize, Serialize};

use crate::symbols::SymbolId;

/// Rows visible per reel
pub const GRID_ROWS: usize = 3;
/// Reels (columns)
pub const GRID_REELS: usize = 5;

/// Cell coordinate as (row, col), row 0 at the top
pub type Position = (u8, u8);

/// Outcome of one spin, stored row-major
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    cells: [[SymbolId; GRID_REELS]; GRID_ROWS],
}

impl Grid {
    /// Create from rows (top to bottom)
    pub fn new(rows: [[SymbolId; GRID_REELS]; GRID_ROWS]) -> Self {
        Self { cells: rows }
    }

    /// Create from reel columns, each listed top to bottom
    pub fn from_columns(columns: [[SymbolId; GRID_ROWS]; GRID_REELS]) -> Self {
        let mut cells = [[0; GRID_REELS]; GRID_ROWS];
        for (col, column) in columns.iter().enumerate() {
            for (row, &symbol) in column.iter().enumerate() {
                cells[row][col] = symbol;
            }
        }
        Self { cells }
    }

    /// Every cell holds the same symbol
    pub fn filled(symbol: SymbolId) -> Self {
        Self {
            cells: [[symbol; GRID_REELS]; GRID_ROWS],
        }
    }

    /// Symbol at (row, col)
    pub fn get(&self, row: u8, col: u8) -> Option<SymbolId> {
        self.cells
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .copied()
    }

    pub fn at(&self, pos: Position) -> Option<SymbolId> {
        self.get(pos.0, pos.1)
    }

    /// One reel, top to bottom
    pub fn column(&self, col: usize) -> [SymbolId; GRID_ROWS] {
        [self.cells[0][col], self.cells[1][col], self.cells[2][col]]
    }

    pub fn columns(&self) -> [[SymbolId; GRID_ROWS]; GRID_REELS] {
        std::array::from_fn(|col| self.column(col))
    }

    pub fn rows(&self) -> &[[SymbolId; GRID_REELS]; GRID_ROWS] {
        &self.cells
    }

    /// Are all cells the same symbol?
    pub fn is_uniform(&self) -> bool {
        let first = self.cells[0][0];
        self.cells.iter().flatten().all(|&s| s == first)
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, row) in self.cells.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let line: Vec<String> = row.iter().map(|s| s.to_string()).collect();
            write!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
