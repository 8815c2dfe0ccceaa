//! Pattern paylines
//!
//! Each payline is a named set of grid cells with a fixed multiplier. A line
//! pays when every one of its cells shows the same symbol. The standard table
//! holds 35 lines in eleven categories.

use serde::{Deserialize, Serialize};

use crate::grid::{GRID_REELS, GRID_ROWS, Position};

/// Category name of the full-grid pattern
pub const JACKPOT_PATTERN: &str = "잭팟";

/// A single pattern payline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payline {
    /// Category name
    pub name: String,
    /// Pattern multiplier
    pub multiplier: f64,
    /// Cells as (row, col)
    pub cells: Vec<Position>,
}

impl Payline {
    /// Create from explicit cells
    pub fn new(name: impl Into<String>, multiplier: f64, cells: Vec<Position>) -> Self {
        Self {
            name: name.into(),
            multiplier,
            cells,
        }
    }

    /// Create from parallel row and column lists
    pub fn zip(name: &str, multiplier: f64, rows: &[u8], cols: &[u8]) -> Self {
        Self::new(
            name,
            multiplier,
            rows.iter().copied().zip(cols.iter().copied()).collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells packed into a bitmask, bit `row * 5 + col`
    pub fn cell_mask(&self) -> u16 {
        cell_mask(&self.cells)
    }

    /// Check cells are on the grid and distinct, 3..=15 of them, multiplier positive
    pub fn validate(&self) -> Result<(), String> {
        if !(3..=GRID_ROWS * GRID_REELS).contains(&self.cells.len()) {
            return Err(format!(
                "payline '{}' has {} cells, expected 3..=15",
                self.name,
                self.cells.len()
            ));
        }
        if !(self.multiplier > 0.0) {
            return Err(format!(
                "payline '{}' has non-positive multiplier {}",
                self.name, self.multiplier
            ));
        }
        for &(row, col) in &self.cells {
            if row as usize >= GRID_ROWS || col as usize >= GRID_REELS {
                return Err(format!(
                    "payline '{}' cell ({}, {}) is off the grid",
                    self.name, row, col
                ));
            }
        }
        if self.cell_mask().count_ones() as usize != self.cells.len() {
            return Err(format!("payline '{}' repeats a cell", self.name));
        }
        Ok(())
    }
}

/// Pack positions into a bitmask, bit `row * 5 + col`
pub fn cell_mask(cells: &[Position]) -> u16 {
    cells
        .iter()
        .fold(0u16, |mask, &(row, col)| mask | 1 << (row as usize * GRID_REELS + col as usize))
}

/// Ordered collection of paylines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaylineTable {
    lines: Vec<Payline>,
}

impl PaylineTable {
    pub fn new(lines: Vec<Payline>) -> Self {
        Self { lines }
    }

    /// The standard 35-line table
    pub fn standard() -> Self {
        let mut lines = Vec::with_capacity(35);

        // 가로: three-in-a-row horizontals
        for row in 0..3u8 {
            for start in 0..3u8 {
                lines.push(Payline::zip(
                    "가로",
                    1.0,
                    &[row; 3],
                    &[start, start + 1, start + 2],
                ));
            }
        }

        // 세로: full columns
        for col in 0..5u8 {
            lines.push(Payline::zip("세로", 1.0, &[0, 1, 2], &[col; 3]));
        }

        // 대각: three-cell diagonals, both directions
        for start in 0..3u8 {
            lines.push(Payline::zip(
                "대각",
                1.0,
                &[0, 1, 2],
                &[start, start + 1, start + 2],
            ));
            lines.push(Payline::zip(
                "대각",
                1.0,
                &[0, 1, 2],
                &[start + 2, start + 1, start],
            ));
        }

        // L: four-in-a-row horizontals
        for row in 0..3u8 {
            lines.push(Payline::zip("L", 2.0, &[row; 4], &[0, 1, 2, 3]));
            lines.push(Payline::zip("L", 2.0, &[row; 4], &[1, 2, 3, 4]));
        }

        // XL: full rows
        for row in 0..3u8 {
            lines.push(Payline::zip("XL", 3.0, &[row; 5], &[0, 1, 2, 3, 4]));
        }

        lines.push(Payline::zip("지그", 4.0, &[0, 1, 1, 2, 2], &[2, 1, 3, 0, 4]));
        lines.push(Payline::zip("재그", 4.0, &[0, 0, 1, 1, 2], &[0, 4, 1, 3, 2]));
        lines.push(Payline::zip(
            "지상",
            7.0,
            &[0, 1, 1, 2, 2, 2, 2, 2],
            &[2, 1, 3, 0, 1, 2, 3, 4],
        ));
        lines.push(Payline::zip(
            "천상",
            7.0,
            &[0, 0, 0, 0, 0, 1, 1, 2],
            &[0, 1, 2, 3, 4, 1, 3, 2],
        ));
        lines.push(Payline::zip(
            "눈",
            8.0,
            &[0, 0, 0, 1, 1, 1, 1, 2, 2, 2],
            &[1, 2, 3, 0, 1, 3, 4, 1, 2, 3],
        ));

        let full: Vec<Position> = (0..GRID_REELS as u8)
            .flat_map(|col| (0..GRID_ROWS as u8).map(move |row| (row, col)))
            .collect();
        lines.push(Payline::new(JACKPOT_PATTERN, 10.0, full));

        Self { lines }
    }

    pub fn lines(&self) -> &[Payline] {
        &self.lines
    }

    pub fn get(&self, index: usize) -> Option<&Payline> {
        self.lines.get(index)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// All lines in a category
    pub fn by_name(&self, name: &str) -> Vec<&Payline> {
        self.lines.iter().filter(|l| l.name == name).collect()
    }

    /// Highest pattern multiplier in the table
    pub fn max_multiplier(&self) -> f64 {
        self.lines.iter().map(|l| l.multiplier).fold(0.0, f64::max)
    }

    /// Validate every line
    pub fn validate(&self) -> Result<(), String> {
        if self.lines.is_empty() {
            return Err("payline table is empty".into());
        }
        self.lines.iter().try_for_each(Payline::validate)
    }
}

impl Default for PaylineTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_shape() {
        let table = PaylineTable::standard();
        assert_eq!(table.len(), 35);
        assert!(table.validate().is_ok());

        let counts: Vec<(&str, usize)> = ["가로", "세로", "대각", "L", "XL", "지그", "재그", "지상", "천상", "눈", "잭팟"]
            .iter()
            .map(|name| (*name, table.by_name(name).len()))
            .collect();
        assert_eq!(
            counts,
            vec![
                ("가로", 9),
                ("세로", 5),
                ("대각", 6),
                ("L", 6),
                ("XL", 3),
                ("지그", 1),
                ("재그", 1),
                ("지상", 1),
                ("천상", 1),
                ("눈", 1),
                ("잭팟", 1),
            ]
        );
    }

    #[test]
    fn test_multipliers_by_category() {
        let table = PaylineTable::standard();
        for line in table.lines() {
            let expected = match line.name.as_str() {
                "가로" | "세로" | "대각" => 1.0,
                "L" => 2.0,
                "XL" => 3.0,
                "지그" | "재그" => 4.0,
                "지상" | "천상" => 7.0,
                "눈" => 8.0,
                "잭팟" => 10.0,
                other => panic!("unexpected category {other}"),
            };
            assert_eq!(line.multiplier, expected, "{}", line.name);
        }
        assert_eq!(table.max_multiplier(), 10.0);
    }

    #[test]
    fn test_cell_counts() {
        let table = PaylineTable::standard();
        assert_eq!(table.by_name("지상")[0].len(), 8);
        assert_eq!(table.by_name("눈")[0].len(), 10);
        assert_eq!(table.by_name(JACKPOT_PATTERN)[0].len(), 15);
        assert_eq!(table.by_name(JACKPOT_PATTERN)[0].cell_mask(), 0x7FFF);
    }

    #[test]
    fn test_diagonals() {
        let table = PaylineTable::standard();
        let diagonals = table.by_name("대각");
        assert_eq!(diagonals[0].cells, vec![(0, 0), (1, 1), (2, 2)]);
        assert_eq!(diagonals[1].cells, vec![(0, 2), (1, 1), (2, 0)]);
        assert_eq!(diagonals[5].cells, vec![(0, 4), (1, 3), (2, 2)]);
    }

    #[test]
    fn test_validate_rejects_bad_lines() {
        assert!(Payline::new("off", 1.0, vec![(3, 0), (0, 1), (0, 2)]).validate().is_err());
        assert!(Payline::new("dup", 1.0, vec![(0, 0), (0, 0), (0, 1)]).validate().is_err());
        assert!(Payline::new("zero", 0.0, vec![(0, 0), (0, 1), (0, 2)]).validate().is_err());
        assert!(Payline::new("short", 1.0, vec![(0, 0), (0, 1)]).validate().is_err());
        assert!(Payline::new("empty", 1.0, vec![]).validate().is_err());
        assert!(PaylineTable::new(vec![]).validate().is_err());
    }
}
