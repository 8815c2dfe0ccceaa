//! Pattern matching with inclusion filtering
//!
//! Every payline whose cells all hold one symbol is a raw match. Raw matches
//! are then grouped by symbol, ordered by descending multiplier, and a match
//! is dropped when its cells are a subset of an already-accepted match of the
//! same symbol. Matches on different symbols never suppress each other.

use serde::{Deserialize, Serialize};

use crate::grid::{Grid, Position};
use crate::paytable::{Payline, PaylineTable, cell_mask};
use crate::symbols::SymbolId;

/// A payline satisfied by the grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub pattern_name: String,
    pub multiplier: f64,
    pub symbol_id: SymbolId,
    pub positions: Vec<Position>,
}

impl Match {
    fn from_line(line: &Payline, symbol_id: SymbolId) -> Self {
        Self {
            pattern_name: line.name.clone(),
            multiplier: line.multiplier,
            symbol_id,
            positions: line.cells.clone(),
        }
    }

    pub fn cell_mask(&self) -> u16 {
        cell_mask(&self.positions)
    }

    /// Are all of `other`'s cells covered by this match?
    pub fn covers(&self, other: &Match) -> bool {
        let mine = self.cell_mask();
        other.cell_mask() & !mine == 0
    }
}

/// Evaluates grids against a payline table
#[derive(Debug, Clone, Default)]
pub struct PatternMatcher {
    table: PaylineTable,
}

impl PatternMatcher {
    pub fn new(table: PaylineTable) -> Self {
        Self { table }
    }

    pub fn standard() -> Self {
        Self::new(PaylineTable::standard())
    }

    pub fn table(&self) -> &PaylineTable {
        &self.table
    }

    /// Every satisfied payline, in table order, before filtering
    pub fn raw_matches(&self, grid: &Grid) -> Vec<Match> {
        self.table
            .lines()
            .iter()
            .filter_map(|line| {
                let (&first, rest) = line.cells.split_first()?;
                let symbol = grid.at(first)?;
                rest.iter()
                    .all(|&pos| grid.at(pos) == Some(symbol))
                    .then(|| Match::from_line(line, symbol))
            })
            .collect()
    }

    /// Satisfied paylines after inclusion filtering
    pub fn check_results(&self, grid: &Grid) -> Vec<Match> {
        filter_by_inclusion(self.raw_matches(grid))
    }
}

/// Drop matches wholly contained in a richer match of the same symbol.
///
/// Groups keep the order in which their symbol first appears; within a group
/// matches are ordered by descending multiplier (stable on ties).
pub fn filter_by_inclusion(matches: Vec<Match>) -> Vec<Match> {
    let mut groups: Vec<(SymbolId, Vec<Match>)> = Vec::new();
    for m in matches {
        match groups.iter_mut().find(|(id, _)| *id == m.symbol_id) {
            Some((_, group)) => group.push(m),
            None => groups.push((m.symbol_id, vec![m])),
        }
    }

    let mut accepted = Vec::new();
    for (_, mut group) in groups {
        group.sort_by(|a, b| {
            b.multiplier
                .partial_cmp(&a.multiplier)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let start = accepted.len();
        for m in group {
            let contained = accepted[start..]
                .iter()
                .any(|kept: &Match| kept.covers(&m));
            if !contained {
                accepted.push(m);
            }
        }
    }

    accepted
}
