//! Reels and the five-reel set
//!
//! Reel `i` draws from strip `i`; when fewer strips are configured than reels,
//! the extra reels share strip 0.

use std::sync::Arc;

use rand::Rng;

use crate::error::{SlotError, SlotResult};
use crate::grid::{GRID_REELS, GRID_ROWS, Grid};
use crate::strip::{SharedStrip, WeightedStrip};
use crate::symbols::SymbolId;

/// One reel column bound to a strip
#[derive(Debug, Clone)]
pub struct Reel {
    index: u8,
    strip: SharedStrip,
}

impl Reel {
    pub fn new(index: u8, strip: SharedStrip) -> Self {
        Self { index, strip }
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn strip(&self) -> &SharedStrip {
        &self.strip
    }

    /// Do both reels draw from the same strip?
    pub fn shares_strip_with(&self, other: &Reel) -> bool {
        Arc::ptr_eq(&self.strip, &other.strip)
    }

    /// Produce the three visible symbols, top to bottom. A forced column is
    /// returned verbatim; otherwise three independent draws are made.
    pub fn spin_outcome<R: Rng + ?Sized>(
        &self,
        forced: Option<[SymbolId; GRID_ROWS]>,
        rng: &mut R,
    ) -> SlotResult<[SymbolId; GRID_ROWS]> {
        if let Some(column) = forced {
            return Ok(column);
        }

        // Write lock only because an empty population is rebuilt lazily.
        let mut strip = self.strip.write();
        let mut column = [0; GRID_ROWS];
        for cell in column.iter_mut() {
            *cell = strip.sample(rng)?;
        }
        Ok(column)
    }
}

/// The five reels of the machine
#[derive(Debug, Clone)]
pub struct ReelSet {
    reels: Vec<Reel>,
}

impl ReelSet {
    /// Bind strips to reels, pooling strip 0 for reels without their own
    pub fn from_strips(strips: Vec<WeightedStrip>) -> SlotResult<Self> {
        if strips.is_empty() {
            return Err(SlotError::EmptyPopulation);
        }
        if strips.len() > GRID_REELS {
            log::warn!(
                "{} strips configured, only the first {} are used",
                strips.len(),
                GRID_REELS
            );
        }

        let shared: Vec<SharedStrip> = strips
            .into_iter()
            .take(GRID_REELS)
            .map(WeightedStrip::into_shared)
            .collect();

        let reels = (0..GRID_REELS)
            .map(|i| {
                let strip = shared.get(i).unwrap_or(&shared[0]);
                Reel::new(i as u8, Arc::clone(strip))
            })
            .collect();

        Ok(Self { reels })
    }

    /// Five reels over standard strips
    pub fn standard(seed: u64) -> Self {
        let reels = (0..GRID_REELS)
            .map(|i| {
                let strip = WeightedStrip::standard(format!("reel-{}", i + 1), seed + i as u64);
                Reel::new(i as u8, strip.into_shared())
            })
            .collect();
        Self { reels }
    }

    pub fn reels(&self) -> &[Reel] {
        &self.reels
    }

    pub fn len(&self) -> usize {
        self.reels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reels.is_empty()
    }

    /// Distinct strips in reel order, each listed once
    pub fn unique_strips(&self) -> Vec<SharedStrip> {
        let mut unique: Vec<SharedStrip> = Vec::new();
        for reel in &self.reels {
            if !unique.iter().any(|s| Arc::ptr_eq(s, &reel.strip)) {
                unique.push(Arc::clone(&reel.strip));
            }
        }
        unique
    }

    /// Can every reel draw a symbol?
    pub fn can_sample(&self) -> bool {
        self.reels.iter().all(|r| r.strip.read().total_weight() > 0)
    }

    /// Restore every strip to its baseline weights
    pub fn reset_strips(&self) {
        for strip in self.unique_strips() {
            strip.write().reset_to_original();
        }
    }

    /// Resolve all reels into a grid. A forced grid bypasses sampling.
    pub fn resolve<R: Rng + ?Sized>(&self, forced: Option<&Grid>, rng: &mut R) -> SlotResult<Grid> {
        let mut columns = [[0; GRID_ROWS]; GRID_REELS];
        for (col, reel) in self.reels.iter().enumerate() {
            columns[col] = reel.spin_outcome(forced.map(|g| g.column(col)), rng)?;
        }
        Ok(Grid::from_columns(columns))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strip::SymbolWeight;
    use crate::symbols::SymbolRegistry;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_forced_column_returned_verbatim() {
        let reel = Reel::new(0, WeightedStrip::standard("reel-1", 0).into_shared());
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(reel.spin_outcome(Some([7, 6, 5]), &mut rng), Ok([7, 6, 5]));
    }

    #[test]
    fn test_single_strip_is_pooled() {
        let set = ReelSet::from_strips(vec![WeightedStrip::standard("only", 0)]).unwrap();
        assert_eq!(set.len(), GRID_REELS);
        assert!(set.reels()[4].shares_strip_with(&set.reels()[0]));
        assert_eq!(set.unique_strips().len(), 1);
    }

    #[test]
    fn test_partial_strips_fall_back_to_first() {
        let strips = (0..3)
            .map(|i| WeightedStrip::standard(format!("reel-{i}"), i))
            .collect();
        let set = ReelSet::from_strips(strips).unwrap();

        assert!(!set.reels()[1].shares_strip_with(&set.reels()[0]));
        assert!(set.reels()[3].shares_strip_with(&set.reels()[0]));
        assert!(set.reels()[4].shares_strip_with(&set.reels()[0]));
        assert_eq!(set.unique_strips().len(), 3);
    }

    #[test]
    fn test_no_strips_rejected() {
        assert_eq!(
            ReelSet::from_strips(Vec::new()).unwrap_err(),
            SlotError::EmptyPopulation
        );
    }

    #[test]
    fn test_resolve_forced_grid() {
        let set = ReelSet::standard(0);
        let forced = Grid::new([[3; 5], [0, 1, 2, 4, 5], [5, 6, 7, 0, 1]]);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        assert_eq!(set.resolve(Some(&forced), &mut rng), Ok(forced));
    }

    #[test]
    fn test_resolve_only_draws_weighted_symbols() {
        let registry = SymbolRegistry::standard();
        let strip = WeightedStrip::new("twos", &[SymbolWeight::new(2, 10)], &registry, 0).unwrap();
        let set = ReelSet::from_strips(vec![strip]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        let grid = set.resolve(None, &mut rng).unwrap();
        assert_eq!(grid, Grid::filled(2));
        assert!(set.can_sample());
    }

    #[test]
    fn test_seeded_resolution_is_reproducible() {
        let a = ReelSet::standard(100);
        let b = ReelSet::standard(100);
        let mut rng_a = ChaCha8Rng::seed_from_u64(8);
        let mut rng_b = ChaCha8Rng::seed_from_u64(8);

        for _ in 0..10 {
            assert_eq!(
                a.resolve(None, &mut rng_a).unwrap(),
                b.resolve(None, &mut rng_b).unwrap()
            );
        }
    }
}
