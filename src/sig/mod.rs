//! Significance measures over decision-annotated blocks.
//!
//! A [`Measure`] scores a [`Blocks`] view of a partition. The contract
//! does not assume monotonicity, but every measure implemented here is
//! monotone under refinement, which is what reduct search relies on: the
//! score of a subset can only move toward the full-set score as attributes
//! are added. Positive-region style measures live here, entropy-based ones
//! in [`entropy`].

use std::fmt;

use crate::part::Blocks;

pub mod entropy;

pub use self::entropy::{Combination, Liang, Shannon};

/// A significance measure.
///
/// Measures are stateful evaluators: they remember their last score and
/// how many evaluations they ran, for reporting.
pub trait Measure: Default {
    /// Score type.
    type Val: Copy + PartialOrd + fmt::Display + fmt::Debug;

    /// Name used in user-facing output.
    const NAME: &'static str;

    /// True if the measure distinguishes partitions that agree on their
    /// boundary but split consistent blocks differently.
    ///
    /// Such measures cannot be fed early-exit refinements, which freeze
    /// consistent blocks instead of splitting them further.
    const EXACT_BLOCKS: bool;

    /// Scores a block view of a universe of `universe` records.
    fn calculate<B: Blocks>(&mut self, blocks: &B, universe: usize) -> Self::Val;

    /// Last score computed, if any.
    fn result(&self) -> Option<Self::Val>;

    /// Number of evaluations run so far.
    fn count(&self) -> usize;

    /// True if `a` is strictly better than `b`, beyond the deviation
    /// tolerance.
    fn is_better(&self, a: Self::Val, b: Self::Val, deviation: f64) -> bool;

    /// Absolute gap between two scores.
    fn difference(&self, a: Self::Val, b: Self::Val) -> f64;

    /// True if neither score beats the other.
    fn matches(&self, a: Self::Val, b: Self::Val, deviation: f64) -> bool {
        !self.is_better(a, b, deviation) && !self.is_better(b, a, deviation)
    }
}

/// Size of the positive region: number of records in consistent blocks.
///
/// Larger is better.
#[derive(Clone, Debug, Default)]
pub struct PosRegion {
    last: Option<usize>,
    evals: usize,
}
impl Measure for PosRegion {
    type Val = usize;
    const NAME: &'static str = "pos";
    const EXACT_BLOCKS: bool = false;

    fn calculate<B: Blocks>(&mut self, blocks: &B, _universe: usize) -> usize {
        let mut pos = 0;
        blocks.blocks_do(|size, dec| {
            if dec.is_consistent() {
                pos += size
            }
        });
        self.evals += 1;
        self.last = Some(pos);
        pos
    }

    fn result(&self) -> Option<usize> {
        self.last
    }
    fn count(&self) -> usize {
        self.evals
    }

    fn is_better(&self, a: usize, b: usize, deviation: f64) -> bool {
        a as f64 > b as f64 + deviation
    }
    fn difference(&self, a: usize, b: usize) -> f64 {
        (a as f64 - b as f64).abs()
    }
}

/// Dependency ratio: positive region size over universe size.
///
/// Larger is better, `1` on a consistent table, `0` on an empty universe.
#[derive(Clone, Debug, Default)]
pub struct Dependency {
    last: Option<f64>,
    evals: usize,
}
impl Measure for Dependency {
    type Val = f64;
    const NAME: &'static str = "dep";
    const EXACT_BLOCKS: bool = false;

    fn calculate<B: Blocks>(&mut self, blocks: &B, universe: usize) -> f64 {
        let mut pos = 0;
        blocks.blocks_do(|size, dec| {
            if dec.is_consistent() {
                pos += size
            }
        });
        let dep = if universe == 0 {
            0.0
        } else {
            pos as f64 / universe as f64
        };
        self.evals += 1;
        self.last = Some(dep);
        dep
    }

    fn result(&self) -> Option<f64> {
        self.last
    }
    fn count(&self) -> usize {
        self.evals
    }

    fn is_better(&self, a: f64, b: f64, deviation: f64) -> bool {
        a > b + deviation
    }
    fn difference(&self, a: f64, b: f64) -> f64 {
        (a - b).abs()
    }
}

/// Discernibility degree: number of ordered record pairs told apart,
/// `universe² - Σ |block|²`.
///
/// Larger is better. Splitting any block changes the score, consistent or
/// not, so this measure demands exact refinements.
#[derive(Clone, Debug, Default)]
pub struct Discernibility {
    last: Option<u64>,
    evals: usize,
}
impl Measure for Discernibility {
    type Val = u64;
    const NAME: &'static str = "disc";
    const EXACT_BLOCKS: bool = true;

    fn calculate<B: Blocks>(&mut self, blocks: &B, universe: usize) -> u64 {
        let universe = universe as u64;
        let mut same = 0u64;
        blocks.blocks_do(|size, _| {
            let size = size as u64;
            same += size * size
        });
        let disc = universe * universe - same;
        self.evals += 1;
        self.last = Some(disc);
        disc
    }

    fn result(&self) -> Option<u64> {
        self.last
    }
    fn count(&self) -> usize {
        self.evals
    }

    fn is_better(&self, a: u64, b: u64, deviation: f64) -> bool {
        a as f64 > b as f64 + deviation
    }
    fn difference(&self, a: u64, b: u64) -> f64 {
        (a as f64 - b as f64).abs()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::common::AttIdx;
    use crate::part::{hashed, test::anchor};

    fn atts(atts: &[usize]) -> Vec<AttIdx> {
        atts.iter().map(|att| AttIdx::new(*att)).collect()
    }

    #[test]
    fn pos_region_counts_consistent_records() {
        let instance = anchor();
        let full = hashed(&instance, &atts(&[1, 2])).expect("legal attributes");
        let mut measure = PosRegion::default();
        // r2 and r3 collide with different decisions, only r0 and r1 are
        // positive.
        assert_eq!(measure.calculate(&full, instance.len()), 2);
        assert_eq!(measure.result(), Some(2));
        assert_eq!(measure.count(), 1)
    }

    #[test]
    fn dependency_is_pos_over_universe() {
        let instance = anchor();
        let mut measure = Dependency::default();

        let full = hashed(&instance, &atts(&[1, 2])).expect("legal attributes");
        let dep = measure.calculate(&full, instance.len());
        assert!((dep - 0.5).abs() < 1e-12);

        let single = hashed(&instance, &atts(&[1])).expect("legal attributes");
        let dep = measure.calculate(&single, instance.len());
        assert!(dep.abs() < 1e-12);
        assert_eq!(measure.count(), 2)
    }

    #[test]
    fn dependency_of_empty_universe_is_zero() {
        let instance = crate::instance::Instance::new(2);
        let trivial = hashed(&instance, &[]).expect("empty attribute set is legal");
        let mut measure = Dependency::default();
        assert_eq!(measure.calculate(&trivial, 0), 0.0)
    }

    #[test]
    fn discernibility_counts_separated_pairs() {
        let instance = anchor();
        let mut measure = Discernibility::default();

        // Block sizes 1, 1, 2: 16 - (1 + 1 + 4) = 10.
        let full = hashed(&instance, &atts(&[1, 2])).expect("legal attributes");
        assert_eq!(measure.calculate(&full, instance.len()), 10);

        // Block sizes 2, 2: 16 - 8 = 8.
        let single = hashed(&instance, &atts(&[1])).expect("legal attributes");
        assert_eq!(measure.calculate(&single, instance.len()), 8);

        // The trivial partition separates nothing.
        let trivial = hashed(&instance, &[]).expect("empty attribute set is legal");
        assert_eq!(measure.calculate(&trivial, instance.len()), 0)
    }

    #[test]
    fn pos_region_grows_under_refinement() {
        let instance = anchor();
        let mut measure = PosRegion::default();
        let mut previous = 0;
        // Folding attributes in can only split classes, so the positive
        // region can only grow.
        for subset in [vec![], vec![1], vec![1, 2]] {
            let partition = hashed(&instance, &atts(&subset)).expect("legal attributes");
            let pos = measure.calculate(&partition, instance.len());
            assert!(pos >= previous);
            previous = pos
        }
    }

    #[test]
    fn difference_is_the_absolute_gap() {
        let measure = PosRegion::default();
        assert_eq!(measure.difference(5, 2), 3.0);
        assert_eq!(measure.difference(2, 5), 3.0);
        let measure = Dependency::default();
        assert!((measure.difference(0.25, 0.5) - 0.25).abs() < 1e-12)
    }

    #[test]
    fn better_and_matches_respect_deviation() {
        let measure = Dependency::default();
        assert!(measure.is_better(0.7, 0.5, 1e-9));
        assert!(!measure.is_better(0.5, 0.7, 1e-9));
        assert!(measure.matches(0.5, 0.5 + 1e-12, 1e-9));
        assert!(!measure.matches(0.5, 0.7, 1e-9))
    }
}
