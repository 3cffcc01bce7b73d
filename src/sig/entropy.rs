//! Entropy-based significance measures.
//!
//! All three score the conditional uncertainty of the decision given the
//! blocks, so smaller is better and a consistent table scores zero. None
//! of them cares how consistent blocks are split, early-exit refinements
//! are fair game.

use crate::part::Blocks;
use crate::sig::Measure;

/// Shannon conditional entropy `H(D | P)` in bits.
#[derive(Clone, Debug, Default)]
pub struct Shannon {
    last: Option<f64>,
    evals: usize,
}
impl Measure for Shannon {
    type Val = f64;
    const NAME: &'static str = "shannon";
    const EXACT_BLOCKS: bool = false;

    fn calculate<B: Blocks>(&mut self, blocks: &B, universe: usize) -> f64 {
        let n = universe as f64;
        let mut entropy = 0.0;
        if universe > 0 {
            blocks.blocks_do(|size, dec| {
                let size_f = size as f64;
                let mut inner = 0.0;
                for (_, count) in dec.decs() {
                    let p = count as f64 / size_f;
                    inner -= p * p.log2()
                }
                entropy += size_f / n * inner
            })
        }
        self.evals += 1;
        self.last = Some(entropy);
        entropy
    }

    fn result(&self) -> Option<f64> {
        self.last
    }
    fn count(&self) -> usize {
        self.evals
    }

    fn is_better(&self, a: f64, b: f64, deviation: f64) -> bool {
        a + deviation < b
    }
    fn difference(&self, a: f64, b: f64) -> f64 {
        (a - b).abs()
    }
}

/// Liang conditional entropy, the complement-weighted pair count
/// `Σ_B Σ_d (cnt_d / n) ((|B| - cnt_d) / n)`.
#[derive(Clone, Debug, Default)]
pub struct Liang {
    last: Option<f64>,
    evals: usize,
}
impl Measure for Liang {
    type Val = f64;
    const NAME: &'static str = "liang";
    const EXACT_BLOCKS: bool = false;

    fn calculate<B: Blocks>(&mut self, blocks: &B, universe: usize) -> f64 {
        let n = universe as f64;
        let mut entropy = 0.0;
        if universe > 0 {
            blocks.blocks_do(|size, dec| {
                for (_, count) in dec.decs() {
                    entropy += (count as f64 / n) * ((size - count) as f64 / n)
                }
            })
        }
        self.evals += 1;
        self.last = Some(entropy);
        entropy
    }

    fn result(&self) -> Option<f64> {
        self.last
    }
    fn count(&self) -> usize {
        self.evals
    }

    fn is_better(&self, a: f64, b: f64, deviation: f64) -> bool {
        a + deviation < b
    }
    fn difference(&self, a: f64, b: f64) -> f64 {
        (a - b).abs()
    }
}

/// Number of unordered pairs `x` choose 2.
fn pairs(x: usize) -> f64 {
    (x * x.saturating_sub(1)) as f64 / 2.0
}

/// Combination conditional entropy, the share of undiscerned unequal-
/// decision pairs `Σ_B (|B| / n) (C(|B|, 2) - Σ_d C(cnt_d, 2)) / C(n, 2)`.
#[derive(Clone, Debug, Default)]
pub struct Combination {
    last: Option<f64>,
    evals: usize,
}
impl Measure for Combination {
    type Val = f64;
    const NAME: &'static str = "comb";
    const EXACT_BLOCKS: bool = false;

    fn calculate<B: Blocks>(&mut self, blocks: &B, universe: usize) -> f64 {
        let n = universe as f64;
        let all_pairs = pairs(universe);
        let mut entropy = 0.0;
        if universe > 1 {
            blocks.blocks_do(|size, dec| {
                let mut mixed = pairs(size);
                for (_, count) in dec.decs() {
                    mixed -= pairs(count)
                }
                entropy += (size as f64 / n) * mixed / all_pairs
            })
        }
        self.evals += 1;
        self.last = Some(entropy);
        entropy
    }

    fn result(&self) -> Option<f64> {
        self.last
    }
    fn count(&self) -> usize {
        self.evals
    }

    fn is_better(&self, a: f64, b: f64, deviation: f64) -> bool {
        a + deviation < b
    }
    fn difference(&self, a: f64, b: f64) -> f64 {
        (a - b).abs()
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

    fn close(lft: f64, rgt: f64) -> bool {
        (lft - rgt).abs() < 1e-12
    }

    #[test]
    fn shannon_of_anchor() {
        let instance = anchor();
        let mut measure = Shannon::default();

        // Only the mixed block {r2, r3} contributes: (2/4) * 1 bit.
        let full = hashed(&instance, &atts(&[1, 2])).expect("legal attributes");
        assert!(close(measure.calculate(&full, instance.len()), 0.5));

        // Two half-and-half blocks of size 2: 1 bit.
        let single = hashed(&instance, &atts(&[1])).expect("legal attributes");
        assert!(close(measure.calculate(&single, instance.len()), 1.0))
    }

    #[test]
    fn liang_of_anchor() {
        let instance = anchor();
        let mut measure = Liang::default();

        // Mixed block of size 2: two terms of (1/4)(1/4).
        let full = hashed(&instance, &atts(&[1, 2])).expect("legal attributes");
        assert!(close(measure.calculate(&full, instance.len()), 0.125));

        let single = hashed(&instance, &atts(&[1])).expect("legal attributes");
        assert!(close(measure.calculate(&single, instance.len()), 0.25))
    }

    #[test]
    fn combination_of_anchor() {
        let instance = anchor();
        let mut measure = Combination::default();

        // Mixed block of size 2: (2/4) * (1 - 0) / 6.
        let full = hashed(&instance, &atts(&[1, 2])).expect("legal attributes");
        assert!(close(measure.calculate(&full, instance.len()), 0.5 / 6.0));

        // Two mixed blocks of size 2.
        let single = hashed(&instance, &atts(&[1])).expect("legal attributes");
        assert!(close(measure.calculate(&single, instance.len()), 1.0 / 6.0))
    }

    #[test]
    fn consistent_table_scores_zero() {
        let instance = crate::instance::Instance::of_rows(
            2,
            vec![
                (0, vec![0, 0]),
                (1, vec![0, 1]),
                (0, vec![1, 0]),
                (1, vec![1, 1]),
            ],
        )
        .expect("instance is well-formed");
        let full = hashed(&instance, &atts(&[1, 2])).expect("legal attributes");
        assert!(close(Shannon::default().calculate(&full, 4), 0.0));
        assert!(close(Liang::default().calculate(&full, 4), 0.0));
        assert!(close(Combination::default().calculate(&full, 4), 0.0))
    }

    #[test]
    fn smaller_entropy_is_better() {
        let measure = Shannon::default();
        assert!(measure.is_better(0.25, 0.5, 1e-9));
        assert!(!measure.is_better(0.5, 0.25, 1e-9));
        assert!(measure.matches(0.5, 0.5, 1e-9))
    }
}
