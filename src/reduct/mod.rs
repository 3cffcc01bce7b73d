//! Reduct search: core extraction, greedy growth and inspection.
//!
//! The [`Engine`] owns one fine partition over the full conditional
//! attribute list and scores candidate subsets by regrouping that
//! partition's classes, never re-scanning records. Search runs in three
//! phases:
//!
//! - [`Engine::find_core`], the attributes whose removal from the full
//!   list degrades the score,
//! - [`Engine::grow`], greedy forward growth from the core until the
//!   full-list score is matched or no attribute improves anything,
//! - [`Engine::inspect`], backward removal of attributes made redundant
//!   by later additions.
//!
//! [`Engine::eval`] is the fitness oracle for external subset-selection
//! drivers, it scores arbitrary subsets through incremental refinement
//! with early exit where the measure allows it.

use std::fmt;

use crate::common::*;
use crate::instance::Instance;
use crate::part::{AttCursor, Partition};
use crate::sig::Measure;

/// Result of a full reduct search.
#[derive(Clone, Debug)]
pub struct Outcome<V> {
    /// Core attributes, ascending.
    pub core: Vec<AttIdx>,
    /// Reduct attributes, ascending.
    pub reduct: Vec<AttIdx>,
    /// Score of the full conditional attribute list.
    pub target: V,
    /// Score of the reduct.
    pub achieved: V,
    /// True if the reduct matches the target score.
    pub complete: bool,
    /// Number of significance evaluations run.
    pub evals: usize,
    /// Name of the measure used.
    pub measure: &'static str,
}
impl<V: fmt::Display> fmt::Display for Outcome<V> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        writeln!(fmt, "(reduct")?;
        writeln!(fmt, "  (atts     {})", AttsDisplay(&self.reduct))?;
        writeln!(fmt, "  (core     {})", AttsDisplay(&self.core))?;
        writeln!(fmt, "  (measure  \"{}\")", self.measure)?;
        writeln!(fmt, "  (target   {})", self.target)?;
        writeln!(fmt, "  (achieved {})", self.achieved)?;
        writeln!(fmt, "  (complete {})", self.complete)?;
        writeln!(fmt, "  (evals    {})", self.evals)?;
        write!(fmt, ")")
    }
}

/// Reduct search engine, generic over the significance measure.
pub struct Engine<'a, M: Measure> {
    /// The decision table.
    instance: &'a Instance,
    /// Fine partition over the full conditional attribute list.
    fine: Partition,
    /// The measure.
    measure: M,
    /// Score of the full conditional attribute list.
    target: M::Val,
    /// Comparison tolerance.
    deviation: f64,
    /// Profiler.
    _profiler: &'a Profiler,
}
impl<'a, M: Measure> Engine<'a, M> {
    /// Builds the fine partition and scores the full attribute list.
    ///
    /// The fine partition is built incrementally: one direct pass on the
    /// cursor's first batch, then refinement batch by batch.
    pub fn new(instance: &'a Instance, profiler: &'a Profiler) -> Res<Self> {
        let mut cursor = AttCursor::of_conf(instance.atts_vec())?;
        let mut fine = profile! {
            |profiler| wrap {
                match cursor.next_batch() {
                    Some(batch) => conf.part.strategy.partition(instance, batch)?,
                    None => conf.part.strategy.partition(instance, &[])?,
                }
            } "fine", "initial"
        };
        profile! {
            |profiler| wrap {
                fine.refine(instance, &mut cursor)?
            } "fine", "refine"
        }
        log! { @verb
            "fine partition: {} classes over {}", fine.len(), AttsDisplay(fine.atts())
        }

        let mut measure = M::default();
        let target = measure.calculate(&fine, instance.len());
        log! { @info "target {} significance: {}", M::NAME, target }

        Ok(Engine {
            instance,
            fine,
            measure,
            target,
            deviation: conf.sig.deviation,
            _profiler: profiler,
        })
    }

    /// Score of the full conditional attribute list.
    #[inline]
    pub fn target(&self) -> M::Val {
        self.target
    }

    /// Number of significance evaluations run so far.
    #[inline]
    pub fn eval_count(&self) -> usize {
        self.measure.count()
    }

    /// Scores a subset of the fine partition's attributes.
    pub fn sig_of(&mut self, atts: &[AttIdx]) -> Res<M::Val> {
        self.evaluate(atts).map(|(sig, _)| sig)
    }

    /// Scores a subset and reports the block count of its partition.
    fn evaluate(&mut self, atts: &[AttIdx]) -> Res<(M::Val, usize)> {
        use crate::part::Blocks;

        conf.check_timeout()?;
        profile! { self tick "sig" }
        let rough = self.fine.roughen(self.instance, atts)?;
        let sig = self.measure.calculate(&rough, self.instance.len());
        profile! { self mark "sig" }
        Ok((sig, rough.block_count()))
    }

    /// Attributes whose removal from the full list degrades the score.
    pub fn find_core(&mut self) -> Res<Vec<AttIdx>> {
        profile! { self tick "core" }
        let full = self.instance.atts_vec();
        let mut core = Vec::new();
        for att in self.instance.atts() {
            let subset: Vec<AttIdx> = full.iter().cloned().filter(|a| *a != att).collect();
            let (sig, _) = self.evaluate(&subset)?;
            if !self.measure.matches(sig, self.target, self.deviation) {
                log! { @verb
                    "attribute {} is indispensable (significance {})",
                    att,
                    self.measure.difference(self.target, sig)
                }
                core.push(att)
            }
        }
        profile! { self mark "core" }
        log! { @info "core: {}", AttsDisplay(&core) }
        Ok(core)
    }

    /// Greedy forward growth from some attribute list.
    ///
    /// Each round scores every absent attribute on top of the current
    /// list and keeps the best one. Ties on score go to the candidate
    /// inducing fewer classes, then to the lowest attribute. Returns
    /// `Left` when the target score is matched, `Right` with the stalled
    /// list when no attribute improves anything.
    pub fn grow(&mut self, from: Vec<AttIdx>) -> Res<Either<Vec<AttIdx>, Vec<AttIdx>>> {
        profile! { self tick "grow" }
        let mut current = from;
        let (mut sig, _) = self.evaluate(&current)?;

        loop {
            if self.measure.matches(sig, self.target, self.deviation) {
                profile! { self mark "grow" }
                return Ok(Either::Left(current));
            }

            let mut best: Option<(AttIdx, M::Val, usize)> = None;
            for att in self.instance.atts() {
                if current.contains(&att) {
                    continue;
                }
                let mut cand = current.clone();
                cand.push(att);
                let (cand_sig, blocks) = self.evaluate(&cand)?;
                let replace = match best {
                    None => true,
                    Some((_, best_sig, best_blocks)) => {
                        self.measure.is_better(cand_sig, best_sig, self.deviation)
                            || (self.measure.matches(cand_sig, best_sig, self.deviation)
                                && blocks < best_blocks)
                    }
                };
                if replace {
                    best = Some((att, cand_sig, blocks))
                }
            }

            match best {
                Some((att, cand_sig, _))
                    if self.measure.is_better(cand_sig, sig, self.deviation)
                        || self.measure.matches(cand_sig, self.target, self.deviation) =>
                {
                    log! { @verb
                        "growing with attribute {} ({} {})", att, M::NAME, cand_sig
                    }
                    current.push(att);
                    sig = cand_sig
                }
                _ => {
                    log! { @info "growth stalled at {}", AttsDisplay(&current) }
                    profile! { self mark "grow" }
                    return Ok(Either::Right(current));
                }
            }
        }
    }

    /// Backward redundancy elimination.
    ///
    /// Visits the candidate in reverse insertion order, core attributes
    /// excepted, and drops every attribute whose removal still matches
    /// the target score.
    pub fn inspect(&mut self, cand: Vec<AttIdx>, core: &[AttIdx]) -> Res<Vec<AttIdx>> {
        profile! { self tick "inspect" }
        let mut reduct = cand;
        let mut pos = reduct.len();
        while pos > 0 {
            pos -= 1;
            let att = reduct[pos];
            if core.contains(&att) {
                continue;
            }
            let shrunk: Vec<AttIdx> = reduct
                .iter()
                .enumerate()
                .filter_map(|(idx, a)| if idx == pos { None } else { Some(*a) })
                .collect();
            let (sig, _) = self.evaluate(&shrunk)?;
            if self.measure.matches(sig, self.target, self.deviation) {
                log! { @verb "dropping redundant attribute {}", att }
                reduct.remove(pos);
            }
        }
        profile! { self mark "inspect" }
        Ok(reduct)
    }

    /// Scores an arbitrary subset from scratch, for external drivers.
    ///
    /// Builds the subset's partition incrementally; measures blind to the
    /// splitting of consistent blocks get the early-exit refinement,
    /// which stops as soon as the boundary drains.
    pub fn eval(&mut self, atts: &[AttIdx]) -> Res<M::Val> {
        conf.check_timeout()?;
        profile! { self "external evals" => add 1 }
        profile! { self tick "eval" }

        let mut cursor = AttCursor::of_conf(atts.to_vec())?;
        let coarse = match cursor.next_batch() {
            Some(batch) => conf.part.strategy.partition(self.instance, batch)?,
            None => conf.part.strategy.partition(self.instance, &[])?,
        };
        let sig = if M::EXACT_BLOCKS {
            let mut partition = coarse;
            partition.refine(self.instance, &mut cursor)?;
            self.measure.calculate(&partition, self.instance.len())
        } else {
            let nested = coarse.refine_until_consistent(self.instance, &mut cursor)?;
            self.measure.calculate(&nested, self.instance.len())
        };

        profile! { self mark "eval" }
        Ok(sig)
    }

    /// Full search: core, growth, inspection.
    ///
    /// Inspection only runs when growth reached the target, a stalled
    /// list has nothing redundant with respect to the target score.
    pub fn reduce(&mut self) -> Res<Outcome<M::Val>> {
        let mut core = self.find_core()?;
        let (cand, complete) = match self.grow(core.clone())? {
            Either::Left(atts) => (atts, true),
            Either::Right(atts) => (atts, false),
        };
        let mut reduct = if complete {
            self.inspect(cand, &core)?
        } else {
            cand
        };
        let (achieved, _) = self.evaluate(&reduct)?;

        core.sort();
        reduct.sort();
        profile! { self "sig evals" => add self.measure.count() }
        Ok(Outcome {
            core,
            reduct,
            target: self.target,
            achieved,
            complete,
            evals: self.measure.count(),
            measure: M::NAME,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::part::test::anchor;
    use crate::sig::{Dependency, Discernibility, PosRegion};

    fn atts(atts: &[usize]) -> Vec<AttIdx> {
        atts.iter().map(|att| AttIdx::new(*att)).collect()
    }

    /// Consistent twin of the anchor table, last decision flipped.
    fn consistent() -> Instance {
        Instance::of_rows(
            2,
            vec![
                (0, vec![0, 0]),
                (1, vec![0, 1]),
                (0, vec![1, 0]),
                (1, vec![1, 1]),
            ],
        )
        .expect("instance is well-formed")
    }

    #[test]
    fn anchor_core_and_reduct() {
        let instance = anchor();
        let profiler = Profiler::new();
        let mut engine: Engine<Dependency> =
            Engine::new(&instance, &profiler).expect("engine builds");
        // r2/r3 collide, the table only half-determines the decision.
        assert!((engine.target() - 0.5).abs() < 1e-12);

        let outcome = engine.reduce().expect("search succeeds");
        // Dropping either attribute loses even the half-determination.
        assert_eq!(outcome.core, atts(&[1, 2]));
        assert_eq!(outcome.reduct, atts(&[1, 2]));
        assert!(outcome.complete);
        assert!((outcome.achieved - 0.5).abs() < 1e-12);
        assert!(engine.eval_count() >= outcome.evals)
    }

    #[test]
    fn consistent_core_and_reduct() {
        let instance = consistent();
        let profiler = Profiler::new();
        let mut engine: Engine<Dependency> =
            Engine::new(&instance, &profiler).expect("engine builds");
        assert!((engine.target() - 1.0).abs() < 1e-12);

        let outcome = engine.reduce().expect("search succeeds");
        // The decision is attribute 2, attribute 1 is pure noise.
        assert_eq!(outcome.core, atts(&[2]));
        assert_eq!(outcome.reduct, atts(&[2]));
        assert!(outcome.complete)
    }

    #[test]
    fn inspection_drops_in_reverse_order() {
        // Decision is the xor of attributes 1 and 2, attribute 3 carries
        // it directly.
        let instance = Instance::of_rows(
            3,
            vec![
                (0, vec![0, 0, 0]),
                (1, vec![0, 1, 1]),
                (1, vec![1, 0, 1]),
                (0, vec![1, 1, 0]),
            ],
        )
        .expect("instance is well-formed");
        let profiler = Profiler::new();
        let mut engine: Engine<PosRegion> =
            Engine::new(&instance, &profiler).expect("engine builds");

        // Attribute 3 goes first since inspection walks backwards; the
        // xor pair that remains is irredundant.
        let reduct = engine
            .inspect(atts(&[1, 2, 3]), &[])
            .expect("inspection succeeds");
        assert_eq!(reduct, atts(&[1, 2]))
    }

    #[test]
    fn inspection_skips_core() {
        let instance = consistent();
        let profiler = Profiler::new();
        let mut engine: Engine<Dependency> =
            Engine::new(&instance, &profiler).expect("engine builds");
        let reduct = engine
            .inspect(atts(&[1, 2]), &atts(&[1, 2]))
            .expect("inspection succeeds");
        // Core members are never challenged, even removable ones.
        assert_eq!(reduct, atts(&[1, 2]))
    }

    #[test]
    fn inspection_is_idempotent() {
        let instance = consistent();
        let profiler = Profiler::new();
        let mut engine: Engine<Dependency> =
            Engine::new(&instance, &profiler).expect("engine builds");
        let once = engine
            .inspect(atts(&[1, 2]), &atts(&[2]))
            .expect("inspection succeeds");
        let twice = engine
            .inspect(once.clone(), &atts(&[2]))
            .expect("inspection succeeds");
        assert_eq!(once, twice)
    }

    #[test]
    fn greedy_prefers_the_determining_attribute() {
        let instance = Instance::of_rows(
            3,
            vec![
                (0, vec![0, 0, 0]),
                (1, vec![0, 1, 1]),
                (1, vec![1, 0, 1]),
                (0, vec![1, 1, 0]),
            ],
        )
        .expect("instance is well-formed");
        let profiler = Profiler::new();
        let mut engine: Engine<Dependency> =
            Engine::new(&instance, &profiler).expect("engine builds");

        // Alone, only attribute 3 determines anything.
        match engine.grow(Vec::new()).expect("growth succeeds") {
            Either::Left(reduct) => assert_eq!(reduct, atts(&[3])),
            Either::Right(stalled) => panic!("growth stalled at {}", AttsDisplay(&stalled)),
        }
    }

    #[test]
    fn eval_matches_subset_significance() {
        let instance = anchor();
        let profiler = Profiler::new();

        let mut engine: Engine<Dependency> =
            Engine::new(&instance, &profiler).expect("engine builds");
        let direct = engine.sig_of(&atts(&[2])).expect("legal subset");
        let oracle = engine.eval(&atts(&[2])).expect("legal subset");
        assert!((direct - oracle).abs() < 1e-12);

        // Exact-block measures take the full-refinement path.
        let mut engine: Engine<Discernibility> =
            Engine::new(&instance, &profiler).expect("engine builds");
        let direct = engine.sig_of(&atts(&[1])).expect("legal subset");
        let oracle = engine.eval(&atts(&[1])).expect("legal subset");
        assert_eq!(direct, oracle)
    }

    #[test]
    fn outcome_displays_as_s_expression() {
        let outcome = Outcome {
            core: atts(&[2]),
            reduct: atts(&[2]),
            target: 1.0,
            achieved: 1.0,
            complete: true,
            evals: 7,
            measure: "dep",
        };
        let rendered = outcome.to_string();
        assert!(rendered.starts_with("(reduct"));
        assert!(rendered.contains("(atts     { 2 })"));
        assert!(rendered.contains("(complete true)"));
        assert!(rendered.ends_with(')'))
    }
}
