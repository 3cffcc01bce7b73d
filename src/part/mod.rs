//! Equivalence-class partitioning.
//!
//! A [`Partition`] groups the records of an [`Instance`] into
//! [`EquivClass`]es: records identical on the partition's inducing
//! attribute list. Three interchangeable strategies build partitions with
//! identical semantics but different time/space trade-offs:
//!
//! - [`hashed`], hash-keyed grouping on attribute-value vectors,
//! - [`sorted`], sort once then a single sequential scan,
//! - [`id_seq`], ordinal-ordered scan against class representatives.
//!
//! [`rough`] builds second-level groupings of classes, and [`incr`] refines
//! existing partitions by additional attributes without restarting from the
//! records.

use crate::common::*;
use crate::instance::Instance;

pub mod incr;
pub mod key;
pub mod rough;

pub use self::incr::AttCursor;
pub use self::key::{AttVals, AttValsMap, AttValsSet};
pub use self::rough::{NestedPartition, RoughClass, RoughPartition};

/// Decision value to member count map of a class.
///
/// Invariant: the value-sum equals the member count of the owning class.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct DecInfo {
    /// Member count per decision value.
    map: HashMap<Dec, usize>,
    /// Total member count.
    total: usize,
}
impl DecInfo {
    /// Empty decision info.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one member with some decision value.
    #[inline]
    pub fn add(&mut self, dec: Dec) {
        self.add_count(dec, 1)
    }

    /// Registers several members with the same decision value.
    #[inline]
    pub fn add_count(&mut self, dec: Dec, count: usize) {
        *self.map.entry(dec).or_insert(0) += count;
        self.total += count
    }

    /// Absorbs another decision info.
    pub fn merge(&mut self, other: &DecInfo) {
        for (dec, count) in &other.map {
            self.add_count(*dec, *count)
        }
    }

    /// Total member count.
    #[inline]
    pub fn count(&self) -> usize {
        self.total
    }

    /// True if exactly one decision value occurs.
    #[inline]
    pub fn is_consistent(&self) -> bool {
        self.map.len() == 1
    }

    /// Iterator over decision values and their member counts.
    pub fn decs(&self) -> impl Iterator<Item = (Dec, usize)> + '_ {
        self.map.iter().map(|(dec, count)| (*dec, *count))
    }
}

/// An equivalence class: records identical on the inducing attributes.
///
/// Built by exactly one partitioning pass; only ever grows.
#[derive(Clone, Debug)]
pub struct EquivClass {
    /// Representative attribute-value vector.
    key: AttVals,
    /// Member ordinals, in discovery order.
    rows: Vec<RowIdx>,
    /// Decision info of the members.
    dec: DecInfo,
}
impl EquivClass {
    /// New empty class for some key.
    pub fn new(key: AttVals) -> Self {
        EquivClass {
            key,
            rows: Vec::new(),
            dec: DecInfo::new(),
        }
    }

    /// Adds a member record.
    #[inline]
    pub fn add_row(&mut self, row: RowIdx, dec: Dec) {
        self.rows.push(row);
        self.dec.add(dec)
    }

    /// Representative attribute-value vector.
    #[inline]
    pub fn key(&self) -> &AttVals {
        &self.key
    }
    /// Member ordinals.
    #[inline]
    pub fn rows(&self) -> &[RowIdx] {
        &self.rows
    }
    /// Member count.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }
    /// True if the class has no members.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
    /// Decision info.
    #[inline]
    pub fn dec(&self) -> &DecInfo {
        &self.dec
    }
    /// True if all members share one decision value.
    #[inline]
    pub fn is_consistent(&self) -> bool {
        self.dec.is_consistent()
    }
    /// A representative member: the first one discovered.
    ///
    /// Panics on empty classes, which partitioning never produces.
    #[inline]
    pub fn rep(&self) -> RowIdx {
        self.rows[0]
    }
}

/// Read-only view of a partition as decision-annotated blocks.
///
/// Plain, rough and nested partitions all expose this view so that any
/// significance measure can consume any of them.
pub trait Blocks {
    /// Number of records covered by the blocks.
    fn covers(&self) -> usize;
    /// Number of blocks.
    fn block_count(&self) -> usize;
    /// Applies something to each block: member count and decision info.
    fn blocks_do<F: FnMut(usize, &DecInfo)>(&self, f: F);
    /// True if every block is consistent.
    fn boundary_is_empty(&self) -> bool {
        let mut res = true;
        self.blocks_do(|_, dec| {
            if !dec.is_consistent() {
                res = false
            }
        });
        res
    }
}

/// A partition of a universe by an attribute list.
///
/// Invariant: the classes are pairwise disjoint and their union is the
/// universe the partition was built from.
#[derive(Clone, Debug)]
pub struct Partition {
    /// Inducing attributes, in fold order.
    atts: Vec<AttIdx>,
    /// The classes.
    classes: ClsMap<EquivClass>,
    /// Key to class index.
    index: AttValsMap<ClsIdx>,
}
impl Partition {
    /// Empty partition over some attributes.
    fn empty(atts: Vec<AttIdx>) -> Self {
        Partition {
            atts,
            classes: ClsMap::with_capacity(conf.part.cls_capa),
            index: AttValsMap::new(),
        }
    }

    /// Inducing attributes, in fold order.
    #[inline]
    pub fn atts(&self) -> &[AttIdx] {
        &self.atts
    }
    /// The classes.
    #[inline]
    pub fn classes(&self) -> &ClsMap<EquivClass> {
        &self.classes
    }
    /// Number of classes.
    #[inline]
    pub fn len(&self) -> usize {
        self.classes.len()
    }
    /// True if there are no classes (empty universe).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Class of a key, if any.
    pub fn class_of(&self, key: &AttVals) -> Option<&EquivClass> {
        self.index.get(key).map(|idx| &self.classes[*idx])
    }

    /// Routes a record to its class, creating the class on first occurrence.
    fn insert_row(&mut self, key: AttVals, row: RowIdx, dec: Dec) {
        let idx = match self.index.get(&key) {
            Some(idx) => *idx,
            None => {
                let idx = self.classes.push(EquivClass::new(key.clone()));
                let prev = self.index.insert(key, idx);
                debug_assert!(prev.is_none());
                idx
            }
        };
        self.classes[idx].add_row(row, dec)
    }

    /// Registers an already-built class.
    ///
    /// Fails if a class with the same key is already present.
    pub(in crate::part) fn push_class(&mut self, class: EquivClass) -> Res<()> {
        let key = class.key().clone();
        let idx = self.classes.push(class);
        if self.index.insert(key, idx).is_some() {
            bail!("[bug] duplicate key while registering a class")
        }
        Ok(())
    }

    /// Replaces the classes wholesale, rebuilding the key index.
    pub(in crate::part) fn set_classes(&mut self, classes: ClsMap<EquivClass>) -> Res<()> {
        self.index.clear();
        for (idx, class) in classes.index_iter() {
            if self.index.insert(class.key().clone(), idx).is_some() {
                bail!("[bug] duplicate key while rebuilding a partition index")
            }
        }
        self.classes = classes;
        Ok(())
    }

    /// Appends attributes to the inducing list.
    pub(in crate::part) fn push_atts(&mut self, atts: &[AttIdx]) {
        self.atts.extend_from_slice(atts)
    }

    /// True if both partitions have the same classes: same keys, same
    /// member sets.
    ///
    /// Class and member orders are irrelevant, this is the semantic
    /// equality all three partitioning strategies are held to.
    pub fn same_classes(&self, other: &Partition) -> bool {
        if self.len() != other.len() {
            return false;
        }
        for class in self.classes.iter() {
            match other.class_of(class.key()) {
                None => return false,
                Some(other_class) => {
                    let mut mine: Vec<RowIdx> = class.rows().to_vec();
                    let mut theirs: Vec<RowIdx> = other_class.rows().to_vec();
                    mine.sort();
                    theirs.sort();
                    if mine != theirs {
                        return false;
                    }
                }
            }
        }
        true
    }
}
impl Blocks for Partition {
    fn covers(&self) -> usize {
        self.classes.iter().map(|class| class.len()).sum()
    }
    fn block_count(&self) -> usize {
        self.classes.len()
    }
    fn blocks_do<F: FnMut(usize, &DecInfo)>(&self, mut f: F) {
        for class in self.classes.iter() {
            f(class.len(), class.dec())
        }
    }
}

/// Hash-keyed partitioning.
///
/// Builds the attribute-value vector of every record and routes it through
/// a key map. `O(n |atts|)` time, `O(n)` space, no ordering requirement on
/// the input.
pub fn hashed(instance: &Instance, atts: &[AttIdx]) -> Res<Partition> {
    instance.check_atts(atts)?;
    let mut partition = Partition::empty(atts.to_vec());
    for (idx, row) in instance.row_iter() {
        let key = key::of_row(row, atts);
        partition.insert_row(key, idx, row.dec())
    }
    Ok(partition)
}

/// Sorted-sequential partitioning.
///
/// Sorts the ordinals by attribute values (ordinal tie-break) and scans
/// once, starting a new class whenever consecutive records differ on any
/// attribute. Same classes as [`hashed`], `O(n log n)` but no per-record
/// hashing.
pub fn sorted(instance: &Instance, atts: &[AttIdx]) -> Res<Partition> {
    use std::cmp::Ordering;

    instance.check_atts(atts)?;
    let mut partition = Partition::empty(atts.to_vec());

    let mut ordinals: Vec<RowIdx> = instance.row_range().collect();
    ordinals.sort_by(|lft, rgt| {
        for att in atts {
            match instance[*lft].val(*att).cmp(&instance[*rgt].val(*att)) {
                Ordering::Equal => continue,
                diff => return diff,
            }
        }
        lft.cmp(rgt)
    });

    let mut current: Option<EquivClass> = None;
    for idx in ordinals {
        let row = &instance[idx];
        let split = match current.as_ref() {
            None => true,
            Some(class) => {
                let rep = &instance[class.rep()];
                atts.iter().any(|att| rep.val(*att) != row.val(*att))
            }
        };
        if split {
            if let Some(class) = current.take() {
                partition.push_class(class)?
            }
            current = Some(EquivClass::new(key::of_row(row, atts)))
        }
        current
            .as_mut()
            .expect("unreachable: current class was just created")
            .add_row(idx, row.dec())
    }
    if let Some(class) = current.take() {
        partition.push_class(class)?
    }

    Ok(partition)
}

/// Ordinal-ordered sequential partitioning.
///
/// Scans the records in ordinal order and compares each one positionally
/// against the class representatives, building a key only when a class is
/// created. Classes hold ordinal lists; trades extra scanning for no
/// per-record key allocation.
pub fn id_seq(instance: &Instance, atts: &[AttIdx]) -> Res<Partition> {
    instance.check_atts(atts)?;
    let mut classes: ClsMap<EquivClass> = ClsMap::with_capacity(conf.part.cls_capa);

    'rows: for (idx, row) in instance.row_iter() {
        for class in classes.iter_mut() {
            let rep = &instance[class.rep()];
            if atts.iter().all(|att| rep.val(*att) == row.val(*att)) {
                class.add_row(idx, row.dec());
                continue 'rows;
            }
        }
        let mut class = EquivClass::new(key::of_row(row, atts));
        class.add_row(idx, row.dec());
        classes.push(class);
    }

    let mut partition = Partition::empty(atts.to_vec());
    partition.set_classes(classes)?;
    Ok(partition)
}

impl PartStrategy {
    /// Runs the strategy.
    pub fn partition(self, instance: &Instance, atts: &[AttIdx]) -> Res<Partition> {
        match self {
            PartStrategy::Hashed => hashed(instance, atts),
            PartStrategy::Sorted => sorted(instance, atts),
            PartStrategy::IdSeq => id_seq(instance, atts),
        }
    }
}

#[cfg(test)]
pub mod test {
    use super::*;

    /// The anchor scenario: two conditional attributes, records `r2`/`r3`
    /// agree on both but disagree on the decision.
    pub fn anchor() -> Instance {
        Instance::of_rows(
            2,
            vec![
                (0, vec![0, 0]),
                (1, vec![0, 1]),
                (0, vec![1, 0]),
                (1, vec![1, 0]),
            ],
        )
        .expect("anchor instance is well-formed")
    }

    fn atts(atts: &[usize]) -> Vec<AttIdx> {
        atts.iter().map(|att| AttIdx::new(*att)).collect()
    }

    #[test]
    fn anchor_partition_by_first() {
        let instance = anchor();
        let partition = hashed(&instance, &atts(&[1])).expect("legal attributes");
        assert_eq!(partition.len(), 2);
        for class in partition.classes().iter() {
            assert_eq!(class.len(), 2);
            // Both classes see decisions 0 and 1.
            assert!(!class.is_consistent())
        }
    }

    #[test]
    fn anchor_partition_by_both() {
        let instance = anchor();
        let partition = hashed(&instance, &atts(&[1, 2])).expect("legal attributes");
        // r2 and r3 share all conditional values, so three classes.
        assert_eq!(partition.len(), 3);
        let consistent: usize = partition
            .classes()
            .iter()
            .filter(|class| class.is_consistent())
            .map(|class| class.len())
            .sum();
        assert_eq!(consistent, 2)
    }

    #[test]
    fn strategies_agree() {
        let instance = anchor();
        for subset in [vec![1], vec![2], vec![1, 2], vec![2, 1]] {
            let subset = atts(&subset);
            let by_hash = hashed(&instance, &subset).expect("legal attributes");
            let by_sort = sorted(&instance, &subset).expect("legal attributes");
            let by_seq = id_seq(&instance, &subset).expect("legal attributes");
            assert!(by_hash.same_classes(&by_sort));
            assert!(by_hash.same_classes(&by_seq));
            assert!(by_seq.same_classes(&by_sort))
        }
    }

    #[test]
    fn partition_invariant() {
        let instance = anchor();
        let partition = sorted(&instance, &atts(&[1, 2])).expect("legal attributes");
        // Union of the classes is the universe, no duplicates.
        let mut seen = RowSet::new();
        for class in partition.classes().iter() {
            for row in class.rows() {
                assert!(seen.insert(*row), "duplicate row {}", row)
            }
            assert_eq!(class.dec().count(), class.len())
        }
        assert_eq!(seen.len(), instance.len())
    }

    #[test]
    fn empty_attribute_set_is_trivial() {
        let instance = anchor();
        let partition = hashed(&instance, &[]).expect("empty attribute set is legal");
        assert_eq!(partition.len(), 1);
        assert_eq!(partition.classes().iter().next().unwrap().len(), 4)
    }

    #[test]
    fn empty_universe_is_empty_partition() {
        let instance = Instance::new(3);
        for strategy in [PartStrategy::Hashed, PartStrategy::Sorted, PartStrategy::IdSeq] {
            let partition = strategy
                .partition(&instance, &atts(&[1, 3]))
                .expect("legal attributes");
            assert!(partition.is_empty())
        }
    }

    #[test]
    fn decision_slot_is_rejected() {
        let instance = anchor();
        let err = hashed(&instance, &atts(&[0, 1])).unwrap_err();
        match err.kind() {
            ErrorKind::BadAtt(att, max) => {
                assert_eq!(att.get(), 0);
                assert_eq!(*max, 2)
            }
            kind => panic!("unexpected error kind: {}", kind),
        }
    }

    #[test]
    fn out_of_range_is_rejected() {
        let instance = anchor();
        assert!(sorted(&instance, &atts(&[3])).is_err());
        assert!(id_seq(&instance, &atts(&[1, 7])).is_err())
    }
}
