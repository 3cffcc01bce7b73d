//! Second-level groupings of an existing partition's classes.
//!
//! [`RoughPartition`] regroups a fine partition's classes by their values
//! on a smaller attribute list, reading values off class representatives
//! and merging decision infos. No record is ever re-scanned, which is what
//! makes candidate-subset evaluation cheap during reduct search.
//!
//! [`NestedPartition`] separates consistent classes from boundary ones so
//! that refinement can leave the consistent pool untouched and stop as
//! soon as the boundary drains.

use crate::common::*;
use crate::instance::Instance;
use crate::part::{key, AttVals, AttValsMap, Blocks, DecInfo, EquivClass, Partition};

/// A rough class: one or more fine classes sharing their values on the
/// rough attribute list.
#[derive(Clone, Debug)]
pub struct RoughClass {
    /// Shared attribute-value vector on the rough attributes.
    key: AttVals,
    /// Fine classes absorbed, as class indices into the fine partition.
    members: Vec<ClsIdx>,
    /// Merged decision info of the absorbed classes.
    dec: DecInfo,
    /// Total record count of the absorbed classes.
    size: usize,
}
impl RoughClass {
    fn new(key: AttVals) -> Self {
        RoughClass {
            key,
            members: Vec::new(),
            dec: DecInfo::new(),
            size: 0,
        }
    }

    fn absorb(&mut self, idx: ClsIdx, class: &EquivClass) {
        self.members.push(idx);
        self.dec.merge(class.dec());
        self.size += class.len()
    }

    /// Shared attribute-value vector.
    #[inline]
    pub fn key(&self) -> &AttVals {
        &self.key
    }
    /// Indices of the absorbed fine classes.
    #[inline]
    pub fn members(&self) -> &[ClsIdx] {
        &self.members
    }
    /// Merged decision info.
    #[inline]
    pub fn dec(&self) -> &DecInfo {
        &self.dec
    }
    /// Total record count.
    #[inline]
    pub fn len(&self) -> usize {
        self.size
    }
    /// True if no fine class was absorbed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
    /// True if all absorbed records share one decision value.
    #[inline]
    pub fn is_consistent(&self) -> bool {
        self.dec.is_consistent()
    }
}

/// A partition of a fine partition's classes by a smaller attribute list.
///
/// Semantically equal to partitioning the records directly by the rough
/// attributes, as long as those attributes appear in the fine partition's
/// inducing list.
#[derive(Clone, Debug)]
pub struct RoughPartition {
    /// Rough attributes, a subset of the fine partition's.
    atts: Vec<AttIdx>,
    /// The rough classes.
    classes: Vec<RoughClass>,
    /// Key to rough class position.
    index: AttValsMap<usize>,
}
impl RoughPartition {
    /// Rough attributes.
    #[inline]
    pub fn atts(&self) -> &[AttIdx] {
        &self.atts
    }
    /// The rough classes.
    #[inline]
    pub fn classes(&self) -> &[RoughClass] {
        &self.classes
    }
    /// Number of rough classes.
    #[inline]
    pub fn len(&self) -> usize {
        self.classes.len()
    }
    /// True if there are no rough classes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
impl Blocks for RoughPartition {
    fn covers(&self) -> usize {
        self.classes.iter().map(|class| class.len()).sum()
    }
    fn block_count(&self) -> usize {
        self.classes.len()
    }
    fn blocks_do<F: FnMut(usize, &DecInfo)>(&self, mut f: F) {
        for class in &self.classes {
            f(class.len(), class.dec())
        }
    }
}

impl Partition {
    /// Regroups this partition's classes by a subset of its attributes.
    ///
    /// Every attribute of `atts` must appear in this partition's inducing
    /// list, otherwise class representatives would not determine the rough
    /// keys and the grouping would be meaningless.
    pub fn roughen(&self, instance: &Instance, atts: &[AttIdx]) -> Res<RoughPartition> {
        for att in atts {
            if !self.atts().contains(att) {
                bail!(ErrorKind::Misconfig(format!(
                    "cannot roughen a partition over {} by attribute {}",
                    AttsDisplay(self.atts()),
                    att
                )))
            }
        }

        let mut rough = RoughPartition {
            atts: atts.to_vec(),
            classes: Vec::with_capacity(self.len()),
            index: AttValsMap::new(),
        };
        for (idx, class) in self.classes().index_iter() {
            let key = key::of_row(&instance[class.rep()], atts);
            let pos = match rough.index.get(&key) {
                Some(pos) => *pos,
                None => {
                    let pos = rough.classes.len();
                    rough.classes.push(RoughClass::new(key.clone()));
                    rough.index.insert(key, pos);
                    pos
                }
            };
            rough.classes[pos].absorb(idx, class)
        }

        Ok(rough)
    }
}

/// A partition split into a frozen consistent pool and a boundary pool.
///
/// Refinement only ever splits the boundary pool; classes that become
/// consistent migrate to the frozen pool and are never touched again.
#[derive(Clone, Debug)]
pub struct NestedPartition {
    /// Attributes folded in so far.
    atts: Vec<AttIdx>,
    /// Number of records covered.
    covers: usize,
    /// Consistent classes, frozen.
    consistent: Vec<EquivClass>,
    /// Boundary classes, split by further refinement.
    boundary: Vec<EquivClass>,
}
impl NestedPartition {
    /// Splits a partition into consistent and boundary pools.
    pub fn of_partition(partition: Partition) -> Self {
        let atts = partition.atts().to_vec();
        let mut covers = 0;
        let mut consistent = Vec::new();
        let mut boundary = Vec::new();
        for class in partition.classes().clone() {
            covers += class.len();
            if class.is_consistent() {
                consistent.push(class)
            } else {
                boundary.push(class)
            }
        }
        NestedPartition {
            atts,
            covers,
            consistent,
            boundary,
        }
    }

    /// Attributes folded in so far.
    #[inline]
    pub fn atts(&self) -> &[AttIdx] {
        &self.atts
    }
    /// Consistent classes.
    #[inline]
    pub fn consistent(&self) -> &[EquivClass] {
        &self.consistent
    }
    /// Boundary classes.
    #[inline]
    pub fn boundary(&self) -> &[EquivClass] {
        &self.boundary
    }
    /// Number of records in boundary classes.
    pub fn boundary_size(&self) -> usize {
        self.boundary.iter().map(|class| class.len()).sum()
    }

    pub(in crate::part) fn push_atts(&mut self, atts: &[AttIdx]) {
        self.atts.extend_from_slice(atts)
    }
    pub(in crate::part) fn freeze(&mut self, class: EquivClass) {
        debug_assert!(class.is_consistent());
        self.consistent.push(class)
    }
    pub(in crate::part) fn boundary_mut(&mut self) -> &mut Vec<EquivClass> {
        &mut self.boundary
    }
    pub(in crate::part) fn set_boundary(&mut self, boundary: Vec<EquivClass>) {
        self.boundary = boundary
    }
}
impl Blocks for NestedPartition {
    fn covers(&self) -> usize {
        self.covers
    }
    fn block_count(&self) -> usize {
        self.consistent.len() + self.boundary.len()
    }
    fn blocks_do<F: FnMut(usize, &DecInfo)>(&self, mut f: F) {
        for class in &self.consistent {
            f(class.len(), class.dec())
        }
        for class in &self.boundary {
            f(class.len(), class.dec())
        }
    }
    fn boundary_is_empty(&self) -> bool {
        self.boundary.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::part::{hashed, test::anchor};

    fn atts(atts: &[usize]) -> Vec<AttIdx> {
        atts.iter().map(|att| AttIdx::new(*att)).collect()
    }

    #[test]
    fn roughen_matches_direct_partition() {
        let instance = anchor();
        let fine = hashed(&instance, &atts(&[1, 2])).expect("legal attributes");
        let direct = hashed(&instance, &atts(&[1])).expect("legal attributes");
        let rough = fine.roughen(&instance, &atts(&[1])).expect("subset is legal");

        assert_eq!(rough.len(), direct.len());
        assert_eq!(rough.covers(), direct.covers());
        for class in rough.classes() {
            let twin = direct
                .class_of(class.key())
                .expect("every rough key exists in the direct partition");
            assert_eq!(class.len(), twin.len());
            assert_eq!(class.dec(), twin.dec())
        }
    }

    #[test]
    fn roughen_aggregates_without_rescans() {
        let instance = anchor();
        let fine = hashed(&instance, &atts(&[1, 2])).expect("legal attributes");
        let rough = fine
            .roughen(&instance, &atts(&[2]))
            .expect("subset is legal");
        // By attribute 2: value 0 covers r0, r2, r3 (decisions 0, 0, 1),
        // value 1 covers r1 alone.
        assert_eq!(rough.len(), 2);
        let sizes: Vec<usize> = {
            let mut sizes: Vec<usize> = rough.classes().iter().map(|c| c.len()).collect();
            sizes.sort();
            sizes
        };
        assert_eq!(sizes, vec![1, 3]);
        let consistent = rough.classes().iter().filter(|c| c.is_consistent()).count();
        assert_eq!(consistent, 1)
    }

    #[test]
    fn roughen_rejects_foreign_attributes() {
        let instance = anchor();
        let fine = hashed(&instance, &atts(&[1])).expect("legal attributes");
        let err = fine.roughen(&instance, &atts(&[2])).unwrap_err();
        match err.kind() {
            ErrorKind::Misconfig(_) => (),
            kind => panic!("unexpected error kind: {}", kind),
        }
    }

    #[test]
    fn nested_pools_partition_the_classes() {
        let instance = anchor();
        let fine = hashed(&instance, &atts(&[1, 2])).expect("legal attributes");
        let total = fine.len();
        let nested = NestedPartition::of_partition(fine);
        assert_eq!(nested.consistent().len() + nested.boundary().len(), total);
        assert_eq!(nested.covers(), instance.len());
        assert_eq!(nested.boundary_size(), 2);
        assert!(!nested.boundary_is_empty())
    }
}
