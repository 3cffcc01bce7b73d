//! Incremental partition refinement.
//!
//! An [`AttCursor`] feeds attributes to fold in batch by batch, with batch
//! sizes decided by the configured [`CapacityPolicy`]. Refining a
//! [`Partition`] by the full cursor yields exactly the partition a direct
//! pass over the records would build; refining a [`NestedPartition`] only
//! splits boundary classes and stops as soon as the boundary drains.

use crate::common::*;
use crate::instance::Instance;
use crate::part::{key, AttValsMap, EquivClass, NestedPartition, Partition};

/// Cursor over attributes still to fold into a partition.
#[derive(Clone, Debug)]
pub struct AttCursor {
    /// Attributes to feed, in fold order.
    atts: Vec<AttIdx>,
    /// Position of the next attribute to feed.
    pos: usize,
    /// Batch sizing policy.
    policy: CapacityPolicy,
}
impl AttCursor {
    /// New cursor over some attributes.
    ///
    /// Fails on a fixed batch size of zero, which would make the cursor
    /// spin forever.
    pub fn new(atts: Vec<AttIdx>, policy: CapacityPolicy) -> Res<Self> {
        if let CapacityPolicy::Fixed(0) = policy {
            bail!(ErrorKind::Misconfig(
                "attribute cursor batch size cannot be zero".into()
            ))
        }
        Ok(AttCursor {
            atts,
            pos: 0,
            policy,
        })
    }

    /// Cursor honoring the configured batch policy.
    pub fn of_conf(atts: Vec<AttIdx>) -> Res<Self> {
        Self::new(atts, conf.part.capacity)
    }

    /// Number of attributes not fed yet.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.atts.len() - self.pos
    }

    /// True if every attribute has been fed.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.pos == self.atts.len()
    }

    /// Next batch of attributes, `None` when exhausted.
    ///
    /// Batches are non-empty as long as attributes remain.
    pub fn next_batch(&mut self) -> Option<&[AttIdx]> {
        let remaining = self.remaining();
        if remaining == 0 {
            return None;
        }
        let size = self.policy.capacity(remaining);
        debug_assert!(0 < size && size <= remaining);
        let batch = &self.atts[self.pos..self.pos + size];
        self.pos += size;
        Some(batch)
    }
}

/// Splits one class by a batch of attributes.
///
/// Subclasses come out in first-member order, keys extend the parent key.
fn split_class<F: FnMut(EquivClass)>(
    instance: &Instance,
    class: &EquivClass,
    batch: &[AttIdx],
    mut register: F,
) {
    let mut subs: Vec<EquivClass> = Vec::new();
    let mut index: AttValsMap<usize> = AttValsMap::new();
    for row in class.rows() {
        let record = &instance[*row];
        let sub_key = key::extend(class.key(), record, batch);
        let pos = match index.get(&sub_key) {
            Some(pos) => *pos,
            None => {
                let pos = subs.len();
                subs.push(EquivClass::new(sub_key.clone()));
                index.insert(sub_key, pos);
                pos
            }
        };
        subs[pos].add_row(*row, record.dec())
    }
    for sub in subs {
        register(sub)
    }
}

impl Partition {
    /// Folds the cursor's remaining attributes into the partition.
    ///
    /// Exhausts the cursor. The result has exactly the classes a direct
    /// partitioning pass by the combined attribute list would build.
    pub fn refine(&mut self, instance: &Instance, cursor: &mut AttCursor) -> Res<()> {
        while let Some(batch) = cursor.next_batch() {
            conf.check_timeout()?;
            instance.check_atts(batch)?;
            let mut classes: ClsMap<EquivClass> = ClsMap::with_capacity(self.len());
            for class in self.classes().iter() {
                split_class(instance, class, batch, |sub| {
                    classes.push(sub);
                })
            }
            log! { @debug
                "refined by {} into {} classes", AttsDisplay(batch), classes.len()
            }
            self.set_classes(classes)?;
            self.push_atts(batch)
        }
        Ok(())
    }
}

impl Partition {
    /// Early-exit refinement: folds attributes in until the boundary
    /// drains or the cursor exhausts.
    ///
    /// Consistent classes are frozen instead of split, so the result only
    /// agrees with [`Partition::refine`] on its boundary. Callers that
    /// need exact class counts must take the exact path.
    pub fn refine_until_consistent(
        self,
        instance: &Instance,
        cursor: &mut AttCursor,
    ) -> Res<NestedPartition> {
        let mut nested = NestedPartition::of_partition(self);
        nested.refine(instance, cursor)?;
        Ok(nested)
    }
}

impl NestedPartition {
    /// Folds attributes into the boundary pool, stopping early.
    ///
    /// Consistent classes are frozen as they appear; the loop ends as soon
    /// as the boundary drains, possibly leaving the cursor unexhausted.
    /// Returns true if the boundary is empty on exit.
    pub fn refine(&mut self, instance: &Instance, cursor: &mut AttCursor) -> Res<bool> {
        while !self.boundary().is_empty() {
            let batch = match cursor.next_batch() {
                Some(batch) => batch,
                None => break,
            };
            conf.check_timeout()?;
            instance.check_atts(batch)?;
            let old_boundary = std::mem::take(self.boundary_mut());
            let mut boundary = Vec::with_capacity(old_boundary.len());
            for class in &old_boundary {
                split_class(instance, class, batch, |sub| {
                    if sub.is_consistent() {
                        self.freeze(sub)
                    } else {
                        boundary.push(sub)
                    }
                })
            }
            log! { @debug
                "boundary refined by {}, {} classes left inconsistent",
                AttsDisplay(batch),
                boundary.len()
            }
            self.set_boundary(boundary);
            self.push_atts(batch)
        }
        Ok(self.boundary().is_empty())
    }
}
