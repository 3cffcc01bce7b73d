//! Zero-cost wrappers for safe indexing.
//!
//! Attribute index `0` refers to the decision attribute and is never a legal
//! conditional attribute index; [`crate::instance::Instance`] rejects it at
//! partition-construction time.

use std::fmt;

wrap_usize! {
    #[doc = "Attribute indices. Index `0` is the decision attribute."]
    AttIdx
    #[doc = "Range over attributes."]
    range: AttRange
    #[doc = "Set of attributes."]
    set: AttSet
    #[doc = "Hash map from attributes to something."]
    hash map: AttHMap
    #[doc = "Total map from attributes to something."]
    map: AttMap
}
impl AttIdx {
    /// True if this is the decision attribute slot.
    #[inline]
    pub fn is_decision(self) -> bool {
        self.get() == 0
    }
}

wrap_usize! {
    #[doc = "Record ordinals. Stable identity of a record inside a universe."]
    RowIdx
    #[doc = "Range over records."]
    range: RowRange
    #[doc = "Set of records."]
    set: RowSet
    #[doc = "Hash map from records to something."]
    hash map: RowHMap
    #[doc = "Total map from records to something."]
    map: RowMap
}

wrap_usize! {
    #[doc = "Equivalence class indices inside a partition."]
    ClsIdx
    #[doc = "Range over equivalence classes."]
    range: ClsRange
    #[doc = "Set of equivalence classes."]
    set: ClsSet
    #[doc = "Hash map from equivalence classes to something."]
    hash map: ClsHMap
    #[doc = "Total map from equivalence classes to something."]
    map: ClsMap
}

/// Displays a sequence of attribute indices as `{ 1 2 5 }`.
pub struct AttsDisplay<'a>(pub &'a [AttIdx]);
impl<'a> fmt::Display for AttsDisplay<'a> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{{")?;
        for att in self.0 {
            write!(fmt, " {}", att)?
        }
        write!(fmt, " }}")
    }
}
