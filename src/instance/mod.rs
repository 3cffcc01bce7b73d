//! Decision-table instances.
//!
//! An [`Instance`] is the *universe*: an immutable collection of labeled
//! records. Each [`Row`] carries its decision value (attribute index `0`)
//! and its conditional attribute values (indices `1..=att_count`). Rows are
//! identified by their [`RowIdx`] ordinal, which doubles as the tie-break
//! key for the ordinal-ordered partitioning strategy.
//!
//! The engine never mutates rows once they are in an instance.

use crate::common::*;

pub mod parse;

/// A labeled record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row {
    /// Decision value, attribute index `0`.
    dec: Dec,
    /// Conditional attribute values, attribute `i` at offset `i - 1`.
    vals: Vec<Val>,
}
impl Row {
    /// Constructor.
    pub fn new(dec: Dec, vals: Vec<Val>) -> Self {
        Row { dec, vals }
    }

    /// Decision value.
    #[inline]
    pub fn dec(&self) -> Dec {
        self.dec
    }

    /// Value of a conditional attribute.
    ///
    /// Callers go through [`Instance::check_atts`] first, so `att` is a
    /// legal conditional index here.
    #[inline]
    pub fn val(&self, att: AttIdx) -> Val {
        debug_assert!(!att.is_decision());
        self.vals[att.get() - 1]
    }

    /// Number of conditional attributes.
    #[inline]
    pub fn width(&self) -> usize {
        self.vals.len()
    }
}

/// An immutable universe of labeled records.
#[derive(Clone, Debug, Default)]
pub struct Instance {
    /// The records, in insertion order.
    rows: RowMap<Row>,
    /// Number of conditional attributes.
    att_count: usize,
}
impl Instance {
    /// Empty instance over some conditional attribute count.
    pub fn new(att_count: usize) -> Self {
        Instance {
            rows: RowMap::new(),
            att_count,
        }
    }

    /// Builds an instance from `(decision, values)` pairs.
    ///
    /// Mostly useful in tests; fails on ragged input.
    pub fn of_rows(att_count: usize, rows: Vec<(Dec, Vec<Val>)>) -> Res<Self> {
        let mut instance = Instance::new(att_count);
        for (dec, vals) in rows {
            instance.push(Row::new(dec, vals))?;
        }
        Ok(instance)
    }

    /// Adds a record, returns its ordinal.
    ///
    /// Fails if the record's width does not match the instance.
    pub fn push(&mut self, row: Row) -> Res<RowIdx> {
        if row.width() != self.att_count {
            bail!(
                "row {} has {} conditional attributes, expected {}",
                self.rows.len(),
                row.width(),
                self.att_count
            )
        }
        Ok(self.rows.push(row))
    }

    /// Number of records.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }
    /// True if the universe is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of conditional attributes.
    #[inline]
    pub fn att_count(&self) -> usize {
        self.att_count
    }

    /// Range over the conditional attributes, `1..=att_count`.
    #[inline]
    pub fn atts(&self) -> AttRange {
        AttRange::new(1, self.att_count + 1)
    }

    /// The full conditional attribute set, in index order.
    pub fn atts_vec(&self) -> Vec<AttIdx> {
        self.atts().collect()
    }

    /// Range over the record ordinals.
    #[inline]
    pub fn row_range(&self) -> RowRange {
        self.rows.indices()
    }

    /// Iterator over ordinals and records.
    #[inline]
    pub fn row_iter(&self) -> impl Iterator<Item = (RowIdx, &Row)> {
        self.rows.index_iter()
    }

    /// Fails fast on illegal conditional attribute indices.
    ///
    /// Index `0` (the decision slot) and indices above the declared
    /// attribute count are rejected here, at partition-construction time,
    /// rather than producing a wrong partition downstream.
    pub fn check_atts(&self, atts: &[AttIdx]) -> Res<()> {
        for att in atts {
            if att.is_decision() || att.get() > self.att_count {
                bail!(ErrorKind::BadAtt(*att, self.att_count))
            }
        }
        Ok(())
    }
}
impl std::ops::Index<RowIdx> for Instance {
    type Output = Row;
    fn index(&self, idx: RowIdx) -> &Row {
        &self.rows[idx]
    }
}
