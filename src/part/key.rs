//! Hashconsed attribute-value vectors, used as partition keys.
//!
//! Keys compare by value, not identity; hashconsing makes that comparison a
//! pointer equality and map insertions cheap. The factory is global and
//! thread-safe, so concurrent candidate evaluations can build keys freely
//! even though partitions themselves are single-owner.

use hashconsing::HConsed;

use crate::common::*;
use crate::instance::Row;

/// Actual attribute-value vector.
#[derive(Hash, Clone, PartialEq, Eq, Debug)]
pub struct RAttVals {
    /// The values, ordered as the inducing attribute list.
    vals: Vec<Val>,
}
impl RAttVals {
    /// The values.
    #[inline]
    pub fn vals(&self) -> &[Val] {
        &self.vals
    }
}

hashconsing::consign! {
    /// Key factory.
    let factory = consign(conf.part.key_capa) for RAttVals ;
}

/// A hashconsed attribute-value vector.
pub type AttVals = HConsed<RAttVals>;

/// Set of keys.
pub type AttValsSet = HashSet<AttVals>;
/// Map from keys to something.
pub type AttValsMap<T> = HashMap<AttVals, T>;

/// Creates a key from raw values.
pub fn new(vals: Vec<Val>) -> AttVals {
    factory.mk(RAttVals { vals })
}

/// Key of a record on some attributes, ordered as `atts`.
pub fn of_row(row: &Row, atts: &[AttIdx]) -> AttVals {
    new(atts.iter().map(|att| row.val(*att)).collect())
}

/// Extends a key with the values of a record on extra attributes.
pub fn extend(key: &AttVals, row: &Row, atts: &[AttIdx]) -> AttVals {
    let mut vals = key.get().vals.clone();
    vals.reserve(atts.len());
    for att in atts {
        vals.push(row.val(*att))
    }
    new(vals)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn structural_equality() {
        let k_1 = new(vec![1, 2, 3]);
        let k_2 = new(vec![1, 2, 3]);
        let k_3 = new(vec![1, 2, 4]);
        assert_eq!(k_1, k_2);
        assert_ne!(k_1, k_3);
        assert_eq!(k_1.uid(), k_2.uid())
    }

    #[test]
    fn extend_appends() {
        let row = Row::new(0, vec![7, 8, 9]);
        let key = of_row(&row, &[1.into(), 3.into()]);
        assert_eq!(key.get().vals(), &[7, 9]);
        let key = extend(&key, &row, &[2.into()]);
        assert_eq!(key.get().vals(), &[7, 9, 8])
    }
}
