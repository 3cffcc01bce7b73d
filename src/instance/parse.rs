//! Decision-table parser.
//!
//! Line-oriented integer tables: one record per line, whitespace-separated
//! integer codes, first value the decision attribute. Lines starting with
//! `;` or `#` are comments, blank lines are skipped. The first data line
//! fixes the conditional attribute count; ragged lines are parse errors.

use std::io::BufRead;

use crate::common::*;
use crate::instance::{Instance, Row};

/// Parses an instance from a reader.
pub fn instance<R: Read>(reader: R) -> Res<Instance> {
    let reader = std::io::BufReader::new(reader);
    let mut instance: Option<Instance> = None;

    for (off, line) in reader.lines().enumerate() {
        let line_nb = off + 1;
        let line = line.chain_err(|| format!("while reading line {}", line_nb))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        let mut vals = Vec::with_capacity(line.split_whitespace().count());
        for tok in line.split_whitespace() {
            match tok.parse::<Val>() {
                Ok(val) => vals.push(val),
                Err(_) => bail!(ErrorKind::Parse(
                    line_nb,
                    format!("expected an integer, got `{}`", tok),
                )),
            }
        }
        if vals.is_empty() {
            continue;
        }
        if vals.len() < 2 {
            bail!(ErrorKind::Parse(
                line_nb,
                "a record needs a decision value and at least one conditional attribute".into(),
            ))
        }

        let dec = vals[0];
        let vals = vals[1..].to_vec();

        let instance = instance.get_or_insert_with(|| Instance::new(vals.len()));
        if vals.len() != instance.att_count() {
            bail!(ErrorKind::Parse(
                line_nb,
                format!(
                    "record has {} conditional attributes, previous records have {}",
                    vals.len(),
                    instance.att_count()
                ),
            ))
        }
        instance.push(Row::new(dec, vals))?;
    }

    // An input with no data lines is an empty universe with no attributes,
    // a defined (if useless) instance.
    Ok(instance.unwrap_or_default())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_comments_and_rows() {
        let input = "\
            ; decision first\n\
            # then two conditional attributes\n\
            \n\
            0 0 0\n\
            1 0 1\n\
            0 1 0\n\
            1 1 0\n\
        ";
        let instance = instance(input.as_bytes()).expect("parse failure");
        assert_eq!(instance.len(), 4);
        assert_eq!(instance.att_count(), 2);
        assert_eq!(instance[0.into()].dec(), 0);
        assert_eq!(instance[1.into()].val(2.into()), 1);
    }

    #[test]
    fn rejects_ragged_rows() {
        let input = "0 1 2\n1 1\n";
        let err = instance(input.as_bytes()).unwrap_err();
        match *err.kind() {
            ErrorKind::Parse(line, _) => assert_eq!(line, 2),
            ref kind => panic!("unexpected error kind: {}", kind),
        }
    }

    #[test]
    fn rejects_non_integers() {
        let input = "0 high 2\n";
        let err = instance(input.as_bytes()).unwrap_err();
        match *err.kind() {
            ErrorKind::Parse(line, _) => assert_eq!(line, 1),
            ref kind => panic!("unexpected error kind: {}", kind),
        }
    }

    #[test]
    fn empty_input_is_empty_universe() {
        let instance = instance("; nothing\n".as_bytes()).expect("parse failure");
        assert!(instance.is_empty());
        assert_eq!(instance.att_count(), 0)
    }
}
