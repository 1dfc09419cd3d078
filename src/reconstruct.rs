//! Greedy walk over a finished cost table.
//!
//! Starting at `(len(a), len(b))`, each step emits the next least
//! significant digit of the answer and moves to a neighbouring cell, making
//! the same choice the builder made for that cell. Digits are collected
//! least significant first and reversed once at the end.

use std::cmp::Ordering;

use tracing::{debug, info_span};

use crate::cost::compare_candidates;
use crate::digits::DigitSequence;
use crate::error::Result;
use crate::traits::{CostStore, SuffixPair};

/// Rebuild the minimal common supersequence of `a` and `b` from `store`.
///
/// Only reads the store; every cell it touches must already be present.
pub fn reconstruct<S>(store: &S, a: &DigitSequence, b: &DigitSequence) -> Result<DigitSequence>
where
    S: CostStore + ?Sized,
{
    let span = info_span!("reconstruct", n = a.len(), m = b.len());
    let _enter = span.enter();

    let mut i1 = a.len();
    let mut i2 = b.len();
    let mut lsb_first = Vec::with_capacity(i1 + i2);
    let mut lookups = 0usize;

    loop {
        match (i1, i2) {
            (0, 0) => break,
            (0, _) => {
                lsb_first.extend(b.prefix(i2).iter().rev());
                break;
            }
            (_, 0) => {
                lsb_first.extend(a.prefix(i1).iter().rev());
                break;
            }
            _ => {
                let h1 = a.head(i1);
                let h2 = b.head(i2);
                if h1 == h2 {
                    lsb_first.push(h1);
                    i1 -= 1;
                    i2 -= 1;
                    continue;
                }
                let via_a = store.get(SuffixPair::new(i1 - 1, i2))?;
                let via_b = store.get(SuffixPair::new(i1, i2 - 1))?;
                lookups += 2;
                if compare_candidates(&via_a, h1, &via_b, h2) == Ordering::Greater {
                    lsb_first.push(h2);
                    i2 -= 1;
                } else {
                    lsb_first.push(h1);
                    i1 -= 1;
                }
            }
        }
    }

    lsb_first.reverse();
    debug!(digits = lsb_first.len(), lookups, "reconstruction complete");
    Ok(DigitSequence::from_trusted(lsb_first))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SupersequenceError;
    use crate::store::MemoryStore;
    use crate::table::{build_cost_table, FillOrder};

    fn merge(a: &str, b: &str) -> String {
        let a = DigitSequence::parse(a).unwrap();
        let b = DigitSequence::parse(b).unwrap();
        let mut store = MemoryStore::new(a.len() + 1, b.len() + 1);
        build_cost_table(&mut store, &a, &b, FillOrder::RowMajor).unwrap();
        reconstruct(&store, &a, &b).unwrap().to_string()
    }

    #[test]
    fn matches_the_table_root() {
        let a = DigitSequence::parse("8675309").unwrap();
        let b = DigitSequence::parse("1234").unwrap();
        let mut store = MemoryStore::new(8, 5);
        build_cost_table(&mut store, &a, &b, FillOrder::RowMajor).unwrap();
        let root = store.get(SuffixPair::new(7, 4)).unwrap();
        let walked = reconstruct(&store, &a, &b).unwrap();
        assert_eq!(walked.as_slice(), root.digits());
    }

    #[test]
    fn small_cases() {
        assert_eq!(merge("1", "1"), "1");
        assert_eq!(merge("13", "2"), "123");
        assert_eq!(merge("21", "12"), "121");
        assert_eq!(merge("", "5"), "5");
        assert_eq!(merge("5", ""), "5");
        assert_eq!(merge("", ""), "0");
    }

    #[test]
    fn draws_from_the_cheaper_neighbour() {
        assert_eq!(merge("9", "1"), "19");
        assert_eq!(merge("1", "9"), "19");
    }

    #[test]
    fn empty_store_reports_missing_key() {
        let a = DigitSequence::parse("12").unwrap();
        let b = DigitSequence::parse("34").unwrap();
        let store = MemoryStore::new(3, 3);
        assert!(matches!(
            reconstruct(&store, &a, &b),
            Err(SupersequenceError::MissingKey { i1: 1, i2: 2 })
        ));
    }
}
