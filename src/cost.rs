//! Cost values stored in the table.
//!
//! The cost of a state is the cheapest merged string of its two pending
//! prefixes, kept as its digits (most significant first). Costs grow to
//! thousands of digits, so they are ordered directly on the digits rather
//! than through a fixed-width integer:
//! - fewer digits is cheaper,
//! - equal digit counts compare lexicographically.
//!
//! For digit strings without a leading zero this is exactly numeric order.
//! The weighted recurrence `d + 10 * cost` becomes "append `d` as the new
//! least significant digit".

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Merged digits for one table cell.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "PackedCost", try_from = "PackedCost")]
pub struct Cost {
    digits: Vec<u8>,
}

impl Cost {
    /// Cost of merging two empty prefixes.
    pub fn zero() -> Self {
        Self { digits: Vec::new() }
    }

    /// Cost of a lone prefix: its own digits in order.
    pub fn from_prefix(prefix: &[u8]) -> Self {
        Self {
            digits: prefix.to_vec(),
        }
    }

    /// `digit + 10 * self`.
    pub fn extended(&self, digit: u8) -> Self {
        let mut digits = Vec::with_capacity(self.digits.len() + 1);
        digits.extend_from_slice(&self.digits);
        digits.push(digit);
        Self { digits }
    }

    #[inline]
    pub fn digits(&self) -> &[u8] {
        &self.digits
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.digits.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn into_digits(self) -> Vec<u8> {
        self.digits
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.digits
            .len()
            .cmp(&other.digits.len())
            .then_with(|| self.digits.cmp(&other.digits))
    }
}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.digits.is_empty() {
            return f.write_str("0");
        }
        for &d in &self.digits {
            write!(f, "{}", char::from(b'0' + d))?;
        }
        Ok(())
    }
}

/// Order `first.extended(d1)` against `second.extended(d2)` without
/// allocating either candidate.
///
/// `Less` or `Equal` means drawing from the first sequence is at least as
/// cheap; only a strict improvement switches to the second.
#[inline]
pub fn compare_candidates(first: &Cost, d1: u8, second: &Cost, d2: u8) -> Ordering {
    first.cmp(second).then(d1.cmp(&d2))
}

/// Wire form: two digits per byte, high nibble first.
#[derive(Serialize, Deserialize)]
struct PackedCost {
    len: u64,
    nibbles: Vec<u8>,
}

impl From<Cost> for PackedCost {
    fn from(cost: Cost) -> Self {
        let nibbles = cost
            .digits
            .chunks(2)
            .map(|pair| (pair[0] << 4) | pair.get(1).copied().unwrap_or(0))
            .collect();
        Self {
            len: cost.digits.len() as u64,
            nibbles,
        }
    }
}

impl TryFrom<PackedCost> for Cost {
    type Error = String;

    fn try_from(packed: PackedCost) -> Result<Self, Self::Error> {
        let len = usize::try_from(packed.len).map_err(|e| e.to_string())?;
        if packed.nibbles.len() != len.div_ceil(2) {
            return Err(format!(
                "packed cost holds {} bytes for {len} digits",
                packed.nibbles.len()
            ));
        }
        let mut digits = Vec::with_capacity(len);
        for byte in packed.nibbles {
            digits.push(byte >> 4);
            digits.push(byte & 0x0f);
        }
        digits.truncate(len);
        if digits.iter().any(|&d| d > 9) {
            return Err("packed cost holds a non-decimal nibble".to_string());
        }
        Ok(Self { digits })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_length_then_lexicographic() {
        let short = Cost::from_prefix(&[9, 9]);
        let long = Cost::from_prefix(&[1, 0, 0]);
        assert!(short < long);
        assert!(Cost::from_prefix(&[1, 2, 3]) < Cost::from_prefix(&[1, 3, 2]));
        assert_eq!(Cost::zero().cmp(&Cost::zero()), Ordering::Equal);
        assert!(Cost::zero() < Cost::from_prefix(&[0]));
    }

    #[test]
    fn extended_appends_least_significant_digit() {
        let c = Cost::from_prefix(&[1, 2]).extended(3);
        assert_eq!(c.digits(), &[1, 2, 3]);
        assert_eq!(c.to_string(), "123");
        assert_eq!(Cost::zero().to_string(), "0");
    }

    #[test]
    fn candidate_comparison_matches_materialised_costs() {
        let a = Cost::from_prefix(&[1, 2]);
        let b = Cost::from_prefix(&[1, 3]);
        for (d1, d2) in [(9u8, 0u8), (0, 9), (4, 5)] {
            assert_eq!(
                compare_candidates(&a, d1, &b, d2),
                a.extended(d1).cmp(&b.extended(d2))
            );
            assert_eq!(
                compare_candidates(&a, d1, &a, d2),
                a.extended(d1).cmp(&a.extended(d2))
            );
        }
    }

    #[test]
    fn packed_form_survives_bincode() {
        for digits in [vec![], vec![7], vec![1, 0, 9, 4, 5]] {
            let cost = Cost::from_prefix(&digits);
            let bytes = bincode::serialize(&cost).unwrap();
            let back: Cost = bincode::deserialize(&bytes).unwrap();
            assert_eq!(back, cost);
        }
    }

    #[test]
    fn packed_form_rejects_bad_nibbles() {
        let bogus = PackedCost {
            len: 2,
            nibbles: vec![0xfa],
        };
        assert!(Cost::try_from(bogus).is_err());
        let short = PackedCost {
            len: 5,
            nibbles: vec![0x12],
        };
        assert!(Cost::try_from(short).is_err());
    }
}
