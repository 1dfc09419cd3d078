//! Decimal digit sequences.
//!
//! A [`DigitSequence`] is an immutable, most-significant-first list of
//! digits in `0..=9`. The DP indexes it by *remaining length*: state `i`
//! means the first `i` digits are still unmerged and the next digit to
//! consume (the least significant one still pending) is `digits[i - 1]`.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SupersequenceError};

/// Ordered decimal digits, most significant first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct DigitSequence {
    digits: Vec<u8>,
}

impl DigitSequence {
    /// Build from raw digit values, rejecting anything above 9.
    pub fn from_digits(digits: Vec<u8>) -> Result<Self> {
        if let Some(position) = digits.iter().position(|&d| d > 9) {
            return Err(SupersequenceError::InvalidDigit {
                position,
                found: char::from(b'0'.saturating_add(digits[position])),
            });
        }
        Ok(Self { digits })
    }

    /// Wrap digits already known to be in `0..=9`.
    pub(crate) fn from_trusted(digits: Vec<u8>) -> Self {
        debug_assert!(digits.iter().all(|&d| d <= 9));
        Self { digits }
    }

    /// Parse a decimal string with no sign and no whitespace.
    pub fn parse(s: &str) -> Result<Self> {
        let digits = s
            .chars()
            .enumerate()
            .map(|(position, c)| {
                c.to_digit(10)
                    .map(|d| d as u8)
                    .ok_or(SupersequenceError::InvalidDigit { position, found: c })
            })
            .collect::<Result<Vec<u8>>>()?;
        Ok(Self { digits })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.digits.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    /// All digits, most significant first.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.digits
    }

    /// Digits still pending when `remaining` of them are unmerged.
    #[inline]
    pub fn prefix(&self, remaining: usize) -> &[u8] {
        &self.digits[..remaining]
    }

    /// Next digit to consume when `remaining` digits are unmerged.
    ///
    /// # Panics
    /// Panics if `remaining == 0` or exceeds the sequence length.
    #[inline]
    pub fn head(&self, remaining: usize) -> u8 {
        self.digits[remaining - 1]
    }
}

impl FromStr for DigitSequence {
    type Err = SupersequenceError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Prints the digits verbatim; an empty sequence prints as `0`.
impl fmt::Display for DigitSequence {
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

/// True if `sub` appears in `sup` as an order-preserving (not necessarily
/// contiguous) subsequence.
pub fn is_subsequence(sub: &[u8], sup: &[u8]) -> bool {
    let mut rest = sup.iter();
    sub.iter().all(|d| rest.any(|s| s == d))
}
