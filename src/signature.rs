//! Digit-root signatures.
//!
//! Turns a list of integers into a digit sequence whose i-th digit is the
//! digital root of the i-th integer. This is how integer lists are fed to
//! the engine as digit sequences.

use crate::digits::DigitSequence;

/// Repeated digit sum until a single digit remains.
pub fn digital_root(mut n: u64) -> u8 {
    while n > 9 {
        let mut sum = 0;
        while n > 0 {
            sum += n % 10;
            n /= 10;
        }
        n = sum;
    }
    n as u8
}

/// Digital roots of `values`, in order, as a digit sequence.
pub fn root_signature<I>(values: I) -> DigitSequence
where
    I: IntoIterator<Item = u64>,
{
    DigitSequence::from_trusted(values.into_iter().map(digital_root).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roots() {
        assert_eq!(digital_root(0), 0);
        assert_eq!(digital_root(7), 7);
        assert_eq!(digital_root(10), 1);
        assert_eq!(digital_root(29), 2);
        assert_eq!(digital_root(9_875), 2);
        assert_eq!(digital_root(u64::MAX), 6);
    }

    #[test]
    fn signature_of_first_primes() {
        let primes = [2u64, 3, 5, 7, 11, 13, 17, 19, 23, 29];
        assert_eq!(root_signature(primes).to_string(), "2357248152");
    }

    #[test]
    fn empty_signature() {
        assert!(root_signature(std::iter::empty()).is_empty());
    }
}
