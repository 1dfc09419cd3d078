//! Assorted defaults and sizing helpers.

use std::mem::size_of;
use std::path::PathBuf;

use crate::cost::Cost;

/// Artifact path used when the caller does not pick one.
pub const DEFAULT_CACHE_FILE: &str = ".supersequence_dp_cache.db";

/// Largest estimated in-memory table, in bytes, kept in memory under
/// automatic backend selection (64 MiB).
pub const DEFAULT_MEMORY_THRESHOLD: usize = 64 << 20;

/// Default artifact location, relative to the working directory.
pub fn default_cache_path() -> PathBuf {
    PathBuf::from(DEFAULT_CACHE_FILE)
}

/// Number of cells in the table for inputs of length `n` and `m`, or
/// `None` if that does not fit in a `usize`.
#[inline]
pub fn table_cells(n: usize, m: usize) -> Option<usize> {
    n.checked_add(1)?.checked_mul(m.checked_add(1)?)
}

/// Rough resident size of a fully populated in-memory table.
///
/// Cell `(i1, i2)` holds between `max(i1, i2)` and `i1 + i2` digits, so
/// each cell is charged `(n + m) / 2` digit bytes plus its slot.
pub fn estimated_table_bytes(n: usize, m: usize) -> Option<usize> {
    let per_cell = n.checked_add(m)? / 2 + size_of::<Option<Cost>>();
    table_cells(n, m)?.checked_mul(per_cell)
}

/// Whether automatic selection keeps an `n` x `m` input in memory.
///
/// `threshold` is in bytes as estimated by [`estimated_table_bytes`]. A
/// threshold of zero always selects the disk store.
#[inline]
pub fn prefers_memory(n: usize, m: usize, threshold: usize) -> bool {
    matches!(estimated_table_bytes(n, m), Some(bytes) if bytes <= threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_include_empty_prefixes() {
        assert_eq!(table_cells(0, 0), Some(1));
        assert_eq!(table_cells(2, 0), Some(3));
        assert_eq!(table_cells(3, 4), Some(20));
        assert_eq!(table_cells(usize::MAX, 1), None);
    }

    #[test]
    fn byte_estimate_grows_with_digits_per_cell() {
        let slot = size_of::<Option<Cost>>();
        assert_eq!(estimated_table_bytes(0, 0), Some(slot));
        assert_eq!(estimated_table_bytes(3, 4), Some(20 * (3 + slot)));
        assert_eq!(estimated_table_bytes(usize::MAX, 0), None);
    }

    #[test]
    fn threshold_boundaries() {
        let exact = estimated_table_bytes(3, 4).unwrap();
        assert!(prefers_memory(3, 4, exact));
        assert!(!prefers_memory(3, 4, exact - 1));
        assert!(!prefers_memory(0, 0, 0));
        assert!(!prefers_memory(usize::MAX, usize::MAX, usize::MAX));
    }

    #[test]
    fn default_threshold_sends_large_tables_to_disk() {
        assert!(prefers_memory(256, 256, DEFAULT_MEMORY_THRESHOLD));
        assert!(!prefers_memory(512, 512, DEFAULT_MEMORY_THRESHOLD));
        assert!(!prefers_memory(1023, 1023, DEFAULT_MEMORY_THRESHOLD));
        assert!(prefers_memory(2_000, 1, DEFAULT_MEMORY_THRESHOLD));
    }

    #[test]
    fn monotonic_in_input_length() {
        let threshold = 1_000;
        let mut switched = false;
        for n in 0..200 {
            let memory = prefers_memory(n, n, threshold);
            if switched {
                assert!(!memory, "went back to memory at n={n}");
            }
            switched |= !memory;
        }
        assert!(switched);
    }
}
