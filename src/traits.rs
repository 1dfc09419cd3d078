//! Storage seam between the table builder, the reconstructor and the
//! cache backends.
//!
//! The builder and the reconstructor only ever talk to a [`CostStore`], so
//! they do not care whether cells live in memory or in a file on disk.
//! Implementations must uphold the write-once discipline:
//! - `put` on an occupied pair fails with `DuplicateKey`,
//! - `get` on an empty pair fails with `MissingKey`,
//! - a value written by `put` is visible to every later `get` on the same
//!   instance.

use crate::cost::Cost;
use crate::error::Result;

/// DP state: how many digits of each input are still unmerged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SuffixPair {
    pub i1: usize,
    pub i2: usize,
}

impl SuffixPair {
    #[inline]
    pub const fn new(i1: usize, i2: usize) -> Self {
        Self { i1, i2 }
    }
}

impl From<(usize, usize)> for SuffixPair {
    fn from((i1, i2): (usize, usize)) -> Self {
        Self { i1, i2 }
    }
}

/// Write-once mapping from [`SuffixPair`] to [`Cost`].
///
/// Stores are sized up front for a `rows x cols` grid where
/// `rows = len(seq1) + 1` and `cols = len(seq2) + 1`.
pub trait CostStore {
    /// Grid dimensions `(rows, cols)`.
    fn dims(&self) -> (usize, usize);

    /// Record the cost of `pair`.
    fn put(&mut self, pair: SuffixPair, cost: Cost) -> Result<()>;

    /// Fetch the cost of `pair`.
    fn get(&self, pair: SuffixPair) -> Result<Cost>;

    /// Release underlying resources. Further `put`/`get` calls fail with
    /// `Closed`; calling `close` twice is a no-op.
    fn close(&mut self) -> Result<()>;

    /// Close and permanently remove whatever the store persisted.
    fn destroy(self) -> Result<()>
    where
        Self: Sized;
}
