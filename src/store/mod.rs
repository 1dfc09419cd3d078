//! Cost store backends.
//!
//! - [`memory`] : dense in-memory grid, used when the table is small.
//! - [`disk`]   : single-file store whose resident footprint does not grow
//!   with the table.
//!
//! [`CacheBackend`] wraps either one so the engine can pick at runtime.

pub mod disk;
pub mod memory;

use crate::cost::Cost;
use crate::error::{Result, SupersequenceError};
use crate::traits::{CostStore, SuffixPair};

pub use disk::DiskStore;
pub use memory::MemoryStore;

/// Runtime choice between the two backends.
#[derive(Debug)]
pub enum CacheBackend {
    Memory(MemoryStore),
    Disk(DiskStore),
}

impl CacheBackend {
    /// Short label for logs and reports.
    pub fn kind(&self) -> &'static str {
        match self {
            CacheBackend::Memory(_) => "memory",
            CacheBackend::Disk(_) => "disk",
        }
    }
}

impl CostStore for CacheBackend {
    fn dims(&self) -> (usize, usize) {
        match self {
            CacheBackend::Memory(s) => s.dims(),
            CacheBackend::Disk(s) => s.dims(),
        }
    }

    fn put(&mut self, pair: SuffixPair, cost: Cost) -> Result<()> {
        match self {
            CacheBackend::Memory(s) => s.put(pair, cost),
            CacheBackend::Disk(s) => s.put(pair, cost),
        }
    }

    fn get(&self, pair: SuffixPair) -> Result<Cost> {
        match self {
            CacheBackend::Memory(s) => s.get(pair),
            CacheBackend::Disk(s) => s.get(pair),
        }
    }

    fn close(&mut self) -> Result<()> {
        match self {
            CacheBackend::Memory(s) => s.close(),
            CacheBackend::Disk(s) => s.close(),
        }
    }

    fn destroy(self) -> Result<()> {
        match self {
            CacheBackend::Memory(s) => s.destroy(),
            CacheBackend::Disk(s) => s.destroy(),
        }
    }
}

/// Row-major slot of `pair` in a `rows x cols` grid.
#[inline]
pub(crate) fn slot_index(pair: SuffixPair, rows: usize, cols: usize) -> Result<usize> {
    if pair.i1 >= rows || pair.i2 >= cols {
        return Err(SupersequenceError::OutOfBounds {
            i1: pair.i1,
            i2: pair.i2,
            rows,
            cols,
        });
    }
    Ok(pair.i1 * cols + pair.i2)
}
