//! Error taxonomy for table construction, storage and reconstruction.
//!
//! None of these are recoverable locally: a run either produces a full
//! result sequence or fails with one of the variants below.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the supersequence engine and its cost stores.
#[derive(Debug, Error)]
pub enum SupersequenceError {
    /// A cache artifact already exists at the configured path.
    #[error("stale cache artifact at {}; remove it before running again", .path.display())]
    StaleCache { path: PathBuf },

    /// A lookup targeted a pair that has not been computed yet.
    #[error("cost for pair ({i1}, {i2}) has not been computed")]
    MissingKey { i1: usize, i2: usize },

    /// A write targeted a pair that already holds a value.
    #[error("cost for pair ({i1}, {i2}) was already written")]
    DuplicateKey { i1: usize, i2: usize },

    /// A pair outside the table dimensions was addressed.
    #[error("pair ({i1}, {i2}) is outside a {rows}x{cols} table")]
    OutOfBounds {
        i1: usize,
        i2: usize,
        rows: usize,
        cols: usize,
    },

    /// Underlying read/write to the persistent store failed.
    #[error("storage I/O error: {0}")]
    Storage(#[from] std::io::Error),

    /// A record or header could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(#[from] bincode::Error),

    /// The store file does not look like something this crate wrote.
    #[error("corrupt cost store: {0}")]
    CorruptStore(String),

    /// The store was used after `close()`.
    #[error("cost store is closed")]
    Closed,

    /// Input contained something other than a decimal digit.
    #[error("invalid digit {found:?} at position {position}")]
    InvalidDigit { position: usize, found: char },
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SupersequenceError>;
