//! Minimal common digit supersequence (SUPERSEQUENCE-DP)
//!
//! This crate computes the numerically smallest integer that contains two
//! given integers as ordered, not necessarily contiguous, digit
//! subsequences. Inputs may run to tens of thousands of digits, so the
//! dynamic-programming table behind it can live on disk instead of in
//! memory.
//!
//! ## Core idea
//! 1. Index states by how many leading digits of each input are still
//!    unmerged; the next digit to place is the least significant pending one.
//! 2. Fill a cost table ([`table`]) whose cells hold the cheapest merge of
//!    the pending prefixes, writing through a [`CostStore`].
//! 3. Walk the finished table from the full lengths down to `(0, 0)`
//!    ([`reconstruct`]) to emit the answer.
//! 4. Guard the on-disk artifact ([`guard`]): a stale file aborts the run,
//!    and the file is always removed afterwards.
//!
//! ## Quick start
//! ```
//! use supersequence_dp::{BackendChoice, DigitSequence, SupersequenceEngineBuilder};
//!
//! let dir = std::env::temp_dir().join("supersequence-dp-doctest.db");
//! let engine = SupersequenceEngineBuilder::new()
//!     .cache_path(&dir)
//!     .backend(BackendChoice::Memory)
//!     .build();
//! let a: DigitSequence = "21".parse().unwrap();
//! let b: DigitSequence = "12".parse().unwrap();
//! assert_eq!(engine.run(&a, &b).unwrap().to_string(), "121");
//! ```
//!
//! ## Leading zeros and empty results
//! Results are the smallest digit string, fewest digits first, and are
//! never normalized. If a zero is the cheapest first digit it stays, so
//! `"0"` and `"1"` merge to `"01"` rather than `"10"`. Merging two empty
//! inputs gives an empty sequence, which displays as `"0"`.
//! ```
//! # let path = std::env::temp_dir().join("supersequence-dp-zeros.db");
//! assert_eq!(supersequence_dp::smallest_supersequence("0", "1", &path).unwrap(), "01");
//! assert_eq!(supersequence_dp::smallest_supersequence("", "", &path).unwrap(), "0");
//! ```
//!
//! ## Backends
//! The [`store`] module has two implementations of [`CostStore`]:
//! - [`store::MemoryStore`] for tables under the configured cell threshold,
//! - [`store::DiskStore`], a single-file store with a dense slot index.
//!
//! With the `parallel` feature and [`FillOrder::AntiDiagonal`], the cells of
//! each anti-diagonal are computed on the rayon pool.

pub mod builder;
pub mod cost;
pub mod digits;
pub mod engine;
pub mod error;
pub mod guard;
pub mod reconstruct;
pub mod signature;
pub mod store;
pub mod table;
pub mod traits;
pub mod utils;

use std::path::Path;

pub use crate::builder::SupersequenceEngineBuilder;
pub use crate::digits::{is_subsequence, DigitSequence};
pub use crate::engine::{BackendChoice, RunReport, SupersequenceEngine};
pub use crate::error::{Result, SupersequenceError};
pub use crate::table::FillOrder;
pub use crate::traits::{CostStore, SuffixPair};

/// Parse two decimal strings and merge them with default settings,
/// using `cache_path` for the artifact if the table goes to disk.
pub fn smallest_supersequence(a: &str, b: &str, cache_path: impl AsRef<Path>) -> Result<String> {
    let a = DigitSequence::parse(a)?;
    let b = DigitSequence::parse(b)?;
    let engine = SupersequenceEngine::new(cache_path.as_ref());
    Ok(engine.run(&a, &b)?.to_string())
}
