//! End-to-end supersequence engine.
//!
//! A run is strictly sequential:
//! 1. claim the cache path (stale artifacts abort the run),
//! 2. create a store sized for the full table,
//! 3. fill the cost table,
//! 4. walk it back into the answer,
//! 5. close and destroy the store whatever happened in 3-4.
//!
//! The engine is configured once and can be run repeatedly; each run uses
//! a fresh artifact at the same path.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, info_span};

use crate::digits::DigitSequence;
use crate::error::Result;
use crate::guard::CacheGuard;
use crate::reconstruct::reconstruct;
use crate::store::{CacheBackend, DiskStore, MemoryStore};
use crate::table::{build_cost_table, FillOrder};
use crate::utils::{default_cache_path, prefers_memory, DEFAULT_MEMORY_THRESHOLD};

/// Which store backs the cost table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackendChoice {
    /// Memory when the estimated table size fits under the threshold,
    /// disk otherwise.
    #[default]
    Auto,
    Memory,
    Disk,
}

/// Result of one run plus what it took to get there.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RunReport {
    #[serde(serialize_with = "serialize_digits")]
    pub result: DigitSequence,
    pub backend: &'static str,
    pub cells: usize,
}

fn serialize_digits<S>(digits: &DigitSequence, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(digits)
}

/// Minimal common supersequence engine.
///
/// Typical usage:
/// ```no_run
/// use supersequence_dp::{DigitSequence, SupersequenceEngine};
///
/// let a: DigitSequence = "13".parse().unwrap();
/// let b: DigitSequence = "2".parse().unwrap();
/// let engine = SupersequenceEngine::new("/tmp/merge.db");
/// let merged = engine.run(&a, &b).unwrap();
/// assert_eq!(merged.to_string(), "123");
/// ```
#[derive(Clone, Debug)]
pub struct SupersequenceEngine {
    cache_path: PathBuf,
    memory_threshold: usize,
    backend: BackendChoice,
    order: FillOrder,
}

impl Default for SupersequenceEngine {
    fn default() -> Self {
        Self::new(default_cache_path())
    }
}

impl SupersequenceEngine {
    /// Engine with automatic backend selection and row-major filling.
    pub fn new(cache_path: impl Into<PathBuf>) -> Self {
        Self::with_options(
            cache_path,
            DEFAULT_MEMORY_THRESHOLD,
            BackendChoice::Auto,
            FillOrder::RowMajor,
        )
    }

    /// Engine with every knob set explicitly.
    pub fn with_options(
        cache_path: impl Into<PathBuf>,
        memory_threshold: usize,
        backend: BackendChoice,
        order: FillOrder,
    ) -> Self {
        Self {
            cache_path: cache_path.into(),
            memory_threshold,
            backend,
            order,
        }
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    pub fn memory_threshold(&self) -> usize {
        self.memory_threshold
    }

    pub fn backend(&self) -> BackendChoice {
        self.backend
    }

    pub fn order(&self) -> FillOrder {
        self.order
    }

    /// Compute the minimal common supersequence of `a` and `b`.
    pub fn run(&self, a: &DigitSequence, b: &DigitSequence) -> Result<DigitSequence> {
        self.run_report(a, b).map(|report| report.result)
    }

    /// Like [`run`](Self::run), also reporting the backend and table size.
    pub fn run_report(&self, a: &DigitSequence, b: &DigitSequence) -> Result<RunReport> {
        let span = info_span!("supersequence_run", n = a.len(), m = b.len());
        let _enter = span.enter();

        let guard = CacheGuard::acquire(&self.cache_path)?;
        let mut store = self.open_store(&guard, a.len(), b.len())?;
        let backend = store.kind();
        debug!(backend, path = %guard.path().display(), "cost store ready");

        let outcome = build_cost_table(&mut store, a, b, self.order).and_then(|cells| {
            reconstruct(&store, a, b).map(|result| RunReport {
                result,
                backend,
                cells,
            })
        });
        let report = guard.finish(store, outcome)?;

        info!(
            backend = report.backend,
            cells = report.cells,
            digits = report.result.len(),
            "supersequence computed"
        );
        Ok(report)
    }

    fn open_store(&self, guard: &CacheGuard, n: usize, m: usize) -> Result<CacheBackend> {
        let (rows, cols) = (n + 1, m + 1);
        let use_memory = match self.backend {
            BackendChoice::Auto => prefers_memory(n, m, self.memory_threshold),
            BackendChoice::Memory => true,
            BackendChoice::Disk => false,
        };
        if use_memory {
            Ok(CacheBackend::Memory(MemoryStore::new(rows, cols)))
        } else {
            DiskStore::create(guard.path(), rows, cols).map(CacheBackend::Disk)
        }
    }
}
