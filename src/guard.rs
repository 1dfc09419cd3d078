//! Cache artifact lifecycle.
//!
//! A run owns its artifact path from [`CacheGuard::acquire`] until
//! [`CacheGuard::finish`]. Anything already sitting at the path when the
//! run starts is treated as stale and the run is refused; the guard never
//! reads, reuses or deletes it. A process killed mid-run leaves its
//! artifact behind, and it must be removed by hand.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{Result, SupersequenceError};
use crate::traits::CostStore;

/// Claim on a cache artifact path for the duration of one run.
#[derive(Debug)]
#[must_use = "a guard that is never finished leaves its artifact behind"]
pub struct CacheGuard {
    path: PathBuf,
}

impl CacheGuard {
    /// Claim `path`, failing with `StaleCache` if something is already there.
    pub fn acquire(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if path.try_exists()? || path.symlink_metadata().is_ok() {
            return Err(SupersequenceError::StaleCache { path });
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Close and destroy `store`, then hand back `outcome`.
    ///
    /// A failed run keeps its own error even if cleanup also fails; the
    /// cleanup failure is only logged. A successful run whose cleanup
    /// fails reports the cleanup error.
    pub fn finish<T, S>(self, store: S, outcome: Result<T>) -> Result<T>
    where
        S: CostStore,
    {
        let cleanup = store.destroy();
        match (outcome, cleanup) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(cleanup_err)) => Err(cleanup_err),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(cleanup_err)) => {
                warn!(
                    path = %self.path.display(),
                    error = %cleanup_err,
                    "cache cleanup failed after an aborted run"
                );
                Err(err)
            }
        }
    }
}
