use std::path::PathBuf;

use crate::engine::{BackendChoice, SupersequenceEngine};
use crate::table::FillOrder;
use crate::utils::{default_cache_path, DEFAULT_MEMORY_THRESHOLD};

pub struct SupersequenceEngineBuilder {
    cache_path: Option<PathBuf>,
    memory_threshold: Option<usize>,
    backend: BackendChoice,
    order: FillOrder,
}

impl Default for SupersequenceEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SupersequenceEngineBuilder {
    pub fn new() -> Self {
        Self {
            cache_path: None,
            memory_threshold: None,
            backend: BackendChoice::Auto,
            order: FillOrder::RowMajor,
        }
    }
    pub fn cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = Some(path.into());
        self
    }
    /// Estimated table size in bytes up to which `Auto` stays in memory.
    pub fn memory_threshold(mut self, bytes: usize) -> Self {
        self.memory_threshold = Some(bytes);
        self
    }
    pub fn backend(mut self, backend: BackendChoice) -> Self {
        self.backend = backend;
        self
    }
    pub fn order(mut self, order: FillOrder) -> Self {
        self.order = order;
        self
    }
    pub fn build(self) -> SupersequenceEngine {
        SupersequenceEngine::with_options(
            self.cache_path.unwrap_or_else(default_cache_path),
            self.memory_threshold.unwrap_or(DEFAULT_MEMORY_THRESHOLD),
            self.backend,
            self.order,
        )
    }
}
