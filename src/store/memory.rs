//! Dense in-memory cost grid.

use crate::cost::Cost;
use crate::error::{Result, SupersequenceError};
use crate::store::slot_index;
use crate::traits::{CostStore, SuffixPair};

/// One `Option<Cost>` per cell, row-major.
#[derive(Debug)]
pub struct MemoryStore {
    rows: usize,
    cols: usize,
    cells: Vec<Option<Cost>>,
    closed: bool,
}

impl MemoryStore {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
            closed: false,
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            Err(SupersequenceError::Closed)
        } else {
            Ok(())
        }
    }
}

impl CostStore for MemoryStore {
    fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    fn put(&mut self, pair: SuffixPair, cost: Cost) -> Result<()> {
        self.ensure_open()?;
        let idx = slot_index(pair, self.rows, self.cols)?;
        let cell = &mut self.cells[idx];
        if cell.is_some() {
            return Err(SupersequenceError::DuplicateKey {
                i1: pair.i1,
                i2: pair.i2,
            });
        }
        *cell = Some(cost);
        Ok(())
    }

    fn get(&self, pair: SuffixPair) -> Result<Cost> {
        self.ensure_open()?;
        let idx = slot_index(pair, self.rows, self.cols)?;
        self.cells[idx]
            .clone()
            .ok_or(SupersequenceError::MissingKey {
                i1: pair.i1,
                i2: pair.i2,
            })
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        self.cells = Vec::new();
        Ok(())
    }

    fn destroy(mut self) -> Result<()> {
        self.close()
    }
}
