//! Cost table construction.
//!
//! For every pair `(i1, i2)` of remaining lengths the table holds the
//! cheapest merge of `a[..i1]` and `b[..i2]`:
//! - `(0, 0)` is empty,
//! - `(i1, 0)` and `(0, i2)` are the lone prefixes,
//! - equal heads are consumed together,
//! - differing heads take the cheaper of "draw from `a`" and "draw from
//!   `b`", preferring `a` unless `b` is strictly cheaper.
//!
//! Every cell depends only on its up, left and diagonal neighbours, so any
//! order that visits those first is valid. Row-major is the default; the
//! anti-diagonal order exposes a whole diagonal at once and is what the
//! `parallel` feature fans out over. Only the memory backend gains from
//! that: [`DiskStore`](crate::store::DiskStore) serializes every read on
//! its file lock.

use std::cmp::Ordering;

use tracing::{debug, info_span};

use crate::cost::{compare_candidates, Cost};
use crate::digits::DigitSequence;
use crate::error::{Result, SupersequenceError};
use crate::traits::{CostStore, SuffixPair};

/// Traversal order for filling the table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FillOrder {
    /// Ascending `i1`, then ascending `i2`.
    #[default]
    RowMajor,
    /// Ascending `i1 + i2`; cells on one diagonal are independent.
    AntiDiagonal,
}

const PROGRESS_EVERY: usize = 256;

/// Compute the cost of one cell from already-stored neighbours.
pub fn cell_cost<S>(store: &S, a: &DigitSequence, b: &DigitSequence, pair: SuffixPair) -> Result<Cost>
where
    S: CostStore + ?Sized,
{
    let SuffixPair { i1, i2 } = pair;
    let cost = match (i1, i2) {
        (0, 0) => Cost::zero(),
        (_, 0) => Cost::from_prefix(a.prefix(i1)),
        (0, _) => Cost::from_prefix(b.prefix(i2)),
        _ => {
            let h1 = a.head(i1);
            let h2 = b.head(i2);
            if h1 == h2 {
                store.get(SuffixPair::new(i1 - 1, i2 - 1))?.extended(h1)
            } else {
                let via_a = store.get(SuffixPair::new(i1 - 1, i2))?;
                let via_b = store.get(SuffixPair::new(i1, i2 - 1))?;
                match compare_candidates(&via_a, h1, &via_b, h2) {
                    Ordering::Greater => via_b.extended(h2),
                    _ => via_a.extended(h1),
                }
            }
        }
    };
    Ok(cost)
}

/// Populate `store` with every cell of the `(a.len()+1) x (b.len()+1)`
/// table. The store must be freshly created and empty.
///
/// Returns the number of cells written.
pub fn build_cost_table<S>(
    store: &mut S,
    a: &DigitSequence,
    b: &DigitSequence,
    order: FillOrder,
) -> Result<usize>
where
    S: CostStore + Sync,
{
    let rows = a.len() + 1;
    let cols = b.len() + 1;
    if store.dims() != (rows, cols) {
        let (have_rows, have_cols) = store.dims();
        return Err(SupersequenceError::CorruptStore(format!(
            "store is {have_rows}x{have_cols}, table needs {rows}x{cols}"
        )));
    }

    let span = info_span!("build_cost_table", rows, cols, ?order);
    let _enter = span.enter();

    let written = match order {
        FillOrder::RowMajor => fill_row_major(store, a, b)?,
        FillOrder::AntiDiagonal => {
            let mut written = 0;
            for diagonal in 0..rows + cols - 1 {
                written += fill_anti_diagonal(store, a, b, diagonal)?;
                if diagonal % PROGRESS_EVERY == 0 {
                    debug!(diagonal, diagonals = rows + cols - 1, "cost table progress");
                }
            }
            written
        }
    };

    debug!(cells = written, "cost table complete");
    Ok(written)
}

fn fill_row_major<S>(store: &mut S, a: &DigitSequence, b: &DigitSequence) -> Result<usize>
where
    S: CostStore,
{
    let mut written = 0;
    for i1 in 0..=a.len() {
        for i2 in 0..=b.len() {
            let pair = SuffixPair::new(i1, i2);
            let cost = cell_cost(&*store, a, b, pair)?;
            store.put(pair, cost)?;
            written += 1;
        }
        if i1 % PROGRESS_EVERY == 0 {
            debug!(row = i1, rows = a.len() + 1, "cost table progress");
        }
    }
    Ok(written)
}

/// Pairs `(i1, i2)` with `i1 + i2 == diagonal`, ascending `i1`.
fn diagonal_pairs(n: usize, m: usize, diagonal: usize) -> impl Iterator<Item = SuffixPair> {
    let lo = diagonal.saturating_sub(m);
    let hi = diagonal.min(n);
    (lo..=hi).map(move |i1| SuffixPair::new(i1, diagonal - i1))
}

#[cfg(not(feature = "parallel"))]
fn fill_anti_diagonal<S>(
    store: &mut S,
    a: &DigitSequence,
    b: &DigitSequence,
    diagonal: usize,
) -> Result<usize>
where
    S: CostStore,
{
    let mut written = 0;
    for pair in diagonal_pairs(a.len(), b.len(), diagonal) {
        let cost = cell_cost(&*store, a, b, pair)?;
        store.put(pair, cost)?;
        written += 1;
    }
    Ok(written)
}

#[cfg(feature = "parallel")]
fn fill_anti_diagonal<S>(
    store: &mut S,
    a: &DigitSequence,
    b: &DigitSequence,
    diagonal: usize,
) -> Result<usize>
where
    S: CostStore + Sync,
{
    use rayon::prelude::*;

    let pairs: Vec<SuffixPair> = diagonal_pairs(a.len(), b.len(), diagonal).collect();
    let cells = {
        let shared: &S = store;
        pairs
            .par_iter()
            .map(|&pair| cell_cost(shared, a, b, pair).map(|cost| (pair, cost)))
            .collect::<Result<Vec<_>>>()?
    };
    let written = cells.len();
    for (pair, cost) in cells {
        store.put(pair, cost)?;
    }
    Ok(written)
}
