//! Dirty-run detection and coalescing
//!
//! Every changed byte of a page becomes a one-byte run; runs close enough
//! together are then merged so that one addressing header covers several
//! changes. Re-sending a few unchanged bytes is cheaper than a second
//! header.
//!
//! ## Example
//!
//! ```
//! use i8080_tft::diff::{dirty_runs, DiffPolicy, DirtyRun};
//!
//! let previous = [0u8; 64];
//! let mut current = previous;
//! current[3] = 0xFF;
//! current[6] = 0xFF;
//! current[40] = 0xFF;
//!
//! let runs = dirty_runs(&current, &previous, DiffPolicy::default());
//! assert_eq!(runs, [DirtyRun::new(3, 4), DirtyRun::new(40, 1)]);
//! ```

use alloc::vec::Vec;

/// Coalescing thresholds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiffPolicy {
    /// Largest gap of unchanged bytes bridged by a merge
    pub max_gap: usize,
    /// Merged runs must stay shorter than this
    pub max_run: usize,
}

impl DiffPolicy {
    /// Policy that never merges
    pub const EXACT: Self = Self {
        max_gap: 0,
        max_run: 0,
    };
}

impl Default for DiffPolicy {
    fn default() -> Self {
        Self {
            max_gap: 4,
            max_run: 16,
        }
    }
}

/// A contiguous span of changed bytes, `[start, start + count)`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirtyRun {
    /// First byte index
    pub start: usize,
    /// Number of bytes
    pub count: usize,
}

impl DirtyRun {
    /// Create a run
    pub const fn new(start: usize, count: usize) -> Self {
        Self { start, count }
    }

    /// One past the last byte index
    pub const fn end(&self) -> usize {
        self.start + self.count
    }
}

/// Changed runs between two equally long pages, coalesced by `policy`
///
/// Bytes past the shorter slice are ignored.
pub fn dirty_runs(current: &[u8], previous: &[u8], policy: DiffPolicy) -> Vec<DirtyRun> {
    let runs: Vec<DirtyRun> = current
        .iter()
        .zip(previous)
        .enumerate()
        .filter(|(_, (new, old))| new != old)
        .map(|(i, _)| DirtyRun::new(i, 1))
        .collect();
    coalesce(runs, policy)
}

/// Merge sorted, non-overlapping runs left to right
///
/// A run absorbs the next one when the gap between them is at most
/// `max_gap` and the merged run would be shorter than `max_run`.
pub fn coalesce(runs: Vec<DirtyRun>, policy: DiffPolicy) -> Vec<DirtyRun> {
    let mut merged: Vec<DirtyRun> = Vec::with_capacity(runs.len());
    for run in runs {
        if let Some(last) = merged.last_mut() {
            let gap = run.start.saturating_sub(last.end());
            let span = run.end() - last.start;
            if gap <= policy.max_gap && span < policy.max_run {
                last.count = span;
                continue;
            }
        }
        merged.push(run);
    }
    merged
}
