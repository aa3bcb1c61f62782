//! Size-ordered index of free segments.
//!
//! The gap index holds one entry per free segment, sorted by
//! `(size asc, offset asc)`. Its length is the pool's gap count — the
//! single source of truth. Because every mutation keeps the order, one
//! sift-left on insert is all the sorting machinery needed, and
//! best-fit placement is a first-match scan.

use crate::config::{FILL_FACTOR_DEN, FILL_FACTOR_NUM, GROWTH_FACTOR};
use crate::error::PoolError;
use crate::segment::{SegmentArena, SegmentRef};

/// An entry in the gap index: a free segment keyed by its size.
///
/// The size is recorded in the entry (not just read through the ref)
/// so a stale entry is detectable: a valid entry's size always matches
/// the segment's recorded size.
#[derive(Clone, Copy, Debug)]
pub struct GapEntry {
    pub(crate) size: usize,
    pub(crate) seg: SegmentRef,
}

impl GapEntry {
    /// Size of the referenced gap in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The referenced free segment.
    pub fn seg(&self) -> SegmentRef {
        self.seg
    }
}

/// Sorted, growable index over the free segments of one pool.
///
/// Logical capacity is tracked separately from the backing `Vec` so
/// the 3/4-fill doubling is deterministic regardless of allocator
/// rounding. Callers run [`GapIndex::ensure_capacity`] at the top of
/// any operation that may insert, which keeps the insert itself
/// infallible and the pool untouched on `OutOfMemory`.
pub struct GapIndex {
    /// Active entries; `entries.len()` is the gap count.
    entries: Vec<GapEntry>,
    /// Logical capacity driving the fill-factor arithmetic.
    cap: usize,
}

impl GapIndex {
    /// Create an index with the given initial capacity (in entries).
    pub fn with_capacity(capacity: usize) -> Result<Self, PoolError> {
        let mut entries = Vec::new();
        entries
            .try_reserve_exact(capacity)
            .map_err(|_| PoolError::OutOfMemory)?;
        Ok(Self {
            entries,
            cap: capacity,
        })
    }

    /// Number of active entries (the pool's gap count).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Logical capacity in entries.
    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// Double the capacity if the index is more than 3/4 full.
    ///
    /// On `OutOfMemory` the index is unchanged.
    pub fn ensure_capacity(&mut self) -> Result<(), PoolError> {
        if self.entries.len() * FILL_FACTOR_DEN <= self.cap * FILL_FACTOR_NUM {
            return Ok(());
        }
        let target = self.cap * GROWTH_FACTOR;
        self.entries
            .try_reserve_exact(target - self.entries.len())
            .map_err(|_| PoolError::OutOfMemory)?;
        self.cap = target;
        Ok(())
    }

    /// Add an entry for a free segment, keeping the index sorted.
    ///
    /// Appends at the end, then sifts left on the composite
    /// `(size, offset)` key. Capacity must have been ensured by the
    /// caller earlier in the same operation.
    pub fn insert(&mut self, arena: &SegmentArena, seg: SegmentRef) {
        debug_assert!(
            self.entries.len() < self.cap,
            "gap index capacity ensured before insert"
        );
        let size = arena.get(seg).size();
        self.entries.push(GapEntry { size, seg });

        let mut i = self.entries.len() - 1;
        while i > 0 {
            let prev = &self.entries[i - 1];
            let cur = &self.entries[i];
            let prev_key = (prev.size, arena.get(prev.seg).offset());
            let cur_key = (cur.size, arena.get(cur.seg).offset());
            if prev_key <= cur_key {
                break;
            }
            self.entries.swap(i, i - 1);
            i -= 1;
        }
    }

    /// Remove the entry for `seg`, shifting later entries down.
    ///
    /// # Panics
    ///
    /// Panics if `seg` has no entry — the pool keeps free segments and
    /// index entries in bijection, so a miss is a corrupted pool.
    pub fn remove(&mut self, seg: SegmentRef) {
        let pos = self
            .entries
            .iter()
            .position(|e| e.seg == seg)
            .expect("free segment is present in the gap index");
        self.entries.remove(pos);
    }

    /// First entry large enough for `min_size`, i.e. the smallest
    /// sufficient gap (lowest offset on ties).
    pub fn best_fit(&self, min_size: usize) -> Option<SegmentRef> {
        self.entries
            .iter()
            .find(|e| e.size >= min_size)
            .map(|e| e.seg)
    }

    /// Size of the largest gap, or `None` when the index is empty.
    pub fn largest(&self) -> Option<usize> {
        self.entries.last().map(|e| e.size)
    }

    /// The active entries in sorted order.
    pub fn entries(&self) -> &[GapEntry] {
        &self.entries
    }
}
