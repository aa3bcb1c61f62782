//! Segment records and the growable segment arena.
//!
//! A [`Segment`] describes one maximal contiguous range of a pool's
//! buffer, either allocated or free. Segments are stored in a
//! [`SegmentArena`] and linked into a doubly-linked list in address
//! order; together the list entries tile the buffer exactly. All links
//! are [`SegmentRef`] indices into the arena, so growing the arena
//! never invalidates a reference.

use crate::config::{FILL_FACTOR_DEN, FILL_FACTOR_NUM, GROWTH_FACTOR};
use crate::error::PoolError;

/// Index of a segment slot within a [`SegmentArena`].
///
/// Refs stay valid across arena growth. A ref to a released slot is
/// dangling and must not be kept; the pool's structures never do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SegmentRef(u32);

impl SegmentRef {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// One bookkeeping record describing a contiguous range of the buffer.
///
/// A segment is a *gap* when it is in use and not allocated. Vacant
/// arena slots are all-default segments with `in_use == false`; they
/// carry no meaning until re-acquired.
#[derive(Clone, Debug, Default)]
pub struct Segment {
    /// Offset of the range within the pool buffer.
    pub(crate) offset: usize,
    /// Size of the range in bytes.
    pub(crate) size: usize,
    /// Whether the range is currently allocated to a client.
    pub(crate) allocated: bool,
    /// Whether this arena slot holds a live list entry.
    pub(crate) in_use: bool,
    /// Allocation stamp of the current tenant; 0 when free.
    pub(crate) stamp: u64,
    /// Neighbour at the next-lower offset.
    pub(crate) prev: Option<SegmentRef>,
    /// Neighbour at the next-higher offset.
    pub(crate) next: Option<SegmentRef>,
}

impl Segment {
    /// Offset of the range within the pool buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Size of the range in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether the range is currently allocated.
    pub fn is_allocated(&self) -> bool {
        self.allocated
    }

    /// Whether this segment is a free gap (in use, not allocated).
    pub fn is_gap(&self) -> bool {
        self.in_use && !self.allocated
    }
}

/// Growable slot storage for segments.
///
/// The `Vec` length *is* the capacity: vacant slots are default
/// segments with `in_use == false`, and [`SegmentArena::acquire`]
/// reuses them by linear scan. The arena doubles when it passes 3/4
/// full; callers run [`SegmentArena::grow_if_needed`] before acquiring
/// so that a vacant slot always exists.
pub struct SegmentArena {
    /// Slot storage. `slots.len()` is the arena capacity.
    slots: Vec<Segment>,
    /// Count of in-use slots.
    used: usize,
}

impl SegmentArena {
    /// Create an arena with the given initial capacity (in slots).
    ///
    /// Returns `Err(PoolError::OutOfMemory)` if the host allocator
    /// refuses the reservation.
    pub fn with_capacity(capacity: usize) -> Result<Self, PoolError> {
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| PoolError::OutOfMemory)?;
        slots.resize_with(capacity, Segment::default);
        Ok(Self { slots, used: 0 })
    }

    /// Shared access to the segment behind a ref.
    pub fn get(&self, seg: SegmentRef) -> &Segment {
        &self.slots[seg.index()]
    }

    /// Mutable access to the segment behind a ref.
    pub fn get_mut(&mut self, seg: SegmentRef) -> &mut Segment {
        &mut self.slots[seg.index()]
    }

    /// Count of in-use slots (live list entries).
    pub fn used(&self) -> usize {
        self.used
    }

    /// Total slot capacity.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Double the capacity if the arena is more than 3/4 full.
    ///
    /// New tail slots are vacant defaults. On `OutOfMemory` the arena
    /// is unchanged.
    pub fn grow_if_needed(&mut self) -> Result<(), PoolError> {
        if self.used * FILL_FACTOR_DEN <= self.slots.len() * FILL_FACTOR_NUM {
            return Ok(());
        }
        let target = self.slots.len() * GROWTH_FACTOR;
        self.slots
            .try_reserve_exact(target - self.slots.len())
            .map_err(|_| PoolError::OutOfMemory)?;
        self.slots.resize_with(target, Segment::default);
        Ok(())
    }

    /// Claim a vacant slot and return its ref.
    ///
    /// The slot comes back in default state with `in_use` set; the
    /// caller fills in offset and size. Callers must have run
    /// [`SegmentArena::grow_if_needed`] first — after the growth check
    /// at least a quarter of the capacity is vacant.
    pub fn acquire(&mut self) -> SegmentRef {
        let idx = self
            .slots
            .iter()
            .position(|s| !s.in_use)
            .expect("segment arena holds a vacant slot after the growth check");
        self.slots[idx].in_use = true;
        self.used += 1;
        SegmentRef(idx as u32)
    }

    /// Return a slot to the vacant state, clearing size and flags.
    pub fn release(&mut self, seg: SegmentRef) {
        let slot = &mut self.slots[seg.index()];
        debug_assert!(slot.in_use, "releasing a vacant arena slot");
        *slot = Segment::default();
        self.used -= 1;
    }

    /// Link `new` into the list immediately after `anchor`.
    pub fn insert_after(&mut self, anchor: SegmentRef, new: SegmentRef) {
        let old_next = self.get(anchor).next;
        {
            let n = self.get_mut(new);
            n.prev = Some(anchor);
            n.next = old_next;
        }
        if let Some(after) = old_next {
            self.get_mut(after).prev = Some(new);
        }
        self.get_mut(anchor).next = Some(new);
    }

    /// Detach `seg` from the list, splicing its neighbours together.
    ///
    /// The slot itself stays in use; pair with
    /// [`SegmentArena::release`] to destroy it.
    pub fn unlink(&mut self, seg: SegmentRef) {
        let (prev, next) = {
            let s = self.get(seg);
            (s.prev, s.next)
        };
        if let Some(p) = prev {
            self.get_mut(p).next = next;
        }
        if let Some(n) = next {
            self.get_mut(n).prev = prev;
        }
        let s = self.get_mut(seg);
        s.prev = None;
        s.next = None;
    }

    /// Raw slot storage, vacant slots included. Test-only diagnostics.
    #[cfg(test)]
    pub(crate) fn slots(&self) -> &[Segment] {
        &self.slots
    }

    /// Iterate the list in address order starting from `head`.
    pub fn iter_from(&self, head: SegmentRef) -> SegmentIter<'_> {
        SegmentIter {
            arena: self,
            cursor: Some(head),
        }
    }
}

/// Address-order iterator over a segment list.
///
/// Yields `(ref, segment)` pairs following `next` links from the head.
pub struct SegmentIter<'a> {
    arena: &'a SegmentArena,
    cursor: Option<SegmentRef>,
}

impl<'a> Iterator for SegmentIter<'a> {
    type Item = (SegmentRef, &'a Segment);

    fn next(&mut self) -> Option<Self::Item> {
        let seg = self.cursor?;
        let record = self.arena.get(seg);
        self.cursor = record.next;
        Some((seg, record))
    }
}
