//! The per-pool manager binding buffer, segment list, and gap index.
//!
//! [`Pool`] is the main type of this crate. It owns one zero-initialised
//! byte buffer of fixed size and the bookkeeping that tiles it:
//!
//! 1. `allocate(n)` — pick a gap per policy, split off an `n`-byte
//!    prefix, hand back an [`AllocHandle`]
//! 2. `slice()` / `slice_mut()` — byte access through a live handle
//! 3. `release(h)` — return the range, eagerly coalescing with free
//!    neighbours
//!
//! Every public operation either completes or fails before mutating, so
//! the structural invariants (buffer tiling, no adjacent gaps, gap-index
//! ordering and bijection, counter consistency) hold on every return.

use karst_core::{PlacementPolicy, PoolInstanceId, SegmentSnapshot};

use crate::config::PoolConfig;
use crate::error::PoolError;
use crate::gap::GapIndex;
use crate::handle::AllocHandle;
use crate::segment::{SegmentArena, SegmentRef};

/// A memory pool: one contiguous byte buffer plus its free-space
/// bookkeeping.
///
/// The buffer is obtained once at construction and never moves or
/// resizes; allocations are contiguous sub-ranges described by the
/// segment list. The segment arena and gap index grow on demand
/// (doubling past 3/4 full) without invalidating outstanding handles.
///
/// Pools are single-threaded values. Distinct pools are independent
/// and may be owned by distinct threads.
pub struct Pool {
    /// Backing storage, zero-initialised at construction.
    buffer: Vec<u8>,
    /// Slot storage for the segment list.
    arena: SegmentArena,
    /// Size-ordered index of the free segments.
    gaps: GapIndex,
    /// First segment in address order (offset 0). Never destroyed:
    /// it has no left neighbour, so coalescing cannot absorb it.
    head: SegmentRef,
    /// Placement policy, fixed at construction.
    policy: PlacementPolicy,
    /// Buffer size in bytes.
    total_size: usize,
    /// Sum of sizes of allocated segments.
    alloc_size: usize,
    /// Count of allocated segments.
    num_allocs: usize,
    /// Next allocation stamp. Starts at 1; 0 marks a free segment.
    next_stamp: u64,
    /// Identity of this pool value, recorded in every issued handle.
    instance: PoolInstanceId,
}

impl Pool {
    /// Open a pool of `size` bytes with default capacities.
    ///
    /// Returns `ZeroSized` for an empty buffer and `OutOfMemory` if the
    /// host allocator refuses any of the three reservations.
    pub fn new(size: usize, policy: PlacementPolicy) -> Result<Self, PoolError> {
        Self::with_config(size, PoolConfig::new(policy))
    }

    /// Open a pool of `size` bytes with explicit capacities.
    pub fn with_config(size: usize, config: PoolConfig) -> Result<Self, PoolError> {
        if size == 0 {
            return Err(PoolError::ZeroSized);
        }
        if config.initial_node_capacity == 0 || config.initial_gap_capacity == 0 {
            return Err(PoolError::InvalidConfig {
                reason: "initial capacities must be at least 1".to_string(),
            });
        }

        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(size)
            .map_err(|_| PoolError::OutOfMemory)?;
        buffer.resize(size, 0);

        let mut arena = SegmentArena::with_capacity(config.initial_node_capacity)?;
        let mut gaps = GapIndex::with_capacity(config.initial_gap_capacity)?;

        // One free segment spanning the whole buffer.
        let head = arena.acquire();
        {
            let s = arena.get_mut(head);
            s.offset = 0;
            s.size = size;
        }
        gaps.insert(&arena, head);

        Ok(Self {
            buffer,
            arena,
            gaps,
            head,
            policy: config.policy,
            total_size: size,
            alloc_size: 0,
            num_allocs: 0,
            next_stamp: 1,
            instance: PoolInstanceId::next(),
        })
    }

    /// Allocate `size` bytes from the pool.
    ///
    /// The chosen gap follows the pool's [`PlacementPolicy`]; a strict
    /// remainder stays free as a new gap immediately after the
    /// allocation. Fails with `ZeroSized` for an empty request,
    /// `OutOfSpace` when no gap is large enough, and `OutOfMemory` if
    /// the bookkeeping arrays cannot grow — in every failure case the
    /// pool is unchanged.
    pub fn allocate(&mut self, size: usize) -> Result<AllocHandle, PoolError> {
        if size == 0 {
            return Err(PoolError::ZeroSized);
        }
        if self.gaps.is_empty() {
            return Err(PoolError::OutOfSpace { requested: size });
        }

        // Reserve first: every fallible step runs before any mutation.
        self.arena.grow_if_needed()?;
        self.gaps.ensure_capacity()?;

        let seg = match self.policy {
            PlacementPolicy::FirstFit => self.first_fit(size),
            PlacementPolicy::BestFit => self.gaps.best_fit(size),
        }
        .ok_or(PoolError::OutOfSpace { requested: size })?;

        self.gaps.remove(seg);

        let remainder = self.arena.get(seg).size() - size;
        if remainder > 0 {
            let tail = self.arena.acquire();
            let tail_offset = self.arena.get(seg).offset() + size;
            {
                let t = self.arena.get_mut(tail);
                t.offset = tail_offset;
                t.size = remainder;
            }
            self.arena.insert_after(seg, tail);
            self.gaps.insert(&self.arena, tail);
        }

        let stamp = self.next_stamp;
        self.next_stamp += 1;
        let offset = {
            let s = self.arena.get_mut(seg);
            s.size = size;
            s.allocated = true;
            s.stamp = stamp;
            s.offset
        };

        self.num_allocs += 1;
        self.alloc_size += size;

        Ok(AllocHandle::new(offset, size, stamp, self.instance))
    }

    /// Release a live allocation, coalescing with free neighbours.
    ///
    /// The handle is validated structurally: it must have been issued
    /// by this pool and name an allocated segment whose offset and
    /// stamp both match, so double releases, handles whose range has
    /// since been re-allocated, and handles from other pools all fail
    /// with `BadHandle` instead of corrupting the pool.
    pub fn release(&mut self, handle: AllocHandle) -> Result<(), PoolError> {
        let seg = self.find_segment(handle).ok_or(PoolError::BadHandle {
            offset: handle.offset(),
        })?;

        // The coalesced survivor re-enters the gap index; reserve its
        // slot before mutating anything.
        self.gaps.ensure_capacity()?;

        let size = {
            let s = self.arena.get_mut(seg);
            s.allocated = false;
            s.stamp = 0;
            s.size
        };
        self.num_allocs -= 1;
        self.alloc_size -= size;

        let survivor = self.coalesce(seg);
        self.gaps.insert(&self.arena, survivor);
        Ok(())
    }

    /// Read access to the bytes of a live allocation.
    pub fn slice(&self, handle: AllocHandle) -> Result<&[u8], PoolError> {
        let seg = self.find_segment(handle).ok_or(PoolError::BadHandle {
            offset: handle.offset(),
        })?;
        let s = self.arena.get(seg);
        Ok(&self.buffer[s.offset()..s.offset() + s.size()])
    }

    /// Write access to the bytes of a live allocation.
    pub fn slice_mut(&mut self, handle: AllocHandle) -> Result<&mut [u8], PoolError> {
        let seg = self.find_segment(handle).ok_or(PoolError::BadHandle {
            offset: handle.offset(),
        })?;
        let s = self.arena.get(seg);
        let (offset, size) = (s.offset(), s.size());
        Ok(&mut self.buffer[offset..offset + size])
    }

    /// Snapshot every segment in address order.
    ///
    /// The only failure is host-allocator refusal while sizing the
    /// output vector.
    pub fn inspect(&self) -> Result<Vec<SegmentSnapshot>, PoolError> {
        let mut out = Vec::new();
        out.try_reserve_exact(self.arena.used())
            .map_err(|_| PoolError::OutOfMemory)?;
        out.extend(self.arena.iter_from(self.head).map(|(_, s)| SegmentSnapshot {
            size: s.size(),
            allocated: s.is_allocated(),
        }));
        Ok(out)
    }

    /// Buffer size in bytes.
    pub fn total_size(&self) -> usize {
        self.total_size
    }

    /// Sum of sizes of live allocations.
    pub fn allocated_bytes(&self) -> usize {
        self.alloc_size
    }

    /// Count of live allocations.
    pub fn allocation_count(&self) -> usize {
        self.num_allocs
    }

    /// Whether the pool has no live allocations.
    pub fn is_empty(&self) -> bool {
        self.num_allocs == 0
    }

    /// Count of gaps (free segments).
    pub fn gap_count(&self) -> usize {
        self.gaps.len()
    }

    /// Size of the largest gap, or 0 when the pool is exactly full.
    pub fn largest_gap(&self) -> usize {
        self.gaps.largest().unwrap_or(0)
    }

    /// The pool's placement policy.
    pub fn policy(&self) -> PlacementPolicy {
        self.policy
    }

    /// Count of live segments (allocated + free).
    pub fn segment_count(&self) -> usize {
        self.arena.used()
    }

    /// Current slot capacity of the segment arena.
    pub fn node_capacity(&self) -> usize {
        self.arena.capacity()
    }

    /// Current entry capacity of the gap index.
    pub fn gap_capacity(&self) -> usize {
        self.gaps.capacity()
    }

    /// First free segment with `size >= min_size` in address order.
    fn first_fit(&self, min_size: usize) -> Option<SegmentRef> {
        self.arena
            .iter_from(self.head)
            .find(|(_, s)| !s.is_allocated() && s.size() >= min_size)
            .map(|(seg, _)| seg)
    }

    /// Live allocated segment matching the handle's offset and stamp.
    ///
    /// Handles issued by a different pool never match, even when this
    /// pool holds an allocation of identical shape.
    fn find_segment(&self, handle: AllocHandle) -> Option<SegmentRef> {
        if handle.pool != self.instance {
            return None;
        }
        self.arena
            .iter_from(self.head)
            .find(|(_, s)| {
                s.is_allocated() && s.offset() == handle.offset && s.stamp == handle.stamp
            })
            .map(|(seg, _)| seg)
    }

    /// Merge a freed segment with its free neighbours.
    ///
    /// `seg` must be free and already out of the gap index. Absorbs the
    /// right neighbour first, then lets the left neighbour absorb the
    /// result, so the survivor is always the left-most of the merged
    /// run. Neighbours leave the gap index here; the caller reinserts
    /// the survivor exactly once.
    fn coalesce(&mut self, seg: SegmentRef) -> SegmentRef {
        if let Some(next) = self.arena.get(seg).next {
            if self.arena.get(next).is_gap() {
                self.gaps.remove(next);
                let absorbed = self.arena.get(next).size();
                self.arena.get_mut(seg).size += absorbed;
                self.arena.unlink(next);
                self.arena.release(next);
            }
        }
        if let Some(prev) = self.arena.get(seg).prev {
            if self.arena.get(prev).is_gap() {
                self.gaps.remove(prev);
                let absorbed = self.arena.get(seg).size();
                self.arena.get_mut(prev).size += absorbed;
                self.arena.unlink(seg);
                self.arena.release(seg);
                return prev;
            }
        }
        seg
    }
}

#[cfg(test)]
impl Pool {
    /// Check every structural invariant, panicking on violation.
    ///
    /// Walks the full segment list and gap index: buffer tiling,
    /// link symmetry, eager coalescing, gap-index ordering and
    /// bijection, and counter consistency.
    pub(crate) fn assert_invariants(&self) {
        let walked: Vec<_> = self.arena.iter_from(self.head).collect();

        let mut expected_offset = 0;
        let mut prev_ref: Option<SegmentRef> = None;
        let mut free_count = 0;
        let mut alloc_bytes = 0;
        let mut alloc_count = 0;
        let mut prev_free = false;
        for &(seg, s) in &walked {
            assert!(s.in_use, "listed segment is in use");
            assert_eq!(s.offset, expected_offset, "segments tile the buffer");
            assert_eq!(s.prev, prev_ref, "prev links mirror next links");
            assert!(s.size > 0, "no zero-sized segments");
            if s.allocated {
                alloc_bytes += s.size;
                alloc_count += 1;
                prev_free = false;
            } else {
                assert!(!prev_free, "no two adjacent free segments");
                free_count += 1;
                prev_free = true;
            }
            expected_offset += s.size;
            prev_ref = Some(seg);
        }
        assert_eq!(expected_offset, self.total_size, "sizes sum to total_size");

        assert_eq!(free_count, self.gaps.len(), "gap count matches index");
        assert_eq!(alloc_bytes, self.alloc_size, "alloc_size matches list");
        assert_eq!(alloc_count, self.num_allocs, "num_allocs matches list");

        let entries = self.gaps.entries();
        for pair in entries.windows(2) {
            let a = (pair[0].size(), self.arena.get(pair[0].seg()).offset());
            let b = (pair[1].size(), self.arena.get(pair[1].seg()).offset());
            assert!(a < b, "gap index strictly ordered by (size, offset)");
        }
        for e in entries {
            let s = self.arena.get(e.seg());
            assert!(s.is_gap(), "gap entry references a free segment");
            assert_eq!(e.size(), s.size(), "gap entry size matches segment");
        }

        assert_eq!(walked.len(), self.arena.used(), "every in-use slot is listed");
        let in_use_slots = self.arena.slots().iter().filter(|s| s.in_use).count();
        assert_eq!(in_use_slots, self.arena.used(), "used count matches slots");
        assert!(self.arena.used() <= self.arena.capacity());
    }
}
