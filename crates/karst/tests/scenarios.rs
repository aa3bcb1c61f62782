//! End-to-end scenarios exercised through the public API.
//!
//! These tests drive a registry the way a client would — open pools,
//! interleave allocations and releases, inspect — and check the
//! externally observable contract: segment layout, counters, error
//! behaviour, and handle validity across bookkeeping growth.

use karst::prelude::*;

fn ready() -> Registry {
    let mut registry = Registry::new();
    registry.init().unwrap();
    registry
}

/// Sizes and flags from an inspection dump, for compact assertions.
fn layout(registry: &Registry, pool: PoolId) -> Vec<(usize, bool)> {
    registry
        .inspect(pool)
        .unwrap()
        .iter()
        .map(|s| (s.size, s.allocated))
        .collect()
}

#[test]
fn hundred_byte_walkthrough() {
    let mut registry = ready();
    let pool = registry.open(100, PlacementPolicy::BestFit).unwrap();
    assert_eq!(layout(&registry, pool), vec![(100, false)]);

    let a = registry.allocate(pool, 40).unwrap();
    assert_eq!(layout(&registry, pool), vec![(40, true), (60, false)]);

    let b = registry.allocate(pool, 20).unwrap();
    assert_eq!(
        layout(&registry, pool),
        vec![(40, true), (20, true), (40, false)]
    );

    // Releasing the first allocation leaves two 40-byte gaps.
    registry.release(pool, a).unwrap();
    assert_eq!(
        layout(&registry, pool),
        vec![(40, false), (20, true), (40, false)]
    );
    assert_eq!(registry.pool(pool).unwrap().gap_count(), 2);

    // The size tie between the two gaps breaks by offset: a best-fit
    // allocation of 40 bytes must land at offset 0, not 60.
    let c = registry.allocate(pool, 40).unwrap();
    assert_eq!(c.offset(), 0);
    registry.release(pool, c).unwrap();

    // Releasing the last allocation coalesces across all three
    // segments.
    registry.release(pool, b).unwrap();
    assert_eq!(layout(&registry, pool), vec![(100, false)]);
    let stats = registry.pool(pool).unwrap();
    assert_eq!(stats.gap_count(), 1);
    assert_eq!(stats.allocation_count(), 0);
    assert_eq!(stats.allocated_bytes(), 0);

    registry.close(pool).unwrap();
    registry.shutdown().unwrap();
}

#[test]
fn policies_agree_when_only_one_gap_fits() {
    // Build the same fragmented layout under each policy:
    // [0..10) free, [10..30) alloc, [30..50) free, [50..60) alloc,
    // [60..100) free — then shrink the big gap so only [30..50) can
    // hold a 20-byte request.
    for policy in [PlacementPolicy::FirstFit, PlacementPolicy::BestFit] {
        let mut registry = ready();
        let pool = registry.open(100, policy).unwrap();
        let a = registry.allocate(pool, 10).unwrap();
        let _b = registry.allocate(pool, 20).unwrap();
        let c = registry.allocate(pool, 20).unwrap();
        let _d = registry.allocate(pool, 10).unwrap();
        let _tail = registry.allocate(pool, 25).unwrap();
        registry.release(pool, a).unwrap();
        registry.release(pool, c).unwrap();
        // Gaps now: 10 bytes at 0, 20 bytes at 30, 15 bytes at 85.
        let h = registry.allocate(pool, 20).unwrap();
        assert_eq!(h.offset(), 30, "policy {policy} picked the wrong gap");
    }
}

#[test]
fn exact_fill_then_out_of_space() {
    let mut registry = ready();
    let pool = registry.open(100, PlacementPolicy::BestFit).unwrap();

    let h = registry.allocate(pool, 100).unwrap();
    assert_eq!(layout(&registry, pool), vec![(100, true)]);
    assert_eq!(registry.pool(pool).unwrap().gap_count(), 0);

    assert_eq!(
        registry.allocate(pool, 1),
        Err(RegistryError::Pool {
            pool,
            reason: PoolError::OutOfSpace { requested: 1 },
        })
    );

    registry.release(pool, h).unwrap();
    assert_eq!(registry.pool(pool).unwrap().gap_count(), 1);
}

#[test]
fn close_refused_while_allocations_live() {
    let mut registry = ready();
    let pool = registry.open(100, PlacementPolicy::FirstFit).unwrap();
    let h = registry.allocate(pool, 30).unwrap();

    assert_eq!(
        registry.close(pool),
        Err(RegistryError::Pool {
            pool,
            reason: PoolError::NotEmpty { live_allocs: 1 },
        })
    );

    // The pool survived the refusal intact.
    assert_eq!(layout(&registry, pool), vec![(30, true), (70, false)]);
    let g = registry.allocate(pool, 10).unwrap();
    registry.release(pool, h).unwrap();
    registry.release(pool, g).unwrap();
    registry.close(pool).unwrap();
}

#[test]
fn handles_survive_arena_growth() {
    // Interleaved allocate/release cycles that keep well over 30
    // segments live, pushing the 40-slot arena past its 3/4 fill
    // factor mid-lifetime. Early handles must stay valid throughout.
    let mut registry = ready();
    let pool = registry.open(4096, PlacementPolicy::BestFit).unwrap();

    let early: Vec<AllocHandle> = (0..10)
        .map(|_| registry.allocate(pool, 8).unwrap())
        .collect();

    let mut churn = Vec::new();
    for round in 0..40 {
        churn.push(registry.allocate(pool, 16).unwrap());
        if round % 3 == 2 {
            let h = churn.swap_remove(0);
            registry.release(pool, h).unwrap();
        }
    }
    assert!(registry.pool(pool).unwrap().segment_count() > 30);
    assert!(registry.pool(pool).unwrap().node_capacity() > 40);

    // Every handle issued before and during growth still resolves.
    for h in early {
        assert_eq!(registry.pool(pool).unwrap().slice(h).unwrap().len(), 8);
        registry.release(pool, h).unwrap();
    }
    for h in churn {
        registry.release(pool, h).unwrap();
    }
    assert_eq!(layout(&registry, pool), vec![(4096, false)]);
}

#[test]
fn payloads_survive_bookkeeping_growth() {
    let mut registry = ready();
    let pool = registry.open(4096, PlacementPolicy::FirstFit).unwrap();

    let marked = registry.allocate(pool, 32).unwrap();
    registry
        .pool_mut(pool)
        .unwrap()
        .slice_mut(marked)
        .unwrap()
        .copy_from_slice(&[0x5A; 32]);

    // Enough live allocations to grow the arena twice.
    let fill: Vec<AllocHandle> = (0..70)
        .map(|_| registry.allocate(pool, 4).unwrap())
        .collect();
    assert!(registry.pool(pool).unwrap().node_capacity() >= 160);

    let bytes = registry.pool(pool).unwrap().slice(marked).unwrap();
    assert!(bytes.iter().all(|&b| b == 0x5A));

    for h in fill {
        registry.release(pool, h).unwrap();
    }
    registry.release(pool, marked).unwrap();
    assert_eq!(layout(&registry, pool), vec![(4096, false)]);
}

#[test]
fn drain_orders_all_coalesce_to_one_gap() {
    for order in [
        vec![0, 1, 2, 3, 4],
        vec![4, 3, 2, 1, 0],
        vec![2, 0, 4, 1, 3],
        vec![1, 4, 0, 3, 2],
    ] {
        let mut registry = ready();
        let pool = registry.open(500, PlacementPolicy::BestFit).unwrap();
        let handles: Vec<AllocHandle> = (0..5)
            .map(|i| registry.allocate(pool, 50 + i * 10).unwrap())
            .collect();
        for i in order {
            registry.release(pool, handles[i]).unwrap();
        }
        assert_eq!(layout(&registry, pool), vec![(500, false)]);
        registry.close(pool).unwrap();
        registry.shutdown().unwrap();
    }
}

#[test]
fn released_handles_are_dead_across_the_registry() {
    let mut registry = ready();
    let pool = registry.open(256, PlacementPolicy::BestFit).unwrap();

    let h = registry.allocate(pool, 64).unwrap();
    registry.release(pool, h).unwrap();
    assert_eq!(
        registry.release(pool, h),
        Err(RegistryError::Pool {
            pool,
            reason: PoolError::BadHandle { offset: 0 },
        })
    );

    // Re-allocating the same range issues a distinct handle; the dead
    // one stays dead.
    let fresh = registry.allocate(pool, 64).unwrap();
    assert_eq!(fresh.offset(), h.offset());
    assert!(registry.release(pool, h).is_err());
    registry.release(pool, fresh).unwrap();
}

#[test]
fn handles_are_scoped_to_their_pool() {
    let mut registry = ready();
    let a = registry.open(10, PlacementPolicy::BestFit).unwrap();
    let b = registry.open(10, PlacementPolicy::BestFit).unwrap();

    // Both pools' first handles sit at offset 0 with the same stamp.
    let ha = registry.allocate(a, 5).unwrap();
    let hb = registry.allocate(b, 3).unwrap();
    assert_eq!(ha.offset(), hb.offset());

    // A's handle presented to B is rejected outright, for release and
    // for byte access alike.
    assert_eq!(
        registry.release(b, ha),
        Err(RegistryError::Pool {
            pool: b,
            reason: PoolError::BadHandle { offset: 0 },
        })
    );
    assert!(registry.pool(b).unwrap().slice(ha).is_err());

    // B's real allocation stays live and readable.
    assert_eq!(registry.pool(b).unwrap().slice(hb).unwrap().len(), 3);
    assert_eq!(registry.pool(b).unwrap().allocation_count(), 1);
    assert_eq!(layout(&registry, b), vec![(3, true), (7, false)]);

    registry.release(a, ha).unwrap();
    registry.release(b, hb).unwrap();
}

#[test]
fn multiple_pools_track_separately() {
    let mut registry = ready();
    let small = registry.open(128, PlacementPolicy::FirstFit).unwrap();
    let large = registry.open(1 << 16, PlacementPolicy::BestFit).unwrap();

    let hs = registry.allocate(small, 100).unwrap();
    let hl = registry.allocate(large, 100).unwrap();
    assert_eq!(registry.pool(small).unwrap().largest_gap(), 28);
    assert_eq!(registry.pool(large).unwrap().largest_gap(), (1 << 16) - 100);

    // Exhaust only the small pool.
    assert!(registry.allocate(small, 50).is_err());
    assert!(registry.allocate(large, 50).is_ok());

    registry.release(small, hs).unwrap();
    registry.release(large, hl).unwrap();
}
