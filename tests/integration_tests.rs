mod common;

use common::{
    all_variants, brute_force_circle, brute_force_rectangle, build, clustered_points,
    init_logging, random_points, sorted,
};
use proximity_search::{
    CacheLifetime, IndexKind, MemoizedSearch, PointId, RTreeSearch, SearchBuilder, SpatialSearch,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::ops::ControlFlow;

const SCENARIO: [(f64, f64); 4] = [(0.0, 0.0), (3.0, 0.0), (0.0, 4.0), (10.0, 10.0)];

#[test]
fn test_scenario_every_variant() {
    init_logging();

    for (label, mut search) in all_variants(&SCENARIO) {
        assert_eq!(
            sorted(search.circle_by_xy(0.0, 0.0, 5.0)),
            vec![0, 1, 2],
            "{}",
            label
        );
        assert_eq!(sorted(search.circle_by_id(0, 3.0)), vec![0, 1], "{}", label);
        assert_eq!(
            sorted(search.circle_by_id(0, 5.0)),
            vec![0, 1, 2],
            "{}",
            label
        );
        assert_eq!(
            sorted(search.rectangle(3.0, 4.0, 0.0, 0.0)),
            vec![0, 1, 2],
            "{}",
            label
        );
    }
}

#[test]
fn test_circle_queries_match_brute_force() {
    init_logging();
    let points = clustered_points(11, 25, 40);
    let mut rng = ChaCha8Rng::seed_from_u64(12);

    for (label, mut search) in all_variants(&points) {
        for _ in 0..200 {
            let center = (rng.random_range(-5.0..205.0), rng.random_range(-5.0..85.0));
            let radius = rng.random_range(0.0..30.0);
            assert_eq!(
                sorted(search.circle_by_xy(center.0, center.1, radius)),
                brute_force_circle(&points, center, radius),
                "{} center {:?} r {}",
                label,
                center,
                radius
            );
        }
    }
}

#[test]
fn test_rectangle_queries_match_brute_force() {
    init_logging();
    let points = random_points(21, 800, 100.0, 40.0);
    let mut rng = ChaCha8Rng::seed_from_u64(22);

    for (label, mut search) in all_variants(&points) {
        for _ in 0..200 {
            let a = (rng.random_range(0.0..100.0), rng.random_range(0.0..40.0));
            let w = rng.random_range(0.0..20.0);
            let h = rng.random_range(0.0..20.0);
            let b = (a.0 + w, a.1 - h);
            assert_eq!(
                sorted(search.rectangle(a.0, a.1, b.0, b.1)),
                brute_force_rectangle(&points, a, b),
                "{} corners {:?} {:?}",
                label,
                a,
                b
            );
        }
    }
}

#[test]
fn test_rectangle_boundary_points_included() {
    let points = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.5, 0.5)];

    for (label, mut search) in all_variants(&points) {
        assert_eq!(
            sorted(search.rectangle(0.0, 0.0, 1.0, 1.0)),
            vec![0, 1, 2, 3, 4],
            "{}",
            label
        );
    }
}

#[test]
fn test_monotonic_in_radius() {
    init_logging();
    let points = random_points(31, 500, 60.0, 60.0);
    let mut search = build(IndexKind::RTree, true, &points);

    for anchor in [0, 17, 250, 499] {
        let mut previous: Vec<usize> = Vec::new();
        for step in 0..40 {
            let radius = step as f64 * 1.5;
            let current = sorted(search.circle_by_id(anchor, radius));
            assert!(
                previous.iter().all(|id| current.binary_search(id).is_ok()),
                "anchor {} lost members growing to r={}",
                anchor,
                radius
            );
            assert!(current.contains(&anchor));
            previous = current;
        }
    }
}

#[test]
fn test_cache_is_transparent() {
    init_logging();
    let points = clustered_points(41, 20, 30);
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    let mut plain = build(IndexKind::RTree, false, &points);
    let mut cached = build(IndexKind::RTree, true, &points);

    for _ in 0..60 {
        let anchor = rng.random_range(0..points.len());
        // Radii on a 0.25 grid: either identical or farther apart than the
        // cache's radius tolerance.
        for _ in 0..12 {
            let radius = rng.random_range(0..120) as f64 * 0.25;
            assert_eq!(
                sorted(cached.circle_by_id(anchor, radius)),
                sorted(plain.circle_by_id(anchor, radius)),
                "anchor {} r {}",
                anchor,
                radius
            );
        }
    }

    let stats = cached.stats();
    assert!(stats.cache_hits > 0);
    assert!(stats.cache_splits > 0);
    assert!(stats.cache_extensions > 0);
    assert!(stats.cached_anchors <= 60);
}

#[test]
fn test_cache_over_sorted_axis_is_transparent() {
    let points = random_points(51, 300, 30.0, 30.0);
    let mut plain = build(IndexKind::SortedAxis, false, &points);
    let mut cached = MemoizedSearch::new(build(IndexKind::SortedAxis, false, &points));

    for anchor in (0..points.len()).step_by(7) {
        for radius in [4.0, 1.0, 9.5, 2.5, 9.5, 0.0, 12.0] {
            assert_eq!(
                sorted(cached.circle_by_id(anchor, radius)),
                sorted(plain.circle_by_id(anchor, radius)),
                "anchor {} r {}",
                anchor,
                radius
            );
        }
    }
}

#[test]
fn test_round_trip_max_distance_returns_everything() {
    let points = random_points(61, 60, 25.0, 10.0);

    let mut max_sq = 0.0f64;
    for a in &points {
        for b in &points {
            let (dx, dy) = (a.0 - b.0, a.1 - b.1);
            max_sq = max_sq.max(dx * dx + dy * dy);
        }
    }
    // Rounded up so that radius * radius covers the farthest pair.
    let radius = max_sq.sqrt().next_up();

    for (label, mut search) in all_variants(&points) {
        for anchor in 0..points.len() {
            assert_eq!(
                search.circle_by_id(anchor, radius).len(),
                points.len(),
                "{} anchor {}",
                label,
                anchor
            );
        }
    }
}

#[test]
fn test_threshold_boundary() {
    init_logging();
    let points = random_points(71, 400, 50.0, 20.0);

    let mut rtree = RTreeSearch::new();
    for &(x, y) in &points {
        rtree.add_point(x, y);
    }
    rtree.prepare();
    let threshold = rtree.threshold().expect("prepared");
    assert!(threshold > 0.0);

    let at = threshold / 2.0;
    let below = at * (1.0 - 1e-9);
    let above = at * (1.0 + 1e-9);
    let center = points[3];

    let tree_before = rtree.stats().tree_queries;
    for radius in [below, at] {
        assert_eq!(
            sorted(rtree.circle_by_xy(center.0, center.1, radius)),
            brute_force_circle(&points, center, radius)
        );
    }
    assert_eq!(rtree.stats().tree_queries, tree_before + 2);

    let scan_before = rtree.stats().scan_queries;
    assert_eq!(
        sorted(rtree.circle_by_xy(center.0, center.1, above)),
        brute_force_circle(&points, center, above)
    );
    assert_eq!(rtree.stats().scan_queries, scan_before + 1);

    // Rectangles switch on their longer side. Anchored at the origin so the
    // side length is exactly `side`.
    let tree_before = rtree.stats().tree_queries;
    let scan_before = rtree.stats().scan_queries;
    for side in [threshold * (1.0 - 1e-9), threshold, threshold * (1.0 + 1e-9)] {
        assert_eq!(
            sorted(rtree.rectangle(0.0, 0.0, side, side / 3.0)),
            brute_force_rectangle(&points, (0.0, 0.0), (side, side / 3.0))
        );
    }
    assert_eq!(rtree.stats().tree_queries, tree_before + 2);
    assert_eq!(rtree.stats().scan_queries, scan_before + 1);
}

type Query = fn(&mut dyn SpatialSearch, &mut dyn FnMut(PointId) -> ControlFlow<()>);

fn small_circle(search: &mut dyn SpatialSearch, visit: &mut dyn FnMut(PointId) -> ControlFlow<()>) {
    search.search_circle_by_xy(20.0, 20.0, 4.0, visit)
}

fn large_circle(search: &mut dyn SpatialSearch, visit: &mut dyn FnMut(PointId) -> ControlFlow<()>) {
    search.search_circle_by_xy(20.0, 20.0, 30.0, visit)
}

fn whole_rectangle(search: &mut dyn SpatialSearch, visit: &mut dyn FnMut(PointId) -> ControlFlow<()>) {
    search.search_rectangle(0.0, 0.0, 40.0, 40.0, visit)
}

fn anchored_circle(search: &mut dyn SpatialSearch, visit: &mut dyn FnMut(PointId) -> ControlFlow<()>) {
    search.search_circle_by_id(0, 25.0, visit)
}

/// Runs `query` with a visitor that breaks on the `k`-th hit.
fn hits_until_break(search: &mut dyn SpatialSearch, k: usize, query: Query) -> usize {
    let mut seen = 0;
    query(search, &mut |_| {
        seen += 1;
        if seen == k {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });
    seen
}

#[test]
fn test_early_termination_every_path() {
    init_logging();
    let points = random_points(81, 500, 40.0, 40.0);
    let queries: [(&str, Query); 4] = [
        ("small circle", small_circle as Query),
        ("large circle", large_circle as Query),
        ("rectangle", whole_rectangle as Query),
        ("anchored circle", anchored_circle as Query),
    ];

    for (label, mut search) in all_variants(&points) {
        for k in [1, 3] {
            for (name, query) in queries {
                assert_eq!(hits_until_break(&mut *search, k, query), k, "{} {}", label, name);
            }
            // Again now that the anchored query is cached.
            assert_eq!(
                hits_until_break(&mut *search, k, anchored_circle),
                k,
                "{} cached",
                label
            );
        }
    }
}

#[test]
fn test_sorted_axis_matches_rtree() {
    let points = clustered_points(91, 15, 50);
    let mut rng = ChaCha8Rng::seed_from_u64(92);
    let mut rtree = build(IndexKind::RTree, false, &points);
    let mut axis = build(IndexKind::SortedAxis, false, &points);

    for _ in 0..300 {
        let anchor = rng.random_range(0..points.len());
        let radius = rng.random_range(0.0..40.0);
        assert_eq!(
            sorted(axis.circle_by_id(anchor, radius)),
            sorted(rtree.circle_by_id(anchor, radius))
        );

        let (x, y) = points[anchor];
        let (w, h) = (rng.random_range(0.0..30.0), rng.random_range(0.0..30.0));
        assert_eq!(
            sorted(axis.rectangle(x - w, y - h, x + w, y + h)),
            sorted(rtree.rectangle(x - w, y - h, x + w, y + h))
        );
    }
}

#[test]
fn test_cache_lifetime_via_builder() {
    let points = random_points(101, 100, 10.0, 10.0);

    let mut per_iteration = SearchBuilder::new()
        .cache_lifetime(CacheLifetime::PerIteration)
        .points(points.iter().copied())
        .build()
        .expect("Failed to build searcher");
    let mut persistent = SearchBuilder::new()
        .points(points.iter().copied())
        .build()
        .expect("Failed to build searcher");

    for day in 0..3 {
        per_iteration.begin_iteration();
        persistent.begin_iteration();
        for anchor in 0..10 {
            per_iteration.circle_by_id(anchor, 2.0);
            persistent.circle_by_id(anchor, 2.0);
        }
        assert_eq!(per_iteration.stats().cache_misses, 10 * (day + 1));
        assert_eq!(persistent.stats().cache_misses, 10);
        assert_eq!(persistent.stats().cache_hits, 10 * day);
    }
}

#[test]
fn test_duplicate_points() {
    let points = vec![(5.0, 5.0); 8];

    for (label, mut search) in all_variants(&points) {
        assert_eq!(search.circle_by_id(3, 0.0).len(), 8, "{}", label);
        assert_eq!(search.rectangle(5.0, 5.0, 5.0, 5.0).len(), 8, "{}", label);
        assert!(search.circle_by_xy(6.0, 6.0, 1.0).is_empty(), "{}", label);
    }
}

#[test]
fn test_collinear_points_use_scan() {
    // All on one diagonal: the oriented box has zero width, so every query
    // with positive radius scans.
    let points: Vec<(f64, f64)> = (0..50).map(|i| (i as f64, i as f64 * 0.5)).collect();
    let mut search = build(IndexKind::RTree, false, &points);

    assert_eq!(
        sorted(search.circle_by_xy(10.0, 5.0, 2.3)),
        brute_force_circle(&points, (10.0, 5.0), 2.3)
    );
    assert_eq!(search.stats().scan_queries, 1);
    assert_eq!(search.stats().tree_queries, 0);
}

#[test]
fn test_bounds_and_location() {
    let search = build(IndexKind::SortedAxis, true, &SCENARIO);
    let bounds = search.bounds().expect("non-empty");
    assert_eq!((bounds.min().x, bounds.min().y), (0.0, 0.0));
    assert_eq!((bounds.max().x, bounds.max().y), (10.0, 10.0));
    assert_eq!(search.location(2).map(|c| (c.x, c.y)), Some((0.0, 4.0)));
    assert!(search.location(4).is_none());
}
