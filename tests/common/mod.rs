#![allow(dead_code)]

use proximity_search::compute::geometry::distance_sq;
use proximity_search::{
    CacheLifetime, Coord, IndexKind, PointId, SearchBuilder, SearchConfig, SpatialSearch,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Uniform random points in `[0, width) x [0, height)`.
pub fn random_points(seed: u64, n: usize, width: f64, height: f64) -> Vec<(f64, f64)> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|_| (rng.random_range(0.0..width), rng.random_range(0.0..height)))
        .collect()
}

/// Points clustered around a few farm-like centers, as in a herd file.
pub fn clustered_points(seed: u64, clusters: usize, per_cluster: usize) -> Vec<(f64, f64)> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut points = Vec::with_capacity(clusters * per_cluster);
    for _ in 0..clusters {
        let cx = rng.random_range(0.0..200.0);
        let cy = rng.random_range(0.0..80.0);
        for _ in 0..per_cluster {
            points.push((
                cx + rng.random_range(-2.0..2.0),
                cy + rng.random_range(-2.0..2.0),
            ));
        }
    }
    points
}

pub fn sorted(mut ids: Vec<PointId>) -> Vec<PointId> {
    ids.sort_unstable();
    ids
}

/// Reference answer: every point within `radius` of `center`.
pub fn brute_force_circle(points: &[(f64, f64)], center: (f64, f64), radius: f64) -> Vec<PointId> {
    let c = Coord {
        x: center.0,
        y: center.1,
    };
    points
        .iter()
        .enumerate()
        .filter(|(_, p)| distance_sq(Coord { x: p.0, y: p.1 }, c) <= radius * radius)
        .map(|(id, _)| id)
        .collect()
}

/// Reference answer: every point in the closed rectangle.
pub fn brute_force_rectangle(
    points: &[(f64, f64)],
    (x1, y1): (f64, f64),
    (x2, y2): (f64, f64),
) -> Vec<PointId> {
    let (lo_x, hi_x) = (x1.min(x2), x1.max(x2));
    let (lo_y, hi_y) = (y1.min(y2), y1.max(y2));
    points
        .iter()
        .enumerate()
        .filter(|(_, p)| lo_x <= p.0 && p.0 <= hi_x && lo_y <= p.1 && p.1 <= hi_y)
        .map(|(id, _)| id)
        .collect()
}

pub fn build(index: IndexKind, memoize: bool, points: &[(f64, f64)]) -> Box<dyn SpatialSearch> {
    let config = SearchConfig::default()
        .with_index(index)
        .with_memoize(memoize)
        .with_cache_lifetime(CacheLifetime::Persistent);
    SearchBuilder::new()
        .config(config)
        .points(points.iter().copied())
        .build()
        .expect("Failed to build searcher")
}

/// Every index kind, with and without the cache.
pub fn all_variants(points: &[(f64, f64)]) -> Vec<(String, Box<dyn SpatialSearch>)> {
    let mut variants = Vec::new();
    for index in [IndexKind::RTree, IndexKind::SortedAxis] {
        for memoize in [false, true] {
            let label = format!("{:?} memoize={}", index, memoize);
            variants.push((label, build(index, memoize, points)));
        }
    }
    variants
}
