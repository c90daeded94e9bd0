//! Memoizing wrapper around any [`SpatialSearch`].
//!
//! Only `search_circle_by_id` is cached. The simulation asks the same
//! anchors for the same few radii day after day, so each anchor's results are
//! kept in a [`RadiusList`] and later queries are answered by:
//!
//! - an exact hit on a cached radius (within the radius tolerance),
//! - splitting the next larger bucket, re-testing only that bucket's ring,
//! - or querying the wrapped index once and keeping only the ids beyond the
//!   largest cached radius.
//!
//! The cache is updated before the visitor runs, so a visitor that breaks
//! early never leaves a half-built bucket behind.

use super::cache::{Lookup, ProximityCache, RadiusList};
use crate::compute::validation::validate_radius;
use crate::config::{CacheLifetime, SearchConfig};
use crate::search::{PointId, SearchStats, SpatialSearch, Visitor};
use geo::{Coord, Rect};
use std::ops::ControlFlow;

#[derive(Debug, Clone, Copy, Default)]
struct CacheCounters {
    hits: u64,
    splits: u64,
    extensions: u64,
    misses: u64,
}

/// Radius memoization over an exact index.
///
/// # Examples
///
/// ```
/// use proximity_search::{MemoizedSearch, RTreeSearch, SpatialSearch};
///
/// let mut search = MemoizedSearch::new(RTreeSearch::new());
/// search.add_point(0.0, 0.0);
/// search.add_point(3.0, 0.0);
/// search.add_point(0.0, 4.0);
/// search.add_point(10.0, 10.0);
/// search.prepare();
///
/// let mut near = search.circle_by_id(0, 3.0);
/// near.sort_unstable();
/// assert_eq!(near, vec![0, 1]);
///
/// let mut wider = search.circle_by_id(0, 5.0);
/// wider.sort_unstable();
/// assert_eq!(wider, vec![0, 1, 2]);
/// assert_eq!(search.stats().cache_extensions, 1);
/// ```
#[derive(Debug)]
pub struct MemoizedSearch<S: SpatialSearch> {
    inner: S,
    cache: ProximityCache,
    lifetime: CacheLifetime,
    radius_tolerance: f64,
    counters: CacheCounters,
}

impl<S: SpatialSearch> MemoizedSearch<S> {
    /// Wraps `inner` with a persistent cache and the default radius tolerance.
    pub fn new(inner: S) -> Self {
        Self::with_config(inner, &SearchConfig::default())
    }

    pub fn with_config(inner: S, config: &SearchConfig) -> Self {
        Self {
            inner,
            cache: ProximityCache::new(),
            lifetime: config.cache_lifetime,
            radius_tolerance: config.tolerances.radius,
            counters: CacheCounters::default(),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    pub fn lifetime(&self) -> CacheLifetime {
        self.lifetime
    }

    pub fn cache(&self) -> &ProximityCache {
        &self.cache
    }

    /// Drops every cached result. Counters are kept.
    pub fn clear_cache(&mut self) {
        log::debug!(
            "Clearing proximity cache: {} anchors, {} buckets",
            self.cache.anchors(),
            self.cache.buckets()
        );
        self.cache.clear();
    }

    /// Runs an uncached query on the wrapped index and collects every hit.
    fn query_inner(inner: &mut S, anchor: PointId, radius: f64) -> Vec<PointId> {
        let mut hits = Vec::new();
        inner.search_circle_by_id(anchor, radius, &mut |id| {
            hits.push(id);
            ControlFlow::Continue(())
        });
        hits
    }

    /// Brings the cache up to date for `(anchor, radius)` and returns the
    /// index of the bucket that answers it.
    fn resolve(&mut self, anchor: PointId, center: Coord<f64>, radius: f64) -> usize {
        let inner = &mut self.inner;
        let Some(list) = self.cache.get_mut(anchor) else {
            let hits = Self::query_inner(inner, anchor, radius);
            log::debug!(
                "New cache entry for point {}: r={} with {} members",
                anchor,
                radius,
                hits.len()
            );
            self.cache.insert(anchor, RadiusList::new(radius, hits));
            self.counters.misses += 1;
            return 0;
        };

        match list.lookup(radius, self.radius_tolerance) {
            Lookup::Hit(k) => {
                log::trace!("Cache hit for point {} at r={}", anchor, radius);
                self.counters.hits += 1;
                k
            }
            Lookup::Split(k) => {
                log::debug!("Splitting cached bucket {} of point {} at r={}", k, anchor, radius);
                list.split(k, radius, center, |id| inner.location(id));
                self.counters.splits += 1;
                k
            }
            Lookup::Extend => {
                let hits = Self::query_inner(inner, anchor, radius);
                log::debug!("Extending cache of point {} to r={}", anchor, radius);
                list.extend(radius, hits, center, |id| inner.location(id));
                self.counters.extensions += 1;
                list.len() - 1
            }
        }
    }
}

impl<S: SpatialSearch> SpatialSearch for MemoizedSearch<S> {
    fn add_point(&mut self, x: f64, y: f64) -> PointId {
        self.inner.add_point(x, y)
    }

    fn prepare(&mut self) {
        self.inner.prepare()
    }

    fn search_circle_by_xy(&mut self, x: f64, y: f64, radius: f64, visit: Visitor<'_>) {
        self.inner.search_circle_by_xy(x, y, radius, visit)
    }

    fn search_circle_by_id(&mut self, id: PointId, radius: f64, visit: Visitor<'_>) {
        if !self.inner.is_prepared() {
            // Let the wrapped index report the lifecycle error.
            self.inner.search_circle_by_id(id, radius, visit);
            return;
        }

        let Some(center) = self.inner.location(id) else {
            panic!(
                "unknown point id {} (index holds {} points)",
                id,
                self.inner.len()
            );
        };

        if let Err(e) = validate_radius(radius) {
            log::warn!("Rejecting circle query around point {}: {}", id, e);
            return;
        }

        let k = self.resolve(id, center, radius);
        if let Some(list) = self.cache.get(id) {
            for member in list.members(k) {
                if visit(member).is_break() {
                    return;
                }
            }
        }
    }

    fn search_rectangle(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, visit: Visitor<'_>) {
        self.inner.search_rectangle(x1, y1, x2, y2, visit)
    }

    fn free(&mut self) {
        self.cache.clear();
        self.inner.free();
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn is_prepared(&self) -> bool {
        self.inner.is_prepared()
    }

    fn location(&self, id: PointId) -> Option<Coord<f64>> {
        self.inner.location(id)
    }

    fn bounds(&self) -> Option<Rect<f64>> {
        self.inner.bounds()
    }

    fn stats(&self) -> SearchStats {
        SearchStats {
            cache_hits: self.counters.hits,
            cache_splits: self.counters.splits,
            cache_extensions: self.counters.extensions,
            cache_misses: self.counters.misses,
            cached_anchors: self.cache.anchors(),
            cached_buckets: self.cache.buckets(),
            ..self.inner.stats()
        }
    }

    fn begin_iteration(&mut self) {
        self.inner.begin_iteration();
        if self.lifetime == CacheLifetime::PerIteration {
            self.clear_cache();
        }
    }
}
