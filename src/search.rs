//! The query interface shared by every index and by the memoization cache.
//!
//! Callers add all points once, call [`SpatialSearch::prepare`] once, and then
//! issue any number of circle and rectangle queries. Matches are reported
//! through a visitor closure, one call per matching point, in no particular
//! order. Returning [`ControlFlow::Break`] from the visitor stops the query.
//!
//! ```
//! use std::ops::ControlFlow;
//! use proximity_search::{RTreeSearch, SpatialSearch};
//!
//! let mut search = RTreeSearch::new();
//! let a = search.add_point(0.0, 0.0);
//! let b = search.add_point(3.0, 0.0);
//! let _far = search.add_point(10.0, 10.0);
//! search.prepare();
//!
//! let mut hits = Vec::new();
//! search.search_circle_by_id(a, 3.0, &mut |id| {
//!     hits.push(id);
//!     ControlFlow::Continue(())
//! });
//! hits.sort_unstable();
//! assert_eq!(hits, vec![a, b]);
//! ```

use geo::{Coord, Rect};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::ops::ControlFlow;

/// Dense point identifier, assigned from 0 in insertion order.
pub type PointId = usize;

/// Callback invoked once per matching point.
pub type Visitor<'a> = &'a mut dyn FnMut(PointId) -> ControlFlow<()>;

/// Lifecycle of an index. Points are accepted only while `Loading`, queries
/// only once `Prepared`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Loading,
    Prepared,
    Freed,
}

impl Phase {
    /// Panics unless the index still accepts points.
    pub(crate) fn expect_loading(self, operation: &str) {
        match self {
            Phase::Loading => {}
            Phase::Prepared => panic!("{} called on an index that is already prepared", operation),
            Phase::Freed => panic!("{} called on a freed index", operation),
        }
    }

    /// Panics unless the index is ready for queries.
    pub(crate) fn expect_prepared(self, operation: &str) {
        match self {
            Phase::Prepared => {}
            Phase::Loading => panic!("{} called before prepare", operation),
            Phase::Freed => panic!("{} called on a freed index", operation),
        }
    }

    /// Panics once the index has been freed.
    pub(crate) fn expect_live(self, operation: &str) {
        if self == Phase::Freed {
            panic!("{} called on a freed index", operation);
        }
    }
}

/// Counters describing how queries were answered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Number of indexed points.
    pub points: usize,
    /// Queries answered through the index structure (R-tree or sorted bands).
    pub tree_queries: u64,
    /// Queries answered by testing every point.
    pub scan_queries: u64,
    /// Cached radius lookups answered by an existing bucket.
    pub cache_hits: u64,
    /// Cached radius lookups answered by splitting a larger bucket.
    pub cache_splits: u64,
    /// Cached radius lookups that queried the index beyond the largest bucket.
    pub cache_extensions: u64,
    /// Anchors seen for the first time.
    pub cache_misses: u64,
    pub cached_anchors: usize,
    pub cached_buckets: usize,
}

/// Proximity queries over a fixed planar point set.
///
/// Lifecycle misuse (adding after `prepare`, querying before it, preparing
/// twice, any use after `free`) and unknown anchor ids are programming errors
/// and panic. Non-finite query coordinates and negative or NaN radii are
/// logged at `warn` and match nothing.
pub trait SpatialSearch: Debug {
    /// Adds a point and returns its id. Panics on non-finite coordinates.
    fn add_point(&mut self, x: f64, y: f64) -> PointId;

    /// Builds the index. Called exactly once, after the last `add_point`.
    fn prepare(&mut self);

    /// Visits every point within `radius` of `(x, y)`, boundary included.
    fn search_circle_by_xy(&mut self, x: f64, y: f64, radius: f64, visit: Visitor<'_>);

    /// Visits every point within `radius` of point `id`, including `id`.
    fn search_circle_by_id(&mut self, id: PointId, radius: f64, visit: Visitor<'_>);

    /// Visits every point in the closed rectangle spanned by two corners
    /// given in any order.
    fn search_rectangle(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, visit: Visitor<'_>);

    /// Releases the index. Every later operation panics.
    fn free(&mut self);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_prepared(&self) -> bool;

    /// Stored coordinates of a point, `None` for unknown ids.
    fn location(&self, id: PointId) -> Option<Coord<f64>>;

    /// Axis-aligned bounds of all points, `None` when empty.
    fn bounds(&self) -> Option<Rect<f64>>;

    fn stats(&self) -> SearchStats;

    /// Called by the simulation at the start of every iteration.
    fn begin_iteration(&mut self) {}

    /// Collects [`search_circle_by_xy`](Self::search_circle_by_xy) results.
    fn circle_by_xy(&mut self, x: f64, y: f64, radius: f64) -> Vec<PointId> {
        let mut hits = Vec::new();
        self.search_circle_by_xy(x, y, radius, &mut |id| {
            hits.push(id);
            ControlFlow::Continue(())
        });
        hits
    }

    /// Collects [`search_circle_by_id`](Self::search_circle_by_id) results.
    fn circle_by_id(&mut self, id: PointId, radius: f64) -> Vec<PointId> {
        let mut hits = Vec::new();
        self.search_circle_by_id(id, radius, &mut |hit| {
            hits.push(hit);
            ControlFlow::Continue(())
        });
        hits
    }

    /// Collects [`search_rectangle`](Self::search_rectangle) results.
    fn rectangle(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Vec<PointId> {
        let mut hits = Vec::new();
        self.search_rectangle(x1, y1, x2, y2, &mut |id| {
            hits.push(id);
            ControlFlow::Continue(())
        });
        hits
    }
}

impl<S: SpatialSearch + ?Sized> SpatialSearch for Box<S> {
    fn add_point(&mut self, x: f64, y: f64) -> PointId {
        (**self).add_point(x, y)
    }

    fn prepare(&mut self) {
        (**self).prepare()
    }

    fn search_circle_by_xy(&mut self, x: f64, y: f64, radius: f64, visit: Visitor<'_>) {
        (**self).search_circle_by_xy(x, y, radius, visit)
    }

    fn search_circle_by_id(&mut self, id: PointId, radius: f64, visit: Visitor<'_>) {
        (**self).search_circle_by_id(id, radius, visit)
    }

    fn search_rectangle(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, visit: Visitor<'_>) {
        (**self).search_rectangle(x1, y1, x2, y2, visit)
    }

    fn free(&mut self) {
        (**self).free()
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn is_prepared(&self) -> bool {
        (**self).is_prepared()
    }

    fn location(&self, id: PointId) -> Option<Coord<f64>> {
        (**self).location(id)
    }

    fn bounds(&self) -> Option<Rect<f64>> {
        (**self).bounds()
    }

    fn stats(&self) -> SearchStats {
        (**self).stats()
    }

    fn begin_iteration(&mut self) {
        (**self).begin_iteration()
    }
}
