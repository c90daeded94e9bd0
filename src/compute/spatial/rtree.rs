//! R-tree index with an adaptive fallback to a full scan.
//!
//! ## Adaptive dispatch
//!
//! A tree lookup pays off only while the query covers a small part of the
//! point set. At `prepare` time the index computes the minimum-area oriented
//! bounding box of all points and derives a threshold from its short side:
//!
//! ```text
//! threshold = tree_threshold_fraction * min(side0, side1)
//! ```
//!
//! A circle whose diameter, or a rectangle whose longer side, is at most the
//! threshold goes through the tree: the query's bounding square is looked up
//! with `locate_in_envelope_intersecting` and every candidate is then checked
//! with the exact distance test. Anything larger tests every point directly.
//!
//! Both paths apply the same closed tests through the same
//! [`distance_sq`](crate::compute::geometry::distance_sq), so the path chosen
//! never changes a result.

use super::points::{PointSet, corners, envelope_slack};
use crate::compute::geometry::{OrientedBox, distance_sq, oriented_bounding_box};
use crate::compute::validation::{validate_coordinate, validate_radius};
use crate::config::{MinBoxMethod, SearchConfig, Tolerances};
use crate::search::{Phase, PointId, SearchStats, SpatialSearch, Visitor};
use geo::{Coord, Rect};
use rstar::primitives::GeomWithData;
use rstar::{AABB, RTree};
use std::fmt;

/// Tree entry: the point's coordinates tagged with its id.
pub type IndexedPoint = GeomWithData<[f64; 2], PointId>;

/// Exact index over an R-tree.
pub struct RTreeSearch {
    phase: Phase,
    points: PointSet,
    tree: RTree<IndexedPoint>,
    oriented_box: Option<OrientedBox>,
    threshold: f64,
    tree_threshold_fraction: f64,
    min_box_method: MinBoxMethod,
    tolerances: Tolerances,
    tree_queries: u64,
    scan_queries: u64,
}

impl RTreeSearch {
    /// Creates an empty index with default settings.
    pub fn new() -> Self {
        Self::with_config(&SearchConfig::default())
    }

    /// Creates an empty index using the threshold fraction, box method and
    /// tolerances of `config`.
    pub fn with_config(config: &SearchConfig) -> Self {
        Self {
            phase: Phase::Loading,
            points: PointSet::new(),
            tree: RTree::new(),
            oriented_box: None,
            threshold: 0.0,
            tree_threshold_fraction: config.tree_threshold_fraction,
            min_box_method: config.min_box_method,
            tolerances: config.tolerances,
            tree_queries: 0,
            scan_queries: 0,
        }
    }

    /// Query size at or below which the tree is used. `None` until prepared.
    pub fn threshold(&self) -> Option<f64> {
        (self.phase == Phase::Prepared).then_some(self.threshold)
    }

    /// Minimum-area oriented bounding box of the points, once prepared.
    pub fn oriented_box(&self) -> Option<&OrientedBox> {
        self.oriented_box.as_ref()
    }

    fn circle(&mut self, center: Coord<f64>, radius: f64, visit: Visitor<'_>) {
        let radius_sq = radius * radius;

        if 2.0 * radius > self.threshold {
            log::trace!("Circle r={} scans all {} points", radius, self.points.len());
            self.scan_queries += 1;
            self.points.scan_circle(center, radius_sq, visit);
            return;
        }

        log::trace!("Circle r={} uses the tree", radius);
        self.tree_queries += 1;
        let reach = radius + envelope_slack(center, radius);
        let envelope = AABB::from_corners(
            [center.x - reach, center.y - reach],
            [center.x + reach, center.y + reach],
        );
        for entry in self.tree.locate_in_envelope_intersecting(&envelope) {
            let [x, y] = *entry.geom();
            if distance_sq(Coord { x, y }, center) <= radius_sq && visit(entry.data).is_break() {
                return;
            }
        }
    }
}

impl Default for RTreeSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RTreeSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RTreeSearch")
            .field("phase", &self.phase)
            .field("points", &self.points.len())
            .field("threshold", &self.threshold)
            .field("oriented_box", &self.oriented_box)
            .finish_non_exhaustive()
    }
}

impl SpatialSearch for RTreeSearch {
    fn add_point(&mut self, x: f64, y: f64) -> PointId {
        self.phase.expect_loading("add_point");
        self.points.push(x, y)
    }

    fn prepare(&mut self) {
        self.phase.expect_loading("prepare");

        let obb = oriented_bounding_box(
            self.points.as_slice(),
            self.min_box_method,
            &self.tolerances,
        );
        self.threshold = self.tree_threshold_fraction * obb.short_side();

        let entries: Vec<IndexedPoint> = self
            .points
            .as_slice()
            .iter()
            .enumerate()
            .map(|(id, p)| GeomWithData::new([p.x, p.y], id))
            .collect();
        self.tree = RTree::bulk_load(entries);

        let [side0, side1] = obb.side_lengths();
        log::debug!(
            "Prepared R-tree over {} points: oriented box {:.6} x {:.6}, threshold {:.6}",
            self.points.len(),
            side0,
            side1,
            self.threshold
        );

        self.oriented_box = Some(obb);
        self.phase = Phase::Prepared;
    }

    fn search_circle_by_xy(&mut self, x: f64, y: f64, radius: f64, visit: Visitor<'_>) {
        self.phase.expect_prepared("search_circle_by_xy");

        if let Err(e) = validate_coordinate(x, y).and_then(|_| validate_radius(radius)) {
            log::warn!("Rejecting circle query: {}", e);
            return;
        }

        self.circle(Coord { x, y }, radius, visit);
    }

    fn search_circle_by_id(&mut self, id: PointId, radius: f64, visit: Visitor<'_>) {
        self.phase.expect_prepared("search_circle_by_id");
        let center = self.points.coord(id);

        if let Err(e) = validate_radius(radius) {
            log::warn!("Rejecting circle query around point {}: {}", id, e);
            return;
        }

        self.circle(center, radius, visit);
    }

    fn search_rectangle(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, visit: Visitor<'_>) {
        self.phase.expect_prepared("search_rectangle");

        if let Err(e) = validate_coordinate(x1, y1).and_then(|_| validate_coordinate(x2, y2)) {
            log::warn!("Rejecting rectangle query with non-finite coordinates: {}", e);
            return;
        }

        let (min, max) = corners(x1, y1, x2, y2);
        let longer_side = (max.x - min.x).max(max.y - min.y);

        if longer_side > self.threshold {
            log::trace!("Rectangle side {} scans all points", longer_side);
            self.scan_queries += 1;
            self.points.scan_rectangle(min, max, visit);
            return;
        }

        log::trace!("Rectangle side {} uses the tree", longer_side);
        self.tree_queries += 1;
        let envelope = AABB::from_corners([min.x, min.y], [max.x, max.y]);
        for entry in self.tree.locate_in_envelope_intersecting(&envelope) {
            if visit(entry.data).is_break() {
                return;
            }
        }
    }

    fn free(&mut self) {
        self.phase.expect_live("free");
        self.tree = RTree::new();
        self.points.clear();
        self.oriented_box = None;
        self.phase = Phase::Freed;
    }

    fn len(&self) -> usize {
        self.points.len()
    }

    fn is_prepared(&self) -> bool {
        self.phase == Phase::Prepared
    }

    fn location(&self, id: PointId) -> Option<Coord<f64>> {
        self.points.get(id)
    }

    fn bounds(&self) -> Option<Rect<f64>> {
        self.points.bounds()
    }

    fn stats(&self) -> SearchStats {
        SearchStats {
            points: self.points.len(),
            tree_queries: self.tree_queries,
            scan_queries: self.scan_queries,
            ..SearchStats::default()
        }
    }
}
