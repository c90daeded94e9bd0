//! Exact index over point ids sorted by x and by y.
//!
//! A query's bounding square selects a contiguous band from each sorted list
//! by binary search. The shorter band is walked and each candidate is checked
//! against the other axis. For circles, candidates well inside the inscribed
//! square are accepted outright; the rest get the exact distance test.

use super::points::{PointSet, corners, envelope_slack, in_closed_rect};
use crate::compute::geometry::distance_sq;
use crate::compute::validation::{validate_coordinate, validate_radius};
use crate::search::{Phase, PointId, SearchStats, SpatialSearch, Visitor};
use geo::{Coord, Rect};
use std::f64::consts::FRAC_1_SQRT_2;

/// Shrink factor on the inscribed square so that rounding can never accept a
/// point the exact test would reject.
const INNER_SQUARE_FACTOR: f64 = 0.99 * FRAC_1_SQRT_2;

#[derive(Debug, Default)]
pub struct SortedAxisSearch {
    phase: Phase,
    points: PointSet,
    by_x: Vec<PointId>,
    by_y: Vec<PointId>,
    queries: u64,
}

enum Axis {
    X,
    Y,
}

impl SortedAxisSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids whose coordinate on `axis` lies in the closed interval `[lo, hi]`.
    fn band(&self, axis: Axis, lo: f64, hi: f64) -> &[PointId] {
        match axis {
            Axis::X => band_of(&self.by_x, &self.points, lo, hi, |p| p.x),
            Axis::Y => band_of(&self.by_y, &self.points, lo, hi, |p| p.y),
        }
    }

    /// The shorter of the two bands covering `[min, max]`.
    fn candidates(&self, min: Coord<f64>, max: Coord<f64>) -> &[PointId] {
        let x_band = self.band(Axis::X, min.x, max.x);
        let y_band = self.band(Axis::Y, min.y, max.y);
        if x_band.len() <= y_band.len() {
            x_band
        } else {
            y_band
        }
    }

    fn circle(&mut self, center: Coord<f64>, radius: f64, visit: Visitor<'_>) {
        self.queries += 1;
        if self.points.is_empty() {
            return;
        }

        let reach = radius + envelope_slack(center, radius);
        let min = Coord {
            x: center.x - reach,
            y: center.y - reach,
        };
        let max = Coord {
            x: center.x + reach,
            y: center.y + reach,
        };
        let radius_sq = radius * radius;
        let inner = INNER_SQUARE_FACTOR * radius;

        for &id in self.candidates(min, max) {
            let p = self.points.coord(id);
            if !in_closed_rect(p, min, max) {
                continue;
            }
            let dx = (p.x - center.x).abs();
            let dy = (p.y - center.y).abs();
            let inside = (dx < inner && dy < inner) || distance_sq(p, center) <= radius_sq;
            if inside && visit(id).is_break() {
                return;
            }
        }
    }
}

fn band_of<'a>(
    ids: &'a [PointId],
    points: &PointSet,
    lo: f64,
    hi: f64,
    key: impl Fn(Coord<f64>) -> f64,
) -> &'a [PointId] {
    let start = ids.partition_point(|&id| key(points.coord(id)) < lo);
    let end = ids.partition_point(|&id| key(points.coord(id)) <= hi);
    &ids[start..end.max(start)]
}

fn sorted_ids(points: &PointSet, key: impl Fn(Coord<f64>) -> f64) -> Vec<PointId> {
    let mut ids: Vec<PointId> = (0..points.len()).collect();
    ids.sort_by(|&a, &b| key(points.coord(a)).total_cmp(&key(points.coord(b))));
    ids
}

impl SpatialSearch for SortedAxisSearch {
    fn add_point(&mut self, x: f64, y: f64) -> PointId {
        self.phase.expect_loading("add_point");
        self.points.push(x, y)
    }

    fn prepare(&mut self) {
        self.phase.expect_loading("prepare");
        self.by_x = sorted_ids(&self.points, |p| p.x);
        self.by_y = sorted_ids(&self.points, |p| p.y);
        log::debug!("Prepared sorted-axis index over {} points", self.points.len());
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

        self.queries += 1;
        let (min, max) = corners(x1, y1, x2, y2);
        for &id in self.candidates(min, max) {
            if in_closed_rect(self.points.coord(id), min, max) && visit(id).is_break() {
                return;
            }
        }
    }

    fn free(&mut self) {
        self.phase.expect_live("free");
        self.points.clear();
        self.by_x = Vec::new();
        self.by_y = Vec::new();
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
            tree_queries: self.queries,
            ..SearchStats::default()
        }
    }
}
