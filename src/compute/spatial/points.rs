//! Point storage shared by the exact indexes, plus the brute-force scans the
//! R-tree falls back to for large queries.

use crate::compute::geometry::distance_sq;
use crate::search::PointId;
use geo::{Coord, Rect};
use std::ops::ControlFlow;

/// Owned point coordinates indexed by [`PointId`], with running bounds.
#[derive(Debug, Clone, Default)]
pub struct PointSet {
    coords: Vec<Coord<f64>>,
    min: Coord<f64>,
    max: Coord<f64>,
}

impl PointSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a point. Panics on non-finite coordinates.
    pub fn push(&mut self, x: f64, y: f64) -> PointId {
        assert!(
            x.is_finite() && y.is_finite(),
            "point coordinates must be finite, got ({}, {})",
            x,
            y
        );

        let p = Coord { x, y };
        if self.coords.is_empty() {
            self.min = p;
            self.max = p;
        } else {
            self.min.x = self.min.x.min(x);
            self.min.y = self.min.y.min(y);
            self.max.x = self.max.x.max(x);
            self.max.y = self.max.y.max(y);
        }
        self.coords.push(p);
        self.coords.len() - 1
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn get(&self, id: PointId) -> Option<Coord<f64>> {
        self.coords.get(id).copied()
    }

    /// Coordinates of a known point. Panics on unknown ids.
    pub fn coord(&self, id: PointId) -> Coord<f64> {
        match self.coords.get(id) {
            Some(&p) => p,
            None => panic!("unknown point id {} (index holds {} points)", id, self.len()),
        }
    }

    pub fn as_slice(&self) -> &[Coord<f64>] {
        &self.coords
    }

    pub fn bounds(&self) -> Option<Rect<f64>> {
        if self.coords.is_empty() {
            None
        } else {
            Some(Rect::new(self.min, self.max))
        }
    }

    pub fn clear(&mut self) {
        self.coords = Vec::new();
        self.min = Coord::default();
        self.max = Coord::default();
    }

    /// Visits every point with `distance_sq(p, center) <= radius_sq`.
    pub fn scan_circle(
        &self,
        center: Coord<f64>,
        radius_sq: f64,
        visit: &mut dyn FnMut(PointId) -> ControlFlow<()>,
    ) {
        for (id, &p) in self.coords.iter().enumerate() {
            if distance_sq(p, center) <= radius_sq && visit(id).is_break() {
                return;
            }
        }
    }

    /// Visits every point in the closed rectangle `[min, max]`.
    pub fn scan_rectangle(
        &self,
        min: Coord<f64>,
        max: Coord<f64>,
        visit: &mut dyn FnMut(PointId) -> ControlFlow<()>,
    ) {
        for (id, p) in self.coords.iter().enumerate() {
            if in_closed_rect(*p, min, max) && visit(id).is_break() {
                return;
            }
        }
    }
}

#[inline]
pub(crate) fn in_closed_rect(p: Coord<f64>, min: Coord<f64>, max: Coord<f64>) -> bool {
    min.x <= p.x && p.x <= max.x && min.y <= p.y && p.y <= max.y
}

/// Normalises two rectangle corners given in any order to `(min, max)`.
#[inline]
pub(crate) fn corners(x1: f64, y1: f64, x2: f64, y2: f64) -> (Coord<f64>, Coord<f64>) {
    (
        Coord {
            x: x1.min(x2),
            y: y1.min(y2),
        },
        Coord {
            x: x1.max(x2),
            y: y1.max(y2),
        },
    )
}

/// Padding added around a circle's bounding square before a coarse lookup,
/// so that rounding in `center ± radius` never drops a point the exact
/// distance test would accept.
#[inline]
pub(crate) fn envelope_slack(center: Coord<f64>, radius: f64) -> f64 {
    (center.x.abs().max(center.y.abs()) + radius) * 4.0 * f64::EPSILON
}
