//! Incremental convex hull.
//!
//! Points are sorted lexicographically, exact duplicates dropped, and then
//! merged one at a time into a running hull. Because every merged point is
//! lexicographically larger than all previous ones it always sees vertex 0 of
//! the current hull, so the tangent search can start there.

use super::vector::VectorOps;
use geo::{Coord, LineString, Polygon};

/// Shape of a convex hull.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HullKind {
    /// Zero or one distinct point.
    Point,
    /// Two distinct vertices; every input point lies on the segment.
    Linear,
    /// Three or more vertices in counterclockwise order.
    Planar,
}

/// Position of a point `P` relative to the directed segment `Q0 -> Q1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// `<P, Q0, Q1>` is a counterclockwise triangle.
    Positive,
    /// `<P, Q0, Q1>` is a clockwise triangle.
    Negative,
    /// On the line, before `Q0`.
    CollinearLeft,
    /// On the line, past `Q1`.
    CollinearRight,
    /// On the segment.
    CollinearContain,
}

/// Classifies `p` against the segment `q0 -> q1`.
///
/// The determinant is treated as zero when
/// `det² <= epsilon * |q1 - q0|² * |p - q0|²`, i.e. when the squared sine of
/// the angle at `q0` is at most `epsilon`. Keep `epsilon` near rounding
/// error: anything coarser drops real hull vertices.
pub fn orientation(p: Coord<f64>, q0: Coord<f64>, q1: Coord<f64>, epsilon: f64) -> Orientation {
    let d = q1 - q0;
    let a = p - q0;
    let d_dot_d = d.dot(d);
    let a_dot_a = a.dot(a);
    let det = d.kross(a);
    let relative = det * det - epsilon * d_dot_d * a_dot_a;

    if relative > 0.0 {
        if det > 0.0 {
            return Orientation::Positive;
        } else if det < 0.0 {
            return Orientation::Negative;
        }
    }

    let d_dot_a = d.dot(a);
    if d_dot_a < 0.0 {
        Orientation::CollinearLeft
    } else if d_dot_a > d_dot_d {
        Orientation::CollinearRight
    } else {
        Orientation::CollinearContain
    }
}

/// Convex hull of a planar point set.
///
/// # Examples
///
/// ```
/// use geo::coord;
/// use proximity_search::compute::geometry::{ConvexHull, HullKind};
///
/// let points = [
///     coord! { x: 0.0, y: 0.0 },
///     coord! { x: 2.0, y: 0.0 },
///     coord! { x: 2.0, y: 1.0 },
///     coord! { x: 0.0, y: 1.0 },
///     coord! { x: 1.0, y: 0.5 },
/// ];
/// let hull = ConvexHull::new(&points, 1e-12);
/// assert_eq!(hull.kind(), HullKind::Planar);
/// assert_eq!(hull.len(), 4);
/// assert!(!hull.indices().contains(&4));
/// ```
#[derive(Debug, Clone)]
pub struct ConvexHull {
    kind: HullKind,
    indices: Vec<usize>,
    vertices: Vec<Coord<f64>>,
}

impl ConvexHull {
    /// Builds the hull of `points`. Hull vertices refer back to `points` by
    /// index; the first occurrence of a duplicated coordinate is kept.
    pub fn new(points: &[Coord<f64>], collinear_epsilon: f64) -> Self {
        let mut order: Vec<usize> = (0..points.len()).collect();
        order.sort_by(|&a, &b| {
            points[a]
                .x
                .total_cmp(&points[b].x)
                .then(points[a].y.total_cmp(&points[b].y))
        });
        order.dedup_by(|later, earlier| points[*later] == points[*earlier]);

        let mut builder = HullBuilder {
            points,
            epsilon: collinear_epsilon,
            kind: HullKind::Point,
            hull: Vec::with_capacity(order.len().min(64)),
        };

        let mut sorted = order.into_iter();
        if let Some(first) = sorted.next() {
            builder.hull.push(first);
        }
        for index in sorted {
            match builder.kind {
                HullKind::Point => {
                    builder.hull.push(index);
                    builder.kind = HullKind::Linear;
                }
                HullKind::Linear => builder.merge_linear(index),
                HullKind::Planar => builder.merge_planar(index),
            }
        }

        let (kind, indices) = builder.finish();
        let vertices = indices.iter().map(|&i| points[i]).collect();
        Self {
            kind,
            indices,
            vertices,
        }
    }

    pub fn kind(&self) -> HullKind {
        self.kind
    }

    /// Indices into the input slice, counterclockwise for planar hulls.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Hull vertex coordinates in the same order as [`indices`](Self::indices).
    pub fn vertices(&self) -> &[Coord<f64>] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// True when `p` is not strictly outside any edge's outer normal.
    /// Only meaningful for planar hulls.
    pub fn contains(&self, p: Coord<f64>) -> bool {
        let n = self.vertices.len();
        (0..n).all(|i1| {
            let v0 = self.vertices[(i1 + n - 1) % n];
            let v1 = self.vertices[i1];
            let normal = (v1 - v0).perp();
            normal.dot(p - v0) <= 0.0
        })
    }

    /// Closed polygon through the hull vertices.
    pub fn to_polygon(&self) -> Polygon<f64> {
        Polygon::new(LineString::from(self.vertices.clone()), vec![])
    }
}

struct HullBuilder<'a> {
    points: &'a [Coord<f64>],
    epsilon: f64,
    kind: HullKind,
    hull: Vec<usize>,
}

impl HullBuilder<'_> {
    fn test(&self, p: usize, q0: usize, q1: usize) -> Orientation {
        orientation(
            self.points[p],
            self.points[q0],
            self.points[q1],
            self.epsilon,
        )
    }

    fn merge_linear(&mut self, p: usize) {
        let (q0, q1) = (self.hull[0], self.hull[1]);
        match self.test(p, q0, q1) {
            Orientation::Positive => {
                self.hull = vec![p, q0, q1];
                self.kind = HullKind::Planar;
            }
            Orientation::Negative => {
                self.hull = vec![p, q1, q0];
                self.kind = HullKind::Planar;
            }
            Orientation::CollinearLeft => self.hull[0] = p,
            Orientation::CollinearRight => self.hull[1] = p,
            Orientation::CollinearContain => {}
        }
    }

    fn merge_planar(&mut self, p: usize) {
        let n = self.hull.len();

        // Counterclockwise from vertex 0 to the last visible vertex.
        let mut upper = None;
        for u in 0..n {
            let next = (u + 1) % n;
            match self.test(p, self.hull[u], self.hull[next]) {
                Orientation::Negative => continue,
                Orientation::Positive | Orientation::CollinearLeft => {
                    upper = Some(u);
                    break;
                }
                Orientation::CollinearRight | Orientation::CollinearContain => return,
            }
        }

        // Clockwise from vertex 0 to the last visible vertex.
        let mut lower = None;
        let mut l = 0;
        for i in (0..n).rev() {
            match self.test(p, self.hull[i], self.hull[l]) {
                Orientation::Negative => l = i,
                Orientation::Positive | Orientation::CollinearRight => {
                    lower = Some(l);
                    break;
                }
                Orientation::CollinearLeft | Orientation::CollinearContain => return,
            }
        }

        let (Some(mut u), Some(l)) = (upper, lower) else {
            log::warn!("Convex hull merge found no tangent; point ignored");
            return;
        };

        // Collinear with an edge but the orientation test missed it.
        if u == l {
            return;
        }

        let mut merged = Vec::with_capacity(n + 1);
        merged.push(p);
        loop {
            merged.push(self.hull[u]);
            if u == l {
                break;
            }
            u = (u + 1) % n;
        }
        self.hull = merged;
    }

    /// Drops vertices collinear with their neighbours and settles the kind.
    fn finish(self) -> (HullKind, Vec<usize>) {
        if self.kind != HullKind::Planar {
            return (self.kind, self.hull);
        }

        let n = self.hull.len();
        let kept: Vec<usize> = (0..n)
            .filter(|&i1| {
                let i0 = (i1 + n - 1) % n;
                let i2 = (i1 + 1) % n;
                matches!(
                    self.test(self.hull[i0], self.hull[i1], self.hull[i2]),
                    Orientation::Positive | Orientation::Negative
                )
            })
            .collect();

        if kept.len() >= 3 {
            return (
                HullKind::Planar,
                kept.into_iter().map(|i| self.hull[i]).collect(),
            );
        }

        // Everything flattened onto a line: keep its two lexicographic ends.
        let points = self.points;
        let lex = |a: &usize, b: &usize| {
            points[*a]
                .x
                .total_cmp(&points[*b].x)
                .then(points[*a].y.total_cmp(&points[*b].y))
        };
        let ends = (
            self.hull.iter().copied().min_by(lex),
            self.hull.iter().copied().max_by(lex),
        );
        match ends {
            (Some(lo), Some(hi)) => (HullKind::Linear, vec![lo, hi]),
            _ => (HullKind::Point, Vec::new()),
        }
    }
}
