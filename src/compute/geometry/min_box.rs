//! Minimum-area oriented bounding box.
//!
//! [`oriented_bounding_box`] is the entry point: it settles the degenerate
//! point sets (empty, single point, segment, coincident, axis-aligned line)
//! in closed form and otherwise runs one of the two box algorithms over the
//! convex hull.

use super::hull::{ConvexHull, HullKind};
use super::vector::VectorOps;
use crate::config::{MinBoxMethod, Tolerances};
use geo::{Coord, LineString, Polygon};

const ORIGIN: Coord<f64> = Coord { x: 0.0, y: 0.0 };
const X_AXIS: Coord<f64> = Coord { x: 1.0, y: 0.0 };
const Y_AXIS: Coord<f64> = Coord { x: 0.0, y: 1.0 };

/// Rectangle at any rotation: a center, two orthonormal axes and the
/// half-length along each axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedBox {
    pub center: Coord<f64>,
    pub axis: [Coord<f64>; 2],
    pub extent: [f64; 2],
}

impl OrientedBox {
    /// Zero-size box at `center`.
    pub fn point(center: Coord<f64>) -> Self {
        Self {
            center,
            axis: [X_AXIS, Y_AXIS],
            extent: [0.0, 0.0],
        }
    }

    /// Zero-width box covering the segment `a`-`b`.
    pub fn segment(a: Coord<f64>, b: Coord<f64>) -> Self {
        let direction = (b - a).normalized();
        if direction == ORIGIN {
            return Self::point((a + b) * 0.5);
        }
        Self {
            center: (a + b) * 0.5,
            axis: [direction, -direction.perp()],
            extent: [0.5 * (b - a).length(), 0.0],
        }
    }

    /// Corners in counterclockwise order, starting at
    /// `center - e0*a0 - e1*a1`.
    pub fn vertices(&self) -> [Coord<f64>; 4] {
        let u = self.axis[0] * self.extent[0];
        let v = self.axis[1] * self.extent[1];
        [
            self.center - u - v,
            self.center + u - v,
            self.center + u + v,
            self.center - u + v,
        ]
    }

    pub fn side_lengths(&self) -> [f64; 2] {
        [2.0 * self.extent[0], 2.0 * self.extent[1]]
    }

    pub fn short_side(&self) -> f64 {
        let [a, b] = self.side_lengths();
        a.min(b)
    }

    pub fn area(&self) -> f64 {
        4.0 * self.extent[0] * self.extent[1]
    }

    /// True when `p` lies inside the box, allowing for rounding in the box
    /// construction.
    pub fn contains(&self, p: Coord<f64>) -> bool {
        let slack = 1e-9 * (1.0 + self.extent[0] + self.extent[1]);
        let d = p - self.center;
        d.dot(self.axis[0]).abs() <= self.extent[0] + slack
            && d.dot(self.axis[1]).abs() <= self.extent[1] + slack
    }

    pub fn to_polygon(&self) -> Polygon<f64> {
        Polygon::new(LineString::from(self.vertices().to_vec()), vec![])
    }
}

/// Relative comparison in the manner of Knuth's `fcmp`: `a` and `b` are equal
/// when they differ by at most `tolerance` scaled to the binary exponent of
/// the larger magnitude.
pub fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
    let max = a.abs().max(b.abs());
    let exponent = if max > 0.0 {
        max.log2().floor() as i32 + 1
    } else {
        0
    };
    let delta = tolerance * 2f64.powi(exponent);
    (a - b).abs() <= delta
}

/// Minimum-area box of a point set.
///
/// # Examples
///
/// ```
/// use geo::coord;
/// use proximity_search::compute::geometry::oriented_bounding_box;
/// use proximity_search::{MinBoxMethod, Tolerances};
///
/// let square = [
///     coord! { x: 0.0, y: 0.0 },
///     coord! { x: 1.0, y: 0.0 },
///     coord! { x: 1.0, y: 1.0 },
///     coord! { x: 0.0, y: 1.0 },
/// ];
/// let obb = oriented_bounding_box(&square, MinBoxMethod::RotatingCalipers, &Tolerances::default());
/// assert_eq!(obb.extent, [0.5, 0.5]);
/// assert_eq!(obb.center, coord! { x: 0.5, y: 0.5 });
/// ```
pub fn oriented_bounding_box(
    points: &[Coord<f64>],
    method: MinBoxMethod,
    tolerances: &Tolerances,
) -> OrientedBox {
    match points {
        [] => return OrientedBox::point(ORIGIN),
        [only] => return OrientedBox::point(*only),
        [a, b] => return OrientedBox::segment(*a, *b),
        _ => {}
    }

    let (mut min, mut max) = (points[0], points[0]);
    for p in &points[1..] {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }

    let same_x = approx_eq(min.x, max.x, tolerances.coincident);
    let same_y = approx_eq(min.y, max.y, tolerances.coincident);
    match (same_x, same_y) {
        (true, true) => {
            log::debug!("All {} points share one location", points.len());
            return OrientedBox::point(min);
        }
        (true, false) => {
            log::debug!("All {} points share one x-location", points.len());
            return OrientedBox::segment(min, Coord { x: min.x, y: max.y });
        }
        (false, true) => {
            log::debug!("All {} points share one y-location", points.len());
            return OrientedBox::segment(min, Coord { x: max.x, y: min.y });
        }
        (false, false) => {}
    }

    let hull = ConvexHull::new(points, tolerances.collinear);
    log::debug!(
        "Convex hull of {} points has {} vertices",
        points.len(),
        hull.len()
    );
    match hull.kind() {
        HullKind::Point => OrientedBox::point(hull.vertices().first().copied().unwrap_or(min)),
        HullKind::Linear => OrientedBox::segment(hull.vertices()[0], hull.vertices()[1]),
        HullKind::Planar => match method {
            MinBoxMethod::RotatingCalipers => min_box_rotating_calipers(hull.vertices()),
            MinBoxMethod::Exhaustive => min_box_exhaustive(hull.vertices()),
        },
    }
}

/// Rotating calipers over a convex polygon with counterclockwise vertices
/// and no collinear triples.
pub fn min_box_rotating_calipers(polygon: &[Coord<f64>]) -> OrientedBox {
    let n = polygon.len();
    if n < 3 {
        return small_polygon_box(polygon);
    }

    let edges: Vec<Coord<f64>> = (0..n)
        .map(|i| (polygon[(i + 1) % n] - polygon[i]).normalized())
        .collect();
    let mut visited = vec![false; n];

    // Extreme vertices of the axis-aligned box. Ties go to the vertex whose
    // outgoing edge runs along the box side, hence `<=` and the final
    // re-check of vertex 0.
    let (mut x_min, mut x_max) = (polygon[0].x, polygon[0].x);
    let (mut y_min, mut y_max) = (polygon[0].y, polygon[0].y);
    let (mut left, mut right, mut bottom, mut top) = (0, 0, 0, 0);
    for (i, p) in polygon.iter().enumerate().skip(1) {
        if p.x <= x_min {
            x_min = p.x;
            left = i;
        }
        if p.x >= x_max {
            x_max = p.x;
            right = i;
        }
        if p.y <= y_min {
            y_min = p.y;
            bottom = i;
        }
        if p.y >= y_max {
            y_max = p.y;
            top = i;
        }
    }
    let first = polygon[0];
    if first.x <= x_min {
        left = 0;
    }
    if first.x >= x_max {
        right = 0;
    }
    if first.y <= y_min {
        bottom = 0;
    }
    if first.y >= y_max {
        top = 0;
    }

    let mut best = OrientedBox {
        center: Coord {
            x: 0.5 * (x_min + x_max),
            y: 0.5 * (y_min + y_max),
        },
        axis: [X_AXIS, Y_AXIS],
        extent: [0.5 * (x_max - x_min), 0.5 * (y_max - y_min)],
    };
    let mut min_area = best.area();

    let (mut u, mut v) = (X_AXIS, Y_AXIS);
    loop {
        // Caliper whose edge makes the smallest angle with its box side.
        let candidates = [
            (Caliper::Bottom, u.dot(edges[bottom])),
            (Caliper::Right, v.dot(edges[right])),
            (Caliper::Top, -u.dot(edges[top])),
            (Caliper::Left, -v.dot(edges[left])),
        ];
        let mut chosen = None;
        let mut max_dot = 0.0;
        for (caliper, dot) in candidates {
            if dot > max_dot {
                max_dot = dot;
                chosen = Some(caliper);
            }
        }

        // No edge turns toward a box side: the polygon is the box.
        let Some(caliper) = chosen else {
            break;
        };

        let index = match caliper {
            Caliper::Bottom => &mut bottom,
            Caliper::Right => &mut right,
            Caliper::Top => &mut top,
            Caliper::Left => &mut left,
        };
        if visited[*index] {
            break;
        }
        let edge = edges[*index];
        visited[*index] = true;
        *index = (*index + 1) % n;

        match caliper {
            Caliper::Bottom => {
                u = edge;
                v = -u.perp();
            }
            Caliper::Right => {
                v = edge;
                u = v.perp();
            }
            Caliper::Top => {
                u = -edge;
                v = -u.perp();
            }
            Caliper::Left => {
                v = -edge;
                u = v.perp();
            }
        }

        let extent0 = 0.5 * u.dot(polygon[right] - polygon[left]);
        let extent1 = 0.5 * v.dot(polygon[top] - polygon[bottom]);
        let area = 4.0 * extent0 * extent1;
        if area < min_area {
            min_area = area;
            let mid = (polygon[top] + polygon[bottom]) * 0.5 - polygon[left];
            best = OrientedBox {
                center: polygon[left] + u * extent0 + v * v.dot(mid),
                axis: [u, v],
                extent: [extent0, extent1],
            };
        }
    }

    best
}

#[derive(Debug, Clone, Copy)]
enum Caliper {
    Bottom,
    Right,
    Top,
    Left,
}

/// Tests every polygon edge direction against every vertex. Quadratic, but
/// independent of vertex order.
pub fn min_box_exhaustive(polygon: &[Coord<f64>]) -> OrientedBox {
    let n = polygon.len();
    if n < 3 {
        return small_polygon_box(polygon);
    }

    let origin = polygon[0];
    let mut best = OrientedBox::point(origin);
    let mut min_area_div4 = f64::INFINITY;

    for i1 in 0..n {
        let i0 = (i1 + n - 1) % n;
        let u0 = (polygon[i1] - polygon[i0]).normalized();
        let u1 = -u0.perp();

        let (mut s0, mut s1, mut t0, mut t1) = (0.0f64, 0.0f64, 0.0f64, 0.0f64);
        for p in &polygon[1..] {
            let diff = *p - origin;
            let s = u0.dot(diff);
            s0 = s0.min(s);
            s1 = s1.max(s);
            let t = u1.dot(diff);
            t0 = t0.min(t);
            t1 = t1.max(t);
        }

        let extent0 = 0.5 * (s1 - s0);
        let extent1 = 0.5 * (t1 - t0);
        let area_div4 = extent0 * extent1;
        if area_div4 < min_area_div4 {
            min_area_div4 = area_div4;
            best = OrientedBox {
                center: origin + u0 * (0.5 * (s0 + s1)) + u1 * (0.5 * (t0 + t1)),
                axis: [u0, u1],
                extent: [extent0, extent1],
            };
        }
    }

    best
}

fn small_polygon_box(polygon: &[Coord<f64>]) -> OrientedBox {
    match polygon {
        [] => OrientedBox::point(ORIGIN),
        [only] => OrientedBox::point(*only),
        [a, b, ..] => OrientedBox::segment(*a, *b),
    }
}
