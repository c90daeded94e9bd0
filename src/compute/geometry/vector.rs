//! Planar vector algebra on `geo::Coord`.
//!
//! `Coord<f64>` already provides addition, subtraction, negation and scaling;
//! [`VectorOps`] adds the products and normalisation the hull and box
//! algorithms need.

use geo::Coord;

pub trait VectorOps {
    fn dot(self, other: Self) -> f64;

    /// 2D cross product, `self.x * other.y - self.y * other.x`.
    fn kross(self, other: Self) -> f64;

    /// Clockwise perpendicular `(y, -x)`. For an edge of a counterclockwise
    /// polygon this is the outer normal.
    fn perp(self) -> Self;

    fn squared_length(self) -> f64;

    fn length(self) -> f64;

    /// Unit vector in the same direction, or zero for the zero vector. Any
    /// non-zero finite vector normalises, however short.
    fn normalized(self) -> Self;
}

impl VectorOps for Coord<f64> {
    #[inline]
    fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    #[inline]
    fn kross(self, other: Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    #[inline]
    fn perp(self) -> Self {
        Coord {
            x: self.y,
            y: -self.x,
        }
    }

    #[inline]
    fn squared_length(self) -> f64 {
        self.dot(self)
    }

    #[inline]
    fn length(self) -> f64 {
        self.squared_length().sqrt()
    }

    fn normalized(self) -> Self {
        let length = self.length();
        if length > 0.0 && length.is_finite() {
            self / length
        } else {
            Coord { x: 0.0, y: 0.0 }
        }
    }
}

/// Squared Euclidean distance. Every exact radius filter in the crate goes
/// through this function so that tree, scan and cache agree bit for bit.
#[inline]
pub fn distance_sq(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}
