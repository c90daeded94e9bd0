//! Planar geometry kernel: vector algebra, convex hull and the minimum-area
//! oriented bounding box used to size the tree threshold.

pub mod hull;
pub mod min_box;
pub mod vector;

pub use hull::{ConvexHull, HullKind, Orientation, orientation};
pub use min_box::{
    OrientedBox, approx_eq, min_box_exhaustive, min_box_rotating_calipers, oriented_bounding_box,
};
pub use vector::{VectorOps, distance_sq};
