//! Exact spatial indexes and the radius memoization cache.

pub mod cache;
pub mod memo;
pub mod points;
pub mod rtree;
pub mod sorted_axis;

pub use cache::{Bucket, Lookup, ProximityCache, RadiusList};
pub use memo::MemoizedSearch;
pub use points::PointSet;
pub use rtree::{IndexedPoint, RTreeSearch};
pub use sorted_axis::SortedAxisSearch;
