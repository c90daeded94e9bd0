//! Compute layer: geometry, indexes and validation.
//!
//! This module holds everything that answers a proximity query:
//! - Planar geometry (hull, oriented bounding box)
//! - Exact spatial indexes and the radius memoization cache
//! - Input validation shared by the builder and the indexes

pub mod geometry;
pub mod spatial;
pub mod validation;
