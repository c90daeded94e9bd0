//! Proximity search for epidemic simulation: which units lie within distance
//! R of a unit or a location?
//!
//! An R-tree index picks between a tree lookup and a full scan depending on
//! how large the query is relative to the point set's minimum-area oriented
//! bounding box, and an optional cache remembers per-anchor results so
//! repeated queries at nearby radii are answered incrementally.
//!
//! ```rust
//! use proximity_search::SearchBuilder;
//!
//! let mut search = SearchBuilder::new()
//!     .points([(0.0, 0.0), (3.0, 0.0), (0.0, 4.0), (10.0, 10.0)])
//!     .build()?;
//!
//! let mut within = search.circle_by_id(0, 3.0);
//! within.sort_unstable();
//! assert_eq!(within, vec![0, 1]);
//!
//! let mut within = search.circle_by_id(0, 5.0);
//! within.sort_unstable();
//! assert_eq!(within, vec![0, 1, 2]);
//! # Ok::<(), proximity_search::SearchError>(())
//! ```

pub mod builder;
pub mod compute;
pub mod config;
pub mod error;
pub mod search;

pub use builder::SearchBuilder;
pub use config::{CacheLifetime, IndexKind, MinBoxMethod, SearchConfig, Tolerances};
pub use error::{Result, SearchError};
pub use search::{Phase, PointId, SearchStats, SpatialSearch, Visitor};

pub use compute::geometry::{ConvexHull, HullKind, OrientedBox, oriented_bounding_box};
pub use compute::spatial::{MemoizedSearch, ProximityCache, RTreeSearch, SortedAxisSearch};

pub use geo::{Coord, Rect};
