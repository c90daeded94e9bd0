//! Searcher builder for flexible configuration
//!
//! This module provides a builder pattern for assembling a prepared searcher
//! from a point set and a [`SearchConfig`]: the configured exact index,
//! optionally wrapped in the radius memoization cache.

use crate::compute::spatial::{MemoizedSearch, RTreeSearch, SortedAxisSearch};
use crate::compute::validation::validate_points;
use crate::config::{CacheLifetime, IndexKind, SearchConfig};
use crate::error::Result;
use crate::search::SpatialSearch;
use geo::Coord;

/// Builder for a prepared [`SpatialSearch`].
///
/// # Examples
///
/// ```
/// use proximity_search::{IndexKind, SearchBuilder};
///
/// let mut search = SearchBuilder::new()
///     .index(IndexKind::SortedAxis)
///     .points([(0.0, 0.0), (3.0, 0.0), (0.0, 4.0), (10.0, 10.0)])
///     .build()?;
///
/// let mut hits = search.circle_by_xy(0.0, 0.0, 5.0);
/// hits.sort_unstable();
/// assert_eq!(hits, vec![0, 1, 2]);
/// # Ok::<(), proximity_search::SearchError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SearchBuilder {
    config: SearchConfig,
    points: Vec<Coord<f64>>,
}

impl SearchBuilder {
    /// Create a new builder with default configuration and no points.
    pub fn new() -> Self {
        Self {
            config: SearchConfig::default(),
            points: Vec::new(),
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn index(mut self, index: IndexKind) -> Self {
        self.config.index = index;
        self
    }

    /// Enable or disable the radius memoization cache.
    pub fn memoize(mut self, memoize: bool) -> Self {
        self.config.memoize = memoize;
        self
    }

    pub fn cache_lifetime(mut self, lifetime: CacheLifetime) -> Self {
        self.config.cache_lifetime = lifetime;
        self
    }

    /// Add one point. Ids follow insertion order.
    pub fn point(mut self, x: f64, y: f64) -> Self {
        self.points.push(Coord { x, y });
        self
    }

    /// Add points from `(x, y)` tuples or `geo::Coord`s.
    pub fn points<I, P>(mut self, points: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Coord<f64>>,
    {
        self.points.extend(points.into_iter().map(Into::into));
        self
    }

    /// Validate the configuration and every point, then build and prepare
    /// the searcher.
    pub fn build(self) -> Result<Box<dyn SpatialSearch>> {
        self.config.validate()?;
        validate_points(&self.points)?;

        let mut search: Box<dyn SpatialSearch> = match self.config.index {
            IndexKind::RTree => Box::new(RTreeSearch::with_config(&self.config)),
            IndexKind::SortedAxis => Box::new(SortedAxisSearch::new()),
        };
        if self.config.memoize {
            search = Box::new(MemoizedSearch::with_config(search, &self.config));
        }

        for p in &self.points {
            search.add_point(p.x, p.y);
        }
        search.prepare();

        log::debug!(
            "Built {:?} searcher over {} points (memoize: {}, cache lifetime: {:?})",
            self.config.index,
            self.points.len(),
            self.config.memoize,
            self.config.cache_lifetime
        );

        Ok(search)
    }
}

impl Default for SearchBuilder {
    fn default() -> Self {
        Self::new()
    }
}
