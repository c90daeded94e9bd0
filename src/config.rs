//! Search engine configuration.

use crate::error::{Result, SearchError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which exact index answers queries underneath the optional cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum IndexKind {
    /// R-tree with an adaptive fallback to a full scan for large queries.
    #[default]
    #[serde(rename = "rtree")]
    RTree,
    /// Id lists sorted by x and by y, searched by binary-search bands.
    #[serde(rename = "sorted_axis")]
    SortedAxis,
}

/// How long memoized radius results survive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CacheLifetime {
    /// Cached results live until the searcher is freed.
    #[default]
    Persistent,
    /// The cache is emptied at the start of every simulation iteration.
    PerIteration,
}

/// Algorithm for the minimum-area oriented bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MinBoxMethod {
    /// Rotating calipers, O(n) over the hull.
    #[default]
    RotatingCalipers,
    /// Every hull edge against every hull vertex, O(n²).
    Exhaustive,
}

/// Numeric tolerances used by the geometry kernel and the cache.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerances {
    /// Bound on the squared sine below which the hull orientation test calls
    /// three points collinear. Sized for rounding error only.
    #[serde(default = "Tolerances::default_collinear")]
    pub collinear: f64,

    /// Relative tolerance for treating coordinates as equal when checking
    /// for coincident or axis-aligned point sets.
    #[serde(default = "Tolerances::default_coincident")]
    pub coincident: f64,

    /// Radii closer than this share a cache bucket.
    #[serde(default = "Tolerances::default_radius")]
    pub radius: f64,
}

impl Tolerances {
    const fn default_collinear() -> f64 {
        1e-12
    }

    const fn default_coincident() -> f64 {
        1e-3
    }

    const fn default_radius() -> f64 {
        1e-3
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            collinear: Self::default_collinear(),
            coincident: Self::default_coincident(),
            radius: Self::default_radius(),
        }
    }
}

/// Configuration for building a proximity searcher.
///
/// Every field has a default, so partial documents are accepted:
///
/// ```
/// use proximity_search::{IndexKind, SearchConfig};
///
/// let config = SearchConfig::from_json_str(r#"{ "index": "sorted_axis" }"#).unwrap();
/// assert_eq!(config.index, IndexKind::SortedAxis);
/// assert!(config.memoize);
/// assert_eq!(config.tree_threshold_fraction, 0.25);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub index: IndexKind,

    /// Wrap the index in the radius memoization cache
    #[serde(default = "SearchConfig::default_memoize")]
    pub memoize: bool,

    #[serde(default)]
    pub cache_lifetime: CacheLifetime,

    /// Queries larger than this fraction of the short side of the point
    /// set's oriented bounding box skip the tree and scan every point.
    #[serde(default = "SearchConfig::default_tree_threshold_fraction")]
    pub tree_threshold_fraction: f64,

    #[serde(default)]
    pub min_box_method: MinBoxMethod,

    #[serde(default)]
    pub tolerances: Tolerances,
}

impl SearchConfig {
    const fn default_memoize() -> bool {
        true
    }

    const fn default_tree_threshold_fraction() -> f64 {
        0.25
    }

    pub fn with_index(mut self, index: IndexKind) -> Self {
        self.index = index;
        self
    }

    pub fn with_memoize(mut self, memoize: bool) -> Self {
        self.memoize = memoize;
        self
    }

    pub fn with_cache_lifetime(mut self, lifetime: CacheLifetime) -> Self {
        self.cache_lifetime = lifetime;
        self
    }

    pub fn with_tree_threshold_fraction(mut self, fraction: f64) -> Self {
        self.tree_threshold_fraction = fraction;
        self
    }

    pub fn with_min_box_method(mut self, method: MinBoxMethod) -> Self {
        self.min_box_method = method;
        self
    }

    pub fn with_tolerances(mut self, tolerances: Tolerances) -> Self {
        self.tolerances = tolerances;
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let fraction = self.tree_threshold_fraction;
        if !fraction.is_finite() || fraction <= 0.0 || fraction > 1.0 {
            return Err(SearchError::InvalidConfig(format!(
                "Tree threshold fraction must be in (0, 1], got: {}",
                fraction
            )));
        }

        let tolerances = [
            ("collinear", self.tolerances.collinear),
            ("coincident", self.tolerances.coincident),
            ("radius", self.tolerances.radius),
        ];
        for (name, value) in tolerances {
            if !value.is_finite() || value < 0.0 {
                return Err(SearchError::InvalidConfig(format!(
                    "Tolerance '{}' must be finite and non-negative, got: {}",
                    name, value
                )));
            }
        }

        if self.tolerances.collinear >= 1.0 {
            return Err(SearchError::InvalidConfig(format!(
                "Collinear tolerance must be below 1, got: {}",
                self.tolerances.collinear
            )));
        }

        Ok(())
    }

    /// Load configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SearchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Save configuration as a JSON string
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load configuration from a TOML string (requires toml feature)
    #[cfg(feature = "toml")]
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: SearchConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file (requires toml feature)
    #[cfg(feature = "toml")]
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            index: IndexKind::default(),
            memoize: Self::default_memoize(),
            cache_lifetime: CacheLifetime::default(),
            tree_threshold_fraction: Self::default_tree_threshold_fraction(),
            min_box_method: MinBoxMethod::default(),
            tolerances: Tolerances::default(),
        }
    }
}
