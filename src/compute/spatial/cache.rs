//! Per-anchor cache of radius query results.
//!
//! For each anchor the cache keeps a [`RadiusList`]: buckets in strictly
//! ascending radius order. A bucket stores only its ring, the ids whose
//! distance from the anchor lies in `(previous radius, radius]`, so the full
//! result for bucket `k` is the union of rings `0..=k` and results can only
//! grow with the radius.

use crate::compute::geometry::distance_sq;
use crate::search::PointId;
use geo::Coord;
use rustc_hash::FxHashMap;

/// One cached radius and the ids first reached at that radius.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    radius: f64,
    ring: Vec<PointId>,
}

impl Bucket {
    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn ring(&self) -> &[PointId] {
        &self.ring
    }
}

/// Where a requested radius falls in a [`RadiusList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// Bucket `k` has the same radius, within tolerance.
    Hit(usize),
    /// Bucket `k` is the first with a larger radius.
    Split(usize),
    /// The radius exceeds every cached radius.
    Extend,
}

/// Ascending-by-radius result sets around one anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct RadiusList {
    buckets: Vec<Bucket>,
}

impl RadiusList {
    /// Starts a list from a complete query result.
    pub fn new(radius: f64, members: Vec<PointId>) -> Self {
        Self {
            buckets: vec![Bucket {
                radius,
                ring: members,
            }],
        }
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn largest_radius(&self) -> Option<f64> {
        self.buckets.last().map(Bucket::radius)
    }

    /// Finds the bucket answering `radius`, scanning from the smallest.
    pub fn lookup(&self, radius: f64, tolerance: f64) -> Lookup {
        for (k, bucket) in self.buckets.iter().enumerate() {
            if (bucket.radius - radius).abs() <= tolerance {
                return Lookup::Hit(k);
            }
            if bucket.radius > radius {
                return Lookup::Split(k);
            }
        }
        Lookup::Extend
    }

    /// Inserts a bucket for `radius` ahead of bucket `k`, taking from bucket
    /// `k`'s ring every id within `radius` of `anchor`. `radius` must lie
    /// strictly between the radii of buckets `k - 1` and `k`.
    pub fn split(
        &mut self,
        k: usize,
        radius: f64,
        anchor: Coord<f64>,
        locate: impl Fn(PointId) -> Option<Coord<f64>>,
    ) {
        let radius_sq = radius * radius;
        let (inner, outer): (Vec<PointId>, Vec<PointId>) =
            self.buckets[k].ring.iter().partition(|&&id| {
                locate(id).is_some_and(|p| distance_sq(p, anchor) <= radius_sq)
            });

        self.buckets[k].ring = outer;
        self.buckets.insert(
            k,
            Bucket {
                radius,
                ring: inner,
            },
        );
    }

    /// Appends a bucket for `radius` from a complete query result at that
    /// radius, keeping only ids beyond the current largest radius.
    pub fn extend(
        &mut self,
        radius: f64,
        hits: Vec<PointId>,
        anchor: Coord<f64>,
        locate: impl Fn(PointId) -> Option<Coord<f64>>,
    ) {
        let ring = match self.largest_radius() {
            Some(last) => {
                let last_sq = last * last;
                hits.into_iter()
                    .filter(|&id| locate(id).is_some_and(|p| distance_sq(p, anchor) > last_sq))
                    .collect()
            }
            None => hits,
        };
        self.buckets.push(Bucket { radius, ring });
    }

    /// Every id within the radius of bucket `k`.
    pub fn members(&self, k: usize) -> impl Iterator<Item = PointId> + '_ {
        self.buckets[..=k]
            .iter()
            .flat_map(|bucket| bucket.ring.iter().copied())
    }
}

/// Anchor id to radius list.
#[derive(Debug, Clone, Default)]
pub struct ProximityCache {
    lists: FxHashMap<PointId, RadiusList>,
}

impl ProximityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, anchor: PointId) -> Option<&RadiusList> {
        self.lists.get(&anchor)
    }

    pub fn get_mut(&mut self, anchor: PointId) -> Option<&mut RadiusList> {
        self.lists.get_mut(&anchor)
    }

    pub fn insert(&mut self, anchor: PointId, list: RadiusList) {
        self.lists.insert(anchor, list);
    }

    /// Number of anchors with cached results.
    pub fn anchors(&self) -> usize {
        self.lists.len()
    }

    /// Total buckets across all anchors.
    pub fn buckets(&self) -> usize {
        self.lists.values().map(RadiusList::len).sum()
    }

    pub fn clear(&mut self) {
        self.lists.clear();
    }
}
