//! Validation for planar coordinates and query radii.

use crate::error::{Result, SearchError};
use geo::Coord;

/// Validates that both components of a coordinate are finite.
///
/// # Examples
///
/// ```
/// use proximity_search::compute::validation::validate_coordinate;
///
/// assert!(validate_coordinate(3.0, -4.5).is_ok());
/// assert!(validate_coordinate(f64::NAN, 0.0).is_err());
/// assert!(validate_coordinate(0.0, f64::INFINITY).is_err());
/// ```
pub fn validate_coordinate(x: f64, y: f64) -> Result<()> {
    if !x.is_finite() {
        return Err(SearchError::InvalidInput(format!(
            "x must be finite, got: {}",
            x
        )));
    }

    if !y.is_finite() {
        return Err(SearchError::InvalidInput(format!(
            "y must be finite, got: {}",
            y
        )));
    }

    Ok(())
}

/// Validates a query radius: finite and non-negative.
///
/// # Examples
///
/// ```
/// use proximity_search::compute::validation::validate_radius;
///
/// assert!(validate_radius(0.0).is_ok());
/// assert!(validate_radius(12.5).is_ok());
/// assert!(validate_radius(-1.0).is_err());
/// assert!(validate_radius(f64::NAN).is_err());
/// ```
pub fn validate_radius(radius: f64) -> Result<()> {
    if !radius.is_finite() {
        return Err(SearchError::InvalidInput(format!(
            "Radius must be finite, got: {}",
            radius
        )));
    }

    if radius < 0.0 {
        return Err(SearchError::InvalidInput(format!(
            "Radius must be non-negative, got: {}",
            radius
        )));
    }

    Ok(())
}

/// Validates every coordinate of a point set, naming the first bad index.
pub fn validate_points(points: &[Coord<f64>]) -> Result<()> {
    for (i, p) in points.iter().enumerate() {
        validate_coordinate(p.x, p.y).map_err(|e| match e {
            SearchError::InvalidInput(msg) => {
                SearchError::InvalidInput(format!("Point {}: {}", i, msg))
            }
            other => other,
        })?;
    }

    Ok(())
}
