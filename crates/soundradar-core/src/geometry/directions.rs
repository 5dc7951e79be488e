//! Hyperbola asymptote directions for one baseline
//!
//! Work happens in a frame where the baseline lies on the x-axis. For a
//! baseline of length `d` and path-length difference `c`, the asymptotes of
//! the constant-difference hyperbola have slope `sqrt((d / c)^2 - 1)`. The
//! sign of `c` picks the branch: positive means the secondary microphone
//! hears the sound later, so the branch opens away from it.

use nalgebra::{Rotation2, Vector2};

use super::{round_bearing, Bearing, GeometryError, Point};

/// Candidate bearings for a baseline and path-length difference
///
/// # Arguments
/// * `point` - Secondary microphone position relative to the reference
/// * `path_difference` - Signed path-length difference (secondary minus reference)
/// * `eps` - Relative difference below which the hyperbola is its perpendicular bisector
///
/// # Returns
/// Two unit bearings, rounded to 4 decimal places
///
/// # Errors
/// [`GeometryError::DomainViolation`] when `|path_difference|` is not shorter
/// than the baseline, which no real source can produce.
///
/// # Example
/// ```
/// use soundradar_core::geometry::directions::find_directions;
/// use soundradar_core::Point;
///
/// let (up, down) = find_directions(Point::new(1.0, 0.0), 0.0, 0.01).unwrap();
/// assert_eq!(up, Point::new(0.0, 1.0));
/// assert_eq!(down, Point::new(0.0, -1.0));
/// ```
pub fn find_directions(
    point: Point,
    path_difference: f64,
    eps: f64,
) -> Result<(Bearing, Bearing), GeometryError> {
    let baseline = point.norm();
    if baseline <= 0.0 {
        return Err(GeometryError::DegenerateBaseline);
    }

    let rotation = Rotation2::new(point.y.atan2(point.x));
    let c = path_difference;

    let (first, second) = if c.abs() / baseline < eps {
        (Vector2::new(0.0, 1.0), Vector2::new(0.0, -1.0))
    } else {
        if c.is_nan() || c.abs() >= baseline {
            return Err(GeometryError::DomainViolation {
                path_difference: c,
                baseline,
            });
        }

        let slope = ((baseline / c).powi(2) - 1.0).sqrt();
        if c > 0.0 {
            (Vector2::new(-1.0, slope), Vector2::new(-1.0, -slope))
        } else {
            (Vector2::new(1.0, slope), Vector2::new(1.0, -slope))
        }
    };

    Ok((
        round_bearing((rotation * first).normalize()),
        round_bearing((rotation * second).normalize()),
    ))
}
