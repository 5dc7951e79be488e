//! Candidate selection across both baselines
//!
//! Each baseline contributes two bearings. Crossing them gives four
//! candidates, in this fixed order:
//!
//! ```text
//! 0: (d11, d22)   1: (d11, d21)   2: (d12, d22)   3: (d12, d21)
//! ```
//!
//! The candidate farthest from the reference wins (first one on ties), then
//! the distance range decides between a found location, a clipped bearing
//! and no detection.

use super::directions::find_directions;
use super::intersect::{solve_intersect, Candidate};
use super::{GeometryError, MicrophoneGeometry};
use crate::locate::LocalizationResult;

/// Locate a source from the path-length differences of both baselines
///
/// # Arguments
/// * `geometry` - Secondary microphone positions
/// * `t1` - Path difference across the reference/mic 2 baseline
/// * `t2` - Path difference across the reference/mic 3 baseline
/// * `min_dist` - Winning distances strictly below this are not reported
/// * `max_dist` - Winning distances strictly above this become a clipped bearing
/// * `eps` - Geometric tolerance
pub fn triangulate(
    geometry: &MicrophoneGeometry,
    t1: f64,
    t2: f64,
    min_dist: f64,
    max_dist: f64,
    eps: f64,
) -> Result<LocalizationResult, GeometryError> {
    let (d11, d12) = find_directions(geometry.mic2(), t1, eps)?;
    let (d21, d22) = find_directions(geometry.mic3(), t2, eps)?;
    let (midpoint1, midpoint2) = geometry.midpoints();

    let candidates = [(d11, d22), (d11, d21), (d12, d22), (d12, d21)]
        .map(|(a, b)| solve_intersect(a, b, midpoint1, midpoint2, eps));

    let (winner, distance) = candidates.iter().map(Candidate::distance).enumerate().fold(
        (0, f64::NEG_INFINITY),
        |(best, best_distance), (i, distance)| {
            if distance > best_distance {
                (i, distance)
            } else {
                (best, best_distance)
            }
        },
    );

    tracing::debug!(
        ?candidates,
        winner,
        distance,
        "candidates_ranked"
    );

    if distance > max_dist {
        // Pairings 0 and 3 clip along d11 + d22, pairings 1 and 2 along d12 + d21
        let direction = if winner == 0 || winner == 3 {
            d11 + d22
        } else {
            d12 + d21
        };
        let length = direction.norm();
        if length < eps {
            tracing::warn!(winner, "clipped_bearing_degenerate");
            return Ok(LocalizationResult::NotDetected);
        }
        return Ok(LocalizationResult::Clipped(direction / length * max_dist));
    }

    if distance < min_dist {
        return Ok(LocalizationResult::NotDetected);
    }

    match candidates[winner] {
        Candidate::Point(p) => Ok(LocalizationResult::Found(p)),
        other => {
            // Only reachable when the range admits an origin or infinite distance
            tracing::warn!(candidate = ?other, "no_finite_candidate");
            Ok(LocalizationResult::NotDetected)
        }
    }
}
