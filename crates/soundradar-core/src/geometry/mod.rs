//! Planar array geometry and hyperbolic bearing solvers
//!
//! The reference microphone is fixed at the origin. Each secondary microphone
//! forms a baseline with it; a path-length difference across a baseline
//! constrains the source to one hyperbola branch, whose asymptotes are
//! the candidate bearings ([`directions`]). Crossing the bearings of both
//! baselines ([`intersect`]) yields candidate positions, from which one
//! result is selected ([`triangulate`]).

pub mod directions;
pub mod intersect;
pub mod triangulate;

use nalgebra::Vector2;
use thiserror::Error;

/// A position in the plane, in the same length unit as the geometry (cm)
pub type Point = Vector2<f64>;

/// A unit direction from a baseline midpoint toward a candidate source
pub type Bearing = Vector2<f64>;

/// Decimal places kept on bearings to stabilize downstream comparisons
pub const BEARING_DECIMALS: i32 = 4;

/// Lengths at or below this are treated as zero
const DEGENERATE_LENGTH: f64 = 1e-9;

/// Errors raised by the geometric solvers
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error(
        "Path difference {path_difference:.4} is not shorter than baseline {baseline:.4}"
    )]
    DomainViolation { path_difference: f64, baseline: f64 },

    #[error("Baseline has zero length")]
    DegenerateBaseline,

    #[error("Microphone {index} coincides with the reference microphone")]
    MicrophoneAtOrigin { index: u8 },

    #[error("Microphones 2 and 3 coincide")]
    CoincidentMicrophones,
}

/// Positions of the two secondary microphones relative to the reference
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MicrophoneGeometry {
    mic2: Point,
    mic3: Point,
}

impl MicrophoneGeometry {
    /// Create a geometry, rejecting degenerate layouts
    ///
    /// # Example
    /// ```
    /// use soundradar_core::{GeometryError, MicrophoneGeometry, Point};
    ///
    /// assert!(MicrophoneGeometry::new(Point::new(8.0, -16.0), Point::new(-8.0, -16.0)).is_ok());
    /// assert_eq!(
    ///     MicrophoneGeometry::new(Point::new(0.0, 0.0), Point::new(-8.0, -16.0)),
    ///     Err(GeometryError::MicrophoneAtOrigin { index: 2 })
    /// );
    /// ```
    pub fn new(mic2: Point, mic3: Point) -> Result<Self, GeometryError> {
        if mic2.norm() <= DEGENERATE_LENGTH {
            return Err(GeometryError::MicrophoneAtOrigin { index: 2 });
        }
        if mic3.norm() <= DEGENERATE_LENGTH {
            return Err(GeometryError::MicrophoneAtOrigin { index: 3 });
        }
        if (mic2 - mic3).norm() <= DEGENERATE_LENGTH {
            return Err(GeometryError::CoincidentMicrophones);
        }
        Ok(Self { mic2, mic3 })
    }

    /// Offset of microphone 2
    pub fn mic2(&self) -> Point {
        self.mic2
    }

    /// Offset of microphone 3
    pub fn mic3(&self) -> Point {
        self.mic3
    }

    /// Midpoints of the two baselines (reference to mic 2, reference to mic 3)
    pub fn midpoints(&self) -> (Point, Point) {
        (self.mic2 / 2.0, self.mic3 / 2.0)
    }

    /// Largest of the three pairwise microphone distances
    pub fn largest_separation(&self) -> f64 {
        self.mic2
            .norm()
            .max(self.mic3.norm())
            .max((self.mic2 - self.mic3).norm())
    }
}

/// Round each component to [`BEARING_DECIMALS`] places
pub(crate) fn round_bearing(v: Vector2<f64>) -> Bearing {
    let scale = 10f64.powi(BEARING_DECIMALS);
    v.map(|c| (c * scale).round() / scale)
}
