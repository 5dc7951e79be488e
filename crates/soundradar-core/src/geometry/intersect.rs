//! Forward intersection of two bearing rays
//!
//! Ray 1 starts at `midpoint1` along `direction1`, ray 2 at `midpoint2` along
//! `direction2`. Solving `D * t = midpoint2 - midpoint1` with the directions
//! as the columns of `D` gives `t = (t1, -t2)`, so the second scalar is
//! negated before both are checked for being strictly forward.

use nalgebra::Matrix2;

use super::{Bearing, Point};

/// Outcome of intersecting one bearing from each baseline
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Candidate {
    /// Both rays meet ahead of their midpoints
    Point(Point),
    /// The rays run the same way; the source is arbitrarily far along them
    AtInfinity,
    /// The rays are anti-parallel or meet behind a midpoint
    NoSolution,
}

impl Candidate {
    /// Distance from the reference microphone used for ranking
    ///
    /// `NoSolution` ranks as the origin, so it never beats a real
    /// intersection.
    pub fn distance(&self) -> f64 {
        match self {
            Candidate::Point(p) => p.norm(),
            Candidate::AtInfinity => f64::INFINITY,
            Candidate::NoSolution => 0.0,
        }
    }

    /// The intersection point, if there is a finite one
    pub fn point(&self) -> Option<Point> {
        match self {
            Candidate::Point(p) => Some(*p),
            _ => None,
        }
    }
}

/// Intersect two bearing rays, accepting only forward solutions
///
/// # Arguments
/// * `direction1` - Bearing of the first ray
/// * `direction2` - Bearing of the second ray
/// * `midpoint1` - Origin of the first ray
/// * `midpoint2` - Origin of the second ray
/// * `eps` - Tolerance for parallel directions and a singular system
pub fn solve_intersect(
    direction1: Bearing,
    direction2: Bearing,
    midpoint1: Point,
    midpoint2: Point,
    eps: f64,
) -> Candidate {
    if (direction1 - direction2).norm() < eps {
        return Candidate::AtInfinity;
    }

    let directions = Matrix2::from_columns(&[direction1, direction2]);
    if directions.determinant().abs() < eps {
        return Candidate::NoSolution;
    }
    let Some(inverse) = directions.try_inverse() else {
        return Candidate::NoSolution;
    };

    let mut scalars = inverse * (midpoint2 - midpoint1);
    scalars.y = -scalars.y;

    if scalars.x > 0.0 && scalars.y > 0.0 {
        // Mean of the two ray positions
        Candidate::Point((directions * scalars + midpoint1 + midpoint2) / 2.0)
    } else {
        Candidate::NoSolution
    }
}
