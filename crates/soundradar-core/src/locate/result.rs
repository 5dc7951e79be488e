//! Localization outcome for one capture window

use crate::geometry::Point;

/// Outcome of one localization attempt
///
/// Every variant is a successful outcome; failures are reported through
/// [`LocalizationError`](super::LocalizationError).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocalizationResult {
    /// Source position within the configured range
    Found(Point),
    /// Bearing toward a source beyond the maximum range, scaled to that range
    Clipped(Point),
    /// Nothing trustworthy in range
    NotDetected,
}

impl LocalizationResult {
    /// Reported position, if any
    pub fn position(&self) -> Option<Point> {
        match self {
            LocalizationResult::Found(p) | LocalizationResult::Clipped(p) => Some(*p),
            LocalizationResult::NotDetected => None,
        }
    }

    /// Distance of the reported position from the reference microphone
    pub fn distance(&self) -> Option<f64> {
        self.position().map(|p| p.norm())
    }

    /// Bearing in degrees, counter-clockwise from the +x axis, in (-180, 180]
    pub fn bearing_degrees(&self) -> Option<f64> {
        self.position().map(|p| p.y.atan2(p.x).to_degrees())
    }

    /// Whether anything was reported
    pub fn is_detected(&self) -> bool {
        !matches!(self, LocalizationResult::NotDetected)
    }
}

impl std::fmt::Display for LocalizationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocalizationResult::Found(p) => write!(f, "found at ({:.1}, {:.1})", p.x, p.y),
            LocalizationResult::Clipped(p) => {
                write!(f, "beyond range, bearing through ({:.1}, {:.1})", p.x, p.y)
            }
            LocalizationResult::NotDetected => write!(f, "not detected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_found_helpers() {
        let result = LocalizationResult::Found(Point::new(0.0, 100.0));
        assert!(result.is_detected());
        assert_eq!(result.position(), Some(Point::new(0.0, 100.0)));
        assert_abs_diff_eq!(result.distance().unwrap(), 100.0);
        assert_abs_diff_eq!(result.bearing_degrees().unwrap(), 90.0);
    }

    #[test]
    fn test_clipped_helpers() {
        let result = LocalizationResult::Clipped(Point::new(-200.0, 0.0));
        assert!(result.is_detected());
        assert_abs_diff_eq!(result.distance().unwrap(), 200.0);
        assert_abs_diff_eq!(result.bearing_degrees().unwrap(), 180.0);
    }

    #[test]
    fn test_not_detected_helpers() {
        let result = LocalizationResult::NotDetected;
        assert!(!result.is_detected());
        assert_eq!(result.position(), None);
        assert_eq!(result.distance(), None);
        assert_eq!(result.bearing_degrees(), None);
        assert_eq!(result.to_string(), "not detected");
    }

    #[test]
    fn test_display() {
        let result = LocalizationResult::Found(Point::new(60.14, 44.89));
        assert_eq!(result.to_string(), "found at (60.1, 44.9)");
    }
}
