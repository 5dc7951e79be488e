//! E2E tests for delay bound and sliding delay search
//!
//! Verifies that delays between noise channels are recovered exactly within
//! the physical bound, with both scoring strategies.

use soundradar::audio::delay::{max_delay, sliding_optimize, DelayError};
use soundradar::geometry::MicrophoneGeometry;
use soundradar::{capture_with_lags, DelayEstimator, DelaySearch, Point, RadarConfig};

/// Default array at 44.1 kHz allows 22 samples of delay
#[test]
fn test_default_array_delay_bound() {
    let geometry =
        MicrophoneGeometry::new(Point::new(8.0, -16.0), Point::new(-8.0, -16.0)).unwrap();
    assert_eq!(max_delay(&geometry, 44100, 34314.0), 22);
    assert_eq!(max_delay(&geometry, 44100, 34300.0), 22);
    // Doubling the rate doubles the bound
    assert_eq!(max_delay(&geometry, 88200, 34314.0), 45);
}

/// Every delay inside the bound is recovered exactly, in both directions
#[test]
fn test_recovers_every_delay_in_range() {
    let bound = RadarConfig::default().max_delay();

    for lag in -(bound as i64 - 1)..=(bound as i64 - 1) {
        let frame = capture_with_lags([0, lag, 0], 44100, 1100);
        let estimate = sliding_optimize(&frame.reference, &frame.mic2, bound, 1000).unwrap();
        assert_eq!(estimate.samples, lag, "lag {} not recovered", lag);
        assert_eq!(estimate.score, 0.0);
    }
}

/// Strategies agree on the winning delay for every lag
#[test]
fn test_fft_and_direct_agree() {
    let direct = DelayEstimator::new(22, 1000, DelaySearch::Direct).unwrap();
    let fft = DelayEstimator::new(22, 1000, DelaySearch::Fft).unwrap();

    for lag in [-21, -10, -3, 0, 4, 15, 21] {
        let frame = capture_with_lags([0, lag, 0], 44100, 1100);
        let a = direct.estimate(&frame.reference, &frame.mic2).unwrap();
        let b = fft.estimate(&frame.reference, &frame.mic2).unwrap();
        assert_eq!(a.samples, lag);
        assert_eq!(b.samples, lag);
    }
}

/// Lags relative to a shifted reference are what count
#[test]
fn test_delay_is_relative_to_reference() {
    let frame = capture_with_lags([3, 10, -2], 44100, 1100);
    let estimator = DelayEstimator::new(22, 1000, DelaySearch::Direct).unwrap();

    assert_eq!(estimator.estimate(&frame.reference, &frame.mic2).unwrap().samples, 7);
    assert_eq!(estimator.estimate(&frame.reference, &frame.mic3).unwrap().samples, -5);
}

/// Windows shorter than the configured size are rejected
#[test]
fn test_short_window_rejected() {
    let frame = capture_with_lags([0, 1, 2], 44100, 999);
    let err = sliding_optimize(&frame.reference, &frame.mic2, 22, 1000).unwrap_err();
    assert_eq!(
        err,
        DelayError::WindowTooShort {
            required: 1000,
            actual: 999
        }
    );
}

/// A zero bound leaves nothing to search
#[test]
fn test_zero_bound_rejected() {
    let frame = capture_with_lags([0, 0, 0], 44100, 100);
    assert_eq!(
        sliding_optimize(&frame.reference, &frame.mic2, 0, 50),
        Err(DelayError::EmptySearchRange)
    );
}
