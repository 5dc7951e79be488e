//! E2E tests for the localization pipeline
//!
//! Synthesizes captures of sources at known positions and checks what the
//! full chain reports: delay search, path differences and triangulation.

use approx::assert_abs_diff_eq;
use soundradar::geometry::GeometryError;
use soundradar::{
    capture_with_lags, localize, simulate_capture, DelaySearch, LocalizationError,
    LocalizationResult, Localizer, Point, RadarConfig,
};

/// One sample per centimetre so integer source distances give exact delays
fn exact_config(mic2: [f64; 2], mic3: [f64; 2]) -> RadarConfig {
    RadarConfig {
        microphone2: mic2,
        microphone3: mic3,
        sample_rate: 34300,
        speed_of_sound: 34300.0,
        ..Default::default()
    }
}

fn assert_found_near(result: LocalizationResult, expected: Point) {
    match result {
        LocalizationResult::Found(p) => assert_abs_diff_eq!(p, expected, epsilon = 0.5),
        other => panic!("expected a source near {:?}, got {:?}", expected, other),
    }
}

/// Sources at integer distances from every microphone are recovered
#[test]
fn test_recovers_known_sources() {
    let cases = [
        ([-3.0, -15.0], [12.0, -19.0], Point::new(60.0, 45.0)),
        ([-9.0, -18.0], [4.0, -20.0], Point::new(-65.0, 72.0)),
        ([-3.0, -22.0], [6.0, -10.0], Point::new(-120.0, 22.0)),
    ];

    for (mic2, mic3, source) in cases {
        let config = exact_config(mic2, mic3);
        let localizer = Localizer::new(config.clone()).unwrap();
        let frame = simulate_capture(source, &config, localizer.required_samples());
        assert_found_near(localizer.localize(&frame).unwrap(), source);
    }
}

/// Both scoring strategies reach the same result
#[test]
fn test_fft_search_matches_direct() {
    let direct = exact_config([-3.0, -15.0], [12.0, -19.0]);
    let fft = RadarConfig {
        search: DelaySearch::Fft,
        ..direct.clone()
    };
    let frame = simulate_capture(Point::new(60.0, 45.0), &direct, 1200);

    let a = Localizer::new(direct).unwrap().localize(&frame).unwrap();
    let b = Localizer::new(fft).unwrap().localize(&frame).unwrap();
    assert_eq!(a, b);
    assert_found_near(b, Point::new(60.0, 45.0));
}

/// A source beyond the maximum distance is reported as a clipped bearing
#[test]
fn test_far_source_is_clipped() {
    let config = exact_config([-3.0, -15.0], [12.0, -19.0]);
    let frame = simulate_capture(Point::new(240.0, 180.0), &config, 1200);

    match localize(&config, &frame.reference, &frame.mic2, &frame.mic3).unwrap() {
        LocalizationResult::Clipped(p) => {
            assert_abs_diff_eq!(p.norm(), config.max_distance, epsilon = 1e-9);
            assert!(p.y > 0.0);
        }
        other => panic!("expected a clipped bearing, got {:?}", other),
    }
}

/// Default array: a source straight below the array takes the equal-delay shortcut
#[test]
fn test_source_below_array_points_down() {
    let config = RadarConfig::default();
    let frame = simulate_capture(Point::new(0.0, -150.0), &config, config.required_samples());
    let result = Localizer::new(config).unwrap().localize(&frame).unwrap();
    assert_eq!(result, LocalizationResult::Clipped(Point::new(0.0, -200.0)));
}

/// Default array: a source straight above the array takes the equal-delay shortcut
#[test]
fn test_source_above_array_points_up() {
    let config = RadarConfig::default();
    let frame = simulate_capture(Point::new(0.0, 100.0), &config, config.required_samples());
    let result = Localizer::new(config).unwrap().localize(&frame).unwrap();
    assert_eq!(result, LocalizationResult::Clipped(Point::new(0.0, 200.0)));
}

/// Identical channels produce zero delays and no detection at default range
#[test]
fn test_simultaneous_arrival_not_detected() {
    let config = RadarConfig::default();
    let frame = capture_with_lags([0, 0, 0], config.sample_rate, 1500);
    let result = Localizer::new(config).unwrap().localize(&frame).unwrap();
    assert_eq!(result, LocalizationResult::NotDetected);
    assert!(!result.is_detected());
}

/// Longer captures only use their trailing samples
#[test]
fn test_long_capture_uses_trailing_window() {
    let config = exact_config([-3.0, -15.0], [12.0, -19.0]);
    let localizer = Localizer::new(config.clone()).unwrap();

    let mut frame = simulate_capture(Point::new(60.0, 45.0), &config, 5000);
    // Garbage at the start of mic2 falls outside the window
    for sample in frame.mic2.iter_mut().take(1000) {
        *sample = 0.0;
    }
    assert_found_near(localizer.localize(&frame).unwrap(), Point::new(60.0, 45.0));
}

/// Each window is processed independently; repeated calls agree
#[test]
fn test_localization_is_stateless() {
    let config = exact_config([-3.0, -15.0], [12.0, -19.0]);
    let localizer = Localizer::new(config.clone()).unwrap();
    let near = simulate_capture(Point::new(60.0, 45.0), &config, 1200);
    let far = simulate_capture(Point::new(240.0, 180.0), &config, 1200);

    let first = localizer.localize(&near).unwrap();
    localizer.localize(&far).unwrap();
    assert_eq!(localizer.localize(&near).unwrap(), first);
}

/// Windows can be localized concurrently from one shared localizer
#[test]
fn test_concurrent_localization() {
    let config = exact_config([-3.0, -15.0], [12.0, -19.0]);
    let localizer = Localizer::new(config.clone()).unwrap();
    let frame = simulate_capture(Point::new(60.0, 45.0), &config, 1200);
    let (localizer, frame) = (&localizer, &frame);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(move || localizer.localize(frame).unwrap()))
            .collect();
        for handle in handles {
            assert_found_near(handle.join().unwrap(), Point::new(60.0, 45.0));
        }
    });
}

/// Buffers shorter than window + max delay + 1 are rejected before any search
#[test]
fn test_short_capture_rejected() {
    let config = RadarConfig::default();
    let frame = capture_with_lags([0, 2, 3], config.sample_rate, 1022);
    let err = Localizer::new(config).unwrap().localize(&frame).unwrap_err();
    assert_eq!(
        err,
        LocalizationError::BufferTooShort {
            channel: "reference",
            required: 1023,
            actual: 1022
        }
    );
}

/// Delays longer than a baseline can produce surface as a domain error
#[test]
fn test_impossible_delay_rejected() {
    let config = exact_config([-3.0, -15.0], [12.0, -19.0]);
    let frame = capture_with_lags([0, 18, 5], config.sample_rate, 1200);
    let err = Localizer::new(config).unwrap().localize(&frame).unwrap_err();
    assert!(matches!(
        err,
        LocalizationError::Geometry(GeometryError::DomainViolation { .. })
    ));
}
