//! Soundradar Core - TDOA sound source localization
//!
//! Locates the origin of a sound event in a 2D plane from three time-synchronized
//! microphone recordings. The reference microphone sits at the origin; the other
//! two are arbitrary offsets. Each capture window is processed independently:
//!
//! 1. Bound the physically possible sample delay from the array geometry
//! 2. Estimate the delay of each secondary channel against the reference
//! 3. Convert delays to path-length differences
//! 4. Intersect the hyperbola asymptotes of both baselines and pick a result
//!
//! ```
//! use soundradar_core::{simulate_capture, Localizer, LocalizationResult, Point, RadarConfig};
//!
//! let config = RadarConfig::default();
//! let localizer = Localizer::new(config.clone()).unwrap();
//! let frame = simulate_capture(Point::new(0.0, -150.0), &config, config.required_samples());
//!
//! match localizer.localize(&frame).unwrap() {
//!     LocalizationResult::Clipped(p) => assert!(p.y < 0.0),
//!     other => panic!("unexpected result: {:?}", other),
//! }
//! ```

pub mod audio;
pub mod config;
pub mod geometry;
pub mod locate;

pub use audio::delay::{max_delay, sliding_optimize, DelayEstimate, DelayEstimator, DelaySearch};
pub use audio::frame::CaptureFrame;
pub use audio::synth::{capture_with_lags, simulate_capture, NoiseGenerator};
pub use config::RadarConfig;
pub use geometry::{Bearing, GeometryError, MicrophoneGeometry, Point};
pub use locate::{localize, LocalizationError, LocalizationResult, Localizer};

/// Library version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default sample rate in Hz
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Speed of sound in cm/s at room temperature
pub const DEFAULT_SPEED_OF_SOUND: f64 = 34314.0;

/// Trailing samples compared per delay estimate
pub const DEFAULT_WINDOW_SIZE: usize = 1000;
