//! Soundradar - three-microphone sound source locator
//!
//! This library re-exports the localization engine, delay estimation,
//! geometry and configuration from `soundradar-core`.
//!
//! The command line front end lives in `main.rs`.

pub use soundradar_core::audio;
pub use soundradar_core::config;
pub use soundradar_core::geometry;
pub use soundradar_core::locate;

pub use soundradar_core::{
    capture_with_lags, localize, simulate_capture, CaptureFrame, DelayEstimator, DelaySearch,
    LocalizationError, LocalizationResult, Localizer, NoiseGenerator, Point, RadarConfig,
};
pub use soundradar_core::{DEFAULT_SAMPLE_RATE, DEFAULT_SPEED_OF_SOUND, DEFAULT_WINDOW_SIZE, VERSION};
