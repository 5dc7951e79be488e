//! Localization pipeline
//!
//! Runs one capture window through the whole chain:
//!
//! ```text
//! delay bound -> delay(reference, mic2) -> path differences -> triangulation
//!             -> delay(reference, mic3) ->
//! ```
//!
//! Nothing is carried between calls apart from the immutable configuration,
//! so windows can be localized independently and concurrently.

pub mod result;

pub use result::LocalizationResult;

use thiserror::Error;

use crate::audio::delay::{DelayError, DelayEstimator};
use crate::audio::frame::{CaptureFrame, CHANNEL_NAMES};
use crate::config::{ConfigError, RadarConfig};
use crate::geometry::triangulate::triangulate;
use crate::geometry::{GeometryError, MicrophoneGeometry, Point};

/// Errors that can occur during localization
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocalizationError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Delay estimation failed: {0}")]
    Delay(#[from] DelayError),

    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("Sample rate mismatch: expected {expected}, got {actual}")]
    SampleRateMismatch { expected: u32, actual: u32 },

    #[error("Channel {channel} too short: need {required} samples, got {actual}")]
    BufferTooShort {
        channel: &'static str,
        required: usize,
        actual: usize,
    },
}

/// Sound source locator for a fixed configuration
///
/// Validates the configuration once and precomputes the delay bound.
///
/// # Example
/// ```
/// use soundradar_core::{capture_with_lags, Localizer, LocalizationResult, Point, RadarConfig};
///
/// let config = RadarConfig::default();
/// let localizer = Localizer::new(config.clone()).unwrap();
///
/// // Both secondary microphones hear the sound 4 samples after the reference
/// let frame = capture_with_lags([0, 4, 4], config.sample_rate, localizer.required_samples());
/// let result = localizer.localize(&frame).unwrap();
/// assert_eq!(result, LocalizationResult::Clipped(Point::new(0.0, 200.0)));
/// ```
#[derive(Debug, Clone)]
pub struct Localizer {
    config: RadarConfig,
    geometry: MicrophoneGeometry,
    estimator: DelayEstimator,
}

impl Localizer {
    /// Create a localizer, validating the configuration
    pub fn new(config: RadarConfig) -> Result<Self, LocalizationError> {
        config.validate()?;
        let geometry = config.geometry()?;
        let estimator = DelayEstimator::new(config.max_delay(), config.window_size, config.search)?;

        tracing::debug!(
            max_delay = estimator.max_delay(),
            window_size = config.window_size,
            search = ?config.search,
            "localizer_ready"
        );

        Ok(Self {
            config,
            geometry,
            estimator,
        })
    }

    /// Localize the sound source in one capture window
    pub fn localize(&self, frame: &CaptureFrame) -> Result<LocalizationResult, LocalizationError> {
        if frame.sample_rate != self.config.sample_rate {
            return Err(LocalizationError::SampleRateMismatch {
                expected: self.config.sample_rate,
                actual: frame.sample_rate,
            });
        }
        let [reference, mic2, mic3] = frame.channels();
        self.localize_samples(reference, mic2, mic3)
    }

    /// Localize from raw channel buffers recorded at the configured rate
    pub fn localize_samples(
        &self,
        reference: &[f32],
        mic2: &[f32],
        mic3: &[f32],
    ) -> Result<LocalizationResult, LocalizationError> {
        let required = self.required_samples();
        for (channel, samples) in CHANNEL_NAMES.into_iter().zip([reference, mic2, mic3]) {
            if samples.len() < required {
                return Err(LocalizationError::BufferTooShort {
                    channel,
                    required,
                    actual: samples.len(),
                });
            }
        }

        let config = &self.config;
        let delay2 = self.estimator.estimate(reference, mic2)?;
        let delay3 = self.estimator.estimate(reference, mic3)?;
        let distance2 = delay2.path_difference(config.sample_rate, config.speed_of_sound);
        let distance3 = delay3.path_difference(config.sample_rate, config.speed_of_sound);

        tracing::debug!(
            delay2 = delay2.samples,
            delay3 = delay3.samples,
            distance2,
            distance3,
            "delays_estimated"
        );

        // Equal differences put the source on the bisector of the mic 2/3
        // pair; exactly zero falls through to triangulation
        if distance2 == distance3 {
            if distance2 < 0.0 {
                return Ok(LocalizationResult::Clipped(Point::new(
                    0.0,
                    -config.max_distance,
                )));
            }
            if distance2 > 0.0 {
                return Ok(LocalizationResult::Clipped(Point::new(
                    0.0,
                    config.max_distance,
                )));
            }
        }

        let result = triangulate(
            &self.geometry,
            distance2,
            distance3,
            config.min_distance,
            config.max_distance,
            config.eps,
        )?;

        tracing::debug!(%result, "source_localized");
        Ok(result)
    }

    /// Minimum samples per channel
    pub fn required_samples(&self) -> usize {
        self.estimator.window_size() + self.estimator.max_delay() + 1
    }

    /// Largest physically possible sample delay
    pub fn max_delay(&self) -> usize {
        self.estimator.max_delay()
    }

    /// Configuration in use
    pub fn config(&self) -> &RadarConfig {
        &self.config
    }
}

/// Localize one set of channel buffers with the given configuration
///
/// Convenience wrapper over [`Localizer`] for single calls.
pub fn localize(
    config: &RadarConfig,
    reference: &[f32],
    mic2: &[f32],
    mic3: &[f32],
) -> Result<LocalizationResult, LocalizationError> {
    Localizer::new(config.clone())?.localize_samples(reference, mic2, mic3)
}
