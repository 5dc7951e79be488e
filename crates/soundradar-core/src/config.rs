//! Radar configuration
//!
//! Array geometry, physical constants and detection thresholds, stored as
//! JSON at `<data_dir>/soundradar/config.json`. Missing fields take their
//! defaults so partial files stay loadable.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::audio::delay::{max_delay, DelaySearch};
use crate::geometry::{GeometryError, MicrophoneGeometry, Point};

fn default_microphone2() -> [f64; 2] {
    [8.0, -16.0]
}

fn default_microphone3() -> [f64; 2] {
    [-8.0, -16.0]
}

fn default_sample_rate() -> u32 {
    crate::DEFAULT_SAMPLE_RATE
}

fn default_speed_of_sound() -> f64 {
    crate::DEFAULT_SPEED_OF_SOUND
}

fn default_window_size() -> usize {
    crate::DEFAULT_WINDOW_SIZE
}

fn default_min_distance() -> f64 {
    // Twice the widest microphone spacing
    25.0
}

fn default_max_distance() -> f64 {
    200.0
}

fn default_eps() -> f64 {
    0.01
}

/// Errors found when validating a configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Sample rate must be positive")]
    ZeroSampleRate,

    #[error("Speed of sound must be positive and finite, got {0}")]
    InvalidSpeedOfSound(f64),

    #[error("Window size must be positive")]
    ZeroWindowSize,

    #[error("Invalid distance range: min {min}, max {max}")]
    InvalidDistanceRange { min: f64, max: f64 },

    #[error("Tolerance must be positive and finite, got {0}")]
    InvalidTolerance(f64),

    #[error("Invalid microphone geometry: {0}")]
    Geometry(#[from] GeometryError),
}

/// Immutable localization settings passed to every pipeline call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarConfig {
    /// Microphone 2 offset from the reference microphone (cm)
    #[serde(default = "default_microphone2")]
    pub microphone2: [f64; 2],
    /// Microphone 3 offset from the reference microphone (cm)
    #[serde(default = "default_microphone3")]
    pub microphone3: [f64; 2],
    /// Sample rate in Hz
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    /// Speed of sound (cm/s)
    #[serde(default = "default_speed_of_sound")]
    pub speed_of_sound: f64,
    /// Trailing samples compared per delay estimate
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    /// Closer results are not reported (cm)
    #[serde(default = "default_min_distance")]
    pub min_distance: f64,
    /// Farther results become a clipped bearing (cm)
    #[serde(default = "default_max_distance")]
    pub max_distance: f64,
    /// Geometric tolerance
    #[serde(default = "default_eps")]
    pub eps: f64,
    /// Delay search strategy
    #[serde(default)]
    pub search: DelaySearch,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            microphone2: default_microphone2(),
            microphone3: default_microphone3(),
            sample_rate: default_sample_rate(),
            speed_of_sound: default_speed_of_sound(),
            window_size: default_window_size(),
            min_distance: default_min_distance(),
            max_distance: default_max_distance(),
            eps: default_eps(),
            search: DelaySearch::default(),
        }
    }
}

impl RadarConfig {
    /// Config file path: `<data_dir>/soundradar/config.json`
    pub fn path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("soundradar")
            .join("config.json")
    }

    /// Load config from the default path, falling back to defaults on any error
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    /// Load config from `path`, falling back to defaults on any error
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    tracing::info!(path = %path.display(), "Loaded config from disk");
                    config
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                tracing::info!(path = %path.display(), "No config file found, using defaults");
                Self::default()
            }
        }
    }

    /// Save config to disk, creating parent directories if needed
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        tracing::info!(path = %path.display(), "Config saved to disk");
        Ok(())
    }

    /// Check every value the pipeline relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(ConfigError::ZeroSampleRate);
        }
        if !(self.speed_of_sound.is_finite() && self.speed_of_sound > 0.0) {
            return Err(ConfigError::InvalidSpeedOfSound(self.speed_of_sound));
        }
        if self.window_size == 0 {
            return Err(ConfigError::ZeroWindowSize);
        }
        let (min, max) = (self.min_distance, self.max_distance);
        if !(min.is_finite() && max.is_finite() && min >= 0.0 && min <= max) {
            return Err(ConfigError::InvalidDistanceRange { min, max });
        }
        if !(self.eps.is_finite() && self.eps > 0.0) {
            return Err(ConfigError::InvalidTolerance(self.eps));
        }
        self.geometry()?;
        Ok(())
    }

    /// Microphone geometry described by this config
    pub fn geometry(&self) -> Result<MicrophoneGeometry, GeometryError> {
        let [x2, y2] = self.microphone2;
        let [x3, y3] = self.microphone3;
        MicrophoneGeometry::new(Point::new(x2, y2), Point::new(x3, y3))
    }

    /// Largest physically possible sample delay for this array
    ///
    /// Zero when the geometry is degenerate.
    pub fn max_delay(&self) -> usize {
        self.geometry()
            .map(|g| max_delay(&g, self.sample_rate, self.speed_of_sound))
            .unwrap_or(0)
    }

    /// Minimum samples per channel for one localization attempt
    pub fn required_samples(&self) -> usize {
        self.window_size + self.max_delay() + 1
    }
}
