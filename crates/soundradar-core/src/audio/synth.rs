//! Deterministic test signal synthesis
//!
//! Produces broadband noise and three-channel captures of it as heard by the
//! array from a known source position. Delays are whole samples, so a
//! capture synthesized here aligns exactly at its true delays.

use crate::audio::frame::CaptureFrame;
use crate::config::RadarConfig;
use crate::geometry::Point;

/// Default generator seed (any non-zero value works)
const DEFAULT_SEED: u32 = 0x1D87_2B41;

/// Peak sample magnitude, -6dB to leave headroom
const AMPLITUDE: f32 = 0.5;

/// Broadband noise generator
///
/// Uses a 32-bit xorshift register, so the same seed always yields the same
/// sequence. Samples are uniform in `[-0.5, 0.5]`.
///
/// # Example
/// ```
/// use soundradar_core::NoiseGenerator;
///
/// let mut gen = NoiseGenerator::new(42);
/// assert!(gen.next_sample().abs() <= 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct NoiseGenerator {
    /// Current register state (never zero)
    state: u32,
}

impl NoiseGenerator {
    /// Create a generator; a zero seed is replaced by the default one
    pub fn new(seed: u32) -> Self {
        let state = if seed == 0 { DEFAULT_SEED } else { seed };
        Self { state }
    }

    /// Next noise sample
    pub fn next_sample(&mut self) -> f32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;

        let unit = x as f64 / u32::MAX as f64 * 2.0 - 1.0;
        unit as f32 * AMPLITUDE
    }

    /// Collect the next `len` samples
    pub fn take_samples(&mut self, len: usize) -> Vec<f32> {
        (0..len).map(|_| self.next_sample()).collect()
    }
}

impl Default for NoiseGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

/// Capture of one noise burst with explicit per-channel lags
///
/// Channel `i` holds the shared waveform delayed by `lags[i]` samples
/// (negative lags advance it). Every channel has exactly `length` samples.
///
/// # Arguments
/// * `lags` - Lags of reference, mic 2 and mic 3
/// * `sample_rate` - Rate recorded in the frame
/// * `length` - Samples per channel
pub fn capture_with_lags(lags: [i64; 3], sample_rate: u32, length: usize) -> CaptureFrame {
    let pad = lags.iter().map(|l| l.unsigned_abs()).max().unwrap_or(0) as usize;
    let base = NoiseGenerator::default().take_samples(length + 2 * pad);

    let channel = |lag: i64| -> Vec<f32> {
        (0..length)
            .map(|k| base[(pad as i64 + k as i64 - lag) as usize])
            .collect()
    };

    CaptureFrame::new(
        sample_rate,
        channel(lags[0]),
        channel(lags[1]),
        channel(lags[2]),
    )
}

/// Capture of a noise burst emitted at `source`, as heard by the configured array
///
/// Each secondary channel lags the reference by its extra path length,
/// rounded to whole samples.
pub fn simulate_capture(source: Point, config: &RadarConfig, length: usize) -> CaptureFrame {
    let rate = config.sample_rate as f64;
    let [x2, y2] = config.microphone2;
    let [x3, y3] = config.microphone3;

    let distances = [Point::zeros(), Point::new(x2, y2), Point::new(x3, y3)]
        .map(|mic| (source - mic).norm());
    let lags = distances
        .map(|r| ((r - distances[0]) * rate / config.speed_of_sound).round() as i64);

    tracing::debug!(
        source_x = source.x,
        source_y = source.y,
        lag2 = lags[1],
        lag3 = lags[2],
        "capture_simulated"
    );

    capture_with_lags(lags, config.sample_rate, length)
}
