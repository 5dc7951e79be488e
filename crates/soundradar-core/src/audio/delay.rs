//! Delay bound calculation and sliding delay search
//!
//! The delay between two channels is found by sliding one trailing window
//! against the other over every physically possible integer offset and
//! scoring the overlap by its length-normalized L2 distance. This is an
//! alignment search, not a correlation peak search: the winning offset is the
//! first one (in ascending order) with the smallest score.
//!
//! ```text
//! delay d > 0:  reference[i] aligns with other[i + d]   (other lags)
//! delay d < 0:  reference[i] aligns with other[i - |d|] (other leads)
//! score(d)    = ||reference_overlap - other_overlap||_2 / overlap_len
//! ```

use rustfft::{num_complex::Complex, FftPlanner};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use thiserror::Error;

use crate::geometry::MicrophoneGeometry;

/// FFT scores within this fraction of the window's L2 scale count as tied
const FFT_TIE_TOLERANCE: f64 = 1e-4;

/// Errors that can occur during delay estimation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DelayError {
    #[error("Window too short: need {required} samples, got {actual}")]
    WindowTooShort { required: usize, actual: usize },

    #[error("Maximum delay of 0 samples leaves no candidate delay")]
    EmptySearchRange,

    #[error("Window of {window_size} samples cannot cover a maximum delay of {max_delay}")]
    WindowNotLongerThanDelay { window_size: usize, max_delay: usize },
}

/// How candidate delays are scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DelaySearch {
    /// Score every overlap directly, O(max_delay * window_size)
    #[default]
    Direct,
    /// Score every overlap from one FFT cross-correlation and prefix energies
    Fft,
}

/// Result of a delay search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayEstimate {
    /// Signed delay in samples (positive when the other channel lags)
    pub samples: i64,
    /// Normalized L2 distance of the aligned overlap
    pub score: f64,
}

impl DelayEstimate {
    /// Convert the delay into a signed path-length difference
    ///
    /// Units follow `speed_of_sound` (cm/s gives cm).
    pub fn path_difference(&self, sample_rate: u32, speed_of_sound: f64) -> f64 {
        self.samples as f64 * speed_of_sound / sample_rate as f64
    }
}

/// Upper bound on the sample delay any pair of microphones can produce
///
/// Uses the largest of the three pairwise microphone distances as the
/// worst-case path-length difference and floors it to whole samples.
///
/// # Example
/// ```
/// use soundradar_core::{max_delay, MicrophoneGeometry, Point};
///
/// let geometry = MicrophoneGeometry::new(Point::new(8.0, -16.0), Point::new(-8.0, -16.0)).unwrap();
/// assert_eq!(max_delay(&geometry, 44100, 34314.0), 22);
/// ```
pub fn max_delay(geometry: &MicrophoneGeometry, sample_rate: u32, speed_of_sound: f64) -> usize {
    let largest_distance = geometry.largest_separation();
    (sample_rate as f64 * largest_distance / speed_of_sound).floor() as usize
}

/// Sliding delay estimator over fixed-size trailing windows
#[derive(Debug, Clone)]
pub struct DelayEstimator {
    /// Exclusive bound on |delay|
    max_delay: usize,
    /// Trailing samples compared per estimate
    window_size: usize,
    /// Scoring strategy
    search: DelaySearch,
}

impl DelayEstimator {
    /// Create a new estimator
    ///
    /// # Arguments
    /// * `max_delay` - Candidate delays are `-(max_delay - 1)..=(max_delay - 1)`
    /// * `window_size` - Number of trailing samples compared
    /// * `search` - Scoring strategy
    pub fn new(
        max_delay: usize,
        window_size: usize,
        search: DelaySearch,
    ) -> Result<Self, DelayError> {
        if max_delay == 0 {
            return Err(DelayError::EmptySearchRange);
        }
        if window_size < max_delay {
            return Err(DelayError::WindowNotLongerThanDelay {
                window_size,
                max_delay,
            });
        }

        Ok(Self {
            max_delay,
            window_size,
            search,
        })
    }

    /// Candidate delays in scan order
    pub fn candidate_delays(&self) -> RangeInclusive<i64> {
        let bound = self.max_delay as i64 - 1;
        -bound..=bound
    }

    /// Estimate how many samples `other` lags `reference`
    ///
    /// Both inputs are truncated to their last `window_size` samples.
    pub fn estimate(&self, reference: &[f32], other: &[f32]) -> Result<DelayEstimate, DelayError> {
        let w = self.window_size;
        for samples in [reference, other] {
            if samples.len() < w {
                return Err(DelayError::WindowTooShort {
                    required: w,
                    actual: samples.len(),
                });
            }
        }

        let reference = &reference[reference.len() - w..];
        let other = &other[other.len() - w..];

        let scores = match self.search {
            DelaySearch::Direct => direct_scores(reference, other, self.candidate_delays()),
            DelaySearch::Fft => refine_near_ties(
                reference,
                other,
                fft_scores(reference, other, self.candidate_delays()),
            ),
        };

        // Candidate range is never empty once constructed
        let best = first_argmin(scores).ok_or(DelayError::EmptySearchRange)?;

        tracing::trace!(
            delay = best.samples,
            score = best.score,
            search = ?self.search,
            "delay_estimated"
        );

        Ok(best)
    }

    /// Exclusive bound on |delay|
    pub fn max_delay(&self) -> usize {
        self.max_delay
    }

    /// Trailing window length
    pub fn window_size(&self) -> usize {
        self.window_size
    }
}

/// Direct sliding delay search with the default strategy
///
/// # Arguments
/// * `sound1` - Reference channel
/// * `sound2` - Channel whose delay relative to `sound1` is wanted
/// * `max_delay` - Exclusive bound on |delay|
/// * `window_size` - Number of trailing samples compared
pub fn sliding_optimize(
    sound1: &[f32],
    sound2: &[f32],
    max_delay: usize,
    window_size: usize,
) -> Result<DelayEstimate, DelayError> {
    DelayEstimator::new(max_delay, window_size, DelaySearch::Direct)?.estimate(sound1, sound2)
}

/// Overlapping parts of two equal-length windows at the given delay
fn overlap<'a>(reference: &'a [f32], other: &'a [f32], delay: i64) -> (&'a [f32], &'a [f32]) {
    let shift = delay.unsigned_abs() as usize;
    let n = reference.len();
    if delay >= 0 {
        (&reference[..n - shift], &other[shift..])
    } else {
        (&reference[shift..], &other[..n - shift])
    }
}

/// Normalized L2 distance of the overlap at one delay
fn direct_score(reference: &[f32], other: &[f32], delay: i64) -> f64 {
    let (a, b) = overlap(reference, other, delay);
    let sum_sq: f64 = a
        .iter()
        .zip(b)
        .map(|(&x, &y)| {
            let diff = x as f64 - y as f64;
            diff * diff
        })
        .sum();
    sum_sq.sqrt() / a.len() as f64
}

fn direct_scores(
    reference: &[f32],
    other: &[f32],
    delays: RangeInclusive<i64>,
) -> Vec<(i64, f64)> {
    delays
        .map(|delay| (delay, direct_score(reference, other, delay)))
        .collect()
}

/// Rescore FFT candidates that are within rounding of the best one
///
/// FFT rounding turns exact ties into near-ties, so every candidate close
/// enough to the minimum gets its exact score back before the argmin.
/// Candidates keep their scan order.
fn refine_near_ties(
    reference: &[f32],
    other: &[f32],
    scores: Vec<(i64, f64)>,
) -> Vec<(i64, f64)> {
    let best = scores.iter().map(|&(_, s)| s).fold(f64::INFINITY, f64::min);
    let widest_shift = scores
        .iter()
        .map(|&(d, _)| d.unsigned_abs() as usize)
        .max()
        .unwrap_or(0);
    let shortest_overlap = reference.len().saturating_sub(widest_shift).max(1);

    let energy: f64 = reference
        .iter()
        .chain(other)
        .map(|&x| x as f64 * x as f64)
        .sum();
    let tolerance = FFT_TIE_TOLERANCE * energy.sqrt() / shortest_overlap as f64;

    scores
        .into_iter()
        .filter(|&(_, score)| score <= best + tolerance)
        .map(|(delay, _)| (delay, direct_score(reference, other, delay)))
        .collect()
}

/// Same scores as [`direct_scores`] via `|a - b|^2 = |a|^2 + |b|^2 - 2 a.b`
fn fft_scores(reference: &[f32], other: &[f32], delays: RangeInclusive<i64>) -> Vec<(i64, f64)> {
    let n = reference.len();
    // Zero padding to at least 2n keeps the circular correlation linear
    let fft_size = (n * 2).next_power_of_two();

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(fft_size);
    let ifft = planner.plan_fft_inverse(fft_size);

    let padded = |samples: &[f32]| -> Vec<Complex<f64>> {
        samples
            .iter()
            .map(|&x| Complex::new(x as f64, 0.0))
            .chain(std::iter::repeat(Complex::new(0.0, 0.0)))
            .take(fft_size)
            .collect()
    };

    let mut reference_spectrum = padded(reference);
    let mut correlation = padded(other);
    fft.process(&mut reference_spectrum);
    fft.process(&mut correlation);

    // correlation[k] = sum_i reference[i] * other[i + k]
    for (c, r) in correlation.iter_mut().zip(&reference_spectrum) {
        *c *= r.conj();
    }
    ifft.process(&mut correlation);
    let norm = 1.0 / fft_size as f64;

    let prefix_energy = |samples: &[f32]| -> Vec<f64> {
        let mut acc = 0.0;
        std::iter::once(0.0)
            .chain(samples.iter().map(|&x| {
                acc += x as f64 * x as f64;
                acc
            }))
            .collect()
    };
    let reference_energy = prefix_energy(reference);
    let other_energy = prefix_energy(other);

    delays
        .map(|delay| {
            let shift = delay.unsigned_abs() as usize;
            let len = n - shift;
            let (e_ref, e_other) = if delay >= 0 {
                (
                    reference_energy[len],
                    other_energy[n] - other_energy[shift],
                )
            } else {
                (
                    reference_energy[n] - reference_energy[shift],
                    other_energy[len],
                )
            };
            let index = delay.rem_euclid(fft_size as i64) as usize;
            let cross = correlation[index].re * norm;
            let sum_sq = (e_ref + e_other - 2.0 * cross).max(0.0);
            (delay, sum_sq.sqrt() / len as f64)
        })
        .collect()
}

/// Lowest score wins; ties keep the earliest delay in scan order
fn first_argmin(scores: impl IntoIterator<Item = (i64, f64)>) -> Option<DelayEstimate> {
    scores
        .into_iter()
        .fold(None, |best: Option<DelayEstimate>, (samples, score)| match best {
            Some(b) if score >= b.score => Some(b),
            _ => Some(DelayEstimate { samples, score }),
        })
}
