//! Three-channel capture windows
//!
//! One capture cycle delivers time-synchronized sample buffers for the
//! reference microphone and the two secondary microphones, all recorded at
//! the same sample rate.

use serde::{Deserialize, Serialize};

/// Channel names used in diagnostics, in frame order
pub const CHANNEL_NAMES: [&str; 3] = ["reference", "mic2", "mic3"];

/// Synchronized samples from all three microphones
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureFrame {
    /// Sample rate in Hz shared by all channels
    pub sample_rate: u32,
    /// Reference microphone at the origin
    pub reference: Vec<f32>,
    /// Microphone 2
    pub mic2: Vec<f32>,
    /// Microphone 3
    pub mic3: Vec<f32>,
}

impl CaptureFrame {
    /// Create a frame from three channel buffers
    pub fn new(sample_rate: u32, reference: Vec<f32>, mic2: Vec<f32>, mic3: Vec<f32>) -> Self {
        Self {
            sample_rate,
            reference,
            mic2,
            mic3,
        }
    }

    /// Channels in frame order
    pub fn channels(&self) -> [&[f32]; 3] {
        [
            self.reference.as_slice(),
            self.mic2.as_slice(),
            self.mic3.as_slice(),
        ]
    }

    /// Length of the shortest channel
    pub fn len(&self) -> usize {
        self.channels().iter().map(|c| c.len()).min().unwrap_or(0)
    }

    /// Whether any channel is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
