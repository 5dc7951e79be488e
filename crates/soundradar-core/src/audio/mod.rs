//! Audio processing module
//!
//! This module contains the sample-domain side of localization:
//! - Delay bound and sliding delay search ([`delay`])
//! - Three-channel capture windows ([`frame`])
//! - Deterministic test signal synthesis ([`synth`])

pub mod delay;
pub mod frame;
pub mod synth;
