//! Cadenza Core - DSP primitives for the cadenza synthesizer
//!
//! The building blocks here are shared by the voice engine (`cadenza-synth`)
//! and the post-mix effects (`cadenza-effects`). Everything is designed for
//! the audio thread: buffers are sized up front and nothing in a `process`,
//! `read` or `write` path allocates.
//!
//! # Filters
//!
//! - [`OnePole`] - 6 dB/oct lowpass (noise colour, reverb damping)
//! - [`StateVariableFilter`] - TPT state-variable filter with lowpass/highpass outputs
//! - [`CombFilter`] / [`AllpassFilter`] - Freeverb building blocks
//!
//! # Delay
//!
//! - [`DelayBuffer`] - Circular buffer with linearly interpolated fractional reads
//!
//! # Parameters
//!
//! - [`LinearRamp`] - Constant-rate smoothing toward a target value
//! - [`ParamDescriptor`] / [`ParamScale`] / [`ParamKind`] - Parameter metadata
//!
//! # Utilities
//!
//! - [`soft_clip`], [`flush_denormal`], [`mono_sum`], [`lerp`]
//!
//! # no_std Support
//!
//! Disable the default `std` feature for embedded targets:
//!
//! ```toml
//! [dependencies]
//! cadenza-core = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod allpass;
pub mod comb;
pub mod delay;
pub mod math;
pub mod one_pole;
pub mod param_info;
pub mod ramp;
pub mod svf;

pub use allpass::AllpassFilter;
pub use comb::CombFilter;
pub use delay::DelayBuffer;
pub use math::{flush_denormal, lerp, mono_sum, soft_clip};
pub use one_pole::OnePole;
pub use param_info::{ParamDescriptor, ParamKind, ParamScale};
pub use ramp::LinearRamp;
pub use svf::{FilterMode, StateVariableFilter};
