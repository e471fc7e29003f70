//! Cadenza Synth - Polyphonic voice engine for the cadenza synthesizer
//!
//! Every sample of every voice runs the same fixed chain:
//!
//! ```text
//! osc1 + osc2 + noise ─> filter (+ envelope) ─> amp (+ envelope) ─> mix
//! ```
//!
//! One shared LFO modulates a single destination chosen by parameter. The
//! mix of all voices then runs through the post-mix delay and reverb from
//! `cadenza-effects`.
//!
//! # Core Components
//!
//! ## Parameters
//!
//! - [`SynthParams`] - Lock-free parameter store, written by the control
//!   thread and read by the audio thread
//! - [`ParamId`] / [`DESCRIPTORS`] - Parameter identifiers and metadata
//!
//! ## Sound Sources
//!
//! - [`Oscillator`] - Sine, triangle, square, sawtooth, push square and
//!   PolyBLEP sawtooth
//! - [`NoiseGenerator`] - Coloured white noise with its own envelope
//!
//! ## Shaping
//!
//! - [`AdsrEnvelope`] - Linear ADSR shared by noise, filter and amp
//! - [`VoiceFilter`] - Low/high-pass state-variable filter with envelope sweep
//! - [`Amplifier`] - Velocity, envelope, optional drive, volume
//!
//! ## Modulation
//!
//! - [`Lfo`] - Block-shared low-frequency oscillator
//! - [`LfoRouting`] / [`LfoTarget`] - Exactly one destination at a time
//!
//! ## Voices
//!
//! - [`Voice`] - One note through the full chain
//! - [`VoicePool`] - Sixteen voices with oldest-first stealing
//! - [`Synth`] - Voices, delay and reverb behind one `render_block` call
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible (it needs `alloc`). Disable the default
//! `std` feature:
//!
//! ```toml
//! [dependencies]
//! cadenza-synth = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use cadenza_synth::{ParamId, Synth, SynthParams};
//!
//! let params = Arc::new(SynthParams::new());
//! params.set(ParamId::ReverbOn, 1.0);
//!
//! let mut synth = Synth::new(Arc::clone(&params));
//! synth.prepare_to_play(48000.0, 512);
//! synth.note_on(48, 110);
//! synth.note_on(55, 110);
//!
//! let mut left = vec![0.0f32; 512];
//! let mut right = vec![0.0f32; 512];
//! synth.render_block(&mut [&mut left[..], &mut right[..]], 0, 512);
//! synth.note_off(48, true);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod amp;
pub mod envelope;
pub mod filter;
pub mod lfo;
pub mod noise;
pub mod oscillator;
pub mod params;
pub mod synth;
pub mod voice;

pub use amp::{AmpSettings, Amplifier};
pub use envelope::{AdsrEnvelope, AdsrParams, EnvelopeState};
pub use filter::{FilterEnvTarget, FilterSettings, VoiceFilter};
pub use lfo::{Lfo, LfoRouting, LfoSettings, LfoTarget, LfoWaveform};
pub use noise::{NoiseGenerator, NoiseSettings};
pub use oscillator::{OscSettings, OscSlot, OscWaveform, Oscillator};
pub use params::{ChoiceParam, DESCRIPTORS, PARAM_COUNT, ParamId, SynthParams};
pub use synth::{Synth, delay_settings, reverb_settings};
pub use voice::{BlockContext, VOICE_COUNT, Voice, VoicePool, midi_to_freq, velocity_to_gain};
