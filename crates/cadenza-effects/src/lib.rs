//! Cadenza Effects - Post-mix effects for the cadenza synthesizer
//!
//! Both effects run once per block on the summed voice output, in this order:
//!
//! - [`DelayStage`] - [`SimpleDelay`] or [`PingPongDelay`], selected by [`DelayMode`]
//! - [`ReverbStage`] - on/off wrapper around a [`Reverberator`] ([`Freeverb`])
//!
//! A disabled effect leaves audio bit-identical and clears its buffers once,
//! so switching it back on never plays a stale tail.
//!
//! ## Example
//!
//! ```rust
//! use cadenza_effects::{
//!     DelayMode, DelaySettings, DelayStage, Freeverb, ReverbSettings, ReverbStage,
//! };
//!
//! let mut delay = DelayStage::new();
//! let mut reverb = ReverbStage::new(Freeverb::new(48000.0));
//! delay.prepare(48000.0);
//! reverb.prepare(48000.0);
//!
//! let mut left = [0.1f32; 128];
//! let mut right = [0.1f32; 128];
//! let echo = DelaySettings { enabled: true, wet: 0.5, ..DelaySettings::default() };
//! delay.process(DelayMode::PingPong, &echo, &mut left, Some(&mut right));
//! reverb.process(&ReverbSettings::default(), &mut left, Some(&mut right));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod delay;
pub mod delay_stage;
pub mod ping_pong;
pub mod reverb;

pub use delay::{DelayLine, DelaySettings, SimpleDelay};
pub use delay_stage::{DelayMode, DelayStage};
pub use ping_pong::PingPongDelay;
pub use reverb::{Freeverb, ReverbParameters, ReverbSettings, ReverbStage, Reverberator};
