//! Render patches and parameter validation for the cadenza synthesizer.
//!
//! A [`Patch`] is a named set of parameter overrides stored as TOML. Patches
//! are validated against the synth's parameter descriptors before anything
//! is written to a [`SynthParams`](cadenza_synth::SynthParams) store.
//!
//! # Features
//!
//! - **Patches**: Load, save, validate, apply and capture TOML patches
//! - **Validation**: Parameter ids, ranges, and `id=value` overrides
//! - **Factory Patches**: A few built-in starting points
//!
//! # Example
//!
//! ```rust
//! use cadenza_config::{Patch, parse_override};
//! use cadenza_synth::{ParamId, SynthParams};
//!
//! let mut patch = Patch::from_toml(r#"
//! name = "Pluck"
//! [params]
//! osc1_type = 5
//! filter_freq = 2400.0
//! "#).unwrap();
//!
//! // Command-line overrides layer on top.
//! let (id, value) = parse_override("amp_env_release=0.4").unwrap();
//! patch.set(id, value);
//!
//! let params = SynthParams::new();
//! patch.apply(&params).unwrap();
//! assert_eq!(params.get(ParamId::FilterFreq), 2400.0);
//! ```

mod error;
mod patch;

/// Built-in patches.
pub mod factory;

/// Parameter id and value validation.
pub mod validation;

pub use error::ConfigError;
pub use factory::{FACTORY_PATCH_NAMES, factory_patch, factory_patches};
pub use patch::{ParamValue, Patch};
pub use validation::{lookup_param, parse_override, parse_value, validate_value};
