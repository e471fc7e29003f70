//! Parameter metadata.
//!
//! A [`ParamDescriptor`] describes one automatable value: its stable string
//! id, display name, plain range, default, value kind and normalisation
//! curve. Descriptors are `const`-constructible so a synth can keep its whole
//! parameter table in a `static`.
//!
//! All values travel as `f32`. Booleans are `0.0`/`1.0`, integers and choice
//! indices are whole numbers; [`ParamDescriptor::clamp`] enforces this at the
//! boundary so the audio path never sees an out-of-range or fractional index.
//!
//! # Example
//!
//! ```rust
//! use cadenza_core::{ParamDescriptor, ParamScale};
//!
//! const CUTOFF: ParamDescriptor =
//!     ParamDescriptor::float("filter_freq", "Filter: Frequency", 20.0, 20000.0, 20000.0)
//!         .with_scale(ParamScale::Skewed(0.25));
//!
//! assert_eq!(CUTOFF.clamp(1e6), 20000.0);
//! let n = CUTOFF.normalize(1000.0);
//! assert!((CUTOFF.denormalize(n) - 1000.0).abs() < 0.1);
//! ```

use libm::{powf, roundf};

/// Mapping between plain values and normalised `[0, 1]` host space.
///
/// `Skewed(k)` matches the JUCE `NormalisableRange` skew factor:
/// `normalized = ((value - min) / (max - min))^k`. `k < 1` gives more travel
/// to the low end of the range.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ParamScale {
    /// Equal resolution across the range.
    #[default]
    Linear,
    /// Power curve with the given skew factor.
    Skewed(f32),
}

/// What kind of value a parameter carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Continuous value.
    Float,
    /// Whole number inside the range.
    Int,
    /// Toggle, `0.0` (off) or `1.0` (on).
    Bool,
    /// Index into the listed option labels.
    Choice(&'static [&'static str]),
}

/// Static description of one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Stable identifier used by patches and the command line.
    pub string_id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Smallest plain value.
    pub min: f32,
    /// Largest plain value.
    pub max: f32,
    /// Value on construction and after a reset.
    pub default: f32,
    /// Value kind.
    pub kind: ParamKind,
    /// Normalisation curve.
    pub scale: ParamScale,
}

impl ParamDescriptor {
    /// Continuous parameter.
    pub const fn float(
        string_id: &'static str,
        name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            string_id,
            name,
            min,
            max,
            default,
            kind: ParamKind::Float,
            scale: ParamScale::Linear,
        }
    }

    /// Integer parameter.
    pub const fn int(
        string_id: &'static str,
        name: &'static str,
        min: i32,
        max: i32,
        default: i32,
    ) -> Self {
        Self {
            string_id,
            name,
            min: min as f32,
            max: max as f32,
            default: default as f32,
            kind: ParamKind::Int,
            scale: ParamScale::Linear,
        }
    }

    /// On/off parameter.
    pub const fn toggle(string_id: &'static str, name: &'static str, default: bool) -> Self {
        Self {
            string_id,
            name,
            min: 0.0,
            max: 1.0,
            default: if default { 1.0 } else { 0.0 },
            kind: ParamKind::Bool,
            scale: ParamScale::Linear,
        }
    }

    /// Choice between the listed options; `default` is an index.
    pub const fn choice(
        string_id: &'static str,
        name: &'static str,
        options: &'static [&'static str],
        default: usize,
    ) -> Self {
        Self {
            string_id,
            name,
            min: 0.0,
            max: (options.len() - 1) as f32,
            default: default as f32,
            kind: ParamKind::Choice(options),
            scale: ParamScale::Linear,
        }
    }

    /// Replace the normalisation curve.
    pub const fn with_scale(mut self, scale: ParamScale) -> Self {
        self.scale = scale;
        self
    }

    /// Clamp to the range, rounding discrete kinds to whole values.
    ///
    /// Non-finite input falls back to the default.
    pub fn clamp(&self, value: f32) -> f32 {
        if !value.is_finite() {
            return self.default;
        }
        let clamped = value.clamp(self.min, self.max);
        match self.kind {
            ParamKind::Float => clamped,
            ParamKind::Int | ParamKind::Bool | ParamKind::Choice(_) => roundf(clamped),
        }
    }

    /// `true` if `value` is finite and inside the plain range.
    pub fn contains(&self, value: f32) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }

    /// Map a plain value to `[0, 1]`.
    pub fn normalize(&self, value: f32) -> f32 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        let linear = ((self.clamp(value) - self.min) / span).clamp(0.0, 1.0);
        match self.scale {
            ParamScale::Linear => linear,
            ParamScale::Skewed(skew) => powf(linear, skew),
        }
    }

    /// Map a normalised `[0, 1]` value back to the plain range.
    pub fn denormalize(&self, normalized: f32) -> f32 {
        let n = normalized.clamp(0.0, 1.0);
        let linear = match self.scale {
            ParamScale::Linear => n,
            ParamScale::Skewed(skew) if skew > 0.0 => powf(n, 1.0 / skew),
            ParamScale::Skewed(_) => n,
        };
        self.clamp(self.min + linear * (self.max - self.min))
    }

    /// Option labels for a choice parameter.
    pub fn options(&self) -> Option<&'static [&'static str]> {
        match self.kind {
            ParamKind::Choice(options) => Some(options),
            _ => None,
        }
    }

    /// Label of the option selected by `value`, for choice parameters.
    pub fn option_label(&self, value: f32) -> Option<&'static str> {
        let options = self.options()?;
        options.get(self.clamp(value) as usize).copied()
    }
}
