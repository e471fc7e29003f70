//! Reverberation stage.
//!
//! [`ReverbStage`] is the on/off wrapper the synth talks to: it turns the
//! five scalar settings into reverberator parameters, clears the tail once
//! when switched off, and dispatches mono or stereo processing by channel
//! count. The algorithm sits behind the [`Reverberator`] trait; [`Freeverb`]
//! is the one shipped.

use cadenza_core::{AllpassFilter, CombFilter};
use libm::roundf;

/// Freeverb comb delay lengths at 44.1 kHz.
const COMB_TUNINGS_44K: [usize; 8] = [1116, 1188, 1277, 1356, 1422, 1491, 1557, 1617];

/// Freeverb allpass delay lengths at 44.1 kHz.
const ALLPASS_TUNINGS_44K: [usize; 4] = [556, 441, 341, 225];

/// Extra samples on every right-channel line.
const STEREO_SPREAD: usize = 23;

/// Reference sample rate for the tunings.
const REFERENCE_RATE: f32 = 44100.0;

const INPUT_GAIN: f32 = 0.015;
const WET_SCALE: f32 = 3.0;
const DRY_SCALE: f32 = 2.0;
const DAMP_SCALE: f32 = 0.4;
const ROOM_SCALE: f32 = 0.28;
const ROOM_OFFSET: f32 = 0.7;

/// Scale delay times from reference rate to target rate.
fn scale_to_rate(samples: usize, target_rate: f32) -> usize {
    (roundf(samples as f32 * target_rate / REFERENCE_RATE) as usize).max(1)
}

/// Reverberator controls, all in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReverbParameters {
    /// Tail length.
    pub room_size: f32,
    /// High-frequency absorption.
    pub damping: f32,
    /// Reverberated level.
    pub wet_level: f32,
    /// Direct level.
    pub dry_level: f32,
    /// Stereo width of the tail.
    pub width: f32,
}

impl Default for ReverbParameters {
    fn default() -> Self {
        Self {
            room_size: 0.5,
            damping: 0.5,
            wet_level: 0.33,
            dry_level: 0.4,
            width: 1.0,
        }
    }
}

/// Reverb on/off switch plus its parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ReverbSettings {
    /// Reverb switched on.
    pub enabled: bool,
    /// Reverberator controls.
    pub parameters: ReverbParameters,
}

/// A stereo reverberation algorithm.
pub trait Reverberator {
    /// Rebuild internal buffers for `sample_rate`. Control path only.
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Apply new controls.
    fn set_parameters(&mut self, parameters: &ReverbParameters);

    /// Silence the tail.
    fn reset(&mut self);

    /// Process one channel in place.
    fn process_mono(&mut self, samples: &mut [f32]);

    /// Process a stereo pair in place.
    fn process_stereo(&mut self, left: &mut [f32], right: &mut [f32]);
}

/// Classic Freeverb: eight damped combs in parallel feeding four allpasses
/// in series, per channel.
///
/// ## Parameters
/// - `room_size`: comb feedback `0.7 + 0.28 × size`
/// - `damping`: comb damping `0.4 × damping`
/// - `wet_level` / `dry_level`: scaled by 3 and 2
/// - `width`: 1 keeps the channels apart, 0 sums the tail to mono
#[derive(Debug, Clone)]
pub struct Freeverb {
    combs_l: [CombFilter; 8],
    combs_r: [CombFilter; 8],
    allpasses_l: [AllpassFilter; 4],
    allpasses_r: [AllpassFilter; 4],
    wet1: f32,
    wet2: f32,
    dry: f32,
    parameters: ReverbParameters,
}

impl Freeverb {
    /// Create a reverb tuned for `sample_rate`.
    pub fn new(sample_rate: f32) -> Self {
        let mut reverb = Self {
            combs_l: core::array::from_fn(|i| {
                CombFilter::new(scale_to_rate(COMB_TUNINGS_44K[i], sample_rate))
            }),
            combs_r: core::array::from_fn(|i| {
                CombFilter::new(scale_to_rate(COMB_TUNINGS_44K[i] + STEREO_SPREAD, sample_rate))
            }),
            allpasses_l: core::array::from_fn(|i| {
                AllpassFilter::new(scale_to_rate(ALLPASS_TUNINGS_44K[i], sample_rate))
            }),
            allpasses_r: core::array::from_fn(|i| {
                AllpassFilter::new(scale_to_rate(ALLPASS_TUNINGS_44K[i] + STEREO_SPREAD, sample_rate))
            }),
            wet1: 0.0,
            wet2: 0.0,
            dry: 0.0,
            parameters: ReverbParameters::default(),
        };
        let parameters = reverb.parameters;
        reverb.set_parameters(&parameters);
        reverb
    }

    /// Controls applied by the last [`set_parameters`](Reverberator::set_parameters).
    pub fn parameters(&self) -> ReverbParameters {
        self.parameters
    }
}

impl Reverberator for Freeverb {
    fn set_sample_rate(&mut self, sample_rate: f32) {
        let parameters = self.parameters;
        *self = Self::new(sample_rate);
        self.set_parameters(&parameters);
    }

    fn set_parameters(&mut self, parameters: &ReverbParameters) {
        self.parameters = *parameters;
        let wet = parameters.wet_level.clamp(0.0, 1.0) * WET_SCALE;
        let width = parameters.width.clamp(0.0, 1.0);
        self.dry = parameters.dry_level.clamp(0.0, 1.0) * DRY_SCALE;
        self.wet1 = 0.5 * wet * (1.0 + width);
        self.wet2 = 0.5 * wet * (1.0 - width);

        let feedback = parameters.room_size.clamp(0.0, 1.0) * ROOM_SCALE + ROOM_OFFSET;
        let damp = parameters.damping.clamp(0.0, 1.0) * DAMP_SCALE;
        for comb in self.combs_l.iter_mut().chain(self.combs_r.iter_mut()) {
            comb.set_feedback(feedback);
            comb.set_damp(damp);
        }
    }

    fn reset(&mut self) {
        for comb in self.combs_l.iter_mut().chain(self.combs_r.iter_mut()) {
            comb.clear();
        }
        for allpass in self.allpasses_l.iter_mut().chain(self.allpasses_r.iter_mut()) {
            allpass.clear();
        }
    }

    fn process_mono(&mut self, samples: &mut [f32]) {
        for sample in samples.iter_mut() {
            let input = *sample * INPUT_GAIN;
            let mut out = 0.0;
            for comb in &mut self.combs_l {
                out += comb.process(input);
            }
            for allpass in &mut self.allpasses_l {
                out = allpass.process(out);
            }
            *sample = out * self.wet1 + *sample * self.dry;
        }
    }

    fn process_stereo(&mut self, left: &mut [f32], right: &mut [f32]) {
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let input = (*l + *r) * INPUT_GAIN;
            let mut out_l = 0.0;
            let mut out_r = 0.0;
            for (comb_l, comb_r) in self.combs_l.iter_mut().zip(self.combs_r.iter_mut()) {
                out_l += comb_l.process(input);
                out_r += comb_r.process(input);
            }
            for (ap_l, ap_r) in self.allpasses_l.iter_mut().zip(self.allpasses_r.iter_mut()) {
                out_l = ap_l.process(out_l);
                out_r = ap_r.process(out_r);
            }
            *l = out_l * self.wet1 + out_r * self.wet2 + *l * self.dry;
            *r = out_r * self.wet1 + out_l * self.wet2 + *r * self.dry;
        }
    }
}

/// On/off wrapper around a [`Reverberator`].
///
/// ```rust
/// use cadenza_effects::{Freeverb, ReverbSettings, ReverbStage};
///
/// let mut stage = ReverbStage::new(Freeverb::new(48000.0));
/// stage.prepare(48000.0);
///
/// let mut block = [0.5f32; 32];
/// stage.process(&ReverbSettings::default(), &mut block, None);
/// assert!(block.iter().all(|s| *s == 0.5), "off passes through");
/// ```
#[derive(Debug, Clone)]
pub struct ReverbStage<R: Reverberator> {
    reverb: R,
    cleared: bool,
}

impl<R: Reverberator> ReverbStage<R> {
    /// Wrap `reverb`.
    pub fn new(reverb: R) -> Self {
        Self {
            reverb,
            cleared: false,
        }
    }

    /// Retune for `sample_rate` and silence the tail. Control path only.
    pub fn prepare(&mut self, sample_rate: f32) {
        self.reverb.set_sample_rate(sample_rate);
        self.reverb.reset();
        self.cleared = true;
    }

    /// Process a block in place. `right` is `None` for mono output.
    pub fn process(&mut self, settings: &ReverbSettings, left: &mut [f32], right: Option<&mut [f32]>) {
        if !settings.enabled {
            if !self.cleared {
                self.reverb.reset();
                self.cleared = true;
                #[cfg(feature = "tracing")]
                tracing::debug!("reverb cleared");
            }
            return;
        }
        self.cleared = false;
        self.reverb.set_parameters(&settings.parameters);
        match right {
            Some(right) => self.reverb.process_stereo(left, right),
            None => self.reverb.process_mono(left),
        }
    }

    /// `true` if the tail has been silenced and not fed since.
    pub fn is_cleared(&self) -> bool {
        self.cleared
    }

    /// The wrapped reverberator.
    pub fn reverb(&self) -> &R {
        &self.reverb
    }
}
