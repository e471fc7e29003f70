//! The complete processor: voice pool → selected delay → reverb.
//!
//! [`Synth`] owns everything that lives for the length of a session. Buffers
//! are allocated in [`Synth::prepare_to_play`]; [`Synth::render_block`] never
//! allocates.

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;

use cadenza_effects::{
    DelayMode, DelaySettings, DelayStage, Freeverb, ReverbParameters, ReverbSettings, ReverbStage,
};

use crate::lfo::{Lfo, LfoRouting};
use crate::params::{ParamId, SynthParams};
use crate::voice::{BlockContext, VoicePool};

/// Sample rate used until [`Synth::prepare_to_play`] is called.
pub const DEFAULT_SAMPLE_RATE: f32 = 44100.0;

/// Block size used until [`Synth::prepare_to_play`] is called.
pub const DEFAULT_MAX_BLOCK_SIZE: usize = 512;

/// Read the delay parameters.
pub fn delay_settings(params: &SynthParams) -> DelaySettings {
    DelaySettings {
        enabled: params.flag(ParamId::DelayOn),
        time_secs: params.get(ParamId::DelayTime),
        wet: params.get(ParamId::DelayWetLevel),
        dry: params.get(ParamId::DelayDryLevel),
        feedback: params.get(ParamId::DelayFeedback),
        depth: params.get(ParamId::DelayDepth),
    }
}

/// Read the reverb parameters.
pub fn reverb_settings(params: &SynthParams) -> ReverbSettings {
    ReverbSettings {
        enabled: params.flag(ParamId::ReverbOn),
        parameters: ReverbParameters {
            room_size: params.get(ParamId::ReverbRoomSize),
            damping: params.get(ParamId::ReverbDamping),
            wet_level: params.get(ParamId::ReverbWetLevel),
            dry_level: params.get(ParamId::ReverbDryLevel),
            width: params.get(ParamId::ReverbWidth),
        },
    }
}

/// Polyphonic synthesizer with post-mix delay and reverb.
///
/// One channel renders mono effects; two or more render stereo effects on
/// the first two channels, and any further channels carry the voice mix
/// alone.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use cadenza_synth::{ParamId, Synth, SynthParams};
///
/// let params = Arc::new(SynthParams::new());
/// params.set(ParamId::Osc1Type, 5.0);
///
/// let mut synth = Synth::new(Arc::clone(&params));
/// synth.prepare_to_play(48000.0, 256);
/// synth.note_on(60, 100);
///
/// let mut left = vec![0.0f32; 1024];
/// let mut right = vec![0.0f32; 1024];
/// synth.render_block(&mut [&mut left[..], &mut right[..]], 0, 1024);
/// assert!(left.iter().any(|s| *s != 0.0));
/// ```
#[derive(Debug)]
pub struct Synth {
    params: Arc<SynthParams>,
    voices: VoicePool,
    lfo: Lfo,
    lfo_buffer: Vec<f32>,
    delay: DelayStage,
    reverb: ReverbStage<Freeverb>,
    sample_rate: f32,
    max_block_size: usize,
}

impl Synth {
    /// Create a synth reading from `params`, prepared at
    /// [`DEFAULT_SAMPLE_RATE`] and [`DEFAULT_MAX_BLOCK_SIZE`].
    pub fn new(params: Arc<SynthParams>) -> Self {
        let mut synth = Self {
            params,
            voices: VoicePool::new(DEFAULT_SAMPLE_RATE),
            lfo: Lfo::new(),
            lfo_buffer: Vec::new(),
            delay: DelayStage::new(),
            reverb: ReverbStage::new(Freeverb::new(DEFAULT_SAMPLE_RATE)),
            sample_rate: DEFAULT_SAMPLE_RATE,
            max_block_size: DEFAULT_MAX_BLOCK_SIZE,
        };
        synth.prepare_to_play(DEFAULT_SAMPLE_RATE, DEFAULT_MAX_BLOCK_SIZE);
        synth
    }

    /// Reallocate and silence everything for a new sample rate or block size.
    ///
    /// Stops all voices. Control path only.
    pub fn prepare_to_play(&mut self, sample_rate: f32, max_block_size: usize) {
        let sample_rate = if sample_rate.is_finite() && sample_rate > 0.0 {
            sample_rate
        } else {
            DEFAULT_SAMPLE_RATE
        };
        self.sample_rate = sample_rate;
        self.max_block_size = max_block_size.max(1);
        self.voices = VoicePool::new(sample_rate);
        self.lfo = Lfo::new();
        self.lfo_buffer = vec![0.0; self.max_block_size];
        self.delay.prepare(sample_rate);
        self.reverb.prepare(sample_rate);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            sample_rate,
            max_block_size = self.max_block_size,
            "synth prepared"
        );
    }

    /// Start `note` with MIDI `velocity`. Returns the voice index used.
    pub fn note_on(&mut self, note: u8, velocity: u8) -> usize {
        self.voices.note_on(note, velocity)
    }

    /// Release `note`.
    pub fn note_off(&mut self, note: u8, allow_tail_off: bool) {
        self.voices.note_off(note, allow_tail_off);
    }

    /// Release every note.
    pub fn all_notes_off(&mut self, allow_tail_off: bool) {
        self.voices.all_notes_off(allow_tail_off);
    }

    /// Render `count` samples into `channels` starting at `start`.
    ///
    /// The range is overwritten; samples outside it are left alone. Ranges
    /// past the end of the shortest channel are cut short, and anything
    /// longer than the prepared block size is rendered in chunks.
    pub fn render_block(&mut self, channels: &mut [&mut [f32]], start: usize, count: usize) {
        let len = channels.iter().map(|c| c.len()).min().unwrap_or(0);
        let end = start.saturating_add(count).min(len);
        let mut offset = start;
        while offset < end {
            let n = (end - offset).min(self.max_block_size);
            self.render_chunk(channels, offset, n);
            offset += n;
        }
    }

    fn render_chunk(&mut self, channels: &mut [&mut [f32]], offset: usize, n: usize) {
        let range = offset..offset + n;
        for channel in channels.iter_mut() {
            channel[range.clone()].fill(0.0);
        }

        let params: &SynthParams = &self.params;
        let sample_rate = self.sample_rate;
        self.lfo.fill(params, sample_rate, &mut self.lfo_buffer[..n]);
        let block = BlockContext {
            params,
            sample_rate,
            routing: LfoRouting::read(params),
            lfo: &self.lfo_buffer[..n],
        };
        self.voices.render(&block, channels, offset);

        let mode: DelayMode = params.choice(ParamId::DelayType);
        let delay = delay_settings(params);
        let reverb = reverb_settings(params);
        match channels {
            [] => {}
            [mono] => {
                let mono = &mut mono[range];
                self.delay.process(mode, &delay, mono, None);
                self.reverb.process(&reverb, mono, None);
            }
            [left, right, ..] => {
                let left = &mut left[range.clone()];
                let right = &mut right[range];
                self.delay.process(mode, &delay, left, Some(&mut *right));
                self.reverb.process(&reverb, left, Some(right));
            }
        }
    }

    /// The parameter store this synth reads.
    pub fn params(&self) -> &Arc<SynthParams> {
        &self.params
    }

    /// Current sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Largest block rendered in one pass.
    pub fn max_block_size(&self) -> usize {
        self.max_block_size
    }

    /// Number of voices not idle.
    pub fn active_voice_count(&self) -> usize {
        self.voices.active_voice_count()
    }

    /// The voice pool.
    pub fn voices(&self) -> &VoicePool {
        &self.voices
    }

    /// The delay slot.
    pub fn delay(&self) -> &DelayStage {
        &self.delay
    }

    /// The reverb slot.
    pub fn reverb(&self) -> &ReverbStage<Freeverb> {
        &self.reverb
    }
}
