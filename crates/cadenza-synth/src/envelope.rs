//! ADSR envelope generator.
//!
//! One reusable state machine shared by the noise generator, the filter and
//! the amplifier. Each owner keeps its own instance and feeds it timing from
//! its own parameters, so the three envelopes of a voice never interfere.
//!
//! Ramps are linear. Per-sample increments are derived from the current
//! timing every sample, so parameter automation takes effect mid-stage.

/// Level below which a releasing envelope counts as finished.
pub const CLOSED_EPSILON: f32 = 1e-6;

/// ADSR envelope states
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EnvelopeState {
    /// Inactive, output is zero.
    #[default]
    Idle,
    /// Ramping from 0 up to 1.
    Attack,
    /// Ramping from 1 down to the sustain level.
    Decay,
    /// Holding the sustain level until note-off.
    Sustain,
    /// Ramping from the note-off level down to 0.
    Release,
}

/// Timing and level inputs for an [`AdsrEnvelope`].
///
/// Times are in seconds, `sustain` is a level in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdsrParams {
    /// Attack time in seconds.
    pub attack: f32,
    /// Decay time in seconds.
    pub decay: f32,
    /// Sustain level.
    pub sustain: f32,
    /// Release time in seconds.
    pub release: f32,
}

impl Default for AdsrParams {
    fn default() -> Self {
        Self {
            attack: 0.1,
            decay: 0.1,
            sustain: 1.0,
            release: 0.1,
        }
    }
}

/// Linear ADSR envelope.
///
/// # Example
///
/// ```rust
/// use cadenza_synth::{AdsrEnvelope, AdsrParams, EnvelopeState};
///
/// let mut env = AdsrEnvelope::new(48000.0);
/// env.set_params(AdsrParams { attack: 0.01, decay: 0.1, sustain: 0.7, release: 0.2 });
///
/// env.note_on();
/// assert_eq!(env.state(), EnvelopeState::Attack);
/// for _ in 0..480 {
///     env.next_sample();
/// }
/// assert!((env.level() - 1.0).abs() < 1e-3);
///
/// env.note_off();
/// assert_eq!(env.state(), EnvelopeState::Release);
/// ```
#[derive(Debug, Clone)]
pub struct AdsrEnvelope {
    state: EnvelopeState,
    level: f32,
    /// Level at the moment of note-off; the release slope is derived from it.
    release_from: f32,
    /// Samples spent in the current stage.
    elapsed: u32,
    sample_rate: f32,
    params: AdsrParams,
}

impl Default for AdsrEnvelope {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl AdsrEnvelope {
    /// Create an idle envelope.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            state: EnvelopeState::Idle,
            level: 0.0,
            release_from: 0.0,
            elapsed: 0,
            sample_rate,
            params: AdsrParams::default(),
        }
    }

    /// Set the sample rate in Hz.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }

    /// Replace timing and sustain level. Takes effect on the next sample.
    pub fn set_params(&mut self, params: AdsrParams) {
        self.params = AdsrParams {
            attack: params.attack.max(0.0),
            decay: params.decay.max(0.0),
            sustain: params.sustain.clamp(0.0, 1.0),
            release: params.release.max(0.0),
        };
    }

    /// Current timing and sustain level.
    pub fn params(&self) -> AdsrParams {
        self.params
    }

    /// Restart from level 0 in the attack stage.
    pub fn note_on(&mut self) {
        self.level = 0.0;
        self.enter(EnvelopeState::Attack);
    }

    /// Enter the release stage from whatever level the envelope holds.
    pub fn note_off(&mut self) {
        self.release_from = self.level;
        self.enter(EnvelopeState::Release);
    }

    /// Return to idle at level 0.
    pub fn reset(&mut self) {
        self.level = 0.0;
        self.release_from = 0.0;
        self.enter(EnvelopeState::Idle);
    }

    /// Advance by one sample and return the new level.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        self.elapsed = self.elapsed.saturating_add(1);
        match self.state {
            EnvelopeState::Idle => {
                self.level = 0.0;
            }
            EnvelopeState::Attack => {
                self.level += self.increment(1.0, self.params.attack);
                if self.level >= 1.0 || self.stage_done(self.params.attack) {
                    self.level = 1.0;
                    self.enter(EnvelopeState::Decay);
                }
            }
            EnvelopeState::Decay => {
                let sustain = self.params.sustain;
                self.level -= self.increment(1.0 - sustain, self.params.decay);
                if self.level <= sustain || self.stage_done(self.params.decay) {
                    self.level = sustain;
                    self.enter(EnvelopeState::Sustain);
                }
            }
            EnvelopeState::Sustain => {
                self.level = self.params.sustain;
            }
            EnvelopeState::Release => {
                self.level -= self.increment(self.release_from, self.params.release);
                if self.level <= 0.0 || self.stage_done(self.params.release) {
                    self.level = 0.0;
                    self.enter(EnvelopeState::Idle);
                }
            }
        }
        self.level = self.level.clamp(0.0, 1.0);
        self.level
    }

    /// `true` when releasing (or idle) and the level has fallen below
    /// [`CLOSED_EPSILON`].
    #[inline]
    pub fn is_closed(&self) -> bool {
        matches!(self.state, EnvelopeState::Release | EnvelopeState::Idle)
            && self.level < CLOSED_EPSILON
    }

    /// Current stage.
    pub fn state(&self) -> EnvelopeState {
        self.state
    }

    /// Level returned by the last [`next_sample`](Self::next_sample).
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Time spent in the current stage, in seconds.
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed as f32 / self.sample_rate
    }

    fn enter(&mut self, state: EnvelopeState) {
        self.state = state;
        self.elapsed = 0;
    }

    /// Per-sample step covering `span` over `secs`; a zero-length stage
    /// covers the whole span in one sample.
    #[inline]
    fn increment(&self, span: f32, secs: f32) -> f32 {
        let samples = secs * self.sample_rate;
        if samples <= 1.0 { span } else { span / samples }
    }

    /// The stage has lasted its configured length. Guards the exact stage
    /// duration against rounding in the accumulated ramp.
    #[inline]
    fn stage_done(&self, secs: f32) -> bool {
        self.elapsed as f32 >= secs * self.sample_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 1000.0;

    fn env(attack: f32, decay: f32, sustain: f32, release: f32) -> AdsrEnvelope {
        let mut e = AdsrEnvelope::new(SR);
        e.set_params(AdsrParams {
            attack,
            decay,
            sustain,
            release,
        });
        e
    }

    fn run(e: &mut AdsrEnvelope, n: usize) -> f32 {
        let mut level = 0.0;
        for _ in 0..n {
            level = e.next_sample();
        }
        level
    }

    #[test]
    fn test_note_on_resets_to_attack() {
        let mut e = env(0.1, 0.1, 0.5, 0.1);
        e.note_on();
        run(&mut e, 150);
        e.note_on();
        assert_eq!(e.state(), EnvelopeState::Attack);
        assert_eq!(e.level(), 0.0);
        assert_eq!(e.elapsed_secs(), 0.0);
    }

    #[test]
    fn test_stage_sequence() {
        let mut e = env(0.1, 0.2, 0.5, 0.1);
        e.note_on();
        run(&mut e, 50);
        assert_eq!(e.state(), EnvelopeState::Attack);
        assert!((e.level() - 0.5).abs() < 1e-3, "half way through attack, got {}", e.level());

        run(&mut e, 50);
        assert_eq!(e.state(), EnvelopeState::Decay);
        assert_eq!(e.level(), 1.0);

        run(&mut e, 200);
        assert_eq!(e.state(), EnvelopeState::Sustain);
        assert_eq!(e.level(), 0.5);

        run(&mut e, 1000);
        assert_eq!(e.level(), 0.5, "sustain holds indefinitely");
    }

    #[test]
    fn test_zero_sustain_decay_runs_full_time() {
        let mut e = env(0.01, 0.5, 0.0, 0.1);
        e.note_on();
        run(&mut e, 10);
        assert_eq!(e.state(), EnvelopeState::Decay);
        run(&mut e, 250);
        assert_eq!(e.state(), EnvelopeState::Decay, "decay must not short-cut");
        assert!((e.level() - 0.5).abs() < 0.01, "got {}", e.level());
        run(&mut e, 250);
        assert_eq!(e.state(), EnvelopeState::Sustain);
        assert_eq!(e.level(), 0.0);
    }

    #[test]
    fn test_release_from_current_level() {
        let mut e = env(0.1, 0.1, 0.5, 0.2);
        e.note_on();
        run(&mut e, 30);
        let held = e.level();
        e.note_off();
        assert_eq!(e.state(), EnvelopeState::Release);
        let first = e.next_sample();
        assert!(first < held && first > held - 0.05, "release continues from {held}, got {first}");
    }

    #[test]
    fn test_closes_within_release_time() {
        let mut e = env(0.05, 0.1, 0.8, 0.25);
        e.note_on();
        run(&mut e, 500);
        e.note_off();
        run(&mut e, 250);
        assert!(e.is_closed(), "level {} state {:?}", e.level(), e.state());
        assert_eq!(e.state(), EnvelopeState::Idle);
    }

    #[test]
    fn test_not_closed_while_sounding() {
        let mut e = env(0.05, 0.1, 0.8, 0.25);
        e.note_on();
        run(&mut e, 10);
        assert!(!e.is_closed());
        e.note_off();
        e.next_sample();
        assert!(!e.is_closed());
    }

    #[test]
    fn test_zero_times_complete_in_one_sample() {
        let mut e = env(0.0, 0.0, 0.3, 0.0);
        e.note_on();
        assert_eq!(e.next_sample(), 1.0);
        assert_eq!(e.next_sample(), 0.3);
        e.note_off();
        assert_eq!(e.next_sample(), 0.0);
        assert!(e.is_closed());
    }

    #[test]
    fn test_idle_is_silent_and_closed() {
        let mut e = AdsrEnvelope::new(SR);
        assert!(e.is_closed());
        assert_eq!(run(&mut e, 100), 0.0);
    }
}
