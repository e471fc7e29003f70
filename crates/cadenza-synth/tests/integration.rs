//! Integration tests for cadenza-synth.
//!
//! Tests cover voice allocation and stealing, the note lifecycle, LFO
//! routing through a full render, and the delay/reverb chain behind
//! `Synth::render_block`.

use std::sync::Arc;

use cadenza_synth::{
    ParamId, Synth, SynthParams, VOICE_COUNT, VoicePool, midi_to_freq, velocity_to_gain,
};

const SR: f32 = 48000.0;

fn synth_with(params: &Arc<SynthParams>, block: usize) -> Synth {
    let mut synth = Synth::new(Arc::clone(params));
    synth.prepare_to_play(SR, block);
    synth
}

fn render_mono(synth: &mut Synth, n: usize) -> Vec<f32> {
    let mut out = vec![0.0; n];
    synth.render_block(&mut [&mut out[..]], 0, n);
    out
}

fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |m, s| m.max(s.abs()))
}

// ---------------------------------------------------------------------------
// 1. Voice allocation and stealing
// ---------------------------------------------------------------------------

#[test]
fn voice_allocation_fills_all_slots() {
    let mut pool = VoicePool::new(SR);
    for note in 0..VOICE_COUNT as u8 {
        pool.note_on(40 + note, 100);
    }
    assert_eq!(pool.active_voice_count(), VOICE_COUNT);
}

#[test]
fn voice_stealing_replaces_oldest_note() {
    let mut pool = VoicePool::new(SR);
    for note in 0..VOICE_COUNT as u8 {
        pool.note_on(40 + note, 100);
    }
    let idx = pool.note_on(100, 100);

    assert_eq!(pool.active_voice_count(), VOICE_COUNT, "count stays at polyphony limit");
    assert_eq!(idx, 0, "oldest slot is reused");
    let has_40 = pool.voices().iter().any(|v| v.is_playing() && v.note() == 40);
    assert!(!has_40, "oldest note (40) should have been stolen");
    assert_eq!(pool.voices()[0].note(), 100);
}

#[test]
fn retriggered_note_releases_previous_voice() {
    let mut pool = VoicePool::new(SR);
    let first = pool.note_on(60, 100);
    let second = pool.note_on(60, 100);
    assert_ne!(first, second);
    assert!(pool.voices()[first].is_releasing());
    assert!(!pool.voices()[second].is_releasing());
}

#[test]
fn note_off_without_tail_frees_voice_immediately() {
    let mut pool = VoicePool::new(SR);
    pool.note_on(60, 100);
    pool.note_on(64, 100);
    pool.note_off(60, false);
    assert_eq!(pool.active_voice_count(), 1);
    pool.all_notes_off(false);
    assert_eq!(pool.active_voice_count(), 0);
}

#[test]
fn note_and_velocity_conversions() {
    assert!((midi_to_freq(69) - 440.0).abs() < 1e-3);
    assert!((midi_to_freq(81) - 880.0).abs() < 1e-2);
    assert!((midi_to_freq(57) - 220.0).abs() < 1e-3);
    assert_eq!(velocity_to_gain(127), 1.0);
    assert_eq!(velocity_to_gain(0), 0.0);
}

// ---------------------------------------------------------------------------
// 2. Rendering
// ---------------------------------------------------------------------------

#[test]
fn voices_sum_into_the_mix() {
    let params = Arc::new(SynthParams::new());
    let mut one = synth_with(&params, 256);
    let mut two = synth_with(&params, 256);
    one.note_on(60, 127);
    two.note_on(60, 127);
    two.note_on(67, 127);
    let a = render_mono(&mut one, 4800);
    let b = render_mono(&mut two, 4800);
    assert!(peak(&b) > peak(&a), "two voices louder than one: {} vs {}", peak(&b), peak(&a));
}

#[test]
fn velocity_scales_output() {
    let params = Arc::new(SynthParams::new());
    let mut soft = synth_with(&params, 256);
    let mut loud = synth_with(&params, 256);
    soft.note_on(60, 32);
    loud.note_on(60, 127);
    let a = render_mono(&mut soft, 4800);
    let b = render_mono(&mut loud, 4800);
    let ratio = peak(&a) / peak(&b);
    assert!((ratio - 32.0 / 127.0).abs() < 1e-3, "ratio {ratio}");
}

#[test]
fn released_voice_fades_to_silence() {
    let params = Arc::new(SynthParams::new());
    params.set(ParamId::AmpEnvRelease, 0.05);
    let mut synth = synth_with(&params, 512);
    synth.note_on(60, 100);
    render_mono(&mut synth, 4800);
    synth.note_off(60, true);
    render_mono(&mut synth, 4800);
    assert_eq!(synth.active_voice_count(), 0);
    let tail = render_mono(&mut synth, 1024);
    assert!(tail.iter().all(|s| *s == 0.0));
}

#[test]
fn lfo_on_volume_modulates_amplitude() {
    let params = Arc::new(SynthParams::new());
    params.set(ParamId::AmpEnvAttack, 0.001);
    params.set(ParamId::AmpEnvSustain, 1.0);
    params.set(ParamId::LfoOn, 1.0);
    params.set(ParamId::LfoAppliesTo, 8.0);
    params.set(ParamId::LfoType, 2.0);
    params.set(ParamId::LfoFrequency, 10.0);
    params.set(ParamId::LfoDepth, 1.0);
    let mut synth = synth_with(&params, 256);
    synth.note_on(69, 127);
    let out = render_mono(&mut synth, 9600);

    // Square LFO at depth 1: volume alternates between 0 and 2v (clamped).
    let silent_stretches = out
        .chunks(480)
        .skip(1)
        .filter(|c| c.iter().all(|s| *s == 0.0))
        .count();
    assert!(silent_stretches > 0, "square LFO should mute half of each cycle");
    assert!(peak(&out) > 0.05);
}

fn lfo_on_volume(waveform: f32, frequency: f32) -> Arc<SynthParams> {
    let params = Arc::new(SynthParams::new());
    params.set(ParamId::AmpEnvAttack, 0.001);
    params.set(ParamId::AmpEnvSustain, 1.0);
    params.set(ParamId::LfoOn, 1.0);
    params.set(ParamId::LfoAppliesTo, 8.0);
    params.set(ParamId::LfoType, waveform);
    params.set(ParamId::LfoFrequency, frequency);
    params.set(ParamId::LfoDepth, 1.0);
    params
}

#[test]
fn lfo_phase_runs_on_across_note_on() {
    // 1 Hz square: volume is muted for the first half second, then open.
    let params = lfo_on_volume(2.0, 1.0);
    let mut synth = synth_with(&params, 512);
    let mut out = vec![0.0f32; 48000];

    synth.note_on(57, 127);
    synth.render_block(&mut [&mut out[..]], 0, 12000);
    synth.note_on(64, 127);
    synth.render_block(&mut [&mut out[..]], 12000, 36000);

    assert_eq!(synth.active_voice_count(), 2);
    assert_eq!(peak(&out[..23500]), 0.0, "muted half of the cycle leaked");
    // A phase restart at the second note-on would keep this stretch muted
    // until 36000.
    let open = peak(&out[24500..35500]);
    assert!(open > 0.05, "LFO restarted on note-on, peak {open}");
}

#[test]
fn voices_started_together_share_lfo_samples() {
    let params = lfo_on_volume(0.0, 7.0);

    let render_notes = |notes: &[u8]| {
        let mut synth = synth_with(&params, 256);
        for &note in notes {
            synth.note_on(note, 100);
        }
        render_mono(&mut synth, 4800)
    };
    let low = render_notes(&[57]);
    let high = render_notes(&[64]);
    let both = render_notes(&[57, 64]);

    // Volume is linear in the LFO sample, so the mix is the sum of the
    // solo renders only if both voices read the same value each sample.
    for (i, ((l, h), b)) in low.iter().zip(&high).zip(&both).enumerate() {
        assert!((l + h - b).abs() < 1e-5, "sample {i}: {l} + {h} != {b}");
    }
    assert!(peak(&both) > 0.01);
}

#[test]
fn filter_off_is_passthrough() {
    let params = Arc::new(SynthParams::new());
    params.set(ParamId::FilterOn, 0.0);
    params.set(ParamId::FilterFreq, 20.0);
    let mut off = synth_with(&params, 256);
    off.note_on(72, 127);
    let dry = render_mono(&mut off, 4800);

    params.set(ParamId::FilterOn, 1.0);
    let mut on = synth_with(&params, 256);
    on.note_on(72, 127);
    let filtered = render_mono(&mut on, 4800);

    assert!(peak(&filtered) < 0.5 * peak(&dry), "20 Hz lowpass attenuates a 523 Hz tone");
}

#[test]
fn delay_echo_follows_note() {
    let params = Arc::new(SynthParams::new());
    params.set(ParamId::AmpEnvAttack, 0.001);
    params.set(ParamId::AmpEnvRelease, 0.0);
    params.set(ParamId::DelayOn, 1.0);
    params.set(ParamId::DelayType, 0.0);
    params.set(ParamId::DelayTime, 0.25);
    params.set(ParamId::DelayWetLevel, 1.0);
    params.set(ParamId::DelayDryLevel, 1.0);
    let mut synth = synth_with(&params, 480);
    synth.note_on(69, 127);
    let note = render_mono(&mut synth, 2400);
    synth.note_off(69, false);
    let after = render_mono(&mut synth, 14_400);

    assert!(peak(&note) > 0.01);
    // Dry signal stopped; the echo arrives 0.25 s after the note started.
    assert!(after[..9000].iter().all(|s| *s == 0.0), "gap before the echo");
    assert!(peak(&after[9600..12_000]) > 0.01, "echo of the note");
}

#[test]
fn ping_pong_spreads_across_channels() {
    let params = Arc::new(SynthParams::new());
    params.set(ParamId::AmpEnvAttack, 0.001);
    params.set(ParamId::DelayOn, 1.0);
    params.set(ParamId::DelayType, 1.0);
    params.set(ParamId::DelayTime, 0.1);
    params.set(ParamId::DelayWetLevel, 1.0);
    params.set(ParamId::DelayDryLevel, 0.0);
    let mut synth = synth_with(&params, 512);
    synth.note_on(69, 127);
    let mut left = vec![0.0; 2400];
    let mut right = vec![0.0; 2400];
    synth.render_block(&mut [&mut left[..], &mut right[..]], 0, 2400);
    synth.note_off(69, false);
    let mut l2 = vec![0.0; 12_000];
    let mut r2 = vec![0.0; 12_000];
    synth.render_block(&mut [&mut l2[..], &mut r2[..]], 0, 12_000);

    assert!(left.iter().chain(right.iter()).all(|s| *s == 0.0), "dry 0: nothing before the first echo");
    assert!(peak(&l2[2400..4800]) > 0.01, "left echo at one delay");
    assert!(peak(&r2[7200..9600]) > 0.01, "right echo at two delays");
}
