//! Offline rendering of a note list to a WAV file.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use cadenza_config::parse_override;
use cadenza_synth::{Synth, SynthParams};
use clap::Args;

use super::common::load_patch;
use crate::notes::{NoteEvent, NoteSpec, parse_note_spec, schedule};
use crate::wav::write_wav;

#[derive(Args)]
pub struct RenderArgs {
    /// Output WAV file
    output: PathBuf,

    /// Factory patch name or patch file to start from
    #[arg(short, long)]
    patch: Option<String>,

    /// Parameter override as ID=VALUE, applied after the patch (repeatable)
    #[arg(short, long = "set", value_name = "ID=VALUE")]
    set: Vec<String>,

    /// Note as NOTE[:START[:LENGTH[:VELOCITY]]], e.g. C4:0:1.5:100 (repeatable)
    #[arg(short, long = "note", value_parser = parse_note_spec, default_value = "60")]
    notes: Vec<NoteSpec>,

    /// Seconds rendered after the last note-off
    #[arg(long, default_value = "1.0")]
    tail: f32,

    /// Sample rate in Hz
    #[arg(long, default_value = "48000")]
    sample_rate: u32,

    /// Largest block handed to the synth per call
    #[arg(long, default_value = "512")]
    block_size: usize,

    /// Output channels (1 = mono, 2 = stereo)
    #[arg(long, default_value = "2", value_parser = clap::value_parser!(u16).range(1..=2))]
    channels: u16,
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    if !args.tail.is_finite() || args.tail < 0.0 {
        anyhow::bail!("--tail must be a non-negative number of seconds");
    }
    if args.sample_rate == 0 {
        anyhow::bail!("--sample-rate must be positive");
    }

    let params = Arc::new(SynthParams::new());
    if let Some(name) = &args.patch {
        let patch = load_patch(name)?;
        let applied = patch
            .apply(&params)
            .with_context(|| format!("patch '{}' is invalid", patch.name))?;
        tracing::info!(patch = %patch.name, applied, "Loaded patch");
    }
    for spec in &args.set {
        let (id, value) = parse_override(spec)?;
        params.set(id, value);
        tracing::debug!(param = id.string_id(), value, "Override");
    }

    let buffers = render_notes(
        params,
        &args.notes,
        args.tail,
        args.sample_rate,
        args.block_size,
        usize::from(args.channels),
    );

    let frames = buffers.first().map_or(0, Vec::len);
    tracing::info!(
        sample_rate = args.sample_rate,
        channels = args.channels,
        notes = args.notes.len(),
        duration_secs = frames as f64 / f64::from(args.sample_rate),
        "Rendered"
    );

    write_wav(&args.output, &buffers, args.sample_rate)?;

    let peak = buffers
        .iter()
        .flatten()
        .fold(0.0f32, |peak, s| peak.max(s.abs()));
    println!(
        "Wrote {} ({} frames, peak {:.1} dBFS)",
        args.output.display(),
        frames,
        20.0 * peak.max(1e-10).log10()
    );

    Ok(())
}

/// Render `notes` plus `tail_secs` of release into planar channel buffers.
///
/// The synth is driven one event at a time: audio is rendered up to each
/// note-on or note-off position, then the event is applied.
pub fn render_notes(
    params: Arc<SynthParams>,
    notes: &[NoteSpec],
    tail_secs: f32,
    sample_rate: u32,
    block_size: usize,
    channels: usize,
) -> Vec<Vec<f32>> {
    let mut synth = Synth::new(params);
    synth.prepare_to_play(sample_rate as f32, block_size);

    let events = schedule(notes, sample_rate);
    let last_event = events.last().map_or(0, |(pos, _)| *pos);
    let tail = (f64::from(tail_secs) * f64::from(sample_rate)).round() as usize;
    let total = last_event + tail;

    let mut buffers = vec![vec![0.0f32; total]; channels];
    let mut slices: Vec<&mut [f32]> = buffers.iter_mut().map(Vec::as_mut_slice).collect();

    let mut position = 0;
    for (at, event) in events {
        if at > position {
            synth.render_block(&mut slices, position, at - position);
            position = at;
        }
        match event {
            NoteEvent::On { note, velocity } => {
                synth.note_on(note, velocity);
            }
            NoteEvent::Off { note } => synth.note_off(note, true),
        }
    }
    if total > position {
        synth.render_block(&mut slices, position, total - position);
    }
    drop(slices);

    buffers
}
