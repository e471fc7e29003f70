//! WAV output.

use std::path::Path;

use anyhow::Context;
use hound::{SampleFormat, WavSpec, WavWriter};

/// Write planar channels as an interleaved 32-bit float WAV file.
///
/// Frames past the end of the shortest channel are dropped.
pub fn write_wav(path: &Path, channels: &[Vec<f32>], sample_rate: u32) -> anyhow::Result<()> {
    let channel_count =
        u16::try_from(channels.len()).context("too many channels for a WAV file")?;
    let spec = WavSpec {
        channels: channel_count,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, spec)
        .with_context(|| format!("failed to create '{}'", path.display()))?;

    let frames = channels.iter().map(Vec::len).min().unwrap_or(0);
    for i in 0..frames {
        for channel in channels {
            writer
                .write_sample(channel[i])
                .with_context(|| format!("failed to write '{}'", path.display()))?;
        }
    }

    writer
        .finalize()
        .with_context(|| format!("failed to finalize '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::WavReader;
    use tempfile::TempDir;

    #[test]
    fn test_stereo_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.wav");
        let left = vec![0.1, 0.2, 0.3];
        let right = vec![-0.1, -0.2, -0.3];
        write_wav(&path, &[left, right], 44100).unwrap();

        let reader = WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 2);
        assert_eq!(spec.sample_rate, 44100);
        assert_eq!(spec.sample_format, SampleFormat::Float);
        let samples: Vec<f32> = reader.into_samples::<f32>().map(Result::unwrap).collect();
        assert_eq!(samples, vec![0.1, -0.1, 0.2, -0.2, 0.3, -0.3]);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no").join("such").join("out.wav");
        let err = write_wav(&path, &[vec![0.0]], 48000).unwrap_err();
        assert!(err.to_string().contains("failed to create"), "got: {err}");
    }
}
