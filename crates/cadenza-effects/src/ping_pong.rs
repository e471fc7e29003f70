//! Ping-pong delay.
//!
//! Both lines are fed the mono sum of the input; the right line is read at
//! twice the delay, so echoes alternate sides:
//!
//! ```text
//! mono  = (L + R) / 2
//! dL    = bufL.read(d)            dR = bufR.read(2d)
//! bufL ← mono + fb × dL           bufR ← mono + (fb / 2) × dR
//! outL  = dry × L + depth × wet × dL + (1 − depth) × wet × dR
//! outR  = dry × R + depth × wet × dR + (1 − depth) × wet × dL
//! ```
//!
//! `depth` 1 keeps each echo on its own side; 0.5 spreads every echo
//! equally across both. Mono output uses the left equations with `R = L`.

use cadenza_core::{DelayBuffer, flush_denormal, mono_sum};

use crate::delay::{DelayGlide, DelayLine, DelaySettings};

/// Longest ping-pong buffer, in seconds (twice the longest delay time).
pub const PING_PONG_MAX_SECS: f32 = 4.0;

/// Stereo ping-pong delay.
#[derive(Debug, Clone)]
pub struct PingPongDelay {
    left: DelayBuffer,
    right: DelayBuffer,
    glide: DelayGlide,
    emptied: bool,
}

impl Default for PingPongDelay {
    fn default() -> Self {
        Self::new()
    }
}

impl PingPongDelay {
    /// Create an unprepared delay with minimal buffers.
    pub fn new() -> Self {
        Self {
            left: DelayBuffer::new(0),
            right: DelayBuffer::new(0),
            glide: DelayGlide::new(),
            emptied: true,
        }
    }

    /// Capacity of each channel's buffer, in samples.
    pub fn capacity(&self) -> usize {
        self.left.capacity()
    }

    /// Advance both lines by one sample; returns the two delayed taps.
    #[inline]
    fn tick(&mut self, settings: &DelaySettings, mono: f32) -> (f32, f32) {
        let d = self.glide.next();
        let delayed_l = self.left.read(d);
        let delayed_r = self.right.read(2.0 * d);
        self.left
            .write(flush_denormal(mono + settings.feedback * delayed_l));
        self.right
            .write(flush_denormal(mono + settings.feedback * 0.5 * delayed_r));
        (delayed_l, delayed_r)
    }
}

impl DelayLine for PingPongDelay {
    fn prepare(&mut self, sample_rate: f32) {
        let capacity = DelayBuffer::capacity_for(sample_rate, PING_PONG_MAX_SECS);
        self.left.resize(capacity);
        self.right.resize(capacity);
        self.glide.prepare(sample_rate);
        self.emptied = true;
    }

    fn process(&mut self, settings: &DelaySettings, left: &mut [f32], right: Option<&mut [f32]>) {
        if !settings.enabled {
            self.clear_once();
            return;
        }
        if self.emptied {
            self.glide.request_snap();
            self.emptied = false;
        }
        self.glide.begin_block(settings);

        let same = settings.depth * settings.wet;
        let cross = (1.0 - settings.depth) * settings.wet;
        let dry = settings.dry;

        match right {
            Some(right) => {
                for (l, r) in left.iter_mut().zip(right.iter_mut()) {
                    let (dl, dr) = self.tick(settings, mono_sum(*l, *r));
                    *l = dry * *l + same * dl + cross * dr;
                    *r = dry * *r + same * dr + cross * dl;
                }
            }
            None => {
                for l in left.iter_mut() {
                    let (dl, dr) = self.tick(settings, *l);
                    *l = dry * *l + same * dl + cross * dr;
                }
            }
        }
    }

    fn clear_once(&mut self) {
        if self.emptied {
            return;
        }
        self.left.clear();
        self.right.clear();
        self.emptied = true;
        #[cfg(feature = "tracing")]
        tracing::debug!("ping-pong delay cleared");
    }

    fn is_emptied(&self) -> bool {
        self.emptied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    extern crate alloc;
    use alloc::vec;
    use alloc::vec::Vec;

    const SR: f32 = 1000.0;

    fn settings(depth: f32, feedback: f32) -> DelaySettings {
        DelaySettings {
            enabled: true,
            time_secs: 0.125,
            wet: 1.0,
            dry: 0.0,
            feedback,
            depth,
        }
    }

    fn run(depth: f32, feedback: f32, n: usize) -> (Vec<f32>, Vec<f32>) {
        let mut d = PingPongDelay::new();
        d.prepare(SR);
        let mut left = vec![0.0; n];
        let mut right = vec![0.0; n];
        left[0] = 1.0;
        d.process(&settings(depth, feedback), &mut left, Some(&mut right));
        (left, right)
    }

    #[test]
    fn test_capacity_is_four_seconds_plus_one() {
        let mut d = PingPongDelay::new();
        d.prepare(48000.0);
        assert_eq!(d.capacity(), 192001);
    }

    #[test]
    fn test_echoes_alternate_sides() {
        // Left impulse → mono 0.5 into both lines.
        let (left, right) = run(1.0, 0.0, 300);
        assert!((left[125] - 0.5).abs() < 1e-6, "left echo at d, got {}", left[125]);
        assert!((right[250] - 0.5).abs() < 1e-6, "right echo at 2d, got {}", right[250]);
        assert!(right[125].abs() < 1e-6);
        assert!(left[250].abs() < 1e-6);
    }

    #[test]
    fn test_right_tap_reaches_four_seconds() {
        let mut d = PingPongDelay::new();
        d.prepare(SR);
        let mut left = vec![0.0; 4200];
        let mut right = vec![0.0; 4200];
        left[0] = 1.0;
        let longest = DelaySettings {
            time_secs: 2.0,
            ..settings(1.0, 0.0)
        };
        d.process(&longest, &mut left, Some(&mut right));
        assert!((left[2000] - 0.5).abs() < 1e-6, "left echo at 2 s, got {}", left[2000]);
        assert!((right[4000] - 0.5).abs() < 1e-6, "right echo at 4 s, got {}", right[4000]);
        assert!(right[3999].abs() < 1e-6);
    }

    #[test]
    fn test_half_depth_is_symmetric() {
        let (left, right) = run(0.5, 0.6, 1200);
        for (i, (l, r)) in left.iter().zip(right.iter()).enumerate() {
            assert!((l.abs() - r.abs()).abs() < 1e-6, "sample {i}: {l} vs {r}");
        }
        assert!(left.iter().any(|s| s.abs() > 0.1));
    }

    #[test]
    fn test_right_feedback_is_halved() {
        let (_, right) = run(1.0, 1.0, 800);
        // Right line: 0.5 at 2d, then 0.5 × 0.5 at 4d.
        assert!((right[250] - 0.5).abs() < 1e-6);
        assert!((right[500] - 0.25).abs() < 1e-6, "got {}", right[500]);
    }

    #[test]
    fn test_disabled_passthrough_and_clear_once() {
        let mut d = PingPongDelay::new();
        d.prepare(SR);
        let mut warm = vec![0.5; 64];
        d.process(&settings(1.0, 0.5), &mut warm, None);
        assert!(!d.is_emptied());

        let input: Vec<f32> = (0..32).map(|i| i as f32 * 0.01 - 0.1).collect();
        let mut left = input.clone();
        let mut right = input.clone();
        let off = DelaySettings {
            enabled: false,
            ..settings(1.0, 0.5)
        };
        d.process(&off, &mut left, Some(&mut right));
        assert_eq!(left, input);
        assert_eq!(right, input);
        assert!(d.is_emptied());
    }
}
