//! Feedback delay line, plus the pieces both delay topologies share.
//!
//! Per channel, per sample:
//!
//! ```text
//! delayed = buf.read(d)                   d = smoothed delay in samples
//! out     = dry × x + wet × delayed
//! buf.write(x + feedback × delayed)
//! ```
//!
//! The delay length glides to its target over [`SMOOTHING_SECS`] so time
//! changes do not click. The glide is skipped (snapped) after
//! [`DelayLine::prepare`] and when the line comes back from a clear.

use cadenza_core::{DelayBuffer, LinearRamp, flush_denormal};

/// Longest simple-delay time, in seconds.
pub const SIMPLE_MAX_SECS: f32 = 2.0;

/// Delay-length glide time, in seconds.
pub const SMOOTHING_SECS: f32 = 0.1;

/// Shortest delay the lines are driven to, in samples.
pub const MIN_DELAY_SAMPLES: f32 = 1.0;

/// Scalar settings shared by both delay topologies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DelaySettings {
    /// Effect switched on.
    pub enabled: bool,
    /// Delay time in seconds.
    pub time_secs: f32,
    /// Level of the delayed signal.
    pub wet: f32,
    /// Level of the input signal.
    pub dry: f32,
    /// Amount of delayed signal written back.
    pub feedback: f32,
    /// Ping-pong same-side gain, 0.5..1. Ignored by the simple delay.
    pub depth: f32,
}

impl Default for DelaySettings {
    fn default() -> Self {
        Self {
            enabled: false,
            time_secs: 0.5,
            wet: 0.0,
            dry: 0.4,
            feedback: 0.0,
            depth: 1.0,
        }
    }
}

impl DelaySettings {
    /// Delay time in samples at `sample_rate`, floored at one sample.
    pub fn delay_samples(&self, sample_rate: f32) -> f32 {
        let samples = self.time_secs * sample_rate;
        if samples.is_finite() {
            samples.max(MIN_DELAY_SAMPLES)
        } else {
            MIN_DELAY_SAMPLES
        }
    }
}

/// A stereo delay topology.
pub trait DelayLine {
    /// Allocate buffers for `sample_rate`, silence them, and snap the delay
    /// glide on the next processed block. Control path only.
    fn prepare(&mut self, sample_rate: f32);

    /// Process a block in place. `right` is `None` for mono output.
    ///
    /// When `settings.enabled` is false the buffers are cleared once and the
    /// audio is left untouched.
    fn process(&mut self, settings: &DelaySettings, left: &mut [f32], right: Option<&mut [f32]>);

    /// Silence the buffers unless already silent since the last process.
    fn clear_once(&mut self);

    /// `true` if the buffers have been cleared and not written since.
    fn is_emptied(&self) -> bool;
}

/// Delay-length smoother with the snap-on-resume rule.
#[derive(Debug, Clone)]
pub(crate) struct DelayGlide {
    ramp: LinearRamp,
    sample_rate: f32,
    snap_pending: bool,
}

impl DelayGlide {
    pub(crate) fn new() -> Self {
        Self {
            ramp: LinearRamp::new(MIN_DELAY_SAMPLES),
            sample_rate: 0.0,
            snap_pending: true,
        }
    }

    pub(crate) fn prepare(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.ramp.reset(sample_rate, SMOOTHING_SECS);
        self.snap_pending = true;
    }

    pub(crate) fn request_snap(&mut self) {
        self.snap_pending = true;
    }

    /// Retarget at the start of a block.
    pub(crate) fn begin_block(&mut self, settings: &DelaySettings) {
        self.ramp.set_target(settings.delay_samples(self.sample_rate));
        if self.snap_pending {
            self.ramp.snap_to_target();
            self.snap_pending = false;
        }
    }

    #[inline]
    pub(crate) fn next(&mut self) -> f32 {
        self.ramp.next_value()
    }

    pub(crate) fn current(&self) -> f32 {
        self.ramp.current()
    }
}

/// Independent feedback delay per channel.
///
/// # Example
///
/// ```rust
/// use cadenza_effects::{DelayLine, DelaySettings, SimpleDelay};
///
/// let mut delay = SimpleDelay::new();
/// delay.prepare(8.0);
/// let settings = DelaySettings {
///     enabled: true,
///     time_secs: 0.5,
///     wet: 1.0,
///     dry: 0.0,
///     ..DelaySettings::default()
/// };
/// let mut block = [1.0, 0.0, 0.0, 0.0, 0.0, 0.0];
/// delay.process(&settings, &mut block, None);
/// assert_eq!(block, [0.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
/// ```
#[derive(Debug, Clone)]
pub struct SimpleDelay {
    lines: [DelayBuffer; 2],
    glide: DelayGlide,
    emptied: bool,
}

impl Default for SimpleDelay {
    fn default() -> Self {
        Self::new()
    }
}

impl SimpleDelay {
    /// Create an unprepared delay with minimal buffers.
    pub fn new() -> Self {
        Self {
            lines: [DelayBuffer::new(0), DelayBuffer::new(0)],
            glide: DelayGlide::new(),
            emptied: true,
        }
    }

    /// Capacity of each channel's buffer, in samples.
    pub fn capacity(&self) -> usize {
        self.lines[0].capacity()
    }

    /// Current (smoothed) delay in samples.
    pub fn current_delay(&self) -> f32 {
        self.glide.current()
    }

    #[inline]
    fn tick(line: &mut DelayBuffer, settings: &DelaySettings, x: f32, d: f32) -> f32 {
        let delayed = line.read(d);
        line.write(flush_denormal(x + settings.feedback * delayed));
        settings.dry * x + settings.wet * delayed
    }
}

impl DelayLine for SimpleDelay {
    fn prepare(&mut self, sample_rate: f32) {
        let capacity = DelayBuffer::capacity_for(sample_rate, SIMPLE_MAX_SECS);
        for line in &mut self.lines {
            line.resize(capacity);
        }
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

        let [line_l, line_r] = &mut self.lines;
        match right {
            Some(right) => {
                for (l, r) in left.iter_mut().zip(right.iter_mut()) {
                    let d = self.glide.next();
                    *l = Self::tick(line_l, settings, *l, d);
                    *r = Self::tick(line_r, settings, *r, d);
                }
            }
            None => {
                for l in left.iter_mut() {
                    let d = self.glide.next();
                    *l = Self::tick(line_l, settings, *l, d);
                }
            }
        }
    }

    fn clear_once(&mut self) {
        if self.emptied {
            return;
        }
        for line in &mut self.lines {
            line.clear();
        }
        self.emptied = true;
        #[cfg(feature = "tracing")]
        tracing::debug!("simple delay cleared");
    }

    fn is_emptied(&self) -> bool {
        self.emptied
    }
}
