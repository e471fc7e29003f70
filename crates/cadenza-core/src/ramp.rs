//! Linear parameter ramp.
//!
//! A [`LinearRamp`] moves toward its target at a constant rate so that every
//! change takes the same configured time, regardless of its size. The delay
//! lines use it to glide the delay length without zipper noise.

use libm::roundf;

/// Constant-rate smoother toward a target value.
///
/// Each [`set_target`](Self::set_target) restarts a ramp of
/// `ramp_secs × sample_rate` steps from the current value.
///
/// # Example
///
/// ```rust
/// use cadenza_core::LinearRamp;
///
/// let mut ramp = LinearRamp::new(0.0);
/// ramp.reset(1000.0, 0.1); // 100-sample ramps
/// ramp.set_target(1.0);
/// for _ in 0..100 {
///     ramp.next_value();
/// }
/// assert_eq!(ramp.current(), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct LinearRamp {
    current: f32,
    target: f32,
    step: f32,
    steps_remaining: u32,
    ramp_length: u32,
}

impl Default for LinearRamp {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl LinearRamp {
    /// Create a settled ramp at `initial` with no ramp length.
    pub fn new(initial: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            step: 0.0,
            steps_remaining: 0,
            ramp_length: 0,
        }
    }

    /// Configure the ramp length from a sample rate and duration and snap
    /// to the current target.
    pub fn reset(&mut self, sample_rate: f32, ramp_secs: f32) {
        self.ramp_length = roundf((sample_rate * ramp_secs).max(0.0)) as u32;
        self.snap_to_target();
    }

    /// Begin ramping toward `target`. Repeated calls with the same target
    /// leave a running ramp undisturbed.
    pub fn set_target(&mut self, target: f32) {
        if target == self.target {
            return;
        }
        self.target = target;
        if self.ramp_length == 0 {
            self.snap_to_target();
        } else {
            self.steps_remaining = self.ramp_length;
            self.step = (target - self.current) / self.ramp_length as f32;
        }
    }

    /// Jump to `value` with no ramp.
    pub fn set_immediate(&mut self, value: f32) {
        self.target = value;
        self.snap_to_target();
    }

    /// Finish any running ramp instantly.
    pub fn snap_to_target(&mut self) {
        self.current = self.target;
        self.step = 0.0;
        self.steps_remaining = 0;
    }

    /// Advance one sample and return the new value.
    #[inline]
    pub fn next_value(&mut self) -> f32 {
        if self.steps_remaining > 0 {
            self.steps_remaining -= 1;
            if self.steps_remaining == 0 {
                self.current = self.target;
            } else {
                self.current += self.step;
            }
        }
        self.current
    }

    /// Current value without advancing.
    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    /// Target value.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// `true` once the ramp has reached its target.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.steps_remaining == 0
    }
}
