//! Small math helpers used on the audio path.
//!
//! All functions are allocation-free, `#[inline]`, and `no_std` compatible.

use libm::tanhf;

/// Hyperbolic-tangent soft clip with a pre-gain.
///
/// `soft_clip(x, drive) = tanh(drive * x)`. The output stays inside (-1, 1)
/// for any finite input and approaches ±1 as `drive` grows, which is the
/// saturation shape used by both the amplifier distortion and the
/// oscillator push waveform.
///
/// # Example
///
/// ```rust
/// use cadenza_core::soft_clip;
///
/// assert!(soft_clip(0.1, 1.0) < 0.1);
/// assert!(soft_clip(1.0, 1000.0) > 0.999);
/// ```
#[inline]
pub fn soft_clip(x: f32, drive: f32) -> f32 {
    tanhf(drive * x)
}

/// Flush values below 1e-20 to zero.
///
/// Recursive filters decaying toward silence otherwise produce subnormal
/// floats, which are very slow on most CPUs.
#[inline]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Average of a stereo pair.
#[inline]
pub fn mono_sum(left: f32, right: f32) -> f32 {
    (left + right) * 0.5
}

/// Linear interpolation: `a` at `t = 0`, `b` at `t = 1`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
