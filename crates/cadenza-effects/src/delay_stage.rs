//! The post-mix delay slot: exactly one topology runs at a time.
//!
//! Both topologies are allocated in [`DelayStage::prepare`]. [`DelayMode`]
//! selects which one processes; the other is cleared once and then frozen
//! (its write index does not move).

use crate::delay::{DelayLine, DelaySettings, SimpleDelay};
use crate::ping_pong::PingPongDelay;

/// Delay topology selector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DelayMode {
    /// Independent feedback delay per channel.
    Normal,
    /// Alternating left/right echoes.
    #[default]
    PingPong,
}

/// Simple and ping-pong delays behind one mode switch.
///
/// ```rust
/// use cadenza_effects::{DelayMode, DelaySettings, DelayStage};
///
/// let mut stage = DelayStage::new();
/// stage.prepare(48000.0);
///
/// let mut left = [0.25f32; 64];
/// let mut right = [0.25f32; 64];
/// // Disabled: audio passes through untouched.
/// stage.process(DelayMode::Normal, &DelaySettings::default(), &mut left, Some(&mut right));
/// assert!(left.iter().all(|s| *s == 0.25));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DelayStage {
    simple: SimpleDelay,
    ping_pong: PingPongDelay,
}

impl DelayStage {
    /// Create an unprepared stage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate and silence both topologies. Control path only.
    pub fn prepare(&mut self, sample_rate: f32) {
        self.simple.prepare(sample_rate);
        self.ping_pong.prepare(sample_rate);
    }

    /// Run the selected topology over a block.
    pub fn process(
        &mut self,
        mode: DelayMode,
        settings: &DelaySettings,
        left: &mut [f32],
        right: Option<&mut [f32]>,
    ) {
        match mode {
            DelayMode::Normal => {
                self.ping_pong.clear_once();
                self.simple.process(settings, left, right);
            }
            DelayMode::PingPong => {
                self.simple.clear_once();
                self.ping_pong.process(settings, left, right);
            }
        }
    }

    /// The simple delay.
    pub fn simple(&self) -> &SimpleDelay {
        &self.simple
    }

    /// The ping-pong delay.
    pub fn ping_pong(&self) -> &PingPongDelay {
        &self.ping_pong
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 1000.0;

    fn on() -> DelaySettings {
        DelaySettings {
            enabled: true,
            time_secs: 0.125,
            wet: 0.5,
            dry: 0.5,
            feedback: 0.5,
            depth: 1.0,
        }
    }

    #[test]
    fn test_only_selected_topology_runs() {
        let mut stage = DelayStage::new();
        stage.prepare(SR);
        let mut left = [0.3f32; 32];
        let mut right = [0.3f32; 32];
        stage.process(DelayMode::Normal, &on(), &mut left, Some(&mut right));
        assert!(!stage.simple().is_emptied());
        assert!(stage.ping_pong().is_emptied());

        stage.process(DelayMode::PingPong, &on(), &mut left, Some(&mut right));
        assert!(stage.simple().is_emptied(), "deselected topology is cleared");
        assert!(!stage.ping_pong().is_emptied());
    }

    #[test]
    fn test_disabled_clears_selected_and_passes_through() {
        let mut stage = DelayStage::new();
        stage.prepare(SR);
        let mut left = [0.3f32; 32];
        stage.process(DelayMode::PingPong, &on(), &mut left, None);

        let mut left = [0.7f32; 32];
        let off = DelaySettings { enabled: false, ..on() };
        stage.process(DelayMode::PingPong, &off, &mut left, None);
        assert!(left.iter().all(|s| *s == 0.7));
        assert!(stage.ping_pong().is_emptied());
        assert!(stage.simple().is_emptied());
    }
}
