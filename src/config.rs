/// Tunables for the tone engine and the instrument, fixed at construction
use std::time::Duration;

use crate::tone::ToneSpec;

#[derive(Debug, Clone)]
pub struct ToneConfig {
    pub peak_gain: f32,
    pub attack: Duration,
    pub length: Duration,
    /// Level the exponential decay reaches at the end of the tone
    pub decay_floor: f32,
    /// Low-pass cutoff as a multiple of the fundamental
    pub cutoff_ratio: f32,
    pub max_voices: usize,
    pub trigger_capacity: usize,
}

impl ToneConfig {
    pub fn spec_for(&self, frequency_hz: f32) -> ToneSpec {
        ToneSpec {
            frequency_hz,
            cutoff_hz: frequency_hz * self.cutoff_ratio,
            peak_gain: self.peak_gain,
            attack: self.attack,
            length: self.length,
            decay_floor: self.decay_floor,
        }
    }
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            peak_gain: 0.3,
            attack: Duration::from_millis(10),
            length: Duration::from_millis(800),
            decay_floor: 0.001,
            cutoff_ratio: 2.0,
            max_voices: 32,
            trigger_capacity: 64,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InstrumentConfig {
    /// Playback runs this many times faster than the taps were recorded
    pub playback_speedup: u32,
    /// Extra time after the last replayed tone before playback ends
    pub playback_tail: Duration,
    pub pad_flash: Duration,
    pub indicator_lifetime: Duration,
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        Self {
            playback_speedup: 4,
            playback_tail: Duration::from_millis(1000),
            pad_flash: Duration::from_millis(300),
            indicator_lifetime: Duration::from_millis(4000),
        }
    }
}
