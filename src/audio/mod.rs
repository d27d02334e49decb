/// Tone engine - maps pads to tones and hands them to an audio output
use std::sync::mpsc::Sender;

use tracing::warn;

use crate::config::ToneConfig;
use crate::pads::PadIndex;
use crate::tone::ToneSpec;

mod device;

pub use device::{AudioError, AudioOutput};

/// Anything that can start a tone without blocking the caller
pub trait ToneOutput {
    fn start_tone(&mut self, spec: ToneSpec);
}

impl ToneOutput for Sender<ToneSpec> {
    fn start_tone(&mut self, spec: ToneSpec) {
        let _ = self.send(spec);
    }
}

pub struct ToneEngine {
    output: Option<Box<dyn ToneOutput>>,
    config: ToneConfig,
}

impl ToneEngine {
    pub fn new(output: Box<dyn ToneOutput>, config: ToneConfig) -> Self {
        Self {
            output: Some(output),
            config,
        }
    }

    /// Silent engine; every `play_tone` is a no-op
    pub fn disabled(config: ToneConfig) -> Self {
        Self {
            output: None,
            config,
        }
    }

    /// Open the default audio device, falling back to a silent engine
    pub fn with_default_output(config: ToneConfig) -> Self {
        match AudioOutput::new(&config) {
            Ok(output) => Self::new(Box::new(output), config),
            Err(err) => {
                warn!("audio unavailable, running without sound: {err}");
                Self::disabled(config)
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.output.is_some()
    }

    pub fn play_tone(&mut self, pad: PadIndex) {
        let Some(output) = self.output.as_mut() else {
            return;
        };
        output.start_tone(self.config.spec_for(pad.frequency()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pads::PAD_FREQUENCIES;
    use std::sync::mpsc::channel;

    #[test]
    fn test_play_tone_uses_pad_frequency() {
        let (tx, rx) = channel();
        let mut engine = ToneEngine::new(Box::new(tx), ToneConfig::default());

        for pad in PadIndex::all() {
            engine.play_tone(pad);
        }

        let tones: Vec<ToneSpec> = rx.try_iter().collect();
        assert_eq!(tones.len(), PAD_FREQUENCIES.len());
        for (tone, freq) in tones.iter().zip(PAD_FREQUENCIES) {
            assert_eq!(tone.frequency_hz, freq);
            assert_eq!(tone.cutoff_hz, freq * 2.0);
            assert_eq!(tone.peak_gain, 0.3);
        }
    }

    #[test]
    fn test_disabled_engine_is_silent() {
        let mut engine = ToneEngine::disabled(ToneConfig::default());
        assert!(!engine.is_enabled());
        engine.play_tone(PadIndex::new(0).unwrap());
    }
}
