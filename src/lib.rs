/// TAPPAD - a 16-pad tone instrument with tap recording and fast replay
///
/// This library provides the instrument core:
/// - Pad table with fixed notes and colors
/// - Tone synthesis (sine, low-pass, pluck envelope, voice pool)
/// - Audio output for the default device
/// - Tap recording and 4x time-compressed playback on a timer queue

pub mod audio;
pub mod clock;
pub mod config;
pub mod instrument;
pub mod pads;
pub mod scheduler;
pub mod sequencer;
pub mod tone;

// Re-export commonly used types
pub use audio::{AudioError, AudioOutput, ToneEngine, ToneOutput};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{InstrumentConfig, ToneConfig};
pub use instrument::{IndicatorId, Instrument, InstrumentEvent};
pub use pads::{PadError, PadIndex, Rgb, PAD_COUNT};
pub use sequencer::playback::PlaybackPlan;
pub use sequencer::{Sequence, TapEvent};
pub use tone::ToneSpec;
