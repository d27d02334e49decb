/// Core sequence logic - tap events and the recording state machine
/// Timing lives in `playback`; this module only knows order and timestamps.
use crate::pads::PadIndex;

pub mod playback;

/// One recorded tap. Only the recorder creates these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapEvent {
    pad: PadIndex,
    timestamp_ms: u64,
}

impl TapEvent {
    pub fn pad(&self) -> PadIndex {
        self.pad
    }

    pub fn timestamp_ms(&self) -> u64 {
        self.timestamp_ms
    }
}

/// Taps in the order they happened, timestamps never decreasing
#[derive(Debug, Clone, Default)]
pub struct Sequence {
    events: Vec<TapEvent>,
}

impl Sequence {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// A timestamp older than the last event (wall clock stepped back) is
    /// pinned to the last event's timestamp.
    fn push(&mut self, pad: PadIndex, timestamp_ms: u64) -> &TapEvent {
        let timestamp_ms = self
            .last()
            .map_or(timestamp_ms, |last| timestamp_ms.max(last.timestamp_ms));
        self.events.push(TapEvent { pad, timestamp_ms });
        &self.events[self.events.len() - 1]
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn first(&self) -> Option<&TapEvent> {
        self.events.first()
    }

    pub fn last(&self) -> Option<&TapEvent> {
        self.events.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TapEvent> {
        self.events.iter()
    }

    /// Time between the first and last tap
    pub fn span_ms(&self) -> u64 {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => last.timestamp_ms - first.timestamp_ms,
            _ => 0,
        }
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a TapEvent;
    type IntoIter = std::slice::Iter<'a, TapEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

/// Owns the sequence and the record flag
#[derive(Debug, Default)]
pub struct Recorder {
    sequence: Sequence,
    is_recording: bool,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn is_recording(&self) -> bool {
        self.is_recording
    }

    /// Flip the record flag. Starting a take always wipes the previous one.
    pub fn toggle(&mut self) -> bool {
        self.is_recording = !self.is_recording;
        if self.is_recording {
            self.sequence.clear();
        }
        self.is_recording
    }

    /// Append a tap if recording, returning the stored event
    pub fn record(&mut self, pad: PadIndex, timestamp_ms: u64) -> Option<TapEvent> {
        if !self.is_recording {
            return None;
        }
        Some(*self.sequence.push(pad, timestamp_ms))
    }

    pub fn clear(&mut self) {
        self.sequence.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pad(i: usize) -> PadIndex {
        PadIndex::new(i).unwrap()
    }

    #[test]
    fn test_recorder_starts_idle() {
        let recorder = Recorder::new();
        assert!(!recorder.is_recording());
        assert!(recorder.sequence().is_empty());
    }

    #[test]
    fn test_record_only_while_recording() {
        let mut recorder = Recorder::new();
        assert_eq!(recorder.record(pad(1), 100), None);
        assert!(recorder.sequence().is_empty());

        recorder.toggle();
        recorder.record(pad(1), 100);
        recorder.record(pad(7), 160);
        let pads: Vec<usize> = recorder.sequence().iter().map(|e| e.pad().get()).collect();
        assert_eq!(pads, vec![1, 7]);
    }

    #[test]
    fn test_toggle_on_clears_previous_take() {
        let mut recorder = Recorder::new();
        recorder.toggle();
        recorder.record(pad(3), 10);
        assert!(!recorder.toggle());
        assert_eq!(recorder.sequence().len(), 1);

        assert!(recorder.toggle());
        assert!(recorder.sequence().is_empty());
    }

    #[test]
    fn test_timestamps_never_decrease() {
        let mut recorder = Recorder::new();
        recorder.toggle();
        recorder.record(pad(0), 500);
        let clamped = recorder.record(pad(0), 450).unwrap();
        assert_eq!(clamped.timestamp_ms(), 500);
        assert_eq!(recorder.sequence().span_ms(), 0);
    }

    #[test]
    fn test_clear_keeps_record_flag() {
        let mut recorder = Recorder::new();
        recorder.toggle();
        recorder.record(pad(2), 1);
        recorder.clear();
        assert!(recorder.sequence().is_empty());
        assert!(recorder.is_recording());
    }
}
