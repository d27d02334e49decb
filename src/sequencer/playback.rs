/// Playback timing - turns a recorded sequence into scheduled triggers
use std::time::Duration;

use crate::pads::PadIndex;
use crate::sequencer::Sequence;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTrigger {
    pub delay: Duration,
    pub pad: PadIndex,
}

/// When every tap replays, relative to the moment playback starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackPlan {
    triggers: Vec<ScheduledTrigger>,
    total: Duration,
}

impl PlaybackPlan {
    /// `None` for an empty sequence
    pub fn from_sequence(sequence: &Sequence, speedup: u32, tail: Duration) -> Option<Self> {
        let t0 = sequence.first()?.timestamp_ms();
        let speedup = u64::from(speedup.max(1));
        let compress = |elapsed_ms: u64| Duration::from_micros(elapsed_ms * 1000 / speedup);

        let triggers = sequence
            .iter()
            .map(|event| ScheduledTrigger {
                delay: compress(event.timestamp_ms() - t0),
                pad: event.pad(),
            })
            .collect();

        Some(Self {
            triggers,
            total: compress(sequence.span_ms()) + tail,
        })
    }

    pub fn triggers(&self) -> &[ScheduledTrigger] {
        &self.triggers
    }

    /// How long the player stays busy, tail included
    pub fn total(&self) -> Duration {
        self.total
    }
}

/// Busy flag for playback. Goes idle on a timer, not when sounds end.
#[derive(Debug, Default)]
pub struct Player {
    is_playing: bool,
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Plan a run over `sequence`, or `None` if already playing or nothing
    /// was recorded
    pub fn start(
        &mut self,
        sequence: &Sequence,
        speedup: u32,
        tail: Duration,
    ) -> Option<PlaybackPlan> {
        if self.is_playing {
            return None;
        }
        let plan = PlaybackPlan::from_sequence(sequence, speedup, tail)?;
        self.is_playing = true;
        Some(plan)
    }

    pub fn finish(&mut self) {
        self.is_playing = false;
    }
}
