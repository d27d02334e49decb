/// The instrument - pads, recorder and player behind one owned value
///
/// The front end feeds taps and button presses in, calls [`Instrument::tick`]
/// once per frame, and drains [`InstrumentEvent`]s to know what to draw.
use std::time::Duration;

use tracing::{debug, info};

use crate::audio::ToneEngine;
use crate::clock::{Clock, SystemClock};
use crate::config::InstrumentConfig;
use crate::pads::{PadIndex, Rgb};
use crate::scheduler::Scheduler;
use crate::sequencer::playback::Player;
use crate::sequencer::{Recorder, Sequence};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndicatorId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstrumentEvent {
    PadActivated(PadIndex),
    PadReleased(PadIndex),
    TapRecorded { id: IndicatorId, pad: PadIndex, color: Rgb },
    IndicatorExpired(IndicatorId),
    SequenceCleared,
    RecordingChanged(bool),
    PlaybackChanged(bool),
}

#[derive(Debug)]
enum Task {
    Replay(PadIndex),
    ReleasePad(PadIndex),
    ExpireIndicator(IndicatorId),
    FinishPlayback,
}

pub struct Instrument<C: Clock = SystemClock> {
    tones: ToneEngine,
    recorder: Recorder,
    player: Player,
    scheduler: Scheduler<Task>,
    events: Vec<InstrumentEvent>,
    clock: C,
    config: InstrumentConfig,
    next_indicator: u64,
}

impl<C: Clock> Instrument<C> {
    pub fn new(tones: ToneEngine, clock: C, config: InstrumentConfig) -> Self {
        Self {
            tones,
            recorder: Recorder::new(),
            player: Player::new(),
            scheduler: Scheduler::new(),
            events: Vec::new(),
            clock,
            config,
            next_indicator: 0,
        }
    }

    /// A tap, live or replayed: sound it, flash it, record it if armed
    pub fn trigger_pad(&mut self, pad: PadIndex) {
        self.tones.play_tone(pad);

        self.events.push(InstrumentEvent::PadActivated(pad));
        self.schedule_in(self.config.pad_flash, Task::ReleasePad(pad));

        if let Some(event) = self.recorder.record(pad, self.clock.wall_millis()) {
            let id = IndicatorId(self.next_indicator);
            self.next_indicator += 1;
            debug!("recorded pad {} at {}", pad, event.timestamp_ms());

            self.events.push(InstrumentEvent::TapRecorded {
                id,
                pad,
                color: pad.color(),
            });
            self.schedule_in(self.config.indicator_lifetime, Task::ExpireIndicator(id));
        }
    }

    pub fn toggle_recording(&mut self) {
        let recording = self.recorder.toggle();
        if recording {
            self.events.push(InstrumentEvent::SequenceCleared);
        }
        info!(
            "recording {}",
            if recording { "started" } else { "stopped" }
        );
        self.events.push(InstrumentEvent::RecordingChanged(recording));
    }

    /// Empties the sequence. Replays already scheduled still fire.
    pub fn clear_sequence(&mut self) {
        self.recorder.clear();
        self.events.push(InstrumentEvent::SequenceCleared);
    }

    /// Replay the sequence four times faster. Returns false when there is
    /// nothing to play or a playback is still running.
    pub fn play(&mut self) -> bool {
        let Some(plan) = self.player.start(
            self.recorder.sequence(),
            self.config.playback_speedup,
            self.config.playback_tail,
        ) else {
            debug!("play ignored (empty sequence or already playing)");
            return false;
        };

        for trigger in plan.triggers() {
            self.schedule_in(trigger.delay, Task::Replay(trigger.pad));
        }
        self.schedule_in(plan.total(), Task::FinishPlayback);

        info!(
            "playing {} taps over {:?}",
            plan.triggers().len(),
            plan.total()
        );
        self.events.push(InstrumentEvent::PlaybackChanged(true));
        true
    }

    /// Fire every task that has come due
    pub fn tick(&mut self) {
        let now = self.clock.now();
        while let Some(task) = self.scheduler.pop_due(now) {
            match task {
                Task::Replay(pad) => self.trigger_pad(pad),
                Task::ReleasePad(pad) => self.events.push(InstrumentEvent::PadReleased(pad)),
                Task::ExpireIndicator(id) => {
                    self.events.push(InstrumentEvent::IndicatorExpired(id))
                }
                Task::FinishPlayback => {
                    self.player.finish();
                    debug!("playback finished");
                    self.events.push(InstrumentEvent::PlaybackChanged(false));
                }
            }
        }
    }

    pub fn poll_events(&mut self) -> Vec<InstrumentEvent> {
        std::mem::take(&mut self.events)
    }

    /// Time until the next scheduled task, if any
    pub fn next_wakeup(&self) -> Option<Duration> {
        self.scheduler
            .next_due()
            .map(|due| due.saturating_sub(self.clock.now()))
    }

    pub fn is_recording(&self) -> bool {
        self.recorder.is_recording()
    }

    pub fn is_playing(&self) -> bool {
        self.player.is_playing()
    }

    pub fn sequence(&self) -> &Sequence {
        self.recorder.sequence()
    }

    pub fn audio_enabled(&self) -> bool {
        self.tones.is_enabled()
    }

    fn schedule_in(&mut self, delay: Duration, task: Task) {
        let due = self.clock.now() + delay;
        self.scheduler.schedule_at(due, task);
    }
}

impl Instrument<SystemClock> {
    /// Instrument on the default audio device and the system clock
    pub fn with_defaults() -> Self {
        Self::new(
            ToneEngine::with_default_output(Default::default()),
            SystemClock::new(),
            InstrumentConfig::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::ToneConfig;
    use crate::tone::ToneSpec;
    use std::sync::mpsc::{channel, Receiver};

    fn pad(i: usize) -> PadIndex {
        PadIndex::new(i).unwrap()
    }

    fn instrument() -> (Instrument<ManualClock>, ManualClock, Receiver<ToneSpec>) {
        let (tx, rx) = channel();
        let clock = ManualClock::new(1_000);
        let tones = ToneEngine::new(Box::new(tx), ToneConfig::default());
        let inst = Instrument::new(tones, clock.clone(), InstrumentConfig::default());
        (inst, clock, rx)
    }

    #[test]
    fn test_starts_idle() {
        let (inst, _, _) = instrument();
        assert!(!inst.is_recording());
        assert!(!inst.is_playing());
        assert!(inst.sequence().is_empty());
        assert!(inst.audio_enabled());
    }

    #[test]
    fn test_tap_while_idle_only_sounds() {
        let (mut inst, _, rx) = instrument();
        inst.trigger_pad(pad(4));

        assert!(inst.sequence().is_empty());
        assert_eq!(rx.try_recv().unwrap().frequency_hz, 440.0);
        assert_eq!(inst.poll_events(), vec![InstrumentEvent::PadActivated(pad(4))]);
    }

    #[test]
    fn test_taps_recorded_in_order() {
        let (mut inst, clock, _) = instrument();
        inst.toggle_recording();
        inst.trigger_pad(pad(3));
        clock.advance_millis(120);
        inst.trigger_pad(pad(8));

        let taps: Vec<(usize, u64)> = inst
            .sequence()
            .iter()
            .map(|e| (e.pad().get(), e.timestamp_ms()))
            .collect();
        assert_eq!(taps, vec![(3, 1_000), (8, 1_120)]);
    }

    #[test]
    fn test_recorded_tap_notifies_with_color() {
        let (mut inst, _, _) = instrument();
        inst.toggle_recording();
        inst.poll_events();
        inst.trigger_pad(pad(0));

        let events = inst.poll_events();
        assert!(events.contains(&InstrumentEvent::TapRecorded {
            id: IndicatorId(0),
            pad: pad(0),
            color: pad(0).color(),
        }));
    }

    #[test]
    fn test_toggle_recording_clears_sequence() {
        let (mut inst, _, _) = instrument();
        inst.toggle_recording();
        inst.trigger_pad(pad(1));
        inst.toggle_recording();
        assert_eq!(inst.sequence().len(), 1);

        inst.poll_events();
        inst.toggle_recording();
        assert!(inst.is_recording());
        assert!(inst.sequence().is_empty());
        assert_eq!(
            inst.poll_events(),
            vec![
                InstrumentEvent::SequenceCleared,
                InstrumentEvent::RecordingChanged(true)
            ]
        );
    }

    #[test]
    fn test_clear_keeps_flags() {
        let (mut inst, _, _) = instrument();
        inst.toggle_recording();
        inst.trigger_pad(pad(1));
        inst.clear_sequence();
        assert!(inst.sequence().is_empty());
        assert!(inst.is_recording());
    }

    #[test]
    fn test_pad_flash_and_indicator_expire() {
        let (mut inst, clock, _) = instrument();
        inst.toggle_recording();
        inst.trigger_pad(pad(6));
        inst.poll_events();

        clock.advance_millis(299);
        inst.tick();
        assert!(inst.poll_events().is_empty());

        clock.advance_millis(1);
        inst.tick();
        assert_eq!(inst.poll_events(), vec![InstrumentEvent::PadReleased(pad(6))]);

        clock.advance_millis(3_700);
        inst.tick();
        assert_eq!(
            inst.poll_events(),
            vec![InstrumentEvent::IndicatorExpired(IndicatorId(0))]
        );
    }

    #[test]
    fn test_play_empty_is_noop() {
        let (mut inst, _, rx) = instrument();
        assert!(!inst.play());
        inst.tick();
        assert!(!inst.is_playing());
        assert!(rx.try_recv().is_err());
        assert!(inst.poll_events().is_empty());
    }

    #[test]
    fn test_play_while_playing_is_noop() {
        let (mut inst, clock, rx) = instrument();
        inst.toggle_recording();
        inst.trigger_pad(pad(2));
        clock.advance_millis(400);
        inst.trigger_pad(pad(3));
        inst.toggle_recording();
        let _: Vec<_> = rx.try_iter().collect();

        assert!(inst.play());
        assert!(!inst.play());
        clock.advance_millis(100);
        inst.tick();
        assert_eq!(rx.try_iter().count(), 2);
        assert!(inst.is_playing());
    }

    #[test]
    fn test_clear_during_playback_does_not_cancel() {
        let (mut inst, clock, rx) = instrument();
        inst.toggle_recording();
        inst.trigger_pad(pad(0));
        clock.advance_millis(800);
        inst.trigger_pad(pad(1));
        inst.toggle_recording();
        let _: Vec<_> = rx.try_iter().collect();

        inst.play();
        inst.tick();
        inst.clear_sequence();
        clock.advance_millis(200);
        inst.tick();

        let replayed: Vec<f32> = rx.try_iter().map(|t| t.frequency_hz).collect();
        assert_eq!(replayed, vec![pad(0).frequency(), pad(1).frequency()]);
        assert!(inst.is_playing());
    }

    #[test]
    fn test_next_wakeup() {
        let (mut inst, clock, _) = instrument();
        assert_eq!(inst.next_wakeup(), None);
        inst.trigger_pad(pad(0));
        clock.advance_millis(100);
        assert_eq!(inst.next_wakeup(), Some(Duration::from_millis(200)));
    }
}
