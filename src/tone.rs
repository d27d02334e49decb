/// Tone synthesis - sine voice, low-pass filter, pluck envelope and voice pool
///
/// Everything here is plain sample math with no device attached, so the
/// audio callback can own a [`Mixer`] outright and tests can render into a
/// buffer.
use std::f32::consts::{PI, TAU};
use std::time::Duration;

/// Everything needed to sound one tap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneSpec {
    pub frequency_hz: f32,
    pub cutoff_hz: f32,
    pub peak_gain: f32,
    pub attack: Duration,
    pub length: Duration,
    pub decay_floor: f32,
}

impl ToneSpec {
    pub fn envelope(&self) -> ToneEnvelope {
        ToneEnvelope {
            peak: self.peak_gain,
            attack: self.attack.as_secs_f32(),
            length: self.length.as_secs_f32(),
            floor: self.decay_floor,
        }
    }
}

/*
  level
  peak ┐ ╱╲
       │╱  ╲_
       │     ╲___
  0    └───────────┴──→ t
        attack     length

Linear ramp from silence up to the peak, then an exponential ramp that lands
on `floor` exactly at `length`. After `length` the tone is over.
*/
#[derive(Debug, Clone, Copy)]
pub struct ToneEnvelope {
    peak: f32,
    attack: f32,
    length: f32,
    floor: f32,
}

impl ToneEnvelope {
    pub fn level_at(&self, t: f32) -> f32 {
        if t <= 0.0 || t >= self.length {
            return 0.0;
        }
        if t < self.attack {
            return self.peak * t / self.attack;
        }
        let progress = (t - self.attack) / (self.length - self.attack);
        self.peak * (self.floor / self.peak).powf(progress)
    }

    pub fn length(&self) -> f32 {
        self.length
    }
}

/// Two-pole state-variable low-pass (trapezoidal integration)
#[derive(Debug, Clone, Copy)]
pub struct LowPass {
    ic1eq: f32,
    ic2eq: f32,
    g: f32,
    k: f32,
}

impl LowPass {
    pub fn new(cutoff_hz: f32, sample_rate: f32) -> Self {
        let cutoff = cutoff_hz.clamp(1.0, sample_rate * 0.49);
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            g: (PI * cutoff / sample_rate).tan(),
            k: std::f32::consts::SQRT_2,
        }
    }

    #[inline]
    pub fn next_sample(&mut self, input: f32) -> f32 {
        let h = 1.0 / (1.0 + self.g * (self.g + self.k));
        let v3 = input - self.ic2eq;
        let v1 = h * (self.ic1eq + self.g * v3);
        let v2 = self.ic2eq + self.g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;
        v2
    }
}

/// One sounding tap. Finishes by itself once the envelope runs out.
#[derive(Debug, Clone)]
pub struct Tone {
    envelope: ToneEnvelope,
    filter: LowPass,
    phase: f32,
    phase_increment: f32,
    elapsed: u64,
    total: u64,
    sample_rate: f32,
    age: u64,
}

impl Tone {
    pub fn new(spec: &ToneSpec, sample_rate: f32, age: u64) -> Self {
        let envelope = spec.envelope();
        Self {
            envelope,
            filter: LowPass::new(spec.cutoff_hz, sample_rate),
            phase: 0.0,
            phase_increment: spec.frequency_hz / sample_rate,
            elapsed: 0,
            total: (envelope.length() * sample_rate).round() as u64,
            sample_rate,
            age,
        }
    }

    pub fn next_sample(&mut self) -> f32 {
        if self.is_finished() {
            return 0.0;
        }

        let t = self.elapsed as f32 / self.sample_rate;
        let osc = (self.phase * TAU).sin();
        self.phase += self.phase_increment;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        self.elapsed += 1;

        self.filter.next_sample(osc) * self.envelope.level_at(t)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.total
    }

    pub fn age(&self) -> u64 {
        self.age
    }
}

/// Fixed pool of voices summed into a mono block
pub struct Mixer {
    voices: Vec<Option<Tone>>,
    sample_rate: f32,
    started: u64,
}

impl Mixer {
    pub fn new(sample_rate: f32, max_voices: usize) -> Self {
        Self {
            voices: vec![None; max_voices.max(1)],
            sample_rate,
            started: 0,
        }
    }

    /// Start a voice, replacing the oldest one if the pool is full
    pub fn start(&mut self, spec: &ToneSpec) {
        let tone = Tone::new(spec, self.sample_rate, self.started);
        self.started += 1;

        let slot = match self.voices.iter().position(Option::is_none) {
            Some(free) => free,
            None => self
                .voices
                .iter()
                .enumerate()
                .filter_map(|(idx, v)| v.as_ref().map(|tone| (idx, tone.age())))
                .min_by_key(|&(_, age)| age)
                .map_or(0, |(idx, _)| idx),
        };
        self.voices[slot] = Some(tone);
    }

    pub fn render(&mut self, out: &mut [f32]) {
        out.fill(0.0);
        for slot in &mut self.voices {
            let Some(tone) = slot else { continue };
            for sample in out.iter_mut() {
                *sample += tone.next_sample();
            }
            if tone.is_finished() {
                *slot = None;
            }
        }
    }

    pub fn active_voices(&self) -> usize {
        self.voices.iter().filter(|v| v.is_some()).count()
    }
}
