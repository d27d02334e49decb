/// Pad table - the 16 pads, their notes and colors
use std::fmt;

use thiserror::Error;

pub const PAD_COUNT: usize = 16;

/// Two octaves of an expanded pentatonic scale, C4 up to G6
pub const PAD_FREQUENCIES: [f32; PAD_COUNT] = [
    261.63, 293.66, 329.63, 392.00, // C D E G
    440.00, 523.25, 587.33, 659.25, // A C D E
    698.46, 783.99, 880.00, 987.77, // F G A B
    1046.5, 1174.7, 1318.5, 1567.9, // C D E G
];

pub const PAD_COLORS: [Rgb; PAD_COUNT] = [
    Rgb(0xFF, 0x6B, 0x6B),
    Rgb(0x4E, 0xCD, 0xC4),
    Rgb(0x45, 0xB7, 0xD1),
    Rgb(0x96, 0xCE, 0xB4),
    Rgb(0xFF, 0xEA, 0xA7),
    Rgb(0xDD, 0xA0, 0xDD),
    Rgb(0x98, 0xD8, 0xE8),
    Rgb(0xF7, 0xDC, 0x6F),
    Rgb(0xBB, 0x8F, 0xCE),
    Rgb(0x85, 0xC1, 0xE9),
    Rgb(0xF8, 0xC4, 0x71),
    Rgb(0x82, 0xE0, 0xAA),
    Rgb(0xF1, 0x94, 0x8A),
    Rgb(0x85, 0xD3, 0xC4),
    Rgb(0xA5, 0x69, 0xBD),
    Rgb(0x5D, 0xAD, 0xE2),
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PadError {
    #[error("pad index {0} is out of range (0..16)")]
    OutOfRange(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Scale every channel by `factor`, flooring like the pad gradients do
    pub fn darken(self, factor: f32) -> Self {
        let scale = |c: u8| (c as f32 * factor).floor().clamp(0.0, 255.0) as u8;
        Rgb(scale(self.0), scale(self.1), scale(self.2))
    }
}

/// Index of a pad, always in `0..PAD_COUNT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PadIndex(u8);

impl PadIndex {
    pub fn new(index: usize) -> Option<Self> {
        (index < PAD_COUNT).then_some(Self(index as u8))
    }

    pub fn all() -> impl Iterator<Item = PadIndex> {
        (0..PAD_COUNT as u8).map(PadIndex)
    }

    pub fn get(self) -> usize {
        self.0 as usize
    }

    pub fn frequency(self) -> f32 {
        PAD_FREQUENCIES[self.get()]
    }

    pub fn color(self) -> Rgb {
        PAD_COLORS[self.get()]
    }
}

impl TryFrom<usize> for PadIndex {
    type Error = PadError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::new(index).ok_or(PadError::OutOfRange(index))
    }
}

impl fmt::Display for PadIndex {
    /// Pads are labelled from 1 on screen
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0 + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_index_bounds() {
        assert!(PadIndex::new(0).is_some());
        assert!(PadIndex::new(15).is_some());
        assert!(PadIndex::new(16).is_none());
        assert_eq!(PadIndex::try_from(42), Err(PadError::OutOfRange(42)));
    }

    #[test]
    fn test_all_pads() {
        let pads: Vec<_> = PadIndex::all().collect();
        assert_eq!(pads.len(), PAD_COUNT);
        assert_eq!(pads[3].get(), 3);
    }

    #[test]
    fn test_frequency_lookup() {
        let pad = PadIndex::new(4).unwrap();
        assert_eq!(pad.frequency(), 440.0);
        assert_eq!(pad.to_string(), "5");
    }

    #[test]
    fn test_frequencies_ascend() {
        assert!(PAD_FREQUENCIES.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_darken() {
        let darker = Rgb(0xFF, 0x6B, 0x6B).darken(0.7);
        assert_eq!(darker, Rgb(178, 74, 74));
    }
}
