use std::fmt;

/// Note names for the 12-tone equal-tempered scale, C first.
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Semitone anchor: MIDI 69 = A4 = 440 Hz.
pub const REFERENCE_SEMITONE: i32 = 69;
pub const REFERENCE_HZ: f64 = 440.0;

/// A musical pitch, stored as a fundamental frequency in Hz.
///
/// Semitone/octave/name are derived on demand, never stored. The frequency
/// must be positive — a non-positive value makes the log2-based conversions
/// produce non-finite results, which propagate to the caller unclamped so
/// misuse stays visible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pitch {
    frequency: f64,
}

impl Pitch {
    pub fn from_hz(frequency: f64) -> Self {
        Self { frequency }
    }

    /// Equal-tempered frequency for a semitone number: 440 · 2^((s−69)/12).
    ///
    /// Exact inverse of the continuous frequency→semitone mapping. After
    /// rounding to a semitone it only approximately recovers an arbitrary
    /// input frequency — the snap to the nearest semitone is intentional.
    pub fn from_semitone(semitone: i32) -> Self {
        let frequency =
            REFERENCE_HZ * 2f64.powf((semitone - REFERENCE_SEMITONE) as f64 / 12.0);
        Self { frequency }
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Nearest semitone (MIDI note number convention, A4 = 69).
    pub fn semitone(&self) -> i32 {
        (12.0 * (self.frequency / REFERENCE_HZ).log2()).round() as i32 + REFERENCE_SEMITONE
    }

    /// Scientific-pitch octave: C4 = middle C = semitone 60.
    pub fn octave(&self) -> i32 {
        self.semitone().div_euclid(12) - 1
    }

    /// Human-readable name, e.g. "C4", "A#2".
    pub fn name(&self) -> String {
        let s = self.semitone();
        format!("{}{}", NOTE_NAMES[s.rem_euclid(12) as usize], s.div_euclid(12) - 1)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.1} Hz)", self.name(), self.frequency)
    }
}
