use crate::pitch::Pitch;
use crate::song::Note;

/// Logarithmic frequency axis fitted to the notes visible in the current
/// window.
///
/// # How it works
///
/// The bounds snap outward to whole-octave boundaries: the lowest visible
/// note's octave start and the last semitone of the highest visible note's
/// octave. Every visible note therefore gets its full octave of headroom,
/// and each semitone in the range receives an equal vertical slot. Because
/// the window contents change as playback scrolls, the axis is refitted
/// every frame — the intended "auto-zoom to visible range" behavior.
///
/// Pixel mapping is logarithmic in frequency (octave spacing is perceptually
/// uniform); top of canvas = highest frequency, per staff convention.
#[derive(Debug, Clone, Copy)]
pub struct FrequencyAxis {
    lower_hz: f64,
    upper_hz: f64,
    lower_log: f64,
    /// log2(upper) − log2(lower). Octave snapping makes this at least 11/12;
    /// guarded anyway so the pixel mapping can never divide by zero.
    log_span: f64,
    height: f32,
    row_height: f32,
}

impl FrequencyAxis {
    /// Fit an axis to a set of visible notes. Returns `None` for an empty
    /// set — the caller skips note and pitch-line drawing for the frame.
    ///
    /// Min/max scans replace only on a strictly lower/higher semitone, so
    /// ties go to the first-encountered note. Deterministic for a fixed
    /// note ordering.
    pub fn fit(notes: &[Note], height: f32) -> Option<Self> {
        let first = notes.first()?;
        let min_note = notes.iter().fold(first, |acc, n| {
            if n.pitch.semitone() < acc.pitch.semitone() { n } else { acc }
        });
        let max_note = notes.iter().fold(first, |acc, n| {
            if n.pitch.semitone() > acc.pitch.semitone() { n } else { acc }
        });

        // Octave index = semitone / 12 (euclidean), NOT Pitch::octave():
        // the naming convention's −1 would shift the displayed range a full
        // octave below the visible notes.
        let lo_octave = min_note.pitch.semitone().div_euclid(12);
        let hi_octave = max_note.pitch.semitone().div_euclid(12);

        let lower_hz = Pitch::from_semitone(lo_octave * 12).frequency();
        let upper_hz = Pitch::from_semitone((hi_octave + 1) * 12 - 1).frequency();

        let lower_log = lower_hz.log2();
        let mut log_span = upper_hz.log2() - lower_log;
        if !(log_span > 0.0) {
            // Unreachable given the octave snap, but a zero or non-finite
            // span would poison every y coordinate this frame.
            log_span = 1.0;
        }

        let semitone_rows = ((hi_octave - lo_octave + 1) * 12) as f32;

        Some(Self {
            lower_hz,
            upper_hz,
            lower_log,
            log_span,
            height,
            row_height: height / semitone_rows,
        })
    }

    /// Vertical pixel coordinate for a frequency. Monotonically decreasing:
    /// `y_for(lower) == height` (bottom), `y_for(upper) == 0` (top).
    /// Frequencies outside the fitted range map outside [0, height]; the
    /// surface clips them.
    pub fn y_for(&self, hz: f64) -> f32 {
        let t = (hz.log2() - self.lower_log) / self.log_span;
        self.height - (t as f32) * self.height
    }

    /// Vertical slot height of one semitone.
    pub fn row_height(&self) -> f32 {
        self.row_height
    }

    pub fn lower_hz(&self) -> f64 {
        self.lower_hz
    }

    pub fn upper_hz(&self) -> f64 {
        self.upper_hz
    }
}
