use crate::live_pitch::PitchPublisher;
use crate::song::{Note, Song};
use log::info;
use std::f64::consts::PI;
use std::thread;
use std::time::{Duration, Instant};

/// Cents of vibrato depth around the annotated pitch.
const VIBRATO_CENTS: f64 = 18.0;
const VIBRATO_RATE_HZ: f64 = 5.5;
/// Onset scoop: each note starts this flat and glides up to pitch.
const SCOOP_CENTS: f64 = 60.0;
const SCOOP_SECS: f64 = 0.09;

/// Generates a synthetic "performer": a live pitch stream that follows the
/// song's annotated notes with vibrato and an onset scoop, and goes unvoiced
/// in the gaps. Exercises the full render pipeline without microphone
/// hardware or a real estimator.
pub struct PitchSimulator {
    notes: Vec<Note>,
    duration: f64,
    publisher: PitchPublisher,
    /// Publish cadence, matching a typical audio analysis buffer rate.
    update_hz: u32,
    /// Playback offset applied before the wall clock starts, seconds.
    seek: f64,
}

impl PitchSimulator {
    pub fn new(song: &Song, publisher: PitchPublisher, update_hz: u32) -> Self {
        Self {
            notes: song.notes.clone(),
            duration: song.duration,
            publisher,
            update_hz: update_hz.max(1),
            seek: 0.0,
        }
    }

    pub fn with_seek(mut self, secs: f64) -> Self {
        self.seek = secs;
        self
    }

    /// Run until the song ends or the consumer goes away. Blocks the
    /// calling thread; spawn it named, as the pipeline driver does.
    pub fn run(&self) {
        info!(
            "Pitch simulator: {} notes over {:.1}s at {} updates/s",
            self.notes.len(),
            self.duration,
            self.update_hz
        );

        let tick = Duration::from_secs_f64(1.0 / self.update_hz as f64);
        let start = Instant::now();

        loop {
            let t = self.seek + start.elapsed().as_secs_f64();
            if t > self.duration {
                break;
            }
            if !self.publisher.publish(self.pitch_at(t)) {
                info!("Pitch simulator: consumer gone, stopping");
                return;
            }
            thread::sleep(tick);
        }

        // Final explicit unvoiced so the display drops the line at song end.
        let _ = self.publisher.publish(None);
        info!("Pitch simulator: song complete");
    }

    /// Simulated sung frequency at song time `t`, or None between notes.
    pub fn pitch_at(&self, t: f64) -> Option<f64> {
        let note = self
            .notes
            .iter()
            .find(|n| t >= n.start_time && t < n.end_time)?;

        let base = note.pitch.frequency();
        let vibrato = VIBRATO_CENTS * (2.0 * PI * VIBRATO_RATE_HZ * t).sin();

        // Scoop into the note: flat at onset, on pitch after SCOOP_SECS.
        let since_onset = t - note.start_time;
        let scoop = if since_onset < SCOOP_SECS {
            -SCOOP_CENTS * (1.0 - since_onset / SCOOP_SECS)
        } else {
            0.0
        };

        Some(base * 2f64.powf((vibrato + scoop) / 1200.0))
    }
}

/// Built-in demo song: "Twinkle Twinkle Little Star", first verse, at
/// 120 BPM with a short gap between notes so the simulator goes unvoiced
/// realistically.
pub fn demo_song() -> Song {
    use crate::pitch::Pitch;

    const BEAT: f64 = 0.5;
    const GAP: f64 = 0.06;
    // (semitone, beats)
    let melody: [(i32, f64); 14] = [
        (60, 1.0), (60, 1.0), (67, 1.0), (67, 1.0),
        (69, 1.0), (69, 1.0), (67, 2.0),
        (65, 1.0), (65, 1.0), (64, 1.0), (64, 1.0),
        (62, 1.0), (62, 1.0), (60, 2.0),
    ];

    let mut notes = Vec::with_capacity(melody.len());
    let mut t = 0.0;
    for (semitone, beats) in melody {
        let len = beats * BEAT;
        notes.push(Note::new(t, t + len - GAP, Pitch::from_semitone(semitone)));
        t += len;
    }

    Song {
        title: "Twinkle Twinkle".into(),
        artist: "Traditional".into(),
        duration: t + 1.0,
        notes,
    }
}

/// Render a song's annotated melody as a plain sine track, for seeding the
/// library with demo audio. One voice, short linear fades at note edges to
/// avoid clicks.
pub fn render_sine_track(song: &Song, sample_rate: u32) -> Vec<f32> {
    const AMP: f64 = 0.4;
    const FADE_SECS: f64 = 0.01;

    let total = (song.duration * sample_rate as f64).ceil() as usize;
    let mut samples = vec![0.0f32; total];

    for note in &song.notes {
        let start = (note.start_time * sample_rate as f64) as usize;
        let end = ((note.end_time * sample_rate as f64) as usize).min(total);
        let freq = note.pitch.frequency();
        let fade = (FADE_SECS * sample_rate as f64) as usize;
        let len = end.saturating_sub(start);

        for i in 0..len {
            let t = (start + i) as f64 / sample_rate as f64;
            let env = if i < fade {
                i as f64 / fade as f64
            } else if len - i < fade {
                (len - i) as f64 / fade as f64
            } else {
                1.0
            };
            samples[start + i] +=
                (AMP * env * (2.0 * PI * freq * t).sin()) as f32;
        }
    }

    samples
}
