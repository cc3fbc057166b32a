use crate::pitch::Pitch;
use serde::{Deserialize, Serialize};

/// One annotated melody note: a time span and the pitch sung over it.
///
/// Owned by the song's note sequence; the renderer only ever reads these.
/// `start_time <= end_time`, seconds from song start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub start_time: f64,
    pub end_time: f64,
    pub pitch: Pitch,
}

impl Note {
    pub fn new(start_time: f64, end_time: f64, pitch: Pitch) -> Self {
        Self {
            start_time,
            end_time,
            pitch,
        }
    }

    /// Inclusive overlap test against a time window. A note exactly touching
    /// a window boundary counts as visible.
    pub fn overlaps(&self, window_start: f64, window_end: f64) -> bool {
        self.end_time >= window_start && self.start_time <= window_end
    }
}

/// A song: metadata plus the annotated melody. The note sequence is ordered
/// as authored; the renderer depends on that order being stable (min/max
/// scans tie-break on first-encountered).
#[derive(Debug, Clone)]
pub struct Song {
    pub title: String,
    pub artist: String,
    /// Total length in seconds.
    pub duration: f64,
    pub notes: Vec<Note>,
}

// ─── Stored representation ──────────────────────────────────────────────────

/// Short-form note for song.json: pitch stored as its semitone number and
/// reconstructed through `Pitch::from_semitone` on load. Snapping to the
/// nearest semitone is deliberate — annotations are note-grid data, not
/// raw detector output.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NoteRecord {
    pub start_time: f64,
    pub end_time: f64,
    pub semitone: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongRecord {
    pub title: String,
    pub artist: String,
    pub duration: f64,
    pub notes: Vec<NoteRecord>,
}

impl From<&Note> for NoteRecord {
    fn from(n: &Note) -> Self {
        Self {
            start_time: n.start_time,
            end_time: n.end_time,
            semitone: n.pitch.semitone(),
        }
    }
}

impl From<NoteRecord> for Note {
    fn from(r: NoteRecord) -> Self {
        Self {
            start_time: r.start_time,
            end_time: r.end_time,
            pitch: Pitch::from_semitone(r.semitone),
        }
    }
}

impl From<&Song> for SongRecord {
    fn from(s: &Song) -> Self {
        Self {
            title: s.title.clone(),
            artist: s.artist.clone(),
            duration: s.duration,
            notes: s.notes.iter().map(NoteRecord::from).collect(),
        }
    }
}

impl From<SongRecord> for Song {
    fn from(r: SongRecord) -> Self {
        Self {
            title: r.title,
            artist: r.artist,
            duration: r.duration,
            notes: r.notes.into_iter().map(Note::from).collect(),
        }
    }
}
