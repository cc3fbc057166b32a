use std::time::Instant;

/// The time range currently displayed, `[start, end)`, seconds from song
/// start. Ephemeral: recomputed by the driver every frame, never stored by
/// the render engine. `end > start`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderWindow {
    pub start: f64,
    pub end: f64,
}

impl RenderWindow {
    pub fn new(start: f64, end: f64) -> Self {
        debug_assert!(end > start, "window must have positive span");
        Self { start, end }
    }

    pub fn span(&self) -> f64 {
        self.end - self.start
    }
}

/// Monotonic playback clock: maps wall time to the visible window.
///
/// The render engine has no notion of time of its own — this is the driver
/// that hands it a fresh window once per animation tick. Playback position
/// advances from a monotonic `Instant`, so a stalled or slow frame never
/// rewinds the window.
pub struct Transport {
    started: Instant,
    /// Playback position at `started`, seconds. Non-zero after a seek.
    origin: f64,
    /// Visible window span, seconds.
    span: f64,
}

impl Transport {
    pub fn new(span_secs: f64) -> Self {
        Self {
            started: Instant::now(),
            origin: 0.0,
            span: span_secs,
        }
    }

    /// Start playback from an offset into the song.
    pub fn with_seek(mut self, secs: f64) -> Self {
        self.origin = secs;
        self.started = Instant::now();
        self
    }

    /// Current playback position, seconds from song start.
    pub fn position(&self) -> f64 {
        self.origin + self.started.elapsed().as_secs_f64()
    }

    /// Window for this frame: `[position, position + span)`.
    pub fn window(&self) -> RenderWindow {
        let start = self.position();
        RenderWindow::new(start, start + self.span)
    }

    /// True once the window has scrolled fully past the end of the song.
    pub fn finished(&self, song_duration: f64) -> bool {
        self.position() >= song_duration
    }
}
