use crate::axis::FrequencyAxis;
use crate::song::{Note, Song};
use crate::surface::{Rgb, Surface};
use crate::transport::RenderWindow;
use log::trace;

/// Background, note block, and live pitch indicator colors.
pub const BACKGROUND: Rgb = Rgb::new(12, 12, 16);
pub const NOTE_COLOR: Rgb = Rgb::new(58, 110, 235);
pub const PITCH_COLOR: Rgb = Rgb::new(224, 49, 49);

/// Stroke width of the live pitch indicator line, pixels.
const PITCH_STROKE: f32 = 2.0;

/// The karaoke render engine.
///
/// A pure, synchronous function of (surface, window, live pitch): the external
/// driver calls [`draw`](KaraokeRenderer::draw) once per animation tick and the
/// engine performs a complete redraw. No state survives between calls, so a
/// frame can never see stale pixels from the previous one, and an early return
/// leaves nothing partial behind.
pub struct KaraokeRenderer {
    notes: Vec<Note>,
}

impl KaraokeRenderer {
    pub fn new(song: &Song) -> Self {
        Self {
            notes: song.notes.clone(),
        }
    }

    /// Redraw one frame.
    ///
    /// * Clears the surface.
    /// * Selects notes overlapping `[window.start, window.end]` (inclusive
    ///   both ends). No overlap → the cleared frame is the whole output.
    /// * Fits the frequency axis to the overlapping notes only, so the
    ///   vertical scale auto-zooms as the window scrolls.
    /// * Draws the live pitch as a full-width horizontal line, then each
    ///   note as a filled block centered on its pitch row.
    pub fn draw<S: Surface>(
        &self,
        surface: &mut S,
        live_pitch_hz: Option<f64>,
        window: &RenderWindow,
    ) {
        surface.clear(BACKGROUND);

        let width = surface.width() as f32;
        let height = surface.height() as f32;

        let visible: Vec<Note> = self
            .notes
            .iter()
            .filter(|n| n.overlaps(window.start, window.end))
            .copied()
            .collect();

        trace!(
            "frame [{:.2}, {:.2}): {} visible notes, live pitch {:?}",
            window.start,
            window.end,
            visible.len(),
            live_pitch_hz
        );

        let Some(axis) = FrequencyAxis::fit(&visible, height) else {
            // Blank frame — valid output, not an error.
            return;
        };

        // Pitch line first so note blocks paint over it where they coincide.
        if let Some(hz) = live_pitch_hz {
            let y = axis.y_for(hz);
            surface.stroke_line(0.0, y, width, y, PITCH_STROKE, PITCH_COLOR);
        }

        let span = window.end - window.start;
        let row_h = axis.row_height();
        for note in &visible {
            let x0 = (((note.start_time - window.start) / span) as f32) * width;
            let x1 = (((note.end_time - window.start) / span) as f32) * width;
            let y = axis.y_for(note.pitch.frequency());
            surface.fill_rect(x0, y - row_h / 2.0, x1 - x0, row_h, NOTE_COLOR);
        }
    }
}
