use crate::pitch::Pitch;
use crate::surface::{PixelSurface, Surface};
use std::io::{self, Write};

/// Blits a [`PixelSurface`] to the terminal as ANSI truecolor half-block
/// cells: one character row carries two pixel rows (▀ foreground = top
/// pixel, background = bottom pixel).
///
/// Frames are best-effort. A blit that fails (terminal gone, pipe closed)
/// returns the error to the caller, which logs it and moves on — one
/// dropped frame must never halt playback.
pub struct TermDisplay {
    title: String,
}

impl TermDisplay {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    /// Draw one frame: status header plus the pixel grid.
    pub fn blit(
        &self,
        surface: &PixelSurface,
        position_secs: f64,
        live_pitch_hz: Option<f64>,
    ) -> io::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();

        // Home the cursor; repaint in place (no per-frame clear, the grid
        // overwrites every cell).
        write!(out, "\x1b[H")?;

        let pitch_label = match live_pitch_hz {
            Some(hz) => format!("{} {:6.1} Hz", Pitch::from_hz(hz).name(), hz),
            None => "---".to_string(),
        };
        writeln!(
            out,
            "\x1b[0m  {}   t={:6.2}s   pitch: {:<14}\x1b[K",
            self.title, position_secs, pitch_label
        )?;

        let width = surface.width();
        let height = surface.height();
        for row in (0..height).step_by(2) {
            for x in 0..width {
                let top = surface.pixel(x, row);
                let bottom = if row + 1 < height {
                    surface.pixel(x, row + 1)
                } else {
                    top
                };
                write!(
                    out,
                    "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m▀",
                    top.r, top.g, top.b, bottom.r, bottom.g, bottom.b
                )?;
            }
            writeln!(out, "\x1b[0m")?;
        }

        out.flush()
    }

    /// Clear the screen once at startup so the first frame paints onto a
    /// clean terminal.
    pub fn reset(&self) -> io::Result<()> {
        let mut out = io::stdout().lock();
        write!(out, "\x1b[2J\x1b[H")?;
        out.flush()
    }
}
