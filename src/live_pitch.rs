//! Live pitch delivery: a single-slot "latest value" link between the
//! analysis side (its own thread, its own cadence) and the render loop.
//!
//! Overwrite semantics, no queueing: the render loop drains whatever has
//! arrived since the last frame and keeps only the most recent update. The
//! renderer must not assume freshness beyond "most recent message received
//! before this frame".

use crossbeam_channel::{unbounded, Receiver, Sender};

/// Detector readings outside this band are noise (sub-audible rumble,
/// octave-error spikes) and published as Unvoiced.
pub const MIN_PITCH_HZ: f64 = 50.0;
pub const MAX_PITCH_HZ: f64 = 8000.0;

/// One message from the analysis pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PitchUpdate {
    /// A plausible fundamental, Hz.
    Detected(f64),
    /// Analysis ran but found no usable pitch.
    Unvoiced,
}

/// The estimator seam. YIN (or any other fundamental-frequency estimator)
/// lives behind this trait as an external collaborator — the crate consumes
/// its scalar output and never reimplements the estimation itself.
pub trait PitchDetector: Send {
    /// Estimate the fundamental of an analysis buffer. `None` when no pitch
    /// can be identified.
    fn estimate(&mut self, samples: &[f32], sample_rate: u32) -> Option<f64>;
}

/// Create a connected producer/consumer pair for live pitch updates.
pub fn pitch_link() -> (PitchPublisher, PitchTap) {
    let (tx, rx) = unbounded();
    (PitchPublisher { tx }, PitchTap { rx, last: None })
}

/// Producer half: owned by the analysis thread.
#[derive(Clone)]
pub struct PitchPublisher {
    tx: Sender<PitchUpdate>,
}

impl PitchPublisher {
    /// Gate and publish one raw detector reading. Non-finite or out-of-band
    /// values become Unvoiced rather than being dropped, so the display
    /// clears its line when the singer stops instead of freezing.
    ///
    /// Returns false once the consumer side has gone away.
    pub fn publish(&self, raw: Option<f64>) -> bool {
        let update = match raw {
            Some(hz) if hz.is_finite() && (MIN_PITCH_HZ..MAX_PITCH_HZ).contains(&hz) => {
                PitchUpdate::Detected(hz)
            }
            _ => PitchUpdate::Unvoiced,
        };
        self.tx.send(update).is_ok()
    }
}

/// Consumer half: owned by the render loop.
pub struct PitchTap {
    rx: Receiver<PitchUpdate>,
    last: Option<f64>,
}

impl PitchTap {
    /// Drain pending updates and return the latest pitch, or `None` while
    /// unvoiced. Synchronous and non-blocking; called once per frame.
    pub fn latest(&mut self) -> Option<f64> {
        while let Ok(update) = self.rx.try_recv() {
            self.last = match update {
                PitchUpdate::Detected(hz) => Some(hz),
                PitchUpdate::Unvoiced => None,
            };
        }
        self.last
    }
}
