use crate::live_pitch::{PitchDetector, PitchPublisher};
use log::info;
use std::thread;
use std::time::{Duration, Instant};

/// Samples handed to the detector per step. ~21ms at 48kHz.
const CHUNK_SIZE: usize = 1024;
/// Sliding analysis window length. The detector always sees the most recent
/// WINDOW_SIZE samples, so estimates stay stable across chunk boundaries.
const WINDOW_SIZE: usize = 4096;

/// Streams a song's recorded audio through an injected pitch estimator at
/// real-time pace, publishing the estimates to the live pitch link.
///
/// This is the recorded-audio counterpart of a microphone capture path:
/// the render loop cannot tell the difference, it just reads the latest
/// value. Estimation itself stays behind the [`PitchDetector`] seam.
pub struct WavFeed {
    samples: Vec<f32>,
    sample_rate: u32,
    detector: Box<dyn PitchDetector>,
    publisher: PitchPublisher,
    /// Seconds of audio to skip before streaming.
    seek: f64,
}

impl WavFeed {
    pub fn new(
        samples: Vec<f32>,
        sample_rate: u32,
        detector: Box<dyn PitchDetector>,
        publisher: PitchPublisher,
    ) -> Self {
        Self {
            samples,
            sample_rate,
            detector,
            publisher,
            seek: 0.0,
        }
    }

    pub fn with_seek(mut self, secs: f64) -> Self {
        self.seek = secs;
        self
    }

    /// Stream to the end of the audio. Blocks the calling thread.
    pub fn run(&mut self) {
        let skip = ((self.seek * self.sample_rate as f64) as usize).min(self.samples.len());
        let audio = &self.samples[skip..];

        info!(
            "WAV feed: {:.2}s of audio at {} Hz, chunk {} samples",
            audio.len() as f64 / self.sample_rate as f64,
            self.sample_rate,
            CHUNK_SIZE
        );

        let chunk_dur = Duration::from_secs_f64(CHUNK_SIZE as f64 / self.sample_rate as f64);
        let start = Instant::now();
        let mut window: Vec<f32> = Vec::with_capacity(WINDOW_SIZE);

        for (i, chunk) in audio.chunks(CHUNK_SIZE).enumerate() {
            // Pace to real time: wait until this chunk's expected send time.
            let target = chunk_dur * i as u32;
            let elapsed = start.elapsed();
            if elapsed < target {
                thread::sleep(target - elapsed);
            }

            // Slide the analysis window forward.
            window.extend_from_slice(chunk);
            if window.len() > WINDOW_SIZE {
                let excess = window.len() - WINDOW_SIZE;
                window.drain(..excess);
            }

            let estimate = self.detector.estimate(&window, self.sample_rate);
            if !self.publisher.publish(estimate) {
                // Render loop shut down — stop streaming.
                break;
            }
        }

        let _ = self.publisher.publish(None);
        info!("WAV feed complete.");
    }
}
