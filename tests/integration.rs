//! End-to-end integration tests for the notefall pipeline.
//!
//! These tests exercise the full data flow:
//!   pitch producer (simulator / WAV feed) → latest-value link → render loop
//!   → pixel surface assertions
//! plus the song library round trip (JSON notes + WAV audio).

use std::thread;
use std::time::{Duration, Instant};

use notefall::live_pitch::{pitch_link, PitchDetector};
use notefall::pitch::Pitch;
use notefall::renderer::{KaraokeRenderer, BACKGROUND, NOTE_COLOR, PITCH_COLOR};
use notefall::simulator::{demo_song, render_sine_track, PitchSimulator};
use notefall::song::{Note, Song};
use notefall::store::SongStore;
use notefall::surface::{PixelSurface, Surface};
use notefall::transport::{RenderWindow, Transport};
use notefall::wav_feed::WavFeed;

// ─── Helpers ───────────────────────────────────────────────────────────────

fn song(notes: Vec<Note>, duration: f64) -> Song {
    Song {
        title: "Test Song".into(),
        artist: "Integration".into(),
        duration,
        notes,
    }
}

fn note(start: f64, end: f64, semitone: i32) -> Note {
    Note::new(start, end, Pitch::from_semitone(semitone))
}

/// Rows of a given color in one pixel column.
fn color_rows(s: &PixelSurface, x: u32, color: notefall::surface::Rgb) -> Vec<u32> {
    (0..s.height()).filter(|&y| s.pixel(x, y) == color).collect()
}

// ─── Renderer end-to-end ───────────────────────────────────────────────────

#[test]
fn test_two_note_frame_layout() {
    // Window [0,10), C4 then C5 on a 100×100 canvas: two rectangles in
    // disjoint column ranges, the C5 one strictly higher on screen.
    let s = song(vec![note(0.0, 5.0, 60), note(5.0, 10.0, 72)], 10.0);
    let renderer = KaraokeRenderer::new(&s);
    let mut surf = PixelSurface::new(100, 100);

    renderer.draw(&mut surf, None, &RenderWindow::new(0.0, 10.0));

    let left = color_rows(&surf, 25, NOTE_COLOR);
    let right = color_rows(&surf, 75, NOTE_COLOR);
    assert!(!left.is_empty(), "C4 block in the left half");
    assert!(!right.is_empty(), "C5 block in the right half");
    assert!(
        right.last().unwrap() < left.first().unwrap(),
        "C5 rows {:?} must all be above C4 rows {:?}",
        right,
        left
    );

    // Disjoint in x: no column carries both blocks.
    for x in 0..100 {
        let rows = color_rows(&surf, x, NOTE_COLOR);
        if rows.is_empty() {
            continue;
        }
        let spread = rows.last().unwrap() - rows.first().unwrap();
        assert!(spread < 10, "column {} mixes both blocks", x);
    }
}

#[test]
fn test_window_outside_all_notes_is_blank() {
    let s = song(vec![note(0.0, 1.0, 60), note(1.0, 2.0, 64)], 30.0);
    let renderer = KaraokeRenderer::new(&s);
    let mut surf = PixelSurface::new(64, 64);

    renderer.draw(&mut surf, Some(440.0), &RenderWindow::new(10.0, 15.0));

    assert_eq!(surf.count(BACKGROUND), 64 * 64, "frame must be fully cleared");
}

#[test]
fn test_live_pitch_aligns_with_matching_note() {
    // The performer sings exactly the annotated pitch: indicator line and
    // note block land on the same row.
    let s = song(vec![note(0.0, 3.0, 69)], 8.0);
    let renderer = KaraokeRenderer::new(&s);
    let mut surf = PixelSurface::new(120, 120);

    renderer.draw(&mut surf, Some(440.0), &RenderWindow::new(0.0, 6.0));

    // Note block covers x 0..60; the bare line is visible beyond it.
    let line = color_rows(&surf, 100, PITCH_COLOR);
    assert!(!line.is_empty(), "pitch line expected");
    let line_y = (*line.first().unwrap() as f32 + *line.last().unwrap() as f32) / 2.0;

    let block = color_rows(&surf, 30, NOTE_COLOR);
    assert!(!block.is_empty(), "note block expected");
    let block_y = (*block.first().unwrap() as f32 + *block.last().unwrap() as f32) / 2.0;

    assert!(
        (line_y - block_y).abs() <= 1.5,
        "line at y={}, block center at y={}",
        line_y,
        block_y
    );
}

#[test]
fn test_axis_auto_zoom_as_window_scrolls() {
    // A low phrase then a high phrase: the same note pitch maps to
    // different rows once the window only sees the high phrase.
    let s = song(
        vec![note(0.0, 4.0, 48), note(4.0, 8.0, 72), note(8.0, 12.0, 74)],
        12.0,
    );
    let renderer = KaraokeRenderer::new(&s);
    let mut surf = PixelSurface::new(60, 120);

    // Window sees the C3 and C5 notes: wide range.
    renderer.draw(&mut surf, None, &RenderWindow::new(2.0, 6.0));
    let wide_rows = color_rows(&surf, 50, NOTE_COLOR);

    // Window sees only the two high notes: the C5 block drops toward the
    // bottom of a much narrower range.
    renderer.draw(&mut surf, None, &RenderWindow::new(5.0, 7.9));
    let narrow_rows = color_rows(&surf, 30, NOTE_COLOR);

    assert!(!wide_rows.is_empty() && !narrow_rows.is_empty());
    assert!(
        narrow_rows.first().unwrap() > wide_rows.first().unwrap(),
        "auto-zoom must move the C5 block down once the low note scrolls out"
    );
}

// ─── Simulator → link → renderer ───────────────────────────────────────────

#[test]
fn test_simulated_performer_drives_render_loop() {
    // The note covers only half the window, so the full-width pitch line
    // stays visible beside the block.
    let s = song(vec![note(0.0, 1.0, 69)], 2.0);
    let (publisher, mut tap) = pitch_link();

    let sim_song = s.clone();
    let handle = thread::Builder::new()
        .name("test-pitch-sim".into())
        .spawn(move || {
            PitchSimulator::new(&sim_song, publisher, 100).run();
        })
        .unwrap();

    let renderer = KaraokeRenderer::new(&s);
    let mut surf = PixelSurface::new(80, 80);
    let transport = Transport::new(2.0);

    // Run a short real render loop; the simulated pitch must show up as
    // line pixels within the note's sounding span.
    let mut saw_line = false;
    let deadline = Instant::now() + Duration::from_millis(800);
    while Instant::now() < deadline {
        let window = transport.window();
        let live = tap.latest();
        renderer.draw(&mut surf, live, &window);
        if surf.count(PITCH_COLOR) > 0 {
            saw_line = true;
            break;
        }
        thread::sleep(Duration::from_millis(10));
    }
    assert!(saw_line, "live pitch line never appeared");

    drop(tap);
    let _ = handle.join();
}

#[test]
fn test_simulator_stays_near_annotated_pitch() {
    let s = demo_song();
    let (publisher, _tap) = pitch_link();
    let sim = PitchSimulator::new(&s, publisher, 50);

    // Sample each note well past its onset; the simulated pitch must sit
    // within a quarter tone of the annotation.
    for n in &s.notes {
        let t = n.start_time + 0.2;
        if t >= n.end_time {
            continue;
        }
        let hz = sim.pitch_at(t).expect("voiced inside note");
        let cents = 1200.0 * (hz / n.pitch.frequency()).log2();
        assert!(cents.abs() < 50.0, "{} cents off at t={:.2}", cents, t);
    }
}

// ─── WAV feed with a stub estimator ────────────────────────────────────────

/// Fake estimator standing in for the external YIN collaborator: flags any
/// energetic window as one fixed pitch.
struct OneNoteDetector {
    hz: f64,
}

impl PitchDetector for OneNoteDetector {
    fn estimate(&mut self, samples: &[f32], _sample_rate: u32) -> Option<f64> {
        let rms: f32 =
            (samples.iter().map(|s| s * s).sum::<f32>() / samples.len().max(1) as f32).sqrt();
        (rms > 0.01).then_some(self.hz)
    }
}

#[test]
fn test_wav_feed_through_render_pipeline() {
    // Recorded audio path: the feed streams the song's own sine track
    // through the stub estimator; the render loop picks the pitch up from
    // the link exactly as it would from a microphone.
    let s = song(vec![note(0.0, 0.5, 69)], 0.5);
    let audio = render_sine_track(&s, 48000);
    let (publisher, mut tap) = pitch_link();

    let mut feed = WavFeed::new(audio, 48000, Box::new(OneNoteDetector { hz: 440.0 }), publisher);
    let handle = thread::Builder::new()
        .name("test-wav-feed".into())
        .spawn(move || feed.run())
        .unwrap();

    let renderer = KaraokeRenderer::new(&s);
    let mut surf = PixelSurface::new(60, 60);

    let mut saw_line = false;
    let deadline = Instant::now() + Duration::from_millis(700);
    while Instant::now() < deadline {
        let live = tap.latest();
        // Window wider than the note, so the line shows beside the block.
        renderer.draw(&mut surf, live, &RenderWindow::new(0.0, 1.0));
        if surf.count(PITCH_COLOR) > 0 {
            saw_line = true;
            break;
        }
        thread::sleep(Duration::from_millis(5));
    }
    assert!(saw_line, "WAV feed never produced a visible pitch line");

    handle.join().unwrap();
    assert_eq!(tap.latest(), None, "feed ends unvoiced");
}

// ─── Library round trip ────────────────────────────────────────────────────

#[test]
fn test_store_round_trip_preserves_render_output() {
    let dir = tempfile::tempdir().unwrap();
    let store = SongStore::open(dir.path()).unwrap();

    let original = demo_song();
    let audio = render_sine_track(&original, 48000);
    store.save(&original, &audio, 48000).unwrap();

    let loaded = store.load(&SongStore::slug(&original.title)).unwrap();
    assert_eq!(loaded.song.notes.len(), original.notes.len());
    assert_eq!(loaded.sample_rate, 48000);
    assert_eq!(loaded.samples.len(), audio.len());

    // Identical note data must render an identical frame.
    let window = RenderWindow::new(0.0, 4.0);
    let mut a = PixelSurface::new(90, 60);
    let mut b = PixelSurface::new(90, 60);
    KaraokeRenderer::new(&original).draw(&mut a, Some(300.0), &window);
    KaraokeRenderer::new(&loaded.song).draw(&mut b, Some(300.0), &window);

    for y in 0..60 {
        for x in 0..90 {
            assert_eq!(a.pixel(x, y), b.pixel(x, y), "pixel ({}, {})", x, y);
        }
    }
}
