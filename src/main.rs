use notefall::renderer::KaraokeRenderer;
use notefall::simulator::{demo_song, render_sine_track, PitchSimulator};
use notefall::store::SongStore;
use notefall::surface::PixelSurface;
use notefall::term_display::TermDisplay;
use notefall::transport::Transport;
use notefall::live_pitch::pitch_link;

use clap::Parser;
use log::{error, info, warn};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "notefall")]
#[command(about = "Karaoke-style scrolling pitch display with a simulated live performer")]
struct Cli {
    /// Song library directory
    #[arg(long, default_value = "./library")]
    library: PathBuf,

    /// List stored songs and exit
    #[arg(long)]
    list: bool,

    /// Song to play (a slug from --list)
    #[arg(long)]
    song: Option<String>,

    /// Seed the library with the built-in demo song, then play it
    #[arg(long)]
    demo: bool,

    /// Display refresh rate (frames per second)
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Canvas width in pixels
    #[arg(long, default_value_t = 120)]
    width: u32,

    /// Canvas height in pixels (two pixel rows per terminal row)
    #[arg(long, default_value_t = 72)]
    height: u32,

    /// Seconds of song visible in the scrolling window
    #[arg(long, default_value_t = 5.0)]
    window_secs: f64,

    /// Start playback at this offset (seconds)
    #[arg(long, default_value_t = 0.0)]
    seek: f64,

    /// Live pitch update cadence (updates per second)
    #[arg(long, default_value_t = 45)]
    pitch_rate: u32,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    let store = match SongStore::open(&cli.library) {
        Ok(s) => s,
        Err(e) => {
            error!("Cannot open library {:?}: {}", cli.library, e);
            std::process::exit(1);
        }
    };

    if cli.list {
        match store.list() {
            Ok(slugs) if slugs.is_empty() => {
                println!("Library {:?} is empty. Try --demo.", store.root())
            }
            Ok(slugs) => {
                for slug in slugs {
                    println!("{}", slug);
                }
            }
            Err(e) => {
                error!("Cannot list library: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    // Pick the song: --demo seeds and plays the built-in one, --song loads
    // from the library.
    let song = if cli.demo {
        let song = demo_song();
        let audio = render_sine_track(&song, 48000);
        if let Err(e) = store.save(&song, &audio, 48000) {
            warn!("Could not seed demo song: {}", e);
        }
        song
    } else if let Some(slug) = &cli.song {
        match store.load(slug) {
            Ok(stored) => stored.song,
            Err(e) => {
                error!("Cannot load song '{}': {}", slug, e);
                std::process::exit(1);
            }
        }
    } else {
        error!("Nothing to play. Use --demo, or --song <slug> (see --list).");
        std::process::exit(1);
    };

    info!("═══════════════════════════════════════════════");
    info!("  NOTEFALL v{}", env!("CARGO_PKG_VERSION"));
    info!("  Song: {} — {} ({:.1}s, {} notes)",
          song.title, song.artist, song.duration, song.notes.len());
    info!("  Canvas: {}×{}  window: {:.1}s  fps: {}",
          cli.width, cli.height, cli.window_secs, cli.fps);
    info!("═══════════════════════════════════════════════");

    // ─── Live pitch producer ────────────────────────────────────────
    let (publisher, mut tap) = pitch_link();
    let sim_song = song.clone();
    let pitch_rate = cli.pitch_rate;
    let seek = cli.seek;
    let sim_handle = thread::Builder::new()
        .name("pitch-sim".into())
        .spawn(move || {
            PitchSimulator::new(&sim_song, publisher, pitch_rate)
                .with_seek(seek)
                .run();
        })
        .expect("spawn pitch simulator");

    // ─── Render loop (main thread owns the surface) ─────────────────
    let renderer = KaraokeRenderer::new(&song);
    let mut surface = PixelSurface::new(cli.width, cli.height);
    let display = TermDisplay::new(format!("{} — {}", song.title, song.artist));
    if let Err(e) = display.reset() {
        warn!("Terminal reset failed: {}", e);
    }

    let transport = Transport::new(cli.window_secs).with_seek(cli.seek);
    let frame_budget = Duration::from_secs_f64(1.0 / cli.fps.max(1) as f64);
    let mut frames: u64 = 0;
    let mut dropped: u64 = 0;

    while !transport.finished(song.duration) {
        let frame_start = Instant::now();

        let window = transport.window();
        let live_pitch = tap.latest();
        renderer.draw(&mut surface, live_pitch, &window);

        // Best-effort blit: a dropped frame is logged, never fatal.
        if let Err(e) = display.blit(&surface, window.start, live_pitch) {
            dropped += 1;
            warn!("Dropped frame at t={:.2}s: {}", window.start, e);
        }
        frames += 1;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_budget {
            thread::sleep(frame_budget - elapsed);
        }
    }

    // Closing the tap tells the producer to stop.
    drop(tap);
    let _ = sim_handle.join();

    info!("Playback complete: {} frames drawn, {} dropped", frames, dropped);
}
