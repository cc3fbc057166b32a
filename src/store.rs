use crate::song::{Song, SongRecord};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory-per-song library.
///
/// Layout: `<root>/<slug>/song.json` (metadata + note records) next to
/// `<root>/<slug>/audio.wav` (mono f32). The slug is derived from the title;
/// `list` reports whatever subdirectories carry a song.json.
pub struct SongStore {
    root: PathBuf,
}

/// A song loaded together with its audio track.
#[derive(Debug)]
pub struct StoredSong {
    pub song: Song,
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl SongStore {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, String> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| format!("create library dir: {}", e))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory slug for a song title: lowercase alphanumerics, runs of
    /// anything else collapsed to single dashes.
    pub fn slug(title: &str) -> String {
        let mut out = String::with_capacity(title.len());
        let mut dash = false;
        for c in title.chars() {
            if c.is_ascii_alphanumeric() {
                out.push(c.to_ascii_lowercase());
                dash = false;
            } else if !dash && !out.is_empty() {
                out.push('-');
                dash = true;
            }
        }
        while out.ends_with('-') {
            out.pop();
        }
        if out.is_empty() {
            out.push_str("untitled");
        }
        out
    }

    /// Save a song and its audio. Overwrites an existing entry with the
    /// same slug. Returns the song directory.
    pub fn save(
        &self,
        song: &Song,
        samples: &[f32],
        sample_rate: u32,
    ) -> Result<PathBuf, String> {
        let dir = self.root.join(Self::slug(&song.title));
        fs::create_dir_all(&dir).map_err(|e| format!("create song dir: {}", e))?;

        let record = SongRecord::from(song);
        let json = serde_json::to_string_pretty(&record)
            .map_err(|e| format!("encode song.json: {}", e))?;
        fs::write(dir.join("song.json"), json)
            .map_err(|e| format!("write song.json: {}", e))?;

        let spec = WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(dir.join("audio.wav"), spec)
            .map_err(|e| format!("create audio.wav: {}", e))?;
        for &s in samples {
            writer
                .write_sample(s)
                .map_err(|e| format!("write audio.wav: {}", e))?;
        }
        writer
            .finalize()
            .map_err(|e| format!("finalize audio.wav: {}", e))?;

        info!(
            "Saved \"{}\": {} notes, {:.1}s audio → {:?}",
            song.title,
            song.notes.len(),
            samples.len() as f64 / sample_rate as f64,
            dir
        );
        Ok(dir)
    }

    /// Load a song (and its audio) by slug.
    pub fn load(&self, slug: &str) -> Result<StoredSong, String> {
        let dir = self.root.join(slug);
        let json = fs::read_to_string(dir.join("song.json"))
            .map_err(|e| format!("read {:?}/song.json: {}", dir, e))?;
        let record: SongRecord =
            serde_json::from_str(&json).map_err(|e| format!("parse song.json: {}", e))?;

        let (samples, sample_rate) = read_wav_mono(&dir.join("audio.wav"))?;

        Ok(StoredSong {
            song: Song::from(record),
            samples,
            sample_rate,
        })
    }

    /// Slugs of every stored song, sorted.
    pub fn list(&self) -> Result<Vec<String>, String> {
        let mut slugs = Vec::new();
        let entries =
            fs::read_dir(&self.root).map_err(|e| format!("read library dir: {}", e))?;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() && path.join("song.json").is_file() {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    slugs.push(name.to_string());
                }
            }
        }
        slugs.sort();
        Ok(slugs)
    }
}

/// Read a WAV file as normalized mono f32, mixing channels down if needed.
pub fn read_wav_mono(path: &Path) -> Result<(Vec<f32>, u32), String> {
    let reader =
        WavReader::open(path).map_err(|e| format!("open {:?}: {}", path, e))?;
    let spec = reader.spec();
    let channels = spec.channels as usize;

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader.into_samples::<f32>().filter_map(|s| s.ok()).collect(),
        SampleFormat::Int => {
            let max = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .filter_map(|s| s.ok())
                .map(|s| s as f32 / max)
                .collect()
        }
    };

    let mono = if channels == 1 {
        samples
    } else {
        samples
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    };

    Ok((mono, spec.sample_rate))
}
