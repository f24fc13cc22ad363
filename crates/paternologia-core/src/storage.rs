//! YAML file storage for devices and songs
//!
//! Layout of the data directory:
//!
//! ```text
//! <data_dir>/
//!   devices.yaml      # DevicesConfig
//!   pacer.yaml        # transport config (owned by the pacer crate)
//!   songs/<id>.yaml   # one Song per file
//! ```

use crate::config::{read_yaml, save_config};
use crate::models::{Device, DevicesConfig, Song};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// YAML file storage for devices and songs
#[derive(Debug, Clone)]
pub struct Storage {
    data_dir: PathBuf,
    devices_file: PathBuf,
    songs_dir: PathBuf,
}

impl Storage {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            devices_file: data_dir.join("devices.yaml"),
            songs_dir: data_dir.join("songs"),
            data_dir,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the Pacer transport config (`pacer.yaml`)
    pub fn pacer_config_path(&self) -> PathBuf {
        self.data_dir.join("pacer.yaml")
    }

    /// Ensure data directories exist
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.songs_dir)
            .with_context(|| format!("Failed to create songs directory: {:?}", self.songs_dir))
    }

    /// Load all devices from `devices.yaml` (empty if the file is missing)
    pub fn get_devices(&self) -> Result<Vec<Device>> {
        let Some(config) = read_yaml::<DevicesConfig>(&self.devices_file)? else {
            return Ok(Vec::new());
        };

        for device in &config.devices {
            device
                .validate()
                .with_context(|| format!("Invalid device in {:?}", self.devices_file))?;
        }
        log::debug!("get_devices: Loaded {} device(s)", config.devices.len());
        Ok(config.devices)
    }

    /// Get a single device by id
    pub fn get_device(&self, device_id: &str) -> Result<Option<Device>> {
        Ok(self
            .get_devices()?
            .into_iter()
            .find(|device| device.id == device_id))
    }

    /// Save devices to `devices.yaml`
    pub fn save_devices(&self, devices: &[Device]) -> Result<()> {
        self.ensure_dirs()?;
        let config = DevicesConfig {
            devices: devices.to_vec(),
        };
        save_config(&config, &self.devices_file)
    }

    /// Load all songs from the `songs/` directory, sorted by file name
    pub fn get_songs(&self) -> Result<Vec<Song>> {
        if !self.songs_dir.exists() {
            return Ok(Vec::new());
        }

        let mut files: Vec<PathBuf> = std::fs::read_dir(&self.songs_dir)
            .with_context(|| format!("Failed to list songs in {:?}", self.songs_dir))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "yaml"))
            .collect();
        files.sort();

        let mut songs = Vec::with_capacity(files.len());
        for file in files {
            if let Some(song) = self.load_song_file(&file)? {
                songs.push(song);
            }
        }
        Ok(songs)
    }

    /// Load a single song by id
    pub fn get_song(&self, song_id: &str) -> Result<Option<Song>> {
        self.load_song_file(&self.song_file(song_id))
    }

    fn load_song_file(&self, path: &Path) -> Result<Option<Song>> {
        let Some(song) = read_yaml::<Song>(path)? else {
            return Ok(None);
        };
        song.validate()
            .with_context(|| format!("Invalid song in {:?}", path))?;
        Ok(Some(song))
    }

    /// Save a song to its YAML file
    pub fn save_song(&self, song: &Song) -> Result<()> {
        song.validate()
            .with_context(|| format!("Refusing to save invalid song '{}'", song.song.id))?;
        self.ensure_dirs()?;
        save_config(song, &self.song_file(&song.song.id))
    }

    /// Delete a song file. Returns `false` if it didn't exist.
    pub fn delete_song(&self, song_id: &str) -> Result<bool> {
        let path = self.song_file(song_id);
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&path).with_context(|| format!("Failed to delete {:?}", path))?;
        log::info!("delete_song: Deleted '{}'", song_id);
        Ok(true)
    }

    pub fn song_exists(&self, song_id: &str) -> bool {
        self.song_file(song_id).exists()
    }

    fn song_file(&self, song_id: &str) -> PathBuf {
        self.songs_dir.join(format!("{}.yaml", song_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Action, PacerButton};

    fn sample_song(id: &str) -> Song {
        let mut song = Song::new(
            id,
            "Test Song",
            vec![PacerButton::new(
                "Intro",
                vec![Action::preset("boss", 1), Action::pattern("ms", "A01")],
            )],
        );
        song.song.author = "Band".to_string();
        song.song.notes = "Ballada, tempo 72 BPM".to_string();
        song
    }

    #[test]
    fn test_empty_storage() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path());

        assert!(storage.get_devices().unwrap().is_empty());
        assert!(storage.get_songs().unwrap().is_empty());
        assert!(storage.get_song("missing").unwrap().is_none());
        assert!(!storage.song_exists("missing"));
    }

    #[test]
    fn test_devices_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path());
        let devices = vec![
            Device::new("boss", "Boss RC-600", 0),
            Device::new("ms", "Elektron M:S", 1),
        ];

        storage.save_devices(&devices).unwrap();

        assert_eq!(storage.get_devices().unwrap(), devices);
        assert_eq!(
            storage.get_device("ms").unwrap().map(|d| d.midi_channel),
            Some(1)
        );
        assert!(storage.get_device("nope").unwrap().is_none());
    }

    #[test]
    fn test_invalid_device_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path());
        std::fs::write(
            dir.path().join("devices.yaml"),
            "devices:\n  - id: x\n    name: X\n    midi_channel: 16\n",
        )
        .unwrap();

        assert!(storage.get_devices().is_err());
    }

    #[test]
    fn test_song_roundtrip_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path());
        let song = sample_song("ballad");

        storage.save_song(&song).unwrap();
        assert!(storage.song_exists("ballad"));
        assert_eq!(storage.get_song("ballad").unwrap(), Some(song));

        assert!(storage.delete_song("ballad").unwrap());
        assert!(!storage.delete_song("ballad").unwrap());
        assert!(storage.get_song("ballad").unwrap().is_none());
    }

    #[test]
    fn test_songs_sorted_by_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path());
        for id in ["zebra", "alpha", "mid"] {
            storage.save_song(&sample_song(id)).unwrap();
        }
        std::fs::write(dir.path().join("songs").join("notes.txt"), "ignored").unwrap();

        let ids: Vec<String> = storage
            .get_songs()
            .unwrap()
            .into_iter()
            .map(|s| s.song.id)
            .collect();
        assert_eq!(ids, vec!["alpha", "mid", "zebra"]);
    }

    #[test]
    fn test_save_rejects_invalid_song() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path());
        let mut song = sample_song("bad");
        song.song.pacer_export.target_preset = "Z9".to_string();

        assert!(storage.save_song(&song).is_err());
        assert!(!storage.song_exists("bad"));
    }
}
