use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::chunking::starters::DEFAULT_LANGUAGE;
use crate::scheduler::speed::{DEFAULT_MAX_WPM, DEFAULT_MIN_WPM, DEFAULT_WPM_STEP};
use crate::scheduler::{ReadingMode, SpeedBounds};
use crate::session::{SessionConfig, DEFAULT_CHUNK_SIZE, DEFAULT_WPM};

/// Reader preferences persisted between runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub mode: ReadingMode,
    pub wpm: u32,
    pub min_wpm: u32,
    pub max_wpm: u32,
    pub wpm_step: u32,
    pub chunk_size: usize,
    pub smart_chunking: bool,
    pub language: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: ReadingMode::Word,
            wpm: DEFAULT_WPM,
            min_wpm: DEFAULT_MIN_WPM,
            max_wpm: DEFAULT_MAX_WPM,
            wpm_step: DEFAULT_WPM_STEP,
            chunk_size: DEFAULT_CHUNK_SIZE,
            smart_chunking: true,
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl Config {
    pub fn speed_bounds(&self) -> SpeedBounds {
        SpeedBounds::new(self.min_wpm, self.max_wpm, self.wpm_step)
    }

    /// Builds the session for `text` from these preferences.
    pub fn session(&self, text: impl Into<String>) -> SessionConfig {
        SessionConfig::new(text)
            .with_mode(self.mode)
            .with_speed(self.wpm)
            .with_chunk_size(self.chunk_size)
            .with_smart_chunking(self.smart_chunking)
            .with_language(&self.language)
            .with_speed_bounds(self.speed_bounds())
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };

        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(err) => {
                log::warn!("ignoring unreadable config {}: {err}", self.path.display());
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::ChunkStrategy;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            mode: ReadingMode::Chunk,
            wpm: 450,
            min_wpm: 150,
            max_wpm: 900,
            wpm_step: 50,
            chunk_size: 4,
            smart_chunking: false,
            language: "spanish".into(),
        };
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("absent.json"));
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn corrupt_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, b"{ not json").unwrap();
        assert_eq!(FileConfigStore::with_path(&path).load(), Config::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, br#"{ "wpm": 520, "mode": "bionic" }"#).unwrap();

        let cfg = FileConfigStore::with_path(&path).load();
        assert_eq!(cfg.wpm, 520);
        assert_eq!(cfg.mode, ReadingMode::Bionic);
        assert_eq!(cfg.chunk_size, DEFAULT_CHUNK_SIZE);
    }

    #[test]
    fn session_from_config() {
        let cfg = Config {
            smart_chunking: false,
            chunk_size: 2,
            language: "french".into(),
            ..Config::default()
        };
        let session = cfg.session("un deux trois");

        assert_eq!(session.chunk_size, 2);
        assert_eq!(session.chunk_strategy, ChunkStrategy::Mechanical);
        assert_eq!(session.starters.name, "french");
        assert_eq!(session.speed_bounds, SpeedBounds::default());
    }
}
