use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Best results across sessions, one small JSON file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameRecords {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub tetris_best_score: u32,
    #[serde(default)]
    pub tetris_best_level: u32,
    #[serde(default)]
    pub merge_best_score: u32,
}

impl Default for GameRecords {
    fn default() -> Self {
        Self {
            version: default_version(),
            tetris_best_score: 0,
            tetris_best_level: 0,
            merge_best_score: 0,
        }
    }
}

impl GameRecords {
    /// Fold a finished (or running) tetris game in; returns true if a best
    /// improved, i.e. the file is worth rewriting.
    pub fn observe_tetris(&mut self, score: u32, level: u32) -> bool {
        let mut changed = false;
        if score > self.tetris_best_score {
            self.tetris_best_score = score;
            changed = true;
        }
        if level > self.tetris_best_level {
            self.tetris_best_level = level;
            changed = true;
        }
        changed
    }

    pub fn observe_merge(&mut self, score: u32) -> bool {
        if score > self.merge_best_score {
            self.merge_best_score = score;
            return true;
        }
        false
    }
}

fn default_version() -> u32 {
    1
}

/// Persists [`GameRecords`]. Loading is lenient (defaults on any failure);
/// saving goes through a tmp-file rename so a crash can't truncate the file.
#[derive(Debug, Clone)]
pub struct RecordsStore {
    path: PathBuf,
}

impl RecordsStore {
    pub fn from_env() -> Self {
        if let Some(explicit) = std::env::var_os("ARCADE_RECORDS_PATH") {
            return Self {
                path: PathBuf::from(explicit),
            };
        }

        let base = std::env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME").map(|home| {
                    let mut p = PathBuf::from(home);
                    p.push(".local");
                    p.push("share");
                    p
                })
            })
            .unwrap_or_else(|| PathBuf::from("."));

        let mut path = base;
        path.push("heart-arcade");
        path.push("records.json");
        Self { path }
    }

    pub fn at_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn load(&self) -> GameRecords {
        let Ok(bytes) = fs::read(&self.path) else {
            return GameRecords::default();
        };
        serde_json::from_slice::<GameRecords>(&bytes).unwrap_or_default()
    }

    pub fn save(&self, records: &GameRecords) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(records)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        atomic_write(&self.path, json.as_bytes())
    }
}

fn atomic_write(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes)?;
    match fs::rename(&tmp, path) {
        Ok(()) => Ok(()),
        Err(_) => {
            fs::copy(&tmp, path)?;
            let _ = fs::remove_file(&tmp);
            Ok(())
        }
    }
}
