use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::engine::{self, Rules, Tile};
use crate::error::ConfigError;
use crate::input::SWIPE_THRESHOLD;

/// Game settings. Every field is optional in the JSON file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub grid_size: usize,
    pub win_tile: Tile,
    /// Number of moves undo can walk back.
    pub history_depth: usize,
    /// Minimum swipe displacement before a gesture becomes a move.
    pub swipe_threshold: f64,
    /// Fire the interstitial every this many accepted moves.
    pub interstitial_every: u32,
    pub best_score_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            grid_size: engine::DEFAULT_SIZE,
            win_tile: engine::WIN_TILE,
            history_depth: engine::HISTORY_DEPTH,
            swipe_threshold: SWIPE_THRESHOLD,
            interstitial_every: 3,
            best_score_path: PathBuf::from("best_score.json"),
        }
    }
}

impl Config {
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let data = fs::read(path)?;
        Self::from_json_slice(&data)
    }

    pub fn from_json_slice(data: &[u8]) -> Result<Self, ConfigError> {
        let cfg: Config = serde_json::from_slice(data)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size < 2 {
            return Err(ConfigError::Invalid(format!("grid_size must be >= 2, got {}", self.grid_size)));
        }
        if self.win_tile < 4 || !self.win_tile.is_power_of_two() {
            return Err(ConfigError::Invalid(format!("win_tile must be a power of two >= 4, got {}", self.win_tile)));
        }
        if self.history_depth == 0 {
            return Err(ConfigError::Invalid("history_depth must be positive".into()));
        }
        if self.interstitial_every == 0 {
            return Err(ConfigError::Invalid("interstitial_every must be positive".into()));
        }
        if !self.swipe_threshold.is_finite() || self.swipe_threshold < 0.0 {
            return Err(ConfigError::Invalid(format!("swipe_threshold must be finite and >= 0, got {}", self.swipe_threshold)));
        }
        Ok(())
    }

    pub fn rules(&self) -> Rules {
        Rules { size: self.grid_size, win_tile: self.win_tile, history_depth: self.history_depth }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn empty_object_gives_defaults() {
        let cfg = Config::from_json_slice(b"{}").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.rules(), Rules::default());
    }

    #[test]
    fn partial_override() {
        let cfg = Config::from_json_slice(br#"{"grid_size": 5, "win_tile": 4096}"#).unwrap();
        assert_eq!(cfg.grid_size, 5);
        assert_eq!(cfg.win_tile, 4096);
        assert_eq!(cfg.history_depth, 10);
        assert_eq!(cfg.interstitial_every, 3);
    }

    #[test]
    fn rejects_bad_values() {
        for bad in [
            r#"{"grid_size": 1}"#,
            r#"{"win_tile": 1000}"#,
            r#"{"win_tile": 2}"#,
            r#"{"history_depth": 0}"#,
            r#"{"interstitial_every": 0}"#,
            r#"{"swipe_threshold": -1.0}"#,
        ] {
            let err = Config::from_json_slice(bad.as_bytes()).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{bad}");
        }
    }

    #[test]
    fn reads_from_file() {
        let tmp = NamedTempFile::new().unwrap();
        fs::write(tmp.path(), r#"{"best_score_path": "/tmp/x.json"}"#).unwrap();
        let cfg = Config::from_json_path(tmp.path()).unwrap();
        assert_eq!(cfg.best_score_path, PathBuf::from("/tmp/x.json"));
        assert!(matches!(Config::from_json_path("/definitely/not/here.json"), Err(ConfigError::Io(_))));
    }
}
