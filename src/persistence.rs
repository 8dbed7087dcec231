//! Best-score persistence.
//!
//! The only durable state is one named integer. [`JsonFileStore`] keeps it in
//! a small JSON object so other named values can live next to it.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tempfile::NamedTempFile;

use crate::engine::Score;
use crate::error::StoreError;

/// Key the best score is stored under.
pub const BEST_SCORE_KEY: &str = "bestScore-2048";

pub trait BestScoreStore {
    fn load(&self) -> Result<Score, StoreError>;
    fn save(&mut self, score: Score) -> Result<(), StoreError>;
}

/// JSON object file, e.g. `{"bestScore-2048": 1234}`. A missing file reads as 0.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        JsonFileStore { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path { &self.path }

    fn read_map(&self) -> Result<Map<String, Value>, StoreError> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&data)?)
    }
}

impl BestScoreStore for JsonFileStore {
    fn load(&self) -> Result<Score, StoreError> {
        let map = self.read_map()?;
        match map.get(BEST_SCORE_KEY) {
            None => Ok(0),
            Some(v) => parse_score(v).ok_or_else(|| StoreError::Malformed { key: BEST_SCORE_KEY.to_string() }),
        }
    }

    fn save(&mut self, score: Score) -> Result<(), StoreError> {
        // Keep unrelated keys; a corrupt file is replaced.
        let mut map = self.read_map().unwrap_or_default();
        map.insert(BEST_SCORE_KEY.to_string(), Value::from(score));
        let dir = match self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            Some(dir) => dir,
            None => Path::new("."),
        };
        fs::create_dir_all(dir)?;
        let data = serde_json::to_vec_pretty(&Value::Object(map))?;
        // Write a sibling file and rename it over the store so a failed write
        // never leaves a truncated store behind.
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&data)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

/// Accept integers and integer strings (older saves wrote the score as text).
fn parse_score(v: &Value) -> Option<Score> {
    match v {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// In-process store for tests and `--no-persist` runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    best: Score,
    pub saves: u32,
}

impl MemoryStore {
    pub fn with_best(best: Score) -> Self { MemoryStore { best, saves: 0 } }
}

impl BestScoreStore for MemoryStore {
    fn load(&self) -> Result<Score, StoreError> { Ok(self.best) }

    fn save(&mut self, score: Score) -> Result<(), StoreError> {
        self.best = score;
        self.saves += 1;
        Ok(())
    }
}
