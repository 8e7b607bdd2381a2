//! High-score file: the ledger snapshot as pretty JSON

use anyhow::{bail, Context, Result};
use darts_core::{HighScoreLedger, LedgerSnapshot, MatchConfig, ScoringDirection};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Default high-score file for matches under `config`, one file per
/// scoring direction and round count (`highscores-darts10.json`, ...)
pub fn default_ledger_path(config: &MatchConfig) -> PathBuf {
    let mode = match config.direction {
        ScoringDirection::DartsUsed => "darts",
        ScoringDirection::PointsScored => "points",
    };
    PathBuf::from(format!("highscores-{}{}.json", mode, config.total_rounds))
}

#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `None` when the file does not exist yet
    pub fn load(&self) -> Result<Option<HighScoreLedger>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read ledger file: {}", self.path.display()))?;
        let value: serde_json::Value = serde_json::from_str(&json)
            .with_context(|| format!("Ledger file is not JSON: {}", self.path.display()))?;
        let snapshot = LedgerSnapshot::from_value(value)?;
        let ledger = HighScoreLedger::from_snapshot(&snapshot)?;

        log::debug!("Loaded {} ledger entries from {:?}", ledger.len(), self.path);
        Ok(Some(ledger))
    }

    /// Stored ledger, or an empty one for `config` when there is no file.
    /// A file without a round count is adopted for `config`'s round count.
    pub fn load_or_new(&self, config: &MatchConfig) -> Result<HighScoreLedger> {
        match self.load()? {
            Some(ledger) if !ledger.accepts(config) => bail!(
                "{} holds {:?} scores over {} rounds, this game scores {:?} over {} rounds",
                self.path.display(),
                ledger.direction(),
                ledger.total_rounds().map_or_else(|| "any".to_string(), |r| r.to_string()),
                config.direction,
                config.total_rounds
            ),
            Some(ledger) => Ok(ledger.with_total_rounds(Some(config.total_rounds))),
            None => Ok(HighScoreLedger::for_config(config)),
        }
    }

    /// Write via a temp file and rename
    pub fn save(&self, ledger: &HighScoreLedger) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(&ledger.to_snapshot())?;
        let temp_path = self.path.with_extension("tmp");

        {
            let mut file = File::create(&temp_path)
                .with_context(|| format!("Failed to create {}", temp_path.display()))?;
            file.write_all(json.as_bytes())?;
            file.flush()?;
            file.sync_all()?;
        }

        fs::rename(&temp_path, &self.path)
            .with_context(|| format!("Failed to write ledger file: {}", self.path.display()))?;

        log::info!("Saved {} ledger entries to {:?}", ledger.len(), self.path);
        Ok(())
    }
}
