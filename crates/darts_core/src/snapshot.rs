//! Plain-data snapshots of a match and a ledger
//!
//! A snapshot is a flat serde record meant for export: the caller decides how
//! to encode it (JSON file, base64 save code, ...). Loading validates every
//! field against the match rules and reports problems as
//! [`MatchError::MalformedSnapshot`].

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::bot::BotLevel;
use crate::config::{MatchConfig, ScoringDirection, TargetMode, TieBreak, DEFAULT_MAX_HUMAN_PLAYERS};
use crate::error::{MatchError, Result};
use crate::ledger::{HighScoreEntry, HighScoreLedger};
use crate::match_engine::Match;
use crate::player::Competitor;
use crate::target::Target;

pub const SNAPSHOT_VERSION: u32 = 1;

fn default_max_human_players() -> usize {
    DEFAULT_MAX_HUMAN_PLAYERS
}

fn malformed(msg: impl Into<String>) -> MatchError {
    MatchError::MalformedSnapshot(msg.into())
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MatchSnapshot {
    /// Snapshot format version for migration
    pub version: u32,

    /// Export time (unix milliseconds)
    pub timestamp: i64,

    pub round: u32,
    pub total_rounds: u32,
    pub direction: ScoringDirection,

    /// Added in version 1
    #[serde(default)]
    pub tie_break: TieBreak,

    pub target_mode: TargetMode,

    /// Added in version 1
    #[serde(default)]
    pub auto_fill: Option<u32>,

    #[serde(default = "default_max_human_players")]
    pub max_human_players: usize,

    /// Competitors in seating order
    pub names: Vec<String>,

    pub histories: BTreeMap<String, Vec<u32>>,

    /// Bot levels keyed by name; every other name is a human
    #[serde(default)]
    pub levels: BTreeMap<String, BotLevel>,

    /// Target of each round drawn so far
    pub targets: Vec<Target>,
}

impl MatchSnapshot {
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let snapshot: MatchSnapshot = serde_json::from_value(value)?;
        migrate_snapshot(snapshot)
    }

    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: MatchSnapshot = serde_json::from_str(json)?;
        migrate_snapshot(snapshot)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    fn config(&self) -> MatchConfig {
        MatchConfig {
            total_rounds: self.total_rounds,
            direction: self.direction,
            tie_break: self.tie_break,
            target_mode: self.target_mode.clone(),
            auto_fill: self.auto_fill,
            max_human_players: self.max_human_players,
        }
    }
}

/// Bring an older snapshot up to the current version
pub fn migrate_snapshot(mut snapshot: MatchSnapshot) -> Result<MatchSnapshot> {
    let original_version = snapshot.version;

    match snapshot.version {
        // v0 had no tie-break or auto-fill; serde defaults already filled them
        0 => snapshot.version = SNAPSHOT_VERSION,
        SNAPSHOT_VERSION => {}
        v => {
            log::warn!("Loading snapshot from future version {} (current: {})", v, SNAPSHOT_VERSION);
        }
    }

    if original_version < SNAPSHOT_VERSION {
        log::info!("Migrated snapshot from version {} to {}", original_version, SNAPSHOT_VERSION);
    }

    Ok(snapshot)
}

impl Match {
    pub fn to_snapshot(&self) -> MatchSnapshot {
        let config = self.config();
        MatchSnapshot {
            version: SNAPSHOT_VERSION,
            timestamp: chrono::Utc::now().timestamp_millis(),
            round: self.round(),
            total_rounds: config.total_rounds,
            direction: config.direction,
            tie_break: config.tie_break,
            target_mode: config.target_mode.clone(),
            auto_fill: config.auto_fill,
            max_human_players: config.max_human_players,
            names: self.competitors().iter().map(|c| c.name.clone()).collect(),
            histories: self
                .competitors()
                .iter()
                .map(|c| (c.name.clone(), c.history.clone()))
                .collect(),
            levels: self
                .competitors()
                .iter()
                .filter_map(|c| c.level().map(|level| (c.name.clone(), level)))
                .collect(),
            targets: self.target_history().to_vec(),
        }
    }

    pub fn from_snapshot(snapshot: &MatchSnapshot) -> Result<Self> {
        let config = snapshot.config();
        config.validate().map_err(|e| malformed(e.to_string()))?;

        if snapshot.names.is_empty() {
            return Err(malformed("no competitors"));
        }

        let mut seen = BTreeSet::new();
        for name in &snapshot.names {
            if name.trim().is_empty() || name.trim() != name {
                return Err(malformed(format!("invalid name '{}'", name)));
            }
            if !seen.insert(name.to_lowercase()) {
                return Err(malformed(format!("duplicate name '{}'", name)));
            }
        }

        if let Some(extra) = snapshot.histories.keys().find(|k| !snapshot.names.contains(k)) {
            return Err(malformed(format!("history for unknown name '{}'", extra)));
        }
        if let Some(extra) = snapshot.levels.keys().find(|k| !snapshot.names.contains(k)) {
            return Err(malformed(format!("level for unknown name '{}'", extra)));
        }

        let human_count = snapshot.names.iter().filter(|n| !snapshot.levels.contains_key(*n)).count();
        if human_count == 0 {
            return Err(malformed("no human players"));
        }
        if human_count > config.max_human_players {
            return Err(malformed(format!("{} human players exceeds limit", human_count)));
        }

        let last_round = config
            .total_rounds
            .checked_add(1)
            .ok_or_else(|| malformed(format!("total rounds {} too large", config.total_rounds)))?;
        if snapshot.round == 0 || snapshot.round > last_round {
            return Err(malformed(format!("round {} outside 1..={}", snapshot.round, last_round)));
        }

        let finished = snapshot.round > config.total_rounds;
        let locked = snapshot.round as usize - 1;
        let expected_targets = if finished { config.total_rounds as usize } else { snapshot.round as usize };
        if snapshot.targets.len() != expected_targets {
            return Err(malformed(format!(
                "expected {} targets, found {}",
                expected_targets,
                snapshot.targets.len()
            )));
        }

        let allowed = config.target_mode.possible_targets();
        if let Some(bad) = snapshot.targets.iter().find(|t| !allowed.contains(t)) {
            return Err(malformed(format!("target {} not produced by target mode", bad)));
        }

        let mut competitors = Vec::with_capacity(snapshot.names.len());
        for name in &snapshot.names {
            let history = snapshot
                .histories
                .get(name)
                .cloned()
                .ok_or_else(|| malformed(format!("missing history for '{}'", name)))?;

            let competitor = match snapshot.levels.get(name) {
                Some(level) => Competitor { history, ..Competitor::bot(name.clone(), *level) },
                None => Competitor { history, ..Competitor::human(name.clone()) },
            };

            // A human may carry an entry for the round in progress
            let pending_ok = !finished && !competitor.is_bot();
            let len = competitor.history.len();
            if len != locked && !(pending_ok && len == locked + 1) {
                return Err(malformed(format!(
                    "'{}' has {} results at round {}",
                    name, len, snapshot.round
                )));
            }

            for (value, target) in competitor.history.iter().zip(snapshot.targets.iter()) {
                if !target.accepts(config.direction, *value) {
                    return Err(malformed(format!(
                        "'{}' has value {} invalid against {}",
                        name, value, target
                    )));
                }
            }

            competitors.push(competitor);
        }

        log::debug!("Restored match at round {} with {} competitors", snapshot.round, competitors.len());
        Ok(Match::from_parts(config, snapshot.round, competitors, snapshot.targets.clone()))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LedgerSnapshot {
    pub version: u32,
    pub direction: ScoringDirection,
    /// Missing in files written before ledgers were tied to a round count
    #[serde(default)]
    pub total_rounds: Option<u32>,
    pub entries: Vec<HighScoreEntry>,
}

impl LedgerSnapshot {
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl HighScoreLedger {
    pub fn to_snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            version: SNAPSHOT_VERSION,
            direction: self.direction(),
            total_rounds: self.total_rounds(),
            entries: self.entries().to_vec(),
        }
    }

    pub fn from_snapshot(snapshot: &LedgerSnapshot) -> Result<Self> {
        if let Some(bad) = snapshot.entries.iter().find(|e| e.name.trim().is_empty()) {
            return Err(malformed(format!("ledger entry with blank name (score {})", bad.score)));
        }
        Ok(HighScoreLedger::from_entries(snapshot.direction, snapshot.entries.clone())
            .with_total_rounds(snapshot.total_rounds))
    }
}
