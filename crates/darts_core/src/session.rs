//! Session owner
//!
//! A [`Session`] holds the active match (if any) and the high-score ledger
//! for one interactive player session. There is no global state: front ends
//! own a `Session` and reset it explicitly.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::MatchConfig;
use crate::error::{MatchError, Result};
use crate::ledger::{HighScoreEntry, HighScoreLedger};
use crate::match_engine::{Match, MatchSetup};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    NotStarted,
    Playing,
    Finished,
}

#[derive(Debug, Clone)]
pub struct Session {
    config: MatchConfig,
    current: Option<Match>,
    ledger: HighScoreLedger,
}

impl Session {
    pub fn new(config: MatchConfig) -> Self {
        let ledger = HighScoreLedger::for_config(&config);
        Self { config, current: None, ledger }
    }

    /// Resume with a previously saved ledger.
    pub fn with_ledger(config: MatchConfig, ledger: HighScoreLedger) -> Result<Self> {
        if !ledger.accepts(&config) {
            return Err(MatchError::InvalidSetup(format!(
                "ledger ranks {:?} over {:?} rounds but the match scores {:?} over {} rounds",
                ledger.direction(),
                ledger.total_rounds(),
                config.direction,
                config.total_rounds
            )));
        }
        Ok(Self { config, current: None, ledger })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn ledger(&self) -> &HighScoreLedger {
        &self.ledger
    }

    pub fn current_match(&self) -> Option<&Match> {
        self.current.as_ref()
    }

    pub fn match_mut(&mut self) -> Result<&mut Match> {
        self.current.as_mut().ok_or(MatchError::NoActiveMatch)
    }

    pub fn status(&self) -> SessionStatus {
        match &self.current {
            None => SessionStatus::NotStarted,
            Some(m) if m.is_finished() => SessionStatus::Finished,
            Some(_) => SessionStatus::Playing,
        }
    }

    /// Start a new match, replacing any unfinished one.
    pub fn start<R: Rng + ?Sized>(&mut self, setup: &MatchSetup, rng: &mut R) -> Result<&mut Match> {
        let started = Match::start(setup, self.config.clone(), rng)?;
        if self.status() == SessionStatus::Playing {
            log::info!("Abandoning unfinished match");
        }
        Ok(self.current.insert(started))
    }

    /// Adopt a match restored from a snapshot.
    pub fn resume(&mut self, restored: Match) -> Result<&mut Match> {
        if !self.ledger.accepts(restored.config()) {
            return Err(MatchError::InvalidSetup(
                "restored match does not fit the session's high-score ledger".into(),
            ));
        }
        self.config = restored.config().clone();
        Ok(self.current.insert(restored))
    }

    /// Record the finished match into the ledger and clear it.
    pub fn complete_match(&mut self) -> Result<Vec<HighScoreEntry>> {
        let entries = match &self.current {
            None => return Err(MatchError::NoActiveMatch),
            Some(m) => m.finalize_match()?,
        };

        self.ledger.record(entries.clone());
        self.current = None;
        Ok(entries)
    }

    /// Drop the current match, keep the ledger.
    pub fn reset_match(&mut self) {
        self.current = None;
    }

    /// Drop the current match and the ledger.
    pub fn reset(&mut self) {
        self.current = None;
        self.ledger.reset();
        log::info!("Session reset");
    }
}
