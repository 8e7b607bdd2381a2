use serde::{Deserialize, Serialize};

use crate::bot::BotLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompetitorKind {
    Human,
    Bot { level: BotLevel },
}

/// A human or bot taking part in a match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competitor {
    pub name: String,
    pub kind: CompetitorKind,
    /// One result per locked round, in round order
    pub history: Vec<u32>,
}

impl Competitor {
    pub fn human(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: CompetitorKind::Human, history: Vec::new() }
    }

    pub fn bot(name: impl Into<String>, level: BotLevel) -> Self {
        Self { name: name.into(), kind: CompetitorKind::Bot { level }, history: Vec::new() }
    }

    pub fn is_bot(&self) -> bool {
        matches!(self.kind, CompetitorKind::Bot { .. })
    }

    pub fn level(&self) -> Option<BotLevel> {
        match self.kind {
            CompetitorKind::Bot { level } => Some(level),
            CompetitorKind::Human => None,
        }
    }

    pub fn total(&self) -> u32 {
        self.history.iter().sum()
    }

    pub fn rounds_played(&self) -> usize {
        self.history.len()
    }
}
