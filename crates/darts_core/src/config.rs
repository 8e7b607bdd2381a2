//! Match rule configuration
//!
//! All rule variations of the game (round count, scoring direction, tie-break,
//! target selection) live in one [`MatchConfig`]. Named presets cover the
//! variants people actually play.
//!
//! ## Usage
//!
//! ```rust
//! use darts_core::config::MatchConfig;
//!
//! // Classic 10-round darts-used game with random targets
//! let config = MatchConfig::default();
//!
//! // 40-round points game
//! let long = MatchConfig::points_40();
//!
//! // From environment variable
//! let from_env = MatchConfig::from_env_or_default();
//! # assert!(config.validate().is_ok() && long.validate().is_ok() && from_env.validate().is_ok());
//! ```
//!
//! ## Environment Variables
//!
//! - `DARTS_VARIANT`: Select preset (darts, darts30, points30, points40)

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::env;
use std::fmt;
use std::str::FromStr;

use crate::error::{MatchError, Result};
use crate::target::{Target, CLASSIC_RANDOM_TARGETS, FIXED_ROTATION};

/// Default cap on human players per match
pub const DEFAULT_MAX_HUMAN_PLAYERS: usize = 4;

/// Upper bound on rounds per match
pub const MAX_TOTAL_ROUNDS: u32 = 1000;

/// Whether lower or higher accumulated totals win
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoringDirection {
    /// Players count darts needed; fewest darts wins
    DartsUsed,
    /// Players count points scored; most points wins
    PointsScored,
}

impl ScoringDirection {
    /// Order two totals so that the better one comes first.
    pub fn compare(&self, a: u32, b: u32) -> Ordering {
        match self {
            ScoringDirection::DartsUsed => a.cmp(&b),
            ScoringDirection::PointsScored => b.cmp(&a),
        }
    }

    /// True when `a` is strictly better than `b`.
    pub fn is_better(&self, a: u32, b: u32) -> bool {
        self.compare(a, b) == Ordering::Less
    }
}

/// Secondary ordering for competitors with equal totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TieBreak {
    /// Name ascending
    #[default]
    Name,
    /// More rounds played first, then name ascending
    RoundsPlayedThenName,
}

/// How the target of each round is chosen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetMode {
    /// Single 20, Single 19, Single 18, Bullseye, repeating
    FixedRotation,
    /// Uniform draw from the given set every round
    Random(Vec<Target>),
}

impl TargetMode {
    pub fn classic_random() -> Self {
        TargetMode::Random(CLASSIC_RANDOM_TARGETS.to_vec())
    }

    /// Every target this mode can produce.
    pub fn possible_targets(&self) -> Vec<Target> {
        match self {
            TargetMode::FixedRotation => FIXED_ROTATION.to_vec(),
            TargetMode::Random(choices) => choices.clone(),
        }
    }
}

/// Named rule presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Variant {
    /// 10 rounds, darts used, random targets
    DartsChallenge,
    /// 30 rounds, darts used, fixed rotation
    Darts30,
    /// 30 rounds, points scored, fixed rotation
    Points30,
    /// 40 rounds, points scored, fixed rotation
    Points40,
}

impl Variant {
    pub fn config(&self) -> MatchConfig {
        match self {
            Variant::DartsChallenge => MatchConfig::darts_challenge(),
            Variant::Darts30 => MatchConfig::darts_30(),
            Variant::Points30 => MatchConfig::points_30(),
            Variant::Points40 => MatchConfig::points_40(),
        }
    }
}

impl FromStr for Variant {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "darts" | "challenge" | "darts10" => Ok(Variant::DartsChallenge),
            "darts30" => Ok(Variant::Darts30),
            "points30" => Ok(Variant::Points30),
            "points40" | "points" => Ok(Variant::Points40),
            other => Err(MatchError::InvalidSetup(format!("unknown variant '{}'", other))),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Variant::DartsChallenge => "darts",
            Variant::Darts30 => "darts30",
            Variant::Points30 => "points30",
            Variant::Points40 => "points40",
        };
        f.write_str(name)
    }
}

/// Rules of one match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Rounds in the match (10, 30 or 40 in the presets)
    pub total_rounds: u32,
    pub direction: ScoringDirection,
    pub tie_break: TieBreak,
    pub target_mode: TargetMode,
    /// Result used for humans with nothing entered when a round advances.
    /// `None` makes a missing result an error.
    pub auto_fill: Option<u32>,
    pub max_human_players: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::darts_challenge()
    }
}

impl MatchConfig {
    /// Classic game: 10 rounds of darts used against random targets
    pub fn darts_challenge() -> Self {
        Self {
            total_rounds: 10,
            direction: ScoringDirection::DartsUsed,
            tie_break: TieBreak::Name,
            target_mode: TargetMode::classic_random(),
            auto_fill: Some(3),
            max_human_players: DEFAULT_MAX_HUMAN_PLAYERS,
        }
    }

    pub fn darts_30() -> Self {
        Self {
            total_rounds: 30,
            target_mode: TargetMode::FixedRotation,
            ..Self::darts_challenge()
        }
    }

    pub fn points_30() -> Self {
        Self {
            total_rounds: 30,
            direction: ScoringDirection::PointsScored,
            tie_break: TieBreak::Name,
            target_mode: TargetMode::FixedRotation,
            auto_fill: None,
            max_human_players: DEFAULT_MAX_HUMAN_PLAYERS,
        }
    }

    pub fn points_40() -> Self {
        Self { total_rounds: 40, ..Self::points_30() }
    }

    /// Load from environment variable DARTS_VARIANT or use default
    pub fn from_env_or_default() -> Self {
        env::var("DARTS_VARIANT")
            .ok()
            .and_then(|v| v.parse::<Variant>().ok())
            .map(|v| v.config())
            .unwrap_or_default()
    }

    pub fn with_total_rounds(mut self, total_rounds: u32) -> Self {
        self.total_rounds = total_rounds;
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn with_auto_fill(mut self, auto_fill: Option<u32>) -> Self {
        self.auto_fill = auto_fill;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.total_rounds == 0 {
            return Err(MatchError::InvalidSetup("total rounds must be at least 1".into()));
        }
        if self.total_rounds > MAX_TOTAL_ROUNDS {
            return Err(MatchError::InvalidSetup(format!(
                "total rounds {} exceeds the limit of {}",
                self.total_rounds, MAX_TOTAL_ROUNDS
            )));
        }

        if self.max_human_players == 0 {
            return Err(MatchError::InvalidSetup("at least one human player must be allowed".into()));
        }

        let targets = self.target_mode.possible_targets();
        if targets.is_empty() {
            return Err(MatchError::InvalidSetup("random target set is empty".into()));
        }

        if let Some(fill) = self.auto_fill {
            if let Some(target) = targets.iter().find(|t| !t.accepts(self.direction, fill)) {
                return Err(MatchError::InvalidSetup(format!(
                    "auto-fill value {} is not valid against {}",
                    fill, target
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        for variant in [Variant::DartsChallenge, Variant::Darts30, Variant::Points30, Variant::Points40]
        {
            assert!(variant.config().validate().is_ok(), "{} should validate", variant);
        }
    }

    #[test]
    fn test_preset_round_counts() {
        assert_eq!(MatchConfig::darts_challenge().total_rounds, 10);
        assert_eq!(MatchConfig::points_30().total_rounds, 30);
        assert_eq!(MatchConfig::points_40().total_rounds, 40);
        assert_eq!(MatchConfig::points_40().direction, ScoringDirection::PointsScored);
    }

    #[test]
    fn test_variant_parse_roundtrip() {
        for variant in [Variant::DartsChallenge, Variant::Darts30, Variant::Points30, Variant::Points40]
        {
            assert_eq!(variant.to_string().parse::<Variant>().unwrap(), variant);
        }
        assert!("golf".parse::<Variant>().is_err());
    }

    #[test]
    fn test_direction_compare() {
        assert!(ScoringDirection::DartsUsed.is_better(9, 12));
        assert!(ScoringDirection::PointsScored.is_better(12, 9));
        assert!(!ScoringDirection::PointsScored.is_better(9, 9));
    }

    #[test]
    fn test_validate_rejects_zero_rounds() {
        let config = MatchConfig::default().with_total_rounds(0);
        assert!(matches!(config.validate(), Err(MatchError::InvalidSetup(_))));
    }

    #[test]
    fn test_validate_caps_total_rounds() {
        assert!(MatchConfig::default().with_total_rounds(MAX_TOTAL_ROUNDS).validate().is_ok());
        let config = MatchConfig::default().with_total_rounds(MAX_TOTAL_ROUNDS + 1);
        assert!(matches!(config.validate(), Err(MatchError::InvalidSetup(_))));
        assert!(MatchConfig::default().with_total_rounds(u32::MAX).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_auto_fill_out_of_range() {
        let darts = MatchConfig::default().with_auto_fill(Some(0));
        assert!(darts.validate().is_err());

        // 20 fits a segment but not the bullseye
        let points = MatchConfig::points_30().with_auto_fill(Some(20));
        assert!(points.validate().is_err());
        assert!(MatchConfig::points_30().with_auto_fill(Some(0)).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_random_set() {
        let config =
            MatchConfig { target_mode: TargetMode::Random(Vec::new()), ..MatchConfig::default() };
        assert!(config.validate().is_err());
    }
}
