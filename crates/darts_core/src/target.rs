//! Dartboard targets and the valid result range for a round.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::{ScoringDirection, TargetMode};

/// Highest numbered segment on the board
pub const MAX_SEGMENT: u8 = 20;

/// Darts allowed per round in darts-used mode
pub const DARTS_RANGE: (u32, u32) = (1, 9);
/// Points range against the bullseye in points mode
pub const BULLSEYE_POINTS_RANGE: (u32, u32) = (0, 18);
/// Points range against a numbered segment in points mode
pub const SEGMENT_POINTS_RANGE: (u32, u32) = (0, 27);

/// Targets cycled by [`TargetMode::FixedRotation`]
pub const FIXED_ROTATION: [Target; 4] =
    [Target::Single(20), Target::Single(19), Target::Single(18), Target::Bullseye];

/// Targets drawn from by the classic random-target game
pub const CLASSIC_RANDOM_TARGETS: [Target; 4] =
    [Target::Single(20), Target::Double(16), Target::Treble(19), Target::Bullseye];

/// The segment a round asks players to aim for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Target {
    Single(u8),
    Double(u8),
    Treble(u8),
    Bullseye,
}

impl Target {
    pub fn is_bullseye(&self) -> bool {
        matches!(self, Target::Bullseye)
    }

    /// Inclusive (min, max) a result may take against this target.
    pub fn valid_range(&self, direction: ScoringDirection) -> (u32, u32) {
        match direction {
            ScoringDirection::DartsUsed => DARTS_RANGE,
            ScoringDirection::PointsScored if self.is_bullseye() => BULLSEYE_POINTS_RANGE,
            ScoringDirection::PointsScored => SEGMENT_POINTS_RANGE,
        }
    }

    pub fn accepts(&self, direction: ScoringDirection, value: u32) -> bool {
        let (min, max) = self.valid_range(direction);
        (min..=max).contains(&value)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Target::Single(n) => write!(f, "Single {}", n),
            Target::Double(n) => write!(f, "Double {}", n),
            Target::Treble(n) => write!(f, "Treble {}", n),
            Target::Bullseye => write!(f, "Bullseye"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid target: {0}")]
pub struct ParseTargetError(pub String);

impl FromStr for Target {
    type Err = ParseTargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let lower = trimmed.to_lowercase();
        if lower == "bullseye" || lower == "bull" {
            return Ok(Target::Bullseye);
        }

        let mut parts = lower.split_whitespace();
        let (ring, number) = match (parts.next(), parts.next(), parts.next()) {
            (Some(ring), Some(number), None) => (ring, number),
            _ => return Err(ParseTargetError(trimmed.to_string())),
        };

        let number: u8 = number.parse().map_err(|_| ParseTargetError(trimmed.to_string()))?;
        if number == 0 || number > MAX_SEGMENT {
            return Err(ParseTargetError(trimmed.to_string()));
        }

        match ring {
            "single" => Ok(Target::Single(number)),
            "double" => Ok(Target::Double(number)),
            "treble" | "triple" => Ok(Target::Treble(number)),
            _ => Err(ParseTargetError(trimmed.to_string())),
        }
    }
}

impl TryFrom<String> for Target {
    type Error = ParseTargetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Target> for String {
    fn from(target: Target) -> Self {
        target.to_string()
    }
}

/// Target for a 1-based round.
///
/// Fixed rotation is a pure function of the round index. Random mode is a
/// uniform draw from the configured set and consumes the supplied rng.
pub fn target_for_round<R: Rng + ?Sized>(mode: &TargetMode, round: u32, rng: &mut R) -> Target {
    match mode {
        TargetMode::FixedRotation => {
            let idx = (round.max(1) - 1) as usize % FIXED_ROTATION.len();
            FIXED_ROTATION[idx]
        }
        TargetMode::Random(choices) => {
            choices.choose(rng).copied().unwrap_or(CLASSIC_RANDOM_TARGETS[0])
        }
    }
}
