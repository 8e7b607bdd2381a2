//! # Bot opponents
//!
//! A bot's round result is one Gaussian draw. The mean slides linearly with
//! skill level between two endpoints, the spread is fixed per scoring mode,
//! and the draw is rounded and clamped into the round's valid range.
//!
//! | Mode | Target | Level 1 mean | Level 20 mean | Sigma | Clamp |
//! |------|--------|--------------|---------------|-------|-------|
//! | Darts used | any | 3.6 | 1.2 | 1.0 | 1..=9 |
//! | Points | Bullseye | 2 | 16 | 3.0 | 0..=18 |
//! | Points | Segment | 3 | 24 | 3.0 | 0..=27 |

use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ScoringDirection;
use crate::error::{MatchError, Result};
use crate::target::Target;

pub const MIN_BOT_LEVEL: u8 = 1;
pub const MAX_BOT_LEVEL: u8 = 20;

/// Fictional names bots are drawn from (without replacement)
pub const BOT_NAME_POOL: [&str; 16] = [
    "Dart Vader",
    "Robo Raymond",
    "Circuit Cross",
    "Byte Barney",
    "Silicon Sid",
    "Pixel Phil",
    "Tungsten Tina",
    "Flight Fergus",
    "Oche Otto",
    "Chip Checkout",
    "Bullseye Bella",
    "Treble Trevor",
    "Madame Marker",
    "Captain Cork",
    "Sparky Segment",
    "Neon Nigel",
];

/// Bot skill level, always within 1..=20
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct BotLevel(u8);

impl BotLevel {
    pub fn new(level: u8) -> Result<Self> {
        if (MIN_BOT_LEVEL..=MAX_BOT_LEVEL).contains(&level) {
            Ok(Self(level))
        } else {
            Err(MatchError::InvalidSetup(format!(
                "bot level {} outside {}..={}",
                level, MIN_BOT_LEVEL, MAX_BOT_LEVEL
            )))
        }
    }

    pub fn get(&self) -> u8 {
        self.0
    }

    /// Position of the level between weakest (0.0) and strongest (1.0)
    pub fn fraction(&self) -> f64 {
        f64::from(self.0 - MIN_BOT_LEVEL) / f64::from(MAX_BOT_LEVEL - MIN_BOT_LEVEL)
    }
}

impl Default for BotLevel {
    fn default() -> Self {
        Self(10)
    }
}

impl TryFrom<u8> for BotLevel {
    type Error = MatchError;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<BotLevel> for u8 {
    fn from(level: BotLevel) -> Self {
        level.0
    }
}

impl fmt::Display for BotLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Distribution parameters for one (mode, target kind) pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BotProfile {
    /// Mean result at level 1
    pub weakest_mean: f64,
    /// Mean result at level 20
    pub strongest_mean: f64,
    pub sigma: f64,
    pub min: u32,
    pub max: u32,
}

impl BotProfile {
    pub fn for_target(direction: ScoringDirection, target: Target) -> Self {
        let (min, max) = target.valid_range(direction);
        match direction {
            ScoringDirection::DartsUsed => {
                Self { weakest_mean: 3.6, strongest_mean: 1.2, sigma: 1.0, min, max }
            }
            ScoringDirection::PointsScored if target.is_bullseye() => {
                Self { weakest_mean: 2.0, strongest_mean: 16.0, sigma: 3.0, min, max }
            }
            ScoringDirection::PointsScored => {
                Self { weakest_mean: 3.0, strongest_mean: 24.0, sigma: 3.0, min, max }
            }
        }
    }

    pub fn mean(&self, level: BotLevel) -> f64 {
        self.weakest_mean + (self.strongest_mean - self.weakest_mean) * level.fraction()
    }
}

/// Simulated result of one bot for one round.
pub fn simulate_bot_result<R: Rng + ?Sized>(
    level: BotLevel,
    target: Target,
    direction: ScoringDirection,
    rng: &mut R,
) -> u32 {
    let profile = BotProfile::for_target(direction, target);
    let z: f64 = StandardNormal.sample(rng);
    let raw = profile.mean(level) + profile.sigma * z;

    raw.round().clamp(f64::from(profile.min), f64::from(profile.max)) as u32
}

/// Draw `count` distinct bot names, skipping any name already taken.
pub fn sample_bot_names<R: Rng + ?Sized>(
    count: usize,
    taken: &[String],
    rng: &mut R,
) -> Result<Vec<String>> {
    let available: Vec<&str> = BOT_NAME_POOL
        .iter()
        .copied()
        .filter(|name| !taken.iter().any(|t| t.eq_ignore_ascii_case(name)))
        .collect();

    if count > available.len() {
        return Err(MatchError::InvalidSetup(format!(
            "{} bots requested but only {} bot names are available",
            count,
            available.len()
        )));
    }

    Ok(available.choose_multiple(rng, count).map(|name| name.to_string()).collect())
}
