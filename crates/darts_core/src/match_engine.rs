//! # Match engine
//!
//! Owns one match from setup to the final whistle: round counter, every
//! competitor's result history and the target of each round.
//!
//! Round flow:
//! 1. [`Match::start`] validates the setup, samples bots and draws the round-1 target
//! 2. [`Match::record_human_result`] stores each human's value for the current round
//! 3. [`Match::advance_round`] locks the round (auto-fill, bot simulation) and moves on
//! 4. once the last round is locked the match is terminal and
//!    [`Match::finalize_match`] yields one high-score entry per human
//!
//! Randomness is always passed in by the caller so a seeded rng replays a
//! match exactly.

use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::bot::{sample_bot_names, simulate_bot_result, BotLevel};
use crate::config::{MatchConfig, TieBreak};
use crate::error::{MatchError, Result};
use crate::ledger::HighScoreEntry;
use crate::player::Competitor;
use crate::target::{target_for_round, Target};

/// Who is playing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchSetup {
    /// Human names; blank entries are ignored
    pub player_names: Vec<String>,
    pub bot_count: usize,
    pub bot_level: BotLevel,
}

impl MatchSetup {
    pub fn new(player_names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            player_names: player_names.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn with_bots(mut self, bot_count: usize, bot_level: BotLevel) -> Self {
        self.bot_count = bot_count;
        self.bot_level = bot_level;
        self
    }
}

/// One row of the leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ranking {
    /// 1-based position
    pub rank: usize,
    pub name: String,
    pub total: u32,
    pub is_bot: bool,
    pub rounds_played: usize,
}

/// What happened when a round was locked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundOutcome {
    pub round: u32,
    pub target: Target,
    /// Names that received the auto-fill value
    pub auto_filled: Vec<String>,
    /// Simulated (name, value) per bot
    pub bot_results: Vec<(String, u32)>,
    pub finished: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    config: MatchConfig,
    /// 1-based; `total_rounds + 1` once finished
    round: u32,
    competitors: Vec<Competitor>,
    /// `targets[i]` is the target of round `i + 1`
    targets: Vec<Target>,
    finished: bool,
}

impl Match {
    pub fn start<R: Rng + ?Sized>(setup: &MatchSetup, config: MatchConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;

        let humans: Vec<String> = setup
            .player_names
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();

        if humans.is_empty() {
            return Err(MatchError::InvalidSetup("at least one player is required".into()));
        }

        if humans.len() > config.max_human_players {
            return Err(MatchError::InvalidSetup(format!(
                "{} players given, at most {} allowed",
                humans.len(),
                config.max_human_players
            )));
        }

        for (i, name) in humans.iter().enumerate() {
            if humans[..i].iter().any(|other| other.eq_ignore_ascii_case(name)) {
                return Err(MatchError::InvalidSetup(format!("duplicate player name '{}'", name)));
            }
        }

        let bot_names = sample_bot_names(setup.bot_count, &humans, rng)?;

        let mut competitors: Vec<Competitor> = humans.into_iter().map(Competitor::human).collect();
        competitors.extend(bot_names.into_iter().map(|name| Competitor::bot(name, setup.bot_level)));

        let first_target = target_for_round(&config.target_mode, 1, rng);

        log::info!(
            "Match started: {} competitors ({} bots, level {}), {} rounds, {:?}",
            competitors.len(),
            setup.bot_count,
            setup.bot_level,
            config.total_rounds,
            config.direction
        );

        Ok(Self { config, round: 1, competitors, targets: vec![first_target], finished: false })
    }

    pub(crate) fn from_parts(
        config: MatchConfig,
        round: u32,
        competitors: Vec<Competitor>,
        targets: Vec<Target>,
    ) -> Self {
        let finished = round > config.total_rounds;
        Self { config, round, competitors, targets, finished }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Current 1-based round index
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn total_rounds(&self) -> u32 {
        self.config.total_rounds
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn competitors(&self) -> &[Competitor] {
        &self.competitors
    }

    pub fn competitor(&self, name: &str) -> Option<&Competitor> {
        let name = name.trim();
        self.competitors.iter().find(|c| c.name == name)
    }

    pub fn humans(&self) -> impl Iterator<Item = &Competitor> {
        self.competitors.iter().filter(|c| !c.is_bot())
    }

    pub fn bots(&self) -> impl Iterator<Item = &Competitor> {
        self.competitors.iter().filter(|c| c.is_bot())
    }

    /// Targets of every round drawn so far
    pub fn target_history(&self) -> &[Target] {
        &self.targets
    }

    /// Target of the round being played, `None` after the last round
    pub fn current_target(&self) -> Option<Target> {
        if self.finished {
            None
        } else {
            self.targets.get(self.round as usize - 1).copied()
        }
    }

    /// Inclusive range a result may take this round
    pub fn current_bound(&self) -> Option<(u32, u32)> {
        self.current_target().map(|t| t.valid_range(self.config.direction))
    }

    /// Humans with no result entered for the current round
    pub fn missing_results(&self) -> Vec<String> {
        if self.finished {
            return Vec::new();
        }
        let locked = self.round as usize - 1;
        self.humans().filter(|c| c.history.len() <= locked).map(|c| c.name.clone()).collect()
    }

    /// Set a human's result for the current round.
    ///
    /// Entering a second value in the same round replaces the first.
    pub fn record_human_result(&mut self, player: &str, value: u32) -> Result<()> {
        if self.finished {
            return Err(MatchError::MatchFinished);
        }

        let (min, max) = self.current_bound().ok_or(MatchError::MatchFinished)?;
        let locked = self.round as usize - 1;
        let name = player.trim();

        let competitor = self
            .competitors
            .iter_mut()
            .find(|c| c.name == name && !c.is_bot())
            .ok_or_else(|| MatchError::UnknownPlayer(name.to_string()))?;

        if !(min..=max).contains(&value) {
            return Err(MatchError::OutOfRange { player: competitor.name.clone(), value, min, max });
        }

        if competitor.history.len() > locked {
            competitor.history[locked] = value;
        } else {
            competitor.history.push(value);
        }

        log::debug!("Round {}: {} entered {}", self.round, competitor.name, value);
        Ok(())
    }

    /// Lock the current round and move to the next one.
    pub fn advance_round<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<RoundOutcome> {
        if self.finished {
            return Err(MatchError::MatchFinished);
        }

        let target = self.current_target().ok_or(MatchError::MatchFinished)?;
        let missing = self.missing_results();
        let auto_filled = match (missing.is_empty(), self.config.auto_fill) {
            (true, _) => Vec::new(),
            (false, Some(fill)) => {
                for competitor in self.competitors.iter_mut().filter(|c| missing.contains(&c.name)) {
                    competitor.history.push(fill);
                }
                log::debug!("Round {}: auto-filled {} for {:?}", self.round, fill, missing);
                missing
            }
            (false, None) => return Err(MatchError::RoundIncomplete { missing }),
        };

        let direction = self.config.direction;
        let mut bot_results = Vec::new();
        for competitor in self.competitors.iter_mut() {
            if let Some(level) = competitor.level() {
                let value = simulate_bot_result(level, target, direction, rng);
                competitor.history.push(value);
                bot_results.push((competitor.name.clone(), value));
            }
        }

        let locked_round = self.round;
        self.round += 1;
        if self.round > self.config.total_rounds {
            self.finished = true;
            log::info!("Match finished after {} rounds", self.config.total_rounds);
        } else {
            self.targets.push(target_for_round(&self.config.target_mode, self.round, rng));
        }

        Ok(RoundOutcome {
            round: locked_round,
            target,
            auto_filled,
            bot_results,
            finished: self.finished,
        })
    }

    /// Everyone ordered best-first.
    ///
    /// Totals are compared in the match's scoring direction. Equal totals fall
    /// back to the configured [`TieBreak`]; the default is name ascending.
    pub fn rankings(&self) -> Vec<Ranking> {
        let direction = self.config.direction;
        let tie_break = self.config.tie_break;

        let mut ordered: Vec<&Competitor> = self.competitors.iter().collect();
        ordered.sort_by(|a, b| {
            let by_total = direction.compare(a.total(), b.total());
            let by_rounds = match tie_break {
                TieBreak::Name => std::cmp::Ordering::Equal,
                TieBreak::RoundsPlayedThenName => b.rounds_played().cmp(&a.rounds_played()),
            };
            by_total.then(by_rounds).then_with(|| a.name.cmp(&b.name))
        });

        ordered
            .into_iter()
            .enumerate()
            .map(|(i, c)| Ranking {
                rank: i + 1,
                name: c.name.clone(),
                total: c.total(),
                is_bot: c.is_bot(),
                rounds_played: c.rounds_played(),
            })
            .collect()
    }

    /// High-score entries dated today.
    pub fn finalize_match(&self) -> Result<Vec<HighScoreEntry>> {
        self.finalize_match_on(chrono::Local::now().date_naive())
    }

    /// One entry per human with their final total.
    pub fn finalize_match_on(&self, date: NaiveDate) -> Result<Vec<HighScoreEntry>> {
        if !self.finished {
            return Err(MatchError::MatchInProgress);
        }

        Ok(self.humans().map(|c| HighScoreEntry::new(c.name.clone(), c.total(), date)).collect())
    }
}
