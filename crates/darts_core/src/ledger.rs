//! Top-10 high-score ledger
//!
//! Entries are kept sorted best-first according to the ledger's scoring
//! direction. Recording appends then re-sorts and truncates, so results from
//! the same player may appear more than once. Merging keeps one entry per name.
//!
//! A ledger may be tied to a round count so totals from 10-round and 30-round
//! games never share one list.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::{MatchConfig, ScoringDirection};
use crate::error::{MatchError, Result};

pub const LEDGER_CAPACITY: usize = 10;

/// One finished-match result of a human player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u32,
    pub date: NaiveDate,
}

impl HighScoreEntry {
    pub fn new(name: impl Into<String>, score: u32, date: NaiveDate) -> Self {
        Self { name: name.into(), score, date }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreLedger {
    direction: ScoringDirection,
    total_rounds: Option<u32>,
    entries: Vec<HighScoreEntry>,
}

impl HighScoreLedger {
    /// Empty ledger not tied to any round count
    pub fn new(direction: ScoringDirection) -> Self {
        Self { direction, total_rounds: None, entries: Vec::new() }
    }

    /// Empty ledger for results of matches played under `config`
    pub fn for_config(config: &MatchConfig) -> Self {
        Self::new(config.direction).with_total_rounds(Some(config.total_rounds))
    }

    pub fn with_total_rounds(mut self, total_rounds: Option<u32>) -> Self {
        self.total_rounds = total_rounds;
        self
    }

    pub fn direction(&self) -> ScoringDirection {
        self.direction
    }

    /// Round count of the matches this ledger ranks, `None` if unscoped
    pub fn total_rounds(&self) -> Option<u32> {
        self.total_rounds
    }

    /// Whether results of a match under `config` belong on this ledger.
    /// An unscoped ledger accepts any round count.
    pub fn accepts(&self, config: &MatchConfig) -> bool {
        self.direction == config.direction
            && self.total_rounds.map_or(true, |rounds| rounds == config.total_rounds)
    }

    /// Best-first entries, at most [`LEDGER_CAPACITY`]
    pub fn entries(&self) -> &[HighScoreEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append results, re-sort and keep the best ten.
    ///
    /// The sort is stable: equal scores keep their insertion order, so an
    /// older entry stays ahead of a newer one with the same score.
    pub fn record(&mut self, entries: impl IntoIterator<Item = HighScoreEntry>) {
        let before = self.entries.len();
        self.entries.extend(entries);
        let added = self.entries.len() - before;

        let direction = self.direction;
        self.entries.sort_by(|a, b| direction.compare(a.score, b.score));
        self.entries.truncate(LEDGER_CAPACITY);

        log::info!("Recorded {} high-score entries, ledger now holds {}", added, self.entries.len());
    }

    /// Best entry per name from both ledgers, sorted and capped.
    ///
    /// Equal scores for the same name keep the earlier date. The output order
    /// is fully determined by the entries (score, then date, then name), so
    /// `a.merge(b) == b.merge(a)`.
    pub fn merge(&self, other: &HighScoreLedger) -> Result<HighScoreLedger> {
        if self.direction != other.direction {
            return Err(MatchError::InvalidSetup(format!(
                "cannot merge a {:?} ledger with a {:?} ledger",
                self.direction, other.direction
            )));
        }
        let total_rounds = match (self.total_rounds, other.total_rounds) {
            (Some(a), Some(b)) if a != b => {
                return Err(MatchError::InvalidSetup(format!(
                    "cannot merge a {}-round ledger with a {}-round ledger",
                    a, b
                )));
            }
            (a, b) => a.or(b),
        };

        let direction = self.direction;
        let mut best: BTreeMap<&str, &HighScoreEntry> = BTreeMap::new();
        for entry in self.entries.iter().chain(other.entries.iter()) {
            let keep = match best.get(entry.name.as_str()) {
                None => true,
                Some(current) => {
                    direction.is_better(entry.score, current.score)
                        || (entry.score == current.score && entry.date < current.date)
                }
            };
            if keep {
                best.insert(entry.name.as_str(), entry);
            }
        }

        let mut entries: Vec<HighScoreEntry> = best.into_values().cloned().collect();
        entries.sort_by(|a, b| {
            direction
                .compare(a.score, b.score)
                .then_with(|| a.date.cmp(&b.date))
                .then_with(|| a.name.cmp(&b.name))
        });
        entries.truncate(LEDGER_CAPACITY);

        Ok(HighScoreLedger { direction, total_rounds, entries })
    }

    pub fn best_for(&self, name: &str) -> Option<&HighScoreEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Whether a score would make it onto the ledger if recorded now
    pub fn qualifies(&self, score: u32) -> bool {
        if self.entries.len() < LEDGER_CAPACITY {
            return true;
        }
        self.entries.last().map_or(true, |worst| self.direction.is_better(score, worst.score))
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Rebuild from stored entries, restoring order and capacity.
    pub fn from_entries(direction: ScoringDirection, entries: Vec<HighScoreEntry>) -> Self {
        let mut ledger = Self::new(direction);
        ledger.entries = entries;
        ledger.entries.sort_by(|a, b| direction.compare(a.score, b.score));
        ledger.entries.truncate(LEDGER_CAPACITY);
        ledger
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn entry(name: &str, score: u32) -> HighScoreEntry {
        HighScoreEntry::new(name, score, day(1))
    }

    fn full_darts_ledger() -> HighScoreLedger {
        let mut ledger = HighScoreLedger::new(ScoringDirection::DartsUsed);
        let scores = [5, 5, 6, 7, 8, 9, 10, 11, 12, 14];
        ledger.record(scores.iter().enumerate().map(|(i, s)| entry(&format!("P{}", i), *s)));
        ledger
    }

    #[test]
    fn test_new_best_evicts_worst() {
        let mut ledger = full_darts_ledger();
        assert_eq!(ledger.len(), 10);

        ledger.record(vec![entry("Ace", 1)]);

        assert_eq!(ledger.len(), 10);
        assert_eq!(ledger.entries()[0].name, "Ace");
        assert_eq!(ledger.entries()[0].score, 1);
        assert!(ledger.entries().iter().all(|e| e.score != 14));
    }

    #[test]
    fn test_points_ledger_sorts_descending() {
        // Ledger order follows the scoring direction, also for points games.
        let mut ledger = HighScoreLedger::new(ScoringDirection::PointsScored);
        ledger.record(vec![entry("Low", 100), entry("High", 300), entry("Mid", 200)]);
        let names: Vec<&str> = ledger.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["High", "Mid", "Low"]);
    }

    #[test]
    fn test_equal_scores_keep_insertion_order() {
        let mut ledger = HighScoreLedger::new(ScoringDirection::DartsUsed);
        ledger.record(vec![entry("First", 20)]);
        ledger.record(vec![entry("Second", 20)]);
        assert_eq!(ledger.entries()[0].name, "First");
    }

    #[test]
    fn test_record_keeps_duplicates_per_name() {
        let mut ledger = HighScoreLedger::new(ScoringDirection::DartsUsed);
        ledger.record(vec![entry("Ann", 30), entry("Ann", 25)]);
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.best_for("Ann").map(|e| e.score), Some(25));
    }

    #[test]
    fn test_qualifies() {
        let ledger = full_darts_ledger();
        assert!(ledger.qualifies(13));
        assert!(!ledger.qualifies(14));
        assert!(!ledger.qualifies(40));
        assert!(HighScoreLedger::new(ScoringDirection::DartsUsed).qualifies(90));
    }

    #[test]
    fn test_merge_keeps_best_per_name() {
        let mut a = HighScoreLedger::new(ScoringDirection::PointsScored);
        a.record(vec![entry("Ann", 150), entry("Bob", 90)]);
        let mut b = HighScoreLedger::new(ScoringDirection::PointsScored);
        b.record(vec![entry("Ann", 120), entry("Bob", 110), entry("Cat", 100)]);

        let merged = a.merge(&b).unwrap();
        let view: Vec<(&str, u32)> =
            merged.entries().iter().map(|e| (e.name.as_str(), e.score)).collect();
        assert_eq!(view, [("Ann", 150), ("Bob", 110), ("Cat", 100)]);
    }

    #[test]
    fn test_merge_equal_scores_keep_earlier_date() {
        let mut a = HighScoreLedger::new(ScoringDirection::DartsUsed);
        a.record(vec![HighScoreEntry::new("Ann", 30, day(9))]);
        let mut b = HighScoreLedger::new(ScoringDirection::DartsUsed);
        b.record(vec![HighScoreEntry::new("Ann", 30, day(2))]);

        assert_eq!(a.merge(&b).unwrap().entries()[0].date, day(2));
        assert_eq!(b.merge(&a).unwrap().entries()[0].date, day(2));
    }

    #[test]
    fn test_merge_rejects_mixed_directions() {
        let a = HighScoreLedger::new(ScoringDirection::DartsUsed);
        let b = HighScoreLedger::new(ScoringDirection::PointsScored);
        assert!(matches!(a.merge(&b), Err(MatchError::InvalidSetup(_))));
    }

    #[test]
    fn test_merge_rejects_mixed_round_counts() {
        let a = HighScoreLedger::for_config(&MatchConfig::darts_challenge());
        let b = HighScoreLedger::for_config(&MatchConfig::darts_30());
        assert!(matches!(a.merge(&b), Err(MatchError::InvalidSetup(_))));
    }

    #[test]
    fn test_merge_with_unscoped_keeps_round_count() {
        let scoped = HighScoreLedger::for_config(&MatchConfig::points_40());
        let unscoped = HighScoreLedger::new(ScoringDirection::PointsScored);
        assert_eq!(scoped.merge(&unscoped).unwrap().total_rounds(), Some(40));
        assert_eq!(unscoped.merge(&scoped).unwrap().total_rounds(), Some(40));
    }

    #[test]
    fn test_accepts_matching_rules_only() {
        let ledger = HighScoreLedger::for_config(&MatchConfig::darts_challenge());
        assert!(ledger.accepts(&MatchConfig::darts_challenge()));
        assert!(!ledger.accepts(&MatchConfig::darts_30()));
        assert!(!ledger.accepts(&MatchConfig::points_30()));

        let unscoped = HighScoreLedger::new(ScoringDirection::DartsUsed);
        assert!(unscoped.accepts(&MatchConfig::darts_30()));
    }

    #[test]
    fn test_reset() {
        let mut ledger = full_darts_ledger();
        ledger.reset();
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_from_entries_restores_order_and_cap() {
        let entries: Vec<HighScoreEntry> =
            (0..15).map(|i| entry(&format!("P{}", i), 50 - i)).collect();
        let ledger = HighScoreLedger::from_entries(ScoringDirection::DartsUsed, entries);
        assert_eq!(ledger.len(), LEDGER_CAPACITY);
        assert_eq!(ledger.entries()[0].score, 36);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn arb_ledger(direction: ScoringDirection) -> impl Strategy<Value = HighScoreLedger> {
            prop::collection::vec((0usize..6, 0u32..60, 1u32..28), 0..14).prop_map(move |raw| {
                let mut ledger = HighScoreLedger::new(direction);
                ledger.record(
                    raw.into_iter()
                        .map(|(n, s, d)| HighScoreEntry::new(format!("P{}", n), s, day(d))),
                );
                ledger
            })
        }

        proptest! {
            /// Property: no sequence of record calls grows the ledger past capacity
            #[test]
            fn prop_record_never_exceeds_capacity(
                batches in prop::collection::vec(prop::collection::vec(0u32..100, 0..8), 0..10)
            ) {
                let mut ledger = HighScoreLedger::new(ScoringDirection::DartsUsed);
                for batch in batches {
                    ledger.record(batch.into_iter().map(|s| entry("X", s)));
                    prop_assert!(ledger.len() <= LEDGER_CAPACITY);
                }
                let scores: Vec<u32> = ledger.entries().iter().map(|e| e.score).collect();
                prop_assert!(scores.windows(2).all(|w| w[0] <= w[1]));
            }

            /// Property: merge is commutative
            #[test]
            fn prop_merge_commutative(
                a in arb_ledger(ScoringDirection::PointsScored),
                b in arb_ledger(ScoringDirection::PointsScored)
            ) {
                prop_assert_eq!(a.merge(&b).unwrap(), b.merge(&a).unwrap());
            }

            /// Property: merge is associative
            #[test]
            fn prop_merge_associative(
                a in arb_ledger(ScoringDirection::DartsUsed),
                b in arb_ledger(ScoringDirection::DartsUsed),
                c in arb_ledger(ScoringDirection::DartsUsed)
            ) {
                let left = a.merge(&b).unwrap().merge(&c).unwrap();
                let right = a.merge(&b.merge(&c).unwrap()).unwrap();
                prop_assert_eq!(left, right);
            }
        }
    }
}
