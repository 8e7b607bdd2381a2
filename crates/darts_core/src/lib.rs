//! # darts_core - Darts Challenge Match Engine
//!
//! Round-by-round scoring for a darts challenge game, independent of any
//! front end.
//!
//! ## Features
//! - One configurable rule set covering 10/30/40-round games, darts-used
//!   (lower wins) and points-scored (higher wins) scoring
//! - Bot opponents simulated with a level-scaled Gaussian draw
//! - Rankings with a configurable tie-break
//! - Top-10 high-score ledger with direction-aware merge
//! - Plain-data snapshots for export and resume
//!
//! ## Example
//!
//! ```
//! use darts_core::{Match, MatchConfig, MatchSetup};
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(1);
//! let config = MatchConfig::darts_challenge().with_total_rounds(3);
//! let mut game = Match::start(&MatchSetup::new(["Ann"]), config, &mut rng).unwrap();
//!
//! for darts in [3, 2, 4] {
//!     game.record_human_result("Ann", darts).unwrap();
//!     game.advance_round(&mut rng).unwrap();
//! }
//!
//! assert!(game.is_finished());
//! assert_eq!(game.rankings()[0].total, 9);
//! ```

pub mod bot;
pub mod config;
pub mod error;
pub mod ledger;
pub mod match_engine;
pub mod player;
pub mod session;
pub mod snapshot;
pub mod target;

pub use bot::{simulate_bot_result, BotLevel, BotProfile};
pub use config::{MatchConfig, ScoringDirection, TargetMode, TieBreak, Variant};
pub use error::{MatchError, Result};
pub use ledger::{HighScoreEntry, HighScoreLedger, LEDGER_CAPACITY};
pub use match_engine::{Match, MatchSetup, Ranking, RoundOutcome};
pub use player::{Competitor, CompetitorKind};
pub use session::{Session, SessionStatus};
pub use snapshot::{LedgerSnapshot, MatchSnapshot, SNAPSHOT_VERSION};
pub use target::{target_for_round, Target};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
