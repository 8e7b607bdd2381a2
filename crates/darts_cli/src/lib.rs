//! Darts Challenge terminal front end
//!
//! Access gate → player setup → round prompts → leaderboard file.
//! The match rules live in `darts_core`; this crate only does I/O.

pub mod access;
pub mod play;
pub mod save_code;
pub mod store;

pub use access::AccessGate;
pub use play::{play_match, write_ledger, write_rankings, PlayOutcome};
pub use save_code::SaveCodeError;
pub use store::{default_ledger_path, LedgerStore};

/// Name used when no player is given on the command line
pub const DEFAULT_PLAYER: &str = "Paul Philpot";
