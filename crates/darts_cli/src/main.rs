//! Darts Challenge CLI
//!
//! Play rounds in the terminal, keep a top-10 high-score file, move
//! unfinished matches around as save codes.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use darts_cli::{
    default_ledger_path, play_match, save_code, write_ledger, AccessGate, LedgerStore, PlayOutcome,
    DEFAULT_PLAYER,
};
use darts_core::{BotLevel, Match, MatchConfig, MatchSetup, Session, Variant};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "darts")]
#[command(about = "Darts Challenge: score rounds against the board and the bots", long_about = None)]
struct Cli {
    /// Shared access code (default: FREEPLAY2025)
    #[arg(long, global = true, env = "DARTS_ACCESS_CODE", hide_env_values = true)]
    access_code: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a match
    Play {
        /// Rule preset: darts, darts30, points30, points40 (default: DARTS_VARIANT or darts)
        #[arg(long)]
        variant: Option<Variant>,

        /// Human player name, repeat for up to 4 players
        #[arg(long = "player")]
        players: Vec<String>,

        /// Number of bot opponents
        #[arg(long, default_value_t = 0)]
        bots: usize,

        /// Bot skill level (1-20)
        #[arg(long, default_value_t = 10)]
        bot_level: u8,

        /// Override the preset's round count
        #[arg(long)]
        rounds: Option<u32>,

        /// High-score file (default: highscores-<mode><rounds>.json)
        #[arg(long)]
        ledger: Option<PathBuf>,

        /// Resume from a save code instead of starting fresh
        #[arg(long)]
        resume: Option<String>,

        /// Seed for reproducible targets and bots
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show the top 10 high scores
    Scores {
        /// Rule preset whose high scores to show (default: DARTS_VARIANT or darts)
        #[arg(long)]
        variant: Option<Variant>,

        /// Round count, when the preset's was overridden
        #[arg(long)]
        rounds: Option<u32>,

        /// High-score file, instead of the preset's default
        #[arg(long)]
        ledger: Option<PathBuf>,
    },

    /// Merge two high-score files, keeping each player's best
    Merge {
        /// First high-score file
        #[arg(long)]
        a: PathBuf,

        /// Second high-score file
        #[arg(long)]
        b: PathBuf,

        /// Output high-score file
        #[arg(long)]
        out: PathBuf,
    },

    /// Print the match stored in a save code as JSON
    Decode {
        /// Save code
        code: String,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout().lock();

    let gate = AccessGate::resolve(cli.access_code);
    if !gate.prompt(&mut input, &mut out)? {
        bail!("No access code entered");
    }

    match cli.command {
        Commands::Play { variant, players, bots, bot_level, rounds, ledger, resume, seed } => {
            let config = rules_for(variant, rounds);

            let mut rng = match seed {
                Some(seed) => ChaCha8Rng::seed_from_u64(seed),
                None => ChaCha8Rng::from_entropy(),
            };

            let (store, mut session) = match resume {
                Some(code) => {
                    let snapshot = save_code::decode(&code).context("Could not read save code")?;
                    let restored = Match::from_snapshot(&snapshot)?;
                    let rules = restored.config().clone();
                    let store = LedgerStore::new(ledger.unwrap_or_else(|| default_ledger_path(&rules)));
                    let mut session = Session::with_ledger(rules.clone(), store.load_or_new(&rules)?)?;
                    session.resume(restored)?;
                    writeln!(out, "Resuming at round {}", session.match_mut()?.round())?;
                    (store, session)
                }
                None => {
                    let store = LedgerStore::new(ledger.unwrap_or_else(|| default_ledger_path(&config)));
                    let ledger = store.load_or_new(&config)?;
                    let mut session = Session::with_ledger(config, ledger)?;
                    let players =
                        if players.is_empty() { vec![DEFAULT_PLAYER.to_string()] } else { players };
                    let setup =
                        MatchSetup::new(players).with_bots(bots, BotLevel::new(bot_level)?);
                    session.start(&setup, &mut rng)?;
                    (store, session)
                }
            };

            let rules = session.config().clone();
            writeln!(
                out,
                "{} rounds, {:?}. Enter 'save' for a save code, 'quit' to stop.",
                rules.total_rounds, rules.direction
            )?;

            match play_match(&mut session, &mut input, &mut out, &mut rng)? {
                PlayOutcome::Completed(_) => {
                    store.save(session.ledger())?;
                    writeln!(out)?;
                    write_ledger(&mut out, session.ledger())?;
                }
                PlayOutcome::Suspended { .. } => {
                    writeln!(out, "Resume later with: darts play --resume <save code>")?;
                }
            }
        }

        Commands::Scores { variant, rounds, ledger } => {
            let config = rules_for(variant, rounds);
            let store = LedgerStore::new(ledger.unwrap_or_else(|| default_ledger_path(&config)));
            match store.load()? {
                Some(ledger) => write_ledger(&mut out, &ledger)?,
                None => writeln!(out, "No scores yet. Play your first game!")?,
            }
        }

        Commands::Merge { a, b, out: target } => {
            let first = LedgerStore::new(a).load()?.context("First high-score file not found")?;
            let second = LedgerStore::new(b).load()?.context("Second high-score file not found")?;
            let merged = first.merge(&second)?;

            LedgerStore::new(&target).save(&merged)?;
            writeln!(out, "Merged {} entries into {}", merged.len(), target.display())?;
            write_ledger(&mut out, &merged)?;
        }

        Commands::Decode { code } => {
            let snapshot = save_code::decode(&code)?;
            writeln!(out, "{}", serde_json::to_string_pretty(&snapshot)?)?;
        }
    }

    Ok(())
}

fn rules_for(variant: Option<Variant>, rounds: Option<u32>) -> MatchConfig {
    let config = variant.map(|v| v.config()).unwrap_or_else(MatchConfig::from_env_or_default);
    match rounds {
        Some(rounds) => config.with_total_rounds(rounds),
        None => config,
    }
}
