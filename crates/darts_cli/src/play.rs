//! Interactive round loop over any line-based input and output

use anyhow::Result;
use darts_core::{
    HighScoreEntry, HighScoreLedger, Match, Ranking, ScoringDirection, Session,
};
use rand::Rng;
use std::io::{BufRead, Write};

use crate::save_code;

/// How an interactive match ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayOutcome {
    /// All rounds played; entries were recorded into the session ledger
    Completed(Vec<HighScoreEntry>),
    /// Player quit or input ended; the save code resumes the match
    Suspended { save_code: String },
}

enum Entry {
    Recorded,
    Skip,
    Quit,
}

fn value_label(direction: ScoringDirection) -> &'static str {
    match direction {
        ScoringDirection::DartsUsed => "darts used",
        ScoringDirection::PointsScored => "points",
    }
}

/// Play the session's current match to the end or until the player quits.
pub fn play_match<I, O, R>(session: &mut Session, input: &mut I, out: &mut O, rng: &mut R) -> Result<PlayOutcome>
where
    I: BufRead,
    O: Write,
    R: Rng + ?Sized,
{
    let game = session.match_mut()?;
    let direction = game.config().direction;

    while !game.is_finished() {
        let target = game.current_target().ok_or(darts_core::MatchError::MatchFinished)?;
        writeln!(out)?;
        writeln!(out, "Round {}/{} - Target: {}", game.round(), game.total_rounds(), target)?;

        let humans: Vec<String> = game.humans().map(|c| c.name.clone()).collect();
        for name in humans {
            if let Entry::Quit = prompt_entry(game, &name, input, out)? {
                let save_code = save_code::encode(&game.to_snapshot())?;
                writeln!(out, "Save code: {}", save_code)?;
                log::info!("Match suspended at round {}", game.round());
                return Ok(PlayOutcome::Suspended { save_code });
            }
        }

        let outcome = game.advance_round(rng)?;
        for name in &outcome.auto_filled {
            writeln!(out, "{} - no entry, counted as {}", name, game.config().auto_fill.unwrap_or_default())?;
        }
        for (name, value) in &outcome.bot_results {
            writeln!(out, "{} (bot) - {} {}", name, value, value_label(direction))?;
        }
        write_rankings(out, &game.rankings())?;
    }

    writeln!(out)?;
    writeln!(out, "Game Over!")?;
    write_rankings(out, &game.rankings())?;

    let entries = session.complete_match()?;
    writeln!(out, "Your score has been saved to the Top 10 Leaderboard!")?;
    Ok(PlayOutcome::Completed(entries))
}

/// Ask one player until a valid value, a skip (auto-fill) or quit arrives.
fn prompt_entry<I: BufRead, O: Write>(
    game: &mut Match,
    name: &str,
    input: &mut I,
    out: &mut O,
) -> Result<Entry> {
    let direction = game.config().direction;
    let auto_fill = game.config().auto_fill;
    let (min, max) = game.current_bound().unwrap_or((0, 0));

    loop {
        match auto_fill {
            Some(fill) => write!(out, "{} - {} [{}-{}, enter = {}]: ", name, value_label(direction), min, max, fill)?,
            None => write!(out, "{} - {} [{}-{}]: ", name, value_label(direction), min, max)?,
        }
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(Entry::Quit);
        }

        match line.trim().to_lowercase().as_str() {
            "" if auto_fill.is_some() => return Ok(Entry::Skip),
            "" => writeln!(out, "Please enter a value.")?,
            "quit" | "q" => return Ok(Entry::Quit),
            "save" => {
                let code = save_code::encode(&game.to_snapshot())?;
                writeln!(out, "Save code: {}", code)?;
            }
            text => match text.parse::<u32>() {
                Err(_) => writeln!(out, "'{}' is not a number.", text)?,
                Ok(value) => match game.record_human_result(name, value) {
                    Ok(()) => return Ok(Entry::Recorded),
                    Err(e) if e.is_recoverable() => writeln!(out, "{}", e)?,
                    Err(e) => return Err(e.into()),
                },
            },
        }
    }
}

pub fn write_rankings<O: Write>(out: &mut O, rankings: &[Ranking]) -> std::io::Result<()> {
    for row in rankings {
        let marker = if row.is_bot { " (bot)" } else { "" };
        writeln!(out, "{:>2}. {}{} - {}", row.rank, row.name, marker, row.total)?;
    }
    Ok(())
}

pub fn write_ledger<O: Write>(out: &mut O, ledger: &HighScoreLedger) -> std::io::Result<()> {
    writeln!(out, "Top 10 High Scores")?;
    if ledger.is_empty() {
        writeln!(out, "No scores yet. Play your first game!")?;
        return Ok(());
    }
    for (i, entry) in ledger.entries().iter().enumerate() {
        writeln!(out, "{:>2}. {:<20} {:>4}  {}", i + 1, entry.name, entry.score, entry.date)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use darts_core::{BotLevel, MatchConfig, MatchSetup};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::io::Cursor;

    fn run(config: MatchConfig, setup: MatchSetup, script: &str) -> (Session, PlayOutcome, String) {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut session = Session::new(config);
        session.start(&setup, &mut rng).unwrap();

        let mut input = Cursor::new(script.to_string());
        let mut out = Vec::new();
        let outcome = play_match(&mut session, &mut input, &mut out, &mut rng).unwrap();
        (session, outcome, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_full_match_records_ledger() {
        let config = MatchConfig::darts_challenge().with_total_rounds(3);
        let (session, outcome, text) = run(config, MatchSetup::new(["Ann"]), "3\n2\n4\n");

        match outcome {
            PlayOutcome::Completed(entries) => assert_eq!(entries[0].score, 9),
            other => panic!("expected completion, got {:?}", other),
        }
        assert_eq!(session.ledger().len(), 1);
        assert!(text.contains("Game Over!"));
        assert!(text.contains(" 1. Ann - 9"));
    }

    #[test]
    fn test_invalid_input_reprompts() {
        let config = MatchConfig::darts_challenge().with_total_rounds(1);
        let (_, outcome, text) = run(config, MatchSetup::new(["Ann"]), "abc\n12\n5\n");

        assert!(matches!(outcome, PlayOutcome::Completed(ref e) if e[0].score == 5));
        assert!(text.contains("'abc' is not a number."));
        assert!(text.contains("out of range"));
    }

    #[test]
    fn test_blank_line_uses_auto_fill() {
        let config = MatchConfig::darts_challenge().with_total_rounds(2);
        let (_, outcome, text) = run(config, MatchSetup::new(["Ann"]), "\n\n");

        assert!(matches!(outcome, PlayOutcome::Completed(ref e) if e[0].score == 6));
        assert!(text.contains("counted as 3"));
    }

    #[test]
    fn test_blank_line_without_auto_fill_reprompts() {
        let config = MatchConfig::points_30().with_total_rounds(1);
        let (_, outcome, text) = run(config, MatchSetup::new(["Ann"]), "\n20\n");

        assert!(matches!(outcome, PlayOutcome::Completed(ref e) if e[0].score == 20));
        assert!(text.contains("Please enter a value."));
    }

    #[test]
    fn test_quit_returns_resumable_code() {
        let config = MatchConfig::darts_challenge().with_total_rounds(5);
        let setup = MatchSetup::new(["Ann"]).with_bots(2, BotLevel::new(6).unwrap());
        let (session, outcome, _) = run(config, setup, "4\nquit\n");

        let code = match outcome {
            PlayOutcome::Suspended { save_code } => save_code,
            other => panic!("expected suspension, got {:?}", other),
        };
        let restored = Match::from_snapshot(&save_code::decode(&code).unwrap()).unwrap();
        assert_eq!(restored.round(), 2);
        assert_eq!(Some(&restored), session.current_match());
    }

    #[test]
    fn test_end_of_input_suspends() {
        let config = MatchConfig::darts_challenge().with_total_rounds(5);
        let (_, outcome, _) = run(config, MatchSetup::new(["Ann"]), "");
        assert!(matches!(outcome, PlayOutcome::Suspended { .. }));
    }

    #[test]
    fn test_write_ledger_empty() {
        let mut out = Vec::new();
        write_ledger(&mut out, &HighScoreLedger::new(ScoringDirection::DartsUsed)).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("No scores yet"));
    }
}
