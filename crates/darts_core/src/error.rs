use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("Invalid setup: {0}")]
    InvalidSetup(String),

    #[error("Value {value} for {player} is out of range ({min}..={max})")]
    OutOfRange { player: String, value: u32, min: u32, max: u32 },

    #[error("Malformed snapshot: {0}")]
    MalformedSnapshot(String),

    #[error("Unknown player: {0}")]
    UnknownPlayer(String),

    #[error("Round incomplete, missing results for: {}", .missing.join(", "))]
    RoundIncomplete { missing: Vec<String> },

    #[error("Match already finished")]
    MatchFinished,

    #[error("Match still in progress")]
    MatchInProgress,

    #[error("No active match")]
    NoActiveMatch,
}

impl MatchError {
    /// Every error is local to one call; the caller re-prompts or retries.
    pub fn is_recoverable(&self) -> bool {
        match self {
            MatchError::InvalidSetup(_) => true,
            MatchError::OutOfRange { .. } => true,
            MatchError::MalformedSnapshot(_) => true,
            MatchError::UnknownPlayer(_) => true,
            MatchError::RoundIncomplete { .. } => true,
            MatchError::MatchFinished => true,
            MatchError::MatchInProgress => true,
            MatchError::NoActiveMatch => true,
        }
    }
}

impl From<serde_json::Error> for MatchError {
    fn from(err: serde_json::Error) -> Self {
        MatchError::MalformedSnapshot(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_incomplete_message_lists_names() {
        let err = MatchError::RoundIncomplete { missing: vec!["Ann".into(), "Bob".into()] };
        assert_eq!(err.to_string(), "Round incomplete, missing results for: Ann, Bob");
    }

    #[test]
    fn test_json_error_maps_to_malformed_snapshot() {
        let err: MatchError = serde_json::from_str::<u32>("\"x\"").unwrap_err().into();
        assert!(matches!(err, MatchError::MalformedSnapshot(_)));
        assert!(err.is_recoverable());
    }
}
