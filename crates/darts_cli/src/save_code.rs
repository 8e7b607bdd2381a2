//! Copy/paste save codes: base64 of the snapshot JSON

use base64::{engine::general_purpose, Engine as _};
use darts_core::{MatchError, MatchSnapshot};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SaveCodeError {
    #[error("Save code is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("Save code is not valid text")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error(transparent)]
    Snapshot(#[from] MatchError),
}

pub fn encode(snapshot: &MatchSnapshot) -> Result<String, SaveCodeError> {
    let json = snapshot.to_json()?;
    Ok(general_purpose::STANDARD.encode(json.as_bytes()))
}

pub fn decode(code: &str) -> Result<MatchSnapshot, SaveCodeError> {
    // Pasted codes often pick up line breaks
    let compact: String = code.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = general_purpose::STANDARD.decode(compact)?;
    let json = String::from_utf8(bytes)?;
    Ok(MatchSnapshot::from_json(&json)?)
}
