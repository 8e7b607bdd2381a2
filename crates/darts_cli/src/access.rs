//! Shared-secret access gate

use std::io::{BufRead, Write};

pub const ACCESS_CODE_ENV: &str = "DARTS_ACCESS_CODE";
pub const DEFAULT_ACCESS_CODE: &str = "FREEPLAY2025";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGate {
    code: String,
}

impl AccessGate {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into().trim().to_string() }
    }

    /// Explicit code, else DARTS_ACCESS_CODE, else the default
    pub fn resolve(explicit: Option<String>) -> Self {
        let code = explicit
            .or_else(|| std::env::var(ACCESS_CODE_ENV).ok())
            .filter(|code| !code.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ACCESS_CODE.to_string());
        Self::new(code)
    }

    pub fn check(&self, attempt: &str) -> bool {
        attempt.trim() == self.code
    }

    /// Prompt until the right code is entered. `false` on end of input.
    pub fn prompt<I: BufRead, O: Write>(&self, input: &mut I, out: &mut O) -> std::io::Result<bool> {
        writeln!(out, "Welcome to Darts Challenge")?;
        loop {
            write!(out, "Access code: ")?;
            out.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                return Ok(false);
            }

            if self.check(&line) {
                writeln!(out, "Access granted. Welcome!")?;
                return Ok(true);
            }

            log::warn!("Rejected access attempt");
            writeln!(out, "Invalid access code.")?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_check_trims_input() {
        let gate = AccessGate::new("SECRET");
        assert!(gate.check("  SECRET\n"));
        assert!(!gate.check("secret"));
        assert!(!gate.check(""));
    }

    #[test]
    fn test_resolve_prefers_explicit_code() {
        let gate = AccessGate::resolve(Some("LETMEIN".into()));
        assert!(gate.check("LETMEIN"));
    }

    #[test]
    fn test_prompt_retries_until_correct() {
        let gate = AccessGate::new("OCHE");
        let mut input = Cursor::new("nope\nOCHE\n");
        let mut out = Vec::new();

        assert!(gate.prompt(&mut input, &mut out).unwrap());
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Invalid access code."));
        assert!(text.contains("Access granted"));
    }

    #[test]
    fn test_prompt_end_of_input() {
        let gate = AccessGate::new("OCHE");
        let mut input = Cursor::new("wrong\n");
        let mut out = Vec::new();
        assert!(!gate.prompt(&mut input, &mut out).unwrap());
    }
}
