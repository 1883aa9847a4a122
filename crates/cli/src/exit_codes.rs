//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract. Scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success (an empty result is a success)   |
//! | 2       | Universal        | CLI usage error (bad args)               |
//! | 60-69   | match            | Swap match run/validate codes            |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use swapmatch_recon::MatchError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Match (60-69)
// =============================================================================

/// Config file failed to parse or validate.
pub const EXIT_MATCH_INVALID_CONFIG: u8 = 60;

/// Runtime failure: unreadable input, missing required column, write error.
pub const EXIT_MATCH_RUNTIME: u8 = 61;

/// Input directory contains no files matching the pattern.
pub const EXIT_MATCH_NO_INPUT: u8 = 62;

/// Map an engine error to its exit code.
pub fn match_exit_code(err: &MatchError) -> u8 {
    match err {
        MatchError::ConfigParse(_) | MatchError::ConfigValidation(_) => EXIT_MATCH_INVALID_CONFIG,
        MatchError::MissingColumn { .. } | MatchError::Csv { .. } | MatchError::Io(_) => {
            EXIT_MATCH_RUNTIME
        }
    }
}
