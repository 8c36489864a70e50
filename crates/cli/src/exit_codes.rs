//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                                   |
//! |------|-----------------------------------------------------------|
//! | 0    | Success                                                   |
//! | 1    | General error (unspecified)                               |
//! | 2    | CLI usage error (bad args, missing file)                  |
//! | 3    | Reconciliation aborted (insufficient or unresolved data)  |
//! | 4    | Operator cancelled the session                            |
//! | 5    | Input parse error (CSV, KML, WKT)                         |
//! | 6    | I/O error                                                 |
//! | 7    | Invalid configuration                                     |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into `exit_code_for` or the relevant command

use flightcheck_recon::{AbortReason, SurveyError};

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Reconciliation ended without alignment: fewer captures than waypoints with
/// nothing left to remove, or excess captures with no duplicate named.
pub const EXIT_ABORTED: u8 = 3;

/// The operator typed `abort`/`quit` or closed stdin.
pub const EXIT_CANCELLED: u8 = 4;

/// A point table, mission or geometry could not be parsed.
pub const EXIT_PARSE: u8 = 5;

/// File read/write/delete failure.
pub const EXIT_IO: u8 = 6;

/// Config file failed to parse or validate.
pub const EXIT_INVALID_CONFIG: u8 = 7;

/// Map a library error onto the registry.
pub fn exit_code_for(err: &SurveyError) -> u8 {
    match err {
        SurveyError::ConfigParse(_) | SurveyError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
        SurveyError::DuplicateName { .. }
        | SurveyError::InvalidName { .. }
        | SurveyError::MissingColumn { .. }
        | SurveyError::CoordinateParse { .. }
        | SurveyError::Geo(_) => EXIT_PARSE,
        SurveyError::Io(_) => EXIT_IO,
        SurveyError::Cancelled => EXIT_CANCELLED,
        SurveyError::LengthMismatch { .. }
        | SurveyError::Unsorted(_)
        | SurveyError::ReportLength { .. } => EXIT_ERROR,
    }
}

pub fn exit_code_for_abort(reason: AbortReason) -> u8 {
    match reason {
        AbortReason::Cancelled => EXIT_CANCELLED,
        AbortReason::InsufficientCaptures | AbortReason::UnresolvedExcess => EXIT_ABORTED,
    }
}
