//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Code | Domain    | Description                                  |
//! |------|-----------|----------------------------------------------|
//! | 0    | Universal | Success (issues found in the trees included) |
//! | 1    | Universal | General error (unspecified)                  |
//! | 2    | Universal | CLI usage error (bad args, bad criteria)     |
//! | 3    | compare   | Config file unreadable or invalid            |
//! | 4    | compare   | GEDCOM file unreadable or unparseable        |
//! | 5    | compare   | Anchor individual not found in a tree        |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into `CliError::from_compare` or the command's error handling

use gedcompare_recon::CompareError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - the comparison ran to completion or to a requested stop.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, malformed anchor criteria.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Compare (3-9)
// =============================================================================

/// Config file could not be read, parsed or validated.
pub const EXIT_INVALID_CONFIG: u8 = 3;

/// A GEDCOM file could not be read or failed strict parsing.
pub const EXIT_GEDCOM: u8 = 4;

/// The anchor criteria matched nobody in one or both trees.
pub const EXIT_ANCHOR_NOT_FOUND: u8 = 5;

/// Map an engine error to its exit code.
pub fn compare_exit_code(err: &CompareError) -> u8 {
    match err {
        CompareError::ConfigParse(_) | CompareError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
        CompareError::Criteria(_) => EXIT_USAGE,
        CompareError::Gedcom(_) => EXIT_GEDCOM,
        CompareError::AnchorNotFound { .. } => EXIT_ANCHOR_NOT_FOUND,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gedcompare_gedcom::{CriteriaError, GedcomError};

    #[test]
    fn codes_are_distinct() {
        let codes = [
            EXIT_SUCCESS,
            EXIT_ERROR,
            EXIT_USAGE,
            EXIT_INVALID_CONFIG,
            EXIT_GEDCOM,
            EXIT_ANCHOR_NOT_FOUND,
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn compare_errors_map_to_codes() {
        assert_eq!(
            compare_exit_code(&CompareError::AnchorNotFound { left: true, right: false }),
            EXIT_ANCHOR_NOT_FOUND
        );
        assert_eq!(
            compare_exit_code(&CompareError::Criteria(CriteriaError::Empty)),
            EXIT_USAGE
        );
        assert_eq!(
            compare_exit_code(&CompareError::ConfigValidation("x".into())),
            EXIT_INVALID_CONFIG
        );
        let syntax = GedcomError::Syntax { line: 3, message: "bad".into() };
        assert_eq!(compare_exit_code(&CompareError::Gedcom(syntax)), EXIT_GEDCOM);
    }
}
