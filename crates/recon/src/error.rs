use gedcompare_gedcom::{CriteriaError, GedcomError};

#[derive(Debug, thiserror::Error)]
pub enum CompareError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// Config validation error (empty path, bad limit, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),

    #[error("invalid anchor criteria: {0}")]
    Criteria(#[from] CriteriaError),

    #[error(transparent)]
    Gedcom(#[from] GedcomError),

    /// The anchor criteria matched nobody in one or both trees.
    #[error("{}", anchor_message(*left, *right))]
    AnchorNotFound { left: bool, right: bool },
}

fn anchor_message(left: bool, right: bool) -> String {
    match (left, right) {
        (true, true) => "could not find individual in GEDCOM 1 or GEDCOM 2".into(),
        (true, false) => "could not find individual in GEDCOM 1".into(),
        (false, true) => "could not find individual in GEDCOM 2".into(),
        (false, false) => "anchor lookup failed".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchor_message_names_failing_trees() {
        let err = CompareError::AnchorNotFound { left: false, right: true };
        assert_eq!(err.to_string(), "could not find individual in GEDCOM 2");

        let err = CompareError::AnchorNotFound { left: true, right: true };
        assert!(err.to_string().contains("GEDCOM 1 or GEDCOM 2"));
    }

    #[test]
    fn criteria_error_converts() {
        let err: CompareError = CriteriaError::Empty.into();
        assert_eq!(err.to_string(), "invalid anchor criteria: criteria string is empty");
    }
}
