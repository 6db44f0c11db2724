use serde::Deserialize;

use gedcompare_gedcom::Criteria;

use crate::error::CompareError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompareConfig {
    #[serde(default)]
    pub name: Option<String>,
    /// GEDCOM file for tree 1, relative to the config file.
    pub left: String,
    /// GEDCOM file for tree 2, relative to the config file.
    pub right: String,
    /// Criteria locating the anchor person in both trees.
    pub anchor: String,
    #[serde(default)]
    pub scope: ScopeConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// Scope + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScopeConfig {
    /// Deepest degree of separation to enqueue. Absent means unbounded.
    #[serde(default)]
    pub max_separation: Option<u32>,
    /// Also expand spouses and children, not just parents.
    #[serde(default)]
    pub include_relatives: bool,
    /// Ceiling on processed pairs. Absent means unbounded.
    #[serde(default)]
    pub max_pairs: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Emit every pair's fragment, not only those with issues.
    #[serde(default)]
    pub all: bool,
    /// 0 = off, 1 = info, 2 = debug, 3 = trace.
    #[serde(default)]
    pub verbosity: u8,
    /// Reject malformed GEDCOM lines instead of repairing them.
    #[serde(default)]
    pub strict: bool,
}

pub const MAX_VERBOSITY: u8 = 3;

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl CompareConfig {
    pub fn from_toml(input: &str) -> Result<Self, CompareError> {
        let config: CompareConfig =
            toml::from_str(input).map_err(|e| CompareError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CompareError> {
        if self.left.trim().is_empty() || self.right.trim().is_empty() {
            return Err(CompareError::ConfigValidation(
                "both 'left' and 'right' GEDCOM paths are required".into(),
            ));
        }

        self.criteria()?;

        if self.scope.max_pairs == Some(0) {
            return Err(CompareError::ConfigValidation(
                "scope.max_pairs must be at least 1".into(),
            ));
        }

        if self.output.verbosity > MAX_VERBOSITY {
            return Err(CompareError::ConfigValidation(format!(
                "output.verbosity must be 0-{MAX_VERBOSITY}, got {}",
                self.output.verbosity
            )));
        }

        Ok(())
    }

    pub fn criteria(&self) -> Result<Criteria, CompareError> {
        Ok(Criteria::parse(&self.anchor)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
