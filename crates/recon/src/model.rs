use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Person fields
// ---------------------------------------------------------------------------

/// Normalized field set of one person record, read fresh from its tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PersonFields {
    pub given_name: String,
    pub surname: String,
    /// Single-letter code or empty.
    pub gender: String,
    /// `None` is the shared "unknown" sentinel: two unknowns compare equal.
    pub birth_year: Option<i32>,
    pub death_year: Option<i32>,
    pub birth_date: String,
    pub death_date: String,
    pub deceased: bool,
    pub is_child: bool,
}

/// Records with no death data are assumed deceased beyond this age.
const PRESUMED_DEAD_AFTER_YEARS: i32 = 120;

impl PersonFields {
    /// First character of the given name, if any.
    pub fn initial(&self) -> Option<char> {
        self.given_name.chars().next()
    }

    /// `"Joe Billy Bloggs (1911-?)"`.
    ///
    /// The death part is left empty for people who are plausibly alive in
    /// `reference_year`.
    pub fn identity(&self, reference_year: i32) -> String {
        let birth = year_or_unknown(self.birth_year);
        let presumed_dead = match self.birth_year {
            Some(year) => reference_year - year > PRESUMED_DEAD_AFTER_YEARS,
            None => true,
        };
        let death = if self.deceased || presumed_dead {
            year_or_unknown(self.death_year)
        } else {
            String::new()
        };
        format!("{} {} ({birth}-{death})", self.given_name, self.surname)
    }
}

pub(crate) fn year_or_unknown(year: Option<i32>) -> String {
    year.map(|y| y.to_string()).unwrap_or_else(|| "?".into())
}

// ---------------------------------------------------------------------------
// Candidate pairs
// ---------------------------------------------------------------------------

/// A record from tree 1 and a record from tree 2 believed to be the same person.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidatePair<H> {
    pub left: H,
    pub right: H,
    /// Relationship hops from the anchor pair.
    pub separation: u32,
}

impl<H: Copy> CandidatePair<H> {
    /// Order-sensitive identity key used by the dedup ledger.
    pub fn key(&self) -> (H, H) {
        (self.left, self.right)
    }
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchField {
    Gender,
    Surname,
    /// Given names differ but share the first initial.
    GivenNameInitialOk,
    GivenName,
    BirthYear,
    DeathYear,
    BirthDate,
    DeathDate,
}

impl MismatchField {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Gender => "GENDER MIS-MATCH",
            Self::Surname => "SURNAME MIS-MATCH",
            Self::GivenNameInitialOk => "FULL NAME MIS-MATCH, FIRST INITIAL OK",
            Self::GivenName => "FULL NAME MIS-MATCH",
            Self::BirthYear => "BIRTH YEAR MIS-MATCH",
            Self::DeathYear => "DEATH YEAR MIS-MATCH",
            Self::BirthDate => "DOB MIS-MATCH",
            Self::DeathDate => "DOD MIS-MATCH",
        }
    }
}

/// One field that disagrees: value from tree 1, value from tree 2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mismatch {
    pub field: MismatchField,
    pub left: String,
    pub right: String,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {} vs {}", self.field.label(), self.left, self.right)
    }
}

/// Outcome of comparing two records.
///
/// Confidence is accumulated in tenths so the perfect-match test is exact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScoreResult {
    pub tenths: u8,
    pub mismatches: Vec<Mismatch>,
    /// The basic checks fell short and the date checks were skipped.
    pub early_exit: bool,
}

impl ScoreResult {
    pub const MAX_TENTHS: u8 = 10;

    pub fn confidence(&self) -> f64 {
        f64::from(self.tenths) / 10.0
    }

    pub fn is_perfect(&self) -> bool {
        self.tenths == Self::MAX_TENTHS
    }

    /// Whether the pair is trusted enough to follow its relatives. A pair
    /// that stopped after the basic checks never is, whatever its partial sum.
    pub fn is_expandable(&self, threshold_tenths: u8) -> bool {
        !self.early_exit && self.tenths >= threshold_tenths
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// One line of a pair's report fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportLine {
    Mismatch(Mismatch),
    PerfectMatch,
    UnmatchedSpouse { person: String },
    SpouseMarriageCount { spouses: usize, left_marriages: usize, right_marriages: usize },
    NoSpouses,
    UnmatchedParent { person: String },
    /// A tree-2 parent with no tree-1 counterpart.
    UnmatchedCounterpartParent { person: String },
    NoParents,
    MissingOneParent,
    UnmatchedChild { person: String },
    NoChildren,
}

impl ReportLine {
    /// Issue lines are the ones prefixed `" - "`.
    pub fn is_issue(&self) -> bool {
        matches!(
            self,
            Self::Mismatch(_)
                | Self::UnmatchedSpouse { .. }
                | Self::SpouseMarriageCount { .. }
                | Self::UnmatchedParent { .. }
                | Self::UnmatchedCounterpartParent { .. }
                | Self::UnmatchedChild { .. }
        )
    }
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mismatch(m) => write!(f, " - {m}"),
            Self::PerfectMatch => write!(f, " + INDIVIDUAL IS A PERFECT MATCH!"),
            Self::UnmatchedSpouse { person } => write!(f, " - CANNOT MATCH SPOUSE : {person}"),
            Self::SpouseMarriageCount {
                spouses,
                left_marriages,
                right_marriages,
            } => write!(
                f,
                " - SPOUSES AND MARRIAGE MIS-MATCH : {spouses} Spouse records vs \
                {left_marriages} / {right_marriages} Marriage records"
            ),
            Self::NoSpouses => write!(f, " = No Spouses"),
            Self::UnmatchedParent { person } => write!(f, " - CANNOT MATCH PARENT : {person}"),
            Self::UnmatchedCounterpartParent { person } => {
                write!(f, " - CANNOT MATCH GEDCOM 2 PARENT : {person}")
            }
            Self::NoParents => write!(f, " = No Parents"),
            Self::MissingOneParent => write!(f, " = Missing 1 Parent"),
            Self::UnmatchedChild { person } => write!(f, " - CHILD NOT FOUND : {person}"),
            Self::NoChildren => write!(f, " = No Children"),
        }
    }
}

/// Everything found while processing one candidate pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairReport {
    /// Identity of the tree-1 record.
    pub identity: String,
    /// Identity of the tree-2 record.
    pub counterpart: String,
    pub separation: u32,
    pub confidence: f64,
    pub perfect: bool,
    pub lines: Vec<ReportLine>,
}

impl PairReport {
    pub fn has_issues(&self) -> bool {
        self.lines.iter().any(ReportLine::is_issue)
    }

    /// Line-oriented fragment: identity line, then one line per finding.
    pub fn render(&self) -> String {
        let mut out = format!(
            "{} : Degree of Separation={}\n",
            self.identity, self.separation
        );
        for line in &self.lines {
            out.push_str(&line.to_string());
            out.push('\n');
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

/// Run counters. Every processed pair is counted, whether or not its
/// fragment is emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStatistics {
    pub pairs_checked: usize,
    pub perfect_matches: usize,
    pub partial_matches: usize,
    pub non_matches: usize,
    pub max_separation: u32,
    pub with_issues: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    Cancelled,
    PairLimit,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => write!(f, "cancelled"),
            Self::PairLimit => write!(f, "pair limit reached"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CompareMeta {
    pub name: Option<String>,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompareResult {
    pub meta: CompareMeta,
    /// Identity of the tree-1 anchor.
    pub anchor: String,
    pub summary: RunStatistics,
    /// Emitted fragments only; see `RunStatistics` for the full counts.
    pub pairs: Vec<PairReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<StopReason>,
}
