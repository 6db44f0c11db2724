//! `gedcompare-gedcom`: GEDCOM parsing for the tree comparison engine.
//!
//! Turns a GEDCOM file into an arena of tagged elements and exposes the
//! person-level views the engine needs: names, vital dates, families, and
//! the `key=value` criteria language used to pick an anchor individual.

pub mod criteria;
pub mod error;
pub mod family;
pub mod individual;
pub mod parser;
pub mod tags;
pub mod tree;

pub use criteria::{Criteria, Criterion};
pub use error::{CriteriaError, GedcomError};
pub use family::{FamilyLink, FamilyRole, Marriage};
pub use individual::Individual;
pub use parser::{parse_file, parse_str, ParseOptions};
pub use tree::{Element, ElementId, GedcomTree};
