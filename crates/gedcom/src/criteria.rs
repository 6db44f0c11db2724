//! Anchor criteria: `surname=Doe:name=Jane:gender=F:birth=1980`.
//!
//! Each `key=value` segment becomes one typed [`Criterion`]; an individual
//! matches when every criterion holds. Numeric values that do not parse are
//! kept as criteria that never match, so a typo narrows the search to nothing
//! instead of silently widening it.

use crate::error::CriteriaError;
use crate::tree::{ElementId, GedcomTree};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criterion {
    /// Case-insensitive substring of the surname.
    Surname(String),
    /// Case-insensitive substring of the given name(s).
    GivenName(String),
    /// Case-insensitive equality with the sex code.
    Gender(String),
    BirthYear(Option<i32>),
    /// Case-insensitive substring of the raw birth date.
    BirthDate(String),
    /// Inclusive `from-to` range of birth years.
    BirthRange(Option<(i32, i32)>),
    DeathYear(Option<i32>),
    DeathRange(Option<(i32, i32)>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    criteria: Vec<Criterion>,
    ignored: Vec<String>,
}

impl Criteria {
    pub fn parse(input: &str) -> Result<Self, CriteriaError> {
        if input.trim().is_empty() {
            return Err(CriteriaError::Empty);
        }

        let mut parsed = Criteria::default();
        for segment in input.split(':') {
            let (key, value) = segment
                .split_once('=')
                .ok_or_else(|| CriteriaError::Malformed(segment.to_string()))?;
            let key = key.trim();
            let value = value.trim();

            let criterion = match key {
                "surname" => Criterion::Surname(value.to_string()),
                "name" => Criterion::GivenName(value.to_string()),
                "gender" => Criterion::Gender(value.to_string()),
                "birth" => Criterion::BirthYear(value.parse().ok()),
                "birth_date" => Criterion::BirthDate(value.to_string()),
                "birth_range" => Criterion::BirthRange(parse_range(value)),
                "death" => Criterion::DeathYear(value.parse().ok()),
                "death_range" => Criterion::DeathRange(parse_range(value)),
                other => {
                    tracing::warn!(key = other, "ignoring unknown criteria key");
                    parsed.ignored.push(other.to_string());
                    continue;
                }
            };
            parsed.criteria.push(criterion);
        }

        Ok(parsed)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Criterion> {
        self.criteria.iter()
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// Keys that were not recognised and therefore not evaluated.
    pub fn ignored_keys(&self) -> &[String] {
        &self.ignored
    }

    /// First top-level individual in file order matching every criterion.
    pub fn find_first(&self, tree: &GedcomTree) -> Option<ElementId> {
        tree.individuals()
            .find(|ind| ind.matches(self))
            .map(|ind| ind.id())
    }
}

fn parse_range(value: &str) -> Option<(i32, i32)> {
    let (from, to) = value.split_once('-')?;
    Some((from.trim().parse().ok()?, to.trim().parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_str;

    #[test]
    fn parses_every_key() {
        let c = Criteria::parse(
            "surname=Doe:name=Jane:gender=F:birth=1980:\
            birth_date=1 JAN 1980:birth_range=1970-1990:death=2020:death_range=2000-2030",
        )
        .unwrap();
        let all: Vec<&Criterion> = c.iter().collect();
        assert_eq!(all.len(), 8);
        assert_eq!(all[0], &Criterion::Surname("Doe".into()));
        assert_eq!(all[3], &Criterion::BirthYear(Some(1980)));
        assert_eq!(all[5], &Criterion::BirthRange(Some((1970, 1990))));
        assert_eq!(all[7], &Criterion::DeathRange(Some((2000, 2030))));
        assert!(c.ignored_keys().is_empty());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let c = Criteria::parse("surname=Tiffany:birth_year=2003").unwrap();
        assert_eq!(c.len(), 1);
        assert_eq!(c.ignored_keys(), &["birth_year".to_string()]);
    }

    #[test]
    fn malformed_values_keep_a_failing_criterion() {
        let c = Criteria::parse("birth=abc:death_range=1900-x").unwrap();
        assert_eq!(
            c.iter().cloned().collect::<Vec<_>>(),
            vec![Criterion::BirthYear(None), Criterion::DeathRange(None)]
        );
    }

    #[test]
    fn rejects_empty_and_missing_equals() {
        assert_eq!(Criteria::parse("  "), Err(CriteriaError::Empty));
        assert_eq!(
            Criteria::parse("surname=Doe:Jane"),
            Err(CriteriaError::Malformed("Jane".into()))
        );
    }

    #[test]
    fn first_match_wins() {
        let tree = parse_str(
            "0 @I1@ INDI\n1 NAME Ann /Lee/\n0 @I2@ INDI\n1 NAME Jane /Doe/\n\
            0 @I3@ INDI\n1 NAME Jane /Doe/\n",
        )
        .unwrap();
        let c = Criteria::parse("surname=doe:name=jane").unwrap();
        assert_eq!(c.find_first(&tree), tree.by_xref("@I2@"));

        let none = Criteria::parse("surname=Nobody").unwrap();
        assert_eq!(none.find_first(&tree), None);
    }

    #[test]
    fn only_ignored_keys_match_everyone() {
        let tree = parse_str("0 @I1@ INDI\n1 NAME Ann /Lee/\n").unwrap();
        let c = Criteria::parse("colour=blue").unwrap();
        assert!(c.is_empty());
        assert_eq!(c.find_first(&tree), tree.by_xref("@I1@"));
    }
}
