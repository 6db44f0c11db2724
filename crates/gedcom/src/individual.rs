use crate::criteria::{Criteria, Criterion};
use crate::tags;
use crate::tree::{ElementId, GedcomTree};

/// Borrowed view of one `INDI` record.
///
/// Every accessor re-reads the underlying elements, so a view never goes
/// stale relative to its tree.
#[derive(Debug, Clone, Copy)]
pub struct Individual<'t> {
    tree: &'t GedcomTree,
    id: ElementId,
}

impl<'t> Individual<'t> {
    pub(crate) fn new(tree: &'t GedcomTree, id: ElementId) -> Option<Self> {
        tree.element(id)
            .filter(|e| e.is_individual())
            .map(|_| Self { tree, id })
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn xref(&self) -> Option<&'t str> {
        self.tree.element(self.id).and_then(|e| e.xref.as_deref())
    }

    fn has_child(&self, tag: &str) -> bool {
        self.tree.children_tagged(self.id, tag).next().is_some()
    }

    /// Value of the last `tag` child, or empty.
    fn last_value(&self, tag: &str) -> &'t str {
        let tree = self.tree;
        tree.children_tagged(self.id, tag)
            .last()
            .map(|(_, e)| e.value.as_str())
            .unwrap_or("")
    }

    /// Value of the last `sub` under the last `event` child, or empty.
    fn event_value(&self, event: &str, sub: &str) -> &'t str {
        let tree = self.tree;
        let mut value = "";
        for (event_id, _) in tree.children_tagged(self.id, event) {
            if let Some((_, e)) = tree.children_tagged(event_id, sub).last() {
                value = e.value.as_str();
            }
        }
        value
    }

    /// `(given name, surname)`.
    ///
    /// The first `NAME` with a value wins (`Given /Surname/` form); otherwise
    /// the first `NAME` carrying both `GIVN` and `SURN` parts.
    pub fn name(&self) -> (String, String) {
        let mut given = String::new();
        let mut surname = String::new();

        for (name_id, name) in self.tree.children_tagged(self.id, tags::NAME) {
            if !name.value.is_empty() {
                let mut parts = name.value.split('/');
                let given = parts.next().unwrap_or("").trim().to_string();
                let surname = parts.next().unwrap_or("").trim().to_string();
                return (given, surname);
            }

            let mut found_given = false;
            let mut found_surname = false;
            for child in self.tree.children(name_id) {
                let Some(child) = self.tree.element(*child) else {
                    continue;
                };
                if child.tag == tags::GIVEN_NAME {
                    given = child.value.clone();
                    found_given = true;
                }
                if child.tag == tags::SURNAME {
                    surname = child.value.clone();
                    found_surname = true;
                }
            }
            if found_given && found_surname {
                return (given, surname);
            }
        }

        (given, surname)
    }

    /// Single-letter sex code as recorded, or empty.
    pub fn gender(&self) -> &'t str {
        self.last_value(tags::SEX)
    }

    pub fn birth_date(&self) -> &'t str {
        self.event_value(tags::BIRTH, tags::DATE)
    }

    pub fn death_date(&self) -> &'t str {
        self.event_value(tags::DEATH, tags::DATE)
    }

    /// Year of birth; `None` when absent or not numeric.
    pub fn birth_year(&self) -> Option<i32> {
        year_of(self.birth_date())
    }

    pub fn death_year(&self) -> Option<i32> {
        year_of(self.death_date())
    }

    pub fn is_deceased(&self) -> bool {
        self.has_child(tags::DEATH)
    }

    /// True when the record links to a family as a child.
    pub fn is_child(&self) -> bool {
        self.has_child(tags::FAMILY_CHILD)
    }

    /// Conjunction of every criterion.
    pub fn matches(&self, criteria: &Criteria) -> bool {
        criteria.iter().all(|c| self.matches_one(c))
    }

    fn matches_one(&self, criterion: &Criterion) -> bool {
        match criterion {
            Criterion::Surname(text) => contains_ignore_case(&self.name().1, text),
            Criterion::GivenName(text) => contains_ignore_case(&self.name().0, text),
            Criterion::Gender(code) => self.gender().eq_ignore_ascii_case(code),
            Criterion::BirthYear(year) => year.is_some() && self.birth_year() == *year,
            Criterion::BirthDate(text) => contains_ignore_case(self.birth_date(), text),
            Criterion::BirthRange(range) => in_range(self.birth_year(), *range),
            Criterion::DeathYear(year) => year.is_some() && self.death_year() == *year,
            Criterion::DeathRange(range) => in_range(self.death_year(), *range),
        }
    }
}

/// Last whitespace-separated token of a date, parsed as a year.
fn year_of(date: &str) -> Option<i32> {
    date.split_whitespace().last()?.parse().ok()
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn in_range(year: Option<i32>, range: Option<(i32, i32)>) -> bool {
    match (year, range) {
        (Some(year), Some((from, to))) => from <= year && year <= to,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use crate::{parse_str, Criteria};

    const SAMPLE: &str = "\
0 @I1@ INDI
1 NAME Jane Mary /Doe/
1 SEX F
1 BIRT
2 DATE 12 MARCH 1901
2 PLAC Leeds
1 DEAT
2 DATE ABT 1970
1 FAMC @F1@
0 @I2@ INDI
1 NAME
2 GIVN John
2 SURN Smith
1 BIRT
2 DATE unknown
0 @F1@ FAM
";

    #[test]
    fn reads_vital_fields() {
        let tree = parse_str(SAMPLE).unwrap();
        let jane = tree.individual(tree.by_xref("@I1@").unwrap()).unwrap();

        assert_eq!(jane.name(), ("Jane Mary".into(), "Doe".into()));
        assert_eq!(jane.gender(), "F");
        assert_eq!(jane.birth_date(), "12 MARCH 1901");
        assert_eq!(jane.birth_year(), Some(1901));
        assert_eq!(jane.death_year(), Some(1970));
        assert!(jane.is_deceased());
        assert!(jane.is_child());
        assert_eq!(jane.xref(), Some("@I1@"));
    }

    #[test]
    fn name_parts_and_unknown_years() {
        let tree = parse_str(SAMPLE).unwrap();
        let john = tree.individual(tree.by_xref("@I2@").unwrap()).unwrap();

        assert_eq!(john.name(), ("John".into(), "Smith".into()));
        assert_eq!(john.gender(), "");
        assert_eq!(john.birth_year(), None);
        assert_eq!(john.death_year(), None);
        assert_eq!(john.death_date(), "");
        assert!(!john.is_deceased());
        assert!(!john.is_child());
    }

    #[test]
    fn criteria_conjunction() {
        let tree = parse_str(SAMPLE).unwrap();
        let jane = tree.individual(tree.by_xref("@I1@").unwrap()).unwrap();

        let yes = Criteria::parse("surname=doe:name=mary:gender=f:birth=1901").unwrap();
        assert!(jane.matches(&yes));

        let ranges = Criteria::parse("birth_range=1900-1905:death_range=1960-1980").unwrap();
        assert!(jane.matches(&ranges));

        let wrong_year = Criteria::parse("surname=Doe:birth=1902").unwrap();
        assert!(!jane.matches(&wrong_year));

        let date = Criteria::parse("birth_date=march 1901").unwrap();
        assert!(jane.matches(&date));
    }

    #[test]
    fn unparseable_number_never_matches() {
        let tree = parse_str(SAMPLE).unwrap();
        let jane = tree.individual(tree.by_xref("@I1@").unwrap()).unwrap();

        let bad = Criteria::parse("surname=Doe:birth=19x1").unwrap();
        assert!(!jane.matches(&bad));

        let bad_range = Criteria::parse("birth_range=1900").unwrap();
        assert!(!jane.matches(&bad_range));
    }

    #[test]
    fn unknown_birth_year_fails_range() {
        let tree = parse_str(SAMPLE).unwrap();
        let john = tree.individual(tree.by_xref("@I2@").unwrap()).unwrap();
        let range = Criteria::parse("birth_range=0-3000").unwrap();
        assert!(!john.matches(&range));
    }
}
