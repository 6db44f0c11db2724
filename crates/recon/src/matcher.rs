use crate::model::{year_or_unknown, Mismatch, MismatchField, PersonFields, ScoreResult};
use crate::normalize::normalize_date;

// Weights in tenths of full confidence.
const GENDER_WEIGHT: u8 = 1;
const SURNAME_WEIGHT: u8 = 1;
const GIVEN_NAME_WEIGHT: u8 = 2;
const INITIAL_ONLY_WEIGHT: u8 = 1;
const BIRTH_YEAR_WEIGHT: u8 = 1;
const DEATH_YEAR_WEIGHT: u8 = 1;
const BIRTH_DATE_WEIGHT: u8 = 2;
const DEATH_DATE_WEIGHT: u8 = 2;

/// The basic checks must reach this many tenths before dates are compared.
pub const BASIC_CHECKS_MIN_TENTHS: u8 = 5;

/// Cheap gate for relationship cross-products: same first initial and same
/// surname.
pub fn quick_match(left: &PersonFields, right: &PersonFields) -> bool {
    let matched = left.initial() == right.initial() && left.surname == right.surname;
    tracing::trace!(
        left = %format_args!("{} {}", left.given_name, left.surname),
        right = %format_args!("{} {}", right.given_name, right.surname),
        matched,
        "simple compare"
    );
    matched
}

impl ScoreResult {
    /// Add `weight` when the field agrees, otherwise record the mismatch.
    fn tally(
        &mut self,
        agree: bool,
        weight: u8,
        field: MismatchField,
        left: impl Into<String>,
        right: impl Into<String>,
    ) {
        if agree {
            self.tenths += weight;
        } else {
            self.mismatches.push(Mismatch {
                field,
                left: left.into(),
                right: right.into(),
            });
        }
    }
}

/// Weighted comparison of two records.
///
/// `None` on either side means the handle was not a person record; the pair
/// is not comparable and scores zero with no mismatches.
pub fn score(left: Option<&PersonFields>, right: Option<&PersonFields>) -> ScoreResult {
    let (Some(left), Some(right)) = (left, right) else {
        tracing::debug!("one or other record is not an individual");
        return ScoreResult::default();
    };

    let mut result = ScoreResult::default();
    result.tally(
        left.gender == right.gender,
        GENDER_WEIGHT,
        MismatchField::Gender,
        &left.gender,
        &right.gender,
    );
    result.tally(
        left.surname == right.surname,
        SURNAME_WEIGHT,
        MismatchField::Surname,
        &left.surname,
        &right.surname,
    );

    if left.given_name == right.given_name {
        result.tenths += GIVEN_NAME_WEIGHT;
    } else if left.initial() == right.initial() {
        result.tenths += INITIAL_ONLY_WEIGHT;
        result.mismatches.push(Mismatch {
            field: MismatchField::GivenNameInitialOk,
            left: left.given_name.clone(),
            right: right.given_name.clone(),
        });
    } else {
        result.tally(
            false,
            GIVEN_NAME_WEIGHT,
            MismatchField::GivenName,
            &left.given_name,
            &right.given_name,
        );
    }

    result.tally(
        left.birth_year == right.birth_year,
        BIRTH_YEAR_WEIGHT,
        MismatchField::BirthYear,
        year_or_unknown(left.birth_year),
        year_or_unknown(right.birth_year),
    );
    result.tally(
        left.death_year == right.death_year,
        DEATH_YEAR_WEIGHT,
        MismatchField::DeathYear,
        year_or_unknown(left.death_year),
        year_or_unknown(right.death_year),
    );

    if result.tenths < BASIC_CHECKS_MIN_TENTHS {
        tracing::info!(confidence = result.confidence(), "match insufficient");
        result.early_exit = true;
        return result;
    }

    result.tally(
        normalize_date(&left.birth_date) == normalize_date(&right.birth_date),
        BIRTH_DATE_WEIGHT,
        MismatchField::BirthDate,
        &left.birth_date,
        &right.birth_date,
    );
    result.tally(
        normalize_date(&left.death_date) == normalize_date(&right.death_date),
        DEATH_DATE_WEIGHT,
        MismatchField::DeathDate,
        &left.death_date,
        &right.death_date,
    );

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn jane() -> PersonFields {
        PersonFields {
            given_name: "Jane".into(),
            surname: "Doe".into(),
            gender: "F".into(),
            birth_year: Some(1980),
            death_year: None,
            birth_date: "1 JAN 1980".into(),
            death_date: String::new(),
            deceased: false,
            is_child: true,
        }
    }

    #[test]
    fn identical_records_are_perfect() {
        let r = score(Some(&jane()), Some(&jane()));
        assert_eq!(r.tenths, 10);
        assert!(r.is_perfect());
        assert_eq!(r.confidence(), 1.0);
        assert!(r.mismatches.is_empty());
        assert!(!r.early_exit);
    }

    #[test]
    fn date_spelling_differences_still_agree() {
        let mut other = jane();
        other.birth_date = "1 January 1980".into();
        assert!(score(Some(&jane()), Some(&other)).is_perfect());
    }

    #[test]
    fn initial_only_gets_partial_credit() {
        let mut janet = jane();
        janet.given_name = "Janet".into();
        let r = score(Some(&jane()), Some(&janet));
        assert_eq!(r.tenths, 9);
        assert!((r.confidence() - 0.9).abs() < 1e-9);
        assert_eq!(
            r.mismatches,
            vec![Mismatch {
                field: MismatchField::GivenNameInitialOk,
                left: "Jane".into(),
                right: "Janet".into(),
            }]
        );
    }

    #[test]
    fn different_initial_gets_nothing() {
        let mut mary = jane();
        mary.given_name = "Mary".into();
        let r = score(Some(&jane()), Some(&mary));
        assert_eq!(r.tenths, 8);
        assert_eq!(r.mismatches[0].field, MismatchField::GivenName);
    }

    #[test]
    fn early_exit_skips_dates() {
        let mut other = jane();
        other.gender = "M".into();
        other.surname = "Roe".into();
        other.given_name = "Bob".into();
        other.birth_date = "2 FEB 1981".into();
        // Gender, surname and name fail: only the two years count.
        let r = score(Some(&jane()), Some(&other));
        assert!(r.early_exit);
        assert_eq!(r.tenths, 2);
        assert!(r
            .mismatches
            .iter()
            .all(|m| m.field != MismatchField::BirthDate));
    }

    #[test]
    fn unknown_years_count_as_equal() {
        let mut a = jane();
        let mut b = jane();
        a.birth_year = None;
        b.birth_year = None;
        a.birth_date = String::new();
        b.birth_date = String::new();
        assert!(score(Some(&a), Some(&b)).is_perfect());
    }

    #[test]
    fn year_mismatch_renders_unknown() {
        let mut other = jane();
        other.death_year = Some(2001);
        let r = score(Some(&jane()), Some(&other));
        let m = r
            .mismatches
            .iter()
            .find(|m| m.field == MismatchField::DeathYear)
            .unwrap();
        assert_eq!(m.to_string(), "DEATH YEAR MIS-MATCH : ? vs 2001");
    }

    #[test]
    fn not_comparable_scores_zero() {
        let r = score(None, Some(&jane()));
        assert_eq!(r, ScoreResult::default());
        assert_eq!(score(Some(&jane()), None).confidence(), 0.0);
    }

    #[test]
    fn quick_match_needs_initial_and_surname() {
        let mut janet = jane();
        janet.given_name = "Janet".into();
        assert!(quick_match(&jane(), &janet));

        janet.surname = "DOE".into();
        assert!(!quick_match(&jane(), &janet));

        let mut blank_a = jane();
        let mut blank_b = jane();
        blank_a.given_name.clear();
        blank_b.given_name.clear();
        assert!(quick_match(&blank_a, &blank_b));
    }

    fn arb_person() -> impl Strategy<Value = PersonFields> {
        (
            prop_oneof![Just("Jane"), Just("Janet"), Just("Mary"), Just("")],
            prop_oneof![Just("Doe"), Just("Roe")],
            prop_oneof![Just("F"), Just("M"), Just("")],
            proptest::option::of(1900..1903i32),
            proptest::option::of(1960..1962i32),
            prop_oneof![Just("1 JAN 1900"), Just("1 January 1900"), Just("")],
            prop_oneof![Just("ABT 1960"), Just("about 1960"), Just("1961")],
        )
            .prop_map(|(given, surname, gender, birth, death, bdate, ddate)| PersonFields {
                given_name: given.into(),
                surname: surname.into(),
                gender: gender.into(),
                birth_year: birth,
                death_year: death,
                birth_date: bdate.into(),
                death_date: ddate.into(),
                deceased: death.is_some(),
                is_child: false,
            })
    }

    proptest! {
        #[test]
        fn confidence_in_unit_range(a in arb_person(), b in arb_person()) {
            let r = score(Some(&a), Some(&b));
            prop_assert!((0.0..=1.0).contains(&r.confidence()));
            prop_assert_eq!(r.is_perfect(), r.mismatches.is_empty() && !r.early_exit);
        }

        #[test]
        fn early_exit_equals_basic_sum(a in arb_person(), b in arb_person()) {
            let r = score(Some(&a), Some(&b));
            if r.early_exit {
                prop_assert!(r.tenths < BASIC_CHECKS_MIN_TENTHS);
                prop_assert!(r.mismatches.iter().all(|m| !matches!(
                    m.field,
                    MismatchField::BirthDate | MismatchField::DeathDate
                )));
            }
        }

        #[test]
        fn early_exit_is_never_expandable(a in arb_person(), b in arb_person()) {
            let r = score(Some(&a), Some(&b));
            if r.early_exit {
                prop_assert!(!r.is_expandable(0));
            } else {
                prop_assert!(r.is_expandable(BASIC_CHECKS_MIN_TENTHS));
            }
        }

        #[test]
        fn self_comparison_is_perfect(a in arb_person()) {
            prop_assert!(score(Some(&a), Some(&a)).is_perfect());
        }
    }
}
