use std::fmt::Debug;
use std::hash::Hash;

use gedcompare_gedcom::{Criteria, ElementId, GedcomTree, Marriage};

use crate::model::PersonFields;

/// Read-only access to one family tree, as the traversal sees it.
///
/// Relationship sets are recomputed on every call; the traversal never
/// holds on to them past one expansion step.
pub trait PersonGraph {
    type Handle: Copy + Eq + Hash + Debug;

    /// Normalized fields, or `None` when `handle` is not a person record.
    fn person(&self, handle: Self::Handle) -> Option<PersonFields>;

    fn parents(&self, handle: Self::Handle) -> Vec<Self::Handle>;

    fn spouses(&self, handle: Self::Handle) -> Vec<Self::Handle>;

    fn children(&self, handle: Self::Handle) -> Vec<Self::Handle>;

    fn marriages(&self, handle: Self::Handle) -> Vec<Marriage>;

    /// First person matching `criteria`, in the tree's natural order.
    fn find_first(&self, criteria: &Criteria) -> Option<Self::Handle>;
}

impl PersonGraph for GedcomTree {
    type Handle = ElementId;

    fn person(&self, handle: ElementId) -> Option<PersonFields> {
        let ind = self.individual(handle)?;
        let (given_name, surname) = ind.name();
        Some(PersonFields {
            given_name,
            surname,
            gender: ind.gender().to_string(),
            birth_year: ind.birth_year(),
            death_year: ind.death_year(),
            birth_date: ind.birth_date().to_string(),
            death_date: ind.death_date().to_string(),
            deceased: ind.is_deceased(),
            is_child: ind.is_child(),
        })
    }

    fn parents(&self, handle: ElementId) -> Vec<ElementId> {
        GedcomTree::parents(self, handle)
    }

    fn spouses(&self, handle: ElementId) -> Vec<ElementId> {
        GedcomTree::spouses(self, handle)
    }

    fn children(&self, handle: ElementId) -> Vec<ElementId> {
        self.children_of(handle)
    }

    fn marriages(&self, handle: ElementId) -> Vec<Marriage> {
        GedcomTree::marriages(self, handle)
    }

    fn find_first(&self, criteria: &Criteria) -> Option<ElementId> {
        criteria.find_first(self)
    }
}
