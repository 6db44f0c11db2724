// Family navigation: FAMC/FAMS pointers on individuals, HUSB/WIFE/CHIL on families

use crate::tags;
use crate::tree::{ElementId, GedcomTree};

/// Which family pointer to follow from an individual.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FamilyLink {
    /// `FAMS`: families where the individual is a spouse/parent.
    Spouse,
    /// `FAMC`: families where the individual is a child.
    Child,
}

/// Which members to collect from a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FamilyRole {
    /// `HUSB` and `WIFE`.
    Parents,
    /// `CHIL`.
    Children,
}

/// A marriage event of one of an individual's families.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Marriage {
    pub date: String,
    pub place: String,
}

impl GedcomTree {
    /// Families linked from `individual`, skipping dangling pointers.
    pub fn families(&self, individual: ElementId, link: FamilyLink) -> Vec<ElementId> {
        let tag = match link {
            FamilyLink::Spouse => tags::FAMILY_SPOUSE,
            FamilyLink::Child => tags::FAMILY_CHILD,
        };
        self.children_tagged(individual, tag)
            .filter_map(|(_, e)| self.by_xref(&e.value))
            .filter(|&fam| self.element(fam).is_some_and(|e| e.is_family()))
            .collect()
    }

    /// Individuals holding `role` in `family`, in record order.
    pub fn family_members(&self, family: ElementId, role: FamilyRole) -> Vec<ElementId> {
        self.children(family)
            .iter()
            .filter_map(|&c| self.element(c))
            .filter(|e| match role {
                FamilyRole::Parents => e.tag == tags::HUSBAND || e.tag == tags::WIFE,
                FamilyRole::Children => e.tag == tags::CHILD,
            })
            .filter_map(|e| self.by_xref(&e.value))
            .filter(|&id| self.individual(id).is_some())
            .collect()
    }

    /// Parents from every family the individual is a child of.
    pub fn parents(&self, individual: ElementId) -> Vec<ElementId> {
        self.families(individual, FamilyLink::Child)
            .into_iter()
            .flat_map(|fam| self.family_members(fam, FamilyRole::Parents))
            .collect()
    }

    /// The other parent of every family the individual heads.
    pub fn spouses(&self, individual: ElementId) -> Vec<ElementId> {
        self.families(individual, FamilyLink::Spouse)
            .into_iter()
            .flat_map(|fam| self.family_members(fam, FamilyRole::Parents))
            .filter(|&member| member != individual)
            .collect()
    }

    /// Children of every family the individual heads that carry a `FAMC` link.
    pub fn children_of(&self, individual: ElementId) -> Vec<ElementId> {
        self.families(individual, FamilyLink::Spouse)
            .into_iter()
            .flat_map(|fam| self.family_members(fam, FamilyRole::Children))
            .filter(|&child| self.individual(child).is_some_and(|c| c.is_child()))
            .collect()
    }

    pub fn marriages(&self, individual: ElementId) -> Vec<Marriage> {
        let mut marriages = Vec::new();
        for fam in self.families(individual, FamilyLink::Spouse) {
            for (event, _) in self.children_tagged(fam, tags::MARRIAGE) {
                let mut marriage = Marriage::default();
                for (_, e) in self.children_tagged(event, tags::DATE) {
                    marriage.date = e.value.clone();
                }
                for (_, e) in self.children_tagged(event, tags::PLACE) {
                    marriage.place = e.value.clone();
                }
                marriages.push(marriage);
            }
        }
        marriages
    }
}
