use std::collections::HashMap;
use std::fmt;

use crate::individual::Individual;
use crate::tags;

/// Opaque handle to an element inside one [`GedcomTree`].
///
/// Handles are only meaningful for the tree that produced them; two trees
/// parsed from different files hand out overlapping handle values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub(crate) usize);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One tagged GEDCOM line together with its nested lines.
#[derive(Debug, Clone)]
pub struct Element {
    pub level: u32,
    pub xref: Option<String>,
    pub tag: String,
    pub value: String,
    pub(crate) parent: Option<ElementId>,
    pub(crate) children: Vec<ElementId>,
}

impl Element {
    pub fn is_individual(&self) -> bool {
        self.tag == tags::INDIVIDUAL
    }

    pub fn is_family(&self) -> bool {
        self.tag == tags::FAMILY
    }
}

/// Arena of parsed elements plus an index of cross-reference ids.
#[derive(Debug, Default, Clone)]
pub struct GedcomTree {
    elements: Vec<Element>,
    roots: Vec<ElementId>,
    xrefs: HashMap<String, ElementId>,
}

impl GedcomTree {
    pub(crate) fn push(&mut self, element: Element) -> ElementId {
        let id = ElementId(self.elements.len());
        if let Some(ref xref) = element.xref {
            // First definition wins for duplicated xrefs.
            self.xrefs.entry(xref.clone()).or_insert(id);
        }
        match element.parent {
            Some(parent) => self.elements[parent.0].children.push(id),
            None => self.roots.push(id),
        }
        self.elements.push(element);
        id
    }

    pub(crate) fn append_value(&mut self, id: ElementId, text: &str) {
        self.elements[id.0].value.push_str(text);
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0)
    }

    /// Level-0 records in file order.
    pub fn root_elements(&self) -> &[ElementId] {
        &self.roots
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.elements
            .get(id.0)
            .map(|e| e.children.as_slice())
            .unwrap_or(&[])
    }

    /// Direct children of `id` carrying `tag`, in file order.
    pub fn children_tagged<'a, 's>(
        &'a self,
        id: ElementId,
        tag: &'s str,
    ) -> impl Iterator<Item = (ElementId, &'a Element)> + 's
    where
        'a: 's,
    {
        self.children(id)
            .iter()
            .map(move |&c| (c, &self.elements[c.0]))
            .filter(move |(_, e)| e.tag == tag)
    }

    /// Resolve a pointer value such as `@I12@`.
    pub fn by_xref(&self, xref: &str) -> Option<ElementId> {
        self.xrefs.get(xref.trim()).copied()
    }

    /// View `id` as an individual, if it is an `INDI` record.
    pub fn individual(&self, id: ElementId) -> Option<Individual<'_>> {
        Individual::new(self, id)
    }

    /// All top-level individuals in file order.
    pub fn individuals(&self) -> impl Iterator<Item = Individual<'_>> {
        self.roots.iter().filter_map(move |&id| self.individual(id))
    }
}
