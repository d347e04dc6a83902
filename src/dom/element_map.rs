use crate::dom::element::{Element, Point};
use crate::dom::tree::ElementTreeNode;
use indexmap::IndexMap;

/// Lookup structures built once per snapshot
///
/// Maps every element id, plus the decimal form of every `index_id`, to its
/// element, and keeps the pre-order flat list used for description
/// rendering. Uses IndexMap so iteration follows registration order.
#[derive(Debug, Clone, Default)]
pub struct ElementIndex {
    /// Map from id (or numeric alias) to element
    map: IndexMap<String, Element>,

    /// Elements in pre-order, each once
    elements: Vec<Element>,
}

impl ElementIndex {
    /// Create a new empty ElementIndex
    pub fn new() -> Self {
        Self {
            map: IndexMap::new(),
            elements: Vec::new(),
        }
    }

    /// Flatten `tree` into an index
    pub fn build(tree: &ElementTreeNode) -> Self {
        let mut index = Self::new();
        for element in tree.to_list() {
            index.register(element.clone());
        }

        log::debug!(
            "Indexed {} elements under {} lookup keys",
            index.elements.len(),
            index.map.len()
        );
        index
    }

    /// Register an element under its id and numeric alias
    pub fn register(&mut self, element: Element) {
        self.map.insert(element.id.clone(), element.clone());
        if let Some(index_id) = element.index_id {
            self.map.insert(index_id.to_string(), element.clone());
        }
        self.elements.push(element);
    }

    /// Get element by id or numeric alias
    pub fn get(&self, id: &str) -> Option<&Element> {
        self.map.get(id)
    }

    /// Check if an id or alias is known
    pub fn contains(&self, id: &str) -> bool {
        self.map.contains_key(id)
    }

    /// Flat pre-order list of elements
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Number of distinct elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// All lookup keys, aliases included
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.map.keys()
    }

    /// Materialize a synthetic element at `position`
    ///
    /// The element is appended as a child of the tree root and registered in
    /// the index. Repeating the call for the same position returns the
    /// element registered the first time without appending it again.
    ///
    /// Positions near the page origin clamp to the same rectangle, and so to
    /// the same id. When such a position differs from the registered center,
    /// the registered element is replaced in place (tree, flat list and
    /// index) by one centered on `position`.
    pub fn insert_by_position(&mut self, tree: &mut ElementTreeNode, position: Point) -> Element {
        let element = Element::synthetic(position);

        if let Some(existing) = self.map.get(&element.id) {
            if existing.center() == position {
                log::debug!("Synthetic element {} already registered", existing.id);
                return existing.clone();
            }

            log::debug!(
                "Re-centering synthetic element {} at ({}, {})",
                element.id,
                position.x,
                position.y
            );
            self.replace(tree, element.clone());
            return element;
        }

        log::debug!(
            "Inserting synthetic element {} at ({}, {})",
            element.id,
            position.x,
            position.y
        );
        tree.add_child(ElementTreeNode::new(element.clone()));
        self.register(element.clone());
        element
    }

    fn replace(&mut self, tree: &mut ElementTreeNode, element: Element) {
        if let Some(slot) = self.elements.iter_mut().find(|e| e.id == element.id) {
            *slot = element.clone();
        }
        if let Some(node) = tree
            .children
            .iter_mut()
            .find(|child| child.node.as_ref().is_some_and(|n| n.id == element.id))
        {
            node.node = Some(element.clone());
        }
        self.map.insert(element.id.clone(), element);
    }

    /// Export the flat list to JSON for debugging
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.elements)
    }
}
