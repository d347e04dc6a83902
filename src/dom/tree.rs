use crate::dom::element::Element;
use serde::{Deserialize, Serialize};

/// A node of a snapshot's element tree
///
/// Each node owns at most one element and its ordered children. The root of
/// a snapshot usually carries no element.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ElementTreeNode {
    /// Element carried by this node (`None` for synthetic roots)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<Element>,

    /// Child nodes, in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementTreeNode>,
}

impl ElementTreeNode {
    /// Create a node carrying `element`
    pub fn new(element: Element) -> Self {
        Self {
            node: Some(element),
            children: Vec::new(),
        }
    }

    /// Create a payload-less root
    pub fn root() -> Self {
        Self::default()
    }

    /// Builder method: set children
    pub fn with_children(mut self, children: Vec<ElementTreeNode>) -> Self {
        self.children = children;
        self
    }

    /// Add a child node
    pub fn add_child(&mut self, child: ElementTreeNode) {
        self.children.push(child);
    }

    /// All elements in pre-order
    pub fn to_list(&self) -> Vec<&Element> {
        let mut list = Vec::new();
        Self::collect_recursive(self, &mut list);
        list
    }

    fn collect_recursive<'a>(node: &'a ElementTreeNode, list: &mut Vec<&'a Element>) {
        if let Some(element) = &node.node {
            list.push(element);
        }

        for child in &node.children {
            Self::collect_recursive(child, list);
        }
    }

    /// Count nodes carrying an element
    pub fn count_elements(&self) -> usize {
        usize::from(self.node.is_some()) + self.children.iter().map(|c| c.count_elements()).sum::<usize>()
    }

    /// Depth-first search for the element with the given id
    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        if let Some(element) = &self.node {
            if element.id == id {
                return Some(element);
            }
        }

        self.children.iter().find_map(|child| child.find_by_id(id))
    }
}
