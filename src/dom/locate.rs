use crate::dom::element::{Element, Point};
use crate::dom::tree::ElementTreeNode;

/// Find the smallest non-container element whose rectangle contains `position`
///
/// Every matching element in the tree is considered; the one with the
/// smallest area wins, and among equal areas the first one met in a
/// depth-first pre-order walk wins. Returns `None` when nothing matches.
pub fn element_at_position(tree: &ElementTreeNode, position: Point) -> Option<&Element> {
    let mut matches = Vec::new();
    collect_matches(tree, position, &mut matches);

    let best = matches
        .into_iter()
        .fold(None::<&Element>, |smallest, current| match smallest {
            Some(smallest) if smallest.rect.area() <= current.rect.area() => Some(smallest),
            _ => Some(current),
        });

    match best {
        Some(element) => log::debug!(
            "Position ({}, {}) resolved to element {}",
            position.x,
            position.y,
            element.id
        ),
        None => log::debug!("No element contains position ({}, {})", position.x, position.y),
    }

    best
}

fn collect_matches<'a>(node: &'a ElementTreeNode, position: Point, matches: &mut Vec<&'a Element>) {
    if let Some(element) = &node.node {
        if !element.is_container() && element.rect.contains(position) {
            matches.push(element);
        }
    }

    for child in &node.children {
        collect_matches(child, position, matches);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::element::{NodeType, Rect};

    fn leaf(id: &str, rect: Rect) -> ElementTreeNode {
        ElementTreeNode::new(Element::new(id, NodeType::Text, rect))
    }

    #[test]
    fn test_prefers_leaf_over_container() {
        let mut container = ElementTreeNode::new(Element::new("C", NodeType::Container, Rect::new(0.0, 0.0, 200.0, 200.0)));
        container.add_child(leaf("L1", Rect::new(50.0, 50.0, 20.0, 20.0)));
        let tree = ElementTreeNode::root().with_children(vec![container]);

        let found = element_at_position(&tree, Point::new(60.0, 60.0));
        assert_eq!(found.map(|e| e.id.as_str()), Some("L1"));
    }

    #[test]
    fn test_container_never_matches() {
        let container = ElementTreeNode::new(Element::new("C", NodeType::Container, Rect::new(0.0, 0.0, 200.0, 200.0)));
        let tree = ElementTreeNode::root().with_children(vec![container]);

        assert!(element_at_position(&tree, Point::new(10.0, 10.0)).is_none());
    }

    #[test]
    fn test_smallest_area_wins_regardless_of_order() {
        // A (area 100) comes first, B (area 25) second
        let tree = ElementTreeNode::root().with_children(vec![
            leaf("A", Rect::new(0.0, 0.0, 10.0, 10.0)),
            leaf("B", Rect::new(2.0, 2.0, 5.0, 5.0)),
        ]);
        assert_eq!(element_at_position(&tree, Point::new(4.0, 4.0)).map(|e| e.id.as_str()), Some("B"));

        let reversed = ElementTreeNode::root().with_children(vec![
            leaf("B", Rect::new(2.0, 2.0, 5.0, 5.0)),
            leaf("A", Rect::new(0.0, 0.0, 10.0, 10.0)),
        ]);
        assert_eq!(element_at_position(&reversed, Point::new(4.0, 4.0)).map(|e| e.id.as_str()), Some("B"));
    }

    #[test]
    fn test_equal_area_tie_goes_to_first_in_traversal() {
        let mut parent = leaf("outer", Rect::new(0.0, 0.0, 10.0, 10.0));
        parent.add_child(leaf("nested", Rect::new(0.0, 0.0, 10.0, 10.0)));
        let tree = ElementTreeNode::root().with_children(vec![parent, leaf("sibling", Rect::new(0.0, 0.0, 10.0, 10.0))]);

        assert_eq!(element_at_position(&tree, Point::new(5.0, 5.0)).map(|e| e.id.as_str()), Some("outer"));
    }

    #[test]
    fn test_edges_are_inclusive() {
        let tree = ElementTreeNode::root().with_children(vec![leaf("edge", Rect::new(10.0, 10.0, 10.0, 10.0))]);

        assert!(element_at_position(&tree, Point::new(10.0, 10.0)).is_some());
        assert!(element_at_position(&tree, Point::new(20.0, 20.0)).is_some());
        assert!(element_at_position(&tree, Point::new(20.5, 20.0)).is_none());
    }

    #[test]
    fn test_not_found_is_stable() {
        let tree = ElementTreeNode::root().with_children(vec![leaf("only", Rect::new(0.0, 0.0, 10.0, 10.0))]);

        for _ in 0..3 {
            assert!(element_at_position(&tree, Point::new(500.0, 500.0)).is_none());
        }
    }
}
