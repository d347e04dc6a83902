//! Shortcut resolution from a caller-supplied candidate answer

use crate::dom::{ElementIndex, ElementTreeNode, Point, element_at_position};
use crate::inspect::ResolutionResult;
use serde::{Deserialize, Serialize};

/// Candidate answer supplied by the caller, e.g. from a cached plan step
///
/// When both fields are set, `id` takes precedence.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QuickAnswer {
    /// Element id (or numeric alias) believed to be the target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Absolute page position believed to be on the target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
}

impl QuickAnswer {
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            position: None,
        }
    }

    pub fn by_position(position: Point) -> Self {
        Self {
            id: None,
            position: Some(position),
        }
    }
}

/// Try to answer without the AI
///
/// 1. a known `id` resolves to its indexed element;
/// 2. otherwise a `position` resolves to the smallest enclosing element, or
///    to a synthetic element inserted into `tree` and `index`;
/// 3. otherwise `None`: the caller has to ask the AI.
pub fn resolve_quick_answer(
    quick_answer: Option<&QuickAnswer>,
    tree: &mut ElementTreeNode,
    index: &mut ElementIndex,
) -> Option<ResolutionResult> {
    let quick_answer = quick_answer?;

    if let Some(element) = quick_answer.id.as_deref().and_then(|id| index.get(id)) {
        log::debug!("Quick answer hit by id {}", element.id);
        return Some(ResolutionResult::single(element.clone()));
    }

    if let Some(position) = quick_answer.position {
        let element = match element_at_position(tree, position) {
            Some(element) => element.clone(),
            None => index.insert_by_position(tree, position),
        };
        log::debug!("Quick answer hit by position, element {}", element.id);
        return Some(ResolutionResult::single(element));
    }

    log::debug!("Quick answer unusable, falling back to AI");
    None
}
