//! Element resolution: quick answer first, then the AI
//!
//! [`inspect_element`] indexes the snapshot, tries the caller's quick answer,
//! and only then asks the AI collaborator. Whatever the source, the answer is
//! normalized into a [`ResolutionResult`]. The AI call is the only await
//! point; the snapshot is mutated (synthetic insertion) only once the AI
//! response has been fully received.

use crate::ai::{AiActionType, AiCaller, AiElementRef, AiResponse, ElementListResponse, build_locate_messages};
use crate::config::LocatorConfig;
use crate::context::UiContext;
use crate::describe::{PageDescription, describe_page};
use crate::dom::{Element, ElementIndex, ElementTreeNode, Point, Size, element_at_position};
use crate::error::{LocatorError, Result};
use crate::geometry::to_absolute;
use crate::quick_answer::{QuickAnswer, resolve_quick_answer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One resolved target
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ResolvedElement {
    /// Full element, from a quick answer or a position answer
    Element(Element),
    /// Element id reported by the AI, not yet checked against the index
    Id { id: String },
    /// Absolute position reported by the AI
    Position { position: Point },
}

impl ResolvedElement {
    pub fn id(&self) -> Option<&str> {
        match self {
            ResolvedElement::Element(element) => Some(&element.id),
            ResolvedElement::Id { id } => Some(id),
            ResolvedElement::Position { .. } => None,
        }
    }
}

impl From<AiElementRef> for ResolvedElement {
    fn from(reference: AiElementRef) -> Self {
        match reference {
            AiElementRef::Id { id } => ResolvedElement::Id { id },
            AiElementRef::Position { position } => ResolvedElement::Position { position },
        }
    }
}

/// Normalized outcome of a resolution
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResolutionResult {
    pub elements: Vec<ResolvedElement>,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl ResolutionResult {
    /// Result holding exactly `element`
    pub fn single(element: Element) -> Self {
        Self {
            elements: vec![ResolvedElement::Element(element)],
            errors: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Elements this result designates, checked against `index`
    ///
    /// Unknown ids and bare positions are skipped.
    pub fn matched_elements<'a>(&'a self, index: &'a ElementIndex) -> Vec<&'a Element> {
        self.elements
            .iter()
            .filter_map(|resolved| match resolved {
                ResolvedElement::Element(element) => Some(element),
                ResolvedElement::Id { id } => index.get(id),
                ResolvedElement::Position { .. } => None,
            })
            .collect()
    }
}

impl From<ElementListResponse> for ResolutionResult {
    fn from(response: ElementListResponse) -> Self {
        Self {
            elements: response.elements.into_iter().map(ResolvedElement::from).collect(),
            errors: response.errors,
        }
    }
}

/// What to locate
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InspectRequest {
    /// Natural-language description of the target
    pub target_description: String,

    /// Ask for every matching element instead of the best one
    #[serde(default)]
    pub multi: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quick_answer: Option<QuickAnswer>,
}

impl InspectRequest {
    /// Create a new InspectRequest
    pub fn new(target_description: impl Into<String>) -> Self {
        Self {
            target_description: target_description.into(),
            multi: false,
            quick_answer: None,
        }
    }

    /// Builder method: request every match
    pub fn multi(mut self, multi: bool) -> Self {
        self.multi = multi;
        self
    }

    /// Builder method: set quick answer
    pub fn with_quick_answer(mut self, quick_answer: QuickAnswer) -> Self {
        self.quick_answer = Some(quick_answer);
        self
    }
}

/// Result of [`inspect_element`]
#[derive(Debug, Clone)]
pub struct InspectOutput {
    pub parse_result: ResolutionResult,

    /// AI payload as received, or the quick answer that short-circuited it
    pub raw_response: Value,

    /// Index of the snapshot, synthetic elements included
    pub element_index: ElementIndex,

    /// Usage metadata from the AI, untouched
    pub usage: Option<Value>,
}

/// Resolve `request` against `context`
pub async fn inspect_element<C>(
    context: &mut UiContext,
    request: &InspectRequest,
    config: &LocatorConfig,
    caller: &C,
) -> Result<InspectOutput>
where
    C: AiCaller + ?Sized,
{
    let PageDescription {
        description,
        mut index,
        size,
    } = describe_page(context, config)?;

    if let Some(parse_result) = resolve_quick_answer(request.quick_answer.as_ref(), &mut context.tree, &mut index) {
        log::info!("Resolved \"{}\" from quick answer", request.target_description);
        return Ok(InspectOutput {
            parse_result,
            raw_response: serde_json::to_value(&request.quick_answer)?,
            element_index: index,
            usage: None,
        });
    }

    if request.target_description.trim().is_empty() {
        return Err(LocatorError::InvalidInput(
            "cannot find the target element: the target description is empty".to_string(),
        ));
    }

    let messages = build_locate_messages(
        &description,
        &request.target_description,
        request.multi,
        context.screenshot_for_ai(),
    );

    log::info!("Asking AI to locate \"{}\"", request.target_description);
    let response = caller
        .call(messages, AiActionType::InspectElement)
        .await
        .map_err(|e| LocatorError::AiCallFailed(format!("while locating \"{}\": {}", request.target_description, e)))?;

    let parse_result = normalize_response(
        &response.content,
        &request.target_description,
        &mut context.tree,
        &mut index,
        size,
    )?;

    Ok(InspectOutput {
        parse_result,
        raw_response: response.content,
        element_index: index,
        usage: response.usage,
    })
}

/// Turn a raw AI answer into a [`ResolutionResult`]
///
/// A `[x, y]` answer is scaled to page pixels and resolved to the smallest
/// enclosing element; when none encloses it, a synthetic element is
/// inserted into `tree` and `index`. An element list passes through as is.
pub fn normalize_response(
    content: &Value,
    target_description: &str,
    tree: &mut ElementTreeNode,
    index: &mut ElementIndex,
    size: Size,
) -> Result<ResolutionResult> {
    match AiResponse::from_value(content) {
        Ok(AiResponse::Position(relative)) => {
            let absolute = to_absolute(relative, size);
            let element = match element_at_position(tree, absolute) {
                Some(element) => element.clone(),
                None => {
                    log::warn!(
                        "No element at AI position ({}, {}) for \"{}\", inserting a synthetic one",
                        absolute.x,
                        absolute.y,
                        target_description
                    );
                    index.insert_by_position(tree, absolute)
                }
            };
            Ok(ResolutionResult::single(element))
        }
        Ok(AiResponse::ElementList(list)) => Ok(list.into()),
        Err(reason) => Err(LocatorError::MalformedResponse {
            description: target_description.to_string(),
            reason,
            raw: content.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{AiCallResponse, ChatMessage};
    use crate::dom::{NodeType, Rect};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    struct RecordingCaller {
        content: Value,
        seen: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl RecordingCaller {
        fn new(content: Value) -> Self {
            Self {
                content,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl AiCaller for RecordingCaller {
        async fn call(&self, messages: Vec<ChatMessage>, action: AiActionType) -> Result<AiCallResponse> {
            assert_eq!(action, AiActionType::InspectElement);
            self.seen.lock().unwrap().push(messages);
            Ok(AiCallResponse {
                content: self.content.clone(),
                usage: Some(json!({ "prompt_tokens": 10, "completion_tokens": 2 })),
            })
        }
    }

    struct FailingCaller;

    #[async_trait]
    impl AiCaller for FailingCaller {
        async fn call(&self, _messages: Vec<ChatMessage>, _action: AiActionType) -> Result<AiCallResponse> {
            Err(LocatorError::AiCallFailed("timeout".to_string()))
        }
    }

    fn create_test_context() -> UiContext {
        let mut container = ElementTreeNode::new(Element::new("C", NodeType::Container, Rect::new(0.0, 0.0, 200.0, 200.0)));
        container.add_child(ElementTreeNode::new(
            Element::new("L1", NodeType::Button, Rect::new(50.0, 50.0, 20.0, 20.0)).with_content("OK"),
        ));
        UiContext::new(ElementTreeNode::root().with_children(vec![container]), "data:image/png;base64,AAAA")
            .with_size(1000.0, 800.0)
    }

    #[tokio::test]
    async fn test_quick_answer_skips_ai() {
        let mut context = create_test_context();
        let caller = RecordingCaller::new(json!([0, 0]));
        let request = InspectRequest::new("").with_quick_answer(QuickAnswer::by_id("L1"));

        let output = inspect_element(&mut context, &request, &LocatorConfig::default(), &caller)
            .await
            .unwrap();

        assert_eq!(caller.calls(), 0);
        assert_eq!(output.parse_result.elements[0].id(), Some("L1"));
        assert_eq!(output.raw_response, json!({ "id": "L1" }));
        assert!(output.usage.is_none());
    }

    #[tokio::test]
    async fn test_empty_description_is_invalid_input() {
        let mut context = create_test_context();
        let caller = RecordingCaller::new(json!([0, 0]));

        let err = inspect_element(&mut context, &InspectRequest::new("   "), &LocatorConfig::default(), &caller)
            .await
            .unwrap_err();

        assert!(matches!(err, LocatorError::InvalidInput(_)));
        assert_eq!(caller.calls(), 0);
    }

    #[tokio::test]
    async fn test_ai_receives_system_and_user_turns() {
        let mut context = create_test_context();
        let caller = RecordingCaller::new(json!({ "elements": [{ "id": "L1" }], "errors": [] }));

        let output = inspect_element(&mut context, &InspectRequest::new("the OK button"), &LocatorConfig::default(), &caller)
            .await
            .unwrap();

        let seen = caller.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].len(), 2);
        assert_eq!(seen[0][0].role, "system");
        assert_eq!(seen[0][1].role, "user");

        assert_eq!(output.parse_result.elements, vec![ResolvedElement::Id { id: "L1".to_string() }]);
        assert_eq!(output.usage, Some(json!({ "prompt_tokens": 10, "completion_tokens": 2 })));
    }

    #[tokio::test]
    async fn test_position_answer_resolves_existing_element() {
        let mut context = create_test_context();
        // (60, 75) on the 0-1000 scale of a 1000x800 page is (60, 60)
        let caller = RecordingCaller::new(json!([60, 75]));

        let output = inspect_element(&mut context, &InspectRequest::new("OK"), &LocatorConfig::default(), &caller)
            .await
            .unwrap();

        assert_eq!(output.parse_result.elements[0].id(), Some("L1"));
        assert_eq!(context.tree.count_elements(), 2);
    }

    #[tokio::test]
    async fn test_position_answer_without_match_synthesizes() {
        let mut context = create_test_context();
        let caller = RecordingCaller::new(json!([500, 500]));

        let output = inspect_element(&mut context, &InspectRequest::new("the logo"), &LocatorConfig::default(), &caller)
            .await
            .unwrap();

        let ResolvedElement::Element(element) = &output.parse_result.elements[0] else {
            panic!("Expected a full element");
        };
        assert_eq!(element.rect, Rect::new(496.0, 396.0, 8.0, 8.0));
        assert_eq!(element.node_type, NodeType::Position);
        assert!(output.element_index.contains(&element.id));
        assert!(context.tree.find_by_id(&element.id).is_some());
    }

    #[tokio::test]
    async fn test_malformed_answer_keeps_description_and_raw() {
        let mut context = create_test_context();
        let caller = RecordingCaller::new(json!({ "answer": "somewhere" }));

        let err = inspect_element(&mut context, &InspectRequest::new("the OK button"), &LocatorConfig::default(), &caller)
            .await
            .unwrap_err();

        match err {
            LocatorError::MalformedResponse { description, raw, .. } => {
                assert_eq!(description, "the OK button");
                assert!(raw.contains("somewhere"));
            }
            other => panic!("Expected MalformedResponse, got {:?}", other),
        }
        assert_eq!(context.tree.count_elements(), 2);
    }

    #[tokio::test]
    async fn test_ai_failure_leaves_snapshot_untouched() {
        let mut context = create_test_context();
        let before = context.clone();

        let err = inspect_element(&mut context, &InspectRequest::new("the OK button"), &LocatorConfig::default(), &FailingCaller)
            .await
            .unwrap_err();

        assert!(matches!(err, LocatorError::AiCallFailed(ref msg) if msg.contains("the OK button") && msg.contains("timeout")));
        assert_eq!(context, before);
    }

    #[test]
    fn test_element_list_passes_through_unvalidated() {
        let mut context = create_test_context();
        let mut index = ElementIndex::build(&context.tree);

        let result = normalize_response(
            &json!({ "elements": [{ "id": "ghost" }, { "position": { "x": 1, "y": 2 } }], "errors": ["unsure"] }),
            "anything",
            &mut context.tree,
            &mut index,
            Size::new(100.0, 100.0),
        )
        .unwrap();

        assert_eq!(result.elements.len(), 2);
        assert_eq!(result.errors, vec!["unsure".to_string()]);
        assert!(result.matched_elements(&index).is_empty());
    }

    #[test]
    fn test_matched_elements() {
        let context = create_test_context();
        let index = ElementIndex::build(&context.tree);
        let result = ResolutionResult {
            elements: vec![
                ResolvedElement::Id { id: "L1".to_string() },
                ResolvedElement::Id { id: "missing".to_string() },
                ResolvedElement::Element(Element::synthetic(Point::new(5.0, 5.0))),
            ],
            errors: vec![],
        };

        let matched = result.matched_elements(&index);
        assert_eq!(matched.len(), 2);
        assert_eq!(matched[0].id, "L1");
        assert_eq!(matched[1].node_type, NodeType::Position);
    }

    #[test]
    fn test_resolution_result_serialization() {
        let result = ResolutionResult {
            elements: vec![ResolvedElement::Id { id: "a".to_string() }],
            errors: vec![],
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json, json!({ "elements": [{ "id": "a" }], "errors": [] }));

        let back: ResolutionResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }
}
