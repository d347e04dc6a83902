//! # element-locator
//!
//! Resolves a natural-language or coordinate-based description of a UI element into a
//! concrete element of a previously captured snapshot (element tree + screenshot).
//!
//! ## Features
//!
//! - **Snapshot indexing**: Flatten an element tree into id/alias lookups
//! - **Spatial lookup**: Find the smallest actionable element under a point
//! - **Quick answers**: Skip the AI when the caller already knows the id or position
//! - **AI normalization**: Turn loosely-typed model answers into a typed result,
//!   materializing placeholder elements where the model points at nothing known
//! - **Extraction and assertions**: Ask the AI for page data or a pass/fail verdict
//!
//! ## Library Usage
//!
//! ### Resolving without the AI
//!
//! ```rust
//! use element_locator::{Element, ElementTreeNode, NodeType, Point, Rect, element_at_position};
//!
//! let mut panel = ElementTreeNode::new(Element::new("panel", NodeType::Container, Rect::new(0.0, 0.0, 200.0, 200.0)));
//! panel.add_child(ElementTreeNode::new(Element::new("ok", NodeType::Button, Rect::new(50.0, 50.0, 20.0, 20.0))));
//! let tree = ElementTreeNode::root().with_children(vec![panel]);
//!
//! let found = element_at_position(&tree, Point::new(60.0, 60.0));
//! assert_eq!(found.map(|e| e.id.as_str()), Some("ok"));
//! ```
//!
//! ### Resolving with an AI collaborator
//!
//! ```rust,no_run
//! use element_locator::{AiCaller, InspectRequest, LocatorConfig, UiContext, inspect_element};
//!
//! # async fn run(caller: &dyn AiCaller) -> element_locator::Result<()> {
//! let mut context = UiContext::from_json_file("snapshot.json")?;
//! let request = InspectRequest::new("the blue Sign in button");
//!
//! let output = inspect_element(&mut context, &request, &LocatorConfig::default(), caller).await?;
//! for element in output.parse_result.matched_elements(&output.element_index) {
//!     println!("{} at {:?}", element.id, element.center());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`dom`]: Element model, tree, index and spatial lookup
//! - [`geometry`]: Normalized (0-1000) to absolute coordinates
//! - [`quick_answer`]: Caller-supplied shortcuts
//! - [`inspect`]: The resolution pipeline and result types
//! - [`query`]: Data extraction and assertions
//! - [`ai`]: Boundary with the AI collaborator
//! - [`describe`]: Page description rendering
//! - [`insight`] / [`dump`]: Resolution with diagnostic records
//! - [`error`]: Error types and result aliases

pub mod ai;
pub mod config;
pub mod context;
pub mod describe;
pub mod dom;
pub mod dump;
pub mod error;
pub mod geometry;
pub mod insight;
pub mod inspect;
pub mod query;
pub mod quick_answer;

pub use ai::{AiActionType, AiCallResponse, AiCaller, AiResponse, AssertionResponse, ChatMessage, ExtractResponse};
pub use config::LocatorConfig;
pub use context::{UiContext, image_size_of_base64};
pub use describe::{PageDescription, describe_page};
pub use dom::{Element, ElementIndex, ElementTreeNode, NodeType, Point, Rect, Size, element_at_position};
pub use dump::{DumpStore, InsightDump};
pub use error::{LocatorError, Result};
pub use geometry::to_absolute;
pub use insight::{Insight, LocateOutcome};
pub use inspect::{InspectOutput, InspectRequest, ResolutionResult, ResolvedElement, inspect_element, normalize_response};
pub use query::{AssertOutput, DataQuery, ExtractOutput, ai_assert, extract_element_info};
pub use quick_answer::{QuickAnswer, resolve_quick_answer};
