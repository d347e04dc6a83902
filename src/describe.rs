//! Text rendering of a snapshot for the AI prompt

use crate::config::LocatorConfig;
use crate::context::UiContext;
use crate::dom::{Element, ElementIndex, ElementTreeNode, NodeType, Size};
use crate::error::Result;

/// Content length kept per element in the flat listing
const FLAT_CONTENT_SLICE: usize = 80;

/// Index, size and description text of one snapshot
#[derive(Debug, Clone)]
pub struct PageDescription {
    pub description: String,
    pub index: ElementIndex,
    pub size: Size,
}

/// `"W x H"`
pub fn describe_size(size: Size) -> String {
    format!("{} x {}", size.width, size.height)
}

/// Header explaining the [`describe_elements`] line format
pub fn describe_text_format() -> &'static str {
    "The following texts elements are formatted in the following way:\nid(string), left, top, right, bottom, content(may be truncated)"
}

/// One line per element: `id, left, top, right, bottom, content`
///
/// Right and bottom are given instead of width and height so the model does
/// not have to add them up.
pub fn describe_elements<'a>(elements: impl IntoIterator<Item = &'a Element>) -> String {
    elements
        .into_iter()
        .map(|element| {
            format!(
                "{}, {}, {}, {}, {}, {}",
                element.id,
                element.rect.left,
                element.rect.top,
                element.rect.right(),
                element.rect.bottom(),
                element.truncated_content(FLAT_CONTENT_SLICE)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Indented outline of the tree, one element per line
///
/// Payload-less nodes print nothing and their children take their place.
/// With `filter_non_text_content`, empty non-text elements are skipped the
/// same way.
pub fn describe_tree(tree: &ElementTreeNode, truncate_text_length: Option<usize>, filter_non_text_content: bool) -> String {
    let mut lines = Vec::new();
    describe_node(tree, 0, truncate_text_length, filter_non_text_content, &mut lines);
    lines.join("\n")
}

fn describe_node(
    node: &ElementTreeNode,
    depth: usize,
    truncate_text_length: Option<usize>,
    filter_non_text_content: bool,
    lines: &mut Vec<String>,
) {
    let mut child_depth = depth;

    if let Some(element) = &node.node {
        let skipped = filter_non_text_content && element.node_type != NodeType::Text && element.content.trim().is_empty();
        if !skipped {
            lines.push(format!("{}{}", "  ".repeat(depth), render_element(element, truncate_text_length)));
            child_depth = depth + 1;
        }
    }

    for child in &node.children {
        describe_node(child, child_depth, truncate_text_length, filter_non_text_content, lines);
    }
}

fn render_element(element: &Element, truncate_text_length: Option<usize>) -> String {
    let tag = element.node_type.tag();
    let mut attrs = format!("id=\"{}\"", element.id);
    if let Some(index_id) = element.index_id {
        attrs.push_str(&format!(" indexId=\"{}\"", index_id));
    }
    attrs.push_str(&format!(
        " left=\"{}\" top=\"{}\" width=\"{}\" height=\"{}\"",
        element.rect.left, element.rect.top, element.rect.width, element.rect.height
    ));

    let content = match truncate_text_length {
        Some(limit) => element.truncated_content(limit),
        None => element.content.clone(),
    };
    let content = content.replace(['\n', '\r'], " ");

    format!("<{tag} {attrs}>{}</{tag}>", content.trim())
}

/// Index the snapshot and render its description
pub fn describe_page(context: &UiContext, config: &LocatorConfig) -> Result<PageDescription> {
    let size = context.resolve_size()?;
    let index = ElementIndex::build(&context.tree);

    let mut description = format!("The size of the page: {}", describe_size(size));
    if !config.match_by_position {
        description.push_str("\nSome of the elements are marked with a rectangle in the screenshot, some are not.\nThe page elements tree:\n");
        description.push_str(&describe_tree(
            &context.tree,
            config.truncate_text_length,
            config.filter_non_text_content,
        ));
    }

    Ok(PageDescription { description, index, size })
}
