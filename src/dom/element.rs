use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::collections::HashMap;

/// Side length, in pixels, of the square materialized for a synthetic element
pub const SYNTHETIC_ELEMENT_SIZE: f64 = 8.0;

/// Kind of a snapshot node
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    /// Groups children; never matched by position
    Container,
    FormItem,
    Button,
    Image,
    #[default]
    Text,
    /// Placeholder materialized at a reported position
    Position,
}

impl NodeType {
    /// Lowercase tag used when rendering descriptions
    pub fn tag(&self) -> &'static str {
        match self {
            NodeType::Container => "container",
            NodeType::FormItem => "form-item",
            NodeType::Button => "button",
            NodeType::Image => "image",
            NodeType::Text => "text",
            NodeType::Position => "position",
        }
    }
}

/// A point in page pixels (or on the 0-1000 scale, before transformation)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default, JsonSchema)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Size of the full page/screenshot in pixels
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Absolute rectangle of an element (left, top, width, height)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new Rect
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// The 8x8 square centered on `position`, clamped to the page origin
    pub fn around(position: Point) -> Self {
        let half = SYNTHETIC_ELEMENT_SIZE / 2.0;
        Self {
            left: (position.x - half).max(0.0),
            top: (position.y - half).max(0.0),
            width: SYNTHETIC_ELEMENT_SIZE,
            height: SYNTHETIC_ELEMENT_SIZE,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Calculate the area of the rectangle
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Inclusive on all four edges
    pub fn contains(&self, point: Point) -> bool {
        self.left <= point.x && point.x <= self.right() && self.top <= point.y && point.y <= self.bottom()
    }

    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Deterministic id derived from the rectangle geometry
    pub fn hash_id(&self) -> String {
        let mut hasher = Sha1::new();
        hasher.update(format!("{},{},{},{}", self.left, self.top, self.width, self.height).as_bytes());
        let digest = format!("{:x}", hasher.finalize());
        digest[..10].to_string()
    }
}

/// One node payload of a UI snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Element {
    /// Identifier, unique within a snapshot
    pub id: String,

    /// Numeric alias (marker number drawn on the screenshot)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_id: Option<u32>,

    #[serde(default)]
    pub node_type: NodeType,

    pub rect: Rect,

    /// Text content (may be truncated by the provider)
    #[serde(default)]
    pub content: String,

    /// Click point; derived from `rect` when the provider omits it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<[f64; 2]>,

    /// Any extra attributes reported by the snapshot provider
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, String>,
}

impl Element {
    /// Create a new Element
    pub fn new(id: impl Into<String>, node_type: NodeType, rect: Rect) -> Self {
        Self {
            id: id.into(),
            index_id: None,
            node_type,
            rect,
            content: String::new(),
            center: None,
            attributes: HashMap::new(),
        }
    }

    /// Placeholder anchored at `position` when no modeled element is there
    pub fn synthetic(position: Point) -> Self {
        let rect = Rect::around(position);
        Self::new(rect.hash_id(), NodeType::Position, rect).with_center(position)
    }

    /// Builder method: set content
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Builder method: set numeric alias
    pub fn with_index_id(mut self, index_id: u32) -> Self {
        self.index_id = Some(index_id);
        self
    }

    /// Builder method: set explicit center
    pub fn with_center(mut self, center: Point) -> Self {
        self.center = Some([center.x, center.y]);
        self
    }

    /// Builder method: set attributes
    pub fn with_attributes(mut self, attributes: HashMap<String, String>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Add a single attribute
    pub fn add_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    pub fn is_container(&self) -> bool {
        self.node_type == NodeType::Container
    }

    /// Center as reported, falling back to the rectangle center
    pub fn center(&self) -> Point {
        match self.center {
            Some([x, y]) => Point::new(x, y),
            None => self.rect.center(),
        }
    }

    /// Content cut to `limit` characters, with `...` appended when cut
    pub fn truncated_content(&self, limit: usize) -> String {
        if self.content.chars().count() > limit {
            let head: String = self.content.chars().take(limit).collect();
            format!("{}...", head)
        } else {
            self.content.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_creation() {
        let mut attrs = HashMap::new();
        attrs.insert("role".to_string(), "button".to_string());

        let element = Element::new("a1b2", NodeType::Button, Rect::new(10.0, 20.0, 100.0, 40.0))
            .with_content("Submit")
            .with_index_id(3)
            .with_attributes(attrs);

        assert_eq!(element.id, "a1b2");
        assert_eq!(element.index_id, Some(3));
        assert_eq!(element.content, "Submit");
        assert_eq!(element.attributes.get("role"), Some(&"button".to_string()));
        assert!(!element.is_container());
    }

    #[test]
    fn test_add_attribute() {
        let mut element = Element::new("a1b2", NodeType::FormItem, Rect::new(0.0, 0.0, 10.0, 10.0));
        element.add_attribute("placeholder", "Email");
        element.add_attribute("placeholder", "Email address");

        assert_eq!(element.attributes.len(), 1);
        assert_eq!(element.attributes.get("placeholder").map(String::as_str), Some("Email address"));

        let json = serde_json::to_value(&element).unwrap();
        assert_eq!(json["attributes"]["placeholder"], "Email address");
    }

    #[test]
    fn test_center_falls_back_to_rect() {
        let element = Element::new("x", NodeType::Text, Rect::new(0.0, 0.0, 20.0, 10.0));
        assert_eq!(element.center(), Point::new(10.0, 5.0));

        let explicit = element.with_center(Point::new(1.0, 2.0));
        assert_eq!(explicit.center(), Point::new(1.0, 2.0));
    }

    #[test]
    fn test_rect_contains_is_inclusive() {
        let rect = Rect::new(50.0, 50.0, 20.0, 20.0);

        assert!(rect.contains(Point::new(50.0, 50.0)));
        assert!(rect.contains(Point::new(70.0, 70.0)));
        assert!(rect.contains(Point::new(60.0, 55.5)));
        assert!(!rect.contains(Point::new(70.001, 60.0)));
        assert!(!rect.contains(Point::new(60.0, 49.999)));
    }

    #[test]
    fn test_rect_area() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(rect.area(), 5000.0);
        assert_eq!(rect.right(), 110.0);
        assert_eq!(rect.bottom(), 70.0);
    }

    #[test]
    fn test_rect_around_clamps_to_origin() {
        let rect = Rect::around(Point::new(2.0, 100.0));
        assert_eq!(rect, Rect::new(0.0, 96.0, 8.0, 8.0));
    }

    #[test]
    fn test_hash_id_is_deterministic() {
        let a = Rect::new(496.0, 396.0, 8.0, 8.0);
        let b = Rect::new(496.0, 396.0, 8.0, 8.0);
        let c = Rect::new(497.0, 396.0, 8.0, 8.0);

        assert_eq!(a.hash_id(), b.hash_id());
        assert_ne!(a.hash_id(), c.hash_id());
        assert_eq!(a.hash_id().len(), 10);
    }

    #[test]
    fn test_synthetic_element() {
        let element = Element::synthetic(Point::new(500.0, 400.0));

        assert_eq!(element.node_type, NodeType::Position);
        assert_eq!(element.rect, Rect::new(496.0, 396.0, 8.0, 8.0));
        assert_eq!(element.content, "");
        assert_eq!(element.center, Some([500.0, 400.0]));
        assert_eq!(element.id, element.rect.hash_id());
    }

    #[test]
    fn test_truncated_content() {
        let element = Element::new("t", NodeType::Text, Rect::default()).with_content("héllo world");
        assert_eq!(element.truncated_content(5), "héllo...");
        assert_eq!(element.truncated_content(50), "héllo world");
    }

    #[test]
    fn test_serialization() {
        let element = Element::new("btn", NodeType::Button, Rect::new(1.0, 2.0, 3.0, 4.0))
            .with_content("Click")
            .with_index_id(5);

        let json = serde_json::to_string(&element).unwrap();
        assert!(json.contains("\"node_type\":\"BUTTON\""));
        let deserialized: Element = serde_json::from_str(&json).unwrap();

        assert_eq!(element, deserialized);
    }

    #[test]
    fn test_deserialize_minimal_element() {
        let json = serde_json::json!({
            "id": "c1",
            "node_type": "CONTAINER",
            "rect": { "left": 0, "top": 0, "width": 200, "height": 200 }
        });

        let element: Element = serde_json::from_value(json).unwrap();
        assert!(element.is_container());
        assert!(element.content.is_empty());
        assert_eq!(element.index_id, None);
    }
}
