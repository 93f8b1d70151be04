//! Widget node representation

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Widget bounding box in logical pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WidgetBounds {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Width in logical pixels
    pub width: f64,
    /// Height in logical pixels
    pub height: f64,
}

impl WidgetBounds {
    /// Create a new bounding box
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A box is valid when it has positive extent in both dimensions
    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Center point, where taps land
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// A node in the captured widget tree.
///
/// Identity is the opaque `id` handed out by the debug service. The
/// parent/child relation is carried as id strings in both directions so the
/// snapshot stays immutable and cycle-free.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetNode {
    /// Opaque id from the debug service
    pub id: String,

    /// Widget class name
    #[serde(rename = "type")]
    pub widget_type: String,

    /// Short diagnostic description
    pub description: String,

    /// Text content, when the widget carries any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Layout geometry, when the service provided it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<WidgetBounds>,

    /// Whether the widget is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Whether the widget is visible
    #[serde(default = "default_true")]
    pub visible: bool,

    /// Parent id; empty iff this is the root
    #[serde(default)]
    pub parent_id: String,

    /// Child ids in traversal order
    #[serde(default)]
    pub children_ids: Vec<String>,

    /// Remaining diagnostic fields, preserved verbatim
    #[serde(default)]
    pub properties: Map<String, Value>,
}

const fn default_true() -> bool {
    true
}

impl WidgetNode {
    /// Create a node with the given id and type
    pub fn new(id: impl Into<String>, widget_type: impl Into<String>) -> Self {
        let widget_type = widget_type.into();
        Self {
            id: id.into(),
            description: widget_type.clone(),
            widget_type,
            text: None,
            bounds: None,
            enabled: true,
            visible: true,
            parent_id: String::new(),
            children_ids: Vec::new(),
            properties: Map::new(),
        }
    }

    /// Set the text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the bounding box
    pub fn with_bounds(mut self, bounds: WidgetBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Set a diagnostic property
    pub fn with_property(mut self, name: impl Into<String>, value: Value) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    /// Whether this node is the tree root
    pub fn is_root(&self) -> bool {
        self.parent_id.is_empty()
    }

    /// Text-dump label: `Type` or `Type['text']`
    pub fn label(&self) -> String {
        match &self.text {
            Some(text) => format!("{}['{}']", self.widget_type, text),
            None => self.widget_type.clone(),
        }
    }
}
