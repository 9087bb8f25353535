//! Diagram theme configuration.
//!
//! Defaults follow GitHub's light palette: white rounded boxes with green
//! borders for containers, amber for datastores and gray for the rest.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use topo_core::Category;

/// Mermaid node shape.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NodeShape {
    Rect,
    Rounded,
    Stadium,
    Cylinder,
    Hexagon,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct CategoryStyle {
    pub fill: String,
    pub stroke: String,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: String,
    /// Text color.
    pub color: String,
    #[serde(default = "default_shape")]
    pub shape: NodeShape,
    /// Corner radius in pixels; 0 disables `rx`/`ry`.
    #[serde(default = "default_corner_radius")]
    pub corner_radius: u32,
}

impl CategoryStyle {
    fn github(stroke: &str, shape: NodeShape) -> Self {
        Self {
            fill: "#ffffff".to_string(),
            stroke: stroke.to_string(),
            stroke_width: default_stroke_width(),
            color: "#1f2328".to_string(),
            shape,
            corner_radius: default_corner_radius(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct EdgeStyle {
    pub stroke: String,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: String,
}

impl Default for EdgeStyle {
    fn default() -> Self {
        Self {
            stroke: "#2da44e".to_string(),
            stroke_width: default_stroke_width(),
        }
    }
}

/// Mermaid `themeVariables`, written in declaration order.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ThemeVariables {
    pub primary_color: String,
    pub primary_text_color: String,
    pub primary_border_color: String,
    pub line_color: String,
    pub secondary_color: String,
    pub tertiary_color: String,
    pub background: String,
}

impl Default for ThemeVariables {
    fn default() -> Self {
        Self {
            primary_color: "#ffffff".to_string(),
            primary_text_color: "#1f2328".to_string(),
            primary_border_color: "#d1d9e0".to_string(),
            line_color: "#2da44e".to_string(),
            secondary_color: "#f6f8fa".to_string(),
            tertiary_color: "#ffffff".to_string(),
            background: "#ffffff".to_string(),
        }
    }
}

fn default_stroke_width() -> String {
    "1.5px".to_string()
}

const fn default_shape() -> NodeShape {
    NodeShape::Rect
}

const fn default_corner_radius() -> u32 {
    6
}

fn default_direction() -> String {
    "LR".to_string()
}

fn default_font_family() -> String {
    "-apple-system, BlinkMacSystemFont, Segoe UI, Noto Sans, Helvetica, Arial, sans-serif"
        .to_string()
}

fn default_font_size() -> String {
    "14px".to_string()
}

fn default_label_keys() -> Vec<String> {
    vec!["image".to_string(), "port".to_string()]
}

fn default_categories() -> BTreeMap<Category, CategoryStyle> {
    BTreeMap::from([
        (
            Category::Container,
            CategoryStyle::github("#2da44e", NodeShape::Rect),
        ),
        (
            Category::Datastore,
            CategoryStyle::github("#d4a72c", NodeShape::Cylinder),
        ),
        (
            Category::Other,
            CategoryStyle::github("#d1d9e0", NodeShape::Rounded),
        ),
    ])
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ThemeConfig {
    /// Flowchart direction: `LR`, `RL`, `TB`, `TD` or `BT`.
    #[serde(default = "default_direction")]
    pub direction: String,

    #[serde(default = "default_font_family")]
    pub font_family: String,

    #[serde(default = "default_font_size")]
    pub font_size: String,

    #[serde(default)]
    pub variables: ThemeVariables,

    #[serde(default = "default_categories")]
    pub categories: BTreeMap<Category, CategoryStyle>,

    #[serde(default)]
    pub edge: EdgeStyle,

    /// Metadata keys shown under the node name, in order.
    #[serde(default = "default_label_keys")]
    pub label_keys: Vec<String>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            direction: default_direction(),
            font_family: default_font_family(),
            font_size: default_font_size(),
            variables: ThemeVariables::default(),
            categories: default_categories(),
            edge: EdgeStyle::default(),
            label_keys: default_label_keys(),
        }
    }
}

impl ThemeConfig {
    /// Style for `category`, falling back to the `other` style and then to a
    /// neutral gray box.
    #[must_use]
    pub fn style_for(&self, category: Category) -> CategoryStyle {
        self.categories
            .get(&category)
            .or_else(|| self.categories.get(&Category::Other))
            .cloned()
            .unwrap_or_else(|| CategoryStyle::github("#d1d9e0", NodeShape::Rect))
    }

    #[must_use]
    pub fn has_valid_direction(&self) -> bool {
        matches!(self.direction.as_str(), "LR" | "RL" | "TB" | "TD" | "BT")
    }
}
