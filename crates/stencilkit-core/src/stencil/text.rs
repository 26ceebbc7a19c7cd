//! Text stencil.

use super::{CreationAnchor, StencilShape};
use crate::config::EditorConfig;
use crate::geometry::{Rect, Size};
use kurbo::{BezPath, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default font size in pixels.
pub const DEFAULT_FONT_SIZE: f64 = 16.0;

/// A free-standing text block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    /// The text content.
    pub content: String,
    /// Font size in pixels.
    pub font_size: f64,
}

impl Text {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

impl Default for Text {
    fn default() -> Self {
        Self::new("")
    }
}

impl StencilShape for Text {
    fn creation_anchor(&self) -> CreationAnchor {
        CreationAnchor::Center
    }

    fn default_size(&self, config: &EditorConfig) -> Size {
        config.default_text_size
    }

    fn outline(&self, bounds: Rect) -> BezPath {
        bounds.to_path(0.1)
    }

    fn text(&self) -> Option<&str> {
        Some(&self.content)
    }

    fn set_text(&mut self, text: &str) -> bool {
        self.content = text.to_string();
        true
    }

    fn variant_state(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    fn apply_variant_state(&mut self, state: &Value) {
        if let Some(content) = state.get("content").and_then(Value::as_str) {
            self.content = content.to_string();
        }
        if let Some(size) = state.get("fontSize").and_then(Value::as_f64) {
            if size > 0.0 {
                self.font_size = size;
            }
        }
    }

    fn clone_box(&self) -> Box<dyn StencilShape> {
        Box::new(self.clone())
    }
}
