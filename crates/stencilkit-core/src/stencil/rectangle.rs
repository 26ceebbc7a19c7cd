//! Rectangle stencil.

use super::StencilShape;
use crate::geometry::Rect;
use kurbo::{BezPath, RoundedRect, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A rectangle with optional rounded corners.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rectangle {
    /// Corner radius (0 = sharp corners).
    #[serde(default)]
    pub corner_radius: f64,
}

impl Rectangle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rounded(corner_radius: f64) -> Self {
        Self { corner_radius }
    }
}

impl StencilShape for Rectangle {
    fn outline(&self, bounds: Rect) -> BezPath {
        if self.corner_radius > 0.0 {
            RoundedRect::from_rect(bounds, self.corner_radius).to_path(0.1)
        } else {
            bounds.to_path(0.1)
        }
    }

    fn variant_state(&self) -> Value {
        if self.corner_radius > 0.0 {
            serde_json::to_value(self).unwrap_or(Value::Null)
        } else {
            Value::Null
        }
    }

    fn apply_variant_state(&mut self, state: &Value) {
        if let Some(radius) = state.get("cornerRadius").and_then(Value::as_f64) {
            self.corner_radius = radius.max(0.0);
        }
    }

    fn clone_box(&self) -> Box<dyn StencilShape> {
        Box::new(self.clone())
    }
}
