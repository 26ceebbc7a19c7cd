//! Plain-data snapshots of a diagram, for persistence.

use crate::connector::ArrowType;
use crate::geometry::{Point, PortLocation, Vec2};
use crate::style::{SerializableColor, ShapeStyle};
use crate::ObjectId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Snapshot of one stencil.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StencilState {
    pub id: ObjectId,
    pub type_name: String,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub style: ShapeStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Variant fields, e.g. text content and font size.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub data: Value,
}

/// Snapshot of one connector.
///
/// A bound end carries a stencil id and port location. A free end carries
/// its coordinates in `start_point` / `end_point` instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorState {
    pub id: ObjectId,
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_stencil_id: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_port_location: Option<PortLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_point: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_stencil_id: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_port_location: Option<PortLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_point: Option<Point>,
    #[serde(default = "ShapeStyle::connector")]
    pub style: ShapeStyle,
    #[serde(default)]
    pub arrow_type: ArrowType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub label_offset: Vec2,
}

/// Snapshot of a whole diagram.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramState {
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<SerializableColor>,
    #[serde(default)]
    pub stencils: Vec<StencilState>,
    #[serde(default)]
    pub connectors: Vec<ConnectorState>,
}

impl DiagramState {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Largest id among all stencils and connectors, or 0 when empty.
    pub fn max_id(&self) -> ObjectId {
        self.stencils
            .iter()
            .map(|s| s.id)
            .chain(self.connectors.iter().map(|c| c.id))
            .max()
            .unwrap_or(0)
    }
}
