//! Stencils: positioned, sized shapes that own a table of ports.

mod diamond;
mod ellipse;
pub mod ports;
mod rectangle;
mod text;

pub use diamond::Diamond;
pub use ellipse::Ellipse;
pub use ports::{Port, PortPoint, PortSnapshot, Ports};
pub use rectangle::Rectangle;
pub use text::Text;

use crate::config::EditorConfig;
use crate::geometry::{normalized_rect, Point, PortLocation, Rect, Size};
use crate::state::StencilState;
use crate::style::ShapeStyle;
use crate::ObjectId;
use kurbo::BezPath;
use serde_json::Value;

/// How a freshly placed stencil is positioned relative to the first press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreationAnchor {
    /// The press is the top-left corner; dragging stretches the box.
    TopLeft,
    /// The press is the center; dragging recenters the box.
    Center,
}

/// Variant-specific behavior of a stencil.
///
/// The common geometry (bounds, ports, style) lives on [`Stencil`]; an
/// implementation only describes what differs between kinds. Factories in the
/// [`crate::StencilSet`] return boxed implementations.
pub trait StencilShape: std::fmt::Debug + Send + Sync {
    /// Ports this kind never accepts connections on.
    fn disabled_ports(&self) -> &'static [PortLocation] {
        &[]
    }

    fn creation_anchor(&self) -> CreationAnchor {
        CreationAnchor::TopLeft
    }

    /// Size of the box placed by the first press of an interactive creation.
    fn default_size(&self, config: &EditorConfig) -> Size {
        config.default_stencil_size
    }

    /// Check if a point hits the shape drawn inside `bounds`.
    fn hit_test(&self, bounds: Rect, point: Point, tolerance: f64) -> bool {
        bounds.inflate(tolerance, tolerance).contains(point)
    }

    /// Outline of the shape inside `bounds`, for renderers.
    fn outline(&self, bounds: Rect) -> BezPath;

    /// Text content, for text-bearing kinds.
    fn text(&self) -> Option<&str> {
        None
    }

    /// Replace the text content. Returns false if this kind has no text.
    fn set_text(&mut self, _text: &str) -> bool {
        false
    }

    /// Variant fields as plain data, stored in the stencil snapshot.
    fn variant_state(&self) -> Value {
        Value::Null
    }

    /// Apply variant fields from a snapshot. Unknown or missing fields keep
    /// their current values.
    fn apply_variant_state(&mut self, _state: &Value) {}

    /// Clone this shape into a boxed trait object.
    fn clone_box(&self) -> Box<dyn StencilShape>;
}

/// A positioned, sized shape with eight attachment ports.
#[derive(Debug)]
pub struct Stencil {
    pub(crate) id: ObjectId,
    type_name: String,
    bounds: Rect,
    /// Style properties.
    pub style: ShapeStyle,
    /// Free-form notes attached by the user.
    pub notes: Option<String>,
    ports: Ports,
    shape: Box<dyn StencilShape>,
}

impl Clone for Stencil {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            type_name: self.type_name.clone(),
            bounds: self.bounds,
            style: self.style.clone(),
            notes: self.notes.clone(),
            ports: self.ports.clone(),
            shape: self.shape.clone_box(),
        }
    }
}

impl Stencil {
    /// Create a zero-sized stencil at the origin.
    pub(crate) fn new(id: ObjectId, type_name: impl Into<String>, shape: Box<dyn StencilShape>) -> Self {
        let ports = Ports::new(shape.disabled_ports());
        Self {
            id,
            type_name: type_name.into(),
            bounds: Rect::ZERO,
            style: ShapeStyle::default(),
            notes: None,
            ports,
            shape,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Registry name of this stencil's kind.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn left(&self) -> f64 {
        self.bounds.x0
    }

    pub fn top(&self) -> f64 {
        self.bounds.y0
    }

    pub fn width(&self) -> f64 {
        self.bounds.width()
    }

    pub fn height(&self) -> f64 {
        self.bounds.height()
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Set the bounding box, normalizing negative extents, and reposition ports.
    ///
    /// Callers inside the crate must adjust bound connectors afterwards; the
    /// public path is [`crate::Diagram::set_stencil_bounds`].
    pub(crate) fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = normalized_rect(bounds.x0, bounds.y0, bounds.x1 - bounds.x0, bounds.y1 - bounds.y0);
        self.position_ports();
    }

    /// Recompute port coordinates from the current size.
    pub fn position_ports(&mut self) {
        self.ports.position(self.bounds.size());
    }

    pub fn ports(&self) -> &Ports {
        &self.ports
    }

    pub(crate) fn ports_mut(&mut self) -> &mut Ports {
        &mut self.ports
    }

    pub fn port(&self, location: PortLocation) -> &Port {
        self.ports.get(location)
    }

    /// Absolute position of a port.
    pub fn port_position(&self, location: PortLocation) -> Point {
        self.port(location).position() + self.bounds.origin().to_vec2()
    }

    /// Immutable projection of the ports in diagram coordinates.
    pub fn port_snapshot(&self) -> PortSnapshot {
        PortSnapshot::new(self.id, self.bounds, &self.ports)
    }

    /// Closest enabled port within `tolerance` of `point`.
    pub fn port_at(&self, point: Point, tolerance: f64) -> Option<PortLocation> {
        let origin = self.bounds.origin().to_vec2();
        self.ports
            .enabled()
            .map(|p| (p.location, (p.position() + origin).distance(point)))
            .filter(|(_, dist)| *dist <= tolerance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(loc, _)| loc)
    }

    /// Check if a point hits the stencil body.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.shape.hit_test(self.bounds, point, tolerance)
    }

    pub fn outline(&self) -> BezPath {
        self.shape.outline(self.bounds)
    }

    pub fn shape(&self) -> &dyn StencilShape {
        self.shape.as_ref()
    }

    pub fn shape_mut(&mut self) -> &mut dyn StencilShape {
        self.shape.as_mut()
    }

    pub fn is_text_bearing(&self) -> bool {
        self.shape.text().is_some()
    }

    pub fn text(&self) -> Option<&str> {
        self.shape.text()
    }

    pub fn set_text(&mut self, text: &str) -> bool {
        self.shape.set_text(text)
    }

    /// Plain-data snapshot of this stencil.
    pub fn state(&self) -> StencilState {
        StencilState {
            id: self.id,
            type_name: self.type_name.clone(),
            left: self.left(),
            top: self.top(),
            width: self.width(),
            height: self.height(),
            style: self.style.clone(),
            notes: self.notes.clone(),
            data: self.shape.variant_state(),
        }
    }

    /// Apply every non-identity field of a snapshot.
    pub(crate) fn apply_state(&mut self, state: &StencilState) {
        self.style = state.style.clone();
        self.notes = state.notes.clone();
        self.shape.apply_variant_state(&state.data);
        self.set_bounds(normalized_rect(state.left, state.top, state.width, state.height));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stencil(shape: Box<dyn StencilShape>) -> Stencil {
        let mut s = Stencil::new(1, "test", shape);
        s.set_bounds(Rect::new(10.0, 20.0, 110.0, 70.0));
        s
    }

    #[test]
    fn test_port_positions_follow_bounds() {
        let s = stencil(Box::new(Rectangle::new()));
        assert_eq!(s.port_position(PortLocation::RightCenter), Point::new(110.0, 45.0));
        assert_eq!(s.port(PortLocation::RightCenter).position(), Point::new(100.0, 25.0));
    }

    #[test]
    fn test_set_bounds_normalizes() {
        let mut s = stencil(Box::new(Rectangle::new()));
        s.set_bounds(Rect::new(50.0, 0.0, 20.0, 10.0));
        assert!((s.left() - 20.0).abs() < f64::EPSILON);
        assert!((s.width() - 30.0).abs() < f64::EPSILON);
        assert!(s.width() >= 0.0 && s.height() >= 0.0);
    }

    #[test]
    fn test_port_at_skips_disabled() {
        let s = stencil(Box::new(Diamond::new()));
        assert_eq!(s.port_at(Point::new(10.0, 20.0), 5.0), None);
        assert_eq!(s.port_at(Point::new(61.0, 21.0), 5.0), Some(PortLocation::TopCenter));
    }

    #[test]
    fn test_state_round_trip() {
        let mut s = stencil(Box::new(Text::new("hello")));
        s.notes = Some("note".into());
        let state = s.state();

        let mut restored = Stencil::new(1, "test", Box::new(Text::new("")));
        restored.apply_state(&state);
        assert_eq!(restored.state(), state);
        assert_eq!(restored.text(), Some("hello"));
    }

    #[test]
    fn test_clone_keeps_variant() {
        let s = stencil(Box::new(Text::new("copy me")));
        let copy = s.clone();
        assert_eq!(copy.text(), Some("copy me"));
        assert_eq!(copy.bounds(), s.bounds());
    }
}
