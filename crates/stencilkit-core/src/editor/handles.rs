//! Grips and port markers shown around the selected object.

use crate::connector::{Connector, ConnectorEnd};
use crate::geometry::{Point, PortLocation, Rect, Vec2};
use crate::stencil::Stencil;

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Edge positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

/// The kind of handle: determines what a drag on it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    /// Resize grip on a stencil corner.
    Corner(Corner),
    /// Resize grip on a stencil edge midpoint.
    Edge(Edge),
    /// Enabled port, shown in connect mode.
    Port(PortLocation),
    /// Connector endpoint grip.
    Endpoint(ConnectorEnd),
}

/// Visual shape of a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandleShape {
    #[default]
    Square,
    Circle,
}

/// A handle with its position in diagram coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub kind: HandleKind,
    pub position: Point,
    pub shape: HandleShape,
}

impl Handle {
    pub fn new(kind: HandleKind, position: Point) -> Self {
        Self {
            kind,
            position,
            shape: HandleShape::default(),
        }
    }

    pub fn with_shape(mut self, shape: HandleShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let dx = point.x - self.position.x;
        let dy = point.y - self.position.y;
        dx * dx + dy * dy <= tolerance * tolerance
    }
}

/// The eight resize grips of a bounding box.
pub fn resize_grips(bounds: Rect) -> Vec<Handle> {
    let center = bounds.center();
    vec![
        Handle::new(HandleKind::Corner(Corner::TopLeft), Point::new(bounds.x0, bounds.y0)),
        Handle::new(HandleKind::Edge(Edge::Top), Point::new(center.x, bounds.y0)),
        Handle::new(HandleKind::Corner(Corner::TopRight), Point::new(bounds.x1, bounds.y0)),
        Handle::new(HandleKind::Edge(Edge::Left), Point::new(bounds.x0, center.y)),
        Handle::new(HandleKind::Edge(Edge::Right), Point::new(bounds.x1, center.y)),
        Handle::new(HandleKind::Corner(Corner::BottomLeft), Point::new(bounds.x0, bounds.y1)),
        Handle::new(HandleKind::Edge(Edge::Bottom), Point::new(center.x, bounds.y1)),
        Handle::new(HandleKind::Corner(Corner::BottomRight), Point::new(bounds.x1, bounds.y1)),
    ]
}

/// Markers for the enabled ports of a stencil.
pub fn port_handles(stencil: &Stencil) -> Vec<Handle> {
    stencil
        .ports()
        .enabled()
        .map(|port| {
            Handle::new(HandleKind::Port(port.location), stencil.port_position(port.location))
                .with_shape(HandleShape::Circle)
        })
        .collect()
}

/// Grips on both ends of a connector.
pub fn endpoint_handles(connector: &Connector) -> Vec<Handle> {
    [ConnectorEnd::Start, ConnectorEnd::End]
        .into_iter()
        .map(|end| Handle::new(HandleKind::Endpoint(end), connector.point(end)).with_shape(HandleShape::Circle))
        .collect()
}

/// Closest handle within `tolerance` of `point`.
pub fn hit_test_handles(handles: &[Handle], point: Point, tolerance: f64) -> Option<HandleKind> {
    handles
        .iter()
        .filter(|h| h.hit_test(point, tolerance))
        .min_by(|a, b| a.position.distance(point).total_cmp(&b.position.distance(point)))
        .map(|h| h.kind)
}

/// Apply a resize drag to the bounds captured when the drag started.
///
/// Each grip moves only its own edges. The result may be inverted; the
/// stencil normalizes it, so dragging past the opposite edge flips the box.
pub fn resize_bounds(start: Rect, grip: HandleKind, delta: Vec2) -> Rect {
    let mut r = start;
    let (left, top, right, bottom) = match grip {
        HandleKind::Corner(Corner::TopLeft) => (true, true, false, false),
        HandleKind::Corner(Corner::TopRight) => (false, true, true, false),
        HandleKind::Corner(Corner::BottomLeft) => (true, false, false, true),
        HandleKind::Corner(Corner::BottomRight) => (false, false, true, true),
        HandleKind::Edge(Edge::Top) => (false, true, false, false),
        HandleKind::Edge(Edge::Right) => (false, false, true, false),
        HandleKind::Edge(Edge::Bottom) => (false, false, false, true),
        HandleKind::Edge(Edge::Left) => (true, false, false, false),
        HandleKind::Port(_) | HandleKind::Endpoint(_) => (false, false, false, false),
    };
    if left {
        r.x0 += delta.x;
    }
    if top {
        r.y0 += delta.y;
    }
    if right {
        r.x1 += delta.x;
    }
    if bottom {
        r.y1 += delta.y;
    }
    r
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stencil::Diamond;

    #[test]
    fn test_grip_positions() {
        let grips = resize_grips(Rect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(grips.len(), 8);
        assert_eq!(
            hit_test_handles(&grips, Point::new(99.0, 26.0), 8.0),
            Some(HandleKind::Edge(Edge::Right))
        );
        assert_eq!(
            hit_test_handles(&grips, Point::new(2.0, 48.0), 8.0),
            Some(HandleKind::Corner(Corner::BottomLeft))
        );
        assert_eq!(hit_test_handles(&grips, Point::new(30.0, 25.0), 8.0), None);
    }

    #[test]
    fn test_edge_grip_changes_one_side() {
        let start = Rect::new(10.0, 10.0, 110.0, 60.0);
        let r = resize_bounds(start, HandleKind::Edge(Edge::Top), Vec2::new(40.0, -5.0));
        assert_eq!(r, Rect::new(10.0, 5.0, 110.0, 60.0));
        let r = resize_bounds(start, HandleKind::Corner(Corner::BottomRight), Vec2::new(5.0, 5.0));
        assert_eq!(r, Rect::new(10.0, 10.0, 115.0, 65.0));
    }

    #[test]
    fn test_port_handles_skip_disabled() {
        let mut s = Stencil::new(1, "diamond", Box::new(Diamond::new()));
        s.set_bounds(Rect::new(0.0, 0.0, 40.0, 40.0));
        let handles = port_handles(&s);
        assert_eq!(handles.len(), 4);
        assert!(handles.iter().all(|h| h.shape == HandleShape::Circle));
    }
}
