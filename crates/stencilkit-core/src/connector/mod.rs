//! Connectors: routed edges between stencil ports.
//!
//! A connector end is either free (it owns its coordinates) or bound to a
//! `(stencil, port)` pair, in which case its coordinates are re-derived from
//! the port on every [`Connector::adjust`]. The path itself is produced by a
//! pluggable [`ConnectorRouter`].

mod angled;
mod curved;
mod straight;

pub use angled::AngledRouter;
pub use curved::CurvedRouter;
pub use straight::StraightRouter;

use crate::config::EditorConfig;
use crate::geometry::{point_to_polyline_dist, Point, PortLocation, Rect, Size, Vec2};
use crate::state::ConnectorState;
use crate::stencil::PortSnapshot;
use crate::style::ShapeStyle;
use crate::ObjectId;
use kurbo::{BezPath, PathEl};
use serde::{Deserialize, Serialize};

/// Which end of a connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectorEnd {
    Start,
    End,
}

impl ConnectorEnd {
    pub fn other(self) -> ConnectorEnd {
        match self {
            ConnectorEnd::Start => ConnectorEnd::End,
            ConnectorEnd::End => ConnectorEnd::Start,
        }
    }
}

/// Where a connector end is attached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Endpoint {
    /// Unattached; the coordinates are authoritative.
    Free(Point),
    /// Attached to a port; coordinates are derived from the port.
    Bound { stencil: ObjectId, port: PortLocation },
}

impl Endpoint {
    pub fn bound(stencil: ObjectId, port: PortLocation) -> Self {
        Endpoint::Bound { stencil, port }
    }

    pub fn stencil(&self) -> Option<ObjectId> {
        match self {
            Endpoint::Bound { stencil, .. } => Some(*stencil),
            Endpoint::Free(_) => None,
        }
    }

    pub fn port(&self) -> Option<PortLocation> {
        match self {
            Endpoint::Bound { port, .. } => Some(*port),
            Endpoint::Free(_) => None,
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self, Endpoint::Bound { .. })
    }
}

/// Which ends carry an arrowhead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowType {
    #[default]
    None,
    Start,
    End,
    Both,
}

impl ArrowType {
    pub fn at_start(self) -> bool {
        matches!(self, ArrowType::Start | ArrowType::Both)
    }

    pub fn at_end(self) -> bool {
        matches!(self, ArrowType::End | ArrowType::Both)
    }

    pub fn at(self, end: ConnectorEnd) -> bool {
        match end {
            ConnectorEnd::Start => self.at_start(),
            ConnectorEnd::End => self.at_end(),
        }
    }
}

/// Routing constants, copied from the diagram's [`EditorConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutingConfig {
    pub arrow_size: f64,
    pub min_segment_length: f64,
    pub curve_min_control_distance: f64,
    pub label_padding_factor: f64,
}

impl From<&EditorConfig> for RoutingConfig {
    fn from(config: &EditorConfig) -> Self {
        Self {
            arrow_size: config.arrow_size,
            min_segment_length: config.min_segment_length,
            curve_min_control_distance: config.curve_min_control_distance,
            label_padding_factor: config.label_padding_factor,
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self::from(&EditorConfig::default())
    }
}

/// One end of a routing request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteEnd {
    pub point: Point,
    /// Port the end is bound to, only if that port is enabled.
    pub port: Option<PortLocation>,
    /// Bounds of the stencil the end is bound to.
    pub bounds: Option<Rect>,
    pub arrow: bool,
}

/// Everything a router needs to lay out a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteRequest {
    pub start: RouteEnd,
    pub end: RouteEnd,
    pub config: RoutingConfig,
}

impl RouteRequest {
    /// Angle of the straight line from start to end.
    pub fn line_angle(&self) -> f64 {
        let d = self.end.point - self.start.point;
        d.y.atan2(d.x)
    }
}

/// Output of a router.
#[derive(Debug, Clone, Default)]
pub struct Route {
    pub path: BezPath,
    /// Direction an arrowhead at the start points in (radians).
    pub start_angle: f64,
    /// Direction an arrowhead at the end points in (radians).
    pub end_angle: f64,
}

/// A routing strategy.
pub trait ConnectorRouter: std::fmt::Debug + Send + Sync {
    fn route(&self, request: &RouteRequest) -> Route;

    /// Clone this router into a boxed trait object.
    fn clone_box(&self) -> Box<dyn ConnectorRouter>;
}

/// Shorten a line end by the arrow size to make room for the arrowhead.
///
/// With a known port the offset runs along the port's outward normal, one
/// arrow size per axis; otherwise it runs along `toward`, the unit direction
/// from this end to the rest of the line.
pub(crate) fn arrow_offset(end: &RouteEnd, toward: Vec2, size: f64) -> Point {
    if !end.arrow {
        return end.point;
    }
    match end.port {
        Some(port) => end.point + port.direction().axes() * size,
        None => {
            let len = toward.hypot();
            if len < f64::EPSILON {
                end.point
            } else {
                end.point + toward * (size / len)
            }
        }
    }
}

/// A triangular arrowhead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowHead {
    pub tip: Point,
    pub left: Point,
    pub right: Point,
    /// Direction the arrow points in (radians).
    pub angle: f64,
}

impl ArrowHead {
    pub fn new(tip: Point, angle: f64, size: f64) -> Self {
        let dir = Vec2::from_angle(angle);
        let perp = Vec2::new(-dir.y, dir.x);
        let back = tip - dir * size;
        Self {
            tip,
            left: back + perp * (size * 0.5),
            right: back - perp * (size * 0.5),
            angle,
        }
    }

    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.tip);
        path.line_to(self.left);
        path.line_to(self.right);
        path.close_path();
        path
    }
}

/// A routed edge between two endpoints.
#[derive(Debug)]
pub struct Connector {
    pub(crate) id: ObjectId,
    type_name: String,
    start: Endpoint,
    end: Endpoint,
    /// Style properties.
    pub style: ShapeStyle,
    /// Which ends carry arrowheads.
    pub arrow: ArrowType,
    /// Optional label text.
    pub label: Option<String>,
    /// User displacement of the label from its default center.
    pub label_offset: Vec2,
    router: Box<dyn ConnectorRouter>,
    routing: RoutingConfig,
    start_point: Point,
    end_point: Point,
    start_route: RouteEnd,
    end_route: RouteEnd,
    route: Route,
    start_head: Option<ArrowHead>,
    end_head: Option<ArrowHead>,
}

impl Clone for Connector {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            type_name: self.type_name.clone(),
            start: self.start,
            end: self.end,
            style: self.style.clone(),
            arrow: self.arrow,
            label: self.label.clone(),
            label_offset: self.label_offset,
            router: self.router.clone_box(),
            routing: self.routing,
            start_point: self.start_point,
            end_point: self.end_point,
            start_route: self.start_route,
            end_route: self.end_route,
            route: self.route.clone(),
            start_head: self.start_head,
            end_head: self.end_head,
        }
    }
}

impl Connector {
    /// Create a connector with both ends free at the origin.
    pub(crate) fn new(
        id: ObjectId,
        type_name: impl Into<String>,
        router: Box<dyn ConnectorRouter>,
        routing: RoutingConfig,
    ) -> Self {
        let free = RouteEnd {
            point: Point::ZERO,
            port: None,
            bounds: None,
            arrow: false,
        };
        Self {
            id,
            type_name: type_name.into(),
            start: Endpoint::Free(Point::ZERO),
            end: Endpoint::Free(Point::ZERO),
            style: ShapeStyle::connector(),
            arrow: ArrowType::None,
            label: None,
            label_offset: Vec2::ZERO,
            router,
            routing,
            start_point: Point::ZERO,
            end_point: Point::ZERO,
            start_route: free,
            end_route: free,
            route: Route::default(),
            start_head: None,
            end_head: None,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Registry name of this connector's routing kind.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn start(&self) -> Endpoint {
        self.start
    }

    pub fn end(&self) -> Endpoint {
        self.end
    }

    pub fn endpoint(&self, which: ConnectorEnd) -> Endpoint {
        match which {
            ConnectorEnd::Start => self.start,
            ConnectorEnd::End => self.end,
        }
    }

    /// Replace an endpoint. Port back-references are the caller's job; use
    /// [`crate::Diagram::set_endpoint`] from outside the crate.
    pub(crate) fn set_endpoint(&mut self, which: ConnectorEnd, endpoint: Endpoint) {
        match which {
            ConnectorEnd::Start => self.start = endpoint,
            ConnectorEnd::End => self.end = endpoint,
        }
    }

    /// Derived absolute start coordinate, as of the last [`adjust`](Self::adjust).
    pub fn start_point(&self) -> Point {
        self.start_point
    }

    /// Derived absolute end coordinate, as of the last [`adjust`](Self::adjust).
    pub fn end_point(&self) -> Point {
        self.end_point
    }

    pub fn point(&self, which: ConnectorEnd) -> Point {
        match which {
            ConnectorEnd::Start => self.start_point,
            ConnectorEnd::End => self.end_point,
        }
    }

    pub fn path(&self) -> &BezPath {
        &self.route.path
    }

    pub fn start_head(&self) -> Option<&ArrowHead> {
        self.start_head.as_ref()
    }

    pub fn end_head(&self) -> Option<&ArrowHead> {
        self.end_head.as_ref()
    }

    pub fn routing(&self) -> RoutingConfig {
        self.routing
    }

    /// Re-derive endpoint coordinates from bound ports, then rebuild the path.
    ///
    /// `lookup` resolves a stencil id to its current port snapshot. A bound end
    /// whose stencil no longer resolves keeps its last derived coordinate.
    pub fn adjust(&mut self, lookup: impl Fn(ObjectId) -> Option<PortSnapshot>) {
        self.start_route = Self::resolve(&self.start, self.start_point, &lookup);
        self.end_route = Self::resolve(&self.end, self.end_point, &lookup);
        self.start_point = self.start_route.point;
        self.end_point = self.end_route.point;
        self.adjust_visual();
    }

    fn resolve(
        endpoint: &Endpoint,
        last: Point,
        lookup: &impl Fn(ObjectId) -> Option<PortSnapshot>,
    ) -> RouteEnd {
        match *endpoint {
            Endpoint::Free(point) => RouteEnd {
                point,
                port: None,
                bounds: None,
                arrow: false,
            },
            Endpoint::Bound { stencil, port } => match lookup(stencil) {
                Some(snapshot) => {
                    let p = snapshot.port(port);
                    RouteEnd {
                        point: p.position,
                        port: p.enabled.then_some(port),
                        bounds: Some(snapshot.bounds),
                        arrow: false,
                    }
                }
                None => RouteEnd {
                    point: last,
                    port: None,
                    bounds: None,
                    arrow: false,
                },
            },
        }
    }

    /// Rebuild path geometry and arrowheads from the current endpoint coordinates.
    pub fn adjust_visual(&mut self) {
        self.start_route.arrow = self.arrow.at_start();
        self.end_route.arrow = self.arrow.at_end();
        let request = RouteRequest {
            start: self.start_route,
            end: self.end_route,
            config: self.routing,
        };
        self.route = self.router.route(&request);
        let size = self.routing.arrow_size;
        self.start_head = self
            .arrow
            .at_start()
            .then(|| ArrowHead::new(self.start_point, self.route.start_angle, size));
        self.end_head = self
            .arrow
            .at_end()
            .then(|| ArrowHead::new(self.end_point, self.route.end_angle, size));
    }

    /// Center of the label: the middle of the endpoints' bounding box plus the
    /// user offset.
    pub fn label_position(&self) -> Point {
        Rect::from_points(self.start_point, self.end_point).center() + self.label_offset
    }

    /// Background box for a label whose text measures `text_size`.
    pub fn label_box(&self, text_size: Size) -> Rect {
        let factor = self.routing.label_padding_factor;
        Rect::from_center_size(
            self.label_position(),
            Size::new(text_size.width * factor, text_size.height * factor),
        )
    }

    /// Points along the flattened path.
    pub fn polyline(&self) -> Vec<Point> {
        let mut points = Vec::new();
        kurbo::flatten(self.route.path.iter(), 0.5, |el| match el {
            PathEl::MoveTo(p) | PathEl::LineTo(p) => points.push(p),
            _ => {}
        });
        points
    }

    /// Check if a point lies on the connector's path or arrowheads.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let reach = tolerance + self.style.stroke_width / 2.0;
        let points = self.polyline();
        if points.len() >= 2 && point_to_polyline_dist(point, &points) <= reach {
            return true;
        }
        [self.start_head, self.end_head]
            .iter()
            .flatten()
            .any(|head| point_to_polyline_dist(point, &[head.tip, head.left, head.right, head.tip]) <= reach)
    }

    /// Plain-data snapshot of this connector.
    pub fn state(&self) -> ConnectorState {
        let free_point = |e: &Endpoint| match e {
            Endpoint::Free(p) => Some(*p),
            Endpoint::Bound { .. } => None,
        };
        ConnectorState {
            id: self.id,
            type_name: self.type_name.clone(),
            start_stencil_id: self.start.stencil(),
            start_port_location: self.start.port(),
            start_point: free_point(&self.start),
            end_stencil_id: self.end.stencil(),
            end_port_location: self.end.port(),
            end_point: free_point(&self.end),
            style: self.style.clone(),
            arrow_type: self.arrow,
            label: self.label.clone(),
            label_offset: self.label_offset,
        }
    }

    /// Apply the non-endpoint fields of a snapshot.
    pub(crate) fn apply_state(&mut self, state: &ConnectorState) {
        self.style = state.style.clone();
        self.arrow = state.arrow_type;
        self.label = state.label.clone();
        self.label_offset = state.label_offset;
    }
}
