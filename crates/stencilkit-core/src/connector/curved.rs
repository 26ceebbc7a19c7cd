//! Cubic Bézier routing.

use super::{arrow_offset, ConnectorRouter, Route, RouteEnd, RouteRequest};
use crate::geometry::{Point, Vec2};
use kurbo::BezPath;
use std::f64::consts::PI;

/// Routes a connector as one cubic curve leaving each port along its normal.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurvedRouter;

impl CurvedRouter {
    /// Control point for one end: the end projected outward along its port's
    /// normal by `max(|Δ|/4, min)` per axis. Without a port the control point
    /// is the end itself.
    pub fn control_point(end: &RouteEnd, delta: Vec2, min_distance: f64) -> Point {
        match end.port {
            Some(port) => {
                let axes = port.direction().axes();
                let reach = Vec2::new(
                    (delta.x.abs() / 4.0).max(min_distance),
                    (delta.y.abs() / 4.0).max(min_distance),
                );
                end.point + Vec2::new(axes.x * reach.x, axes.y * reach.y)
            }
            None => end.point,
        }
    }
}

impl ConnectorRouter for CurvedRouter {
    fn route(&self, request: &RouteRequest) -> Route {
        let config = &request.config;
        let delta = request.end.point - request.start.point;
        let c1 = Self::control_point(&request.start, delta, config.curve_min_control_distance);
        let c2 = Self::control_point(&request.end, delta, config.curve_min_control_distance);

        let start = arrow_offset(&request.start, delta, config.arrow_size);
        let end = arrow_offset(&request.end, -delta, config.arrow_size);

        let mut path = BezPath::new();
        path.move_to(start);
        path.curve_to(c1, c2, end);

        let angle = request.line_angle();
        Route {
            path,
            start_angle: angle + PI,
            end_angle: angle,
        }
    }

    fn clone_box(&self) -> Box<dyn ConnectorRouter> {
        Box::new(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::RoutingConfig;
    use crate::geometry::PortLocation;
    use kurbo::PathEl;

    fn end(point: Point, port: Option<PortLocation>) -> RouteEnd {
        RouteEnd {
            point,
            port,
            bounds: None,
            arrow: false,
        }
    }

    fn controls(route: &Route) -> (Point, Point) {
        match route.path.elements()[1] {
            PathEl::CurveTo(c1, c2, _) => (c1, c2),
            _ => panic!("expected a cubic"),
        }
    }

    #[test]
    fn test_top_port_control_point_is_above() {
        let request = RouteRequest {
            start: end(Point::new(100.0, 100.0), Some(PortLocation::TopCenter)),
            end: end(Point::new(500.0, 120.0), Some(PortLocation::LeftCenter)),
            config: RoutingConfig::default(),
        };
        let (c1, c2) = controls(&CurvedRouter.route(&request));
        // |dy| / 4 = 5 < 50, so the minimum applies.
        assert_eq!(c1, Point::new(100.0, 50.0));
        // |dx| / 4 = 100 > 50.
        assert_eq!(c2, Point::new(400.0, 120.0));
    }

    #[test]
    fn test_corner_port_projects_diagonally() {
        let c = CurvedRouter::control_point(
            &end(Point::new(0.0, 0.0), Some(PortLocation::BottomRight)),
            Vec2::new(400.0, 40.0),
            50.0,
        );
        assert_eq!(c, Point::new(100.0, 50.0));
    }

    #[test]
    fn test_unknown_port_degenerates_to_endpoint() {
        let request = RouteRequest {
            start: end(Point::new(0.0, 0.0), None),
            end: end(Point::new(80.0, 60.0), None),
            config: RoutingConfig::default(),
        };
        let (c1, c2) = controls(&CurvedRouter.route(&request));
        assert_eq!(c1, Point::new(0.0, 0.0));
        assert_eq!(c2, Point::new(80.0, 60.0));
    }
}
