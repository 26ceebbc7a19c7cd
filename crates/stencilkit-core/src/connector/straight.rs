//! Straight-line routing.

use super::{arrow_offset, ConnectorRouter, Route, RouteRequest};
use kurbo::BezPath;
use std::f64::consts::PI;

/// Routes a connector as the literal segment between its endpoints.
#[derive(Debug, Clone, Copy, Default)]
pub struct StraightRouter;

impl ConnectorRouter for StraightRouter {
    fn route(&self, request: &RouteRequest) -> Route {
        let size = request.config.arrow_size;
        let along = request.end.point - request.start.point;
        let start = arrow_offset(&request.start, along, size);
        let end = arrow_offset(&request.end, -along, size);

        let mut path = BezPath::new();
        path.move_to(start);
        path.line_to(end);

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
