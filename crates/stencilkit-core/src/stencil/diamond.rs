//! Diamond stencil.

use super::StencilShape;
use crate::geometry::{Point, PortLocation, Rect};
use kurbo::BezPath;

/// A rhombus touching the midpoints of the stencil bounds.
///
/// Its corners are empty space, so the corner ports are disabled.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Diamond;

impl Diamond {
    pub fn new() -> Self {
        Self
    }
}

impl StencilShape for Diamond {
    fn disabled_ports(&self) -> &'static [PortLocation] {
        &PortLocation::CORNERS
    }

    fn hit_test(&self, bounds: Rect, point: Point, tolerance: f64) -> bool {
        let hw = bounds.width() / 2.0 + tolerance;
        let hh = bounds.height() / 2.0 + tolerance;
        if hw < f64::EPSILON || hh < f64::EPSILON {
            return false;
        }
        let center = bounds.center();
        (point.x - center.x).abs() / hw + (point.y - center.y).abs() / hh <= 1.0
    }

    fn outline(&self, bounds: Rect) -> BezPath {
        let center = bounds.center();
        let mut path = BezPath::new();
        path.move_to(Point::new(center.x, bounds.y0));
        path.line_to(Point::new(bounds.x1, center.y));
        path.line_to(Point::new(center.x, bounds.y1));
        path.line_to(Point::new(bounds.x0, center.y));
        path.close_path();
        path
    }

    fn clone_box(&self) -> Box<dyn StencilShape> {
        Box::new(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_ports_disabled() {
        assert_eq!(Diamond.disabled_ports().len(), 4);
        assert!(Diamond.disabled_ports().iter().all(|p| p.is_corner()));
    }

    #[test]
    fn test_hit_test() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(Diamond.hit_test(bounds, Point::new(50.0, 50.0), 0.0));
        assert!(Diamond.hit_test(bounds, Point::new(50.0, 1.0), 0.0));
        assert!(!Diamond.hit_test(bounds, Point::new(5.0, 5.0), 0.0));
    }
}
