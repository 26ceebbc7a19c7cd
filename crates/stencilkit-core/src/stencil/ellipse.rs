//! Ellipse stencil.

use super::StencilShape;
use crate::geometry::{Point, Rect};
use kurbo::{BezPath, Ellipse as KurboEllipse, Shape as KurboShape};

/// An ellipse inscribed in the stencil bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Ellipse;

impl Ellipse {
    pub fn new() -> Self {
        Self
    }
}

impl StencilShape for Ellipse {
    fn hit_test(&self, bounds: Rect, point: Point, tolerance: f64) -> bool {
        let rx = bounds.width() / 2.0 + tolerance;
        let ry = bounds.height() / 2.0 + tolerance;
        if rx < f64::EPSILON || ry < f64::EPSILON {
            return false;
        }
        let center = bounds.center();
        let dx = (point.x - center.x) / rx;
        let dy = (point.y - center.y) / ry;
        dx * dx + dy * dy <= 1.0
    }

    fn outline(&self, bounds: Rect) -> BezPath {
        KurboEllipse::from_rect(bounds).to_path(0.1)
    }

    fn clone_box(&self) -> Box<dyn StencilShape> {
        Box::new(*self)
    }
}
