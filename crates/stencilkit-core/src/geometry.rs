//! Geometry primitives shared by stencils, ports and connectors.
//!
//! Points, rectangles and vectors come from `kurbo`. This module adds the
//! port-location enum, the eight-way compass used for routing, and a few
//! helpers for axis-aligned rectangle math.

pub use kurbo::{Point, Rect, Size, Vec2};

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// One of the eight fixed attachment points on a stencil's perimeter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortLocation {
    TopLeft,
    TopCenter,
    TopRight,
    LeftCenter,
    RightCenter,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl PortLocation {
    /// All locations, in port-table order.
    pub const ALL: [PortLocation; 8] = [
        PortLocation::TopLeft,
        PortLocation::TopCenter,
        PortLocation::TopRight,
        PortLocation::LeftCenter,
        PortLocation::RightCenter,
        PortLocation::BottomLeft,
        PortLocation::BottomCenter,
        PortLocation::BottomRight,
    ];

    /// Corner locations (disabled by diamond-like stencils).
    pub const CORNERS: [PortLocation; 4] = [
        PortLocation::TopLeft,
        PortLocation::TopRight,
        PortLocation::BottomLeft,
        PortLocation::BottomRight,
    ];

    /// Index into a port table laid out in `ALL` order.
    pub fn index(self) -> usize {
        match self {
            PortLocation::TopLeft => 0,
            PortLocation::TopCenter => 1,
            PortLocation::TopRight => 2,
            PortLocation::LeftCenter => 3,
            PortLocation::RightCenter => 4,
            PortLocation::BottomLeft => 5,
            PortLocation::BottomCenter => 6,
            PortLocation::BottomRight => 7,
        }
    }

    /// Name used in persisted diagrams.
    pub fn as_str(self) -> &'static str {
        match self {
            PortLocation::TopLeft => "topleft",
            PortLocation::TopCenter => "topcenter",
            PortLocation::TopRight => "topright",
            PortLocation::LeftCenter => "leftcenter",
            PortLocation::RightCenter => "rightcenter",
            PortLocation::BottomLeft => "bottomleft",
            PortLocation::BottomCenter => "bottomcenter",
            PortLocation::BottomRight => "bottomright",
        }
    }

    pub fn is_corner(self) -> bool {
        PortLocation::CORNERS.contains(&self)
    }

    /// Offset of this port from the top-left corner of a box of the given size.
    pub fn offset(self, size: Size) -> Vec2 {
        let (w, h) = (size.width, size.height);
        match self {
            PortLocation::TopLeft => Vec2::new(0.0, 0.0),
            PortLocation::TopCenter => Vec2::new(w / 2.0, 0.0),
            PortLocation::TopRight => Vec2::new(w, 0.0),
            PortLocation::LeftCenter => Vec2::new(0.0, h / 2.0),
            PortLocation::RightCenter => Vec2::new(w, h / 2.0),
            PortLocation::BottomLeft => Vec2::new(0.0, h),
            PortLocation::BottomCenter => Vec2::new(w / 2.0, h),
            PortLocation::BottomRight => Vec2::new(w, h),
        }
    }

    /// Outward direction implied by this port.
    pub fn direction(self) -> Direction {
        match self {
            PortLocation::TopLeft => Direction::UpLeft,
            PortLocation::TopCenter => Direction::Up,
            PortLocation::TopRight => Direction::UpRight,
            PortLocation::LeftCenter => Direction::Left,
            PortLocation::RightCenter => Direction::Right,
            PortLocation::BottomLeft => Direction::DownLeft,
            PortLocation::BottomCenter => Direction::Down,
            PortLocation::BottomRight => Direction::DownRight,
        }
    }
}

impl fmt::Display for PortLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PortLocation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PortLocation::ALL
            .into_iter()
            .find(|loc| loc.as_str() == s)
            .ok_or_else(|| format!("unknown port location: {s}"))
    }
}

/// Eight-way compass direction in screen space (y grows downward).
///
/// The discriminant is the angle in degrees, measured clockwise from +x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Right = 0,
    DownRight = 45,
    Down = 90,
    DownLeft = 135,
    Left = 180,
    UpLeft = 225,
    Up = 270,
    UpRight = 315,
}

impl Direction {
    pub fn degrees(self) -> f64 {
        self as i32 as f64
    }

    pub fn radians(self) -> f64 {
        self.degrees() * PI / 180.0
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Right => Direction::Left,
            Direction::DownRight => Direction::UpLeft,
            Direction::Down => Direction::Up,
            Direction::DownLeft => Direction::UpRight,
            Direction::Left => Direction::Right,
            Direction::UpLeft => Direction::DownRight,
            Direction::Up => Direction::Down,
            Direction::UpRight => Direction::DownLeft,
        }
    }

    /// Per-axis sign of this direction: each component is -1, 0 or 1.
    pub fn axes(self) -> Vec2 {
        match self {
            Direction::Right => Vec2::new(1.0, 0.0),
            Direction::DownRight => Vec2::new(1.0, 1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::DownLeft => Vec2::new(-1.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::UpLeft => Vec2::new(-1.0, -1.0),
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::UpRight => Vec2::new(1.0, -1.0),
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }
}

/// Build a rectangle from left/top/width/height, flipping negative extents.
///
/// A negative width moves `left` by the excess and takes the magnitude, so the
/// rectangle never inverts.
pub fn normalized_rect(left: f64, top: f64, width: f64, height: f64) -> Rect {
    let (x0, w) = if width < 0.0 { (left + width, -width) } else { (left, width) };
    let (y0, h) = if height < 0.0 { (top + height, -height) } else { (top, height) };
    Rect::new(x0, y0, x0 + w, y0 + h)
}

/// Whether an axis-aligned segment passes through the interior of `rect`.
///
/// Touching an edge does not count. Diagonal segments are never reported.
pub fn segment_enters_rect(a: Point, b: Point, rect: Rect) -> bool {
    const EPS: f64 = 1e-9;
    if (a.y - b.y).abs() < EPS {
        let (lo, hi) = (a.x.min(b.x), a.x.max(b.x));
        a.y > rect.y0 + EPS && a.y < rect.y1 - EPS && hi > rect.x0 + EPS && lo < rect.x1 - EPS
    } else if (a.x - b.x).abs() < EPS {
        let (lo, hi) = (a.y.min(b.y), a.y.max(b.y));
        a.x > rect.x0 + EPS && a.x < rect.x1 - EPS && hi > rect.y0 + EPS && lo < rect.y1 - EPS
    } else {
        false
    }
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + seg * t;
    (point - proj).hypot()
}

/// Minimum distance from a point to a polyline.
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| point_to_segment_dist(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_offsets() {
        let size = Size::new(100.0, 50.0);
        assert_eq!(PortLocation::TopLeft.offset(size), Vec2::new(0.0, 0.0));
        assert_eq!(PortLocation::TopCenter.offset(size), Vec2::new(50.0, 0.0));
        assert_eq!(PortLocation::RightCenter.offset(size), Vec2::new(100.0, 25.0));
        assert_eq!(PortLocation::BottomRight.offset(size), Vec2::new(100.0, 50.0));
        assert_eq!(PortLocation::LeftCenter.offset(size), Vec2::new(0.0, 25.0));
    }

    #[test]
    fn test_port_location_names_round_trip() {
        for loc in PortLocation::ALL {
            assert_eq!(loc.as_str().parse::<PortLocation>().unwrap(), loc);
        }
        assert!("middle".parse::<PortLocation>().is_err());
    }

    #[test]
    fn test_port_location_serde_name() {
        let json = serde_json::to_string(&PortLocation::BottomCenter).unwrap();
        assert_eq!(json, "\"bottomcenter\"");
    }

    #[test]
    fn test_direction_angles() {
        assert!((Direction::Down.degrees() - 90.0).abs() < f64::EPSILON);
        assert!((Direction::UpRight.degrees() - 315.0).abs() < f64::EPSILON);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(PortLocation::BottomCenter.direction().axes(), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_normalized_rect_flips_negative_width() {
        let rect = normalized_rect(100.0, 10.0, -30.0, 20.0);
        assert!((rect.x0 - 70.0).abs() < f64::EPSILON);
        assert!((rect.width() - 30.0).abs() < f64::EPSILON);
        assert!((rect.y0 - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_segment_enters_rect() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert!(segment_enters_rect(Point::new(-10.0, 25.0), Point::new(50.0, 25.0), rect));
        assert!(!segment_enters_rect(Point::new(-10.0, 0.0), Point::new(150.0, 0.0), rect));
        assert!(!segment_enters_rect(Point::new(110.0, -10.0), Point::new(110.0, 60.0), rect));
        assert!(segment_enters_rect(Point::new(50.0, -10.0), Point::new(50.0, 60.0), rect));
    }

    #[test]
    fn test_point_to_polyline_dist() {
        let pts = [Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)];
        assert!((point_to_polyline_dist(Point::new(5.0, 3.0), &pts) - 3.0).abs() < 1e-9);
        assert!((point_to_polyline_dist(Point::new(12.0, 5.0), &pts) - 2.0).abs() < 1e-9);
    }
}
