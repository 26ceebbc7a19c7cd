//! Orthogonal ("angled") routing.
//!
//! The router leaves each bound port along its axis for at least the minimum
//! segment length, then joins the two stubs with one elbow. When both elbow
//! placements would cut through one of the two connected stencils it detours
//! around the source stencil, and when that detour still crosses a stencil it
//! takes the shortest channel or ring route around both. Only the two
//! connected stencils are considered; other shapes in the diagram may still be
//! crossed.

use super::{ConnectorRouter, Route, RouteRequest};
use crate::geometry::{segment_enters_rect, Point, PortLocation, Rect, Vec2};
use kurbo::BezPath;
use std::f64::consts::PI;

const EPS: f64 = 1e-9;

/// Routes a connector as a Manhattan polyline.
#[derive(Debug, Clone, Copy, Default)]
pub struct AngledRouter;

impl AngledRouter {
    /// Axis a stub leaves a port along. Corner ports leave vertically.
    pub fn exit_axis(port: PortLocation) -> Vec2 {
        let axes = port.direction().axes();
        if axes.y != 0.0 {
            Vec2::new(0.0, axes.y)
        } else {
            Vec2::new(axes.x, 0.0)
        }
    }

    /// Vertices of the routed polyline, before arrow offsets.
    pub fn points(request: &RouteRequest) -> Vec<Point> {
        let min = request.config.min_segment_length;
        let (p1, p2) = (request.start.point, request.end.point);
        let s = request.start.port.map_or(p1, |port| p1 + Self::exit_axis(port) * min);
        let e = request.end.port.map_or(p2, |port| p2 + Self::exit_axis(port) * min);

        let obstacles: Vec<Rect> = [request.start.bounds, request.end.bounds]
            .into_iter()
            .flatten()
            .collect();
        let clear = |middle: &[Point]| is_clear(&with_ends(p1, middle, p2), &obstacles);

        let elbow_first = [s, Point::new(s.x, e.y), e];
        let elbow_second = [s, Point::new(e.x, s.y), e];
        let middle: Vec<Point> = if clear(&elbow_first) {
            elbow_first.to_vec()
        } else if clear(&elbow_second) {
            elbow_second.to_vec()
        } else {
            let detour = Self::detour(request, s, e);
            if clear(&detour) {
                detour
            } else {
                // Stencils closer than two stubs apart can leave nothing clear.
                Self::around(p1, s, e, p2, &obstacles, min).unwrap_or_else(|| elbow_first.to_vec())
            }
        };

        simplify(with_ends(p1, &middle, p2))
    }

    /// Shortest clear route between the stubs that avoids both stencils.
    ///
    /// Candidates run along channels between the stencils or along a ring
    /// drawn `min` outside everything. Each stub end reaches the ring
    /// straight up, down, left or right, and a stencil can block at most
    /// one of those four rays, so a clear candidate exists whenever both
    /// stub ends lie outside both stencils.
    fn around(p1: Point, s: Point, e: Point, p2: Point, obstacles: &[Rect], min: f64) -> Option<Vec<Point>> {
        let ring = obstacles
            .iter()
            .fold(Rect::from_points(s, e), |acc, r| acc.union(*r))
            .inflate(min, min);

        let mut xs = vec![ring.x0, ring.x1];
        let mut ys = vec![ring.y0, ring.y1];
        if let [a, b] = obstacles {
            let (left, right) = if a.x1 <= b.x0 { (a, b) } else { (b, a) };
            if left.x1 <= right.x0 {
                xs.push((left.x1 + right.x0) / 2.0);
            }
            let (upper, lower) = if a.y1 <= b.y0 { (a, b) } else { (b, a) };
            if upper.y1 <= lower.y0 {
                ys.push((upper.y1 + lower.y0) / 2.0);
            }
        }

        let mut candidates: Vec<Vec<Point>> = Vec::new();
        for &x in &xs {
            candidates.push(vec![s, Point::new(x, s.y), Point::new(x, e.y), e]);
        }
        for &y in &ys {
            candidates.push(vec![s, Point::new(s.x, y), Point::new(e.x, y), e]);
        }
        for (from, a) in ring_exits(s, ring) {
            for (to, b) in ring_exits(e, ring) {
                let clockwise = (to + 4 - from) % 4;
                let counter = (from + 4 - to) % 4;
                let mut walk = |corners: Vec<Point>| {
                    let mut route = vec![s, a];
                    route.extend(corners);
                    route.extend([b, e]);
                    candidates.push(route);
                };
                walk((0..clockwise).map(|k| ring_corner(ring, from + k)).collect());
                if counter != clockwise {
                    walk((0..counter).map(|k| ring_corner(ring, from + 3 - k)).collect());
                }
            }
        }

        candidates
            .into_iter()
            .map(|middle| {
                let full = with_ends(p1, &middle, p2);
                (middle, full)
            })
            .filter(|(_, full)| is_clear(full, obstacles))
            .min_by(|a, b| polyline_length(&a.1).total_cmp(&polyline_length(&b.1)))
            .map(|(middle, _)| middle)
    }

    /// Three-bend route around the source stencil.
    fn detour(request: &RouteRequest, s: Point, e: Point) -> Vec<Point> {
        let min = request.config.min_segment_length;
        let Some(source) = request.start.bounds.or(request.end.bounds) else {
            return vec![s, Point::new(s.x, e.y), e];
        };
        let both = request.end.bounds.map_or(source, |dest| source.union(dest));
        let leaves_horizontally = request
            .start
            .port
            .is_some_and(|port| Self::exit_axis(port).x != 0.0);

        if leaves_horizontally {
            let y = if e.y >= source.y0 - min && e.y <= source.y1 + min {
                if e.y < source.center().y {
                    both.y0 - min
                } else {
                    both.y1 + min
                }
            } else if e.y > source.y1 {
                (source.y1 + e.y) / 2.0
            } else {
                (source.y0 + e.y) / 2.0
            };
            vec![s, Point::new(s.x, y), Point::new(e.x, y), e]
        } else {
            let x = if e.x >= source.x0 - min && e.x <= source.x1 + min {
                if e.x < source.center().x {
                    both.x0 - min
                } else {
                    both.x1 + min
                }
            } else if e.x > source.x1 {
                (source.x1 + e.x) / 2.0
            } else {
                (source.x0 + e.x) / 2.0
            };
            vec![s, Point::new(x, s.y), Point::new(x, e.y), e]
        }
    }
}

fn with_ends(p1: Point, middle: &[Point], p2: Point) -> Vec<Point> {
    let mut points = Vec::with_capacity(middle.len() + 2);
    points.push(p1);
    points.extend_from_slice(middle);
    points.push(p2);
    points
}

fn is_clear(points: &[Point], obstacles: &[Rect]) -> bool {
    points
        .windows(2)
        .all(|w| obstacles.iter().all(|r| !segment_enters_rect(w[0], w[1], *r)))
}

fn polyline_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Where `q` meets each side of `ring`, indexed clockwise from the top.
fn ring_exits(q: Point, ring: Rect) -> [(usize, Point); 4] {
    [
        (0, Point::new(q.x, ring.y0)),
        (1, Point::new(ring.x1, q.y)),
        (2, Point::new(q.x, ring.y1)),
        (3, Point::new(ring.x0, q.y)),
    ]
}

/// Corner between side `side` and the next side clockwise.
fn ring_corner(ring: Rect, side: usize) -> Point {
    match side % 4 {
        0 => Point::new(ring.x1, ring.y0),
        1 => Point::new(ring.x1, ring.y1),
        2 => Point::new(ring.x0, ring.y1),
        _ => Point::new(ring.x0, ring.y0),
    }
}

/// Drop repeated vertices and vertices in the middle of a straight run.
fn simplify(points: Vec<Point>) -> Vec<Point> {
    let mut deduped: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        if deduped.last().is_none_or(|last| last.distance(p) > EPS) {
            deduped.push(p);
        }
    }
    if deduped.len() < 3 {
        return deduped;
    }
    let mut out = vec![deduped[0]];
    for i in 1..deduped.len() - 1 {
        let (a, b, c) = (out[out.len() - 1], deduped[i], deduped[i + 1]);
        let same_x = (a.x - b.x).abs() < EPS && (b.x - c.x).abs() < EPS;
        let same_y = (a.y - b.y).abs() < EPS && (b.y - c.y).abs() < EPS;
        if !(same_x || same_y) {
            out.push(b);
        }
    }
    out.push(deduped[deduped.len() - 1]);
    out
}

/// Move `from` toward `toward` by at most `size`.
fn retreat(from: Point, toward: Point, size: f64) -> Point {
    let d = toward - from;
    let len = d.hypot();
    if len < EPS {
        from
    } else {
        from + d * (size.min(len) / len)
    }
}

impl ConnectorRouter for AngledRouter {
    fn route(&self, request: &RouteRequest) -> Route {
        let size = request.config.arrow_size;
        let mut points = Self::points(request);

        if points.len() >= 2 {
            if request.start.arrow {
                points[0] = retreat(points[0], points[1], size);
            }
            if request.end.arrow {
                let n = points.len();
                points[n - 1] = retreat(points[n - 1], points[n - 2], size);
            }
        }

        let mut path = BezPath::new();
        if let Some((first, rest)) = points.split_first() {
            path.move_to(*first);
            for p in rest {
                path.line_to(*p);
            }
        }

        // Arrowheads snap to the port direction rather than the local tangent.
        let angle = request.line_angle();
        let start_angle = request
            .start
            .port
            .map_or(angle + PI, |port| port.direction().opposite().radians());
        let end_angle = request
            .end
            .port
            .map_or(angle, |port| port.direction().opposite().radians());

        Route {
            path,
            start_angle,
            end_angle,
        }
    }

    fn clone_box(&self) -> Box<dyn ConnectorRouter> {
        Box::new(*self)
    }
}
