//! Ports: the eight fixed attachment points of a stencil.

use crate::geometry::{Point, PortLocation, Rect, Size};
use crate::ObjectId;

/// An attachment point on a stencil's perimeter.
///
/// `x`/`y` are relative to the owning stencil's top-left corner. The
/// `connectors` list holds ids of connectors bound here; it is a
/// back-reference, the diagram owns the connectors.
#[derive(Debug, Clone, PartialEq)]
pub struct Port {
    pub location: PortLocation,
    pub enabled: bool,
    pub x: f64,
    pub y: f64,
    connectors: Vec<ObjectId>,
}

impl Port {
    fn new(location: PortLocation) -> Self {
        Self {
            location,
            enabled: true,
            x: 0.0,
            y: 0.0,
            connectors: Vec::new(),
        }
    }

    /// Position relative to the stencil's top-left.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Ids of connectors bound to this port, in binding order.
    pub fn connectors(&self) -> &[ObjectId] {
        &self.connectors
    }

    pub(crate) fn attach(&mut self, connector: ObjectId) {
        if !self.connectors.contains(&connector) {
            self.connectors.push(connector);
        }
    }

    pub(crate) fn detach(&mut self, connector: ObjectId) {
        self.connectors.retain(|&id| id != connector);
    }
}

/// The fixed table of eight ports owned by one stencil.
#[derive(Debug, Clone, PartialEq)]
pub struct Ports {
    ports: [Port; 8],
}

impl Ports {
    pub(crate) fn new(disabled: &[PortLocation]) -> Self {
        let mut ports = PortLocation::ALL.map(Port::new);
        for loc in disabled {
            ports[loc.index()].enabled = false;
        }
        Self { ports }
    }

    /// Recompute every port's relative coordinates for a box of `size`.
    pub(crate) fn position(&mut self, size: Size) {
        for port in &mut self.ports {
            let offset = port.location.offset(size);
            port.x = offset.x;
            port.y = offset.y;
        }
    }

    pub fn get(&self, location: PortLocation) -> &Port {
        &self.ports[location.index()]
    }

    pub(crate) fn get_mut(&mut self, location: PortLocation) -> &mut Port {
        &mut self.ports[location.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter()
    }

    pub fn enabled(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter().filter(|p| p.enabled)
    }

    /// Every connector bound to any port, without duplicates.
    pub fn all_connectors(&self) -> Vec<ObjectId> {
        let mut ids: Vec<ObjectId> = Vec::new();
        for port in &self.ports {
            for &id in &port.connectors {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        ids
    }

    pub(crate) fn detach_everywhere(&mut self, connector: ObjectId) {
        for port in &mut self.ports {
            port.detach(connector);
        }
    }
}

/// Absolute position and availability of one port, frozen at snapshot time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortPoint {
    pub location: PortLocation,
    pub enabled: bool,
    pub position: Point,
}

/// Read-only projection of a stencil's ports in diagram coordinates.
///
/// Connectors derive their bound endpoints from this value rather than from
/// the live stencil.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortSnapshot {
    pub stencil_id: ObjectId,
    pub bounds: Rect,
    ports: [PortPoint; 8],
}

impl PortSnapshot {
    pub(crate) fn new(stencil_id: ObjectId, bounds: Rect, ports: &Ports) -> Self {
        let origin = bounds.origin().to_vec2();
        let ports = PortLocation::ALL.map(|loc| {
            let port = ports.get(loc);
            PortPoint {
                location: loc,
                enabled: port.enabled,
                position: port.position() + origin,
            }
        });
        Self {
            stencil_id,
            bounds,
            ports,
        }
    }

    pub fn port(&self, location: PortLocation) -> PortPoint {
        self.ports[location.index()]
    }

    pub fn point(&self, location: PortLocation) -> Point {
        self.port(location).position
    }

    pub fn is_enabled(&self, location: PortLocation) -> bool {
        self.port(location).enabled
    }

    pub fn iter(&self) -> impl Iterator<Item = &PortPoint> {
        self.ports.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positioning() {
        let mut ports = Ports::new(&[]);
        ports.position(Size::new(100.0, 50.0));
        assert_eq!(ports.get(PortLocation::BottomCenter).position(), Point::new(50.0, 50.0));
        assert_eq!(ports.get(PortLocation::TopRight).position(), Point::new(100.0, 0.0));
    }

    #[test]
    fn test_positioning_is_deterministic() {
        let mut ports = Ports::new(&[]);
        ports.position(Size::new(37.0, 91.0));
        let first = ports.clone();
        ports.position(Size::new(37.0, 91.0));
        assert_eq!(first, ports);
    }

    #[test]
    fn test_disabled_ports_keep_coordinates() {
        let mut ports = Ports::new(&PortLocation::CORNERS);
        ports.position(Size::new(10.0, 10.0));
        let corner = ports.get(PortLocation::BottomRight);
        assert!(!corner.enabled);
        assert_eq!(corner.position(), Point::new(10.0, 10.0));
        assert_eq!(ports.enabled().count(), 4);
    }

    #[test]
    fn test_attach_detach() {
        let mut ports = Ports::new(&[]);
        ports.get_mut(PortLocation::TopCenter).attach(7);
        ports.get_mut(PortLocation::TopCenter).attach(7);
        ports.get_mut(PortLocation::LeftCenter).attach(7);
        ports.get_mut(PortLocation::LeftCenter).attach(9);
        assert_eq!(ports.get(PortLocation::TopCenter).connectors(), &[7]);
        assert_eq!(ports.all_connectors(), vec![7, 9]);

        ports.detach_everywhere(7);
        assert!(ports.get(PortLocation::TopCenter).connectors().is_empty());
        assert_eq!(ports.all_connectors(), vec![9]);
    }

    #[test]
    fn test_snapshot_is_absolute() {
        let mut ports = Ports::new(&[]);
        ports.position(Size::new(100.0, 50.0));
        let snapshot = PortSnapshot::new(1, Rect::new(300.0, 0.0, 400.0, 50.0), &ports);
        assert_eq!(snapshot.point(PortLocation::LeftCenter), Point::new(300.0, 25.0));
    }
}
