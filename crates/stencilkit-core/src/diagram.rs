//! The diagram: owner of every stencil and connector.

use crate::config::EditorConfig;
use crate::connector::{Connector, ConnectorEnd, Endpoint, RoutingConfig};
use crate::geometry::{Point, PortLocation, Rect};
use crate::registry::{ConnectorTypeId, RegistryError, StencilSet, StencilTypeId};
use crate::state::{ConnectorState, DiagramState};
use crate::stencil::{PortSnapshot, Stencil};
use crate::style::SerializableColor;
use crate::ObjectId;
use log::{debug, warn};
use std::collections::HashMap;
use thiserror::Error;

/// Errors from diagram mutations.
#[derive(Debug, Error, PartialEq)]
pub enum DiagramError {
    #[error("Stencil not found: {0}")]
    StencilNotFound(ObjectId),
    #[error("Connector not found: {0}")]
    ConnectorNotFound(ObjectId),
    #[error("Port {port} of stencil {stencil} is disabled")]
    PortDisabled { stencil: ObjectId, port: PortLocation },
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Result type for diagram mutations.
pub type DiagramResult<T> = Result<T, DiagramError>;

/// Outcome of [`Diagram::restore`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreReport {
    pub stencils: usize,
    pub connectors: usize,
    pub skipped_stencils: usize,
    pub skipped_connectors: usize,
}

impl RestoreReport {
    pub fn is_complete(&self) -> bool {
        self.skipped_stencils == 0 && self.skipped_connectors == 0
    }
}

/// An arena of stencils and connectors sharing one id space.
///
/// Ports refer to connectors by id and connectors refer to stencils by id;
/// the diagram keeps both sides in step. Any geometry change to a stencil
/// made through the diagram re-derives every connector bound to it.
#[derive(Debug, Clone)]
pub struct Diagram {
    pub width: f64,
    pub height: f64,
    pub background_color: Option<SerializableColor>,
    stencils: HashMap<ObjectId, Stencil>,
    /// Creation order, which is also paint order (back to front).
    stencil_order: Vec<ObjectId>,
    connectors: HashMap<ObjectId, Connector>,
    connector_order: Vec<ObjectId>,
    last_id: ObjectId,
    config: EditorConfig,
}

impl Default for Diagram {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl Diagram {
    pub fn new(width: f64, height: f64) -> Self {
        Self::with_config(width, height, EditorConfig::default())
    }

    pub fn with_config(width: f64, height: f64, config: EditorConfig) -> Self {
        Self {
            width,
            height,
            background_color: None,
            stencils: HashMap::new(),
            stencil_order: Vec::new(),
            connectors: HashMap::new(),
            connector_order: Vec::new(),
            last_id: 0,
            config,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    fn routing(&self) -> RoutingConfig {
        RoutingConfig::from(&self.config)
    }

    /// Allocate a fresh id. Ids are never reused within a diagram.
    pub fn next_id(&mut self) -> ObjectId {
        self.last_id += 1;
        self.last_id
    }

    /// The most recently allocated (or restored) id.
    pub fn last_id(&self) -> ObjectId {
        self.last_id
    }

    pub fn clear(&mut self) {
        self.stencils.clear();
        self.stencil_order.clear();
        self.connectors.clear();
        self.connector_order.clear();
    }

    // --- Stencils ---

    /// Create a zero-sized stencil at the origin.
    pub fn create_stencil(&mut self, registry: &StencilSet, type_name: &str) -> DiagramResult<ObjectId> {
        let shape = registry.create_shape(type_name)?;
        let id = self.next_id();
        self.stencils.insert(id, Stencil::new(id, type_name, shape));
        self.stencil_order.push(id);
        debug!("Created stencil {} ({})", id, type_name);
        Ok(id)
    }

    /// Create a zero-sized stencil from a registry handle.
    pub fn create_stencil_of(&mut self, registry: &StencilSet, type_id: StencilTypeId) -> DiagramResult<ObjectId> {
        let type_name = registry.stencil_type_name(type_id)?;
        self.create_stencil(registry, type_name)
    }

    /// Create a stencil with the given bounds.
    pub fn add_stencil(&mut self, registry: &StencilSet, type_name: &str, bounds: Rect) -> DiagramResult<ObjectId> {
        let id = self.create_stencil(registry, type_name)?;
        self.set_stencil_bounds(id, bounds)?;
        Ok(id)
    }

    pub fn stencil(&self, id: ObjectId) -> Option<&Stencil> {
        self.stencils.get(&id)
    }

    /// Mutable access for style, notes and text. Geometry goes through
    /// [`set_stencil_bounds`](Self::set_stencil_bounds).
    pub fn stencil_mut(&mut self, id: ObjectId) -> Option<&mut Stencil> {
        self.stencils.get_mut(&id)
    }

    /// Stencils in creation order.
    pub fn stencils(&self) -> impl Iterator<Item = &Stencil> {
        self.stencil_order.iter().filter_map(|id| self.stencils.get(id))
    }

    pub fn stencil_count(&self) -> usize {
        self.stencils.len()
    }

    /// Set a stencil's bounds (normalized) and re-derive its connectors.
    pub fn set_stencil_bounds(&mut self, id: ObjectId, bounds: Rect) -> DiagramResult<()> {
        let stencil = self.stencils.get_mut(&id).ok_or(DiagramError::StencilNotFound(id))?;
        stencil.set_bounds(bounds);
        self.adjust_connectors_of(id);
        Ok(())
    }

    /// Move a stencil's top-left corner, keeping its size.
    pub fn move_stencil(&mut self, id: ObjectId, origin: Point) -> DiagramResult<()> {
        let size = self.stencil(id).ok_or(DiagramError::StencilNotFound(id))?.bounds().size();
        self.set_stencil_bounds(id, Rect::from_origin_size(origin, size))
    }

    /// Remove a stencil. Connectors bound to it stay in the diagram with
    /// those ends freed at their last derived coordinates.
    pub fn remove_stencil(&mut self, id: ObjectId) -> DiagramResult<Stencil> {
        let stencil = self.stencils.remove(&id).ok_or(DiagramError::StencilNotFound(id))?;
        self.stencil_order.retain(|&s| s != id);

        let bound = stencil.ports().all_connectors();
        for connector_id in &bound {
            if let Some(connector) = self.connectors.get_mut(connector_id) {
                for which in [ConnectorEnd::Start, ConnectorEnd::End] {
                    if connector.endpoint(which).stencil() == Some(id) {
                        let last = connector.point(which);
                        connector.set_endpoint(which, Endpoint::Free(last));
                    }
                }
            }
            self.adjust_connector(*connector_id);
        }
        debug!("Removed stencil {} and freed {} connector(s)", id, bound.len());
        Ok(stencil)
    }

    // --- Connectors ---

    /// Create a connector between two endpoints and register it on any
    /// bound ports.
    pub fn add_connector(
        &mut self,
        registry: &StencilSet,
        type_name: &str,
        start: Endpoint,
        end: Endpoint,
    ) -> DiagramResult<ObjectId> {
        self.check_endpoint(&start)?;
        self.check_endpoint(&end)?;
        let router = registry.create_router(type_name)?;
        let id = self.next_id();
        let mut connector = Connector::new(id, type_name, router, self.routing());
        connector.set_endpoint(ConnectorEnd::Start, start);
        connector.set_endpoint(ConnectorEnd::End, end);
        self.insert_connector(connector);
        debug!("Created connector {} ({})", id, type_name);
        Ok(id)
    }

    /// [`add_connector`](Self::add_connector) by registry handle.
    pub fn add_connector_of(
        &mut self,
        registry: &StencilSet,
        type_id: ConnectorTypeId,
        start: Endpoint,
        end: Endpoint,
    ) -> DiagramResult<ObjectId> {
        let type_name = registry.connector_type_name(type_id)?;
        self.add_connector(registry, type_name, start, end)
    }

    fn insert_connector(&mut self, connector: Connector) {
        let id = connector.id();
        for endpoint in [connector.start(), connector.end()] {
            if let Endpoint::Bound { stencil, port } = endpoint {
                if let Some(s) = self.stencils.get_mut(&stencil) {
                    s.ports_mut().get_mut(port).attach(id);
                }
            }
        }
        self.connectors.insert(id, connector);
        self.connector_order.push(id);
        self.adjust_connector(id);
    }

    pub fn connector(&self, id: ObjectId) -> Option<&Connector> {
        self.connectors.get(&id)
    }

    /// Mutable access for style, arrows and label. Call
    /// [`Connector::adjust_visual`] after changing the arrow type.
    pub fn connector_mut(&mut self, id: ObjectId) -> Option<&mut Connector> {
        self.connectors.get_mut(&id)
    }

    /// Connectors in creation order.
    pub fn connectors(&self) -> impl Iterator<Item = &Connector> {
        self.connector_order.iter().filter_map(|id| self.connectors.get(id))
    }

    pub fn connector_count(&self) -> usize {
        self.connectors.len()
    }

    /// Rebind or free one end of a connector, keeping port back-references
    /// in step.
    pub fn set_endpoint(&mut self, id: ObjectId, which: ConnectorEnd, endpoint: Endpoint) -> DiagramResult<()> {
        self.check_endpoint(&endpoint)?;
        let connector = self.connectors.get_mut(&id).ok_or(DiagramError::ConnectorNotFound(id))?;
        let old = connector.endpoint(which);
        let other = connector.endpoint(which.other());
        connector.set_endpoint(which, endpoint);

        if let Endpoint::Bound { stencil, port } = old {
            // Both ends may share a port; keep the entry while the other end uses it.
            if other != old {
                if let Some(s) = self.stencils.get_mut(&stencil) {
                    s.ports_mut().get_mut(port).detach(id);
                }
            }
        }
        if let Endpoint::Bound { stencil, port } = endpoint {
            if let Some(s) = self.stencils.get_mut(&stencil) {
                s.ports_mut().get_mut(port).attach(id);
            }
        }
        self.adjust_connector(id);
        Ok(())
    }

    /// Bind one end of a connector to a stencil port.
    pub fn connect(
        &mut self,
        id: ObjectId,
        which: ConnectorEnd,
        stencil: ObjectId,
        port: PortLocation,
    ) -> DiagramResult<()> {
        self.set_endpoint(id, which, Endpoint::bound(stencil, port))
    }

    /// Remove a connector and unregister it from both ports.
    pub fn remove_connector(&mut self, id: ObjectId) -> DiagramResult<Connector> {
        let connector = self.connectors.remove(&id).ok_or(DiagramError::ConnectorNotFound(id))?;
        self.connector_order.retain(|&c| c != id);
        for stencil in [connector.start().stencil(), connector.end().stencil()].into_iter().flatten() {
            if let Some(s) = self.stencils.get_mut(&stencil) {
                s.ports_mut().detach_everywhere(id);
            }
        }
        debug!("Removed connector {}", id);
        Ok(connector)
    }

    fn check_endpoint(&self, endpoint: &Endpoint) -> DiagramResult<()> {
        if let Endpoint::Bound { stencil, port } = *endpoint {
            let s = self.stencils.get(&stencil).ok_or(DiagramError::StencilNotFound(stencil))?;
            if !s.port(port).enabled {
                return Err(DiagramError::PortDisabled { stencil, port });
            }
        }
        Ok(())
    }

    /// Re-derive one connector from its bound ports.
    pub fn adjust_connector(&mut self, id: ObjectId) {
        let stencils = &self.stencils;
        if let Some(connector) = self.connectors.get_mut(&id) {
            connector.adjust(|sid| stencils.get(&sid).map(Stencil::port_snapshot));
        }
    }

    /// Re-derive every connector bound to any port of a stencil.
    pub fn adjust_connectors_of(&mut self, stencil: ObjectId) {
        let ids = match self.stencils.get(&stencil) {
            Some(s) => s.ports().all_connectors(),
            None => return,
        };
        for id in ids {
            self.adjust_connector(id);
        }
    }

    pub fn port_snapshot(&self, stencil: ObjectId) -> Option<PortSnapshot> {
        self.stencil(stencil).map(Stencil::port_snapshot)
    }

    // --- Hit testing ---

    /// Topmost stencil whose body contains `point`.
    pub fn stencil_at(&self, point: Point) -> Option<ObjectId> {
        let tolerance = self.config.hit_tolerance;
        self.stencil_order
            .iter()
            .rev()
            .filter_map(|id| self.stencils.get(id))
            .find(|s| s.hit_test(point, tolerance))
            .map(Stencil::id)
    }

    /// Enabled port within the port tolerance of `point`, on the topmost
    /// stencil that has one.
    pub fn port_at(&self, point: Point) -> Option<(ObjectId, PortLocation)> {
        let tolerance = self.config.port_tolerance;
        self.stencil_order
            .iter()
            .rev()
            .filter_map(|id| self.stencils.get(id))
            .find_map(|s| s.port_at(point, tolerance).map(|port| (s.id(), port)))
    }

    /// Topmost connector whose path passes near `point`.
    pub fn connector_at(&self, point: Point) -> Option<ObjectId> {
        let tolerance = self.config.hit_tolerance;
        self.connector_order
            .iter()
            .rev()
            .filter_map(|id| self.connectors.get(id))
            .find(|c| c.hit_test(point, tolerance))
            .map(Connector::id)
    }

    /// Union of all stencil bounds.
    pub fn bounds(&self) -> Option<Rect> {
        self.stencils().map(Stencil::bounds).reduce(|acc, r| acc.union(r))
    }

    // --- Snapshots ---

    /// Plain-data snapshot: stencils then connectors, in creation order.
    pub fn capture(&self) -> DiagramState {
        DiagramState {
            width: self.width,
            height: self.height,
            background_color: self.background_color,
            stencils: self.stencils().map(Stencil::state).collect(),
            connectors: self.connectors().map(Connector::state).collect(),
        }
    }

    /// Replace the contents with a snapshot.
    ///
    /// Never fails. Stencils of unknown type and connectors with an unknown
    /// type or a dangling endpoint are skipped and counted in the report.
    /// The id counter resumes after the largest id in the snapshot.
    pub fn restore(&mut self, state: &DiagramState, registry: &StencilSet) -> RestoreReport {
        self.clear();
        self.width = state.width;
        self.height = state.height;
        self.background_color = state.background_color;
        let mut report = RestoreReport::default();

        for s in &state.stencils {
            if self.stencils.contains_key(&s.id) {
                warn!("Skipping stencil {}: duplicate id", s.id);
                report.skipped_stencils += 1;
                continue;
            }
            let shape = match registry.create_shape(&s.type_name) {
                Ok(shape) => shape,
                Err(e) => {
                    warn!("Skipping stencil {}: {}", s.id, e);
                    report.skipped_stencils += 1;
                    continue;
                }
            };
            let mut stencil = Stencil::new(s.id, s.type_name.clone(), shape);
            stencil.apply_state(s);
            self.stencils.insert(s.id, stencil);
            self.stencil_order.push(s.id);
            report.stencils += 1;
        }

        for c in &state.connectors {
            match self.restore_connector(c, registry) {
                Ok(connector) => {
                    self.insert_connector(connector);
                    report.connectors += 1;
                }
                Err(reason) => {
                    warn!("Skipping connector {}: {}", c.id, reason);
                    report.skipped_connectors += 1;
                }
            }
        }

        self.last_id = state.max_id();
        debug!(
            "Restored {} stencil(s) and {} connector(s), last id {}",
            report.stencils, report.connectors, self.last_id
        );
        report
    }

    fn restore_connector(&self, c: &ConnectorState, registry: &StencilSet) -> Result<Connector, String> {
        if self.stencils.contains_key(&c.id) || self.connectors.contains_key(&c.id) {
            return Err("duplicate id".to_string());
        }
        let start = self.restore_endpoint(c.start_stencil_id, c.start_port_location, c.start_point)?;
        let end = self.restore_endpoint(c.end_stencil_id, c.end_port_location, c.end_point)?;
        let router = registry.create_router(&c.type_name).map_err(|e| e.to_string())?;
        let mut connector = Connector::new(c.id, c.type_name.clone(), router, self.routing());
        connector.set_endpoint(ConnectorEnd::Start, start);
        connector.set_endpoint(ConnectorEnd::End, end);
        connector.apply_state(c);
        Ok(connector)
    }

    fn restore_endpoint(
        &self,
        stencil: Option<ObjectId>,
        port: Option<PortLocation>,
        point: Option<Point>,
    ) -> Result<Endpoint, String> {
        match (stencil, port, point) {
            (Some(stencil), Some(port), _) => {
                let endpoint = Endpoint::bound(stencil, port);
                self.check_endpoint(&endpoint).map_err(|e| e.to_string())?;
                Ok(endpoint)
            }
            (Some(stencil), None, _) => Err(format!("no port given for stencil {stencil}")),
            (None, _, Some(point)) => Ok(Endpoint::Free(point)),
            (None, _, None) => Err("endpoint has neither stencil nor point".to_string()),
        }
    }
}
