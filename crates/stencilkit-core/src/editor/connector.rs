//! Connector editor: the connect gesture and endpoint rebinding.

use super::handles::{endpoint_handles, hit_test_handles, Handle, HandleKind};
use super::{DiagramEvent, EditorResponse};
use crate::connector::{ConnectorEnd, Endpoint};
use crate::diagram::{Diagram, DiagramResult};
use crate::geometry::{Point, PortLocation};
use crate::registry::StencilSet;
use crate::ObjectId;
use log::{debug, trace};

/// The UI state of a connector editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorEditorState {
    /// Waiting for the press on the source port.
    New,
    /// Start bound, free end following the pointer.
    Creating,
    /// Selected, showing endpoint grips.
    Select,
    /// Dragging one endpoint.
    Move(ConnectorEnd),
}

/// Drives one connector through its interactive lifecycle.
#[derive(Debug, Clone)]
pub struct ConnectorEditor {
    type_name: String,
    connector: Option<ObjectId>,
    source: Option<(ObjectId, PortLocation)>,
    state: ConnectorEditorState,
    emit_created: bool,
}

impl ConnectorEditor {
    /// An editor that starts a connector of `type_name` at a source port.
    pub fn new(type_name: impl Into<String>, stencil: ObjectId, port: PortLocation) -> Self {
        Self {
            type_name: type_name.into(),
            connector: None,
            source: Some((stencil, port)),
            state: ConnectorEditorState::New,
            emit_created: true,
        }
    }

    /// An editor for an existing connector, in the selected state.
    pub fn for_connector(diagram: &Diagram, id: ObjectId) -> Option<Self> {
        let connector = diagram.connector(id)?;
        Some(Self {
            type_name: connector.type_name().to_string(),
            connector: Some(id),
            source: None,
            state: ConnectorEditorState::Select,
            emit_created: true,
        })
    }

    pub fn without_created_event(mut self) -> Self {
        self.emit_created = false;
        self
    }

    pub fn state(&self) -> ConnectorEditorState {
        self.state
    }

    pub fn connector(&self) -> Option<ObjectId> {
        self.connector
    }

    fn set_state(&mut self, state: ConnectorEditorState) {
        if self.state != state {
            trace!("Connector editor {:?}: {:?} -> {:?}", self.connector, self.state, state);
            self.state = state;
        }
    }

    pub fn handles(&self, diagram: &Diagram) -> Vec<Handle> {
        match (self.state, self.connector.and_then(|id| diagram.connector(id))) {
            (ConnectorEditorState::Select | ConnectorEditorState::Move(_), Some(connector)) => {
                endpoint_handles(connector)
            }
            _ => Vec::new(),
        }
    }

    pub fn pointer_down(
        &mut self,
        diagram: &mut Diagram,
        registry: &StencilSet,
        point: Point,
    ) -> DiagramResult<EditorResponse> {
        match self.state {
            ConnectorEditorState::New => {
                let Some((stencil, port)) = self.source else {
                    return Ok(EditorResponse::ignored());
                };
                let start = Endpoint::bound(stencil, port);
                let origin = diagram
                    .stencil(stencil)
                    .map(|s| s.port_position(port))
                    .unwrap_or(point);
                let id = diagram.add_connector(registry, &self.type_name, start, Endpoint::Free(origin))?;
                self.connector = Some(id);
                self.set_state(ConnectorEditorState::Creating);
                Ok(EditorResponse::handled())
            }
            ConnectorEditorState::Select => {
                let Some(connector) = self.connector.and_then(|id| diagram.connector(id)) else {
                    return Ok(EditorResponse::ignored());
                };
                let config = diagram.config();
                let grip = hit_test_handles(&endpoint_handles(connector), point, config.grip_tolerance);
                if let Some(HandleKind::Endpoint(end)) = grip {
                    self.set_state(ConnectorEditorState::Move(end));
                    Ok(EditorResponse::handled())
                } else if connector.hit_test(point, config.hit_tolerance) {
                    Ok(EditorResponse::handled())
                } else {
                    Ok(EditorResponse::ignored())
                }
            }
            ConnectorEditorState::Creating | ConnectorEditorState::Move(_) => Ok(EditorResponse::handled()),
        }
    }

    pub fn pointer_move(&mut self, diagram: &mut Diagram, point: Point) -> EditorResponse {
        let Some(id) = self.connector else {
            return EditorResponse::ignored();
        };
        let end = match self.state {
            ConnectorEditorState::Creating => ConnectorEnd::End,
            ConnectorEditorState::Move(end) => end,
            _ => return EditorResponse::ignored(),
        };
        if diagram.set_endpoint(id, end, Endpoint::Free(point)).is_err() {
            return EditorResponse::ignored();
        }
        let response = EditorResponse::handled();
        if self.state == ConnectorEditorState::Creating {
            response
        } else {
            response.with(DiagramEvent::ConnectorChanged(id))
        }
    }

    /// Finish the gesture: bind the dragged end to the port under the
    /// pointer, or leave it free there.
    pub fn pointer_up(&mut self, diagram: &mut Diagram, point: Point) -> EditorResponse {
        let Some(id) = self.connector else {
            return EditorResponse::ignored();
        };
        let (end, created) = match self.state {
            ConnectorEditorState::Creating => (ConnectorEnd::End, true),
            ConnectorEditorState::Move(end) => (end, false),
            _ => return EditorResponse::ignored(),
        };

        let target = match diagram.port_at(point) {
            Some((stencil, port)) => Endpoint::bound(stencil, port),
            None => Endpoint::Free(point),
        };
        if diagram.set_endpoint(id, end, target).is_err() {
            // The port vanished between hit test and bind; fall back to free.
            let _ = diagram.set_endpoint(id, end, Endpoint::Free(point));
        }
        self.set_state(ConnectorEditorState::Select);

        let mut response = EditorResponse::handled();
        if created {
            debug!("Created connector {} ({}), end {:?}", id, self.type_name, target);
            if self.emit_created {
                response.push(DiagramEvent::ConnectorCreated(id));
            }
        } else {
            response.push(DiagramEvent::ConnectorChanged(id));
        }
        response
    }

    /// Release the editor, finishing any gesture and re-deriving geometry.
    pub fn deselect(&mut self, diagram: &mut Diagram) -> EditorResponse {
        let mut response = EditorResponse::ignored();
        if let Some(id) = self.connector {
            if matches!(self.state, ConnectorEditorState::Creating | ConnectorEditorState::Move(_)) {
                let point = diagram.connector(id).map(|c| c.point(self.dragged_end())).unwrap_or_default();
                response.merge(self.pointer_up(diagram, point));
            }
            diagram.adjust_connector(id);
        }
        response
    }

    fn dragged_end(&self) -> ConnectorEnd {
        match self.state {
            ConnectorEditorState::Move(end) => end,
            _ => ConnectorEnd::End,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    fn setup() -> (Diagram, StencilSet, ObjectId, ObjectId) {
        let registry = StencilSet::with_defaults();
        let mut diagram = Diagram::new(800.0, 600.0);
        let a = diagram
            .add_stencil(&registry, "rectangle", Rect::new(0.0, 0.0, 100.0, 50.0))
            .unwrap();
        let b = diagram
            .add_stencil(&registry, "rectangle", Rect::new(300.0, 0.0, 400.0, 50.0))
            .unwrap();
        (diagram, registry, a, b)
    }

    #[test]
    fn test_connect_gesture_binds_both_ends() {
        let (mut diagram, registry, a, b) = setup();
        let mut editor = ConnectorEditor::new("straight", a, PortLocation::RightCenter);
        let r = editor.pointer_down(&mut diagram, &registry, Point::new(100.0, 25.0)).unwrap();
        assert!(r.handled);
        assert_eq!(editor.state(), ConnectorEditorState::Creating);
        let id = editor.connector().unwrap();
        assert_eq!(diagram.connector(id).unwrap().end_point(), Point::new(100.0, 25.0));

        let r = editor.pointer_move(&mut diagram, Point::new(200.0, 30.0));
        assert!(r.events.is_empty());
        assert_eq!(diagram.connector(id).unwrap().end_point(), Point::new(200.0, 30.0));

        let r = editor.pointer_up(&mut diagram, Point::new(302.0, 24.0));
        assert_eq!(r.events, vec![DiagramEvent::ConnectorCreated(id)]);
        assert_eq!(editor.state(), ConnectorEditorState::Select);
        let connector = diagram.connector(id).unwrap();
        assert_eq!(connector.end(), Endpoint::bound(b, PortLocation::LeftCenter));
        assert_eq!(connector.end_point(), Point::new(300.0, 25.0));
        assert_eq!(diagram.stencil(b).unwrap().port(PortLocation::LeftCenter).connectors(), &[id]);
    }

    #[test]
    fn test_release_in_empty_space_leaves_end_free() {
        let (mut diagram, registry, a, _) = setup();
        let mut editor = ConnectorEditor::new("angled", a, PortLocation::BottomCenter);
        editor.pointer_down(&mut diagram, &registry, Point::new(50.0, 50.0)).unwrap();
        editor.pointer_up(&mut diagram, Point::new(50.0, 200.0));
        let connector = diagram.connector(editor.connector().unwrap()).unwrap();
        assert_eq!(connector.end(), Endpoint::Free(Point::new(50.0, 200.0)));
    }

    #[test]
    fn test_release_on_source_port_is_allowed() {
        let (mut diagram, registry, a, _) = setup();
        let mut editor = ConnectorEditor::new("curved", a, PortLocation::TopCenter);
        editor.pointer_down(&mut diagram, &registry, Point::new(50.0, 0.0)).unwrap();
        editor.pointer_up(&mut diagram, Point::new(50.0, 1.0));
        let id = editor.connector().unwrap();
        assert_eq!(diagram.connector(id).unwrap().end(), Endpoint::bound(a, PortLocation::TopCenter));
        assert_eq!(diagram.stencil(a).unwrap().port(PortLocation::TopCenter).connectors(), &[id]);
    }

    #[test]
    fn test_move_endpoint_rebinds() {
        let (mut diagram, registry, a, b) = setup();
        let id = diagram
            .add_connector(
                &registry,
                "straight",
                Endpoint::bound(a, PortLocation::RightCenter),
                Endpoint::bound(b, PortLocation::LeftCenter),
            )
            .unwrap();
        let mut editor = ConnectorEditor::for_connector(&diagram, id).unwrap();
        assert_eq!(editor.handles(&diagram).len(), 2);

        editor.pointer_down(&mut diagram, &registry, Point::new(299.0, 25.0)).unwrap();
        assert_eq!(editor.state(), ConnectorEditorState::Move(ConnectorEnd::End));
        let r = editor.pointer_move(&mut diagram, Point::new(340.0, 60.0));
        assert_eq!(r.events, vec![DiagramEvent::ConnectorChanged(id)]);
        assert!(diagram.stencil(b).unwrap().ports().all_connectors().is_empty());

        let r = editor.pointer_up(&mut diagram, Point::new(351.0, 50.0));
        assert_eq!(r.events, vec![DiagramEvent::ConnectorChanged(id)]);
        assert_eq!(diagram.connector(id).unwrap().end(), Endpoint::bound(b, PortLocation::BottomCenter));
    }

    #[test]
    fn test_body_press_keeps_selection() {
        let (mut diagram, registry, a, b) = setup();
        let id = diagram
            .add_connector(
                &registry,
                "straight",
                Endpoint::bound(a, PortLocation::RightCenter),
                Endpoint::bound(b, PortLocation::LeftCenter),
            )
            .unwrap();
        let mut editor = ConnectorEditor::for_connector(&diagram, id).unwrap();
        assert!(editor.pointer_down(&mut diagram, &registry, Point::new(200.0, 25.0)).unwrap().handled);
        assert_eq!(editor.state(), ConnectorEditorState::Select);
        assert!(!editor.pointer_down(&mut diagram, &registry, Point::new(200.0, 200.0)).unwrap().handled);
    }
}
