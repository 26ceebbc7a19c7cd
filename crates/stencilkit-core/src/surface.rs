//! Diagram surface: routes pointer input to the editor of the selected object.

use crate::config::EditorConfig;
use crate::diagram::{Diagram, RestoreReport};
use crate::editor::{
    ConnectorEditor, DiagramEvent, EditorResponse, Handle, StencilEditor, StencilEditorState,
};
use crate::geometry::Point;
use crate::input::{InputState, Instant, PointerAction, PointerEvent};
use crate::registry::{ConnectorTypeId, RegistryError, StencilSet, StencilTypeId};
use crate::state::DiagramState;
use crate::storage::{Storage, StorageResult};
use crate::ObjectId;
use log::{debug, info, warn};

/// Interaction mode of the whole surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceMode {
    #[default]
    Select,
    /// Ports are shown and a press on a port starts a connector.
    Connect,
}

/// What is currently selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Stencil(ObjectId),
    Connector(ObjectId),
}

#[derive(Debug, Clone)]
enum ActiveEditor {
    Stencil(StencilEditor),
    Connector(ConnectorEditor),
}

impl ActiveEditor {
    fn selection(&self) -> Option<Selection> {
        match self {
            ActiveEditor::Stencil(e) => e.stencil().map(Selection::Stencil),
            ActiveEditor::Connector(e) => e.connector().map(Selection::Connector),
        }
    }
}

/// Owns a diagram and its registry and turns raw pointer events into edits.
///
/// Editors are created lazily when an object is selected or created, and
/// dropped when the selection moves on. Change notifications queue up until
/// the host calls [`take_events`](Self::take_events).
#[derive(Debug)]
pub struct DiagramSurface {
    diagram: Diagram,
    registry: StencilSet,
    input: InputState,
    mode: SurfaceMode,
    active: Option<ActiveEditor>,
    pending_stencil: Option<String>,
    connector_type: String,
    events: Vec<DiagramEvent>,
}

impl DiagramSurface {
    /// A surface over an empty diagram with the built-in types.
    pub fn new(width: f64, height: f64) -> Self {
        Self::with_parts(
            Diagram::with_config(width, height, EditorConfig::default()),
            StencilSet::with_defaults(),
        )
    }

    pub fn with_parts(diagram: Diagram, registry: StencilSet) -> Self {
        let input = InputState::new(diagram.config());
        let connector_type = registry
            .connector_types()
            .first()
            .map(|t| t.type_name.clone())
            .unwrap_or_default();
        Self {
            diagram,
            registry,
            input,
            mode: SurfaceMode::default(),
            active: None,
            pending_stencil: None,
            connector_type,
            events: Vec::new(),
        }
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    /// Direct access for programmatic edits. Editors keep only ids, so the
    /// selection survives, but no notifications are queued.
    pub fn diagram_mut(&mut self) -> &mut Diagram {
        &mut self.diagram
    }

    pub fn registry(&self) -> &StencilSet {
        &self.registry
    }

    pub fn mode(&self) -> SurfaceMode {
        self.mode
    }

    pub fn selection(&self) -> Option<Selection> {
        self.active.as_ref().and_then(ActiveEditor::selection)
    }

    /// State of the selected stencil's editor.
    pub fn stencil_editor_state(&self) -> Option<StencilEditorState> {
        match &self.active {
            Some(ActiveEditor::Stencil(e)) => Some(e.state()),
            _ => None,
        }
    }

    /// Handles of the selected object, for renderers.
    pub fn handles(&self) -> Vec<Handle> {
        match &self.active {
            Some(ActiveEditor::Stencil(e)) => e.handles(&self.diagram),
            Some(ActiveEditor::Connector(e)) => e.handles(&self.diagram),
            None => Vec::new(),
        }
    }

    /// Drain queued change notifications.
    pub fn take_events(&mut self) -> Vec<DiagramEvent> {
        std::mem::take(&mut self.events)
    }

    fn absorb(&mut self, response: EditorResponse) -> bool {
        for event in response.events {
            if !self.events.contains(&event) {
                self.events.push(event);
            }
        }
        response.handled
    }

    /// The next press places a new stencil of `type_name`.
    pub fn begin_stencil_creation(&mut self, type_name: &str) -> Result<(), RegistryError> {
        if self.registry.stencil_type_id(type_name).is_none() {
            return Err(RegistryError::UnknownStencilType(type_name.to_string()));
        }
        self.pending_stencil = Some(type_name.to_string());
        Ok(())
    }

    /// [`begin_stencil_creation`](Self::begin_stencil_creation) by registry handle.
    pub fn begin_stencil_creation_of(&mut self, type_id: StencilTypeId) -> Result<(), RegistryError> {
        let type_name = self.registry.stencil_type_name(type_id)?.to_string();
        self.pending_stencil = Some(type_name);
        Ok(())
    }

    /// Routing kind used for connectors drawn from now on.
    pub fn set_connector_type(&mut self, type_name: &str) -> Result<(), RegistryError> {
        if self.registry.connector_type_id(type_name).is_none() {
            return Err(RegistryError::UnknownConnectorType(type_name.to_string()));
        }
        self.connector_type = type_name.to_string();
        Ok(())
    }

    pub fn set_connector_type_of(&mut self, type_id: ConnectorTypeId) -> Result<(), RegistryError> {
        self.connector_type = self.registry.connector_type_name(type_id)?.to_string();
        Ok(())
    }

    pub fn connector_type(&self) -> &str {
        &self.connector_type
    }

    pub fn set_connect_mode(&mut self, enabled: bool) {
        self.mode = if enabled { SurfaceMode::Connect } else { SurfaceMode::Select };
        if let Some(ActiveEditor::Stencil(editor)) = &mut self.active {
            let response = editor.commit_edit(&mut self.diagram);
            editor.set_connect_mode(enabled);
            self.absorb(response);
        }
        debug!("Surface mode {:?}", self.mode);
    }

    /// Feed one raw pointer event. Returns whether it was consumed.
    pub fn handle_pointer_event(&mut self, event: PointerEvent, now: Instant) -> bool {
        let Some(action) = self.input.process(event, now) else {
            return false;
        };
        match action {
            PointerAction::Down { position, double_click } => self.pointer_down(position, double_click, now),
            PointerAction::Move { position } => {
                let response = match &mut self.active {
                    Some(ActiveEditor::Stencil(e)) => e.pointer_move(&mut self.diagram, position),
                    Some(ActiveEditor::Connector(e)) => e.pointer_move(&mut self.diagram, position),
                    None => EditorResponse::ignored(),
                };
                self.absorb(response)
            }
            PointerAction::Up { position } => {
                let response = match &mut self.active {
                    Some(ActiveEditor::Stencil(e)) => e.pointer_up(&mut self.diagram, position, now),
                    Some(ActiveEditor::Connector(e)) => e.pointer_up(&mut self.diagram, position),
                    None => EditorResponse::ignored(),
                };
                self.absorb(response)
            }
        }
    }

    fn pointer_down(&mut self, position: Point, double_click: bool, now: Instant) -> bool {
        if let Some(type_name) = self.pending_stencil.take() {
            self.deselect();
            let mut editor = StencilEditor::new(type_name);
            editor.set_connect_mode(self.mode == SurfaceMode::Connect);
            return self.start(ActiveEditor::Stencil(editor), position, double_click, now);
        }

        if self.mode == SurfaceMode::Connect {
            if let Some((stencil, port)) = self.diagram.port_at(position) {
                self.deselect();
                let editor = ConnectorEditor::new(self.connector_type.clone(), stencil, port);
                return self.start(ActiveEditor::Connector(editor), position, double_click, now);
            }
        }

        if self.active.is_some() {
            if self.forward_down(position, double_click, now) {
                return true;
            }
            self.deselect();
        }

        // Connectors paint above stencils, so they win the hit test.
        let editor = if let Some(id) = self.diagram.connector_at(position) {
            ConnectorEditor::for_connector(&self.diagram, id).map(ActiveEditor::Connector)
        } else if let Some(id) = self.diagram.stencil_at(position) {
            StencilEditor::for_stencil(&self.diagram, id).map(|mut e| {
                e.set_connect_mode(self.mode == SurfaceMode::Connect);
                ActiveEditor::Stencil(e)
            })
        } else {
            None
        };
        match editor {
            Some(editor) => self.start(editor, position, double_click, now),
            None => false,
        }
    }

    fn start(&mut self, editor: ActiveEditor, position: Point, double_click: bool, now: Instant) -> bool {
        self.active = Some(editor);
        let handled = self.forward_down(position, double_click, now);
        if let Some(selection) = self.selection() {
            debug!("Selected {:?}", selection);
        }
        // A selection press that lands nowhere useful still selects.
        handled || self.active.is_some()
    }

    fn forward_down(&mut self, position: Point, double_click: bool, now: Instant) -> bool {
        let result = match &mut self.active {
            Some(ActiveEditor::Stencil(e)) => {
                e.pointer_down(&mut self.diagram, &self.registry, position, double_click, now)
            }
            Some(ActiveEditor::Connector(e)) => e.pointer_down(&mut self.diagram, &self.registry, position),
            None => return false,
        };
        match result {
            Ok(response) => self.absorb(response),
            Err(e) => {
                warn!("Pointer down failed: {}", e);
                self.active = None;
                false
            }
        }
    }

    /// Select a stencil programmatically.
    pub fn select_stencil(&mut self, id: ObjectId) -> bool {
        let Some(mut editor) = StencilEditor::for_stencil(&self.diagram, id) else {
            return false;
        };
        self.deselect();
        editor.set_connect_mode(self.mode == SurfaceMode::Connect);
        self.active = Some(ActiveEditor::Stencil(editor));
        true
    }

    /// Select a connector programmatically.
    pub fn select_connector(&mut self, id: ObjectId) -> bool {
        let Some(editor) = ConnectorEditor::for_connector(&self.diagram, id) else {
            return false;
        };
        self.deselect();
        self.active = Some(ActiveEditor::Connector(editor));
        true
    }

    /// Drop the selection, committing any edit or gesture in progress.
    pub fn deselect(&mut self) {
        let response = match self.active.take() {
            Some(ActiveEditor::Stencil(mut e)) => e.deselect(&mut self.diagram),
            Some(ActiveEditor::Connector(mut e)) => e.deselect(&mut self.diagram),
            None => return,
        };
        self.absorb(response);
    }

    /// Enter text editing on the selected stencil.
    pub fn begin_edit(&mut self) -> bool {
        match &mut self.active {
            Some(ActiveEditor::Stencil(e)) => e.begin_edit(&self.diagram),
            _ => false,
        }
    }

    /// Text of the stencil being edited.
    pub fn edit_text(&self) -> Option<&str> {
        match &self.active {
            Some(ActiveEditor::Stencil(e)) => e.edit_text(&self.diagram),
            _ => None,
        }
    }

    /// Push the host overlay's buffer into the edited stencil.
    pub fn set_edit_text(&mut self, text: &str) -> bool {
        let response = match &mut self.active {
            Some(ActiveEditor::Stencil(e)) => e.set_edit_text(&mut self.diagram, text),
            _ => return false,
        };
        self.absorb(response)
    }

    pub fn commit_edit(&mut self) -> bool {
        let response = match &mut self.active {
            Some(ActiveEditor::Stencil(e)) => e.commit_edit(&mut self.diagram),
            _ => return false,
        };
        self.absorb(response)
    }

    /// Delete the selected object. Connectors left dangling by a removed
    /// stencil stay, with the affected ends freed.
    pub fn remove_selected(&mut self) -> bool {
        let Some(selection) = self.selection() else {
            return false;
        };
        self.active = None;
        match selection {
            Selection::Stencil(id) => {
                let freed = self
                    .diagram
                    .stencil(id)
                    .map(|s| s.ports().all_connectors())
                    .unwrap_or_default();
                if self.diagram.remove_stencil(id).is_err() {
                    return false;
                }
                for connector in freed {
                    self.absorb(EditorResponse::handled().with(DiagramEvent::ConnectorChanged(connector)));
                }
                true
            }
            Selection::Connector(id) => self.diagram.remove_connector(id).is_ok(),
        }
    }

    pub fn capture(&self) -> DiagramState {
        self.diagram.capture()
    }

    /// Replace the diagram contents. The selection is dropped first.
    pub fn restore(&mut self, state: &DiagramState) -> RestoreReport {
        self.deselect();
        self.pending_stencil = None;
        self.diagram.restore(state, &self.registry)
    }

    /// Store the current diagram under `key`. An edit in progress is saved
    /// as it stands; the selection is left alone.
    pub fn save_to(&self, storage: &dyn Storage, key: &str) -> StorageResult<()> {
        storage.save(key, &self.capture())?;
        info!("Saved diagram {:?}", key);
        Ok(())
    }

    /// Replace the diagram with the one stored under `key`. On error the
    /// current diagram is untouched.
    pub fn load_from(&mut self, storage: &dyn Storage, key: &str) -> StorageResult<RestoreReport> {
        let state = storage.load(key)?;
        let report = self.restore(&state);
        info!("Loaded diagram {:?}", key);
        Ok(report)
    }
}
