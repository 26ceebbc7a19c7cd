//! Stencil editor: creation, move, resize, text edit and connect mode.

use super::handles::{hit_test_handles, port_handles, resize_bounds, resize_grips, Handle, HandleKind};
use super::{DiagramEvent, EditorResponse};
use crate::diagram::{Diagram, DiagramError, DiagramResult};
use crate::geometry::{Point, Rect};
use crate::input::Instant;
use crate::registry::StencilSet;
use crate::stencil::CreationAnchor;
use crate::ObjectId;
use log::{debug, trace};

/// The UI state of a stencil editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StencilEditorState {
    /// Waiting for the first press to place a new stencil.
    New,
    /// The first press is held; dragging sizes or positions the new stencil.
    Creating,
    /// Selected, showing resize grips.
    Select,
    Move,
    Resize(HandleKind),
    /// Text is bound to the host's edit overlay.
    Edit,
    /// Showing ports instead of grips.
    Connect,
}

impl StencilEditorState {
    /// Whether a pointer gesture is in progress.
    pub fn is_manipulating(&self) -> bool {
        matches!(self, Self::Creating | Self::Move | Self::Resize(_))
    }
}

/// Drives one stencil through its interactive lifecycle.
#[derive(Debug, Clone)]
pub struct StencilEditor {
    type_name: String,
    stencil: Option<ObjectId>,
    state: StencilEditorState,
    anchor: CreationAnchor,
    start_point: Point,
    start_bounds: Rect,
    last_point: Point,
    press_time: Option<Instant>,
    moved: bool,
    /// State to return to when a move ends.
    resume: StencilEditorState,
    emit_created: bool,
    created_pending: bool,
}

impl StencilEditor {
    /// An editor that creates a stencil of `type_name` on the first press.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            stencil: None,
            state: StencilEditorState::New,
            anchor: CreationAnchor::TopLeft,
            start_point: Point::ZERO,
            start_bounds: Rect::ZERO,
            last_point: Point::ZERO,
            press_time: None,
            moved: false,
            resume: StencilEditorState::Select,
            emit_created: true,
            created_pending: false,
        }
    }

    /// An editor for an existing stencil, in the selected state.
    pub fn for_stencil(diagram: &Diagram, id: ObjectId) -> Option<Self> {
        let stencil = diagram.stencil(id)?;
        let mut editor = Self::new(stencil.type_name());
        editor.stencil = Some(id);
        editor.state = StencilEditorState::Select;
        Some(editor)
    }

    /// Suppress the *stencil created* notification, e.g. for programmatic
    /// placement.
    pub fn without_created_event(mut self) -> Self {
        self.emit_created = false;
        self
    }

    pub fn state(&self) -> StencilEditorState {
        self.state
    }

    /// The edited stencil, once created.
    pub fn stencil(&self) -> Option<ObjectId> {
        self.stencil
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    fn set_state(&mut self, state: StencilEditorState) {
        if self.state != state {
            trace!("Stencil editor {:?}: {:?} -> {:?}", self.stencil, self.state, state);
            self.state = state;
        }
    }

    /// Handles to draw for the current state.
    pub fn handles(&self, diagram: &Diagram) -> Vec<Handle> {
        let Some(stencil) = self.stencil.and_then(|id| diagram.stencil(id)) else {
            return Vec::new();
        };
        match self.state {
            StencilEditorState::Select | StencilEditorState::Move | StencilEditorState::Resize(_) => {
                resize_grips(stencil.bounds())
            }
            StencilEditorState::Connect => port_handles(stencil),
            _ => Vec::new(),
        }
    }

    pub fn pointer_down(
        &mut self,
        diagram: &mut Diagram,
        registry: &StencilSet,
        point: Point,
        double_click: bool,
        now: Instant,
    ) -> DiagramResult<EditorResponse> {
        let config = diagram.config().clone();
        if self.state == StencilEditorState::New {
            let id = diagram.create_stencil(registry, &self.type_name)?;
            let stencil = diagram.stencil(id).ok_or(DiagramError::StencilNotFound(id))?;
            let shape = stencil.shape();
            self.anchor = shape.creation_anchor();
            let size = shape.default_size(&config);
            let bounds = match self.anchor {
                CreationAnchor::TopLeft => Rect::from_origin_size(point, size),
                CreationAnchor::Center => Rect::from_center_size(point, size),
            };
            diagram.set_stencil_bounds(id, bounds)?;
            self.stencil = Some(id);
            self.start_point = point;
            self.start_bounds = bounds;
            self.last_point = point;
            self.moved = false;
            self.set_state(StencilEditorState::Creating);
            return Ok(EditorResponse::handled());
        }

        let Some(id) = self.stencil else {
            return Ok(EditorResponse::ignored());
        };
        let Some(stencil) = diagram.stencil(id) else {
            return Ok(EditorResponse::ignored());
        };
        let on_body = stencil.hit_test(point, config.hit_tolerance);
        let text_bearing = stencil.is_text_bearing();
        let bounds = stencil.bounds();

        match self.state {
            StencilEditorState::Select => {
                if let Some(grip) = hit_test_handles(&resize_grips(bounds), point, config.grip_tolerance) {
                    self.begin_gesture(point, bounds, now, StencilEditorState::Select);
                    self.set_state(StencilEditorState::Resize(grip));
                    Ok(EditorResponse::handled())
                } else if on_body && double_click && text_bearing {
                    self.set_state(StencilEditorState::Edit);
                    debug!("Editing text of stencil {}", id);
                    Ok(EditorResponse::handled())
                } else if on_body {
                    self.begin_gesture(point, bounds, now, StencilEditorState::Select);
                    self.set_state(StencilEditorState::Move);
                    Ok(EditorResponse::handled())
                } else {
                    Ok(EditorResponse::ignored())
                }
            }
            StencilEditorState::Connect => {
                if on_body {
                    self.begin_gesture(point, bounds, now, StencilEditorState::Connect);
                    self.set_state(StencilEditorState::Move);
                    Ok(EditorResponse::handled())
                } else {
                    Ok(EditorResponse::ignored())
                }
            }
            StencilEditorState::Edit => {
                if on_body {
                    Ok(EditorResponse::handled())
                } else {
                    // Focus loss: the host sees the press as unhandled.
                    let mut response = self.commit_edit(diagram);
                    response.handled = false;
                    Ok(response)
                }
            }
            // A second press during a gesture is absorbed.
            _ => Ok(EditorResponse::handled()),
        }
    }

    fn begin_gesture(&mut self, point: Point, bounds: Rect, now: Instant, resume: StencilEditorState) {
        self.start_point = point;
        self.start_bounds = bounds;
        self.last_point = point;
        self.press_time = Some(now);
        self.moved = false;
        self.resume = resume;
    }

    pub fn pointer_move(&mut self, diagram: &mut Diagram, point: Point) -> EditorResponse {
        let Some(id) = self.stencil else {
            return EditorResponse::ignored();
        };
        if !self.state.is_manipulating() {
            return EditorResponse::ignored();
        }
        self.last_point = point;
        let threshold = diagram.config().drag_threshold;
        let delta = point - self.start_point;
        if delta.hypot() > threshold {
            self.moved = true;
        }

        let bounds = match self.state {
            StencilEditorState::Creating => match self.anchor {
                CreationAnchor::TopLeft if self.moved => Rect::from_points(self.start_point, point),
                CreationAnchor::TopLeft => return EditorResponse::handled(),
                CreationAnchor::Center => Rect::from_center_size(point, self.start_bounds.size()),
            },
            StencilEditorState::Move => self.start_bounds + delta,
            StencilEditorState::Resize(grip) => resize_bounds(self.start_bounds, grip, delta),
            _ => return EditorResponse::ignored(),
        };

        if diagram.stencil(id).is_some_and(|s| s.bounds() == bounds.abs()) {
            return EditorResponse::handled();
        }
        if diagram.set_stencil_bounds(id, bounds).is_err() {
            return EditorResponse::ignored();
        }
        let response = EditorResponse::handled();
        if self.state == StencilEditorState::Creating {
            // Not announced until creation completes.
            response
        } else {
            response.with(DiagramEvent::StencilChanged(id))
        }
    }

    pub fn pointer_up(&mut self, diagram: &mut Diagram, point: Point, now: Instant) -> EditorResponse {
        let Some(id) = self.stencil else {
            return EditorResponse::ignored();
        };
        let mut response = match self.state {
            StencilEditorState::Creating | StencilEditorState::Move | StencilEditorState::Resize(_) => {
                self.pointer_move(diagram, point)
            }
            _ => return EditorResponse::ignored(),
        };
        response.handled = true;
        let text_bearing = diagram.stencil(id).is_some_and(|s| s.is_text_bearing());

        match self.state {
            StencilEditorState::Creating => {
                debug!("Created stencil {} ({})", id, self.type_name);
                if text_bearing {
                    self.created_pending = true;
                    self.set_state(StencilEditorState::Edit);
                } else {
                    self.set_state(self.resume);
                    if self.emit_created {
                        response.push(DiagramEvent::StencilCreated(id));
                    }
                }
            }
            StencilEditorState::Move => {
                let dwell = diagram.config().edit_dwell();
                let held = self.press_time.is_some_and(|t| now.saturating_duration_since(t) >= dwell);
                if !self.moved && held && text_bearing && self.resume == StencilEditorState::Select {
                    self.set_state(StencilEditorState::Edit);
                    debug!("Editing text of stencil {}", id);
                } else {
                    self.set_state(self.resume);
                }
            }
            _ => self.set_state(self.resume),
        }
        self.press_time = None;
        response
    }

    /// Enter text editing, for text-bearing stencils.
    pub fn begin_edit(&mut self, diagram: &Diagram) -> bool {
        let text_bearing = self
            .stencil
            .and_then(|id| diagram.stencil(id))
            .is_some_and(|s| s.is_text_bearing());
        if text_bearing && self.state == StencilEditorState::Select {
            self.set_state(StencilEditorState::Edit);
            true
        } else {
            false
        }
    }

    /// Current text, while editing.
    pub fn edit_text<'a>(&self, diagram: &'a Diagram) -> Option<&'a str> {
        if self.state != StencilEditorState::Edit {
            return None;
        }
        diagram.stencil(self.stencil?)?.text()
    }

    /// Write the overlay buffer through to the stencil.
    pub fn set_edit_text(&mut self, diagram: &mut Diagram, text: &str) -> EditorResponse {
        if self.state != StencilEditorState::Edit {
            return EditorResponse::ignored();
        }
        let Some(id) = self.stencil else {
            return EditorResponse::ignored();
        };
        match diagram.stencil_mut(id).map(|stencil| stencil.set_text(text)) {
            Some(true) => {
                let response = EditorResponse::handled();
                if self.created_pending {
                    response
                } else {
                    response.with(DiagramEvent::StencilChanged(id))
                }
            }
            _ => EditorResponse::ignored(),
        }
    }

    /// Leave text editing. Completes a pending creation.
    pub fn commit_edit(&mut self, _diagram: &mut Diagram) -> EditorResponse {
        if self.state != StencilEditorState::Edit {
            return EditorResponse::ignored();
        }
        self.set_state(self.resume);
        let mut response = EditorResponse::handled();
        if let Some(id) = self.stencil {
            if std::mem::take(&mut self.created_pending) && self.emit_created {
                response.push(DiagramEvent::StencilCreated(id));
            }
        }
        response
    }

    /// Toggle between grips and ports. A toggle that arrives before creation
    /// or mid-gesture takes effect when the gesture ends; one that arrives
    /// while editing text is ignored.
    pub fn set_connect_mode(&mut self, enabled: bool) -> bool {
        let target = if enabled {
            StencilEditorState::Connect
        } else {
            StencilEditorState::Select
        };
        match self.state {
            StencilEditorState::Edit => false,
            StencilEditorState::Select | StencilEditorState::Connect => {
                self.resume = target;
                let changed = self.state != target;
                self.set_state(target);
                changed
            }
            _ => {
                self.resume = target;
                true
            }
        }
    }

    /// Release the editor: ends any gesture where the pointer last was and
    /// commits any edit.
    pub fn deselect(&mut self, diagram: &mut Diagram) -> EditorResponse {
        let mut response = EditorResponse::ignored();
        if self.state.is_manipulating() {
            let now = self.press_time.unwrap_or_else(Instant::now);
            response.merge(self.pointer_up(diagram, self.last_point, now));
        }
        response.merge(self.commit_edit(diagram));
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PortLocation;
    use std::time::Duration;

    fn setup() -> (Diagram, StencilSet) {
        (Diagram::new(800.0, 600.0), StencilSet::with_defaults())
    }

    fn create(diagram: &mut Diagram, registry: &StencilSet, type_name: &str, at: Point, to: Point) -> StencilEditor {
        let t = Instant::now();
        let mut editor = StencilEditor::new(type_name);
        editor.pointer_down(diagram, registry, at, false, t).unwrap();
        editor.pointer_move(diagram, to);
        editor.pointer_up(diagram, to, t);
        editor
    }

    #[test]
    fn test_click_creates_default_size() {
        let (mut diagram, registry) = setup();
        let t = Instant::now();
        let mut editor = StencilEditor::new("rectangle");
        let r = editor.pointer_down(&mut diagram, &registry, Point::new(10.0, 20.0), false, t).unwrap();
        assert!(r.handled && r.events.is_empty());
        assert_eq!(editor.state(), StencilEditorState::Creating);

        let r = editor.pointer_up(&mut diagram, Point::new(10.0, 20.0), t);
        let id = editor.stencil().unwrap();
        assert_eq!(r.events, vec![DiagramEvent::StencilCreated(id)]);
        assert_eq!(editor.state(), StencilEditorState::Select);
        assert_eq!(diagram.stencil(id).unwrap().bounds(), Rect::new(10.0, 20.0, 110.0, 70.0));
    }

    #[test]
    fn test_drag_stretches_anchored_box() {
        let (mut diagram, registry) = setup();
        let editor = create(&mut diagram, &registry, "ellipse", Point::new(100.0, 100.0), Point::new(40.0, 160.0));
        let bounds = diagram.stencil(editor.stencil().unwrap()).unwrap().bounds();
        assert_eq!(bounds, Rect::new(40.0, 100.0, 100.0, 160.0));
    }

    #[test]
    fn test_text_creation_is_centered_and_enters_edit() {
        let (mut diagram, registry) = setup();
        let t = Instant::now();
        let mut editor = StencilEditor::new("text");
        editor.pointer_down(&mut diagram, &registry, Point::new(200.0, 100.0), false, t).unwrap();
        let r = editor.pointer_up(&mut diagram, Point::new(200.0, 100.0), t);
        let id = editor.stencil().unwrap();
        assert!(r.events.is_empty());
        assert_eq!(editor.state(), StencilEditorState::Edit);
        assert_eq!(diagram.stencil(id).unwrap().bounds(), Rect::new(150.0, 85.0, 250.0, 115.0));

        let r = editor.set_edit_text(&mut diagram, "Hello");
        assert!(r.events.is_empty());
        let r = editor.commit_edit(&mut diagram);
        assert_eq!(r.events, vec![DiagramEvent::StencilCreated(id)]);
        assert_eq!(diagram.stencil(id).unwrap().text(), Some("Hello"));
        assert_eq!(editor.state(), StencilEditorState::Select);
    }

    #[test]
    fn test_suppressed_created_event() {
        let (mut diagram, registry) = setup();
        let t = Instant::now();
        let mut editor = StencilEditor::new("diamond").without_created_event();
        editor.pointer_down(&mut diagram, &registry, Point::ZERO, false, t).unwrap();
        let r = editor.pointer_up(&mut diagram, Point::ZERO, t);
        assert!(r.events.is_empty());
    }

    #[test]
    fn test_move_uses_start_snapshot() {
        let (mut diagram, registry) = setup();
        let mut editor = create(&mut diagram, &registry, "rectangle", Point::ZERO, Point::ZERO);
        let id = editor.stencil().unwrap();
        let t = Instant::now();

        editor.pointer_down(&mut diagram, &registry, Point::new(50.0, 25.0), false, t).unwrap();
        assert_eq!(editor.state(), StencilEditorState::Move);
        editor.pointer_move(&mut diagram, Point::new(60.0, 25.0));
        let r = editor.pointer_move(&mut diagram, Point::new(80.0, 55.0));
        assert_eq!(r.events, vec![DiagramEvent::StencilChanged(id)]);
        editor.pointer_up(&mut diagram, Point::new(80.0, 55.0), t);
        assert_eq!(diagram.stencil(id).unwrap().bounds(), Rect::new(30.0, 30.0, 130.0, 80.0));
        assert_eq!(editor.state(), StencilEditorState::Select);
    }

    #[test]
    fn test_resize_past_opposite_edge_normalizes() {
        let (mut diagram, registry) = setup();
        let mut editor = create(&mut diagram, &registry, "rectangle", Point::ZERO, Point::ZERO);
        let id = editor.stencil().unwrap();
        let t = Instant::now();

        // Grab the right edge grip and drag 130px left: 30px past the left edge.
        editor.pointer_down(&mut diagram, &registry, Point::new(100.0, 25.0), false, t).unwrap();
        assert!(matches!(editor.state(), StencilEditorState::Resize(_)));
        editor.pointer_up(&mut diagram, Point::new(-30.0, 25.0), t);
        let s = diagram.stencil(id).unwrap();
        assert!((s.left() - -30.0).abs() < f64::EPSILON);
        assert!((s.width() - 30.0).abs() < f64::EPSILON);
        assert!((s.height() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resize_repositions_ports_and_connectors() {
        let (mut diagram, registry) = setup();
        let mut editor = create(&mut diagram, &registry, "rectangle", Point::ZERO, Point::ZERO);
        let a = editor.stencil().unwrap();
        let c = diagram
            .add_connector(
                &registry,
                "straight",
                crate::Endpoint::bound(a, PortLocation::BottomRight),
                crate::Endpoint::Free(Point::new(300.0, 300.0)),
            )
            .unwrap();
        let t = Instant::now();
        editor.pointer_down(&mut diagram, &registry, Point::new(100.0, 50.0), false, t).unwrap();
        editor.pointer_up(&mut diagram, Point::new(150.0, 80.0), t);
        assert_eq!(diagram.connector(c).unwrap().start_point(), Point::new(150.0, 80.0));
    }

    #[test]
    fn test_dwell_enters_edit_for_text_only() {
        let (mut diagram, registry) = setup();
        let mut text = create(&mut diagram, &registry, "text", Point::new(100.0, 100.0), Point::new(100.0, 100.0));
        text.commit_edit(&mut diagram);
        let t = Instant::now();

        text.pointer_down(&mut diagram, &registry, Point::new(100.0, 100.0), false, t).unwrap();
        text.pointer_up(&mut diagram, Point::new(100.0, 100.0), t + Duration::from_millis(100));
        assert_eq!(text.state(), StencilEditorState::Select);

        text.pointer_down(&mut diagram, &registry, Point::new(100.0, 100.0), false, t).unwrap();
        text.pointer_up(&mut diagram, Point::new(101.0, 100.0), t + Duration::from_millis(600));
        assert_eq!(text.state(), StencilEditorState::Edit);

        let mut rect = create(&mut diagram, &registry, "rectangle", Point::new(300.0, 300.0), Point::new(300.0, 300.0));
        rect.pointer_down(&mut diagram, &registry, Point::new(320.0, 320.0), false, t).unwrap();
        rect.pointer_up(&mut diagram, Point::new(320.0, 320.0), t + Duration::from_millis(600));
        assert_eq!(rect.state(), StencilEditorState::Select);
    }

    #[test]
    fn test_double_click_enters_edit() {
        let (mut diagram, registry) = setup();
        let mut text = create(&mut diagram, &registry, "text", Point::new(100.0, 100.0), Point::new(100.0, 100.0));
        text.commit_edit(&mut diagram);
        let t = Instant::now();
        text.pointer_down(&mut diagram, &registry, Point::new(100.0, 100.0), true, t).unwrap();
        assert_eq!(text.state(), StencilEditorState::Edit);
        assert_eq!(text.edit_text(&diagram), Some(""));

        // Pressing outside commits and lets the host handle the press.
        let r = text.pointer_down(&mut diagram, &registry, Point::new(500.0, 500.0), false, t).unwrap();
        assert!(!r.handled);
        assert_eq!(text.state(), StencilEditorState::Select);
    }

    #[test]
    fn test_connect_mode_shows_ports_and_still_moves() {
        let (mut diagram, registry) = setup();
        let mut editor = create(&mut diagram, &registry, "diamond", Point::ZERO, Point::ZERO);
        assert_eq!(editor.handles(&diagram).len(), 8);
        assert!(editor.set_connect_mode(true));
        assert_eq!(editor.state(), StencilEditorState::Connect);
        assert_eq!(editor.handles(&diagram).len(), 4);

        let t = Instant::now();
        editor.pointer_down(&mut diagram, &registry, Point::new(50.0, 25.0), false, t).unwrap();
        editor.pointer_up(&mut diagram, Point::new(60.0, 35.0), t);
        assert_eq!(editor.state(), StencilEditorState::Connect);
        assert!(editor.set_connect_mode(false));
        assert_eq!(editor.state(), StencilEditorState::Select);
    }

    #[test]
    fn test_small_drag_still_moves() {
        let (mut diagram, registry) = setup();
        let mut editor = create(&mut diagram, &registry, "rectangle", Point::ZERO, Point::ZERO);
        let id = editor.stencil().unwrap();
        let t = Instant::now();

        editor.pointer_down(&mut diagram, &registry, Point::new(50.0, 25.0), false, t).unwrap();
        editor.pointer_move(&mut diagram, Point::new(51.5, 25.0));
        let r = editor.pointer_up(&mut diagram, Point::new(51.5, 25.0), t);
        assert!(r.handled);
        let s = diagram.stencil(id).unwrap();
        assert!((s.left() - 1.5).abs() < f64::EPSILON);
        assert!((s.width() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_still_click_reports_no_change() {
        let (mut diagram, registry) = setup();
        let mut editor = create(&mut diagram, &registry, "rectangle", Point::ZERO, Point::ZERO);
        let t = Instant::now();
        editor.pointer_down(&mut diagram, &registry, Point::new(50.0, 25.0), false, t).unwrap();
        let r = editor.pointer_up(&mut diagram, Point::new(50.0, 25.0), t);
        assert!(r.handled);
        assert!(r.events.is_empty());
    }

    #[test]
    fn test_set_edit_text_writes_through() {
        let (mut diagram, registry) = setup();
        let mut text = create(&mut diagram, &registry, "text", Point::new(100.0, 100.0), Point::new(100.0, 100.0));
        text.commit_edit(&mut diagram);
        let id = text.stencil().unwrap();

        // Outside of edit mode the buffer is not bound.
        assert!(!text.set_edit_text(&mut diagram, "ignored").handled);
        assert!(text.begin_edit(&diagram));
        let r = text.set_edit_text(&mut diagram, "Renamed");
        assert_eq!(r.events, vec![DiagramEvent::StencilChanged(id)]);
        assert_eq!(diagram.stencil(id).unwrap().text(), Some("Renamed"));

        let mut rect = create(&mut diagram, &registry, "rectangle", Point::new(300.0, 300.0), Point::new(300.0, 300.0));
        assert!(!rect.begin_edit(&diagram));
        assert!(!rect.set_edit_text(&mut diagram, "nope").handled);
    }

    #[test]
    fn test_connect_toggle_during_gesture_applies_on_release() {
        let (mut diagram, registry) = setup();
        let mut editor = create(&mut diagram, &registry, "rectangle", Point::ZERO, Point::ZERO);
        let t = Instant::now();

        editor.pointer_down(&mut diagram, &registry, Point::new(50.0, 25.0), false, t).unwrap();
        editor.pointer_move(&mut diagram, Point::new(80.0, 25.0));
        assert!(editor.set_connect_mode(true));
        assert_eq!(editor.state(), StencilEditorState::Move);
        editor.pointer_up(&mut diagram, Point::new(80.0, 25.0), t);
        assert_eq!(editor.state(), StencilEditorState::Connect);

        // Same for a resize started in connect mode and toggled back.
        editor.set_connect_mode(false);
        editor.pointer_down(&mut diagram, &registry, Point::new(130.0, 25.0), false, t).unwrap();
        assert!(matches!(editor.state(), StencilEditorState::Resize(_)));
        editor.set_connect_mode(true);
        editor.pointer_up(&mut diagram, Point::new(150.0, 25.0), t);
        assert_eq!(editor.state(), StencilEditorState::Connect);
    }

    #[test]
    fn test_connect_mode_before_creation() {
        let (mut diagram, registry) = setup();
        let t = Instant::now();
        let mut editor = StencilEditor::new("ellipse");
        assert!(editor.set_connect_mode(true));
        editor.pointer_down(&mut diagram, &registry, Point::ZERO, false, t).unwrap();
        editor.pointer_up(&mut diagram, Point::ZERO, t);
        assert_eq!(editor.state(), StencilEditorState::Connect);
    }
}
