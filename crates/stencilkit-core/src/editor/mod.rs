//! Interactive editors.
//!
//! An editor wraps one stencil or connector with the UI state needed to turn
//! pointer actions into geometry changes. Editors hold only ids; every call
//! takes the diagram and reports what changed as [`DiagramEvent`]s.

pub mod handles;
mod connector;
mod stencil;

pub use connector::{ConnectorEditor, ConnectorEditorState};
pub use handles::{Corner, Edge, Handle, HandleKind, HandleShape};
pub use stencil::{StencilEditor, StencilEditorState};

use crate::ObjectId;

/// Change notification delivered to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagramEvent {
    StencilCreated(ObjectId),
    StencilChanged(ObjectId),
    ConnectorCreated(ObjectId),
    ConnectorChanged(ObjectId),
}

/// What an editor did with a pointer action.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorResponse {
    /// Whether the editor consumed the action.
    pub handled: bool,
    pub events: Vec<DiagramEvent>,
}

impl EditorResponse {
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn handled() -> Self {
        Self {
            handled: true,
            events: Vec::new(),
        }
    }

    pub fn with(mut self, event: DiagramEvent) -> Self {
        self.push(event);
        self
    }

    /// Append an event, dropping it if the same event is already queued.
    pub fn push(&mut self, event: DiagramEvent) {
        if !self.events.contains(&event) {
            self.events.push(event);
        }
    }

    pub fn merge(&mut self, other: EditorResponse) {
        self.handled |= other.handled;
        for event in other.events {
            self.push(event);
        }
    }
}
