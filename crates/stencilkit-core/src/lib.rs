//! stencilkit Core Library
//!
//! Platform-agnostic object model and interaction logic for a box-and-arrow
//! diagram editor: stencils with eight ports, routed connectors, plain-data
//! snapshots, a type registry, and pointer-driven editors. Rendering is left
//! to the host; everything here works in diagram-local coordinates.

pub mod config;
pub mod connector;
pub mod diagram;
pub mod editor;
pub mod geometry;
pub mod input;
pub mod registry;
pub mod state;
pub mod stencil;
pub mod storage;
pub mod style;
pub mod surface;

/// Identifier shared by stencils and connectors within one diagram.
pub type ObjectId = u64;

pub use config::{ConfigError, EditorConfig};
pub use connector::{ArrowType, Connector, ConnectorEnd, ConnectorRouter, Endpoint};
pub use diagram::{Diagram, DiagramError, DiagramResult, RestoreReport};
pub use editor::{ConnectorEditor, DiagramEvent, EditorResponse, StencilEditor};
pub use geometry::{Direction, PortLocation};
pub use input::{InputState, MouseButton, PointerEvent};
pub use registry::{ConnectorTypeId, RegistryError, StencilSet, StencilTypeId};
pub use state::{ConnectorState, DiagramState, StencilState};
pub use stencil::{PortSnapshot, Stencil, StencilShape};
pub use storage::{MemoryStorage, Storage, StorageError, StorageResult};
pub use style::{SerializableColor, ShapeStyle};
pub use surface::{DiagramSurface, Selection, SurfaceMode};

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
