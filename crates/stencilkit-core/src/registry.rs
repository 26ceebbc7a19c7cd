//! Stencil and connector type registry.

use crate::connector::{AngledRouter, ConnectorRouter, CurvedRouter, StraightRouter};
use crate::stencil::{Diamond, Ellipse, Rectangle, StencilShape, Text};
use log::debug;
use thiserror::Error;

/// Registry errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Stencil type already registered: {0}")]
    DuplicateStencilType(String),
    #[error("Connector type already registered: {0}")]
    DuplicateConnectorType(String),
    #[error("Unknown stencil type: {0}")]
    UnknownStencilType(String),
    #[error("Unknown connector type: {0}")]
    UnknownConnectorType(String),
    #[error("No stencil type registered under {0:?}")]
    InvalidStencilHandle(StencilTypeId),
    #[error("No connector type registered under {0:?}")]
    InvalidConnectorHandle(ConnectorTypeId),
}

/// Builds the variant part of a new stencil.
pub type StencilFactory = fn() -> Box<dyn StencilShape>;

/// Builds the router of a new connector.
pub type ConnectorFactory = fn() -> Box<dyn ConnectorRouter>;

/// Handle to a registered stencil type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StencilTypeId(usize);

/// Handle to a registered connector type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectorTypeId(usize);

#[derive(Debug, Clone)]
pub struct StencilType {
    pub type_name: String,
    pub display_name: String,
    pub factory: StencilFactory,
}

#[derive(Debug, Clone)]
pub struct ConnectorType {
    pub type_name: String,
    pub display_name: String,
    pub factory: ConnectorFactory,
}

/// Tagged factory table used to create and restore diagram entities.
#[derive(Debug, Clone, Default)]
pub struct StencilSet {
    stencil_types: Vec<StencilType>,
    connector_types: Vec<ConnectorType>,
}

impl StencilSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// A set with the built-in stencils (`rectangle`, `ellipse`, `diamond`,
    /// `text`) and routers (`straight`, `angled`, `curved`).
    pub fn with_defaults() -> Self {
        let mut set = Self::new();
        let stencils: [(&str, &str, StencilFactory); 4] = [
            ("rectangle", "Rectangle", || Box::new(Rectangle::new())),
            ("ellipse", "Ellipse", || Box::new(Ellipse::new())),
            ("diamond", "Diamond", || Box::new(Diamond::new())),
            ("text", "Text", || Box::new(Text::new(""))),
        ];
        let connectors: [(&str, &str, ConnectorFactory); 3] = [
            ("straight", "Straight", || Box::new(StraightRouter)),
            ("angled", "Angled", || Box::new(AngledRouter)),
            ("curved", "Curved", || Box::new(CurvedRouter)),
        ];
        // The built-in names are distinct, so registration cannot fail.
        for (name, display, factory) in stencils {
            let _ = set.register_stencil(name, display, factory);
        }
        for (name, display, factory) in connectors {
            let _ = set.register_connector(name, display, factory);
        }
        set
    }

    pub fn register_stencil(
        &mut self,
        type_name: impl Into<String>,
        display_name: impl Into<String>,
        factory: StencilFactory,
    ) -> Result<StencilTypeId, RegistryError> {
        let type_name = type_name.into();
        if self.stencil_type_id(&type_name).is_some() {
            return Err(RegistryError::DuplicateStencilType(type_name));
        }
        debug!("Registered stencil type {}", type_name);
        self.stencil_types.push(StencilType {
            type_name,
            display_name: display_name.into(),
            factory,
        });
        Ok(StencilTypeId(self.stencil_types.len() - 1))
    }

    pub fn register_connector(
        &mut self,
        type_name: impl Into<String>,
        display_name: impl Into<String>,
        factory: ConnectorFactory,
    ) -> Result<ConnectorTypeId, RegistryError> {
        let type_name = type_name.into();
        if self.connector_type_id(&type_name).is_some() {
            return Err(RegistryError::DuplicateConnectorType(type_name));
        }
        debug!("Registered connector type {}", type_name);
        self.connector_types.push(ConnectorType {
            type_name,
            display_name: display_name.into(),
            factory,
        });
        Ok(ConnectorTypeId(self.connector_types.len() - 1))
    }

    pub fn stencil_type_id(&self, type_name: &str) -> Option<StencilTypeId> {
        self.stencil_types
            .iter()
            .position(|t| t.type_name == type_name)
            .map(StencilTypeId)
    }

    pub fn connector_type_id(&self, type_name: &str) -> Option<ConnectorTypeId> {
        self.connector_types
            .iter()
            .position(|t| t.type_name == type_name)
            .map(ConnectorTypeId)
    }

    pub fn stencil_type(&self, id: StencilTypeId) -> Option<&StencilType> {
        self.stencil_types.get(id.0)
    }

    pub fn connector_type(&self, id: ConnectorTypeId) -> Option<&ConnectorType> {
        self.connector_types.get(id.0)
    }

    /// Type name behind a stencil handle.
    pub fn stencil_type_name(&self, id: StencilTypeId) -> Result<&str, RegistryError> {
        self.stencil_type(id)
            .map(|t| t.type_name.as_str())
            .ok_or(RegistryError::InvalidStencilHandle(id))
    }

    /// Type name behind a connector handle.
    pub fn connector_type_name(&self, id: ConnectorTypeId) -> Result<&str, RegistryError> {
        self.connector_type(id)
            .map(|t| t.type_name.as_str())
            .ok_or(RegistryError::InvalidConnectorHandle(id))
    }

    /// Registered stencil types, in registration order.
    pub fn stencil_types(&self) -> &[StencilType] {
        &self.stencil_types
    }

    /// Registered connector types, in registration order.
    pub fn connector_types(&self) -> &[ConnectorType] {
        &self.connector_types
    }

    /// Build the variant of a stencil by type name.
    pub fn create_shape(&self, type_name: &str) -> Result<Box<dyn StencilShape>, RegistryError> {
        self.stencil_types
            .iter()
            .find(|t| t.type_name == type_name)
            .map(|t| (t.factory)())
            .ok_or_else(|| RegistryError::UnknownStencilType(type_name.to_string()))
    }

    /// Build the router of a connector by type name.
    pub fn create_router(&self, type_name: &str) -> Result<Box<dyn ConnectorRouter>, RegistryError> {
        self.connector_types
            .iter()
            .find(|t| t.type_name == type_name)
            .map(|t| (t.factory)())
            .ok_or_else(|| RegistryError::UnknownConnectorType(type_name.to_string()))
    }
}
