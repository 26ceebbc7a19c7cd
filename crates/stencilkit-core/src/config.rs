//! Editor configuration.

use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Tunables shared by the diagram, its connectors and the interactive editors.
///
/// Every field has a default, so a config file only needs the values it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Hit radius around a resize grip or connector endpoint grip.
    pub grip_tolerance: f64,
    /// Hit radius around a port.
    pub port_tolerance: f64,
    /// Extra slack when hit-testing stencil bodies and connector paths.
    pub hit_tolerance: f64,
    /// Minimum press duration (ms) before a still click enters text editing.
    pub edit_dwell_ms: u64,
    /// Maximum interval (ms) between two presses of a double click.
    pub double_click_ms: u64,
    /// Maximum distance between two presses of a double click.
    pub double_click_distance: f64,
    /// Pointer travel below which a press counts as "not moved".
    pub drag_threshold: f64,
    /// Size given to freshly created shape stencils.
    pub default_stencil_size: Size,
    /// Size given to freshly created text stencils.
    pub default_text_size: Size,
    /// Length of an arrowhead, and the amount a line is shortened to make room for it.
    pub arrow_size: f64,
    /// Minimum length of the first and last segment of an angled connector.
    pub min_segment_length: f64,
    /// Minimum control-point distance for curved connectors.
    pub curve_min_control_distance: f64,
    /// Connector label background size relative to the measured text.
    pub label_padding_factor: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grip_tolerance: 8.0,
            port_tolerance: 8.0,
            hit_tolerance: 4.0,
            edit_dwell_ms: 500,
            double_click_ms: 500,
            double_click_distance: 5.0,
            drag_threshold: 2.0,
            default_stencil_size: Size::new(100.0, 50.0),
            default_text_size: Size::new(100.0, 30.0),
            arrow_size: 10.0,
            min_segment_length: 10.0,
            curve_min_control_distance: 50.0,
            label_padding_factor: 1.2,
        }
    }
}

impl EditorConfig {
    /// Parse a config from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the config to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Reject values that would make geometry or gestures meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("gripTolerance", self.grip_tolerance),
            ("portTolerance", self.port_tolerance),
            ("hitTolerance", self.hit_tolerance),
            ("doubleClickDistance", self.double_click_distance),
            ("dragThreshold", self.drag_threshold),
            ("arrowSize", self.arrow_size),
            ("minSegmentLength", self.min_segment_length),
            ("curveMinControlDistance", self.curve_min_control_distance),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!("{name} must be a non-negative number")));
            }
        }
        for (name, size) in [
            ("defaultStencilSize", self.default_stencil_size),
            ("defaultTextSize", self.default_text_size),
        ] {
            if !(size.width > 0.0 && size.height > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be positive")));
            }
        }
        if !(self.label_padding_factor >= 1.0) {
            return Err(ConfigError::Invalid("labelPaddingFactor must be at least 1".into()));
        }
        Ok(())
    }

    pub fn edit_dwell(&self) -> Duration {
        Duration::from_millis(self.edit_dwell_ms)
    }

    pub fn double_click_interval(&self) -> Duration {
        Duration::from_millis(self.double_click_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EditorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.edit_dwell(), Duration::from_millis(500));
        assert!((config.min_segment_length - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EditorConfig::from_json(r#"{ "arrowSize": 14.0 }"#).unwrap();
        assert!((config.arrow_size - 14.0).abs() < f64::EPSILON);
        assert!((config.curve_min_control_distance - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let result = EditorConfig::from_json(r#"{ "gripTolerance": -1.0 }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let result = EditorConfig::from_json(r#"{ "labelPaddingFactor": 0.5 }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(EditorConfig::from_json("{"), Err(ConfigError::Parse(_))));
    }
}
