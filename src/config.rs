//! Editor configuration.
//!
//! The configuration is plain serde data so hosts can ship it as JSON next to
//! their annotation value.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::{DEFAULT_GROUPS, DEFAULT_SIDES, MIN_SIDES};
use crate::error::EditorError;

/// Log level setting for hosts that let the editor initialise logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Settings for one editor instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Version of the configuration format
    pub version: u32,

    /// Type tag given to the next group that gets drawn
    #[serde(rename = "type")]
    pub kind: Option<String>,

    /// Whether pointer-down on the surface may start a new drawing
    pub drawable: bool,

    /// Number of polygon vertices per group
    pub sides: usize,

    /// Maximum number of groups
    pub groups: usize,

    /// Inbound values use fractions of the surface instead of pixels
    pub decimals: bool,

    /// Style overrides handed to the view for new shapes
    pub shape_config: Map<String, Value>,

    /// Base style handed to the view for new shapes
    pub default_shape_config: Map<String, Value>,

    /// Log verbosity for hosts that initialise logging from this config
    pub log_level: LogLevel,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            kind: None,
            drawable: true,
            sides: DEFAULT_SIDES,
            groups: DEFAULT_GROUPS,
            decimals: false,
            shape_config: Map::new(),
            default_shape_config: Map::new(),
            log_level: LogLevel::default(),
        }
    }
}

impl EditorConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the type tag for new groups.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Set the number of polygon vertices.
    pub fn with_sides(mut self, sides: usize) -> Self {
        self.sides = sides;
        self
    }

    /// Set the group limit.
    pub fn with_groups(mut self, groups: usize) -> Self {
        self.groups = groups;
        self
    }

    /// Check that all values are usable.
    pub fn validate(&self) -> Result<(), EditorError> {
        if self.version > CONFIG_VERSION {
            return Err(EditorError::invalid_config(format!(
                "version {} is newer than supported version {}",
                self.version, CONFIG_VERSION
            )));
        }
        if self.sides < MIN_SIDES {
            return Err(EditorError::invalid_config(format!(
                "sides must be at least {}, got {}",
                MIN_SIDES, self.sides
            )));
        }
        if self.groups == 0 {
            return Err(EditorError::invalid_config("groups must be at least 1"));
        }
        Ok(())
    }

    /// Style for new shapes: the default style with the overrides applied on top.
    pub fn effective_style(&self) -> Map<String, Value> {
        let mut style = self.default_shape_config.clone();
        for (key, value) in &self.shape_config {
            style.insert(key.clone(), value.clone());
        }
        style
    }

    /// Deserialize and validate a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self, EditorError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.sides, 4);
        assert_eq!(config.groups, 2);
        assert!(config.drawable);
        assert!(!config.decimals);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = EditorConfig::from_json(r#"{"type":"gate","groups":1}"#).expect("parse");
        assert_eq!(config.kind.as_deref(), Some("gate"));
        assert_eq!(config.groups, 1);
        assert_eq!(config.sides, 4);
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_rejects_degenerate_polygon() {
        let err = EditorConfig::new().with_sides(2).validate().unwrap_err();
        assert!(matches!(err, EditorError::InvalidConfig { .. }));
    }

    #[test]
    fn test_rejects_zero_groups() {
        assert!(EditorConfig::from_json(r#"{"groups":0}"#).is_err());
    }

    #[test]
    fn test_rejects_newer_version() {
        assert!(EditorConfig::from_json(r#"{"version":99}"#).is_err());
    }

    #[test]
    fn test_effective_style_overrides_defaults() {
        let config = EditorConfig::from_json(
            r#"{"defaultShapeConfig":{"stroke":"red","strokeWidth":2},"shapeConfig":{"stroke":"blue"}}"#,
        )
        .expect("parse");
        let style = config.effective_style();
        assert_eq!(style.get("stroke"), Some(&Value::from("blue")));
        assert_eq!(style.get("strokeWidth"), Some(&Value::from(2)));
    }

    #[test]
    fn test_log_level_round_trip() {
        let config = EditorConfig::from_json(r#"{"logLevel":"debug"}"#).expect("parse");
        assert_eq!(config.log_level.to_level_filter(), log::LevelFilter::Debug);
    }
}
