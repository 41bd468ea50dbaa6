//! Editor configuration.

use crate::anchor::{DEFAULT_MAX_DISTANCE, DEFAULT_MIN_CANDIDATES};
use crate::geometry::EndpointStyle;
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How long a rejected duplicate keeps its highlight.
pub const DEFAULT_FLAG_DURATION_MS: u64 = 2000;

/// Connector manager settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorConfig {
    /// Maximum pointer-to-anchor-center distance for resolution.
    pub max_distance: f64,
    /// Anchors required on the board before anything resolves.
    pub min_candidates: usize,
    /// Attachment convention, fixed for the lifetime of a manager.
    pub endpoint_style: EndpointStyle,
    /// Duplicate highlight duration in milliseconds.
    pub flag_duration_ms: u64,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            max_distance: DEFAULT_MAX_DISTANCE,
            min_candidates: DEFAULT_MIN_CANDIDATES,
            endpoint_style: EndpointStyle::default(),
            flag_duration_ms: DEFAULT_FLAG_DURATION_MS,
        }
    }
}

impl ConnectorConfig {
    pub fn flag_duration(&self) -> Duration {
        Duration::from_millis(self.flag_duration_ms)
    }

    pub fn with_max_distance(mut self, max_distance: f64) -> Self {
        self.max_distance = max_distance;
        self
    }

    pub fn with_endpoint_style(mut self, style: EndpointStyle) -> Self {
        self.endpoint_style = style;
        self
    }

    pub fn with_flag_duration(mut self, duration: Duration) -> Self {
        self.flag_duration_ms = duration.as_millis() as u64;
        self
    }
}

/// Board layout settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Size of a freshly dropped card.
    pub card_size: Size,
    /// Smallest size a card can be resized to.
    pub min_card_size: Size,
    /// Duplicate-drop highlight duration in milliseconds.
    pub flag_duration_ms: u64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            card_size: Size::new(240.0, 300.0),
            min_card_size: Size::new(80.0, 60.0),
            flag_duration_ms: DEFAULT_FLAG_DURATION_MS,
        }
    }
}

impl BoardConfig {
    pub fn flag_duration(&self) -> Duration {
        Duration::from_millis(self.flag_duration_ms)
    }
}

/// Top-level editor configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub connector: ConnectorConfig,
    pub board: BoardConfig,
}

impl EditorConfig {
    /// Parse configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
