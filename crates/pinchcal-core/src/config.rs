#![forbid(unsafe_code)]

//! Tunable thresholds and timings for the gesture and transition engine.
//!
//! Every field has a default matching the shipped behavior, so
//! `EngineConfig::default()` is the reference configuration.
//!
//! # Loading
//!
//! ```toml
//! # pinchcal.toml
//! [gesture]
//! pinch_threshold = 0.25
//! pinch_cooldown_ms = 400
//!
//! [transition]
//! leave_phase_ms = 250
//! ```
//!
//! ```rust,ignore
//! let config = EngineConfig::from_toml_file("pinchcal.toml")?;
//! ```
//!
//! Fields missing from a file keep their defaults.

#[cfg(feature = "config")]
use std::path::Path;

use web_time::Duration;

use crate::input::Modifiers;

/// Default fractional deviation from ratio 1.0 that classifies a pinch.
pub const DEFAULT_PINCH_THRESHOLD: f64 = 0.2;
/// Default minimum spacing between two emitted pinch events.
pub const DEFAULT_PINCH_COOLDOWN: Duration = Duration::from_millis(500);
/// Default length of the leaving phase of a view transition.
pub const DEFAULT_LEAVE_PHASE: Duration = Duration::from_millis(300);
/// Default length of the entering/settling phase of a view transition.
pub const DEFAULT_SETTLE_PHASE: Duration = Duration::from_millis(50);

// ---------------------------------------------------------------------------
// GestureConfig
// ---------------------------------------------------------------------------

/// Thresholds for pinch recognition and wheel simulation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GestureConfig {
    /// Fractional deviation from ratio 1.0 required to classify a pinch
    /// (default: 0.2).
    pub pinch_threshold: f64,
    /// Minimum time between two emitted pinch events of any source
    /// (default: 500ms).
    #[cfg_attr(
        feature = "serde",
        serde(rename = "pinch_cooldown_ms", with = "duration_ms")
    )]
    pub pinch_cooldown: Duration,
    /// Modifier that turns a wheel tick into a simulated pinch (default: Ctrl).
    pub wheel_modifier: Modifiers,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            pinch_threshold: DEFAULT_PINCH_THRESHOLD,
            pinch_cooldown: DEFAULT_PINCH_COOLDOWN,
            wheel_modifier: Modifiers::CTRL,
        }
    }
}

// ---------------------------------------------------------------------------
// TransitionConfig
// ---------------------------------------------------------------------------

/// Fixed delays of the two-stage view transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TransitionConfig {
    /// Delay between publishing the outgoing tag and switching the view
    /// (default: 300ms).
    #[cfg_attr(feature = "serde", serde(rename = "leave_phase_ms", with = "duration_ms"))]
    pub leave_phase: Duration,
    /// Delay between switching the view and settling (default: 50ms).
    #[cfg_attr(feature = "serde", serde(rename = "settle_phase_ms", with = "duration_ms"))]
    pub settle_phase: Duration,
}

impl TransitionConfig {
    /// Total time from trigger to `Settled`.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.leave_phase + self.settle_phase
    }
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            leave_phase: DEFAULT_LEAVE_PHASE,
            settle_phase: DEFAULT_SETTLE_PHASE,
        }
    }
}

// ---------------------------------------------------------------------------
// EngineConfig
// ---------------------------------------------------------------------------

/// Top-level configuration grouping gesture and transition parameters.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    pub gesture: GestureConfig,
    pub transition: TransitionConfig,
}

impl EngineConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Serialize to pretty JSON.
    #[cfg(feature = "config")]
    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(ConfigError::Json)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let threshold = self.gesture.pinch_threshold;
        if !threshold.is_finite() || threshold <= 0.0 || threshold >= 1.0 {
            errors.push(format!(
                "gesture.pinch_threshold must be in (0, 1), got {threshold}"
            ));
        }

        if self.gesture.wheel_modifier.is_empty() {
            errors.push("gesture.wheel_modifier must name at least one modifier".into());
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// Serde helpers
// ---------------------------------------------------------------------------

#[cfg(feature = "serde")]
mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use web_time::Duration;

    pub(super) fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let ms = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(ms)
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading an engine configuration.
#[cfg(feature = "config")]
#[derive(Debug)]
pub enum ConfigError {
    /// File I/O error.
    Io(std::io::Error),
    /// TOML parse error.
    Toml(toml::de::Error),
    /// JSON parse or encode error.
    Json(serde_json::Error),
}

#[cfg(feature = "config")]
impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "config I/O error: {e}"),
            Self::Toml(e) => write!(f, "config TOML error: {e}"),
            Self::Json(e) => write!(f, "config JSON error: {e}"),
        }
    }
}

#[cfg(feature = "config")]
impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
        }
    }
}
