//! Signal record types.
//!
//! Field declaration order is the serialized key order and therefore part of
//! the fingerprint. Do not reorder fields.

use crate::signals::number::Number;
use serde::{Deserialize, Serialize};

/// One fingerprint request's worth of signals.
///
/// Unavailable signals serialize as `null`, so a missing list and an empty
/// list produce different bytes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalRecord {
    /// Browser or agent identity string
    pub user_agent: Option<String>,
    /// Preferred language tag (e.g. `en-US`)
    pub language: Option<String>,
    /// Display color depth in bits
    pub color_depth: Option<u32>,
    /// IANA timezone name
    pub timezone: Option<String>,
    /// Encoded image of the reference drawing (data URL)
    pub canvas: Option<String>,
    /// 3D context identity
    pub webgl: Option<WebGlInfo>,
    /// Installed fonts, in candidate-list order
    pub fonts: Option<Vec<String>>,
    /// Leading frequency bins of the audio probe
    pub audio: Option<Vec<Number>>,
    /// Installed browser plugins
    pub plugins: Option<Vec<PluginInfo>>,
    /// Hardware hints
    pub hardware: Option<HardwareInfo>,
    /// Touch capability flags
    pub touch_support: Option<TouchSupport>,
}

impl SignalRecord {
    /// Number of signals that carry a value.
    pub fn present_count(&self) -> usize {
        [
            self.user_agent.is_some(),
            self.language.is_some(),
            self.color_depth.is_some(),
            self.timezone.is_some(),
            self.canvas.is_some(),
            self.webgl.is_some(),
            self.fonts.is_some(),
            self.audio.is_some(),
            self.plugins.is_some(),
            self.hardware.is_some(),
            self.touch_support.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }
}

/// WebGL vendor/renderer identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebGlInfo {
    pub vendor: Option<String>,
    pub renderer: Option<String>,
    /// Supported extension names; `None` when the context reports no list
    pub extensions: Option<Vec<String>>,
}

/// A single installed plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginInfo {
    pub name: String,
    pub description: String,
    pub filename: String,
}

/// Hardware hints.
///
/// Unknown members are left out of the object entirely rather than written
/// as `null`, matching how browsers serialize `undefined` properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HardwareInfo {
    /// Logical CPU count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cores: Option<u32>,
    /// Approximate memory in GiB (may be fractional, e.g. 0.5)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<Number>,
}

/// Touch capability flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TouchSupport {
    /// Maximum simultaneous touch points (0 when not reported)
    pub max_touch_points: u32,
    /// Whether touch events are supported
    pub touch_event: bool,
    /// Legacy vendor-prefixed touch point count (0 when not reported)
    pub touch_points: u32,
}
