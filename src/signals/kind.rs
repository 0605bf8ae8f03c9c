//! Names of the collected signals.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One entry of the signal record.
///
/// Variants are declared in record key order; [`SignalKind::ALL`] follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SignalKind {
    UserAgent,
    Language,
    ColorDepth,
    Timezone,
    Canvas,
    Webgl,
    Fonts,
    Audio,
    Plugins,
    Hardware,
    TouchSupport,
}

impl SignalKind {
    /// All signals in record key order.
    pub const ALL: [SignalKind; 11] = [
        SignalKind::UserAgent,
        SignalKind::Language,
        SignalKind::ColorDepth,
        SignalKind::Timezone,
        SignalKind::Canvas,
        SignalKind::Webgl,
        SignalKind::Fonts,
        SignalKind::Audio,
        SignalKind::Plugins,
        SignalKind::Hardware,
        SignalKind::TouchSupport,
    ];

    /// The record key this signal is serialized under.
    pub fn key(&self) -> &'static str {
        match self {
            SignalKind::UserAgent => "userAgent",
            SignalKind::Language => "language",
            SignalKind::ColorDepth => "colorDepth",
            SignalKind::Timezone => "timezone",
            SignalKind::Canvas => "canvas",
            SignalKind::Webgl => "webgl",
            SignalKind::Fonts => "fonts",
            SignalKind::Audio => "audio",
            SignalKind::Plugins => "plugins",
            SignalKind::Hardware => "hardware",
            SignalKind::TouchSupport => "touchSupport",
        }
    }

    /// Short human description, used by the CLI signal listing.
    pub fn description(&self) -> &'static str {
        match self {
            SignalKind::UserAgent => "Browser or agent identity string",
            SignalKind::Language => "Preferred language tag",
            SignalKind::ColorDepth => "Display color depth in bits",
            SignalKind::Timezone => "IANA timezone name",
            SignalKind::Canvas => "Encoded output of a fixed 2D drawing",
            SignalKind::Webgl => "WebGL vendor, renderer and extension names",
            SignalKind::Fonts => "Which of a fixed list of fonts are installed",
            SignalKind::Audio => "First frequency bins of a synthetic tone",
            SignalKind::Plugins => "Installed browser plugins",
            SignalKind::Hardware => "CPU core count and memory size hint",
            SignalKind::TouchSupport => "Touch point counts and touch event support",
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Error returned when a signal name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSignal(pub String);

impl fmt::Display for UnknownSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown signal: {}", self.0)
    }
}

impl std::error::Error for UnknownSignal {}

impl FromStr for SignalKind {
    type Err = UnknownSignal;

    /// Accepts the record key in any case, with or without `-`/`_` separators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();

        SignalKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.key().to_lowercase() == normalized)
            .ok_or_else(|| UnknownSignal(s.trim().to_string()))
    }
}
