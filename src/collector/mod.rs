//! Signal collection for fingerprinting.
//!
//! An [`Environment`] answers one async query per signal. Implementations
//! report a missing or broken platform capability as a [`ProbeError`]; the
//! aggregator turns any such error into an absent signal.

pub mod fixed;

#[cfg(not(target_arch = "wasm32"))]
pub mod host;

#[cfg(all(target_arch = "wasm32", feature = "browser"))]
pub mod browser;

use crate::signals::{HardwareInfo, Number, PluginInfo, TouchSupport, WebGlInfo};
use async_trait::async_trait;

pub use fixed::{FixedEnvironment, Scripted};

#[cfg(not(target_arch = "wasm32"))]
pub use host::HostEnvironment;

#[cfg(all(target_arch = "wasm32", feature = "browser"))]
pub use browser::BrowserEnvironment;

/// Fonts probed for availability, in the order they appear in the record.
pub const FONT_CANDIDATES: [&str; 15] = [
    "Arial",
    "Arial Black",
    "Arial Narrow",
    "Calibri",
    "Cambria",
    "Comic Sans MS",
    "Courier",
    "Courier New",
    "Georgia",
    "Helvetica",
    "Impact",
    "Tahoma",
    "Times New Roman",
    "Trebuchet MS",
    "Verdana",
];

/// Number of leading frequency bins kept from the audio probe.
pub const AUDIO_SAMPLE_COUNT: usize = 10;

/// Why a signal could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// The platform has no such capability
    Unsupported(&'static str),
    /// The capability exists but the query failed or was denied
    Failed(String),
}

impl std::fmt::Display for ProbeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeError::Unsupported(what) => write!(f, "Unsupported: {what}"),
            ProbeError::Failed(e) => write!(f, "Probe failed: {e}"),
        }
    }
}

impl std::error::Error for ProbeError {}

pub type ProbeResult<T> = Result<T, ProbeError>;

/// Read-only access to the device/browser facts that make up a fingerprint.
///
/// Each method is independent of the others and may be polled concurrently.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait Environment {
    async fn user_agent(&self) -> ProbeResult<String>;

    async fn language(&self) -> ProbeResult<String>;

    async fn color_depth(&self) -> ProbeResult<u32>;

    async fn timezone(&self) -> ProbeResult<String>;

    /// Data URL of the reference 2D drawing.
    async fn canvas(&self) -> ProbeResult<String>;

    async fn webgl(&self) -> ProbeResult<WebGlInfo>;

    /// Subset of [`FONT_CANDIDATES`] that is installed, in candidate order.
    async fn fonts(&self) -> ProbeResult<Vec<String>>;

    /// At most [`AUDIO_SAMPLE_COUNT`] frequency-domain samples.
    async fn audio(&self) -> ProbeResult<Vec<Number>>;

    async fn plugins(&self) -> ProbeResult<Vec<PluginInfo>>;

    async fn hardware(&self) -> ProbeResult<HardwareInfo>;

    async fn touch_support(&self) -> ProbeResult<TouchSupport>;
}
