//! Signal model for fingerprint collection.
//!
//! A [`SignalRecord`] holds one value per device/browser signal. Every field
//! is optional: a signal that could not be read is `None` and never stops
//! the others from being collected.

pub mod kind;
pub mod number;
pub mod types;

pub use kind::SignalKind;
pub use number::Number;
pub use types::{HardwareInfo, PluginInfo, SignalRecord, TouchSupport, WebGlInfo};
