//! Device Fingerprint - cookie-less client identification.
//!
//! This library collects browser and device signals and condenses them into
//! a single stable identifier: the lowercase hex SHA-256 of the canonical
//! signal record.
//!
//! # Guarantees
//!
//! - **Deterministic**: the same environment always yields the same fingerprint
//! - **Fault tolerant**: an unavailable or broken signal becomes `null`, never an error
//! - **Fixed length**: fingerprints are always 64 lowercase hex characters
//! - **Browser compatible**: records serialize to the same bytes a browser's
//!   `JSON.stringify` produces, so fingerprints match across runtimes
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Device Fingerprint                        │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐        │
//! │  │ Environment │──▶│   Probes    │──▶│   Record    │        │
//! │  │ (host/web)  │   │ (fan-out)   │   │ (fixed keys)│        │
//! │  └─────────────┘   └─────────────┘   └─────────────┘        │
//! │                           │                  │               │
//! │                           ▼                  ▼               │
//! │                    ┌─────────────┐   ┌─────────────┐        │
//! │                    │ Collection  │   │  SHA-256    │        │
//! │                    │   Report    │   │  (hex)      │        │
//! │                    └─────────────┘   └─────────────┘        │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use device_fingerprint::{collector::HostEnvironment, Fingerprinter};
//!
//! # async fn run() -> Result<(), device_fingerprint::FingerprintError> {
//! let fingerprinter = Fingerprinter::new(HostEnvironment::new());
//! let id = fingerprinter.generate_fingerprint().await?;
//! assert_eq!(id.len(), 64);
//! # Ok(())
//! # }
//! ```

pub mod collector;
pub mod config;
pub mod core;
pub mod report;
pub mod signals;

// Re-export key types at crate root for convenience
pub use collector::{Environment, FixedEnvironment, ProbeError, ProbeResult, Scripted};
pub use config::{Config, ConfigError, SignalConfig};
pub use core::{
    hash_record, Fingerprint, FingerprintError, FingerprintOptions, Fingerprinter, ProbeOutcome,
};
pub use report::{CollectionReport, ReportStats};
pub use signals::{
    HardwareInfo, Number, PluginInfo, SignalKind, SignalRecord, TouchSupport, WebGlInfo,
};

#[cfg(not(target_arch = "wasm32"))]
pub use collector::HostEnvironment;

#[cfg(all(target_arch = "wasm32", feature = "browser"))]
pub use collector::BrowserEnvironment;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Declaration of what is collected, for display to users.
pub const SIGNAL_DECLARATION: &str = r#"
╔══════════════════════════════════════════════════════════════════╗
║             DEVICE FINGERPRINT - SIGNAL DECLARATION              ║
╠══════════════════════════════════════════════════════════════════╣
║                                                                  ║
║  A fingerprint is a SHA-256 hash of the signals below.           ║
║                                                                  ║
║  ✓ WHAT IS READ:                                                 ║
║    • Agent identity, language, color depth, timezone             ║
║    • Output of a fixed canvas drawing and WebGL renderer name    ║
║    • Which of 15 common fonts are installed                      ║
║    • Frequency response of a silent synthetic tone               ║
║    • Installed plugins, CPU cores, memory size, touch support    ║
║                                                                  ║
║  ✗ WHAT IS NEVER DONE:                                           ║
║    • No cookies or local storage                                 ║
║    • Fingerprints and signal records are not stored              ║
║    • Nothing is sent over the network                            ║
║                                                                  ║
║  Signals that cannot be read are recorded as null.               ║
║                                                                  ║
╚══════════════════════════════════════════════════════════════════╝
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_declaration_contents() {
        assert!(SIGNAL_DECLARATION.contains("SIGNAL DECLARATION"));
        assert!(SIGNAL_DECLARATION.contains("SHA-256"));
        assert!(SIGNAL_DECLARATION.contains("not stored"));
    }
}
