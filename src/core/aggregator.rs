//! Fingerprint aggregation.
//!
//! Fans out one probe per signal, waits for all of them, assembles the
//! [`SignalRecord`] and hashes its canonical form.

use crate::collector::{Environment, ProbeResult};
use crate::config::{Config, SignalConfig};
use crate::core::digest::{hash_record_with, DigestPrimitive, FingerprintError, Sha256Digest};
use crate::core::probe::{probe, Probed};
use crate::report::CollectionReport;
use crate::signals::{SignalKind, SignalRecord};
use chrono::Utc;
use std::future::Future;
use std::time::Duration;
use tracing::Instrument;
use uuid::Uuid;

/// Settings for one [`Fingerprinter`].
#[derive(Debug, Clone, PartialEq)]
pub struct FingerprintOptions {
    /// Signals to probe; the rest are recorded as `null`
    pub signals: SignalConfig,
    /// Upper bound on each probe (native targets only)
    pub probe_timeout: Option<Duration>,
}

impl Default for FingerprintOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for FingerprintOptions {
    fn from(config: &Config) -> Self {
        Self {
            signals: config.signals.clone(),
            probe_timeout: config.probe_timeout(),
        }
    }
}

/// Result of a fingerprint request with the data it was computed from.
#[derive(Debug, Clone)]
pub struct Fingerprint {
    /// Lowercase hex SHA-256 of the canonical record
    pub fingerprint: String,
    pub record: SignalRecord,
    pub report: CollectionReport,
}

/// Builds fingerprints from an [`Environment`].
pub struct Fingerprinter<E, D = Sha256Digest> {
    environment: E,
    digest: D,
    options: FingerprintOptions,
}

impl<E: Environment> Fingerprinter<E> {
    /// Create a fingerprinter using SHA-256 and default options.
    pub fn new(environment: E) -> Self {
        Self::with_digest(environment, Sha256Digest)
    }
}

impl<E: Environment, D: DigestPrimitive> Fingerprinter<E, D> {
    /// Create a fingerprinter with a specific digest primitive.
    pub fn with_digest(environment: E, digest: D) -> Self {
        Self {
            environment,
            digest,
            options: FingerprintOptions::default(),
        }
    }

    pub fn with_options(mut self, options: FingerprintOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &FingerprintOptions {
        &self.options
    }

    /// Collect every signal and return the fingerprint.
    pub async fn generate_fingerprint(&self) -> Result<String, FingerprintError> {
        self.generate_with_report()
            .await
            .map(|result| result.fingerprint)
    }

    /// Collect every signal and return the fingerprint, record and report.
    pub async fn generate_with_report(&self) -> Result<Fingerprint, FingerprintError> {
        let span = tracing::info_span!("fingerprint", request_id = %Uuid::new_v4());

        async move {
            let (record, report) = self.collect_with_report().await;
            let fingerprint = hash_record_with(&record, &self.digest)?;

            let stats = report.stats();
            tracing::info!(
                %fingerprint,
                collected = stats.collected,
                degraded = stats.degraded,
                disabled = stats.disabled,
                duration_ms = stats.duration_ms,
                "fingerprint generated"
            );

            Ok::<_, FingerprintError>(Fingerprint {
                fingerprint,
                record,
                report,
            })
        }
        .instrument(span)
        .await
    }

    /// Collect every signal without hashing.
    pub async fn collect(&self) -> SignalRecord {
        self.collect_with_report().await.0
    }

    /// Collect every signal and report how each probe ended.
    pub async fn collect_with_report(&self) -> (SignalRecord, CollectionReport) {
        let started_at = Utc::now();
        let env = &self.environment;

        let (
            user_agent,
            language,
            color_depth,
            timezone,
            canvas,
            webgl,
            fonts,
            audio,
            plugins,
            hardware,
            touch_support,
        ) = futures::join!(
            self.run(SignalKind::UserAgent, env.user_agent()),
            self.run(SignalKind::Language, env.language()),
            self.run(SignalKind::ColorDepth, env.color_depth()),
            self.run(SignalKind::Timezone, env.timezone()),
            self.run(SignalKind::Canvas, env.canvas()),
            self.run(SignalKind::Webgl, env.webgl()),
            self.run(SignalKind::Fonts, env.fonts()),
            self.run(SignalKind::Audio, env.audio()),
            self.run(SignalKind::Plugins, env.plugins()),
            self.run(SignalKind::Hardware, env.hardware()),
            self.run(SignalKind::TouchSupport, env.touch_support()),
        );

        let mut report = CollectionReport::new(started_at);
        let record = SignalRecord {
            user_agent: settle(&mut report, SignalKind::UserAgent, user_agent),
            language: settle(&mut report, SignalKind::Language, language),
            color_depth: settle(&mut report, SignalKind::ColorDepth, color_depth),
            timezone: settle(&mut report, SignalKind::Timezone, timezone),
            canvas: settle(&mut report, SignalKind::Canvas, canvas),
            webgl: settle(&mut report, SignalKind::Webgl, webgl),
            fonts: settle(&mut report, SignalKind::Fonts, fonts),
            audio: settle(&mut report, SignalKind::Audio, audio),
            plugins: settle(&mut report, SignalKind::Plugins, plugins),
            hardware: settle(&mut report, SignalKind::Hardware, hardware),
            touch_support: settle(&mut report, SignalKind::TouchSupport, touch_support),
        };
        report.finish();

        (record, report)
    }

    async fn run<T, F>(&self, signal: SignalKind, collector: F) -> Probed<T>
    where
        F: Future<Output = ProbeResult<T>>,
    {
        if !self.options.signals.is_enabled(signal) {
            tracing::debug!(%signal, "signal disabled");
            return Probed::disabled();
        }
        probe(signal, collector, self.options.probe_timeout).await
    }
}

fn settle<T>(report: &mut CollectionReport, signal: SignalKind, probed: Probed<T>) -> Option<T> {
    report.record(signal, probed.outcome);
    probed.value
}
