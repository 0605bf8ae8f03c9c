//! Per-request collection report.
//!
//! Records how each probe of one fingerprint request ended. The report is
//! diagnostic only: it never feeds into the fingerprint itself.

use crate::core::probe::ProbeOutcome;
use crate::signals::SignalKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one signal within a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalOutcome {
    pub signal: SignalKind,
    #[serde(flatten)]
    pub outcome: ProbeOutcome,
}

/// What happened to every signal of one fingerprint request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionReport {
    /// When probing started
    pub started_at: DateTime<Utc>,
    /// When all probes had settled
    pub finished_at: DateTime<Utc>,
    /// Outcomes in record order
    pub outcomes: Vec<SignalOutcome>,
}

impl CollectionReport {
    /// Create an empty report for a request that started at `started_at`.
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            finished_at: started_at,
            outcomes: Vec::new(),
        }
    }

    /// Record how a signal's probe ended.
    pub fn record(&mut self, signal: SignalKind, outcome: ProbeOutcome) {
        self.outcomes.push(SignalOutcome { signal, outcome });
    }

    /// Mark the report complete.
    pub fn finish(&mut self) {
        self.finished_at = Utc::now();
    }

    /// Outcome for one signal, if recorded.
    pub fn outcome(&self, signal: SignalKind) -> Option<&ProbeOutcome> {
        self.outcomes
            .iter()
            .find(|o| o.signal == signal)
            .map(|o| &o.outcome)
    }

    /// Enabled signals that ended up without a value.
    pub fn degraded_signals(&self) -> Vec<SignalKind> {
        self.outcomes
            .iter()
            .filter(|o| o.outcome.is_degraded())
            .map(|o| o.signal)
            .collect()
    }

    /// Get the counts for this report.
    pub fn stats(&self) -> ReportStats {
        let count = |pred: fn(&ProbeOutcome) -> bool| {
            self.outcomes.iter().filter(|o| pred(&o.outcome)).count()
        };

        ReportStats {
            collected: count(|o| *o == ProbeOutcome::Collected),
            degraded: count(ProbeOutcome::is_degraded),
            disabled: count(|o| *o == ProbeOutcome::Disabled),
            duration_ms: (self.finished_at - self.started_at)
                .num_milliseconds()
                .max(0) as u64,
        }
    }

    /// Get a summary string for display.
    pub fn summary(&self) -> String {
        let stats = self.stats();
        let mut lines = vec![
            "Collection Report:".to_string(),
            format!("- Signals collected: {}", stats.collected),
            format!("- Signals unavailable: {}", stats.degraded),
            format!("- Signals disabled: {}", stats.disabled),
            format!("- Collection time: {} ms", stats.duration_ms),
        ];

        let degraded: Vec<&SignalOutcome> = self
            .outcomes
            .iter()
            .filter(|o| o.outcome.is_degraded())
            .collect();
        if !degraded.is_empty() {
            lines.push(String::new());
            lines.push("Unavailable:".to_string());
            for o in degraded {
                let reason = match &o.outcome {
                    ProbeOutcome::Unavailable(why) => why.clone(),
                    ProbeOutcome::Panicked => "collector panicked".to_string(),
                    ProbeOutcome::TimedOut => "timed out".to_string(),
                    _ => String::new(),
                };
                lines.push(format!("- {}: {}", o.signal, reason));
            }
        }

        lines.join("\n")
    }
}

/// Counts derived from a [`CollectionReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportStats {
    pub collected: usize,
    pub degraded: usize,
    pub disabled: usize,
    pub duration_ms: u64,
}
