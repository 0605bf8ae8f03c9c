//! Failure isolation for a single signal probe.
//!
//! A probe never fails: errors, panics and timeouts inside the collector all
//! become an absent value, so one broken platform API cannot take down the
//! rest of the fingerprint.

use crate::collector::ProbeResult;
use crate::signals::SignalKind;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

/// How a probe ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "reason")]
pub enum ProbeOutcome {
    /// The signal has a value
    Collected,
    /// The collector reported the signal unavailable or failed
    Unavailable(String),
    /// The collector panicked
    Panicked,
    /// The collector did not finish in time
    TimedOut,
    /// The signal is turned off in configuration
    Disabled,
}

impl ProbeOutcome {
    /// Whether the signal ended up without a value although it was enabled.
    pub fn is_degraded(&self) -> bool {
        matches!(
            self,
            ProbeOutcome::Unavailable(_) | ProbeOutcome::Panicked | ProbeOutcome::TimedOut
        )
    }
}

/// The value of one probe together with how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct Probed<T> {
    pub value: Option<T>,
    pub outcome: ProbeOutcome,
}

impl<T> Probed<T> {
    pub fn disabled() -> Self {
        Self {
            value: None,
            outcome: ProbeOutcome::Disabled,
        }
    }
}

/// Run one collector call, absorbing every way it can go wrong.
pub async fn probe<T, F>(signal: SignalKind, collector: F, timeout: Option<Duration>) -> Probed<T>
where
    F: Future<Output = ProbeResult<T>>,
{
    let guarded = AssertUnwindSafe(collector).catch_unwind();

    let (value, outcome) = match with_timeout(guarded, timeout).await {
        Some(Ok(Ok(value))) => {
            tracing::debug!(%signal, "signal collected");
            (Some(value), ProbeOutcome::Collected)
        }
        Some(Ok(Err(e))) => {
            tracing::debug!(%signal, error = %e, "signal unavailable");
            (None, ProbeOutcome::Unavailable(e.to_string()))
        }
        Some(Err(_)) => {
            tracing::warn!(%signal, "signal probe panicked");
            (None, ProbeOutcome::Panicked)
        }
        None => {
            tracing::warn!(%signal, ?timeout, "signal probe timed out");
            (None, ProbeOutcome::TimedOut)
        }
    };

    Probed { value, outcome }
}

/// Await `fut`, giving up after `timeout`. `None` means the time ran out.
///
/// The limit needs a tokio runtime with its time driver enabled. Under any
/// other executor the probe runs unbounded.
#[cfg(not(target_arch = "wasm32"))]
async fn with_timeout<F: Future>(fut: F, timeout: Option<Duration>) -> Option<F::Output> {
    let Some(sleep) = timeout.and_then(timer) else {
        return Some(fut.await);
    };

    match futures::future::select(std::pin::pin!(fut), std::pin::pin!(sleep)).await {
        futures::future::Either::Left((output, _)) => Some(output),
        futures::future::Either::Right(_) => None,
    }
}

/// A tokio sleep for `limit`, if the current context can drive one.
#[cfg(not(target_arch = "wasm32"))]
fn timer(limit: Duration) -> Option<tokio::time::Sleep> {
    if tokio::runtime::Handle::try_current().is_err() {
        tracing::debug!("no tokio runtime, probe timeout not applied");
        return None;
    }
    // A runtime built without `enable_time` panics when the sleep is registered.
    match std::panic::catch_unwind(|| tokio::time::sleep(limit)) {
        Ok(sleep) => Some(sleep),
        Err(_) => {
            tracing::warn!("tokio timers disabled, probe timeout not applied");
            None
        }
    }
}

// Browser probes resolve synchronously or on platform callbacks; no timer.
#[cfg(target_arch = "wasm32")]
async fn with_timeout<F: Future>(fut: F, _timeout: Option<Duration>) -> Option<F::Output> {
    Some(fut.await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::ProbeError;

    async fn exploding_collector() -> ProbeResult<u32> {
        panic!("collector exploded")
    }

    #[tokio::test]
    async fn test_collected_value() {
        let collector = async { Ok::<_, ProbeError>("en".to_string()) };
        let probed = probe(SignalKind::Language, collector, None).await;
        assert_eq!(probed.value.as_deref(), Some("en"));
        assert_eq!(probed.outcome, ProbeOutcome::Collected);
    }

    #[tokio::test]
    async fn test_error_becomes_none() {
        let probed: Probed<String> = probe(
            SignalKind::Canvas,
            async { Err::<String, _>(ProbeError::Unsupported("canvas")) },
            None,
        )
        .await;
        assert!(probed.value.is_none());
        assert!(probed.outcome.is_degraded());
    }

    #[tokio::test]
    async fn test_panic_becomes_none() {
        let probed = probe(SignalKind::ColorDepth, exploding_collector(), None).await;
        assert!(probed.value.is_none());
        assert_eq!(probed.outcome, ProbeOutcome::Panicked);
    }

    #[tokio::test]
    async fn test_timeout_becomes_none() {
        let probed: Probed<u32> = probe(
            SignalKind::Audio,
            futures::future::pending(),
            Some(Duration::from_millis(20)),
        )
        .await;
        assert!(probed.value.is_none());
        assert_eq!(probed.outcome, ProbeOutcome::TimedOut);
    }

    #[test]
    fn test_timeout_ignored_outside_tokio() {
        let collector = async { Ok::<_, ProbeError>(24u32) };
        let probed = futures::executor::block_on(probe(
            SignalKind::ColorDepth,
            collector,
            Some(Duration::from_millis(20)),
        ));
        assert_eq!(probed.value, Some(24));
        assert_eq!(probed.outcome, ProbeOutcome::Collected);
    }

    #[test]
    fn test_timeout_ignored_without_time_driver() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let collector = async { Ok::<_, ProbeError>("UTC".to_string()) };
        let probed = runtime.block_on(probe(
            SignalKind::Timezone,
            collector,
            Some(Duration::from_millis(20)),
        ));
        assert_eq!(probed.value.as_deref(), Some("UTC"));
        assert_eq!(probed.outcome, ProbeOutcome::Collected);
    }

    #[test]
    fn test_disabled_is_not_degraded() {
        assert!(!Probed::<u32>::disabled().outcome.is_degraded());
    }
}
