//! Integration tests for fingerprint generation

use device_fingerprint::{
    hash_record, FingerprintOptions, Fingerprinter, FixedEnvironment, HostEnvironment, Number,
    PluginInfo, ProbeOutcome, Scripted, SignalConfig, SignalKind, SignalRecord, TouchSupport,
    WebGlInfo,
};
use std::collections::HashSet;
use std::time::Duration;

const REFERENCE_FINGERPRINT: &str =
    "9df640ee3479c6c83409bbb57212cace2f6f51bd6b7376e7788db5ae030678fa";

/// The environment behind the reference vector.
fn reference_environment() -> FixedEnvironment {
    FixedEnvironment::new()
        .with_user_agent("X")
        .with_language("en")
        .with_color_depth(24)
        .with_timezone("UTC")
        .with_hardware(Some(4), Some(8.0))
        .with_touch_support(TouchSupport::default())
}

/// An environment where every signal is available.
fn full_environment() -> FixedEnvironment {
    FixedEnvironment::new()
        .with_user_agent("Mozilla/5.0 (X11; Linux x86_64)")
        .with_language("en-US")
        .with_color_depth(24)
        .with_timezone("Europe/Paris")
        .with_webgl(Scripted::Value(WebGlInfo {
            vendor: Some("WebKit".to_string()),
            renderer: Some("WebKit WebGL".to_string()),
            extensions: Some(vec!["OES_texture_float".to_string()]),
        }))
        .with_fonts(Scripted::Value(vec!["Arial".to_string(), "Verdana".to_string()]))
        .with_audio(Scripted::Value(
            [-101.5f32, -99.25, -120.0]
                .into_iter()
                .map(Number::from)
                .collect(),
        ))
        .with_canvas(Scripted::Value(
            "data:image/png;base64,iVBORw0KGgo=".to_string(),
        ))
        .with_plugins(Scripted::Value(vec![PluginInfo {
            name: "PDF Viewer".to_string(),
            description: "Portable Document Format".to_string(),
            filename: "internal-pdf-viewer".to_string(),
        }]))
        .with_hardware(Some(8), Some(8.0))
        .with_touch_support(TouchSupport::default())
}

fn is_fingerprint(s: &str) -> bool {
    s.len() == 64 && s.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))
}

#[tokio::test]
async fn test_reference_fingerprint() {
    let fingerprint = Fingerprinter::new(reference_environment())
        .generate_fingerprint()
        .await
        .expect("fingerprint");

    assert_eq!(fingerprint, REFERENCE_FINGERPRINT);
}

#[test]
fn test_generates_without_tokio_runtime() {
    let fingerprinter = Fingerprinter::new(FixedEnvironment::new());
    let fingerprint = futures::executor::block_on(fingerprinter.generate_fingerprint()).unwrap();
    assert!(is_fingerprint(&fingerprint));

    let reference = futures::executor::block_on(
        Fingerprinter::new(reference_environment()).generate_fingerprint(),
    )
    .unwrap();
    assert_eq!(reference, REFERENCE_FINGERPRINT);
}

#[test]
fn test_generates_on_runtime_without_timers() {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let fingerprint = runtime
        .block_on(Fingerprinter::new(reference_environment()).generate_fingerprint())
        .unwrap();
    assert_eq!(fingerprint, REFERENCE_FINGERPRINT);
}

#[tokio::test]
async fn test_deterministic() {
    let fingerprinter = Fingerprinter::new(full_environment());

    let first = fingerprinter.generate_fingerprint().await.unwrap();
    let second = fingerprinter.generate_fingerprint().await.unwrap();

    assert_eq!(first, second);
    assert!(is_fingerprint(&first));
}

#[tokio::test]
async fn test_single_field_changes_fingerprint() {
    let variations: Vec<FixedEnvironment> = vec![
        full_environment(),
        full_environment().with_language("fr-FR"),
        full_environment().with_user_agent("Mozilla/5.0 (Windows NT 10.0)"),
        full_environment().with_color_depth(30),
        full_environment().with_timezone("UTC"),
        full_environment().with_canvas(Scripted::Value(
            "data:image/png;base64,AAAAAAAAAAA=".to_string(),
        )),
        full_environment().with_webgl(Scripted::Unavailable),
        full_environment().with_fonts(Scripted::Value(vec!["Arial".to_string()])),
        full_environment().with_audio(Scripted::Value(vec![Number(-101.5)])),
        full_environment().with_plugins(Scripted::Value(Vec::new())),
        full_environment().with_hardware(Some(4), Some(8.0)),
        full_environment().with_hardware(Some(8), None),
        full_environment().with_touch_support(TouchSupport {
            max_touch_points: 5,
            touch_event: true,
            touch_points: 0,
        }),
    ];

    let mut seen = HashSet::new();
    for env in variations {
        let fingerprint = Fingerprinter::new(env).generate_fingerprint().await.unwrap();
        assert!(seen.insert(fingerprint), "fingerprint collision");
    }
}

#[tokio::test]
async fn test_failed_webgl_degrades_to_null() {
    let env = full_environment().with_webgl(Scripted::Fail("context lost".to_string()));
    let result = Fingerprinter::new(env).generate_with_report().await.unwrap();

    assert!(is_fingerprint(&result.fingerprint));
    assert!(result.record.webgl.is_none());
    assert!(result.record.fonts.is_some());
    assert_eq!(result.report.degraded_signals(), vec![SignalKind::Webgl]);

    let json = serde_json::to_string(&result.record).unwrap();
    assert!(json.contains(r#""webgl":null"#));
}

#[tokio::test]
async fn test_panicking_collector_degrades_to_null() {
    let env = full_environment().with_webgl(Scripted::Panic);
    let result = Fingerprinter::new(env).generate_with_report().await.unwrap();

    assert!(result.record.webgl.is_none());
    assert_eq!(
        result.report.outcome(SignalKind::Webgl),
        Some(&ProbeOutcome::Panicked)
    );

    // Same record as an environment whose WebGL is simply missing.
    let unsupported = full_environment().with_webgl(Scripted::Unavailable);
    let expected = Fingerprinter::new(unsupported)
        .generate_fingerprint()
        .await
        .unwrap();
    assert_eq!(result.fingerprint, expected);
}

#[tokio::test]
async fn test_stalled_collector_times_out() {
    let env = full_environment().with_audio(Scripted::Stall);
    let fingerprinter = Fingerprinter::new(env).with_options(FingerprintOptions {
        signals: SignalConfig::all(),
        probe_timeout: Some(Duration::from_millis(50)),
    });

    let result = fingerprinter.generate_with_report().await.unwrap();

    assert!(result.record.audio.is_none());
    assert!(result.record.user_agent.is_some());
    assert_eq!(
        result.report.outcome(SignalKind::Audio),
        Some(&ProbeOutcome::TimedOut)
    );
}

#[tokio::test]
async fn test_every_collector_failing_still_hashes() {
    let result = Fingerprinter::new(FixedEnvironment::new())
        .generate_with_report()
        .await
        .unwrap();

    assert!(is_fingerprint(&result.fingerprint));
    assert_eq!(result.record, SignalRecord::default());
    assert_eq!(result.report.stats().degraded, SignalKind::ALL.len());
}

#[tokio::test]
async fn test_null_and_empty_fonts_are_distinct() {
    let null_fonts = Fingerprinter::new(reference_environment())
        .generate_fingerprint()
        .await
        .unwrap();
    let empty_env = reference_environment().with_fonts(Scripted::Value(vec![]));
    let empty_fonts = Fingerprinter::new(empty_env)
        .generate_fingerprint()
        .await
        .unwrap();

    assert_ne!(null_fonts, empty_fonts);
}

#[tokio::test]
async fn test_disabled_signals_match_unavailable_ones() {
    let signals =
        SignalConfig::from_csv("userAgent,language,colorDepth,timezone,hardware,touchSupport")
            .unwrap();
    let fingerprinter = Fingerprinter::new(full_environment()).with_options(FingerprintOptions {
        signals,
        probe_timeout: None,
    });

    let result = fingerprinter.generate_with_report().await.unwrap();
    assert!(result.record.canvas.is_none());
    assert!(result.record.plugins.is_none());
    assert_eq!(result.report.stats().disabled, 5);
    assert_eq!(result.report.stats().degraded, 0);
}

#[tokio::test]
async fn test_replayed_record_reproduces_fingerprint() {
    let original = Fingerprinter::new(full_environment())
        .generate_with_report()
        .await
        .unwrap();

    let json = serde_json::to_string(&original.record).unwrap();
    let parsed: SignalRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(hash_record(&parsed).unwrap(), original.fingerprint);

    let replayed = Fingerprinter::new(FixedEnvironment::from_record(parsed))
        .generate_fingerprint()
        .await
        .unwrap();
    assert_eq!(replayed, original.fingerprint);
}

#[test]
fn test_browser_record_hashes_like_browser() {
    // As produced by JSON.stringify in a browser: integral numbers have no
    // fraction, -Infinity became null and unknown hardware members are absent.
    let browser_json = r#"{"userAgent":"X","language":"en","colorDepth":24,"timezone":"UTC","canvas":null,"webgl":null,"fonts":[],"audio":[-120,-100.5,null],"plugins":[],"hardware":{"cores":4},"touchSupport":{"maxTouchPoints":0,"touchEvent":false,"touchPoints":0}}"#;

    let record: SignalRecord = serde_json::from_str(browser_json).unwrap();
    assert_eq!(serde_json::to_string(&record).unwrap(), browser_json);
}

#[tokio::test]
async fn test_host_environment_produces_fingerprint() {
    let fingerprinter = Fingerprinter::new(HostEnvironment::new());

    let first = fingerprinter.generate_with_report().await.unwrap();
    let second = fingerprinter.generate_fingerprint().await.unwrap();

    assert!(is_fingerprint(&first.fingerprint));
    assert_eq!(first.fingerprint, second);
    assert!(first.record.user_agent.is_some());
    assert!(first.record.canvas.is_none());
}
