//! Scripted environment with caller-chosen signal values.
//!
//! Used to replay a recorded [`SignalRecord`] and to exercise the aggregator
//! against unavailable, failing, panicking or stalled probes without
//! touching real platform APIs.

use crate::collector::{Environment, ProbeError, ProbeResult};
use crate::signals::{HardwareInfo, Number, PluginInfo, SignalRecord, TouchSupport, WebGlInfo};
use async_trait::async_trait;

/// What a scripted probe does when queried.
#[derive(Debug, Clone, PartialEq)]
pub enum Scripted<T> {
    /// Returns the value
    Value(T),
    /// Reports the capability as missing
    Unavailable,
    /// Reports a failed query with the given message
    Fail(String),
    /// Panics inside the probe
    Panic,
    /// Never completes
    Stall,
}

impl<T> Default for Scripted<T> {
    fn default() -> Self {
        Scripted::Unavailable
    }
}

impl<T> From<Option<T>> for Scripted<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Scripted::Value(v),
            None => Scripted::Unavailable,
        }
    }
}

impl<T: Clone> Scripted<T> {
    async fn run(&self, what: &'static str) -> ProbeResult<T> {
        match self {
            Scripted::Value(v) => Ok(v.clone()),
            Scripted::Unavailable => Err(ProbeError::Unsupported(what)),
            Scripted::Fail(msg) => Err(ProbeError::Failed(msg.clone())),
            Scripted::Panic => panic!("scripted {what} probe panicked"),
            Scripted::Stall => futures::future::pending().await,
        }
    }
}

/// An [`Environment`] whose every signal is scripted.
///
/// All signals start out [`Scripted::Unavailable`].
#[derive(Debug, Clone, Default)]
pub struct FixedEnvironment {
    pub user_agent: Scripted<String>,
    pub language: Scripted<String>,
    pub color_depth: Scripted<u32>,
    pub timezone: Scripted<String>,
    pub canvas: Scripted<String>,
    pub webgl: Scripted<WebGlInfo>,
    pub fonts: Scripted<Vec<String>>,
    pub audio: Scripted<Vec<Number>>,
    pub plugins: Scripted<Vec<PluginInfo>>,
    pub hardware: Scripted<HardwareInfo>,
    pub touch_support: Scripted<TouchSupport>,
}

impl FixedEnvironment {
    /// Create an environment where nothing is available.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an environment that reproduces a recorded signal record.
    pub fn from_record(record: SignalRecord) -> Self {
        Self {
            user_agent: record.user_agent.into(),
            language: record.language.into(),
            color_depth: record.color_depth.into(),
            timezone: record.timezone.into(),
            canvas: record.canvas.into(),
            webgl: record.webgl.into(),
            fonts: record.fonts.into(),
            audio: record.audio.into(),
            plugins: record.plugins.into(),
            hardware: record.hardware.into(),
            touch_support: record.touch_support.into(),
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Scripted::Value(user_agent.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Scripted::Value(language.into());
        self
    }

    pub fn with_color_depth(mut self, depth: u32) -> Self {
        self.color_depth = Scripted::Value(depth);
        self
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Scripted::Value(timezone.into());
        self
    }

    pub fn with_canvas(mut self, canvas: Scripted<String>) -> Self {
        self.canvas = canvas;
        self
    }

    pub fn with_webgl(mut self, webgl: Scripted<WebGlInfo>) -> Self {
        self.webgl = webgl;
        self
    }

    pub fn with_fonts(mut self, fonts: Scripted<Vec<String>>) -> Self {
        self.fonts = fonts;
        self
    }

    pub fn with_audio(mut self, audio: Scripted<Vec<Number>>) -> Self {
        self.audio = audio;
        self
    }

    pub fn with_plugins(mut self, plugins: Scripted<Vec<PluginInfo>>) -> Self {
        self.plugins = plugins;
        self
    }

    pub fn with_hardware(mut self, cores: Option<u32>, memory: Option<f64>) -> Self {
        self.hardware = Scripted::Value(HardwareInfo {
            cores,
            memory: memory.map(Number),
        });
        self
    }

    pub fn with_touch_support(mut self, touch: TouchSupport) -> Self {
        self.touch_support = Scripted::Value(touch);
        self
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl Environment for FixedEnvironment {
    async fn user_agent(&self) -> ProbeResult<String> {
        self.user_agent.run("user agent").await
    }

    async fn language(&self) -> ProbeResult<String> {
        self.language.run("language").await
    }

    async fn color_depth(&self) -> ProbeResult<u32> {
        self.color_depth.run("color depth").await
    }

    async fn timezone(&self) -> ProbeResult<String> {
        self.timezone.run("timezone").await
    }

    async fn canvas(&self) -> ProbeResult<String> {
        self.canvas.run("canvas").await
    }

    async fn webgl(&self) -> ProbeResult<WebGlInfo> {
        self.webgl.run("webgl").await
    }

    async fn fonts(&self) -> ProbeResult<Vec<String>> {
        self.fonts.run("fonts").await
    }

    async fn audio(&self) -> ProbeResult<Vec<Number>> {
        self.audio.run("audio").await
    }

    async fn plugins(&self) -> ProbeResult<Vec<PluginInfo>> {
        self.plugins.run("plugins").await
    }

    async fn hardware(&self) -> ProbeResult<HardwareInfo> {
        self.hardware.run("hardware").await
    }

    async fn touch_support(&self) -> ProbeResult<TouchSupport> {
        self.touch_support.run("touch support").await
    }
}
