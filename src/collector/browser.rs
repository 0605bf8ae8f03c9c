//! Browser environment (wasm32, `browser` feature).
//!
//! Queries the web platform through `web-sys`. Each probe allocates its own
//! canvas or audio context and drops it before returning.

use crate::collector::{
    Environment, ProbeError, ProbeResult, AUDIO_SAMPLE_COUNT, FONT_CANDIDATES,
};
use crate::core::Fingerprinter;
use crate::signals::{HardwareInfo, Number, PluginInfo, TouchSupport, WebGlInfo};
use async_trait::async_trait;
use js_sys::{Array, Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    AudioContext, CanvasRenderingContext2d, Document, HtmlCanvasElement, OscillatorType,
    WebGlRenderingContext, Window,
};

/// Text drawn by the canvas probe.
const CANVAS_TEXT: &str = "Hello, world!";

/// Environment backed by the page's `window`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserEnvironment;

impl BrowserEnvironment {
    pub fn new() -> Self {
        Self
    }
}

fn window() -> ProbeResult<Window> {
    web_sys::window().ok_or(ProbeError::Unsupported("window"))
}

fn document() -> ProbeResult<Document> {
    window()?
        .document()
        .ok_or(ProbeError::Unsupported("document"))
}

fn js_err(e: JsValue) -> ProbeError {
    ProbeError::Failed(e.as_string().unwrap_or_else(|| format!("{e:?}")))
}

fn new_canvas(document: &Document) -> ProbeResult<HtmlCanvasElement> {
    document
        .create_element("canvas")
        .map_err(js_err)?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| ProbeError::Failed("created element is not a canvas".to_string()))
}

/// Read a numeric navigator property web-sys does not bind.
fn navigator_number(window: &Window, property: &str) -> Option<f64> {
    Reflect::get(&window.navigator(), &JsValue::from_str(property))
        .ok()
        .and_then(|v| v.as_f64())
}

fn draw_reference_image(ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
    ctx.set_text_baseline("top");
    ctx.set_font("14px Arial");
    ctx.set_fill_style(&JsValue::from_str("#f60"));
    ctx.fill_rect(125.0, 1.0, 62.0, 20.0);
    ctx.set_fill_style(&JsValue::from_str("#069"));
    ctx.fill_text(CANVAS_TEXT, 2.0, 15.0)?;
    ctx.set_fill_style(&JsValue::from_str("rgba(102, 204, 0, 0.7)"));
    ctx.fill_text(CANVAS_TEXT, 4.0, 17.0)?;
    Ok(())
}

/// Render a silent triangle tone and read the analyser's frequency bins.
fn sample_audio(ctx: &AudioContext) -> Result<Vec<Number>, JsValue> {
    let oscillator = ctx.create_oscillator()?;
    let analyser = ctx.create_analyser()?;
    let gain = ctx.create_gain()?;
    let processor = ctx
        .create_script_processor_with_buffer_size_and_number_of_input_channels_and_number_of_output_channels(
            4096, 1, 1,
        )?;

    gain.gain().set_value(0.0);
    oscillator.set_type(OscillatorType::Triangle);
    oscillator.connect_with_audio_node(&analyser)?;
    analyser.connect_with_audio_node(&processor)?;
    processor.connect_with_audio_node(&gain)?;
    gain.connect_with_audio_node(&ctx.destination())?;
    oscillator.start_with_when(0.0)?;

    let mut bins = vec![0f32; analyser.frequency_bin_count() as usize];
    analyser.get_float_frequency_data(&mut bins);
    oscillator.stop()?;

    Ok(bins
        .into_iter()
        .take(AUDIO_SAMPLE_COUNT)
        .map(Number::from)
        .collect())
}

#[async_trait(?Send)]
impl Environment for BrowserEnvironment {
    async fn user_agent(&self) -> ProbeResult<String> {
        window()?.navigator().user_agent().map_err(js_err)
    }

    async fn language(&self) -> ProbeResult<String> {
        window()?
            .navigator()
            .language()
            .ok_or(ProbeError::Unsupported("navigator.language"))
    }

    async fn color_depth(&self) -> ProbeResult<u32> {
        let depth = window()?
            .screen()
            .map_err(js_err)?
            .color_depth()
            .map_err(js_err)?;
        u32::try_from(depth).map_err(|_| ProbeError::Failed(format!("bad color depth {depth}")))
    }

    async fn timezone(&self) -> ProbeResult<String> {
        let format = js_sys::Intl::DateTimeFormat::new(&Array::new(), &Object::new());
        Reflect::get(&format.resolved_options(), &JsValue::from_str("timeZone"))
            .map_err(js_err)?
            .as_string()
            .ok_or(ProbeError::Unsupported("Intl timeZone"))
    }

    async fn canvas(&self) -> ProbeResult<String> {
        let canvas = new_canvas(&document()?)?;
        canvas.set_width(200);
        canvas.set_height(50);

        let ctx = canvas
            .get_context("2d")
            .map_err(js_err)?
            .ok_or(ProbeError::Unsupported("2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| ProbeError::Failed("unexpected 2d context type".to_string()))?;

        draw_reference_image(&ctx).map_err(js_err)?;
        canvas.to_data_url().map_err(js_err)
    }

    async fn webgl(&self) -> ProbeResult<WebGlInfo> {
        let canvas = new_canvas(&document()?)?;
        let context = match canvas.get_context("webgl").map_err(js_err)? {
            Some(context) => context,
            None => canvas
                .get_context("experimental-webgl")
                .map_err(js_err)?
                .ok_or(ProbeError::Unsupported("webgl context"))?,
        };
        let gl = context
            .dyn_into::<WebGlRenderingContext>()
            .map_err(|_| ProbeError::Failed("unexpected webgl context type".to_string()))?;

        let vendor = gl
            .get_parameter(WebGlRenderingContext::VENDOR)
            .map_err(js_err)?
            .as_string();
        let renderer = gl
            .get_parameter(WebGlRenderingContext::RENDERER)
            .map_err(js_err)?
            .as_string();
        let extensions = gl
            .get_supported_extensions()
            .map(|list| list.iter().filter_map(|ext| ext.as_string()).collect());

        Ok(WebGlInfo {
            vendor,
            renderer,
            extensions,
        })
    }

    async fn fonts(&self) -> ProbeResult<Vec<String>> {
        let fonts = document()?.fonts();
        let mut available = Vec::new();
        for font in FONT_CANDIDATES {
            if fonts.check(&format!("12px \"{font}\"")).map_err(js_err)? {
                available.push(font.to_string());
            }
        }
        Ok(available)
    }

    async fn audio(&self) -> ProbeResult<Vec<Number>> {
        let ctx = AudioContext::new().map_err(js_err)?;
        let samples = sample_audio(&ctx);
        let _ = ctx.close();
        samples.map_err(js_err)
    }

    async fn plugins(&self) -> ProbeResult<Vec<PluginInfo>> {
        let plugins = window()?.navigator().plugins().map_err(js_err)?;
        Ok((0..plugins.length())
            .filter_map(|i| plugins.item(i))
            .map(|plugin| PluginInfo {
                name: plugin.name(),
                description: plugin.description(),
                filename: plugin.filename(),
            })
            .collect())
    }

    async fn hardware(&self) -> ProbeResult<HardwareInfo> {
        let window = window()?;
        let concurrency = window.navigator().hardware_concurrency();
        let cores = (concurrency >= 1.0).then(|| concurrency as u32);
        let memory = navigator_number(&window, "deviceMemory").map(Number);

        Ok(HardwareInfo { cores, memory })
    }

    async fn touch_support(&self) -> ProbeResult<TouchSupport> {
        let window = window()?;
        let touch_event = Reflect::has(&window, &JsValue::from_str("ontouchstart")).unwrap_or(false);
        let touch_points = navigator_number(&window, "msMaxTouchPoints")
            .map(|n| n.max(0.0) as u32)
            .unwrap_or(0);

        Ok(TouchSupport {
            max_touch_points: window.navigator().max_touch_points().max(0) as u32,
            touch_event,
            touch_points,
        })
    }
}

/// Collect signals from the current page and return its fingerprint.
#[wasm_bindgen(js_name = generateFingerprint)]
pub async fn generate_fingerprint() -> Result<String, JsValue> {
    Fingerprinter::new(BrowserEnvironment::new())
        .generate_fingerprint()
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Collect signals from the current page and return the record as a JS object.
#[wasm_bindgen(js_name = collectSignals)]
pub async fn collect_signals() -> Result<JsValue, JsValue> {
    let record = Fingerprinter::new(BrowserEnvironment::new()).collect().await;
    let json = serde_json::to_string(&record).map_err(|e| JsValue::from_str(&e.to_string()))?;
    js_sys::JSON::parse(&json)
}
