//! Native host environment.
//!
//! Reads what a native process can learn about its machine: locale,
//! terminal color depth, timezone, installed font files and hardware size.
//! Browser-only capabilities (canvas, WebGL, audio graph) are reported as
//! unsupported.

use crate::collector::{Environment, ProbeError, ProbeResult, FONT_CANDIDATES};
use crate::signals::{HardwareInfo, Number, PluginInfo, TouchSupport, WebGlInfo};
use async_trait::async_trait;
use chrono_tz::Tz;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// How deep font directories are scanned.
const FONT_SCAN_DEPTH: usize = 4;

/// Largest memory bucket reported, in GiB.
const MAX_MEMORY_BUCKET: f64 = 8.0;

/// Smallest memory bucket reported, in GiB.
const MIN_MEMORY_BUCKET: f64 = 0.25;

/// Style suffixes a font file name may carry after the family name.
const FONT_STYLE_SUFFIXES: [&str; 14] = [
    "",
    "regular",
    "bold",
    "italic",
    "bolditalic",
    "oblique",
    "boldoblique",
    "mt",
    "mtbold",
    "psmt",
    "bd",
    "bi",
    "i",
    "z",
];

/// Environment backed by the local machine.
#[derive(Debug, Clone)]
pub struct HostEnvironment {
    font_dirs: Vec<PathBuf>,
}

impl HostEnvironment {
    /// Create a host environment using the platform's font directories.
    pub fn new() -> Self {
        Self {
            font_dirs: default_font_dirs(),
        }
    }

    /// Create a host environment that looks for fonts in the given directories.
    pub fn with_font_dirs(font_dirs: Vec<PathBuf>) -> Self {
        Self { font_dirs }
    }
}

impl Default for HostEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Environment for HostEnvironment {
    async fn user_agent(&self) -> ProbeResult<String> {
        Ok(format!(
            "device-fingerprint/{} ({}; {})",
            env!("CARGO_PKG_VERSION"),
            std::env::consts::OS,
            std::env::consts::ARCH
        ))
    }

    async fn language(&self) -> ProbeResult<String> {
        ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find_map(|value| normalize_locale(&value))
            .ok_or(ProbeError::Unsupported("locale environment"))
    }

    async fn color_depth(&self) -> ProbeResult<u32> {
        let colorterm = std::env::var("COLORTERM").ok();
        let term = std::env::var("TERM").ok();
        color_depth_from_term(colorterm.as_deref(), term.as_deref())
            .ok_or(ProbeError::Unsupported("terminal color depth"))
    }

    async fn timezone(&self) -> ProbeResult<String> {
        if let Ok(tz) = std::env::var("TZ") {
            if let Some(name) = timezone_name(tz.trim_start_matches(':')) {
                return Ok(name);
            }
        }

        if let Ok(target) = std::fs::read_link("/etc/localtime") {
            if let Some(name) = timezone_from_zoneinfo_path(&target) {
                return Ok(name);
            }
        }

        if let Ok(content) = std::fs::read_to_string("/etc/timezone") {
            if let Some(name) = timezone_name(content.trim()) {
                return Ok(name);
            }
        }

        Err(ProbeError::Unsupported("system timezone"))
    }

    async fn canvas(&self) -> ProbeResult<String> {
        Err(ProbeError::Unsupported("2D raster surface"))
    }

    async fn webgl(&self) -> ProbeResult<WebGlInfo> {
        Err(ProbeError::Unsupported("WebGL context"))
    }

    async fn fonts(&self) -> ProbeResult<Vec<String>> {
        let existing: Vec<&PathBuf> = self.font_dirs.iter().filter(|d| d.is_dir()).collect();
        if existing.is_empty() {
            return Err(ProbeError::Unsupported("font directories"));
        }

        let mut stems = HashSet::new();
        for dir in existing {
            collect_font_stems(dir, FONT_SCAN_DEPTH, &mut stems);
        }

        Ok(match_font_candidates(&stems))
    }

    async fn audio(&self) -> ProbeResult<Vec<Number>> {
        Err(ProbeError::Unsupported("audio processing graph"))
    }

    async fn plugins(&self) -> ProbeResult<Vec<PluginInfo>> {
        // A native process has no browser plugins to enumerate.
        Ok(Vec::new())
    }

    async fn hardware(&self) -> ProbeResult<HardwareInfo> {
        let cores = std::thread::available_parallelism()
            .ok()
            .and_then(|n| u32::try_from(n.get()).ok());
        let memory = total_memory_gib().map(|gib| Number(memory_bucket(gib)));

        Ok(HardwareInfo { cores, memory })
    }

    async fn touch_support(&self) -> ProbeResult<TouchSupport> {
        Ok(TouchSupport::default())
    }
}

/// Convert a POSIX locale (`en_US.UTF-8@euro`) to a language tag (`en-US`).
///
/// Returns `None` for the `C`/`POSIX` locales and empty values.
pub fn normalize_locale(value: &str) -> Option<String> {
    let base = value
        .split(['.', '@'])
        .next()
        .unwrap_or_default()
        .trim();

    if base.is_empty() || base == "C" || base == "POSIX" {
        return None;
    }

    Some(base.replace('_', "-"))
}

/// Infer the color depth in bits from terminal variables.
pub fn color_depth_from_term(colorterm: Option<&str>, term: Option<&str>) -> Option<u32> {
    if let Some(ct) = colorterm {
        let ct = ct.to_lowercase();
        if ct == "truecolor" || ct == "24bit" {
            return Some(24);
        }
    }

    let term = term?.to_lowercase();
    if term.contains("256color") {
        Some(8)
    } else if term.contains("color") {
        Some(4)
    } else {
        None
    }
}

/// Canonical IANA name for a timezone, if it is known.
fn timezone_name(name: &str) -> Option<String> {
    name.parse::<Tz>().ok().map(|tz| tz.name().to_string())
}

/// Extract the zone name from a path like `/usr/share/zoneinfo/Europe/Paris`.
fn timezone_from_zoneinfo_path(path: &Path) -> Option<String> {
    let text = path.to_string_lossy();
    let (_, zone) = text.split_once("zoneinfo/")?;
    timezone_name(zone)
}

/// Round a memory size down to the bucket a browser would report.
///
/// Buckets are powers of two from 0.25 to 8 GiB.
pub fn memory_bucket(gib: f64) -> f64 {
    if gib >= MAX_MEMORY_BUCKET {
        return MAX_MEMORY_BUCKET;
    }
    if gib <= MIN_MEMORY_BUCKET {
        return MIN_MEMORY_BUCKET;
    }
    2f64.powi(gib.log2().floor() as i32)
}

/// Total physical memory in GiB.
#[cfg(target_os = "linux")]
fn total_memory_gib() -> Option<f64> {
    let meminfo = std::fs::read_to_string("/proc/meminfo").ok()?;
    parse_meminfo_total(&meminfo)
}

#[cfg(not(target_os = "linux"))]
fn total_memory_gib() -> Option<f64> {
    None
}

/// Parse `MemTotal` (kB) from `/proc/meminfo` content, in GiB.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_meminfo_total(meminfo: &str) -> Option<f64> {
    let line = meminfo.lines().find(|l| l.starts_with("MemTotal:"))?;
    let kib: f64 = line.split_whitespace().nth(1)?.parse().ok()?;
    Some(kib / (1024.0 * 1024.0))
}

fn default_font_dirs() -> Vec<PathBuf> {
    let mut font_dirs = Vec::new();

    if let Some(user) = dirs::font_dir() {
        font_dirs.push(user);
    }
    if let Some(home) = dirs::home_dir() {
        font_dirs.push(home.join(".fonts"));
    }

    #[cfg(target_os = "linux")]
    {
        font_dirs.push(PathBuf::from("/usr/share/fonts"));
        font_dirs.push(PathBuf::from("/usr/local/share/fonts"));
    }

    #[cfg(target_os = "macos")]
    {
        font_dirs.push(PathBuf::from("/System/Library/Fonts"));
        font_dirs.push(PathBuf::from("/Library/Fonts"));
    }

    #[cfg(target_os = "windows")]
    {
        let windir = std::env::var("WINDIR").unwrap_or_else(|_| "C:\\Windows".to_string());
        font_dirs.push(PathBuf::from(windir).join("Fonts"));
    }

    font_dirs
}

/// Lowercased alphanumeric-only form used to compare font names.
fn font_key(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn collect_font_stems(dir: &Path, depth: usize, stems: &mut HashSet<String>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if path.is_dir() {
            if depth > 0 {
                collect_font_stems(&path, depth - 1, stems);
            }
            continue;
        }

        let is_font = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| matches!(e.to_lowercase().as_str(), "ttf" | "otf" | "ttc" | "dfont"))
            .unwrap_or(false);

        if is_font {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                stems.insert(font_key(stem));
            }
        }
    }
}

/// Candidates whose family appears among the font file stems.
fn match_font_candidates(stems: &HashSet<String>) -> Vec<String> {
    FONT_CANDIDATES
        .iter()
        .filter(|candidate| {
            let family = font_key(candidate);
            FONT_STYLE_SUFFIXES
                .iter()
                .any(|suffix| stems.contains(&format!("{family}{suffix}")))
        })
        .map(|candidate| candidate.to_string())
        .collect()
}
