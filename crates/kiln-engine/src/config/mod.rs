//! Bootstrap configuration.
//!
//! `LifecycleConfig` is the single input to `Sequencer::initialize`. It can be
//! built in code, loaded from a TOML file, or both (file first, then overrides).

mod file;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, ensure};
use serde::Deserialize;

/// Graphics API the render backend is attached with.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphicsApi {
    /// No render backend; only the window and UI context are acquired.
    None,
    #[serde(rename = "opengl", alias = "gl")]
    OpenGL,
    #[default]
    Vulkan,
}

impl GraphicsApi {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Some(GraphicsApi::None),
            "opengl" | "gl" => Some(GraphicsApi::OpenGL),
            "vulkan" | "vk" => Some(GraphicsApi::Vulkan),
            _ => None,
        }
    }
}

/// Upper bound for `minimized_sleep_ms`; the minimized loop must keep pumping events.
pub const MAX_MINIMIZED_SLEEP_MS: u64 = 1000;

/// Top-level bootstrap configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LifecycleConfig {
    pub title: String,
    /// Initial width in logical pixels.
    pub width: u32,
    /// Initial height in logical pixels.
    pub height: u32,
    pub resizable: bool,
    pub vsync: bool,
    pub graphics_api: GraphicsApi,
    /// Idle time per loop iteration while the window is minimized.
    pub minimized_sleep_ms: u64,
    pub ui: UiConfig,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            title: "kiln".to_string(),
            width: 1280,
            height: 800,
            resizable: true,
            vsync: true,
            graphics_api: GraphicsApi::default(),
            minimized_sleep_ms: 10,
            ui: UiConfig::default(),
        }
    }
}

impl LifecycleConfig {
    pub fn title(mut self, t: impl Into<String>) -> Self {
        self.title = t.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    pub fn vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    pub fn graphics_api(mut self, api: GraphicsApi) -> Self {
        self.graphics_api = api;
        self
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(!self.title.trim().is_empty(), "window title must not be empty");
        ensure!(
            self.width > 0 && self.height > 0,
            "window size must be positive, got {}x{}",
            self.width,
            self.height
        );
        ensure!(
            (1..=MAX_MINIMIZED_SLEEP_MS).contains(&self.minimized_sleep_ms),
            "minimized_sleep_ms must be within 1..={MAX_MINIMIZED_SLEEP_MS}, got {}",
            self.minimized_sleep_ms
        );
        ensure!(
            self.ui.font_size > 0.0,
            "font size must be positive, got {}",
            self.ui.font_size
        );
        Ok(())
    }

    pub fn minimized_sleep(&self) -> Duration {
        Duration::from_millis(self.minimized_sleep_ms)
    }

    pub fn window_options(&self) -> WindowOptions {
        WindowOptions {
            title: self.title.clone(),
            width: self.width,
            height: self.height,
            resizable: self.resizable,
        }
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            api: self.graphics_api,
            vsync: self.vsync,
            ..RenderConfig::default()
        }
    }
}

/// Parameters for opening the native window.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct WindowOptions {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
}

/// Parameters for the immediate-mode UI context.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UiConfig {
    pub dark_style: bool,
    pub nav_keyboard: bool,
    pub nav_gamepad: bool,
    /// Base font size in logical pixels; scaled by the window's DPI factor.
    pub font_size: f32,
    /// TTF file the entry point loads into `font_data`.
    pub font_path: Option<PathBuf>,
    #[serde(skip)]
    pub font_data: Option<Vec<u8>>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            dark_style: true,
            nav_keyboard: true,
            nav_gamepad: true,
            font_size: 13.0,
            font_path: None,
            font_data: None,
        }
    }
}

/// Parameters for attaching the render backend.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub api: GraphicsApi,
    pub vsync: bool,
    /// Prefer an sRGB surface format when available.
    pub prefer_srgb: bool,
    /// Hint only; support depends on platform/backend.
    pub desired_maximum_frame_latency: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            api: GraphicsApi::default(),
            vsync: true,
            prefer_srgb: true,
            desired_maximum_frame_latency: 2,
        }
    }
}
