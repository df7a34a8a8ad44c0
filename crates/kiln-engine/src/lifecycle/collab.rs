use anyhow::Result;

use crate::config::{RenderConfig, UiConfig, WindowOptions};

use super::frame::{RawInput, SurfaceSize};
use super::handle::{RenderBackendHandle, UiContextHandle, WindowHandle};

/// Windowing-system collaborator (native window + event queue).
pub trait WindowSystem {
    fn open(&mut self, options: &WindowOptions) -> Result<WindowHandle>;

    /// Drains pending platform events without blocking.
    fn pump_events(&mut self, window: WindowHandle, input: &mut RawInput);

    fn is_minimized(&self, window: WindowHandle) -> bool;

    fn surface_size(&self, window: WindowHandle) -> SurfaceSize;

    /// Ratio of physical to logical pixels for the window's monitor.
    fn scale_factor(&self, window: WindowHandle) -> f64 {
        let _ = window;
        1.0
    }

    fn close(&mut self, window: WindowHandle) -> Result<()>;
}

/// Immediate-mode UI library collaborator.
pub trait UiLibrary {
    fn create(&mut self, config: &UiConfig, scale_factor: f32) -> Result<UiContextHandle>;

    /// Applies a new DPI scale to a live context (monitor change).
    fn rescale(&mut self, ctx: UiContextHandle, scale_factor: f32) {
        let _ = (ctx, scale_factor);
    }

    fn destroy(&mut self, ctx: UiContextHandle) -> Result<()>;
}

/// Graphics-API collaborator bridging a UI context to a window surface.
///
/// Generic over the window system so an integration can resolve the opaque
/// [`WindowHandle`] through that system's explicit conversion.
pub trait RenderLibrary<W: WindowSystem> {
    fn attach(
        &mut self,
        windows: &W,
        window: WindowHandle,
        ui: UiContextHandle,
        config: &RenderConfig,
    ) -> Result<RenderBackendHandle>;

    /// Reconfigures the backend for a new surface size.
    fn resize(&mut self, backend: RenderBackendHandle, size: SurfaceSize) {
        let _ = (backend, size);
    }

    fn detach(&mut self, backend: RenderBackendHandle) -> Result<()>;
}
