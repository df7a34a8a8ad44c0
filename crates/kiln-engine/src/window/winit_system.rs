use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::error::OsError;
use winit::event::{StartCause, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::config::WindowOptions;
use crate::lifecycle::{
    HandleAllocator, PlatformEvent, RawInput, SurfaceSize, WindowHandle, WindowSystem,
};

struct WindowEntry {
    window: Arc<Window>,
    /// Events delivered for this window and not yet handed to a tick.
    pending: Vec<PlatformEvent>,
}

/// `WindowSystem` backed by winit's pump-events extension.
///
/// Each `pump_events` call runs one zero-timeout iteration of the platform
/// loop, so the lifecycle owns the loop instead of handing control to
/// `EventLoop::run_app`. Must be created on the main thread.
pub struct WinitWindowSystem {
    event_loop: EventLoop<()>,
    ids: HandleAllocator,
    windows: HashMap<WindowHandle, WindowEntry>,
}

impl WinitWindowSystem {
    pub fn new() -> Result<Self> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        Ok(Self {
            event_loop,
            ids: HandleAllocator::new(),
            windows: HashMap::new(),
        })
    }

    /// Resolves an opaque [`WindowHandle`] to the winit window it was issued
    /// for.
    ///
    /// This is the only conversion from kiln handles to winit types; graphics
    /// integrations use it to create their surfaces. Returns `None` for handles
    /// this system did not issue or has already closed.
    pub fn window(&self, handle: WindowHandle) -> Option<Arc<Window>> {
        self.windows.get(&handle).map(|e| e.window.clone())
    }

    fn entry(&self, handle: WindowHandle) -> &WindowEntry {
        match self.windows.get(&handle) {
            Some(e) => e,
            None => panic!("{handle} is not an open window"),
        }
    }

    /// Runs one pump iteration. When `create` is set, returns the new window
    /// along with events it received before it was registered.
    fn pump(&mut self, create: Option<WindowAttributes>) -> Result<Option<(Arc<Window>, Vec<PlatformEvent>)>> {
        let mut pump = Pump {
            windows: &mut self.windows,
            create,
            created: None,
            early: Vec::new(),
        };

        if let PumpStatus::Exit(code) = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut pump)
        {
            bail!("platform event loop exited with status {code}");
        }

        match pump.created {
            Some(Ok(window)) => Ok(Some((window, pump.early))),
            Some(Err(e)) => Err(anyhow!("failed to create window: {e}")),
            None => Ok(None),
        }
    }
}

impl WindowSystem for WinitWindowSystem {
    fn open(&mut self, options: &WindowOptions) -> Result<WindowHandle> {
        let attrs = Window::default_attributes()
            .with_title(options.title.clone())
            .with_inner_size(LogicalSize::new(options.width as f64, options.height as f64))
            .with_resizable(options.resizable);

        let (window, early) = self
            .pump(Some(attrs))?
            .context("platform loop did not reach a point where windows can be created")?;

        let handle = WindowHandle::from_raw(self.ids.allocate());
        let size = window.inner_size();
        log::info!(
            "opened window {handle} '{}' ({}x{} physical, scale {:.2})",
            options.title,
            size.width,
            size.height,
            window.scale_factor()
        );

        self.windows.insert(
            handle,
            WindowEntry {
                window,
                pending: early,
            },
        );
        Ok(handle)
    }

    fn pump_events(&mut self, window: WindowHandle, input: &mut RawInput) {
        if let Err(e) = self.pump(None) {
            // The loop is gone; surface it to the frame loop as a close request.
            log::error!("{e:#}");
            input.push(PlatformEvent::CloseRequested);
        }

        if let Some(entry) = self.windows.get_mut(&window) {
            for ev in entry.pending.drain(..) {
                input.push(ev);
            }
        }
    }

    fn is_minimized(&self, window: WindowHandle) -> bool {
        let entry = self.entry(window);
        let size = entry.window.inner_size();
        // Not every platform reports minimization; a zero-area surface does.
        entry.window.is_minimized().unwrap_or(false) || size.width == 0 || size.height == 0
    }

    fn surface_size(&self, window: WindowHandle) -> SurfaceSize {
        let size = self.entry(window).window.inner_size();
        SurfaceSize::new(size.width, size.height)
    }

    fn scale_factor(&self, window: WindowHandle) -> f64 {
        self.entry(window).window.scale_factor()
    }

    fn close(&mut self, window: WindowHandle) -> Result<()> {
        let entry = self
            .windows
            .remove(&window)
            .with_context(|| format!("{window} is not an open window"))?;

        let holders = Arc::strong_count(&entry.window);
        if holders > 1 {
            log::warn!("{window} closed while {} other references are alive", holders - 1);
        }
        log::info!("closed window {window}");
        Ok(())
    }
}

/// Handler for a single pump iteration.
struct Pump<'a> {
    windows: &'a mut HashMap<WindowHandle, WindowEntry>,
    create: Option<WindowAttributes>,
    created: Option<Result<Arc<Window>, OsError>>,
    /// Events for the window created in this pump, which has no entry yet.
    early: Vec<PlatformEvent>,
}

impl Pump<'_> {
    fn create_pending(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(attrs) = self.create.take() {
            self.created = Some(event_loop.create_window(attrs).map(Arc::new));
        }
    }
}

impl ApplicationHandler for Pump<'_> {
    fn new_events(&mut self, event_loop: &ActiveEventLoop, _cause: StartCause) {
        self.create_pending(event_loop);
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.create_pending(event_loop);
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(ev) = map_window_event(event) else {
            return;
        };

        if let Some(entry) = self.windows.values_mut().find(|e| e.window.id() == window_id) {
            entry.pending.push(ev);
        } else if matches!(&self.created, Some(Ok(w)) if w.id() == window_id) {
            self.early.push(ev);
        }
    }
}

fn map_window_event(event: WindowEvent) -> Option<PlatformEvent> {
    match event {
        WindowEvent::CloseRequested => Some(PlatformEvent::CloseRequested),
        WindowEvent::Resized(size) => Some(PlatformEvent::Resized(SurfaceSize::new(size.width, size.height))),
        WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
            Some(PlatformEvent::ScaleFactorChanged(scale_factor))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use winit::dpi::PhysicalSize;

    use super::*;

    #[test]
    fn lifecycle_relevant_events_are_mapped() {
        assert_eq!(
            map_window_event(WindowEvent::CloseRequested),
            Some(PlatformEvent::CloseRequested)
        );
        assert_eq!(
            map_window_event(WindowEvent::Resized(PhysicalSize::new(640, 480))),
            Some(PlatformEvent::Resized(SurfaceSize::new(640, 480)))
        );
        assert_eq!(map_window_event(WindowEvent::Focused(true)), None);
        assert_eq!(map_window_event(WindowEvent::Destroyed), None);
    }
}
