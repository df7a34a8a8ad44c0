use std::collections::HashMap;

use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;

use crate::config::RenderConfig;
use crate::lifecycle::{
    HandleAllocator, RenderBackendHandle, RenderLibrary, SurfaceSize, UiContextHandle,
    WindowHandle,
};
use crate::window::WinitWindowSystem;

use super::gpu::Gpu;
use super::surface::SurfaceErrorAction;

struct Backend {
    gpu: Gpu,
    window: WindowHandle,
    ui: UiContextHandle,
}

/// `RenderLibrary` that attaches a wgpu device + surface to winit windows.
#[derive(Default)]
pub struct WgpuRenderLibrary {
    ids: HandleAllocator,
    backends: HashMap<RenderBackendHandle, Backend>,
}

impl WgpuRenderLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gpu(&self, backend: RenderBackendHandle) -> Option<&Gpu> {
        self.backends.get(&backend).map(|b| &b.gpu)
    }

    pub fn gpu_mut(&mut self, backend: RenderBackendHandle) -> Option<&mut Gpu> {
        self.backends.get_mut(&backend).map(|b| &mut b.gpu)
    }

    /// Clears the backend's surface and presents it.
    ///
    /// Surface errors are recovered where possible; the returned action says
    /// whether the frame was skipped or the surface is unusable.
    pub fn clear_and_present(
        &mut self,
        backend: RenderBackendHandle,
        color: wgpu::Color,
    ) -> Result<Option<SurfaceErrorAction>> {
        let gpu = self
            .gpu_mut(backend)
            .with_context(|| format!("{backend} is not attached"))?;

        match gpu.clear_and_present(color) {
            Ok(()) => Ok(None),
            Err(action) => {
                log::debug!("surface error on {backend}: {action:?}");
                Ok(Some(action))
            }
        }
    }
}

impl RenderLibrary<WinitWindowSystem> for WgpuRenderLibrary {
    fn attach(
        &mut self,
        windows: &WinitWindowSystem,
        window: WindowHandle,
        ui: UiContextHandle,
        config: &RenderConfig,
    ) -> Result<RenderBackendHandle> {
        let target = windows
            .window(window)
            .with_context(|| format!("{window} is not an open window"))?;

        let gpu = pollster::block_on(Gpu::new(target, config))
            .with_context(|| format!("failed to attach {:?} backend", config.api))?;

        let handle = RenderBackendHandle::from_raw(self.ids.allocate());
        log::info!("attached render backend {handle} to {window} / {ui}");

        self.backends.insert(handle, Backend { gpu, window, ui });
        Ok(handle)
    }

    fn resize(&mut self, backend: RenderBackendHandle, size: SurfaceSize) {
        if let Some(gpu) = self.gpu_mut(backend) {
            gpu.resize(PhysicalSize::new(size.width, size.height));
        }
    }

    fn detach(&mut self, backend: RenderBackendHandle) -> Result<()> {
        let entry = self
            .backends
            .remove(&backend)
            .with_context(|| format!("{backend} is not attached"))?;

        log::info!(
            "detached render backend {backend} from {} / {}",
            entry.window,
            entry.ui
        );
        drop(entry.gpu);
        Ok(())
    }
}
