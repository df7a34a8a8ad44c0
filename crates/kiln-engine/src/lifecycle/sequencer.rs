use anyhow::Result;

use crate::config::{GraphicsApi, LifecycleConfig};

use super::collab::{RenderLibrary, UiLibrary, WindowSystem};
use super::error::{InitError, ShutdownError, ShutdownReport};
use super::frame::{FrameContext, PlatformEvent, RawInput};
use super::guard::LifecycleGuard;
use super::handle::{RawHandle, RenderBackendHandle, UiContextHandle, WindowHandle};
use super::sequence::LifecycleSequence;
use super::slot::{ResourceKind, SlotState};

const FULL_STACK: [ResourceKind; 3] = [
    ResourceKind::Window,
    ResourceKind::UiContext,
    ResourceKind::RenderBackend,
];

/// Acquisition order for a given graphics API.
pub fn stages_for(api: GraphicsApi) -> &'static [ResourceKind] {
    match api {
        GraphicsApi::None => &FULL_STACK[..2],
        GraphicsApi::OpenGL | GraphicsApi::Vulkan => &FULL_STACK,
    }
}

/// Drives ordered acquisition, per-frame ticks and reverse teardown across
/// the three collaborators it owns.
///
/// The sequencer is the only mutator of a [`LifecycleSequence`]'s slots.
pub struct Sequencer<W, U, R> {
    windows: W,
    ui: U,
    render: R,
}

impl<W, U, R> Sequencer<W, U, R>
where
    W: WindowSystem,
    U: UiLibrary,
    R: RenderLibrary<W>,
{
    pub fn new(windows: W, ui: U, render: R) -> Self {
        Self { windows, ui, render }
    }

    pub fn windows(&self) -> &W {
        &self.windows
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn render(&self) -> &R {
        &self.render
    }

    /// Split borrow of all three collaborators.
    pub fn parts_mut(&mut self) -> (&mut W, &mut U, &mut R) {
        (&mut self.windows, &mut self.ui, &mut self.render)
    }

    pub fn into_parts(self) -> (W, U, R) {
        (self.windows, self.ui, self.render)
    }

    /// Acquires Window, UiContext and (unless `graphics_api` is `None`)
    /// RenderBackend, in that order.
    ///
    /// On the first failure the failing slot becomes `Failed`, every slot
    /// acquired before it is torn down in reverse order, and later slots are
    /// never attempted.
    pub fn initialize(&mut self, config: &LifecycleConfig) -> Result<LifecycleSequence, InitError> {
        let mut seq = LifecycleSequence::new(stages_for(config.graphics_api));

        for index in 0..seq.slots().len() {
            let kind = seq.slots()[index].kind();
            log::info!("acquiring {kind}");

            match self.acquire(kind, &seq, config) {
                Ok(raw) => seq.slots_mut()[index].mark_initialized(raw),
                Err(cause) => {
                    seq.slots_mut()[index].mark_failed();
                    log::error!("failed to acquire {kind}: {cause:#}");

                    let rollback = self.teardown(&mut seq);
                    rollback.log();

                    let mut err = InitError::new(kind, cause);
                    err.rollback_errors = rollback.errors;
                    err.slot_states = seq.states();
                    return Err(err);
                }
            }
        }

        let window = live_window(&seq);
        seq.surface_size = self.windows.surface_size(window);
        log::info!(
            "lifecycle ready ({} slots, surface {}x{})",
            seq.slots().len(),
            seq.surface_size.width,
            seq.surface_size.height
        );

        Ok(seq)
    }

    /// [`initialize`](Self::initialize) wrapped in a guard that shuts the
    /// sequence down when dropped.
    pub fn scoped(&mut self, config: &LifecycleConfig) -> Result<LifecycleGuard<'_, W, U, R>, InitError> {
        let sequence = self.initialize(config)?;
        Ok(LifecycleGuard::new(self, sequence))
    }

    /// Pumps platform events and produces the snapshot for this iteration.
    ///
    /// # Panics
    /// If `seq` is not fully initialized (before `initialize` succeeded or
    /// after `shutdown`).
    pub fn tick(&mut self, seq: &mut LifecycleSequence, input: &mut RawInput) -> FrameContext {
        assert!(
            seq.is_ready(),
            "tick on a lifecycle that is not fully initialized: {:?}",
            seq.states()
        );
        let window = live_window(seq);

        self.windows.pump_events(window, input);

        for ev in input.drain() {
            match ev {
                PlatformEvent::CloseRequested => {
                    log::info!("close requested");
                    seq.close_requested = true;
                }
                PlatformEvent::Resized(size) => {
                    log::debug!("surface resized to {}x{}", size.width, size.height);
                    seq.surface_size = size;
                }
                PlatformEvent::ScaleFactorChanged(scale) => {
                    log::debug!("scale factor changed to {scale}");
                    if let Some(ui) = seq.ui_context() {
                        self.ui.rescale(ui, scale as f32);
                    }
                }
            }
        }

        let minimized = self.windows.is_minimized(window) || seq.surface_size.is_empty();
        if minimized != seq.minimized {
            log::debug!("window {}", if minimized { "minimized" } else { "restored" });
            seq.minimized = minimized;
        }

        let time = seq.clock.tick();

        FrameContext {
            delta_time: time.dt,
            surface_size: seq.surface_size,
            minimized,
            frame_index: time.frame_index,
            close_requested: seq.close_requested,
        }
    }

    /// Tears down every initialized slot in reverse acquisition order.
    ///
    /// Teardown failures are collected and logged; they never stop the
    /// remaining steps. Calling this on an already released sequence is a
    /// no-op.
    pub fn shutdown(&mut self, seq: &mut LifecycleSequence) -> ShutdownReport {
        if seq.is_released() {
            log::debug!("shutdown: nothing left to release");
            return ShutdownReport::default();
        }

        let report = self.teardown(seq);
        report.log();
        log::info!(
            "lifecycle shut down ({} released, {} errors)",
            report.released.len(),
            report.errors.len()
        );
        report
    }

    fn acquire(
        &mut self,
        kind: ResourceKind,
        seq: &LifecycleSequence,
        config: &LifecycleConfig,
    ) -> Result<RawHandle> {
        match kind {
            ResourceKind::Window => {
                config.validate()?;
                let window = self.windows.open(&config.window_options())?;
                Ok(window.raw())
            }
            ResourceKind::UiContext => {
                let window = live_window(seq);
                let scale = self.windows.scale_factor(window) as f32;
                let ctx = self.ui.create(&config.ui, scale)?;
                Ok(ctx.raw())
            }
            ResourceKind::RenderBackend => {
                let window = live_window(seq);
                let Some(ui) = seq.ui_context() else {
                    unreachable!("render backend acquired before the ui context")
                };
                let backend = self.render.attach(
                    &self.windows,
                    window,
                    ui,
                    &config.render_config(),
                )?;
                Ok(backend.raw())
            }
        }
    }

    fn teardown(&mut self, seq: &mut LifecycleSequence) -> ShutdownReport {
        let mut report = ShutdownReport::default();

        for slot in seq.slots_mut().iter_mut().rev() {
            if slot.state() != SlotState::Initialized {
                continue;
            }

            let kind = slot.kind();
            let raw = slot.take_for_teardown();
            log::info!("releasing {kind}");

            let result = match kind {
                ResourceKind::Window => self.windows.close(WindowHandle::from_raw(raw)),
                ResourceKind::UiContext => self.ui.destroy(UiContextHandle::from_raw(raw)),
                ResourceKind::RenderBackend => {
                    self.render.detach(RenderBackendHandle::from_raw(raw))
                }
            };

            report.released.push(kind);
            if let Err(cause) = result {
                report.errors.push(ShutdownError { stage: kind, cause });
            }
        }

        report
    }
}

fn live_window(seq: &LifecycleSequence) -> WindowHandle {
    match seq.window() {
        Some(w) => w,
        None => unreachable!("window slot is not initialized"),
    }
}
