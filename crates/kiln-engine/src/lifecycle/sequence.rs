use crate::time::FrameClock;

use super::frame::SurfaceSize;
use super::handle::{RawHandle, RenderBackendHandle, UiContextHandle, WindowHandle};
use super::slot::{ResourceKind, ResourceSlot, SlotState};

/// Ordered slot table for one bootstrap run.
///
/// Slots are stored in acquisition order; teardown walks the table backwards.
/// Besides the table the sequence carries the loop bookkeeping `tick` needs
/// (clock, close flag, surface size), none of which touches the slots.
#[derive(Debug)]
pub struct LifecycleSequence {
    slots: Vec<ResourceSlot>,
    pub(crate) clock: FrameClock,
    pub(crate) close_requested: bool,
    pub(crate) surface_size: SurfaceSize,
    pub(crate) minimized: bool,
}

impl LifecycleSequence {
    pub(crate) fn new(kinds: &[ResourceKind]) -> Self {
        Self {
            slots: kinds.iter().copied().map(ResourceSlot::new).collect(),
            clock: FrameClock::new(),
            close_requested: false,
            surface_size: SurfaceSize::default(),
            minimized: false,
        }
    }

    pub fn slots(&self) -> &[ResourceSlot] {
        &self.slots
    }

    pub fn states(&self) -> Vec<(ResourceKind, SlotState)> {
        self.slots.iter().map(|s| (s.kind(), s.state())).collect()
    }

    pub fn state_of(&self, kind: ResourceKind) -> Option<SlotState> {
        self.slot(kind).map(ResourceSlot::state)
    }

    /// Every slot is `Initialized`.
    pub fn is_ready(&self) -> bool {
        self.slots.iter().all(|s| s.state() == SlotState::Initialized)
    }

    /// No slot holds a handle any more.
    pub fn is_released(&self) -> bool {
        self.slots.iter().all(|s| s.state() != SlotState::Initialized)
    }

    pub fn close_requested(&self) -> bool {
        self.close_requested
    }

    /// Raises the close flag; consulted at the top of the next loop iteration.
    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    pub fn surface_size(&self) -> SurfaceSize {
        self.surface_size
    }

    pub fn window(&self) -> Option<WindowHandle> {
        self.live_handle(ResourceKind::Window).map(WindowHandle::from_raw)
    }

    pub fn ui_context(&self) -> Option<UiContextHandle> {
        self.live_handle(ResourceKind::UiContext).map(UiContextHandle::from_raw)
    }

    pub fn render_backend(&self) -> Option<RenderBackendHandle> {
        self.live_handle(ResourceKind::RenderBackend)
            .map(RenderBackendHandle::from_raw)
    }

    pub(crate) fn slot(&self, kind: ResourceKind) -> Option<&ResourceSlot> {
        self.slots.iter().find(|s| s.kind() == kind)
    }

    pub(crate) fn slots_mut(&mut self) -> &mut [ResourceSlot] {
        &mut self.slots
    }

    fn live_handle(&self, kind: ResourceKind) -> Option<RawHandle> {
        self.slot(kind).and_then(ResourceSlot::handle)
    }
}
