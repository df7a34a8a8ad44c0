use std::fmt;

use super::handle::RawHandle;

/// Lifecycle-managed resource kinds, in acquisition order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ResourceKind {
    Window,
    UiContext,
    RenderBackend,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Window => "window",
            ResourceKind::UiContext => "ui context",
            ResourceKind::RenderBackend => "render backend",
        };
        f.write_str(name)
    }
}

/// Per-slot lifecycle state.
///
/// `Uninitialized -> {Initialized | Failed}`, `Initialized -> TornDown`.
/// `Failed` and `TornDown` are terminal.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SlotState {
    Uninitialized,
    Initialized,
    Failed,
    TornDown,
}

impl SlotState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SlotState::Failed | SlotState::TornDown)
    }
}

/// One tracked entry of the lifecycle table.
///
/// The handle is present exactly while the slot is `Initialized`.
#[derive(Debug)]
pub struct ResourceSlot {
    kind: ResourceKind,
    state: SlotState,
    handle: Option<RawHandle>,
}

impl ResourceSlot {
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            state: SlotState::Uninitialized,
            handle: None,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn state(&self) -> SlotState {
        self.state
    }

    pub fn handle(&self) -> Option<RawHandle> {
        self.handle
    }

    pub(crate) fn mark_initialized(&mut self, handle: RawHandle) {
        self.transition(SlotState::Uninitialized, SlotState::Initialized);
        self.handle = Some(handle);
    }

    pub(crate) fn mark_failed(&mut self) {
        self.transition(SlotState::Uninitialized, SlotState::Failed);
    }

    /// Moves the slot to `TornDown` and hands back the handle to release.
    pub(crate) fn take_for_teardown(&mut self) -> RawHandle {
        self.transition(SlotState::Initialized, SlotState::TornDown);
        match self.handle.take() {
            Some(h) => h,
            None => unreachable!("initialized {} slot without a handle", self.kind),
        }
    }

    fn transition(&mut self, from: SlotState, to: SlotState) {
        assert_eq!(
            self.state, from,
            "illegal {} slot transition {:?} -> {:?}",
            self.kind, self.state, to
        );
        log::debug!("{} slot: {:?} -> {:?}", self.kind, from, to);
        self.state = to;
    }
}
