use crate::lifecycle::{FrameContext, RenderBackendHandle, UiContextHandle, WindowHandle};

/// Per-frame context passed to `core::App::on_frame`.
///
/// Carries the frame snapshot, the live handles of the sequence, and mutable
/// access to each collaborator. Handles are copied out of the sequence so the
/// app cannot alter the slot table.
pub struct FrameCtx<'a, W, U, R> {
    pub frame: FrameContext,
    pub window: WindowHandle,
    pub ui_context: UiContextHandle,
    /// `None` when running without a graphics API.
    pub render_backend: Option<RenderBackendHandle>,
    pub windows: &'a mut W,
    pub ui: &'a mut U,
    pub render: &'a mut R,
}
