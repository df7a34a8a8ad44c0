use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by the entry point.
///
/// Generic over the collaborator types so an app can reach library-specific
/// APIs (e.g. building imgui widgets) through [`FrameCtx`].
pub trait App<W, U, R> {
    /// Called once per loop iteration while the window is visible.
    ///
    /// Never called for minimized iterations.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, W, U, R>) -> AppControl;
}
