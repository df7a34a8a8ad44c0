/// Drawable surface size in physical pixels.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Platform notifications relevant to the lifecycle loop.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PlatformEvent {
    CloseRequested,
    Resized(SurfaceSize),
    ScaleFactorChanged(f64),
}

/// Events gathered by one non-blocking pump of the platform queue.
#[derive(Debug, Default)]
pub struct RawInput {
    events: Vec<PlatformEvent>,
}

impl RawInput {
    pub fn push(&mut self, ev: PlatformEvent) {
        self.events.push(ev);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = PlatformEvent> + '_ {
        self.events.drain(..)
    }
}

/// Per-iteration snapshot handed to the entry point.
///
/// Built at the top of each loop iteration and discarded at the bottom.
#[derive(Debug, Copy, Clone)]
pub struct FrameContext {
    /// Seconds since the previous tick; `0.0` on the first tick only.
    pub delta_time: f32,
    pub surface_size: SurfaceSize,
    /// When set, the caller must skip UI/render work and idle briefly.
    pub minimized: bool,
    pub frame_index: u64,
    /// A close request was observed while pumping events.
    pub close_requested: bool,
}
