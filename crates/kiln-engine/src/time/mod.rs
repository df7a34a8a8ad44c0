//! Time subsystem.
//!
//! Frame timing independent of the platform loop:
//! - one `FrameClock` per lifecycle sequence
//! - call `tick()` once per loop iteration to obtain `FrameTime`

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
