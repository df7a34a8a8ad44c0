//! Engine-facing contracts and the frame loop.
//!
//! This module defines the stable interface between the lifecycle runtime and
//! the entry point: the `App` callback, its per-frame context, and `Runtime`,
//! which sequences initialize / tick / shutdown around them.

mod app;
mod ctx;
mod runtime;

pub use app::{App, AppControl};
pub use ctx::FrameCtx;
pub use runtime::{RunSummary, Runtime, ThreadSleep, Throttle};
