//! Kiln engine crate.
//!
//! Ordered bootstrap of a native window, an immediate-mode UI context and a
//! GPU backend, with a frame loop between acquisition and teardown.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`lifecycle`] | slot table, `Sequencer` (initialize / tick / shutdown), collaborator traits |
//! | [`core`] | `App` callback, `FrameCtx`, `Runtime` frame loop |
//! | [`config`] | `LifecycleConfig`, TOML loading |
//! | [`window`], [`ui`], [`device`] | winit / imgui / wgpu collaborators |

pub mod config;
pub mod core;
pub mod device;
pub mod lifecycle;
pub mod logging;
pub mod time;
pub mod ui;
pub mod window;

use anyhow::Result;

use device::WgpuRenderLibrary;
use lifecycle::Sequencer;
use ui::ImguiLibrary;
use window::WinitWindowSystem;

/// Sequencer over the native winit / imgui / wgpu collaborators.
pub type NativeSequencer = Sequencer<WinitWindowSystem, ImguiLibrary, WgpuRenderLibrary>;

/// Builds the native collaborator stack. Must run on the main thread.
pub fn native_sequencer() -> Result<NativeSequencer> {
    Ok(Sequencer::new(
        WinitWindowSystem::new()?,
        ImguiLibrary::new(),
        WgpuRenderLibrary::new(),
    ))
}
