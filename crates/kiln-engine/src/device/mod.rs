//! GPU device + surface management (wgpu render backend).
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue for the selected API
//! - creating & configuring the Surface (swapchain) of a winit window
//! - clearing and presenting frames; UI draw data is not rasterized

mod gpu;
mod library;
mod surface;

pub use gpu::{Gpu, GpuFrame};
pub use library::WgpuRenderLibrary;
pub use surface::SurfaceErrorAction;
