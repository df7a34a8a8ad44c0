//! Native window collaborator.
//!
//! Owns the `winit` EventLoop and the windows opened through it, pumped
//! without blocking once per lifecycle tick.

mod winit_system;

pub use winit_system::WinitWindowSystem;
