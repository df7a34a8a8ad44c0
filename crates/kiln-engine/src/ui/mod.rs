//! Immediate-mode UI collaborator (Dear ImGui).

mod imgui_library;

pub use imgui_library::{ImguiLibrary, UiFrameStats};
