use anyhow::{Context, Result, bail, ensure};

use crate::config::UiConfig;
use crate::lifecycle::{FrameContext, HandleAllocator, UiContextHandle, UiLibrary};

/// Delta time fed to imgui when the frame reports none (first frame).
/// imgui rejects a zero delta.
const FALLBACK_DELTA: f32 = 1.0 / 60.0;

/// Geometry produced by one finished UI frame.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct UiFrameStats {
    pub draw_lists: usize,
    pub vertices: usize,
    pub indices: usize,
}

struct ActiveUi {
    handle: UiContextHandle,
    ctx: imgui::Context,
    /// Scale the font atlas was rasterized at.
    atlas_scale: f32,
    /// Scale the style sizes currently reflect.
    scale: f32,
}

/// `UiLibrary` backed by Dear ImGui (imgui-rs).
///
/// imgui allows a single live context per process, so this library holds at
/// most one; creating a second while the first is alive is refused. The
/// context is always reached through its handle, never as an ambient global.
pub struct ImguiLibrary {
    ids: HandleAllocator,
    active: Option<ActiveUi>,
}

impl ImguiLibrary {
    pub fn new() -> Self {
        Self {
            ids: HandleAllocator::new(),
            active: None,
        }
    }

    pub fn is_active(&self, handle: UiContextHandle) -> bool {
        self.active.as_ref().is_some_and(|a| a.handle == handle)
    }

    /// Runs one UI frame: feeds size/timing from `frame`, calls `build` with
    /// the frame's `Ui`, then finalizes the draw data.
    ///
    /// Rasterizing the draw data is left to the graphics side.
    pub fn frame<F>(&mut self, handle: UiContextHandle, frame: &FrameContext, build: F) -> Result<UiFrameStats>
    where
        F: FnOnce(&imgui::Ui),
    {
        let active = self.active_mut(handle)?;
        ensure!(
            !frame.surface_size.is_empty(),
            "ui frame requested for an empty surface"
        );

        let io = active.ctx.io_mut();
        io.display_size = [
            frame.surface_size.width as f32,
            frame.surface_size.height as f32,
        ];
        io.delta_time = if frame.delta_time > 0.0 {
            frame.delta_time
        } else {
            FALLBACK_DELTA
        };

        let ui = active.ctx.new_frame();
        build(ui);

        let draw_data = active.ctx.render();
        Ok(UiFrameStats {
            draw_lists: draw_data.draw_lists_count(),
            vertices: usize::try_from(draw_data.total_vtx_count).unwrap_or(0),
            indices: usize::try_from(draw_data.total_idx_count).unwrap_or(0),
        })
    }

    fn active_mut(&mut self, handle: UiContextHandle) -> Result<&mut ActiveUi> {
        self.active
            .as_mut()
            .filter(|a| a.handle == handle)
            .with_context(|| format!("{handle} is not the active ui context"))
    }
}

impl Default for ImguiLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl UiLibrary for ImguiLibrary {
    fn create(&mut self, config: &UiConfig, scale_factor: f32) -> Result<UiContextHandle> {
        if let Some(active) = &self.active {
            bail!("imgui context {} is still alive; only one may exist", active.handle);
        }
        if let Some(data) = &config.font_data {
            check_font_data(data)?;
        }

        let scale = if scale_factor > 0.0 { scale_factor } else { 1.0 };

        let mut ctx = imgui::Context::create();
        ctx.set_ini_filename(None);

        {
            let io = ctx.io_mut();
            if config.nav_keyboard {
                io.config_flags |= imgui::ConfigFlags::NAV_ENABLE_KEYBOARD;
            }
            if config.nav_gamepad {
                io.config_flags |= imgui::ConfigFlags::NAV_ENABLE_GAMEPAD;
            }
        }

        {
            let style = ctx.style_mut();
            if config.dark_style {
                style.use_dark_colors();
            } else {
                style.use_light_colors();
            }
            style.scale_all_sizes(scale);
        }

        let size_pixels = config.font_size * scale;
        match &config.font_data {
            Some(data) => {
                ctx.fonts().add_font(&[imgui::FontSource::TtfData {
                    data: data.as_slice(),
                    size_pixels,
                    config: None,
                }]);
            }
            None => {
                ctx.fonts().add_font(&[imgui::FontSource::DefaultFontData {
                    config: Some(imgui::FontConfig {
                        size_pixels,
                        ..Default::default()
                    }),
                }]);
            }
        }
        // Atlas must be built before the first new_frame.
        let atlas = ctx.fonts().build_rgba32_texture();
        log::debug!("font atlas {}x{}", atlas.width, atlas.height);

        let handle = UiContextHandle::from_raw(self.ids.allocate());
        log::info!("created imgui context {handle} (scale {scale:.2}, font {size_pixels:.1}px)");

        self.active = Some(ActiveUi {
            handle,
            ctx,
            atlas_scale: scale,
            scale,
        });
        Ok(handle)
    }

    fn rescale(&mut self, handle: UiContextHandle, scale_factor: f32) {
        let Ok(active) = self.active_mut(handle) else {
            log::warn!("rescale ignored: {handle} is not the active ui context");
            return;
        };
        if scale_factor <= 0.0 || scale_factor == active.scale {
            return;
        }

        active.ctx.style_mut().scale_all_sizes(scale_factor / active.scale);
        // The atlas keeps its original raster size; glyphs are stretched.
        active.ctx.io_mut().font_global_scale = scale_factor / active.atlas_scale;
        log::info!("rescaled imgui context {handle} from {:.2} to {scale_factor:.2}", active.scale);
        active.scale = scale_factor;
    }

    fn destroy(&mut self, handle: UiContextHandle) -> Result<()> {
        match self.active.take() {
            Some(active) if active.handle == handle => {
                drop(active.ctx);
                log::info!("destroyed imgui context {handle}");
                Ok(())
            }
            Some(other) => {
                let live = other.handle;
                self.active = Some(other);
                bail!("{handle} is not the active ui context ({live} is)")
            }
            None => bail!("no ui context alive; {handle} was already destroyed"),
        }
    }
}

/// Rejects bytes that are not a TrueType/OpenType font before imgui sees them;
/// imgui aborts the process on malformed font data.
fn check_font_data(data: &[u8]) -> Result<()> {
    const MAGICS: [[u8; 4]; 4] = [*b"\x00\x01\x00\x00", *b"true", *b"OTTO", *b"ttcf"];

    let Some(head) = data.get(..4) else {
        bail!("font data is {} bytes, too short to be a font", data.len());
    };
    ensure!(
        MAGICS.iter().any(|m| m == head),
        "font data is not a TrueType/OpenType font"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::SurfaceSize;

    #[test]
    fn font_magic_is_checked() {
        check_font_data(b"\x00\x01\x00\x00rest").unwrap();
        check_font_data(b"OTTOrest").unwrap();
        check_font_data(b"PK\x03\x04").unwrap_err();
        check_font_data(b"tt").unwrap_err();
    }

    #[test]
    fn bad_font_fails_before_context_creation() {
        let mut lib = ImguiLibrary::new();
        let config = UiConfig {
            font_data: Some(b"not a font".to_vec()),
            ..UiConfig::default()
        };
        lib.create(&config, 1.0).unwrap_err();
        assert!(lib.active.is_none());
    }

    // The only test that creates a real imgui context; imgui allows one per process.
    #[test]
    fn context_lifecycle() {
        let mut lib = ImguiLibrary::new();
        let handle = lib.create(&UiConfig::default(), 2.0).unwrap();
        assert!(lib.is_active(handle));

        lib.create(&UiConfig::default(), 1.0).unwrap_err();

        let frame = FrameContext {
            delta_time: 0.0,
            surface_size: SurfaceSize::new(640, 480),
            minimized: false,
            frame_index: 0,
            close_requested: false,
        };
        let hello = |ui: &imgui::Ui| {
            ui.window("Hello").build(|| ui.text("Hello, world!"));
        };
        // imgui hides a newly appearing auto-sized window for its first
        // frame while it measures the contents.
        lib.frame(handle, &frame, hello).unwrap();
        let stats = lib.frame(handle, &frame, hello).unwrap();
        assert!(stats.vertices > 0);
        assert!(stats.draw_lists > 0);

        lib.rescale(handle, 3.0);
        let active = lib.active.as_ref().unwrap();
        assert_eq!(active.scale, 3.0);
        assert_eq!(active.ctx.io().font_global_scale, 1.5);
        lib.rescale(handle, 0.0);
        assert_eq!(lib.active.as_ref().unwrap().scale, 3.0);

        lib.destroy(handle).unwrap();
        assert!(!lib.is_active(handle));
        lib.destroy(handle).unwrap_err();
        lib.frame(handle, &frame, |_| {}).unwrap_err();
    }
}
