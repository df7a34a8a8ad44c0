use kiln_engine::core::{App, AppControl, FrameCtx};
use kiln_engine::device::{SurfaceErrorAction, WgpuRenderLibrary};
use kiln_engine::ui::ImguiLibrary;
use kiln_engine::window::WinitWindowSystem;

type NativeCtx<'a> = FrameCtx<'a, WinitWindowSystem, ImguiLibrary, WgpuRenderLibrary>;

/// Draws one static "Hello" panel per frame over a cleared background.
pub struct HelloApp {
    clear: wgpu::Color,
    frames: u64,
}

impl HelloApp {
    pub fn new() -> Self {
        Self {
            clear: wgpu::Color {
                r: 0.45,
                g: 0.55,
                b: 0.60,
                a: 1.0,
            },
            frames: 0,
        }
    }
}

impl App<WinitWindowSystem, ImguiLibrary, WgpuRenderLibrary> for HelloApp {
    fn on_frame(&mut self, ctx: &mut NativeCtx<'_>) -> AppControl {
        let frame = ctx.frame;

        let stats = ctx.ui.frame(ctx.ui_context, &frame, |ui| {
            ui.window("Hello").build(|| {
                ui.text("Hello, world from kiln!");
                ui.separator();
                ui.text(format!(
                    "{}x{}  frame {}  {:.1} ms",
                    frame.surface_size.width,
                    frame.surface_size.height,
                    frame.frame_index,
                    frame.delta_time * 1000.0
                ));
            });
        });

        match stats {
            // Frame 0 is empty: imgui hides new auto-sized windows while measuring.
            Ok(stats) if self.frames == 1 => log::debug!("first visible ui frame: {stats:?}"),
            Ok(_) => {}
            Err(e) => {
                log::error!("ui frame failed: {e:#}");
                return AppControl::Exit;
            }
        }
        self.frames += 1;

        let Some(backend) = ctx.render_backend else {
            return AppControl::Continue;
        };

        match ctx.render.clear_and_present(backend, self.clear) {
            Ok(None) => AppControl::Continue,
            Ok(Some(SurfaceErrorAction::Fatal)) => {
                log::error!("surface is unusable; exiting");
                AppControl::Exit
            }
            Ok(Some(_)) => AppControl::Continue,
            Err(e) => {
                log::error!("present failed: {e:#}");
                AppControl::Exit
            }
        }
    }
}
