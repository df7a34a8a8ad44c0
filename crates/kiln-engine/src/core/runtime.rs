use std::time::Duration;

use crate::config::LifecycleConfig;
use crate::lifecycle::{
    InitError, RawInput, RenderLibrary, Sequencer, ShutdownReport, UiLibrary, WindowSystem,
};

use super::app::{App, AppControl};
use super::ctx::FrameCtx;

/// Bounded idle used while the window is minimized.
pub trait Throttle {
    fn idle(&mut self, duration: Duration);
}

/// Blocks the loop thread for the requested duration.
#[derive(Debug, Default)]
pub struct ThreadSleep;

impl Throttle for ThreadSleep {
    fn idle(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// What happened during one run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub frames_drawn: u64,
    /// Iterations skipped because the window was minimized.
    pub frames_idle: u64,
    pub shutdown: ShutdownReport,
}

/// Entry point for the frame loop.
pub struct Runtime;

impl Runtime {
    /// Initializes, ticks until a close request or `AppControl::Exit`, then
    /// shuts down exactly once.
    pub fn run<W, U, R, A>(
        sequencer: &mut Sequencer<W, U, R>,
        config: &LifecycleConfig,
        app: &mut A,
    ) -> Result<RunSummary, InitError>
    where
        W: WindowSystem,
        U: UiLibrary,
        R: RenderLibrary<W>,
        A: App<W, U, R>,
    {
        Self::run_with_throttle(sequencer, config, app, &mut ThreadSleep)
    }

    pub fn run_with_throttle<W, U, R, A, T>(
        sequencer: &mut Sequencer<W, U, R>,
        config: &LifecycleConfig,
        app: &mut A,
        throttle: &mut T,
    ) -> Result<RunSummary, InitError>
    where
        W: WindowSystem,
        U: UiLibrary,
        R: RenderLibrary<W>,
        A: App<W, U, R>,
        T: Throttle,
    {
        let idle = config.minimized_sleep();
        let mut guard = sequencer.scoped(config)?;
        let mut input = RawInput::default();
        let mut summary = RunSummary::default();
        let mut last_size = guard.sequence().surface_size();

        loop {
            if guard.sequence().close_requested() {
                break;
            }

            let frame = guard.tick(&mut input);
            let (sequencer, seq) = guard.split();

            let (window, ui_context) = match (seq.window(), seq.ui_context()) {
                (Some(w), Some(u)) => (w, u),
                _ => unreachable!("tick returned for an incomplete sequence"),
            };
            let render_backend = seq.render_backend();
            let (windows, ui, render) = sequencer.parts_mut();

            if frame.surface_size != last_size {
                if let Some(backend) = render_backend {
                    render.resize(backend, frame.surface_size);
                }
                last_size = frame.surface_size;
            }

            if frame.minimized {
                summary.frames_idle += 1;
                throttle.idle(idle);
                continue;
            }

            let mut ctx = FrameCtx {
                frame,
                window,
                ui_context,
                render_backend,
                windows,
                ui,
                render,
            };

            summary.frames_drawn += 1;
            if app.on_frame(&mut ctx) == AppControl::Exit {
                log::info!("app requested exit");
                seq.request_close();
            }
        }

        log::info!(
            "frame loop finished ({} drawn, {} idle)",
            summary.frames_drawn,
            summary.frames_idle
        );

        summary.shutdown = guard.finish();
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GraphicsApi;
    use crate::lifecycle::fakes::{
        Call, FakeRender, FakeUi, FakeWindows, Journal, PumpStep, RecordingThrottle, fake_stack,
        lifecycle_calls,
    };
    use crate::lifecycle::{PlatformEvent, ResourceKind, SurfaceSize};

    /// Records each frame and optionally asks to exit after `exit_after`.
    struct CountingApp {
        journal: Journal,
        deltas: Vec<f32>,
        exit_after: Option<usize>,
    }

    impl CountingApp {
        fn new(journal: &Journal) -> Self {
            Self {
                journal: journal.clone(),
                deltas: Vec::new(),
                exit_after: None,
            }
        }
    }

    impl App<FakeWindows, FakeUi, FakeRender> for CountingApp {
        fn on_frame(&mut self, ctx: &mut FrameCtx<'_, FakeWindows, FakeUi, FakeRender>) -> AppControl {
            assert!(!ctx.frame.minimized);
            assert!(ctx.windows.is_open(ctx.window));
            self.journal.borrow_mut().push(Call::Frame);
            self.deltas.push(ctx.frame.delta_time);

            match self.exit_after {
                Some(n) if self.deltas.len() >= n => AppControl::Exit,
                _ => AppControl::Continue,
            }
        }
    }

    fn config() -> LifecycleConfig {
        LifecycleConfig::default()
            .size(320, 200)
            .graphics_api(GraphicsApi::Vulkan)
    }

    #[test]
    fn visible_frames_then_close_tears_down_in_reverse() {
        let (journal, mut seq_r) = fake_stack();
        seq_r.parts_mut().0.script = [
            PumpStep::visible(),
            PumpStep::visible(),
            PumpStep::visible().with_event(PlatformEvent::CloseRequested),
        ]
        .into();

        let mut app = CountingApp::new(&journal);
        let mut throttle = RecordingThrottle::new(&journal);
        let summary =
            Runtime::run_with_throttle(&mut seq_r, &config(), &mut app, &mut throttle).unwrap();

        assert_eq!(summary.frames_drawn, 3);
        assert_eq!(summary.frames_idle, 0);
        assert_eq!(
            summary.shutdown.released,
            vec![
                ResourceKind::RenderBackend,
                ResourceKind::UiContext,
                ResourceKind::Window
            ]
        );
        assert_eq!(
            lifecycle_calls(&journal),
            vec![
                Call::Open,
                Call::Create,
                Call::Attach,
                Call::Detach,
                Call::Destroy,
                Call::Close
            ]
        );
        assert_eq!(app.deltas[0], 0.0);
        assert!(app.deltas[1..].iter().all(|dt| *dt > 0.0));
    }

    #[test]
    fn minimized_iterations_sleep_and_skip_drawing() {
        let (journal, mut seq_r) = fake_stack();
        seq_r.parts_mut().0.script = (0..5).map(|_| PumpStep::minimized()).collect();

        let mut app = CountingApp::new(&journal);
        let mut throttle = RecordingThrottle::new(&journal);
        let summary =
            Runtime::run_with_throttle(&mut seq_r, &config(), &mut app, &mut throttle).unwrap();

        let calls = journal.borrow().clone();
        let sleeps = calls.iter().filter(|c| matches!(c, Call::Sleep(_))).count();
        assert_eq!(sleeps, 5);
        assert_eq!(summary.frames_idle, 5);
        assert!(app.deltas.len() <= 1, "only the closing frame may draw");

        let pumps: Vec<usize> = calls
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == Call::Pump)
            .map(|(i, _)| i)
            .collect();
        for pair in pumps.windows(2).take(5) {
            let between = &calls[pair[0]..pair[1]];
            assert!(between.contains(&Call::Sleep(Duration::from_millis(10))));
            assert!(!between.contains(&Call::Frame));
        }
    }

    #[test]
    fn init_failure_is_returned_without_ticking() {
        let (journal, mut seq_r) = fake_stack();
        seq_r.parts_mut().2.fail_attach = true;

        let mut app = CountingApp::new(&journal);
        let mut throttle = RecordingThrottle::new(&journal);
        let err = Runtime::run_with_throttle(&mut seq_r, &config(), &mut app, &mut throttle)
            .unwrap_err();

        assert_eq!(err.stage, ResourceKind::RenderBackend);
        assert!(!journal.borrow().contains(&Call::Pump));
        assert!(app.deltas.is_empty());
    }

    #[test]
    fn app_exit_stops_the_loop() {
        let (journal, mut seq_r) = fake_stack();
        seq_r.parts_mut().0.script = (0..10).map(|_| PumpStep::visible()).collect();

        let mut app = CountingApp::new(&journal);
        app.exit_after = Some(2);
        let mut throttle = RecordingThrottle::new(&journal);
        let summary =
            Runtime::run_with_throttle(&mut seq_r, &config(), &mut app, &mut throttle).unwrap();

        assert_eq!(summary.frames_drawn, 2);
        assert_eq!(seq_r.windows().open_count(), 0);
    }

    #[test]
    fn resize_reaches_render_backend_once() {
        let (journal, mut seq_r) = fake_stack();
        let resized = SurfaceSize::new(800, 600);
        seq_r.parts_mut().0.script = [
            PumpStep::visible().with_event(PlatformEvent::Resized(resized)),
            PumpStep::visible(),
        ]
        .into();

        let mut app = CountingApp::new(&journal);
        let mut throttle = RecordingThrottle::new(&journal);
        Runtime::run_with_throttle(&mut seq_r, &config(), &mut app, &mut throttle).unwrap();

        let resizes: Vec<_> = journal
            .borrow()
            .iter()
            .filter(|c| matches!(c, Call::Resize(_)))
            .cloned()
            .collect();
        assert_eq!(resizes, vec![Call::Resize(resized)]);
    }
}
