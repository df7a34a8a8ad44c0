//! Recording collaborators for lifecycle and runtime tests.

use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Result, bail};

use crate::config::{RenderConfig, UiConfig, WindowOptions};
use crate::core::Throttle;

use super::{
    HandleAllocator, PlatformEvent, RawInput, RenderBackendHandle, RenderLibrary, Sequencer,
    SurfaceSize, UiContextHandle, UiLibrary, WindowHandle, WindowSystem,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Open,
    Pump,
    Create,
    Rescale,
    Attach,
    Resize(SurfaceSize),
    Frame,
    Sleep(Duration),
    Detach,
    Destroy,
    Close,
}

pub type Journal = Rc<RefCell<Vec<Call>>>;

/// What one pump of the fake event queue reports.
#[derive(Debug, Clone, Default)]
pub struct PumpStep {
    pub events: Vec<PlatformEvent>,
    pub minimized: bool,
}

impl PumpStep {
    pub fn visible() -> Self {
        Self::default()
    }

    pub fn minimized() -> Self {
        Self {
            events: Vec::new(),
            minimized: true,
        }
    }

    pub fn close() -> Self {
        Self {
            events: vec![PlatformEvent::CloseRequested],
            minimized: false,
        }
    }

    pub fn with_event(mut self, ev: PlatformEvent) -> Self {
        self.events.push(ev);
        self
    }
}

pub struct FakeWindows {
    journal: Journal,
    ids: HandleAllocator,
    open: HashSet<WindowHandle>,
    minimized: bool,
    pub size: SurfaceSize,
    pub script: VecDeque<PumpStep>,
    pub fail_open: bool,
    pub fail_close: bool,
}

impl FakeWindows {
    pub fn is_open(&self, window: WindowHandle) -> bool {
        self.open.contains(&window)
    }

    pub fn open_count(&self) -> usize {
        self.open.len()
    }
}

impl WindowSystem for FakeWindows {
    fn open(&mut self, options: &WindowOptions) -> Result<WindowHandle> {
        self.journal.borrow_mut().push(Call::Open);
        if self.fail_open {
            bail!("display refused window '{}'", options.title);
        }
        self.size = SurfaceSize::new(options.width, options.height);
        let handle = WindowHandle::from_raw(self.ids.allocate());
        self.open.insert(handle);
        Ok(handle)
    }

    fn pump_events(&mut self, window: WindowHandle, input: &mut RawInput) {
        assert!(self.is_open(window), "pumping a closed window");
        self.journal.borrow_mut().push(Call::Pump);

        // An exhausted script closes the window so runtime tests terminate.
        let step = self.script.pop_front().unwrap_or_else(PumpStep::close);
        self.minimized = step.minimized;
        for ev in step.events {
            if let PlatformEvent::Resized(size) = ev {
                self.size = size;
            }
            input.push(ev);
        }
    }

    fn is_minimized(&self, _window: WindowHandle) -> bool {
        self.minimized
    }

    fn surface_size(&self, _window: WindowHandle) -> SurfaceSize {
        self.size
    }

    fn scale_factor(&self, _window: WindowHandle) -> f64 {
        1.5
    }

    fn close(&mut self, window: WindowHandle) -> Result<()> {
        self.journal.borrow_mut().push(Call::Close);
        self.open.remove(&window);
        if self.fail_close {
            bail!("window already destroyed by the platform");
        }
        Ok(())
    }
}

pub struct FakeUi {
    journal: Journal,
    ids: HandleAllocator,
    live: HashSet<UiContextHandle>,
    pub last_scale: Option<f32>,
    pub fail_create: bool,
    pub fail_destroy: bool,
}

impl FakeUi {
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

impl UiLibrary for FakeUi {
    fn create(&mut self, _config: &UiConfig, scale_factor: f32) -> Result<UiContextHandle> {
        self.journal.borrow_mut().push(Call::Create);
        if self.fail_create {
            bail!("ui context already active");
        }
        self.last_scale = Some(scale_factor);
        let handle = UiContextHandle::from_raw(self.ids.allocate());
        self.live.insert(handle);
        Ok(handle)
    }

    fn rescale(&mut self, ctx: UiContextHandle, scale_factor: f32) {
        assert!(self.live.contains(&ctx), "rescale of a dead ui context");
        self.journal.borrow_mut().push(Call::Rescale);
        self.last_scale = Some(scale_factor);
    }

    fn destroy(&mut self, ctx: UiContextHandle) -> Result<()> {
        self.journal.borrow_mut().push(Call::Destroy);
        self.live.remove(&ctx);
        if self.fail_destroy {
            bail!("ui context destroy failed");
        }
        Ok(())
    }
}

pub struct FakeRender {
    journal: Journal,
    ids: HandleAllocator,
    live: HashSet<RenderBackendHandle>,
    pub fail_attach: bool,
    pub fail_detach: bool,
}

impl FakeRender {
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

impl RenderLibrary<FakeWindows> for FakeRender {
    fn attach(
        &mut self,
        windows: &FakeWindows,
        window: WindowHandle,
        _ui: UiContextHandle,
        config: &RenderConfig,
    ) -> Result<RenderBackendHandle> {
        self.journal.borrow_mut().push(Call::Attach);
        assert!(windows.is_open(window), "attach to a closed window");
        if self.fail_attach {
            bail!("no {:?} capable adapter", config.api);
        }
        let handle = RenderBackendHandle::from_raw(self.ids.allocate());
        self.live.insert(handle);
        Ok(handle)
    }

    fn resize(&mut self, _backend: RenderBackendHandle, size: SurfaceSize) {
        self.journal.borrow_mut().push(Call::Resize(size));
    }

    fn detach(&mut self, backend: RenderBackendHandle) -> Result<()> {
        self.journal.borrow_mut().push(Call::Detach);
        self.live.remove(&backend);
        if self.fail_detach {
            bail!("device lost during detach");
        }
        Ok(())
    }
}

/// Records sleeps instead of sleeping.
pub struct RecordingThrottle {
    journal: Journal,
}

impl RecordingThrottle {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
        }
    }
}

impl Throttle for RecordingThrottle {
    fn idle(&mut self, duration: Duration) {
        self.journal.borrow_mut().push(Call::Sleep(duration));
    }
}

pub type FakeSequencer = Sequencer<FakeWindows, FakeUi, FakeRender>;

pub fn fake_stack() -> (Journal, FakeSequencer) {
    let journal = Journal::default();

    let windows = FakeWindows {
        journal: journal.clone(),
        ids: HandleAllocator::new(),
        open: HashSet::new(),
        minimized: false,
        size: SurfaceSize::default(),
        script: VecDeque::new(),
        fail_open: false,
        fail_close: false,
    };
    let ui = FakeUi {
        journal: journal.clone(),
        ids: HandleAllocator::new(),
        live: HashSet::new(),
        last_scale: None,
        fail_create: false,
        fail_destroy: false,
    };
    let render = FakeRender {
        journal: journal.clone(),
        ids: HandleAllocator::new(),
        live: HashSet::new(),
        fail_attach: false,
        fail_detach: false,
    };

    (journal, Sequencer::new(windows, ui, render))
}

/// Journal entries that are acquisitions or releases, in order.
pub fn lifecycle_calls(journal: &Journal) -> Vec<Call> {
    journal
        .borrow()
        .iter()
        .filter(|c| {
            matches!(
                c,
                Call::Open | Call::Create | Call::Attach | Call::Detach | Call::Destroy | Call::Close
            )
        })
        .cloned()
        .collect()
}
