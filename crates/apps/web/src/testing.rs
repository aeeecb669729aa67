//! In-memory host used to exercise the globe lifecycle without a browser.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gpu::{ControlInput, PerspectiveCamera, RendererOptions};
use runtime::{FrameHandle, FrameScheduler, ManualScheduler, ScheduleError};
use scene::Scene;
use scene::starfield::StarfieldConfig;

use crate::config::GlobeConfig;
use crate::error::GlobeError;
use crate::platform::{Host, InputBinding, RenderBackend, SurfaceSize};

pub fn small_config() -> GlobeConfig {
    let mut config = GlobeConfig::default();
    config.scene.starfield = StarfieldConfig {
        count: 64,
        seed: Some(7),
        ..StarfieldConfig::default()
    };
    config.scene.globe.segments = 16;
    config
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Failure {
    Renderer,
    Input,
    Resize,
}

type ResizeFn = Box<dyn FnMut(SurfaceSize)>;
type InputFn = Box<dyn FnMut(ControlInput)>;

/// Observable state of the fake document the globe is mounted into.
#[derive(Default)]
pub struct FakePage {
    pub scheduler: Rc<ManualScheduler>,
    surfaces: Cell<usize>,
    renders: Cell<u64>,
    renderer_size: Cell<Option<SurfaceSize>>,
    last_camera: Cell<Option<PerspectiveCamera>>,
    events: RefCell<Vec<&'static str>>,
    resize: RefCell<Option<ResizeFn>>,
    input: RefCell<Option<InputFn>>,
}

impl FakePage {
    pub fn surfaces(&self) -> usize {
        self.surfaces.get()
    }

    pub fn renders(&self) -> u64 {
        self.renders.get()
    }

    pub fn renderer_size(&self) -> Option<SurfaceSize> {
        self.renderer_size.get()
    }

    pub fn last_camera(&self) -> Option<PerspectiveCamera> {
        self.last_camera.get()
    }

    pub fn events(&self) -> Vec<&'static str> {
        self.events.borrow().clone()
    }

    pub fn clear_events(&self) {
        self.events.borrow_mut().clear();
    }

    pub fn has_resize_listener(&self) -> bool {
        self.resize.borrow().is_some()
    }

    pub fn has_input_listener(&self) -> bool {
        self.input.borrow().is_some()
    }

    /// Dispatch a viewport resize. Returns whether a listener received it.
    pub fn resize(&self, size: SurfaceSize) -> bool {
        match self.resize.borrow_mut().as_mut() {
            Some(on_resize) => {
                on_resize(size);
                true
            }
            None => false,
        }
    }

    pub fn take_resize_listener(&self) -> Option<ResizeFn> {
        self.resize.borrow_mut().take()
    }

    pub fn send_input(&self, input: ControlInput) -> bool {
        match self.input.borrow_mut().as_mut() {
            Some(on_input) => {
                on_input(input);
                true
            }
            None => false,
        }
    }

    fn log(&self, event: &'static str) {
        self.events.borrow_mut().push(event);
    }
}

pub struct FakeHost {
    page: Rc<FakePage>,
    viewport: SurfaceSize,
    failure: Option<Failure>,
}

impl FakeHost {
    pub fn new(viewport: SurfaceSize) -> Self {
        Self {
            page: Rc::new(FakePage::default()),
            viewport,
            failure: None,
        }
    }

    pub fn failing(viewport: SurfaceSize, failure: Failure) -> Self {
        Self {
            failure: Some(failure),
            ..Self::new(viewport)
        }
    }

    pub fn page(&self) -> Rc<FakePage> {
        Rc::clone(&self.page)
    }
}

pub struct FakeRenderer {
    page: Rc<FakePage>,
    attached: bool,
}

impl RenderBackend for FakeRenderer {
    fn detach(&mut self) {
        if std::mem::take(&mut self.attached) {
            self.page.surfaces.set(self.page.surfaces.get() - 1);
            self.page.log("detach");
        }
    }

    fn set_size(&mut self, size: SurfaceSize) {
        self.page.renderer_size.set(Some(size));
    }

    fn render(&mut self, _scene: &Scene, camera: &PerspectiveCamera) {
        self.page.renders.set(self.page.renders.get() + 1);
        self.page.last_camera.set(Some(*camera));
    }

    fn dispose(&mut self) {
        self.page.log("dispose_gpu");
    }
}

pub struct FakeInput {
    page: Rc<FakePage>,
}

impl InputBinding for FakeInput {
    fn release(&mut self) {
        self.page.input.borrow_mut().take();
        self.page.log("release_input");
    }
}

/// Records cancellations in the page's event log.
pub struct LoggingScheduler {
    page: Rc<FakePage>,
}

impl FrameScheduler for LoggingScheduler {
    fn install(&self, tick: Box<dyn FnMut(f64)>) -> Result<(), ScheduleError> {
        self.page.scheduler.install(tick)
    }

    fn request_frame(&self) -> Result<FrameHandle, ScheduleError> {
        self.page.scheduler.request_frame()
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        self.page.log("cancel_frame");
        self.page.scheduler.cancel_frame(handle);
    }

    fn uninstall(&self) {
        self.page.scheduler.uninstall();
    }
}

impl Host for FakeHost {
    type Renderer = FakeRenderer;
    type Scheduler = LoggingScheduler;
    type Input = FakeInput;

    fn viewport_size(&self) -> SurfaceSize {
        self.viewport
    }

    fn create_renderer(
        &self,
        _options: &RendererOptions,
        size: SurfaceSize,
    ) -> Result<FakeRenderer, GlobeError> {
        if self.failure == Some(Failure::Renderer) {
            return Err(GlobeError::Gpu("no suitable adapter".to_string()));
        }
        self.page.surfaces.set(self.page.surfaces.get() + 1);
        self.page.renderer_size.set(Some(size));
        self.page.log("attach");
        Ok(FakeRenderer {
            page: self.page(),
            attached: true,
        })
    }

    fn frame_scheduler(&self) -> LoggingScheduler {
        LoggingScheduler { page: self.page() }
    }

    fn add_resize_listener(&self, on_resize: ResizeFn) -> Result<(), GlobeError> {
        if self.failure == Some(Failure::Resize) {
            return Err(GlobeError::Listener("resize".to_string()));
        }
        *self.page.resize.borrow_mut() = Some(on_resize);
        Ok(())
    }

    fn remove_resize_listener(&self) {
        self.page.resize.borrow_mut().take();
        self.page.log("remove_resize_listener");
    }

    fn bind_input(
        &self,
        _renderer: &FakeRenderer,
        on_input: InputFn,
    ) -> Result<FakeInput, GlobeError> {
        if self.failure == Some(Failure::Input) {
            return Err(GlobeError::Listener("pointerdown".to_string()));
        }
        *self.page.input.borrow_mut() = Some(on_input);
        Ok(FakeInput { page: self.page() })
    }
}
