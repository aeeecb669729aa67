//! Browser implementation of the globe host: DOM surface, animation frames
//! and event listeners.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gpu::{ControlInput, PerspectiveCamera, RendererOptions};
use log::{debug, warn};
use runtime::{FrameHandle, FrameScheduler, ScheduleError};
use scene::Scene;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Event, EventTarget, HtmlCanvasElement, HtmlElement, MouseEvent, WheelEvent, Window};

use crate::error::GlobeError;
use crate::platform::{Host, InputBinding, RenderBackend, SurfaceSize};
use crate::wgpu::{GpuContext, create_context};

/// Size of the container, or of the window when the container has no layout yet.
fn measure(window: &Window, container: &HtmlElement) -> SurfaceSize {
    let (w, h) = (container.client_width(), container.client_height());
    if w > 0 && h > 0 {
        return SurfaceSize::new(w as u32, h as u32);
    }
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(1.0);
    SurfaceSize::new(
        dim(window.inner_width()).max(1.0) as u32,
        dim(window.inner_height()).max(1.0) as u32,
    )
}

pub struct WebHost {
    window: Window,
    container: HtmlElement,
    resize: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl WebHost {
    pub fn new(container: HtmlElement) -> Result<Self, GlobeError> {
        let window = web_sys::window().ok_or_else(|| GlobeError::Dom("window missing".into()))?;
        Ok(Self {
            window,
            container,
            resize: RefCell::new(None),
        })
    }

    pub fn from_element_id(id: &str) -> Result<Self, GlobeError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| GlobeError::Dom("document missing".into()))?;
        let container = document
            .get_element_by_id(id)
            .ok_or_else(|| GlobeError::Dom(format!("no element with id {id:?}")))?
            .dyn_into::<HtmlElement>()
            .map_err(GlobeError::dom)?;
        Self::new(container)
    }
}

impl Host for WebHost {
    type Renderer = WebRenderer;
    type Scheduler = WebFrameScheduler;
    type Input = WebInput;

    fn viewport_size(&self) -> SurfaceSize {
        measure(&self.window, &self.container)
    }

    fn create_renderer(
        &self,
        options: &RendererOptions,
        size: SurfaceSize,
    ) -> Result<WebRenderer, GlobeError> {
        let document = self
            .window
            .document()
            .ok_or_else(|| GlobeError::Dom("document missing".into()))?;
        let canvas = document
            .create_element("canvas")
            .map_err(GlobeError::dom)?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(GlobeError::dom)?;
        canvas.set_width(size.width.max(1));
        canvas.set_height(size.height.max(1));
        let style = canvas.style();
        for (prop, value) in [("display", "block"), ("width", "100%"), ("height", "100%")] {
            style.set_property(prop, value).map_err(GlobeError::dom)?;
        }
        self.container
            .append_child(&canvas)
            .map_err(GlobeError::dom)?;

        let shared = Rc::new(RendererShared {
            gpu: RefCell::new(GpuSlot::Pending),
            size: Cell::new(size),
        });
        let pending = Rc::clone(&shared);
        let options = *options;
        let target = canvas.clone();
        spawn_local(async move {
            let result = create_context(target, options, size).await;
            pending.arrive(result);
        });

        Ok(WebRenderer { canvas, shared })
    }

    fn frame_scheduler(&self) -> WebFrameScheduler {
        WebFrameScheduler {
            window: self.window.clone(),
            tick: RefCell::new(None),
        }
    }

    fn add_resize_listener(
        &self,
        mut on_resize: Box<dyn FnMut(SurfaceSize)>,
    ) -> Result<(), GlobeError> {
        let window = self.window.clone();
        let container = self.container.clone();
        let closure = Closure::<dyn FnMut()>::new(move || {
            on_resize(measure(&window, &container));
        });
        self.window
            .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
            .map_err(|e| GlobeError::Listener(format!("resize: {e:?}")))?;
        if let Some(old) = self.resize.replace(Some(closure)) {
            remove_listener(&self.window, "resize", old.as_ref());
        }
        Ok(())
    }

    fn remove_resize_listener(&self) {
        if let Some(closure) = self.resize.borrow_mut().take() {
            remove_listener(&self.window, "resize", closure.as_ref());
        }
    }

    fn bind_input(
        &self,
        renderer: &WebRenderer,
        on_input: Box<dyn FnMut(ControlInput)>,
    ) -> Result<WebInput, GlobeError> {
        let sink = Rc::new(RefCell::new(on_input));
        let mut input = WebInput {
            target: renderer.canvas.clone().into(),
            listeners: Vec::new(),
        };
        let bound = [
            ("pointerdown", false),
            ("pointermove", false),
            ("pointerup", false),
            ("pointercancel", false),
            ("pointerleave", false),
            ("wheel", true),
        ]
        .into_iter()
        .try_for_each(|(event, prevent_scroll)| input.listen(event, prevent_scroll, &sink));
        if let Err(err) = bound {
            input.release();
            return Err(err);
        }
        Ok(input)
    }
}

fn remove_listener(target: &EventTarget, event: &str, callback: &JsValue) {
    if let Err(err) = target.remove_event_listener_with_callback(event, callback.unchecked_ref()) {
        warn!("failed to remove {event} listener: {err:?}");
    }
}

fn control_input(event: &Event) -> Option<ControlInput> {
    let pos = |e: &MouseEvent| (f64::from(e.client_x()), f64::from(e.client_y()));
    match event.type_().as_str() {
        "pointerdown" => {
            let (x, y) = pos(event.dyn_ref::<MouseEvent>()?);
            Some(ControlInput::PointerDown { x, y })
        }
        "pointermove" => {
            let (x, y) = pos(event.dyn_ref::<MouseEvent>()?);
            Some(ControlInput::PointerMove { x, y })
        }
        "pointerup" | "pointercancel" | "pointerleave" => Some(ControlInput::PointerUp),
        "wheel" => {
            let delta_y = event.dyn_ref::<WheelEvent>()?.delta_y();
            Some(ControlInput::Wheel { delta_y })
        }
        _ => None,
    }
}

/// Camera-control listeners on the canvas.
pub struct WebInput {
    target: EventTarget,
    listeners: Vec<(&'static str, Closure<dyn FnMut(Event)>)>,
}

impl WebInput {
    fn listen(
        &mut self,
        event: &'static str,
        prevent_scroll: bool,
        sink: &Rc<RefCell<Box<dyn FnMut(ControlInput)>>>,
    ) -> Result<(), GlobeError> {
        let sink = Rc::clone(sink);
        let closure = Closure::<dyn FnMut(Event)>::new(move |e: Event| {
            if prevent_scroll {
                e.prevent_default();
            }
            let Some(input) = control_input(&e) else {
                return;
            };
            if let Ok(mut on_input) = sink.try_borrow_mut() {
                on_input(input);
            }
        });
        let options = web_sys::AddEventListenerOptions::new();
        // Wheel must be cancellable so the page does not scroll under the globe.
        options.set_passive(!prevent_scroll);
        self.target
            .add_event_listener_with_callback_and_add_event_listener_options(
                event,
                closure.as_ref().unchecked_ref(),
                &options,
            )
            .map_err(|e| GlobeError::Listener(format!("{event}: {e:?}")))?;
        self.listeners.push((event, closure));
        Ok(())
    }
}

impl InputBinding for WebInput {
    fn release(&mut self) {
        for (event, closure) in self.listeners.drain(..) {
            remove_listener(&self.target, event, closure.as_ref());
        }
    }
}

enum GpuSlot {
    Pending,
    Ready(GpuContext),
    Failed,
    Disposed,
}

struct RendererShared {
    gpu: RefCell<GpuSlot>,
    size: Cell<SurfaceSize>,
}

impl RendererShared {
    fn arrive(&self, result: Result<GpuContext, GlobeError>) {
        let mut slot = self.gpu.borrow_mut();
        let pending = matches!(*slot, GpuSlot::Pending);
        match (result, pending) {
            (Ok(mut ctx), true) => {
                ctx.resize(self.size.get());
                *slot = GpuSlot::Ready(ctx);
                debug!("gpu context ready");
            }
            (Ok(ctx), false) => {
                ctx.destroy();
                debug!("gpu context arrived after teardown; released");
            }
            (Err(err), true) => {
                warn!("globe renderer unavailable, background stays blank: {err}");
                *slot = GpuSlot::Failed;
            }
            (Err(err), false) => debug!("gpu init failed after teardown: {err}"),
        }
    }

    /// Draw through the context if it is ready. Returns whether a context
    /// was asked to draw.
    fn render(&self, scene: &Scene, camera: &PerspectiveCamera) -> bool {
        let Ok(mut slot) = self.gpu.try_borrow_mut() else {
            return false;
        };
        let GpuSlot::Ready(ctx) = &mut *slot else {
            return false;
        };
        if let Err(err) = ctx.render(scene, camera) {
            warn!("frame skipped: {err}");
        }
        true
    }

    fn dispose(&self) {
        if let GpuSlot::Ready(ctx) = self.gpu.replace(GpuSlot::Disposed) {
            ctx.destroy();
        }
    }
}

/// A `<canvas>` in the container plus its asynchronously created GPU context.
pub struct WebRenderer {
    canvas: HtmlCanvasElement,
    shared: Rc<RendererShared>,
}

impl RenderBackend for WebRenderer {
    fn detach(&mut self) {
        if self.canvas.parent_node().is_some() {
            self.canvas.remove();
        }
    }

    fn set_size(&mut self, size: SurfaceSize) {
        self.canvas.set_width(size.width.max(1));
        self.canvas.set_height(size.height.max(1));
        self.shared.size.set(size);
        if let GpuSlot::Ready(ctx) = &mut *self.shared.gpu.borrow_mut() {
            ctx.resize(size);
        }
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) {
        self.shared.render(scene, camera);
    }

    fn dispose(&mut self) {
        self.shared.dispose();
    }
}

/// `requestAnimationFrame` with one persistent callback.
pub struct WebFrameScheduler {
    window: Window,
    tick: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

impl FrameScheduler for WebFrameScheduler {
    fn install(&self, tick: Box<dyn FnMut(f64)>) -> Result<(), ScheduleError> {
        *self.tick.borrow_mut() = Some(Closure::wrap(tick));
        Ok(())
    }

    fn request_frame(&self) -> Result<FrameHandle, ScheduleError> {
        let tick = self.tick.borrow();
        let tick = tick.as_ref().ok_or(ScheduleError::NotInstalled)?;
        self.window
            .request_animation_frame(tick.as_ref().unchecked_ref())
            .map(FrameHandle)
            .map_err(|e| ScheduleError::Unavailable(format!("{e:?}")))
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        if let Err(err) = self.window.cancel_animation_frame(handle.0) {
            warn!("cancelAnimationFrame failed: {err:?}");
        }
    }

    fn uninstall(&self) {
        // Dropping the closure from inside its own invocation is deferred by
        // wasm-bindgen until the call returns.
        self.tick.borrow_mut().take();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use gpu::PerspectiveCamera;
    use scene::Scene;

    use super::{GpuSlot, RendererShared};
    use crate::error::GlobeError;
    use crate::platform::SurfaceSize;
    use crate::testing::small_config;
    use crate::wgpu::GpuContext;

    fn shared(slot: GpuSlot) -> RendererShared {
        RendererShared {
            gpu: RefCell::new(slot),
            size: Cell::new(SurfaceSize::new(64, 48)),
        }
    }

    fn scene_and_camera() -> (Scene, PerspectiveCamera) {
        let config = small_config();
        (
            Scene::bootstrap(&config.scene),
            PerspectiveCamera::new(&config.camera, 64.0 / 48.0),
        )
    }

    fn failed_init() -> Result<GpuContext, GlobeError> {
        Err(GlobeError::Gpu("no adapter".into()))
    }

    #[test]
    fn context_arriving_while_pending_becomes_ready() {
        let shared = shared(GpuSlot::Pending);
        shared.arrive(Ok(GpuContext::default()));
        assert!(matches!(*shared.gpu.borrow(), GpuSlot::Ready(_)));

        let (scene, camera) = scene_and_camera();
        assert!(shared.render(&scene, &camera));
    }

    #[test]
    fn context_arriving_after_teardown_is_released() {
        let shared = shared(GpuSlot::Pending);
        shared.dispose();
        shared.arrive(Ok(GpuContext::default()));
        assert!(matches!(*shared.gpu.borrow(), GpuSlot::Disposed));
    }

    #[test]
    fn failed_init_leaves_background_blank() {
        let shared = shared(GpuSlot::Pending);
        shared.arrive(failed_init());
        assert!(matches!(*shared.gpu.borrow(), GpuSlot::Failed));

        let (scene, camera) = scene_and_camera();
        assert!(!shared.render(&scene, &camera));
        shared.dispose();
        assert!(matches!(*shared.gpu.borrow(), GpuSlot::Disposed));
    }

    #[test]
    fn failure_after_teardown_keeps_slot_disposed() {
        let shared = shared(GpuSlot::Disposed);
        shared.arrive(failed_init());
        assert!(matches!(*shared.gpu.borrow(), GpuSlot::Disposed));
    }

    #[test]
    fn frames_before_readiness_draw_nothing() {
        let shared = shared(GpuSlot::Pending);
        let (scene, camera) = scene_and_camera();
        assert!(!shared.render(&scene, &camera));
        assert!(matches!(*shared.gpu.borrow(), GpuSlot::Pending));
    }

    #[test]
    fn dispose_releases_a_ready_context_once() {
        let shared = shared(GpuSlot::Ready(GpuContext::default()));
        shared.dispose();
        assert!(matches!(*shared.gpu.borrow(), GpuSlot::Disposed));
        shared.dispose();
        let (scene, camera) = scene_and_camera();
        assert!(!shared.render(&scene, &camera));
    }
}
