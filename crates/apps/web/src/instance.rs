//! One mounted globe: scene, camera, controls and renderer, driven by a
//! render loop and torn down in a fixed order.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gpu::{ControlInput, OrbitControls, PerspectiveCamera};
use log::debug;
use runtime::{LoopState, RenderLoop};
use scene::Scene;

use crate::config::GlobeConfig;
use crate::error::GlobeError;
use crate::platform::{Host, InputBinding, RenderBackend, SurfaceSize};

/// Everything a mounted globe owns, released together by [`GlobeResources::dispose`].
pub struct GlobeResources<H: Host> {
    pub renderer: H::Renderer,
    pub input: H::Input,
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
    pub scene: Scene,
}

impl<H: Host> GlobeResources<H> {
    fn step(&mut self) {
        self.camera.position = self.controls.update();
        self.camera.target = self.controls.target();
        self.scene.advance();
        self.renderer.render(&self.scene, &self.camera);
    }

    fn resize(&mut self, size: SurfaceSize) {
        self.camera.set_viewport(size.width, size.height);
        self.controls.set_viewport(size.width, size.height);
        self.renderer.set_size(size);
    }

    fn dispose(mut self) {
        self.renderer.detach();
        self.renderer.dispose();
        self.input.release();
    }
}

type Slot<H> = RefCell<Option<GlobeResources<H>>>;

/// Run `f` against the resources if the globe is still mounted and nothing
/// else is using them right now.
fn with_live<H: Host>(slot: &Weak<Slot<H>>, f: impl FnOnce(&mut GlobeResources<H>)) -> bool {
    let Some(slot) = slot.upgrade() else {
        return false;
    };
    let Ok(mut guard) = slot.try_borrow_mut() else {
        return false;
    };
    match guard.as_mut() {
        Some(resources) => {
            f(resources);
            true
        }
        None => false,
    }
}

pub struct GlobeInstance<H: Host + 'static> {
    host: H,
    resources: Rc<Slot<H>>,
    render_loop: Option<RenderLoop<H::Scheduler>>,
    listening: bool,
}

impl<H: Host + 'static> GlobeInstance<H> {
    /// Build the scene, insert the surface and start rendering.
    ///
    /// Anything created before a failing step is released again before the
    /// error is returned.
    pub fn mount(host: H, config: &GlobeConfig) -> Result<Self, GlobeError> {
        let size = host.viewport_size();
        let scene = Scene::bootstrap(&config.scene);
        let camera = PerspectiveCamera::new(&config.camera, size.aspect());
        let mut controls = OrbitControls::new(config.controls, camera.position, camera.target);
        controls.set_viewport(size.width, size.height);

        let resources: Rc<Slot<H>> = Rc::new(RefCell::new(None));

        let mut renderer = host.create_renderer(&config.renderer, size)?;
        let weak = Rc::downgrade(&resources);
        let on_input = Box::new(move |input: ControlInput| {
            with_live(&weak, |res| res.controls.handle_input(input));
        });
        let input = match host.bind_input(&renderer, on_input) {
            Ok(input) => input,
            Err(err) => {
                renderer.detach();
                renderer.dispose();
                return Err(err);
            }
        };
        *resources.borrow_mut() = Some(GlobeResources {
            renderer,
            input,
            camera,
            controls,
            scene,
        });

        // From here on, dropping `instance` on error tears down what exists.
        let mut instance = Self {
            host,
            resources,
            render_loop: None,
            listening: false,
        };

        let weak = Rc::downgrade(&instance.resources);
        instance.host.add_resize_listener(Box::new(move |size: SurfaceSize| {
            with_live(&weak, |res| res.resize(size));
        }))?;
        instance.listening = true;

        let weak = Rc::downgrade(&instance.resources);
        let render_loop = RenderLoop::start(instance.host.frame_scheduler(), move |_frame| {
            with_live(&weak, GlobeResources::step);
        })?;
        instance.render_loop = Some(render_loop);

        debug!("globe mounted at {}x{}", size.width, size.height);
        Ok(instance)
    }

    /// Stop the loop, drop the resize listener, remove the surface, release
    /// the graphics context, then release input. Safe to call repeatedly.
    pub fn teardown(&mut self) {
        if let Some(render_loop) = self.render_loop.take() {
            render_loop.stop();
        }
        if std::mem::take(&mut self.listening) {
            self.host.remove_resize_listener();
        }
        let resources = self.resources.borrow_mut().take();
        if let Some(resources) = resources {
            resources.dispose();
            debug!("globe torn down");
        }
    }

    pub fn loop_state(&self) -> LoopState {
        self.render_loop
            .as_ref()
            .map_or(LoopState::Stopped, RenderLoop::state)
    }

    pub fn is_mounted(&self) -> bool {
        self.resources.borrow().is_some()
    }

    /// Inspect the live resources. `None` after teardown.
    pub fn with_resources<R>(&self, f: impl FnOnce(&GlobeResources<H>) -> R) -> Option<R> {
        self.resources.borrow().as_ref().map(f)
    }
}

impl<H: Host + 'static> Drop for GlobeInstance<H> {
    fn drop(&mut self) {
        self.teardown();
    }
}
