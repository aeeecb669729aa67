//! Seams between the globe lifecycle and the environment hosting it.

use gpu::{ControlInput, PerspectiveCamera, RendererOptions};
use runtime::FrameScheduler;
use scene::Scene;

use crate::error::GlobeError;

/// Drawing surface size in device pixels.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f64 {
        self.width.max(1) as f64 / self.height.max(1) as f64
    }
}

/// A drawing surface inserted into the host container plus the graphics
/// context bound to it.
pub trait RenderBackend {
    /// Remove the surface from the container. No-op when already removed.
    fn detach(&mut self);
    fn set_size(&mut self, size: SurfaceSize);
    /// Draw one frame. A backend whose context is not ready yet draws nothing.
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera);
    /// Release the graphics context and every buffer it owns.
    fn dispose(&mut self);
}

/// Listeners feeding pointer input to the camera controls.
pub trait InputBinding {
    fn release(&mut self);
}

/// The environment a globe is mounted into.
pub trait Host {
    type Renderer: RenderBackend + 'static;
    type Scheduler: FrameScheduler + 'static;
    type Input: InputBinding + 'static;

    fn viewport_size(&self) -> SurfaceSize;

    /// Create the drawing surface, insert it into the container and begin
    /// acquiring a graphics context for it.
    fn create_renderer(
        &self,
        options: &RendererOptions,
        size: SurfaceSize,
    ) -> Result<Self::Renderer, GlobeError>;

    fn frame_scheduler(&self) -> Self::Scheduler;

    fn add_resize_listener(
        &self,
        on_resize: Box<dyn FnMut(SurfaceSize)>,
    ) -> Result<(), GlobeError>;

    fn remove_resize_listener(&self);

    fn bind_input(
        &self,
        renderer: &Self::Renderer,
        on_input: Box<dyn FnMut(ControlInput)>,
    ) -> Result<Self::Input, GlobeError>;
}
