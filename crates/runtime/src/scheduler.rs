use std::rc::Rc;

use thiserror::Error;

/// Opaque id of one pending frame request, as returned by the platform.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("no frame callback installed")]
    NotInstalled,
    #[error("frame scheduling unavailable: {0}")]
    Unavailable(String),
}

/// A display-refresh driven scheduling primitive with cancellable requests.
///
/// The tick is installed once and stays alive until `uninstall`; each
/// `request_frame` arranges for exactly one future invocation of it, which
/// `cancel_frame` revokes. The tick receives the presentation timestamp in
/// milliseconds.
pub trait FrameScheduler {
    fn install(&self, tick: Box<dyn FnMut(f64)>) -> Result<(), ScheduleError>;
    fn request_frame(&self) -> Result<FrameHandle, ScheduleError>;
    fn cancel_frame(&self, handle: FrameHandle);
    fn uninstall(&self);
}

impl<S: FrameScheduler + ?Sized> FrameScheduler for Rc<S> {
    fn install(&self, tick: Box<dyn FnMut(f64)>) -> Result<(), ScheduleError> {
        (**self).install(tick)
    }

    fn request_frame(&self) -> Result<FrameHandle, ScheduleError> {
        (**self).request_frame()
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        (**self).cancel_frame(handle)
    }

    fn uninstall(&self) {
        (**self).uninstall()
    }
}
