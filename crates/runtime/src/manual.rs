use std::cell::{Cell, RefCell};

use crate::scheduler::{FrameHandle, FrameScheduler, ScheduleError};

/// A frame scheduler driven by explicit `fire` calls instead of the display.
///
/// Used for headless runs and tests: it keeps at most one pending request,
/// like `requestAnimationFrame` under a single render loop, and counts every
/// request and cancellation.
#[derive(Default)]
pub struct ManualScheduler {
    tick: RefCell<Option<Box<dyn FnMut(f64)>>>,
    pending: Cell<Option<FrameHandle>>,
    next_id: Cell<i32>,
    requested: Cell<u64>,
    cancelled: Cell<u64>,
    uninstall_deferred: Cell<bool>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the pending frame, if any. Returns whether a tick executed.
    pub fn fire(&self, timestamp_ms: f64) -> bool {
        if self.pending.take().is_none() {
            return false;
        }
        let ran = match self.tick.borrow_mut().as_mut() {
            Some(tick) => {
                tick(timestamp_ms);
                true
            }
            None => false,
        };
        if self.uninstall_deferred.replace(false) {
            self.tick.borrow_mut().take();
        }
        ran
    }

    /// Fire `count` frames spaced `step_ms` apart starting at `start_ms`.
    /// Returns how many ticks actually executed.
    pub fn fire_many(&self, start_ms: f64, step_ms: f64, count: usize) -> usize {
        (0..count)
            .filter(|i| self.fire(start_ms + step_ms * *i as f64))
            .count()
    }

    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending.get()
    }

    pub fn is_installed(&self) -> bool {
        match self.tick.try_borrow() {
            Ok(tick) => tick.is_some() && !self.uninstall_deferred.get(),
            // Borrowed means a tick is executing right now.
            Err(_) => !self.uninstall_deferred.get(),
        }
    }

    pub fn requested(&self) -> u64 {
        self.requested.get()
    }

    pub fn cancelled(&self) -> u64 {
        self.cancelled.get()
    }
}

impl FrameScheduler for ManualScheduler {
    fn install(&self, tick: Box<dyn FnMut(f64)>) -> Result<(), ScheduleError> {
        self.uninstall_deferred.set(false);
        let mut slot = self
            .tick
            .try_borrow_mut()
            .map_err(|_| ScheduleError::Unavailable("tick is executing".to_string()))?;
        *slot = Some(tick);
        Ok(())
    }

    fn request_frame(&self) -> Result<FrameHandle, ScheduleError> {
        if !self.is_installed() {
            return Err(ScheduleError::NotInstalled);
        }
        let id = self.next_id.get().wrapping_add(1);
        self.next_id.set(id);
        self.requested.set(self.requested.get() + 1);
        let handle = FrameHandle(id);
        self.pending.set(Some(handle));
        Ok(handle)
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        if self.pending.get() == Some(handle) {
            self.pending.set(None);
            self.cancelled.set(self.cancelled.get() + 1);
        }
    }

    fn uninstall(&self) {
        match self.tick.try_borrow_mut() {
            Ok(mut slot) => {
                slot.take();
            }
            Err(_) => self.uninstall_deferred.set(true),
        }
    }
}
