//! Self-rescheduling render loop with an explicit, cancellable frame handle.

use std::cell::Cell;
use std::rc::Rc;

use foundation::time::Time;

use crate::frame::Frame;
use crate::scheduler::{FrameHandle, FrameScheduler, ScheduleError};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

struct Shared<S: FrameScheduler> {
    scheduler: S,
    state: Cell<LoopState>,
    pending: Cell<Option<FrameHandle>>,
    last_frame: Cell<Option<Frame>>,
    frames_run: Cell<u64>,
}

impl<S: FrameScheduler> Shared<S> {
    fn schedule_next(&self) -> Result<(), ScheduleError> {
        let handle = self.scheduler.request_frame()?;
        self.pending.set(Some(handle));
        Ok(())
    }

    fn advance_clock(&self, timestamp_ms: f64) -> Frame {
        let time = Time::from_millis(timestamp_ms);
        let frame = match self.last_frame.get() {
            Some(prev) => prev.next(time),
            None => Frame::first(time),
        };
        self.last_frame.set(Some(frame));
        frame
    }
}

/// A continuously running frame loop.
///
/// The loop is `Running` from `start` until `stop` (or drop). Each tick runs
/// the frame callback to completion and only then requests the next frame, so
/// a stop issued from inside the callback prevents any further tick.
pub struct RenderLoop<S: FrameScheduler> {
    shared: Rc<Shared<S>>,
}

impl<S: FrameScheduler + 'static> RenderLoop<S> {
    pub fn start<F>(scheduler: S, on_frame: F) -> Result<Self, ScheduleError>
    where
        F: FnMut(Frame) + 'static,
    {
        let shared = Rc::new(Shared {
            scheduler,
            state: Cell::new(LoopState::Running),
            pending: Cell::new(None),
            last_frame: Cell::new(None),
            frames_run: Cell::new(0),
        });

        // The tick lives inside the scheduler, which `shared` owns; a weak
        // reference keeps that from forming a cycle.
        let weak = Rc::downgrade(&shared);
        let mut on_frame = on_frame;
        shared.scheduler.install(Box::new(move |timestamp_ms| {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            if shared.state.get() != LoopState::Running {
                return;
            }
            shared.pending.set(None);
            let frame = shared.advance_clock(timestamp_ms);
            on_frame(frame);
            shared.frames_run.set(shared.frames_run.get() + 1);

            if shared.state.get() == LoopState::Running {
                if let Err(err) = shared.schedule_next() {
                    log::warn!("render loop halted: {err}");
                    shared.state.set(LoopState::Stopped);
                    shared.scheduler.uninstall();
                }
            }
        }))?;

        if let Err(err) = shared.schedule_next() {
            shared.state.set(LoopState::Stopped);
            shared.scheduler.uninstall();
            return Err(err);
        }

        log::debug!("render loop started");
        Ok(Self { shared })
    }
}

impl<S: FrameScheduler> RenderLoop<S> {
    pub fn state(&self) -> LoopState {
        self.shared.state.get()
    }

    pub fn is_running(&self) -> bool {
        self.state() == LoopState::Running
    }

    pub fn frames_run(&self) -> u64 {
        self.shared.frames_run.get()
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.shared.pending.get()
    }

    /// Cancel the pending frame and release the tick. Safe to call repeatedly.
    pub fn stop(&self) {
        let shared = &self.shared;
        if shared.state.replace(LoopState::Stopped) == LoopState::Stopped {
            return;
        }
        if let Some(handle) = shared.pending.take() {
            shared.scheduler.cancel_frame(handle);
        }
        shared.scheduler.uninstall();
        log::debug!("render loop stopped after {} frames", shared.frames_run.get());
    }
}

impl<S: FrameScheduler> Drop for RenderLoop<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::{LoopState, RenderLoop};
    use crate::frame::NOMINAL_DT_S;
    use crate::manual::ManualScheduler;

    #[test]
    fn runs_every_fired_frame_until_stopped() {
        let sched = Rc::new(ManualScheduler::new());
        let count = Rc::new(Cell::new(0u32));
        let c = count.clone();
        let render_loop = RenderLoop::start(sched.clone(), move |_| c.set(c.get() + 1)).unwrap();

        assert_eq!(render_loop.state(), LoopState::Running);
        assert_eq!(sched.fire_many(0.0, 16.0, 5), 5);
        assert_eq!(count.get(), 5);
        assert_eq!(render_loop.frames_run(), 5);

        render_loop.stop();
        assert_eq!(render_loop.state(), LoopState::Stopped);
        assert_eq!(sched.fire_many(100.0, 16.0, 5), 0);
        assert_eq!(count.get(), 5);
    }

    #[test]
    fn stop_cancels_the_pending_request() {
        let sched = Rc::new(ManualScheduler::new());
        let render_loop = RenderLoop::start(sched.clone(), |_| {}).unwrap();
        let pending = render_loop.pending_frame();
        assert!(pending.is_some());
        assert_eq!(sched.pending(), pending);

        render_loop.stop();
        assert_eq!(sched.pending(), None);
        assert_eq!(sched.cancelled(), 1);
        assert!(!sched.is_installed());
    }

    #[test]
    fn stop_is_idempotent() {
        let sched = Rc::new(ManualScheduler::new());
        let render_loop = RenderLoop::start(sched.clone(), |_| {}).unwrap();
        render_loop.stop();
        render_loop.stop();
        drop(render_loop);
        assert_eq!(sched.cancelled(), 1);
    }

    #[test]
    fn dropping_the_loop_stops_it() {
        let sched = Rc::new(ManualScheduler::new());
        let count = Rc::new(Cell::new(0u32));
        let c = count.clone();
        let render_loop = RenderLoop::start(sched.clone(), move |_| c.set(c.get() + 1)).unwrap();
        drop(render_loop);
        assert!(!sched.fire(0.0));
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn stop_from_inside_a_frame_prevents_rescheduling() {
        let sched = Rc::new(ManualScheduler::new());
        let slot: Rc<RefCell<Option<RenderLoop<Rc<ManualScheduler>>>>> =
            Rc::new(RefCell::new(None));
        let count = Rc::new(Cell::new(0u32));

        let s = slot.clone();
        let c = count.clone();
        let render_loop = RenderLoop::start(sched.clone(), move |_| {
            c.set(c.get() + 1);
            if let Some(l) = s.borrow().as_ref() {
                l.stop();
            }
        })
        .unwrap();
        *slot.borrow_mut() = Some(render_loop);

        assert!(sched.fire(0.0));
        assert!(!sched.fire(16.0));
        assert_eq!(count.get(), 1);
        assert!(!sched.is_installed());
        slot.borrow_mut().take();
    }

    #[test]
    fn frames_carry_measured_deltas() {
        let sched = Rc::new(ManualScheduler::new());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        let _render_loop =
            RenderLoop::start(sched.clone(), move |f| s.borrow_mut().push((f.index, f.dt_s)))
                .unwrap();

        sched.fire(1000.0);
        sched.fire(1062.5);
        assert_eq!(*seen.borrow(), vec![(0, NOMINAL_DT_S), (1, 0.0625)]);
    }
}
