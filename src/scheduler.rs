//! Frame scheduler
//!
//! Drives a frame callback once per display refresh until cancelled. The
//! loop re-arms itself after each frame, but only while the running flag is
//! set, and a queued frame re-checks the flag before doing any work. Once
//! `cancel()` returns, the frame callback never runs again.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// One-shot per-frame callback; receives the host's frame timestamp (ms)
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// A request-next-frame / cancel-requested-frame primitive.
///
/// `request_frame` must not invoke the callback synchronously. It returns
/// `None` when the host refuses the request; the callback is then dropped.
pub trait FrameSource {
    type Handle: 'static;

    fn request_frame(&self, callback: FrameCallback) -> Option<Self::Handle>;

    fn cancel_frame(&self, handle: Self::Handle);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Not started yet
    Idle,
    /// A frame is always pending
    Running,
    /// Idle again, for good
    Cancelled,
}

struct Shared<F: FrameSource> {
    frames: F,
    state: Cell<SchedulerState>,
    pending: RefCell<Option<F::Handle>>,
    ticks: Cell<u64>,
}

type FrameFn = Rc<RefCell<dyn FnMut(f64)>>;

pub struct FrameScheduler<F: FrameSource + 'static> {
    shared: Rc<Shared<F>>,
}

impl<F: FrameSource + 'static> FrameScheduler<F> {
    pub fn new(frames: F) -> Self {
        Self {
            shared: Rc::new(Shared {
                frames,
                state: Cell::new(SchedulerState::Idle),
                pending: RefCell::new(None),
                ticks: Cell::new(0),
            }),
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.shared.state.get()
    }

    /// Frames delivered so far
    pub fn ticks(&self) -> u64 {
        self.shared.ticks.get()
    }

    /// Idle -> Running. Returns false (and does nothing) from any other state,
    /// or if the first frame request is refused.
    pub fn start<C>(&self, on_frame: C) -> bool
    where
        C: FnMut(f64) + 'static,
    {
        if self.shared.state.get() != SchedulerState::Idle {
            log::debug!("Scheduler start ignored in state {:?}", self.shared.state.get());
            return false;
        }

        self.shared.state.set(SchedulerState::Running);
        let on_frame: FrameFn = Rc::new(RefCell::new(on_frame));
        if !request_next(&self.shared, on_frame) {
            return false;
        }
        log::debug!("Scheduler started");
        true
    }

    /// Stop the loop. Safe to call repeatedly and from inside a frame.
    pub fn cancel(&self) {
        let previous = self.shared.state.replace(SchedulerState::Cancelled);
        let pending = self.shared.pending.borrow_mut().take();
        if let Some(handle) = pending {
            self.shared.frames.cancel_frame(handle);
        }
        if previous == SchedulerState::Running {
            log::debug!("Scheduler cancelled after {} frames", self.ticks());
        }
    }
}

impl<F: FrameSource + 'static> Drop for FrameScheduler<F> {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Queue the next frame. A refused request stops the loop for good.
fn request_next<F: FrameSource + 'static>(shared: &Rc<Shared<F>>, on_frame: FrameFn) -> bool {
    let weak: Weak<Shared<F>> = Rc::downgrade(shared);
    let handle = shared.frames.request_frame(Box::new(move |timestamp| {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        // This frame's handle is spent
        shared.pending.borrow_mut().take();

        if shared.state.get() != SchedulerState::Running {
            return;
        }

        (on_frame.borrow_mut())(timestamp);
        shared.ticks.set(shared.ticks.get() + 1);

        if shared.state.get() == SchedulerState::Running {
            request_next(&shared, on_frame);
        }
    }));

    match handle {
        Some(handle) => {
            *shared.pending.borrow_mut() = Some(handle);
            true
        }
        None => {
            shared.state.set(SchedulerState::Cancelled);
            log::warn!(
                "Frame request refused, scheduler stopped after {} frames",
                shared.ticks.get()
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::ManualFrames;

    fn counter() -> (Rc<Cell<u32>>, impl FnMut(f64) + 'static) {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        (count, move |_| c.set(c.get() + 1))
    }

    #[test]
    fn test_runs_once_per_frame() {
        let frames = ManualFrames::new();
        let scheduler = FrameScheduler::new(frames.clone());
        let (count, on_frame) = counter();

        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert!(scheduler.start(on_frame));
        assert_eq!(scheduler.state(), SchedulerState::Running);
        assert_eq!(count.get(), 0);
        assert_eq!(frames.pending(), 1);

        for _ in 0..5 {
            assert_eq!(frames.pump(), 1);
        }
        assert_eq!(count.get(), 5);
        assert_eq!(scheduler.ticks(), 5);
        assert_eq!(frames.pending(), 1);
    }

    #[test]
    fn test_no_frames_after_cancel() {
        let frames = ManualFrames::new();
        let scheduler = FrameScheduler::new(frames.clone());
        let (count, on_frame) = counter();
        scheduler.start(on_frame);
        frames.pump_n(3);

        scheduler.cancel();
        assert_eq!(scheduler.state(), SchedulerState::Cancelled);
        assert_eq!(frames.pending(), 0);

        frames.pump_n(10);
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn test_cancelled_is_terminal() {
        let frames = ManualFrames::new();
        let scheduler = FrameScheduler::new(frames.clone());
        scheduler.start(|_| {});
        scheduler.cancel();
        scheduler.cancel();
        assert!(!scheduler.start(|_| {}));
        assert_eq!(frames.pending(), 0);
    }

    #[test]
    fn test_double_start_is_ignored() {
        let frames = ManualFrames::new();
        let scheduler = FrameScheduler::new(frames.clone());
        assert!(scheduler.start(|_| {}));
        assert!(!scheduler.start(|_| {}));
        assert_eq!(frames.pending(), 1);
    }

    #[test]
    fn test_cancel_from_inside_a_frame() {
        let frames = ManualFrames::new();
        let scheduler = Rc::new(FrameScheduler::new(frames.clone()));
        let count = Rc::new(Cell::new(0));

        let weak = Rc::downgrade(&scheduler);
        let c = Rc::clone(&count);
        scheduler.start(move |_| {
            c.set(c.get() + 1);
            if c.get() == 2 {
                if let Some(s) = weak.upgrade() {
                    s.cancel();
                }
            }
        });

        frames.pump_n(6);
        assert_eq!(count.get(), 2);
        assert_eq!(frames.pending(), 0);
    }

    #[test]
    fn test_drop_cancels() {
        let frames = ManualFrames::new();
        let (count, on_frame) = counter();
        {
            let scheduler = FrameScheduler::new(frames.clone());
            scheduler.start(on_frame);
            frames.pump();
        }
        assert_eq!(frames.pending(), 0);
        frames.pump_n(4);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_stale_callback_is_inert() {
        // A host that ignores cancellation still cannot drive a cancelled loop
        struct Leaky(ManualFrames);
        impl FrameSource for Leaky {
            type Handle = u64;
            fn request_frame(&self, callback: FrameCallback) -> Option<u64> {
                self.0.request_frame(callback)
            }
            fn cancel_frame(&self, _handle: u64) {}
        }

        let frames = ManualFrames::new();
        let scheduler = FrameScheduler::new(Leaky(frames.clone()));
        let (count, on_frame) = counter();
        scheduler.start(on_frame);
        scheduler.cancel();
        assert_eq!(frames.pending(), 1);
        frames.pump_n(3);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_timestamps_are_forwarded() {
        let frames = ManualFrames::new();
        let scheduler = FrameScheduler::new(frames.clone());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        scheduler.start(move |t| s.borrow_mut().push(t));
        frames.pump_n(3);
        let seen = seen.borrow();
        assert_eq!(seen.len(), 3);
        assert!(seen.windows(2).all(|w| w[1] > w[0]));
    }

    /// Grants a fixed number of frame requests, then refuses
    struct Rationed {
        frames: ManualFrames,
        left: Cell<u32>,
    }

    impl FrameSource for Rationed {
        type Handle = u64;
        fn request_frame(&self, callback: FrameCallback) -> Option<u64> {
            let left = self.left.get().checked_sub(1)?;
            self.left.set(left);
            self.frames.request_frame(callback)
        }
        fn cancel_frame(&self, handle: u64) {
            self.frames.cancel_frame(handle);
        }
    }

    #[test]
    fn test_refused_first_request_fails_start() {
        let frames = ManualFrames::new();
        let scheduler = FrameScheduler::new(Rationed {
            frames: frames.clone(),
            left: Cell::new(0),
        });
        assert!(!scheduler.start(|_| {}));
        assert_eq!(scheduler.state(), SchedulerState::Cancelled);
        assert_eq!(frames.pending(), 0);
    }

    #[test]
    fn test_refused_request_stops_the_loop() {
        let frames = ManualFrames::new();
        let scheduler = FrameScheduler::new(Rationed {
            frames: frames.clone(),
            left: Cell::new(3),
        });
        let (count, on_frame) = counter();
        assert!(scheduler.start(on_frame));

        frames.pump_n(10);
        assert_eq!(count.get(), 3);
        assert_eq!(scheduler.state(), SchedulerState::Cancelled);
        assert_eq!(frames.pending(), 0);
    }
}
