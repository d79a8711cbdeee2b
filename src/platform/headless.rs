//! Deterministic in-process host
//!
//! Frames only advance when pumped and the viewport only changes when told
//! to, which makes lifecycle behaviour reproducible in tests and in the
//! native demo.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use super::{Host, ResizeHandler, Viewport};
use crate::renderer::RecordingSurface;
use crate::scheduler::{FrameCallback, FrameSource};

/// Nominal frame interval (ms) reported as timestamps
pub const FRAME_INTERVAL_MS: f64 = 1000.0 / 60.0;

#[derive(Default)]
struct FrameQueue {
    next_id: u64,
    now: f64,
    pending: Vec<(u64, FrameCallback)>,
}

/// Manually pumped frame primitive. Clones share one queue.
#[derive(Clone, Default)]
pub struct ManualFrames {
    queue: Rc<RefCell<FrameQueue>>,
}

impl ManualFrames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Callbacks waiting for the next pump
    pub fn pending(&self) -> usize {
        self.queue.borrow().pending.len()
    }

    /// Deliver one display frame: every callback queued before this call
    /// runs once (unless cancelled meanwhile). Returns how many ran.
    pub fn pump(&self) -> usize {
        let (due, now) = {
            let mut queue = self.queue.borrow_mut();
            queue.now += FRAME_INTERVAL_MS;
            let due: Vec<u64> = queue.pending.iter().map(|(id, _)| *id).collect();
            (due, queue.now)
        };

        let mut ran = 0;
        for id in due {
            let callback = {
                let mut queue = self.queue.borrow_mut();
                queue
                    .pending
                    .iter()
                    .position(|(pending_id, _)| *pending_id == id)
                    .map(|index| queue.pending.remove(index).1)
            };
            if let Some(callback) = callback {
                callback(now);
                ran += 1;
            }
        }
        ran
    }

    /// Pump `n` frames; returns the total number of callbacks run
    pub fn pump_n(&self, n: usize) -> usize {
        (0..n).map(|_| self.pump()).sum()
    }
}

impl FrameSource for ManualFrames {
    type Handle = u64;

    fn request_frame(&self, callback: FrameCallback) -> Option<u64> {
        let mut queue = self.queue.borrow_mut();
        let id = queue.next_id;
        queue.next_id += 1;
        queue.pending.push((id, callback));
        Some(id)
    }

    fn cancel_frame(&self, handle: u64) {
        self.queue
            .borrow_mut()
            .pending
            .retain(|(id, _)| *id != handle);
    }
}

type SharedHandler = Rc<RefCell<ResizeHandler>>;

#[derive(Default)]
struct ResizeListeners {
    next_id: u64,
    handlers: Vec<(u64, SharedHandler)>,
}

/// Registration guard returned by [`HeadlessHost::subscribe_resize`]
pub struct HeadlessSubscription {
    id: u64,
    listeners: Weak<RefCell<ResizeListeners>>,
}

impl Drop for HeadlessSubscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.borrow_mut().handlers.retain(|(id, _)| *id != self.id);
        }
    }
}

pub struct HeadlessHost {
    viewport: Cell<Viewport>,
    surface: Option<RecordingSurface>,
    frames: ManualFrames,
    listeners: Rc<RefCell<ResizeListeners>>,
}

impl HeadlessHost {
    /// Host with a recording surface
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport: Cell::new(viewport),
            surface: Some(RecordingSurface::new()),
            frames: ManualFrames::new(),
            listeners: Rc::new(RefCell::new(ResizeListeners::default())),
        }
    }

    /// Host whose drawing surface is unavailable
    pub fn without_surface(viewport: Viewport) -> Self {
        Self {
            surface: None,
            ..Self::new(viewport)
        }
    }

    /// Handle on the recording surface (shares its log)
    pub fn recording(&self) -> Option<RecordingSurface> {
        self.surface.clone()
    }

    /// Handle on the frame queue
    pub fn frames(&self) -> ManualFrames {
        self.frames.clone()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().handlers.len()
    }

    /// Change the viewport and notify every subscriber
    pub fn resize(&self, viewport: Viewport) {
        self.viewport.set(viewport);
        let handlers: Vec<SharedHandler> = self
            .listeners
            .borrow()
            .handlers
            .iter()
            .map(|(_, handler)| Rc::clone(handler))
            .collect();
        for handler in handlers {
            (handler.borrow_mut())(viewport);
        }
    }
}

impl Host for HeadlessHost {
    type Surface = RecordingSurface;
    type Frames = ManualFrames;
    type Subscription = HeadlessSubscription;

    fn acquire_surface(&mut self) -> Option<RecordingSurface> {
        self.surface.clone()
    }

    fn viewport(&self) -> Viewport {
        self.viewport.get()
    }

    fn frame_source(&self) -> ManualFrames {
        self.frames.clone()
    }

    fn subscribe_resize(&self, handler: ResizeHandler) -> HeadlessSubscription {
        let mut listeners = self.listeners.borrow_mut();
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.handlers.push((id, Rc::new(RefCell::new(handler))));
        HeadlessSubscription {
            id,
            listeners: Rc::downgrade(&self.listeners),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pump_defers_rescheduled_callbacks() {
        let frames = ManualFrames::new();
        let inner = frames.clone();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        frames.request_frame(Box::new(move |_| {
            h.set(h.get() + 1);
            let h = Rc::clone(&h);
            inner.request_frame(Box::new(move |_| h.set(h.get() + 1)));
        }));

        assert_eq!(frames.pump(), 1);
        assert_eq!(hits.get(), 1);
        assert_eq!(frames.pending(), 1);
        assert_eq!(frames.pump(), 1);
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn test_cancelled_frame_never_runs() {
        let frames = ManualFrames::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let id = frames.request_frame(Box::new(move |_| h.set(h.get() + 1))).unwrap();
        frames.cancel_frame(id);
        assert_eq!(frames.pump(), 0);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_subscription_drop_unsubscribes() {
        let host = HeadlessHost::new(Viewport::new(800, 600));
        let seen = Rc::new(Cell::new(Viewport::new(0, 0)));
        let s = Rc::clone(&seen);
        let sub = host.subscribe_resize(Box::new(move |vp| s.set(vp)));
        assert_eq!(host.listener_count(), 1);

        host.resize(Viewport::new(1024, 768));
        assert_eq!(seen.get(), Viewport::new(1024, 768));
        assert_eq!(host.viewport(), Viewport::new(1024, 768));

        drop(sub);
        assert_eq!(host.listener_count(), 0);
        host.resize(Viewport::new(320, 240));
        assert_eq!(seen.get(), Viewport::new(1024, 768));
    }

    #[test]
    fn test_without_surface() {
        let mut host = HeadlessHost::without_surface(Viewport::new(800, 600));
        assert!(host.acquire_surface().is_none());
        assert!(host.recording().is_none());
    }
}
