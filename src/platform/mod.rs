//! Platform abstraction layer
//!
//! Handles browser/headless differences for:
//! - Drawing-surface acquisition
//! - Viewport size and resize notifications
//! - The per-frame scheduling primitive

pub mod headless;
#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::renderer::Surface;
use crate::scheduler::FrameSource;

/// Viewport size in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

pub type ResizeHandler = Box<dyn FnMut(Viewport)>;

/// Everything the field consumes from its environment
pub trait Host {
    type Surface: Surface + 'static;
    type Frames: FrameSource + 'static;
    /// Keeps a resize handler registered; dropping it unsubscribes
    type Subscription: 'static;

    /// The drawing surface, or `None` when there is nothing to draw on
    fn acquire_surface(&mut self) -> Option<Self::Surface>;

    fn viewport(&self) -> Viewport;

    fn frame_source(&self) -> Self::Frames;

    fn subscribe_resize(&self, handler: ResizeHandler) -> Self::Subscription;
}

/// Seed for hosts that do not supply one
#[cfg(target_arch = "wasm32")]
pub fn clock_seed() -> u64 {
    js_sys::Date::now() as u64
}

/// Seed for hosts that do not supply one
#[cfg(not(target_arch = "wasm32"))]
pub fn clock_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
