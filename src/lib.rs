//! Particle Field - ambient proximity-linked particles behind page content
//!
//! Core modules:
//! - `sim`: Particle store, motion model and per-tick update
//! - `renderer`: Drawing surfaces (Canvas2D, WebGPU, recording) and the proximity renderer
//! - `scheduler`: Cancellable frame loop on top of a per-frame primitive
//! - `platform`: Browser/headless host abstraction
//! - `lifecycle`: Mount/unmount binding of the whole subsystem
//! - `settings`: Tunables, quality presets, LocalStorage persistence

pub mod lifecycle;
pub mod platform;
pub mod renderer;
pub mod scheduler;
pub mod settings;
pub mod sim;

pub use lifecycle::{MountedField, mount};
pub use settings::{FieldSettings, QualityPreset, RenderBackend};

/// Field configuration constants
pub mod consts {
    /// Particles spawned per mounted instance
    pub const PARTICLE_COUNT: usize = 50;
    /// Hard cap on particle count (pair scan is O(N²))
    pub const MAX_PARTICLES: usize = 256;

    /// Pairs closer than this (px) are linked
    pub const PROXIMITY_THRESHOLD: f32 = 150.0;
    /// Link opacity at distance 0, fading linearly to 0 at the threshold
    pub const LINK_BASE_ALPHA: f32 = 0.15;
    /// Link stroke width (px)
    pub const LINK_WIDTH: f32 = 1.0;

    /// Half-range of each velocity component (px per tick)
    pub const MAX_SPEED: f32 = 0.25;
    /// Smallest disc radius (px)
    pub const RADIUS_MIN: f32 = 1.0;
    /// Largest disc radius (px), exclusive when sampling
    pub const RADIUS_MAX: f32 = 3.0;

    /// Violet tone shared by discs and links
    pub const PARTICLE_RGB: [u8; 3] = [139, 92, 246];
    /// Disc fill opacity
    pub const PARTICLE_ALPHA: f32 = 0.3;

    /// DOM id of the canvas the web host draws on
    pub const CANVAS_ELEMENT_ID: &str = "particle-field";
}
