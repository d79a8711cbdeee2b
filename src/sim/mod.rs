//! Particle simulation module
//!
//! All motion logic lives here. This module must stay pure and deterministic:
//! - One fixed step per tick, no time delta
//! - Seeded RNG only (spawn time)
//! - Stable iteration order (store index)
//! - No rendering or platform dependencies

pub mod motion;
pub mod particle;
pub mod state;
pub mod surface;
pub mod tick;

pub use motion::{Reflection, step};
pub use particle::{Particle, ParticleStore, SpawnParams};
pub use state::FieldState;
pub use surface::SurfaceState;
pub use tick::{TickStats, tick};
