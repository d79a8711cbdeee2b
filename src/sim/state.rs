//! Field state owned by one mounted instance

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::particle::{ParticleStore, SpawnParams};
use super::surface::SurfaceState;

/// Everything the per-frame update mutates.
///
/// Created once on mount, dropped on unmount; there is no global copy.
#[derive(Debug, Clone)]
pub struct FieldState {
    /// Seed the store was spawned from
    pub seed: u64,
    pub surface: SurfaceState,
    pub store: ParticleStore,
    /// Completed ticks
    pub time_ticks: u64,
    /// Total motion-model invocations
    pub particle_steps: u64,
}

impl FieldState {
    /// Spawn a fresh store sized to `surface`
    pub fn new(seed: u64, surface: SurfaceState, params: &SpawnParams) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let store = ParticleStore::spawn(&surface, params, &mut rng);
        Self::with_store(seed, surface, store)
    }

    /// Wrap an existing store
    pub fn with_store(seed: u64, surface: SurfaceState, store: ParticleStore) -> Self {
        Self {
            seed,
            surface,
            store,
            time_ticks: 0,
            particle_steps: 0,
        }
    }

    /// Track a viewport change. Particles are deliberately left where they are.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.surface.resize(width, height);
    }
}
