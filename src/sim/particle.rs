//! Particle data and the fixed-length particle store

use glam::Vec2;
use rand::Rng;

use super::surface::SurfaceState;
use crate::consts::*;

/// A single ambient dot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    /// Per-tick displacement; only ever sign-flipped after spawn
    pub vel: Vec2,
    /// Disc radius, fixed at spawn
    pub radius: f32,
}

impl Particle {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self { pos, vel, radius }
    }
}

/// Sampling ranges used when populating a store
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnParams {
    pub count: usize,
    /// Each velocity component is drawn from `[-max_speed, max_speed)`
    pub max_speed: f32,
    pub radius_min: f32,
    pub radius_max: f32,
}

impl Default for SpawnParams {
    fn default() -> Self {
        Self {
            count: PARTICLE_COUNT,
            max_speed: MAX_SPEED,
            radius_min: RADIUS_MIN,
            radius_max: RADIUS_MAX,
        }
    }
}

/// Ordered, fixed-length particle sequence.
///
/// Backed by a boxed slice: after `spawn` particles can be mutated in place
/// but never added or removed.
#[derive(Debug, Clone)]
pub struct ParticleStore {
    particles: Box<[Particle]>,
}

impl ParticleStore {
    /// Populate a store uniformly over `[0,width) x [0,height)`
    pub fn spawn<R: Rng + ?Sized>(surface: &SurfaceState, params: &SpawnParams, rng: &mut R) -> Self {
        let radius_span = params.radius_max - params.radius_min;
        let particles = (0..params.count)
            .map(|_| {
                let pos = Vec2::new(
                    rng.random::<f32>() * surface.width,
                    rng.random::<f32>() * surface.height,
                );
                let vel = Vec2::new(
                    (rng.random::<f32>() - 0.5) * 2.0 * params.max_speed,
                    (rng.random::<f32>() - 0.5) * 2.0 * params.max_speed,
                );
                let radius = params.radius_min + rng.random::<f32>() * radius_span;
                Particle::new(pos, vel, radius)
            })
            .collect();

        Self { particles }
    }

    /// Build a store from explicit particles (fixtures, replays)
    pub fn from_particles(particles: Vec<Particle>) -> Self {
        Self {
            particles: particles.into_boxed_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Particle> {
        self.particles.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawn_count_and_ranges() {
        let surface = SurfaceState::new(800.0, 600.0);
        let mut rng = Pcg32::seed_from_u64(7);
        let store = ParticleStore::spawn(&surface, &SpawnParams::default(), &mut rng);

        assert_eq!(store.len(), PARTICLE_COUNT);
        for p in store.iter() {
            assert!(p.pos.x >= 0.0 && p.pos.x < 800.0);
            assert!(p.pos.y >= 0.0 && p.pos.y < 600.0);
            assert!(p.vel.x >= -MAX_SPEED && p.vel.x < MAX_SPEED);
            assert!(p.vel.y >= -MAX_SPEED && p.vel.y < MAX_SPEED);
            assert!(p.radius >= RADIUS_MIN && p.radius < RADIUS_MAX);
        }
    }

    #[test]
    fn test_spawn_is_seeded() {
        let surface = SurfaceState::new(1280.0, 720.0);
        let params = SpawnParams::default();
        let a = ParticleStore::spawn(&surface, &params, &mut Pcg32::seed_from_u64(42));
        let b = ParticleStore::spawn(&surface, &params, &mut Pcg32::seed_from_u64(42));
        assert_eq!(a.as_slice(), b.as_slice());
    }

    #[test]
    fn test_zero_sized_surface_still_spawns() {
        let surface = SurfaceState::new(0.0, 0.0);
        let params = SpawnParams {
            count: 3,
            ..Default::default()
        };
        let store = ParticleStore::spawn(&surface, &params, &mut Pcg32::seed_from_u64(1));
        assert_eq!(store.len(), 3);
        assert!(store.iter().all(|p| p.pos == Vec2::ZERO));
    }
}
