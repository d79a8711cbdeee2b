//! Per-frame simulation tick
//!
//! Advances every particle by exactly one step, in store order.

use super::motion::step;
use super::state::FieldState;

/// What happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    pub stepped: usize,
    pub reflections: usize,
}

/// Advance the field by one tick
pub fn tick(state: &mut FieldState) -> TickStats {
    let surface = state.surface;
    let mut stats = TickStats::default();

    for particle in state.store.iter_mut() {
        let reflection = step(particle, &surface);
        stats.stepped += 1;
        stats.reflections += usize::from(reflection.x) + usize::from(reflection.y);
    }

    state.time_ticks += 1;
    state.particle_steps += stats.stepped as u64;

    if stats.reflections > 0 {
        log::trace!(
            "tick {}: {} wall reflections",
            state.time_ticks,
            stats.reflections
        );
    }

    stats
}
