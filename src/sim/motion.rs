//! Motion model: one independent step per particle with wall reflection

use super::particle::Particle;
use super::surface::SurfaceState;

/// Which velocity components were flipped during a step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reflection {
    pub x: bool,
    pub y: bool,
}

impl Reflection {
    pub fn any(&self) -> bool {
        self.x || self.y
    }
}

/// Advance a particle by one tick.
///
/// A velocity component is negated when the particle sits outside the
/// surface on that axis and is still heading away from it; then
/// `pos += vel`. Walls are not clamped, so a particle may overshoot by one
/// step before the next tick turns it around. Particles stranded outside a
/// shrunk surface drift back in monotonically.
pub fn step(particle: &mut Particle, surface: &SurfaceState) -> Reflection {
    let reflection = Reflection {
        x: heading_out(particle.pos.x, particle.vel.x, surface.width),
        y: heading_out(particle.pos.y, particle.vel.y, surface.height),
    };

    if reflection.x {
        particle.vel.x = -particle.vel.x;
    }
    if reflection.y {
        particle.vel.y = -particle.vel.y;
    }

    particle.pos += particle.vel;
    reflection
}

#[inline]
fn heading_out(coord: f32, vel: f32, extent: f32) -> bool {
    (coord < 0.0 && vel < 0.0) || (coord > extent && vel > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use proptest::prelude::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_free_step_moves_by_velocity() {
        let surface = SurfaceState::new(800.0, 600.0);
        let mut p = Particle::new(Vec2::new(100.0, 100.0), Vec2::new(0.2, -0.1), 2.0);
        let r = step(&mut p, &surface);
        assert!(!r.any());
        assert!(approx(p.pos.x, 100.2));
        assert!(approx(p.pos.y, 99.9));
        assert_eq!(p.vel, Vec2::new(0.2, -0.1));
    }

    #[test]
    fn test_left_wall_reflection() {
        let surface = SurfaceState::new(800.0, 600.0);
        let mut p = Particle::new(Vec2::new(-1.0, 50.0), Vec2::new(-0.3, 0.1), 1.5);

        let r = step(&mut p, &surface);
        assert_eq!(r, Reflection { x: true, y: false });
        assert_eq!(p.vel, Vec2::new(0.3, 0.1));
        assert!(approx(p.pos.x, -0.7));
        assert!(approx(p.pos.y, 50.1));

        // Keeps heading inward on later ticks instead of flipping back
        step(&mut p, &surface);
        assert_eq!(p.vel, Vec2::new(0.3, 0.1));
        assert!(approx(p.pos.x, -0.4));
        for _ in 0..3 {
            step(&mut p, &surface);
        }
        assert!(surface.contains_x(p.pos.x));
    }

    #[test]
    fn test_exit_from_inside_flips_on_the_following_tick() {
        // f32 spacing near 800 is ~6e-5
        let near = |a: f32, b: f32| (a - b).abs() < 1e-3;
        let surface = SurfaceState::new(800.0, 600.0);
        let mut p = Particle::new(Vec2::new(799.9, 300.0), Vec2::new(0.3, 0.0), 1.0);

        // Starts inside: moves out unreflected
        let r = step(&mut p, &surface);
        assert!(!r.any());
        assert!(near(p.pos.x, 800.2));
        assert_eq!(p.vel.x, 0.3);

        // Starts outside heading out: flips, then moves back in
        let r = step(&mut p, &surface);
        assert_eq!(r, Reflection { x: true, y: false });
        assert!(near(p.pos.x, 799.9));
        assert_eq!(p.vel.x, -0.3);

        let r = step(&mut p, &surface);
        assert!(!r.any());
        assert!(near(p.pos.x, 799.6));
    }

    #[test]
    fn test_right_and_bottom_walls_flip_independently() {
        let surface = SurfaceState::new(800.0, 600.0);
        let mut p = Particle::new(Vec2::new(800.1, 300.0), Vec2::new(0.25, 0.2), 1.0);
        let r = step(&mut p, &surface);
        assert_eq!(r, Reflection { x: true, y: false });
        assert_eq!(p.vel, Vec2::new(-0.25, 0.2));

        let mut p = Particle::new(Vec2::new(400.0, 600.2), Vec2::new(0.1, 0.2), 1.0);
        let r = step(&mut p, &surface);
        assert_eq!(r, Reflection { x: false, y: true });
        assert_eq!(p.vel, Vec2::new(0.1, -0.2));
    }

    #[test]
    fn test_outside_but_heading_in_is_untouched() {
        let surface = SurfaceState::new(800.0, 600.0);
        let mut p = Particle::new(Vec2::new(900.0, -5.0), Vec2::new(-0.2, 0.2), 1.0);
        let r = step(&mut p, &surface);
        assert!(!r.any());
        assert_eq!(p.vel, Vec2::new(-0.2, 0.2));
    }

    #[test]
    fn test_exactly_on_wall_does_not_reflect() {
        let surface = SurfaceState::new(800.0, 600.0);
        let mut p = Particle::new(Vec2::new(0.0, 600.0), Vec2::new(-0.1, 0.1), 1.0);
        let r = step(&mut p, &surface);
        assert!(!r.any());
    }

    proptest! {
        #[test]
        fn prop_stays_within_one_step(
            x in 0.0f32..1.0,
            y in 0.0f32..1.0,
            vx in -0.25f32..0.25,
            vy in -0.25f32..0.25,
            width in 1.0f32..2000.0,
            height in 1.0f32..2000.0,
            ticks in 1usize..1500,
        ) {
            let surface = SurfaceState::new(width, height);
            let mut p = Particle::new(Vec2::new(x * width, y * height), Vec2::new(vx, vy), 2.0);
            let tol_x = vx.abs() + 1e-3;
            let tol_y = vy.abs() + 1e-3;
            for _ in 0..ticks {
                step(&mut p, &surface);
                prop_assert!(p.pos.x >= -tol_x && p.pos.x <= width + tol_x);
                prop_assert!(p.pos.y >= -tol_y && p.pos.y <= height + tol_y);
            }
        }

        #[test]
        fn prop_reflection_is_sign_only(
            x in -50.0f32..850.0,
            y in -50.0f32..650.0,
            vx in -0.25f32..0.25,
            vy in -0.25f32..0.25,
        ) {
            let surface = SurfaceState::new(800.0, 600.0);
            let mut p = Particle::new(Vec2::new(x, y), Vec2::new(vx, vy), 2.0);
            let r = step(&mut p, &surface);
            prop_assert_eq!(p.vel.x.abs(), vx.abs());
            prop_assert_eq!(p.vel.y.abs(), vy.abs());
            prop_assert_eq!(p.vel.x == -vx && vx != 0.0, r.x);
            prop_assert_eq!(p.vel.y == -vy && vy != 0.0, r.y);
        }

        #[test]
        fn prop_stranded_particles_converge(
            overshoot in 1.0f32..400.0,
            vx in 0.05f32..0.25,
        ) {
            // Surface shrank underneath a particle moving further out
            let surface = SurfaceState::new(400.0, 400.0);
            let mut p = Particle::new(Vec2::new(400.0 + overshoot, 200.0), Vec2::new(vx, 0.0), 2.0);
            let mut last = p.pos.x;
            step(&mut p, &surface);
            for _ in 0..(overshoot / vx) as usize + 2 {
                prop_assert!(p.pos.x <= last);
                last = p.pos.x;
                step(&mut p, &surface);
            }
            prop_assert!(surface.contains_x(p.pos.x));
        }
    }
}
