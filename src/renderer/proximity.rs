//! Proximity renderer
//!
//! Each frame: clear, draw every particle as a translucent disc, then link
//! every unordered pair closer than the threshold with a line whose opacity
//! falls linearly to zero at the threshold.
//!
//! The pair scan is O(N²). That is fine for the few dozen particles a
//! background carries and is why the particle count is capped.

use glam::Vec2;

use super::Surface;
use super::color::Rgba;
use crate::consts::*;
use crate::settings::FieldSettings;
use crate::sim::{Particle, SurfaceState};

/// A connection between particles `a < b`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub a: usize,
    pub b: usize,
    pub distance: f32,
    pub alpha: f32,
}

/// Line opacity for a pair at `distance`, or `None` when not linked.
///
/// `base` at distance 0, exactly 0 at `threshold`; pairs at or beyond the
/// threshold are not drawn.
#[inline]
pub fn link_alpha(distance: f32, threshold: f32, base: f32) -> Option<f32> {
    if distance < threshold {
        Some(base * (1.0 - distance / threshold))
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProximityRenderer {
    pub particle_color: Rgba,
    /// Link colour at full opacity; alpha is replaced per link
    pub link_color: Rgba,
    pub threshold: f32,
    pub link_base_alpha: f32,
    pub link_width: f32,
}

impl Default for ProximityRenderer {
    fn default() -> Self {
        Self {
            particle_color: Rgba::from_rgb(PARTICLE_RGB, PARTICLE_ALPHA),
            link_color: Rgba::from_rgb(PARTICLE_RGB, 1.0),
            threshold: PROXIMITY_THRESHOLD,
            link_base_alpha: LINK_BASE_ALPHA,
            link_width: LINK_WIDTH,
        }
    }
}

impl ProximityRenderer {
    pub fn from_settings(settings: &FieldSettings) -> Self {
        Self {
            particle_color: Rgba::from_rgb(settings.color, settings.particle_alpha),
            link_color: Rgba::from_rgb(settings.color, 1.0),
            threshold: settings.proximity_threshold,
            link_base_alpha: settings.link_base_alpha,
            link_width: settings.link_width,
        }
    }

    /// Every linked pair, each unordered pair visited once (i < j)
    pub fn links<'a>(&self, particles: &'a [Particle]) -> impl Iterator<Item = Link> + use<'a> {
        let threshold = self.threshold;
        let base = self.link_base_alpha;
        particles.iter().enumerate().flat_map(move |(i, p1)| {
            particles[i + 1..]
                .iter()
                .enumerate()
                .filter_map(move |(offset, p2)| {
                    let distance = p1.pos.distance(p2.pos);
                    link_alpha(distance, threshold, base).map(|alpha| Link {
                        a: i,
                        b: i + 1 + offset,
                        distance,
                        alpha,
                    })
                })
        })
    }

    /// Draw one frame; returns the number of links drawn
    pub fn render<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        particles: &[Particle],
        bounds: &SurfaceState,
    ) -> usize {
        surface.clear(bounds.width, bounds.height);

        for p in particles {
            surface.fill_disc(p.pos, p.radius, self.particle_color);
        }

        let mut drawn = 0;
        for link in self.links(particles) {
            let from: Vec2 = particles[link.a].pos;
            let to: Vec2 = particles[link.b].pos;
            surface.stroke_line(from, to, self.link_width, self.link_color.with_alpha(link.alpha));
            drawn += 1;
        }

        surface.present();
        drawn
    }
}
