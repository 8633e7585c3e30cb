// The particle field: owns every particle, the surface size and the last
// pointer position, and knows how to advance and draw itself one frame at a
// time. Nothing here touches the DOM.

use crate::config::{BoundaryPolicy, FieldConfig};
use crate::particle::Particle;
use crate::pointer::Pointer;
use crate::renderer::Surface;
use rand::Rng;

/// A connection line between two particles closer than the link distance.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Link {
    pub a: usize,
    pub b: usize,
    pub distance: f64,
    pub opacity: f64,
}

pub struct ParticleField {
    config: FieldConfig,
    width: f64,
    height: f64,
    particles: Vec<Particle>,
    pointer: Option<Pointer>,
}

impl ParticleField {
    /// A field populated with `config.particle_count` random particles.
    pub fn new(config: FieldConfig, width: f64, height: f64) -> ParticleField {
        ParticleField::with_rng(config, width, height, &mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng>(config: FieldConfig, width: f64, height: f64, rng: &mut R) -> ParticleField {
        let count = config.particle_count;
        let mut field = ParticleField::empty(config, width, height);
        field.initialize_with_rng(count, width, height, rng);
        field
    }

    pub fn empty(config: FieldConfig, width: f64, height: f64) -> ParticleField {
        ParticleField {
            config,
            width: width.max(0.0),
            height: height.max(0.0),
            particles: Vec::new(),
            pointer: None,
        }
    }

    pub fn initialize(&mut self, count: usize, width: f64, height: f64) {
        self.initialize_with_rng(count, width, height, &mut rand::thread_rng());
    }

    /// Replaces every particle with `count` fresh ones: uniform position on
    /// the surface, uniform velocity components in `[-speed, speed)`, and
    /// radius and opacity drawn from their configured ranges.
    pub fn initialize_with_rng<R: Rng>(&mut self, count: usize, width: f64, height: f64, rng: &mut R) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        self.particles.clear();
        self.particles.reserve(count);

        let speed = self.config.speed;
        for _ in 0..count {
            let pos_x = sample(rng, (0.0, self.width));
            let pos_y = sample(rng, (0.0, self.height));
            let vel_x = sample(rng, (-speed, speed));
            let vel_y = sample(rng, (-speed, speed));
            let radius = sample(rng, self.config.radius);
            let opacity = sample(rng, self.config.opacity);
            self.particles
                .push(Particle::new(pos_x, pos_y, vel_x, vel_y, radius, opacity));
        }
    }

    /// Advances every particle by `dt_frames` frames of motion, then applies
    /// the boundary policy and, if enabled, pointer repulsion.
    pub fn step(&mut self, dt_frames: f64) {
        let bounds = [self.width, self.height];
        let boundary = self.config.boundary;
        let repulsion = match (self.config.repulsion, self.pointer) {
            (Some(repulsion), Some(pointer)) => Some((repulsion, pointer)),
            _ => None,
        };

        for particle in &mut self.particles {
            particle.advance(dt_frames);
            match boundary {
                BoundaryPolicy::Wrap => particle.wrap(bounds),
                BoundaryPolicy::Reflect => particle.reflect(bounds),
            }
            if let Some((repulsion, pointer)) = repulsion {
                let moved = pointer.repel(particle, repulsion.radius, repulsion.strength);
                // A push can carry a wrapped particle back over an edge
                if moved && boundary == BoundaryPolicy::Wrap {
                    particle.wrap(bounds);
                }
            }
        }
    }

    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.clear(self.width, self.height);

        for p in &self.particles {
            surface.fill_circle(p.pos, p.radius, self.config.color.fade(p.opacity));
        }

        if let Some(style) = self.config.links {
            for link in self.links() {
                surface.stroke_line(
                    self.particles[link.a].pos,
                    self.particles[link.b].pos,
                    style.width,
                    self.config.color.fade(link.opacity),
                );
            }
        }
    }

    /// Every pair of particles close enough to be joined by a line this
    /// frame. Checks all N(N-1)/2 pairs; `MAX_PARTICLES` keeps that bounded.
    pub fn links(&self) -> Vec<Link> {
        let style = match self.config.links {
            Some(style) => style,
            None => return Vec::new(),
        };

        let mut links = Vec::new();
        for (i, a) in self.particles.iter().enumerate() {
            for (j, b) in self.particles.iter().enumerate().skip(i + 1) {
                let distance = vecmath::vec2_len(vecmath::vec2_sub(a.pos, b.pos));
                if distance < style.distance {
                    links.push(Link {
                        a: i,
                        b: j,
                        distance,
                        opacity: line_opacity(distance, style.distance, style.opacity),
                    });
                }
            }
        }
        links
    }

    /// Positions are kept as-is; the boundary policy pulls strays back in.
    pub fn resize(&mut self, width: f64, height: f64) {
        if self.config.respawn_on_resize {
            let count = self.config.particle_count;
            self.initialize(count, width, height);
        } else {
            self.width = width.max(0.0);
            self.height = height.max(0.0);
        }
    }

    /// Non-finite coordinates are ignored and the previous pointer kept.
    pub fn set_pointer(&mut self, x: f64, y: f64) {
        if !x.is_finite() || !y.is_finite() {
            log::debug!("ignoring non-finite pointer ({}, {})", x, y);
            return;
        }
        self.pointer = Some(Pointer::new(x, y));
    }

    pub fn clear_pointer(&mut self) {
        self.pointer = None;
    }

    pub fn pointer(&self) -> Option<Pointer> {
        self.pointer
    }

    pub fn spawn(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }
}

/// Linear falloff: `base` for coincident particles, 0 at `threshold`.
pub fn line_opacity(distance: f64, threshold: f64, base: f64) -> f64 {
    if threshold <= 0.0 {
        return 0.0;
    }
    (base * (1.0 - distance / threshold)).max(0.0).min(base)
}

fn sample<R: Rng>(rng: &mut R, (min, max): (f64, f64)) -> f64 {
    if max > min {
        rng.gen_range(min, max)
    } else {
        min
    }
}
