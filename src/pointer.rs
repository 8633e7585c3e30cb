// Last known mouse position, and the soft positional push it applies to
// nearby particles each frame

use crate::particle::Particle;
use vecmath::Vector2;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pointer {
    pub pos: Vector2<f64>,
}

impl Pointer {
    pub fn new(x: f64, y: f64) -> Self {
        Pointer { pos: [x, y] }
    }

    /// Nudges `particle` away from the pointer by `strength` times their
    /// separation when it sits strictly inside `radius`. Velocity is left
    /// alone. A particle exactly on the pointer has no direction to be
    /// pushed in and stays put, as does everything when the distance is
    /// not a number. Returns whether the particle moved.
    pub fn repel(&self, particle: &mut Particle, radius: f64, strength: f64) -> bool {
        let to_pointer = vecmath::vec2_sub(self.pos, particle.pos);
        let distance = vecmath::vec2_len(to_pointer);
        if !(distance > 0.0 && distance < radius) {
            return false;
        }
        particle.pos = vecmath::vec2_sub(particle.pos, vecmath::vec2_scale(to_pointer, strength));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pushes_away_proportionally() {
        let pointer = Pointer::new(50.0, 50.0);
        let mut p = Particle::new(40.0, 50.0, 0.1, 0.1, 1.0, 1.0);
        assert!(pointer.repel(&mut p, 100.0, 0.01));
        assert!((p.pos[0] - 39.9).abs() < 1e-12);
        assert_eq!(p.pos[1], 50.0);
        assert_eq!(p.vel, [0.1, 0.1]);
    }

    #[test]
    fn ignores_particles_at_or_beyond_radius() {
        let pointer = Pointer::new(0.0, 0.0);
        let mut p = Particle::new(100.0, 0.0, 0.0, 0.0, 1.0, 1.0);
        assert!(!pointer.repel(&mut p, 100.0, 0.01));
        assert_eq!(p.pos, [100.0, 0.0]);
    }

    #[test]
    fn coincident_particle_does_not_move() {
        let pointer = Pointer::new(10.0, 10.0);
        let mut p = Particle::new(10.0, 10.0, 0.0, 0.0, 1.0, 1.0);
        assert!(!pointer.repel(&mut p, 100.0, 0.01));
        assert_eq!(p.pos, [10.0, 10.0]);
    }

    #[test]
    fn nan_pointer_leaves_particle_alone() {
        let pointer = Pointer::new(f64::NAN, 10.0);
        let mut p = Particle::new(50.0, 50.0, 0.0, 0.0, 1.0, 1.0);
        assert!(!pointer.repel(&mut p, 100.0, 0.01));
        assert_eq!(p.pos, [50.0, 50.0]);
    }
}
