// Simple particle struct to keep track of individual position, velocity,
// radius and opacity. Radius and opacity never change after creation.

use vecmath::Vector2;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Particle {
    pub pos: Vector2<f64>,
    pub vel: Vector2<f64>,
    pub radius: f64,
    pub opacity: f64,
}

impl Particle {
    pub fn new(pos_x: f64, pos_y: f64, vel_x: f64, vel_y: f64, radius: f64, opacity: f64) -> Particle {
        Particle {
            pos: [pos_x, pos_y],
            vel: [vel_x, vel_y],
            radius,
            opacity,
        }
    }

    pub fn advance(&mut self, dt_frames: f64) {
        self.pos = vecmath::vec2_add(self.pos, vecmath::vec2_scale(self.vel, dt_frames));
    }

    pub fn speed(&self) -> f64 {
        vecmath::vec2_len(self.vel)
    }

    // Teleport to the opposite edge on each axis that left [0, bound)
    pub fn wrap(&mut self, bounds: Vector2<f64>) {
        for axis in 0..2 {
            self.pos[axis] = wrap_axis(self.pos[axis], bounds[axis]);
        }
    }

    // Elastic bounce: only flips a velocity component that is still carrying
    // the particle further out, so each crossing flips exactly once.
    pub fn reflect(&mut self, bounds: Vector2<f64>) {
        for axis in 0..2 {
            let p = self.pos[axis];
            let v = self.vel[axis];
            if (p < 0.0 && v < 0.0) || (p > bounds[axis] && v > 0.0) {
                self.vel[axis] = -v;
            }
        }
    }
}

/// Landing coordinate for a particle that wrapped past 0 on an axis of
/// length `bound`: the last whole unit inside the surface.
pub fn far_edge(bound: f64) -> f64 {
    (bound - 1.0).max(0.0)
}

fn wrap_axis(p: f64, bound: f64) -> f64 {
    if p >= bound {
        0.0
    } else if p < 0.0 {
        far_edge(bound)
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_adds_scaled_velocity() {
        let mut p = Particle::new(10.0, 10.0, 0.5, -0.25, 1.0, 1.0);
        p.advance(1.0);
        assert_eq!(p.pos, [10.5, 9.75]);
        p.advance(2.0);
        assert_eq!(p.pos, [11.5, 9.25]);
    }

    #[test]
    fn wrap_past_upper_bound_resets_to_zero() {
        let mut p = Particle::new(100.0, 150.0, 0.0, 0.0, 1.0, 1.0);
        p.wrap([100.0, 100.0]);
        assert_eq!(p.pos, [0.0, 0.0]);
    }

    #[test]
    fn wrap_below_zero_lands_on_far_edge() {
        let mut p = Particle::new(-0.1, -3.0, 0.0, 0.0, 1.0, 1.0);
        p.wrap([100.0, 40.0]);
        assert_eq!(p.pos, [99.0, 39.0]);
    }

    #[test]
    fn wrap_leaves_inside_points_alone() {
        let mut p = Particle::new(0.0, 99.99, 0.0, 0.0, 1.0, 1.0);
        p.wrap([100.0, 100.0]);
        assert_eq!(p.pos, [0.0, 99.99]);
    }

    #[test]
    fn far_edge_never_negative() {
        assert_eq!(far_edge(100.0), 99.0);
        assert_eq!(far_edge(0.5), 0.0);
        assert_eq!(far_edge(0.0), 0.0);
    }

    #[test]
    fn reflect_flips_only_outward_motion() {
        let mut p = Particle::new(-0.2, 50.0, -0.3, 0.1, 1.0, 1.0);
        p.reflect([100.0, 100.0]);
        assert_eq!(p.vel, [0.3, 0.1]);
        // still outside but now heading back in: no second flip
        p.reflect([100.0, 100.0]);
        assert_eq!(p.vel, [0.3, 0.1]);
        // position untouched
        assert_eq!(p.pos, [-0.2, 50.0]);
    }

    #[test]
    fn reflect_conserves_speed() {
        let mut p = Particle::new(101.0, -1.0, 0.2, -0.15, 1.0, 1.0);
        let before = p.speed();
        p.reflect([100.0, 100.0]);
        assert_eq!(p.vel, [-0.2, 0.15]);
        assert_eq!(p.speed(), before);
    }
}
