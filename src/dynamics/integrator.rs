use crate::core::particle::Particle;

/// Störmer–Verlet integrator stepping rope particles forward in time.
#[derive(Debug, Clone, Copy, Default)]
pub struct Integrator;

impl Integrator {
    pub fn new() -> Self {
        Self
    }

    /// `x' = 2x - x_prev + a·dt²`; pinned particles are left untouched.
    pub fn integrate_particle(&self, particle: &mut Particle, dt: f32) {
        if particle.is_attached {
            return;
        }

        let current = particle.position_current;
        particle.position_current =
            2.0 * current - particle.position_previous + particle.acceleration * (dt * dt);
        particle.position_previous = current;
    }

    pub fn integrate(&self, particles: &mut [Particle], dt: f32) {
        for particle in particles.iter_mut() {
            self.integrate_particle(particle, dt);
        }
    }
}
