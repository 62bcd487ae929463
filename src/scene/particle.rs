use super::Camera;
use crate::math::{Vec2, Vec3};
use crate::renderer::{Color, Surface};

const PARTICLE_SIZE: f32 = 2.0;

/// When [`Particle::update`] pulls the particle down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GravityRule {
    /// Never applies gravity. This is how the engine has always behaved:
    /// its guard compared a negated boolean against zero and was never true.
    #[default]
    Literal,
    /// Subtracts one unit from the vertical velocity every update while the
    /// particle is at or above `y = 0`.
    AboveGround,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Remaining lifetime in frames.
    pub lifetime: i32,
    pub color: Color,
    pub gravity: GravityRule,
}

impl Particle {
    #[must_use]
    pub fn new(position: Vec3, velocity: Vec3, lifetime: i32, color: Color) -> Self {
        Self {
            position,
            velocity,
            lifetime,
            color,
            gravity: GravityRule::default(),
        }
    }

    #[must_use]
    pub fn with_gravity(mut self, gravity: GravityRule) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn update(&mut self) {
        self.position = self.position.add(&self.velocity);
        self.lifetime = self.lifetime.saturating_sub(1);

        if self.gravity == GravityRule::AboveGround && self.position.y >= 0.0 {
            self.velocity.y -= 1.0;
        }
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.lifetime > 0
    }

    /// Perspective projection of the particle's position using the camera's
    /// scale. No rotation is applied.
    #[must_use]
    pub fn project_position(&self, camera: &Camera) -> Vec2 {
        let t = self.position.sub(&camera.position);
        let scale = camera.settings.scale;
        Vec2::new(
            t.x / t.z * scale + camera.canvas_width / 2.0,
            t.y / t.z * scale + camera.canvas_height / 2.0,
        )
    }

    pub fn render(&self, surface: &mut dyn Surface, camera: &Camera) {
        let origin = self.project_position(camera);
        surface.fill_rect(origin, Vec2::new(PARTICLE_SIZE, PARTICLE_SIZE), self.color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{Canvas, BLACK};

    #[test]
    fn test_lifetime_one_dies_after_one_update() {
        let mut particle = Particle::new(Vec3::zero(), Vec3::zero(), 1, BLACK);
        assert!(particle.is_alive());
        particle.update();
        assert!(!particle.is_alive());
    }

    #[test]
    fn test_update_moves_and_counts_down() {
        let mut particle = Particle::new(Vec3::zero(), Vec3::new(1.0, 2.0, -1.0), 10, BLACK);
        particle.update();
        particle.update();
        assert_eq!(particle.position, Vec3::new(2.0, 4.0, -2.0));
        assert_eq!(particle.lifetime, 8);
    }

    #[test]
    fn test_lifetime_saturates_at_minimum() {
        let mut particle = Particle::new(Vec3::zero(), Vec3::zero(), i32::MIN, BLACK);
        particle.update();
        assert_eq!(particle.lifetime, i32::MIN);
        assert!(!particle.is_alive());
    }

    #[test]
    fn test_literal_gravity_never_pulls() {
        for y in [-5.0, 0.0, 5.0] {
            let mut particle = Particle::new(Vec3::new(0.0, y, 0.0), Vec3::zero(), 5, BLACK);
            particle.update();
            assert_eq!(particle.velocity.y, 0.0);
        }
    }

    #[test]
    fn test_above_ground_gravity() {
        let mut above = Particle::new(Vec3::new(0.0, 3.0, 0.0), Vec3::zero(), 5, BLACK)
            .with_gravity(GravityRule::AboveGround);
        above.update();
        assert_eq!(above.velocity.y, -1.0);

        let mut below = Particle::new(Vec3::new(0.0, -3.0, 0.0), Vec3::zero(), 5, BLACK)
            .with_gravity(GravityRule::AboveGround);
        below.update();
        assert_eq!(below.velocity.y, 0.0);
    }

    #[test]
    fn test_render_fills_two_by_two_square() {
        let camera = Camera::new(100.0, 100.0, Vec3::new(0.0, 0.0, -10.0));
        let particle = Particle::new(Vec3::zero(), Vec3::zero(), 1, BLACK);
        let mut canvas = Canvas::new(100, 100);

        assert_eq!(particle.project_position(&camera), Vec2::new(50.0, 50.0));
        particle.render(&mut canvas, &camera);
        assert_eq!(canvas.image().pixels().filter(|p| **p == BLACK).count(), 4);
        assert_eq!(canvas.pixel(51, 51), Some(BLACK));
    }
}
