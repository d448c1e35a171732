use bubble_shared::vec2::{distance, Vec2};
use std::f64::consts::PI;

/// Opaque reference to a registered body. Stable for the body's lifetime and
/// never reused within one world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub(crate) u64);

/// Read-only view of a body for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyPose {
    pub x: f64,
    pub y: f64,
    pub angle: f64,
    pub radius: f64,
}

/// Simulated circle for one bubble.
///
/// Mass properties are derived from radius and density and only change
/// through [`PhysicsBody::scale`].
#[derive(Debug, Clone)]
pub struct PhysicsBody {
    pub id: String,
    pub handle: BodyHandle,
    pub position: Vec2,
    pub velocity: Vec2,
    pub angle: f64,
    pub angular_velocity: f64,
    pub is_static: bool,
    radius: f64,
    density: f64,
    mass: f64,
    inv_mass: f64,
    inertia: f64,
    inv_inertia: f64,
}

impl PhysicsBody {
    pub fn circle(
        id: impl Into<String>,
        handle: BodyHandle,
        position: Vec2,
        radius: f64,
        density: f64,
    ) -> Self {
        let mut body = Self {
            id: id.into(),
            handle,
            position,
            velocity: Vec2::ZERO,
            angle: 0.0,
            angular_velocity: 0.0,
            is_static: false,
            radius,
            density,
            mass: 0.0,
            inv_mass: 0.0,
            inertia: 0.0,
            inv_inertia: 0.0,
        };
        body.update_mass();
        body
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn inv_mass(&self) -> f64 {
        self.inv_mass
    }

    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    pub fn inv_inertia(&self) -> f64 {
        self.inv_inertia
    }

    /// Multiply radius by `factor` and recompute mass and inertia.
    /// Position, velocity and angle are left alone.
    pub fn scale(&mut self, factor: f64) {
        self.radius *= factor;
        self.update_mass();
    }

    /// Whether `point` lies inside the circle
    pub fn contains(&self, point: Vec2) -> bool {
        distance(self.position, point) <= self.radius
    }

    pub fn pose(&self) -> BodyPose {
        BodyPose {
            x: self.position.x,
            y: self.position.y,
            angle: self.angle,
            radius: self.radius,
        }
    }

    fn update_mass(&mut self) {
        self.mass = self.density * PI * self.radius * self.radius;
        self.inertia = 0.5 * self.mass * self.radius * self.radius;
        if self.is_static || self.mass <= 0.0 {
            self.inv_mass = 0.0;
            self.inv_inertia = 0.0;
        } else {
            self.inv_mass = 1.0 / self.mass;
            self.inv_inertia = 1.0 / self.inertia;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bubble_shared::vec2::vec2;

    fn body(radius: f64) -> PhysicsBody {
        PhysicsBody::circle("b", BodyHandle(1), vec2(100.0, 100.0), radius, 0.001)
    }

    #[test]
    fn mass_grows_with_area() {
        let small = body(10.0);
        let big = body(20.0);
        assert!((big.mass() / small.mass() - 4.0).abs() < 1e-9);
        assert!((small.inv_mass() * small.mass() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn scale_updates_mass_and_keeps_motion() {
        let mut b = body(10.0);
        b.velocity = vec2(3.0, -4.0);
        let mass_before = b.mass();
        b.scale(2.0);
        assert!((b.radius() - 20.0).abs() < 1e-12);
        assert!((b.mass() / mass_before - 4.0).abs() < 1e-9);
        assert!((b.inertia() - 0.5 * b.mass() * 400.0).abs() < 1e-9);
        assert_eq!(b.position, vec2(100.0, 100.0));
        assert_eq!(b.velocity, vec2(3.0, -4.0));
    }

    #[test]
    fn contains_checks_radius() {
        let b = body(10.0);
        assert!(b.contains(vec2(105.0, 105.0)));
        assert!(!b.contains(vec2(111.0, 100.0)));
    }
}
