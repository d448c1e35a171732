use crate::body::{BodyHandle, BodyPose};
use crate::collision::{circle_circle, circle_wall, resolve_pair, resolve_static};
use crate::config::Viewport;
use crate::drag::DragConstraint;
use crate::registry::BodyRegistry;
use crate::walls::Walls;
use bubble_shared::config::SimulationConfig;
use bubble_shared::vec2::{add, clamp_length, scale, vec2, Vec2};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Live bubble field. There is no gravity: bodies drift on their spawn
/// velocity and whatever contacts and drags give them.
pub struct World {
    config: SimulationConfig,
    registry: BodyRegistry,
    walls: Walls,
    drags: Vec<DragConstraint>,
    viewport: Viewport,
    rng: ChaCha8Rng,
    tick: u64,
}

impl World {
    pub fn new(
        viewport: Viewport,
        wall_thickness: f64,
        config: SimulationConfig,
        rng_seed: u64,
    ) -> Self {
        use rand::SeedableRng;
        Self {
            config,
            registry: BodyRegistry::new(),
            walls: Walls::new(viewport, wall_thickness),
            drags: Vec::new(),
            viewport,
            rng: ChaCha8Rng::seed_from_u64(rng_seed),
            tick: 0,
        }
    }

    /// Add a body with a small random drift so the field never starts frozen.
    pub fn register(&mut self, id: &str, position: Vec2, radius: f64) -> BodyHandle {
        let s = self.config.initial_speed;
        let velocity = if s > 0.0 {
            vec2(self.rng.gen_range(-s..=s), self.rng.gen_range(-s..=s))
        } else {
            Vec2::ZERO
        };
        self.registry
            .register(id, position, radius, velocity, self.config.density)
    }

    /// Remove a body and any drag holding it.
    pub fn unregister(&mut self, id: &str) -> bool {
        match self.registry.unregister(id) {
            Some(body) => {
                self.drags.retain(|d| d.body != body.handle);
                true
            }
            None => false,
        }
    }

    pub fn position(&self, id: &str) -> Option<BodyPose> {
        self.registry.position(id)
    }

    pub fn scale(&mut self, id: &str, factor: f64) -> bool {
        self.registry.scale(id, factor)
    }

    /// Move the walls to the new edges. Bodies are not touched.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.walls.reposition(viewport);
    }

    /// Grab the topmost body under `point`. Later registrations draw on top;
    /// the registry keeps that order across removals.
    pub fn begin_drag(&mut self, pointer_id: u32, point: Vec2) -> Option<BodyHandle> {
        self.end_drag(pointer_id);
        let body = self.registry.iter().rev().find(|b| b.contains(point))?;
        let drag = DragConstraint::attach(pointer_id, body, point);
        let handle = drag.body;
        self.drags.push(drag);
        Some(handle)
    }

    pub fn move_drag(&mut self, pointer_id: u32, point: Vec2) {
        if let Some(drag) = self.drags.iter_mut().find(|d| d.pointer_id == pointer_id) {
            drag.target = point;
        }
    }

    pub fn end_drag(&mut self, pointer_id: u32) -> bool {
        let before = self.drags.len();
        self.drags.retain(|d| d.pointer_id != pointer_id);
        self.drags.len() != before
    }

    pub fn is_dragging(&self, pointer_id: u32) -> bool {
        self.drags.iter().any(|d| d.pointer_id == pointer_id)
    }

    /// Advance one fixed step: drags, air friction, integration, contacts.
    pub fn step(&mut self, dt: f64) {
        self.tick += 1;
        let config = self.config;

        for drag in &self.drags {
            if let Some(body) = self.registry.by_handle_mut(drag.body) {
                drag.apply(body, config.drag_stiffness, config.drag_damping, dt);
            }
        }

        let keep = 1.0 - config.air_friction;
        for body in self.registry.bodies_mut().iter_mut() {
            if body.is_static {
                continue;
            }
            body.velocity = clamp_length(scale(body.velocity, keep), config.max_speed);
            body.angular_velocity *= keep;
            body.position = add(body.position, scale(body.velocity, dt));
            body.angle += body.angular_velocity * dt;
        }

        let bodies = self.registry.bodies_mut();
        for j in 1..bodies.len() {
            let (head, tail) = bodies.split_at_mut(j);
            let b = &mut tail[0];
            for a in head.iter_mut() {
                if let Some(contact) =
                    circle_circle(a.position, a.radius(), b.position, b.radius())
                {
                    resolve_pair(a, b, &contact, &config);
                }
            }
        }

        for body in bodies.iter_mut() {
            for wall in self.walls.iter() {
                if let Some(contact) = circle_wall(body.position, body.radius(), wall) {
                    resolve_static(body, &contact, &config);
                }
            }
        }
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn walls(&self) -> &Walls {
        &self.walls
    }

    pub fn registry(&self) -> &BodyRegistry {
        &self.registry
    }

    pub fn body_count(&self) -> usize {
        self.registry.len()
    }

    /// Drop every body and drag. Walls stay.
    pub fn clear(&mut self) {
        self.registry.clear();
        self.drags.clear();
    }
}
