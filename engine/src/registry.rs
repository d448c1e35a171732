use crate::body::{BodyHandle, BodyPose, PhysicsBody};
use bubble_shared::vec2::Vec2;
use std::collections::HashMap;

/// Maps entity ids to live bodies.
///
/// Bodies live in a dense vec in registration order so the contact pass can
/// borrow pairs with `split_at_mut`; `index` points from id to slot.
#[derive(Debug, Default)]
pub struct BodyRegistry {
    bodies: Vec<PhysicsBody>,
    index: HashMap<String, usize>,
    next_handle: u64,
}

impl BodyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a body for `id`. A second registration under the same id is
    /// rejected and returns the existing handle.
    pub fn register(
        &mut self,
        id: &str,
        position: Vec2,
        radius: f64,
        velocity: Vec2,
        density: f64,
    ) -> BodyHandle {
        if let Some(&slot) = self.index.get(id) {
            tracing::debug!("Body {} already registered", id);
            return self.bodies[slot].handle;
        }

        let handle = BodyHandle(self.next_handle);
        self.next_handle += 1;

        let mut body = PhysicsBody::circle(id, handle, position, radius, density);
        body.velocity = velocity;

        self.index.insert(id.to_string(), self.bodies.len());
        self.bodies.push(body);
        handle
    }

    /// Remove the body for `id`. Absent ids are ignored. Remaining bodies
    /// keep their relative order.
    pub fn unregister(&mut self, id: &str) -> Option<PhysicsBody> {
        let slot = self.index.remove(id)?;
        let body = self.bodies.remove(slot);
        for later in self.index.values_mut() {
            if *later > slot {
                *later -= 1;
            }
        }
        Some(body)
    }

    /// Multiply the radius of `id` by `factor`. Returns false if absent or
    /// if the factor is not a finite positive number.
    pub fn scale(&mut self, id: &str, factor: f64) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            tracing::warn!("Ignoring scale of {} by {}", id, factor);
            return false;
        }
        match self.get_mut(id) {
            Some(body) => {
                body.scale(factor);
                true
            }
            None => false,
        }
    }

    pub fn position(&self, id: &str) -> Option<BodyPose> {
        self.get(id).map(PhysicsBody::pose)
    }

    pub fn handle(&self, id: &str) -> Option<BodyHandle> {
        self.get(id).map(|b| b.handle)
    }

    pub fn get(&self, id: &str) -> Option<&PhysicsBody> {
        self.index.get(id).map(|&slot| &self.bodies[slot])
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut PhysicsBody> {
        let slot = *self.index.get(id)?;
        self.bodies.get_mut(slot)
    }

    pub fn by_handle_mut(&mut self, handle: BodyHandle) -> Option<&mut PhysicsBody> {
        self.bodies.iter_mut().find(|b| b.handle == handle)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Bodies in registration order
    pub fn iter(&self) -> std::slice::Iter<'_, PhysicsBody> {
        self.bodies.iter()
    }

    /// All bodies as a slice, for pairwise passes
    pub fn bodies_mut(&mut self) -> &mut [PhysicsBody] {
        &mut self.bodies
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
        self.index.clear();
    }
}
