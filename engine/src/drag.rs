use crate::body::{BodyHandle, PhysicsBody};
use bubble_shared::vec2::{add, rotate, scale, sub, Vec2};

/// Soft spring from a grabbed point on a body to the pointer.
///
/// Each step the body's velocity is damped and then nudged so that the
/// grabbed point closes `stiffness` of its gap to the pointer. With
/// stiffness below 1 the body trails the pointer instead of snapping to it.
#[derive(Debug, Clone)]
pub struct DragConstraint {
    pub pointer_id: u32,
    pub body: BodyHandle,
    /// Grab point in body-local coordinates
    pub local_anchor: Vec2,
    /// Current pointer position
    pub target: Vec2,
}

impl DragConstraint {
    /// Grab `body` at world point `point`.
    pub fn attach(pointer_id: u32, body: &PhysicsBody, point: Vec2) -> Self {
        let local_anchor = rotate(sub(point, body.position), -body.angle);
        Self {
            pointer_id,
            body: body.handle,
            local_anchor,
            target: point,
        }
    }

    /// Grab point in world coordinates
    pub fn anchor_world(&self, body: &PhysicsBody) -> Vec2 {
        add(body.position, rotate(self.local_anchor, body.angle))
    }

    pub fn apply(&self, body: &mut PhysicsBody, stiffness: f64, damping: f64, dt: f64) {
        let gap = sub(self.target, self.anchor_world(body));
        let pull = scale(gap, stiffness / dt);
        body.velocity = add(scale(body.velocity, 1.0 - damping), pull);
    }
}
