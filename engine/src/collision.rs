//! Contact detection and impulse response.
//!
//! Circles against circles and circles against the static walls. Each contact
//! gets one restitution impulse along the normal, a friction impulse along
//! the tangent capped by the Coulomb cone, and a positional nudge for any
//! penetration beyond the slop.

use crate::body::PhysicsBody;
use crate::walls::Wall;
use bubble_shared::config::SimulationConfig;
use bubble_shared::vec2::{
    add, cross, dot, length, length_sq, normalize, scale, sub, vec2, Vec2,
};

/// Overlap between two shapes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit normal pointing from the first shape toward the second
    pub normal: Vec2,
    /// Overlap depth along the normal
    pub penetration: f64,
}

/// Overlap of two circles, normal from `a` toward `b`.
pub fn circle_circle(a: Vec2, ra: f64, b: Vec2, rb: f64) -> Option<Contact> {
    let d = sub(b, a);
    let reach = ra + rb;
    let dist_sq = length_sq(d);
    if dist_sq >= reach * reach {
        return None;
    }
    let dist = dist_sq.sqrt();
    // Coincident centers: any direction works, pick one deterministically
    let normal = if dist < 1e-9 { vec2(1.0, 0.0) } else { scale(d, 1.0 / dist) };
    Some(Contact {
        normal,
        penetration: reach - dist,
    })
}

/// Overlap of a circle with a wall, normal from the wall toward the circle.
pub fn circle_wall(center: Vec2, radius: f64, wall: &Wall) -> Option<Contact> {
    let min = wall.min();
    let max = wall.max();
    let closest = vec2(center.x.clamp(min.x, max.x), center.y.clamp(min.y, max.y));
    let d = sub(center, closest);
    let dist_sq = length_sq(d);

    if dist_sq > 1e-18 {
        if dist_sq >= radius * radius {
            return None;
        }
        let dist = dist_sq.sqrt();
        return Some(Contact {
            normal: scale(d, 1.0 / dist),
            penetration: radius - dist,
        });
    }

    // Center is inside the box: push out through the nearest face.
    let faces = [
        (center.x - min.x, vec2(-1.0, 0.0)),
        (max.x - center.x, vec2(1.0, 0.0)),
        (center.y - min.y, vec2(0.0, -1.0)),
        (max.y - center.y, vec2(0.0, 1.0)),
    ];
    let (depth, normal) = faces
        .iter()
        .copied()
        .fold((f64::INFINITY, vec2(1.0, 0.0)), |best, face| {
            if face.0 < best.0 {
                face
            } else {
                best
            }
        });
    Some(Contact {
        normal,
        penetration: depth + radius,
    })
}

/// Resolve a contact between two dynamic bodies.
pub fn resolve_pair(
    a: &mut PhysicsBody,
    b: &mut PhysicsBody,
    contact: &Contact,
    config: &SimulationConfig,
) {
    let inv_sum = a.inv_mass() + b.inv_mass();
    if inv_sum <= 0.0 {
        return;
    }
    let n = contact.normal;

    let rv = sub(b.velocity, a.velocity);
    let vn = dot(rv, n);
    if vn < 0.0 {
        let j = -(1.0 + config.restitution) * vn / inv_sum;
        let impulse = scale(n, j);
        a.velocity = sub(a.velocity, scale(impulse, a.inv_mass()));
        b.velocity = add(b.velocity, scale(impulse, b.inv_mass()));

        if let Some(friction) = friction_impulse(sub(b.velocity, a.velocity), n, j, inv_sum, config)
        {
            a.velocity = sub(a.velocity, scale(friction, a.inv_mass()));
            b.velocity = add(b.velocity, scale(friction, b.inv_mass()));
            if !config.lock_rotation {
                let ra = scale(n, a.radius());
                let rb = scale(n, -b.radius());
                a.angular_velocity -= a.inv_inertia() * cross(ra, friction);
                b.angular_velocity += b.inv_inertia() * cross(rb, friction);
            }
        }
    }

    let correction = positional_correction(contact.penetration, config) / inv_sum;
    if correction > 0.0 {
        a.position = sub(a.position, scale(n, correction * a.inv_mass()));
        b.position = add(b.position, scale(n, correction * b.inv_mass()));
    }
}

/// Resolve a contact between a dynamic body and an immovable wall.
/// `contact.normal` points from the wall into the body.
pub fn resolve_static(body: &mut PhysicsBody, contact: &Contact, config: &SimulationConfig) {
    if body.inv_mass() <= 0.0 {
        return;
    }
    let n = contact.normal;
    let vn = dot(body.velocity, n);
    if vn < 0.0 {
        let j = -(1.0 + config.restitution) * vn / body.inv_mass();
        body.velocity = add(body.velocity, scale(n, j * body.inv_mass()));

        // Wall is at rest, so relative velocity is the body's own, negated.
        if let Some(friction) =
            friction_impulse(scale(body.velocity, -1.0), n, j, body.inv_mass(), config)
        {
            body.velocity = sub(body.velocity, scale(friction, body.inv_mass()));
            if !config.lock_rotation {
                let r = scale(n, -body.radius());
                body.angular_velocity -= body.inv_inertia() * cross(r, friction);
            }
        }
    }

    let correction = positional_correction(contact.penetration, config);
    if correction > 0.0 {
        body.position = add(body.position, scale(n, correction));
    }
}

/// Tangential impulse applied to the second body (the first gets the negation).
fn friction_impulse(
    relative_velocity: Vec2,
    n: Vec2,
    normal_impulse: f64,
    inv_sum: f64,
    config: &SimulationConfig,
) -> Option<Vec2> {
    let tangent_velocity = sub(relative_velocity, scale(n, dot(relative_velocity, n)));
    if length(tangent_velocity) < 1e-9 || config.friction <= 0.0 {
        return None;
    }
    let t = normalize(tangent_velocity);
    let max = config.friction * normal_impulse;
    let jt = (-dot(relative_velocity, t) / inv_sum).clamp(-max, max);
    Some(scale(t, jt))
}

fn positional_correction(penetration: f64, config: &SimulationConfig) -> f64 {
    (penetration - config.penetration_slop).max(0.0) * config.correction_percent
}
