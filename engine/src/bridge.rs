use crate::body::BodyPose;
use crate::world::World;
use bubble_shared::protocol::{round2, BodyWire, SnapshotMsg, PROTOCOL_VERSION};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::watch;

/// Immutable view of every body after one tick.
#[derive(Debug, Clone, Default)]
pub struct WorldSnapshot {
    pub tick: u64,
    poses: BTreeMap<String, BodyPose>,
}

impl WorldSnapshot {
    pub fn capture(world: &World) -> Self {
        Self {
            tick: world.tick(),
            poses: world
                .registry()
                .iter()
                .map(|b| (b.id.clone(), b.pose()))
                .collect(),
        }
    }

    /// Pose of `id`, or `None` if it has no body yet. Callers skip drawing
    /// such entities for this frame.
    pub fn position(&self, id: &str) -> Option<BodyPose> {
        self.poses.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BodyPose)> {
        self.poses.iter().map(|(id, pose)| (id.as_str(), pose))
    }

    pub fn to_wire(&self) -> SnapshotMsg {
        SnapshotMsg {
            protocol_version: PROTOCOL_VERSION,
            tick: self.tick,
            bodies: self
                .iter()
                .map(|(id, pose)| BodyWire {
                    id: id.to_string(),
                    x: round2(pose.x),
                    y: round2(pose.y),
                    angle: round2(pose.angle),
                    radius: round2(pose.radius),
                })
                .collect(),
        }
    }
}

/// Publishes one snapshot per tick. Readers always see the latest one and
/// are woken on every publish; there are no deltas to replay.
pub struct RenderBridge {
    tx: watch::Sender<Arc<WorldSnapshot>>,
}

impl RenderBridge {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Arc::new(WorldSnapshot::default()));
        Self { tx }
    }

    pub fn publish(&self, snapshot: WorldSnapshot) {
        self.tx.send_replace(Arc::new(snapshot));
    }

    /// Publish an empty snapshot so readers stop drawing stale bodies.
    pub fn clear(&self) {
        let tick = self.tx.borrow().tick;
        self.publish(WorldSnapshot {
            tick,
            poses: BTreeMap::new(),
        });
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<WorldSnapshot>> {
        self.tx.subscribe()
    }

    pub fn latest(&self) -> Arc<WorldSnapshot> {
        self.tx.borrow().clone()
    }
}

impl Default for RenderBridge {
    fn default() -> Self {
        Self::new()
    }
}
