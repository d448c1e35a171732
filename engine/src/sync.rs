use crate::config::Viewport;
use crate::simulation::Simulation;
use bubble_shared::decay::size_of;
use bubble_shared::entity::{BubbleEntity, Millis};
use bubble_shared::vec2::{vec2, Vec2};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::collections::{HashMap, HashSet};

/// Counts from one reconcile pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub registered: usize,
    pub unregistered: usize,
    pub rescaled: usize,
}

/// Keeps the simulation's bodies in line with the application's entity list.
///
/// Remembers the radius last applied to each id so a size change becomes a
/// relative `scale` on the existing body rather than a respawn.
pub struct EntitySync {
    applied: HashMap<String, f64>,
    spawn_margin: f64,
    rng: ChaCha8Rng,
}

impl EntitySync {
    pub fn new(spawn_margin: f64, rng_seed: u64) -> Self {
        use rand::SeedableRng;
        Self {
            applied: HashMap::new(),
            spawn_margin,
            rng: ChaCha8Rng::seed_from_u64(rng_seed),
        }
    }

    pub fn reconcile(
        &mut self,
        sim: &mut Simulation,
        entities: &[BubbleEntity],
        now: Millis,
    ) -> SyncReport {
        let mut report = SyncReport::default();

        let live: HashSet<&str> = entities.iter().map(|e| e.id.as_str()).collect();
        let gone: Vec<String> = self
            .applied
            .keys()
            .filter(|id| !live.contains(id.as_str()))
            .cloned()
            .collect();
        for id in gone {
            sim.unregister(&id);
            self.applied.remove(&id);
            report.unregistered += 1;
        }

        let Some(viewport) = sim.world().map(|w| w.viewport()) else {
            return report;
        };

        for entity in entities {
            let size = size_of(entity, now);
            let known = self.applied.get(&entity.id).copied();
            let body = sim.position(&entity.id);

            match (known, body) {
                (Some(prev), Some(_)) => {
                    if size != prev && sim.scale(&entity.id, size / prev) {
                        self.applied.insert(entity.id.clone(), size);
                        report.rescaled += 1;
                    }
                }
                // Registered outside of sync: adopt it at its real radius.
                (None, Some(pose)) => {
                    if size == pose.radius {
                        self.applied.insert(entity.id.clone(), size);
                    } else if sim.scale(&entity.id, size / pose.radius) {
                        self.applied.insert(entity.id.clone(), size);
                        report.rescaled += 1;
                    }
                }
                (_, None) => {
                    let spawn = self.spawn_point(viewport);
                    if sim.register(&entity.id, spawn, size).is_some() {
                        self.applied.insert(entity.id.clone(), size);
                        report.registered += 1;
                    }
                }
            }
        }

        if report != SyncReport::default() {
            tracing::debug!(
                "Sync: +{} -{} ~{}",
                report.registered,
                report.unregistered,
                report.rescaled
            );
        }
        report
    }

    /// Random point at least `spawn_margin` from every edge, shrinking the
    /// margin on viewports too small for it.
    pub fn spawn_point(&mut self, viewport: Viewport) -> Vec2 {
        let x = self.spawn_axis(viewport.width);
        let y = self.spawn_axis(viewport.height);
        vec2(x, y)
    }

    fn spawn_axis(&mut self, extent: f64) -> f64 {
        let margin = self.spawn_margin.min(extent / 2.0);
        margin + self.rng.gen::<f64>() * (extent - 2.0 * margin)
    }

    /// Last radius applied for `id`
    pub fn applied_size(&self, id: &str) -> Option<f64> {
        self.applied.get(id).copied()
    }

    /// Forget everything, e.g. after the world was torn down.
    pub fn reset(&mut self) {
        self.applied.clear();
    }
}
