//! Tap versus drag classification.
//!
//! The pointer constraint in the world moves bodies on its own; this only
//! decides, on release, whether a press was short and still enough to count
//! as a tap. Body taps log an activity, label taps open the editor.

use crate::config::TapThresholds;
use bubble_shared::protocol::{EngineEventMsg, PointerRegion};
use bubble_shared::vec2::{distance, Vec2};
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct PendingTap {
    id: String,
    region: PointerRegion,
    start: Vec2,
    at_ms: i64,
}

#[derive(Debug, Default)]
pub struct InteractionController {
    thresholds: TapThresholds,
    pending: HashMap<u32, PendingTap>,
}

impl InteractionController {
    pub fn new(thresholds: TapThresholds) -> Self {
        Self {
            thresholds,
            pending: HashMap::new(),
        }
    }

    /// Start tracking a press. Presses on empty space are never taps.
    pub fn pointer_down(
        &mut self,
        pointer_id: u32,
        point: Vec2,
        at_ms: i64,
        target: Option<(String, PointerRegion)>,
    ) {
        match target {
            Some((id, region)) => {
                self.pending.insert(
                    pointer_id,
                    PendingTap {
                        id,
                        region,
                        start: point,
                        at_ms,
                    },
                );
            }
            None => {
                self.pending.remove(&pointer_id);
            }
        }
    }

    /// Finish a press and emit the tap event, if it was one.
    pub fn pointer_up(&mut self, pointer_id: u32, point: Vec2, at_ms: i64) -> Option<EngineEventMsg> {
        let tap = self.pending.remove(&pointer_id)?;
        let moved = distance(tap.start, point);
        let held_ms = at_ms - tap.at_ms;
        if !self.is_tap(tap.region, moved, held_ms) {
            tracing::debug!("Pointer {} on {} was a drag", pointer_id, tap.id);
            return None;
        }
        Some(match tap.region {
            PointerRegion::Body => EngineEventMsg::Activity { id: tap.id },
            PointerRegion::Label => EngineEventMsg::OpenEditor { id: tap.id },
        })
    }

    /// Pointer left the bubble or was cancelled: forget the press.
    pub fn pointer_leave(&mut self, pointer_id: u32) {
        self.pending.remove(&pointer_id);
    }

    pub fn is_tap(&self, region: PointerRegion, moved: f64, held_ms: i64) -> bool {
        let max_ms = match region {
            PointerRegion::Body => self.thresholds.body_max_ms,
            PointerRegion::Label => self.thresholds.label_max_ms,
        };
        moved < self.thresholds.max_distance && held_ms < max_ms
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
