use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Protocol version - increment when making breaking changes to the wire types.
pub const PROTOCOL_VERSION: u32 = 1;

// === Engine -> presentation ===

/// Everything the presentation layer needs to draw one frame.
/// Ids missing from `bodies` are not ready and must not be drawn.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../web/src/generated/")]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMsg {
    pub protocol_version: u32,
    #[ts(type = "number")]
    pub tick: u64,
    pub bodies: Vec<BodyWire>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../web/src/generated/")]
pub struct BodyWire {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub angle: f64,
    pub radius: f64,
}

/// Discrete gestures the engine hands back to the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../web/src/generated/")]
#[serde(tag = "type")]
pub enum EngineEventMsg {
    /// Short tap on a bubble: log an activity
    #[serde(rename = "activity")]
    Activity { id: String },
    /// Short tap on a label: open the edit view
    #[serde(rename = "open_editor")]
    OpenEditor { id: String },
}

// === Presentation -> engine ===

/// Which part of a bubble a pointer went down on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../web/src/generated/")]
#[serde(rename_all = "snake_case")]
pub enum PointerRegion {
    Body,
    Label,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../web/src/generated/")]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerMsg {
    Down {
        pointer_id: u32,
        x: f64,
        y: f64,
        #[ts(type = "number")]
        at_ms: i64,
        /// Bubble and region under the pointer, if any
        target: Option<(String, PointerRegion)>,
    },
    Move {
        pointer_id: u32,
        x: f64,
        y: f64,
    },
    Up {
        pointer_id: u32,
        x: f64,
        y: f64,
        #[ts(type = "number")]
        at_ms: i64,
    },
    /// Pointer left the bubble or the gesture was cancelled
    Leave { pointer_id: u32 },
}

// === Conversion helpers ===

/// Round to 2 decimal places (sub-pixel precision is plenty for layout)
#[inline]
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
