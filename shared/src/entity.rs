use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Milliseconds since the Unix epoch.
pub type Millis = i64;

/// A tracked habit as the application layer stores it.
///
/// The engine only ever sees `id` and the size derived from
/// [`BubbleEntity::last_activity`]; everything else is carried for the
/// presentation layer and the interchange document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../web/src/generated/")]
#[serde(rename_all = "camelCase")]
pub struct BubbleEntity {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Opaque, size-capped image reference (data URL or key)
    #[serde(default, rename = "image")]
    pub image_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub category: Option<String>,
    #[ts(type = "number")]
    pub created_at: Millis,
    /// Activity log in insertion order
    #[serde(default)]
    #[ts(type = "Array<number>")]
    pub history: Vec<Millis>,
}

impl BubbleEntity {
    /// Fresh bubble with an id derived from its creation time.
    pub fn new(created_at: Millis) -> Self {
        Self {
            id: format!("bubble-{}", created_at),
            name: None,
            image_ref: None,
            category: None,
            created_at,
            history: Vec::new(),
        }
    }

    /// Last entry of `history`, or `created_at` when history is empty.
    /// Insertion order wins even if the log was edited out of order.
    pub fn last_activity(&self) -> Millis {
        self.history.last().copied().unwrap_or(self.created_at)
    }

    /// Append an activity timestamp.
    pub fn log_activity(&mut self, at: Millis) {
        self.history.push(at);
    }

    /// Remove one history entry by position.
    pub fn remove_activity(&mut self, index: usize) -> Option<Millis> {
        if index < self.history.len() {
            Some(self.history.remove(index))
        } else {
            None
        }
    }
}
