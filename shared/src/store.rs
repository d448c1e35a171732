use crate::entity::BubbleEntity;

/// Persistence collaborator. The engine never touches this; the application
/// loads once at startup and saves after every change.
pub trait EntityStore {
    type Error: std::error::Error;

    fn load_entities(&self) -> Result<Vec<BubbleEntity>, Self::Error>;
    fn save_entities(&mut self, entities: &[BubbleEntity]) -> Result<(), Self::Error>;
}

/// Process-local store, used by the demo binary and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entities: Vec<BubbleEntity>,
    saves: usize,
}

impl MemoryStore {
    pub fn with_entities(entities: Vec<BubbleEntity>) -> Self {
        Self { entities, saves: 0 }
    }

    /// Number of completed saves
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl EntityStore for MemoryStore {
    type Error = std::convert::Infallible;

    fn load_entities(&self) -> Result<Vec<BubbleEntity>, Self::Error> {
        Ok(self.entities.clone())
    }

    fn save_entities(&mut self, entities: &[BubbleEntity]) -> Result<(), Self::Error> {
        self.entities = entities.to_vec();
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load_returns_latest() {
        let mut store = MemoryStore::default();
        assert!(store.load_entities().unwrap().is_empty());

        let bubbles = vec![BubbleEntity::new(1), BubbleEntity::new(2)];
        store.save_entities(&bubbles).unwrap();
        store.save_entities(&bubbles[..1]).unwrap();

        assert_eq!(store.load_entities().unwrap(), bubbles[..1].to_vec());
        assert_eq!(store.save_count(), 2);
    }
}
