use crate::events::RegistryEvent;
use crate::ports::EventPublisher;
use parking_lot::RwLock;

/// Publisher that keeps every event in memory.
#[derive(Default)]
pub struct InMemoryEventLog {
    events: RwLock<Vec<RegistryEvent>>,
}

impl InMemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RegistryEvent> {
        self.events.read().clone()
    }

    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn last(&self) -> Option<RegistryEvent> {
        self.events.read().last().cloned()
    }
}

impl EventPublisher for InMemoryEventLog {
    fn publish(&self, event: RegistryEvent) {
        self.events.write().push(event);
    }
}
