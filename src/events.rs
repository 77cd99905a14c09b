//! Spawn/despawn notifications
//!
//! Listeners are plain closures kept in registration order and invoked
//! synchronously from the call that caused the event. A listener only sees the
//! event itself, so it cannot reach back into the coordinator mid-dispatch.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::entity::{Category, HandleId, VariantId};

/// Something happened to a pooled entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpawnEvent {
    Spawned {
        id: HandleId,
        variant: VariantId,
        position: Vec3,
    },
    Despawned {
        id: HandleId,
    },
}

impl SpawnEvent {
    pub fn id(&self) -> HandleId {
        match *self {
            SpawnEvent::Spawned { id, .. } | SpawnEvent::Despawned { id } => id,
        }
    }

    pub fn category(&self) -> Category {
        self.id().category
    }
}

/// Token returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&SpawnEvent)>;

/// Ordered list of listeners
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; it runs after every listener registered before it
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&SpawnEvent) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn emit(&mut self, event: &SpawnEvent) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }
}
