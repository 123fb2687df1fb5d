//! # STRANDED Event System
//!
//! Outbound notifications from the simulation to render and UI consumers.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐      ┌─────────────┐      ┌─────────────┐
//! │ Simulation  │─────>│   Event     │─────>│  Renderer   │
//! │   (tick)    │      │   Channel   │      │   / HUD     │
//! └─────────────┘      └─────────────┘      └─────────────┘
//! ```
//!
//! The channel is bounded. A full channel never stalls a tick: the event
//! is dropped and counted.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use stranded_core::EntityId;
use stranded_economy::QuestId;
use stranded_shared::Vec3;

/// Events emitted by the simulation.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    // =========================================================================
    // Entity Lifecycle
    // =========================================================================
    /// An entity joined its registry.
    EntitySpawned {
        /// Entity ID.
        id: EntityId,
        /// Model tag (enemy type, item name, "tree", ...).
        tag: String,
        /// Initial position.
        position: Vec3,
    },

    /// An entity left its registry during the removal phase.
    EntityDespawned {
        /// Entity ID.
        id: EntityId,
    },

    // =========================================================================
    // Combat
    // =========================================================================
    /// An enemy took damage.
    EnemyDamaged {
        /// Enemy hit.
        id: EntityId,
        /// Health after the hit.
        health: f32,
    },

    /// An enemy went through the defeat path.
    EnemyDefeated {
        /// Enemy defeated.
        id: EntityId,
        /// Death position on the terrain.
        position: Vec3,
    },

    /// The player took damage.
    PlayerDamaged {
        /// Health after the hit.
        health: f32,
    },

    /// The player died and was moved back to the spawn point.
    PlayerRespawned,

    // =========================================================================
    // World
    // =========================================================================
    /// A flatten batch was committed; terrain meshes must be rebuilt.
    TerrainChanged {
        /// New grid revision.
        revision: u64,
    },

    /// A quest completed and paid out.
    QuestCompleted {
        /// Quest that completed.
        id: QuestId,
    },

    /// A door swung this tick.
    DoorMoved {
        /// Building owning the door.
        building: EntityId,
        /// Door angle after the move.
        angle: f32,
    },

    /// A chest was opened.
    ChestOpened {
        /// Building owning the chest.
        building: EntityId,
    },
}

/// Event bus from the simulation to its consumers.
///
/// Pre-allocates a bounded channel to prevent memory growth when nobody
/// is draining.
pub struct EventBus {
    sender: Sender<GameEvent>,
    receiver: Receiver<GameEvent>,
    dropped: Arc<AtomicU64>,
}

impl EventBus {
    /// Creates a new event bus.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum events in flight before new ones are dropped.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            dropped: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Creates a sender handle (clone for multiple producers).
    #[must_use]
    pub fn sender(&self) -> EventSender {
        EventSender {
            sender: self.sender.clone(),
            dropped: Arc::clone(&self.dropped),
        }
    }

    /// Creates a receiver handle (clone for multiple consumers).
    #[must_use]
    pub fn receiver(&self) -> EventReceiver {
        EventReceiver {
            receiver: self.receiver.clone(),
        }
    }

    /// Events dropped so far because the channel was full.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Handle for sending events.
#[derive(Clone)]
pub struct EventSender {
    sender: Sender<GameEvent>,
    dropped: Arc<AtomicU64>,
}

impl EventSender {
    /// Sends an event (non-blocking).
    ///
    /// Returns `false` if the event was dropped.
    #[inline]
    pub fn send(&self, event: GameEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(_) | TrySendError::Disconnected(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    /// Events dropped by any sender of this bus.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Handle for receiving events.
#[derive(Clone)]
pub struct EventReceiver {
    receiver: Receiver<GameEvent>,
}

impl EventReceiver {
    /// Receives all pending events (non-blocking).
    #[inline]
    pub fn drain(&self) -> Vec<GameEvent> {
        let mut events = Vec::with_capacity(self.receiver.len());
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }

    /// Receives one event (non-blocking).
    #[inline]
    pub fn try_recv(&self) -> Option<GameEvent> {
        self.receiver.try_recv().ok()
    }

    /// Returns the number of pending events.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Checks if there are pending events.
    #[inline]
    #[must_use]
    pub fn has_events(&self) -> bool {
        !self.receiver.is_empty()
    }
}
