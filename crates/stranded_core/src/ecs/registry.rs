//! # Registry
//!
//! An ordered arena of one entity kind plus its pending-removal list.
//!
//! Removal is two-phase. `queue_removal` only marks; `purge` is the one
//! place entries leave the arena. Between the two, the entry stays fully
//! readable so every system in a tick sees the same collection.

use tracing::{debug, warn};

use super::entity::{EntityId, EntityKind};

/// Ordered collection of live entities of a single kind.
#[derive(Debug, Clone)]
pub struct Registry<T> {
    kind: EntityKind,
    /// Sorted by serial; compaction keeps the order.
    entries: Vec<(EntityId, T)>,
    /// Kept sorted for lookup.
    pending: Vec<EntityId>,
    next_serial: u32,
}

impl<T> Registry<T> {
    /// Creates an empty registry for `kind`.
    #[must_use]
    pub fn new(kind: EntityKind) -> Self {
        Self::with_capacity(kind, 0)
    }

    /// Creates an empty registry with room for `capacity` entities.
    #[must_use]
    pub fn with_capacity(kind: EntityKind, capacity: usize) -> Self {
        Self {
            kind,
            entries: Vec::with_capacity(capacity),
            pending: Vec::new(),
            next_serial: 0,
        }
    }

    /// Kind of every entity in this registry.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Id the next `spawn` will return.
    #[inline]
    #[must_use]
    pub const fn next_id(&self) -> EntityId {
        EntityId::new(self.kind, self.next_serial)
    }

    /// Appends an entity and returns its id.
    ///
    /// Serials are never reused. Once they run out, `value` is dropped and
    /// `EntityId::NULL` is returned.
    pub fn spawn(&mut self, value: T) -> EntityId {
        let Some(next) = self.next_serial.checked_add(1) else {
            warn!(kind = self.kind.name(), "entity serials exhausted");
            return EntityId::NULL;
        };
        let id = EntityId::new(self.kind, self.next_serial);
        self.next_serial = next;
        self.entries.push((id, value));
        id
    }

    fn position(&self, id: EntityId) -> Option<usize> {
        if id.kind() != Some(self.kind) {
            return None;
        }
        self.entries
            .binary_search_by_key(&id.serial(), |(entry, _)| entry.serial())
            .ok()
    }

    /// Entity present in the collection (pending or not).
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.position(id).is_some()
    }

    /// Entity present and not waiting for purge.
    #[must_use]
    pub fn is_live(&self, id: EntityId) -> bool {
        self.contains(id) && !self.is_pending(id)
    }

    /// Entity marked for removal this tick.
    #[must_use]
    pub fn is_pending(&self, id: EntityId) -> bool {
        self.pending.binary_search(&id).is_ok()
    }

    /// Shared access to an entity.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.position(id).map(|i| &self.entries[i].1)
    }

    /// Mutable access to an entity.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        let i = self.position(id)?;
        Some(&mut self.entries[i].1)
    }

    /// Iterates in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> + '_ {
        self.entries.iter().map(|(id, value)| (*id, value))
    }

    /// Iterates mutably in spawn order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> + '_ {
        self.entries.iter_mut().map(|(id, value)| (*id, value))
    }

    /// Snapshot of the current ids, in spawn order.
    ///
    /// Use this to walk the registry while mutating other state.
    #[must_use]
    pub fn ids(&self) -> Vec<EntityId> {
        self.entries.iter().map(|(id, _)| *id).collect()
    }

    /// Number of entities present, pending ones included.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the registry holds nothing.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entities marked for removal.
    #[inline]
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Marks an entity for removal at the next purge.
    ///
    /// Returns `false` (and does nothing) when the entity is absent or
    /// already queued.
    pub fn queue_removal(&mut self, id: EntityId) -> bool {
        if !self.contains(id) {
            return false;
        }
        let Err(slot) = self.pending.binary_search(&id) else {
            return false;
        };
        self.pending.insert(slot, id);
        debug!(entity = %id, "queued for removal");
        true
    }

    /// Removes every queued entity and clears the queue.
    ///
    /// Survivors keep their relative order. Removed entities are returned
    /// in registry order so the caller can release their bodies.
    pub fn purge(&mut self) -> Vec<(EntityId, T)> {
        if self.pending.is_empty() {
            return Vec::new();
        }

        let pending = std::mem::take(&mut self.pending);

        let mut removed = Vec::with_capacity(pending.len());
        let mut kept = Vec::with_capacity(self.entries.len());
        for (id, value) in self.entries.drain(..) {
            if pending.binary_search(&id).is_ok() {
                removed.push((id, value));
            } else {
                kept.push((id, value));
            }
        }
        self.entries = kept;

        debug!(kind = self.kind.name(), removed = removed.len(), "purged");
        removed
    }
}
