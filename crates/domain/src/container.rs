//! Bounded, ordered collection of contained object ids.
//!
//! Rooms and character inventories each own one. The container only tracks ids
//! and slots; resolving an id to an entity is the registry's job.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// One contained object and the slot it occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerEntry {
    pub id: Uuid,
    pub slot: u32,
}

/// Invariant: `len() <= max_size` whenever `max_size != 0`. A `max_size` of
/// zero means unbounded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectContainer {
    #[serde(default)]
    objects: Vec<ContainerEntry>,
    #[serde(default)]
    max_size: u32,
}

impl ObjectContainer {
    pub fn new(max_size: u32) -> Self {
        Self {
            objects: Vec::new(),
            max_size,
        }
    }

    pub fn unbounded() -> Self {
        Self::new(0)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    #[inline]
    pub fn max_size(&self) -> u32 {
        self.max_size
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.max_size != 0 && self.objects.len() >= self.max_size as usize
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.objects.iter().any(|e| e.id == id)
    }

    pub fn slot_of(&self, id: Uuid) -> Option<u32> {
        self.objects.iter().find(|e| e.id == id).map(|e| e.slot)
    }

    pub fn entries(&self) -> &[ContainerEntry] {
        &self.objects
    }

    /// Contained ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.objects.iter().map(|e| e.id)
    }

    /// Lowest slot not currently occupied, or `None` when full.
    pub fn next_available_slot(&self) -> Option<u32> {
        if self.is_full() {
            return None;
        }
        (0..).find(|slot| !self.objects.iter().any(|e| e.slot == *slot))
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Inserts `id` into the lowest free slot and returns that slot.
    ///
    /// # Errors
    ///
    /// - `DomainError::Duplicate` if `id` is already contained
    /// - `DomainError::ContainerFull` if the container is bounded and full
    ///
    /// The container is unchanged on error.
    pub fn add(&mut self, id: Uuid) -> Result<u32, DomainError> {
        if self.contains(id) {
            return Err(DomainError::duplicate(id.to_string()));
        }
        let slot = self.next_available_slot().ok_or_else(|| {
            DomainError::container_full(self.objects.len() as u32, self.max_size)
        })?;
        self.objects.push(ContainerEntry { id, slot });
        Ok(slot)
    }

    /// Removes `id`; returns whether it was present.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.objects.len();
        self.objects.retain(|e| e.id != id);
        self.objects.len() != before
    }

    /// Keeps only the entries for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(Uuid) -> bool) {
        self.objects.retain(|e| keep(e.id));
    }
}
