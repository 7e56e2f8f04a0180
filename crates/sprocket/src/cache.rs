//! # Persistent Contact Cache
//!
//! Fixed-capacity map from shoe id to the reactions the solver produced for
//! that shoe's last contact. The map is sized for its full capacity up front
//! and never grows past it; when a new shoe arrives with the cache full, the
//! least recently used record is evicted.

use std::collections::HashMap;

use crate::error::CollisionError;
use crate::types::{Reactions, ShoeId};

#[derive(Copy, Clone, Debug)]
struct CacheSlot {
    reactions: Reactions,
    last_used: u64,
}

#[derive(Debug)]
pub struct ContactCache {
    capacity: usize,
    slots: HashMap<ShoeId, CacheSlot>,
    clock: u64,
    evictions: u64,
}

impl ContactCache {
    /// Creates an empty cache that holds at most `capacity` records.
    ///
    /// # Errors
    ///
    /// Returns [`CollisionError::ZeroCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, CollisionError> {
        if capacity == 0 {
            return Err(CollisionError::ZeroCapacity);
        }
        Ok(Self {
            capacity,
            slots: HashMap::with_capacity(capacity),
            clock: 0,
            evictions: 0,
        })
    }

    /// Returns the record for `shoe`, inserting a zeroed one if absent.
    ///
    /// Marks the record as most recently used. Inserting into a full cache
    /// evicts the least recently used record of some other shoe.
    pub fn get_or_create(&mut self, shoe: ShoeId) -> &mut Reactions {
        self.clock += 1;
        let now = self.clock;

        if !self.slots.contains_key(&shoe) && self.slots.len() >= self.capacity {
            self.evict_oldest();
        }

        let slot = self.slots.entry(shoe).or_insert(CacheSlot {
            reactions: Reactions::ZERO,
            last_used: now,
        });
        slot.last_used = now;
        &mut slot.reactions
    }

    /// Looks up `shoe` without inserting or touching recency.
    #[must_use]
    pub fn find(&self, shoe: ShoeId) -> Option<&Reactions> {
        self.slots.get(&shoe).map(|slot| &slot.reactions)
    }

    /// Mutable lookup without inserting or touching recency.
    pub fn find_mut(&mut self, shoe: ShoeId) -> Option<&mut Reactions> {
        self.slots.get_mut(&shoe).map(|slot| &mut slot.reactions)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of records dropped to make room since construction.
    #[must_use]
    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .slots
            .iter()
            .min_by_key(|(_, slot)| slot.last_used)
            .map(|(shoe, _)| *shoe);

        if let Some(shoe) = oldest {
            self.slots.remove(&shoe);
            self.evictions += 1;
            tracing::warn!(
                "Contact cache full ({} records), evicted shoe {}",
                self.capacity,
                shoe.index()
            );
        }
    }
}
