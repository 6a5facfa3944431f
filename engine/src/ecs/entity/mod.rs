//! Entity identity and component storage.
//!
//! Entities are lightweight handles; the [`Pool`](crate::ecs::Pool) that created an entity owns its
//! component slot table and is the only way to reach it.
//!
//! # Architecture
//!
//! - **[`Entity`]**: A unique identifier combining an [`Id`] and [`Generation`]. The ID
//!   identifies the entity slot, while the generation tracks how many times that slot
//!   has been reused. This allows the pool to detect stale entity references.
//!
//! - **[`Allocator`]**: Hands out entity ids and recycles destroyed ones. Recycled ids are
//!   reused oldest-first and always come back with a bumped generation.
//!
//! - **[`Ref`] / [`RefMut`]**: Borrowed handles to a live entity. `RefMut` performs every
//!   component mutation through the pool so cached groups are updated before the call returns.
//!
//! # Generation Tracking
//!
//! ```rust,ignore
//! let entity = allocator.alloc(); // Entity { id: 0, generation: 0 }
//! allocator.free(entity);
//! let reused = allocator.alloc();  // Entity { id: 0, generation: 1 }
//! // Original entity reference is now invalid due to generation mismatch
//! ```

pub(crate) mod reference;
pub(crate) mod slots;

use std::{collections::VecDeque, fmt};

pub use reference::{Ref, RefMut};

/// The generation of an entity, used to track whether an entity is the active entity in a pool.
/// The generation starts at `FIRST` and is incremented each time an entity with the same `id` is
/// destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u32);

impl Generation {
    /// The first generation of an entity.
    pub const FIRST: Self = Self(0);

    /// Get the next generation from the current.
    #[inline]
    pub fn next(&self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// An entity identifier, dense and zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl From<u32> for Id {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// An entity in the ECS.
///
/// A pool contains at most one live entity for a given `id`. The `generation` tells whether a
/// copy of this handle still refers to that live entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entity {
    /// The unique identifier of the entity.
    id: Id,

    /// The generation of the entity.
    generation: Generation,
}

impl Entity {
    /// Construct a new entity with just an id. This will default to the first generation.
    #[inline]
    pub(crate) fn new(id: impl Into<Id>) -> Self {
        Self::new_with_generation(id.into(), Generation::FIRST)
    }

    /// Construct a new entity with an id and known generation.
    #[inline]
    pub(crate) const fn new_with_generation(id: Id, generation: Generation) -> Self {
        Self { id, generation }
    }

    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    #[inline]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Get the index of this entity if it were to live in indexable storage (e.g. Vec)
    #[inline]
    pub fn index(&self) -> usize {
        self.id.0 as usize
    }

    /// Get a new entity with the same id but the next generation.
    #[inline]
    pub fn genned(&self) -> Self {
        Self::new_with_generation(self.id, self.generation.next())
    }
}

impl PartialOrd for Entity {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Entities order by id first, then generation.
impl Ord for Entity {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.id.cmp(&other.id) {
            std::cmp::Ordering::Equal => self.generation.cmp(&other.generation),
            ord => ord,
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.id.0, self.generation.0)
    }
}

/// An allocator for entities.
///
/// Allocates unique entity IDs and recycles freed entities to avoid ID exhaustion.
/// When an entity is freed, its generation is incremented before being placed in the
/// dead pool, invalidating any stale references.
///
/// The allocator is owned by a single pool and only ever touched through `&mut self`, so plain
/// collections are enough.
#[derive(Default, Debug)]
pub struct Allocator {
    /// Current generation for each ID slot, indexed by entity ID.
    generations: Vec<Generation>,

    /// IDs available for reuse, oldest first.
    dead_pool: VecDeque<Id>,

    /// Next fresh ID to allocate.
    next_id: u32,
}

impl Allocator {
    /// Construct a new entity allocator starting from ID 0.
    #[inline]
    pub const fn new() -> Self {
        Self {
            generations: Vec::new(),
            dead_pool: VecDeque::new(),
            next_id: 0,
        }
    }

    /// Construct an allocator with room for `capacity` entity ids.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            generations: Vec::with_capacity(capacity),
            dead_pool: VecDeque::new(),
            next_id: 0,
        }
    }

    /// Allocate a new entity, either by reusing a freed entity from the dead pool
    /// or by allocating a new unique ID.
    pub fn alloc(&mut self) -> Entity {
        if let Some(id) = self.dead_pool.pop_front() {
            return Entity::new_with_generation(id, self.generations[id.0 as usize]);
        }

        let id = Id(self.next_id);
        self.next_id += 1;
        self.generations.push(Generation::FIRST);
        Entity::new(id)
    }

    /// Free an entity for reuse. Returns `false`, and does nothing, if `entity` is not the current
    /// generation of its id (already freed, or never allocated here).
    pub fn free(&mut self, entity: Entity) -> bool {
        if !self.is_current(entity) {
            return false;
        }
        let slot = &mut self.generations[entity.index()];
        *slot = slot.next();
        self.dead_pool.push_back(entity.id);
        true
    }

    /// Determine if `entity` carries the current generation of its id.
    #[inline]
    pub fn is_current(&self, entity: Entity) -> bool {
        self.generations
            .get(entity.index())
            .is_some_and(|generation| *generation == entity.generation)
    }

    /// Number of freed ids waiting to be reused.
    #[inline]
    pub fn reusable_count(&self) -> usize {
        self.dead_pool.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocator_uniqueness() {
        // Given
        let mut allocator = Allocator::default();

        // When
        let mut entities: Vec<_> = (0..200).map(|_| allocator.alloc()).collect();

        // Then - No dupes generated
        let pre_len = entities.len();
        entities.sort();
        entities.dedup();
        assert_eq!(pre_len, entities.len());
    }

    #[test]
    fn allocator_reuse() {
        // Given
        let mut allocator = Allocator::default();
        let entities: Vec<_> = (0..10).map(|_| allocator.alloc()).collect();

        // When
        for e in &entities {
            assert!(allocator.free(*e));
        }
        let mut reused: Vec<_> = (0..10).map(|_| allocator.alloc()).collect();

        // Then - Entities should be reused with incremented generation
        reused.sort();
        for (i, e) in reused.iter().enumerate() {
            assert_eq!(e.id.0, i as u32);
            assert_eq!(e.generation.0, 1);
        }
    }

    #[test]
    fn allocator_reuses_oldest_first() {
        // Given
        let mut allocator = Allocator::default();
        let e0 = allocator.alloc();
        let e1 = allocator.alloc();

        // When
        allocator.free(e1);
        allocator.free(e0);

        // Then
        assert_eq!(allocator.alloc().id, e1.id);
        assert_eq!(allocator.alloc().id, e0.id);
        assert_eq!(allocator.reusable_count(), 0);
    }

    #[test]
    fn allocator_free_rejects_stale() {
        // Given
        let mut allocator = Allocator::default();
        let entity = allocator.alloc();

        // When
        assert!(allocator.free(entity));

        // Then - A second free of the same handle is refused
        assert!(!allocator.free(entity));
        assert!(!allocator.is_current(entity));
        assert_eq!(allocator.reusable_count(), 1);

        // Then - Foreign handles are refused too
        assert!(!allocator.free(Entity::new(Id(99))));
    }

    #[test]
    fn allocator_multiple_generations() {
        // Given
        let mut allocator = Allocator::default();
        let entity = allocator.alloc();
        let original_id = entity.id;

        // When - Free and reallocate multiple times
        allocator.free(entity);
        let gen1 = allocator.alloc();
        allocator.free(gen1);
        let gen2 = allocator.alloc();

        // Then - Same ID, incrementing generations
        assert_eq!(gen1.id, original_id);
        assert_eq!(gen1.generation.0, 1);
        assert_eq!(gen2.id, original_id);
        assert_eq!(gen2.generation.0, 2);
        assert!(allocator.is_current(gen2));
        assert!(!allocator.is_current(gen1));
    }

    #[test]
    fn entity_ordering_and_display() {
        // Given
        let e1 = Entity::new(Id(1));
        let e2 = Entity::new(Id(2));
        let e1_gen1 = e1.genned();

        // Then - Ordered by ID first, then generation
        assert!(e1 < e2);
        assert!(e1 < e1_gen1);
        assert!(e1_gen1 < e2);
        assert_ne!(e1, e1_gen1);
        assert_eq!(e1_gen1.to_string(), "1:1");
    }
}
