//! Entity identity and allocation for the ECS.
//!
//! An entity is a lightweight handle with no intrinsic data: it ties
//! components together and lets systems track game objects. The module is
//! built around two types:
//!
//! - **[`Entity`]**: a unique identifier combining an [`Id`] and a
//!   [`Generation`]. The id identifies the entity slot, while the generation
//!   tracks how many times that slot has been reused.
//!
//! - **[`Allocator`]**: hands out entity ids and recycles freed ones through
//!   a dead pool, keeping the id space compact for id-indexed storage.
//!
//! # Generation Tracking
//!
//! When an entity is freed its slot generation is incremented before the id
//! is returned to the dead pool. Any handle retained past the free carries
//! the old generation and no longer validates, so stale handles are detected
//! instead of silently aliasing whichever entity next reuses the id:
//!
//! ```rust,ignore
//! let entity = allocator.alloc(); // Entity { id: 0, generation: 0 }
//! allocator.free(entity);
//! let reused = allocator.alloc(); // Entity { id: 0, generation: 1 }
//! assert!(!allocator.is_live(entity)); // original handle is now stale
//! ```

/// The generation of an entity slot, incremented each time an entity with the
/// same id is allocated. Starts at `FIRST` for a fresh id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u32);

impl Generation {
    /// The first generation of an entity.
    const FIRST: Self = Self(0);

    /// Get the next generation from the current.
    #[inline]
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

/// An entity identifier. This is a unique identifier for an entity slot in
/// the ECS; ids are dense and reused after the entity is freed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl Id {
    /// Get the index of this id if it were to live in indexable storage (e.g. Vec).
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for Id {
    #[inline]
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// An entity in the ECS. Uniquely identifies an entity using its `id` and
/// `generation`. A world contains at most one live entity for a given id; the
/// generation records which reuse of the id this handle refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entity {
    /// The unique identifier of the entity.
    id: Id,

    /// The generation of the entity.
    generation: Generation,
}

impl Entity {
    /// Construct a new entity with just an id, defaulting to the first
    /// generation. Primarily used for testing.
    #[inline]
    pub(crate) fn new(id: impl Into<Id>) -> Self {
        Self::new_with_generation(id.into(), Generation::FIRST)
    }

    /// Construct a new entity with an id and a known generation.
    #[inline]
    pub(crate) const fn new_with_generation(id: Id, generation: Generation) -> Self {
        Self { id, generation }
    }

    /// Get the id of this entity.
    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Get the generation of this entity.
    #[inline]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Get the index of this entity if it were to live in indexable storage (e.g. Vec).
    #[inline]
    pub fn index(&self) -> usize {
        self.id.0 as usize
    }
}

/// Implement ordering for Entity based on id and generation.
impl PartialOrd for Entity {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Implement ordering for Entity based on id and generation.
impl Ord for Entity {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.id.cmp(&other.id) {
            std::cmp::Ordering::Equal => self.generation.cmp(&other.generation),
            ord => ord,
        }
    }
}

/// Per-id slot bookkeeping: the current generation of the id and whether an
/// entity with that id is currently live.
#[derive(Debug, Clone, Copy)]
struct Slot {
    generation: Generation,
    alive: bool,
}

/// An allocator for entities in the ECS.
///
/// Allocates unique entity ids and recycles freed ids through a dead pool to
/// keep the id space compact. Freeing bumps the slot generation, so handles
/// retained past the free fail [`is_live`](Allocator::is_live) instead of
/// aliasing the id's next occupant.
///
/// The allocator is owned exclusively by its world and all operations take
/// `&mut self`; the core is single-threaded by contract, so no atomics are
/// involved.
#[derive(Default, Debug)]
pub struct Allocator {
    /// One slot per id ever allocated, indexed by the id value.
    slots: Vec<Slot>,

    /// Pool of ids available for reuse.
    dead_pool: Vec<Id>,
}

impl Allocator {
    /// Construct a new entity allocator starting from id 0.
    #[inline]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            dead_pool: Vec::new(),
        }
    }

    /// Allocate a new entity, either by reusing a freed id from the dead pool
    /// or by allocating a new unique id.
    pub fn alloc(&mut self) -> Entity {
        if let Some(id) = self.dead_pool.pop() {
            let slot = &mut self.slots[id.index()];
            slot.alive = true;
            return Entity::new_with_generation(id, slot.generation);
        }

        // Fresh id: the next slot index.
        let id = Id(self.slots.len() as u32);
        self.slots.push(Slot {
            generation: Generation::FIRST,
            alive: true,
        });
        Entity::new(id)
    }

    /// Allocate many new entities at once.
    ///
    /// Reuses ids from the dead pool first, then allocates new ids as needed.
    pub fn alloc_many(&mut self, count: usize) -> Vec<Entity> {
        (0..count).map(|_| self.alloc()).collect()
    }

    /// Free an entity's id for reuse.
    ///
    /// Bumps the slot generation so existing handles to the id stop
    /// validating, then returns the id to the dead pool. Callers must only
    /// free handles that are currently live.
    pub fn free(&mut self, entity: Entity) {
        debug_assert!(self.is_live(entity), "freeing a non-live entity handle");

        let slot = &mut self.slots[entity.index()];
        slot.generation = slot.generation.next();
        slot.alive = false;
        self.dead_pool.push(entity.id());
    }

    /// Check whether the given handle refers to a currently-live entity: its
    /// id must be allocated, marked alive, and carry the slot's current
    /// generation.
    #[inline]
    pub fn is_live(&self, entity: Entity) -> bool {
        self.slots
            .get(entity.index())
            .is_some_and(|slot| slot.alive && slot.generation == entity.generation())
    }

    /// Number of currently-live entities.
    #[inline]
    pub fn live_count(&self) -> usize {
        self.slots.len() - self.dead_pool.len()
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
        let mut entities = Vec::new();
        for _ in 0..200 {
            entities.push(allocator.alloc());
        }

        // Then - No dupes generated
        let pre_len = entities.len();
        entities.sort();
        entities.dedup();
        assert_eq!(pre_len, entities.len());
    }

    #[test]
    fn allocator_reuse_bumps_generation() {
        // Given
        let mut allocator = Allocator::default();

        let mut entities = Vec::new();
        for _ in 0..10 {
            entities.push(allocator.alloc());
        }

        // When - free everything and allocate again
        for e in entities.drain(..) {
            allocator.free(e);
        }

        let mut reused = Vec::new();
        for _ in 0..10 {
            reused.push(allocator.alloc());
        }

        // Then - ids are reused with an incremented generation
        reused.sort();
        for e in &reused {
            assert!(e.id().index() < 10);
            assert_eq!(e.generation(), Generation(1));
        }
    }

    #[test]
    fn allocator_free_and_reuse_cycle() {
        // Given
        let mut allocator = Allocator::default();

        let mut entities = Vec::new();
        for _ in 0..5 {
            entities.push(allocator.alloc());
        }
        assert_eq!(allocator.dead_pool.len(), 0);

        // When - free all, then allocate one more than the pool holds
        for e in entities.drain(..) {
            allocator.free(e);
        }
        assert_eq!(allocator.dead_pool.len(), 5);

        let mut fresh = Vec::new();
        for _ in 0..6 {
            fresh.push(allocator.alloc());
        }

        // Then - 5 reused (gen 1) + 1 new (gen 0)
        assert_eq!(allocator.dead_pool.len(), 0);
        let new_count = fresh
            .iter()
            .filter(|e| e.generation() == Generation::FIRST)
            .count();
        let reused_count = fresh.iter().filter(|e| e.generation() == Generation(1)).count();
        assert_eq!(new_count, 1);
        assert_eq!(reused_count, 5);
    }

    #[test]
    fn allocator_stale_handle_detection() {
        // Given
        let mut allocator = Allocator::default();
        let entity = allocator.alloc();
        assert!(allocator.is_live(entity));

        // When - free the entity and reuse its id
        allocator.free(entity);
        let reused = allocator.alloc();

        // Then - old handle is stale, new handle is live, same id
        assert_eq!(reused.id(), entity.id());
        assert!(!allocator.is_live(entity));
        assert!(allocator.is_live(reused));
    }

    #[test]
    fn allocator_multiple_generations() {
        // Given
        let mut allocator = Allocator::default();
        let entity = allocator.alloc();
        let original_id = entity.id();

        // When - free and reallocate multiple times
        allocator.free(entity);
        let gen1 = allocator.alloc();

        allocator.free(gen1);
        let gen2 = allocator.alloc();

        // Then - same id, incrementing generations
        assert_eq!(gen1.id(), original_id);
        assert_eq!(gen1.generation(), Generation(1));
        assert_eq!(gen2.id(), original_id);
        assert_eq!(gen2.generation(), Generation(2));
    }

    #[test]
    fn allocator_alloc_many_mixed() {
        // Given
        let mut allocator = Allocator::default();
        for e in allocator.alloc_many(3) {
            allocator.free(e);
        }
        assert_eq!(allocator.dead_pool.len(), 3);

        // When - allocate more than the pool holds
        let entities = allocator.alloc_many(5);

        // Then - 3 reused + 2 new, pool drained
        assert_eq!(entities.len(), 5);
        let reused = entities
            .iter()
            .filter(|e| e.generation() == Generation(1))
            .count();
        let fresh = entities
            .iter()
            .filter(|e| e.generation() == Generation::FIRST)
            .count();
        assert_eq!(reused, 3);
        assert_eq!(fresh, 2);
        assert_eq!(allocator.dead_pool.len(), 0);
        assert_eq!(allocator.live_count(), 5);
    }

    #[test]
    fn entity_ordering_and_equality() {
        // Given
        let e1 = Entity::new(Id(1));
        let e2 = Entity::new(Id(2));
        let e1_gen1 = Entity::new_with_generation(Id(1), Generation(1));

        // Then - ordered by id first, then generation
        assert!(e1 < e2);
        assert!(e1 < e1_gen1);
        assert!(e1_gen1 < e2);
        assert_ne!(e1, e1_gen1);
        assert_eq!(e1, Entity::new(Id(1)));
    }
}
