//! The World is the central container for all entities, components, and
//! systems in the ECS.
//!
//! A `World` manages the lifecycle of entities and their associated component
//! data, and is the only public mutation surface of the core. It provides
//! the API for spawning and despawning entities, attaching and reading
//! components, tagging and grouping, and registering systems.
//!
//! # Architecture
//!
//! The World coordinates several subsystems:
//! - **Entity Allocator**: id allocation, recycling, and generation tracking
//! - **Component Registry**: stable small integer ids for component types
//! - **Component Pools**: one dense sparse-set store per component type,
//!   type-erased behind an eviction capability
//! - **Signature Index**: per-entity bitset of attached component types
//! - **System Registry**: per-system required signature plus the cached list
//!   of matching entities
//! - **Tag/Group Indices**: string labels over entities
//!
//! # Deferred mutation
//!
//! Entity creation and destruction are deferred: a spawned entity becomes
//! visible to systems only at the next [`update`](World::update), and a
//! despawned entity stays fully queryable until that same boundary. Within
//! the boundary, admission always runs before removal, so systems only ever
//! observe fully-assembled entities and lists they iterate mid-frame are
//! never mutated out from under them. Component mutation, by contrast, is
//! synchronous: initial setup completes on the caller's stack before the
//! entity is ever matched.
//!
//! # Example
//!
//! ```ignore
//! use ember_engine::ecs::world::{Id, World};
//!
//! let mut world = World::new(Id::new(1));
//!
//! let entity = world.spawn();
//! world.add_component(entity, Position { x: 0.0, y: 0.0 })?;
//! world.add_component(entity, Velocity { dx: 1.0, dy: 0.0 })?;
//!
//! world.update(); // entity is now visible to matching systems
//!
//! world.despawn(entity)?;
//! world.update(); // entity is gone, its id recycled
//! ```

mod index;

use std::{any::type_name, collections::HashSet, sync::Arc};

use crate::ecs::{
    component::{self, AnyPool, Component, Pool},
    entity::{self, Entity},
    error::{Error, Result},
    signature::Signatures,
    system::{self, System},
    world::index::{GroupIndex, TagIndex},
};

/// A world identifier. This is a unique identifier for a world in the ECS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl Id {
    /// Create a new world identifier.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Id(id)
    }

    /// Get the raw identifier value.
    #[inline]
    pub const fn id(&self) -> u32 {
        self.0
    }
}

/// The central container for all entities, components, and their
/// relationships.
///
/// Each world is isolated from other worlds and maintains its own entities,
/// pools, and systems. Worlds may share a [`component::Registry`] so their
/// component type ids agree; everything else has exactly one owner (the
/// world) for its entire lifetime.
pub struct World {
    /// The world's unique identifier.
    id: Id,

    /// The world's entity allocator.
    entities: entity::Allocator,

    /// The registry of component types, shareable across worlds.
    components: Arc<component::Registry>,

    /// One pool per registered component type, indexed by component id.
    pools: Vec<Option<Box<dyn AnyPool>>>,

    /// Per-entity signature index.
    signatures: Signatures,

    /// The registry of systems and their cached entity lists.
    systems: system::Registry,

    /// 1:1 string tags.
    tags: TagIndex,

    /// Many-to-many group membership.
    groups: GroupIndex,

    /// Entities awaiting admission into systems at the next update boundary.
    pending_spawn: Vec<Entity>,

    /// Entities awaiting removal at the next update boundary.
    pending_despawn: HashSet<Entity>,
}

impl World {
    /// Create a new world with its own component type registry.
    pub fn new(id: Id) -> Self {
        Self::with_registry(id, Arc::new(component::Registry::new()))
    }

    /// Create a new world sharing an existing component type registry, so
    /// that several worlds agree on component ids.
    pub fn with_registry(id: Id, components: Arc<component::Registry>) -> Self {
        Self {
            id,
            entities: entity::Allocator::new(),
            components,
            pools: Vec::new(),
            signatures: Signatures::default(),
            systems: system::Registry::new(),
            tags: TagIndex::default(),
            groups: GroupIndex::default(),
            pending_spawn: Vec::new(),
            pending_despawn: HashSet::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    #[inline]
    pub fn components(&self) -> &component::Registry {
        &self.components
    }

    // ==================== Entity lifecycle ====================

    /// Spawn a new entity.
    ///
    /// The entity's id is allocated immediately (reusing a freed id when one
    /// is available) and components can be attached right away, but the
    /// entity is admitted into matching systems only at the next
    /// [`update`](World::update).
    pub fn spawn(&mut self) -> Entity {
        let entity = self.entities.alloc();
        self.signatures.ensure(entity.id());
        self.pending_spawn.push(entity);

        log::trace!("world {:?}: spawned {entity:?}, pending admission", self.id);

        entity
    }

    /// Spawn many new entities at once.
    pub fn spawn_many(&mut self, count: usize) -> Vec<Entity> {
        (0..count).map(|_| self.spawn()).collect()
    }

    /// Queue an entity for removal at the next [`update`](World::update).
    ///
    /// Until that boundary the entity, its components, its signature, and
    /// its tag/group memberships all remain valid and queryable. Queueing
    /// the same entity twice within a frame is harmless.
    pub fn despawn(&mut self, entity: Entity) -> Result<()> {
        self.ensure_live(entity)?;
        self.pending_despawn.insert(entity);

        log::trace!("world {:?}: despawn queued for {entity:?}", self.id);

        Ok(())
    }

    /// Check whether the handle refers to a currently-live entity.
    #[inline]
    pub fn is_live(&self, entity: Entity) -> bool {
        self.entities.is_live(entity)
    }

    /// Number of currently-live entities (including those pending admission
    /// or removal).
    #[inline]
    pub fn live_count(&self) -> usize {
        self.entities.live_count()
    }

    /// Apply all deferred entity mutations, in two ordered phases.
    ///
    /// 1. Every entity spawned since the last boundary is admitted into the
    ///    systems its *current* signature matches, i.e. with whatever
    ///    components its creator attached before this call.
    /// 2. Every entity despawned since the last boundary is evicted from
    ///    every system, its component entries and signature are purged, its
    ///    tag and group memberships are dropped, and its id is returned to
    ///    the allocator with a bumped generation.
    ///
    /// An entity spawned and despawned within the same frame passes through
    /// both phases in order.
    pub fn update(&mut self) {
        let admitted = self.pending_spawn.len();
        for entity in std::mem::take(&mut self.pending_spawn) {
            if let Some(signature) = self.signatures.get(entity.id()) {
                self.systems.admit(entity, signature);
            }
        }

        let removed = self.pending_despawn.len();
        for entity in std::mem::take(&mut self.pending_despawn) {
            self.systems.evict(entity);
            for pool in self.pools.iter_mut().flatten() {
                pool.evict(entity.id());
            }
            self.signatures.clear(entity.id());
            self.tags.remove(entity);
            self.groups.forget(entity);
            self.entities.free(entity);
        }

        if admitted > 0 || removed > 0 {
            log::debug!(
                "world {:?}: update admitted {admitted} and removed {removed} entities",
                self.id
            );
        }
    }

    // ==================== Components ====================

    /// Register a component type without attaching anything, as part of an
    /// explicit up-front registration pass. Attaching through
    /// [`add_component`](World::add_component) registers on first use via
    /// the same path.
    pub fn register_component<C: Component>(&mut self) -> Result<component::Id> {
        self.components.register::<C>()
    }

    /// Attach a component to an entity, overwriting any existing value of
    /// the same type, and set the entity's signature bit.
    ///
    /// Synchronous: takes effect immediately, regardless of whether the
    /// entity is pending admission or live.
    pub fn add_component<C: Component>(&mut self, entity: Entity, value: C) -> Result<()> {
        self.ensure_live(entity)?;
        let id = self.components.register::<C>()?;

        if id.index() >= self.pools.len() {
            self.pools.resize_with(id.index() + 1, || None);
        }
        let slot = &mut self.pools[id.index()];
        if slot.is_none() {
            *slot = Some(Box::new(Pool::<C>::new()));
        }

        // The registry binds each id to exactly one Rust type, so the pool
        // stored under `id` is always a `Pool<C>`.
        let Some(pool) = slot
            .as_mut()
            .and_then(|erased| erased.as_any_mut().downcast_mut::<Pool<C>>())
        else {
            unreachable!("pool for {id:?} holds a different component type");
        };

        pool.set(entity.id(), value);
        self.signatures.get_mut(entity.id()).insert(id);

        Ok(())
    }

    /// Detach a component from an entity and clear its signature bit.
    ///
    /// Fails with [`Error::MissingComponent`] if the entity has no component
    /// of this type.
    pub fn remove_component<C: Component>(&mut self, entity: Entity) -> Result<()> {
        self.ensure_live(entity)?;
        let Some(id) = self.components.get::<C>() else {
            return Err(Self::missing::<C>(entity));
        };

        self.pool_mut::<C>()
            .and_then(|pool| pool.remove(entity.id()))
            .ok_or_else(|| Self::missing::<C>(entity))?;

        self.signatures.get_mut(entity.id()).remove(id);

        Ok(())
    }

    /// Check whether an entity currently has a component of type `C`, via
    /// its signature bit.
    pub fn has_component<C: Component>(&self, entity: Entity) -> Result<bool> {
        self.ensure_live(entity)?;
        Ok(self.components.get::<C>().is_some_and(|id| {
            self.signatures
                .get(entity.id())
                .is_some_and(|signature| signature.contains(id))
        }))
    }

    /// Get a reference to an entity's component of type `C`.
    pub fn component<C: Component>(&self, entity: Entity) -> Result<&C> {
        self.ensure_live(entity)?;
        self.pool::<C>()
            .and_then(|pool| pool.get(entity.id()))
            .ok_or_else(|| Self::missing::<C>(entity))
    }

    /// Get a mutable reference to an entity's component of type `C`.
    pub fn component_mut<C: Component>(&mut self, entity: Entity) -> Result<&mut C> {
        self.ensure_live(entity)?;
        match self.pool_mut::<C>().and_then(|pool| pool.get_mut(entity.id())) {
            Some(component) => Ok(component),
            None => Err(Self::missing::<C>(entity)),
        }
    }

    // ==================== Systems ====================

    /// Register a system, capturing its required signature before any entity
    /// is matched against it.
    pub fn add_system<S: System>(&mut self, system: S) -> Result<()> {
        self.systems.add(system, &self.components)
    }

    /// Get the registered system of type `S`.
    #[inline]
    pub fn system<S: System>(&self) -> Result<&S> {
        self.systems.get::<S>()
    }

    /// Get the registered system of type `S` mutably.
    #[inline]
    pub fn system_mut<S: System>(&mut self) -> Result<&mut S> {
        self.systems.get_mut::<S>()
    }

    /// Check whether a system of type `S` is registered.
    #[inline]
    pub fn has_system<S: System>(&self) -> bool {
        self.systems.has::<S>()
    }

    /// Remove and return the system of type `S`, dropping its cached entity
    /// list.
    #[inline]
    pub fn remove_system<S: System>(&mut self) -> Result<S> {
        self.systems.remove::<S>()
    }

    /// The entities currently matched to system `S`, exact as of the last
    /// update boundary. This is the per-frame read surface for collaborators
    /// like a renderer, which never mutate the ECS.
    #[inline]
    pub fn system_entities<S: System>(&self) -> Result<&[Entity]> {
        self.systems.entities_of::<S>()
    }

    // ==================== Tags ====================

    /// Bind a tag to an entity (1:1). Fails with [`Error::TagTaken`] if the
    /// tag is held by a different entity; re-tagging an entity replaces its
    /// previous tag.
    pub fn tag(&mut self, entity: Entity, tag: impl Into<String>) -> Result<()> {
        self.ensure_live(entity)?;
        self.tags.tag(entity, tag)
    }

    /// Look up the entity holding a tag.
    #[inline]
    pub fn entity_by_tag(&self, tag: &str) -> Result<Entity> {
        self.tags.entity(tag)
    }

    /// Check whether the entity holds exactly this tag.
    pub fn has_tag(&self, entity: Entity, tag: &str) -> Result<bool> {
        self.ensure_live(entity)?;
        Ok(self.tags.has(entity, tag))
    }

    /// Remove the entity's tag, if any. Removing from an untagged entity is
    /// a no-op.
    pub fn remove_tag(&mut self, entity: Entity) -> Result<()> {
        self.ensure_live(entity)?;
        self.tags.remove(entity);
        Ok(())
    }

    // ==================== Groups ====================

    /// Add an entity to a named group, creating the group on first use. An
    /// entity may belong to any number of groups.
    pub fn add_to_group(&mut self, entity: Entity, group: impl Into<String>) -> Result<()> {
        self.ensure_live(entity)?;
        self.groups.add(entity, group);
        Ok(())
    }

    /// The member set of a group.
    #[inline]
    pub fn entities_in_group(&self, group: &str) -> Result<&HashSet<Entity>> {
        self.groups.members(group)
    }

    /// Check whether the entity belongs to the group.
    pub fn in_group(&self, entity: Entity, group: &str) -> Result<bool> {
        self.ensure_live(entity)?;
        Ok(self.groups.contains(entity, group))
    }

    /// The groups an entity belongs to, in no particular order.
    pub fn groups_of(&self, entity: Entity) -> Result<Vec<&str>> {
        self.ensure_live(entity)?;
        Ok(self.groups.groups_of(entity))
    }

    /// Remove an entity from one group; works for any of its memberships.
    pub fn remove_from_group(&mut self, entity: Entity, group: &str) -> Result<()> {
        self.ensure_live(entity)?;
        self.groups.remove(entity, group)
    }

    // ==================== Internals ====================

    /// Validate that the handle refers to a currently-live entity.
    #[inline]
    fn ensure_live(&self, entity: Entity) -> Result<()> {
        if self.entities.is_live(entity) {
            Ok(())
        } else {
            Err(Error::StaleEntity(entity))
        }
    }

    /// The concrete pool for component type `C`, if one exists.
    fn pool<C: Component>(&self) -> Option<&Pool<C>> {
        let id = self.components.get::<C>()?;
        self.pools
            .get(id.index())?
            .as_ref()?
            .as_any()
            .downcast_ref::<Pool<C>>()
    }

    /// The concrete pool for component type `C` mutably, if one exists.
    fn pool_mut<C: Component>(&mut self) -> Option<&mut Pool<C>> {
        let id = self.components.get::<C>()?;
        self.pools
            .get_mut(id.index())?
            .as_mut()?
            .as_any_mut()
            .downcast_mut::<Pool<C>>()
    }

    /// Build the missing-component error for type `C`.
    fn missing<C: Component>(entity: Entity) -> Error {
        Error::MissingComponent {
            entity,
            component: type_name::<C>(),
        }
    }
}
