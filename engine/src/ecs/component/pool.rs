//! Dense sparse-set storage for a single component type.
//!
//! A [`Pool`] keeps one component value per entity in a gap-free dense
//! array, plus two inverse index maps: a sparse map from entity id to dense
//! [`Row`], and a dense map from row back to entity id. Lookups and inserts
//! are O(1); removal is O(1) swap-remove, which reorders unrelated elements,
//! so callers must not depend on pool iteration order being stable across
//! removals.
//!
//! Invariants:
//! - the two maps are inverse bijections over exactly the live entries,
//! - the dense array has no gaps,
//! - `len()` equals the live entry count.
//!
//! The world stores pools type-erased behind [`AnyPool`], which exposes just
//! the capability it needs during entity teardown ("remove this entity's
//! entry, whatever the component type is") plus downcasting back to the
//! concrete pool.

use std::any::Any;

use crate::ecs::{component::Component, entity};

/// A dense row index within a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Row(u32);

impl Row {
    #[inline]
    fn new(index: usize) -> Self {
        Self(index as u32)
    }

    #[inline]
    fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Dense storage for components of type `C`, keyed by entity id.
#[derive(Debug)]
pub struct Pool<C: Component> {
    /// The component values, dense and gap-free.
    dense: Vec<C>,

    /// Dense row -> entity id. Parallel to `dense`.
    entities: Vec<entity::Id>,

    /// Sparse entity id -> dense row. Indexed by the entity id value; grows
    /// on demand.
    rows: Vec<Option<Row>>,
}

impl<C: Component> Default for Pool<C> {
    /// Custom default so `C` itself need not implement `Default`.
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Component> Pool<C> {
    /// Create a new, empty pool.
    #[inline]
    pub fn new() -> Self {
        Self {
            dense: Vec::new(),
            entities: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Set the component value for an entity.
    ///
    /// If the entity already has an entry, the existing slot is overwritten
    /// in place (O(1)). Otherwise the value is appended to the dense array
    /// and both index mappings are recorded (amortized O(1)).
    ///
    /// The caller is responsible for updating the entity's signature bit.
    pub fn set(&mut self, id: entity::Id, value: C) {
        if let Some(row) = self.row(id) {
            self.dense[row.index()] = value;
            return;
        }

        let row = Row::new(self.dense.len());
        self.dense.push(value);
        self.entities.push(id);

        if id.index() >= self.rows.len() {
            self.rows.resize(id.index() + 1, None);
        }
        self.rows[id.index()] = Some(row);
    }

    /// Get the component value for an entity, if present.
    #[inline]
    pub fn get(&self, id: entity::Id) -> Option<&C> {
        let row = self.row(id)?;
        self.dense.get(row.index())
    }

    /// Get the component value for an entity mutably, if present.
    #[inline]
    pub fn get_mut(&mut self, id: entity::Id) -> Option<&mut C> {
        let row = self.row(id)?;
        self.dense.get_mut(row.index())
    }

    /// Remove the component value for an entity, returning it if present.
    ///
    /// Swap-remove: the last live entry is moved into the removed slot and
    /// both index maps are fixed up so the moved entry's new row is correct.
    /// O(1); absent ids are a no-op returning `None`.
    pub fn remove(&mut self, id: entity::Id) -> Option<C> {
        let row = self.rows.get_mut(id.index())?.take()?;

        let value = self.dense.swap_remove(row.index());
        self.entities.swap_remove(row.index());

        // If an entry was moved into the vacated row, point its sparse slot
        // at the new location.
        if row.index() < self.entities.len() {
            let moved = self.entities[row.index()];
            self.rows[moved.index()] = Some(row);
        }

        Some(value)
    }

    /// Check whether the entity has an entry in this pool.
    #[inline]
    pub fn contains(&self, id: entity::Id) -> bool {
        self.row(id).is_some()
    }

    /// Number of live entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Check if the pool has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// The entity ids with entries, in dense order.
    #[inline]
    pub fn entities(&self) -> &[entity::Id] {
        &self.entities
    }

    /// Clear all entries, used for pool-wide reinitialization.
    pub fn reset(&mut self) {
        self.dense.clear();
        self.entities.clear();
        self.rows.clear();
    }

    /// Look up the dense row for an entity id.
    #[inline]
    fn row(&self, id: entity::Id) -> Option<Row> {
        *self.rows.get(id.index())?
    }
}

/// The type-erased capability the world needs from every pool during entity
/// teardown. The world downcasts back to the concrete [`Pool`] through
/// [`as_any`](AnyPool::as_any), keyed by the component's registered id.
pub trait AnyPool: Any {
    /// Remove the entity's entry if it has one; a no-op otherwise.
    fn evict(&mut self, id: entity::Id);

    /// Clear all entries.
    fn reset(&mut self);

    /// Upcast to `&dyn Any` for downcasting to the concrete pool type.
    fn as_any(&self) -> &dyn Any;

    /// Upcast to `&mut dyn Any` for downcasting to the concrete pool type.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<C: Component> AnyPool for Pool<C> {
    fn evict(&mut self, id: entity::Id) {
        self.remove(id);
    }

    fn reset(&mut self) {
        Pool::reset(self);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
