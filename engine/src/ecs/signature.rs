//! Component signatures: fixed-width bitsets over component type ids.
//!
//! Every entity carries a [`Signature`] recording which component types are
//! currently attached to it (bit *i* set iff the entity has a live entry in
//! pool *i*), and every system captures one describing the component types
//! it requires. Matching an entity against a system is a single superset
//! test over the two bitsets.

use fixedbitset::FixedBitSet;

use crate::ecs::{component, entity};

/// A fixed-width bit set with one bit per component type id.
///
/// Width is [`component::MAX_TYPES`]; component ids are guaranteed to stay
/// below that bound by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// The bitset tracking component type membership.
    bits: FixedBitSet,
}

impl Default for Signature {
    fn default() -> Self {
        Self::new()
    }
}

impl Signature {
    /// Create an empty signature.
    #[inline]
    pub fn new() -> Self {
        Self {
            bits: FixedBitSet::with_capacity(component::MAX_TYPES),
        }
    }

    /// Set the bit for a component type.
    #[inline]
    pub fn insert(&mut self, id: component::Id) {
        self.bits.insert(id.index());
    }

    /// Clear the bit for a component type.
    #[inline]
    pub fn remove(&mut self, id: component::Id) {
        self.bits.set(id.index(), false);
    }

    /// Check whether the bit for a component type is set.
    #[inline]
    pub fn contains(&self, id: component::Id) -> bool {
        self.bits.contains(id.index())
    }

    /// Check if this signature contains every bit of `other`: the
    /// entity-matches-system superset test. Extra bits in `self` are
    /// irrelevant.
    #[inline]
    pub fn contains_all(&self, other: &Signature) -> bool {
        self.bits.is_superset(&other.bits)
    }

    /// Check if no bits are set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_clear()
    }

    /// The number of set bits.
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.count_ones(..)
    }

    /// Clear all bits.
    #[inline]
    pub fn clear(&mut self) {
        self.bits.clear();
    }
}

/// Per-entity signature storage, dense-indexed by entity id.
#[derive(Debug, Default)]
pub(crate) struct Signatures {
    /// One signature per entity id slot; grows on demand.
    map: Vec<Signature>,
}

impl Signatures {
    /// Ensure a (cleared) signature slot exists for the entity id.
    pub fn ensure(&mut self, id: entity::Id) {
        if id.index() >= self.map.len() {
            self.map.resize_with(id.index() + 1, Signature::new);
        }
    }

    /// Get the entity's signature, if its slot exists.
    #[inline]
    pub fn get(&self, id: entity::Id) -> Option<&Signature> {
        self.map.get(id.index())
    }

    /// Get the entity's signature mutably, growing the index as needed.
    #[inline]
    pub fn get_mut(&mut self, id: entity::Id) -> &mut Signature {
        self.ensure(id);
        &mut self.map[id.index()]
    }

    /// Clear all bits of the entity's signature.
    pub fn clear(&mut self, id: entity::Id) {
        if let Some(signature) = self.map.get_mut(id.index()) {
            signature.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(value: u32) -> component::Id {
        component::Id::new(value)
    }

    #[test]
    fn insert_remove_contains() {
        // Given
        let mut signature = Signature::new();

        // When
        signature.insert(id(0));
        signature.insert(id(5));

        // Then
        assert!(signature.contains(id(0)));
        assert!(signature.contains(id(5)));
        assert!(!signature.contains(id(1)));
        assert_eq!(signature.len(), 2);

        // When
        signature.remove(id(0));

        // Then
        assert!(!signature.contains(id(0)));
        assert!(signature.contains(id(5)));
    }

    #[test]
    fn superset_matching() {
        // Given - a system requiring components 1 and 3
        let mut required = Signature::new();
        required.insert(id(1));
        required.insert(id(3));

        // When - an entity with exactly those, one with extras, one missing a bit
        let mut exact = Signature::new();
        exact.insert(id(1));
        exact.insert(id(3));

        let mut extra = exact.clone();
        extra.insert(id(7));

        let mut partial = Signature::new();
        partial.insert(id(1));

        // Then - extras are irrelevant, missing bits fail the match
        assert!(exact.contains_all(&required));
        assert!(extra.contains_all(&required));
        assert!(!partial.contains_all(&required));

        // Then - the empty requirement matches everything
        let empty = Signature::new();
        assert!(partial.contains_all(&empty));
        assert!(empty.contains_all(&empty));
    }

    #[test]
    fn clear_empties_signature() {
        // Given
        let mut signature = Signature::new();
        signature.insert(id(2));
        signature.insert(id(9));
        assert!(!signature.is_empty());

        // When
        signature.clear();

        // Then
        assert!(signature.is_empty());
        assert_eq!(signature.len(), 0);
    }

    #[test]
    fn signatures_index_grows_on_demand() {
        // Given
        let mut signatures = Signatures::default();

        // When
        signatures.get_mut(10.into()).insert(id(3));

        // Then
        assert!(signatures.get(10.into()).unwrap().contains(id(3)));
        assert!(signatures.get(0.into()).unwrap().is_empty());
        assert!(signatures.get(11.into()).is_none());

        // When
        signatures.clear(10.into());

        // Then
        assert!(signatures.get(10.into()).unwrap().is_empty());
    }
}
