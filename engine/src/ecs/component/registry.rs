use std::{
    any::{TypeId, type_name},
    sync::RwLock,
    sync::atomic::{AtomicU32, Ordering},
};

use dashmap::DashMap;

use crate::ecs::{
    component::{Component, Id, MAX_TYPES},
    error::{Error, Result},
    signature::Signature,
};

/// Metadata about a registered component type.
#[derive(Debug, Clone, Copy)]
pub struct Info {
    /// The component id assigned at registration.
    id: Id,

    /// The Rust TypeId for runtime type checking.
    type_id: TypeId,

    /// The component type's name, for diagnostics.
    name: &'static str,
}

impl Info {
    /// Construct Info for component type `C`.
    fn new<C: Component>(id: Id) -> Self {
        Self {
            id,
            type_id: TypeId::of::<C>(),
            name: type_name::<C>(),
        }
    }

    /// Get the component id.
    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Get the Rust TypeId.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Get the component type's name.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// A thread-safe component type registry. Assigns each concrete component
/// type a stable small integer [`Id`] on first registration and enforces the
/// fixed [`MAX_TYPES`] bound.
///
/// The registry uses lock-free reads for TypeId→Id lookups via `DashMap`,
/// making the common read path highly performant. Registration uses minimal
/// locking - a single shard of the DashMap and a write lock for the info
/// vector.
///
/// Why thread-safe?
/// - Most things in the ECS are not thread-safe, but different worlds may be
///   created in their own threads, and worlds sharing a registry (via `Arc`)
///   need to agree on component ids.
pub struct Registry {
    /// Map from TypeId to component Id. Lock-free reads via sharded
    /// concurrent hashmap.
    type_map: DashMap<TypeId, Id>,

    /// List of registered component entries. Protected by RwLock for rare writes.
    components: RwLock<Vec<Option<Info>>>,

    /// Next available component identifier.
    next_id: AtomicU32,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Create a new component type registry.
    #[inline]
    pub fn new() -> Self {
        Self {
            type_map: DashMap::new(),
            components: RwLock::new(Vec::new()),
            next_id: AtomicU32::new(0),
        }
    }

    /// Register a component type and get its unique identifier.
    ///
    /// Returns the same id for the same `C` on every call. The first call
    /// for a never-seen type allocates the next unused id, or fails with
    /// [`Error::TooManyComponentTypes`] if the allocation would exceed
    /// [`MAX_TYPES`], on the offending registration and not earlier.
    pub fn register<C: Component>(&self) -> Result<Id> {
        let type_id = TypeId::of::<C>();

        // Fast path: check if already registered (lock-free read)
        if let Some(id) = self.type_map.get(&type_id) {
            return Ok(*id);
        }

        // Slow path: need to register
        // Use entry API to avoid race condition where two threads both miss the cache
        match self.type_map.entry(type_id) {
            dashmap::Entry::Occupied(occupied) => Ok(*occupied.get()),
            dashmap::Entry::Vacant(vacant) => {
                // Claim the next identifier; once the bound is hit every
                // later registration lands here and fails the same way.
                let id_value = self.next_id.fetch_add(1, Ordering::Relaxed);
                if id_value as usize >= MAX_TYPES {
                    return Err(Error::TooManyComponentTypes {
                        component: type_name::<C>(),
                        max: MAX_TYPES,
                    });
                }
                let comp_id = Id::new(id_value);

                // Add entry to the components list
                let mut components = self.components.write().unwrap();
                let index = id_value as usize;

                // Expand if necessary
                if index >= components.len() {
                    components.resize(index + 1, None);
                }

                components[index] = Some(Info::new::<C>(comp_id));
                vacant.insert(comp_id);

                log::debug!("registered component type '{}' as {comp_id:?}", type_name::<C>());

                Ok(comp_id)
            }
        }
    }

    /// Register component type `C` and set its bit in the given signature.
    ///
    /// This is the building block systems use to declare their required
    /// component types.
    #[inline]
    pub fn require<C: Component>(&self, signature: &mut Signature) -> Result<()> {
        signature.insert(self.register::<C>()?);
        Ok(())
    }

    /// Get the component id for a provided type `C`, if registered.
    ///
    /// Performance:
    /// - Uses lock-free read to get id from TypeId.
    #[inline]
    pub fn get<C: Component>(&self) -> Option<Id> {
        let type_id = TypeId::of::<C>();
        self.type_map.get(&type_id).map(|entry| *entry.value())
    }

    /// Get the component info for a provided type `C`, if registered.
    #[inline]
    pub fn get_info<C: Component>(&self) -> Option<Info> {
        let id = self.get::<C>()?;
        self.get_info_by_id(id)
    }

    /// Get component info by id.
    ///
    /// Performance:
    /// - Uses read lock to access the component info vector.
    #[inline]
    pub fn get_info_by_id(&self, id: Id) -> Option<Info> {
        let components = self.components.read().unwrap();
        components.get(id.index()).and_then(|i| *i)
    }

    /// Get the number of registered component types.
    #[inline]
    pub fn len(&self) -> usize {
        (self.next_id.load(Ordering::Relaxed) as usize).min(MAX_TYPES)
    }

    /// Check if the registry is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    use ember_macros::Component;

    #[test]
    fn component_registration() {
        // Given
        #[derive(Component, Debug)]
        struct Position();

        #[derive(Component, Debug)]
        struct Velocity();

        let registry = Registry::new();

        // When
        let pos_id = registry.register::<Position>().unwrap();
        let vel_id = registry.register::<Velocity>().unwrap();

        // Then
        assert_ne!(pos_id, vel_id);
        assert_eq!(registry.len(), 2);

        // Then - Registering the same type again should result in the same id
        assert_eq!(registry.register::<Position>().unwrap(), pos_id);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn component_id_retrieval() {
        // Given
        #[derive(Component, Debug)]
        struct Health();

        let registry = Registry::new();
        let health_id = registry.register::<Health>().unwrap();

        // When
        let retrieved = registry.get::<Health>().unwrap();

        // Then
        assert_eq!(health_id, retrieved);

        // When - Retrieving a non-registered component
        #[derive(Component, Debug)]
        struct Mana();

        // Then
        assert!(registry.get::<Mana>().is_none());
    }

    #[test]
    fn component_info_retrieval() {
        // Given
        #[derive(Component, Debug)]
        struct Health();

        let registry = Registry::new();
        let health_id = registry.register::<Health>().unwrap();

        // When
        let info = registry.get_info::<Health>().unwrap();

        // Then
        assert_eq!(health_id, info.id());
        assert_eq!(std::any::TypeId::of::<Health>(), info.type_id());
        assert!(info.name().contains("Health"));
    }

    #[test]
    fn capacity_bound_fails_on_offending_registration() {
        // Given - a registry with all but one id consumed
        struct Filler<const N: usize>;
        impl<const N: usize> crate::ecs::Component for Filler<N> {}

        macro_rules! register_fillers {
            ($registry:ident, $($n:literal),*) => {
                $( $registry.register::<Filler<$n>>().unwrap(); )*
            };
        }

        let registry = Registry::new();
        register_fillers!(
            registry, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20,
            21, 22, 23, 24, 25, 26, 27, 28, 29, 30
        );
        assert_eq!(registry.len(), MAX_TYPES - 1);

        // When - the 32nd type registers, then a 33rd
        let last = registry.register::<Filler<31>>();
        let overflow = registry.register::<Filler<32>>();

        // Then - the bound fails exactly on the offending registration
        assert!(last.is_ok());
        assert!(matches!(
            overflow,
            Err(Error::TooManyComponentTypes { max: MAX_TYPES, .. })
        ));
        assert_eq!(registry.len(), MAX_TYPES);

        // Then - already-registered types are still retrievable
        assert_eq!(registry.register::<Filler<0>>().unwrap(), Id::new(0));
    }

    #[test]
    fn require_sets_signature_bits() {
        // Given
        #[derive(Component, Debug)]
        struct Position();

        #[derive(Component, Debug)]
        struct Velocity();

        let registry = Registry::new();
        let mut signature = Signature::new();

        // When
        registry.require::<Position>(&mut signature).unwrap();
        registry.require::<Velocity>(&mut signature).unwrap();

        // Then
        assert!(signature.contains(registry.get::<Position>().unwrap()));
        assert!(signature.contains(registry.get::<Velocity>().unwrap()));
        assert_eq!(signature.len(), 2);
    }

    #[test]
    fn concurrent_registration() {
        // Given
        #[derive(Component, Debug)]
        struct Position();

        #[derive(Component, Debug)]
        struct Velocity();

        #[derive(Component, Debug)]
        struct Health();

        let registry = Arc::new(Registry::new());

        // When - Multiple threads register components concurrently
        let handles: Vec<_> = (0..10)
            .map(|i| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    if i % 3 == 0 {
                        registry.register::<Position>()
                    } else if i % 3 == 1 {
                        registry.register::<Velocity>()
                    } else {
                        registry.register::<Health>()
                    }
                })
            })
            .collect();

        let results: Vec<_> = handles
            .into_iter()
            .map(|h| h.join().unwrap().unwrap())
            .collect();

        // Then - All threads that registered the same type should get the same id
        let pos_ids: Vec<_> = results.iter().step_by(3).copied().collect();
        let vel_ids: Vec<_> = results.iter().skip(1).step_by(3).copied().collect();
        let health_ids: Vec<_> = results.iter().skip(2).step_by(3).copied().collect();

        assert!(pos_ids.iter().all(|&id| id == pos_ids[0]));
        assert!(vel_ids.iter().all(|&id| id == vel_ids[0]));
        assert!(health_ids.iter().all(|&id| id == health_ids[0]));

        // And all three types have different ids
        assert_ne!(pos_ids[0], vel_ids[0]);
        assert_ne!(pos_ids[0], health_ids[0]);
        assert_ne!(vel_ids[0], health_ids[0]);
    }
}
