//! System registry: type-keyed storage of system instances plus their
//! captured requirements and cached entity lists.

use std::{
    any::{Any, TypeId, type_name},
    collections::HashMap,
};

use crate::ecs::{
    component,
    entity::Entity,
    error::{Error, Result},
    signature::Signature,
    system::System,
};

/// One registered system: the instance, the requirement captured at
/// registration, and the cached list of matching entities.
struct Slot {
    /// The system's Rust type, for registry keying.
    type_id: TypeId,

    /// The system's type name, for diagnostics.
    name: &'static str,

    /// The required signature, immutable after registration.
    required: Signature,

    /// Entities currently matched to the system, exact as of the last
    /// update boundary.
    entities: Vec<Entity>,

    /// The boxed system instance.
    system: Box<dyn Any>,
}

/// A type-keyed, single-instance-per-type registry of systems.
///
/// Registration captures the system's required [`Signature`]; admission and
/// eviction maintain each slot's cached entity list against it.
#[derive(Default)]
pub struct Registry {
    /// All registered system slots.
    slots: Vec<Slot>,

    /// Map from system type to slot position.
    by_type: HashMap<TypeId, usize>,
}

impl Registry {
    /// Create a new, empty system registry.
    #[inline]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            by_type: HashMap::new(),
        }
    }

    /// Register a system, capturing its required signature.
    ///
    /// Fails with [`Error::DuplicateSystem`] if a system of the same type is
    /// already registered, and propagates any failure from the system's
    /// requirement declaration (e.g. component type capacity).
    pub fn add<S: System>(&mut self, system: S, components: &component::Registry) -> Result<()> {
        let type_id = TypeId::of::<S>();
        if self.by_type.contains_key(&type_id) {
            return Err(Error::DuplicateSystem(type_name::<S>()));
        }

        let required = system.required(components)?;

        log::debug!(
            "registered system '{}' requiring {} component type(s)",
            type_name::<S>(),
            required.len()
        );

        self.by_type.insert(type_id, self.slots.len());
        self.slots.push(Slot {
            type_id,
            name: type_name::<S>(),
            required,
            entities: Vec::new(),
            system: Box::new(system),
        });

        Ok(())
    }

    /// Get the registered system of type `S`.
    pub fn get<S: System>(&self) -> Result<&S> {
        self.slot::<S>()?
            .system
            .downcast_ref::<S>()
            .ok_or(Error::UnknownSystem(type_name::<S>()))
    }

    /// Get the registered system of type `S` mutably.
    pub fn get_mut<S: System>(&mut self) -> Result<&mut S> {
        self.slot_mut::<S>()?
            .system
            .downcast_mut::<S>()
            .ok_or(Error::UnknownSystem(type_name::<S>()))
    }

    /// Check whether a system of type `S` is registered.
    #[inline]
    pub fn has<S: System>(&self) -> bool {
        self.by_type.contains_key(&TypeId::of::<S>())
    }

    /// Remove and return the system of type `S`, dropping its cached entity
    /// list.
    pub fn remove<S: System>(&mut self) -> Result<S> {
        let type_id = TypeId::of::<S>();
        let index = self
            .by_type
            .remove(&type_id)
            .ok_or(Error::UnknownSystem(type_name::<S>()))?;

        let slot = self.slots.swap_remove(index);

        // The swap moved a different slot into `index`; re-point its key.
        if index < self.slots.len() {
            self.by_type.insert(self.slots[index].type_id, index);
        }

        log::debug!("removed system '{}'", slot.name);

        slot.system
            .downcast::<S>()
            .map(|boxed| *boxed)
            .map_err(|_| Error::UnknownSystem(type_name::<S>()))
    }

    /// The entities currently matched to system `S`, exact as of the last
    /// update boundary.
    pub fn entities_of<S: System>(&self) -> Result<&[Entity]> {
        Ok(&self.slot::<S>()?.entities)
    }

    /// Number of registered systems.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if no systems are registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Admit an entity: append it to the cached list of every system whose
    /// requirement its signature satisfies.
    pub(crate) fn admit(&mut self, entity: Entity, signature: &Signature) {
        for slot in &mut self.slots {
            if signature.contains_all(&slot.required) {
                slot.entities.push(entity);
            }
        }
    }

    /// Evict an entity from every system's cached list.
    ///
    /// Linear scan per system; acceptable at expected entity-system counts.
    pub(crate) fn evict(&mut self, entity: Entity) {
        for slot in &mut self.slots {
            if let Some(position) = slot.entities.iter().position(|e| *e == entity) {
                slot.entities.swap_remove(position);
            }
        }
    }

    /// Find the slot for system type `S`.
    fn slot<S: System>(&self) -> Result<&Slot> {
        self.by_type
            .get(&TypeId::of::<S>())
            .map(|index| &self.slots[*index])
            .ok_or(Error::UnknownSystem(type_name::<S>()))
    }

    /// Find the slot for system type `S` mutably.
    fn slot_mut<S: System>(&mut self) -> Result<&mut Slot> {
        self.by_type
            .get(&TypeId::of::<S>())
            .map(|index| &mut self.slots[*index])
            .ok_or(Error::UnknownSystem(type_name::<S>()))
    }
}
