//! Component management for the ECS.
//!
//! Components are the plain data records attached to entities. This module
//! provides the infrastructure for registering component types and storing
//! component values:
//!
//! - [`Component`]: the trait all component types must implement
//! - [`Id`]: a small, stable integer identifier per registered type
//! - [`Registry`]: thread-safe registration and lookup of component types
//! - [`Info`]: metadata about a registered type
//! - [`Pool`]: dense sparse-set storage for one component type
//!
//! Component type ids double as signature bit positions, so the number of
//! distinct types is capped at [`MAX_TYPES`]; registration past the cap
//! fails with [`Error::TooManyComponentTypes`](crate::ecs::Error).
//!
//! ## Usage
//!
//! ```ignore
//! use ember_engine::ecs::component::Registry;
//! use ember_macros::Component;
//!
//! #[derive(Component)]
//! struct Position { x: f32, y: f32 }
//!
//! let registry = Registry::new();
//! let pos_id = registry.register::<Position>()?;
//! ```

mod pool;
mod registry;

pub use pool::{AnyPool, Pool};
pub use registry::{Info, Registry};

/// The maximum number of distinct component types a registry supports.
///
/// Component ids index signature bits, so the bound is fixed at compile
/// time. Registration of a type beyond this bound fails on the offending
/// registration.
pub const MAX_TYPES: usize = 32;

/// A component identifier. This is a unique identifier for a component type,
/// assigned once per concrete type and stable for the registry's lifetime.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl Id {
    /// Construct a new component Id from a raw u32 value.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the index of this component id if it were to live in indexable
    /// storage (e.g. Vec, bitset).
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for Id {
    #[inline]
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<usize> for Id {
    #[inline]
    fn from(value: usize) -> Self {
        Self::new(value as u32)
    }
}

/// A trait representing a component in the ECS.
///
/// At present this only sets the required trait bounds for a type to be used
/// as a component. Implement it via `#[derive(Component)]`.
pub trait Component: 'static + Sized + Send + Sync {}
