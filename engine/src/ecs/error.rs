//! Error types for the ECS.
//!
//! Every fallible operation on the [`World`](crate::ecs::World) surfaces one
//! of these variants immediately at the call site; there is no local
//! recovery or silent default. Debug assertions elsewhere in the crate are
//! development aids only; callers must not rely on them in release builds.

use core::fmt;

use crate::ecs::entity::Entity;

/// Convenience alias for results produced by the ECS.
pub type Result<T> = std::result::Result<T, Error>;

/// An error raised by an ECS operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The entity handle refers to an id that is not currently live, either
    /// because it was never allocated or because the id was recycled and the
    /// handle's generation no longer matches.
    StaleEntity(Entity),

    /// The entity has no component of the requested type.
    MissingComponent {
        /// The entity that was queried.
        entity: Entity,
        /// The name of the requested component type.
        component: &'static str,
    },

    /// Registering the component type would exceed the fixed maximum number
    /// of distinct component types.
    TooManyComponentTypes {
        /// The name of the component type whose registration failed.
        component: &'static str,
        /// The fixed upper bound on distinct component types.
        max: usize,
    },

    /// No system of the requested type is registered.
    UnknownSystem(&'static str),

    /// A system of this type is already registered.
    DuplicateSystem(&'static str),

    /// No entity carries the requested tag.
    UnknownTag(String),

    /// The tag is already bound to a different live entity.
    TagTaken {
        /// The tag that was requested.
        tag: String,
        /// The entity currently holding the tag.
        owner: Entity,
    },

    /// No group with the requested name exists.
    UnknownGroup(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::StaleEntity(entity) => {
                write!(f, "entity {entity:?} is not live (stale or unallocated handle)")
            }
            Error::MissingComponent { entity, component } => {
                write!(f, "entity {entity:?} has no '{component}' component")
            }
            Error::TooManyComponentTypes { component, max } => {
                write!(
                    f,
                    "cannot register component type '{component}': at most {max} distinct types are supported"
                )
            }
            Error::UnknownSystem(name) => write!(f, "no system '{name}' is registered"),
            Error::DuplicateSystem(name) => {
                write!(f, "a system '{name}' is already registered")
            }
            Error::UnknownTag(tag) => write!(f, "no entity carries the tag '{tag}'"),
            Error::TagTaken { tag, owner } => {
                write!(f, "tag '{tag}' is already bound to entity {owner:?}")
            }
            Error::UnknownGroup(group) => write!(f, "no group named '{group}' exists"),
        }
    }
}

impl std::error::Error for Error {}
