//! Systems: behavior units matched to entities by component signature.
//!
//! A system is any user type implementing [`System`]. At registration time
//! the world asks the system which component types it requires (once, via
//! [`System::required`]) and captures the resulting [`Signature`]. From
//! then on the requirement is immutable, so a system can never change its
//! requirements after entities have been matched against it.
//!
//! The world maintains, per registered system, a cached list of the entities
//! whose signatures are supersets of the system's requirement. The cache is
//! exact as of the last `update()` boundary; between boundaries it is
//! deliberately allowed to go stale so that simulation code iterating it is
//! never mutated out from under.
//!
//! ```ignore
//! struct Movement;
//!
//! impl System for Movement {
//!     fn required(&self, components: &component::Registry) -> Result<Signature> {
//!         let mut signature = Signature::new();
//!         components.require::<Position>(&mut signature)?;
//!         components.require::<Velocity>(&mut signature)?;
//!         Ok(signature)
//!     }
//! }
//!
//! world.add_system(Movement)?;
//! // ... after world.update():
//! for entity in world.system_entities::<Movement>()? { /* ... */ }
//! ```

mod registry;

pub use registry::Registry;

use crate::ecs::{component, error::Result, signature::Signature};

/// A behavior unit routed entities by the world.
///
/// Implementors declare the component types an entity must carry to be of
/// interest. The declaration runs exactly once, when the system is added to
/// a world.
pub trait System: 'static {
    /// Declare the component types this system requires.
    ///
    /// Build the signature with [`component::Registry::require`]; the world
    /// captures the result before any entity is matched against it.
    fn required(&self, components: &component::Registry) -> Result<Signature>;
}
