pub mod component;
pub mod entity;
pub mod error;
pub mod signature;
pub mod system;
pub mod world;

pub use component::Component;
pub use entity::Entity;
pub use error::{Error, Result};
pub use signature::Signature;
pub use system::System;
pub use world::{Id as WorldId, World};
