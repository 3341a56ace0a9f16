//! A small Entity-Component-System runtime.
//!
//! The crate is organized around a single [`ecs::World`] value that owns all
//! entity identity, component storage, and system membership state. Host code
//! creates entities, attaches plain-data components to them, and registers
//! systems that declare which component types they require; the world routes
//! entities to systems purely by that requirement match.
//!
//! See the [`ecs`] module for the full API.

// Allow the derive macros to reference `::ember_engine` from within this crate.
extern crate self as ember_engine;

pub mod ecs;
