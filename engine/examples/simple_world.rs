//! Minimal world walkthrough: spawn entities with components, register a
//! system, and watch deferred admission/eviction across update boundaries.
//!
//! Run with `cargo run --example simple_world`.

use ember_engine::ecs::{
    Signature, System,
    component::Registry,
    error::Result,
    world::{Id, World},
};
use ember_macros::Component;

#[derive(Component, Debug)]
struct Position {
    x: f32,
    y: f32,
}

#[derive(Component, Debug)]
struct Velocity {
    dx: f32,
    dy: f32,
}

struct Movement;

impl System for Movement {
    fn required(&self, components: &Registry) -> Result<Signature> {
        let mut signature = Signature::new();
        components.require::<Position>(&mut signature)?;
        components.require::<Velocity>(&mut signature)?;
        Ok(signature)
    }
}

fn main() -> Result<()> {
    let mut world = World::new(Id::new(1));
    world.add_system(Movement)?;

    // A mover and a static prop; only the mover matches Movement.
    let mover = world.spawn();
    world.add_component(mover, Position { x: 0.0, y: 0.0 })?;
    world.add_component(mover, Velocity { dx: 1.0, dy: 0.5 })?;

    let prop = world.spawn();
    world.add_component(prop, Position { x: 10.0, y: 10.0 })?;

    // Nothing is visible to systems until the boundary.
    assert!(world.system_entities::<Movement>()?.is_empty());
    world.update();
    assert_eq!(world.system_entities::<Movement>()?, &[mover]);

    for frame in 0..3 {
        let entities = world.system_entities::<Movement>()?.to_vec();
        for entity in entities {
            let Velocity { dx, dy } = *world.component::<Velocity>(entity)?;
            let position = world.component_mut::<Position>(entity)?;
            position.x += dx;
            position.y += dy;
        }

        println!(
            "frame {frame}: mover at {:?}",
            world.component::<Position>(mover)?
        );
        world.update();
    }

    // Despawn takes effect at the next boundary.
    world.despawn(mover)?;
    assert_eq!(world.system_entities::<Movement>()?, &[mover]);
    world.update();
    assert!(world.system_entities::<Movement>()?.is_empty());
    println!("mover despawned, {} entities remain live", world.live_count());

    Ok(())
}
