//! A small headless host application driving the ECS core.
//!
//! Plays the role of the surrounding game: it spawns a handful of entities,
//! registers movement and render systems, and runs a short frame loop. The
//! "renderer" here is a stand-in collaborator: once per frame it reads the
//! render system's entity list and the components on those entities, and
//! never mutates the world. Sprite assets are carried as opaque strings, the
//! way an asset-loading collaborator would resolve them.
//!
//! Logging is configured through `RUST_LOG`, e.g.
//! `RUST_LOG=debug cargo run -p ember`.

use ember_engine::ecs::{
    Signature, System,
    component::Registry,
    error::Result,
    world::{Id, World},
};
use ember_macros::Component;

#[derive(Component, Debug, Clone, Copy)]
struct Transform {
    x: f32,
    y: f32,
}

#[derive(Component, Debug, Clone, Copy)]
struct Velocity {
    dx: f32,
    dy: f32,
}

#[derive(Component, Debug)]
struct Sprite {
    /// Opaque asset identifier, resolved by an asset collaborator.
    asset: String,
}

/// Integrates velocities into transforms each frame.
struct Movement;

impl System for Movement {
    fn required(&self, components: &Registry) -> Result<Signature> {
        let mut signature = Signature::new();
        components.require::<Transform>(&mut signature)?;
        components.require::<Velocity>(&mut signature)?;
        Ok(signature)
    }
}

/// Matches everything drawable; the host reads its entity list to "render".
struct Render;

impl System for Render {
    fn required(&self, components: &Registry) -> Result<Signature> {
        let mut signature = Signature::new();
        components.require::<Transform>(&mut signature)?;
        components.require::<Sprite>(&mut signature)?;
        Ok(signature)
    }
}

fn run_movement(world: &mut World) -> Result<()> {
    let entities = world.system_entities::<Movement>()?.to_vec();
    for entity in entities {
        let velocity = *world.component::<Velocity>(entity)?;
        let transform = world.component_mut::<Transform>(entity)?;
        transform.x += velocity.dx;
        transform.y += velocity.dy;
    }
    Ok(())
}

fn run_render(world: &World) -> Result<()> {
    for &entity in world.system_entities::<Render>()? {
        let transform = world.component::<Transform>(entity)?;
        let sprite = world.component::<Sprite>(entity)?;
        println!(
            "  draw '{}' at ({:.1}, {:.1})",
            sprite.asset, transform.x, transform.y
        );
    }
    Ok(())
}

fn setup(world: &mut World) -> Result<()> {
    world.add_system(Movement)?;
    world.add_system(Render)?;

    let player = world.spawn();
    world.add_component(player, Transform { x: 0.0, y: 0.0 })?;
    world.add_component(player, Velocity { dx: 1.0, dy: 0.5 })?;
    world.add_component(
        player,
        Sprite {
            asset: "sprites/player.png".to_string(),
        },
    )?;
    world.tag(player, "player")?;
    world.add_to_group(player, "characters")?;

    for i in 0..3 {
        let enemy = world.spawn();
        world.add_component(
            enemy,
            Transform {
                x: 10.0 + i as f32 * 5.0,
                y: 20.0,
            },
        )?;
        world.add_component(enemy, Velocity { dx: -0.5, dy: 0.0 })?;
        world.add_component(
            enemy,
            Sprite {
                asset: "sprites/enemy.png".to_string(),
            },
        )?;
        world.add_to_group(enemy, "characters")?;
        world.add_to_group(enemy, "enemies")?;
    }

    // Scenery: drawable but never moves.
    let tree = world.spawn();
    world.add_component(tree, Transform { x: 50.0, y: 8.0 })?;
    world.add_component(
        tree,
        Sprite {
            asset: "sprites/tree.png".to_string(),
        },
    )?;

    Ok(())
}

fn run() -> Result<()> {
    let mut world = World::new(Id::new(1));
    setup(&mut world)?;

    for frame in 1..=5 {
        // Apply last frame's spawns and despawns, then simulate and render.
        world.update();

        println!("frame {frame}:");
        run_movement(&mut world)?;
        run_render(&world)?;

        // Halfway through, the player takes out one enemy.
        if frame == 3
            && let Some(&doomed) = world.entities_in_group("enemies")?.iter().next()
        {
            log::info!("despawning one enemy {doomed:?}");
            world.despawn(doomed)?;
        }
    }

    let player = world.entity_by_tag("player")?;
    println!(
        "player {player:?} ended at {:?}; {} entities live",
        world.component::<Transform>(player)?,
        world.live_count()
    );

    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(error) = run() {
        log::error!("simulation failed: {error}");
        std::process::exit(1);
    }
}
