use crate::config::PhysicsConfig;
use crate::error::WorldError;
use crate::grid::{GridConfig, PointParams};
use crate::spring::SpringParams;
use crate::world::World;
use glam::Vec2;

/// Prebuilt starting worlds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scene {
    /// Nothing but the window boundary.
    Empty,
    /// A 3x3 soft body thrown across the window over a sloped floor.
    Demo,
}

/// Summary of a headless run
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationReport {
    pub steps: usize,
    pub centroid: Option<Vec2>,
    pub kinetic_energy: f32,
    pub potential_energy: f32,
    pub positions: Vec<Vec2>,
}

/// Build a World for the given scene
pub fn build_world(scene: Scene, config: PhysicsConfig) -> Result<World, WorldError> {
    let mut world = World::new(config);

    match scene {
        Scene::Empty => {}
        Scene::Demo => {
            let grid = GridConfig::new(Vec2::new(50.0, 50.0), 3, 3, 100.0)
                .with_points(
                    PointParams::new(1.0)
                        .damping(0.1)
                        .velocity(Vec2::new(200.0, -100.0)),
                )
                .with_springs(SpringParams::new(200.0, 1.0));
            world.add_grid(&grid)?;

            let floor = world.config().bounds;
            world.add_obstacle(vec![
                Vec2::new(0.0, floor.y),
                Vec2::new(floor.x, floor.y - 40.0),
                Vec2::new(floor.x, floor.y),
            ])?;
        }
    }

    Ok(world)
}

/// Run `steps` updates of `dt` seconds and summarise the final state.
///
/// Honors the world's pause flag, like a frame-driven run would.
pub fn run_headless(world: &mut World, steps: usize, dt: f32) -> SimulationReport {
    for _ in 0..steps {
        world.update(dt);
    }
    report(world, steps)
}

pub fn report(world: &World, steps: usize) -> SimulationReport {
    SimulationReport {
        steps,
        centroid: world.centroid(),
        kinetic_energy: world.kinetic_energy(),
        potential_energy: world.potential_energy(),
        positions: world.mass_points().map(|(_, p)| p.position).collect(),
    }
}
