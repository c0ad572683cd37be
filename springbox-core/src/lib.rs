//! Mass-spring soft body sandbox.
//!
//! Point masses joined by damped springs, integrated with semi-implicit Euler,
//! bouncing off the window edges and static polygon obstacles. The [`Editor`]
//! maps discrete user commands onto the [`World`].

pub mod config;
pub mod editor;
pub mod error;
pub mod grid;
pub mod input;
pub mod integrator;
pub mod mass_point;
pub mod math;
pub mod obstacle;
pub mod runtime;
pub mod spring;
pub mod world;

pub use config::{EditorConfig, PhysicsConfig};
pub use editor::{Command, DrawingObstacle, Editor, Mode, Parameter};
pub use error::WorldError;
pub use glam::Vec2;
pub use grid::{Grid, GridConfig, PointParams};
pub use mass_point::MassPoint;
pub use obstacle::{Edge, PolygonObstacle};
pub use runtime::{build_world, run_headless, Scene, SimulationReport};
pub use spring::{Spring, SpringParams};
pub use world::{ObstacleKey, PointKey, SelectionCategory, SpringKey, World};
