//! The simulation world: entity storage, the pausable step, and the picking
//! queries the editor builds on.

use crate::config::PhysicsConfig;
use crate::error::WorldError;
use crate::integrator::{sanitize_dt, step};
use crate::mass_point::{is_valid_mass, MassPoint};
use crate::math::distance_point_to_segment;
use crate::obstacle::PolygonObstacle;
use crate::spring::{Spring, SpringParams};
use glam::Vec2;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Stable handle to a mass point.
    pub struct PointKey;
    /// Stable handle to a spring.
    pub struct SpringKey;
    /// Stable handle to a polygon obstacle.
    pub struct ObstacleKey;
}

/// Mass point storage, keyed so springs can refer to endpoints without owning them.
pub type PointMap = SlotMap<PointKey, MassPoint>;

/// Which kind of entity is currently selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionCategory {
    None,
    MassPoints,
    Springs,
    Obstacles,
}

/// Owns every mass point, spring and obstacle.
///
/// Referential integrity: no spring ever references a mass point that is not
/// in `points`. Removing a mass point removes its springs in the same call.
#[derive(Debug, Clone)]
pub struct World {
    pub(crate) points: PointMap,
    pub(crate) springs: SlotMap<SpringKey, Spring>,
    pub(crate) obstacles: SlotMap<ObstacleKey, PolygonObstacle>,
    pub(crate) config: PhysicsConfig,
    pub(crate) paused: bool,
    pub(crate) single_step_requested: bool,
    pub(crate) gravity_enabled: bool,
}

impl World {
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            points: SlotMap::with_key(),
            springs: SlotMap::with_key(),
            obstacles: SlotMap::with_key(),
            config,
            paused: false,
            single_step_requested: false,
            gravity_enabled: true,
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Resize the region mass points are confined to.
    pub fn set_bounds(&mut self, bounds: Vec2) {
        self.config.bounds = bounds;
    }

    // --- construction -------------------------------------------------------

    pub fn add_mass_point(&mut self, point: MassPoint) -> Result<PointKey, WorldError> {
        if !is_valid_mass(point.mass) {
            return Err(WorldError::InvalidMass(point.mass));
        }
        let position = point.position;
        let key = self.points.insert(point);
        log::debug!("added mass point {key:?} at {position}");
        Ok(key)
    }

    /// Connect two distinct mass points.
    ///
    /// The rest length defaults to the current distance between them. A pair
    /// may be connected at most once, in either order.
    pub fn add_spring(
        &mut self,
        a: PointKey,
        b: PointKey,
        params: SpringParams,
    ) -> Result<SpringKey, WorldError> {
        if a == b {
            return Err(WorldError::SelfSpring);
        }
        let pa = self.points.get(a).ok_or(WorldError::UnknownMassPoint(a))?;
        let pb = self.points.get(b).ok_or(WorldError::UnknownMassPoint(b))?;
        if self.spring_between(a, b).is_some() {
            return Err(WorldError::DuplicateSpring);
        }

        let rest_length = params
            .rest_length
            .unwrap_or_else(|| pa.position.distance(pb.position));
        if !(rest_length.is_finite() && rest_length > 0.0) {
            return Err(WorldError::InvalidRestLength(rest_length));
        }

        let key = self.springs.insert(Spring::new(
            a,
            b,
            params.stiffness,
            params.damping,
            rest_length,
        ));
        log::debug!("added spring {key:?} between {a:?} and {b:?} (rest length {rest_length})");
        Ok(key)
    }

    pub fn add_obstacle(&mut self, vertices: Vec<Vec2>) -> Result<ObstacleKey, WorldError> {
        let obstacle = PolygonObstacle::new(vertices)?;
        let count = obstacle.vertices().len();
        let key = self.obstacles.insert(obstacle);
        log::debug!("added obstacle {key:?} with {count} vertices");
        Ok(key)
    }

    // --- removal ------------------------------------------------------------

    /// Remove a mass point together with every spring attached to it.
    pub fn remove_mass_point(&mut self, key: PointKey) -> Option<MassPoint> {
        let point = self.points.remove(key)?;
        let before = self.springs.len();
        self.springs.retain(|_, spring| !spring.references(key));
        log::debug!(
            "removed mass point {key:?} and {} attached springs",
            before - self.springs.len()
        );
        Some(point)
    }

    pub fn remove_spring(&mut self, key: SpringKey) -> Option<Spring> {
        let spring = self.springs.remove(key)?;
        log::debug!("removed spring {key:?}");
        Some(spring)
    }

    pub fn remove_obstacle(&mut self, key: ObstacleKey) -> Option<PolygonObstacle> {
        let obstacle = self.obstacles.remove(key)?;
        log::debug!("removed obstacle {key:?}");
        Some(obstacle)
    }

    /// Drop every entity. Pause and gravity settings are kept.
    pub fn clear(&mut self) {
        log::info!(
            "resetting world ({} points, {} springs, {} obstacles)",
            self.points.len(),
            self.springs.len(),
            self.obstacles.len()
        );
        self.points.clear();
        self.springs.clear();
        self.obstacles.clear();
        self.single_step_requested = false;
    }

    // --- access -------------------------------------------------------------

    pub fn mass_point(&self, key: PointKey) -> Option<&MassPoint> {
        self.points.get(key)
    }

    pub fn mass_point_mut(&mut self, key: PointKey) -> Option<&mut MassPoint> {
        self.points.get_mut(key)
    }

    pub fn spring(&self, key: SpringKey) -> Option<&Spring> {
        self.springs.get(key)
    }

    pub fn spring_mut(&mut self, key: SpringKey) -> Option<&mut Spring> {
        self.springs.get_mut(key)
    }

    pub fn obstacle(&self, key: ObstacleKey) -> Option<&PolygonObstacle> {
        self.obstacles.get(key)
    }

    pub fn obstacle_mut(&mut self, key: ObstacleKey) -> Option<&mut PolygonObstacle> {
        self.obstacles.get_mut(key)
    }

    pub fn mass_points(&self) -> impl Iterator<Item = (PointKey, &MassPoint)> {
        self.points.iter()
    }

    pub fn springs(&self) -> impl Iterator<Item = (SpringKey, &Spring)> {
        self.springs.iter()
    }

    pub fn obstacles(&self) -> impl Iterator<Item = (ObstacleKey, &PolygonObstacle)> {
        self.obstacles.iter()
    }

    /// Springs together with their current endpoint positions, for drawing.
    pub fn spring_segments(&self) -> impl Iterator<Item = (SpringKey, &Spring, Vec2, Vec2)> {
        self.springs.iter().filter_map(|(key, spring)| {
            let a = self.points.get(spring.a)?.position;
            let b = self.points.get(spring.b)?.position;
            Some((key, spring, a, b))
        })
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn spring_count(&self) -> usize {
        self.springs.len()
    }

    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }

    pub fn spring_between(&self, a: PointKey, b: PointKey) -> Option<SpringKey> {
        self.springs
            .iter()
            .find(|(_, spring)| spring.connects(a, b))
            .map(|(key, _)| key)
    }

    pub fn springs_attached_to(&self, point: PointKey) -> Vec<SpringKey> {
        self.springs
            .iter()
            .filter(|(_, spring)| spring.references(point))
            .map(|(key, _)| key)
            .collect()
    }

    // --- picking ------------------------------------------------------------

    /// First mass point whose centre lies within `radius` of `pos`.
    pub fn mass_point_at(&self, pos: Vec2, radius: f32) -> Option<PointKey> {
        self.points
            .iter()
            .find(|(_, point)| point.position.distance(pos) <= radius)
            .map(|(key, _)| key)
    }

    /// First spring whose segment lies within `threshold` of `pos`.
    pub fn spring_at(&self, pos: Vec2, threshold: f32) -> Option<SpringKey> {
        self.spring_segments()
            .find(|(_, _, a, b)| distance_point_to_segment(pos, *a, *b) <= threshold)
            .map(|(key, ..)| key)
    }

    /// First obstacle containing `pos` or with an edge within `threshold` of it.
    pub fn obstacle_at(&self, pos: Vec2, threshold: f32) -> Option<ObstacleKey> {
        self.obstacles
            .iter()
            .find(|(_, obstacle)| obstacle.is_hit(pos, threshold))
            .map(|(key, _)| key)
    }

    // --- selection ----------------------------------------------------------

    pub fn selected_mass_points(&self) -> Vec<PointKey> {
        self.points
            .iter()
            .filter(|(_, p)| p.selected)
            .map(|(key, _)| key)
            .collect()
    }

    pub fn selected_springs(&self) -> Vec<SpringKey> {
        self.springs
            .iter()
            .filter(|(_, s)| s.selected)
            .map(|(key, _)| key)
            .collect()
    }

    pub fn selected_obstacles(&self) -> Vec<ObstacleKey> {
        self.obstacles
            .iter()
            .filter(|(_, o)| o.selected)
            .map(|(key, _)| key)
            .collect()
    }

    /// The category holding the current selection, checked points first.
    pub fn selection_category(&self) -> SelectionCategory {
        if self.points.values().any(|p| p.selected) {
            SelectionCategory::MassPoints
        } else if self.springs.values().any(|s| s.selected) {
            SelectionCategory::Springs
        } else if self.obstacles.values().any(|o| o.selected) {
            SelectionCategory::Obstacles
        } else {
            SelectionCategory::None
        }
    }

    pub fn clear_point_selection(&mut self) {
        self.points.values_mut().for_each(|p| p.selected = false);
    }

    pub fn clear_spring_selection(&mut self) {
        self.springs.values_mut().for_each(|s| s.selected = false);
    }

    pub fn clear_obstacle_selection(&mut self) {
        self.obstacles.values_mut().for_each(|o| o.selected = false);
    }

    pub fn clear_selection(&mut self) {
        self.clear_point_selection();
        self.clear_spring_selection();
        self.clear_obstacle_selection();
    }

    // --- pause / gravity ----------------------------------------------------

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
        if !paused {
            self.single_step_requested = false;
        }
    }

    pub fn toggle_pause(&mut self) {
        self.set_paused(!self.paused);
        log::debug!("simulation {}", if self.paused { "paused" } else { "resumed" });
    }

    /// Ask for exactly one step on the next `update` while paused.
    ///
    /// Returns false (and does nothing) when the simulation is running.
    pub fn request_single_step(&mut self) -> bool {
        if self.paused {
            self.single_step_requested = true;
        }
        self.paused
    }

    pub fn single_step_requested(&self) -> bool {
        self.single_step_requested
    }

    pub fn gravity_enabled(&self) -> bool {
        self.gravity_enabled
    }

    pub fn set_gravity_enabled(&mut self, enabled: bool) {
        self.gravity_enabled = enabled;
    }

    pub fn toggle_gravity(&mut self) {
        self.gravity_enabled = !self.gravity_enabled;
        log::debug!("gravity {}", if self.gravity_enabled { "on" } else { "off" });
    }

    // --- stepping -----------------------------------------------------------

    /// Advance by one frame.
    ///
    /// While paused this is a no-op unless a single step was requested, in
    /// which case exactly one step runs and the request is consumed. `dt` is
    /// clamped to `max_dt`; non-finite or non-positive values skip the frame.
    pub fn update(&mut self, dt: f32) {
        if self.paused && !self.single_step_requested {
            return;
        }
        let Some(dt) = sanitize_dt(dt, self.config.max_dt) else {
            return;
        };
        step(self, dt);
        self.single_step_requested = false;
    }

    /// Let every spring deposit its force pair without integrating anything.
    pub fn apply_spring_forces(&mut self) {
        for spring in self.springs.values() {
            spring.update(&mut self.points);
        }
    }

    /// One step regardless of the pause state.
    pub fn step(&mut self, dt: f32) {
        if let Some(dt) = sanitize_dt(dt, self.config.max_dt) {
            step(self, dt);
        }
    }

    // --- diagnostics --------------------------------------------------------

    pub fn kinetic_energy(&self) -> f32 {
        self.points.values().map(MassPoint::kinetic_energy).sum()
    }

    pub fn potential_energy(&self) -> f32 {
        self.springs
            .values()
            .map(|s| s.potential_energy(&self.points))
            .sum()
    }

    /// Mean mass point position, or `None` for an empty world.
    pub fn centroid(&self) -> Option<Vec2> {
        if self.points.is_empty() {
            return None;
        }
        let sum: Vec2 = self.points.values().map(|p| p.position).sum();
        Some(sum / self.points.len() as f32)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}
