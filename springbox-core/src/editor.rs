//! Sandbox editor: turns discrete user commands into world edits.
//!
//! The editor owns only scratch state (mode, pointer tracking, drag anchors,
//! the polygon being drawn). Selection lives on the entities themselves as
//! `selected` flags; the current category is derived from the world, and at
//! most one category is non-empty at any time.

use crate::config::EditorConfig;
use crate::input::{PointerAction, PointerTracker};
use crate::mass_point::{is_valid_mass, MassPoint};
use crate::spring::SpringParams;
use crate::world::{ObstacleKey, PointKey, SelectionCategory, SpringKey, World};
use glam::Vec2;
use std::time::Duration;

/// Top-level editor mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Create, connect, select and drag mass points and springs.
    Physics,
    /// Draw, select and delete polygon obstacles.
    Obstacle,
}

/// Obstacle authoring sub-state.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawingObstacle {
    Idle,
    InProgress(Vec<Vec2>),
}

/// Entity properties exposed to the slider panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameter {
    Mass,
    Stiffness,
    RestLength,
    Damping,
}

/// Input already translated from device events by the driver.
///
/// `at` timestamps only need to be monotonic; they are compared against the
/// drag threshold and never against wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    LeftPressed { pos: Vec2, ctrl: bool, at: Duration },
    PointerMoved { pos: Vec2, at: Duration },
    LeftReleased { at: Duration },
    RightClick { pos: Vec2 },
    Escape,
    Delete,
    ToggleMode,
    TogglePause,
    SingleStep,
    Reset,
    ToggleGravity,
    TogglePin,
    SetParameter(Parameter, f32),
}

/// A dragged point: its position when the drag began and whether it was
/// pinned before the drag pinned it.
#[derive(Debug, Clone, Copy)]
struct DragAnchor {
    key: PointKey,
    start: Vec2,
    was_pinned: bool,
}

#[derive(Debug, Clone)]
struct DragSession {
    anchors: Vec<DragAnchor>,
}

#[derive(Debug, Clone)]
pub struct Editor {
    config: EditorConfig,
    mode: Mode,
    drawing: DrawingObstacle,
    pointer: PointerTracker,
    drag: Option<DragSession>,
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        let pointer = PointerTracker::new(config.drag_threshold);
        Self {
            config,
            mode: Mode::Physics,
            drawing: DrawingObstacle::Idle,
            pointer,
            drag: None,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn drawing(&self) -> &DrawingObstacle {
        &self.drawing
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.drawing, DrawingObstacle::InProgress(_))
    }

    /// Vertices of the polygon being drawn; empty when idle.
    pub fn pending_vertices(&self) -> &[Vec2] {
        match &self.drawing {
            DrawingObstacle::InProgress(vertices) => vertices,
            DrawingObstacle::Idle => &[],
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Apply one command to `world`. Commands that make no sense in the
    /// current state are ignored.
    pub fn handle(&mut self, world: &mut World, command: Command) {
        match command {
            Command::LeftPressed { pos, ctrl, at } => {
                self.pointer.press(pos, ctrl, at);
            }
            Command::PointerMoved { pos, at } => {
                let action = self.pointer.motion(pos, at);
                self.apply_pointer_action(world, action);
            }
            Command::LeftReleased { at } => {
                let action = self.pointer.release(at);
                self.apply_pointer_action(world, action);
            }
            Command::RightClick { pos } => self.right_click(world, pos),
            Command::Escape => self.escape(world),
            Command::Delete => self.delete_selected(world),
            Command::ToggleMode => self.toggle_mode(world),
            Command::TogglePause => world.toggle_pause(),
            Command::SingleStep => {
                world.request_single_step();
            }
            Command::Reset => self.reset(world),
            Command::ToggleGravity => world.toggle_gravity(),
            Command::TogglePin => self.toggle_pin(world),
            Command::SetParameter(parameter, value) => self.set_parameter(world, parameter, value),
        }
    }

    fn apply_pointer_action(&mut self, world: &mut World, action: PointerAction) {
        match action {
            PointerAction::None => {}
            PointerAction::Click { pos, ctrl } => self.left_click(world, pos, ctrl),
            PointerAction::DragStart { origin, pos } => {
                self.begin_drag(world, origin);
                self.drag_to(world, origin, pos);
            }
            PointerAction::DragMove { origin, pos } => self.drag_to(world, origin, pos),
            PointerAction::DragEnd => self.end_drag(world),
        }
    }

    // --- clicks -------------------------------------------------------------

    /// A discrete left click (already disambiguated from a drag).
    pub fn left_click(&mut self, world: &mut World, pos: Vec2, ctrl: bool) {
        match self.mode {
            Mode::Physics => self.physics_click(world, pos, ctrl),
            Mode::Obstacle => self.obstacle_click(world, pos, ctrl),
        }
    }

    fn physics_click(&mut self, world: &mut World, pos: Vec2, ctrl: bool) {
        if let Some(clicked) = world.mass_point_at(pos, self.config.pick_radius) {
            self.click_mass_point(world, clicked, ctrl);
        } else if let Some(clicked) = world.spring_at(pos, self.config.spring_pick_threshold) {
            self.click_spring(world, clicked, ctrl);
        } else if !ctrl {
            world.clear_selection();
        }
    }

    fn click_mass_point(&mut self, world: &mut World, clicked: PointKey, ctrl: bool) {
        let selected = world.selected_mass_points();

        if ctrl {
            world.clear_spring_selection();
            world.clear_obstacle_selection();
            if let Some(point) = world.mass_point_mut(clicked) {
                point.selected = !point.selected;
            }
            return;
        }

        if selected == [clicked] {
            world.clear_point_selection();
        } else if !selected.is_empty() && !selected.contains(&clicked) {
            self.connect(world, &selected, clicked);
            world.clear_point_selection();
        } else {
            world.clear_selection();
            if let Some(point) = world.mass_point_mut(clicked) {
                point.selected = true;
            }
        }
    }

    /// Spring every point in `from` to `to`, skipping pairs already connected.
    fn connect(&self, world: &mut World, from: &[PointKey], to: PointKey) {
        let params = SpringParams::new(self.config.stiffness, self.config.damping)
            .rest_length(self.config.rest_length);
        for &source in from {
            if world.spring_between(source, to).is_some() {
                continue;
            }
            if let Err(err) = world.add_spring(source, to, params) {
                log::debug!("not connecting {source:?} to {to:?}: {err}");
            }
        }
    }

    fn click_spring(&mut self, world: &mut World, clicked: SpringKey, ctrl: bool) {
        world.clear_point_selection();
        world.clear_obstacle_selection();

        if ctrl {
            if let Some(spring) = world.spring_mut(clicked) {
                spring.selected = !spring.selected;
            }
            return;
        }

        let sole = world.selected_springs() == [clicked];
        world.clear_spring_selection();
        if !sole {
            if let Some(spring) = world.spring_mut(clicked) {
                spring.selected = true;
            }
        }
    }

    fn obstacle_click(&mut self, world: &mut World, pos: Vec2, ctrl: bool) {
        if let DrawingObstacle::InProgress(vertices) = &mut self.drawing {
            let closes = vertices.len() >= 3
                && vertices[0].distance(pos) <= self.config.close_radius;
            if closes {
                self.finalize_obstacle(world);
            } else if vertices.last() != Some(&pos) {
                vertices.push(pos);
            }
            return;
        }

        if let Some(clicked) = world.obstacle_at(pos, self.config.obstacle_pick_threshold) {
            self.click_obstacle(world, clicked, ctrl);
        } else {
            world.clear_selection();
            log::debug!("started drawing obstacle at {pos}");
            self.drawing = DrawingObstacle::InProgress(vec![pos]);
        }
    }

    fn click_obstacle(&mut self, world: &mut World, clicked: ObstacleKey, ctrl: bool) {
        world.clear_point_selection();
        world.clear_spring_selection();
        if ctrl {
            if let Some(obstacle) = world.obstacle_mut(clicked) {
                obstacle.selected = !obstacle.selected;
            }
            return;
        }
        world.clear_obstacle_selection();
        if let Some(obstacle) = world.obstacle_mut(clicked) {
            obstacle.selected = true;
        }
    }

    /// Right click: new mass point in Physics mode, polygon completion in Obstacle mode.
    pub fn right_click(&mut self, world: &mut World, pos: Vec2) {
        match self.mode {
            Mode::Physics => {
                let point = MassPoint::new(pos, self.config.mass)
                    .with_radius(self.config.point_radius)
                    .with_gravity(self.config.use_gravity);
                if let Err(err) = world.add_mass_point(point) {
                    log::debug!("not adding mass point: {err}");
                }
            }
            Mode::Obstacle => {
                self.finalize_obstacle(world);
            }
        }
    }

    // --- obstacle authoring -------------------------------------------------

    /// Turn the in-progress polygon into an obstacle.
    ///
    /// Below three vertices this does nothing and drawing continues.
    pub fn finalize_obstacle(&mut self, world: &mut World) -> Option<ObstacleKey> {
        let DrawingObstacle::InProgress(vertices) = &self.drawing else {
            return None;
        };
        if vertices.len() < 3 {
            return None;
        }
        let vertices = vertices.clone();
        self.drawing = DrawingObstacle::Idle;
        match world.add_obstacle(vertices) {
            Ok(key) => Some(key),
            Err(err) => {
                log::debug!("discarding polygon: {err}");
                None
            }
        }
    }

    pub fn cancel_drawing(&mut self) {
        if self.is_drawing() {
            log::debug!("cancelled obstacle drawing");
        }
        self.drawing = DrawingObstacle::Idle;
    }

    // --- dragging -----------------------------------------------------------

    /// Snapshot the points a drag will move and pin them until it ends.
    ///
    /// If nothing is selected and the press landed on a mass point, that point
    /// is selected and dragged. Obstacles are immovable, so Obstacle mode never
    /// drags. Pinned points ignore forces, so a held selection stays under the
    /// cursor across steps with no pointer motion.
    pub fn begin_drag(&mut self, world: &mut World, origin: Vec2) {
        if self.mode != Mode::Physics {
            return;
        }
        if world.selected_mass_points().is_empty() {
            if let Some(key) = world.mass_point_at(origin, self.config.pick_radius) {
                world.clear_selection();
                if let Some(point) = world.mass_point_mut(key) {
                    point.selected = true;
                }
            }
        }
        let mut anchors = Vec::new();
        for key in world.selected_mass_points() {
            if let Some(point) = world.mass_point_mut(key) {
                anchors.push(DragAnchor {
                    key,
                    start: point.position,
                    was_pinned: point.pinned,
                });
                point.pinned = true;
                point.velocity = Vec2::ZERO;
            }
        }
        if !anchors.is_empty() {
            log::debug!("dragging {} mass points", anchors.len());
            self.drag = Some(DragSession { anchors });
        }
    }

    /// Place every dragged point at its snapshot plus the total cursor offset.
    ///
    /// Velocities are zeroed so gravity accumulated while held is not released
    /// as a fling.
    pub fn drag_to(&mut self, world: &mut World, origin: Vec2, pos: Vec2) {
        let Some(session) = &self.drag else {
            return;
        };
        let delta = pos - origin;
        for anchor in &session.anchors {
            if let Some(point) = world.mass_point_mut(anchor.key) {
                point.position = anchor.start + delta;
                point.velocity = Vec2::ZERO;
            }
        }
    }

    /// Release the dragged points, restoring their pin state.
    pub fn end_drag(&mut self, world: &mut World) {
        let Some(session) = self.drag.take() else {
            return;
        };
        for anchor in session.anchors {
            if let Some(point) = world.mass_point_mut(anchor.key) {
                point.pinned = anchor.was_pinned;
                point.velocity = Vec2::ZERO;
            }
        }
    }

    // --- keys ---------------------------------------------------------------

    /// Cancel an in-progress polygon, or else clear the selection.
    pub fn escape(&mut self, world: &mut World) {
        if self.is_drawing() {
            self.cancel_drawing();
        } else {
            world.clear_selection();
        }
    }

    /// Remove everything in the current selection category.
    ///
    /// Deleting mass points also removes every spring attached to them.
    pub fn delete_selected(&mut self, world: &mut World) {
        match world.selection_category() {
            SelectionCategory::None => {}
            SelectionCategory::MassPoints => {
                for key in world.selected_mass_points() {
                    world.remove_mass_point(key);
                }
            }
            SelectionCategory::Springs => {
                for key in world.selected_springs() {
                    world.remove_spring(key);
                }
            }
            SelectionCategory::Obstacles => {
                for key in world.selected_obstacles() {
                    world.remove_obstacle(key);
                }
            }
        }
        self.end_drag(world);
    }

    pub fn toggle_mode(&mut self, world: &mut World) {
        let next = match self.mode {
            Mode::Physics => Mode::Obstacle,
            Mode::Obstacle => Mode::Physics,
        };
        self.set_mode(world, next);
    }

    /// Switch modes, clearing the other mode's selection and any drawing.
    pub fn set_mode(&mut self, world: &mut World, mode: Mode) {
        if mode == self.mode {
            return;
        }
        match mode {
            Mode::Obstacle => {
                world.clear_point_selection();
                world.clear_spring_selection();
            }
            Mode::Physics => world.clear_obstacle_selection(),
        }
        self.cancel_drawing();
        self.end_drag(world);
        self.pointer.reset();
        self.mode = mode;
        log::debug!("editor mode: {mode:?}");
    }

    /// Empty the world and drop all scratch state.
    pub fn reset(&mut self, world: &mut World) {
        world.clear();
        self.drawing = DrawingObstacle::Idle;
        self.drag = None;
        self.pointer.reset();
    }

    /// Pin or unpin the selected mass points.
    ///
    /// Points held by a drag keep the drag's pin; their state after release is
    /// what gets toggled.
    pub fn toggle_pin(&mut self, world: &mut World) {
        for key in world.selected_mass_points() {
            let dragged = self
                .drag
                .as_mut()
                .and_then(|session| session.anchors.iter_mut().find(|a| a.key == key));
            if let Some(anchor) = dragged {
                anchor.was_pinned = !anchor.was_pinned;
                continue;
            }
            if let Some(point) = world.mass_point_mut(key) {
                point.pinned = !point.pinned;
                point.velocity = Vec2::ZERO;
            }
        }
    }

    // --- parameters ---------------------------------------------------------

    /// Update the default for new entities and every selected entity it applies to.
    ///
    /// Out-of-range values are ignored.
    pub fn set_parameter(&mut self, world: &mut World, parameter: Parameter, value: f32) {
        let valid = match parameter {
            Parameter::Mass => is_valid_mass(value),
            Parameter::RestLength => value.is_finite() && value > 0.0,
            Parameter::Stiffness | Parameter::Damping => value.is_finite() && value >= 0.0,
        };
        if !valid {
            log::debug!("ignoring {parameter:?} = {value}");
            return;
        }

        match parameter {
            Parameter::Mass => {
                self.config.mass = value;
                for key in world.selected_mass_points() {
                    if let Some(point) = world.mass_point_mut(key) {
                        point.mass = value;
                    }
                }
            }
            Parameter::Stiffness | Parameter::RestLength | Parameter::Damping => {
                match parameter {
                    Parameter::Stiffness => self.config.stiffness = value,
                    Parameter::RestLength => self.config.rest_length = value,
                    _ => self.config.damping = value,
                }
                for key in world.selected_springs() {
                    if let Some(spring) = world.spring_mut(key) {
                        match parameter {
                            Parameter::Stiffness => spring.stiffness = value,
                            Parameter::RestLength => spring.rest_length = value,
                            _ => spring.damping = value,
                        }
                    }
                }
            }
        }
    }

    /// Value a slider should show: the first selected entity's, else the default.
    pub fn parameter_value(&self, world: &World, parameter: Parameter) -> f32 {
        match parameter {
            Parameter::Mass => world
                .selected_mass_points()
                .first()
                .and_then(|&key| world.mass_point(key))
                .map_or(self.config.mass, |p| p.mass),
            _ => {
                let spring = world
                    .selected_springs()
                    .first()
                    .and_then(|&key| world.spring(key));
                match (parameter, spring) {
                    (Parameter::Stiffness, Some(s)) => s.stiffness,
                    (Parameter::RestLength, Some(s)) => s.rest_length,
                    (Parameter::Damping, Some(s)) => s.damping,
                    (Parameter::Stiffness, None) => self.config.stiffness,
                    (Parameter::RestLength, None) => self.config.rest_length,
                    _ => self.config.damping,
                }
            }
        }
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}
