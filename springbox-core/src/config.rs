//! Configuration for the physics step and the sandbox editor.

use glam::Vec2;
use std::time::Duration;

/// Downward gravity in screen space (pixels per second squared).
pub const DEFAULT_GRAVITY: f32 = 9.81 * 20.0;

/// Global parameters of the physics step.
///
/// # Builder Pattern
/// ```
/// use springbox_core::config::PhysicsConfig;
/// use springbox_core::Vec2;
///
/// let config = PhysicsConfig::new()
///     .with_bounds(Vec2::new(1024.0, 768.0))
///     .with_bounciness(0.8)
///     .with_max_dt(1.0 / 30.0);
/// assert_eq!(config.bounds, Vec2::new(1024.0, 768.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsConfig {
    /// Gravity acceleration. Positive y points down the screen.
    pub gravity: Vec2,
    /// Window extent; mass points are kept inside `[radius, bounds - radius]` on both axes.
    pub bounds: Vec2,
    /// Scale applied to velocity after an obstacle reflection. 1.0 is perfectly elastic.
    pub bounciness: f32,
    /// Extra distance beyond a point's radius at which an obstacle edge counts as touching.
    pub contact_margin: f32,
    /// Extra distance a point is pushed out of an obstacle edge after penetration.
    pub separation_epsilon: f32,
    /// Upper bound on a single step's Δt, in seconds.
    pub max_dt: f32,
    /// Enables mass point vs mass point repulsion. Off by default.
    pub point_collisions: bool,
}

impl PhysicsConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self {
            gravity: Vec2::new(0.0, DEFAULT_GRAVITY),
            bounds: Vec2::new(800.0, 600.0),
            bounciness: 1.0,
            contact_margin: 1.0,
            separation_epsilon: 0.01,
            max_dt: 1.0 / 15.0,
            point_collisions: false,
        }
    }

    pub fn with_gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_bounds(mut self, bounds: Vec2) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_bounciness(mut self, bounciness: f32) -> Self {
        self.bounciness = bounciness.max(0.0);
        self
    }

    pub fn with_contact_margin(mut self, margin: f32) -> Self {
        self.contact_margin = margin.max(0.0);
        self
    }

    pub fn with_max_dt(mut self, max_dt: f32) -> Self {
        self.max_dt = max_dt;
        self
    }

    pub fn with_point_collisions(mut self, enabled: bool) -> Self {
        self.point_collisions = enabled;
        self
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Parameters the editor uses for picking, click disambiguation and new entities.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Cursor distance within which a mass point is picked.
    pub pick_radius: f32,
    /// Cursor distance within which a spring is picked.
    pub spring_pick_threshold: f32,
    /// Cursor distance within which an obstacle boundary is picked.
    pub obstacle_pick_threshold: f32,
    /// Clicking this close to the first vertex closes an in-progress polygon.
    pub close_radius: f32,
    /// A press held longer than this becomes a drag instead of a click.
    pub drag_threshold: Duration,
    /// Mass of newly created mass points.
    pub mass: f32,
    /// Radius of newly created mass points.
    pub point_radius: f32,
    /// Whether newly created mass points feel gravity.
    pub use_gravity: bool,
    /// Stiffness of newly created springs.
    pub stiffness: f32,
    /// Damping of newly created springs.
    pub damping: f32,
    /// Rest length of newly created springs.
    pub rest_length: f32,
}

impl EditorConfig {
    pub fn new() -> Self {
        Self {
            pick_radius: 10.0,
            spring_pick_threshold: 5.0,
            obstacle_pick_threshold: 5.0,
            close_radius: 10.0,
            drag_threshold: Duration::from_millis(200),
            mass: 100.0,
            point_radius: 5.0,
            use_gravity: true,
            stiffness: 100.0,
            damping: 10.0,
            rest_length: 50.0,
        }
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_stiffness(mut self, stiffness: f32) -> Self {
        self.stiffness = stiffness;
        self
    }

    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_rest_length(mut self, rest_length: f32) -> Self {
        self.rest_length = rest_length;
        self
    }

    pub fn with_drag_threshold(mut self, threshold: Duration) -> Self {
        self.drag_threshold = threshold;
        self
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self::new()
    }
}
