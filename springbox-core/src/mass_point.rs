//! Point masses: force accumulation, semi-implicit Euler integration and
//! collision response against the window and polygon obstacles.

use crate::config::PhysicsConfig;
use crate::integrator::{integrate_position, integrate_velocity};
use crate::math::{circles_overlap, reflect};
use crate::obstacle::{Edge, PolygonObstacle};
use glam::Vec2;

/// Whether `mass` can be used as a divisor in integration.
pub fn is_valid_mass(mass: f32) -> bool {
    mass.is_finite() && mass > 0.0
}

/// Everything outside a mass point that one integration step needs.
#[derive(Debug, Clone, Copy)]
pub struct StepEnvironment<'a> {
    pub config: &'a PhysicsConfig,
    /// Global gravity switch; combined with each point's own `use_gravity`.
    pub gravity_enabled: bool,
    pub obstacles: &'a [&'a PolygonObstacle],
}

/// Position and radius of another mass point, for the optional point-point response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Disc {
    pub center: Vec2,
    pub radius: f32,
}

/// A point mass.
///
/// Pinned points skip force integration entirely and hold zero velocity, which
/// stands in for infinite mass without dividing by it.
#[derive(Debug, Clone, PartialEq)]
pub struct MassPoint {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Sum of forces deposited since the last step. Cleared after integration.
    pub accumulated_force: Vec2,
    pub mass: f32,
    /// Linear drag coefficient.
    pub damping: f32,
    pub use_gravity: bool,
    pub radius: f32,
    pub pinned: bool,
    pub selected: bool,
}

impl MassPoint {
    pub const DEFAULT_RADIUS: f32 = 5.0;

    pub fn new(position: Vec2, mass: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            accumulated_force: Vec2::ZERO,
            mass,
            damping: 0.0,
            use_gravity: true,
            radius: Self::DEFAULT_RADIUS,
            pinned: false,
            selected: false,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_gravity(mut self, use_gravity: bool) -> Self {
        self.use_gravity = use_gravity;
        self
    }

    pub fn pinned(mut self) -> Self {
        self.pinned = true;
        self.velocity = Vec2::ZERO;
        self
    }

    pub fn add_force(&mut self, force: Vec2) {
        self.accumulated_force += force;
    }

    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.velocity.length_squared()
    }

    /// Advance this point by one step of `dt` seconds.
    ///
    /// Order: gravity and drag, velocity integration, boundary clamp,
    /// point-point and obstacle response, position integration, force reset.
    /// The boundary clamp runs once more after the position update so the
    /// point always ends the step inside the window.
    pub fn update(&mut self, dt: f32, env: &StepEnvironment<'_>, others: &[Disc]) {
        let config = env.config;

        if self.pinned {
            self.velocity = Vec2::ZERO;
            self.accumulated_force = Vec2::ZERO;
            self.resolve_boundary(config.bounds);
            return;
        }

        if self.use_gravity && env.gravity_enabled {
            self.add_force(config.gravity * self.mass);
        }
        self.add_force(-self.damping * self.velocity);

        self.velocity = integrate_velocity(self.velocity, self.accumulated_force, self.mass, dt);

        self.resolve_boundary(config.bounds);
        if config.point_collisions {
            self.resolve_point_collisions(others, config.bounciness);
        }
        self.resolve_obstacles(env.obstacles, config);

        self.position = integrate_position(self.position, self.velocity, dt);
        self.resolve_boundary(config.bounds);

        self.accumulated_force = Vec2::ZERO;
    }

    /// Clamp into `[radius, bounds - radius]` on each axis.
    ///
    /// Only a velocity component heading into the wall is negated, rather
    /// than negating on every contact. A component already heading away is
    /// left alone, so a point resting on the clamp is not flipped back into
    /// the wall on the next step.
    pub fn resolve_boundary(&mut self, bounds: Vec2) {
        for axis in 0..2 {
            let min = self.radius;
            let max = bounds[axis] - self.radius;
            if self.position[axis] <= min {
                self.position[axis] = min;
                if self.velocity[axis] < 0.0 {
                    self.velocity[axis] = -self.velocity[axis];
                }
            } else if self.position[axis] >= max {
                self.position[axis] = max;
                if self.velocity[axis] > 0.0 {
                    self.velocity[axis] = -self.velocity[axis];
                }
            }
        }
    }

    fn resolve_obstacles(&mut self, obstacles: &[&PolygonObstacle], config: &PhysicsConfig) {
        let reach = self.radius + config.contact_margin;
        for obstacle in obstacles {
            let mut edges: Vec<Edge> = obstacle.colliding_edges(self.position, reach).collect();
            edges.sort_by(|a, b| {
                a.distance_to(self.position)
                    .total_cmp(&b.distance_to(self.position))
            });
            // Nearest edge first; each push-out changes what the later edges see
            for edge in edges {
                if edge.distance_to(self.position) > reach {
                    continue;
                }
                let inside = obstacle.contains_point(self.position);
                self.resolve_edge(edge, inside, config);
            }
        }
    }

    /// Bounce off a single edge and push out of penetration.
    ///
    /// The normal points from the contact point toward the centre (flipped when
    /// the centre has tunnelled inside), so the response does not depend on the
    /// polygon's winding.
    fn resolve_edge(&mut self, edge: Edge, inside: bool, config: &PhysicsConfig) {
        let contact = edge.closest_point(self.position);
        let offset = self.position - contact;
        let distance = offset.length();

        let normal = if distance > f32::EPSILON {
            if inside {
                -offset / distance
            } else {
                offset / distance
            }
        } else {
            // Centre exactly on the edge: push back against the approach
            let n = edge.normal();
            if self.velocity.dot(n) > 0.0 {
                -n
            } else {
                n
            }
        };
        if normal == Vec2::ZERO {
            return;
        }

        if self.velocity.dot(normal) < 0.0 {
            self.velocity = reflect(self.velocity, normal) * config.bounciness;
        }

        let depth = if inside && distance > f32::EPSILON {
            self.radius + distance
        } else {
            self.radius - distance
        };
        self.position += normal * (depth.max(0.0) + config.separation_epsilon);
    }

    fn resolve_point_collisions(&mut self, others: &[Disc], bounciness: f32) {
        for other in others {
            if !circles_overlap(self.position, self.radius, other.center, other.radius) {
                continue;
            }
            let offset = self.position - other.center;
            let distance = offset.length();
            if distance <= f32::EPSILON {
                continue;
            }
            let normal = offset / distance;
            if self.velocity.dot(normal) < 0.0 {
                self.velocity = reflect(self.velocity, normal) * bounciness;
            }
            // Each point of the pair moves half the overlap
            let overlap = self.radius + other.radius - distance;
            self.position += normal * (overlap * 0.5);
        }
    }
}
