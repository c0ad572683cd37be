//! Damped springs between two mass points.

use crate::mass_point::MassPoint;
use crate::world::{PointKey, PointMap};
use glam::Vec2;

/// Parameters for building a spring.
///
/// `rest_length: None` means "use the current distance between the endpoints".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringParams {
    pub stiffness: f32,
    pub damping: f32,
    pub rest_length: Option<f32>,
}

impl SpringParams {
    pub fn new(stiffness: f32, damping: f32) -> Self {
        Self {
            stiffness,
            damping,
            rest_length: None,
        }
    }

    pub fn rest_length(mut self, rest_length: f32) -> Self {
        self.rest_length = Some(rest_length);
        self
    }
}

impl Default for SpringParams {
    fn default() -> Self {
        Self::new(100.0, 10.0)
    }
}

/// A Hookean spring with axial damping.
///
/// `a` and `b` are keys into the world's mass point map, never owned
/// references. The world removes a spring whenever either endpoint goes away.
#[derive(Debug, Clone, PartialEq)]
pub struct Spring {
    pub(crate) a: PointKey,
    pub(crate) b: PointKey,
    pub stiffness: f32,
    pub damping: f32,
    pub rest_length: f32,
    pub selected: bool,
}

impl Spring {
    pub(crate) fn new(a: PointKey, b: PointKey, stiffness: f32, damping: f32, rest_length: f32) -> Self {
        Self {
            a,
            b,
            stiffness,
            damping,
            rest_length,
            selected: false,
        }
    }

    pub fn a(&self) -> PointKey {
        self.a
    }

    pub fn b(&self) -> PointKey {
        self.b
    }

    /// Whether this spring joins `p` and `q`, in either order.
    pub fn connects(&self, p: PointKey, q: PointKey) -> bool {
        (self.a == p && self.b == q) || (self.a == q && self.b == p)
    }

    pub fn references(&self, key: PointKey) -> bool {
        self.a == key || self.b == key
    }

    /// Force to add to endpoint `a`. Endpoint `b` receives the negation.
    ///
    /// A stretched spring pulls `a` toward `b`; a compressed one pushes it away.
    /// Coincident endpoints produce no spring term since the axis is undefined.
    pub fn force_between(&self, a: &MassPoint, b: &MassPoint) -> Vec2 {
        let delta = b.position - a.position;
        let distance = delta.length();
        let direction = if distance != 0.0 {
            delta / distance
        } else {
            Vec2::ZERO
        };

        let spring_force = -self.stiffness * (self.rest_length - distance) * direction;

        let velocity_diff = b.velocity - a.velocity;
        let damping_force = self.damping * velocity_diff.dot(direction) * direction;

        spring_force + damping_force
    }

    /// Deposit this step's force pair into both endpoints.
    ///
    /// Springs never integrate; they must all run before any mass point does.
    pub fn update(&self, points: &mut PointMap) {
        let force = match (points.get(self.a), points.get(self.b)) {
            (Some(a), Some(b)) => self.force_between(a, b),
            _ => return,
        };
        if let Some(a) = points.get_mut(self.a) {
            a.add_force(force);
        }
        if let Some(b) = points.get_mut(self.b) {
            b.add_force(-force);
        }
    }

    /// Current length between the endpoints, if both are present.
    pub fn current_length(&self, points: &PointMap) -> Option<f32> {
        Some(points.get(self.a)?.position.distance(points.get(self.b)?.position))
    }

    /// Elastic energy stored at the current length.
    pub fn potential_energy(&self, points: &PointMap) -> f32 {
        self.current_length(points)
            .map(|l| 0.5 * self.stiffness * (l - self.rest_length).powi(2))
            .unwrap_or(0.0)
    }
}
