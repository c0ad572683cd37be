//! Static polygon obstacles.

use crate::error::WorldError;
use crate::math::{closest_point_on_segment, distance_point_to_segment, edge_normal};
use glam::Vec2;

/// One side of a polygon, from `start` to `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub start: Vec2,
    pub end: Vec2,
}

impl Edge {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    pub fn distance_to(&self, point: Vec2) -> f32 {
        distance_point_to_segment(point, self.start, self.end)
    }

    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        closest_point_on_segment(point, self.start, self.end)
    }

    /// Counter-clockwise unit normal; zero for a zero-length edge.
    pub fn normal(&self) -> Vec2 {
        edge_normal(self.start, self.end)
    }
}

/// A closed, immovable polygon.
///
/// Edge `i` joins vertex `i` to vertex `(i + 1) % n`. The vertex list cannot
/// change after construction; obstacles are only ever created or deleted whole.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonObstacle {
    vertices: Vec<Vec2>,
    pub selected: bool,
}

impl PolygonObstacle {
    /// Build an obstacle from at least three vertices.
    pub fn new(vertices: Vec<Vec2>) -> Result<Self, WorldError> {
        if vertices.len() < 3 {
            return Err(WorldError::TooFewVertices(vertices.len()));
        }
        Ok(Self {
            vertices,
            selected: false,
        })
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// All edges in vertex order, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| Edge::new(self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Even-odd ray casting test. Always false for fewer than three vertices.
    pub fn contains_point(&self, point: Vec2) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }

        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let (vi, vj) = (self.vertices[i], self.vertices[j]);
            // The straddle check guarantees vi.y != vj.y below
            if (vi.y > point.y) != (vj.y > point.y) {
                let x_cross = (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x;
                if point.x < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// True if any edge lies within `threshold` of `point`.
    pub fn near_boundary(&self, point: Vec2, threshold: f32) -> bool {
        self.edges().any(|edge| edge.distance_to(point) <= threshold)
    }

    /// Edges within `threshold` of `point`, in vertex order.
    pub fn colliding_edges(&self, point: Vec2, threshold: f32) -> impl Iterator<Item = Edge> + '_ {
        self.edges()
            .filter(move |edge| edge.distance_to(point) <= threshold)
    }

    /// First edge in vertex order within `threshold` of `point`.
    pub fn get_colliding_edge(&self, point: Vec2, threshold: f32) -> Option<Edge> {
        self.colliding_edges(point, threshold).next()
    }

    /// Picking test used by the editor: inside, or close to the outline.
    pub fn is_hit(&self, point: Vec2, threshold: f32) -> bool {
        self.contains_point(point) || self.near_boundary(point, threshold)
    }
}
