//! 2D vector helpers shared by the collision model and the editor's picking queries.

use glam::Vec2;

/// Closest point to `point` on the segment `start..end`.
///
/// The projection parameter is clamped to `[0, 1]`. A degenerate segment
/// (coincident endpoints) collapses to `start`.
pub fn closest_point_on_segment(point: Vec2, start: Vec2, end: Vec2) -> Vec2 {
    let segment = end - start;
    let length_sq = segment.length_squared();
    if length_sq == 0.0 {
        return start;
    }
    let t = ((point - start).dot(segment) / length_sq).clamp(0.0, 1.0);
    start + segment * t
}

/// Euclidean distance from `point` to the segment `start..end`.
pub fn distance_point_to_segment(point: Vec2, start: Vec2, end: Vec2) -> f32 {
    point.distance(closest_point_on_segment(point, start, end))
}

/// Unit normal of the edge `start -> end`, rotated counter-clockwise from the edge direction.
///
/// Returns the zero vector for a zero-length edge.
pub fn edge_normal(start: Vec2, end: Vec2) -> Vec2 {
    (end - start).perp().normalize_or_zero()
}

/// Reflect `velocity` about the unit `normal`: `v - 2 (v . n) n`.
pub fn reflect(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Whether two discs touch or overlap.
pub fn circles_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    a.distance(b) <= radius_a + radius_b
}
