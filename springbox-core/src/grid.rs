//! Cross-braced lattice generator.

use crate::error::WorldError;
use crate::mass_point::{is_valid_mass, MassPoint};
use crate::spring::SpringParams;
use crate::world::{PointKey, SpringKey, World};
use glam::Vec2;

/// Shared parameters for every mass point a generator creates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointParams {
    pub mass: f32,
    pub damping: f32,
    pub velocity: Vec2,
    pub use_gravity: bool,
    pub radius: f32,
}

impl PointParams {
    pub fn new(mass: f32) -> Self {
        Self {
            mass,
            damping: 0.0,
            velocity: Vec2::ZERO,
            use_gravity: true,
            radius: MassPoint::DEFAULT_RADIUS,
        }
    }

    pub fn damping(mut self, damping: f32) -> Self {
        self.damping = damping;
        self
    }

    pub fn velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn build(&self, position: Vec2) -> MassPoint {
        MassPoint::new(position, self.mass)
            .with_velocity(self.velocity)
            .with_damping(self.damping)
            .with_gravity(self.use_gravity)
            .with_radius(self.radius)
    }
}

impl Default for PointParams {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Configuration for [`World::add_grid`].
#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    /// Position of the top-left mass point.
    pub origin: Vec2,
    pub columns: usize,
    pub rows: usize,
    pub spacing: f32,
    pub point: PointParams,
    /// Rest length is ignored; each spring rests at its initial length.
    pub spring: SpringParams,
}

impl GridConfig {
    pub fn new(origin: Vec2, columns: usize, rows: usize, spacing: f32) -> Self {
        Self {
            origin,
            columns,
            rows,
            spacing,
            point: PointParams::default(),
            spring: SpringParams::default(),
        }
    }

    pub fn with_points(mut self, point: PointParams) -> Self {
        self.point = point;
        self
    }

    pub fn with_springs(mut self, spring: SpringParams) -> Self {
        self.spring = spring;
        self
    }
}

/// Handles to everything one generated grid added, row-major.
#[derive(Debug, Clone)]
pub struct Grid {
    pub columns: usize,
    pub rows: usize,
    pub points: Vec<PointKey>,
    pub springs: Vec<SpringKey>,
}

impl Grid {
    pub fn point(&self, x: usize, y: usize) -> Option<PointKey> {
        if x >= self.columns || y >= self.rows {
            return None;
        }
        self.points.get(x + y * self.columns).copied()
    }
}

/// Number of springs a `columns x rows` grid gets: horizontal, vertical and
/// both diagonals of every cell.
pub fn grid_spring_count(columns: usize, rows: usize) -> usize {
    if columns == 0 || rows == 0 {
        return 0;
    }
    let cells = (columns - 1) * (rows - 1);
    rows * (columns - 1) + columns * (rows - 1) + 2 * cells
}

impl World {
    /// Add a lattice of mass points joined by structural and shear springs.
    ///
    /// Everything is validated before the first insert, so an error leaves the
    /// world untouched.
    pub fn add_grid(&mut self, config: &GridConfig) -> Result<Grid, WorldError> {
        let (columns, rows) = (config.columns, config.rows);
        if columns == 0 || rows == 0 {
            return Err(WorldError::InvalidGridDimensions { columns, rows });
        }
        if !(config.spacing.is_finite() && config.spacing > 0.0) {
            return Err(WorldError::InvalidSpacing(config.spacing));
        }
        if !is_valid_mass(config.point.mass) {
            return Err(WorldError::InvalidMass(config.point.mass));
        }

        let mut points = Vec::with_capacity(columns * rows);
        for y in 0..rows {
            for x in 0..columns {
                let offset = Vec2::new(x as f32, y as f32) * config.spacing;
                points.push(self.add_mass_point(config.point.build(config.origin + offset))?);
            }
        }

        let index = |x: usize, y: usize| x + y * columns;
        let params = SpringParams {
            rest_length: None,
            ..config.spring
        };
        let mut springs = Vec::with_capacity(grid_spring_count(columns, rows));
        for y in 0..rows {
            for x in 0..columns {
                let right = x + 1 < columns;
                let down = y + 1 < rows;
                if right {
                    springs.push(self.add_spring(points[index(x, y)], points[index(x + 1, y)], params)?);
                }
                if down {
                    springs.push(self.add_spring(points[index(x, y)], points[index(x, y + 1)], params)?);
                }
                if right && down {
                    springs.push(self.add_spring(points[index(x, y)], points[index(x + 1, y + 1)], params)?);
                    springs.push(self.add_spring(points[index(x + 1, y)], points[index(x, y + 1)], params)?);
                }
            }
        }

        log::debug!(
            "generated {columns}x{rows} grid: {} points, {} springs",
            points.len(),
            springs.len()
        );
        Ok(Grid {
            columns,
            rows,
            points,
            springs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spring_count_formula() {
        assert_eq!(grid_spring_count(1, 1), 0);
        assert_eq!(grid_spring_count(2, 1), 1);
        assert_eq!(grid_spring_count(2, 2), 6);
        assert_eq!(grid_spring_count(3, 3), 20);
        assert_eq!(grid_spring_count(2, 8), 8 + 14 + 14);
    }
}
