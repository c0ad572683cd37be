use crate::mass_point::{Disc, StepEnvironment};
use crate::obstacle::PolygonObstacle;
use crate::world::{PointKey, World};
use glam::Vec2;

/// Semi-implicit Euler velocity update: `v += F * dt / m`.
pub fn integrate_velocity(velocity: Vec2, force: Vec2, mass: f32, dt: f32) -> Vec2 {
    velocity + force * dt / mass
}

/// Position update using the already-integrated velocity.
pub fn integrate_position(position: Vec2, velocity: Vec2, dt: f32) -> Vec2 {
    position + velocity * dt
}

/// Turn a raw frame delta into a usable step length.
///
/// Non-finite or non-positive deltas yield `None`. Anything above `max_dt`
/// (a stalled frame) is cut down to `max_dt`.
pub fn sanitize_dt(dt: f32, max_dt: f32) -> Option<f32> {
    if !dt.is_finite() || dt <= 0.0 {
        return None;
    }
    if max_dt.is_finite() && max_dt > 0.0 && dt > max_dt {
        log::trace!("clamping dt {dt} to {max_dt}");
        return Some(max_dt);
    }
    Some(dt)
}

/// Step the world forward by `dt`, ignoring the pause state.
///
/// Every spring deposits its force before any mass point integrates;
/// reversing the two loops would integrate last step's forces.
pub fn step(world: &mut World, dt: f32) {
    world.apply_spring_forces();

    let obstacles: Vec<&PolygonObstacle> = world.obstacles.values().collect();
    let env = StepEnvironment {
        config: &world.config,
        gravity_enabled: world.gravity_enabled,
        obstacles: &obstacles,
    };

    let discs: Vec<(PointKey, Disc)> = if world.config.point_collisions {
        world
            .points
            .iter()
            .map(|(key, p)| {
                (
                    key,
                    Disc {
                        center: p.position,
                        radius: p.radius,
                    },
                )
            })
            .collect()
    } else {
        Vec::new()
    };

    for (key, point) in world.points.iter_mut() {
        let others: Vec<Disc> = discs
            .iter()
            .filter(|(other, _)| *other != key)
            .map(|(_, disc)| *disc)
            .collect();
        point.update(dt, &env, &others);
    }

    log::trace!(
        "stepped {} points and {} springs by {dt}",
        world.points.len(),
        world.springs.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_dt_rejects_bad_input() {
        assert_eq!(sanitize_dt(0.0, 0.1), None);
        assert_eq!(sanitize_dt(-0.01, 0.1), None);
        assert_eq!(sanitize_dt(f32::NAN, 0.1), None);
        assert_eq!(sanitize_dt(f32::INFINITY, 0.1), None);
    }

    #[test]
    fn test_sanitize_dt_clamps_stalls() {
        assert_eq!(sanitize_dt(0.5, 1.0 / 15.0), Some(1.0 / 15.0));
        assert_eq!(sanitize_dt(1.0 / 60.0, 1.0 / 15.0), Some(1.0 / 60.0));
    }

    #[test]
    fn test_velocity_precedes_position() {
        let v = integrate_velocity(Vec2::ZERO, Vec2::new(0.0, 10.0), 2.0, 0.5);
        assert_eq!(v, Vec2::new(0.0, 2.5));
        let p = integrate_position(Vec2::ZERO, v, 0.5);
        assert_eq!(p, Vec2::new(0.0, 1.25));
    }
}
