//! Local collision-avoidance steering.
//!
//! Each moving agent blends the unit vector toward its destination with a
//! repulsion term pushing it away from peers inside the avoidance radius.

use dw_core::Vec2;
use dw_core::geometry::direction;

/// How strongly repulsion outweighs goal seeking.
pub const AVOIDANCE_WEIGHT: f32 = 2.0;

/// Sum of repulsion vectors from every neighbour closer than `radius`.
///
/// Each contribution is the unit vector away from the neighbour scaled by
/// `(radius - d) / radius`: full strength at contact, zero at the radius.
/// A neighbour at exactly the same position has no "away" direction and is
/// skipped.
pub fn repulsion(position: Vec2, neighbors: &[Vec2], radius: f32) -> Vec2 {
    if radius <= 0.0 {
        return Vec2::ZERO;
    }
    neighbors.iter().fold(Vec2::ZERO, |acc, &other| {
        let offset = position - other;
        let d = offset.length();
        if d > 0.0 && d < radius {
            acc + offset / d * ((radius - d) / radius)
        } else {
            acc
        }
    })
}

/// Heading for an agent at `position` travelling to `destination`.
///
/// Returns `normalize(to_target + AVOIDANCE_WEIGHT * repulsion)`. With no
/// repulsion this is exactly the direction to the target; when the forces
/// cancel out it falls back to that direction as well.
pub fn steer(position: Vec2, destination: Vec2, neighbors: &[Vec2], radius: f32) -> Vec2 {
    let to_target = direction(position, destination);
    let push = repulsion(position, neighbors, radius);
    if push == Vec2::ZERO {
        return to_target;
    }
    let heading = (to_target + push * AVOIDANCE_WEIGHT).normalize_or_zero();
    if heading == Vec2::ZERO {
        to_target
    } else {
        heading
    }
}
