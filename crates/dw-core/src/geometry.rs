use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Euclidean distance between two points.
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Unit vector pointing from `from` to `to`, or zero when the points coincide.
pub fn direction(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

/// An axis-aligned rectangle on the field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Bottom-left corner.
    pub min: Vec2,
    /// Top-right corner.
    pub max: Vec2,
}

impl Bounds {
    /// Create bounds from two corners; the corners are reordered if needed.
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// A `width` x `height` rectangle centred on the origin.
    pub fn centered(width: f32, height: f32) -> Self {
        let half = Vec2::new(width.abs() / 2.0, height.abs() / 2.0);
        Self {
            min: -half,
            max: half,
        }
    }

    /// Horizontal extent.
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Vertical extent.
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Whether `point` lies inside or on the edge of the rectangle.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Clamp `point` into the rectangle.
    pub fn clamp(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max)
    }

    /// The overlap of two rectangles. When they are disjoint the result
    /// collapses onto the nearest edge of `self`.
    pub fn intersect(&self, other: &Bounds) -> Bounds {
        let min = self.clamp(other.min);
        let max = self.clamp(other.max);
        Bounds::new(min, max)
    }

    /// A point drawn uniformly from the rectangle.
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        Vec2::new(
            rng.random_range(self.min.x..=self.max.x),
            rng.random_range(self.min.y..=self.max.y),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn direction_is_unit_or_zero() {
        let d = direction(Vec2::ZERO, Vec2::new(3.0, 4.0));
        assert!((d.length() - 1.0).abs() < 1e-6);
        assert_eq!(direction(Vec2::ONE, Vec2::ONE), Vec2::ZERO);
    }

    #[test]
    fn centered_bounds_extent() {
        let b = Bounds::centered(20.0, 12.0);
        assert_eq!(b.min, Vec2::new(-10.0, -6.0));
        assert_eq!(b.max, Vec2::new(10.0, 6.0));
        assert!((b.width() - 20.0).abs() < f32::EPSILON);
        assert!((b.height() - 12.0).abs() < f32::EPSILON);
    }

    #[test]
    fn intersect_shrinks_to_overlap() {
        let map = Bounds::centered(20.0, 12.0);
        let wide = Bounds::centered(40.0, 4.0);
        let overlap = map.intersect(&wide);
        assert_eq!(overlap.min, Vec2::new(-10.0, -2.0));
        assert_eq!(overlap.max, Vec2::new(10.0, 2.0));
    }

    #[test]
    fn random_points_stay_inside() {
        let b = Bounds::centered(12.0, 8.0);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            assert!(b.contains(b.random_point(&mut rng)));
        }
    }

    #[test]
    fn degenerate_bounds_yield_single_point() {
        let b = Bounds::new(Vec2::new(1.0, 2.0), Vec2::new(1.0, 2.0));
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(b.random_point(&mut rng), Vec2::new(1.0, 2.0));
    }

    proptest! {
        #[test]
        fn clamp_lands_inside_and_keeps_inner_points(
            x in -50.0f32..50.0, y in -50.0f32..50.0,
        ) {
            let b = Bounds::centered(20.0, 12.0);
            let p = Vec2::new(x, y);
            let clamped = b.clamp(p);
            prop_assert!(b.contains(clamped));
            if b.contains(p) {
                prop_assert_eq!(clamped, p);
            }
        }
    }
}
