//! Circle fallback for rings that cannot be simplified under the budget.
//!
//! The ring is replaced by its centroid and a radius of half the larger side
//! of its bounding box. A circle has no boundary vertices once serialized, so
//! it always satisfies the vertex limit, at the cost of all boundary detail.

use crate::ring::{Point, Ring};
use crate::units::{Degrees, Meters};

/// Center plus radius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: Meters,
}

/// Approximate `ring` by a circle no smaller than `default_radius`.
pub fn to_circle(ring: &Ring, default_radius: Meters) -> Circle {
    let half_extent = Degrees(ring.bounds().max_extent() / 2.0);
    Circle {
        center: ring.centroid(),
        radius: half_extent.to_meters().max(default_radius),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring::special::{densified_square, regular_polygon, zigzag_star};
    use crate::units::DEGREE_TO_METER;
    use proptest::prelude::*;

    #[test]
    fn radius_is_half_the_larger_side() {
        // 0.2° wide, 0.1° tall.
        let ring = Ring::from_lon_lat(&[
            [10.0, 50.0],
            [10.2, 50.0],
            [10.2, 50.1],
            [10.0, 50.1],
            [10.0, 50.0],
        ])
        .unwrap();
        let c = to_circle(&ring, Meters(100.0));
        assert!((c.radius.0 - 0.1 * DEGREE_TO_METER).abs() < 1e-6);
        assert!((c.center - Point::new(10.1, 50.05)).norm() < 1e-9);
    }

    #[test]
    fn small_ring_gets_default_radius() {
        let ring = densified_square(Point::new(0.0, 0.0), Degrees(1e-5), 5);
        let c = to_circle(&ring, Meters(100.0));
        assert_eq!(c.radius, Meters(100.0));
    }

    #[test]
    fn star_circle_covers_its_extent() {
        let ring = zigzag_star(Point::new(3.0, 4.0), Degrees(0.5), Degrees(1.0), 100);
        let c = to_circle(&ring, Meters(100.0));
        assert!((c.radius.0 - DEGREE_TO_METER).abs() < 1e-6);
        assert!((c.center - Point::new(3.0, 4.0)).norm() < 1e-9);
    }

    proptest! {
        #[test]
        fn radius_never_below_default(
            r in 1e-7f64..0.5,
            sides in 3usize..64,
            default in 1.0f64..5_000.0,
        ) {
            let ring = regular_polygon(Point::new(-60.0, -20.0), Degrees(r), sides);
            let c = to_circle(&ring, Meters(default));
            prop_assert!(c.radius.0 >= default);
        }
    }
}
