//! Deterministic ring constructors.
//!
//! Shapes with known answers for simplification, scaling and circle tests,
//! plus sizable inputs for benches.

use std::f64::consts::TAU;

use super::types::{Point, Ring};
use crate::units::{Degrees, SquareMeters};

/// Axis-aligned square of side `side`, centered at `center`, with `n_points`
/// coordinates (closing point included) spread evenly over its four edges.
///
/// Every corner is a vertex. `n_points` is raised to 5 if smaller.
pub fn densified_square(center: Point, side: Degrees, n_points: usize) -> Ring {
    let distinct = n_points.max(5) - 1;
    let h = 0.5 * side.0;
    let corners = [
        center + Point::new(-h, -h),
        center + Point::new(h, -h),
        center + Point::new(h, h),
        center + Point::new(-h, h),
    ];
    let mut points = Vec::with_capacity(distinct + 1);
    for (i, &a) in corners.iter().enumerate() {
        let b = corners[(i + 1) % 4];
        let count = distinct / 4 + usize::from(i < distinct % 4);
        for k in 0..count {
            let t = k as f64 / count as f64;
            points.push(a + (b - a) * t);
        }
    }
    points.push(points[0]);
    Ring::from_closed_unchecked(points)
}

/// Five-point square whose flat-Earth area is `area`.
pub fn square_with_area(center: Point, area: SquareMeters) -> Ring {
    let side = area.to_square_degrees().0.sqrt();
    densified_square(center, Degrees(side), 5)
}

/// Regular polygon with `sides` vertices on a circle of radius `radius`.
///
/// `sides` is raised to 3 if smaller.
pub fn regular_polygon(center: Point, radius: Degrees, sides: usize) -> Ring {
    let n = sides.max(3);
    let mut points: Vec<Point> = (0..n)
        .map(|k| {
            let th = TAU * k as f64 / n as f64;
            center + Point::new(th.cos(), th.sin()) * radius.0
        })
        .collect();
    points.push(points[0]);
    Ring::from_closed_unchecked(points)
}

/// Star with `spikes` tips alternating between `outer` and `inner` radii.
///
/// With `outer - inner` well above a tolerance, no vertex can be dropped at
/// that tolerance, which makes this the canonical "cannot simplify" input.
pub fn zigzag_star(center: Point, inner: Degrees, outer: Degrees, spikes: usize) -> Ring {
    let n = 2 * spikes.max(2);
    let mut points: Vec<Point> = (0..n)
        .map(|k| {
            let th = TAU * k as f64 / n as f64;
            let r = if k % 2 == 0 { outer.0 } else { inner.0 };
            center + Point::new(th.cos(), th.sin()) * r
        })
        .collect();
    points.push(points[0]);
    Ring::from_closed_unchecked(points)
}
