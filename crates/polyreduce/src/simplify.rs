//! Tolerance-ladder simplification.
//!
//! Purpose
//! - Bring a ring under a vertex budget by Douglas–Peucker simplification at
//!   a small, fixed set of increasing tolerances (`Low`, `Medium`, `Large`).
//! - Each rung restarts from the original ring. Cascading from the previous
//!   rung would be cheaper but compounds the boundary error of every rung.
//!
//! Conventions
//! - Simplification is not topology preserving: the result may self-touch or
//!   collapse to zero area. The orchestrator decides what to do with that.
//! - Distances are planar, in degrees, measured to the segment (not the
//!   infinite line) between the two kept endpoints.

use std::fmt;

use tracing::debug;

use crate::cfg::ToleranceLadder;
use crate::error::{Error, Result};
use crate::ring::{Point, Ring};
use crate::units::Degrees;

/// Rung of the tolerance ladder, in increasing tolerance order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ToleranceLevel {
    Low,
    Medium,
    Large,
}

impl ToleranceLevel {
    /// All rungs in the order they are tried.
    pub const ALL: [ToleranceLevel; 3] = [Self::Low, Self::Medium, Self::Large];

    /// Position in `ALL`; used to index per-level counters.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::Large => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

impl fmt::Display for ToleranceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Distance from `p` to the segment `a`–`b`.
#[inline]
fn segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq == 0.0 {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}

/// Douglas–Peucker on a closed ring.
///
/// The first (= last) point is always kept; every other vertex survives only
/// if it lies farther than `tolerance` from the simplified boundary. A result
/// with fewer than 4 points is reported as `DegenerateGeometry`.
pub fn douglas_peucker(ring: &Ring, tolerance: Degrees) -> Result<Ring> {
    let tol = tolerance.0.max(0.0);
    let pts = ring.points();
    let n = pts.len();
    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;

    // Explicit stack: rings with 1e5+ vertices would recurse too deep.
    let mut stack = vec![(0usize, n - 1)];
    while let Some((first, last)) = stack.pop() {
        if last <= first + 1 {
            continue;
        }
        let (a, b) = (pts[first], pts[last]);
        let mut dmax = 0.0;
        let mut index = first;
        for (i, p) in pts.iter().enumerate().take(last).skip(first + 1) {
            let d = segment_distance(*p, a, b);
            if d > dmax {
                dmax = d;
                index = i;
            }
        }
        if dmax > tol {
            keep[index] = true;
            stack.push((index, last));
            stack.push((first, index));
        }
    }

    let out: Vec<Point> = pts
        .iter()
        .zip(&keep)
        .filter_map(|(p, k)| k.then_some(*p))
        .collect();
    if out.len() < 4 {
        return Err(Error::DegenerateGeometry {
            points: out.len(),
            area_m2: 0.0,
        });
    }
    Ok(Ring::from_closed_unchecked(out))
}

/// Simplify `ring` until it has at most `max_vertex_count` coordinates.
///
/// Tries every rung of `ladder` in order, each on the original ring, and
/// returns the first result that fits together with its rung. Fails with
/// `StillTooComplex` when even the largest tolerance leaves too many vertices.
pub fn simplify(
    ring: &Ring,
    max_vertex_count: usize,
    ladder: &ToleranceLadder,
) -> Result<(Ring, ToleranceLevel)> {
    let mut vertices = ring.len();
    for (level, tol) in ladder.rungs() {
        let candidate = douglas_peucker(ring, tol)?;
        debug!(
            level = level.label(),
            before = ring.len(),
            after = candidate.len(),
            max = max_vertex_count,
            "rung"
        );
        if candidate.len() <= max_vertex_count {
            return Ok((candidate, level));
        }
        vertices = candidate.len();
    }
    Err(Error::StillTooComplex {
        vertices,
        max: max_vertex_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring::rand::{draw_ring_radial, ReplayToken, RingCfg};
    use crate::ring::special::{densified_square, regular_polygon, zigzag_star};
    use proptest::prelude::*;

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(1.0, 0.0);
        assert!((segment_distance(Point::new(0.5, 2.0), a, b) - 2.0).abs() < 1e-12);
        assert!((segment_distance(Point::new(2.0, 0.0), a, b) - 1.0).abs() < 1e-12);
        assert!((segment_distance(Point::new(3.0, 4.0), a, a) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn dense_square_collapses_to_corners() {
        let ring = densified_square(Point::new(-0.1, 51.5), Degrees(0.01), 15_000);
        let out = douglas_peucker(&ring, ToleranceLadder::default().low).unwrap();
        assert_eq!(out.len(), 5);
        assert_eq!(out.points().first(), out.points().last());
    }

    #[test]
    fn fifteen_thousand_point_square_fits_at_low() {
        let ring = densified_square(Point::new(-0.1, 51.5), Degrees(0.01), 15_000);
        let (out, level) = simplify(&ring, 10_000, &ToleranceLadder::default()).unwrap();
        assert_eq!(level, ToleranceLevel::Low);
        assert!(out.len() <= 10_000);
        let rel = (out.area().0 - ring.area().0).abs() / ring.area().0;
        assert!(rel < 0.05, "area drift {rel}");
    }

    #[test]
    fn ladder_climbs_until_budget_is_met() {
        // Most ~300 m bumps survive Low (100 m); none survive Medium (500 m).
        let center = Point::new(5.0, 45.0);
        let ring = zigzag_star(
            center,
            Degrees(0.05),
            Degrees(0.05 + 300.0 / crate::units::DEGREE_TO_METER),
            400,
        );
        let ladder = ToleranceLadder::default();
        let low = douglas_peucker(&ring, ladder.low).unwrap();
        assert!(low.len() > 500, "low kept {}", low.len());
        let (out, level) = simplify(&ring, 500, &ladder).unwrap();
        assert_eq!(level, ToleranceLevel::Medium);
        assert!(out.len() <= 500);
    }

    #[test]
    fn star_is_still_too_complex_at_large() {
        let ring = zigzag_star(Point::new(0.0, 0.0), Degrees(0.5), Degrees(1.0), 100);
        let err = simplify(&ring, 50, &ToleranceLadder::default()).unwrap_err();
        assert_eq!(
            err,
            Error::StillTooComplex {
                vertices: 201,
                max: 50
            }
        );
    }

    #[test]
    fn tiny_ring_collapses_to_degenerate() {
        // 20 m across; every vertex is within 100 m of the closing point.
        let ring = regular_polygon(Point::new(10.0, 10.0), Degrees(1e-4), 32);
        let err = douglas_peucker(&ring, ToleranceLadder::default().low).unwrap_err();
        assert!(matches!(err, Error::DegenerateGeometry { .. }));
    }

    proptest! {
        #[test]
        fn simplification_is_idempotent_and_closed(
            seed in 0u64..1_000,
            n in 8usize..400,
            tol_m in 1.0f64..2_000.0,
        ) {
            let cfg = RingCfg { vertex_count: n, ..RingCfg::default() };
            let ring = draw_ring_radial(cfg, ReplayToken { seed, index: 0 });
            let tol = crate::units::Meters(tol_m).to_degrees();
            if let Ok(once) = douglas_peucker(&ring, tol) {
                prop_assert_eq!(once.points().first(), once.points().last());
                prop_assert!(once.len() <= ring.len());
                if let Ok(twice) = douglas_peucker(&once, tol) {
                    prop_assert!(twice.len() <= once.len());
                }
            }
        }
    }
}
