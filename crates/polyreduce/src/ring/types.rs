//! `Ring`, `Bounds2` and `Aff2`.

use std::collections::HashSet;

use nalgebra::{Matrix2, Vector2};

use crate::error::{MalformedRing, Result};
use crate::units::{SquareDegrees, SquareMeters};

/// Planar point: `x` is longitude, `y` is latitude (degrees).
pub type Point = Vector2<f64>;

/// Determinant threshold below which an affine map is treated as singular.
const EPS_DET: f64 = 1e-18;

/// Closed ring of lon/lat points.
///
/// Invariants:
/// - At least 4 points, all finite.
/// - `points[0] == points[len - 1]` (exact).
/// - At least 3 distinct points at construction time. Simplification may
///   return thinner rings; callers detect those through `area()`.
#[derive(Clone, Debug, PartialEq)]
pub struct Ring {
    points: Vec<Point>,
}

impl Ring {
    /// Validate and wrap a coordinate sequence.
    pub fn new(points: Vec<Point>) -> Result<Self> {
        if let Some(index) = points
            .iter()
            .position(|p| !(p.x.is_finite() && p.y.is_finite()))
        {
            return Err(MalformedRing::NonFinite { index }.into());
        }
        if points.len() < 4 {
            return Err(MalformedRing::TooFewPoints {
                count: points.len(),
            }
            .into());
        }
        if points[0] != points[points.len() - 1] {
            return Err(MalformedRing::NotClosed.into());
        }
        let unique = count_unique(&points, 3);
        if unique < 3 {
            return Err(MalformedRing::TooFewUniquePoints { count: unique }.into());
        }
        Ok(Self { points })
    }

    /// Build from `[lon, lat]` pairs.
    pub fn from_lon_lat(coords: &[[f64; 2]]) -> Result<Self> {
        Self::new(coords.iter().map(|c| Point::new(c[0], c[1])).collect())
    }

    /// Wrap points already known to be closed with at least 4 entries.
    pub(crate) fn from_closed_unchecked(points: Vec<Point>) -> Self {
        debug_assert!(points.len() >= 4);
        debug_assert_eq!(points.first(), points.last());
        Self { points }
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Coordinate count, closing point included.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; a valid ring has at least 4 points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn to_lon_lat(&self) -> Vec<[f64; 2]> {
        self.points.iter().map(|p| [p.x, p.y]).collect()
    }

    /// Shoelace area with sign (positive for counterclockwise rings).
    ///
    /// Computed relative to the first point to keep precision for small rings
    /// far from the origin.
    pub fn signed_area(&self) -> f64 {
        let o = self.points[0];
        let mut twice = 0.0;
        for w in self.points.windows(2) {
            let p = w[0] - o;
            let q = w[1] - o;
            twice += p.x * q.y - q.x * p.y;
        }
        0.5 * twice
    }

    #[inline]
    pub fn area(&self) -> SquareDegrees {
        SquareDegrees(self.signed_area().abs())
    }

    /// Flat-Earth area estimate.
    #[inline]
    pub fn area_meters(&self) -> SquareMeters {
        self.area().to_square_meters()
    }

    /// Area centroid.
    ///
    /// Zero-area rings fall back to the length-weighted centroid of their
    /// edges, and rings of zero length to their first point.
    pub fn centroid(&self) -> Point {
        let o = self.points[0];
        let mut a = 0.0;
        let mut c = Vector2::zeros();
        for w in self.points.windows(2) {
            let p = w[0] - o;
            let q = w[1] - o;
            let cross = p.x * q.y - q.x * p.y;
            a += cross;
            c += (p + q) * cross;
        }
        if a != 0.0 && a.is_finite() {
            return o + c / (3.0 * a);
        }
        let mut len_total = 0.0;
        let mut m = Vector2::zeros();
        for w in self.points.windows(2) {
            let len = (w[1] - w[0]).norm();
            len_total += len;
            m += (w[0] - o + (w[1] - o)) * (0.5 * len);
        }
        if len_total > 0.0 {
            o + m / len_total
        } else {
            o
        }
    }

    /// Axis-aligned bounding box in degrees.
    pub fn bounds(&self) -> Bounds2 {
        let mut min = self.points[0];
        let mut max = self.points[0];
        for p in &self.points[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Bounds2 { min, max }
    }

    /// Image of the ring under `f`; `None` if `f` is singular.
    ///
    /// The closing point maps to the same value as the first one, so closure
    /// is preserved exactly.
    pub fn transform(&self, f: &Aff2) -> Option<Ring> {
        if f.m.determinant().abs() <= EPS_DET {
            return None;
        }
        let points = self.points.iter().map(|p| f.apply(*p)).collect();
        Some(Self::from_closed_unchecked(points))
    }
}

/// Count distinct points, stopping once `enough` have been seen.
fn count_unique(points: &[Point], enough: usize) -> usize {
    let mut seen: HashSet<(u64, u64)> = HashSet::with_capacity(enough);
    for p in points {
        // -0.0 and 0.0 are the same coordinate.
        let key = ((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits());
        seen.insert(key);
        if seen.len() >= enough {
            break;
        }
    }
    seen.len()
}

/// Axis-aligned box in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds2 {
    pub min: Point,
    pub max: Point,
}

impl Bounds2 {
    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }
    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
    /// Larger of width and height.
    #[inline]
    pub fn max_extent(&self) -> f64 {
        self.width().max(self.height())
    }
}

/// 2D affine map: `x ↦ M x + t`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aff2 {
    pub m: Matrix2<f64>,
    pub t: Vector2<f64>,
}

impl Aff2 {
    #[inline]
    pub fn identity() -> Self {
        Self {
            m: Matrix2::identity(),
            t: Vector2::zeros(),
        }
    }

    /// Uniform scale by `k` that keeps `center` fixed.
    #[inline]
    pub fn scale_about(center: Point, k: f64) -> Self {
        Self {
            m: Matrix2::identity() * k,
            t: center * (1.0 - k),
        }
    }

    #[inline]
    pub fn apply(&self, p: Point) -> Point {
        self.m * p + self.t
    }
}
