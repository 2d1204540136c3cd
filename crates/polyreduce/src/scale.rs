//! Area floor enforcement.
//!
//! Simplification can shrink a small polygon below the target system's
//! minimum usable footprint. The scaler grows such a ring uniformly about its
//! own centroid until its flat-Earth area reaches the floor. Shape and center
//! are kept; only the extent changes.

use crate::error::{Error, Result};
use crate::ring::{Aff2, Ring};
use crate::units::SquareMeters;

/// Areas at or below this are treated as zero (rounding noise of the shoelace
/// sum on collinear input).
pub const ZERO_AREA_EPS: SquareMeters = SquareMeters(1e-6);

/// Scale `ring` about its centroid so its area is at least `minimum`.
///
/// Rings already at or above the floor are returned unchanged. A ring with
/// zero area has no defined scale factor and yields `DegenerateGeometry`.
pub fn scale_to_minimum_area(ring: &Ring, minimum: SquareMeters) -> Result<Ring> {
    let area = ring.area_meters();
    if area.0 >= minimum.0 {
        return Ok(ring.clone());
    }
    let degenerate = || Error::DegenerateGeometry {
        points: ring.len(),
        area_m2: area.0,
    };
    if area.0 <= ZERO_AREA_EPS.0 {
        return Err(degenerate());
    }
    let k = (minimum.0 / area.0).sqrt();
    if !k.is_finite() {
        return Err(degenerate());
    }
    ring.transform(&Aff2::scale_about(ring.centroid(), k))
        .ok_or_else(degenerate)
}
