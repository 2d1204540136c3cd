//! Flat-Earth unit conversions.
//!
//! One fixed scalar maps a degree of longitude or latitude to meters. The
//! value is an average over latitudes, so lengths and areas far from the
//! mid-latitudes are only approximate. Nothing here is geodesic.
//!
//! Every quantity carries its unit in the type; converting is always an
//! explicit method call at the point where the unit changes.

use std::fmt;

/// Meters per degree (averaged over latitude).
pub const DEGREE_TO_METER: f64 = 111_219.8;
/// Degrees per meter.
pub const METER_TO_DEGREE: f64 = 1.0 / DEGREE_TO_METER;
/// Square meters per square degree.
pub const DEGREE_TO_METER_SQRD: f64 = DEGREE_TO_METER * DEGREE_TO_METER;

/// Length in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Degrees(pub f64);

/// Length in meters.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Meters(pub f64);

/// Area in square degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct SquareDegrees(pub f64);

/// Area in square meters.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct SquareMeters(pub f64);

impl Degrees {
    #[inline]
    pub fn to_meters(self) -> Meters {
        Meters(self.0 * DEGREE_TO_METER)
    }
}

impl Meters {
    #[inline]
    pub fn to_degrees(self) -> Degrees {
        Degrees(self.0 * METER_TO_DEGREE)
    }

    /// Larger of two lengths; NaN on either side yields the other.
    #[inline]
    pub fn max(self, other: Meters) -> Meters {
        Meters(self.0.max(other.0))
    }
}

impl SquareDegrees {
    #[inline]
    pub fn to_square_meters(self) -> SquareMeters {
        SquareMeters(self.0 * DEGREE_TO_METER_SQRD)
    }
}

impl SquareMeters {
    #[inline]
    pub fn to_square_degrees(self) -> SquareDegrees {
        SquareDegrees(self.0 / DEGREE_TO_METER_SQRD)
    }
}

impl fmt::Display for Meters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} m", self.0)
    }
}

impl fmt::Display for SquareMeters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} m²", self.0)
    }
}

impl fmt::Display for Degrees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}
