//! Reduction parameters.
//!
//! Defaults are the target system's limits with some headroom: 10k vertices,
//! a 1500 m² usable footprint and a 100 m minimum circle. The tolerance ladder
//! is fixed and never derived from the input.

use crate::error::{Error, Result};
use crate::simplify::ToleranceLevel;
use crate::units::{Degrees, Meters, SquareMeters};

/// Simplification tolerance per ladder rung, in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToleranceLadder {
    pub low: Degrees,
    pub medium: Degrees,
    pub large: Degrees,
}

impl Default for ToleranceLadder {
    fn default() -> Self {
        Self {
            low: Meters(100.0).to_degrees(),
            medium: Meters(500.0).to_degrees(),
            large: Meters(1000.0).to_degrees(),
        }
    }
}

impl ToleranceLadder {
    #[inline]
    pub fn tolerance(&self, level: ToleranceLevel) -> Degrees {
        match level {
            ToleranceLevel::Low => self.low,
            ToleranceLevel::Medium => self.medium,
            ToleranceLevel::Large => self.large,
        }
    }

    /// Rungs in the order they are tried.
    pub fn rungs(&self) -> impl Iterator<Item = (ToleranceLevel, Degrees)> + '_ {
        ToleranceLevel::ALL
            .into_iter()
            .map(move |level| (level, self.tolerance(level)))
    }
}

/// Limits applied by the reducer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReduceCfg {
    /// Maximum coordinate count of an emitted ring (closing point included).
    pub max_vertex_count: usize,
    /// Smallest approximate area an emitted ring may have.
    pub minimum_area: SquareMeters,
    /// Floor for circle-fallback radii.
    pub default_circle_radius: Meters,
    pub ladder: ToleranceLadder,
}

impl Default for ReduceCfg {
    fn default() -> Self {
        Self {
            max_vertex_count: 10_000,
            minimum_area: SquareMeters(1500.0),
            default_circle_radius: Meters(100.0),
            ladder: ToleranceLadder::default(),
        }
    }
}

impl ReduceCfg {
    /// Reject budgets and ladders the pipeline cannot honor.
    pub fn validate(&self) -> Result<()> {
        // Four coordinates is the smallest closed ring.
        if self.max_vertex_count < 4 {
            return Err(Error::InvalidConfig(format!(
                "max_vertex_count must be at least 4, got {}",
                self.max_vertex_count
            )));
        }
        let area = self.minimum_area.0;
        if !area.is_finite() || area <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "minimum_area must be positive and finite, got {area}"
            )));
        }
        let radius = self.default_circle_radius.0;
        if !radius.is_finite() || radius <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "default_circle_radius must be positive and finite, got {radius}"
            )));
        }
        let l = &self.ladder;
        let increasing = l.low.0 > 0.0 && l.low.0 < l.medium.0 && l.medium.0 < l.large.0;
        if !increasing || !l.large.0.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "tolerance ladder must be positive and strictly increasing, got {} / {} / {}",
                l.low, l.medium, l.large
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::DEGREE_TO_METER;

    #[test]
    fn default_ladder_is_100_500_1000_meters() {
        let l = ToleranceLadder::default();
        assert!((l.low.0 * DEGREE_TO_METER - 100.0).abs() < 1e-9);
        assert!((l.medium.0 * DEGREE_TO_METER - 500.0).abs() < 1e-9);
        assert!((l.large.0 * DEGREE_TO_METER - 1000.0).abs() < 1e-9);
        let order: Vec<_> = l.rungs().map(|(lvl, _)| lvl).collect();
        assert_eq!(order, ToleranceLevel::ALL.to_vec());
    }

    #[test]
    fn default_cfg_validates() {
        assert!(ReduceCfg::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut cfg = ReduceCfg {
            max_vertex_count: 3,
            ..ReduceCfg::default()
        };
        assert!(matches!(cfg.validate(), Err(Error::InvalidConfig(_))));
        cfg.max_vertex_count = 10;
        cfg.minimum_area = SquareMeters(0.0);
        assert!(cfg.validate().is_err());
        cfg.minimum_area = SquareMeters(1500.0);
        cfg.default_circle_radius = Meters(f64::NAN);
        assert!(cfg.validate().is_err());
        cfg.default_circle_radius = Meters(100.0);
        cfg.ladder.medium = cfg.ladder.large;
        assert!(cfg.validate().is_err());
    }
}
