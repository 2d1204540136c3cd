//! Outcome counters.
//!
//! `Stats` is an explicit value: the reducer mutates the one it is handed,
//! parallel workers each fill their own, and `merge` folds them together.

use std::fmt;

use crate::simplify::ToleranceLevel;

/// Per-run outcome counts.
///
/// Invariants (see `is_conserved`):
/// - every ring lands in exactly one of `pass_through`, `reduced_at_level[_]`
///   or `converted_to_circle`;
/// - `scaled_polygons` is a subset of the reduced rings;
/// - `degenerate` is a subset of the circle conversions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub total_polygons: u64,
    pub pass_through: u64,
    pub scaled_polygons: u64,
    pub converted_to_circle: u64,
    /// Rings whose simplified form had no area and went to the circle path.
    pub degenerate: u64,
    /// Indexed by `ToleranceLevel::index`.
    pub reduced_at_level: [u64; 3],
}

impl Stats {
    #[inline]
    pub fn record_reduced(&mut self, level: ToleranceLevel) {
        self.reduced_at_level[level.index()] += 1;
    }

    #[inline]
    pub fn reduced(&self, level: ToleranceLevel) -> u64 {
        self.reduced_at_level[level.index()]
    }

    pub fn reduced_total(&self) -> u64 {
        self.reduced_at_level.iter().sum()
    }

    /// Add another accumulator into this one.
    pub fn merge(&mut self, other: &Stats) {
        self.total_polygons += other.total_polygons;
        self.pass_through += other.pass_through;
        self.scaled_polygons += other.scaled_polygons;
        self.converted_to_circle += other.converted_to_circle;
        self.degenerate += other.degenerate;
        for (a, b) in self.reduced_at_level.iter_mut().zip(other.reduced_at_level) {
            *a += b;
        }
    }

    pub fn is_conserved(&self) -> bool {
        self.total_polygons == self.pass_through + self.reduced_total() + self.converted_to_circle
            && self.scaled_polygons <= self.reduced_total()
            && self.degenerate <= self.converted_to_circle
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Stats->")?;
        writeln!(f, "\tTotal Polygons: {}", self.total_polygons)?;
        writeln!(f, "\tScaled Polygons: {}", self.scaled_polygons)?;
        writeln!(f, "\tConverted Polygons: {}", self.converted_to_circle)?;
        writeln!(f, "\tLow Reduction Polygons: {}", self.reduced(ToleranceLevel::Low))?;
        writeln!(f, "\tMedium Reduction Polygons: {}", self.reduced(ToleranceLevel::Medium))?;
        writeln!(f, "\tLarge Reduction Polygons: {}", self.reduced(ToleranceLevel::Large))?;
        writeln!(f, "\tUnchanged Polygons: {}", self.pass_through)?;
        write!(f, "\tDegenerate Polygons: {}", self.degenerate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_adds_fieldwise() {
        let mut a = Stats {
            total_polygons: 3,
            pass_through: 1,
            scaled_polygons: 1,
            converted_to_circle: 1,
            degenerate: 0,
            reduced_at_level: [1, 0, 0],
        };
        let mut b = Stats::default();
        b.total_polygons = 2;
        b.record_reduced(ToleranceLevel::Large);
        b.converted_to_circle = 1;
        b.degenerate = 1;
        a.merge(&b);
        assert_eq!(a.total_polygons, 5);
        assert_eq!(a.reduced_at_level, [1, 0, 1]);
        assert_eq!(a.degenerate, 1);
        assert!(a.is_conserved());
    }

    #[test]
    fn conservation_detects_missing_ring() {
        let s = Stats {
            total_polygons: 2,
            pass_through: 1,
            ..Stats::default()
        };
        assert!(!s.is_conserved());
    }

    #[test]
    fn report_lists_every_level() {
        let mut s = Stats::default();
        s.record_reduced(ToleranceLevel::Medium);
        let text = s.to_string();
        assert!(text.starts_with("Stats->"));
        assert!(text.contains("\tMedium Reduction Polygons: 1"));
        assert!(text.contains("\tLarge Reduction Polygons: 0"));
    }
}
