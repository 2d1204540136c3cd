//! Per-ring orchestration of the reduction stages.
//!
//! State machine for one ring:
//!
//! ```text
//! Start ─┬─ len <= max ──────────────────────────────► Unchanged
//!        └─ Simplify ─┬─ fits, area >= floor ────────► Simplified
//!                     ├─ fits, area <  floor ─ Scale ► SimplifiedAndScaled
//!                     └─ still too complex ─ Fallback ► Circle
//! ```
//!
//! Every ring increments `total_polygons` once; the rung that succeeded is
//! counted once, after the ladder has resolved.
//!
//! Degenerate rings: when the simplified ring has no area (or the ladder
//! collapses it below 4 points) the scale factor is undefined. Such rings take
//! the circle path, built from the original ring, and are also counted in
//! `Stats::degenerate`.

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::cfg::ReduceCfg;
use crate::circle::{to_circle, Circle};
use crate::error::Error;
use crate::ring::Ring;
use crate::scale::scale_to_minimum_area;
use crate::simplify::simplify;
use crate::stats::Stats;

/// Result of reducing one ring.
#[derive(Clone, Debug, PartialEq)]
pub enum ReductionOutcome {
    /// Already within the vertex budget; emit the input as is.
    Unchanged,
    Simplified(Ring),
    SimplifiedAndScaled(Ring),
    Circle(Circle),
}

/// Fieldless tag of `ReductionOutcome`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    Unchanged,
    Simplified,
    SimplifiedAndScaled,
    Circle,
}

impl ReductionOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Unchanged => OutcomeKind::Unchanged,
            Self::Simplified(_) => OutcomeKind::Simplified,
            Self::SimplifiedAndScaled(_) => OutcomeKind::SimplifiedAndScaled,
            Self::Circle(_) => OutcomeKind::Circle,
        }
    }

    /// Output ring, if the outcome carries one.
    pub fn ring(&self) -> Option<&Ring> {
        match self {
            Self::Simplified(r) | Self::SimplifiedAndScaled(r) => Some(r),
            _ => None,
        }
    }
}

/// Decision and counting layer over simplify, scale and circle.
#[derive(Clone, Debug, Default)]
pub struct Reducer {
    cfg: ReduceCfg,
}

impl Reducer {
    pub fn new(cfg: ReduceCfg) -> Self {
        Self { cfg }
    }

    /// Reduce one ring, recording its path in `stats`.
    pub fn reduce(&self, ring: &Ring, stats: &mut Stats) -> ReductionOutcome {
        stats.total_polygons += 1;
        let max = self.cfg.max_vertex_count;
        if ring.len() <= max {
            stats.pass_through += 1;
            return ReductionOutcome::Unchanged;
        }

        let (simplified, level) = match simplify(ring, max, &self.cfg.ladder) {
            Ok(found) => found,
            Err(Error::StillTooComplex { vertices, .. }) => {
                debug!(vertices, max, "no rung fits; converting to circle");
                return self.fallback(ring, stats);
            }
            Err(err) => {
                warn!(vertices = ring.len(), %err, "ring collapsed during simplification");
                stats.degenerate += 1;
                return self.fallback(ring, stats);
            }
        };

        if simplified.area_meters().0 >= self.cfg.minimum_area.0 {
            stats.record_reduced(level);
            return ReductionOutcome::Simplified(simplified);
        }
        match scale_to_minimum_area(&simplified, self.cfg.minimum_area) {
            Ok(scaled) => {
                stats.record_reduced(level);
                stats.scaled_polygons += 1;
                ReductionOutcome::SimplifiedAndScaled(scaled)
            }
            Err(err) => {
                warn!(
                    vertices = ring.len(),
                    level = level.label(),
                    %err,
                    "simplified ring has no area"
                );
                stats.degenerate += 1;
                self.fallback(ring, stats)
            }
        }
    }

    fn fallback(&self, ring: &Ring, stats: &mut Stats) -> ReductionOutcome {
        stats.converted_to_circle += 1;
        ReductionOutcome::Circle(to_circle(ring, self.cfg.default_circle_radius))
    }

    /// Reduce rings one after another.
    pub fn reduce_all(&self, rings: &[Ring]) -> (Vec<ReductionOutcome>, Stats) {
        let mut stats = Stats::default();
        let outcomes = rings.iter().map(|r| self.reduce(r, &mut stats)).collect();
        (outcomes, stats)
    }

    /// Reduce rings across the rayon pool.
    ///
    /// Each worker fills its own `Stats`; they are merged once at the end.
    /// Outcomes come back in input order.
    pub fn reduce_batch(&self, rings: &[Ring]) -> (Vec<ReductionOutcome>, Stats) {
        let (mut indexed, stats) = rings
            .par_iter()
            .enumerate()
            .fold(
                || (Vec::new(), Stats::default()),
                |(mut out, mut stats), (i, ring)| {
                    out.push((i, self.reduce(ring, &mut stats)));
                    (out, stats)
                },
            )
            .reduce(
                || (Vec::new(), Stats::default()),
                |(mut a, mut sa), (b, sb)| {
                    a.extend(b);
                    sa.merge(&sb);
                    (a, sa)
                },
            );
        indexed.sort_unstable_by_key(|(i, _)| *i);
        (indexed.into_iter().map(|(_, o)| o).collect(), stats)
    }
}
