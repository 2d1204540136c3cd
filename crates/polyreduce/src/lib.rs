//! Vertex-budget reduction for geofence polygons.
//!
//! Rings (closed lon/lat sequences) that exceed a target system's vertex limit
//! are simplified with a fixed tolerance ladder, scaled up when simplification
//! leaves them below a usable footprint, and degraded to a circle when no rung
//! of the ladder fits the budget.
//!
//! Layout
//! - `units`: fixed flat-Earth conversions between degrees and meters.
//! - `ring`: the `Ring` value type, bounds, affine maps, test shapes.
//! - `simplify`, `scale`, `circle`: the three geometric stages.
//! - `reduce`, `stats`: orchestration and outcome counters.
//!
//! The crate owns no file or wire format; callers parse and serialize records.

pub mod cfg;
pub mod circle;
pub mod error;
pub mod reduce;
pub mod ring;
pub mod scale;
pub mod simplify;
pub mod stats;
pub mod units;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cfg::{ReduceCfg, ToleranceLadder};
pub use circle::{to_circle, Circle};
pub use error::{Error, MalformedRing, Result};
pub use reduce::{OutcomeKind, Reducer, ReductionOutcome};
pub use ring::{Aff2, Bounds2, Point, Ring};
pub use scale::scale_to_minimum_area;
pub use simplify::{douglas_peucker, simplify, ToleranceLevel};
pub use stats::Stats;
