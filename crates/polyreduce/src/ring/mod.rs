//! Closed lon/lat rings and the small amount of planar geometry they need.
//!
//! Purpose
//! - `Ring` is the value passed between pipeline stages. It is validated once
//!   on construction and never mutated; every stage returns a new ring.
//! - Coordinates are treated as planar (x = longitude, y = latitude). Areas
//!   come out in square degrees and are converted via `units` by the caller.
//!
//! Conventions
//! - `len()` counts coordinates including the closing point, matching the way
//!   the target system counts vertices.
//! - Winding order is not normalized; `area()` is the absolute shoelace value.

pub mod rand;
pub mod special;
mod types;

pub use types::{Aff2, Bounds2, Point, Ring};
