//! Random star-shaped rings (radial jitter + replay tokens).
//!
//! Model
//! - Start from `n` equally spaced angles around `center`, add bounded angular
//!   jitter (angles stay sorted, so the ring never self-intersects) and
//!   relative radial noise, then close the ring.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG,
//!   so any draw of a batch can be regenerated on its own.

use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::types::{Point, Ring};
use crate::units::Degrees;

/// Radial sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct RingCfg {
    /// Distinct vertices; the closing point is added on top. Raised to 3.
    pub vertex_count: usize,
    pub center: Point,
    pub base_radius: Degrees,
    /// Radii are `base_radius * (1 + u)` with `u ∈ [-radial_jitter, radial_jitter]`.
    pub radial_jitter: f64,
    /// Angular jitter as a fraction of the spacing 2π/n. Clamped to [0, 0.49].
    pub angle_jitter_frac: f64,
}

impl Default for RingCfg {
    fn default() -> Self {
        Self {
            vertex_count: 64,
            center: Point::new(-73.98, 40.75),
            base_radius: Degrees(0.01),
            radial_jitter: 0.2,
            angle_jitter_frac: 0.3,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64 finalizer.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Draw one closed ring.
pub fn draw_ring_radial(cfg: RingCfg, tok: ReplayToken) -> Ring {
    let mut rng = tok.to_std_rng();
    let n = cfg.vertex_count.max(3);
    let aj = cfg.angle_jitter_frac.clamp(0.0, 0.49);
    let rj = cfg.radial_jitter.clamp(0.0, 0.95);
    let r0 = cfg.base_radius.0.abs().max(1e-9);
    let delta = TAU / n as f64;
    let phase = rng.gen::<f64>() * TAU;
    let mut points: Vec<Point> = (0..n)
        .map(|k| {
            let th = phase + k as f64 * delta + (rng.gen::<f64>() * 2.0 - 1.0) * aj * delta;
            let r = r0 * (1.0 + (rng.gen::<f64>() * 2.0 - 1.0) * rj);
            cfg.center + Point::new(th.cos(), th.sin()) * r
        })
        .collect();
    points.push(points[0]);
    Ring::from_closed_unchecked(points)
}

/// `count` consecutive draws starting at `tok.index`.
pub fn draw_batch(cfg: RingCfg, tok: ReplayToken, count: usize) -> Vec<Ring> {
    (0..count as u64)
        .map(|i| {
            draw_ring_radial(
                cfg,
                ReplayToken {
                    seed: tok.seed,
                    index: tok.index.wrapping_add(i),
                },
            )
        })
        .collect()
}
