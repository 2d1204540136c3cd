//! Record-level wiring around `polyreduce::Reducer`.

use anyhow::Result;
use polyreduce::{Reducer, Ring, Stats};
use tracing::warn;

use crate::radar::{apply_outcome, parse_ring, RadarRecord};

/// Outcome of reducing a batch of records.
pub struct Reduced {
    /// One record per input record, in input order.
    pub records: Vec<RadarRecord>,
    pub stats: Stats,
    /// Polygon rows whose coordinates were not a valid ring. Written through
    /// unchanged and left out of `stats`.
    pub malformed: u64,
}

/// Reduce every polygon record; other record types pass through untouched.
pub fn reduce_records(records: &[RadarRecord], reducer: &Reducer, parallel: bool) -> Result<Reduced> {
    let mut rings: Vec<Ring> = Vec::new();
    let mut slots: Vec<usize> = Vec::new();
    let mut malformed = 0;
    for (row, record) in records.iter().enumerate() {
        if !record.is_polygon() {
            continue;
        }
        match parse_ring(&record.coordinates) {
            Ok(ring) => {
                rings.push(ring);
                slots.push(row);
            }
            Err(err) => {
                malformed += 1;
                warn!(
                    row,
                    external_id = record.external_id.as_deref().unwrap_or(""),
                    "skipping malformed polygon: {err:#}"
                );
            }
        }
    }

    let (outcomes, stats) = if parallel {
        reducer.reduce_batch(&rings)
    } else {
        reducer.reduce_all(&rings)
    };

    let mut out = records.to_vec();
    for (&row, outcome) in slots.iter().zip(&outcomes) {
        out[row] = apply_outcome(&records[row], outcome)?;
    }
    Ok(Reduced {
        records: out,
        stats,
        malformed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::radar::{CIRCLE, POLYGON};
    use polyreduce::ring::special::{densified_square, zigzag_star};
    use polyreduce::units::Degrees;
    use polyreduce::{Point, ReduceCfg};

    fn record(kind: &str, coordinates: String, id: &str) -> RadarRecord {
        RadarRecord {
            kind: kind.to_string(),
            coordinates,
            external_id: Some(id.to_string()),
            enabled: Some("true".to_string()),
            ..RadarRecord::default()
        }
    }

    fn ring_json(ring: &Ring) -> String {
        serde_json::to_string(&ring.to_lon_lat()).unwrap()
    }

    #[test]
    fn mixed_records_keep_order_and_counts() {
        let small = densified_square(Point::new(0.0, 0.0), Degrees(0.01), 5);
        let dense = densified_square(Point::new(1.0, 1.0), Degrees(0.01), 400);
        let star = zigzag_star(Point::new(2.0, 2.0), Degrees(0.5), Degrees(1.0), 100);
        let records = vec![
            record(POLYGON, ring_json(&small), "a"),
            record(CIRCLE, "[5.0,5.0]".to_string(), "b"),
            record(POLYGON, ring_json(&dense), "c"),
            record(POLYGON, "[[0,0],[1,1]]".to_string(), "d"),
            record(POLYGON, ring_json(&star), "e"),
        ];
        let reducer = Reducer::new(ReduceCfg {
            max_vertex_count: 100,
            ..ReduceCfg::default()
        });
        for parallel in [false, true] {
            let out = reduce_records(&records, &reducer, parallel).unwrap();
            assert_eq!(out.records.len(), records.len());
            let ids: Vec<_> = out.records.iter().map(|r| r.external_id.clone()).collect();
            assert_eq!(ids, records.iter().map(|r| r.external_id.clone()).collect::<Vec<_>>());

            assert_eq!(out.records[0], records[0]);
            assert_eq!(out.records[1], records[1]);
            assert_eq!(parse_ring(&out.records[2].coordinates).unwrap().len(), 5);
            assert_eq!(out.records[3], records[3]);
            assert_eq!(out.records[4].kind, CIRCLE);
            assert!(out.records[4].radius.unwrap() >= 100.0);

            assert_eq!(out.malformed, 1);
            assert_eq!(out.stats.total_polygons, 3);
            assert_eq!(out.stats.pass_through, 1);
            assert_eq!(out.stats.reduced_at_level, [1, 0, 0]);
            assert_eq!(out.stats.converted_to_circle, 1);
            assert!(out.stats.is_conserved());
        }
    }
}
