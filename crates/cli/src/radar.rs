//! Radar geofence CSV records.
//!
//! Header (required by the Radar import): `description, tag, externalId,
//! type, radius, coordinates, enabled, metadata`. Only `type`, `radius` and
//! `coordinates` are ever interpreted; every other field is carried through
//! as an opaque string.

use std::fs::File;
use std::path::Path;

use anyhow::{bail, Context, Result};
use polars::prelude::*;
use polyreduce::{ReductionOutcome, Ring};

pub const RADAR_HEADERS: [&str; 8] = [
    "description",
    "tag",
    "externalId",
    "type",
    "radius",
    "coordinates",
    "enabled",
    "metadata",
];

pub const POLYGON: &str = "polygon";
pub const CIRCLE: &str = "circle";
pub const ISOCHRONE: &str = "isochrone";

/// One geofence row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RadarRecord {
    pub description: Option<String>,
    pub tag: Option<String>,
    pub external_id: Option<String>,
    /// Geofence type: `polygon`, `circle` or `isochrone`.
    pub kind: String,
    pub radius: Option<f64>,
    /// JSON: `[[lon, lat], ...]` for polygons, `[lon, lat]` otherwise.
    pub coordinates: String,
    pub enabled: Option<String>,
    pub metadata: Option<String>,
}

impl RadarRecord {
    pub fn is_polygon(&self) -> bool {
        self.kind == POLYGON
    }
}

/// Read all records; every column is loaded as a string.
pub fn read_records(path: &Path) -> Result<Vec<RadarRecord>> {
    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .finish()
        .with_context(|| format!("opening {}", path.display()))?
        .collect()
        .with_context(|| format!("reading {}", path.display()))?;

    for required in ["type", "coordinates"] {
        if df.column(required).is_err() {
            bail!("{} has no `{required}` column", path.display());
        }
    }
    let description = string_column(&df, "description")?;
    let tag = string_column(&df, "tag")?;
    let external_id = string_column(&df, "externalId")?;
    let kind = string_column(&df, "type")?;
    let radius = string_column(&df, "radius")?;
    let coordinates = string_column(&df, "coordinates")?;
    let enabled = string_column(&df, "enabled")?;
    let metadata = string_column(&df, "metadata")?;

    let mut records = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        records.push(RadarRecord {
            description: description[i].clone(),
            tag: tag[i].clone(),
            external_id: external_id[i].clone(),
            kind: kind[i].clone().unwrap_or_default(),
            radius: radius[i].as_deref().and_then(|r| r.trim().parse().ok()),
            coordinates: coordinates[i].clone().unwrap_or_default(),
            enabled: enabled[i].clone(),
            metadata: metadata[i].clone(),
        });
    }
    Ok(records)
}

/// Column as owned strings; a missing optional column reads as all-null.
fn string_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    match df.column(name) {
        Ok(col) => Ok(col
            .str()
            .with_context(|| format!("column `{name}` is not text"))?
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect()),
        Err(_) => Ok(vec![None; df.height()]),
    }
}

/// Write records with the Radar header, quoting every non-numeric field.
pub fn write_records(path: &Path, records: &[RadarRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    let col = |f: fn(&RadarRecord) -> Option<String>| -> Vec<Option<String>> {
        records.iter().map(f).collect()
    };
    let mut df = df![
        RADAR_HEADERS[0] => col(|r| r.description.clone()),
        RADAR_HEADERS[1] => col(|r| r.tag.clone()),
        RADAR_HEADERS[2] => col(|r| r.external_id.clone()),
        RADAR_HEADERS[3] => col(|r| Some(r.kind.clone())),
        RADAR_HEADERS[4] => records.iter().map(|r| r.radius).collect::<Vec<Option<f64>>>(),
        RADAR_HEADERS[5] => col(|r| Some(r.coordinates.clone())),
        RADAR_HEADERS[6] => col(|r| r.enabled.clone()),
        RADAR_HEADERS[7] => col(|r| r.metadata.clone()),
    ]?;

    let mut file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_quote_style(QuoteStyle::NonNumeric)
        .finish(&mut df)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Parse a polygon record's coordinates into a validated ring.
pub fn parse_ring(coordinates: &str) -> Result<Ring> {
    let pairs: Vec<[f64; 2]> =
        serde_json::from_str(coordinates).context("coordinates are not a [[lon, lat], ...] array")?;
    Ok(Ring::from_lon_lat(&pairs)?)
}

/// Output record for `record` given its reduction outcome.
///
/// Passthrough fields are copied unchanged; circles overwrite `type`,
/// `coordinates` (center point) and `radius` (meters).
pub fn apply_outcome(record: &RadarRecord, outcome: &ReductionOutcome) -> Result<RadarRecord> {
    let mut out = record.clone();
    match outcome {
        ReductionOutcome::Unchanged => {}
        ReductionOutcome::Simplified(ring) | ReductionOutcome::SimplifiedAndScaled(ring) => {
            out.kind = POLYGON.to_string();
            out.coordinates = serde_json::to_string(&ring.to_lon_lat())?;
        }
        ReductionOutcome::Circle(circle) => {
            out.kind = CIRCLE.to_string();
            out.coordinates = serde_json::to_string(&[circle.center.x, circle.center.y])?;
            out.radius = Some(circle.radius.0);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyreduce::ring::special::zigzag_star;
    use polyreduce::units::{Degrees, Meters};
    use polyreduce::{Circle, Point};
    use tempfile::tempdir;

    fn polygon_record(coords: &str) -> RadarRecord {
        RadarRecord {
            description: Some("Block 12, \"north\" side".to_string()),
            tag: Some("parcels".to_string()),
            external_id: Some("parcels_0".to_string()),
            kind: POLYGON.to_string(),
            radius: Some(0.0),
            coordinates: coords.to_string(),
            enabled: Some("true".to_string()),
            metadata: Some(r#"{"zone":"R1","lots":3}"#.to_string()),
        }
    }

    #[test]
    fn write_then_read_keeps_passthrough_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/out.csv");
        let records = vec![
            polygon_record("[[0.0,0.0],[1.0,0.0],[1.0,1.0],[0.0,0.0]]"),
            RadarRecord {
                kind: CIRCLE.to_string(),
                radius: Some(125.5),
                coordinates: "[2.0,3.0]".to_string(),
                ..RadarRecord::default()
            },
        ];
        write_records(&path, &records).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let header = text.lines().next().unwrap().replace('"', "");
        assert_eq!(header, RADAR_HEADERS.join(","));
        let back = read_records(&path).unwrap();
        assert_eq!(back, records);
    }

    #[test]
    fn read_requires_type_and_coordinates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "description,tag\nfoo,bar\n").unwrap();
        let err = read_records(&path).unwrap_err();
        assert!(err.to_string().contains("`type`"));
    }

    #[test]
    fn parse_ring_validates() {
        assert!(parse_ring("[[0,0],[1,0],[1,1],[0,0]]").is_ok());
        assert!(parse_ring("[[0,0],[1,0],[1,1],[0,1]]").is_err());
        assert!(parse_ring("not json").is_err());
    }

    #[test]
    fn coordinates_reparse_to_identical_bits() {
        let points = [
            [0.9076120467488712, 1.8585786437626903],
            [1.1, 1.8585786437626906],
            [1.0000000000000002, 2.0000000000000004],
            [0.9076120467488712, 1.8585786437626903],
        ];
        let ring = Ring::from_lon_lat(&points).unwrap();
        let text = serde_json::to_string(&ring.to_lon_lat()).unwrap();
        let back = parse_ring(&text).unwrap();
        for (p, q) in ring.points().iter().zip(back.points()) {
            assert_eq!(p.x.to_bits(), q.x.to_bits());
            assert_eq!(p.y.to_bits(), q.y.to_bits());
        }
    }

    #[test]
    fn circle_outcome_rewrites_geometry_fields_only() {
        let ring = zigzag_star(Point::new(1.0, 2.0), Degrees(0.1), Degrees(0.2), 8);
        let rec = polygon_record(&serde_json::to_string(&ring.to_lon_lat()).unwrap());
        let out = apply_outcome(
            &rec,
            &ReductionOutcome::Circle(Circle {
                center: Point::new(1.5, 2.5),
                radius: Meters(250.0),
            }),
        )
        .unwrap();
        assert_eq!(out.kind, CIRCLE);
        assert_eq!(out.coordinates, "[1.5,2.5]");
        assert_eq!(out.radius, Some(250.0));
        assert_eq!(out.description, rec.description);
        assert_eq!(out.metadata, rec.metadata);
        assert_eq!(out.external_id, rec.external_id);

        let same = apply_outcome(&rec, &ReductionOutcome::Unchanged).unwrap();
        assert_eq!(same, rec);
        let simplified = apply_outcome(&rec, &ReductionOutcome::Simplified(ring.clone())).unwrap();
        assert_eq!(parse_ring(&simplified.coordinates).unwrap(), ring);
    }
}
