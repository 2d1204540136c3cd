//! Radar CSV records → GeoJSON FeatureCollection for visual inspection.

use serde_json::{json, Value};
use tracing::warn;

use crate::radar::RadarRecord;

/// Build a FeatureCollection; polygons stay polygons, circles and isochrones
/// become points carrying their `radius`. Rows whose coordinates do not parse
/// are left out.
pub fn feature_collection(records: &[RadarRecord]) -> Value {
    let features: Vec<Value> = records
        .iter()
        .enumerate()
        .filter_map(|(row, r)| match feature(r) {
            Some(f) => Some(f),
            None => {
                warn!(row, kind = r.kind.as_str(), "no previewable geometry");
                None
            }
        })
        .collect();
    json!({ "type": "FeatureCollection", "features": features })
}

fn feature(record: &RadarRecord) -> Option<Value> {
    let coordinates: Value = serde_json::from_str(&record.coordinates).ok()?;
    let geometry = if record.is_polygon() {
        json!({ "type": "Polygon", "coordinates": [coordinates] })
    } else {
        json!({ "type": "Point", "coordinates": coordinates })
    };
    Some(json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": {
            "type": record.kind,
            "radius": record.radius,
            "externalId": record.external_id,
            "tag": record.tag,
            "description": record.description,
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::radar::{CIRCLE, POLYGON};

    #[test]
    fn builds_features_per_kind() {
        let records = vec![
            RadarRecord {
                kind: POLYGON.to_string(),
                coordinates: "[[0,0],[1,0],[1,1],[0,0]]".to_string(),
                ..RadarRecord::default()
            },
            RadarRecord {
                kind: CIRCLE.to_string(),
                radius: Some(120.0),
                coordinates: "[2.5,3.5]".to_string(),
                external_id: Some("c_0".to_string()),
                ..RadarRecord::default()
            },
            RadarRecord {
                kind: POLYGON.to_string(),
                coordinates: "garbage".to_string(),
                ..RadarRecord::default()
            },
        ];
        let fc = feature_collection(&records);
        let features = fc["features"].as_array().unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0]["geometry"]["type"], "Polygon");
        assert_eq!(features[0]["geometry"]["coordinates"][0][2], json!([1, 1]));
        assert_eq!(features[1]["geometry"]["type"], "Point");
        assert_eq!(features[1]["properties"]["radius"], 120.0);
        assert_eq!(features[1]["properties"]["externalId"], "c_0");
    }
}
