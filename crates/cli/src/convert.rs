//! GeoJSON → Radar CSV records.
//!
//! Supported geometries: Point, MultiPoint, Polygon, MultiPolygon (inside
//! Features and FeatureCollections). Polygons keep their exterior ring only;
//! multi-geometries become one record per member. LineStrings and
//! GeometryCollections have no geofence counterpart and are skipped.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::warn;

use crate::radar::{RadarRecord, CIRCLE, ISOCHRONE, POLYGON};

/// Radius for point geofences without a radius property (meters).
pub const DEFAULT_POINT_RADIUS: i64 = 10;
/// Travel time for isochrones without a value property (minutes).
pub const DEFAULT_ISOCHRONE_VALUE: i64 = 15;

/// Which GeoJSON properties feed which Radar fields.
#[derive(Clone, Debug, Default)]
pub struct ConvertOptions {
    pub use_file_name_as_tag: bool,
    pub include_properties_as_metadata: bool,
    pub description_key: Option<String>,
    pub tag_key: Option<String>,
    pub external_id_key: Option<String>,
    /// When set, points become isochrones instead of circles.
    pub isochrone_key: Option<String>,
    pub radius_key: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConvertStats {
    pub circles: u64,
    pub isochrones: u64,
    pub polygons: u64,
    pub skipped: u64,
}

/// Stateful converter for one input file.
///
/// External ids get a running `_<n>` suffix per base id, so repeated ids
/// (and members of multi-geometries) stay unique.
pub struct Converter {
    file_name: String,
    opts: ConvertOptions,
    index_counter: HashMap<String, u64>,
    records: Vec<RadarRecord>,
    stats: ConvertStats,
}

impl Converter {
    pub fn new(file_name: impl Into<String>, opts: ConvertOptions) -> Self {
        Self {
            file_name: file_name.into(),
            opts,
            index_counter: HashMap::new(),
            records: Vec::new(),
            stats: ConvertStats::default(),
        }
    }

    pub fn finish(self) -> (Vec<RadarRecord>, ConvertStats) {
        (self.records, self.stats)
    }

    /// Walk a GeoJSON document and collect records.
    pub fn process(&mut self, geojson: &Value) {
        self.process_node(geojson, &Map::new());
    }

    fn process_node(&mut self, node: &Value, properties: &Map<String, Value>) {
        let kind = node.get("type").and_then(Value::as_str).unwrap_or("");
        match kind {
            "FeatureCollection" => {
                let features = node.get("features").and_then(Value::as_array);
                for feature in features.into_iter().flatten() {
                    self.process_node(feature, &Map::new());
                }
            }
            "Feature" => {
                let props = node
                    .get("properties")
                    .and_then(Value::as_object)
                    .cloned()
                    .unwrap_or_default();
                match node.get("geometry") {
                    Some(g) if !g.is_null() => self.process_node(g, &props),
                    _ => self.skip("Feature without geometry"),
                }
            }
            "Point" => {
                if let Some(c) = node.get("coordinates") {
                    self.write_point(c, properties);
                }
            }
            "MultiPoint" => {
                for c in members(node) {
                    self.write_point(c, properties);
                }
            }
            "Polygon" => {
                if let Some(exterior) = node
                    .get("coordinates")
                    .and_then(Value::as_array)
                    .and_then(|rings| rings.first())
                {
                    self.write_polygon(exterior, properties);
                }
            }
            "MultiPolygon" => {
                for polygon in members(node) {
                    if let Some(exterior) = polygon.as_array().and_then(|rings| rings.first()) {
                        self.write_polygon(exterior, properties);
                    }
                }
            }
            other => self.skip(other),
        }
    }

    fn skip(&mut self, what: &str) {
        self.stats.skipped += 1;
        warn!(kind = what, "unsupported GeoJSON node skipped");
    }

    fn write_point(&mut self, coordinates: &Value, properties: &Map<String, Value>) {
        let mut row = self.setup_row(properties);
        if let Some(key) = self.opts.isochrone_key.as_deref() {
            self.stats.isochrones += 1;
            row.kind = ISOCHRONE.to_string();
            row.radius = Some(int_property(properties, Some(key)).unwrap_or(DEFAULT_ISOCHRONE_VALUE) as f64);
        } else {
            self.stats.circles += 1;
            row.kind = CIRCLE.to_string();
            let radius = int_property(properties, self.opts.radius_key.as_deref());
            row.radius = Some(radius.unwrap_or(DEFAULT_POINT_RADIUS) as f64);
        }
        row.coordinates = coordinates.to_string();
        self.records.push(row);
    }

    fn write_polygon(&mut self, exterior: &Value, properties: &Map<String, Value>) {
        let mut row = self.setup_row(properties);
        self.stats.polygons += 1;
        row.kind = POLYGON.to_string();
        row.radius = Some(0.0);
        row.coordinates = exterior.to_string();
        self.records.push(row);
    }

    fn setup_row(&mut self, properties: &Map<String, Value>) -> RadarRecord {
        let description = str_property(properties, self.opts.description_key.as_deref());

        let mut tag = self.file_name.clone();
        if !self.opts.use_file_name_as_tag {
            if let Some(t) = str_property(properties, self.opts.tag_key.as_deref()) {
                tag = t;
            }
        }

        let base = str_property(properties, self.opts.external_id_key.as_deref())
            .unwrap_or_else(|| self.file_name.clone());
        let n = self.index_counter.entry(base.clone()).or_insert(0);
        let external_id = format!("{base}_{n}");
        *n += 1;

        let metadata = self
            .opts
            .include_properties_as_metadata
            .then(|| Value::Object(properties.clone()).to_string());

        RadarRecord {
            description,
            tag: Some(tag),
            external_id: Some(external_id),
            enabled: Some("true".to_string()),
            metadata,
            ..RadarRecord::default()
        }
    }
}

fn members(node: &Value) -> impl Iterator<Item = &Value> {
    node.get("coordinates")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

/// Non-empty string property under `key`.
fn str_property(properties: &Map<String, Value>, key: Option<&str>) -> Option<String> {
    let v = properties.get(key?)?.as_str()?;
    (!v.is_empty()).then(|| v.to_string())
}

/// Non-zero integer property under `key`.
fn int_property(properties: &Map<String, Value>, key: Option<&str>) -> Option<i64> {
    properties.get(key?)?.as_i64().filter(|v| *v != 0)
}
