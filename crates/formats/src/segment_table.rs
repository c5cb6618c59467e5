use foundation::bounds::Aabb2;
use foundation::math::{Vec2, lon_lat_to_web_mercator};
use serde_json::{Map, Value};

use crate::geometry::Geometry;

/// One line element of the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentRow {
    /// Stable identifier: the feature `id` when present, else the row position.
    pub id: String,
    /// Descriptive columns, opaque to the selection core.
    pub properties: Map<String, Value>,
    /// `None` when the row has no located geometry.
    pub geometry: Option<Geometry>,
}

impl SegmentRow {
    pub fn new(
        id: impl Into<String>,
        properties: Map<String, Value>,
        geometry: Option<Geometry>,
    ) -> Self {
        Self {
            id: id.into(),
            properties,
            geometry,
        }
    }

    pub fn property(&self, column: &str) -> Option<&Value> {
        self.properties.get(column)
    }

    /// Display text of a column; strings are unquoted, null and missing are `None`.
    pub fn property_text(&self, column: &str) -> Option<String> {
        value_text(self.properties.get(column)?)
    }
}

/// Tabular segment dataset: one row per segment, row order is the display order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentTable {
    rows: Vec<SegmentRow>,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Source coordinates are WGS84 lon/lat and must be projected to EPSG:3857.
    pub project_lon_lat: bool,
}

#[derive(Debug)]
pub enum SegmentTableError {
    Json(serde_json::Error),
    NotAFeatureCollection,
    InvalidFeature { index: usize, reason: String },
}

impl std::fmt::Display for SegmentTableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SegmentTableError::Json(e) => write!(f, "JSON parse error: {e}"),
            SegmentTableError::NotAFeatureCollection => {
                write!(f, "expected GeoJSON FeatureCollection")
            }
            SegmentTableError::InvalidFeature { index, reason } => {
                write!(f, "invalid feature at index {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for SegmentTableError {}

impl SegmentTable {
    pub fn new(rows: Vec<SegmentRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[SegmentRow] {
        &self.rows
    }

    pub fn row(&self, index: u32) -> Option<&SegmentRow> {
        self.rows.get(index as usize)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Descriptive column names in first-seen order across rows.
    pub fn columns(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for row in &self.rows {
            for key in row.properties.keys() {
                if !out.iter().any(|c| c == key) {
                    out.push(key.clone());
                }
            }
        }
        out
    }

    /// Number of rows without located geometry.
    pub fn unlocated_count(&self) -> usize {
        self.rows.iter().filter(|r| r.geometry.is_none()).count()
    }

    pub fn extent(&self) -> Option<Aabb2> {
        self.rows
            .iter()
            .filter_map(|r| r.geometry.as_ref().and_then(Geometry::extent))
            .reduce(|a, b| a.union(&b))
    }

    pub fn from_geojson_str(
        payload: &str,
        options: LoadOptions,
    ) -> Result<Self, SegmentTableError> {
        let value: Value = serde_json::from_str(payload).map_err(SegmentTableError::Json)?;
        Self::from_geojson_value(&value, options)
    }

    pub fn from_geojson_value(
        value: &Value,
        options: LoadOptions,
    ) -> Result<Self, SegmentTableError> {
        let obj = value
            .as_object()
            .ok_or(SegmentTableError::NotAFeatureCollection)?;
        let ty = obj
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or(SegmentTableError::NotAFeatureCollection)?;
        if ty != "FeatureCollection" {
            return Err(SegmentTableError::NotAFeatureCollection);
        }

        let features_val = obj
            .get("features")
            .and_then(|v| v.as_array())
            .ok_or(SegmentTableError::NotAFeatureCollection)?;

        let mut rows = Vec::with_capacity(features_val.len());
        for (index, feat_val) in features_val.iter().enumerate() {
            let feat_obj = feat_val
                .as_object()
                .ok_or(SegmentTableError::InvalidFeature {
                    index,
                    reason: "feature must be an object".to_string(),
                })?;

            let feat_type = feat_obj.get("type").and_then(|v| v.as_str()).ok_or(
                SegmentTableError::InvalidFeature {
                    index,
                    reason: "feature missing type".to_string(),
                },
            )?;
            if feat_type != "Feature" {
                return Err(SegmentTableError::InvalidFeature {
                    index,
                    reason: format!("unexpected feature type: {feat_type}"),
                });
            }

            let id = match feat_obj.get("id") {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                _ => index.to_string(),
            };

            let properties = feat_obj
                .get("properties")
                .and_then(|v| v.as_object())
                .cloned()
                .unwrap_or_default();

            let geometry = match feat_obj.get("geometry") {
                None | Some(Value::Null) => None,
                Some(g) => parse_geometry(g, options)
                    .map_err(|reason| SegmentTableError::InvalidFeature { index, reason })?,
            };

            rows.push(SegmentRow {
                id,
                properties,
                geometry,
            });
        }

        Ok(Self { rows })
    }
}

pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Parses a GeoJSON geometry object. Empty coordinate arrays mean "not
/// located" and yield `Ok(None)`.
fn parse_geometry(value: &Value, options: LoadOptions) -> Result<Option<Geometry>, String> {
    let obj = value
        .as_object()
        .ok_or("geometry must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("geometry missing type".to_string())?;

    let coords = obj
        .get("coordinates")
        .ok_or("geometry missing coordinates".to_string())?;
    if coords.as_array().is_some_and(|a| a.is_empty()) {
        return Ok(None);
    }

    let geometry = match ty {
        "Point" => Geometry::Point(parse_point(coords, options)?),
        "MultiPoint" => Geometry::MultiPoint(parse_points(coords, options)?),
        "LineString" => Geometry::LineString(parse_points(coords, options)?),
        "MultiLineString" => Geometry::MultiLineString(parse_lines(coords, options)?),
        "Polygon" => Geometry::Polygon(parse_lines(coords, options)?),
        "MultiPolygon" => Geometry::MultiPolygon(parse_multi_polygon(coords, options)?),
        other => return Err(format!("unsupported geometry type: {other}")),
    };
    Ok(Some(geometry))
}

fn parse_point(coords: &Value, options: LoadOptions) -> Result<Vec2, String> {
    let arr = coords
        .as_array()
        .ok_or("Point coordinates must be an array".to_string())?;
    if arr.len() < 2 {
        return Err("Point coordinates must have [x, y]".to_string());
    }
    let x = arr[0]
        .as_f64()
        .ok_or("Point x must be a number".to_string())?;
    let y = arr[1]
        .as_f64()
        .ok_or("Point y must be a number".to_string())?;
    if options.project_lon_lat {
        Ok(lon_lat_to_web_mercator(x, y))
    } else {
        Ok(Vec2::new(x, y))
    }
}

fn parse_points(coords: &Value, options: LoadOptions) -> Result<Vec<Vec2>, String> {
    let arr = coords
        .as_array()
        .ok_or("coordinates must be an array".to_string())?;
    let mut out = Vec::with_capacity(arr.len());
    for item in arr {
        out.push(parse_point(item, options)?);
    }
    Ok(out)
}

fn parse_lines(coords: &Value, options: LoadOptions) -> Result<Vec<Vec<Vec2>>, String> {
    let arr = coords
        .as_array()
        .ok_or("coordinates must be an array of lines".to_string())?;
    let mut out = Vec::with_capacity(arr.len());
    for line in arr {
        out.push(parse_points(line, options)?);
    }
    Ok(out)
}

fn parse_multi_polygon(
    coords: &Value,
    options: LoadOptions,
) -> Result<Vec<Vec<Vec<Vec2>>>, String> {
    let polys = coords
        .as_array()
        .ok_or("MultiPolygon coordinates must be an array of polygons".to_string())?;
    let mut out = Vec::with_capacity(polys.len());
    for poly in polys {
        out.push(parse_lines(poly, options)?);
    }
    Ok(out)
}
