//! Decoding of the GeoJSON subset the resolver understands.
//!
//! Positions are `[longitude, latitude, ...]`; extra ordinates are ignored.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::geometry::{GeometryError, LatLng, Polygon, Ring};

type Position = Vec<f64>;

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum GeoJsonGeometry {
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeoJsonFeature {
    #[serde(default)]
    pub geometry: Option<Value>,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeoJsonFeatureCollection {
    pub features: Vec<GeoJsonFeature>,
}

fn to_ring(positions: Vec<Position>) -> Result<Ring, GeometryError> {
    let vertices = positions
        .into_iter()
        .map(|pos| match pos.as_slice() {
            [lng, lat, ..] => Ok(LatLng::new(*lat, *lng)),
            _ => Err(GeometryError::BadPosition(pos.len())),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ring::new(vertices)
}

fn to_polygon(rings: Vec<Vec<Position>>) -> Result<Polygon, GeometryError> {
    let mut rings = rings.into_iter();
    let exterior = match rings.next() {
        Some(ring) => to_ring(ring)?,
        None => return Err(GeometryError::TooFewVertices(0)),
    };
    let holes = rings.map(to_ring).collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon::new(exterior, holes))
}

/// Decode a bare Polygon / MultiPolygon geometry object.
pub(crate) fn polygons_from_geometry(geometry: &Value) -> Result<Vec<Polygon>, GeometryError> {
    match GeoJsonGeometry::deserialize(geometry)? {
        GeoJsonGeometry::Polygon { coordinates } => Ok(vec![to_polygon(coordinates)?]),
        GeoJsonGeometry::MultiPolygon { coordinates } => {
            coordinates.into_iter().map(to_polygon).collect()
        }
        GeoJsonGeometry::Unsupported => {
            Err(GeometryError::UnsupportedGeometry(geometry_type(geometry)))
        }
    }
}

/// Decode either a Feature wrapping a geometry, or a bare geometry.
pub(crate) fn polygons_from_feature_or_geometry(
    value: &Value,
) -> Result<Vec<Polygon>, GeometryError> {
    if value.get("type").and_then(Value::as_str) == Some("Feature") {
        return match value.get("geometry") {
            Some(geometry) if !geometry.is_null() => polygons_from_geometry(geometry),
            _ => Err(GeometryError::UnsupportedGeometry("null".into())),
        };
    }
    polygons_from_geometry(value)
}

pub(crate) fn geometry_type(value: &Value) -> String {
    value
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string()
}

/// Region label from a properties bag: `name`, falling back to `NAME`.
pub(crate) fn feature_name(properties: &Map<String, Value>) -> Option<String> {
    ["name", "NAME"]
        .iter()
        .filter_map(|key| properties.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|name| !name.is_empty())
        .map(str::to_string)
}
