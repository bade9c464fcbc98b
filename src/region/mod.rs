pub mod dataset;
pub mod geometry;
mod geojson;

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

pub use dataset::{BoundaryDataset, DatasetError, RegionFeature};
pub use geometry::{centroid, BoundingBox, GeometryError, LatLng, Polygon, Ring};

/// Region callers substitute when a polygon cannot be classified.
pub const DEFAULT_REGION: &str = "United States";

/// A field boundary to classify.
///
/// Must be simple (non-self-intersecting); topology is not validated.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPolygon {
    polygons: Vec<Polygon>,
}

impl QueryPolygon {
    /// Single ring of (lat, lng) vertices. A repeated closing vertex is optional.
    pub fn new(vertices: Vec<LatLng>) -> Result<Self, GeometryError> {
        Ok(QueryPolygon {
            polygons: vec![Polygon::new(Ring::new(vertices)?, Vec::new())],
        })
    }

    /// From a GeoJSON Feature wrapping a Polygon or MultiPolygon, or from the
    /// bare geometry.
    pub fn from_geojson(value: &Value) -> Result<Self, GeometryError> {
        let polygons = geojson::polygons_from_feature_or_geometry(value)?;
        if polygons.is_empty() {
            return Err(GeometryError::TooFewVertices(0));
        }
        Ok(QueryPolygon { polygons })
    }

    pub fn from_geojson_str(raw: &str) -> Result<Self, GeometryError> {
        let value: Value = serde_json::from_str(raw)?;
        Self::from_geojson(&value)
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Area-weighted center of mass.
    pub fn centroid(&self) -> Option<LatLng> {
        centroid(&self.polygons)
    }
}

/// Classifies field polygons into named regions.
///
/// The result depends only on the polygon and the static dataset, so callers
/// should compute it once per polygon and persist it alongside the field.
#[derive(Debug, Clone)]
pub struct RegionResolver {
    dataset: Arc<BoundaryDataset>,
}

impl RegionResolver {
    pub fn new(dataset: Arc<BoundaryDataset>) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &BoundaryDataset {
        &self.dataset
    }

    /// First region, in dataset order, whose boundary contains `p`.
    ///
    /// Edges count as inside, so a point on a shared border goes to
    /// whichever feature comes first.
    pub fn resolve_point(&self, p: LatLng) -> Option<&str> {
        self.dataset
            .features()
            .iter()
            .find(|feature| feature.contains(p))
            .map(RegionFeature::name)
    }

    /// Region containing the polygon's centroid, or `None`.
    pub fn resolve(&self, polygon: &QueryPolygon) -> Option<&str> {
        let center = polygon.centroid()?;
        let region = self.resolve_point(center);
        if region.is_none() {
            debug!(lat = center.lat, lng = center.lng, "centroid not inside any region");
        }
        region
    }

    pub fn resolve_or_default(&self, polygon: &QueryPolygon) -> &str {
        self.resolve(polygon).unwrap_or(DEFAULT_REGION)
    }

    /// Resolve a raw GeoJSON Feature. Undecodable input resolves to `None`.
    pub fn resolve_geojson(&self, feature: &Value) -> Option<&str> {
        match QueryPolygon::from_geojson(feature) {
            Ok(polygon) => self.resolve(&polygon),
            Err(e) => {
                warn!(error = %e, "cannot decode field polygon");
                None
            }
        }
    }
}
