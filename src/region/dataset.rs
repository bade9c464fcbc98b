use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use super::geojson::{feature_name, geometry_type, polygons_from_geometry, GeoJsonFeatureCollection};
use super::geometry::{BoundingBox, LatLng, Polygon};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid GeoJSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Boundary dataset contains no usable region features")]
    Empty,
}

/// A named region boundary.
#[derive(Debug, Clone)]
pub struct RegionFeature {
    name: String,
    polygons: Vec<Polygon>,
    bbox: BoundingBox,
}

impl RegionFeature {
    /// `None` when `polygons` is empty.
    pub fn new(name: impl Into<String>, polygons: Vec<Polygon>) -> Option<Self> {
        let bbox = BoundingBox::of(&polygons)?;
        Some(RegionFeature {
            name: name.into(),
            polygons,
            bbox,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    pub fn contains(&self, p: LatLng) -> bool {
        self.bbox.contains(p) && self.polygons.iter().any(|polygon| polygon.contains(p))
    }
}

/// Read-only reference boundaries, in file order.
///
/// Loaded once at startup and shared; nothing mutates it afterwards.
#[derive(Debug, Clone)]
pub struct BoundaryDataset {
    features: Vec<RegionFeature>,
}

impl BoundaryDataset {
    /// Load a GeoJSON FeatureCollection from disk.
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let f = fs::File::open(path)?;
        let collection: GeoJsonFeatureCollection =
            serde_json::from_reader(std::io::BufReader::new(f))?;
        Self::from_collection(collection)
    }

    pub fn from_geojson_str(raw: &str) -> Result<Self, DatasetError> {
        let collection: GeoJsonFeatureCollection = serde_json::from_str(raw)?;
        Self::from_collection(collection)
    }

    pub fn from_features(features: Vec<RegionFeature>) -> Result<Self, DatasetError> {
        if features.is_empty() {
            return Err(DatasetError::Empty);
        }
        Ok(BoundaryDataset { features })
    }

    fn from_collection(collection: GeoJsonFeatureCollection) -> Result<Self, DatasetError> {
        let total = collection.features.len();
        let mut features = Vec::with_capacity(total);

        for (index, raw) in collection.features.into_iter().enumerate() {
            let Some(name) = raw.properties.as_ref().and_then(feature_name) else {
                debug!(index, "skipping boundary feature without a name");
                continue;
            };
            let Some(geometry) = raw.geometry.filter(|g| !g.is_null()) else {
                debug!(index, name = %name, "skipping boundary feature without geometry");
                continue;
            };

            match polygons_from_geometry(&geometry) {
                Ok(polygons) => {
                    if let Some(feature) = RegionFeature::new(name, polygons) {
                        features.push(feature);
                    }
                }
                Err(e) => {
                    debug!(
                        index,
                        name = %name,
                        kind = %geometry_type(&geometry),
                        error = %e,
                        "skipping boundary feature"
                    );
                }
            }
        }

        debug!(loaded = features.len(), total, "boundary dataset loaded");
        Self::from_features(features)
    }

    pub fn features(&self) -> &[RegionFeature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
