use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tolerance for "point lies on an edge", in degrees.
const EDGE_EPSILON: f64 = 1e-12;

/// Twice-area below which a polygon is treated as degenerate.
const DEGENERATE_AREA: f64 = 1e-20;

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("Ring needs at least 3 distinct vertices, got {0}")]
    TooFewVertices(usize),
    #[error("Coordinate is not finite: ({lat}, {lng})")]
    NonFinite { lat: f64, lng: f64 },
    #[error("Position must have at least 2 ordinates, got {0}")]
    BadPosition(usize),
    #[error("Unsupported geometry type: {0}")]
    UnsupportedGeometry(String),
    #[error("Invalid GeoJSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A (latitude, longitude) pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        LatLng { lat, lng }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Containment {
    Inside,
    Boundary,
    Outside,
}

/// A closed ring of vertices.
///
/// Stored open: a trailing vertex equal to the first is dropped on
/// construction and every algorithm here closes the ring implicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    vertices: Vec<LatLng>,
}

impl Ring {
    pub fn new(mut vertices: Vec<LatLng>) -> Result<Self, GeometryError> {
        if let Some(bad) = vertices.iter().find(|v| !v.lat.is_finite() || !v.lng.is_finite()) {
            return Err(GeometryError::NonFinite {
                lat: bad.lat,
                lng: bad.lng,
            });
        }

        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }

        if vertices.len() < 3 {
            return Err(GeometryError::TooFewVertices(vertices.len()));
        }

        Ok(Ring { vertices })
    }

    pub fn vertices(&self) -> &[LatLng] {
        &self.vertices
    }

    fn edges(&self) -> impl Iterator<Item = (LatLng, LatLng)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Twice the signed area and the first moments (x = lng, y = lat),
    /// measured relative to `origin` to keep the products small.
    fn moments(&self, origin: LatLng) -> (f64, f64, f64) {
        let mut twice_area = 0.0;
        let mut cx = 0.0;
        let mut cy = 0.0;

        for (a, b) in self.edges() {
            let (ax, ay) = (a.lng - origin.lng, a.lat - origin.lat);
            let (bx, by) = (b.lng - origin.lng, b.lat - origin.lat);
            let cross = ax * by - bx * ay;
            twice_area += cross;
            cx += (ax + bx) * cross;
            cy += (ay + by) * cross;
        }

        (twice_area, cx, cy)
    }

    fn classify(&self, p: LatLng) -> Containment {
        let mut inside = false;

        for (a, b) in self.edges() {
            if on_segment(p, a, b) {
                return Containment::Boundary;
            }

            // Even-odd rule, ray cast towards +lng.
            if (a.lat > p.lat) != (b.lat > p.lat) {
                let crossing = (b.lng - a.lng) * (p.lat - a.lat) / (b.lat - a.lat) + a.lng;
                if p.lng < crossing {
                    inside = !inside;
                }
            }
        }

        if inside {
            Containment::Inside
        } else {
            Containment::Outside
        }
    }
}

fn on_segment(p: LatLng, a: LatLng, b: LatLng) -> bool {
    let cross = (b.lng - a.lng) * (p.lat - a.lat) - (b.lat - a.lat) * (p.lng - a.lng);
    let len = (b.lng - a.lng).hypot(b.lat - a.lat);
    if cross.abs() > EDGE_EPSILON * len.max(1.0) {
        return false;
    }

    p.lng >= a.lng.min(b.lng) - EDGE_EPSILON
        && p.lng <= a.lng.max(b.lng) + EDGE_EPSILON
        && p.lat >= a.lat.min(b.lat) - EDGE_EPSILON
        && p.lat <= a.lat.max(b.lat) + EDGE_EPSILON
}

/// An exterior ring with optional holes.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    exterior: Ring,
    holes: Vec<Ring>,
}

impl Polygon {
    pub fn new(exterior: Ring, holes: Vec<Ring>) -> Self {
        Polygon { exterior, holes }
    }

    pub fn exterior(&self) -> &Ring {
        &self.exterior
    }

    pub fn holes(&self) -> &[Ring] {
        &self.holes
    }

    /// Points on any edge count as inside. Points strictly inside a hole
    /// do not.
    pub fn contains(&self, p: LatLng) -> bool {
        match self.exterior.classify(p) {
            Containment::Outside => false,
            Containment::Boundary => true,
            Containment::Inside => self
                .holes
                .iter()
                .all(|hole| hole.classify(p) != Containment::Inside),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: LatLng,
    pub max: LatLng,
}

impl BoundingBox {
    pub fn of<'a>(polygons: impl IntoIterator<Item = &'a Polygon>) -> Option<Self> {
        let mut vertices = polygons
            .into_iter()
            .flat_map(|polygon| polygon.exterior.vertices.iter().copied());

        let first = vertices.next()?;
        let mut bbox = BoundingBox {
            min: first,
            max: first,
        };
        for v in vertices {
            bbox.min.lat = bbox.min.lat.min(v.lat);
            bbox.min.lng = bbox.min.lng.min(v.lng);
            bbox.max.lat = bbox.max.lat.max(v.lat);
            bbox.max.lng = bbox.max.lng.max(v.lng);
        }
        Some(bbox)
    }

    /// Widened by `EDGE_EPSILON` so it never rejects a point the edge test
    /// would accept.
    pub fn contains(&self, p: LatLng) -> bool {
        p.lat >= self.min.lat - EDGE_EPSILON
            && p.lat <= self.max.lat + EDGE_EPSILON
            && p.lng >= self.min.lng - EDGE_EPSILON
            && p.lng <= self.max.lng + EDGE_EPSILON
    }
}

/// Area-weighted centroid of one or more polygons, holes subtracted.
///
/// Falls back to the mean of the exterior vertices when the total area is
/// zero (collinear input).
pub fn centroid(polygons: &[Polygon]) -> Option<LatLng> {
    // Bounding-box corner as origin: independent of where each ring starts.
    let origin = BoundingBox::of(polygons)?.min;

    let mut twice_area = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;

    for polygon in polygons {
        let (a, x, y) = polygon.exterior.moments(origin);
        let sign = a.signum();
        twice_area += a * sign;
        cx += x * sign;
        cy += y * sign;

        for hole in &polygon.holes {
            let (a, x, y) = hole.moments(origin);
            let sign = a.signum();
            twice_area -= a * sign;
            cx -= x * sign;
            cy -= y * sign;
        }
    }

    if twice_area.abs() < DEGENERATE_AREA {
        let vertices: Vec<LatLng> = polygons
            .iter()
            .flat_map(|polygon| polygon.exterior.vertices.iter().copied())
            .collect();
        let n = vertices.len() as f64;
        return Some(LatLng {
            lat: vertices.iter().map(|v| v.lat).sum::<f64>() / n,
            lng: vertices.iter().map(|v| v.lng).sum::<f64>() / n,
        });
    }

    Some(LatLng {
        lat: origin.lat + cy / (3.0 * twice_area),
        lng: origin.lng + cx / (3.0 * twice_area),
    })
}
