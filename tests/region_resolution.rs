use std::sync::Arc;

use farm_insight_core::region::{
    BoundaryDataset, DatasetError, GeometryError, LatLng, QueryPolygon, RegionResolver,
    DEFAULT_REGION,
};
use serde_json::json;
use tempfile::tempdir;

/// Closed GeoJSON ring for a lat/lng box, positions as [lng, lat].
fn box_ring(lat0: f64, lng0: f64, lat1: f64, lng1: f64) -> serde_json::Value {
    json!([[lng0, lat0], [lng1, lat0], [lng1, lat1], [lng0, lat1], [lng0, lat0]])
}

fn feature(name: &str, geometry: serde_json::Value) -> serde_json::Value {
    json!({ "type": "Feature", "properties": { "name": name }, "geometry": geometry })
}

fn polygon(rings: Vec<serde_json::Value>) -> serde_json::Value {
    json!({ "type": "Polygon", "coordinates": rings })
}

fn resolver_for(features: Vec<serde_json::Value>) -> RegionResolver {
    let collection = json!({ "type": "FeatureCollection", "features": features });
    let dataset = BoundaryDataset::from_geojson_str(&collection.to_string()).unwrap();
    RegionResolver::new(Arc::new(dataset))
}

fn midwest() -> serde_json::Value {
    json!({
        "type": "FeatureCollection",
        "features": [
            feature("Marker", json!({ "type": "Point", "coordinates": [-93.0, 42.0] })),
            {
                "type": "Feature",
                "properties": { "STATEFP": "00" },
                "geometry": polygon(vec![box_ring(0.0, 0.0, 1.0, 1.0)])
            },
            { "type": "Feature", "properties": { "name": "Ghost" }, "geometry": null },
            feature("Nebraska", polygon(vec![box_ring(40.0, -104.05, 43.0, -95.31)])),
            feature("Iowa", polygon(vec![box_ring(40.38, -96.64, 43.50, -90.14)])),
            feature("Michigan", json!({
                "type": "MultiPolygon",
                "coordinates": [
                    [box_ring(41.70, -86.82, 45.80, -82.41)],
                    [box_ring(45.09, -90.42, 47.48, -83.00)]
                ]
            })),
            {
                "type": "Feature",
                "properties": { "NAME": "Missouri" },
                "geometry": polygon(vec![box_ring(35.99, -95.77, 40.61, -89.10)])
            }
        ]
    })
}

fn resolver() -> RegionResolver {
    let dataset = BoundaryDataset::from_geojson_str(&midwest().to_string()).unwrap();
    RegionResolver::new(Arc::new(dataset))
}

fn field(points: &[(f64, f64)]) -> QueryPolygon {
    QueryPolygon::new(points.iter().map(|&(lat, lng)| LatLng::new(lat, lng)).collect()).unwrap()
}

#[test]
fn scenario_point_in_iowa() {
    let resolver = resolver();
    assert_eq!(resolver.resolve_point(LatLng::new(42.00, -93.60)), Some("Iowa"));

    let small_field = field(&[(41.99, -93.61), (41.99, -93.59), (42.01, -93.59), (42.01, -93.61)]);
    assert_eq!(resolver.resolve(&small_field), Some("Iowa"));
}

#[test]
fn unusable_features_are_skipped_in_order() {
    let resolver = resolver();
    let names: Vec<&str> = resolver.dataset().features().iter().map(|f| f.name()).collect();
    assert_eq!(names, vec!["Nebraska", "Iowa", "Michigan", "Missouri"]);
}

#[test]
fn multipolygon_parts_are_all_searched() {
    let resolver = resolver();
    assert_eq!(resolver.resolve_point(LatLng::new(46.5, -87.0)), Some("Michigan"));
    assert_eq!(resolver.resolve_point(LatLng::new(42.7, -84.5)), Some("Michigan"));
}

#[test]
fn overlap_goes_to_first_feature_in_dataset_order() {
    // Nebraska and Iowa boxes overlap between -96.64 and -95.31.
    let resolver = resolver();
    assert_eq!(resolver.resolve_point(LatLng::new(41.0, -96.0)), Some("Nebraska"));
}

#[test]
fn centroid_on_shared_border_resolves_to_first_feature() {
    let west = feature("West", polygon(vec![box_ring(40.0, -100.0, 42.0, -96.0)]));
    let east = feature("East", polygon(vec![box_ring(40.0, -96.0, 42.0, -92.0)]));
    let straddling = field(&[(40.5, -96.5), (40.5, -95.5), (41.5, -95.5), (41.5, -96.5)]);

    let r1 = resolver_for(vec![west.clone(), east.clone()]);
    let r2 = resolver_for(vec![east, west]);

    assert_eq!(r1.resolve(&straddling), Some("West"));
    assert_eq!(r2.resolve(&straddling), Some("East"));
}

#[test]
fn unclassified_polygon_is_none_and_caller_defaults() {
    let resolver = resolver();
    let offshore = field(&[(30.0, -60.0), (30.0, -59.0), (31.0, -59.0)]);
    assert_eq!(resolver.resolve(&offshore), None);
    assert_eq!(resolver.resolve_or_default(&offshore), DEFAULT_REGION);
}

#[test]
fn invariant_vertex_rotation_and_reversal_do_not_change_region() {
    let resolver = resolver();
    // Non-convex L-shaped field in central Iowa.
    let base = vec![
        (41.0, -94.0),
        (41.0, -93.0),
        (41.2, -93.0),
        (41.2, -93.8),
        (42.0, -93.8),
        (42.0, -94.0),
    ];
    let expected = field(&base).centroid().unwrap();

    for shift in 0..base.len() {
        let mut rotated = base.clone();
        rotated.rotate_left(shift);
        let polygon = field(&rotated);
        assert_eq!(resolver.resolve(&polygon), Some("Iowa"), "rotation {shift}");

        let c = polygon.centroid().unwrap();
        assert!((c.lat - expected.lat).abs() < 1e-9 && (c.lng - expected.lng).abs() < 1e-9);

        rotated.reverse();
        assert_eq!(resolver.resolve(&field(&rotated)), Some("Iowa"), "reversed rotation {shift}");
    }
}

#[test]
fn explicit_closing_vertex_is_optional() {
    let open = field(&[(42.0, -93.0), (42.0, -92.0), (43.0, -92.0)]);
    let closed = field(&[(42.0, -93.0), (42.0, -92.0), (43.0, -92.0), (42.0, -93.0)]);
    assert_eq!(open, closed);
}

#[test]
fn geojson_field_feature_resolves() {
    let resolver = resolver();
    let field_feature = feature(
        "north forty",
        polygon(vec![box_ring(41.9, -93.7, 42.1, -93.5)]),
    );
    assert_eq!(resolver.resolve_geojson(&field_feature), Some("Iowa"));

    let point = feature("pin", json!({ "type": "Point", "coordinates": [-93.6, 42.0] }));
    assert_eq!(resolver.resolve_geojson(&point), None);
}

#[test]
fn region_with_hole_excludes_enclave() {
    let resolver = resolver_for(vec![
        feature(
            "Ring County",
            polygon(vec![box_ring(0.0, 0.0, 10.0, 10.0), box_ring(4.0, 4.0, 6.0, 6.0)]),
        ),
        feature("Enclave City", polygon(vec![box_ring(4.0, 4.0, 6.0, 6.0)])),
    ]);

    assert_eq!(resolver.resolve_point(LatLng::new(5.0, 5.0)), Some("Enclave City"));
    assert_eq!(resolver.resolve_point(LatLng::new(2.0, 2.0)), Some("Ring County"));
}

#[test]
fn point_within_edge_tolerance_of_bounding_box_is_inside() {
    let resolver = resolver_for(vec![feature("Unit", polygon(vec![box_ring(0.0, 0.0, 1.0, 1.0)]))]);

    assert_eq!(resolver.resolve_point(LatLng::new(1.0 + 5e-13, 0.5)), Some("Unit"));
    assert_eq!(resolver.resolve_point(LatLng::new(0.5, -5e-13)), Some("Unit"));
    assert_eq!(resolver.resolve_point(LatLng::new(1.0 + 1e-9, 0.5)), None);
}

#[test]
fn dataset_loads_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("usstates.json");
    std::fs::write(&path, midwest().to_string()).unwrap();

    let dataset = BoundaryDataset::load(&path).unwrap();
    assert_eq!(dataset.len(), 4);
}

#[test]
fn dataset_load_failures_are_reported() {
    let dir = tempdir().unwrap();

    match BoundaryDataset::load(&dir.path().join("missing.json")) {
        Err(DatasetError::Io(_)) => {}
        other => panic!("expected io error, got {other:?}"),
    }

    match BoundaryDataset::from_geojson_str("{ \"features\": 3 }") {
        Err(DatasetError::Json(_)) => {}
        other => panic!("expected json error, got {other:?}"),
    }

    let no_regions = json!({ "type": "FeatureCollection", "features": [] });
    match BoundaryDataset::from_geojson_str(&no_regions.to_string()) {
        Err(DatasetError::Empty) => {}
        other => panic!("expected empty dataset error, got {other:?}"),
    }
}

#[test]
fn degenerate_query_polygons_are_rejected() {
    assert!(matches!(
        QueryPolygon::new(vec![LatLng::new(1.0, 1.0), LatLng::new(2.0, 2.0)]),
        Err(GeometryError::TooFewVertices(2))
    ));
    assert!(matches!(
        QueryPolygon::from_geojson_str("{\"type\": \"LineString\", \"coordinates\": []}"),
        Err(GeometryError::UnsupportedGeometry(_))
    ));
}
