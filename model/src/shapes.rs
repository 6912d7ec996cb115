use std::collections::BTreeMap;

use geo_types::{coord, Coord, LineString};
use gtfs::{ShapeID, ShapePoint};

/// The path of one shape, as (lon, lat) coordinates in sequence order.
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    pub shape_id: ShapeID,
    pub coordinates: Vec<Coord>,
}

impl Shape {
    pub fn line_string(&self) -> LineString {
        LineString::new(self.coordinates.clone())
    }
}

/// Groups points by shape and orders them. Points with a non-finite coordinate are dropped, and
/// so is any shape left without points. Results are ordered by shape ID.
pub fn assemble_shapes(points: Vec<ShapePoint>) -> Vec<Shape> {
    let mut pts_per_shape: BTreeMap<ShapeID, Vec<ShapePoint>> = BTreeMap::new();
    for pt in points {
        pts_per_shape
            .entry(pt.shape_id.clone())
            .or_insert_with(Vec::new)
            .push(pt);
    }

    let mut results = Vec::new();
    for (shape_id, mut pts) in pts_per_shape {
        // Stable, so equal sequence numbers keep load order
        pts.sort_by_key(|pt| pt.sequence);
        let coordinates: Vec<Coord> = pts
            .into_iter()
            .filter(|pt| pt.lon.is_finite() && pt.lat.is_finite())
            .map(|pt| coord! { x: pt.lon, y: pt.lat })
            .collect();
        if coordinates.is_empty() {
            debug!("Shape {shape_id} has no usable points");
            continue;
        }
        results.push(Shape {
            shape_id,
            coordinates,
        });
    }
    results
}
