use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use gtfs::{ShapeID, Stop};

use crate::{Colors, Shape, TripDisplayData, VehicleFrame};

/// One LineString per shape, with its color, for a map to draw.
pub fn shapes_to_geojson(shapes: &[Shape], colors: &Colors<ShapeID>) -> FeatureCollection {
    let mut features = Vec::new();
    for shape in shapes {
        let mut properties = JsonObject::new();
        properties.insert("shape_id".to_string(), shape.shape_id.as_str().into());
        if let Some(color) = colors.get(&shape.shape_id) {
            properties.insert("color".to_string(), color.into());
        }
        features.push(feature(
            Value::LineString(shape.coordinates.iter().map(|pt| vec![pt.x, pt.y]).collect()),
            properties,
        ));
    }
    collection(features)
}

pub fn stops_to_geojson(stops: &[Stop]) -> FeatureCollection {
    let mut features = Vec::new();
    for stop in stops {
        let mut properties = JsonObject::new();
        properties.insert("stop_id".to_string(), stop.stop_id.as_str().into());
        properties.insert("stop_name".to_string(), stop.name.as_str().into());
        if let Some(location_type) = stop.location_type {
            properties.insert("location_type".to_string(), location_type.into());
        }
        if let Some(ref parent) = stop.parent_station {
            properties.insert("parent_station".to_string(), parent.as_str().into());
        }
        if let Some(ref platform) = stop.platform_code {
            properties.insert("platform_code".to_string(), platform.as_str().into());
        }
        features.push(feature(Value::Point(vec![stop.lon, stop.lat]), properties));
    }
    collection(features)
}

/// The trip's path through its stops, each stop, and the vehicle if it has a position.
pub fn trip_to_geojson(trip: &TripDisplayData, vehicle: Option<&VehicleFrame>) -> FeatureCollection {
    let mut features = Vec::new();

    let mut properties = JsonObject::new();
    properties.insert("trip_id".to_string(), trip.trip_id.as_str().into());
    properties.insert("color".to_string(), trip.color.as_str().into());
    features.push(feature(
        Value::LineString(
            trip.stops
                .iter()
                .map(|(stop, _)| vec![stop.lon, stop.lat])
                .collect(),
        ),
        properties,
    ));

    for (stop, stop_time) in &trip.stops {
        let mut properties = JsonObject::new();
        properties.insert("stop_id".to_string(), stop.stop_id.as_str().into());
        properties.insert("stop_name".to_string(), stop.name.as_str().into());
        properties.insert("stop_sequence".to_string(), stop_time.stop_sequence.into());
        properties.insert(
            "arrival_time".to_string(),
            stop_time.arrival_time.as_str().into(),
        );
        properties.insert(
            "departure_time".to_string(),
            stop_time.departure_time.as_str().into(),
        );
        features.push(feature(Value::Point(vec![stop.lon, stop.lat]), properties));
    }

    if let Some(frame) = vehicle {
        let mut properties = JsonObject::new();
        properties.insert("vehicle".to_string(), trip.trip_id.as_str().into());
        properties.insert("segment".to_string(), frame.segment.into());
        properties.insert("progress".to_string(), frame.progress.into());
        features.push(feature(
            Value::Point(vec![frame.pos.x, frame.pos.y]),
            properties,
        ));
    }

    collection(features)
}

fn feature(value: Value, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}
