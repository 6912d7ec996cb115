use std::collections::BTreeMap;

use anyhow::Result;
use geojson::FeatureCollection;
use gtfs::{ShapeID, ShapePoint, Stop, StopID, StopTime, TripID};

use crate::{
    assemble_shapes, group_by_trip, shapes_to_geojson, stop_schedules, unique_trip_ids, ChunkSource,
    Colors, DatasetConfig, LoadSession, Shape, StopWithTimes, TripDisplayData,
};

/// Route shapes from one load, with their colors.
pub struct ShapeLayer {
    pub shapes: Vec<Shape>,
    pub colors: Colors<ShapeID>,
}

impl ShapeLayer {
    pub fn new(shapes: Vec<Shape>) -> Self {
        let colors = Colors::assign(shapes.iter().map(|shape| &shape.shape_id));
        Self { shapes, colors }
    }

    /// None if the session was cancelled
    pub async fn load<S: ChunkSource>(
        source: &S,
        config: &DatasetConfig,
        session: &LoadSession,
    ) -> Result<Option<Self>> {
        let loaded = config
            .shapes
            .loader(source)
            .load(session, gtfs::parse_chunk::<ShapePoint>, assemble_shapes)
            .await?;
        Ok(loaded.map(|loaded| {
            info!(
                "Assembled {} shapes from {} of {} segments",
                loaded.data.len(),
                loaded.loaded_segments,
                loaded.info.segments.len()
            );
            Self::new(loaded.data)
        }))
    }

    pub fn to_geojson(&self) -> FeatureCollection {
        shapes_to_geojson(&self.shapes, &self.colors)
    }
}

/// Stops and the stop times visiting them, loaded together.
pub struct Schedule {
    pub stops: BTreeMap<StopID, Stop>,
    pub stop_times: Vec<StopTime>,
}

impl Schedule {
    pub fn new(stops: Vec<Stop>, stop_times: Vec<StopTime>) -> Self {
        let mut by_id = BTreeMap::new();
        for stop in stops {
            if by_id.contains_key(&stop.stop_id) {
                warn!("Duplicate stop {}, keeping the last one", stop.stop_id);
            }
            by_id.insert(stop.stop_id.clone(), stop);
        }
        Self {
            stops: by_id,
            stop_times,
        }
    }

    /// Loads stops first, then stop times. None if the session was cancelled.
    pub async fn load<S: ChunkSource>(
        source: &S,
        config: &DatasetConfig,
        session: &LoadSession,
    ) -> Result<Option<Self>> {
        let stops = match config
            .stops
            .loader(source)
            .load_records::<Stop>(session)
            .await?
        {
            Some(loaded) => loaded.data,
            None => return Ok(None),
        };
        info!("Loaded {} stops. Loading stop times...", stops.len());

        let stop_times = match config
            .stop_times
            .loader(source)
            .load_records::<StopTime>(session)
            .await?
        {
            Some(loaded) => loaded.data,
            None => return Ok(None),
        };
        info!("Loaded {} stop times", stop_times.len());

        Ok(Some(Self::new(stops, stop_times)))
    }

    pub fn active_trips(&self, now: f64) -> Vec<TripDisplayData> {
        TripDisplayData::all_active(&self.stop_times, &self.stops, now)
    }

    /// Display data for one trip, whether or not it's active.
    pub fn trip(&self, trip_id: &TripID, now: f64) -> Option<TripDisplayData> {
        let list: Vec<StopTime> = self
            .stop_times
            .iter()
            .filter(|st| &st.trip_id == trip_id)
            .cloned()
            .collect();
        let mut groups = group_by_trip(&list);
        let sorted = groups.remove(trip_id)?;
        let colors = Colors::assign([trip_id]);
        let color = colors.get(trip_id).unwrap_or("#0000ff").to_string();
        Some(TripDisplayData::new(
            trip_id.clone(),
            &sorted,
            &self.stops,
            color,
            now,
        ))
    }

    pub fn available_trips(&self, limit: usize) -> Vec<TripID> {
        unique_trip_ids(&self.stop_times, limit)
    }

    pub fn stop_schedules(&self) -> BTreeMap<StopID, StopWithTimes> {
        stop_schedules(&self.stops, &self.stop_times)
    }
}
