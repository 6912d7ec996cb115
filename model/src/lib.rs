#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod animation;
mod clock;
mod colors;
mod config;
mod dataset;
mod export;
mod loader;
mod manifest;
mod session;
mod shapes;
mod source;
mod trajectory;
mod trips;

pub use animation::Animation;
pub use clock::{current_time_to_minutes, Clock, FixedClock, SystemClock};
pub use colors::Colors;
pub use config::{DatasetConfig, SegmentedFile};
pub use dataset::{Schedule, ShapeLayer};
pub use export::{shapes_to_geojson, stops_to_geojson, trip_to_geojson};
pub use loader::{Loaded, SegmentedLoader};
pub use manifest::{SegmentEntry, SegmentInfo};
pub use session::{CancelHandle, LoadProgress, LoadSession};
pub use shapes::{assemble_shapes, Shape};
pub use source::{ChunkSource, DataSource, DirSource, HttpSource, MemorySource};
pub use trajectory::{interpolate_position, progress_between, Trajectory, VehicleFrame};
pub use trips::{
    active_trips, find_latest_passed_stop_index, group_by_trip, is_trip_active, stop_schedules,
    trip_window, unique_trip_ids, StopWithTimes, TripDisplayData,
};
