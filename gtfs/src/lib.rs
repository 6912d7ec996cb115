#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod ids;
mod rows;
mod shapes;
mod stop_times;
mod stops;
mod time;

pub use ids::{ShapeID, StopID, TripID};
pub use rows::{parse_chunk, rows, Record};
pub use shapes::ShapePoint;
pub use stop_times::StopTime;
pub use stops::Stop;
pub use time::{minutes_to_time_string, time_string_to_minutes};
