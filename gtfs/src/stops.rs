use csv::StringRecord;
use geo_types::{coord, Coord};

use crate::rows::{optional_parse, optional_string, Record};
use crate::StopID;

/// Columns: stop_id, stop_name, stop_lat, stop_lon, [location_type], [parent_station],
/// [platform_code]
#[derive(Clone, Debug, PartialEq)]
pub struct Stop {
    pub stop_id: StopID,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub location_type: Option<u8>,
    pub parent_station: Option<StopID>,
    pub platform_code: Option<String>,
}

impl Stop {
    /// x is longitude, y is latitude
    pub fn pos(&self) -> Coord {
        coord! { x: self.lon, y: self.lat }
    }
}

impl Record for Stop {
    const MIN_FIELDS: usize = 4;

    fn from_row(row: &StringRecord) -> Option<Self> {
        let lat: f64 = row[2].parse().ok()?;
        let lon: f64 = row[3].parse().ok()?;
        // Only finiteness is checked. Out-of-range degrees pass through.
        if !lat.is_finite() || !lon.is_finite() {
            return None;
        }
        Some(Self {
            stop_id: StopID::new(&row[0]),
            name: row[1].to_string(),
            lat,
            lon,
            location_type: optional_parse(row, 4),
            parent_station: optional_string(row, 5).map(StopID::new),
            platform_code: optional_string(row, 6),
        })
    }
}
