use anyhow::Result;
use csv::StringRecord;

use crate::rows::{leading_int, optional_parse, optional_string, Record};
use crate::{time_string_to_minutes, StopID, TripID};

/// One row of stop_times.txt. Times are kept as the feed wrote them, since hours may go past 23.
#[derive(Clone, Debug, PartialEq)]
pub struct StopTime {
    pub trip_id: TripID,
    pub arrival_time: String,
    pub departure_time: String,
    pub stop_id: StopID,
    pub stop_sequence: u32,
    pub stop_headsign: Option<String>,
    pub pickup_type: Option<u8>,
    pub drop_off_type: Option<u8>,
    pub shape_dist_traveled: Option<f64>,
    /// true means the times are exact, false means approximate
    pub timepoint: Option<bool>,
    pub pickup_booking_rule_id: Option<String>,
    pub drop_off_booking_rule_id: Option<String>,
}

impl StopTime {
    pub fn arrival_minutes(&self) -> Result<f64> {
        time_string_to_minutes(&self.arrival_time)
    }

    pub fn departure_minutes(&self) -> Result<f64> {
        time_string_to_minutes(&self.departure_time)
    }
}

impl Record for StopTime {
    const MIN_FIELDS: usize = 5;

    fn from_row(row: &StringRecord) -> Option<Self> {
        Some(Self {
            trip_id: TripID::new(&row[0]),
            arrival_time: row[1].to_string(),
            departure_time: row[2].to_string(),
            stop_id: StopID::new(&row[3]),
            stop_sequence: leading_int(&row[4])?,
            stop_headsign: optional_string(row, 5),
            pickup_type: optional_parse(row, 6),
            drop_off_type: optional_parse(row, 7),
            shape_dist_traveled: optional_parse(row, 8),
            timepoint: optional_parse::<u8>(row, 9).map(|x| x == 1),
            pickup_booking_rule_id: optional_string(row, 10),
            drop_off_booking_rule_id: optional_string(row, 11),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_chunk;

    #[test]
    fn test_parse_stop_times() {
        let text = "trip_id,arrival_time,departure_time,stop_id,stop_sequence,stop_headsign,pickup_type,drop_off_type,shape_dist_traveled,timepoint,pickup_booking_rule_id,drop_off_booking_rule_id
T1,08:00:00,08:00:30,S1,1,Centrum,0,1,0.0,1,,rule_b
T1,24:10:00,24:10:00,S2,2
T1,08:20:00,08:20:00,S3
T1,08:30:00,08:30:00,S4,last
";
        let stop_times: Vec<StopTime> = parse_chunk(text, true);
        assert_eq!(stop_times.len(), 2);

        let first = &stop_times[0];
        assert_eq!(first.stop_headsign.as_deref(), Some("Centrum"));
        assert_eq!(first.pickup_type, Some(0));
        assert_eq!(first.drop_off_type, Some(1));
        assert_eq!(first.timepoint, Some(true));
        assert_eq!(first.pickup_booking_rule_id, None);
        assert_eq!(first.drop_off_booking_rule_id.as_deref(), Some("rule_b"));
        assert_eq!(first.departure_minutes().unwrap(), 480.5);

        let second = &stop_times[1];
        assert_eq!(second.stop_headsign, None);
        assert_eq!(second.timepoint, None);
        assert_eq!(second.arrival_minutes().unwrap(), 1450.0);
    }

    #[test]
    fn test_malformed_time_kept_verbatim() {
        let stop_times: Vec<StopTime> = parse_chunk("T1,soon,08:00:00,S1,1", false);
        assert_eq!(stop_times[0].arrival_time, "soon");
        assert!(stop_times[0].arrival_minutes().is_err());
    }

    #[test]
    fn test_fractional_stop_sequence() {
        let stop_times: Vec<StopTime> = parse_chunk("T1,08:00:00,08:00:00,S1,2.0", false);
        assert_eq!(stop_times[0].stop_sequence, 2);
    }
}
