use csv::StringRecord;

use crate::rows::{leading_int, optional_parse, parse_or_nan, Record};
use crate::ShapeID;

/// One row of shapes.txt. Many points share a shape ID; `sequence` orders them.
///
/// Coordinates that don't parse are kept as NaN here. Assembling the shape drops them.
#[derive(Clone, Debug)]
pub struct ShapePoint {
    pub shape_id: ShapeID,
    pub lat: f64,
    pub lon: f64,
    pub sequence: u32,
    pub dist_traveled: Option<f64>,
}

impl Record for ShapePoint {
    const MIN_FIELDS: usize = 4;

    fn from_row(row: &StringRecord) -> Option<Self> {
        Some(Self {
            shape_id: ShapeID::new(&row[0]),
            lat: parse_or_nan(&row[1]),
            lon: parse_or_nan(&row[2]),
            // There's no sensible place to put a point without a sequence
            sequence: leading_int(&row[3])?,
            dist_traveled: optional_parse(row, 4),
        })
    }
}
