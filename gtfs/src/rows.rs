use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord, Trim};

/// Something that can be built from one positional row of a chunk file.
pub trait Record: Sized {
    /// Rows with fewer fields than this are dropped before `from_row` sees them.
    const MIN_FIELDS: usize;

    /// Returning `None` skips the row. Malformed rows aren't errors; a chunk is parsed on a
    /// best-effort basis.
    fn from_row(row: &StringRecord) -> Option<Self>;
}

/// Parse one chunk of a split dataset. Only the chunk declared first in the manifest carries the
/// header line, so `is_first_segment` must only be set for that one.
pub fn parse_chunk<T: Record>(text: &str, is_first_segment: bool) -> Vec<T> {
    rows(text, is_first_segment)
        .into_iter()
        .filter(|row| row.len() >= T::MIN_FIELDS)
        .filter_map(|row| T::from_row(&row))
        .collect()
}

/// Split a chunk into rows, in input order. When `skip_header` is set, the very first line is
/// discarded no matter what it contains. Blank lines are skipped everywhere.
///
/// Every line is read as its own record, so a stray quote only costs the row it's on.
pub fn rows(text: &str, skip_header: bool) -> Vec<StringRecord> {
    let body = if skip_header {
        match text.split_once('\n') {
            Some((_, rest)) => rest,
            None => "",
        }
    } else {
        text
    };

    let mut builder = ReaderBuilder::new();
    builder.has_headers(false).flexible(true).trim(Trim::All);
    let mut results = Vec::new();
    for line in body.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let mut reader = builder.from_reader(line.as_bytes());
        let mut rec = StringRecord::new();
        match reader.read_record(&mut rec) {
            Ok(true) => {
                if rec.iter().all(|field| field.is_empty()) {
                    continue;
                }
                results.push(rec);
            }
            Ok(false) => {}
            Err(err) => {
                debug!("Skipping unreadable row {line:?}: {err}");
            }
        }
    }
    results
}

/// A present, non-empty field
pub(crate) fn optional_field(row: &StringRecord, idx: usize) -> Option<&str> {
    row.get(idx).filter(|field| !field.is_empty())
}

pub(crate) fn optional_string(row: &StringRecord, idx: usize) -> Option<String> {
    optional_field(row, idx).map(|field| field.to_string())
}

pub(crate) fn optional_parse<T: FromStr>(row: &StringRecord, idx: usize) -> Option<T> {
    optional_field(row, idx).and_then(|field| field.parse().ok())
}

/// The digits a field starts with, so "3.0" and "3rd" are both 3. No leading digit means no
/// number.
pub(crate) fn leading_int(field: &str) -> Option<u32> {
    let end = field
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(field.len());
    field[..end].parse().ok()
}

/// Unparsable numbers become NaN, leaving it to later stages to filter.
pub(crate) fn parse_or_nan(field: &str) -> f64 {
    field.parse().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHUNK: &str = "stop_id,stop_name,stop_lat,stop_lon\nS1,Central,57.7,11.9\nS2,Park,57.8,12.0\n";

    #[test]
    fn test_header_skips_exactly_one_line() {
        let with_header = rows(CHUNK, true);
        let without = rows(CHUNK, false);
        assert_eq!(with_header.len(), 2);
        assert_eq!(without.len(), 3);
        assert_eq!(&without[0][0], "stop_id");
        assert_eq!(&with_header[0][0], "S1");
    }

    #[test]
    fn test_header_skip_ignores_line_contents() {
        // Whatever is on the first line goes, even if it looks like data or is blank
        let rows = rows("\nS1,Central,57.7,11.9\n", true);
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "S1");

        assert!(super::rows("only one line", true).is_empty());
    }

    #[test]
    fn test_blank_lines() {
        let text = "a,b\n\n   \r\nc,d\r\n\n\n";
        let rows = rows(text, false);
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[1][1], "d");
    }

    #[test]
    fn test_quoted_and_padded_fields() {
        let rows = rows("S1,\"Main St, north\",57.7 , 11.9\n", false);
        assert_eq!(rows[0].len(), 4);
        assert_eq!(&rows[0][1], "Main St, north");
        assert_eq!(&rows[0][2], "57.7");
    }

    #[test]
    fn test_unbalanced_quote_only_drops_its_row() {
        let text = "S1,\"Broken,57.1,11.1\nS2,B,57.2,11.2\nS3,C,57.3,11.3\nS4,D,57.4,11.4\n";
        let rows = rows(text, false);
        let last_ids: Vec<&str> = rows.iter().rev().take(3).map(|row| &row[0]).collect();
        assert_eq!(last_ids, vec!["S4", "S3", "S2"]);
        assert_eq!(&rows[rows.len() - 1][3], "11.4");

        let stops: Vec<crate::Stop> = crate::parse_chunk(text, false);
        let ids: Vec<&str> = stops.iter().map(|stop| stop.stop_id.as_str()).collect();
        assert_eq!(ids, vec!["S2", "S3", "S4"]);
    }

    #[test]
    fn test_leading_int() {
        assert_eq!(leading_int("3"), Some(3));
        assert_eq!(leading_int("3.0"), Some(3));
        assert_eq!(leading_int("12abc"), Some(12));
        assert_eq!(leading_int("four"), None);
        assert_eq!(leading_int(""), None);
        assert_eq!(leading_int("-1"), None);
    }

    #[test]
    fn test_optional_fields() {
        let row = StringRecord::from(vec!["a", "", "3", "x"]);
        assert_eq!(optional_field(&row, 0), Some("a"));
        assert_eq!(optional_field(&row, 1), None);
        assert_eq!(optional_field(&row, 7), None);
        assert_eq!(optional_parse::<u8>(&row, 2), Some(3));
        assert_eq!(optional_parse::<u8>(&row, 3), None);
        assert!(parse_or_nan("north").is_nan());
    }
}
