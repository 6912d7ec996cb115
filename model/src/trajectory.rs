use geo_types::Coord;

use crate::TripDisplayData;

/// A trip's stops in visiting order, with scheduled times in minutes since midnight. A time
/// that couldn't be parsed is `None`.
#[derive(Clone, Debug)]
pub struct Trajectory {
    inner: Vec<(Coord, Option<f64>, Option<f64>)>,
}

/// Where a vehicle is at some moment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VehicleFrame {
    pub time: f64,
    pub pos: Coord,
    /// The vehicle is between stop `segment` and `segment + 1`. At the end of the trip, this is
    /// the last stop.
    pub segment: usize,
    /// How far along the segment, from 0 to 1
    pub progress: f64,
}

/// The fraction of the way from `departure` to `arrival` at `now`, clamped to [0, 1]. When the
/// interval is empty (or backwards), the vehicle is considered to have arrived.
pub fn progress_between(departure: f64, arrival: f64, now: f64) -> f64 {
    if arrival <= departure {
        return 1.0;
    }
    ((now - departure) / (arrival - departure)).clamp(0.0, 1.0)
}

/// Linear interpolation in plain degrees. Adjacent stops are close together, so the curvature of
/// the Earth doesn't matter.
pub fn interpolate_position(from: Coord, to: Coord, departure: f64, arrival: f64, now: f64) -> Coord {
    let pct = progress_between(departure, arrival, now);
    from + (to - from) * pct
}

impl Trajectory {
    /// Each entry is (position, arrival, departure).
    pub fn new(inner: Vec<(Coord, Option<f64>, Option<f64>)>) -> Self {
        Self { inner }
    }

    pub fn from_trip(trip: &TripDisplayData) -> Self {
        Self::new(
            trip.stops
                .iter()
                .map(|(stop, stop_time)| {
                    (
                        stop.pos(),
                        stop_time.arrival_minutes().ok(),
                        stop_time.departure_minutes().ok(),
                    )
                })
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// The last stop reached by `now`, scanning in order and giving up at the first stop not
    /// reached yet.
    pub fn latest_passed(&self, now: f64) -> Option<usize> {
        let mut latest = None;
        for (idx, (_, arrival, _)) in self.inner.iter().enumerate() {
            match arrival {
                Some(arrival) if *arrival <= now => {
                    latest = Some(idx);
                }
                _ => break,
            }
        }
        latest
    }

    /// None before the vehicle reaches its first stop, or if the schedule around it is unusable.
    pub fn interpolate(&self, now: f64) -> Option<VehicleFrame> {
        let latest = self.latest_passed(now)?;
        if latest + 1 == self.inner.len() {
            return Some(VehicleFrame {
                time: now,
                pos: self.inner[latest].0,
                segment: latest,
                progress: 1.0,
            });
        }

        // Look ahead for the segment we're on. If we're dwelling at a stop, stay there.
        let mut segment = latest;
        for (idx, pair) in self.inner.windows(2).enumerate().skip(latest) {
            if let (Some(departure), Some(arrival)) = (pair[0].2, pair[1].1) {
                if now >= departure && now <= arrival {
                    segment = idx;
                    break;
                }
            }
        }

        let (from, _, departure) = self.inner[segment];
        let (to, arrival, _) = self.inner[segment + 1];
        let departure = departure?;
        let arrival = arrival?;
        Some(VehicleFrame {
            time: now,
            pos: interpolate_position(from, to, departure, arrival, now),
            segment,
            progress: progress_between(departure, arrival, now),
        })
    }
}
