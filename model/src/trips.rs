use std::collections::{BTreeMap, BTreeSet};

use gtfs::{Stop, StopID, StopTime, TripID};

use crate::{Colors, Trajectory, VehicleFrame};

/// Everything needed to draw one trip right now.
#[derive(Clone, Debug)]
pub struct TripDisplayData {
    pub trip_id: TripID,
    /// In stop sequence order. Stop times referring to unknown stops are left out.
    pub stops: Vec<(Stop, StopTime)>,
    pub color: String,
    /// Index into `stops` of the last stop reached. None if the trip hasn't reached any yet.
    pub latest_passed: Option<usize>,
}

/// A stop with every stop time that visits it.
#[derive(Clone, Debug)]
pub struct StopWithTimes {
    pub stop: Stop,
    pub stop_times: Vec<StopTime>,
}

/// Groups stop times per trip, each sorted by stop sequence. Ties keep their input order.
pub fn group_by_trip(stop_times: &[StopTime]) -> BTreeMap<TripID, Vec<StopTime>> {
    let mut per_trip: BTreeMap<TripID, Vec<StopTime>> = BTreeMap::new();
    for st in stop_times {
        per_trip
            .entry(st.trip_id.clone())
            .or_insert_with(Vec::new)
            .push(st.clone());
    }
    for list in per_trip.values_mut() {
        list.sort_by_key(|st| st.stop_sequence);
    }
    per_trip
}

/// The departure from the lowest-sequence stop and the arrival at the highest-sequence stop, in
/// minutes since midnight. The input doesn't need to be sorted.
pub fn trip_window(stop_times: &[StopTime]) -> Option<(f64, f64)> {
    // min_by_key keeps the first of equal minimums and max_by_key the last of equal maximums,
    // matching the ends of a stable sort.
    let first = stop_times.iter().min_by_key(|st| st.stop_sequence)?;
    let last = stop_times.iter().max_by_key(|st| st.stop_sequence)?;
    match (first.departure_minutes(), last.arrival_minutes()) {
        (Ok(start), Ok(end)) => Some((start, end)),
        (Err(err), _) | (_, Err(err)) => {
            debug!("Trip {} has an unusable schedule: {err}", first.trip_id);
            None
        }
    }
}

/// Is `now` within the trip's window, inclusive on both ends? A trip without stop times is never
/// active.
pub fn is_trip_active(stop_times: &[StopTime], now: f64) -> bool {
    match trip_window(stop_times) {
        Some((start, end)) => now >= start && now <= end,
        None => false,
    }
}

/// The trips active at `now`, with their stop times sorted by stop sequence.
pub fn active_trips(stop_times: &[StopTime], now: f64) -> BTreeMap<TripID, Vec<StopTime>> {
    group_by_trip(stop_times)
        .into_iter()
        .filter(|(_, list)| is_trip_active(list, now))
        .collect()
}

/// `stop_times` must be sorted by stop sequence. Scans from the start and stops at the first stop
/// whose arrival is after `now`; stops are assumed to be visited in time order.
pub fn find_latest_passed_stop_index(stop_times: &[StopTime], now: f64) -> Option<usize> {
    let mut latest = None;
    for (idx, st) in stop_times.iter().enumerate() {
        match st.arrival_minutes() {
            Ok(arrival) if arrival <= now => {
                latest = Some(idx);
            }
            _ => break,
        }
    }
    latest
}

/// The first `limit` distinct trip IDs, in the order they were loaded.
pub fn unique_trip_ids(stop_times: &[StopTime], limit: usize) -> Vec<TripID> {
    let mut seen = BTreeSet::new();
    let mut ids = Vec::new();
    for st in stop_times {
        if ids.len() == limit {
            break;
        }
        if seen.insert(&st.trip_id) {
            ids.push(st.trip_id.clone());
        }
    }
    ids
}

/// Indexes stop times by the stop they visit. Stop times for unknown stops are dropped.
pub fn stop_schedules(
    stops: &BTreeMap<StopID, Stop>,
    stop_times: &[StopTime],
) -> BTreeMap<StopID, StopWithTimes> {
    let mut results: BTreeMap<StopID, StopWithTimes> = BTreeMap::new();
    for st in stop_times {
        if let Some(stop) = stops.get(&st.stop_id) {
            results
                .entry(st.stop_id.clone())
                .or_insert_with(|| StopWithTimes {
                    stop: stop.clone(),
                    stop_times: Vec::new(),
                })
                .stop_times
                .push(st.clone());
        }
    }
    results
}

impl TripDisplayData {
    /// `sorted_stop_times` must belong to one trip, sorted by stop sequence.
    pub fn new(
        trip_id: TripID,
        sorted_stop_times: &[StopTime],
        stops: &BTreeMap<StopID, Stop>,
        color: String,
        now: f64,
    ) -> Self {
        let mut pairs = Vec::new();
        for st in sorted_stop_times {
            match stops.get(&st.stop_id) {
                Some(stop) => pairs.push((stop.clone(), st.clone())),
                None => debug!("Trip {trip_id} visits unknown stop {}", st.stop_id),
            }
        }
        let times: Vec<StopTime> = pairs.iter().map(|(_, st)| st.clone()).collect();
        let latest_passed = find_latest_passed_stop_index(&times, now);
        Self {
            trip_id,
            stops: pairs,
            color,
            latest_passed,
        }
    }

    /// Builds display data for every trip active at `now`. Colors are assigned fresh for this set
    /// of trips.
    pub fn all_active(
        stop_times: &[StopTime],
        stops: &BTreeMap<StopID, Stop>,
        now: f64,
    ) -> Vec<Self> {
        let active = active_trips(stop_times, now);
        let colors = Colors::assign(active.keys());
        active
            .into_iter()
            .map(|(trip_id, list)| {
                let color = colors.get(&trip_id).unwrap_or("#000000").to_string();
                Self::new(trip_id, &list, stops, color, now)
            })
            .collect()
    }

    pub fn trajectory(&self) -> Trajectory {
        Trajectory::from_trip(self)
    }

    pub fn vehicle_at(&self, now: f64) -> Option<VehicleFrame> {
        self.trajectory().interpolate(now)
    }
}
