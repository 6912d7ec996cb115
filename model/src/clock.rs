use chrono::Timelike;

/// Where "now" comes from, in minutes since midnight. Read afresh whenever it's needed.
pub trait Clock: Send + Sync {
    fn now_minutes(&self) -> f64;
}

/// The local wall clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_minutes(&self) -> f64 {
        current_time_to_minutes(&chrono::Local::now())
    }
}

/// Always reports the same time.
pub struct FixedClock(pub f64);

impl Clock for FixedClock {
    fn now_minutes(&self) -> f64 {
        self.0
    }
}

pub fn current_time_to_minutes<T: Timelike>(time: &T) -> f64 {
    time.hour() as f64 * 60.0 + time.minute() as f64 + time.second() as f64 / 60.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn test_current_time_to_minutes() {
        let time = NaiveTime::from_hms_opt(8, 20, 30).unwrap();
        assert_eq!(current_time_to_minutes(&time), 500.5);
        assert_eq!(FixedClock(42.0).now_minutes(), 42.0);

        let now = SystemClock.now_minutes();
        assert!((0.0..1440.0).contains(&now));
    }
}
