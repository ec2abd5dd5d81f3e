use chrono::{DateTime, Utc};

// The time window of an extraction. Both bounds are inclusive.
// A reversed window (start after end) is not rejected; it simply matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        self.start <= *instant && *instant <= self.end
    }

    pub fn is_reversed(&self) -> bool {
        self.start > self.end
    }
}
