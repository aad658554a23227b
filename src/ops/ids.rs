use chrono::{DateTime, Utc};

/// Timestamp ids: creation time in milliseconds as a decimal string.
///
/// Successive ids are strictly increasing, and an id already in use is
/// skipped, so creating several records within one millisecond never
/// collides.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id for a record created at `now`, avoiding everything `taken` reports
    pub fn next_id(&mut self, now: DateTime<Utc>, taken: impl Fn(&str) -> bool) -> String {
        let mut candidate = now.timestamp_millis().max(self.last + 1);
        while taken(&candidate.to_string()) {
            candidate += 1;
        }
        self.last = candidate;
        candidate.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn uses_millisecond_timestamp() {
        let now = Utc.with_ymd_and_hms(2025, 5, 14, 12, 0, 0).unwrap();
        let mut ids = IdGenerator::new();
        assert_eq!(ids.next_id(now, |_| false), now.timestamp_millis().to_string());
    }

    #[test]
    fn same_instant_does_not_collide() {
        let now = Utc.with_ymd_and_hms(2025, 5, 14, 12, 0, 0).unwrap();
        let mut ids = IdGenerator::new();
        let a = ids.next_id(now, |_| false);
        let b = ids.next_id(now, |_| false);
        let c = ids.next_id(now - chrono::Duration::seconds(5), |_| false);
        assert_ne!(a, b);
        assert!(c.parse::<i64>().unwrap() > b.parse::<i64>().unwrap());
    }

    #[test]
    fn skips_ids_already_present() {
        let now = Utc.with_ymd_and_hms(2025, 5, 14, 12, 0, 0).unwrap();
        let ms = now.timestamp_millis();
        let existing = [ms.to_string(), (ms + 1).to_string()];
        let mut ids = IdGenerator::new();
        let id = ids.next_id(now, |candidate| existing.iter().any(|e| e == candidate));
        assert_eq!(id, (ms + 2).to_string());
    }
}
