//! Wall-clock helpers and creation-time identifiers

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, SecondsFormat, Utc};

/// Milliseconds since the Unix epoch
pub fn now_millis() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
}

/// RFC 3339 timestamp with millisecond precision
pub fn iso_now() -> String {
    to_iso(Utc::now())
}

pub fn to_iso(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Creation-time ids. Two ids minted in the same millisecond are bumped
/// apart so they stay unique within a process.
#[derive(Debug, Default)]
pub struct IdSource {
    last: AtomicU64,
}

impl IdSource {
    pub const fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    /// Seed with the highest id already in use
    pub fn observe(&self, id: u64) {
        self.last.fetch_max(id, Ordering::SeqCst);
    }

    pub fn next(&self) -> u64 {
        let now = now_millis();
        let mut prev = self.last.load(Ordering::SeqCst);
        loop {
            let candidate = now.max(prev.saturating_add(1));
            match self
                .last
                .compare_exchange(prev, candidate, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return candidate,
                Err(actual) => prev = actual,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_strictly_increase() {
        let ids = IdSource::new();
        let mut last = 0;
        for _ in 0..1000 {
            let id = ids.next();
            assert!(id > last);
            last = id;
        }
    }

    #[test]
    fn observe_moves_floor() {
        let ids = IdSource::new();
        let far = now_millis() + 1_000_000;
        ids.observe(far);
        assert_eq!(ids.next(), far + 1);
    }

    #[test]
    fn iso_has_millis_and_zulu() {
        let at = DateTime::parse_from_rfc3339("2025-03-04T05:06:07.890Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(to_iso(at), "2025-03-04T05:06:07.890Z");
    }
}
