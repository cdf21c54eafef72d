use std::time::{Duration, Instant};

/// Default tick interval in milliseconds
pub const DEFAULT_TICK_MS: u64 = 250;

/// Get tick duration
pub fn tick_duration() -> Duration {
    Duration::from_millis(DEFAULT_TICK_MS)
}

/// Whether a periodic job last run at `last` is due again
pub fn is_due(last: Instant, interval: Duration, now: Instant) -> bool {
    now.saturating_duration_since(last) >= interval
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_duration() {
        let duration = tick_duration();
        assert_eq!(duration, Duration::from_millis(250));
    }

    #[test]
    fn test_is_due() {
        let start = Instant::now();
        let interval = Duration::from_secs(60);
        assert!(!is_due(start, interval, start));
        assert!(!is_due(start, interval, start + Duration::from_secs(59)));
        assert!(is_due(start, interval, start + Duration::from_secs(60)));
        // Clock readings from before `last` are never due
        assert!(!is_due(start + Duration::from_secs(5), interval, start));
    }
}
