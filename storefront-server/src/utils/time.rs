//! Time helpers
//!
//! Repositories and query builders only ever see `i64` Unix millis;
//! conversion from wall-clock time happens here.

use chrono::Utc;

pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Current time as Unix millis
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Unix millis of `days` days before now
pub fn days_ago_millis(days: i64) -> i64 {
    now_millis() - days * MILLIS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days_ago_is_in_the_past() {
        let now = now_millis();
        let cutoff = days_ago_millis(30);
        assert!(cutoff < now);
        assert!(now - cutoff >= 30 * MILLIS_PER_DAY);
    }
}
