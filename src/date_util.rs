use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Truncate a timestamp to day granularity.
pub fn day_of(ts: DateTime<Utc>) -> NaiveDate {
    ts.date_naive()
}

/// Inclusive day-by-day sequence from `start` to `end`.
/// Empty when `start > end` (defensive; callers treat it as "no series").
pub fn day_series(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    if start > end {
        return Vec::new();
    }
    let mut days = Vec::with_capacity((end - start).num_days() as usize + 1);
    let mut day = start;
    while day <= end {
        days.push(day);
        day += Duration::days(1);
    }
    days
}

/// Half-up rounding to 2 decimal places. All displayed rates and averages go
/// through this so report fields compare exactly.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part / whole * 100` rounded to 2 decimals; `0.0` when `whole` is zero.
/// Zero denominators short-circuit rather than producing NaN/Inf.
pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole <= 0.0 {
        return 0.0;
    }
    round2(part / whole * 100.0)
}

/// Mean of second-granularity durations, displayed as days with 2 decimals.
/// Returns `0.0` for an empty slice.
pub fn mean_seconds_as_days(seconds: &[i64]) -> f64 {
    if seconds.is_empty() {
        return 0.0;
    }
    let sum: i64 = seconds.iter().sum();
    round2(sum as f64 / seconds.len() as f64 / 86_400.0)
}

/// A single second-granularity duration displayed as days with 2 decimals.
pub fn seconds_as_days(seconds: i64) -> f64 {
    round2(seconds as f64 / 86_400.0)
}
