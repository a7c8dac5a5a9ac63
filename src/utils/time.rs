use chrono::{DateTime, Duration, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

pub fn current_timestamp() -> i64 {
    now().timestamp()
}

/// Current time, or `previous` plus one microsecond if the clock has not moved past it
pub fn advance_from(previous: DateTime<Utc>) -> DateTime<Utc> {
    let current = now();
    if current > previous {
        current
    } else {
        previous + Duration::microseconds(1)
    }
}
