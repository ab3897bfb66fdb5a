// clinic/src/util.rs

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use uuid::Uuid;

/// New record identifier.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current time as an RFC 3339 UTC string.
pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}

/// Update stamp that is strictly later than `previous`. Falls back to the
/// current time when `previous` is not RFC 3339.
pub fn next_update_timestamp(previous: &str) -> String {
    let now = Utc::now();
    match DateTime::parse_from_rfc3339(previous) {
        Ok(previous) => {
            let previous = previous.with_timezone(&Utc);
            if now > previous {
                format_timestamp(now)
            } else {
                format_timestamp(previous + Duration::milliseconds(1))
            }
        }
        Err(_) => format_timestamp(now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(stamp: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(stamp).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn ids_are_unique_uuids() {
        let first = new_id();
        let second = new_id();
        assert_ne!(first, second);
        assert!(Uuid::parse_str(&first).is_ok());
    }

    #[test]
    fn timestamps_are_rfc3339_utc() {
        let stamp = now_timestamp();
        assert!(stamp.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(&stamp).is_ok());
    }

    #[test]
    fn update_stamp_moves_past_old_value() {
        let previous = "2020-01-01T00:00:00.000Z";
        let next = next_update_timestamp(previous);
        assert!(parse(&next) > parse(previous));
    }

    #[test]
    fn update_stamp_advances_past_future_value() {
        let previous = "2999-01-01T00:00:00.000Z";
        assert_eq!(next_update_timestamp(previous), "2999-01-01T00:00:00.001Z");
    }

    #[test]
    fn update_stamp_tolerates_garbage() {
        let next = next_update_timestamp("not a date");
        assert!(DateTime::parse_from_rfc3339(&next).is_ok());
    }
}
