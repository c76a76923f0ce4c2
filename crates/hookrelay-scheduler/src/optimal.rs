//! Optimal-hour send time.

use chrono::{DateTime, Days, SecondsFormat, Timelike, Utc};
use hookrelay_core::types::{InboundEvent, Properties};

use crate::clock::Clock;

/// Hour of day with the highest engagement count.
///
/// Keys that are not an hour in `0..=23` and values that are not numbers are
/// skipped. Hours are scanned in ascending order with a strict comparison,
/// so on a tie the earliest hour wins. A winner needs a count above zero:
/// empty or all-zero data returns `None` (send now) instead of falling back
/// to hour 0 and scheduling for midnight UTC.
pub fn best_hour(hourly: &Properties) -> Option<u32> {
    let mut counts: Vec<(u32, f64)> = hourly
        .iter()
        .filter_map(|(key, value)| {
            let hour = key.trim().parse::<u32>().ok().filter(|h| *h < 24)?;
            Some((hour, value.as_f64()?))
        })
        .collect();
    counts.sort_by_key(|(hour, _)| *hour);

    let mut best: Option<(u32, f64)> = None;
    for (hour, count) in counts {
        if count > best.map_or(0.0, |(_, max)| max) {
            best = Some((hour, count));
        }
    }
    best.map(|(hour, _)| hour)
}

/// Next moment at the best hour, or `None` to send immediately.
///
/// `None` also covers "no usable engagement data".
pub fn compute_send_time(hourly: &Properties, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let hour = best_hour(hourly)?;
    if hour == now.hour() {
        return None;
    }

    let today = now.date_naive().and_hms_opt(hour, 0, 0)?.and_utc();
    if today < now {
        today.checked_add_days(Days::new(1))
    } else {
        Some(today)
    }
}

/// Send time for an event, read from its `hourly` property.
pub fn send_time(event: &InboundEvent, clock: &dyn Clock) -> Option<DateTime<Utc>> {
    let Some(hourly) = event.hourly() else {
        tracing::debug!("event has no usable hourly data, sending now");
        return None;
    };
    compute_send_time(hourly, clock.now())
}

/// Text form used in the outbound `start_time` field.
pub fn format_start_time(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::TimeZone;

    fn hourly(json: &str) -> Properties {
        serde_json::from_str(json).unwrap()
    }

    fn at(d: u32, h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, d, h, m, 0).unwrap()
    }

    #[test]
    fn test_later_hour_is_today() {
        let sent = compute_send_time(&hourly(r#"{"9":5,"14":12}"#), at(19, 10, 0));
        assert_eq!(sent, Some(at(19, 14, 0)));
    }

    #[test]
    fn test_earlier_hour_is_tomorrow() {
        let sent = compute_send_time(&hourly(r#"{"9":12,"14":5}"#), at(19, 10, 0));
        assert_eq!(sent, Some(at(20, 9, 0)));
    }

    #[test]
    fn test_current_hour_sends_now() {
        let data = hourly(r#"{"10":40,"3":2}"#);
        assert_eq!(compute_send_time(&data, at(19, 10, 0)), None);
        assert_eq!(compute_send_time(&data, at(19, 10, 59)), None);
    }

    #[test]
    fn test_idempotent_for_fixed_clock() {
        let data = hourly(r#"{"1":3,"22":9,"7":4}"#);
        let now = at(19, 12, 30);
        let first = compute_send_time(&data, now);
        for _ in 0..5 {
            assert_eq!(compute_send_time(&data, now), first);
        }
        assert_eq!(first, Some(at(19, 22, 0)));
    }

    #[test]
    fn test_month_rollover() {
        let now = Utc.with_ymd_and_hms(2026, 10, 31, 23, 30, 0).unwrap();
        let sent = compute_send_time(&hourly(r#"{"5":1}"#), now).unwrap();
        assert_eq!(sent, Utc.with_ymd_and_hms(2026, 11, 1, 5, 0, 0).unwrap());
    }

    #[test]
    fn test_tie_prefers_lowest_hour() {
        // "10" sorts before "9" as a string; numeric order must decide.
        assert_eq!(best_hour(&hourly(r#"{"10":7,"9":7,"20":7}"#)), Some(9));
    }

    #[test]
    fn test_ignores_unusable_entries() {
        let data = hourly(r#"{"24":100,"-1":100,"noon":100,"8":"lots","6":2.5}"#);
        assert_eq!(best_hour(&data), Some(6));
    }

    #[test]
    fn test_no_positive_counts() {
        assert_eq!(best_hour(&hourly(r#"{"3":0,"4":0}"#)), None);
        assert_eq!(best_hour(&hourly("{}")), None);
        assert_eq!(compute_send_time(&hourly("{}"), at(19, 10, 0)), None);
    }

    #[test]
    fn test_send_time_from_event() {
        let clock = FixedClock(at(19, 10, 0));
        let event = InboundEvent::from_slice(
            br#"{"event":"viewed","properties":{"email":"a@b.com","hourly":{"9":5,"14":12}}}"#,
        )
        .unwrap();
        assert_eq!(send_time(&event, &clock), Some(at(19, 14, 0)));

        let no_data = InboundEvent::from_slice(br#"{"properties":{"hourly":[1,2]}}"#).unwrap();
        assert_eq!(send_time(&no_data, &clock), None);
    }

    #[test]
    fn test_format_start_time() {
        assert_eq!(format_start_time(at(19, 14, 0)), "2026-10-19T14:00:00Z");
    }
}
