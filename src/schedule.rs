//! Booking scheduling rules: time-range validation, conflict detection
//! and id assignment. Pure functions over a slice of bookings, so they
//! are exercised without touching the store.

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::models::Booking;

/// A requested range is valid only if the end is strictly after the
/// start. Zero-length and inverted ranges are rejected.
pub fn validate_time_range(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<()> {
    if end > start {
        Ok(())
    } else {
        Err(Error::EndNotAfterStart)
    }
}

/// First booking, in store order, whose interval overlaps the candidate
/// range under the half-open test. Completion status and ownership are
/// ignored: a completed booking still blocks its time range, and a user
/// conflicts with their own bookings. When several bookings overlap,
/// which one is returned follows store order; callers should only rely
/// on whether a conflict exists.
pub fn find_conflict(
    bookings: &[Booking],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Option<&Booking> {
    bookings.iter().find(|b| b.overlaps(start, end))
}

/// Time-derived booking id, bumped past any id already present so two
/// bookings created within the same millisecond stay distinct.
pub fn next_booking_id(bookings: &[Booking], now: DateTime<Utc>) -> i64 {
    let mut id = now.timestamp_millis();
    while bookings.iter().any(|b| b.id == id) {
        id += 1;
    }
    id
}

/// Bookings that have not yet ended, soonest start first.
pub fn upcoming(bookings: &[Booking], now: DateTime<Utc>) -> Vec<Booking> {
    let mut upcoming: Vec<Booking> = bookings
        .iter()
        .filter(|b| b.end_time > now)
        .cloned()
        .collect();
    upcoming.sort_by_key(|b| b.start_time);
    upcoming
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, h, m, 0).unwrap()
    }

    fn booking(id: i64, user_id: i64, start: DateTime<Utc>, end: DateTime<Utc>) -> Booking {
        Booking {
            id,
            user_id,
            display_name: format!("user-{user_id}"),
            start_time: start,
            end_time: end,
            completed: false,
            actual_duration: None,
            distance: None,
        }
    }

    #[test]
    fn rejects_end_before_start() {
        assert!(matches!(
            validate_time_range(ts(11, 0), ts(10, 0)),
            Err(Error::EndNotAfterStart)
        ));
    }

    #[test]
    fn rejects_zero_length_range() {
        assert!(matches!(
            validate_time_range(ts(10, 0), ts(10, 0)),
            Err(Error::EndNotAfterStart)
        ));
    }

    #[test]
    fn accepts_forward_range() {
        assert!(validate_time_range(ts(10, 0), ts(10, 1)).is_ok());
    }

    #[test]
    fn detects_partial_and_full_overlap() {
        let existing = vec![booking(1, 1, ts(10, 0), ts(11, 0))];

        // overlapping the tail
        assert!(find_conflict(&existing, ts(10, 30), ts(11, 30)).is_some());
        // overlapping the head
        assert!(find_conflict(&existing, ts(9, 30), ts(10, 30)).is_some());
        // contained
        assert!(find_conflict(&existing, ts(10, 15), ts(10, 45)).is_some());
        // containing
        assert!(find_conflict(&existing, ts(9, 0), ts(12, 0)).is_some());
        // identical
        assert!(find_conflict(&existing, ts(10, 0), ts(11, 0)).is_some());
    }

    #[test]
    fn back_to_back_ranges_do_not_conflict() {
        let existing = vec![booking(1, 1, ts(10, 0), ts(11, 0))];

        assert!(find_conflict(&existing, ts(11, 0), ts(12, 0)).is_none());
        assert!(find_conflict(&existing, ts(9, 0), ts(10, 0)).is_none());
    }

    #[test]
    fn conflict_ignores_completion_and_ownership() {
        let mut completed = booking(1, 1, ts(10, 0), ts(11, 0));
        completed.completed = true;
        let existing = vec![completed];

        // completed booking still blocks its range, even for its owner
        let conflict = find_conflict(&existing, ts(10, 30), ts(11, 30));
        assert_eq!(conflict.map(|b| b.id), Some(1));
    }

    #[test]
    fn conflict_reports_first_match_in_store_order() {
        let existing = vec![
            booking(2, 1, ts(12, 0), ts(13, 0)),
            booking(1, 1, ts(10, 0), ts(11, 0)),
        ];

        // both overlap the candidate; store order wins, not time order
        let conflict = find_conflict(&existing, ts(10, 30), ts(12, 30));
        assert_eq!(conflict.map(|b| b.id), Some(2));
    }

    #[test]
    fn conflict_check_is_idempotent() {
        let existing = vec![booking(1, 1, ts(10, 0), ts(11, 0))];

        let first = find_conflict(&existing, ts(10, 30), ts(11, 30)).map(|b| b.id);
        let second = find_conflict(&existing, ts(10, 30), ts(11, 30)).map(|b| b.id);
        assert_eq!(first, second);
    }

    #[test]
    fn id_generation_skips_taken_ids() {
        let now = ts(10, 0);
        let existing = vec![
            booking(now.timestamp_millis(), 1, ts(8, 0), ts(9, 0)),
            booking(now.timestamp_millis() + 1, 1, ts(9, 0), ts(9, 30)),
        ];

        assert_eq!(next_booking_id(&existing, now), now.timestamp_millis() + 2);
        assert_eq!(next_booking_id(&[], now), now.timestamp_millis());
    }

    #[test]
    fn upcoming_filters_ended_and_sorts_by_start() {
        let bookings = vec![
            booking(3, 1, ts(14, 0), ts(15, 0)),
            booking(1, 1, ts(8, 0), ts(9, 0)),
            booking(2, 2, ts(11, 30), ts(12, 30)),
        ];

        let result = upcoming(&bookings, ts(12, 0));
        let ids: Vec<i64> = result.iter().map(|b| b.id).collect();
        // booking 2 is in progress (end > now) and therefore kept
        assert_eq!(ids, vec![2, 3]);
    }
}
