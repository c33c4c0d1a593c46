//! Pure aggregation over session snapshots.
//!
//! Everything here is stateless: callers load a snapshot from the store and
//! pass it in, so the same inputs always produce the same statistics.

use chrono::{Datelike, Duration, NaiveDate};

use crate::model::Session;

/// Days charted per week window.
pub const DAYS_PER_WEEK: usize = 7;

/// One day's aggregated hours within a 7-day chart window.
#[derive(Debug, Clone, PartialEq)]
pub struct DayBucket {
    /// Short weekday label ("Sun" .. "Sat").
    pub label: String,
    /// Studied hours for the day, rounded to 2 decimal places.
    pub hours: f64,
}

/// Sum of all session durations, in seconds.
#[must_use]
pub fn total_duration(sessions: &[Session]) -> u64 {
    sessions
        .iter()
        .map(|session| u64::from(session.duration_secs()))
        .sum()
}

/// Sum of session durations on an exact date, in seconds.
#[must_use]
pub fn total_duration_on(sessions: &[Session], date: NaiveDate) -> u64 {
    sessions
        .iter()
        .filter(|session| session.date() == date)
        .map(|session| u64::from(session.duration_secs()))
        .sum()
}

/// Total hours divided by a fixed 7, regardless of how many days have data.
///
/// Days without sessions still count toward the average; this is not the
/// average over days with recorded sessions.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_daily_hours(sessions: &[Session]) -> f64 {
    total_duration(sessions) as f64 / 3600.0 / 7.0
}

/// Sunday that starts the week `week_offset` weeks before the week
/// containing `today`.
#[must_use]
pub fn week_start(today: NaiveDate, week_offset: u32) -> NaiveDate {
    let days_back =
        i64::from(today.weekday().num_days_from_sunday()) + i64::from(week_offset) * 7;
    today - Duration::days(days_back)
}

/// Hours studied per day over the Sunday-to-Saturday window selected by
/// `week_offset` (0 = the week containing `today`).
///
/// Always returns exactly 7 buckets, zero-filled where no sessions match.
#[must_use]
pub fn weekly_buckets(
    sessions: &[Session],
    week_offset: u32,
    today: NaiveDate,
) -> Vec<DayBucket> {
    let start = week_start(today, week_offset);
    (0..DAYS_PER_WEEK as i64)
        .map(|offset| {
            let day = start + Duration::days(offset);
            DayBucket {
                label: day.format("%a").to_string(),
                hours: round_hours(total_duration_on(sessions, day)),
            }
        })
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn round_hours(seconds: u64) -> f64 {
    let hours = seconds as f64 / 3600.0;
    (hours * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Session, SessionId};

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn session(id: i64, subject: &str, duration_secs: u32, on: &str) -> Session {
        Session::from_persisted(SessionId::new(id), subject, duration_secs, date(on), "10:00:00")
            .unwrap()
    }

    #[test]
    fn empty_input_yields_zero_everywhere() {
        assert_eq!(total_duration(&[]), 0);
        assert_eq!(total_duration_on(&[], date("2024-01-01")), 0);
        assert_eq!(average_daily_hours(&[]), 0.0);

        let buckets = weekly_buckets(&[], 0, date("2024-01-03"));
        assert_eq!(buckets.len(), 7);
        assert!(buckets.iter().all(|bucket| bucket.hours == 0.0));
    }

    #[test]
    fn total_duration_on_matches_exact_date() {
        let sessions = vec![
            session(1, "Math", 1800, "2024-01-01"),
            session(2, "Math", 3600, "2024-01-01"),
            session(3, "Polity", 600, "2024-01-02"),
        ];
        assert_eq!(total_duration_on(&sessions, date("2024-01-01")), 5400);
        assert_eq!(total_duration(&sessions), 6000);
    }

    #[test]
    fn average_divides_by_fixed_seven() {
        // 7 hours across a single day still averages 1 hour per day.
        let sessions = vec![session(1, "Math", 7 * 3600, "2024-01-01")];
        assert!((average_daily_hours(&sessions) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn week_window_starts_on_sunday() {
        // 2024-01-03 is a Wednesday; its week starts Sunday 2023-12-31.
        assert_eq!(week_start(date("2024-01-03"), 0), date("2023-12-31"));
        assert_eq!(week_start(date("2024-01-03"), 1), date("2023-12-24"));
        // A Sunday is its own week start.
        assert_eq!(week_start(date("2023-12-31"), 0), date("2023-12-31"));
    }

    #[test]
    fn buckets_place_sessions_on_their_weekday() {
        let sessions = vec![
            session(1, "Math", 5400, "2024-01-01"),  // Monday
            session(2, "Polity", 3600, "2024-01-06"), // Saturday
        ];
        let buckets = weekly_buckets(&sessions, 0, date("2024-01-03"));

        assert_eq!(buckets.len(), 7);
        assert_eq!(buckets[0].label, "Sun");
        assert_eq!(buckets[6].label, "Sat");
        assert!((buckets[1].hours - 1.5).abs() < 1e-9);
        assert!((buckets[6].hours - 1.0).abs() < 1e-9);
        assert_eq!(buckets[0].hours, 0.0);
    }

    #[test]
    fn bucket_hours_round_to_two_decimals() {
        // 1000 seconds = 0.2777.. hours, rounds to 0.28.
        let sessions = vec![session(1, "Math", 1000, "2024-01-01")];
        let buckets = weekly_buckets(&sessions, 0, date("2024-01-03"));
        assert!((buckets[1].hours - 0.28).abs() < 1e-9);
    }

    #[test]
    fn offset_navigation_is_idempotent() {
        let sessions = vec![
            session(1, "Math", 5400, "2024-01-01"),
            session(2, "Math", 1800, "2023-12-27"),
        ];
        let today = date("2024-01-03");

        let current = weekly_buckets(&sessions, 0, today);
        let _previous = weekly_buckets(&sessions, 1, today);
        let back = weekly_buckets(&sessions, 0, today);

        assert_eq!(current, back);
    }

    #[test]
    fn previous_week_sees_only_its_sessions() {
        let sessions = vec![
            session(1, "Math", 5400, "2024-01-01"),
            session(2, "Math", 1800, "2023-12-27"), // Wednesday, previous week
        ];
        let buckets = weekly_buckets(&sessions, 1, date("2024-01-03"));
        assert!((buckets[3].hours - 0.5).abs() < 1e-9);
        assert!((buckets.iter().map(|b| b.hours).sum::<f64>() - 0.5).abs() < 1e-9);
    }
}
