//! Street-cleaning schedule parsing.
//!
//! Source strings look like `"Onsdag 10:00-12:00"`, `"Fredag"` or
//! `"Tisdag hela dagen"`. Parsing never fails: anything that is not a clean
//! `<start>-<end>` range degrades to a full-day schedule.

use swedespot_core::CleaningSchedule;

/// Marker for "all day" in Swedish schedule text (`"hela dagen"`).
const FULL_DAY_MARKER: &str = "hela";

/// Parses a compact cleaning-schedule string.
///
/// Returns `None` for an empty or whitespace-only string.
#[must_use]
pub fn parse_cleaning_schedule(raw: &str) -> Option<CleaningSchedule> {
    let mut tokens = raw.split_whitespace();
    let day = tokens.next()?.to_string();

    let Some(range) = tokens.next() else {
        return Some(full_day(day));
    };

    if range.to_lowercase().contains(FULL_DAY_MARKER) {
        return Some(full_day(day));
    }

    match parse_time_range(range) {
        Some((start, end)) => Some(CleaningSchedule {
            day,
            start_time: Some(start.to_string()),
            end_time: Some(end.to_string()),
            full_day: false,
        }),
        None => {
            tracing::debug!(schedule = raw, "unparsable cleaning time range, assuming full day");
            Some(full_day(day))
        }
    }
}

fn full_day(day: String) -> CleaningSchedule {
    CleaningSchedule {
        day,
        start_time: None,
        end_time: None,
        full_day: true,
    }
}

fn parse_time_range(token: &str) -> Option<(&str, &str)> {
    let (start, end) = token.split_once('-')?;
    (is_clock_time(start) && is_clock_time(end)).then_some((start, end))
}

/// Accepts `HH:MM`, `H:MM`, `HH.MM` or a bare hour `0..=24`.
fn is_clock_time(s: &str) -> bool {
    let Some((hours, minutes)) = s.split_once([':', '.']) else {
        return is_hour(s);
    };
    is_hour(hours)
        && minutes.len() == 2
        && minutes.chars().all(|c| c.is_ascii_digit())
        && minutes.parse::<u8>().is_ok_and(|m| m < 60)
}

fn is_hour(s: &str) -> bool {
    (1..=2).contains(&s.len())
        && s.chars().all(|c| c.is_ascii_digit())
        && s.parse::<u8>().is_ok_and(|h| h <= 24)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_day_with_time_range() {
        let s = parse_cleaning_schedule("Onsdag 10:00-12:00").unwrap();
        assert_eq!(s.day, "Onsdag");
        assert_eq!(s.start_time.as_deref(), Some("10:00"));
        assert_eq!(s.end_time.as_deref(), Some("12:00"));
        assert!(!s.full_day);
    }

    #[test]
    fn day_without_time_is_full_day() {
        let s = parse_cleaning_schedule("Fredag").unwrap();
        assert_eq!(s.day, "Fredag");
        assert!(s.full_day);
        assert!(s.start_time.is_none());
        assert!(s.end_time.is_none());
    }

    #[test]
    fn hela_dagen_is_full_day() {
        let s = parse_cleaning_schedule("Tisdag hela dagen").unwrap();
        assert_eq!(s.day, "Tisdag");
        assert!(s.full_day);
        assert!(s.start_time.is_none());

        let s = parse_cleaning_schedule("Tisdag HELA").unwrap();
        assert!(s.full_day);
    }

    #[test]
    fn accepts_bare_hours_and_dotted_times() {
        let s = parse_cleaning_schedule("Måndag 8-16").unwrap();
        assert_eq!(s.start_time.as_deref(), Some("8"));
        assert_eq!(s.end_time.as_deref(), Some("16"));
        assert!(!s.full_day);

        let s = parse_cleaning_schedule("Torsdag 07.30-09.00").unwrap();
        assert_eq!(s.start_time.as_deref(), Some("07.30"));
        assert_eq!(s.end_time.as_deref(), Some("09.00"));
    }

    #[test]
    fn malformed_range_degrades_to_full_day() {
        for raw in [
            "Onsdag 10:00-",
            "Onsdag -12:00",
            "Onsdag 10:00",
            "Onsdag 25:00-26:00",
            "Onsdag 10:75-11:00",
            "Onsdag morgon",
            "Onsdag 10:0-12:00",
        ] {
            let s = parse_cleaning_schedule(raw).unwrap();
            assert_eq!(s.day, "Onsdag", "{raw}");
            assert!(s.full_day, "{raw} should degrade to full day");
            assert!(s.start_time.is_none(), "{raw}");
            assert!(s.end_time.is_none(), "{raw}");
        }
    }

    #[test]
    fn collapses_repeated_whitespace() {
        let s = parse_cleaning_schedule("  Onsdag   10:00-12:00 ").unwrap();
        assert_eq!(s.day, "Onsdag");
        assert_eq!(s.start_time.as_deref(), Some("10:00"));
    }

    #[test]
    fn empty_string_has_no_schedule() {
        assert!(parse_cleaning_schedule("").is_none());
        assert!(parse_cleaning_schedule("   ").is_none());
    }
}
