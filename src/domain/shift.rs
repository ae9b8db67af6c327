use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};

use crate::error::ApiError;

/// A worker's configured daily shift, in whole org-local hours.
///
/// Shifts never cross midnight: `start < end` within one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftHours {
    start: u8,
    end: u8,
}

impl ShiftHours {
    pub fn new(start: u8, end: u8) -> Result<Self, ApiError> {
        if start > 23 || end > 23 {
            return Err(ApiError::Validation(
                "shift hours must be within 0-23".into(),
            ));
        }
        if start >= end {
            return Err(ApiError::Validation(
                "shift_start_hour must be before shift_end_hour".into(),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn start_hour(&self) -> u8 {
        self.start
    }

    pub fn end_hour(&self) -> u8 {
        self.end
    }
}

/// The resolved shift boundaries for one org-local calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftWindow {
    /// Org-local calendar date the window belongs to. Attendance rows key on it.
    pub date: NaiveDate,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ShiftWindow {
    /// Resolves the shift window for the org-local day containing `reference`.
    ///
    /// Pure and stable: same inputs always yield the same window, so callers
    /// may recompute freely.
    pub fn resolve(hours: ShiftHours, reference: DateTime<Utc>, org_offset: FixedOffset) -> Self {
        let date = reference.with_timezone(&org_offset).date_naive();
        Self {
            date,
            start: wall_clock_to_utc(date, hours.start, org_offset),
            end: wall_clock_to_utc(date, hours.end, org_offset),
        }
    }
}

fn wall_clock_to_utc(date: NaiveDate, hour: u8, org_offset: FixedOffset) -> DateTime<Utc> {
    let wall = date
        .and_hms_opt(u32::from(hour), 0, 0)
        .expect("hour validated to 0-23");
    let shifted = wall - Duration::seconds(i64::from(org_offset.local_minus_utc()));
    Utc.from_utc_datetime(&shifted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dhaka() -> FixedOffset {
        FixedOffset::east_opt(6 * 3600).unwrap()
    }

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn rejects_midnight_crossing_shift() {
        assert!(ShiftHours::new(22, 6).is_err());
        assert!(ShiftHours::new(9, 9).is_err());
    }

    #[test]
    fn rejects_out_of_range_hours() {
        assert!(ShiftHours::new(9, 24).is_err());
        assert!(ShiftHours::new(25, 26).is_err());
    }

    #[test]
    fn resolves_window_in_org_offset() {
        let hours = ShiftHours::new(11, 19).unwrap();
        // 08:30 Dhaka time on 2026-03-10
        let reference = utc("2026-03-10T02:30:00Z");
        let window = ShiftWindow::resolve(hours, reference, dhaka());

        assert_eq!(window.date, NaiveDate::from_ymd_opt(2026, 3, 10).unwrap());
        assert_eq!(window.start, utc("2026-03-10T05:00:00Z")); // 11:00 +06:00
        assert_eq!(window.end, utc("2026-03-10T13:00:00Z")); // 19:00 +06:00
    }

    #[test]
    fn reference_near_utc_midnight_stays_on_local_day() {
        let hours = ShiftHours::new(9, 17).unwrap();
        // 23:00 UTC is already 05:00 next day in Dhaka
        let reference = utc("2026-03-10T23:00:00Z");
        let window = ShiftWindow::resolve(hours, reference, dhaka());

        assert_eq!(window.date, NaiveDate::from_ymd_opt(2026, 3, 11).unwrap());
        assert_eq!(window.start, utc("2026-03-11T03:00:00Z"));
    }

    #[test]
    fn resolution_is_stable_under_repeated_calls() {
        let hours = ShiftHours::new(11, 19).unwrap();
        let reference = utc("2026-03-10T02:30:00Z");
        let first = ShiftWindow::resolve(hours, reference, dhaka());
        let second = ShiftWindow::resolve(hours, reference, dhaka());
        assert_eq!(first, second);
    }

    #[test]
    fn western_offset_resolves_previous_utc_day() {
        let hours = ShiftHours::new(9, 17).unwrap();
        let newyork = FixedOffset::west_opt(5 * 3600).unwrap();
        // 03:00 UTC on the 11th is 22:00 on the 10th in -05:00
        let reference = utc("2026-03-11T03:00:00Z");
        let window = ShiftWindow::resolve(hours, reference, newyork);

        assert_eq!(window.date, NaiveDate::from_ymd_opt(2026, 3, 10).unwrap());
        assert_eq!(window.start, utc("2026-03-10T14:00:00Z"));
    }
}
