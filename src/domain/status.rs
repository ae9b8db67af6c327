use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

use crate::domain::shift::ShiftWindow;

/// Grace period past shift end before a checkout counts as overtime.
/// Absorbs clock skew at the exact boundary.
const CHECK_OUT_TOLERANCE_SECS: i64 = 60;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CheckInStatus {
    OnTime,
    Late,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CheckOutStatus {
    OnTime,
    Overtime,
    LeftEarly,
}

/// Derived once at write time; the stored value is the source of truth and is
/// never recomputed from the timestamps downstream.
pub fn resolve_check_in(at: DateTime<Utc>, window: &ShiftWindow) -> CheckInStatus {
    if at <= window.start {
        CheckInStatus::OnTime
    } else {
        CheckInStatus::Late
    }
}

pub fn resolve_check_out(at: DateTime<Utc>, window: &ShiftWindow) -> CheckOutStatus {
    if at < window.end {
        CheckOutStatus::LeftEarly
    } else if at > window.end + Duration::seconds(CHECK_OUT_TOLERANCE_SECS) {
        CheckOutStatus::Overtime
    } else {
        CheckOutStatus::OnTime
    }
}

/// Straight wall-clock difference in hours. No unpaid-break deduction applies.
pub fn worked_hours(check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> f64 {
    (check_out - check_in).num_seconds() as f64 / 3600.0
}

/// Hours past shift end, counted only when the checkout resolved to overtime.
pub fn overtime_hours(status: CheckOutStatus, check_out: DateTime<Utc>, window: &ShiftWindow) -> f64 {
    match status {
        CheckOutStatus::Overtime => (check_out - window.end).num_seconds() as f64 / 3600.0,
        CheckOutStatus::OnTime | CheckOutStatus::LeftEarly => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shift::ShiftHours;
    use chrono::FixedOffset;

    fn window_11_to_19() -> ShiftWindow {
        let hours = ShiftHours::new(11, 19).unwrap();
        let offset = FixedOffset::east_opt(6 * 3600).unwrap();
        let reference = "2026-03-10T02:30:00Z".parse().unwrap();
        ShiftWindow::resolve(hours, reference, offset)
    }

    fn at(window: &ShiftWindow, h: i64, m: i64, s: i64) -> DateTime<Utc> {
        // offset from shift start, org-local 11:00
        window.start + Duration::hours(h - 11) + Duration::minutes(m) + Duration::seconds(s)
    }

    #[test]
    fn check_in_before_start_is_ontime() {
        let w = window_11_to_19();
        assert_eq!(resolve_check_in(at(&w, 10, 55, 0), &w), CheckInStatus::OnTime);
    }

    #[test]
    fn check_in_exactly_at_start_is_ontime() {
        let w = window_11_to_19();
        assert_eq!(resolve_check_in(w.start, &w), CheckInStatus::OnTime);
    }

    #[test]
    fn check_in_after_start_is_late() {
        let w = window_11_to_19();
        assert_eq!(resolve_check_in(at(&w, 11, 1, 0), &w), CheckInStatus::Late);
    }

    #[test]
    fn check_out_before_end_is_leftearly() {
        let w = window_11_to_19();
        assert_eq!(
            resolve_check_out(at(&w, 18, 59, 59), &w),
            CheckOutStatus::LeftEarly
        );
    }

    #[test]
    fn check_out_within_tolerance_is_ontime() {
        let w = window_11_to_19();
        assert_eq!(resolve_check_out(w.end, &w), CheckOutStatus::OnTime);
        assert_eq!(
            resolve_check_out(at(&w, 19, 0, 30), &w),
            CheckOutStatus::OnTime
        );
        assert_eq!(
            resolve_check_out(at(&w, 19, 1, 0), &w),
            CheckOutStatus::OnTime
        );
    }

    #[test]
    fn check_out_past_tolerance_is_overtime() {
        let w = window_11_to_19();
        assert_eq!(
            resolve_check_out(at(&w, 19, 1, 1), &w),
            CheckOutStatus::Overtime
        );
    }

    #[test]
    fn worked_hours_is_wall_clock_difference() {
        let w = window_11_to_19();
        let hours = worked_hours(at(&w, 11, 0, 0), at(&w, 19, 30, 0));
        assert!((hours - 8.5).abs() < 1e-9);
    }

    #[test]
    fn overtime_hours_counts_past_shift_end_only() {
        let w = window_11_to_19();
        let out = at(&w, 21, 0, 0);
        let status = resolve_check_out(out, &w);
        assert_eq!(status, CheckOutStatus::Overtime);
        assert!((overtime_hours(status, out, &w) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn overtime_hours_is_zero_when_not_overtime() {
        let w = window_11_to_19();
        let out = at(&w, 18, 0, 0);
        let status = resolve_check_out(out, &w);
        assert_eq!(overtime_hours(status, out, &w), 0.0);
    }

    #[test]
    fn status_strings_round_trip() {
        assert_eq!(CheckInStatus::OnTime.to_string(), "ontime");
        assert_eq!(CheckOutStatus::LeftEarly.to_string(), "leftearly");
        assert_eq!("overtime".parse(), Ok(CheckOutStatus::Overtime));
    }
}
