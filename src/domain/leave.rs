use chrono::NaiveDate;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

use crate::error::ApiError;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LeaveType {
    Annual,
    Sick,
    Unpaid,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    Full,
    Half,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl LeaveStatus {
    /// Terminal states admit no further transition.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, LeaveStatus::Pending)
    }
}

/// Annual quota policy for one leave type. `quota: None` means the type is
/// quota-free and never touches the balance ledger (e.g. unpaid leave).
#[derive(Debug, Clone, Copy)]
pub struct LeavePolicy {
    pub leave_type: LeaveType,
    pub annual_quota: Option<f64>,
}

pub static LEAVE_CATALOG: Lazy<Vec<LeavePolicy>> = Lazy::new(|| {
    vec![
        LeavePolicy {
            leave_type: LeaveType::Annual,
            annual_quota: Some(20.0),
        },
        LeavePolicy {
            leave_type: LeaveType::Sick,
            annual_quota: Some(10.0),
        },
        LeavePolicy {
            leave_type: LeaveType::Unpaid,
            annual_quota: None,
        },
    ]
});

pub fn policy_for(leave_type: LeaveType) -> LeavePolicy {
    *LEAVE_CATALOG
        .iter()
        .find(|p| p.leave_type == leave_type)
        .expect("catalog covers every leave type")
}

/// A submitted date range, validated before any write happens.
#[derive(Debug, Clone, Copy)]
pub struct LeaveSpan {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub day_type: DayType,
    pub total_days: f64,
}

impl LeaveSpan {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate, day_type: DayType) -> Result<Self, ApiError> {
        if start_date > end_date {
            return Err(ApiError::Validation(
                "start_date cannot be after end_date".into(),
            ));
        }
        let span_days = (end_date - start_date).num_days() + 1;
        let total_days = match day_type {
            DayType::Full => span_days as f64,
            DayType::Half => {
                if span_days != 1 {
                    return Err(ApiError::Validation(
                        "half-day leave must cover exactly one day".into(),
                    ));
                }
                0.5
            }
        };
        Ok(Self {
            start_date,
            end_date,
            day_type,
            total_days,
        })
    }

    /// Benefit year the request draws from.
    pub fn ledger_year(&self) -> i32 {
        use chrono::Datelike;
        self.start_date.year()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn full_day_span_counts_inclusive_days() {
        let span = LeaveSpan::new(date("2026-04-01"), date("2026-04-03"), DayType::Full).unwrap();
        assert_eq!(span.total_days, 3.0);
    }

    #[test]
    fn single_full_day_is_one() {
        let span = LeaveSpan::new(date("2026-04-01"), date("2026-04-01"), DayType::Full).unwrap();
        assert_eq!(span.total_days, 1.0);
    }

    #[test]
    fn half_day_resolves_to_half() {
        let span = LeaveSpan::new(date("2026-04-01"), date("2026-04-01"), DayType::Half).unwrap();
        assert_eq!(span.total_days, 0.5);
    }

    #[test]
    fn half_day_over_multiple_days_is_rejected() {
        let err = LeaveSpan::new(date("2026-04-01"), date("2026-04-02"), DayType::Half);
        assert!(err.is_err());
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = LeaveSpan::new(date("2026-04-03"), date("2026-04-01"), DayType::Full);
        assert!(err.is_err());
    }

    #[test]
    fn ledger_year_follows_start_date() {
        let span = LeaveSpan::new(date("2026-12-30"), date("2027-01-02"), DayType::Full).unwrap();
        assert_eq!(span.ledger_year(), 2026);
    }

    #[test]
    fn terminal_states() {
        assert!(!LeaveStatus::Pending.is_terminal());
        assert!(LeaveStatus::Approved.is_terminal());
        assert!(LeaveStatus::Rejected.is_terminal());
        assert!(LeaveStatus::Cancelled.is_terminal());
    }

    #[test]
    fn unpaid_leave_is_quota_free() {
        assert!(policy_for(LeaveType::Unpaid).annual_quota.is_none());
        assert_eq!(policy_for(LeaveType::Annual).annual_quota, Some(20.0));
    }

    #[test]
    fn leave_type_strings_round_trip() {
        assert_eq!(LeaveType::Annual.to_string(), "annual");
        assert_eq!("sick".parse(), Ok(LeaveType::Sick));
        assert_eq!(LeaveStatus::Pending.to_string(), "pending");
    }
}
