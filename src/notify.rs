use chrono::NaiveDate;
use serde::Serialize;
use strum_macros::Display;
use uuid::Uuid;

/// Lifecycle events handed to the notification sink. The engine guarantees the
/// content is correct at emission time; delivery is the sink's problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    LeaveApproved,
    LeaveRejected,
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationEvent {
    pub id: String,
    pub kind: NotificationKind,
    pub employee_id: u64,
    pub payload: serde_json::Value,
}

impl NotificationEvent {
    pub fn leave_approved(
        employee_id: u64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        total_days: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind: NotificationKind::LeaveApproved,
            employee_id,
            payload: serde_json::json!({
                "start_date": start_date,
                "end_date": end_date,
                "total_days": total_days,
            }),
        }
    }

    pub fn leave_rejected(
        employee_id: u64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: &str,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind: NotificationKind::LeaveRejected,
            employee_id,
            payload: serde_json::json!({
                "start_date": start_date,
                "end_date": end_date,
                "reason": reason,
            }),
        }
    }
}

/// Delivery boundary. Implementations must not block the request for long;
/// the engine treats every emission as best-effort.
pub trait NotificationSink: Send + Sync {
    fn emit(&self, event: &NotificationEvent) -> anyhow::Result<()>;
}

/// Default sink: records the event in the application log. Real delivery
/// (mail, push) plugs in behind the same trait.
pub struct LogSink;

impl NotificationSink for LogSink {
    fn emit(&self, event: &NotificationEvent) -> anyhow::Result<()> {
        tracing::info!(
            event_id = %event.id,
            kind = %event.kind,
            employee_id = event.employee_id,
            payload = %event.payload,
            "notification emitted"
        );
        Ok(())
    }
}

/// Fires the event after the owning transaction committed. A sink failure is
/// logged and swallowed; it must never surface to the caller or undo the
/// state transition that triggered it.
pub fn emit_best_effort(sink: &dyn NotificationSink, event: NotificationEvent) {
    if let Err(e) = sink.emit(&event) {
        tracing::warn!(
            error = %e,
            event_id = %event.id,
            kind = %event.kind,
            employee_id = event.employee_id,
            "notification emission failed; state transition already committed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct FailingSink;

    impl NotificationSink for FailingSink {
        fn emit(&self, _event: &NotificationEvent) -> anyhow::Result<()> {
            anyhow::bail!("sink unavailable")
        }
    }

    struct RecordingSink {
        seen: Mutex<Vec<NotificationEvent>>,
    }

    impl NotificationSink for RecordingSink {
        fn emit(&self, event: &NotificationEvent) -> anyhow::Result<()> {
            self.seen.lock().unwrap().push(event.clone());
            Ok(())
        }
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn emission_failure_is_swallowed() {
        let event = NotificationEvent::leave_approved(7, date("2026-04-01"), date("2026-04-02"), 2.0);
        // must not panic or propagate
        emit_best_effort(&FailingSink, event);
    }

    #[test]
    fn approved_event_carries_date_range_and_days() {
        let sink = RecordingSink {
            seen: Mutex::new(Vec::new()),
        };
        let event = NotificationEvent::leave_approved(7, date("2026-04-01"), date("2026-04-03"), 3.0);
        emit_best_effort(&sink, event);

        let seen = sink.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].kind, NotificationKind::LeaveApproved);
        assert_eq!(seen[0].employee_id, 7);
        assert_eq!(seen[0].payload["total_days"], 3.0);
    }

    #[test]
    fn rejected_event_carries_reason() {
        let event =
            NotificationEvent::leave_rejected(9, date("2026-04-01"), date("2026-04-01"), "no cover");
        assert_eq!(event.kind, NotificationKind::LeaveRejected);
        assert_eq!(event.payload["reason"], "no cover");
    }
}
