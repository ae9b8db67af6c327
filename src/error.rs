use actix_web::{HttpResponse, http::StatusCode};
use derive_more::Display;

/// Engine error taxonomy. Each variant keeps a stable machine-readable kind so
/// callers can branch ("already handled" vs. generic failure) instead of
/// string-matching messages.
#[derive(Debug, Display, PartialEq)]
pub enum ApiError {
    /// Malformed input, rejected before any write.
    #[display(fmt = "{}", _0)]
    Validation(String),

    #[display(fmt = "rejection reason must not be empty")]
    EmptyReason,

    #[display(fmt = "Already checked in today")]
    AlreadyCheckedIn,

    #[display(fmt = "Already checked out today")]
    AlreadyCheckedOut,

    #[display(fmt = "No active check-in found for today")]
    NotCheckedIn,

    #[display(fmt = "Leave request already processed")]
    AlreadyProcessed,

    #[display(
        fmt = "Insufficient leave balance: requested {} day(s), {} available",
        requested,
        available
    )]
    InsufficientBalance { requested: f64, available: f64 },

    #[display(fmt = "Only the requester may cancel this leave request")]
    NotOwner,

    #[display(fmt = "{}", _0)]
    Forbidden(&'static str),

    #[display(fmt = "{} not found", _0)]
    NotFound(&'static str),

    #[display(fmt = "Unauthorized")]
    Unauthorized,

    #[display(fmt = "Internal Server Error")]
    Internal,
}

impl ApiError {
    /// Stable kind identifier carried in every error body.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation",
            ApiError::EmptyReason => "empty_reason",
            ApiError::AlreadyCheckedIn => "already_checked_in",
            ApiError::AlreadyCheckedOut => "already_checked_out",
            ApiError::NotCheckedIn => "not_checked_in",
            ApiError::AlreadyProcessed => "already_processed",
            ApiError::InsufficientBalance { .. } => "insufficient_balance",
            ApiError::NotOwner => "not_owner",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::NotFound(_) => "not_found",
            ApiError::Unauthorized => "unauthorized",
            ApiError::Internal => "internal",
        }
    }
}

impl actix_web::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::EmptyReason => StatusCode::BAD_REQUEST,
            ApiError::AlreadyCheckedIn
            | ApiError::AlreadyCheckedOut
            | ApiError::NotCheckedIn
            | ApiError::AlreadyProcessed
            | ApiError::InsufficientBalance { .. } => StatusCode::CONFLICT,
            ApiError::NotOwner | ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "message": self.to_string(),
            "error": self.kind(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn state_conflicts_map_to_409() {
        assert_eq!(ApiError::AlreadyCheckedIn.status_code(), StatusCode::CONFLICT);
        assert_eq!(ApiError::AlreadyProcessed.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::InsufficientBalance {
                requested: 3.0,
                available: 2.0
            }
            .status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn validation_maps_to_400() {
        assert_eq!(
            ApiError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::EmptyReason.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn kinds_are_stable() {
        assert_eq!(ApiError::NotCheckedIn.kind(), "not_checked_in");
        assert_eq!(ApiError::NotFound("leave request").kind(), "not_found");
    }

    #[test]
    fn insufficient_balance_message_names_both_sides() {
        let err = ApiError::InsufficientBalance {
            requested: 3.0,
            available: 2.0,
        };
        let msg = err.to_string();
        assert!(msg.contains('3'));
        assert!(msg.contains('2'));
    }
}
