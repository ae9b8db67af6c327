use crate::config::Config;
use crate::domain::shift::ShiftHours;
use crate::error::ApiError;
use crate::model::role::Role;
use crate::models::Claims;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web::Data};
use futures::future::{Ready, ready};
use jsonwebtoken::decode;
use jsonwebtoken::{DecodingKey, Validation};

pub struct AuthUser {
    pub user_id: u64,
    pub username: String,
    pub role: Role,

    /// Present only if this user is linked to an employee record
    pub employee_id: Option<u64>,

    pub shift_start_hour: u8,
    pub shift_end_hour: u8,
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let token = match req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
        {
            Some(t) => t,
            None => return ready(Err(ApiError::Unauthorized.into())),
        };

        let config = match req.app_data::<Data<Config>>() {
            Some(c) => c,
            None => return ready(Err(ApiError::Internal.into())),
        };

        let data = match decode::<Claims>(
            token,
            &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            &Validation::default(),
        ) {
            Ok(d) => d,
            Err(_) => return ready(Err(ApiError::Unauthorized.into())),
        };

        let role = match Role::from_id(data.claims.role) {
            Some(r) => r,
            None => return ready(Err(ApiError::Unauthorized.into())),
        };

        ready(Ok(AuthUser {
            user_id: data.claims.user_id,
            username: data.claims.sub,
            role,
            employee_id: data.claims.employee_id,
            shift_start_hour: data.claims.shift_start_hour,
            shift_end_hour: data.claims.shift_end_hour,
        }))
    }
}

impl AuthUser {
    pub fn require_hr_admin(&self) -> Result<(), ApiError> {
        if self.role == Role::HrAdmin {
            Ok(())
        } else {
            Err(ApiError::Forbidden("HR admin only"))
        }
    }

    /// Engine operations act on the employee record linked to the caller.
    pub fn employee_id(&self) -> Result<u64, ApiError> {
        self.employee_id
            .ok_or(ApiError::Forbidden("No employee profile"))
    }

    /// The caller's configured shift, validated (midnight-crossing configs fail).
    pub fn shift_hours(&self) -> Result<ShiftHours, ApiError> {
        ShiftHours::new(self.shift_start_hour, self.shift_end_hour)
    }

    pub fn is_hr_admin(&self) -> bool {
        self.role == Role::HrAdmin
    }
}
