use serde::{Deserialize, Serialize};

/// Claims minted by the identity subsystem. Token issuance lives outside this
/// service; we only verify and consume.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    pub sub: String,
    pub role: u8, // role id
    pub exp: usize,
    pub jti: String,

    pub token_type: TokenType,
    /// Present only if this user is linked to an employee record
    pub employee_id: Option<u64>,

    /// Configured shift window, in whole org-local hours (0-23, start < end)
    pub shift_start_hour: u8,
    pub shift_end_hour: u8,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub enum TokenType {
    Access,
    Refresh,
}
