use chrono::FixedOffset;
use dotenvy::dotenv;
use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,

    /// Fixed organizational timezone, as minutes east of UTC.
    /// All shift windows and attendance dates resolve against it.
    pub org_utc_offset_minutes: i32,

    // Rate limiting
    pub rate_protected_per_min: u32,

    pub api_prefix: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),

            org_utc_offset_minutes: env::var("ORG_UTC_OFFSET_MINUTES")
                .unwrap_or_else(|_| "360".to_string()) // default +06:00
                .parse()
                .unwrap(),

            rate_protected_per_min: env::var("RATE_PROTECTED_PER_MIN")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap(),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
        }
    }

    pub fn org_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.org_utc_offset_minutes * 60)
            .expect("ORG_UTC_OFFSET_MINUTES out of range")
    }
}
