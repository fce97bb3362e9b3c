use crate::domain::anomaly::WorkPolicy;
use chrono::NaiveTime;
use dotenvy::dotenv;
use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub access_token_ttl: usize,
    pub refresh_token_ttl: usize,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_register_per_min: u32,
    pub rate_refresh_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,

    // Notification dispatch loop
    pub dispatch_interval_secs: u64,

    // Startup seeding
    pub seed_retry_attempts: u32,
    pub seed_retry_delay_secs: u64,

    // Attendance policy thresholds
    pub work_start: NaiveTime,
    pub work_end: NaiveTime,
    pub minimum_work_hours: f64,
    pub standard_work_hours: f64,
    pub overtime_threshold_hours: f64,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            access_token_ttl: env_or("ACCESS_TOKEN_TTL", "900") // default 15 min
                .parse()
                .expect("ACCESS_TOKEN_TTL must be a number"),
            refresh_token_ttl: env_or("REFRESH_TOKEN_TTL", "604800") // default 7 days
                .parse()
                .expect("REFRESH_TOKEN_TTL must be a number"),

            rate_login_per_min: env_or("RATE_LOGIN_PER_MIN", "60")
                .parse()
                .expect("RATE_LOGIN_PER_MIN must be a number"),
            rate_register_per_min: env_or("RATE_REGISTER_PER_MIN", "30")
                .parse()
                .expect("RATE_REGISTER_PER_MIN must be a number"),
            rate_refresh_per_min: env_or("RATE_REFRESH_PER_MIN", "30")
                .parse()
                .expect("RATE_REFRESH_PER_MIN must be a number"),
            rate_protected_per_min: env_or("RATE_PROTECTED_PER_MIN", "1000")
                .parse()
                .expect("RATE_PROTECTED_PER_MIN must be a number"),

            api_prefix: env_or("API_PREFIX", "/api"),

            dispatch_interval_secs: env_or("DISPATCH_INTERVAL_SECS", "10")
                .parse()
                .expect("DISPATCH_INTERVAL_SECS must be a number"),

            seed_retry_attempts: env_or("SEED_RETRY_ATTEMPTS", "5")
                .parse()
                .expect("SEED_RETRY_ATTEMPTS must be a number"),
            seed_retry_delay_secs: env_or("SEED_RETRY_DELAY_SECS", "2")
                .parse()
                .expect("SEED_RETRY_DELAY_SECS must be a number"),

            work_start: env_or("WORK_START_TIME", "09:00:00")
                .parse()
                .expect("WORK_START_TIME must be HH:MM:SS"),
            work_end: env_or("WORK_END_TIME", "17:00:00")
                .parse()
                .expect("WORK_END_TIME must be HH:MM:SS"),
            minimum_work_hours: env_or("MIN_WORK_HOURS", "4.0")
                .parse()
                .expect("MIN_WORK_HOURS must be a number"),
            standard_work_hours: env_or("STANDARD_WORK_HOURS", "8.0")
                .parse()
                .expect("STANDARD_WORK_HOURS must be a number"),
            overtime_threshold_hours: env_or("OVERTIME_THRESHOLD_HOURS", "10.0")
                .parse()
                .expect("OVERTIME_THRESHOLD_HOURS must be a number"),
        }
    }

    /// Per-organization attendance policy built from the environment.
    pub fn work_policy(&self) -> WorkPolicy {
        WorkPolicy {
            standard_start: self.work_start,
            standard_end: self.work_end,
            minimum_work_hours: self.minimum_work_hours,
            standard_work_hours: self.standard_work_hours,
            overtime_threshold_hours: self.overtime_threshold_hours,
        }
    }
}
