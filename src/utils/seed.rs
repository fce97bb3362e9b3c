//! Startup seeding of reference data.
//!
//! The database may still be warming up when the service starts, so each
//! step runs under a bounded fixed-backoff retry. Exhausting the budget is
//! logged and the service carries on without seed data.

use crate::config::Config;
use crate::utils::retry::with_retry;
use sqlx::MySqlPool;
use std::time::Duration;

const DEFAULT_DEPARTMENTS: &[&str] = &["Engineering", "Human Resources", "Finance", "Operations"];

pub async fn seed_reference_data(pool: &MySqlPool, config: &Config) {
    let attempts = config.seed_retry_attempts;
    let delay = Duration::from_secs(config.seed_retry_delay_secs);

    let result = with_retry("department seeding", attempts, delay, || async {
        seed_departments(pool).await
    })
    .await;

    match result {
        Ok(inserted) if inserted > 0 => {
            tracing::info!(inserted, "Seeded default departments");
        }
        Ok(_) => {}
        Err(e) => {
            // degrade gracefully: an empty department table is workable
            tracing::warn!(error = %e, "Department seeding failed; continuing without seed data");
        }
    }
}

async fn seed_departments(pool: &MySqlPool) -> Result<u64, sqlx::Error> {
    let mut inserted = 0;
    for name in DEFAULT_DEPARTMENTS {
        let result = sqlx::query("INSERT IGNORE INTO departments (name) VALUES (?)")
            .bind(name)
            .execute(pool)
            .await?;
        inserted += result.rows_affected();
    }
    Ok(inserted)
}
