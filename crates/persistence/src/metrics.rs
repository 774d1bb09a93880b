//! Registration store metrics.
//!
//! Query latency is labelled by query and outcome; pool gauges are refreshed
//! whenever the store is pinged by the health endpoints.

use metrics::{gauge, histogram};
use sqlx::PgPool;
use std::time::Instant;

/// Times one registrations query.
///
/// ```ignore
/// let rows = QueryTimer::start("list_registrations")
///     .finish(sqlx::query_as::<_, RegistrationEntity>(&sql).fetch_all(&pool).await)?;
/// ```
pub struct QueryTimer {
    query: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub fn start(query: &'static str) -> Self {
        Self {
            query,
            start: Instant::now(),
        }
    }

    /// Records `database_query_duration_seconds` and hands the result back.
    pub fn finish<T>(self, result: Result<T, sqlx::Error>) -> Result<T, sqlx::Error> {
        histogram!(
            "database_query_duration_seconds",
            "query" => self.query,
            "outcome" => outcome_label(&result)
        )
        .record(self.start.elapsed().as_secs_f64());
        result
    }
}

fn outcome_label<T>(result: &Result<T, sqlx::Error>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(sqlx::Error::PoolTimedOut) => "pool_timeout",
        Err(_) => "error",
    }
}

/// Connection counts of the registration pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub size: u32,
    pub idle: usize,
}

impl PoolStats {
    pub fn of(pool: &PgPool) -> Self {
        Self {
            size: pool.size(),
            idle: pool.num_idle(),
        }
    }

    pub fn active(&self) -> usize {
        (self.size as usize).saturating_sub(self.idle)
    }

    pub fn record(&self) {
        gauge!("database_connections_active").set(self.active() as f64);
        gauge!("database_connections_idle").set(self.idle as f64);
        gauge!("database_connections_total").set(self.size as f64);
    }
}
