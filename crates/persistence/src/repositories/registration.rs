//! Registration repository for database operations.

use chrono::{DateTime, Utc};
use domain::models::{NewRegistration, Registration};
use domain::services::{RegistrationStore, StoreError};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::RegistrationEntity;
use crate::metrics::{PoolStats, QueryTimer};

const REGISTRATION_COLUMNS: &str = r#"
    id, name, email, organization, position, org_type, org_name, phone, consent,
    notes, source, meeting_title, meeting_description, meeting_start, meeting_end,
    meeting_join_url, meeting_dial_in, delivered, delivered_at, created_at
"#;

/// Repository for registration database operations.
#[derive(Clone)]
pub struct RegistrationRepository {
    pool: PgPool,
}

impl RegistrationRepository {
    /// Creates a new RegistrationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a registration.
    pub async fn insert(
        &self,
        id: Uuid,
        registration: &NewRegistration,
        created_at: DateTime<Utc>,
    ) -> Result<RegistrationEntity, sqlx::Error> {
        let timer = QueryTimer::start("insert_registration");
        let query = format!(
            r#"
            INSERT INTO registrations (
                id, name, email, organization, position, org_type, org_name, phone, consent,
                notes, source, meeting_title, meeting_description, meeting_start, meeting_end,
                meeting_join_url, meeting_dial_in, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            RETURNING {}
            "#,
            REGISTRATION_COLUMNS
        );
        let result = sqlx::query_as::<_, RegistrationEntity>(&query)
            .bind(id)
            .bind(&registration.name)
            .bind(&registration.email)
            .bind(&registration.organization)
            .bind(&registration.position)
            .bind(&registration.org_type)
            .bind(&registration.org_name)
            .bind(&registration.phone)
            .bind(registration.consent)
            .bind(&registration.notes)
            .bind(&registration.source)
            .bind(&registration.meeting.title)
            .bind(&registration.meeting.description)
            .bind(registration.meeting.start)
            .bind(registration.meeting.end)
            .bind(&registration.meeting.join_url)
            .bind(&registration.meeting.dial_in)
            .bind(created_at)
            .fetch_one(&self.pool)
            .await;
        timer.finish(result)
    }

    /// Set the delivery flag once. Returns whether a row changed.
    pub async fn set_delivered(
        &self,
        id: Uuid,
        delivered_at: DateTime<Utc>,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::start("set_registration_delivered");
        let result = sqlx::query(
            r#"
            UPDATE registrations
            SET delivered = true, delivered_at = $2
            WHERE id = $1 AND delivered = false
            "#,
        )
        .bind(id)
        .bind(delivered_at)
        .execute(&self.pool)
        .await;
        Ok(timer.finish(result)?.rows_affected() > 0)
    }

    /// List all registrations, newest first.
    pub async fn list(&self) -> Result<Vec<RegistrationEntity>, sqlx::Error> {
        let timer = QueryTimer::start("list_registrations");
        let query = format!(
            "SELECT {} FROM registrations ORDER BY created_at DESC, seq DESC",
            REGISTRATION_COLUMNS
        );
        let result = sqlx::query_as::<_, RegistrationEntity>(&query)
            .fetch_all(&self.pool)
            .await;
        timer.finish(result)
    }

    /// Check database connectivity and refresh the pool gauges.
    pub async fn ping(&self) -> Result<PoolStats, sqlx::Error> {
        let timer = QueryTimer::start("ping");
        let result = sqlx::query("SELECT 1").execute(&self.pool).await;
        timer.finish(result)?;

        let stats = PoolStats::of(&self.pool);
        stats.record();
        Ok(stats)
    }
}

/// Maps driver errors onto the store error taxonomy.
pub fn map_store_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StoreError::Unavailable(err.to_string())
        }
        other => StoreError::Query(other.to_string()),
    }
}

#[async_trait::async_trait]
impl RegistrationStore for RegistrationRepository {
    async fn save(&self, registration: NewRegistration) -> Result<Registration, StoreError> {
        let entity = self
            .insert(Uuid::new_v4(), &registration, Utc::now())
            .await
            .map_err(map_store_error)?;
        Ok(entity.into_domain())
    }

    async fn mark_delivered(&self, id: Uuid, delivered_at: DateTime<Utc>) -> Result<(), StoreError> {
        let changed = self
            .set_delivered(id, delivered_at)
            .await
            .map_err(map_store_error)?;
        if !changed {
            tracing::debug!(registration_id = %id, "Delivery flag already set or row missing");
        }
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Registration>, StoreError> {
        let entities = self.list().await.map_err(map_store_error)?;
        Ok(entities.into_iter().map(Registration::from).collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let stats = RegistrationRepository::ping(self)
            .await
            .map_err(map_store_error)?;
        tracing::trace!(active = stats.active(), idle = stats.idle, "Registration pool checked");
        Ok(())
    }
}
