//! Registration store abstraction.
//!
//! The durable implementation lives in the persistence crate. The in-memory
//! store here follows the same ordering rules and backs tests and local runs
//! without a database.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{NewRegistration, Registration};

/// Errors raised by a registration store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store query failed: {0}")]
    Query(String),
}

/// Append-only collection of registrations.
#[async_trait::async_trait]
pub trait RegistrationStore: Send + Sync {
    /// Persist a new registration, assigning its id and creation time.
    async fn save(&self, registration: NewRegistration) -> Result<Registration, StoreError>;

    /// Record that the invite for a registration was sent.
    ///
    /// This is the only change a stored registration ever sees.
    async fn mark_delivered(&self, id: Uuid, delivered_at: DateTime<Utc>) -> Result<(), StoreError>;

    /// All registrations, newest first; ties keep the later insert first.
    async fn list_all(&self) -> Result<Vec<Registration>, StoreError>;

    /// Cheap connectivity check.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Process-local registration store.
#[derive(Debug)]
pub struct InMemoryRegistrationStore {
    records: RwLock<Vec<Registration>>,
    available: AtomicBool,
}

impl Default for InMemoryRegistrationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRegistrationStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate the backend going away (or coming back).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of stored registrations, regardless of availability.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("in-memory store marked unavailable".to_string()))
        }
    }
}

#[async_trait::async_trait]
impl RegistrationStore for InMemoryRegistrationStore {
    async fn save(&self, registration: NewRegistration) -> Result<Registration, StoreError> {
        self.check_available()?;
        let stored = Registration::from_new(Uuid::new_v4(), registration, Utc::now());
        self.records.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn mark_delivered(&self, id: Uuid, delivered_at: DateTime<Utc>) -> Result<(), StoreError> {
        self.check_available()?;
        let mut records = self.records.write().await;
        if let Some(record) = records.iter_mut().find(|r| r.id == id && !r.delivered) {
            record.delivered = true;
            record.delivered_at = Some(delivered_at);
        }
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Registration>, StoreError> {
        self.check_available()?;
        let records = self.records.read().await;
        // Reverse insertion order first; the stable sort then keeps later
        // inserts ahead of earlier ones with the same timestamp.
        let mut listed: Vec<Registration> = records.iter().rev().cloned().collect();
        listed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(listed)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_available()
    }
}
