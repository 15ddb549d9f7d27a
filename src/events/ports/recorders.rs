//! Downstream recorders fed by event subscribers.

use crate::events::domain::{AuditRecord, EntityType, NewNotification, PortalRow};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Errors returned by recorder implementations.
#[derive(Debug, Clone, Error)]
pub enum RecorderError {
    /// Persistence-layer failure.
    #[error("recorder persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl RecorderError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Writes the immutable audit trail.
#[async_trait]
pub trait AuditRecorder: Send + Sync {
    /// Records one audit entry.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError`] when the entry cannot be persisted.
    async fn record(&self, record: AuditRecord) -> Result<(), RecorderError>;
}

/// Creates user-facing notifications.
#[async_trait]
pub trait NotificationRecorder: Send + Sync {
    /// Creates one notification.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError`] when the notification cannot be persisted.
    async fn create(&self, notification: NewNotification) -> Result<(), RecorderError>;
}

/// Writes the cross-tenant portal read-model.
#[async_trait]
pub trait PortalReadModelWriter: Send + Sync {
    /// Inserts or updates the row keyed by `row.entity_id`.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError`] when the row cannot be written.
    async fn upsert(&self, row: PortalRow) -> Result<(), RecorderError>;

    /// Removes the row for a deleted entity. Missing rows are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError`] when the row cannot be removed.
    async fn remove(&self, entity_type: EntityType, entity_id: Uuid) -> Result<(), RecorderError>;
}
