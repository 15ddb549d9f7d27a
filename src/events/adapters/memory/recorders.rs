//! Thread-safe in-memory recorder implementations.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::events::{
    domain::{AuditRecord, EntityType, NewNotification, PortalRow},
    ports::{AuditRecorder, NotificationRecorder, PortalReadModelWriter, RecorderError},
};

fn lock_error(err: impl ToString) -> RecorderError {
    RecorderError::persistence(std::io::Error::other(err.to_string()))
}

/// Append-only in-memory audit trail.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAuditLog {
    records: Arc<RwLock<Vec<AuditRecord>>>,
}

impl InMemoryAuditLog {
    /// Creates an empty audit log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all recorded entries in insertion order.
    #[must_use]
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records
            .read()
            .map(|records| records.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl AuditRecorder for InMemoryAuditLog {
    async fn record(&self, record: AuditRecord) -> Result<(), RecorderError> {
        let mut records = self.records.write().map_err(lock_error)?;
        records.push(record);
        Ok(())
    }
}

/// In-memory notification inbox.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotificationInbox {
    notifications: Arc<RwLock<Vec<NewNotification>>>,
}

impl InMemoryNotificationInbox {
    /// Creates an empty inbox.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all notifications in insertion order.
    #[must_use]
    pub fn notifications(&self) -> Vec<NewNotification> {
        self.notifications
            .read()
            .map(|notifications| notifications.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl NotificationRecorder for InMemoryNotificationInbox {
    async fn create(&self, notification: NewNotification) -> Result<(), RecorderError> {
        let mut notifications = self.notifications.write().map_err(lock_error)?;
        notifications.push(notification);
        Ok(())
    }
}

/// In-memory portal read-model shared by all tenants.
///
/// Upserts replace the status and merge display fields, so fields written by
/// an earlier event survive later status-only updates.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPortalReadModel {
    rows: Arc<RwLock<HashMap<(EntityType, Uuid), PortalRow>>>,
}

impl InMemoryPortalReadModel {
    /// Creates an empty read-model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the row for an entity, if projected.
    #[must_use]
    pub fn row(&self, entity_type: EntityType, entity_id: Uuid) -> Option<PortalRow> {
        self.rows
            .read()
            .ok()
            .and_then(|rows| rows.get(&(entity_type, entity_id)).cloned())
    }

    /// Returns the number of projected rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.read().map(|rows| rows.len()).unwrap_or_default()
    }

    /// Returns whether no rows are projected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PortalReadModelWriter for InMemoryPortalReadModel {
    async fn upsert(&self, row: PortalRow) -> Result<(), RecorderError> {
        let mut rows = self.rows.write().map_err(lock_error)?;
        let key = (row.entity_type, row.entity_id);
        match rows.get_mut(&key) {
            Some(existing) => {
                existing.status = row.status;
                existing.fields.extend(row.fields);
                existing.synced_at = row.synced_at;
            }
            None => {
                rows.insert(key, row);
            }
        }
        Ok(())
    }

    async fn remove(&self, entity_type: EntityType, entity_id: Uuid) -> Result<(), RecorderError> {
        let mut rows = self.rows.write().map_err(lock_error)?;
        rows.remove(&(entity_type, entity_id));
        Ok(())
    }
}
