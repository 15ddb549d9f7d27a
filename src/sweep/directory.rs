//! Listing of tenants visited by the sweep.

use crate::tenant::{OrgId, TenantNamespace};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// A tenant the sweep runs against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantEntry {
    /// Storage namespace.
    pub namespace: TenantNamespace,
    /// Owning organization.
    pub org_id: OrgId,
}

/// Source of the tenants to sweep.
#[async_trait]
pub trait TenantDirectory: Send + Sync {
    /// Lists every provisioned tenant.
    async fn tenants(&self) -> Result<Vec<TenantEntry>, DirectoryError>;
}

/// Errors returned by tenant directories.
#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    /// The directory backend failed.
    #[error("tenant directory error: {0}")]
    Backend(Arc<dyn std::error::Error + Send + Sync>),
}

impl DirectoryError {
    /// Wraps a backend error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Arc::new(err))
    }
}

/// Tenant directory held in memory, in registration order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTenantDirectory {
    tenants: Arc<RwLock<Vec<TenantEntry>>>,
}

impl InMemoryTenantDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a tenant; registering the same namespace again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Backend`] if the lock is poisoned.
    pub fn register(
        &self,
        namespace: TenantNamespace,
        org_id: OrgId,
    ) -> Result<(), DirectoryError> {
        let mut tenants = self
            .tenants
            .write()
            .map_err(|err| DirectoryError::backend(std::io::Error::other(err.to_string())))?;
        if tenants.iter().all(|entry| entry.namespace != namespace) {
            tenants.push(TenantEntry { namespace, org_id });
        }
        Ok(())
    }
}

#[async_trait]
impl TenantDirectory for InMemoryTenantDirectory {
    async fn tenants(&self) -> Result<Vec<TenantEntry>, DirectoryError> {
        self.tenants
            .read()
            .map(|tenants| tenants.clone())
            .map_err(|err| DirectoryError::backend(std::io::Error::other(err.to_string())))
    }
}
