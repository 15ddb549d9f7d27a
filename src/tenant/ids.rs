//! Identifier types for tenants and the identities acting within them.

use super::TenantContextError;
use crate::identifier::uuid_identifier;
use serde::{Deserialize, Serialize};
use std::fmt;

uuid_identifier! {
    /// Identifier of an organization member acting through the application.
    MemberId
}

uuid_identifier! {
    /// Identifier of a customer-side portal contact.
    PortalContactId
}

/// Isolated storage partition holding one organization's data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantNamespace(String);

impl TenantNamespace {
    const PREFIX: &'static str = "tenant_";
    const MAX_LENGTH: usize = 63;

    /// Creates a validated namespace.
    ///
    /// # Errors
    ///
    /// Returns [`TenantContextError::InvalidNamespace`] unless the value
    /// starts with `tenant_`, contains only lowercase ASCII alphanumerics and
    /// underscores, and fits the 63-character schema name limit.
    pub fn new(value: impl Into<String>) -> Result<Self, TenantContextError> {
        let raw = value.into();
        let suffix = raw.strip_prefix(Self::PREFIX).unwrap_or_default();
        let is_valid = !suffix.is_empty()
            && raw.len() <= Self::MAX_LENGTH
            && raw
                .chars()
                .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_');

        if !is_valid {
            return Err(TenantContextError::InvalidNamespace(raw));
        }
        Ok(Self(raw))
    }

    /// Returns the namespace as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TenantNamespace {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TenantNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// External organization identifier owning a tenant namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrgId(String);

impl OrgId {
    /// Creates a validated organization identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TenantContextError::EmptyOrgId`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, TenantContextError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TenantContextError::EmptyOrgId);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
