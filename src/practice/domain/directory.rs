//! Read-only reference entities maintained outside the lifecycle engine.

use super::{CustomerId, DocumentId, PracticeDomainError, ProjectTemplateId};
use crate::tenant::PortalContactId;
use serde::{Deserialize, Serialize};

fn non_blank(value: impl Into<String>, field: &'static str) -> Result<String, PracticeDomainError> {
    let raw = value.into();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PracticeDomainError::EmptyField(field));
    }
    Ok(trimmed.to_owned())
}

/// A customer-side person with client portal access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalContact {
    id: PortalContactId,
    customer_id: CustomerId,
    display_name: String,
    email: String,
}

impl PortalContact {
    /// Creates a portal contact.
    ///
    /// # Errors
    ///
    /// Returns [`PracticeDomainError::EmptyField`] when the name or email is
    /// blank.
    pub fn new(
        customer_id: CustomerId,
        display_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self, PracticeDomainError> {
        Ok(Self {
            id: PortalContactId::new(),
            customer_id,
            display_name: non_blank(display_name, "contact name")?,
            email: non_blank(email, "contact email")?,
        })
    }

    /// Returns the contact identifier.
    #[must_use]
    pub const fn id(&self) -> PortalContactId {
        self.id
    }

    /// Returns the customer the contact belongs to.
    #[must_use]
    pub const fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    /// Returns the display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }
}

/// A rendered document held in object storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedDocument {
    id: DocumentId,
    customer_id: CustomerId,
    file_name: String,
    storage_key: String,
}

impl GeneratedDocument {
    /// Creates a generated document reference.
    ///
    /// # Errors
    ///
    /// Returns [`PracticeDomainError::EmptyField`] when the file name or
    /// storage key is blank.
    pub fn new(
        customer_id: CustomerId,
        file_name: impl Into<String>,
        storage_key: impl Into<String>,
    ) -> Result<Self, PracticeDomainError> {
        Ok(Self {
            id: DocumentId::new(),
            customer_id,
            file_name: non_blank(file_name, "document file name")?,
            storage_key: non_blank(storage_key, "document storage key")?,
        })
    }

    /// Returns the document identifier.
    #[must_use]
    pub const fn id(&self) -> DocumentId {
        self.id
    }

    /// Returns the owning customer.
    #[must_use]
    pub const fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    /// Returns the display file name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Returns the object storage key of the document bytes.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Returns the file name without its final extension.
    #[must_use]
    pub fn file_stem(&self) -> &str {
        self.file_name
            .rsplit_once('.')
            .map_or(self.file_name.as_str(), |(stem, _)| stem)
    }
}

/// Blueprint for projects created from accepted proposals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectTemplate {
    id: ProjectTemplateId,
    name: String,
    name_pattern: String,
    description: Option<String>,
    task_names: Vec<String>,
}

impl ProjectTemplate {
    /// Creates a project template.
    ///
    /// `name_pattern` may contain `{customer}` and `{proposal}` placeholders.
    ///
    /// # Errors
    ///
    /// Returns [`PracticeDomainError::EmptyField`] when the name or pattern
    /// is blank.
    pub fn new(
        name: impl Into<String>,
        name_pattern: impl Into<String>,
    ) -> Result<Self, PracticeDomainError> {
        Ok(Self {
            id: ProjectTemplateId::new(),
            name: non_blank(name, "template name")?,
            name_pattern: non_blank(name_pattern, "template name pattern")?,
            description: None,
            task_names: Vec::new(),
        })
    }

    /// Sets the description copied onto created projects.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the tasks seeded onto created projects.
    #[must_use]
    pub fn with_task_names(mut self, task_names: impl IntoIterator<Item = String>) -> Self {
        self.task_names = task_names.into_iter().collect();
        self
    }

    /// Returns the template identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectTemplateId {
        self.id
    }

    /// Returns the template name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the seeded task names.
    #[must_use]
    pub fn task_names(&self) -> &[String] {
        &self.task_names
    }

    /// Resolves the project name for a customer and proposal title.
    #[must_use]
    pub fn resolve_name(&self, customer_name: &str, proposal_title: &str) -> String {
        self.name_pattern
            .replace("{customer}", customer_name)
            .replace("{proposal}", proposal_title)
    }
}
