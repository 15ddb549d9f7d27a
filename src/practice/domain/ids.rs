//! Identifier types for practice entities.

use crate::identifier::uuid_identifier;

uuid_identifier! {
    /// Identifier of a customer record.
    CustomerId
}

uuid_identifier! {
    /// Identifier of a generated (rendered and stored) document.
    DocumentId
}

uuid_identifier! {
    /// Identifier of a reusable project template.
    ProjectTemplateId
}

uuid_identifier! {
    /// Identifier of a project.
    ProjectId
}

uuid_identifier! {
    /// Identifier of an invoice.
    InvoiceId
}
