//! Domain model for practice entities.

mod customer;
mod directory;
mod error;
mod ids;
mod invoice;
mod money;
mod project;

pub use customer::{Customer, LifecycleStatus, LifecycleTransition};
pub use directory::{GeneratedDocument, PortalContact, ProjectTemplate};
pub use error::{ParseLifecycleStatusError, PracticeDomainError};
pub use ids::{CustomerId, DocumentId, InvoiceId, ProjectId, ProjectTemplateId};
pub use invoice::{Invoice, InvoiceLine, InvoiceStatus, NewInvoice};
pub use money::{CurrencyCode, Money};
pub use project::{NewProject, Project, ProjectMember, ProjectRole};
