//! Collaborator ports used by acceptance services.

mod certificate;
mod rendering;
mod storage;

pub use certificate::{CertificateError, CertificateIssuer};
pub use rendering::{PdfConverter, RenderError, TemplateRenderer};
pub use storage::{DocumentStorage, StorageError};

#[cfg(test)]
pub use certificate::MockCertificateIssuer;
#[cfg(test)]
pub use rendering::MockPdfConverter;
#[cfg(test)]
pub use storage::MockDocumentStorage;
