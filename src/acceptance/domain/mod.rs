//! Domain model for document acceptance requests.

mod error;
mod ids;
mod request;

pub use error::{AcceptanceDomainError, ParseAcceptanceStatusError};
pub use ids::{AcceptanceRequestId, RequestToken};
pub use request::{
    AcceptanceRequest, AcceptanceStatus, AcceptanceSubmission, CertificateRecord,
    NewAcceptanceRequest,
};
