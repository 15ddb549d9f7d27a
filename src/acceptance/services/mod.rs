//! Acceptance request services.

mod certificate;
mod error;
mod events;
mod expiry;
mod lifecycle;

pub use certificate::{CertificateService, certificate_file_name, certificate_storage_key};
pub use error::{AcceptanceServiceError, AcceptanceServiceResult, AcceptanceSettingsError};
pub use expiry::AcceptanceExpiryProcessor;
pub use lifecycle::{AcceptanceService, AcceptanceSettings, CreateAcceptanceRequest};
