//! Domain events and their after-commit fan-out.
//!
//! Every lifecycle transition stages exactly one [`domain::DomainEvent`] in
//! the same unit of work as the state change. Once the unit of work commits,
//! the owning service hands the events to an [`ports::EventPublisher`]; the
//! [`services::EventFanout`] publisher delivers them to subscribers that
//! write the audit trail, create notifications and project rows into the
//! cross-tenant portal read-model.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Subscribers and fan-out in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
