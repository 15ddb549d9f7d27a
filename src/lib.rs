//! Covenant: tenant-scoped proposal and acceptance lifecycle engine.
//!
//! This crate drives proposals from draft to decision and documents from
//! delivery to signed acceptance for a multi-tenant professional-services
//! practice. An accepted proposal is orchestrated into a project, draft
//! invoices and an onboarding customer in one atomic step; an accepted
//! document yields a tamper-evident certificate of acceptance.
//!
//! # Architecture
//!
//! Covenant follows hexagonal architecture principles:
//!
//! - **Domain**: Aggregates and state machines with no infrastructure
//!   dependencies
//! - **Ports**: Trait interfaces for persistence, storage, rendering and
//!   event delivery
//! - **Adapters**: In-memory and `minijinja` implementations of those ports
//! - **Services**: Operations that load, transition and commit aggregates
//!   together with their domain events
//!
//! # Modules
//!
//! - [`tenant`]: Tenant context threaded through every call
//! - [`practice`]: Customers, contacts, documents, projects and invoices
//! - [`proposal`]: Proposal lifecycle and acceptance orchestration
//! - [`acceptance`]: Document acceptance requests and certificates
//! - [`events`]: Domain events and after-commit fan-out
//! - [`persistence`]: Tenant store port and unit of work
//! - [`sweep`]: Periodic expiry sweeps
//! - [`config`] and [`telemetry`]: Configuration and logging

mod identifier;

pub mod acceptance;
pub mod config;
pub mod error;
pub mod events;
pub mod persistence;
pub mod practice;
pub mod proposal;
pub mod sweep;
pub mod telemetry;
pub mod tenant;

#[cfg(test)]
mod test_support;
