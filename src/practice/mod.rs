//! Practice-management entities the lifecycle engine reads or creates.
//!
//! Customers, portal contacts, generated documents and project templates are
//! maintained by ordinary CRUD elsewhere; the engine only reads them.
//! Projects and invoices are created by proposal acceptance, and a
//! customer's lifecycle is nudged from prospect to onboarding at the same
//! time.

pub mod domain;
