//! In-memory tenant store for tests and embedded use.

mod store;

pub use store::InMemoryTenantStore;
