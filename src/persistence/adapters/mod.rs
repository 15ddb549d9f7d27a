//! Adapter implementations for tenant-scoped persistence.

pub mod memory;
