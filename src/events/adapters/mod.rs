//! Adapter implementations for event recorders.

pub mod memory;
