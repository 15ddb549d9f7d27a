//! Step definitions for proposal and document acceptance scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
