//! Adapter implementations for acceptance collaborator ports.

pub mod memory;
mod template;

pub use template::{CERTIFICATE_TEMPLATE, MiniJinjaTemplateRenderer};
