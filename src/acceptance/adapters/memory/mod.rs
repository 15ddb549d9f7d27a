//! In-memory storage for tests and embedded use.

mod storage;

pub use storage::{InMemoryDocumentStorage, StoredObject};
