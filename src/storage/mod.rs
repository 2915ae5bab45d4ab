//! Key-value persistence and the counter synchronised through it.

mod counter;
mod error;
mod store;

pub use counter::PersistentCounter;
pub use error::StorageError;
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
