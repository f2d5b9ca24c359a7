mod file;
mod in_memory;

pub use file::{DEFAULT_STORAGE_FILE, FileKeyValueStore};
pub use in_memory::InMemoryKeyValueStore;
