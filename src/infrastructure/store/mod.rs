//! Key-value store implementations backing the geospatial cache

mod file;
mod in_memory;

pub use file::FileStore;
pub use in_memory::InMemoryStore;
