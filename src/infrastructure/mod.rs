mod clients;
mod storage;

pub use clients::contributors::{ContributorClient, ContributorSource};
pub use storage::fs_store::FileSystemStore;
pub use storage::memory_store::MemoryStore;
