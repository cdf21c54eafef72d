pub mod files;
pub mod gateway;
pub mod store;

pub use files::{config_file, ensure_data_dir, init_local_data_dir, log_file};
pub use gateway::{PersistenceGateway, UserProfile};
pub use store::{FileStore, KeyValueStore};

#[cfg(test)]
pub use store::MemoryStore;
