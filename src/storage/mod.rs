pub mod manager;
pub mod models;
pub mod providers;

pub use manager::connect_store;
pub use models::{ListQuery, DEFAULT_PAGE_LIMIT};
pub use providers::{InMemoryReviewStore, ReviewStore, StorageConfig, StorageType};
