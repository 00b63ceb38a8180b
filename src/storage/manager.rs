use anyhow::{anyhow, Result};
use std::sync::Arc;
use tracing::info;

use super::providers::{InMemoryReviewStore, ReviewStore, StorageConfig, StorageType};

/// 根据连接串创建存储实现
pub async fn connect_store(config: &StorageConfig) -> Result<Arc<dyn ReviewStore>> {
    let storage_type = config
        .storage_type()
        .ok_or_else(|| anyhow!("Unsupported database URL: {}", config.connection_string))?;

    info!("Connecting review store: {}", storage_type.as_str());

    let store: Arc<dyn ReviewStore> = match storage_type {
        StorageType::Memory => Arc::new(InMemoryReviewStore::new()),

        #[cfg(feature = "storage-sqlite")]
        StorageType::SQLite => Arc::new(super::providers::SqliteReviewStore::new(config).await?),

        #[cfg(feature = "storage-postgres")]
        StorageType::PostgreSQL => Arc::new(super::providers::PostgresReviewStore::new(config).await?),

        #[allow(unreachable_patterns)]
        other => {
            return Err(anyhow!(
                "Storage backend '{}' is not enabled in this build",
                other.as_str()
            ))
        }
    };

    Ok(store)
}
