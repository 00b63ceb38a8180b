use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::models::ListQuery;
use crate::models::{NewReview, Review, ReviewPage};

pub mod memory;

#[cfg(feature = "storage-sqlite")]
pub mod sqlite;

#[cfg(feature = "storage-postgres")]
pub mod postgres;

pub use memory::InMemoryReviewStore;

#[cfg(feature = "storage-sqlite")]
pub use sqlite::SqliteReviewStore;

#[cfg(feature = "storage-postgres")]
pub use postgres::PostgresReviewStore;

/// 存储类型枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageType {
    Memory,
    SQLite,
    PostgreSQL,
}

impl StorageType {
    /// 根据连接串的 scheme 判断存储类型
    pub fn from_connection_string(connection_string: &str) -> Option<Self> {
        let scheme = connection_string.split(':').next()?.to_lowercase();
        match scheme.as_str() {
            "memory" => Some(StorageType::Memory),
            "sqlite" => Some(StorageType::SQLite),
            "postgres" | "postgresql" => Some(StorageType::PostgreSQL),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageType::Memory => "memory",
            StorageType::SQLite => "sqlite",
            StorageType::PostgreSQL => "postgresql",
        }
    }
}

/// 评论存储接口
///
/// `created_at` 与 `id` 由实现方在插入时分配。
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// 获取存储类型
    fn storage_type(&self) -> StorageType;

    /// 写入评论，返回带主键与创建时间的完整记录
    async fn create(&self, review: NewReview) -> Result<Review>;

    /// 分页列出评论，附带总数
    async fn list(&self, query: ListQuery) -> Result<ReviewPage>;

    async fn get(&self, id: i64) -> Result<Option<Review>>;

    /// 删除评论，不存在时返回 `false`
    async fn delete(&self, id: i64) -> Result<bool>;

    /// 健康检查
    async fn health_check(&self) -> Result<bool>;
}

/// 存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub connection_string: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            connection_string: "sqlite://reviews.db?mode=rwc".to_string(),
            max_connections: 10,
            connect_timeout_secs: 30,
        }
    }
}

impl StorageConfig {
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
            ..Default::default()
        }
    }

    pub fn storage_type(&self) -> Option<StorageType> {
        StorageType::from_connection_string(&self.connection_string)
    }
}
