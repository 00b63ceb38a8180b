use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::time::Duration;
use tracing::{debug, error, info};

use super::{ReviewStore, StorageConfig, StorageType};
use crate::models::{NewReview, Review, ReviewPage};
use crate::storage::models::ListQuery;

const TABLE_NAME: &str = "reviews";

/// SQLite 存储提供商
pub struct SqliteReviewStore {
    pool: SqlitePool,
}

fn is_in_memory(connection_string: &str) -> bool {
    connection_string.contains(":memory:") || connection_string.contains("mode=memory")
}

impl SqliteReviewStore {
    /// 连接数据库并建表
    pub async fn new(config: &StorageConfig) -> Result<Self> {
        let mut options = SqlitePoolOptions::new()
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs));

        // 内存库每个连接都是独立的数据库，只能保留一个常驻连接
        options = if is_in_memory(&config.connection_string) {
            options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            options.max_connections(config.max_connections)
        };

        let pool = options
            .connect(&config.connection_string)
            .await
            .with_context(|| format!("Failed to connect to SQLite database '{}'", config.connection_string))?;

        let store = Self { pool };
        store.create_tables().await?;

        Ok(store)
    }

    /// 创建数据库表
    async fn create_tables(&self) -> Result<()> {
        let create_table_sql = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                product_name VARCHAR(200) NOT NULL,
                review_text TEXT NOT NULL,
                sentiment VARCHAR(20) NOT NULL,
                sentiment_score REAL NOT NULL,
                key_points TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
            TABLE_NAME
        );

        sqlx::query(&create_table_sql).execute(&self.pool).await?;

        // Create indexes separately
        let indexes = [
            format!("CREATE INDEX IF NOT EXISTS idx_{0}_product_name ON {0} (product_name)", TABLE_NAME),
            format!("CREATE INDEX IF NOT EXISTS idx_{0}_created_at ON {0} (created_at)", TABLE_NAME),
        ];

        for index_sql in indexes {
            sqlx::query(&index_sql).execute(&self.pool).await?;
        }

        info!("SQLite table '{}' created or verified", TABLE_NAME);
        Ok(())
    }

    /// 从行数据还原评论
    fn review_from_row(row: &SqliteRow) -> Result<Review> {
        let key_points_str: String = row.try_get("key_points")?;
        let key_points: Vec<String> = serde_json::from_str(&key_points_str)
            .context("Failed to decode key_points column")?;

        let created_at_str: String = row.try_get("created_at")?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| anyhow!("Failed to parse created_at: {}", e))?
            .with_timezone(&Utc);

        Ok(Review {
            id: row.try_get("id")?,
            product_name: row.try_get("product_name")?,
            review_text: row.try_get("review_text")?,
            sentiment: row.try_get("sentiment")?,
            sentiment_score: row.try_get("sentiment_score")?,
            key_points,
            created_at,
        })
    }
}

#[async_trait]
impl ReviewStore for SqliteReviewStore {
    fn storage_type(&self) -> StorageType {
        StorageType::SQLite
    }

    async fn create(&self, review: NewReview) -> Result<Review> {
        // 固定微秒精度，保证文本排序与时间排序一致
        let created_at = Utc::now().trunc_subsecs(6);
        let key_points_json = serde_json::to_string(&review.key_points)?;

        let insert_sql = format!(
            r#"
            INSERT INTO {} (
                product_name, review_text, sentiment, sentiment_score, key_points, created_at
            ) VALUES (?, ?, ?, ?, ?, ?)
            "#,
            TABLE_NAME
        );

        let result = sqlx::query(&insert_sql)
            .bind(&review.product_name)
            .bind(&review.review_text)
            .bind(&review.sentiment)
            .bind(review.sentiment_score)
            .bind(&key_points_json)
            .bind(created_at.to_rfc3339_opts(SecondsFormat::Micros, true))
            .execute(&self.pool)
            .await
            .context("Failed to insert review")?;

        let id = result.last_insert_rowid();
        debug!("Stored review with ID: {}", id);

        Ok(review.into_review(id, created_at))
    }

    async fn list(&self, query: ListQuery) -> Result<ReviewPage> {
        let mut tx = self.pool.begin().await?;

        let count_sql = format!("SELECT COUNT(*) FROM {}", TABLE_NAME);
        let (total,): (i64,) = sqlx::query_as(&count_sql).fetch_one(&mut *tx).await?;

        let select_sql = format!(
            r#"
            SELECT id, product_name, review_text, sentiment, sentiment_score, key_points, created_at
            FROM {}
            ORDER BY created_at DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
            TABLE_NAME
        );

        let rows = sqlx::query(&select_sql)
            .bind(query.limit)
            .bind(query.offset)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        let reviews = rows
            .iter()
            .map(Self::review_from_row)
            .collect::<Result<Vec<_>>>()?;

        debug!("Listed {} of {} reviews", reviews.len(), total);
        Ok(ReviewPage { reviews, total })
    }

    async fn get(&self, id: i64) -> Result<Option<Review>> {
        let select_sql = format!(
            r#"
            SELECT id, product_name, review_text, sentiment, sentiment_score, key_points, created_at
            FROM {} WHERE id = ?
            "#,
            TABLE_NAME
        );

        let row = sqlx::query(&select_sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::review_from_row).transpose()
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let delete_sql = format!("DELETE FROM {} WHERE id = ?", TABLE_NAME);

        let result = sqlx::query(&delete_sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete review")?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            debug!("Deleted review with ID: {}", id);
        }
        Ok(deleted)
    }

    async fn health_check(&self) -> Result<bool> {
        match sqlx::query("SELECT 1").fetch_one(&self.pool).await {
            Ok(_) => Ok(true),
            Err(e) => {
                error!("SQLite health check failed: {}", e);
                Ok(false)
            }
        }
    }
}
