use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::Row;
use std::time::Duration;
use tracing::{debug, error, info};

use super::{ReviewStore, StorageConfig, StorageType};
use crate::models::{NewReview, Review, ReviewPage};
use crate::storage::models::ListQuery;

const TABLE_NAME: &str = "reviews";

/// PostgreSQL 存储提供商
///
/// `created_at` 由数据库 `now()` 赋值。
pub struct PostgresReviewStore {
    pool: PgPool,
}

impl PostgresReviewStore {
    pub async fn new(config: &StorageConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(&config.connection_string)
            .await
            .context("Failed to connect to PostgreSQL")?;

        let store = Self { pool };
        store.create_tables().await?;

        Ok(store)
    }

    async fn create_tables(&self) -> Result<()> {
        let create_table_sql = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id BIGSERIAL PRIMARY KEY,
                product_name VARCHAR(200) NOT NULL,
                review_text TEXT NOT NULL,
                sentiment VARCHAR(20) NOT NULL,
                sentiment_score DOUBLE PRECISION NOT NULL,
                key_points JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
            TABLE_NAME
        );

        sqlx::query(&create_table_sql).execute(&self.pool).await?;

        let indexes = [
            format!("CREATE INDEX IF NOT EXISTS idx_{0}_product_name ON {0} (product_name)", TABLE_NAME),
            format!("CREATE INDEX IF NOT EXISTS idx_{0}_created_at ON {0} (created_at)", TABLE_NAME),
        ];

        for index_sql in indexes {
            sqlx::query(&index_sql).execute(&self.pool).await?;
        }

        info!("PostgreSQL table '{}' created or verified", TABLE_NAME);
        Ok(())
    }

    fn review_from_row(row: &PgRow) -> Result<Review> {
        let Json(key_points): Json<Vec<String>> = row.try_get("key_points")?;
        let created_at: DateTime<Utc> = row.try_get("created_at")?;

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
impl ReviewStore for PostgresReviewStore {
    fn storage_type(&self) -> StorageType {
        StorageType::PostgreSQL
    }

    async fn create(&self, review: NewReview) -> Result<Review> {
        let insert_sql = format!(
            r#"
            INSERT INTO {} (product_name, review_text, sentiment, sentiment_score, key_points)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, created_at
            "#,
            TABLE_NAME
        );

        let (id, created_at): (i64, DateTime<Utc>) = sqlx::query_as(&insert_sql)
            .bind(&review.product_name)
            .bind(&review.review_text)
            .bind(&review.sentiment)
            .bind(review.sentiment_score)
            .bind(Json(&review.key_points))
            .fetch_one(&self.pool)
            .await
            .context("Failed to insert review")?;

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
            LIMIT $1 OFFSET $2
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

        Ok(ReviewPage { reviews, total })
    }

    async fn get(&self, id: i64) -> Result<Option<Review>> {
        let select_sql = format!(
            r#"
            SELECT id, product_name, review_text, sentiment, sentiment_score, key_points, created_at
            FROM {} WHERE id = $1
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
        let delete_sql = format!("DELETE FROM {} WHERE id = $1", TABLE_NAME);

        let result = sqlx::query(&delete_sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete review")?;

        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<bool> {
        match sqlx::query("SELECT 1").fetch_one(&self.pool).await {
            Ok(_) => Ok(true),
            Err(e) => {
                error!("PostgreSQL health check failed: {}", e);
                Ok(false)
            }
        }
    }
}
