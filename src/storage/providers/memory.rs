use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use super::{ReviewStore, StorageType};
use crate::models::{NewReview, Review, ReviewPage};
use crate::storage::models::ListQuery;

#[derive(Default)]
struct MemoryState {
    next_id: i64,
    reviews: Vec<Review>,
}

/// 进程内存储
///
/// 不做持久化，适合测试以及未配置数据库时运行。
#[derive(Default)]
pub struct InMemoryReviewStore {
    state: RwLock<MemoryState>,
}

impl InMemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReviewStore for InMemoryReviewStore {
    fn storage_type(&self) -> StorageType {
        StorageType::Memory
    }

    async fn create(&self, review: NewReview) -> Result<Review> {
        let mut state = self.state.write().await;
        state.next_id += 1;
        let stored = review.into_review(state.next_id, Utc::now());
        state.reviews.push(stored.clone());

        debug!("Stored review with ID: {}", stored.id);
        Ok(stored)
    }

    async fn list(&self, query: ListQuery) -> Result<ReviewPage> {
        let state = self.state.read().await;

        let mut sorted: Vec<&Review> = state.reviews.iter().collect();
        sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let reviews = sorted
            .into_iter()
            .skip(query.offset.max(0) as usize)
            .take(query.limit.max(0) as usize)
            .cloned()
            .collect();

        Ok(ReviewPage {
            reviews,
            total: state.reviews.len() as i64,
        })
    }

    async fn get(&self, id: i64) -> Result<Option<Review>> {
        let state = self.state.read().await;
        Ok(state.reviews.iter().find(|r| r.id == id).cloned())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut state = self.state.write().await;
        let before = state.reviews.len();
        state.reviews.retain(|r| r.id != id);
        Ok(state.reviews.len() < before)
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SentimentResult;

    fn new_review(name: &str) -> NewReview {
        NewReview::new(
            name,
            "Solid build quality and fast shipping",
            SentimentResult::new("positive", 0.91),
            vec!["Solid build".to_string()],
        )
    }

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() {
        let store = InMemoryReviewStore::new();
        let first = store.create(new_review("A")).await.unwrap();
        let second = store.create(new_review("B")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert!(second.created_at >= first.created_at);
    }

    #[tokio::test]
    async fn test_list_newest_first_with_pagination() {
        let store = InMemoryReviewStore::new();
        for name in ["A", "B", "C"] {
            store.create(new_review(name)).await.unwrap();
        }

        let page = store.list(ListQuery::new(1, 1)).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.reviews.len(), 1);
        assert_eq!(page.reviews[0].product_name, "B");
    }

    #[tokio::test]
    async fn test_get_and_delete() {
        let store = InMemoryReviewStore::new();
        let stored = store.create(new_review("A")).await.unwrap();

        assert_eq!(store.get(stored.id).await.unwrap(), Some(stored.clone()));
        assert!(store.delete(stored.id).await.unwrap());
        assert!(store.get(stored.id).await.unwrap().is_none());
        assert!(!store.delete(stored.id).await.unwrap());
    }
}
